// handlers/mod.rs - HTTP handlers
//
// address: cascading province → district → municipality → ward endpoints
// (/api/address/*). The static lookup documents under /data are served
// straight from disk and have no handler of their own.
pub mod address;
