pub mod lookup_ready;
pub mod response;

pub use lookup_ready::{require_lookup_middleware, LoadedLookup};
pub use response::{ApiResponse, ApiResult};
