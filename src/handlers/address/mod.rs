// handlers/address/mod.rs - Address selector endpoints
//
// Options and ward display answer even when the lookup failed to load: every
// level simply reports itself disabled. The lookup endpoint returns 503 in
// that case, and the edit endpoints (change, reconcile) sit behind
// require_lookup_middleware.

pub mod change;
pub mod lookup;
pub mod options;
pub mod ward;

pub use change::change_post;
pub use change::reconcile_post;
pub use lookup::lookup_get;
pub use options::options_get;
pub use ward::ward_display_get;
