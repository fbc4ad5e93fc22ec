pub mod cascade;
pub mod loader;
pub mod lookup;
pub mod numerals;
pub mod selection;
pub mod selector;

pub use cascade::{address_change_patch, apply_address_change, is_offered, reconcile};
pub use loader::{DirLookupSource, HttpLookupSource, LoadState, LookupError, LookupResource, LookupSource, SharedLookup};
pub use lookup::{ConsistencyIssue, GeographicLookup};
pub use numerals::{display_ward, to_latin_digits};
pub use selection::{AddressLevel, AddressPatch, AddressSelection};
pub use selector::{level_control, ChangeHandler, HierarchicalAddressSelector, LevelControl, LevelState};
