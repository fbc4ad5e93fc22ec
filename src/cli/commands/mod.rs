pub mod address;
pub mod lookup;
