mod address_locks;

pub use address_locks::{AddressGuard, AddressLocks};
