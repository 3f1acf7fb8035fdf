/*
[INPUT]:  Auth results and persisted identity markers
[OUTPUT]: Session state and credential stores
[POS]:    Session layer - who is logged in, in memory and on disk
[UPDATE]: When session persistence or caching rules change
*/

pub mod state;
pub mod store;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use state::{AuthenticationGuard, Session};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

// A panicking listener must not wedge the session; data stays consistent
// because every critical section is a plain field assignment.
pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
