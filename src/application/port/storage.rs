// SPDX-License-Identifier: MPL-2.0
//! Session storage port definition.
//!
//! Session storage is a flat string key/value namespace scoped to one
//! comparison session. Values are opaque to the store; the session codec
//! decides how they are encoded.

use crate::error::Result;

/// Port for ephemeral per-session key/value storage.
pub trait SessionStorage {
    /// Returns the stored value for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<()>;
}
