//! Key-value store trait definition.
//!
//! The `KeyValueStore` trait is the boundary between the ledger logic and
//! whatever persists it: a directory of files for the CLI, a `HashMap` in
//! tests.

use crate::error::Result;

/// Origin-scoped persistent key-value storage holding text values.
///
/// All implementations must ensure:
/// - `set` fully replaces the prior value or leaves it untouched
/// - A missing key reads as `None`, never as an error
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ReceivingError::Storage` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ReceivingError::StorageWrite` if:
    /// - The value exceeds the store's quota
    /// - The backend write fails
    ///
    /// On error the previously stored value remains readable.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_definition_compiles() {
        fn _accepts_store<T: KeyValueStore>(_store: T) {}
        fn _accepts_borrowed<T: KeyValueStore>(store: &mut T) {
            _accepts_store(store);
        }
    }
}
