// wallet-core/src/crypto/derivation/custom.rs
//
// Free-form paths built from a string, raw indexes, or one level at a time.

use super::{Derivation, DerivationIndex, DerivationPath, PathComponent};
use crate::error::WalletResult;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomDerivation {
    path: DerivationPath,
}

impl CustomDerivation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the path; it must start with `m/`.
    pub fn from_path(&mut self, path: &str) -> WalletResult<&mut Self> {
        self.path = DerivationPath::parse(path)?;
        Ok(self)
    }

    /// Replaces the path with serialized indexes (top bit set => hardened).
    pub fn from_indexes(&mut self, indexes: &[u32]) -> &mut Self {
        let indexes: Vec<DerivationIndex> = indexes.iter().map(|&raw| DerivationIndex::from_serialized(raw)).collect();
        self.path = DerivationPath::from_indexes(&indexes);
        self
    }

    /// Appends one level.
    pub fn from_index(&mut self, value: u32, hardened: bool) -> WalletResult<&mut Self> {
        let index = DerivationIndex::new(value, hardened)?;
        self.path.push(PathComponent::from(index));
        Ok(self)
    }
}

impl Derivation for CustomDerivation {
    fn name(&self) -> &'static str {
        "Custom"
    }

    fn path(&self) -> &DerivationPath {
        &self.path
    }

    fn clean(&mut self) {
        self.path = DerivationPath::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derivation::HARDENED_OFFSET;
    use crate::error::{DerivationError, WalletError};

    #[test]
    fn test_from_path() {
        let mut derivation = CustomDerivation::new();
        derivation.from_path("m/0'/1/2'").unwrap();
        assert_eq!(derivation.path().as_str(), "m/0'/1/2'");
        assert_eq!(derivation.indexes(), vec![HARDENED_OFFSET, 1, 2 + HARDENED_OFFSET]);

        assert!(matches!(
            derivation.from_path("0'/1"),
            Err(WalletError::Derivation(DerivationError::InvalidPathFormat(_)))
        ));
        // Unchanged after a failed parse
        assert_eq!(derivation.path().as_str(), "m/0'/1/2'");
    }

    #[test]
    fn test_from_indexes_and_append() {
        let mut derivation = CustomDerivation::new();
        derivation.from_indexes(&[44 + HARDENED_OFFSET, 0]);
        assert_eq!(derivation.path().as_str(), "m/44'/0");

        derivation.from_index(5, true).unwrap().from_index(6, false).unwrap();
        assert_eq!(derivation.path().as_str(), "m/44'/0/5'/6");
        assert_eq!(derivation.depth(), 4);

        assert!(derivation.from_index(HARDENED_OFFSET, false).is_err());
    }

    #[test]
    fn test_clean() {
        let mut derivation = CustomDerivation::new();
        derivation.from_path("m/1/2/3").unwrap();
        derivation.clean();
        assert_eq!(derivation.path().as_str(), "m/");
        assert_eq!(derivation.depth(), 0);
        assert!(derivation.indexes().is_empty());
    }
}
