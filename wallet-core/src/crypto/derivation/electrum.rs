// wallet-core/src/crypto/derivation/electrum.rs
//
// Electrum wallets: `m/change/address`, both unhardened.

use super::{Change, Derivation, DerivationPath, IndexRange, IntoIndexRange, PathComponent};
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectrumDerivation {
    change: Change,
    address: IndexRange,
    path: DerivationPath,
}

impl Default for ElectrumDerivation {
    fn default() -> Self {
        Self::new()
    }
}

impl ElectrumDerivation {
    pub fn new() -> Self {
        let mut derivation = Self {
            change: Change::External,
            address: IndexRange::default(),
            path: DerivationPath::default(),
        };
        derivation.rebuild();
        derivation
    }

    #[inline]
    pub fn change(&self) -> Change {
        self.change
    }

    #[inline]
    pub fn address(&self) -> IndexRange {
        self.address
    }

    pub fn from_change<C>(&mut self, change: C) -> WalletResult<&mut Self>
    where
        C: TryInto<Change>,
        C::Error: Into<WalletError>,
    {
        self.change = change.try_into().map_err(Into::<WalletError>::into)?;
        self.rebuild();
        Ok(self)
    }

    pub fn from_address(&mut self, address: impl IntoIndexRange) -> WalletResult<&mut Self> {
        self.address = address.into_index_range()?;
        self.rebuild();
        Ok(self)
    }

    fn rebuild(&mut self) {
        self.path = DerivationPath::new(vec![
            PathComponent::fixed(self.change.index(), false),
            PathComponent::new(self.address, false),
        ]);
    }
}

impl Derivation for ElectrumDerivation {
    fn name(&self) -> &'static str {
        "Electrum"
    }

    fn path(&self) -> &DerivationPath {
        &self.path
    }

    fn clean(&mut self) {
        self.change = Change::External;
        self.address = IndexRange::default();
        self.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_electrum_path() {
        let mut derivation = ElectrumDerivation::new();
        assert_eq!(derivation.path().as_str(), "m/0/0");

        derivation.from_change("internal-chain").unwrap().from_address(12u32).unwrap();
        assert_eq!(derivation.path().as_str(), "m/1/12");
        assert_eq!(derivation.indexes(), vec![1, 12]);
        assert_eq!(derivation.depth(), 2);

        derivation.clean();
        assert_eq!(derivation.path().as_str(), "m/0/0");
    }

    #[test]
    fn test_invalid_change() {
        let mut derivation = ElectrumDerivation::new();
        assert!(derivation.from_change("change").is_err());
        assert!(derivation.from_change(5u32).is_err());
        assert_eq!(derivation.change(), Change::External);
    }
}
