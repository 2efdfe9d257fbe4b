// wallet-core/src/crypto/derivation/cip1852.rs
//
// Cardano Shelley: `m/1852'/coin'/account'/role/address`, coin 1815 by default.

use super::{check_value, coin_type, Derivation, DerivationPath, IndexRange, IntoIndexRange, PathComponent};
use crate::error::{DerivationError, WalletError, WalletResult};

pub const PURPOSE: u32 = 1852;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    External = 0,
    Internal = 1,
    Staking = 2,
}

impl Role {
    pub const ACCEPTED: &'static [&'static str] =
        &["external-chain", "internal-chain", "staking-key", "0", "1", "2"];

    pub const fn name(self) -> &'static str {
        match self {
            Role::External => "external-chain",
            Role::Internal => "internal-chain",
            Role::Staking => "staking-key",
        }
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self as u32
    }

    fn rejected(value: impl ToString) -> WalletError {
        DerivationError::InvalidRole {
            value: value.to_string(),
            accepted: Self::ACCEPTED,
        }
        .into()
    }
}

impl TryFrom<&str> for Role {
    type Error = WalletError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "external-chain" | "0" => Ok(Role::External),
            "internal-chain" | "1" => Ok(Role::Internal),
            "staking-key" | "2" => Ok(Role::Staking),
            _ => Err(Self::rejected(value)),
        }
    }
}

impl TryFrom<u32> for Role {
    type Error = WalletError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::External),
            1 => Ok(Role::Internal),
            2 => Ok(Role::Staking),
            _ => Err(Self::rejected(value)),
        }
    }
}

impl TryFrom<i32> for Role {
    type Error = WalletError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map_err(|_| Self::rejected(value))
            .and_then(Role::try_from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cip1852Derivation {
    coin_type: u32,
    account: IndexRange,
    role: Role,
    address: IndexRange,
    path: DerivationPath,
}

impl Default for Cip1852Derivation {
    fn default() -> Self {
        Self::new()
    }
}

impl Cip1852Derivation {
    pub fn new() -> Self {
        let mut derivation = Self {
            coin_type: coin_type::CARDANO,
            account: IndexRange::default(),
            role: Role::External,
            address: IndexRange::default(),
            path: DerivationPath::default(),
        };
        derivation.rebuild();
        derivation
    }

    #[inline]
    pub fn coin_type(&self) -> u32 {
        self.coin_type
    }

    #[inline]
    pub fn account(&self) -> IndexRange {
        self.account
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn address(&self) -> IndexRange {
        self.address
    }

    pub fn from_coin_type(&mut self, coin_type: u32) -> WalletResult<&mut Self> {
        check_value(coin_type)?;
        self.coin_type = coin_type;
        self.rebuild();
        Ok(self)
    }

    pub fn from_account(&mut self, account: impl IntoIndexRange) -> WalletResult<&mut Self> {
        self.account = account.into_index_range()?;
        self.rebuild();
        Ok(self)
    }

    pub fn from_role<R>(&mut self, role: R) -> WalletResult<&mut Self>
    where
        R: TryInto<Role>,
        R::Error: Into<WalletError>,
    {
        self.role = role.try_into().map_err(Into::<WalletError>::into)?;
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
            PathComponent::fixed(PURPOSE, true),
            PathComponent::fixed(self.coin_type, true),
            PathComponent::new(self.account, true),
            PathComponent::fixed(self.role.index(), false),
            PathComponent::new(self.address, false),
        ]);
    }
}

impl Derivation for Cip1852Derivation {
    fn name(&self) -> &'static str {
        "CIP1852"
    }

    fn path(&self) -> &DerivationPath {
        &self.path
    }

    fn clean(&mut self) {
        self.account = IndexRange::default();
        self.role = Role::External;
        self.address = IndexRange::default();
        self.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derivation::HARDENED_OFFSET;

    #[test]
    fn test_default_path() {
        let derivation = Cip1852Derivation::new();
        assert_eq!(derivation.path().as_str(), "m/1852'/1815'/0'/0/0");
        assert_eq!(derivation.indexes()[0], 1852 + HARDENED_OFFSET);
        assert_eq!(derivation.indexes()[1], 1815 + HARDENED_OFFSET);
    }

    #[test]
    fn test_roles() {
        let mut derivation = Cip1852Derivation::new();
        derivation.from_role("staking-key").unwrap();
        assert_eq!(derivation.path().as_str(), "m/1852'/1815'/0'/2/0");
        derivation.from_role(1).unwrap();
        assert_eq!(derivation.role(), Role::Internal);
        derivation.from_role(Role::External).unwrap();
        assert_eq!(derivation.role().name(), "external-chain");

        assert!(matches!(
            derivation.from_role(3),
            Err(WalletError::Derivation(DerivationError::InvalidRole { .. }))
        ));
        assert!(matches!(
            derivation.from_role("drep"),
            Err(WalletError::Derivation(DerivationError::InvalidRole { .. }))
        ));
    }

    #[test]
    fn test_clean() {
        let mut derivation = Cip1852Derivation::new();
        derivation
            .from_account(4u32)
            .unwrap()
            .from_role(Role::Staking)
            .unwrap()
            .from_address(9u32)
            .unwrap();
        assert_eq!(derivation.path().as_str(), "m/1852'/1815'/4'/2/9");

        derivation.clean();
        assert_eq!(derivation.path().as_str(), "m/1852'/1815'/0'/0/0");
        assert_eq!(derivation.name(), "CIP1852");
    }

    #[test]
    fn test_coin_type_survives_clean() {
        let mut derivation = Cip1852Derivation::new();
        assert_eq!(derivation.coin_type(), coin_type::CARDANO);
        derivation
            .from_coin_type(coin_type::ETHEREUM)
            .unwrap()
            .from_account(2u32)
            .unwrap()
            .from_role("internal-chain")
            .unwrap()
            .from_address(5u32)
            .unwrap();
        assert_eq!(derivation.path().as_str(), "m/1852'/60'/2'/1/5");
        assert_eq!(derivation.indexes()[1], 60 + HARDENED_OFFSET);

        derivation.clean();
        assert_eq!(derivation.path().as_str(), "m/1852'/60'/0'/0/0");
        assert_eq!(derivation.coin_type(), coin_type::ETHEREUM);

        assert!(derivation.from_coin_type(HARDENED_OFFSET).is_err());
        assert_eq!(derivation.coin_type(), coin_type::ETHEREUM);
    }
}
