// wallet-core/src/crypto/derivation/bip44.rs
//
// BIP-44 family: `m/purpose'/coin'/account'/change/address`
// BIP-49 (nested SegWit), BIP-84 (native SegWit), BIP-86 (Taproot) share the
// layout and only differ in purpose.

use super::{
    check_value, coin_type, Change, Derivation, DerivationPath, IndexRange, IntoIndexRange, PathComponent,
};
use crate::error::{WalletError, WalletResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bip44Kind {
    Bip44,
    Bip49,
    Bip84,
    Bip86,
}

impl Bip44Kind {
    #[inline]
    pub const fn purpose(self) -> u32 {
        match self {
            Bip44Kind::Bip44 => 44,
            Bip44Kind::Bip49 => 49,
            Bip44Kind::Bip84 => 84,
            Bip44Kind::Bip86 => 86,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Bip44Kind::Bip44 => "BIP44",
            Bip44Kind::Bip49 => "BIP49",
            Bip44Kind::Bip84 => "BIP84",
            Bip44Kind::Bip86 => "BIP86",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bip44Derivation {
    kind: Bip44Kind,
    coin_type: u32,
    account: IndexRange,
    change: Change,
    address: IndexRange,
    path: DerivationPath,
}

impl Bip44Derivation {
    /// Defaults to Bitcoin, account 0, external chain, address 0.
    pub fn new(kind: Bip44Kind) -> Self {
        let mut derivation = Self {
            kind,
            coin_type: coin_type::BITCOIN,
            account: IndexRange::default(),
            change: Change::External,
            address: IndexRange::default(),
            path: DerivationPath::default(),
        };
        derivation.rebuild();
        derivation
    }

    #[inline]
    pub fn kind(&self) -> Bip44Kind {
        self.kind
    }

    #[inline]
    pub fn purpose(&self) -> u32 {
        self.kind.purpose()
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
    pub fn change(&self) -> Change {
        self.change
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
            PathComponent::fixed(self.kind.purpose(), true),
            PathComponent::fixed(self.coin_type, true),
            PathComponent::new(self.account, true),
            PathComponent::fixed(self.change.index(), false),
            PathComponent::new(self.address, false),
        ]);
    }
}

impl Derivation for Bip44Derivation {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn path(&self) -> &DerivationPath {
        &self.path
    }

    fn clean(&mut self) {
        self.account = IndexRange::default();
        self.change = Change::External;
        self.address = IndexRange::default();
        self.rebuild();
    }
}
