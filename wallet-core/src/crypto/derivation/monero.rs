// wallet-core/src/crypto/derivation/monero.rs
//
// Monero subaddresses: `m/minor/major`.

use super::{check_value, Derivation, DerivationPath, PathComponent};
use crate::error::WalletResult;

pub const DEFAULT_MINOR: u32 = 1;
pub const DEFAULT_MAJOR: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneroDerivation {
    minor: u32,
    major: u32,
    path: DerivationPath,
}

impl Default for MoneroDerivation {
    fn default() -> Self {
        Self::new()
    }
}

impl MoneroDerivation {
    pub fn new() -> Self {
        let mut derivation = Self {
            minor: DEFAULT_MINOR,
            major: DEFAULT_MAJOR,
            path: DerivationPath::default(),
        };
        derivation.rebuild();
        derivation
    }

    #[inline]
    pub fn minor(&self) -> u32 {
        self.minor
    }

    #[inline]
    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn from_minor(&mut self, minor: u32) -> WalletResult<&mut Self> {
        check_value(minor)?;
        self.minor = minor;
        self.rebuild();
        Ok(self)
    }

    pub fn from_major(&mut self, major: u32) -> WalletResult<&mut Self> {
        check_value(major)?;
        self.major = major;
        self.rebuild();
        Ok(self)
    }

    fn rebuild(&mut self) {
        self.path = DerivationPath::new(vec![
            PathComponent::fixed(self.minor, false),
            PathComponent::fixed(self.major, false),
        ]);
    }
}

impl Derivation for MoneroDerivation {
    fn name(&self) -> &'static str {
        "Monero"
    }

    fn path(&self) -> &DerivationPath {
        &self.path
    }

    fn clean(&mut self) {
        self.minor = DEFAULT_MINOR;
        self.major = DEFAULT_MAJOR;
        self.rebuild();
    }
}
