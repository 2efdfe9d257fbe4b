// wallet-core/src/error.rs

use thiserror::Error;

pub type WalletResult<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Entropy Error: {0}")]
    Entropy(#[from] EntropyError),

    #[error("Mnemonic Error: {0}")]
    Mnemonic(#[from] MnemonicError),

    #[error("Seed Error: {0}")]
    Seed(#[from] SeedError),

    #[error("Derivation Error: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Config Error: {0}")]
    Config(String),
}

// Setters accept anything convertible into their field type; identity
// conversions are infallible.
impl From<std::convert::Infallible> for WalletError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntropyError {
    #[error("Invalid {scheme} entropy strength: {strength} bits. Expected one of {allowed:?}.")]
    InvalidStrength {
        scheme: &'static str,
        strength: usize,
        allowed: &'static [usize],
    },

    #[error("Invalid entropy encoding: {0}")]
    InvalidEntropyEncoding(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("Invalid word count: {count}. Expected one of {allowed:?}.")]
    InvalidWordCount {
        count: usize,
        allowed: &'static [usize],
    },

    #[error("Word '{0}' not found in the wordlist.")]
    UnknownWord(String),

    #[error("Checksum validation failed.")]
    ChecksumMismatch,

    #[error("Mnemonic words do not belong to any known wordlist.")]
    UnknownLanguage,

    #[error("Mnemonic words match several wordlists: {0:?}")]
    AmbiguousLanguage(Vec<String>),

    #[error("Mnemonic is also a valid {0} mnemonic.")]
    CrossSchemeCollision(&'static str),

    #[error("No valid mnemonic found after {attempts} attempts.")]
    MnemonicGenerationExhausted { attempts: u64 },

    #[error("Invalid wordlist: {0}")]
    InvalidWordlist(String),

    #[error("Unsupported share layout: {0}")]
    UnsupportedShare(String),

    #[error("Shares do not recover a secret: {0}")]
    InvalidShareSet(String),

    #[error("Invalid share group specification: {0}")]
    InvalidGroupSpec(String),

    #[error("Passphrase must contain only printable ASCII characters.")]
    InvalidPassphrase,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("Invalid {scheme} mnemonic: {reason}")]
    InvalidMnemonic {
        scheme: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Invalid change index '{value}'. Accepted: {accepted:?}.")]
    InvalidChangeIndex {
        value: String,
        accepted: &'static [&'static str],
    },

    #[error("Invalid role '{value}'. Accepted: {accepted:?}.")]
    InvalidRole {
        value: String,
        accepted: &'static [&'static str],
    },

    #[error("Invalid path format: {0}")]
    InvalidPathFormat(String),

    #[error("Invalid index value: {0}")]
    InvalidIndexValue(String),
}
