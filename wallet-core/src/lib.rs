// wallet-core/src/lib.rs

//! Entropy, mnemonic, seed and derivation-path codecs for deterministic
//! wallets. Everything is synchronous and offline; key derivation itself is
//! left to the caller.

pub mod config;
pub mod crypto;
pub mod error;

pub use config::CodecConfig;
pub use crypto::{Derivation, DerivationPath, Entropy, Language, Mnemonic, Seed, SeedDeriver, Wordlists};
pub use error::{WalletError, WalletResult};
