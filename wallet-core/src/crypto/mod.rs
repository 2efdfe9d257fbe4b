// wallet-core/src/crypto/mod.rs

//! Core Cryptography Module
//!
//! Key material for deterministic wallets, from raw randomness to the path a
//! key deriver walks:
//!
//! - **Entropy**: scheme-checked random or imported bytes via [`Entropy`].
//! - **Mnemonics**: BIP-39, Electrum V1/V2, Monero and SLIP-39 codecs over
//!   pluggable wordlists ([`WordlistProvider`]).
//! - **Seeds**: per-scheme seed derivation via [`SeedDeriver`].
//! - **Derivation Paths**: BIP-44 family, CIP-1852, Electrum, Monero and
//!   custom paths via the [`Derivation`] trait.

pub mod derivation;
pub mod entropy;
pub mod mnemonic;
pub mod normalize;
pub mod primitives;
pub mod seed;
pub(crate) mod shamir;
pub mod wordlist;

// Re-exports for cleaner API access
pub use derivation::{
    Bip44Derivation, Bip44Kind, Change, Cip1852Derivation, CustomDerivation, Derivation, DerivationIndex,
    DerivationPath, ElectrumDerivation, MoneroDerivation, PathExpansion, Role,
};
pub use entropy::{Entropy, EntropyScheme};
pub use mnemonic::{
    Bip39Codec, ElectrumV1Codec, ElectrumV2Codec, ElectrumV2Type, GroupSpec, Mnemonic, MnemonicScheme,
    MoneroCodec, Slip39Codec, WordCount,
};
pub use seed::{CardanoSeedType, Seed, SeedDeriver, SeedScheme};
pub use wordlist::{Language, Wordlist, WordlistKind, WordlistProvider, Wordlists};
