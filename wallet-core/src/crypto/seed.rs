// wallet-core/src/crypto/seed.rs
//
// Seed Derivation - validated mnemonic (+ passphrase) -> binary seed.
// Every path validates the mnemonic through its codec first; unvalidated
// text never reaches a KDF.

use crate::crypto::mnemonic::{
    Bip39Codec, ElectrumV1Codec, ElectrumV2Codec, ElectrumV2Type, MoneroCodec, Slip39Codec,
};
use crate::crypto::normalize::{electrum_normalize, nfkd};
use crate::crypto::primitives::{pbkdf2_hmac_sha512, sha256};
use crate::crypto::wordlist::WordlistProvider;
use crate::error::{SeedError, WalletError, WalletResult};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

const PBKDF2_ROUNDS: u32 = 2048;
const SEED_LEN: usize = 64;
const ELECTRUM_V1_STRETCH_ROUNDS: usize = 100_000;

/// Cardano master-key conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardanoSeedType {
    /// Icarus / Byron-Icarus: the decoded BIP-39 entropy
    Icarus,
    /// Ledger: the BIP-39 PBKDF2 seed
    Ledger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedScheme {
    Bip39,
    Cardano(CardanoSeedType),
    ElectrumV1,
    ElectrumV2,
    Monero,
    Slip39,
}

impl SeedScheme {
    pub const fn name(self) -> &'static str {
        match self {
            SeedScheme::Bip39 => "BIP39",
            SeedScheme::Cardano(_) => "Cardano",
            SeedScheme::ElectrumV1 => "Electrum-V1",
            SeedScheme::ElectrumV2 => "Electrum-V2",
            SeedScheme::Monero => "Monero",
            SeedScheme::Slip39 => "SLIP39",
        }
    }
}

// =============================================================================
// SEED VALUE
// =============================================================================
/// Derived key material; wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    scheme: SeedScheme,
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seed")
            .field("scheme", &self.scheme)
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl Seed {
    fn new(bytes: Vec<u8>, scheme: SeedScheme) -> Self {
        debug!(scheme = scheme.name(), len = bytes.len(), "Derived seed");
        Self { bytes, scheme }
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn scheme(&self) -> SeedScheme {
        self.scheme
    }
}

fn invalid(scheme: SeedScheme, cause: WalletError) -> WalletError {
    SeedError::InvalidMnemonic {
        scheme: scheme.name(),
        reason: cause.to_string(),
    }
    .into()
}

// =============================================================================
// DERIVER
// =============================================================================
/// Seed derivation over a wordlist provider.
#[derive(Clone, Copy)]
pub struct SeedDeriver<'a> {
    provider: &'a dyn WordlistProvider,
}

impl<'a> SeedDeriver<'a> {
    pub fn new(provider: &'a dyn WordlistProvider) -> Self {
        Self { provider }
    }

    /// Dispatches on `scheme`. Electrum V2 accepts any type tag here.
    pub fn derive(&self, scheme: SeedScheme, text: &str, passphrase: Option<&str>) -> WalletResult<Seed> {
        match scheme {
            SeedScheme::Bip39 => self.bip39(text, passphrase),
            SeedScheme::Cardano(seed_type) => self.cardano(text, passphrase, seed_type),
            SeedScheme::ElectrumV1 => self.electrum_v1(text),
            SeedScheme::ElectrumV2 => self.electrum_v2(text, passphrase, None),
            SeedScheme::Monero => self.monero(text),
            SeedScheme::Slip39 => self.slip39(text, passphrase),
        }
    }

    /// PBKDF2-HMAC-SHA512(NFKD(mnemonic), NFKD("mnemonic" + passphrase), 2048) -> 64 bytes.
    pub fn bip39(&self, text: &str, passphrase: Option<&str>) -> WalletResult<Seed> {
        let bytes = self.bip39_bytes(text, passphrase, SeedScheme::Bip39)?;
        Ok(Seed::new(bytes, SeedScheme::Bip39))
    }

    pub fn cardano(&self, text: &str, passphrase: Option<&str>, seed_type: CardanoSeedType) -> WalletResult<Seed> {
        let scheme = SeedScheme::Cardano(seed_type);
        let bytes = match seed_type {
            CardanoSeedType::Icarus => Bip39Codec::new(self.provider)
                .decode(text, None)
                .map_err(|e| invalid(scheme, e))?
                .bytes()
                .to_vec(),
            CardanoSeedType::Ledger => self.bip39_bytes(text, passphrase, scheme)?,
        };
        Ok(Seed::new(bytes, scheme))
    }

    /// Electrum 1.x key stretching: `x = sha256(x || hex)` 100000 times.
    pub fn electrum_v1(&self, text: &str) -> WalletResult<Seed> {
        let entropy = ElectrumV1Codec::new(self.provider)
            .decode(text)
            .map_err(|e| invalid(SeedScheme::ElectrumV1, e))?;

        let mut hex_seed = entropy.to_hex().into_bytes();
        let mut buf = Vec::with_capacity(32 + hex_seed.len());
        let mut x = hex_seed.clone();
        for _ in 0..ELECTRUM_V1_STRETCH_ROUNDS {
            buf.clear();
            buf.extend_from_slice(&x);
            buf.extend_from_slice(&hex_seed);
            x.zeroize();
            x = sha256(&buf).to_vec();
        }
        buf.zeroize();
        hex_seed.zeroize();
        Ok(Seed::new(x, SeedScheme::ElectrumV1))
    }

    /// PBKDF2-HMAC-SHA512(normalized mnemonic, "electrum" + normalized passphrase, 2048).
    pub fn electrum_v2(
        &self,
        text: &str,
        passphrase: Option<&str>,
        mnemonic_type: Option<ElectrumV2Type>,
    ) -> WalletResult<Seed> {
        ElectrumV2Codec::new(self.provider)
            .decode(text, None, mnemonic_type)
            .map_err(|e| invalid(SeedScheme::ElectrumV2, e))?;

        let mut password = electrum_normalize(text);
        let mut salt = format!("electrum{}", electrum_normalize(passphrase.unwrap_or("")));
        let bytes = pbkdf2_hmac_sha512(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, SEED_LEN);
        password.zeroize();
        salt.zeroize();
        Ok(Seed::new(bytes, SeedScheme::ElectrumV2))
    }

    /// The decoded entropy.
    pub fn monero(&self, text: &str) -> WalletResult<Seed> {
        let entropy = MoneroCodec::new(self.provider)
            .decode(text, None)
            .map_err(|e| invalid(SeedScheme::Monero, e))?;
        Ok(Seed::new(entropy.bytes().to_vec(), SeedScheme::Monero))
    }

    /// A valid BIP-39 mnemonic yields its decoded entropy; anything else must
    /// be a SLIP-39 share set (one share per line), decrypted with `passphrase`.
    pub fn slip39(&self, text: &str, passphrase: Option<&str>) -> WalletResult<Seed> {
        if let Ok(entropy) = Bip39Codec::new(self.provider).decode(text, None) {
            return Ok(Seed::new(entropy.bytes().to_vec(), SeedScheme::Slip39));
        }
        let entropy = Slip39Codec::new(self.provider)
            .decode(text, passphrase.unwrap_or(""))
            .map_err(|e| invalid(SeedScheme::Slip39, e))?;
        Ok(Seed::new(entropy.bytes().to_vec(), SeedScheme::Slip39))
    }

    fn bip39_bytes(&self, text: &str, passphrase: Option<&str>, scheme: SeedScheme) -> WalletResult<Vec<u8>> {
        let mnemonic = Bip39Codec::new(self.provider)
            .parse(text, None)
            .map_err(|e| invalid(scheme, e))?;

        // Canonical NFKD words, so accent-folded input derives the same seed
        let mut password = mnemonic.words().join(" ");
        let mut salt = nfkd(&format!("mnemonic{}", passphrase.unwrap_or("")));
        let bytes = pbkdf2_hmac_sha512(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, SEED_LEN);
        password.zeroize();
        salt.zeroize();
        Ok(bytes)
    }
}
