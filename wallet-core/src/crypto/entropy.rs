// wallet-core/src/crypto/entropy.rs
//
// Entropy Module - strength-validated randomness per mnemonic scheme.

use crate::crypto::primitives;
use crate::error::{EntropyError, WalletResult};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

// =============================================================================
// SCHEMES
// =============================================================================
/// Mnemonic scheme an entropy value is sized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntropyScheme {
    /// BIP-39 (also Cardano and Electrum-compatible BIP-39 wallets)
    Bip39,
    /// Electrum "old" seeds (pre-2.0)
    ElectrumV1,
    /// Electrum 2.x seed-version mnemonics
    ElectrumV2,
    /// Monero 25/13-word seeds
    Monero,
    /// SLIP-39 master secrets
    Slip39,
}

impl EntropyScheme {
    pub const fn name(self) -> &'static str {
        match self {
            EntropyScheme::Bip39 => "BIP39",
            EntropyScheme::ElectrumV1 => "Electrum-V1",
            EntropyScheme::ElectrumV2 => "Electrum-V2",
            EntropyScheme::Monero => "Monero",
            EntropyScheme::Slip39 => "SLIP39",
        }
    }

    /// Allowed bit strengths, ascending.
    pub const fn strengths(self) -> &'static [usize] {
        match self {
            EntropyScheme::Bip39 => &[128, 160, 192, 224, 256],
            EntropyScheme::ElectrumV1 => &[128],
            EntropyScheme::ElectrumV2 => &[132, 264],
            EntropyScheme::Monero => &[128, 256],
            EntropyScheme::Slip39 => &[128, 256, 512],
        }
    }

    #[inline]
    pub fn is_valid_strength(self, strength: usize) -> bool {
        self.strengths().contains(&strength)
    }

    /// Electrum V2 strengths sit on the 11-bit word grid, not the byte grid.
    #[inline]
    pub const fn is_byte_aligned(self) -> bool {
        !matches!(self, EntropyScheme::ElectrumV2)
    }

    fn check_strength(self, strength: usize) -> WalletResult<()> {
        if self.is_valid_strength(strength) {
            Ok(())
        } else {
            Err(EntropyError::InvalidStrength {
                scheme: self.name(),
                strength,
                allowed: self.strengths(),
            }
            .into())
        }
    }
}

// =============================================================================
// ENTROPY VALUE
// =============================================================================
/// Immutable, validated entropy.
///
/// Byte-aligned schemes store the raw bytes and report `len * 8` bits.
/// Electrum V2 treats the bytes as one big-endian integer: its strength is the
/// integer's bit length (`floor(log2(v)) + 1`) rounded up to a multiple of 11,
/// and the bytes are kept canonically as `ceil(strength / 8)` bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Entropy {
    bytes: Vec<u8>,
    strength: usize,
    #[zeroize(skip)]
    scheme: EntropyScheme,
}

impl std::fmt::Debug for Entropy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entropy")
            .field("scheme", &self.scheme)
            .field("strength", &self.strength)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl Entropy {
    /// Fresh entropy from the OS CSPRNG.
    ///
    /// Electrum V2 draws a `strength`-bit integer with its top bit set, so the
    /// generated value always lands on the requested strength.
    pub fn generate(scheme: EntropyScheme, strength: usize) -> WalletResult<Self> {
        scheme.check_strength(strength)?;

        let bytes = if scheme.is_byte_aligned() {
            primitives::secure_random_bytes(strength / 8)
        } else {
            primitives::secure_random_bits(strength)
        };
        debug!(scheme = scheme.name(), strength, "Generated entropy");

        Ok(Self {
            bytes,
            strength,
            scheme,
        })
    }

    /// Validate caller-supplied bytes.
    pub fn from_bytes(scheme: EntropyScheme, bytes: impl AsRef<[u8]>) -> WalletResult<Self> {
        let bytes = bytes.as_ref();

        if scheme.is_byte_aligned() {
            let strength = bytes.len() * 8;
            scheme.check_strength(strength)?;
            return Ok(Self {
                bytes: bytes.to_vec(),
                strength,
                scheme,
            });
        }

        let strength = bit_length(bytes).div_ceil(11) * 11;
        scheme.check_strength(strength)?;
        Ok(Self {
            bytes: left_pad(strip_leading_zeros(bytes), strength.div_ceil(8)),
            strength,
            scheme,
        })
    }

    /// Validate hex-encoded entropy (an optional `0x` prefix is accepted).
    pub fn from_hex(scheme: EntropyScheme, hex_str: &str) -> WalletResult<Self> {
        let trimmed = hex_str.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let mut bytes = hex::decode(trimmed)
            .map_err(|e| EntropyError::InvalidEntropyEncoding(e.to_string()))?;
        let entropy = Self::from_bytes(scheme, &bytes);
        bytes.zeroize();
        entropy
    }

    /// Same bytes, re-validated for another scheme.
    pub fn for_scheme(&self, scheme: EntropyScheme) -> WalletResult<Self> {
        Self::from_bytes(scheme, &self.bytes)
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    #[inline]
    pub fn strength(&self) -> usize {
        self.strength
    }

    #[inline]
    pub fn scheme(&self) -> EntropyScheme {
        self.scheme
    }
}

// =============================================================================
// BIG-ENDIAN HELPERS
// =============================================================================

/// Number of significant bits of a big-endian integer (0 for zero).
pub(crate) fn bit_length(bytes: &[u8]) -> usize {
    let trimmed = strip_leading_zeros(bytes);
    match trimmed.first() {
        Some(first) => trimmed.len() * 8 - first.leading_zeros() as usize,
        None => 0,
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

pub(crate) fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width.saturating_sub(bytes.len())];
    out.extend_from_slice(bytes);
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;

    const ALL_SCHEMES: [EntropyScheme; 5] = [
        EntropyScheme::Bip39,
        EntropyScheme::ElectrumV1,
        EntropyScheme::ElectrumV2,
        EntropyScheme::Monero,
        EntropyScheme::Slip39,
    ];

    #[test]
    fn test_generate_every_allowed_strength() {
        for scheme in ALL_SCHEMES {
            for &strength in scheme.strengths() {
                let entropy = Entropy::generate(scheme, strength).unwrap();
                assert_eq!(entropy.strength(), strength);
                assert_eq!(entropy.scheme(), scheme);
                if scheme.is_byte_aligned() {
                    assert_eq!(entropy.bytes().len() * 8, strength);
                } else {
                    assert_eq!(bit_length(entropy.bytes()), strength);
                }
            }
        }
    }

    #[test]
    fn test_generate_rejects_unlisted_strength() {
        for scheme in ALL_SCHEMES {
            for strength in [0usize, 64, 129, 136, 200, 384, 1024] {
                if scheme.is_valid_strength(strength) {
                    continue;
                }
                let result = Entropy::generate(scheme, strength);
                assert!(matches!(
                    result,
                    Err(WalletError::Entropy(EntropyError::InvalidStrength { .. }))
                ));
            }
        }
    }

    #[test]
    fn test_from_bytes_bip39() {
        let entropy = Entropy::from_bytes(EntropyScheme::Bip39, [0u8; 20]).unwrap();
        assert_eq!(entropy.strength(), 160);

        let result = Entropy::from_bytes(EntropyScheme::Bip39, [0u8; 17]);
        assert_eq!(
            result.unwrap_err(),
            WalletError::Entropy(EntropyError::InvalidStrength {
                scheme: "BIP39",
                strength: 136,
                allowed: &[128, 160, 192, 224, 256],
            })
        );
    }

    #[test]
    fn test_from_bytes_electrum_v2_uses_bit_length() {
        // 2^131: floor(log2) = 131, 132 significant bits
        let mut top = vec![0u8; 17];
        top[0] = 0x08;
        let entropy = Entropy::from_bytes(EntropyScheme::ElectrumV2, &top).unwrap();
        assert_eq!(entropy.strength(), 132);

        // Leading zero bytes are canonicalised away
        let mut padded = vec![0u8; 3];
        padded.extend_from_slice(&top);
        let same = Entropy::from_bytes(EntropyScheme::ElectrumV2, &padded).unwrap();
        assert_eq!(same, entropy);

        // 2^132 needs 13 words
        let mut too_big = vec![0u8; 17];
        too_big[0] = 0x10;
        assert!(Entropy::from_bytes(EntropyScheme::ElectrumV2, &too_big).is_err());

        // Zero has no strength at all
        assert!(Entropy::from_bytes(EntropyScheme::ElectrumV2, [0u8; 17]).is_err());
    }

    #[test]
    fn test_from_hex() {
        let entropy =
            Entropy::from_hex(EntropyScheme::Bip39, "0x7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f").unwrap();
        assert_eq!(entropy.strength(), 128);
        assert_eq!(entropy.to_hex(), "7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f");

        let result = Entropy::from_hex(EntropyScheme::Bip39, "zz");
        assert!(matches!(
            result,
            Err(WalletError::Entropy(EntropyError::InvalidEntropyEncoding(_)))
        ));
    }

    #[test]
    fn test_for_scheme_revalidates() {
        let entropy = Entropy::from_bytes(EntropyScheme::Bip39, [1u8; 20]).unwrap();
        assert!(entropy.for_scheme(EntropyScheme::Monero).is_err());
        assert!(entropy.for_scheme(EntropyScheme::Bip39).is_ok());
    }

    #[test]
    fn test_debug_does_not_leak_bytes() {
        let entropy = Entropy::from_bytes(EntropyScheme::Bip39, [0xABu8; 16]).unwrap();
        let debug_output = format!("{:?}", entropy);
        assert!(!debug_output.contains("171"));
        assert!(!debug_output.to_lowercase().contains("abab"));
        assert!(debug_output.contains("REDACTED"));
    }
}
