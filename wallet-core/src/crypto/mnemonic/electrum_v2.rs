// wallet-core/src/crypto/mnemonic/electrum_v2.rs
//
// Electrum 2.x "seed version" mnemonics.
//
// The entropy is one big integer written in base 2048, least significant word
// first. The type tag is not stored in the words: it is the hex prefix of
// HMAC-SHA512("Seed version", normalized phrase), so encoding searches
// `entropy + i` until a candidate carries the requested prefix.

use super::bip39::Bip39Codec;
use super::electrum_v1::ElectrumV1Codec;
use super::{candidate_wordlists, check_word_count, index_of, resolve, word_at, Mnemonic, MnemonicScheme};
use crate::config::CodecConfig;
use crate::crypto::entropy::{Entropy, EntropyScheme};
use crate::crypto::normalize::{electrum_normalize, normalize_words};
use crate::crypto::primitives::hmac_sha512;
use crate::crypto::wordlist::{Language, Wordlist, WordlistKind, WordlistProvider};
use crate::error::{MnemonicError, WalletError, WalletResult};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::sync::Arc;
use tracing::{debug, trace, warn};

const WORD_COUNTS: &[usize] = &[12, 24];
const SEED_VERSION_KEY: &[u8] = b"Seed version";

// =============================================================================
// TYPE TAGS
// =============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElectrumV2Type {
    Standard,
    Segwit,
    Standard2fa,
    Segwit2fa,
}

impl ElectrumV2Type {
    pub const ALL: [ElectrumV2Type; 4] = [
        ElectrumV2Type::Standard,
        ElectrumV2Type::Segwit,
        ElectrumV2Type::Standard2fa,
        ElectrumV2Type::Segwit2fa,
    ];

    /// Required hex prefix of the seed-version HMAC.
    pub const fn prefix(self) -> &'static str {
        match self {
            ElectrumV2Type::Standard => "01",
            ElectrumV2Type::Segwit => "100",
            ElectrumV2Type::Standard2fa => "101",
            ElectrumV2Type::Segwit2fa => "102",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElectrumV2Type::Standard => "standard",
            ElectrumV2Type::Segwit => "segwit",
            ElectrumV2Type::Standard2fa => "standard-2fa",
            ElectrumV2Type::Segwit2fa => "segwit-2fa",
        }
    }

    /// Type whose prefix `phrase` carries, if any.
    pub fn detect(phrase: &str) -> Option<Self> {
        let digest = hex::encode(hmac_sha512(SEED_VERSION_KEY, electrum_normalize(phrase).as_bytes())?);
        Self::ALL.into_iter().find(|t| digest.starts_with(t.prefix()))
    }

    #[inline]
    pub fn matches(self, phrase: &str) -> bool {
        Self::detect(phrase) == Some(self)
    }
}

impl std::fmt::Display for ElectrumV2Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ElectrumV2Type {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s.trim().to_lowercase())
            .ok_or_else(|| WalletError::Config(format!("unknown Electrum V2 mnemonic type '{}'", s)))
    }
}

// =============================================================================
// CODEC
// =============================================================================
#[derive(Clone, Copy)]
pub struct ElectrumV2Codec<'a> {
    provider: &'a dyn WordlistProvider,
    max_attempts: u64,
}

impl<'a> ElectrumV2Codec<'a> {
    pub fn new(provider: &'a dyn WordlistProvider) -> Self {
        Self::from_config(provider, &CodecConfig::default())
    }

    pub fn from_config(provider: &'a dyn WordlistProvider, config: &CodecConfig) -> Self {
        Self {
            provider,
            max_attempts: config.electrum_v2_max_attempts,
        }
    }

    /// Overrides the search cap.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[inline]
    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    // =========================================================================
    // ENCODING
    // =========================================================================

    /// Word sequences for `entropy + i`, `i` in `0..max_attempts`, unfiltered.
    pub fn candidates(
        &self,
        entropy: &Entropy,
        language: Language,
    ) -> WalletResult<impl Iterator<Item = WalletResult<Vec<String>>>> {
        let list = self.wordlist(language)?;
        let start = BigUint::from_bytes_be(entropy.bytes());
        Ok((0..self.max_attempts).map(move |i| digits_to_words(&list, &(&start + i))))
    }

    /// First candidate with the right length and type tag that is not also a
    /// BIP-39 or Electrum V1 mnemonic.
    ///
    /// # Errors
    /// `InvalidStrength` unless `entropy` is 132 or 264 bits,
    /// `UnknownLanguage` for a language without a list and
    /// `MnemonicGenerationExhausted` when no candidate qualifies within
    /// `max_attempts`.
    pub fn encode(&self, entropy: &Entropy, language: Language, mnemonic_type: ElectrumV2Type) -> WalletResult<Mnemonic> {
        let entropy = entropy.for_scheme(EntropyScheme::ElectrumV2)?;
        let expected_words = entropy.strength() / 11;
        let bip39 = Bip39Codec::new(self.provider);
        let v1 = ElectrumV1Codec::new(self.provider);

        for (attempt, words) in self.candidates(&entropy, language)?.enumerate() {
            let words = match words {
                Ok(words) if words.len() == expected_words => words,
                Ok(_) => continue,
                Err(e) => return Err(e),
            };
            let phrase = words.join(" ");
            if !mnemonic_type.matches(&phrase) {
                continue;
            }
            if bip39.is_valid(&phrase, None) || v1.is_valid(&phrase) {
                trace!(attempt, "Skipping cross-scheme candidate");
                continue;
            }
            debug!(
                language = %language,
                mnemonic_type = %mnemonic_type,
                attempts = attempt + 1,
                "Encoded Electrum V2 mnemonic"
            );
            return Ok(Mnemonic::new(words, language, MnemonicScheme::ElectrumV2, Some(mnemonic_type)));
        }

        warn!(
            mnemonic_type = %mnemonic_type,
            attempts = self.max_attempts,
            "Electrum V2 search exhausted"
        );
        Err(MnemonicError::MnemonicGenerationExhausted {
            attempts: self.max_attempts,
        }
        .into())
    }

    pub fn generate(&self, strength: usize, language: Language, mnemonic_type: ElectrumV2Type) -> WalletResult<Mnemonic> {
        let entropy = Entropy::generate(EntropyScheme::ElectrumV2, strength)?;
        self.encode(&entropy, language, mnemonic_type)
    }

    // =========================================================================
    // DECODING
    // =========================================================================

    /// Recovers the entropy of a seed-version tagged mnemonic.
    ///
    /// # Errors
    /// - `CrossSchemeCollision` when `text` is also BIP-39 or Electrum V1.
    /// - `InvalidWordCount`, `UnknownWord` or `UnknownLanguage` for malformed
    ///   input.
    /// - `ChecksumMismatch` when the type tag is missing or is not
    ///   `mnemonic_type`.
    pub fn decode(
        &self,
        text: &str,
        language: Option<Language>,
        mnemonic_type: Option<ElectrumV2Type>,
    ) -> WalletResult<Entropy> {
        self.decode_resolved(text, language, mnemonic_type)
            .map(|(_, _, entropy)| entropy)
    }

    /// Validates `text` and returns it in canonical wordlist form.
    pub fn parse(
        &self,
        text: &str,
        language: Option<Language>,
        mnemonic_type: Option<ElectrumV2Type>,
    ) -> WalletResult<Mnemonic> {
        let (list, mnemonic_type, entropy) = self.decode_resolved(text, language, mnemonic_type)?;
        let value = BigUint::from_bytes_be(entropy.bytes());
        let words = digits_to_words(&list, &value)?;
        Ok(Mnemonic::new(
            words,
            list.language(),
            MnemonicScheme::ElectrumV2,
            Some(mnemonic_type),
        ))
    }

    #[inline]
    pub fn is_valid(&self, text: &str, language: Option<Language>, mnemonic_type: Option<ElectrumV2Type>) -> bool {
        self.decode_resolved(text, language, mnemonic_type).is_ok()
    }

    /// Type tag carried by `text`; `ChecksumMismatch` when it has none.
    pub fn mnemonic_type(&self, text: &str) -> WalletResult<ElectrumV2Type> {
        ElectrumV2Type::detect(text).ok_or_else(|| MnemonicError::ChecksumMismatch.into())
    }

    fn decode_resolved(
        &self,
        text: &str,
        language: Option<Language>,
        mnemonic_type: Option<ElectrumV2Type>,
    ) -> WalletResult<(Arc<Wordlist>, ElectrumV2Type, Entropy)> {
        if Bip39Codec::new(self.provider).is_valid(text, None) {
            return Err(MnemonicError::CrossSchemeCollision(EntropyScheme::Bip39.name()).into());
        }
        if ElectrumV1Codec::new(self.provider).is_valid(text) {
            return Err(MnemonicError::CrossSchemeCollision(EntropyScheme::ElectrumV1.name()).into());
        }

        let words = normalize_words(text);
        check_word_count(words.len(), WORD_COUNTS)?;

        let detected = self.mnemonic_type(text)?;
        if mnemonic_type.is_some_and(|wanted| wanted != detected) {
            return Err(MnemonicError::ChecksumMismatch.into());
        }

        let candidates = candidate_wordlists(self.provider, WordlistKind::ElectrumV2, &words, language)?;
        let (list, entropy) = resolve(candidates, |list| words_to_entropy(list, &words))?;
        Ok((list, detected, entropy))
    }

    fn wordlist(&self, language: Language) -> WalletResult<Arc<Wordlist>> {
        self.provider
            .wordlist(language, WordlistKind::ElectrumV2)
            .ok_or_else(|| MnemonicError::UnknownLanguage.into())
    }
}

/// Base-N digits of `value`, least significant first.
fn digits_to_words(list: &Wordlist, value: &BigUint) -> WalletResult<Vec<String>> {
    let n = BigUint::from(list.len());
    let mut remaining = value.clone();
    let mut words = Vec::new();
    while !remaining.is_zero() {
        let digit = (&remaining % &n).to_usize().unwrap_or(usize::MAX);
        words.push(word_at(list, digit)?);
        remaining /= &n;
    }
    Ok(words)
}

fn words_to_entropy(list: &Wordlist, words: &[String]) -> WalletResult<Entropy> {
    let n = BigUint::from(list.len());
    let mut value = BigUint::zero();
    for word in words.iter().rev() {
        value = value * &n + BigUint::from(index_of(list, word)?);
    }
    Entropy::from_bytes(EntropyScheme::ElectrumV2, value.to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::wordlist::Wordlists;

    // Electrum's own segwit test seed
    const SEGWIT_MNEMONIC: &str =
        "wild father tree among universe such mobile favorite target dynamic credit identify";

    fn entropy_132() -> Entropy {
        let mut bytes = [0x5Au8; 17];
        bytes[0] = 0x0B;
        Entropy::from_bytes(EntropyScheme::ElectrumV2, bytes).unwrap()
    }

    #[test]
    fn test_known_segwit_mnemonic() {
        let lists = Wordlists::builtin();
        let codec = ElectrumV2Codec::new(&lists);
        assert_eq!(codec.mnemonic_type(SEGWIT_MNEMONIC).unwrap(), ElectrumV2Type::Segwit);
        assert!(codec.is_valid(SEGWIT_MNEMONIC, None, None));
        assert!(codec.is_valid(SEGWIT_MNEMONIC, Some(Language::English), Some(ElectrumV2Type::Segwit)));
        assert_eq!(
            codec.decode(SEGWIT_MNEMONIC, None, Some(ElectrumV2Type::Standard)).unwrap_err(),
            WalletError::Mnemonic(MnemonicError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_encode_standard_and_segwit_prefixes() {
        let lists = Wordlists::builtin();
        let codec = ElectrumV2Codec::new(&lists);
        let entropy = entropy_132();

        for (mnemonic_type, prefix) in [(ElectrumV2Type::Standard, "01"), (ElectrumV2Type::Segwit, "100")] {
            let mnemonic = codec.encode(&entropy, Language::English, mnemonic_type).unwrap();
            assert_eq!(mnemonic.word_count(), 12);
            assert_eq!(mnemonic.mnemonic_type(), Some(mnemonic_type));

            let digest = hex::encode(hmac_sha512(
                SEED_VERSION_KEY,
                electrum_normalize(&mnemonic.phrase()).as_bytes(),
            )
            .unwrap());
            assert!(digest.starts_with(prefix));

            let decoded = codec.decode(&mnemonic.phrase(), None, Some(mnemonic_type)).unwrap();
            let again = codec.encode(&decoded, Language::English, mnemonic_type).unwrap();
            assert_eq!(again, mnemonic);
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let lists = Wordlists::builtin();
        let codec = ElectrumV2Codec::new(&lists);
        let a = codec.encode(&entropy_132(), Language::Spanish, ElectrumV2Type::Standard).unwrap();
        let b = codec.encode(&entropy_132(), Language::Spanish, ElectrumV2Type::Standard).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.language(), Language::Spanish);
    }

    #[test]
    fn test_generate_24_words() {
        let lists = Wordlists::builtin();
        let codec = ElectrumV2Codec::new(&lists);
        let mnemonic = codec.generate(264, Language::English, ElectrumV2Type::Standard).unwrap();
        assert_eq!(mnemonic.word_count(), 24);
        let parsed = codec.parse(&mnemonic.phrase(), None, None).unwrap();
        assert_eq!(parsed, mnemonic);
    }

    #[test]
    fn test_search_exhaustion() {
        let lists = Wordlists::builtin();
        let codec = ElectrumV2Codec::new(&lists).with_max_attempts(1);

        // A single attempt almost never lands on a 12-bit prefix; find an
        // entropy whose first candidate does not carry it.
        let mut bytes = [0x5Au8; 17];
        bytes[0] = 0x0B;
        let entropy = (0u8..=255)
            .map(|b| {
                bytes[16] = b;
                Entropy::from_bytes(EntropyScheme::ElectrumV2, bytes).unwrap()
            })
            .find(|e| {
                let words = codec.candidates(e, Language::English).unwrap().next().unwrap().unwrap();
                !ElectrumV2Type::Segwit.matches(&words.join(" "))
            })
            .unwrap();

        assert_eq!(
            codec.encode(&entropy, Language::English, ElectrumV2Type::Segwit).unwrap_err(),
            WalletError::Mnemonic(MnemonicError::MnemonicGenerationExhausted { attempts: 1 })
        );
    }

    #[test]
    fn test_rejects_valid_bip39_text() {
        let lists = Wordlists::builtin();
        let codec = ElectrumV2Codec::new(&lists);
        let bip39 = Bip39Codec::new(&lists);

        // Walk BIP-39 encodings until one also carries the "01" prefix.
        let colliding = (0u32..)
            .map(|i| {
                let mut bytes = [0u8; 16];
                bytes[12..].copy_from_slice(&i.to_be_bytes());
                let entropy = Entropy::from_bytes(EntropyScheme::Bip39, bytes).unwrap();
                bip39.encode(&entropy, Language::English).unwrap().phrase()
            })
            .find(|phrase| ElectrumV2Type::Standard.matches(phrase))
            .unwrap();

        assert!(!codec.is_valid(&colliding, None, None));
        assert_eq!(
            codec.decode(&colliding, None, None).unwrap_err(),
            WalletError::Mnemonic(MnemonicError::CrossSchemeCollision("BIP39"))
        );
    }

    #[test]
    fn test_word_count_and_missing_tag() {
        let lists = Wordlists::builtin();
        let codec = ElectrumV2Codec::new(&lists);
        assert!(matches!(
            codec.decode("wild father tree", None, None),
            Err(WalletError::Mnemonic(MnemonicError::InvalidWordCount { count: 3, .. }))
        ));
    }

    #[test]
    fn test_type_from_str() {
        assert_eq!("segwit-2fa".parse::<ElectrumV2Type>().unwrap(), ElectrumV2Type::Segwit2fa);
        assert!("legacy".parse::<ElectrumV2Type>().is_err());
    }
}
