// wallet-core/src/crypto/mnemonic/bip39.rs
//
// BIP-39 mnemonic codec
// Entropy + SHA-256 checksum bits, split into 11-bit word indices.

use super::{candidate_wordlists, check_word_count, index_of, resolve, word_at, Mnemonic, MnemonicScheme};
use crate::crypto::entropy::{Entropy, EntropyScheme};
use crate::crypto::normalize::normalize_words;
use crate::crypto::primitives::sha256;
use crate::crypto::wordlist::{Language, Wordlist, WordlistKind, WordlistProvider};
use crate::error::{MnemonicError, WalletResult};
use tracing::debug;
use zeroize::Zeroize;

const BITS_PER_WORD: usize = 11;

/// Supported word counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    /// 12 words (128-bit entropy)
    Twelve = 12,
    /// 15 words (160-bit entropy)
    Fifteen = 15,
    /// 18 words (192-bit entropy)
    Eighteen = 18,
    /// 21 words (224-bit entropy)
    TwentyOne = 21,
    /// 24 words (256-bit entropy)
    TwentyFour = 24,
}

impl WordCount {
    pub const ALLOWED: &'static [usize] = &[12, 15, 18, 21, 24];

    #[inline]
    pub const fn entropy_bytes(self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::Fifteen => 20,
            WordCount::Eighteen => 24,
            WordCount::TwentyOne => 28,
            WordCount::TwentyFour => 32,
        }
    }

    #[inline]
    pub const fn strength(self) -> usize {
        self.entropy_bytes() * 8
    }
}

impl TryFrom<usize> for WordCount {
    type Error = crate::error::WalletError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        match count {
            12 => Ok(WordCount::Twelve),
            15 => Ok(WordCount::Fifteen),
            18 => Ok(WordCount::Eighteen),
            21 => Ok(WordCount::TwentyOne),
            24 => Ok(WordCount::TwentyFour),
            _ => Err(MnemonicError::InvalidWordCount {
                count,
                allowed: Self::ALLOWED,
            }
            .into()),
        }
    }
}

/// BIP-39 encoder/decoder over a wordlist provider.
#[derive(Clone, Copy)]
pub struct Bip39Codec<'a> {
    provider: &'a dyn WordlistProvider,
}

impl<'a> Bip39Codec<'a> {
    pub fn new(provider: &'a dyn WordlistProvider) -> Self {
        Self { provider }
    }

    // =========================================================================
    // ENCODING
    // =========================================================================

    /// Encodes entropy whose bit strength is a BIP-39 strength.
    ///
    /// # Errors
    /// `InvalidStrength` for other strengths, `UnknownLanguage` when the
    /// provider has no BIP-39 list for `language`.
    pub fn encode(&self, entropy: &Entropy, language: Language) -> WalletResult<Mnemonic> {
        let entropy = entropy.for_scheme(EntropyScheme::Bip39)?;
        let list = self
            .provider
            .wordlist(language, WordlistKind::Bip39)
            .ok_or(MnemonicError::UnknownLanguage)?;

        let words = encode_words(&list, entropy.bytes())?;
        debug!(language = %language, word_count = words.len(), "Encoded BIP39 mnemonic");
        Ok(Mnemonic::new(words, language, MnemonicScheme::Bip39, None))
    }

    /// Fresh mnemonic from OS randomness.
    pub fn generate(&self, word_count: WordCount, language: Language) -> WalletResult<Mnemonic> {
        let entropy = Entropy::generate(EntropyScheme::Bip39, word_count.strength())?;
        self.encode(&entropy, language)
    }

    // =========================================================================
    // DECODING
    // =========================================================================

    /// Recovers the entropy, verifying word count, words and checksum.
    ///
    /// # Errors
    /// - `InvalidWordCount` unless there are 12, 15, 18, 21 or 24 words.
    /// - `UnknownWord` for a word missing from the declared language.
    /// - `UnknownLanguage` when no list holds every word.
    /// - `ChecksumMismatch` when the checksum bits disagree.
    /// - `AmbiguousLanguage` when several lists decode to different entropy.
    pub fn decode(&self, text: &str, language: Option<Language>) -> WalletResult<Entropy> {
        self.decode_resolved(text, language).map(|(_, entropy)| entropy)
    }

    /// Validates `text` and returns it in canonical wordlist form.
    ///
    /// # Errors
    /// As [`Self::decode`].
    pub fn parse(&self, text: &str, language: Option<Language>) -> WalletResult<Mnemonic> {
        let (language, entropy) = self.decode_resolved(text, language)?;
        self.encode(&entropy, language)
    }

    #[inline]
    pub fn is_valid(&self, text: &str, language: Option<Language>) -> bool {
        self.decode_resolved(text, language).is_ok()
    }

    /// Language whose list decodes `text` with a valid checksum.
    pub fn detect_language(&self, text: &str) -> WalletResult<Language> {
        self.decode_resolved(text, None).map(|(language, _)| language)
    }

    fn decode_resolved(&self, text: &str, language: Option<Language>) -> WalletResult<(Language, Entropy)> {
        let words = normalize_words(text);
        check_word_count(words.len(), WordCount::ALLOWED)?;

        let candidates = candidate_wordlists(self.provider, WordlistKind::Bip39, &words, language)?;
        let (list, entropy) = resolve(candidates, |list| decode_words(list, &words))?;
        Ok((list.language(), entropy))
    }
}

fn encode_words(list: &Wordlist, entropy: &[u8]) -> WalletResult<Vec<String>> {
    let checksum = sha256(entropy);
    let entropy_bits = entropy.len() * 8;
    let total_bits = entropy_bits + entropy_bits / 32;

    let bit = |i: usize| -> usize {
        if i < entropy_bits {
            ((entropy[i / 8] >> (7 - i % 8)) & 1) as usize
        } else {
            let j = i - entropy_bits;
            ((checksum[j / 8] >> (7 - j % 8)) & 1) as usize
        }
    };

    (0..total_bits / BITS_PER_WORD)
        .map(|w| {
            let index = (0..BITS_PER_WORD).fold(0usize, |acc, b| (acc << 1) | bit(w * BITS_PER_WORD + b));
            word_at(list, index)
        })
        .collect()
}

fn decode_words(list: &Wordlist, words: &[String]) -> WalletResult<Entropy> {
    let mut bits = Vec::with_capacity(words.len() * BITS_PER_WORD);
    for word in words {
        let index = index_of(list, word)?;
        for b in (0..BITS_PER_WORD).rev() {
            bits.push(((index >> b) & 1) as u8);
        }
    }

    let entropy_bits = bits.len() * 32 / 33;
    let mut entropy = vec![0u8; entropy_bits / 8];
    for (i, bit) in bits[..entropy_bits].iter().enumerate() {
        entropy[i / 8] |= bit << (7 - i % 8);
    }

    let checksum = sha256(&entropy);
    let matches = bits[entropy_bits..]
        .iter()
        .enumerate()
        .all(|(j, bit)| (checksum[j / 8] >> (7 - j % 8)) & 1 == *bit);
    bits.zeroize();

    let result = if matches {
        Entropy::from_bytes(EntropyScheme::Bip39, &entropy)
    } else {
        Err(MnemonicError::ChecksumMismatch.into())
    };
    entropy.zeroize();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::wordlist::Wordlists;
    use crate::error::{EntropyError, WalletError};

    // Standard test mnemonic (from BIP-39 test vectors)
    const TEST_MNEMONIC_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const TEST_MNEMONIC_24: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    fn entropy(hex_str: &str) -> Entropy {
        Entropy::from_hex(EntropyScheme::Bip39, hex_str).unwrap()
    }

    #[test]
    fn test_encode_vectors() {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);

        let cases = [
            ("00000000000000000000000000000000", TEST_MNEMONIC_12),
            (
                "7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f",
                "legal winner thank year wave sausage worth useful legal winner thank yellow",
            ),
            (
                "80808080808080808080808080808080",
                "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
            ),
            (
                "ffffffffffffffffffffffffffffffff",
                "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
            ),
            (
                "0000000000000000000000000000000000000000000000000000000000000000",
                TEST_MNEMONIC_24,
            ),
        ];

        for (hex_entropy, phrase) in cases {
            let mnemonic = codec.encode(&entropy(hex_entropy), Language::English).unwrap();
            assert_eq!(mnemonic.phrase(), phrase);
            assert_eq!(codec.decode(phrase, None).unwrap().to_hex(), hex_entropy);
        }
    }

    #[test]
    fn test_matches_bip39_crate() {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);

        for count in [WordCount::Twelve, WordCount::Eighteen, WordCount::TwentyFour] {
            let generated = codec.generate(count, Language::English).unwrap();
            let entropy = codec.decode(&generated.phrase(), None).unwrap();
            let reference = ::bip39::Mnemonic::from_entropy(entropy.bytes()).unwrap();
            assert_eq!(reference.to_string(), generated.phrase());
        }
    }

    #[test]
    fn test_other_languages() {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let e = entropy("00000000000000000000000000000000");

        for language in [Language::French, Language::Spanish, Language::Japanese, Language::Korean] {
            let mnemonic = codec.encode(&e, language).unwrap();
            assert_eq!(mnemonic.language(), language);
            assert_eq!(codec.decode(&mnemonic.phrase(), Some(language)).unwrap(), e);
        }

        let japanese = codec.encode(&e, Language::Japanese).unwrap();
        assert!(japanese.phrase().contains('\u{3000}'));
        assert_eq!(codec.detect_language(&japanese.phrase()).unwrap(), Language::Japanese);
    }

    #[test]
    fn test_messy_input_parses_to_canonical_form() {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let messy = "  ABANDON abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon About  ";
        let mnemonic = codec.parse(messy, None).unwrap();
        assert_eq!(mnemonic.phrase(), TEST_MNEMONIC_12);
        assert_eq!(mnemonic.word_count(), 12);
    }

    #[test]
    fn test_invalid_word_count() {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let result = codec.decode("abandon abandon abandon", None);
        assert_eq!(
            result.unwrap_err(),
            WalletError::Mnemonic(MnemonicError::InvalidWordCount {
                count: 3,
                allowed: WordCount::ALLOWED,
            })
        );
    }

    #[test]
    fn test_checksum_mismatch() {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert_eq!(
            codec.decode(bad, Some(Language::English)).unwrap_err(),
            WalletError::Mnemonic(MnemonicError::ChecksumMismatch)
        );
        assert!(!codec.is_valid(bad, None));
    }

    #[test]
    fn test_unknown_word_with_declared_language() {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let invalid = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon invalid";
        assert_eq!(
            codec.decode(invalid, Some(Language::English)).unwrap_err(),
            WalletError::Mnemonic(MnemonicError::UnknownWord("invalid".to_string()))
        );
        assert_eq!(
            codec.decode(invalid, None).unwrap_err(),
            WalletError::Mnemonic(MnemonicError::UnknownLanguage)
        );
    }

    #[test]
    fn test_encode_rejects_non_bip39_strength() {
        let lists = Wordlists::builtin();
        let codec = Bip39Codec::new(&lists);
        let slip39 = Entropy::from_bytes(EntropyScheme::Slip39, [7u8; 64]).unwrap();
        assert!(matches!(
            codec.encode(&slip39, Language::English),
            Err(WalletError::Entropy(EntropyError::InvalidStrength { .. }))
        ));
    }

    #[test]
    fn test_word_count_conversion() {
        assert_eq!(WordCount::try_from(21).unwrap(), WordCount::TwentyOne);
        assert_eq!(WordCount::TwentyOne.strength(), 224);
        assert!(WordCount::try_from(13).is_err());
    }
}
