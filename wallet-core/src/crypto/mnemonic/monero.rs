// wallet-core/src/crypto/mnemonic/monero.rs
//
// Monero seed words: three words per little-endian 32-bit chunk from a
// 1626-word list, optionally followed by a CRC32 checksum word.

use super::electrum_v1::{chunk_to_indices, indices_to_chunk};
use super::{candidate_wordlists, check_word_count, index_of, resolve, word_at, Mnemonic, MnemonicScheme};
use crate::crypto::entropy::{Entropy, EntropyScheme};
use crate::crypto::normalize::{nfc, normalize_words};
use crate::crypto::primitives::crc32;
use crate::crypto::wordlist::{Language, Wordlist, WordlistKind, WordlistProvider};
use crate::error::{MnemonicError, WalletResult};
use tracing::debug;
use zeroize::Zeroize;

const WORD_COUNTS: &[usize] = &[12, 13, 24, 25];

/// Characters of each word that are unique within the language's list.
pub const fn unique_prefix_len(language: Language) -> usize {
    match language {
        Language::English | Language::Japanese => 3,
        Language::ChineseSimplified => 1,
        _ => 4,
    }
}

/// Index (into `words`) of the word repeated as checksum.
fn checksum_index(words: &[String], language: Language) -> usize {
    let prefix_len = unique_prefix_len(language);
    let trimmed: String = words
        .iter()
        .flat_map(|w| nfc(w).chars().take(prefix_len).collect::<Vec<_>>())
        .collect();
    crc32(trimmed.as_bytes()) as usize % words.len()
}

#[derive(Clone, Copy)]
pub struct MoneroCodec<'a> {
    provider: &'a dyn WordlistProvider,
}

impl<'a> MoneroCodec<'a> {
    pub fn new(provider: &'a dyn WordlistProvider) -> Self {
        Self { provider }
    }

    /// 12/24 words, or 13/25 with `checksum`.
    ///
    /// # Errors
    /// `InvalidStrength` unless `entropy` is 128 or 256 bits,
    /// `UnknownLanguage` when no Monero list is registered for `language`.
    pub fn encode(&self, entropy: &Entropy, language: Language, checksum: bool) -> WalletResult<Mnemonic> {
        let entropy = entropy.for_scheme(EntropyScheme::Monero)?;
        let list = self
            .provider
            .wordlist(language, WordlistKind::Monero)
            .ok_or(MnemonicError::UnknownLanguage)?;

        let mut words = Vec::with_capacity(entropy.bytes().len() * 3 / 4 + 1);
        for chunk in entropy.bytes().chunks_exact(4) {
            let x = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            for index in chunk_to_indices(x, list.len()) {
                words.push(word_at(&list, index)?);
            }
        }
        if checksum {
            let repeated = words[checksum_index(&words, language)].clone();
            words.push(repeated);
        }

        debug!(language = %language, word_count = words.len(), "Encoded Monero mnemonic");
        Ok(Mnemonic::new(words, language, MnemonicScheme::Monero, None))
    }

    pub fn generate(&self, strength: usize, language: Language, checksum: bool) -> WalletResult<Mnemonic> {
        let entropy = Entropy::generate(EntropyScheme::Monero, strength)?;
        self.encode(&entropy, language, checksum)
    }

    /// Recovers the entropy; a trailing checksum word is verified.
    ///
    /// # Errors
    /// - `InvalidWordCount` unless there are 12, 13, 24 or 25 words.
    /// - `UnknownWord` or `UnknownLanguage` for words outside the lists.
    /// - `ChecksumMismatch` for a wrong checksum word or an impossible
    ///   word triple.
    pub fn decode(&self, text: &str, language: Option<Language>) -> WalletResult<Entropy> {
        self.decode_resolved(text, language).map(|(_, entropy)| entropy)
    }

    /// Validates `text` and returns it in canonical wordlist form.
    pub fn parse(&self, text: &str, language: Option<Language>) -> WalletResult<Mnemonic> {
        let checksum = normalize_words(text).len() % 2 == 1;
        let (language, entropy) = self.decode_resolved(text, language)?;
        self.encode(&entropy, language, checksum)
    }

    #[inline]
    pub fn is_valid(&self, text: &str, language: Option<Language>) -> bool {
        self.decode_resolved(text, language).is_ok()
    }

    fn decode_resolved(&self, text: &str, language: Option<Language>) -> WalletResult<(Language, Entropy)> {
        let words = normalize_words(text);
        check_word_count(words.len(), WORD_COUNTS)?;

        let candidates = candidate_wordlists(self.provider, WordlistKind::Monero, &words, language)?;
        let (list, entropy) = resolve(candidates, |list| decode_words(list, &words))?;
        Ok((list.language(), entropy))
    }
}

fn decode_words(list: &Wordlist, words: &[String]) -> WalletResult<Entropy> {
    let data_len = words.len() / 3 * 3;
    let (data, checksum) = words.split_at(data_len);

    let indices = data
        .iter()
        .map(|w| index_of(list, w))
        .collect::<WalletResult<Vec<_>>>()?;

    if let Some(given) = checksum.first() {
        // Compare by index so accent-folded input still verifies.
        let canonical = indices
            .iter()
            .map(|&i| word_at(list, i))
            .collect::<WalletResult<Vec<_>>>()?;
        let expected = indices[checksum_index(&canonical, list.language())];
        if index_of(list, given)? != expected {
            return Err(MnemonicError::ChecksumMismatch.into());
        }
    }

    let mut bytes = Vec::with_capacity(data_len / 3 * 4);
    for triple in indices.chunks_exact(3) {
        let x = indices_to_chunk([triple[0], triple[1], triple[2]], list.len())
            .ok_or(MnemonicError::ChecksumMismatch)?;
        bytes.extend_from_slice(&x.to_le_bytes());
    }

    let entropy = Entropy::from_bytes(EntropyScheme::Monero, &bytes);
    bytes.zeroize();
    entropy
}
