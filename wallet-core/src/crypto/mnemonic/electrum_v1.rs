// wallet-core/src/crypto/mnemonic/electrum_v1.rs
//
// Electrum "old" (pre-2.0) seeds: 12 words from a 1626-word list, three
// words per big-endian 32-bit chunk of a 128-bit value.

use super::{check_word_count, index_of, word_at, Mnemonic, MnemonicScheme};
use crate::crypto::entropy::{Entropy, EntropyScheme};
use crate::crypto::normalize::normalize_words;
use crate::crypto::wordlist::{Language, Wordlist, WordlistKind, WordlistProvider};
use crate::error::{MnemonicError, WalletResult};
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroize;

const WORD_COUNTS: &[usize] = &[12];

/// Splits a 32-bit chunk into three word indices.
pub(crate) fn chunk_to_indices(x: u32, n: usize) -> [usize; 3] {
    let x = x as usize;
    let w1 = x % n;
    let w2 = (x / n + w1) % n;
    let w3 = (x / n / n + w2) % n;
    [w1, w2, w3]
}

/// Inverse of [`chunk_to_indices`]; `None` when the triple overflows 32 bits.
pub(crate) fn indices_to_chunk(indices: [usize; 3], n: usize) -> Option<u32> {
    let [w1, w2, w3] = indices.map(|w| w as u64);
    let n = n as u64;
    let x = w1 + n * ((w2 + n - w1) % n) + n * n * ((w3 + n - w2) % n);
    u32::try_from(x).ok()
}

#[derive(Clone, Copy)]
pub struct ElectrumV1Codec<'a> {
    provider: &'a dyn WordlistProvider,
}

impl<'a> ElectrumV1Codec<'a> {
    pub fn new(provider: &'a dyn WordlistProvider) -> Self {
        Self { provider }
    }

    fn wordlist(&self) -> WalletResult<Arc<Wordlist>> {
        self.provider
            .wordlist(Language::English, WordlistKind::ElectrumV1)
            .ok_or_else(|| MnemonicError::UnknownLanguage.into())
    }

    /// # Errors
    /// `InvalidStrength` unless `entropy` is 128 bits, `UnknownLanguage`
    /// when no Electrum V1 list is registered.
    pub fn encode(&self, entropy: &Entropy) -> WalletResult<Mnemonic> {
        let entropy = entropy.for_scheme(EntropyScheme::ElectrumV1)?;
        let list = self.wordlist()?;

        let mut words = Vec::with_capacity(WORD_COUNTS[0]);
        for chunk in entropy.bytes().chunks_exact(4) {
            let x = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            for index in chunk_to_indices(x, list.len()) {
                words.push(word_at(&list, index)?);
            }
        }
        debug!(word_count = words.len(), "Encoded Electrum V1 mnemonic");
        Ok(Mnemonic::new(words, Language::English, MnemonicScheme::ElectrumV1, None))
    }

    pub fn generate(&self) -> WalletResult<Mnemonic> {
        let entropy = Entropy::generate(EntropyScheme::ElectrumV1, 128)?;
        self.encode(&entropy)
    }

    /// # Errors
    /// `InvalidWordCount` unless there are 12 words, `UnknownWord` for words
    /// outside the list and `ChecksumMismatch` for a triple that does not
    /// map back to a 32-bit chunk.
    pub fn decode(&self, text: &str) -> WalletResult<Entropy> {
        let words = normalize_words(text);
        check_word_count(words.len(), WORD_COUNTS)?;
        let list = self.wordlist()?;

        let mut bytes = Vec::with_capacity(16);
        for triple in words.chunks_exact(3) {
            let indices = [
                index_of(&list, &triple[0])?,
                index_of(&list, &triple[1])?,
                index_of(&list, &triple[2])?,
            ];
            let x = indices_to_chunk(indices, list.len()).ok_or(MnemonicError::ChecksumMismatch)?;
            bytes.extend_from_slice(&x.to_be_bytes());
        }

        let entropy = Entropy::from_bytes(EntropyScheme::ElectrumV1, &bytes);
        bytes.zeroize();
        entropy
    }

    pub fn parse(&self, text: &str) -> WalletResult<Mnemonic> {
        let entropy = self.decode(text)?;
        self.encode(&entropy)
    }

    /// `false` as well when no Electrum V1 list is registered.
    #[inline]
    pub fn is_valid(&self, text: &str) -> bool {
        self.decode(text).is_ok()
    }
}
