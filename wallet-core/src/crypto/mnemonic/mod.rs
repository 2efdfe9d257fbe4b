// wallet-core/src/crypto/mnemonic/mod.rs
//
// Mnemonic Codec - entropy <-> word sequence per scheme.

pub mod bip39;
pub mod electrum_v1;
pub mod electrum_v2;
pub mod monero;
pub mod slip39;

pub use self::bip39::{Bip39Codec, WordCount};
pub use electrum_v1::ElectrumV1Codec;
pub use electrum_v2::{ElectrumV2Codec, ElectrumV2Type};
pub use monero::MoneroCodec;
pub use slip39::{GroupSpec, Slip39Codec};

use crate::config::CodecConfig;
use crate::crypto::entropy::{Entropy, EntropyScheme};
use crate::crypto::wordlist::{Language, Wordlist, WordlistKind, WordlistProvider};
use crate::error::{MnemonicError, WalletResult};
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

// =============================================================================
// SCHEMES
// =============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MnemonicScheme {
    Bip39,
    ElectrumV1,
    ElectrumV2,
    Monero,
    Slip39,
}

impl MnemonicScheme {
    pub const fn name(self) -> &'static str {
        self.entropy_scheme().name()
    }

    pub const fn entropy_scheme(self) -> EntropyScheme {
        match self {
            MnemonicScheme::Bip39 => EntropyScheme::Bip39,
            MnemonicScheme::ElectrumV1 => EntropyScheme::ElectrumV1,
            MnemonicScheme::ElectrumV2 => EntropyScheme::ElectrumV2,
            MnemonicScheme::Monero => EntropyScheme::Monero,
            MnemonicScheme::Slip39 => EntropyScheme::Slip39,
        }
    }

    pub const fn wordlist_kind(self) -> WordlistKind {
        match self {
            MnemonicScheme::Bip39 => WordlistKind::Bip39,
            MnemonicScheme::ElectrumV1 => WordlistKind::ElectrumV1,
            MnemonicScheme::ElectrumV2 => WordlistKind::ElectrumV2,
            MnemonicScheme::Monero => WordlistKind::Monero,
            MnemonicScheme::Slip39 => WordlistKind::Slip39,
        }
    }
}

/// Fresh mnemonic of `scheme` in the configured default language.
///
/// Electrum V2 mnemonics are standard-typed, Monero ones carry the checksum
/// word and SLIP-39 shares use an empty passphrase; the per-scheme codecs
/// expose the other variants.
pub fn generate(
    provider: &dyn WordlistProvider,
    config: &CodecConfig,
    scheme: MnemonicScheme,
    strength: usize,
) -> WalletResult<Mnemonic> {
    let language = config.default_language;
    let entropy = Entropy::generate(scheme.entropy_scheme(), strength)?;
    match scheme {
        MnemonicScheme::Bip39 => Bip39Codec::new(provider).encode(&entropy, language),
        MnemonicScheme::ElectrumV1 => ElectrumV1Codec::new(provider).encode(&entropy),
        MnemonicScheme::ElectrumV2 => {
            ElectrumV2Codec::from_config(provider, config).encode(&entropy, language, ElectrumV2Type::Standard)
        }
        MnemonicScheme::Monero => MoneroCodec::new(provider).encode(&entropy, language, true),
        MnemonicScheme::Slip39 => Slip39Codec::from_config(provider, config).encode(&entropy, ""),
    }
}

/// Whether `text` is a valid mnemonic of `scheme`. `language` is ignored by
/// the English-only schemes.
pub fn is_valid(
    provider: &dyn WordlistProvider,
    scheme: MnemonicScheme,
    text: &str,
    language: Option<Language>,
) -> bool {
    match scheme {
        MnemonicScheme::Bip39 => Bip39Codec::new(provider).is_valid(text, language),
        MnemonicScheme::ElectrumV1 => ElectrumV1Codec::new(provider).is_valid(text),
        MnemonicScheme::ElectrumV2 => ElectrumV2Codec::new(provider).is_valid(text, language, None),
        MnemonicScheme::Monero => MoneroCodec::new(provider).is_valid(text, language),
        MnemonicScheme::Slip39 => Slip39Codec::new(provider).is_valid(text),
    }
}

// =============================================================================
// MNEMONIC VALUE
// =============================================================================
/// Validated word sequence.
///
/// Only the codecs construct it, so a `Mnemonic` always carries a word count
/// and checksum that verify for its scheme. Words are the wordlist's own
/// NFKD form, wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic {
    words: Vec<String>,
    #[zeroize(skip)]
    language: Language,
    #[zeroize(skip)]
    scheme: MnemonicScheme,
    #[zeroize(skip)]
    mnemonic_type: Option<ElectrumV2Type>,
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mnemonic")
            .field("scheme", &self.scheme)
            .field("language", &self.language)
            .field("word_count", &self.words.len())
            .field("mnemonic_type", &self.mnemonic_type)
            .field("words", &"[REDACTED]")
            .finish()
    }
}

impl Mnemonic {
    pub(crate) fn new(
        words: Vec<String>,
        language: Language,
        scheme: MnemonicScheme,
        mnemonic_type: Option<ElectrumV2Type>,
    ) -> Self {
        Self {
            words,
            language,
            scheme,
            mnemonic_type,
        }
    }

    /// Words joined by the language separator.
    ///
    /// # Warning
    /// The phrase is secret material; do not log it.
    pub fn phrase(&self) -> String {
        self.words.join(self.language.separator())
    }

    #[inline]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn language(&self) -> Language {
        self.language
    }

    #[inline]
    pub fn scheme(&self) -> MnemonicScheme {
        self.scheme
    }

    /// Electrum V2 type tag; `None` for other schemes.
    #[inline]
    pub fn mnemonic_type(&self) -> Option<ElectrumV2Type> {
        self.mnemonic_type
    }
}

// =============================================================================
// LANGUAGE RESOLUTION
// =============================================================================

/// Lists that contain every word.
///
/// A declared language is taken as-is and must contain all words
/// (`UnknownWord` otherwise); without one, every provider language is a
/// candidate and an empty result is `UnknownLanguage`.
pub(crate) fn candidate_wordlists(
    provider: &dyn WordlistProvider,
    kind: WordlistKind,
    words: &[String],
    declared: Option<Language>,
) -> WalletResult<Vec<Arc<Wordlist>>> {
    if let Some(language) = declared {
        let list = provider
            .wordlist(language, kind)
            .ok_or(MnemonicError::UnknownLanguage)?;
        if let Some(missing) = words.iter().find(|w| !list.contains(w)) {
            return Err(MnemonicError::UnknownWord(missing.clone()).into());
        }
        return Ok(vec![list]);
    }

    let candidates: Vec<_> = provider
        .languages(kind)
        .into_iter()
        .filter_map(|language| provider.wordlist(language, kind))
        .filter(|list| words.iter().all(|w| list.contains(w)))
        .collect();

    if candidates.is_empty() {
        return Err(MnemonicError::UnknownLanguage.into());
    }
    Ok(candidates)
}

/// Runs `decode` against each candidate list.
///
/// The first successful list wins as long as every other successful list
/// decodes to the same value; disagreement is `AmbiguousLanguage`. When no
/// list decodes, the first error is returned.
pub(crate) fn resolve<T, F>(candidates: Vec<Arc<Wordlist>>, mut decode: F) -> WalletResult<(Arc<Wordlist>, T)>
where
    T: PartialEq,
    F: FnMut(&Wordlist) -> WalletResult<T>,
{
    let mut chosen: Option<(Arc<Wordlist>, T)> = None;
    let mut first_error = None;
    let mut conflicting = Vec::new();

    for list in candidates {
        match decode(&list) {
            Ok(value) => match chosen.as_ref().map(|(_, current)| *current != value) {
                None => chosen = Some((list, value)),
                Some(true) => conflicting.push(list.language().to_string()),
                Some(false) => {}
            },
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match chosen {
        Some((list, _)) if !conflicting.is_empty() => {
            let mut languages = vec![list.language().to_string()];
            languages.extend(conflicting);
            Err(MnemonicError::AmbiguousLanguage(languages).into())
        }
        Some(found) => Ok(found),
        None => Err(first_error.unwrap_or_else(|| MnemonicError::UnknownLanguage.into())),
    }
}

/// Index -> word through `list`; indices always come from arithmetic
/// bounded by the list size.
pub(crate) fn word_at(list: &Wordlist, index: usize) -> WalletResult<String> {
    list.word(index)
        .map(str::to_owned)
        .ok_or_else(|| MnemonicError::InvalidWordlist(format!("no word at index {}", index)).into())
}

/// Word -> index through `list`.
pub(crate) fn index_of(list: &Wordlist, word: &str) -> WalletResult<usize> {
    list.index_of(word)
        .ok_or_else(|| MnemonicError::UnknownWord(word.to_owned()).into())
}

pub(crate) fn check_word_count(count: usize, allowed: &'static [usize]) -> WalletResult<()> {
    if allowed.contains(&count) {
        Ok(())
    } else {
        Err(MnemonicError::InvalidWordCount { count, allowed }.into())
    }
}
