// wallet-core/src/crypto/wordlist.rs
//
// Wordlist Provider - ordered, NFKD-normalized word lists per language and
// scheme. The BIP-39 lists bundled with the `bip39` crate are the built-in
// source; Monero, Electrum V1 and SLIP-39 lists are registered by the caller.

use crate::crypto::normalize::{fold_accents, normalize_word};
use crate::error::{MnemonicError, WalletError, WalletResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::warn;

// =============================================================================
// LANGUAGES
// =============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    English,
    French,
    Italian,
    Spanish,
    Portuguese,
    Czech,
    Korean,
    Japanese,
    ChineseSimplified,
    ChineseTraditional,
    German,
    Dutch,
    Russian,
}

impl Language {
    /// Languages with a bundled BIP-39 list.
    pub const BIP39: [Language; 10] = [
        Language::English,
        Language::French,
        Language::Italian,
        Language::Spanish,
        Language::Portuguese,
        Language::Czech,
        Language::Korean,
        Language::Japanese,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
    ];

    /// Languages Electrum 2.x generates seeds in.
    pub const ELECTRUM_V2: [Language; 4] = [
        Language::English,
        Language::Spanish,
        Language::Portuguese,
        Language::ChineseSimplified,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::French => "french",
            Language::Italian => "italian",
            Language::Spanish => "spanish",
            Language::Portuguese => "portuguese",
            Language::Czech => "czech",
            Language::Korean => "korean",
            Language::Japanese => "japanese",
            Language::ChineseSimplified => "chinese-simplified",
            Language::ChineseTraditional => "chinese-traditional",
            Language::German => "german",
            Language::Dutch => "dutch",
            Language::Russian => "russian",
        }
    }

    /// Word separator when rendering a phrase (Japanese uses U+3000).
    pub const fn separator(self) -> &'static str {
        match self {
            Language::Japanese => "\u{3000}",
            _ => " ",
        }
    }

    fn bip39(self) -> Option<bip39::Language> {
        match self {
            Language::English => Some(bip39::Language::English),
            Language::French => Some(bip39::Language::French),
            Language::Italian => Some(bip39::Language::Italian),
            Language::Spanish => Some(bip39::Language::Spanish),
            Language::Portuguese => Some(bip39::Language::Portuguese),
            Language::Czech => Some(bip39::Language::Czech),
            Language::Korean => Some(bip39::Language::Korean),
            Language::Japanese => Some(bip39::Language::Japanese),
            Language::ChineseSimplified => Some(bip39::Language::SimplifiedChinese),
            Language::ChineseTraditional => Some(bip39::Language::TraditionalChinese),
            Language::German | Language::Dutch | Language::Russian => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Language::BIP39
            .iter()
            .chain([Language::German, Language::Dutch, Language::Russian].iter())
            .find(|language| language.name() == wanted)
            .copied()
            .ok_or_else(|| MnemonicError::UnknownLanguage.into())
    }
}

// =============================================================================
// WORDLIST KINDS
// =============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WordlistKind {
    Bip39,
    ElectrumV1,
    ElectrumV2,
    Monero,
    Slip39,
}

impl WordlistKind {
    /// Fixed list size for the scheme.
    pub const fn expected_len(self) -> usize {
        match self {
            WordlistKind::Bip39 | WordlistKind::ElectrumV2 => 2048,
            WordlistKind::ElectrumV1 | WordlistKind::Monero => 1626,
            WordlistKind::Slip39 => 1024,
        }
    }
}

// =============================================================================
// WORDLIST
// =============================================================================
/// Immutable word list with O(1) lookups in both directions.
///
/// Words are stored NFKD-normalized and lower-cased. Lookups try the exact
/// form first, then an accent-folded form (only when that fold is unique
/// within the list).
#[derive(Debug)]
pub struct Wordlist {
    language: Language,
    words: Vec<String>,
    index: HashMap<String, usize>,
    folded: HashMap<String, Option<usize>>,
}

impl Wordlist {
    /// Builds a list, rejecting a wrong size or duplicate entries.
    pub fn new<I, S>(language: Language, expected_len: usize, words: I) -> WalletResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| normalize_word(w.as_ref().trim()))
            .collect();

        if words.len() != expected_len {
            return Err(MnemonicError::InvalidWordlist(format!(
                "{} list has {} words, expected {}",
                language,
                words.len(),
                expected_len
            ))
            .into());
        }

        let mut index = HashMap::with_capacity(words.len());
        let mut folded: HashMap<String, Option<usize>> = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if word.is_empty() {
                return Err(MnemonicError::InvalidWordlist(format!(
                    "{} list has an empty entry at {}",
                    language, i
                ))
                .into());
            }
            if index.insert(word.clone(), i).is_some() {
                return Err(MnemonicError::InvalidWordlist(format!(
                    "{} list contains '{}' twice",
                    language, word
                ))
                .into());
            }
            folded
                .entry(fold_accents(word))
                .and_modify(|slot| *slot = None)
                .or_insert(Some(i));
        }

        Ok(Self {
            language,
            words,
            index,
            folded,
        })
    }

    #[inline]
    pub fn language(&self) -> Language {
        self.language
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    #[inline]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Index of an already-normalized word.
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.index
            .get(word)
            .copied()
            .or_else(|| self.folded.get(&fold_accents(word)).copied().flatten())
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.index_of(word).is_some()
    }
}

// =============================================================================
// PROVIDER
// =============================================================================
/// Source of word lists for the mnemonic codecs.
pub trait WordlistProvider: Send + Sync {
    fn wordlist(&self, language: Language, kind: WordlistKind) -> Option<Arc<Wordlist>>;

    /// Languages available for `kind`, in detection order.
    fn languages(&self, kind: WordlistKind) -> Vec<Language>;
}

static BUILTIN_BIP39: Lazy<Vec<Arc<Wordlist>>> = Lazy::new(|| {
    Language::BIP39
        .iter()
        .filter_map(|language| {
            let source = language.bip39()?;
            match Wordlist::new(*language, 2048, source.word_list().iter()) {
                Ok(list) => Some(Arc::new(list)),
                Err(e) => {
                    warn!(language = %language, error = %e, "Skipping bundled wordlist");
                    None
                }
            }
        })
        .collect()
});

/// Default provider: a registry of shared lists keyed by language and kind.
#[derive(Debug, Clone)]
pub struct Wordlists {
    lists: BTreeMap<(WordlistKind, Language), Arc<Wordlist>>,
}

impl Wordlists {
    /// Provider with no lists registered.
    pub fn empty() -> Self {
        Self {
            lists: BTreeMap::new(),
        }
    }

    /// Bundled BIP-39 lists for BIP-39 and Electrum V2.
    pub fn builtin() -> Self {
        let mut lists = BTreeMap::new();
        for list in BUILTIN_BIP39.iter() {
            lists.insert((WordlistKind::Bip39, list.language()), Arc::clone(list));
            if Language::ELECTRUM_V2.contains(&list.language()) {
                lists.insert((WordlistKind::ElectrumV2, list.language()), Arc::clone(list));
            }
        }
        Self { lists }
    }

    /// Registers (or replaces) a list after validating size and uniqueness.
    pub fn with_words<I, S>(mut self, language: Language, kind: WordlistKind, words: I) -> WalletResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = Wordlist::new(language, kind.expected_len(), words)?;
        self.lists.insert((kind, language), Arc::new(list));
        Ok(self)
    }
}

impl Default for Wordlists {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordlistProvider for Wordlists {
    fn wordlist(&self, language: Language, kind: WordlistKind) -> Option<Arc<Wordlist>> {
        self.lists.get(&(kind, language)).cloned()
    }

    fn languages(&self, kind: WordlistKind) -> Vec<Language> {
        self.lists
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, language)| *language)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Deterministic word list whose first three letters are unique.
    pub fn synthetic_words(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let a = (b'a' + (i / 676) as u8) as char;
                let b = (b'a' + ((i / 26) % 26) as u8) as char;
                let c = (b'a' + (i % 26) as u8) as char;
                format!("{}{}{}um", a, b, c)
            })
            .collect()
    }
}
