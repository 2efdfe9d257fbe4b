// wallet-core/src/crypto/normalize.rs
//
// Unicode normalization policy.
//
// - Comparison / index lookup: NFKD + lower-case, split on Unicode whitespace.
// - BIP-39 seed input: NFKD of the space-joined mnemonic and of
//   "mnemonic" + passphrase.
// - Electrum (V2 seed version + seed input): NFKD, lower-case, combining marks
//   dropped, whitespace collapsed, whitespace between CJK characters removed.
//
// NFKD is the only decomposition used anywhere in the crate. The Monero
// checksum recomposes to NFC before taking word prefixes.

use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

/// NFKD (compatibility decomposition).
#[inline]
pub fn nfkd(text: &str) -> String {
    text.nfkd().collect()
}

/// NFC (canonical composition). Only used where an external format counts
/// characters of composed text (Monero checksum prefixes).
#[inline]
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

/// NFKD + lower-case of a single word.
pub fn normalize_word(word: &str) -> String {
    nfkd(&word.to_lowercase())
}

/// Splits user input into NFKD, lower-cased words.
///
/// Fullwidth letters, ligatures and the ideographic space (U+3000) all fold
/// to their ASCII-compatible forms before splitting.
pub fn normalize_words(text: &str) -> Vec<String> {
    nfkd(text)
        .to_lowercase()
        .split_whitespace()
        .map(nfkd)
        .collect()
}

/// Drops every character with a non-zero canonical combining class.
/// Expects NFKD input (accents already decomposed).
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

/// Electrum's `normalize_text`.
pub fn electrum_normalize(text: &str) -> String {
    let decomposed = nfkd(text).to_lowercase();
    let stripped = fold_accents(&nfkd(&decomposed));
    let collapsed: Vec<char> = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .collect();

    collapsed
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            if !c.is_whitespace() || *i == 0 || *i + 1 == collapsed.len() {
                return true;
            }
            !(is_cjk(collapsed[i - 1]) && is_cjk(collapsed[i + 1]))
        })
        .map(|(_, c)| *c)
        .collect()
}

// Electrum's CJK_INTERVALS
const CJK_INTERVALS: &[(u32, u32)] = &[
    (0x4E00, 0x9FFF),
    (0x3400, 0x4DBF),
    (0x20000, 0x2A6DF),
    (0x2A700, 0x2B73F),
    (0x2B740, 0x2B81F),
    (0xF900, 0xFAFF),
    (0x2F800, 0x2FA1D),
    (0x3190, 0x319F),
    (0x2E80, 0x2EFF),
    (0x2F00, 0x2FDF),
    (0x31C0, 0x31EF),
    (0x2FF0, 0x2FFF),
    (0xE0100, 0xE01EF),
    (0x3100, 0x312F),
    (0x31A0, 0x31BF),
    (0xFF00, 0xFFEF),
    (0x3040, 0x309F),
    (0x30A0, 0x30FF),
    (0x31F0, 0x31FF),
    (0x1B000, 0x1B0FF),
    (0xAC00, 0xD7AF),
    (0x1100, 0x11FF),
    (0xA960, 0xA97F),
    (0xD7B0, 0xD7FF),
    (0x3130, 0x318F),
    (0xA4D0, 0xA4FF),
    (0x16F00, 0x16F9F),
    (0xA000, 0xA48F),
    (0xA490, 0xA4CF),
];

pub fn is_cjk(c: char) -> bool {
    let code = c as u32;
    CJK_INTERVALS
        .iter()
        .any(|(start, end)| (*start..=*end).contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullwidth_and_case_fold() {
        // Fullwidth "ＡＢＡＮＤＯＮ" folds to "abandon" under NFKD
        assert_eq!(
            normalize_words("ＡＢＡＮＤＯＮ  About"),
            vec!["abandon".to_string(), "about".to_string()]
        );
    }

    #[test]
    fn test_ideographic_space_splits() {
        assert_eq!(normalize_words("あいこくしん\u{3000}あいさつ").len(), 2);
    }

    #[test]
    fn test_nfkd_decomposes_accents() {
        let word = normalize_word("ábaco");
        assert_eq!(word.chars().count(), 6);
        assert_eq!(fold_accents(&word), "abaco");
    }

    #[test]
    fn test_electrum_normalize() {
        assert_eq!(electrum_normalize("  Wild   FATHER\ttree "), "wild father tree");
        assert_eq!(electrum_normalize("Ábaco"), "abaco");
        // Spaces between CJK characters vanish
        assert_eq!(electrum_normalize("的 一 是"), "的一是");
        assert_eq!(electrum_normalize("的 abc"), "的 abc");
    }

    #[test]
    fn test_is_cjk() {
        assert!(is_cjk('的'));
        assert!(is_cjk('あ'));
        assert!(!is_cjk('a'));
    }
}
