// wallet-core/src/crypto/mnemonic/slip39.rs
//
// SLIP-0039 Shamir share mnemonics.
//
// Share layout, 10 bits per word:
//   id (15) | ext (1) | e (4) | group idx (4) | group thr-1 (4) | group cnt-1 (4)
//   | member idx (4) | member thr-1 (4) | padded value | RS1024 checksum (30)
//
// The master secret is encrypted once, split across groups, and every group
// secret is split again across its members. A share set is written one share
// per line; a lone 1-of-1 share is a complete set.

use super::{candidate_wordlists, check_word_count, index_of, resolve, word_at, Mnemonic, MnemonicScheme};
use crate::config::CodecConfig;
use crate::crypto::entropy::{Entropy, EntropyScheme};
use crate::crypto::normalize::normalize_words;
use crate::crypto::primitives::{pbkdf2_hmac_sha256, secure_random_u16};
use crate::crypto::shamir::{self, Point};
use crate::crypto::wordlist::{Language, Wordlist, WordlistKind, WordlistProvider};
use crate::error::{MnemonicError, WalletError, WalletResult};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

const RADIX_BITS: usize = 10;
const ID_BITS: u32 = 15;
const ID_MASK: u16 = (1 << ID_BITS) - 1;
const ITERATION_EXP_BITS: u32 = 4;
const CHECKSUM_WORDS: usize = 3;
/// id/ext/e (2 words) + share parameters (2 words) + checksum (3 words)
const METADATA_WORDS: usize = 7;
const WORD_COUNTS: &[usize] = &[20, 33, 59];

const BASE_ITERATION_COUNT: u32 = 10_000;
const ROUND_COUNT: u8 = 4;
const MAX_ITERATION_EXPONENT: u8 = 15;
const MAX_SHARE_COUNT: u8 = 16;

const CUSTOMIZATION: &[u8] = b"shamir";
const CUSTOMIZATION_EXTENDABLE: &[u8] = b"shamir_extendable";

// =============================================================================
// RS1024 CHECKSUM
// =============================================================================
const GEN: [u32; 10] = [
    0x00E0_E040,
    0x01C1_C080,
    0x0383_8100,
    0x0707_0200,
    0x0E0E_0009,
    0x1C0C_2412,
    0x3808_6C24,
    0x3090_FC48,
    0x21B1_F890,
    0x03F3_F120,
];

fn polymod(values: impl IntoIterator<Item = u32>) -> u32 {
    let mut chk = 1u32;
    for v in values {
        let b = chk >> 20;
        chk = ((chk & 0x000F_FFFF) << 10) ^ v;
        for (i, g) in GEN.iter().enumerate() {
            if (b >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn customization(extendable: bool) -> &'static [u8] {
    if extendable {
        CUSTOMIZATION_EXTENDABLE
    } else {
        CUSTOMIZATION
    }
}

fn create_checksum(data: &[u16], extendable: bool) -> [u16; CHECKSUM_WORDS] {
    let values = customization(extendable)
        .iter()
        .map(|&b| u32::from(b))
        .chain(data.iter().map(|&w| u32::from(w)))
        .chain([0, 0, 0]);
    let chk = polymod(values) ^ 1;
    [
        ((chk >> 20) & 0x3FF) as u16,
        ((chk >> 10) & 0x3FF) as u16,
        (chk & 0x3FF) as u16,
    ]
}

fn verify_checksum(data: &[u16], extendable: bool) -> bool {
    let values = customization(extendable)
        .iter()
        .map(|&b| u32::from(b))
        .chain(data.iter().map(|&w| u32::from(w)));
    polymod(values) == 1
}

// =============================================================================
// FEISTEL CIPHER
// =============================================================================

fn salt(identifier: u16, extendable: bool) -> Vec<u8> {
    if extendable {
        Vec::new()
    } else {
        let mut salt = CUSTOMIZATION.to_vec();
        salt.extend_from_slice(&identifier.to_be_bytes());
        salt
    }
}

fn round_function(round: u8, passphrase: &[u8], exponent: u8, salt: &[u8], r: &[u8]) -> Vec<u8> {
    let mut password = Vec::with_capacity(passphrase.len() + 1);
    password.push(round);
    password.extend_from_slice(passphrase);
    let mut round_salt = salt.to_vec();
    round_salt.extend_from_slice(r);

    let iterations = (BASE_ITERATION_COUNT << exponent) / u32::from(ROUND_COUNT);
    let out = pbkdf2_hmac_sha256(&password, &round_salt, iterations, r.len());
    password.zeroize();
    round_salt.zeroize();
    out
}

fn feistel(input: &[u8], passphrase: &[u8], params: &ShareParams, rounds: impl Iterator<Item = u8>) -> Vec<u8> {
    let half = input.len() / 2;
    let mut l = input[..half].to_vec();
    let mut r = input[half..].to_vec();
    let salt = salt(params.identifier, params.extendable);

    for round in rounds {
        let f = round_function(round, passphrase, params.iteration_exponent, &salt, &r);
        let next_r: Vec<u8> = l.iter().zip(f.iter()).map(|(a, b)| a ^ b).collect();
        l.zeroize();
        l = std::mem::replace(&mut r, next_r);
    }

    let mut out = r;
    out.extend_from_slice(&l);
    l.zeroize();
    out
}

fn encrypt(secret: &[u8], passphrase: &[u8], params: &ShareParams) -> Vec<u8> {
    feistel(secret, passphrase, params, 0..ROUND_COUNT)
}

fn decrypt(encrypted: &[u8], passphrase: &[u8], params: &ShareParams) -> Vec<u8> {
    feistel(encrypted, passphrase, params, (0..ROUND_COUNT).rev())
}

fn check_passphrase(passphrase: &str) -> WalletResult<&[u8]> {
    if passphrase.bytes().all(|b| (32..=126).contains(&b)) {
        Ok(passphrase.as_bytes())
    } else {
        Err(MnemonicError::InvalidPassphrase.into())
    }
}

// =============================================================================
// WORD PACKING
// =============================================================================

/// Big-endian bytes -> `count` 10-bit words, zero padding on the left.
fn bytes_to_words(bytes: &[u8], count: usize) -> Vec<u16> {
    let padding = count * RADIX_BITS - bytes.len() * 8;
    let bit = |i: usize| -> u16 {
        if i < padding {
            0
        } else {
            let j = i - padding;
            u16::from((bytes[j / 8] >> (7 - j % 8)) & 1)
        }
    };
    (0..count)
        .map(|w| (0..RADIX_BITS).fold(0u16, |acc, b| (acc << 1) | bit(w * RADIX_BITS + b)))
        .collect()
}

/// Inverse of [`bytes_to_words`]; padding must be at most 8 bits and zero.
fn words_to_bytes(words: &[u16]) -> WalletResult<Vec<u8>> {
    let total = words.len() * RADIX_BITS;
    let padding = total % 16;
    if padding > 8 {
        return Err(MnemonicError::InvalidWordCount {
            count: words.len() + METADATA_WORDS,
            allowed: WORD_COUNTS,
        }
        .into());
    }

    let bit = |i: usize| -> u8 { ((words[i / RADIX_BITS] >> (RADIX_BITS - 1 - i % RADIX_BITS)) & 1) as u8 };
    if (0..padding).any(|i| bit(i) != 0) {
        return Err(MnemonicError::ChecksumMismatch.into());
    }

    let mut bytes = vec![0u8; (total - padding) / 8];
    for i in 0..bytes.len() * 8 {
        bytes[i / 8] |= bit(padding + i) << (7 - i % 8);
    }
    Ok(bytes)
}

// =============================================================================
// SHARE
// =============================================================================
/// `threshold`-of-`count` member shares within one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupSpec {
    threshold: u8,
    count: u8,
}

impl GroupSpec {
    /// One group holding a single share.
    pub const SINGLE: GroupSpec = GroupSpec { threshold: 1, count: 1 };

    /// `InvalidGroupSpec` unless `1 <= threshold <= count <= 16`. A threshold
    /// of 1 only allows a count of 1.
    pub fn new(threshold: u8, count: u8) -> WalletResult<Self> {
        if threshold == 0 || threshold > count || count > MAX_SHARE_COUNT {
            return Err(invalid_spec(format!(
                "{}-of-{} needs 1 <= threshold <= count <= {}",
                threshold, count, MAX_SHARE_COUNT
            )));
        }
        if threshold == 1 && count > 1 {
            return Err(invalid_spec(format!("1-of-{} groups are not allowed, use 1-of-1", count)));
        }
        Ok(Self { threshold, count })
    }

    #[inline]
    pub const fn threshold(&self) -> u8 {
        self.threshold
    }

    #[inline]
    pub const fn count(&self) -> u8 {
        self.count
    }
}

impl std::str::FromStr for GroupSpec {
    type Err = WalletError;

    /// Accepts `2/3`, `2-of-3` and `2of3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (threshold, count) = text
            .split_once('/')
            .or_else(|| text.split_once("-of-"))
            .or_else(|| text.split_once("of"))
            .ok_or_else(|| invalid_spec(format!("'{}' is not of the form M/N", s)))?;
        let number = |part: &str| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| invalid_spec(format!("'{}' is not of the form M/N", s)))
        };
        Self::new(number(threshold)?, number(count)?)
    }
}

impl std::fmt::Display for GroupSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.threshold, self.count)
    }
}

/// Parameters shared by every share of one master secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShareParams {
    identifier: u16,
    extendable: bool,
    iteration_exponent: u8,
    group_threshold: u8,
    group_count: u8,
}

/// Parsed, checksum-verified share; `value` is a point of a group polynomial.
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
struct Share {
    #[zeroize(skip)]
    params: ShareParams,
    #[zeroize(skip)]
    group_index: u8,
    #[zeroize(skip)]
    member_index: u8,
    #[zeroize(skip)]
    member_threshold: u8,
    value: Vec<u8>,
}

impl Share {
    /// Word indices, checksum included.
    fn to_indices(&self) -> Vec<u16> {
        let p = &self.params;
        let header = (u32::from(p.identifier) << (ITERATION_EXP_BITS + 1))
            | (u32::from(p.extendable) << ITERATION_EXP_BITS)
            | u32::from(p.iteration_exponent);
        let layout = (u32::from(self.group_index) << 16)
            | (u32::from(p.group_threshold - 1) << 12)
            | (u32::from(p.group_count - 1) << 8)
            | (u32::from(self.member_index) << 4)
            | u32::from(self.member_threshold - 1);

        let mut data = vec![
            (header >> 10) as u16,
            (header & 0x3FF) as u16,
            (layout >> 10) as u16,
            (layout & 0x3FF) as u16,
        ];
        data.extend(bytes_to_words(&self.value, (self.value.len() * 8).div_ceil(RADIX_BITS)));
        let checksum = create_checksum(&data, p.extendable);
        data.extend_from_slice(&checksum);
        data
    }

    fn to_mnemonic(&self, list: &Wordlist) -> WalletResult<Mnemonic> {
        let mut indices = self.to_indices();
        let words = indices
            .iter()
            .map(|&i| word_at(list, usize::from(i)))
            .collect::<WalletResult<Vec<_>>>();
        indices.zeroize();
        Ok(Mnemonic::new(words?, list.language(), MnemonicScheme::Slip39, None))
    }
}

#[derive(Clone, Copy)]
pub struct Slip39Codec<'a> {
    provider: &'a dyn WordlistProvider,
    iteration_exponent: u8,
    extendable: bool,
}

impl<'a> Slip39Codec<'a> {
    pub fn new(provider: &'a dyn WordlistProvider) -> Self {
        Self::from_config(provider, &CodecConfig::default())
    }

    pub fn from_config(provider: &'a dyn WordlistProvider, config: &CodecConfig) -> Self {
        Self {
            provider,
            iteration_exponent: config.slip39_iteration_exponent.min(MAX_ITERATION_EXPONENT),
            extendable: config.slip39_extendable,
        }
    }

    fn wordlist(&self) -> WalletResult<Arc<Wordlist>> {
        self.provider
            .wordlist(Language::English, WordlistKind::Slip39)
            .ok_or_else(|| MnemonicError::UnknownLanguage.into())
    }

    // =========================================================================
    // ENCODING
    // =========================================================================

    /// 1-of-1 share with a random 15-bit identifier.
    ///
    /// # Errors
    /// `InvalidStrength` when `entropy` is not 128, 256 or 512 bits,
    /// `InvalidPassphrase` when `passphrase` is not printable ASCII and
    /// `UnknownLanguage` when no SLIP-39 list is registered.
    pub fn encode(&self, entropy: &Entropy, passphrase: &str) -> WalletResult<Mnemonic> {
        self.encode_with(entropy, passphrase, secure_random_u16(ID_MASK))
    }

    /// Deterministic variant of [`Self::encode`].
    pub fn encode_with(&self, entropy: &Entropy, passphrase: &str, identifier: u16) -> WalletResult<Mnemonic> {
        self.encode_groups_with(entropy, passphrase, 1, &[GroupSpec::SINGLE], identifier)?
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| invalid_spec("no share produced".to_string()))
    }

    /// Shares of `entropy` split across `groups`, returned group by group.
    ///
    /// Any `group_threshold` groups, each with its member threshold met,
    /// recover the secret.
    ///
    /// # Errors
    /// `InvalidGroupSpec` when there are no groups, more than 16, or fewer
    /// than `group_threshold`; otherwise as [`Self::encode`].
    pub fn encode_groups(
        &self,
        entropy: &Entropy,
        passphrase: &str,
        group_threshold: u8,
        groups: &[GroupSpec],
    ) -> WalletResult<Vec<Vec<Mnemonic>>> {
        self.encode_groups_with(entropy, passphrase, group_threshold, groups, secure_random_u16(ID_MASK))
    }

    /// [`Self::encode_groups`] with a caller-chosen identifier. Shares of
    /// groups with a threshold above 1 still draw random polynomial points.
    pub fn encode_groups_with(
        &self,
        entropy: &Entropy,
        passphrase: &str,
        group_threshold: u8,
        groups: &[GroupSpec],
        identifier: u16,
    ) -> WalletResult<Vec<Vec<Mnemonic>>> {
        let entropy = entropy.for_scheme(EntropyScheme::Slip39)?;
        let passphrase = check_passphrase(passphrase)?;
        let group_count = u8::try_from(groups.len())
            .ok()
            .filter(|n| (1..=MAX_SHARE_COUNT).contains(n))
            .ok_or_else(|| invalid_spec(format!("{} groups, expected 1 to {}", groups.len(), MAX_SHARE_COUNT)))?;
        if group_threshold == 0 || group_threshold > group_count {
            return Err(invalid_spec(format!(
                "group threshold {} with {} groups",
                group_threshold, group_count
            )));
        }
        let list = self.wordlist()?;

        let params = ShareParams {
            identifier: identifier & ID_MASK,
            extendable: self.extendable,
            iteration_exponent: self.iteration_exponent,
            group_threshold,
            group_count,
        };
        let mut encrypted = encrypt(entropy.bytes(), passphrase, &params);
        let group_secrets = shamir::split(group_threshold, group_count, &encrypted);
        encrypted.zeroize();
        let group_secrets = group_secrets?;

        let mut out = Vec::with_capacity(groups.len());
        for (group, group_spec) in group_secrets.iter().zip(groups) {
            let members = shamir::split(group_spec.threshold, group_spec.count, &group.y)?;
            let mnemonics = members
                .iter()
                .map(|member| {
                    Share {
                        params,
                        group_index: group.x,
                        member_index: member.x,
                        member_threshold: group_spec.threshold,
                        value: member.y.clone(),
                    }
                    .to_mnemonic(&list)
                })
                .collect::<WalletResult<Vec<_>>>()?;
            out.push(mnemonics);
        }

        debug!(
            group_threshold,
            group_count,
            iteration_exponent = params.iteration_exponent,
            extendable = params.extendable,
            "Encoded SLIP39 shares"
        );
        Ok(out)
    }

    pub fn generate(&self, strength: usize, passphrase: &str) -> WalletResult<Mnemonic> {
        let entropy = Entropy::generate(EntropyScheme::Slip39, strength)?;
        self.encode(&entropy, passphrase)
    }

    // =========================================================================
    // DECODING
    // =========================================================================

    /// Recovers the master secret from a share set (one share per line) and
    /// decrypts it with `passphrase`.
    ///
    /// Shares beyond a group's member threshold and groups beyond the group
    /// threshold are not used. A wrong passphrase is not detected: it yields
    /// a different secret.
    ///
    /// # Errors
    /// - `ChecksumMismatch` for a corrupt share or a failed digest check.
    /// - `InvalidShareSet` when shares disagree on their parameters or do
    ///   not complete enough groups.
    /// - `InvalidPassphrase` when `passphrase` is not printable ASCII.
    pub fn decode(&self, text: &str, passphrase: &str) -> WalletResult<Entropy> {
        let passphrase = check_passphrase(passphrase)?;
        let shares = share_lines(text)?
            .into_iter()
            .map(|line| self.parse_share(line).map(|(_, share)| share))
            .collect::<WalletResult<Vec<_>>>()?;

        let (params, mut encrypted) = combine(&shares)?;
        let mut secret = decrypt(&encrypted, passphrase, &params);
        encrypted.zeroize();
        let entropy = Entropy::from_bytes(EntropyScheme::Slip39, &secret);
        secret.zeroize();

        debug!(shares = shares.len(), group_threshold = params.group_threshold, "Recovered SLIP39 secret");
        entropy
    }

    /// Validates one share and returns it in canonical form.
    /// No passphrase is needed; the value stays encrypted.
    ///
    /// # Errors
    /// `InvalidWordCount`, `UnknownWord`, `ChecksumMismatch` (including
    /// non-zero padding) or `UnsupportedShare` for a group threshold above
    /// the group count.
    pub fn parse(&self, text: &str) -> WalletResult<Mnemonic> {
        let (list, _) = self.parse_share(text)?;
        let words = normalize_words(text)
            .iter()
            .map(|w| index_of(&list, w).and_then(|i| word_at(&list, i)))
            .collect::<WalletResult<Vec<_>>>()?;
        Ok(Mnemonic::new(words, list.language(), MnemonicScheme::Slip39, None))
    }

    /// [`Self::parse`] for every line of a share set.
    pub fn parse_shares(&self, text: &str) -> WalletResult<Vec<Mnemonic>> {
        share_lines(text)?.into_iter().map(|line| self.parse(line)).collect()
    }

    /// Every line is a well-formed share. Whether the set is complete is only
    /// known to [`Self::decode`].
    #[inline]
    pub fn is_valid(&self, text: &str) -> bool {
        share_lines(text).is_ok_and(|lines| lines.into_iter().all(|line| self.parse_share(line).is_ok()))
    }

    fn parse_share(&self, text: &str) -> WalletResult<(Arc<Wordlist>, Share)> {
        let words = normalize_words(text);
        check_word_count(words.len(), WORD_COUNTS)?;

        let candidates = candidate_wordlists(self.provider, WordlistKind::Slip39, &words, None)?;
        resolve(candidates, |list| decode_share(list, &words))
    }
}

fn share_lines(text: &str) -> WalletResult<Vec<&str>> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.is_empty() {
        return Err(MnemonicError::InvalidWordCount {
            count: 0,
            allowed: WORD_COUNTS,
        }
        .into());
    }
    Ok(lines)
}

fn decode_share(list: &Wordlist, words: &[String]) -> WalletResult<Share> {
    let mut indices = words
        .iter()
        .map(|w| index_of(list, w).map(|i| i as u16))
        .collect::<WalletResult<Vec<_>>>()?;

    let header = (u32::from(indices[0]) << 10) | u32::from(indices[1]);
    let extendable = (header >> ITERATION_EXP_BITS) & 1 == 1;
    if !verify_checksum(&indices, extendable) {
        indices.zeroize();
        return Err(MnemonicError::ChecksumMismatch.into());
    }

    let layout = (u32::from(indices[2]) << 10) | u32::from(indices[3]);
    let nibble = |shift: u32| ((layout >> shift) & 0xF) as u8;
    let params = ShareParams {
        identifier: (header >> (ITERATION_EXP_BITS + 1)) as u16,
        extendable,
        iteration_exponent: (header & ((1 << ITERATION_EXP_BITS) - 1)) as u8,
        group_threshold: nibble(12) + 1,
        group_count: nibble(8) + 1,
    };
    if params.group_threshold > params.group_count {
        indices.zeroize();
        return Err(MnemonicError::UnsupportedShare(format!(
            "group threshold {} exceeds group count {}",
            params.group_threshold, params.group_count
        ))
        .into());
    }

    let value = words_to_bytes(&indices[4..indices.len() - CHECKSUM_WORDS]);
    indices.zeroize();
    Ok(Share {
        params,
        group_index: nibble(16),
        member_index: nibble(4),
        member_threshold: nibble(0) + 1,
        value: value?,
    })
}

/// Interpolates member shares into group secrets, then group secrets into
/// the encrypted master secret.
fn combine(shares: &[Share]) -> WalletResult<(ShareParams, Vec<u8>)> {
    let first = shares
        .first()
        .ok_or_else(|| share_set("no shares given".to_string()))?;
    let params = first.params;
    if shares.iter().any(|s| s.params != params) {
        return Err(share_set("shares belong to different share sets".to_string()));
    }
    if shares.iter().any(|s| s.value.len() != first.value.len()) {
        return Err(share_set("share values differ in length".to_string()));
    }

    let mut groups: BTreeMap<u8, (u8, BTreeMap<u8, &[u8]>)> = BTreeMap::new();
    for share in shares {
        let (member_threshold, members) = groups
            .entry(share.group_index)
            .or_insert_with(|| (share.member_threshold, BTreeMap::new()));
        if *member_threshold != share.member_threshold {
            return Err(share_set(format!("group {} mixes member thresholds", share.group_index)));
        }
        match members.entry(share.member_index) {
            Entry::Vacant(slot) => {
                slot.insert(share.value.as_slice());
            }
            Entry::Occupied(slot) if *slot.get() != share.value.as_slice() => {
                return Err(share_set(format!(
                    "member {} of group {} appears with different values",
                    share.member_index, share.group_index
                )));
            }
            Entry::Occupied(_) => {}
        }
    }

    let needed = usize::from(params.group_threshold);
    let mut group_secrets = Vec::with_capacity(needed);
    for (&group_index, (member_threshold, members)) in &groups {
        if group_secrets.len() == needed {
            break;
        }
        let threshold = usize::from(*member_threshold);
        if members.len() < threshold {
            continue;
        }
        let points: Vec<Point> = members
            .iter()
            .take(threshold)
            .map(|(&x, y)| Point::new(x, y.to_vec()))
            .collect();
        group_secrets.push(Point::new(group_index, shamir::recover(*member_threshold, &points)?));
    }

    if group_secrets.len() < needed {
        return Err(share_set(format!(
            "{} of {} required groups are complete",
            group_secrets.len(),
            needed
        )));
    }
    let encrypted = shamir::recover(params.group_threshold, &group_secrets)?;
    Ok((params, encrypted))
}

fn invalid_spec(reason: String) -> WalletError {
    MnemonicError::InvalidGroupSpec(reason).into()
}

fn share_set(reason: String) -> WalletError {
    MnemonicError::InvalidShareSet(reason).into()
}
