// wallet-core/src/crypto/derivation/mod.rs
//
// Derivation Path Engine
// Structured index sequences per scheme with string <-> struct conversion.
//
// # Conventions
// - BIP-44/49/84/86: `m/purpose'/coin'/account'/change/address`
// - CIP-1852 (Cardano Shelley): `m/1852'/1815'/account'/role/address`
// - Electrum: `m/change/address`
// - Monero: `m/minor/major`
// - Custom: any `m/...` path

pub mod bip44;
pub mod cip1852;
pub mod custom;
pub mod electrum;
pub mod monero;

pub use bip44::{Bip44Derivation, Bip44Kind};
pub use cip1852::{Cip1852Derivation, Role};
pub use custom::CustomDerivation;
pub use electrum::ElectrumDerivation;
pub use monero::MoneroDerivation;

use crate::error::{DerivationError, WalletError, WalletResult};

/// Offset added to a hardened index when serialized.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// SLIP-44 registered coin types used as defaults.
/// Ref: https://github.com/satoshilabs/slips/blob/master/slip-0044.md
pub mod coin_type {
    pub const BITCOIN: u32 = 0;
    pub const ETHEREUM: u32 = 60;
    pub const CARDANO: u32 = 1815;
}

// =============================================================================
// INDEX
// =============================================================================
/// One path level: a value below 2^31 plus the hardened flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationIndex {
    value: u32,
    hardened: bool,
}

impl DerivationIndex {
    pub fn new(value: u32, hardened: bool) -> WalletResult<Self> {
        check_value(value)?;
        Ok(Self { value, hardened })
    }

    pub fn normal(value: u32) -> WalletResult<Self> {
        Self::new(value, false)
    }

    pub fn hardened(value: u32) -> WalletResult<Self> {
        Self::new(value, true)
    }

    /// Reads an already serialized index: the top bit is the hardened flag.
    pub const fn from_serialized(raw: u32) -> Self {
        Self {
            value: raw & !HARDENED_OFFSET,
            hardened: raw & HARDENED_OFFSET != 0,
        }
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.value
    }

    #[inline]
    pub const fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// `value + 0x8000_0000` when hardened.
    #[inline]
    pub const fn serialized(&self) -> u32 {
        if self.hardened {
            self.value | HARDENED_OFFSET
        } else {
            self.value
        }
    }
}

impl std::fmt::Display for DerivationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, if self.hardened { "'" } else { "" })
    }
}

impl std::str::FromStr for DerivationIndex {
    type Err = WalletError;

    /// Accepts `5`, `5'`, `5h` and `5H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = split_hardened(s.trim());
        Self::new(parse_value(digits, s)?, hardened)
    }
}

fn split_hardened(s: &str) -> (&str, bool) {
    match s.strip_suffix(['\'', 'h', 'H']) {
        Some(digits) => (digits, true),
        None => (s, false),
    }
}

fn parse_value(digits: &str, original: &str) -> WalletResult<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DerivationError::InvalidIndexValue(original.to_string()).into());
    }
    let value: u32 = digits
        .parse()
        .map_err(|_| DerivationError::InvalidIndexValue(original.to_string()))?;
    check_value(value)?;
    Ok(value)
}

pub(crate) fn check_value(value: u32) -> WalletResult<()> {
    if value >= HARDENED_OFFSET {
        return Err(DerivationError::InvalidIndexValue(format!(
            "{} is not below 2^31",
            value
        ))
        .into());
    }
    Ok(())
}

// =============================================================================
// RANGES
// =============================================================================
/// A single index or an inclusive `from-to` range of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexRange {
    from: u32,
    to: u32,
}

impl IndexRange {
    pub fn new(from: u32, to: u32) -> WalletResult<Self> {
        check_value(from)?;
        check_value(to)?;
        if from > to {
            return Err(DerivationError::InvalidIndexValue(format!("range {}-{} is reversed", from, to)).into());
        }
        Ok(Self { from, to })
    }

    pub fn single(value: u32) -> WalletResult<Self> {
        Self::new(value, value)
    }

    /// The reportable value of the level: the range start.
    #[inline]
    pub const fn from(&self) -> u32 {
        self.from
    }

    #[inline]
    pub const fn to(&self) -> u32 {
        self.to
    }

    #[inline]
    pub const fn is_range(&self) -> bool {
        self.from != self.to
    }
}

/// Anything a range-capable setter accepts: `u32` or `(from, to)`.
pub trait IntoIndexRange {
    fn into_index_range(self) -> WalletResult<IndexRange>;
}

impl IntoIndexRange for u32 {
    fn into_index_range(self) -> WalletResult<IndexRange> {
        IndexRange::single(self)
    }
}

impl IntoIndexRange for (u32, u32) {
    fn into_index_range(self) -> WalletResult<IndexRange> {
        IndexRange::new(self.0, self.1)
    }
}

impl IntoIndexRange for IndexRange {
    fn into_index_range(self) -> WalletResult<IndexRange> {
        Ok(self)
    }
}

// =============================================================================
// PATH
// =============================================================================
/// One level of a path; a range level expands into several concrete paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathComponent {
    range: IndexRange,
    hardened: bool,
}

impl PathComponent {
    pub fn new(range: IndexRange, hardened: bool) -> Self {
        Self { range, hardened }
    }

    /// Single-value level; callers have already bounded `value`.
    pub(crate) const fn fixed(value: u32, hardened: bool) -> Self {
        Self {
            range: IndexRange { from: value, to: value },
            hardened,
        }
    }

    /// Concrete index reported for this level (a range reports its start).
    #[inline]
    pub fn index(&self) -> DerivationIndex {
        DerivationIndex {
            value: self.range.from,
            hardened: self.hardened,
        }
    }

    #[inline]
    pub fn range(&self) -> IndexRange {
        self.range
    }

    #[inline]
    pub fn is_hardened(&self) -> bool {
        self.hardened
    }
}

impl From<DerivationIndex> for PathComponent {
    fn from(index: DerivationIndex) -> Self {
        Self {
            range: IndexRange {
                from: index.value,
                to: index.value,
            },
            hardened: index.hardened,
        }
    }
}

impl std::fmt::Display for PathComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = if self.hardened { "'" } else { "" };
        if self.range.is_range() {
            write!(f, "{}-{}{}", self.range.from, self.range.to, suffix)
        } else {
            write!(f, "{}{}", self.range.from, suffix)
        }
    }
}

impl std::str::FromStr for PathComponent {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, hardened) = split_hardened(s.trim());
        let range = match body.split_once('-') {
            Some((from, to)) => IndexRange::new(parse_value(from, s)?, parse_value(to, s)?)?,
            None => IndexRange::single(parse_value(body, s)?)?,
        };
        Ok(Self { range, hardened })
    }
}

/// Ordered components plus their canonical string, always in sync.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    components: Vec<PathComponent>,
    path: String,
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DerivationPath {
    pub fn new(components: Vec<PathComponent>) -> Self {
        let path = render(&components);
        Self { components, path }
    }

    pub fn from_indexes(indexes: &[DerivationIndex]) -> Self {
        Self::new(indexes.iter().map(|&i| PathComponent::from(i)).collect())
    }

    /// Parses `m/<idx>[']/...`; `m/` is the empty path.
    pub fn parse(path: &str) -> WalletResult<Self> {
        let trimmed = path.trim();
        let rest = trimmed
            .strip_prefix("m/")
            .ok_or_else(|| DerivationError::InvalidPathFormat(format!("'{}' does not start with 'm/'", path)))?;
        if rest.is_empty() {
            return Ok(Self::default());
        }

        let components = rest
            .split('/')
            .map(|level| {
                if level.is_empty() {
                    Err(DerivationError::InvalidPathFormat(format!("empty level in '{}'", path)).into())
                } else {
                    level.parse::<PathComponent>()
                }
            })
            .collect::<WalletResult<Vec<_>>>()?;
        Ok(Self::new(components))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn components(&self) -> &[PathComponent] {
        &self.components
    }

    /// Serialized indexes (hardened ones carry the top bit).
    pub fn indexes(&self) -> Vec<u32> {
        self.components.iter().map(|c| c.index().serialized()).collect()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn has_ranges(&self) -> bool {
        self.components.iter().any(|c| c.range.is_range())
    }

    pub fn push(&mut self, component: PathComponent) {
        self.components.push(component);
        self.path = render(&self.components);
    }

    /// Every concrete path covered by the range levels, in lexicographic
    /// order. A path without ranges expands to itself.
    ///
    /// Paths are produced on demand, so a level spanning `0-2147483647`
    /// costs nothing until it is iterated.
    pub fn expand(&self) -> PathExpansion<'_> {
        PathExpansion {
            components: &self.components,
            current: Some(self.components.iter().map(|c| c.range.from).collect()),
        }
    }
}

/// Iterator returned by [`DerivationPath::expand`]; the last level varies
/// fastest.
#[derive(Debug, Clone)]
pub struct PathExpansion<'a> {
    components: &'a [PathComponent],
    current: Option<Vec<u32>>,
}

impl Iterator for PathExpansion<'_> {
    type Item = DerivationPath;

    fn next(&mut self) -> Option<Self::Item> {
        let components = self.components;
        let values = self.current.as_mut()?;
        let path = DerivationPath::new(
            components
                .iter()
                .zip(values.iter())
                .map(|(component, &value)| PathComponent::fixed(value, component.hardened))
                .collect(),
        );

        let advanced = (0..values.len()).rev().any(|level| {
            let range = components[level].range;
            if values[level] < range.to {
                values[level] += 1;
                true
            } else {
                values[level] = range.from;
                false
            }
        });
        if !advanced {
            self.current = None;
        }
        Some(path)
    }
}

fn render(components: &[PathComponent]) -> String {
    let levels: Vec<String> = components.iter().map(ToString::to_string).collect();
    format!("m/{}", levels.join("/"))
}

impl std::fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

impl std::str::FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// SCHEMES
// =============================================================================
/// Capability shared by every derivation scheme.
pub trait Derivation {
    fn name(&self) -> &'static str;

    fn path(&self) -> &DerivationPath;

    fn indexes(&self) -> Vec<u32> {
        self.path().indexes()
    }

    fn depth(&self) -> usize {
        self.path().depth()
    }

    /// Resets the scheme's mutable levels to their defaults.
    fn clean(&mut self);
}

/// Change chain of BIP-44-family paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Change {
    #[default]
    External = 0,
    Internal = 1,
}

impl Change {
    pub const ACCEPTED: &'static [&'static str] = &["external-chain", "internal-chain", "0", "1"];

    pub const fn name(self) -> &'static str {
        match self {
            Change::External => "external-chain",
            Change::Internal => "internal-chain",
        }
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self as u32
    }

    fn rejected(value: impl ToString) -> WalletError {
        DerivationError::InvalidChangeIndex {
            value: value.to_string(),
            accepted: Self::ACCEPTED,
        }
        .into()
    }
}

impl TryFrom<&str> for Change {
    type Error = WalletError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "external-chain" | "0" => Ok(Change::External),
            "internal-chain" | "1" => Ok(Change::Internal),
            _ => Err(Self::rejected(value)),
        }
    }
}

impl TryFrom<u32> for Change {
    type Error = WalletError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Change::External),
            1 => Ok(Change::Internal),
            _ => Err(Self::rejected(value)),
        }
    }
}

impl TryFrom<i32> for Change {
    type Error = WalletError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map_err(|_| Self::rejected(value))
            .and_then(Change::try_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardened_arithmetic() {
        let index = DerivationIndex::hardened(5).unwrap();
        assert_eq!(index.serialized(), 5 + 0x8000_0000);
        assert_eq!(index.to_string(), "5'");
        assert_eq!("5'".parse::<DerivationIndex>().unwrap(), index);
        assert_eq!("5h".parse::<DerivationIndex>().unwrap(), index);
        assert_eq!(DerivationIndex::from_serialized(index.serialized()), index);

        let normal = DerivationIndex::normal(5).unwrap();
        assert_eq!(normal.serialized(), 5);
        assert_eq!(normal.to_string(), "5");
    }

    #[test]
    fn test_index_bounds() {
        assert!(DerivationIndex::normal(0x7FFF_FFFF).is_ok());
        assert!(matches!(
            DerivationIndex::normal(0x8000_0000),
            Err(WalletError::Derivation(DerivationError::InvalidIndexValue(_)))
        ));
        assert!("2147483648".parse::<DerivationIndex>().is_err());
        assert!("-1".parse::<DerivationIndex>().is_err());
        assert!("x'".parse::<DerivationIndex>().is_err());
        assert!("'".parse::<DerivationIndex>().is_err());
    }

    #[test]
    fn test_path_round_trip() {
        let path = DerivationPath::parse("m/44'/0'/0'/0/0").unwrap();
        assert_eq!(path.as_str(), "m/44'/0'/0'/0/0");
        assert_eq!(path.depth(), 5);
        assert_eq!(
            path.indexes(),
            vec![44 + HARDENED_OFFSET, HARDENED_OFFSET, HARDENED_OFFSET, 0, 0]
        );

        // Alternative hardened markers render canonically
        assert_eq!(DerivationPath::parse("m/84h/0H/1'").unwrap().to_string(), "m/84'/0'/1'");
    }

    #[test]
    fn test_empty_path() {
        let path = DerivationPath::parse("m/").unwrap();
        assert!(path.is_empty());
        assert_eq!(path.as_str(), "m/");
        assert_eq!(DerivationPath::default().as_str(), "m/");
    }

    #[test]
    fn test_path_format_errors() {
        for bad in ["44'/0'", "n/0", "m", "m//0", "m/0/"] {
            assert!(
                matches!(
                    DerivationPath::parse(bad),
                    Err(WalletError::Derivation(DerivationError::InvalidPathFormat(_)))
                ),
                "{}",
                bad
            );
        }
        assert!(matches!(
            DerivationPath::parse("m/abc"),
            Err(WalletError::Derivation(DerivationError::InvalidIndexValue(_)))
        ));
    }

    #[test]
    fn test_range_components() {
        let path = DerivationPath::parse("m/44'/0'/0-1'/0/3-5").unwrap();
        assert_eq!(path.as_str(), "m/44'/0'/0-1'/0/3-5");
        assert!(path.has_ranges());
        // Ranges report their start
        assert_eq!(path.indexes()[2], HARDENED_OFFSET);
        assert_eq!(path.indexes()[4], 3);

        let expanded: Vec<String> = path.expand().map(|p| p.to_string()).collect();
        assert_eq!(
            expanded,
            vec![
                "m/44'/0'/0'/0/3",
                "m/44'/0'/0'/0/4",
                "m/44'/0'/0'/0/5",
                "m/44'/0'/1'/0/3",
                "m/44'/0'/1'/0/4",
                "m/44'/0'/1'/0/5",
            ]
        );

        assert!(DerivationPath::parse("m/5-2").is_err());
    }

    #[test]
    fn test_expand_without_ranges() {
        let path = DerivationPath::parse("m/0/1").unwrap();
        assert_eq!(path.expand().collect::<Vec<_>>(), vec![path.clone()]);
        assert_eq!(
            DerivationPath::default().expand().collect::<Vec<_>>(),
            vec![DerivationPath::default()]
        );
    }

    #[test]
    fn test_expand_full_width_range_is_lazy() {
        let path = DerivationPath::parse("m/44'/0'/0'/0/0-2147483647").unwrap();
        let first: Vec<String> = path.expand().take(3).map(|p| p.to_string()).collect();
        assert_eq!(first, vec!["m/44'/0'/0'/0/0", "m/44'/0'/0'/0/1", "m/44'/0'/0'/0/2"]);

        let top = DerivationPath::parse("m/1/2147483646-2147483647'").unwrap();
        let tail: Vec<String> = top.expand().map(|p| p.to_string()).collect();
        assert_eq!(tail, vec!["m/1/2147483646'", "m/1/2147483647'"]);
    }

    #[test]
    fn test_change_conversions() {
        assert_eq!(Change::try_from("external-chain").unwrap(), Change::External);
        assert_eq!(Change::try_from("1").unwrap(), Change::Internal);
        assert_eq!(Change::try_from(1u32).unwrap(), Change::Internal);
        assert_eq!(Change::try_from(0i32).unwrap(), Change::External);

        assert_eq!(
            Change::try_from("sideways").unwrap_err(),
            WalletError::Derivation(DerivationError::InvalidChangeIndex {
                value: "sideways".to_string(),
                accepted: Change::ACCEPTED,
            })
        );
        assert!(Change::try_from(2u32).is_err());
        assert!(Change::try_from(-1i32).is_err());
    }
}
