//! Core data model types for placement-admin.
//!
//! Question categories and the per-category count tables that the readiness
//! policy works on. Count tables are decoded leniently: a missing, negative
//! or malformed count becomes zero instead of failing the whole payload.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Numeric identifier used by the remote API for every entity.
pub type Id = u64;

/// The six question categories a bank tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vocabulary,
    Grammar,
    Reading,
    Listening,
    Speaking,
    Writing,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::Vocabulary,
        Category::Grammar,
        Category::Reading,
        Category::Listening,
        Category::Speaking,
        Category::Writing,
    ];

    /// The wire name of this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Vocabulary => "vocabulary",
            Category::Grammar => "grammar",
            Category::Reading => "reading",
            Category::Listening => "listening",
            Category::Speaking => "speaking",
            Category::Writing => "writing",
        }
    }

    /// Whether questions of this category are answered by picking an option.
    pub fn is_multiple_choice(self) -> bool {
        !matches!(self, Category::Speaking | Category::Writing)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vocabulary" | "vocab" => Ok(Category::Vocabulary),
            "grammar" => Ok(Category::Grammar),
            "reading" => Ok(Category::Reading),
            "listening" => Ok(Category::Listening),
            "speaking" => Ok(Category::Speaking),
            "writing" => Ok(Category::Writing),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Category count tables
// ---------------------------------------------------------------------------

/// Number of questions per category in a bank.
///
/// Every category is always present. Serializes with a derived `total` key;
/// an incoming `total` is ignored and recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CategoryCounts {
    counts: [u32; 6],
}

impl CategoryCounts {
    /// A table with every category at zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Count for one category.
    pub fn get(&self, category: Category) -> u32 {
        self.counts[category.index()]
    }

    /// Set the count for one category.
    pub fn set(&mut self, category: Category, count: u32) {
        self.counts[category.index()] = count;
    }

    /// Builder-style variant of [`CategoryCounts::set`].
    pub fn with(mut self, category: Category, count: u32) -> Self {
        self.set(category, count);
        self
    }

    /// Sum across all six categories.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Iterate `(category, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

impl FromIterator<(Category, u32)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (Category, u32)>>(iter: I) -> Self {
        let mut counts = Self::zero();
        for (category, count) in iter {
            counts.set(category, count);
        }
        counts
    }
}

/// Minimum number of questions per category before an exam can be built.
///
/// Configured per level; a zero entry means "no requirement".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RequiredThresholds {
    minimums: CategoryCounts,
}

impl RequiredThresholds {
    /// Thresholds that require nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// The same minimum for every category.
    pub fn uniform(minimum: u32) -> Self {
        Category::ALL.iter().map(|&c| (c, minimum)).collect()
    }

    pub fn get(&self, category: Category) -> u32 {
        self.minimums.get(category)
    }

    pub fn with(mut self, category: Category, minimum: u32) -> Self {
        self.minimums.set(category, minimum);
        self
    }

    /// Sum of all minimums.
    pub fn total(&self) -> u64 {
        self.minimums.total()
    }

    /// True when no category has a requirement.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        self.minimums.iter()
    }
}

impl FromIterator<(Category, u32)> for RequiredThresholds {
    fn from_iter<I: IntoIterator<Item = (Category, u32)>>(iter: I) -> Self {
        Self {
            minimums: iter.into_iter().collect(),
        }
    }
}

/// Per-category boolean table (e.g. which categories are ready).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CategoryFlags {
    flags: [bool; 6],
}

impl CategoryFlags {
    pub fn get(&self, category: Category) -> bool {
        self.flags[category.index()]
    }

    pub fn set(&mut self, category: Category, value: bool) {
        self.flags[category.index()] = value;
    }

    /// True when every category is set.
    pub fn all(&self) -> bool {
        self.flags.iter().all(|&f| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, bool)> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

impl FromIterator<(Category, bool)> for CategoryFlags {
    fn from_iter<I: IntoIterator<Item = (Category, bool)>>(iter: I) -> Self {
        let mut flags = Self::default();
        for (category, value) in iter {
            flags.set(category, value);
        }
        flags
    }
}

// ---------------------------------------------------------------------------
// Lenient decoding
// ---------------------------------------------------------------------------

/// A count as it may arrive from a backend or a hand-written file.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientCount {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl LenientCount {
    fn clamp(self) -> u32 {
        match self {
            LenientCount::Int(n) => n.clamp(0, u32::MAX as i64) as u32,
            // `as` saturates and maps NaN to zero.
            LenientCount::Float(f) => f.max(0.0) as u32,
            LenientCount::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(|n| n.clamp(0, u32::MAX as i64) as u32)
                .unwrap_or(0),
            LenientCount::Other(_) => 0,
        }
    }
}

#[derive(Deserialize, Default)]
struct RawCounts {
    #[serde(default)]
    vocabulary: Option<LenientCount>,
    #[serde(default)]
    grammar: Option<LenientCount>,
    #[serde(default)]
    reading: Option<LenientCount>,
    #[serde(default)]
    listening: Option<LenientCount>,
    #[serde(default)]
    speaking: Option<LenientCount>,
    #[serde(default)]
    writing: Option<LenientCount>,
}

impl From<RawCounts> for CategoryCounts {
    fn from(raw: RawCounts) -> Self {
        let value = |v: Option<LenientCount>| v.map(LenientCount::clamp).unwrap_or(0);
        CategoryCounts {
            counts: [
                value(raw.vocabulary),
                value(raw.grammar),
                value(raw.reading),
                value(raw.listening),
                value(raw.speaking),
                value(raw.writing),
            ],
        }
    }
}

/// Deserialize a count table, treating `null` as all zeros.
fn deserialize_table<'de, D>(deserializer: D) -> Result<CategoryCounts, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCounts>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into())
}

fn serialize_table<S>(
    counts: &CategoryCounts,
    total: bool,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeMap;

    let len = if total { 7 } else { 6 };
    let mut map = serializer.serialize_map(Some(len))?;
    for (category, count) in counts.iter() {
        map.serialize_entry(category.as_str(), &count)?;
    }
    if total {
        map.serialize_entry("total", &counts.total())?;
    }
    map.end()
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_table(self, true, serializer)
    }
}

impl<'de> Deserialize<'de> for CategoryCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_table(deserializer)
    }
}

impl Serialize for RequiredThresholds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_table(&self.minimums, false, serializer)
    }
}

impl<'de> Deserialize<'de> for RequiredThresholds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self {
            minimums: deserialize_table(deserializer)?,
        })
    }
}

#[derive(Deserialize, Default)]
struct RawFlags {
    #[serde(default)]
    vocabulary: Option<bool>,
    #[serde(default)]
    grammar: Option<bool>,
    #[serde(default)]
    reading: Option<bool>,
    #[serde(default)]
    listening: Option<bool>,
    #[serde(default)]
    speaking: Option<bool>,
    #[serde(default)]
    writing: Option<bool>,
}

impl Serialize for CategoryFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(6))?;
        for (category, flag) in self.iter() {
            map.serialize_entry(category.as_str(), &flag)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawFlags>::deserialize(deserializer)?.unwrap_or_default();
        Ok(CategoryFlags {
            flags: [
                raw.vocabulary.unwrap_or(false),
                raw.grammar.unwrap_or(false),
                raw.reading.unwrap_or(false),
                raw.listening.unwrap_or(false),
                raw.speaking.unwrap_or(false),
                raw.writing.unwrap_or(false),
            ],
        })
    }
}
