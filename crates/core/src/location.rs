//! Location normalisation.
//!
//! Backend records spell the same city many ways (`"Indore"`, `"Indore, MP"`,
//! `"indore (M.P.)"`, `"Indore, Madhya Pradesh, India"`). [`normalize`] reduces all of them to
//! one [`LocationKey`] so dropdowns show each place once and filters match across spellings.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9 ]+").expect("valid regex"));

/// Longest first so `republic of india` wins over `india`.
const COUNTRY_SUFFIXES: &[&str] = &["republic of india", "india"];

/// States, union territories and the abbreviations seen in backend data.
const STATE_SUFFIXES: &[&str] = &[
    "himachal pradesh",
    "andhra pradesh",
    "madhya pradesh",
    "uttar pradesh",
    "chhattisgarh",
    "maharashtra",
    "uttarakhand",
    "west bengal",
    "maharastra",
    "jharkhand",
    "karnataka",
    "meghalaya",
    "rajasthan",
    "tamil nadu",
    "telangana",
    "nagaland",
    "gujarat",
    "manipur",
    "mizoram",
    "tripura",
    "andhra",
    "odisha",
    "punjab",
    "sikkim",
    "kerala",
    "assam",
    "delhi",
    "goa",
    "mp",
    "up",
    "wb",
];

/// Place names whose last word is also a state name.
const COMPOUND_PLACES: &[&str] = &["new delhi", "north goa", "south goa", "old goa"];

/// Canonical, comparison-ready form of a free-text location. The empty key means "no location".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LocationKey(String);

impl LocationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display form of the key itself, used when no better label was observed.
    pub fn title(&self) -> String {
        title_case(&self.0)
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduce a raw location to its [`LocationKey`].
///
/// Lowercases, drops parenthesised asides, strips a trailing country and then a trailing state
/// name or abbreviation, replaces punctuation with spaces and collapses whitespace. A country or
/// state on its own is kept, so `"Goa"` stays `"goa"` while `"Panaji, Goa"` becomes `"panaji"`.
pub fn normalize(raw: Option<&str>) -> LocationKey {
    match raw {
        Some(raw) => canonical(&strip_qualifiers(raw)),
        None => LocationKey::default(),
    }
}

/// Every place named in a raw location value.
///
/// Some records list several cities separated by commas (`"Indore, Bhopal, MP"`). Qualifiers are
/// stripped from the whole value first, then each comma-separated part is normalised. Empty and
/// repeated keys are dropped; order of first appearance is kept.
pub fn location_keys(raw: Option<&str>) -> Vec<LocationKey> {
    location_parts(raw).into_iter().map(|(key, _)| key).collect()
}

fn location_parts(raw: Option<&str>) -> Vec<(LocationKey, String)> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut parts: Vec<(LocationKey, String)> = Vec::new();
    for part in strip_qualifiers(raw).split(',') {
        let stripped = strip_qualifiers(part);
        let key = canonical(&stripped);
        if key.is_empty() || parts.iter().any(|(seen, _)| *seen == key) {
            continue;
        }
        parts.push((key, label_for(&stripped)));
    }
    parts
}

/// Steps up to and including state removal. The result is lowercase but keeps punctuation.
fn strip_qualifiers(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let without_asides = PARENTHETICAL.replace_all(&lowered, " ");
    let mut value = without_asides.trim().to_string();

    if let Some(rest) = strip_trailing_token(&value, COUNTRY_SUFFIXES) {
        value = rest.to_string();
    }
    if let Some(rest) = strip_trailing_token(&value, STATE_SUFFIXES) {
        value = rest.to_string();
    }
    value
}

fn canonical(stripped: &str) -> LocationKey {
    let spaced = NON_ALPHANUMERIC.replace_all(stripped, " ");
    LocationKey(collapse_whitespace(&spaced))
}

/// The place that remains once a trailing whole-word `token` (optionally followed by `.`) is
/// removed, or `None` when no token matches or nothing would remain.
fn strip_trailing_token<'a>(value: &'a str, tokens: &[&str]) -> Option<&'a str> {
    let value = value.trim_end();
    let body = value.strip_suffix('.').unwrap_or(value).trim_end();

    for token in tokens {
        let Some(rest) = strip_word_suffix(body, token) else {
            continue;
        };
        let remainder = rest.trim_end_matches(|c: char| matches!(c, ',' | '(') || c.is_whitespace());
        if remainder.is_empty() {
            continue;
        }
        let compound = COMPOUND_PLACES
            .iter()
            .any(|place| place.len() > token.len() && strip_word_suffix(body, place).is_some());
        if compound {
            continue;
        }
        return Some(remainder);
    }
    None
}

/// `value` without a trailing `word`, provided the word starts at a boundary. An unclosed `(`
/// counts as one.
fn strip_word_suffix<'a>(value: &'a str, word: &str) -> Option<&'a str> {
    let rest = value.strip_suffix(word)?;
    let at_boundary =
        rest.is_empty() || rest.ends_with(|c: char| matches!(c, ',' | '(') || c.is_whitespace());
    at_boundary.then_some(rest)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn label_for(stripped: &str) -> String {
    let trimmed = stripped.trim_matches(|c: char| c == ',' || c == '.' || c.is_whitespace());
    title_case(&collapse_whitespace(trimmed))
}

fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A dropdown entry: the key filters match on and the label shown to users.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocationOption {
    pub key: LocationKey,
    pub label: String,
}

/// Distinct locations observed across a set of records, each with the first label seen for it.
#[derive(Clone, Debug, Default)]
pub struct LocationIndex {
    labels: BTreeMap<LocationKey, String>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_locations<'a>(raws: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut index = Self::new();
        for raw in raws {
            index.observe(raw);
        }
        index
    }

    /// Record every place in `raw`. Labels already present are kept.
    pub fn observe(&mut self, raw: Option<&str>) {
        for (key, label) in location_parts(raw) {
            self.labels.entry(key).or_insert(label);
        }
    }

    pub fn contains(&self, key: &LocationKey) -> bool {
        self.labels.contains_key(key)
    }

    pub fn label(&self, key: &LocationKey) -> String {
        self.labels
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.title())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Options sorted by label.
    pub fn options(&self) -> Vec<LocationOption> {
        let mut options: Vec<LocationOption> = self
            .labels
            .iter()
            .map(|(key, label)| LocationOption {
                key: key.clone(),
                label: label.clone(),
            })
            .collect();
        options.sort_by(|a, b| a.label.cmp(&b.label));
        options
    }
}
