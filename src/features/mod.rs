//! Feature extraction: URL lexical signals, page (DOM) signals, and the fixed-order
//! vector the classifier was trained on.

mod assemble;
mod lexical;
mod page;
mod schema;

pub use assemble::{assemble, assemble_checked};
pub use lexical::{extract_url_features, UrlFeatures, SHORTENERS};
pub use page::{extract_page_features, try_extract_page_features, PageSnapshot};
pub use schema::{
    header_line, FeatureKey, FeatureSource, Signal, FEATURE_COUNT, PAGE_FEATURE_COUNT,
};

use crate::error::SchemaError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// All 30 schema features in training order. Every key is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "BTreeMap<FeatureKey, Signal>")]
pub struct FeatureVector {
    values: [Signal; FEATURE_COUNT],
}

impl FeatureVector {
    /// Vector with every feature at the -1 default.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FeatureKey) -> Signal {
        self.values[key.index()]
    }

    pub fn set(&mut self, key: FeatureKey, value: Signal) {
        self.values[key.index()] = value;
    }

    pub fn values(&self) -> &[Signal; FEATURE_COUNT] {
        &self.values
    }

    /// `(key, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, Signal)> + '_ {
        FeatureKey::ALL.iter().map(move |&k| (k, self.get(k)))
    }

    /// Build from named integer pairs, rejecting unknown, duplicate, missing or
    /// out-of-range entries.
    pub fn from_named<'a, I>(pairs: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut seen = [false; FEATURE_COUNT];
        let mut v = Self::new();
        for (name, raw) in pairs {
            let key: FeatureKey = name.parse()?;
            if seen[key.index()] {
                return Err(SchemaError::DuplicateKey(key.name()));
            }
            seen[key.index()] = true;
            v.set(key, Signal::try_from(raw)?);
        }
        if let Some(missing) = FeatureKey::ALL.iter().find(|k| !seen[k.index()]) {
            return Err(SchemaError::MissingKey(missing.name()));
        }
        Ok(v)
    }

    /// Data row of the CSV upload.
    pub fn data_line(&self) -> String {
        self.values
            .iter()
            .map(|s| s.as_i8().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Two-line CSV (header, data) without quoting or trailing newline.
    pub fn to_csv(&self) -> String {
        format!("{}\n{}", header_line(), self.data_line())
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k.name(), &v)?;
        }
        map.end()
    }
}

impl TryFrom<BTreeMap<FeatureKey, Signal>> for FeatureVector {
    type Error = SchemaError;

    fn try_from(map: BTreeMap<FeatureKey, Signal>) -> Result<Self, Self::Error> {
        let mut v = Self::new();
        for k in FeatureKey::ALL {
            let value = map.get(&k).ok_or(SchemaError::MissingKey(k.name()))?;
            v.set(k, *value);
        }
        Ok(v)
    }
}

/// DOM-derived signals for one page load. Keys may be missing (host sent a partial map);
/// the assembler fills those with -1.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<FeatureKey, Signal>",
    into = "BTreeMap<FeatureKey, Signal>"
)]
pub struct PageFeatures {
    values: BTreeMap<FeatureKey, Signal>,
}

impl PageFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FeatureKey, value: Signal) -> Result<(), SchemaError> {
        if !key.is_page() {
            return Err(SchemaError::NotPageKey(key.name()));
        }
        self.values.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: FeatureKey) -> Option<Signal> {
        self.values.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, Signal)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Set a page signal known at compile time to be a page key.
    pub(crate) fn put(&mut self, key: FeatureKey, value: Signal) {
        debug_assert!(key.is_page());
        self.values.insert(key, value);
    }
}

impl TryFrom<BTreeMap<FeatureKey, Signal>> for PageFeatures {
    type Error = SchemaError;

    fn try_from(map: BTreeMap<FeatureKey, Signal>) -> Result<Self, Self::Error> {
        let mut pf = PageFeatures::new();
        for (k, v) in map {
            pf.insert(k, v)?;
        }
        Ok(pf)
    }
}

impl From<PageFeatures> for BTreeMap<FeatureKey, Signal> {
    fn from(pf: PageFeatures) -> Self {
        pf.values
    }
}
