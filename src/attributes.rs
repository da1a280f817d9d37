//! Resource attribute sets and detection results.

use indexmap::IndexMap;
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;

/// Ordered mapping of resource attribute keys to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    entries: IndexMap<String, String>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` unless the key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Insert `value` under `key`, replacing any existing value.
    pub fn upsert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Add every entry of `other` whose key is not already present.
    pub fn merge(&mut self, other: AttributeSet) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for (key, value) in iter {
            set.upsert(key, value);
        }
        set
    }
}

impl IntoIterator for AttributeSet {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Outcome of running a detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// The platform was found and described.
    Detected {
        attributes: AttributeSet,
        schema_url: &'static str,
    },
    /// The platform is not present in this environment.
    NotApplicable,
}

impl Detection {
    pub fn is_detected(&self) -> bool {
        matches!(self, Detection::Detected { .. })
    }

    /// Flatten into an attribute set and schema URL.
    ///
    /// `NotApplicable` yields an empty set and an empty schema URL.
    pub fn into_parts(self) -> (AttributeSet, &'static str) {
        match self {
            Detection::Detected {
                attributes,
                schema_url,
            } => (attributes, schema_url),
            Detection::NotApplicable => (AttributeSet::new(), ""),
        }
    }

    /// Build an OpenTelemetry resource from the detected attributes.
    pub fn into_resource(self) -> Resource {
        let (attributes, _) = self.into_parts();
        Resource::builder_empty()
            .with_attributes(
                attributes
                    .into_iter()
                    .map(|(key, value)| KeyValue::new(key, value)),
            )
            .build()
    }
}
