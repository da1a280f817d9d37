//! Dotted path lookups into JSON documents.
//!
//! Paths are dot-separated segments. A segment indexes an object by key or
//! an array by position; `\.` escapes a literal dot inside a key. A segment
//! of `#` on an array yields its length.

use serde_json::Value;

/// Resolve `path` against `document`, returning `None` if any segment is missing.
pub fn get<'a>(document: &'a Value, path: &str) -> Option<Resolved<'a>> {
    if path.is_empty() {
        return None;
    }

    let segments = split(path);
    let (last, parents) = segments.split_last()?;

    let mut current = document;
    for segment in parents {
        current = step(current, segment)?;
    }

    if last == "#" {
        if let Value::Array(items) = current {
            return Some(Resolved::Count(items.len()));
        }
    }
    step(current, last).map(Resolved::Value)
}

/// A successfully resolved path.
#[derive(Debug, PartialEq)]
pub enum Resolved<'a> {
    Value(&'a Value),
    Count(usize),
}

impl Resolved<'_> {
    /// String form of the resolved value.
    ///
    /// Strings are returned unquoted, `null` becomes the empty string, and
    /// objects and arrays are rendered as compact JSON.
    pub fn to_attribute_string(&self) -> String {
        match self {
            Resolved::Count(n) => n.to_string(),
            Resolved::Value(Value::String(s)) => s.clone(),
            Resolved::Value(Value::Null) => String::new(),
            Resolved::Value(other) => other.to_string(),
        }
    }
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn split(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lookup(document: &Value, path: &str) -> Option<String> {
        get(document, path).map(|r| r.to_attribute_string())
    }

    #[test]
    fn test_nested_object() {
        let doc = json!({"a": {"b": "v"}});
        assert_eq!(lookup(&doc, "a.b").as_deref(), Some("v"));
    }

    #[test]
    fn test_missing_segment() {
        let doc = json!({"a": {"b": "v"}});
        assert_eq!(lookup(&doc, "a.c"), None);
        assert_eq!(lookup(&doc, "x.b"), None);
        assert_eq!(lookup(&doc, "a.b.c"), None);
        assert_eq!(lookup(&doc, ""), None);
    }

    #[test]
    fn test_array_index() {
        let doc = json!({"vnics": [{"ip": "10.0.0.2"}, {"ip": "10.0.0.3"}]});
        assert_eq!(lookup(&doc, "vnics.1.ip").as_deref(), Some("10.0.0.3"));
        assert_eq!(lookup(&doc, "vnics.2.ip"), None);
        assert_eq!(lookup(&doc, "vnics.first"), None);
        assert_eq!(lookup(&doc, "vnics.#").as_deref(), Some("2"));
    }

    #[test]
    fn test_escaped_dot() {
        let doc = json!({"freeformTags": {"team.name": "obs"}});
        assert_eq!(lookup(&doc, r"freeformTags.team\.name").as_deref(), Some("obs"));
    }

    #[test]
    fn test_scalar_rendering() {
        let doc = json!({
            "shapeConfig": {"ocpus": 2.0, "maxVnicAttachments": 2},
            "flag": true,
            "nothing": null,
            "tags": {"k": "v"}
        });
        assert_eq!(lookup(&doc, "shapeConfig.ocpus").as_deref(), Some("2.0"));
        assert_eq!(
            lookup(&doc, "shapeConfig.maxVnicAttachments").as_deref(),
            Some("2")
        );
        assert_eq!(lookup(&doc, "flag").as_deref(), Some("true"));
        assert_eq!(lookup(&doc, "nothing").as_deref(), Some(""));
        assert_eq!(lookup(&doc, "tags").as_deref(), Some(r#"{"k":"v"}"#));
    }

    #[test]
    fn test_dashed_keys() {
        let doc = json!({"metadata": {"oke-cluster-id": "ocid1.cluster"}});
        assert_eq!(
            lookup(&doc, "metadata.oke-cluster-id").as_deref(),
            Some("ocid1.cluster")
        );
    }
}
