use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::AssistError;

/// Separator between key path segments
pub const KEY_SEPARATOR: char = '.';

/// Deepest nesting a catalog may reach, and so the most segments a key may have.
/// Keys longer than this could be written but neither located nor reliably reparsed.
pub const MAX_DEPTH: usize = 100;

/// A translation key such as `home.title.welcome`.
///
/// Always holds between one and `MAX_DEPTH` segments and no empty segments,
/// so the rendered form never starts or ends with a separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedKey {
    segments: Vec<String>,
}

impl DottedKey {
    /// Parse a dotted string, dropping empty segments (`"a..b."` → `a.b`).
    pub fn parse(input: &str) -> Result<Self, AssistError> {
        Self::from_segments(input.trim().split(KEY_SEPARATOR)).ok_or_else(|| {
            AssistError::InvalidKey {
                input: input.to_string(),
            }
        })
    }

    /// Join segments, skipping empty ones. Segments containing the separator
    /// contribute each of their parts. `None` when nothing remains or the
    /// result is deeper than `MAX_DEPTH`.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .flat_map(|segment| {
                segment
                    .as_ref()
                    .split(KEY_SEPARATOR)
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        if segments.is_empty() || segments.len() > MAX_DEPTH {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Like [`from_segments`](Self::from_segments), falling back to the single
    /// segment `fallback` when nothing remains.
    pub fn from_segments_or<I, S>(segments: I, fallback: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_segments(segments).unwrap_or_else(|| Self {
            segments: vec![fallback.to_string()],
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last(&self) -> &str {
        // Construction guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for DottedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for DottedKey {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A structural overwrite performed while setting a key.
///
/// Setting `button.submit` when `button` holds a string replaces that string
/// with an object; setting `button` when it holds an object replaces the
/// whole subtree. Both lose data, so callers are told about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coercion {
    /// A non-object value sat where an intermediate object was needed
    ScalarReplacedByObject {
        key_path: String,
        previous: String,
    },
    /// An object sat where the leaf string goes
    ObjectReplacedByValue { key_path: String, lost_keys: usize },
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::ScalarReplacedByObject { key_path, previous } => write!(
                f,
                "'{}' held {} and was replaced by an object",
                key_path, previous
            ),
            Coercion::ObjectReplacedByValue {
                key_path,
                lost_keys,
            } => write!(
                f,
                "'{}' held an object with {} key(s) and was replaced by a string",
                key_path, lost_keys
            ),
        }
    }
}

/// Result of [`Catalog::set`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetOutcome {
    /// Previous string at the leaf, when it was overwritten
    pub replaced: Option<String>,
    pub coercions: Vec<Coercion>,
}

/// A translation catalog: nested objects with string leaves, in document order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    root: Map<String, Value>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Value at a dotted path, leaf or subtree
    pub fn get(&self, key: &DottedKey) -> Option<&Value> {
        let (last, parents) = key.segments().split_last()?;
        let mut current = &self.root;
        for segment in parents {
            current = current.get(segment)?.as_object()?;
        }
        current.get(last)
    }

    /// String leaf at a dotted path
    pub fn get_str(&self, key: &DottedKey) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Insert or overwrite the leaf at `key`, creating intermediate objects.
    ///
    /// Iterative rather than recursive so deep keys cannot exhaust the stack.
    pub fn set(&mut self, key: &DottedKey, value: &str) -> SetOutcome {
        let mut outcome = SetOutcome::default();
        let Some((last, parents)) = key.segments().split_last() else {
            return outcome;
        };

        let mut current = &mut self.root;
        let mut current_path: Vec<&str> = Vec::with_capacity(key.len());

        for segment in parents {
            current_path.push(segment);
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));

            if !entry.is_object() {
                outcome.coercions.push(Coercion::ScalarReplacedByObject {
                    key_path: current_path.join("."),
                    previous: entry.to_string(),
                });
                *entry = Value::Object(Map::new());
            }

            match entry {
                Value::Object(nested) => current = nested,
                _ => return outcome,
            }
        }

        current_path.push(last);
        match current.insert(last.clone(), Value::String(value.to_string())) {
            Some(Value::String(previous)) => outcome.replaced = Some(previous),
            Some(Value::Object(lost)) => {
                outcome.coercions.push(Coercion::ObjectReplacedByValue {
                    key_path: current_path.join("."),
                    lost_keys: lost.len(),
                });
            }
            _ => {}
        }

        outcome
    }

    /// Every leaf as `(dotted_path, value)` in document order.
    ///
    /// Recursion stops at `MAX_DEPTH` levels; anything deeper is not listed.
    pub fn flatten(&self) -> Vec<(String, &Value)> {
        let mut result = Vec::new();
        flatten_with_depth(&self.root, "", 0, &mut result);
        result
    }

    /// Dotted paths of every leaf
    pub fn keys(&self) -> Vec<String> {
        self.flatten().into_iter().map(|(path, _)| path).collect()
    }

    /// Pretty JSON with 2-space indentation and a trailing newline
    pub fn to_pretty_json(&self) -> String {
        // Serializing a Map<String, Value> cannot fail
        let body = serde_json::to_string_pretty(&self.root).unwrap_or_else(|_| "{}".to_string());
        format!("{}\n", body)
    }
}

fn flatten_with_depth<'a>(
    map: &'a Map<String, Value>,
    prefix: &str,
    depth: usize,
    result: &mut Vec<(String, &'a Value)>,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(nested) if depth < MAX_DEPTH => {
                flatten_with_depth(nested, &path, depth + 1, result);
            }
            Value::Object(_) => {}
            other => result.push((path, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn key(s: &str) -> DottedKey {
        DottedKey::parse(s).unwrap()
    }

    fn catalog(value: Value) -> Catalog {
        match value {
            Value::Object(map) => Catalog::from_map(map),
            _ => panic!("test catalog must be an object"),
        }
    }

    #[test]
    fn test_parse_collapses_separators() {
        assert_eq!(key("..home..title.").to_string(), "home.title");
        assert_eq!(key(" home.title ").segments(), ["home", "title"]);
        assert!(DottedKey::parse("...").is_err());
        assert!(DottedKey::parse("").is_err());
    }

    #[test]
    fn test_from_segments_skips_empty() {
        let key = DottedKey::from_segments(["home", "", "hello_world"]).unwrap();
        assert_eq!(key.to_string(), "home.hello_world");
        assert_eq!(key.last(), "hello_world");
        assert!(DottedKey::from_segments(["", ""]).is_none());
    }

    #[test]
    fn test_parse_rejects_keys_deeper_than_max_depth() {
        let deepest = vec!["a"; MAX_DEPTH].join(".");
        assert_eq!(key(&deepest).len(), MAX_DEPTH);

        let too_deep = vec!["a"; MAX_DEPTH + 1].join(".");
        assert!(matches!(
            DottedKey::parse(&too_deep),
            Err(AssistError::InvalidKey { .. })
        ));
        assert!(DottedKey::from_segments(vec!["a"; MAX_DEPTH + 1]).is_none());
    }

    #[test]
    fn test_set_creates_nested_objects() {
        let mut catalog = Catalog::new();
        let outcome = catalog.set(&key("home.text.hello_world"), "Hello World");

        assert_eq!(outcome, SetOutcome::default());
        assert_eq!(
            Value::Object(catalog.as_map().clone()),
            json!({"home": {"text": {"hello_world": "Hello World"}}})
        );
    }

    #[test]
    fn test_set_overwrites_existing_leaf() {
        let mut catalog = catalog(json!({"home": {"title": "Old"}}));
        let outcome = catalog.set(&key("home.title"), "New");

        assert_eq!(outcome.replaced.as_deref(), Some("Old"));
        assert!(outcome.coercions.is_empty());
        assert_eq!(catalog.get_str(&key("home.title")), Some("New"));
    }

    #[test]
    fn test_set_coerces_scalar_intermediate() {
        let mut catalog = catalog(json!({"button": "click me"}));
        let outcome = catalog.set(&key("button.submit"), "Submit");

        assert_eq!(
            outcome.coercions,
            vec![Coercion::ScalarReplacedByObject {
                key_path: "button".to_string(),
                previous: "\"click me\"".to_string(),
            }]
        );
        assert_eq!(catalog.get_str(&key("button.submit")), Some("Submit"));
    }

    #[test]
    fn test_set_replaces_object_leaf() {
        let mut catalog = catalog(json!({"home": {"title": {"a": "x", "b": "y"}}}));
        let outcome = catalog.set(&key("home.title"), "Title");

        assert_eq!(
            outcome.coercions,
            vec![Coercion::ObjectReplacedByValue {
                key_path: "home.title".to_string(),
                lost_keys: 2,
            }]
        );
        assert!(outcome.coercions[0].to_string().contains("2 key(s)"));
    }

    #[test]
    fn test_get_through_scalar_is_none() {
        let catalog = catalog(json!({"home": "Home"}));
        assert!(catalog.get(&key("home.title")).is_none());
        assert_eq!(catalog.get_str(&key("home")), Some("Home"));
    }

    #[test]
    fn test_flatten_preserves_document_order() {
        let catalog = catalog(json!({
            "zeta": "z",
            "home": {"title": "t", "nested": {"deep": "d"}, "after": "a"},
            "alpha": "a"
        }));

        assert_eq!(
            catalog.keys(),
            vec![
                "zeta",
                "home.title",
                "home.nested.deep",
                "home.after",
                "alpha"
            ]
        );
    }

    #[test]
    fn test_flatten_recovers_written_keys() {
        let written = [
            "home.title",
            "home.text.hello_world",
            "login.button.save",
            "login.placeholder.enter_your_name",
            "footer",
        ];
        let mut catalog = Catalog::new();
        for k in written {
            catalog.set(&key(k), "value");
        }

        let flattened: BTreeSet<String> = catalog.keys().into_iter().collect();
        let expected: BTreeSet<String> = written.iter().map(|k| k.to_string()).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let mut catalog = Catalog::new();
        catalog.set(&key("home.title"), "Home");
        assert_eq!(
            catalog.to_pretty_json(),
            "{\n  \"home\": {\n    \"title\": \"Home\"\n  }\n}\n"
        );
    }
}
