//! Dotted property paths into a widget's meta properties.
//!
//! Paths look like `value`, `filter.position.left`, `rows[2].label` or
//! `items.0`. A purely numeric dot segment is treated as an index, the
//! same as a bracketed one.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Largest array index a path may address. Writes pad arrays with `null`
/// up to the index, so this bounds the allocation a single write can cause.
pub const MAX_INDEX: usize = 10_000;

/// Property path parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Empty property path")]
    Empty,
    #[error("Empty segment in property path '{0}'")]
    EmptySegment(String),
    #[error("Unterminated index in property path '{0}'")]
    Unterminated(String),
    #[error("Invalid index '{index}' in property path '{path}'")]
    InvalidIndex { path: String, index: String },
    #[error("Index {index} exceeds {max} in property path '{path}'", max = MAX_INDEX)]
    IndexTooLarge { path: String, index: usize },
    #[error("Unexpected text after index in property path '{0}'")]
    Malformed(String),
}

/// A single step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named property of a mapping.
    Key(String),
    /// Position in a sequence (or a numeric key of a mapping).
    Index(usize),
}

impl PathSegment {
    /// Numeric dot segments within [`MAX_INDEX`] become indices; anything
    /// else, including larger numbers, stays a mapping key.
    fn from_key(key: &str) -> Self {
        let canonical_index = key.bytes().all(|b| b.is_ascii_digit())
            && (key.len() == 1 || !key.starts_with('0'));
        match key.parse::<usize>() {
            Ok(index) if canonical_index && index <= MAX_INDEX => Self::Index(index),
            _ => Self::Key(key.to_string()),
        }
    }

    /// The segment as a mapping key.
    pub fn to_key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }

    fn empty_container(&self) -> Value {
        match self {
            Self::Key(_) => Value::Object(Map::new()),
            Self::Index(_) => Value::Array(Vec::new()),
        }
    }
}

/// A parsed, non-empty property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Parse a dotted path with optional `[n]` indices.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        for part in input.split('.') {
            parse_part(part, input, &mut segments)?;
        }
        Ok(Self { segments })
    }

    /// Path segments, first to last. Never empty.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Read the value at this path.
    pub fn get_in<'a>(&self, props: &'a Map<String, Value>) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = props.get(&first.to_key())?;
        for segment in rest {
            current = match (current, segment) {
                (Value::Array(items), PathSegment::Index(index)) => items.get(*index)?,
                (Value::Object(map), segment) => map.get(&segment.to_key())?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Create or overwrite the value at this path.
    ///
    /// Missing or non-container intermediates are replaced by an array when
    /// the next segment is an index and by a mapping otherwise.
    pub fn set_in(&self, props: &mut Map<String, Value>, value: Value) {
        let Some((first, rest)) = self.segments.split_first() else {
            return;
        };
        let mut slot = props.entry(first.to_key()).or_insert(Value::Null);
        for segment in rest {
            slot = child_slot(slot, segment);
        }
        *slot = value;
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn parse_part(part: &str, input: &str, segments: &mut Vec<PathSegment>) -> Result<(), PathError> {
    let (head, mut rest) = match part.find('[') {
        Some(i) => (&part[..i], &part[i..]),
        None => (part, ""),
    };
    if head.is_empty() && rest.is_empty() {
        return Err(PathError::EmptySegment(input.to_string()));
    }
    if !head.is_empty() {
        segments.push(PathSegment::from_key(head));
    }

    while !rest.is_empty() {
        let inner = rest
            .strip_prefix('[')
            .ok_or_else(|| PathError::Malformed(input.to_string()))?;
        let close = inner
            .find(']')
            .ok_or_else(|| PathError::Unterminated(input.to_string()))?;
        let raw = &inner[..close];
        let index = raw.parse::<usize>().map_err(|_| PathError::InvalidIndex {
            path: input.to_string(),
            index: raw.to_string(),
        })?;
        if index > MAX_INDEX {
            return Err(PathError::IndexTooLarge {
                path: input.to_string(),
                index,
            });
        }
        segments.push(PathSegment::Index(index));
        rest = &inner[close + 1..];
    }
    Ok(())
}

/// Step into `slot` along `segment`, reshaping `slot` if it cannot hold it.
fn child_slot<'a>(slot: &'a mut Value, segment: &PathSegment) -> &'a mut Value {
    match (slot, segment) {
        (Value::Array(items), PathSegment::Index(index)) => {
            if items.len() <= *index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[*index]
        }
        (Value::Object(map), segment) => map.entry(segment.to_key()).or_insert(Value::Null),
        (other, segment) => {
            *other = segment.empty_container();
            child_slot(other, segment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_parse_keys_and_indices() {
        let path = PropertyPath::parse("rows[2].label").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("rows".into()),
                PathSegment::Index(2),
                PathSegment::Key("label".into()),
            ]
        );

        let path = PropertyPath::parse("items.0").unwrap();
        assert_eq!(path.segments()[1], PathSegment::Index(0));

        // Leading zeros are not an index.
        let path = PropertyPath::parse("codes.007").unwrap();
        assert_eq!(path.segments()[1], PathSegment::Key("007".into()));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PropertyPath::parse(""), Err(PathError::Empty));
        assert!(matches!(PropertyPath::parse("a..b"), Err(PathError::EmptySegment(_))));
        assert!(matches!(PropertyPath::parse("a."), Err(PathError::EmptySegment(_))));
        assert!(matches!(PropertyPath::parse("a[1"), Err(PathError::Unterminated(_))));
        assert!(matches!(PropertyPath::parse("a[x]"), Err(PathError::InvalidIndex { .. })));
        assert!(matches!(PropertyPath::parse("a[1]b"), Err(PathError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_oversized_bracket_index() {
        assert!(matches!(
            PropertyPath::parse("rows[18446744073709551615]"),
            Err(PathError::IndexTooLarge { index: usize::MAX, .. })
        ));
        assert!(matches!(
            PropertyPath::parse("rows[10001].label"),
            Err(PathError::IndexTooLarge { .. })
        ));
        // Larger than usize: not a number at all.
        assert!(matches!(
            PropertyPath::parse("rows[99999999999999999999999]"),
            Err(PathError::InvalidIndex { .. })
        ));
        let path = PropertyPath::parse("rows[10000]").unwrap();
        assert_eq!(path.segments()[1], PathSegment::Index(MAX_INDEX));
    }

    #[test]
    fn test_oversized_dot_number_is_a_key() {
        let path = PropertyPath::parse("rows.4000000000").unwrap();
        assert_eq!(path.segments()[1], PathSegment::Key("4000000000".into()));

        let mut map = Map::new();
        path.set_in(&mut map, json!(1));
        assert_eq!(Value::Object(map), json!({ "rows": { "4000000000": 1 } }));
    }

    #[test]
    fn test_display() {
        let path = PropertyPath::parse("table.rows[3][1].cell").unwrap();
        assert_eq!(path.to_string(), "table.rows[3][1].cell");
    }

    #[test]
    fn test_set_creates_intermediate_mappings() {
        let mut map = Map::new();
        PropertyPath::parse("x.y").unwrap().set_in(&mut map, json!(5));
        assert_eq!(Value::Object(map), json!({ "x": { "y": 5 } }));
    }

    #[test]
    fn test_set_creates_arrays_for_indices() {
        let mut map = Map::new();
        PropertyPath::parse("rows[2].label").unwrap().set_in(&mut map, json!("c"));
        assert_eq!(
            Value::Object(map),
            json!({ "rows": [null, null, { "label": "c" }] })
        );
    }

    #[test]
    fn test_set_overwrites_scalar_intermediate() {
        let mut map = props(json!({ "filter": true, "keep": 1 }));
        PropertyPath::parse("filter.open").unwrap().set_in(&mut map, json!(false));
        assert_eq!(
            Value::Object(map),
            json!({ "filter": { "open": false }, "keep": 1 })
        );
    }

    #[test]
    fn test_set_index_on_object_uses_string_key() {
        let mut map = props(json!({ "byId": { "a": 1 } }));
        PropertyPath::parse("byId[0]").unwrap().set_in(&mut map, json!(2));
        assert_eq!(Value::Object(map), json!({ "byId": { "a": 1, "0": 2 } }));
    }

    #[test]
    fn test_set_key_on_array_replaces_it() {
        let mut map = props(json!({ "selected": [1, 2] }));
        PropertyPath::parse("selected.label").unwrap().set_in(&mut map, json!("x"));
        assert_eq!(Value::Object(map), json!({ "selected": { "label": "x" } }));
    }

    #[test]
    fn test_set_within_existing_array() {
        let mut map = props(json!({ "rows": [{ "a": 1 }, { "a": 2 }] }));
        PropertyPath::parse("rows[1].a").unwrap().set_in(&mut map, json!(20));
        assert_eq!(
            Value::Object(map),
            json!({ "rows": [{ "a": 1 }, { "a": 20 }] })
        );
    }

    #[test]
    fn test_get() {
        let map = props(json!({ "rows": [{ "label": "a" }], "pane": { "left": 4 } }));
        let get = |p: &str| PropertyPath::parse(p).unwrap().get_in(&map).cloned();
        assert_eq!(get("rows[0].label"), Some(json!("a")));
        assert_eq!(get("pane.left"), Some(json!(4)));
        assert_eq!(get("pane.top"), None);
        assert_eq!(get("rows[4]"), None);
        assert_eq!(get("pane.left.deeper"), None);
    }
}
