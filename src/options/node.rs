//! Ordered, heterogeneous configuration trees.
//!
//! Documentation trees are parsed from JSON with key order preserved. Objects
//! become [`OrderedMap`]s with named keys, arrays become maps with positional
//! keys, and everything else is a [`Scalar`]. Order is part of the output
//! contract, so nothing in here iterates an unordered map.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use super::context::ResourceKind;
use super::whitelist::WhitelistDirective;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Named(String),
    Positional(usize),
}

impl Key {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Named(name) => Some(name),
            Key::Positional(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Named(name) => f.write_str(name),
            Key::Positional(index) => write!(f, "{index}"),
        }
    }
}

/// Reserved keys with directive semantics during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Collection,
    Entity,
    Whitelist,
}

impl Tag {
    pub fn of(key: &Key) -> Option<Tag> {
        match key.as_name()? {
            "collection" => Some(Tag::Collection),
            "entity" => Some(Tag::Entity),
            "whitelist" => Some(Tag::Whitelist),
            _ => None,
        }
    }

    pub fn selects(&self, kind: ResourceKind) -> bool {
        matches!(
            (self, kind),
            (Tag::Collection, ResourceKind::Collection) | (Tag::Entity, ResourceKind::Entity)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => n.serialize(serializer),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    Scalar(Scalar),
    Map(OrderedMap),
    Whitelist(WhitelistDirective),
}

impl ConfigNode {
    pub fn string(value: impl Into<String>) -> Self {
        ConfigNode::Scalar(Scalar::String(value.into()))
    }

    pub fn as_map(&self) -> Option<&OrderedMap> {
        match self {
            ConfigNode::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for ConfigNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConfigNode::Scalar(Scalar::Null),
            Value::Bool(b) => ConfigNode::Scalar(Scalar::Bool(b)),
            Value::Number(n) => ConfigNode::Scalar(Scalar::Number(n)),
            Value::String(s) => ConfigNode::Scalar(Scalar::String(s)),
            Value::Array(items) => ConfigNode::Map(items.into_iter().map(ConfigNode::from).collect()),
            Value::Object(object) => {
                let mut map = OrderedMap::new();
                for (key, value) in object {
                    let node = ConfigNode::from(value);
                    let node = match (key.as_str(), node) {
                        // A malformed directive is kept verbatim; it only
                        // fails if a merge actually reaches it.
                        ("whitelist", ConfigNode::Map(inner)) => {
                            match WhitelistDirective::from_map(&inner) {
                                Ok(directive) => ConfigNode::Whitelist(directive),
                                Err(_) => ConfigNode::Map(inner),
                            }
                        }
                        (_, node) => node,
                    };
                    map.insert(key, node);
                }
                ConfigNode::Map(map)
            }
        }
    }
}

impl Serialize for ConfigNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ConfigNode::Scalar(scalar) => scalar.serialize(serializer),
            ConfigNode::Map(map) => map.serialize(serializer),
            ConfigNode::Whitelist(directive) => directive.serialize(serializer),
        }
    }
}

/// Insertion-ordered map keyed by name or position.
///
/// Named keys are unique: inserting an existing name replaces the value in
/// place. Positional entries are append-only and numbered from zero in the
/// order they were pushed.
///
/// A map built from a list keeps rendering as a list (`[]`) when empty;
/// any other empty map renders as `{}`.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap {
    entries: IndexMap<Key, ConfigNode>,
    next_index: usize,
    sequence: bool,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty map that renders as a list.
    pub fn list() -> Self {
        Self {
            sequence: true,
            ..Self::default()
        }
    }

    /// An empty map with the same rendering shape as `self`.
    pub fn empty_like(&self) -> Self {
        Self {
            sequence: self.sequence,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ConfigNode) {
        self.entries.insert(Key::Named(key.into()), value);
    }

    pub fn push(&mut self, value: ConfigNode) {
        self.entries.insert(Key::Positional(self.next_index), value);
        self.next_index += 1;
    }

    /// Append an entry, renumbering positional keys to the next free slot.
    pub fn append(&mut self, key: Key, value: ConfigNode) {
        match key {
            Key::Named(name) => self.insert(name, value),
            Key::Positional(_) => self.push(value),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigNode> {
        self.entries.get(&Key::Named(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, ConfigNode> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, ConfigNode> {
        self.entries.keys()
    }

    /// True when every entry is positional, i.e. the map renders as a list.
    pub fn is_list(&self) -> bool {
        self.entries.keys().all(|k| matches!(k, Key::Positional(_)))
    }
}

impl PartialEq for OrderedMap {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() && other.is_empty() {
            return self.sequence == other.sequence;
        }
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl FromIterator<ConfigNode> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = ConfigNode>>(iter: I) -> Self {
        let mut map = OrderedMap::list();
        for value in iter {
            map.push(value);
        }
        map
    }
}

impl IntoIterator for OrderedMap {
    type Item = (Key, ConfigNode);
    type IntoIter = indexmap::map::IntoIter<Key, ConfigNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a OrderedMap {
    type Item = (&'a Key, &'a ConfigNode);
    type IntoIter = indexmap::map::Iter<'a, Key, ConfigNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for OrderedMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let as_seq = if self.is_empty() {
            self.sequence
        } else {
            self.is_list()
        };
        if as_seq {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for value in self.entries.values() {
                seq.serialize_element(value)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in &self.entries {
                map.serialize_entry(&key.to_string(), value)?;
            }
            map.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(map: &OrderedMap) -> Vec<String> {
        map.keys().map(Key::to_string).collect()
    }

    #[test]
    fn object_order_is_preserved() {
        let node = ConfigNode::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        assert_eq!(names(node.as_map().unwrap()), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn arrays_become_positional_maps() {
        let node = ConfigNode::from(json!(["a", "b"]));
        let map = node.as_map().unwrap();
        assert!(map.is_list());
        assert_eq!(
            map.keys().cloned().collect::<Vec<_>>(),
            [Key::Positional(0), Key::Positional(1)]
        );
    }

    #[test]
    fn named_insert_overwrites_in_place() {
        let mut map = OrderedMap::new();
        map.insert("a", ConfigNode::string("1"));
        map.insert("b", ConfigNode::string("2"));
        map.insert("a", ConfigNode::string("3"));
        assert_eq!(names(&map), ["a", "b"]);
        assert_eq!(map.get("a").and_then(ConfigNode::as_str), Some("3"));
    }

    #[test]
    fn well_formed_whitelist_is_typed() {
        let node = ConfigNode::from(json!({
            "whitelist": {"name": "columns", "exclude": ["sort"], "append": []}
        }));
        assert!(matches!(
            node.as_map().unwrap().get("whitelist"),
            Some(ConfigNode::Whitelist(_))
        ));
    }

    #[test]
    fn malformed_whitelist_is_kept_verbatim() {
        let node = ConfigNode::from(json!({"whitelist": {"name": "columns"}}));
        assert!(matches!(
            node.as_map().unwrap().get("whitelist"),
            Some(ConfigNode::Map(_))
        ));
    }

    #[test]
    fn serializes_lists_and_mixed_maps() {
        let mut map = OrderedMap::new();
        map.insert("name", ConfigNode::string("x"));
        map.push(ConfigNode::string("y"));
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"name":"x","0":"y"}"#);

        let list: OrderedMap = vec![ConfigNode::string("a")].into_iter().collect();
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a"]"#);
        assert_eq!(serde_json::to_string(&OrderedMap::new()).unwrap(), "{}");
    }

    #[test]
    fn empty_maps_keep_their_source_shape() {
        let node = ConfigNode::from(json!({"list": [], "object": {}}));
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"list":[],"object":{}}"#
        );
        assert_eq!(
            serde_json::to_string(&OrderedMap::new().empty_like()).unwrap(),
            "{}"
        );
        assert_eq!(
            serde_json::to_string(&OrderedMap::list().empty_like()).unwrap(),
            "[]"
        );
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = ConfigNode::from(json!({"x": 1, "y": 2}));
        let b = ConfigNode::from(json!({"y": 2, "x": 1}));
        assert_ne!(a, b);
    }
}
