use indexmap::IndexSet;
use serde::Serialize;

use super::error::OptionsError;
use super::node::{ConfigNode, OrderedMap};

/// Filter name always offered alongside the whitelist for pagination.
pub const PAGINATION_TOKEN: &str = "skip";

/// The value of a `whitelist` key: renames the resource's query whitelist and
/// adjusts its contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhitelistDirective {
    pub name: String,
    pub exclude: IndexSet<String>,
    pub append: Vec<String>,
}

impl WhitelistDirective {
    pub fn new<E, A>(name: impl Into<String>, exclude: E, append: A) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            name: name.into(),
            exclude: exclude.into_iter().map(Into::into).collect(),
            append: append.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_map(map: &OrderedMap) -> Result<Self, OptionsError> {
        let name = match map.get("name") {
            Some(node) => node
                .as_str()
                .ok_or_else(|| OptionsError::malformed("'name' must be a string"))?,
            None => return Err(OptionsError::malformed("missing 'name'")),
        };
        let exclude = string_list(map, "exclude")?;
        let append = string_list(map, "append")?;
        Ok(Self::new(name, exclude, append))
    }

    /// The final filter list: base followed by `append` and the pagination
    /// token, with every excluded entry removed. Duplicates are kept.
    pub fn expand(&self, base: &[String]) -> Vec<String> {
        base.iter()
            .chain(self.append.iter())
            .map(String::as_str)
            .chain(std::iter::once(PAGINATION_TOKEN))
            .filter(|field| !self.exclude.contains(*field))
            .map(str::to_string)
            .collect()
    }

    /// The expansion as a single entry keyed by the directive's display name.
    pub fn expansion(&self, base: &[String]) -> OrderedMap {
        let mut map = OrderedMap::new();
        map.insert(
            self.name.clone(),
            ConfigNode::Map(self.expand(base).into_iter().map(ConfigNode::string).collect()),
        );
        map
    }
}

fn string_list(map: &OrderedMap, field: &str) -> Result<Vec<String>, OptionsError> {
    let list = match map.get(field) {
        Some(ConfigNode::Map(list)) => list,
        Some(_) => return Err(OptionsError::malformed(format!("'{field}' must be a list"))),
        None => return Err(OptionsError::malformed(format!("missing '{field}'"))),
    };
    list.iter()
        .map(|(_, node)| {
            node.as_str()
                .map(str::to_string)
                .ok_or_else(|| OptionsError::malformed(format!("'{field}' entries must be strings")))
        })
        .collect()
}
