//! Context-aware rewrite of documentation trees.
//!
//! Entries are visited depth-first in declaration order. `collection` and
//! `entity` branches are spliced inline when they match the request's
//! resource kind and dropped with their whole subtree otherwise. `whitelist`
//! branches are replaced by their expansion, which is then walked like any
//! other entry. Everything else is copied, with
//! nested maps rewritten recursively.

use std::borrow::Cow;
use std::collections::VecDeque;

use tracing::debug;

use super::context::ResourceKind;
use super::error::OptionsError;
use super::node::{ConfigNode, Key, OrderedMap, Tag};
use super::whitelist::WhitelistDirective;

type Pending<'t> = VecDeque<(Cow<'t, Key>, Cow<'t, ConfigNode>)>;

pub struct Merger<'a> {
    kind: ResourceKind,
    base_whitelist: &'a [String],
}

impl<'a> Merger<'a> {
    pub fn new(kind: ResourceKind, base_whitelist: &'a [String]) -> Self {
        Self {
            kind,
            base_whitelist,
        }
    }

    pub fn merge(&self, tree: &OrderedMap) -> Result<OrderedMap, OptionsError> {
        let mut pending: Pending<'_> = tree
            .iter()
            .map(|(key, node)| (Cow::Borrowed(key), Cow::Borrowed(node)))
            .collect();
        let mut merged = tree.empty_like();

        while let Some((key, node)) = pending.pop_front() {
            match Tag::of(&key) {
                Some(Tag::Whitelist) => {
                    // The expansion is walked again, so a display name that
                    // is itself a tag never reaches the output literally.
                    let expansion = directive_of(&node)?.expansion(self.base_whitelist);
                    for (name, list) in expansion.into_iter().rev() {
                        pending.push_front((Cow::Owned(name), Cow::Owned(list)));
                    }
                }
                Some(tag) if tag.selects(self.kind) && node.as_map().is_some() => {
                    splice(&mut pending, node);
                }
                Some(_) => {
                    debug!(branch = %key, kind = %self.kind, "Dropping non-matching branch");
                }
                None => {
                    let value = match node.as_ref() {
                        ConfigNode::Map(inner) => ConfigNode::Map(self.merge(inner)?),
                        ConfigNode::Whitelist(_) => {
                            return Err(OptionsError::malformed(format!(
                                "directive under '{key}' must be keyed 'whitelist'"
                            )))
                        }
                        ConfigNode::Scalar(_) => node.into_owned(),
                    };
                    merged.append(key.into_owned(), value);
                }
            }
        }

        Ok(merged)
    }
}

/// Put the entries of `branch` in front of the remaining siblings, in order.
fn splice<'t>(pending: &mut Pending<'t>, branch: Cow<'t, ConfigNode>) {
    match branch {
        Cow::Borrowed(ConfigNode::Map(inner)) => {
            for (key, node) in inner.iter().rev() {
                pending.push_front((Cow::Borrowed(key), Cow::Borrowed(node)));
            }
        }
        Cow::Owned(ConfigNode::Map(inner)) => {
            for (key, node) in inner.into_iter().rev() {
                pending.push_front((Cow::Owned(key), Cow::Owned(node)));
            }
        }
        _ => {}
    }
}

fn directive_of(node: &ConfigNode) -> Result<WhitelistDirective, OptionsError> {
    match node {
        ConfigNode::Whitelist(directive) => Ok(directive.clone()),
        ConfigNode::Map(map) => WhitelistDirective::from_map(map),
        ConfigNode::Scalar(_) => Err(OptionsError::malformed("value must be an object")),
    }
}
