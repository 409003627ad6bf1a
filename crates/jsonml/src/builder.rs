//! JsonML to DOM tree builder.
//!
//! Contract:
//! - Falsy input builds nothing; a string builds one text node, verbatim.
//! - Anything else must be an array whose first item is a string tag name.
//!   An empty tag name means "list of sibling roots" and builds a fragment,
//!   collapsed to its only child when exactly one survives trimming.
//! - Recursion shares a single error boundary: the first failure anywhere
//!   discards the whole tree and the public entry points return one
//!   diagnostic text node `[<error>]` instead.
//! - The optional filter sees every root-level node (a top-level element or
//!   each root of a top-level fragment) and may replace or drop it.

use crate::append::append;
use crate::attributes::apply_attributes;
use crate::host::{DomError, Host, HostProfile};
use crate::inspect::render_inspected;
use crate::trim::trim_whitespace;
use crate::types::{Node, NodeType};
use crate::value::Value;
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Host quirks the produced tree follows.
    pub host: HostProfile,
    /// Attribute key rendered through the inspector instead of being set.
    pub inspect_key: String,
    /// Tag-name prefix that turns a node into a comment.
    pub comment_sentinel: char,
    /// Deepest nesting accepted before the build fails.
    pub max_depth: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            host: HostProfile::Standard,
            inspect_key: "object".to_string(),
            comment_sentinel: '!',
            max_depth: 512,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("SyntaxError: invalid JsonML")]
    InvalidStructure,
    #[error("RangeError: JsonML nested deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error(transparent)]
    Dom(#[from] DomError),
}

pub type BuildResult = Result<Option<Node>, BuildError>;

/// Post-build transform; returning `None` drops the node.
pub type Filter<'a> = &'a dyn Fn(Node) -> Option<Node>;

#[derive(Clone, Debug, Default)]
pub struct Builder {
    config: BuilderConfig,
    host: Host,
}

impl Builder {
    pub fn new(config: BuilderConfig) -> Self {
        let host = Host::new(config.host);
        Self { config, host }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Builds `jml`, converting any failure into a diagnostic node.
    pub fn build(&self, jml: &Value) -> Option<Node> {
        self.guarded(jml, None)
    }

    pub fn build_filtered(&self, jml: &Value, filter: Filter<'_>) -> Option<Node> {
        self.guarded(jml, Some(filter))
    }

    /// Builds `jml` without the error boundary.
    pub fn try_build(&self, jml: &Value, filter: Option<Filter<'_>>) -> BuildResult {
        self.build_node(jml, filter, 0)
    }

    fn guarded(&self, jml: &Value, filter: Option<Filter<'_>>) -> Option<Node> {
        match self.try_build(jml, filter) {
            Ok(node) => node,
            Err(err) => {
                log::debug!(target: "jsonml.builder", "build failed: {err}");
                Some(on_error(&err))
            }
        }
    }

    fn build_node(&self, jml: &Value, filter: Option<Filter<'_>>, depth: usize) -> BuildResult {
        if !jml.is_truthy() {
            return Ok(None);
        }
        if depth > self.config.max_depth {
            return Err(BuildError::TooDeep {
                limit: self.config.max_depth,
            });
        }
        let items = match jml {
            Value::String(text) => return Ok(Some(self.host.create_text(text.as_str()))),
            Value::Array(items) => items,
            _ => return Err(BuildError::InvalidStructure),
        };
        let Some(Value::String(tag)) = items.first() else {
            return Err(BuildError::InvalidStructure);
        };
        let rest = &items[1..];

        if tag.is_empty() {
            return self.build_fragment(rest, filter, depth);
        }

        log::trace!(target: "jsonml.builder", "build {tag:?} with {} items", rest.len());
        let mut node = self.host.create_node(tag, self.config.comment_sentinel)?;
        self.patch(&mut node, rest, depth)?;
        trim_whitespace(&mut node);
        Ok(match filter {
            Some(filter) => filter(node),
            None => Some(node),
        })
    }

    fn build_fragment(&self, roots: &[Value], filter: Option<Filter<'_>>, depth: usize) -> BuildResult {
        let mut fragment = self.host.create_fragment();
        for root in roots {
            if let Some(child) = self.build_node(root, filter, depth + 1)? {
                append(&self.host, &mut fragment, child)?;
            }
        }
        trim_whitespace(&mut fragment);

        if fragment.children().len() == 1 {
            return Ok(fragment.into_children().pop());
        }
        Ok(Some(fragment))
    }

    /// Appends children and applies attribute objects found after the tag.
    fn patch(&self, node: &mut Node, items: &[Value], depth: usize) -> Result<(), BuildError> {
        for item in items {
            match item {
                Value::Array(_) | Value::String(_) => {
                    if let Some(child) = self.build_node(item, None, depth + 1)? {
                        append(&self.host, node, child)?;
                    }
                }
                Value::Object(entries) if node.node_type() == NodeType::Element => {
                    self.apply_attribute_object(node, entries)?;
                }
                _ => {
                    log::trace!(target: "jsonml.builder", "ignoring {item:?} under {}", node.label());
                }
            }
        }
        Ok(())
    }

    fn apply_attribute_object(&self, node: &mut Node, entries: &[(String, Value)]) -> Result<(), BuildError> {
        let key = self.config.inspect_key.as_str();
        let inspected = entries.iter().find(|(k, _)| k == key).map(|(_, v)| v);
        apply_attributes(
            node,
            entries
                .iter()
                .filter(|(k, _)| k != key)
                .map(|(k, v)| (k.as_str(), v)),
        )?;
        if let Some(value) = inspected {
            render_inspected(&self.host, node, value)?;
        }
        Ok(())
    }
}

/// Diagnostic node standing in for a failed build.
pub fn on_error(err: &BuildError) -> Node {
    Node::Text {
        text: format!("[{err}]"),
    }
}

/// Builds `jml` with the default configuration.
pub fn to_dom(jml: &Value) -> Option<Node> {
    Builder::default().build(jml)
}

pub fn to_dom_filtered(jml: &Value, filter: Filter<'_>) -> Option<Node> {
    Builder::default().build_filtered(jml, filter)
}
