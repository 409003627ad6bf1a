//! Host document primitives: node construction, child insertion and the
//! per-profile capabilities the builder consults.

use crate::types::Node;
use crate::value::Value;
use serde::Deserialize;
use thiserror::Error;

/// Failures raised by the host document while constructing or mutating nodes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("InvalidCharacterError: '{0}' is not a valid name")]
    InvalidCharacter(String),
    #[error("HierarchyRequestError: {parent} cannot have children")]
    HierarchyRequest { parent: String },
    #[error("TypeError: Cannot convert a Symbol value to a string")]
    SymbolToString,
    #[error("TypeError: Cannot set property {property} of <{element}> which has only a getter")]
    ReadOnlyProperty { property: String, element: String },
    #[error("InvalidAccessError: {0}")]
    InvalidAccess(String),
}

/// Which host quirks the produced tree emulates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostProfile {
    /// Every element and fragment accepts children.
    #[default]
    Standard,
    /// Void and `object` elements refuse children, `object` elements carry an
    /// embedded property bag, and `style` elements take appended text as
    /// sheet text instead of a child node.
    Legacy,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Property under which legacy `object` elements expose their embedded object.
pub const EMBEDDED_OBJECT: &str = "object";

/// Property legacy `style` elements expose their sheet text through.
pub const SHEET_TEXT: &str = "cssText";

#[derive(Clone, Copy, Debug, Default)]
pub struct Host {
    profile: HostProfile,
}

impl Host {
    pub fn new(profile: HostProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> HostProfile {
        self.profile
    }

    /// Element factory: an empty tag yields a fragment, a tag starting with
    /// `sentinel` yields a comment, anything else an element.
    pub fn create_node(&self, tag: &str, sentinel: char) -> Result<Node, DomError> {
        if tag.is_empty() {
            return Ok(self.create_fragment());
        }
        if let Some(rest) = tag.strip_prefix(sentinel) {
            let text = if rest.is_empty() {
                String::new()
            } else {
                format!("{rest} ")
            };
            return Ok(self.create_comment(text));
        }
        self.create_element(tag)
    }

    pub fn create_element(&self, name: &str) -> Result<Node, DomError> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidCharacter(name.to_string()));
        }
        let name = name.to_ascii_lowercase();
        let mut properties = Vec::new();
        if self.profile == HostProfile::Legacy && name == "object" {
            properties.push((EMBEDDED_OBJECT.to_string(), Value::Object(Vec::new())));
        }
        Ok(Node::Element {
            name,
            attributes: Vec::new(),
            style: Vec::new(),
            properties,
            children: Vec::new(),
        })
    }

    pub fn create_fragment(&self) -> Node {
        Node::Fragment {
            children: Vec::new(),
        }
    }

    pub fn create_comment(&self, text: impl Into<String>) -> Node {
        Node::Comment { text: text.into() }
    }

    pub fn create_text(&self, text: impl Into<String>) -> Node {
        Node::Text { text: text.into() }
    }

    pub fn can_have_children(&self, node: &Node) -> bool {
        match node {
            Node::Fragment { .. } => true,
            Node::Element { name, .. } => match self.profile {
                HostProfile::Standard => true,
                HostProfile::Legacy => name != "object" && !VOID_ELEMENTS.contains(&name.as_str()),
            },
            Node::Text { .. } | Node::Comment { .. } => false,
        }
    }

    /// Whether `style` elements take appended content as sheet text.
    pub fn takes_sheet_text(&self, node: &Node) -> bool {
        self.profile == HostProfile::Legacy && node.is_element_named("style")
    }

    /// Appends `child` as the last child of `parent`. Fragments are emptied
    /// into `parent` rather than inserted themselves.
    pub fn append_child(&self, parent: &mut Node, child: Node) -> Result<(), DomError> {
        if !self.can_have_children(parent) {
            return Err(DomError::HierarchyRequest {
                parent: parent.label(),
            });
        }
        let Some(children) = parent.children_mut() else {
            return Err(DomError::HierarchyRequest {
                parent: parent.label(),
            });
        };
        match child {
            Node::Fragment {
                children: moved, ..
            } => children.extend(moved),
            child => children.push(child),
        }
        Ok(())
    }
}

/// Name check applied to tag and attribute names (an XML `Name` without
/// the full Unicode range tables).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_name_start(first) && chars.all(is_name_char)
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == ':' || (!ch.is_ascii() && !ch.is_whitespace())
}

fn is_name_char(ch: char) -> bool {
    is_name_start(ch) || ch.is_ascii_digit() || ch == '-' || ch == '.'
}
