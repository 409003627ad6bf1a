use crate::host::{DomError, is_valid_name};
use crate::value::Value;

/// DOM node type codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Fragment = 11,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Fragment {
        children: Vec<Node>,
    },
    Element {
        /// Lowercase local name.
        name: String,
        /// Content attributes in the order they were first set.
        attributes: Vec<(String, String)>,
        /// Parsed inline style declarations.
        style: Vec<(String, String)>,
        /// Properties that live on the element object rather than in
        /// attributes (non-reflected and expando properties).
        properties: Vec<(String, Value)>,
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Fragment { .. } => NodeType::Fragment,
            Node::Element { .. } => NodeType::Element,
            Node::Text { .. } => NodeType::Text,
            Node::Comment { .. } => NodeType::Comment,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn tag_name(&self) -> Option<String> {
        self.name().map(str::to_ascii_uppercase)
    }

    pub fn is_element_named(&self, target: &str) -> bool {
        self.name().is_some_and(|name| name.eq_ignore_ascii_case(target))
    }

    /// Short description used in error messages and mismatch paths.
    pub fn label(&self) -> String {
        match self {
            Node::Fragment { .. } => "#fragment".to_string(),
            Node::Element { name, .. } => format!("<{name}>"),
            Node::Text { .. } => "#text".to_string(),
            Node::Comment { .. } => "#comment".to_string(),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Fragment { children } | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Fragment { children } | Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn into_children(self) -> Vec<Node> {
        match self {
            Node::Fragment { children } | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => Vec::new(),
        }
    }

    pub fn first_child(&self) -> Option<&Node> {
        self.children().first()
    }

    pub fn last_child(&self) -> Option<&Node> {
        self.children().last()
    }

    /// Character data of text and comment nodes.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Text { text } | Node::Comment { text } => Some(text),
            _ => None,
        }
    }

    /// Concatenated descendant text, or the node's own data for character
    /// data nodes.
    pub fn text_content(&self) -> String {
        fn collect(node: &Node, out: &mut String) {
            match node {
                Node::Text { text } => out.push_str(text),
                Node::Comment { .. } => {}
                Node::Fragment { children } | Node::Element { children, .. } => {
                    for c in children {
                        collect(c, out);
                    }
                }
            }
        }
        match self {
            Node::Comment { text } => text.clone(),
            _ => {
                let mut out = String::new();
                collect(self, &mut out);
                out
            }
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Sets a content attribute. Names are lowercased; `style` is parsed into
    /// declarations. Non-elements ignore the call.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), DomError> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidCharacter(name.to_string()));
        }
        let name = name.to_ascii_lowercase();
        if name == "style" {
            self.set_css_text(value);
            return Ok(());
        }
        if let Node::Element { attributes, .. } = self {
            store_attribute(attributes, name, value.to_string());
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, name: &str) {
        if let Node::Element {
            attributes, style, ..
        } = self
        {
            attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            if name.eq_ignore_ascii_case("style") {
                style.clear();
            }
        }
    }

    pub fn style(&self) -> &[(String, String)] {
        match self {
            Node::Element { style, .. } => style,
            _ => &[],
        }
    }

    /// Inline style serialized as `name: value;` pairs.
    pub fn css_text(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.style().iter().enumerate() {
            if i != 0 {
                out.push(' ');
            }
            out.push_str(k);
            out.push_str(": ");
            out.push_str(v);
            out.push(';');
        }
        out
    }

    /// Replaces the inline style wholesale and keeps the `style` attribute in
    /// sync with it.
    pub fn set_css_text(&mut self, css: &str) {
        let declarations = parse_declarations(css);
        if let Node::Element { style, .. } = self {
            *style = declarations;
        }
        let text = self.css_text();
        if let Node::Element { attributes, .. } = self {
            store_attribute(attributes, "style".to_string(), text);
        }
    }

    pub fn own_property(&self, name: &str) -> Option<&Value> {
        match self {
            Node::Element { properties, .. } => properties
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn own_property_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Node::Element { properties, .. } => properties
                .iter_mut()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn set_own_property(&mut self, name: &str, value: Value) {
        if let Node::Element { properties, .. } = self {
            crate::value::insert_entry(properties, name.to_string(), value);
        }
    }

    /// Reads a property the way script would: reflected properties come from
    /// attributes, everything else from the element's own bag.
    pub fn property(&self, name: &str) -> Option<Value> {
        crate::properties::get(self, name)
    }
}

fn store_attribute(attributes: &mut Vec<(String, String)>, name: String, value: String) {
    match attributes.iter_mut().find(|(k, _)| *k == name) {
        Some(slot) => slot.1 = value,
        None => attributes.push((name, value)),
    }
}

fn parse_declarations(css: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for decl in split_declarations(css) {
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        match out.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => out.push((name, value.to_string())),
        }
    }
    out
}

/// Splits on `;` outside quoted strings and parentheses, so values such as
/// `url("a;b")` stay whole.
fn split_declarations(css: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote = None;
    let mut depth = 0usize;
    let mut escaped = false;
    let mut start = 0;
    for (i, ch) in css.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (ch, quote) {
            ('\\', _) => escaped = true,
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'', None) => quote = Some(ch),
            ('(', None) => depth += 1,
            (')', None) => depth = depth.saturating_sub(1),
            (';', None) if depth == 0 => {
                parts.push(&css[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&css[start..]);
    parts
}
