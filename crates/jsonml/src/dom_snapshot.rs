use crate::types::Node;
use crate::value::{Value, describe_symbol};
use std::fmt::{self, Write};
use std::sync::OnceLock;

/// Deterministic serialization and equality rules for built trees.
/// Not a public stable format; intended for test comparisons.
///
/// Equivalence rules:
/// - Node kinds must match.
/// - Element names must match.
/// - Attribute order is significant; names and values must match.
/// - Text and comment data must match exactly.
/// - Own properties are compared in order unless ignored by options.
/// - Parsed style entries are only compared when requested; the `style`
///   attribute already carries them.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomSnapshotOptions {
    pub ignore_properties: bool,
    pub include_style: bool,
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(root: &Node, options: DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(root, &options, 0, &mut lines);
        Self { lines }
    }

    /// Snapshot of an optional build result; `None` renders as `#none`.
    pub fn of(root: Option<&Node>, options: DomSnapshotOptions) -> Self {
        match root {
            Some(root) => Self::new(root, options),
            None => Self {
                lines: vec!["#none".to_string()],
            },
        }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug)]
pub struct DomMismatch<'a> {
    path: String,
    detail: String,
    expected: String,
    actual: String,
    expected_node: &'a Node,
    actual_node: &'a Node,
    options: DomSnapshotOptions,
    expected_subtree: OnceLock<String>,
    actual_subtree: OnceLock<String>,
}

impl DomMismatch<'_> {
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for DomMismatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected_subtree = self
            .expected_subtree
            .get_or_init(|| DomSnapshot::new(self.expected_node, self.options).render());
        let actual_subtree = self
            .actual_subtree
            .get_or_init(|| DomSnapshot::new(self.actual_node, self.options).render());
        writeln!(f, "DOM mismatch at {}: {}", self.path, self.detail)?;
        writeln!(f, "expected: {}", self.expected)?;
        writeln!(f, "actual:   {}", self.actual)?;
        writeln!(f, "expected subtree:\n{}", expected_subtree)?;
        writeln!(f, "actual subtree:\n{}", actual_subtree)?;
        Ok(())
    }
}

impl std::error::Error for DomMismatch<'_> {}

pub fn assert_dom_eq(expected: &Node, actual: &Node, options: DomSnapshotOptions) {
    if let Err(mismatch) = compare_dom(expected, actual, options) {
        panic!("{mismatch}");
    }
}

pub fn compare_dom<'a>(
    expected: &'a Node,
    actual: &'a Node,
    options: DomSnapshotOptions,
) -> Result<(), Box<DomMismatch<'a>>> {
    let mut path = vec![node_label(expected)];
    compare_nodes(expected, actual, &options, &mut path)
}

fn compare_nodes<'a>(
    expected: &'a Node,
    actual: &'a Node,
    options: &DomSnapshotOptions,
    path: &mut Vec<String>,
) -> Result<(), Box<DomMismatch<'a>>> {
    let fail = |path: &[String], detail: &str| -> Result<(), Box<DomMismatch<'a>>> {
        Err(Box::new(mismatch(path, detail, expected, actual, options)))
    };
    match (expected, actual) {
        (
            Node::Fragment {
                children: expected_children,
            },
            Node::Fragment {
                children: actual_children,
            },
        ) => compare_children(expected, actual, expected_children, actual_children, options, path),
        (
            Node::Element {
                name: expected_name,
                attributes: expected_attrs,
                style: expected_style,
                properties: expected_props,
                children: expected_children,
            },
            Node::Element {
                name: actual_name,
                attributes: actual_attrs,
                style: actual_style,
                properties: actual_props,
                children: actual_children,
            },
        ) => {
            if expected_name != actual_name {
                return fail(path, "element name");
            }
            if expected_attrs.len() != actual_attrs.len() {
                return fail(path, "attribute count");
            }
            for (i, (exp, act)) in expected_attrs.iter().zip(actual_attrs).enumerate() {
                if exp.0 != act.0 {
                    return fail(path, &format!("attribute name at index {i}"));
                }
                if exp.1 != act.1 {
                    return fail(path, &format!("attribute value at index {i}"));
                }
            }
            if options.include_style && expected_style != actual_style {
                return fail(path, "style entries");
            }
            if !options.ignore_properties {
                if expected_props.len() != actual_props.len() {
                    return fail(path, "property count");
                }
                for (i, (exp, act)) in expected_props.iter().zip(actual_props).enumerate() {
                    if exp != act {
                        return fail(path, &format!("property at index {i}"));
                    }
                }
            }
            compare_children(expected, actual, expected_children, actual_children, options, path)
        }
        (
            Node::Text {
                text: expected_text,
            },
            Node::Text { text: actual_text },
        ) => {
            if expected_text != actual_text {
                return fail(path, "text");
            }
            Ok(())
        }
        (
            Node::Comment {
                text: expected_text,
            },
            Node::Comment { text: actual_text },
        ) => {
            if expected_text != actual_text {
                return fail(path, "comment");
            }
            Ok(())
        }
        _ => fail(path, "node kind"),
    }
}

fn compare_children<'a>(
    expected_parent: &'a Node,
    actual_parent: &'a Node,
    expected: &'a [Node],
    actual: &'a [Node],
    options: &DomSnapshotOptions,
    path: &mut Vec<String>,
) -> Result<(), Box<DomMismatch<'a>>> {
    if expected.len() != actual.len() {
        return Err(Box::new(mismatch(
            path,
            &format!(
                "child count (expected {}, actual {})",
                expected.len(),
                actual.len()
            ),
            expected_parent,
            actual_parent,
            options,
        )));
    }
    for (idx, (exp, act)) in expected.iter().zip(actual.iter()).enumerate() {
        path.push(format!("{}[{}]", node_label(exp), idx));
        let result = compare_nodes(exp, act, options, path);
        path.pop();
        result?;
    }
    Ok(())
}

fn mismatch<'a>(
    path: &[String],
    detail: &str,
    expected: &'a Node,
    actual: &'a Node,
    options: &DomSnapshotOptions,
) -> DomMismatch<'a> {
    DomMismatch {
        path: format!("/{}", path.join("/")),
        detail: detail.to_string(),
        expected: truncate_line(format_node_line(expected, options), 160),
        actual: truncate_line(format_node_line(actual, options), 160),
        expected_node: expected,
        actual_node: actual,
        options: *options,
        expected_subtree: OnceLock::new(),
        actual_subtree: OnceLock::new(),
    }
}

fn node_label(node: &Node) -> String {
    match node {
        Node::Element { name, .. } => {
            let mut label = name.clone();
            if let Some(id) = node.attr("id").filter(|v| !v.is_empty()) {
                label.push('#');
                write_escaped(&mut label, id);
            } else if let Some(class) = node.attr("class").filter(|v| !v.is_empty()) {
                label.push_str(".class=");
                write_escaped(&mut label, class);
            }
            label
        }
        other => other.label(),
    }
}

fn truncate_line(mut line: String, max_len: usize) -> String {
    if line.len() > max_len {
        let mut cut = max_len.saturating_sub(3);
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
        line.push_str("...");
    }
    line
}

fn walk_snapshot(node: &Node, options: &DomSnapshotOptions, depth: usize, out: &mut Vec<String>) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(depth.saturating_mul(INDENT_STEP));
    write_node_line(&mut line, node, options);
    out.push(line);
    for child in node.children() {
        walk_snapshot(child, options, depth + 1, out);
    }
}

fn format_node_line(node: &Node, options: &DomSnapshotOptions) -> String {
    let mut line = String::new();
    write_node_line(&mut line, node, options);
    line
}

fn write_node_line(out: &mut String, node: &Node, options: &DomSnapshotOptions) {
    match node {
        Node::Fragment { .. } => out.push_str("#fragment"),
        Node::Element {
            name,
            attributes,
            style,
            properties,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (attr, value) in attributes {
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                write_escaped(out, value);
                out.push('"');
            }
            if !options.ignore_properties {
                for (prop, value) in properties {
                    out.push_str(" .");
                    out.push_str(prop);
                    out.push('=');
                    write_escaped(out, &format_value(value));
                }
            }
            if options.include_style && !style.is_empty() {
                out.push_str(" style=[");
                for (i, (k, v)) in style.iter().enumerate() {
                    if i != 0 {
                        out.push_str("; ");
                    }
                    out.push_str(k);
                    out.push_str(": ");
                    write_escaped(out, v);
                }
                out.push(']');
            }
            out.push('>');
        }
        Node::Text { text } => {
            out.push('"');
            write_escaped(out, text);
            out.push('"');
        }
        Node::Comment { text } => {
            out.push_str("<!-- ");
            write_escaped(out, text);
            out.push_str(" -->");
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Function(f) => format!("fn[{}]", f.source()),
        Value::Symbol(description) => describe_symbol(description.as_deref()),
        other => other
            .to_json()
            .map(|json| json.to_string())
            .unwrap_or_else(|| format!("{other:?}")),
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}
