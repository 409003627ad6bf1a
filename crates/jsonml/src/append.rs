//! Child insertion with the host quirks the builder has to respect.

use crate::host::{DomError, EMBEDDED_OBJECT, Host, SHEET_TEXT};
use crate::types::Node;
use crate::value::{Value, insert_entry};

/// Row groups attach directly to a `<table>`; every other element goes into
/// the last header or body group.
const ROW_GROUPS: &[&str] = &["tbody", "tfoot", "thead"];

/// Attaches `child` to `parent`.
///
/// - comments absorb text children into their own data and drop anything else
/// - tables unwrap fragments and route anything but row groups into one
/// - legacy `style` elements take the child's text as sheet text
/// - legacy `object` elements, which refuse children, get a best-effort
///   `param` attachment
pub fn append(host: &Host, parent: &mut Node, child: Node) -> Result<(), DomError> {
    if let Node::Comment { text } = parent {
        match child {
            Node::Text { text: data } => text.push_str(&data),
            other => {
                log::trace!(target: "jsonml.append", "comment drops {}", other.label());
            }
        }
        return Ok(());
    }

    if parent.is_element_named("table") {
        return append_to_table(host, parent, child);
    }

    if host.takes_sheet_text(parent) {
        parent.set_own_property(SHEET_TEXT, Value::String(child.text_content()));
        return Ok(());
    }

    if host.can_have_children(parent) {
        return host.append_child(parent, child);
    }

    if parent.is_element_named("object") && child.is_element_named("param") {
        append_param(host, parent, child);
    } else {
        log::trace!(
            target: "jsonml.append",
            "{} cannot hold {}",
            parent.label(),
            child.label()
        );
    }
    Ok(())
}

fn append_to_table(host: &Host, table: &mut Node, child: Node) -> Result<(), DomError> {
    match child {
        Node::Element { .. } => {}
        Node::Fragment { children } => {
            for grandchild in children {
                append(host, table, grandchild)?;
            }
            return Ok(());
        }
        Node::Text { .. } | Node::Comment { .. } => {
            log::trace!(target: "jsonml.append", "table drops {}", child.label());
            return Ok(());
        }
    }
    let tag = child.name().unwrap_or_default().to_string();

    if ROW_GROUPS.contains(&tag.as_str()) {
        return host.append_child(table, child);
    }

    let group_tag = if tag == "th" { "thead" } else { "tbody" };
    let existing = table
        .children()
        .iter()
        .rposition(|c| c.is_element_named(group_tag));
    let index = match existing {
        Some(index) => index,
        None => {
            host.append_child(table, host.create_element(group_tag)?)?;
            table.children().len() - 1
        }
    };
    match table.children_mut().and_then(|children| children.get_mut(index)) {
        Some(group) => host.append_child(group, child),
        None => Err(DomError::HierarchyRequest {
            parent: table.label(),
        }),
    }
}

/// Two independent attempts; a failure in one does not affect the other.
fn append_param(host: &Host, object: &mut Node, param: Node) {
    if let Err(err) = host.append_child(object, param.clone()) {
        log::debug!(target: "jsonml.append", "param not attached: {err}");
    }
    if let Err(err) = mirror_param(object, &param) {
        log::debug!(target: "jsonml.append", "param not mirrored: {err}");
    }
}

fn mirror_param(object: &mut Node, param: &Node) -> Result<(), DomError> {
    let name = param.attr("name").unwrap_or("");
    let value = param.attr("value").unwrap_or("");
    match object.own_property_mut(EMBEDDED_OBJECT) {
        Some(Value::Object(bag)) => {
            if name.is_empty() {
                return Err(DomError::InvalidAccess(
                    "embedded object rejected an unnamed param".to_string(),
                ));
            }
            insert_entry(bag, name.to_string(), Value::String(value.to_string()));
            Ok(())
        }
        _ => Ok(()),
    }
}
