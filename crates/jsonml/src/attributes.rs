//! Attribute objects onto elements.
//!
//! Each key is normalized through the rename table and then routed to one of
//! four paths: inline style, property assignment, boolean attribute, or a
//! plain `setAttribute`. Names registered in the duplicate table receive the
//! same treatment under their legacy alias.

use crate::host::DomError;
use crate::properties;
use crate::types::Node;
use crate::value::{Value, ValueKind};

/// Leading character of framework-internal property names, which always go
/// through property assignment.
pub const INTERNAL_MARKER: char = '$';

const STYLE: &str = "style";

/// Lowercase attribute spelling to the property it is set through.
pub fn canonical_name(lower: &str) -> Option<&'static str> {
    Some(match lower {
        "accesskey" => "accessKey",
        "bgcolor" => "bgColor",
        "cellpadding" => "cellPadding",
        "cellspacing" => "cellSpacing",
        "checked" => "defaultChecked",
        "class" => "className",
        "colspan" => "colSpan",
        "contenteditable" => "contentEditable",
        "defaultchecked" => "defaultChecked",
        "for" => "htmlFor",
        "formnovalidate" => "formNoValidate",
        "hidefocus" => "hideFocus",
        "ismap" => "isMap",
        "maxlength" => "maxLength",
        "novalidate" => "noValidate",
        "readonly" => "readOnly",
        "rowspan" => "rowSpan",
        "spellcheck" => "spellCheck",
        "tabindex" => "tabIndex",
        "usemap" => "useMap",
        "willvalidate" => "willValidate",
        _ => return None,
    })
}

/// Legacy alias that mirrors the value of a canonical name.
pub fn duplicate_name(name: &str) -> Option<&'static str> {
    match name {
        "enctype" => Some("encoding"),
        "onscroll" => Some("DOMMouseScroll"),
        _ => None,
    }
}

/// Names that always take the `setAttribute` path.
pub fn is_dom_only(lower: &str) -> bool {
    matches!(lower, "autocapitalize" | "autocomplete" | "autocorrect")
}

/// Names whose presence, not value, carries the meaning.
pub fn is_boolean(lower: &str) -> bool {
    matches!(
        lower,
        "async"
            | "autofocus"
            | "checked"
            | "defaultchecked"
            | "defer"
            | "disabled"
            | "formnovalidate"
            | "hidden"
            | "indeterminate"
            | "ismap"
            | "multiple"
            | "novalidate"
            | "readonly"
            | "required"
            | "spellcheck"
            | "willvalidate"
    )
}

/// Applies every entry in order. Empty keys are skipped.
pub fn apply_attributes<'a>(
    element: &mut Node,
    attrs: impl IntoIterator<Item = (&'a str, &'a Value)>,
) -> Result<(), DomError> {
    for (key, value) in attrs {
        if key.is_empty() {
            continue;
        }
        apply_attribute(element, key, value)?;
    }
    Ok(())
}

fn apply_attribute(element: &mut Node, key: &str, value: &Value) -> Result<(), DomError> {
    let value = match value.kind() {
        ValueKind::Null => Value::String(String::new()),
        _ => value.clone(),
    };
    let name = canonical_name(&key.to_ascii_lowercase()).unwrap_or(key);
    let lower = name.to_ascii_lowercase();
    let duplicate = duplicate_name(name);

    if name == STYLE {
        let css = value.to_display_string()?;
        if element.css_text().is_empty() {
            element.set_attribute(STYLE, &css)?;
        } else {
            element.set_css_text(&css);
        }
        return Ok(());
    }

    let as_property = !is_dom_only(&lower)
        && (value.kind() != ValueKind::Scalar
            || name.starts_with(INTERNAL_MARKER)
            || properties::exposes(element, name)
            || duplicate.is_some_and(|alias| properties::exposes(element, alias)));

    if as_property {
        log::trace!(target: "jsonml.attributes", "property {name}");
        if let Some(alias) = duplicate {
            properties::set(element, name, value.clone())?;
            properties::set(element, alias, value)
        } else {
            properties::set(element, name, value)
        }
    } else if is_boolean(&lower) {
        // A falsy value leaves any earlier attribute in place.
        if value.is_truthy() {
            element.set_attribute(name, name)?;
            if let Some(alias) = duplicate {
                element.set_attribute(alias, alias)?;
            }
        }
        Ok(())
    } else {
        let text = value.to_display_string()?;
        element.set_attribute(name, &text)?;
        if let Some(alias) = duplicate {
            element.set_attribute(alias, &text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;

    fn apply(tag: &str, attrs: &[(&str, Value)]) -> Result<Node, DomError> {
        let mut element = Host::default().create_element(tag).unwrap();
        apply_attributes(&mut element, attrs.iter().map(|(k, v)| (*k, v)))?;
        Ok(element)
    }

    #[test]
    fn class_goes_through_class_name() {
        let div = apply("div", &[("class", Value::from("test-class"))]).unwrap();
        assert_eq!(div.attr("class"), Some("test-class"));
        assert_eq!(div.property("className"), Some(Value::from("test-class")));
    }

    #[test]
    fn custom_attributes_are_stringified() {
        let span = apply(
            "span",
            &[
                ("data-count", Value::from(3)),
                ("data-nope", Value::Undefined),
                ("data-when", Value::from(false)),
            ],
        )
        .unwrap();
        assert_eq!(span.attr("data-count"), Some("3"));
        assert_eq!(span.attr("data-nope"), Some(""));
        assert_eq!(span.attr("data-when"), Some("false"));
    }

    #[test]
    fn functions_become_properties_not_attributes() {
        let span = apply("span", &[("data-func", Value::function("() => {}"))]).unwrap();
        assert_eq!(span.attr("data-func"), None);
        assert_eq!(span.own_property("data-func"), Some(&Value::function("() => {}")));
    }

    #[test]
    fn boolean_attributes_use_their_own_name() {
        let div = apply(
            "div",
            &[("required", Value::from(1)), ("multiple", Value::from(false))],
        )
        .unwrap();
        assert_eq!(div.attr("required"), Some("required"));
        assert!(!div.has_attribute("multiple"));
    }

    #[test]
    fn falsy_boolean_does_not_clear_earlier_attribute() {
        let mut div = apply("div", &[("required", Value::from(true))]).unwrap();
        let off = Value::from(false);
        apply_attributes(&mut div, [("required", &off)]).unwrap();
        assert_eq!(div.attr("required"), Some("required"));
    }

    #[test]
    fn checked_on_input_reflects_through_default_checked() {
        let input = apply(
            "input",
            &[("type", Value::from("checkbox")), ("checked", Value::from(true))],
        )
        .unwrap();
        assert_eq!(input.attr("type"), Some("checkbox"));
        assert_eq!(input.attr("checked"), Some(""));
        assert_eq!(input.property("defaultChecked"), Some(Value::from(true)));
    }

    #[test]
    fn duplicate_alias_mirrors_attribute() {
        let div = apply("div", &[("enctype", Value::from("multipart/form-data"))]).unwrap();
        assert_eq!(div.attr("enctype"), Some("multipart/form-data"));
        assert_eq!(div.attr("encoding"), Some("multipart/form-data"));
    }

    #[test]
    fn duplicate_alias_mirrors_property() {
        let form = apply("form", &[("enctype", Value::from("text/plain"))]).unwrap();
        assert_eq!(form.property("enctype"), Some(Value::from("text/plain")));
        assert_eq!(form.property("encoding"), Some(Value::from("text/plain")));

        let div = apply("div", &[("onscroll", Value::function("f"))]).unwrap();
        assert_eq!(div.own_property("onscroll"), Some(&Value::function("f")));
        assert_eq!(div.own_property("DOMMouseScroll"), Some(&Value::function("f")));
    }

    #[test]
    fn dom_only_names_skip_property_assignment() {
        let input = apply(
            "input",
            &[("autocomplete", Value::object([("on", Value::from(true))]))],
        )
        .unwrap();
        assert_eq!(input.attr("autocomplete"), Some("[object Object]"));
        assert!(input.own_property("autocomplete").is_none());
    }

    #[test]
    fn internal_marker_forces_property() {
        let div = apply("div", &[("$state", Value::from("ready"))]).unwrap();
        assert_eq!(div.own_property("$state"), Some(&Value::from("ready")));
        assert!(div.attributes().is_empty());
    }

    #[test]
    fn style_is_replaced_wholesale() {
        let mut span = apply("span", &[("style", Value::from("color: red;"))]).unwrap();
        assert_eq!(span.attr("style"), Some("color: red;"));
        let next = Value::from("margin: 0");
        apply_attributes(&mut span, [("STYLE", &next)]).unwrap();
        assert_eq!(span.css_text(), "margin: 0;");
    }

    #[test]
    fn symbol_attribute_value_fails() {
        let err = apply("div", &[("title", Value::symbol("s"))]).unwrap_err();
        assert_eq!(err, DomError::SymbolToString);
    }

    #[test]
    fn empty_keys_are_skipped() {
        let div = apply("div", &[("", Value::from("x"))]).unwrap();
        assert!(div.attributes().is_empty());
    }

    #[test]
    fn unknown_mixed_case_names_are_lowercased_attributes() {
        let div = apply("div", &[("hidefocus", Value::from("x"))]).unwrap();
        assert_eq!(div.attr("hidefocus"), Some("x"));
    }
}
