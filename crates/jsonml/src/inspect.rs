//! Inspector rendering for the reserved attribute key.
//!
//! The value under that key is not set as an attribute. It is rendered as a
//! colored `<span>` appended to the element, one style per value category.

use crate::host::{DomError, Host};
use crate::trim::is_host_whitespace;
use crate::types::Node;
use crate::value::{Value, describe_symbol, format_date, format_number};

const STRING_STYLE: &str = "color: #a11";
const NUMBER_STYLE: &str = "color: #164";
const NULL_STYLE: &str = "color: #708";
const UNDEFINED_STYLE: &str = "color: #777777";

const WRAPPER: &str = "span";

/// Appends the rendering of `value` to `element`. Values with no rendering
/// (booleans) leave the element untouched.
pub fn render_inspected(host: &Host, element: &mut Node, value: &Value) -> Result<(), DomError> {
    match inspected_node(host, value)? {
        Some(wrapper) => host.append_child(element, wrapper),
        None => {
            log::trace!(target: "jsonml.inspect", "no rendering for {value:?}");
            Ok(())
        }
    }
}

fn inspected_node(host: &Host, value: &Value) -> Result<Option<Node>, DomError> {
    let mut wrapper = host.create_element(WRAPPER)?;
    let content = match value {
        Value::String(s) => {
            wrapper.set_css_text(STRING_STYLE);
            host.create_text(format!("\"{}\"", s.trim_matches(is_host_whitespace)))
        }
        Value::Number(n) => {
            wrapper.set_css_text(NUMBER_STYLE);
            host.create_text(format_number(*n))
        }
        Value::Date(at) => {
            let mut group = host.create_fragment();
            host.append_child(&mut group, styled_span(host, "Date: ", NUMBER_STYLE)?)?;
            host.append_child(&mut group, styled_span(host, format_date(at), STRING_STYLE)?)?;
            group
        }
        Value::Null => {
            wrapper.set_css_text(NULL_STYLE);
            host.create_text("null")
        }
        Value::Undefined => {
            wrapper.set_css_text(UNDEFINED_STYLE);
            host.create_text("undefined")
        }
        Value::Array(_) | Value::Object(_) => {
            let json = value.to_json().unwrap_or(serde_json::Value::Null);
            host.create_text(json.to_string())
        }
        Value::Function(f) => host.create_text(f.source()),
        Value::Symbol(description) => host.create_text(describe_symbol(description.as_deref())),
        Value::Bool(_) => return Ok(None),
    };
    host.append_child(&mut wrapper, content)?;
    Ok(Some(wrapper))
}

fn styled_span(host: &Host, text: impl Into<String>, css: &str) -> Result<Node, DomError> {
    let mut span = host.create_element(WRAPPER)?;
    host.append_child(&mut span, host.create_text(text))?;
    span.set_css_text(css);
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn render(value: Value) -> Node {
        let host = Host::default();
        let mut div = host.create_element("div").unwrap();
        render_inspected(&host, &mut div, &value).unwrap();
        div
    }

    fn only_wrapper(div: &Node) -> &Node {
        assert_eq!(div.children().len(), 1, "expected one wrapper in {div:?}");
        let wrapper = &div.children()[0];
        assert_eq!(wrapper.name(), Some("span"));
        wrapper
    }

    #[test]
    fn strings_are_trimmed_and_quoted() {
        let div = render(Value::from("  string "));
        let wrapper = only_wrapper(&div);
        assert_eq!(wrapper.text_content(), "\"string\"");
        assert_eq!(wrapper.css_text(), "color: #a11;");
    }

    #[test]
    fn string_trim_uses_script_whitespace() {
        let div = render(Value::from("\u{feff} a \u{85}"));
        assert_eq!(only_wrapper(&div).text_content(), "\"a \u{85}\"");
    }

    #[test]
    fn scalars_get_their_own_colors() {
        let cases = [
            (Value::from(1), "1", "color: #164;"),
            (Value::Null, "null", "color: #708;"),
            (Value::Undefined, "undefined", "color: #777777;"),
        ];
        for (value, text, css) in cases {
            let div = render(value);
            let wrapper = only_wrapper(&div);
            assert_eq!(wrapper.text_content(), text);
            assert_eq!(wrapper.css_text(), css);
        }
    }

    #[test]
    fn compound_values_render_as_json_without_style() {
        let cases = [
            (Value::Object(Vec::new()), "{}"),
            (Value::Array(vec![Value::from("a"), Value::from(1)]), r#"["a",1]"#),
            (Value::object([("a", Value::from(1))]), r#"{"a":1}"#),
        ];
        for (value, text) in cases {
            let div = render(value);
            let wrapper = only_wrapper(&div);
            assert_eq!(wrapper.text_content(), text);
            assert_eq!(wrapper.css_text(), "");
        }
    }

    #[test]
    fn functions_and_symbols_render_their_source() {
        let div = render(Value::function("(a) => {\n  return a;\n}"));
        assert_eq!(only_wrapper(&div).text_content(), "(a) => {\n  return a;\n}");
        let div = render(Value::symbol("symbol"));
        assert_eq!(only_wrapper(&div).text_content(), "Symbol(symbol)");
        let div = render(Value::Symbol(None));
        assert_eq!(only_wrapper(&div).text_content(), "Symbol()");
    }

    #[test]
    fn dates_render_label_and_value() {
        let at = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap();
        let div = render(Value::date(at));
        let wrapper = only_wrapper(&div);
        assert_eq!(wrapper.css_text(), "");
        assert_eq!(wrapper.children().len(), 2);
        assert_eq!(wrapper.children()[0].text_content(), "Date: ");
        assert_eq!(wrapper.children()[0].css_text(), "color: #164;");
        assert_eq!(
            wrapper.children()[1].text_content(),
            "Wed Jan 01 2025 00:00:00 GMT+0000"
        );
        assert_eq!(wrapper.children()[1].css_text(), "color: #a11;");
        assert_eq!(div.text_content(), "Date: Wed Jan 01 2025 00:00:00 GMT+0000");
    }

    #[test]
    fn booleans_render_nothing() {
        let div = render(Value::from(true));
        assert!(div.children().is_empty());
    }

    #[test]
    fn rendering_is_additive() {
        let host = Host::default();
        let mut div = host.create_element("div").unwrap();
        host.append_child(&mut div, host.create_text("before")).unwrap();
        render_inspected(&host, &mut div, &Value::from(2)).unwrap();
        assert_eq!(div.children().len(), 2);
        assert_eq!(div.text_content(), "before2");
    }
}
