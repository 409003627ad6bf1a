//! Element property capabilities.
//!
//! A static stand-in for the IDL interfaces of HTML elements: which
//! properties an element type exposes, and how assigning one lands on the
//! element (reflected into a content attribute, kept on the object, or
//! rejected). The attribute applier asks this table instead of probing.

use crate::host::DomError;
use crate::types::Node;
use crate::value::{Value, ValueKind};

/// Value a non-reflected property reads as before it is assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Initial {
    Str(&'static str),
    Bool(bool),
}

impl Initial {
    fn to_value(self) -> Value {
        match self {
            Initial::Str(s) => Value::String(s.to_string()),
            Initial::Bool(b) => Value::Bool(b),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Mirrors the named content attribute as a string.
    Reflect(&'static str),
    /// Mirrors the named attribute's presence.
    ReflectBool(&'static str),
    /// Mirrors the named attribute as an integer, with its missing-value default.
    ReflectLong(&'static str, i32),
    /// Stored on the element object only.
    Plain(Initial),
    /// Getter without a setter.
    ReadOnly(Initial),
    /// Replaces the children with a single text node.
    TextContent,
}

#[derive(Debug)]
pub struct PropertyDef {
    pub name: &'static str,
    /// Empty means every element.
    pub tags: &'static [&'static str],
    pub kind: PropertyKind,
}

const fn def(
    name: &'static str,
    tags: &'static [&'static str],
    kind: PropertyKind,
) -> PropertyDef {
    PropertyDef { name, tags, kind }
}

use Initial::{Bool, Str};
use PropertyKind::{Plain, ReadOnly, Reflect, ReflectBool, ReflectLong, TextContent};

const GLOBAL: &[&str] = &[];
const FORM_CONTROLS: &[&str] = &["button", "fieldset", "input", "object", "output", "select", "textarea"];
const DISABLEABLE: &[&str] = &["button", "fieldset", "input", "optgroup", "option", "select", "textarea"];
const NAMED: &[&str] = &[
    "a", "button", "fieldset", "form", "iframe", "img", "input", "map", "meta", "object", "output",
    "param", "select", "textarea",
];
const TYPED: &[&str] = &["a", "button", "embed", "link", "object", "ol", "script", "source", "style"];
const SOURCED: &[&str] = &["audio", "embed", "iframe", "img", "input", "script", "source", "track", "video"];
const SIZED: &[&str] = &["canvas", "embed", "iframe", "img", "object", "video"];
const LINKED: &[&str] = &["a", "area", "base", "link"];
const CELLS: &[&str] = &["td", "th"];
const MEDIA: &[&str] = &["audio", "video"];
const TEXT_ENTRY: &[&str] = &["input", "textarea"];
const REQUIRABLE: &[&str] = &["input", "select", "textarea"];

static PROPERTIES: &[PropertyDef] = &[
    // HTMLElement
    def("id", GLOBAL, Reflect("id")),
    def("className", GLOBAL, Reflect("class")),
    def("title", GLOBAL, Reflect("title")),
    def("lang", GLOBAL, Reflect("lang")),
    def("dir", GLOBAL, Reflect("dir")),
    def("accessKey", GLOBAL, Reflect("accesskey")),
    def("hidden", GLOBAL, ReflectBool("hidden")),
    def("autofocus", GLOBAL, ReflectBool("autofocus")),
    def("tabIndex", GLOBAL, ReflectLong("tabindex", -1)),
    def("contentEditable", GLOBAL, Reflect("contenteditable")),
    def("draggable", GLOBAL, Plain(Bool(false))),
    def("spellcheck", GLOBAL, Plain(Bool(true))),
    def("textContent", GLOBAL, TextContent),
    // forms and controls
    def("name", NAMED, Reflect("name")),
    def("disabled", DISABLEABLE, ReflectBool("disabled")),
    def("willValidate", FORM_CONTROLS, ReadOnly(Bool(true))),
    def("required", REQUIRABLE, ReflectBool("required")),
    def("readOnly", TEXT_ENTRY, ReflectBool("readonly")),
    def("maxLength", TEXT_ENTRY, ReflectLong("maxlength", -1)),
    def("placeholder", TEXT_ENTRY, Reflect("placeholder")),
    def("value", &["input", "select", "textarea"], Plain(Str(""))),
    def("value", &["button", "data", "option", "param"], Reflect("value")),
    def("value", &["li"], ReflectLong("value", 0)),
    def("defaultValue", &["input"], Reflect("value")),
    def("type", &["input"], Reflect("type")),
    def("type", TYPED, Reflect("type")),
    def("checked", &["input"], Plain(Bool(false))),
    def("defaultChecked", &["input"], ReflectBool("checked")),
    def("indeterminate", &["input"], Plain(Bool(false))),
    def("multiple", &["input", "select"], ReflectBool("multiple")),
    def("formNoValidate", &["button", "input"], ReflectBool("formnovalidate")),
    def("size", &["input", "select"], ReflectLong("size", 0)),
    def("min", &["input"], Reflect("min")),
    def("max", &["input"], Reflect("max")),
    def("step", &["input"], Reflect("step")),
    def("pattern", &["input"], Reflect("pattern")),
    def("rows", &["textarea"], ReflectLong("rows", 2)),
    def("cols", &["textarea"], ReflectLong("cols", 20)),
    def("selected", &["option"], Plain(Bool(false))),
    def("defaultSelected", &["option"], ReflectBool("selected")),
    def("label", &["optgroup", "option", "track"], Reflect("label")),
    def("action", &["form"], Reflect("action")),
    def("method", &["form"], Reflect("method")),
    def("enctype", &["form"], Reflect("enctype")),
    def("encoding", &["form"], Reflect("enctype")),
    def("target", &["a", "area", "base", "form"], Reflect("target")),
    def("noValidate", &["form"], ReflectBool("novalidate")),
    def("acceptCharset", &["form"], Reflect("accept-charset")),
    def("htmlFor", &["label"], Reflect("for")),
    // links and embedded content
    def("href", LINKED, Reflect("href")),
    def("rel", &["a", "area", "link"], Reflect("rel")),
    def("media", &["link", "source", "style"], Reflect("media")),
    def("hreflang", &["a", "link"], Reflect("hreflang")),
    def("download", &["a", "area"], Reflect("download")),
    def("src", SOURCED, Reflect("src")),
    def("alt", &["area", "img", "input"], Reflect("alt")),
    def("width", SIZED, ReflectLong("width", 0)),
    def("height", SIZED, ReflectLong("height", 0)),
    def("isMap", &["img"], ReflectBool("ismap")),
    def("useMap", &["img", "input", "object"], Reflect("usemap")),
    def("data", &["object"], Reflect("data")),
    def("async", &["script"], ReflectBool("async")),
    def("defer", &["script"], ReflectBool("defer")),
    def("charset", &["script"], Reflect("charset")),
    def("content", &["meta"], Reflect("content")),
    def("httpEquiv", &["meta"], Reflect("http-equiv")),
    def("autoplay", MEDIA, ReflectBool("autoplay")),
    def("controls", MEDIA, ReflectBool("controls")),
    def("loop", MEDIA, ReflectBool("loop")),
    def("muted", MEDIA, Plain(Bool(false))),
    // tables
    def("border", &["table"], Reflect("border")),
    def("summary", &["table"], Reflect("summary")),
    def("cellPadding", &["table"], Reflect("cellpadding")),
    def("cellSpacing", &["table"], Reflect("cellspacing")),
    def("bgColor", &["body", "table", "td", "th", "tr"], Reflect("bgcolor")),
    def("colSpan", CELLS, ReflectLong("colspan", 1)),
    def("rowSpan", CELLS, ReflectLong("rowspan", 1)),
    def("headers", CELLS, Reflect("headers")),
    def("span", &["col", "colgroup"], ReflectLong("span", 1)),
    // lists and interactive elements
    def("start", &["ol"], ReflectLong("start", 1)),
    def("reversed", &["ol"], ReflectBool("reversed")),
    def("open", &["details", "dialog"], ReflectBool("open")),
];

pub fn lookup(tag: &str, name: &str) -> Option<&'static PropertyDef> {
    PROPERTIES
        .iter()
        .find(|d| d.name == name && (d.tags.is_empty() || d.tags.contains(&tag)))
}

/// Whether `element` exposes `name` with a non-null current value: either
/// its type declares the property or an earlier assignment left one behind.
pub fn exposes(element: &Node, name: &str) -> bool {
    let Some(tag) = element.name() else {
        return false;
    };
    lookup(tag, name).is_some()
        || element
            .own_property(name)
            .is_some_and(|v| v.kind() != ValueKind::Null)
}

/// Assigns a property on `element` the way script assignment would.
pub fn set(element: &mut Node, name: &str, value: Value) -> Result<(), DomError> {
    let Some(tag) = element.name() else {
        return Ok(());
    };
    let Some(def) = lookup(tag, name) else {
        log::trace!(target: "jsonml.properties", "expando {name} on <{tag}>");
        element.set_own_property(name, value);
        return Ok(());
    };
    match def.kind {
        Reflect(attr) => element.set_attribute(attr, &value.to_display_string()?),
        ReflectBool(attr) => {
            if value.is_truthy() {
                element.set_attribute(attr, "")
            } else {
                element.remove_attribute(attr);
                Ok(())
            }
        }
        ReflectLong(attr, _) => {
            let n = value.to_number();
            let n = if n.is_finite() {
                n.trunc().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
            } else {
                0
            };
            element.set_attribute(attr, &n.to_string())
        }
        Plain(_) => {
            element.set_own_property(name, value);
            Ok(())
        }
        ReadOnly(_) => Err(DomError::ReadOnlyProperty {
            property: name.to_string(),
            element: tag.to_string(),
        }),
        TextContent => {
            let text = value.to_display_string()?;
            if let Some(children) = element.children_mut() {
                children.clear();
                if !text.is_empty() {
                    children.push(Node::Text { text });
                }
            }
            Ok(())
        }
    }
}

pub fn get(element: &Node, name: &str) -> Option<Value> {
    let tag = element.name()?;
    let Some(def) = lookup(tag, name) else {
        return element.own_property(name).cloned();
    };
    Some(match def.kind {
        Reflect(attr) => Value::String(element.attr(attr).unwrap_or("").to_string()),
        ReflectBool(attr) => Value::Bool(element.has_attribute(attr)),
        ReflectLong(attr, default) => {
            let parsed = element
                .attr(attr)
                .and_then(|v| v.trim().parse::<i32>().ok())
                .unwrap_or(default);
            Value::Number(f64::from(parsed))
        }
        Plain(initial) => element
            .own_property(name)
            .cloned()
            .unwrap_or_else(|| initial.to_value()),
        ReadOnly(initial) => initial.to_value(),
        TextContent => Value::String(element.text_content()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;

    fn element(tag: &str) -> Node {
        Host::default().create_element(tag).unwrap()
    }

    #[test]
    fn tag_specific_entries_win_for_their_tags() {
        assert_eq!(lookup("input", "value").map(|d| d.kind), Some(Plain(Str(""))));
        assert_eq!(lookup("button", "value").map(|d| d.kind), Some(Reflect("value")));
        assert!(lookup("div", "value").is_none());
        assert!(lookup("div", "className").is_some());
    }

    #[test]
    fn reflected_string_lands_in_attribute() {
        let mut div = element("div");
        set(&mut div, "className", Value::from("a b")).unwrap();
        assert_eq!(div.attr("class"), Some("a b"));
        assert_eq!(get(&div, "className"), Some(Value::from("a b")));
    }

    #[test]
    fn reflected_bool_toggles_presence() {
        let mut input = element("input");
        set(&mut input, "defaultChecked", Value::from(true)).unwrap();
        assert_eq!(input.attr("checked"), Some(""));
        set(&mut input, "defaultChecked", Value::from(0)).unwrap();
        assert!(!input.has_attribute("checked"));
        assert_eq!(get(&input, "defaultChecked"), Some(Value::Bool(false)));
    }

    #[test]
    fn reflected_long_coerces_numbers() {
        let mut td = element("td");
        set(&mut td, "colSpan", Value::from("3")).unwrap();
        assert_eq!(td.attr("colspan"), Some("3"));
        set(&mut td, "colSpan", Value::from("wide")).unwrap();
        assert_eq!(td.attr("colspan"), Some("0"));
        let th = element("th");
        assert_eq!(get(&th, "rowSpan"), Some(Value::from(1)));
    }

    #[test]
    fn unassigned_properties_read_their_defaults() {
        let textarea = element("textarea");
        assert_eq!(get(&textarea, "rows"), Some(Value::from(2)));
        assert_eq!(get(&textarea, "tabIndex"), Some(Value::from(-1)));
        assert_eq!(get(&textarea, "value"), Some(Value::from("")));
        assert_eq!(get(&textarea, "willValidate"), Some(Value::from(true)));
        assert_eq!(get(&element("div"), "spellcheck"), Some(Value::from(true)));
    }

    #[test]
    fn read_only_assignment_fails() {
        let mut input = element("input");
        let err = set(&mut input, "willValidate", Value::from(false)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: Cannot set property willValidate of <input> which has only a getter"
        );
    }

    #[test]
    fn plain_and_expando_properties_stay_off_attributes() {
        let mut input = element("input");
        set(&mut input, "value", Value::from("typed")).unwrap();
        assert!(!input.has_attribute("value"));
        assert_eq!(get(&input, "value"), Some(Value::from("typed")));

        let mut span = element("span");
        assert!(!exposes(&span, "$model"));
        set(&mut span, "$model", Value::from(7)).unwrap();
        assert!(exposes(&span, "$model"));
        assert_eq!(span.own_property("$model"), Some(&Value::from(7)));
    }

    #[test]
    fn null_expando_does_not_count_as_exposed() {
        let mut span = element("span");
        span.set_own_property("onclick", Value::Null);
        assert!(!exposes(&span, "onclick"));
    }

    #[test]
    fn text_content_replaces_children() {
        let host = Host::default();
        let mut p = element("p");
        host.append_child(&mut p, host.create_text("old")).unwrap();
        set(&mut p, "textContent", Value::from("new")).unwrap();
        assert_eq!(p.children(), &[Node::Text { text: "new".to_string() }]);
        set(&mut p, "textContent", Value::from("")).unwrap();
        assert!(p.children().is_empty());
    }
}
