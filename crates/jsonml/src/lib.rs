//! Builds DOM-like trees from JsonML markup.
//!
//! ```
//! use jsonml::{Value, to_dom};
//!
//! let jml = Value::from(serde_json::json!(["p", {"class": "note"}, "hello"]));
//! let node = to_dom(&jml).unwrap();
//! assert_eq!(node.attr("class"), Some("note"));
//! assert_eq!(node.text_content(), "hello");
//! ```

pub mod append;
pub mod attributes;
pub mod builder;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
pub mod host;
pub mod inspect;
pub mod properties;
pub mod trim;
pub mod value;

mod types;

pub use builder::{BuildError, BuildResult, Builder, BuilderConfig, Filter, on_error, to_dom, to_dom_filtered};
pub use host::{DomError, Host, HostProfile};
pub use types::{Node, NodeType};
pub use value::{Function, Value, ValueKind};
