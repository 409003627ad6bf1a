#![no_main]

use jsonml::{Node, Value, to_dom};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    if let Some(node) = to_dom(&Value::from(json)) {
        assert!(!matches!(node, Node::Fragment { ref children } if children.len() == 1));
    }
});
