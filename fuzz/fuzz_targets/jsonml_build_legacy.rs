#![no_main]

use jsonml::{Builder, BuilderConfig, HostProfile, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let builder = Builder::new(BuilderConfig {
        host: HostProfile::Legacy,
        max_depth: 64,
        ..BuilderConfig::default()
    });
    let _ = builder.build(&Value::from(json));
});
