//! TOML fixture cases for the builder.
//!
//! Each file under a cases directory holds one or more `[[case]]` tables:
//!
//! ```toml
//! [[case]]
//! name = "paragraph"
//! jsonml = '["p", "hi"]'
//! expected = """
//! <p>
//!   "hi"
//! """
//!
//! [case.config]
//! host = "legacy"
//! ```
//!
//! `expected` is a `DomSnapshot` rendering, or `#none` for an empty build.

use jsonml::{BuilderConfig, Value};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct FixtureCase {
    pub name: String,
    /// JsonML input as JSON text.
    pub jsonml: String,
    pub expected: String,
    #[serde(default)]
    pub config: BuilderConfig,
    #[serde(default)]
    pub ignore_properties: bool,
    #[serde(skip)]
    pub source: PathBuf,
}

impl FixtureCase {
    pub fn input(&self) -> Value {
        let json: serde_json::Value = serde_json::from_str(&self.jsonml).unwrap_or_else(|err| {
            panic!("case {:?} in {:?} has invalid jsonml: {err}", self.name, self.source)
        });
        Value::from(json)
    }

    pub fn expected_lines(&self) -> Vec<String> {
        self.expected
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Deserialize)]
struct FixtureFile {
    #[serde(default)]
    case: Vec<FixtureCase>,
}

pub fn parse_cases(content: &str, source: &Path) -> Vec<FixtureCase> {
    let file: FixtureFile = toml::from_str(content)
        .unwrap_or_else(|err| panic!("failed to parse fixture file {source:?}: {err}"));
    assert!(!file.case.is_empty(), "fixture file {source:?} has no cases");
    file.case
        .into_iter()
        .map(|mut case| {
            case.source = source.to_path_buf();
            case
        })
        .collect()
}

/// Loads every `*.toml` file in `dir`, sorted by path.
pub fn load_cases(dir: &Path) -> Vec<FixtureCase> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap_or_else(|err| panic!("failed to read fixture dir {dir:?}: {err}"))
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();
    paths
        .iter()
        .flat_map(|path| {
            let content = fs::read_to_string(path)
                .unwrap_or_else(|err| panic!("failed to read fixture file {path:?}: {err}"));
            parse_cases(&content, path)
        })
        .collect()
}
