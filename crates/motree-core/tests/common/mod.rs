use std::path::PathBuf;
use std::sync::Arc;

use motree_core::{Mit, Registry};

/// Path of a file under `tests/fixtures`
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Registry loaded from the bundled class metadata
#[allow(dead_code)]
pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::from_path(fixture_path("aci_meta.json")).unwrap())
}

/// Fresh tree holding only the root
#[allow(dead_code)]
pub fn new_mit() -> Mit {
    Mit::new(registry())
}

/// Remove the shared leading indentation of an indented literal
#[allow(dead_code)]
pub fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().skip_while(|l| l.trim().is_empty()).collect();
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| if l.len() >= indent { &l[indent..] } else { l.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}
