//! Shared test fixtures for integration tests.
//!
//! The corpus is a small FPGA-tooling documentation site: a board support
//! page, a cable support page, a flashing guide, and a command reference
//! with a symbol catalog. Terms are stored pre-stemmed, the way the index
//! builder emits them ("cables" → "cabl", "guide" → "guid").
//!
//! Weights are chosen adversarially where a test needs them to be: the
//! "Cables" page mentions boards far more heavily than the "Boards" page
//! itself, so ranking tests can tell title handling apart from raw weight.

use docquery::SearchEngine;
use rstest::fixture;

/// Serialized index artifact for the test corpus.
///
/// Document ids: 0 = Boards, 1 = Cables, 2 = Flashing Guide,
/// 3 = Command Reference.
#[allow(dead_code)] // Used across different integration test crates
pub const CORPUS: &str = r#"{
    "docnames": ["boards", "cables", "guide", "api"],
    "filenames": ["boards.html", "cables.html", "guide.html", "api.html"],
    "titles": ["Boards", "Cables", "Flashing Guide", "Command Reference"],
    "terms": {
        "board": [0, 5, 1, 50],
        "cabl": [1, 10],
        "jtag": [1, 3, 2, 40],
        "flash": [2, 8],
        "guid": [2, 2],
        "command": [3, 1],
        "refer": [3, 1],
        "write_flash": [0, 3],
        "probe": 1
    },
    "titleterms": {
        "board": 0,
        "cabl": 1,
        "flash": 2,
        "guid": 2,
        "command": 3,
        "refer": 3
    },
    "objects": {
        "cli": {
            "write_flash": [3, "cmdoption-write-flash", 0, 1],
            "scan": [3, "cmdoption-scan", 0, 2]
        },
        "": {
            "openfpgaloader": [3, "", 1, 0]
        }
    },
    "objtypes": {"0": "std:option", "1": "std:program"},
    "objnames": {
        "0": ["std", "option", "command line option"],
        "1": ["std", "program", "program"]
    },
    "envversion": {"core": 1, "terms": 1, "titleterms": 1, "objects": 1}
}"#;

/// An engine with the test corpus loaded and ready to query.
#[fixture]
pub fn engine() -> SearchEngine {
    let engine = SearchEngine::new();
    engine
        .load_json(CORPUS)
        .expect("test corpus artifact should load");
    engine
}
