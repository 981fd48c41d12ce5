//! Parse configuration.

use serde::{Deserialize, Serialize};

/// Names provided by the host game engine. The deferred analysis never
/// reports these as undefined.
pub const DEFAULT_INTRINSICS: &[&str] = &[
    "D_NORTH",
    "D_SOUTH",
    "D_EAST",
    "D_WEST",
    "D_NORTHEAST",
    "D_NORTHWEST",
    "D_SOUTHEAST",
    "D_SOUTHWEST",
    "D_UP",
    "D_DOWN",
    "D_IN",
    "D_OUT",
    "print",
    "println",
    "input",
    "random",
    "strlen",
    "substr",
    "move",
    "has",
];

pub const DEFAULT_MAX_DEPTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Combined statement and expression nesting the parser will descend into.
    pub max_depth: usize,
    /// Host intrinsics exempt from undefined-name warnings.
    pub intrinsics: Vec<String>,
    /// Run the deferred undefined-name pass as part of `parse`.
    pub analyze: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            intrinsics: DEFAULT_INTRINSICS.iter().map(|name| name.to_string()).collect(),
            analyze: true,
        }
    }
}

impl ParseOptions {
    pub fn is_intrinsic(&self, name: &str) -> bool {
        self.intrinsics.iter().any(|intrinsic| intrinsic == name)
    }

    /// Options for a document whose imports are resolved separately.
    pub fn without_analysis() -> Self {
        ParseOptions {
            analyze: false,
            ..ParseOptions::default()
        }
    }
}
