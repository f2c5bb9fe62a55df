//! Example scripts and the structural templates extracted from them.
//!
//! A user pastes or loads a well-performing script, the backend analyzes its
//! structure, and the resulting [`ScriptTemplate`] drives template-mode
//! generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::{StudioError, StudioResult};

/// Scripts shorter than this are rejected before analysis.
pub const MIN_SCRIPT_CHARS: usize = 100;

const DEFAULT_SCRIPT_TYPE: &str = "documentary";

// =============================================================================
// EXAMPLE SCRIPT
// =============================================================================

/// A script the user supplied as a structural example.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExampleScript {
    pub id: String,
    pub name: String,
    pub content: String,
    pub script_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl ExampleScript {
    /// Creates a script from pasted text.
    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> StudioResult<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(StudioError::validation("Please paste a script"));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            content,
            script_type: DEFAULT_SCRIPT_TYPE.to_string(),
            uploaded_at: Utc::now(),
        })
    }

    /// Creates a script from a file's name and contents. A `.txt` suffix is dropped from the name.
    pub fn from_file(path: &Path, content: impl Into<String>) -> StudioResult<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name
            .strip_suffix(".txt")
            .unwrap_or(&file_name)
            .to_string();
        Self::from_text(name, content)
    }

    /// Builder: Set script type.
    pub fn with_script_type(mut self, script_type: impl Into<String>) -> Self {
        self.script_type = script_type.into();
        self
    }

    /// Checks the script is long enough to analyze.
    pub fn ensure_analyzable(&self) -> StudioResult<()> {
        if self.content.trim().chars().count() < MIN_SCRIPT_CHARS {
            return Err(StudioError::validation(format!(
                "Script is too short to analyze (minimum {} characters)",
                MIN_SCRIPT_CHARS
            )));
        }
        Ok(())
    }
}

/// Body of an analyze-script request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest<'a> {
    pub script_content: &'a str,
    pub script_type: &'a str,
}

impl<'a> From<&'a ExampleScript> for AnalyzeRequest<'a> {
    fn from(script: &'a ExampleScript) -> Self {
        Self {
            script_content: &script.content,
            script_type: &script.script_type,
        }
    }
}

// =============================================================================
// SCRIPT TEMPLATE
// =============================================================================

fn default_sentence_variation() -> String {
    "medium".to_string()
}

/// Structure extracted from an example script.
///
/// Deserializes from the analyzer's snake_case keys as well as camelCase;
/// always serializes camelCase, which is what template requests carry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptTemplate {
    #[serde(alias = "hook_example", default)]
    pub hook_example: String,
    #[serde(alias = "hook_style", default)]
    pub hook_style: String,
    #[serde(alias = "setup_length", default)]
    pub setup_length: u32,
    #[serde(alias = "rise_length", default)]
    pub rise_length: u32,
    #[serde(alias = "climax_length", default)]
    pub climax_length: u32,
    #[serde(alias = "end_length", default)]
    pub end_length: u32,
    #[serde(default)]
    pub tone: Vec<String>,
    #[serde(alias = "key_patterns", default)]
    pub key_patterns: Vec<String>,
    #[serde(alias = "sentence_variation", default = "default_sentence_variation")]
    pub sentence_variation: String,
}

impl ScriptTemplate {
    /// Total length across the four story sections.
    pub fn total_length(&self) -> u32 {
        self.setup_length + self.rise_length + self.climax_length + self.end_length
    }
}
