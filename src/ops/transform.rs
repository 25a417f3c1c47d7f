//! Substitution of Gleam sources with their compiled JavaScript.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Project;
use crate::error::PluginError;
use crate::ops::resolve::{is_gleam_source, normalize};

/// Result of the transform hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformed {
    /// Compiled module text and its source map.
    Output { code: String, map: SourceMap },
    /// Not a Gleam source; the host keeps the file as-is.
    NotApplicable,
}

impl Transformed {
    pub fn code(&self) -> Option<&str> {
        match self {
            Transformed::Output { code, .. } => Some(code),
            Transformed::NotApplicable => None,
        }
    }
}

/// A version 3 source map.
///
/// The map attributes the whole compiled module to the whole Gleam source:
/// the first generated position maps to the start of the original file and
/// no finer correspondence is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    pub sources_content: Vec<Option<String>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Map all of `generated` back to `original`, read from `source`.
    pub fn whole_file(source: &Path, original: &str, generated: &str) -> Self {
        let lines = generated.split('\n').count();
        // `AAAA`: generated column 0 -> source 0, line 0, column 0
        let mappings = format!("AAAA{}", ";".repeat(lines.saturating_sub(1)));

        SourceMap {
            version: 3,
            file: None,
            sources: vec![source.to_string_lossy().into_owned()],
            sources_content: vec![Some(original.to_string())],
            names: Vec::new(),
            mappings,
        }
    }

    pub fn to_json(&self) -> String {
        // Serializing plain strings and vectors cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Location of the compiled counterpart of a Gleam source.
pub fn compiled_path(project: &Project, file: &Path) -> Result<Option<PathBuf>, PluginError> {
    if !is_gleam_source(file) {
        return Ok(None);
    }
    Ok(normalize(project, file, "")?.map(|normalized| project.out_dir().join(normalized)))
}

/// Replace the contents of `file` with its compiled output.
pub fn transform(
    project: &Project,
    file: &Path,
    original: &str,
) -> Result<Transformed, PluginError> {
    let log = project.log();

    let Some(path) = compiled_path(project, file)? else {
        log.skip(format_args!("not gleam file {}", file.display()));
        return Ok(Transformed::NotApplicable);
    };
    log.detail("[transform] path 'gleam' to 'mjs' ok!");

    log.detail(format_args!("[transform] reading {}", path.display()));
    let code = std::fs::read_to_string(&path).map_err(|source| {
        let err = PluginError::CompiledOutputMissing {
            path: path.clone(),
            source,
        };
        log.error(&err);
        err
    })?;

    let map = SourceMap::whole_file(file, original, &code);

    log.info("[transform] ok!");
    log.detail(format_args!("[transform] file: {}", file.display()));
    log.detail(format_args!("[transform] path: {}", path.display()));

    Ok(Transformed::Output { code, map })
}
