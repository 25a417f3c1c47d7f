//! Import resolution from Gleam modules to the compiled `.mjs` files.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::core::project::SRC_DIR;
use crate::core::Project;
use crate::error::PluginError;
use crate::util::fs::{clean_path, ends_with, is_inside, relative_path, replace_suffix};

/// Specifier prefix for package-style imports, e.g. `hex:gleam/io`.
pub const HEX_PREFIX: &str = "hex:";

/// Gleam source extension.
pub const GLEAM_EXT: &str = ".gleam";

/// Extension of compiled modules.
pub const MJS_EXT: &str = ".mjs";

/// Name suffix of the compiled prelude that generated modules import.
pub const PRELUDE_SUFFIX: &str = "gleam.mjs";

/// Outcome of resolving an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The import maps to this compiled file.
    Resolved(PathBuf),
    /// No importer; leave it to the host's default resolution.
    Defer,
    /// Not a Gleam import.
    NotApplicable,
}

impl Resolution {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Resolved(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Resolution::Resolved(path) => Some(path),
            _ => None,
        }
    }
}

/// Check whether a path belongs to Gleam: a `.gleam` source or the
/// compiled prelude itself (a file named exactly `gleam.mjs`).
pub fn is_gleam_file(path: impl AsRef<OsStr>) -> bool {
    let path = path.as_ref();
    ends_with(path, GLEAM_EXT) || Path::new(path).file_name() == Some(OsStr::new(PRELUDE_SUFFIX))
}

/// Check whether a path is a `.gleam` source file.
pub fn is_gleam_source(path: impl AsRef<OsStr>) -> bool {
    ends_with(path, GLEAM_EXT)
}

/// Resolve `specifier` imported from `importer`.
pub fn resolve(
    project: &Project,
    specifier: &str,
    importer: Option<&Path>,
) -> Result<Resolution, PluginError> {
    let log = project.log();

    let Some(importer) = importer else {
        log.skip("importer is empty");
        log.skip(format_args!("source {}", specifier));
        return Ok(Resolution::Defer);
    };

    if let Some(module) = specifier.strip_prefix(HEX_PREFIX) {
        return resolve_hex(project, specifier, module).map(Resolution::Resolved);
    }

    let Some(normalized) = normalize(project, importer, specifier)? else {
        return Ok(Resolution::NotApplicable);
    };

    // The importer's compiled file sits next to the one being imported.
    let id = clean_path(&project.out_dir().join(&normalized).join("..").join(specifier));

    log.info("[resolve] ok!");
    log.detail(format_args!("[resolve] normalized: {}", normalized.display()));
    log.detail(format_args!("[resolve] id: {}", id.display()));
    Ok(Resolution::Resolved(id))
}

fn resolve_hex(project: &Project, specifier: &str, module: &str) -> Result<PathBuf, PluginError> {
    let log = project.log();
    let module = module.trim_start_matches(['/', '\\']);

    let module = match module.strip_suffix(GLEAM_EXT) {
        Some(stem) => stem,
        None => module.strip_suffix(MJS_EXT).unwrap_or(module),
    };

    if module.is_empty() {
        let err = PluginError::EmptyModuleSpecifier {
            specifier: specifier.to_string(),
        };
        log.error(&err);
        return Err(err);
    }

    let id = clean_path(&project.out_dir().join(format!("{}{}", module, MJS_EXT)));

    log.info("[resolve-hex] ok!");
    log.detail(format_args!("[resolve-hex] mod: {}", module));
    log.detail(format_args!("[resolve-hex] path: {}", id.display()));
    Ok(id)
}

/// Map an importer (or a transformed file) to its compiled path, relative
/// to the output root.
///
/// Sources under `src/` compile into a directory named after the project,
/// so `src/main.gleam` becomes `<name>/main.mjs`. Files already inside the
/// output root keep their position there. Returns `None` when neither the
/// importer nor the specifier belongs to Gleam.
pub(crate) fn normalize(
    project: &Project,
    importer: &Path,
    specifier: &str,
) -> Result<Option<PathBuf>, PluginError> {
    let log = project.log();

    if !is_gleam_source(importer) && !specifier.ends_with(PRELUDE_SUFFIX) {
        log.skip("not gleam file");
        log.skip(format_args!("source {}", specifier));
        log.skip(format_args!("importer {}", importer.display()));
        return Ok(None);
    }

    let manifest = project.require_manifest()?;

    let replaced = replace_suffix(importer, GLEAM_EXT, MJS_EXT);
    log.detail(format_args!("[normalize] replaced {}", replaced.display()));

    let path = if is_inside(&replaced, project.out_dir()) {
        relative_path(project.out_dir(), &replaced)
    } else {
        let relative = relative_path(project.cwd(), &replaced);
        log.detail(format_args!("[normalize] relative {}", relative.display()));

        match relative.strip_prefix(SRC_DIR) {
            Ok(rest) => {
                log.detail(format_args!("[normalize] '{}' to '{}'", SRC_DIR, manifest.name));
                Path::new(&manifest.name).join(rest)
            }
            Err(_) => relative,
        }
    };

    log.detail(format_args!("[normalize] {}", path.display()));
    Ok(Some(path))
}
