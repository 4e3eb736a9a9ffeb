//! Companion file emission: model, canonical layout, and the write itself.

mod canonical;
mod model;

use std::fs;
use std::path::{Path, PathBuf};

pub use canonical::canonicalize;
pub use model::{GENERATED_HEADER, ImportLine, SetterFile, SetterMethod};

use crate::errors::GenerateError;
use crate::scanner::SourceUnit;
use crate::synthesizer::Synthesis;

/// Suffix appended to the source stem to name the companion file.
pub const COMPANION_SUFFIX: &str = "_setters";

/// Final contents of a companion file and where they belong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub path: PathBuf,
    pub contents: String,
}

/// `dir/user.go` pairs with `dir/user_setters.go`.
pub fn companion_path(dir: &Path, file_name: &str) -> PathBuf {
    let source = Path::new(file_name);
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}{COMPANION_SUFFIX}");
    if let Some(ext) = source.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    dir.join(name)
}

/// Render and canonicalize the companion file without touching the disk.
pub fn prepare(unit: &SourceUnit, synthesis: &Synthesis) -> Result<Rendered, GenerateError> {
    let model = SetterFile::build(&unit.package, synthesis.used_imports(), &synthesis.descriptors)?;
    let contents = canonicalize(&model.render())?;
    Ok(Rendered {
        path: companion_path(&unit.dir, &unit.file_name),
        contents,
    })
}

/// Write the companion file, replacing whatever was there.
///
/// Returns whether the bytes on disk changed.
pub fn write(rendered: &Rendered) -> Result<bool, GenerateError> {
    let changed = !fs::read_to_string(&rendered.path).is_ok_and(|existing| existing == rendered.contents);
    fs::write(&rendered.path, &rendered.contents).map_err(|source| GenerateError::Write {
        path: rendered.path.clone(),
        source,
    })?;
    Ok(changed)
}

/// Prepare and write in one step, returning the companion path.
pub fn emit(unit: &SourceUnit, synthesis: &Synthesis) -> Result<PathBuf, GenerateError> {
    let rendered = prepare(unit, synthesis)?;
    write(&rendered)?;
    Ok(rendered.path)
}
