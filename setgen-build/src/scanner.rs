//! Source file scanner for discovering `//gen:setters` structs.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::errors::{GenerateError, ParseError};
use crate::syntax::{CommentGroup, Decl, ImportSpec, TypeExpr, TypeSpec, parse_file};

/// Doc comment prefix that opts a type declaration group into generation.
pub const MARKER: &str = "//gen:setters";

/// One parsed Go file.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub package: String,
    /// Every import of the file, in source order.
    pub imports: Vec<ImportSpec>,
    pub dir: PathBuf,
    pub file_name: String,
    pub types: Vec<AnnotatedType>,
}

/// A struct declared in a marker-bearing type group.
#[derive(Debug, Clone)]
pub struct AnnotatedType {
    pub name: String,
    pub type_params: Vec<String>,
    pub fields: Vec<AnnotatedField>,
}

#[derive(Debug, Clone)]
pub struct AnnotatedField {
    pub name: String,
    pub ty: TypeExpr,
}

/// Recursively list files with the given extension, in file-name order.
pub fn discover_files(root: &Path, extension: &str, skip_hidden: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(skip_hidden && entry.depth() > 0 && is_hidden(entry)));

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == extension) => {
                files.push(entry.into_path());
            }
            Ok(_) => {}
            Err(err) => warn!("skipping unreadable entry: {err}"),
        }
    }

    files
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Read and scan a single Go file.
pub fn scan_file(path: &Path) -> Result<SourceUnit, GenerateError> {
    let content = fs::read_to_string(path).map_err(|source| GenerateError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let unit = scan_source(&content, path).map_err(|source| GenerateError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "{}: package {}, {} imports, {} annotated types",
        path.display(),
        unit.package,
        unit.imports.len(),
        unit.types.len()
    );

    Ok(unit)
}

/// Scan already-loaded source text; `path` only locates the unit.
pub fn scan_source(source: &str, path: &Path) -> Result<SourceUnit, ParseError> {
    let file = parse_file(source)?;

    let mut types = Vec::new();
    for decl in &file.decls {
        let Decl::Type(decl) = decl else {
            continue;
        };
        if !decl.doc.as_ref().is_some_and(has_marker) {
            continue;
        }
        types.extend(decl.specs.iter().filter_map(extract_annotated_type));
    }

    Ok(SourceUnit {
        package: file.package.name,
        imports: file.imports,
        dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        types,
    })
}

/// Check if any line of a doc comment starts with the marker.
fn has_marker(doc: &CommentGroup) -> bool {
    doc.lines().any(|line| line.starts_with(MARKER))
}

/// Struct-bodied specs become annotated types; other specs in the group are ignored.
fn extract_annotated_type(spec: &TypeSpec) -> Option<AnnotatedType> {
    let TypeExpr::Struct(st) = &spec.ty else {
        return None;
    };

    // Embedded fields have no name and never get a setter.
    let fields = st
        .fields
        .iter()
        .flat_map(|field| {
            field.names.iter().map(|name| AnnotatedField {
                name: name.name.clone(),
                ty: field.ty.clone(),
            })
        })
        .collect();

    Some(AnnotatedType {
        name: spec.name.name.clone(),
        type_params: spec.type_params.iter().map(|p| p.name.clone()).collect(),
        fields,
    })
}
