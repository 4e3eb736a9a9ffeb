//! Setter synthesis: from annotated structs to accessor descriptors.

use log::debug;
use serde::Serialize;

use crate::errors::GenerateError;
use crate::printer::print_type;
use crate::scanner::SourceUnit;
use crate::syntax::ImportSpec;

/// Field names that get a generated setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFields(&'static [&'static str]);

impl TargetFields {
    /// The timestamp pair every generated file is built around.
    pub const DEFAULT: Self = Self(&["CreatedAt", "UpdatedAt"]);

    pub const fn new(names: &'static [&'static str]) -> Self {
        Self(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name)
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.0
    }
}

impl Default for TargetFields {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One setter to generate: `func (s *Owner) SetField(v FieldType)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorDescriptor {
    pub owner: String,
    /// Type parameter names of a generic owner, spelled in the receiver.
    pub type_params: Vec<String>,
    pub field: String,
    pub field_type: String,
}

/// An import of the source unit and whether any setter signature needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub alias: Option<String>,
    pub path: String,
    pub used: bool,
}

impl ImportEntry {
    fn from_spec(spec: &ImportSpec) -> Self {
        Self {
            alias: spec.name.clone(),
            path: spec.path.clone(),
            used: false,
        }
    }

    /// Name that qualifies identifiers from this import: the alias, or the
    /// last path segment. Blank and dot imports have none.
    pub fn short_name(&self) -> Option<&str> {
        match self.alias.as_deref() {
            Some("_" | ".") => None,
            Some(alias) => Some(alias),
            None => self.path.rsplit('/').next(),
        }
    }
}

/// Result of synthesizing one source unit.
#[derive(Debug, Clone, Default)]
pub struct Synthesis {
    pub descriptors: Vec<AccessorDescriptor>,
    pub imports: Vec<ImportEntry>,
}

impl Synthesis {
    /// Nothing to generate; the unit gets no companion file.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn used_imports(&self) -> impl Iterator<Item = &ImportEntry> {
        self.imports.iter().filter(|import| import.used)
    }
}

/// Build setter descriptors for every target field of every annotated type.
///
/// Output order follows struct and field declaration order; the order of
/// `targets` does not matter.
pub fn synthesize(unit: &SourceUnit, targets: &TargetFields) -> Result<Synthesis, GenerateError> {
    let mut imports: Vec<ImportEntry> = unit.imports.iter().map(ImportEntry::from_spec).collect();
    let mut descriptors = Vec::new();

    for annotated in &unit.types {
        for field in annotated.fields.iter().filter(|f| targets.contains(&f.name)) {
            let field_type = print_type(&field.ty).map_err(|source| GenerateError::UnsupportedType {
                owner: annotated.name.clone(),
                field: field.name.clone(),
                source,
            })?;

            for qualifier in field.ty.qualifiers() {
                let mut matched = false;
                for import in imports.iter_mut().filter(|i| i.short_name() == Some(qualifier)) {
                    import.used = true;
                    matched = true;
                }
                if !matched {
                    debug!(
                        "{}.{}: qualifier `{qualifier}` has no matching import",
                        annotated.name, field.name
                    );
                }
            }

            descriptors.push(AccessorDescriptor {
                owner: annotated.name.clone(),
                type_params: annotated.type_params.clone(),
                field: field.name.clone(),
                field_type,
            });
        }
    }

    Ok(Synthesis { descriptors, imports })
}
