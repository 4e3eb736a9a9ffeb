//! Explicit model of a companion file and its plain serialization.
//!
//! The text produced here is valid Go but not yet in canonical layout;
//! [`super::canonical`] takes care of that.

use std::fmt::Write;

use crate::errors::RenderError;
use crate::synthesizer::{AccessorDescriptor, ImportEntry};
use crate::syntax::ast::is_identifier;

/// First line of every generated file, in the form Go tooling recognizes.
pub const GENERATED_HEADER: &str = "// Code generated by setgen. DO NOT EDIT.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetterFile {
    pub package: String,
    pub imports: Vec<ImportLine>,
    pub methods: Vec<SetterMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLine {
    pub alias: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetterMethod {
    pub receiver: String,
    pub type_params: Vec<String>,
    /// Receiver and parameter variable names, distinct from the type parameters.
    pub receiver_var: String,
    pub value_var: String,
    pub field: String,
    pub field_type: String,
}

impl SetterFile {
    /// Assemble the model, rejecting names that cannot appear in Go source.
    pub fn build<'a>(
        package: &str,
        imports: impl IntoIterator<Item = &'a ImportEntry>,
        descriptors: &[AccessorDescriptor],
    ) -> Result<Self, RenderError> {
        if descriptors.is_empty() {
            return Err(RenderError::Empty);
        }
        check_identifier(package)?;

        let imports = imports
            .into_iter()
            .map(|import| {
                if import.path.is_empty() || import.path.contains(['"', '\\', '\n']) {
                    return Err(RenderError::InvalidImportPath(import.path.clone()));
                }
                if let Some(alias) = &import.alias {
                    check_identifier(alias)?;
                }
                Ok(ImportLine {
                    alias: import.alias.clone(),
                    path: import.path.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let methods = descriptors
            .iter()
            .map(|descriptor| {
                check_identifier(&descriptor.owner)?;
                check_identifier(&descriptor.field)?;
                for param in &descriptor.type_params {
                    check_identifier(param)?;
                }
                Ok(SetterMethod {
                    receiver: descriptor.owner.clone(),
                    type_params: descriptor.type_params.clone(),
                    receiver_var: free_name("s", &descriptor.type_params),
                    value_var: free_name("v", &descriptor.type_params),
                    field: descriptor.field.clone(),
                    field_type: descriptor.field_type.clone(),
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        Ok(Self {
            package: package.to_string(),
            imports,
            methods,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{GENERATED_HEADER}");
        let _ = writeln!(out);
        let _ = writeln!(out, "package {}", self.package);

        if !self.imports.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "import (");
            for import in &self.imports {
                match &import.alias {
                    Some(alias) => {
                        let _ = writeln!(out, "{alias} \"{}\"", import.path);
                    }
                    None => {
                        let _ = writeln!(out, "\"{}\"", import.path);
                    }
                }
            }
            let _ = writeln!(out, ")");
        }

        for method in &self.methods {
            let receiver = if method.type_params.is_empty() {
                method.receiver.clone()
            } else {
                format!("{}[{}]", method.receiver, method.type_params.join(", "))
            };
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "func ({recv} *{receiver}) Set{field}({value} {ty}) {{ {recv}.{field} = {value} }}",
                recv = method.receiver_var,
                value = method.value_var,
                field = method.field,
                ty = method.field_type,
            );
        }

        out
    }
}

/// `preferred`, or the first `preferred1`, `preferred2`, ... not in `taken`.
/// Receiver type parameters share a scope with the receiver and parameters.
fn free_name(preferred: &str, taken: &[String]) -> String {
    std::iter::once(preferred.to_string())
        .chain((1..).map(|n| format!("{preferred}{n}")))
        .find(|name| !taken.contains(name))
        .unwrap_or_else(|| preferred.to_string())
}

fn check_identifier(name: &str) -> Result<(), RenderError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(RenderError::InvalidIdentifier(name.to_string()))
    }
}
