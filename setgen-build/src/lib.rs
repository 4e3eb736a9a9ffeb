//! Setter generator for Go sources.
//!
//! This crate scans `.go` files for type declaration groups documented with
//! a `//gen:setters` line and writes a `<stem>_setters.go` companion file
//! holding one setter method per `CreatedAt`/`UpdatedAt` field.
//!
//! # Example
//!
//! ```ignore
//! let report = setgen_build::generate_setters()
//!     .scan_path("internal/models")
//!     .run()?;
//!
//! for file in &report.files {
//!     println!("{}: {:?}", file.source.display(), file.status);
//! }
//! ```

pub mod emitter;
pub mod errors;
mod generator;
pub mod printer;
mod report;
pub mod scanner;
pub mod synthesizer;
pub mod syntax;

pub use errors::{CanonicalizeError, GenerateError, ParseError, RenderError, UnsupportedTypeError};
pub use generator::SetterGenerator;
pub use report::{FileOutcome, FileStatus, GenerateMode, GenerationReport};
pub use synthesizer::TargetFields;

/// Create a new setter generator with default settings.
///
/// # Example
///
/// ```ignore
/// setgen_build::generate_setters()
///     .scan_path("internal/")
///     .mode(setgen_build::GenerateMode::Check)
///     .run()
///     .expect("Failed to check setters");
/// ```
pub fn generate_setters() -> SetterGenerator {
    SetterGenerator::new()
}
