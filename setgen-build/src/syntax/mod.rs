//! Go front end: a tree-sitter-go parse lowered into a closed syntax tree.
//!
//! Only the parts of Go the setter generator touches are modelled in full:
//! the package clause, imports, type declarations with struct bodies, type
//! expressions and function signatures. Other declarations keep their
//! position and little else.

pub mod ast;
mod parser;

pub use ast::{
    ArrayLen, ChanDir, Comment, CommentGroup, Decl, Field, File, FuncDecl, FuncType, Ident, ImportSpec, Param,
    Position, Stmt, StructType, TypeDecl, TypeExpr, TypeSpec,
};
pub use parser::parse_file;
