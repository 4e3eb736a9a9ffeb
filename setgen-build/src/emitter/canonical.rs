//! Canonical layout for generated files.
//!
//! The rendered text is parsed back with the Go front end and printed from
//! the tree, so the output layout never depends on how it was assembled:
//! tab indentation, one sorted import block, one blank line between
//! declarations and a single trailing newline.

use std::fmt::Write;

use crate::errors::CanonicalizeError;
use crate::printer::print_type;
use crate::syntax::{CommentGroup, Decl, File, FuncDecl, Param, Position, Stmt, parse_file};

pub fn canonicalize(source: &str) -> Result<String, CanonicalizeError> {
    let file = parse_file(source)?;
    print_file(&file)
}

fn print_file(file: &File) -> Result<String, CanonicalizeError> {
    let mut out = String::new();

    for (index, group) in file.header.iter().enumerate() {
        write_comments(&mut out, group);
        let attached = index + 1 == file.header.len() && group.end_line() + 1 == file.package.pos.line;
        if !attached {
            out.push('\n');
        }
    }
    let _ = writeln!(out, "package {}", file.package.name);

    let mut imports: Vec<(&str, Option<&str>)> = file
        .imports
        .iter()
        .map(|spec| (spec.path.as_str(), spec.name.as_deref()))
        .collect();
    imports.sort_unstable();
    imports.dedup();

    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for (path, name) in imports {
            out.push('\t');
            if let Some(name) = name {
                out.push_str(name);
                out.push(' ');
            }
            let _ = writeln!(out, "{}", quote(path));
        }
        out.push_str(")\n");
    }

    for decl in &file.decls {
        let func = match decl {
            Decl::Func(func) => func,
            Decl::Type(decl) => return Err(unexpected("type declaration", decl.pos)),
            Decl::Value(decl) => return Err(unexpected("var or const declaration", decl.pos)),
        };
        out.push('\n');
        write_method(&mut out, func)?;
    }

    Ok(out)
}

fn write_method(out: &mut String, func: &FuncDecl) -> Result<(), CanonicalizeError> {
    let Some(recv) = &func.recv else {
        return Err(unexpected("function without receiver", func.pos));
    };
    let Some(body) = &func.body else {
        return Err(unexpected("method without body", func.pos));
    };
    if !func.type_params.is_empty() {
        return Err(unexpected("method with type parameters", func.pos));
    }

    if let Some(doc) = &func.doc {
        write_comments(out, doc);
    }

    let _ = write!(out, "func ({}) {}(", param(recv)?, func.name.name);
    for (index, p) in func.signature.params.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(&param(p)?);
    }
    out.push(')');

    match func.signature.results.as_slice() {
        [] => {}
        [single @ Param { name: None, .. }] => {
            out.push(' ');
            out.push_str(&print_type(&single.ty)?);
        }
        results => {
            out.push_str(" (");
            for (index, p) in results.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                out.push_str(&param(p)?);
            }
            out.push(')');
        }
    }

    if body.is_empty() {
        out.push_str(" {}\n");
        return Ok(());
    }

    out.push_str(" {\n");
    for stmt in body {
        match stmt {
            Stmt::Assign { target, field, value } => {
                let _ = writeln!(out, "\t{}.{} = {}", target.name, field.name, value.name);
            }
            Stmt::Opaque { pos } => return Err(unexpected("statement", *pos)),
        }
    }
    out.push_str("}\n");
    Ok(())
}

fn param(p: &Param) -> Result<String, CanonicalizeError> {
    let ty = print_type(&p.ty)?;
    Ok(match &p.name {
        Some(name) => format!("{} {ty}", name.name),
        None => ty,
    })
}

fn write_comments(out: &mut String, group: &CommentGroup) {
    for line in group.lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

fn quote(path: &str) -> String {
    let mut quoted = String::with_capacity(path.len() + 2);
    quoted.push('"');
    for c in path.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn unexpected(what: &'static str, pos: Position) -> CanonicalizeError {
    CanonicalizeError::Unexpected {
        what,
        line: pos.line,
        column: pos.column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_normalized() {
        let messy = "// Code generated by setgen. DO NOT EDIT.\n\n\n\
                     package a\nimport \"time\"\nimport ( \"database/sql\" ; \"time\" )\n\
                     func (s *a) SetCreatedAt(v time.Time) { s.CreatedAt = v }\n\n\n\n\
                     func (s *a) SetUpdatedAt(v sql.NullTime) {\n        s.UpdatedAt = v\n}";

        assert_eq!(
            canonicalize(messy).unwrap(),
            "// Code generated by setgen. DO NOT EDIT.\n\npackage a\n\nimport (\n\t\"database/sql\"\n\t\"time\"\n)\n\n\
             func (s *a) SetCreatedAt(v time.Time) {\n\ts.CreatedAt = v\n}\n\n\
             func (s *a) SetUpdatedAt(v sql.NullTime) {\n\ts.UpdatedAt = v\n}\n"
        );
    }

    #[test]
    fn test_no_imports_no_block() {
        let out = canonicalize("package a\nfunc (s *a) SetCreatedAt(v int64) { s.CreatedAt = v }").unwrap();
        assert_eq!(out, "package a\n\nfunc (s *a) SetCreatedAt(v int64) {\n\ts.CreatedAt = v\n}\n");
    }

    #[test]
    fn test_aliases_are_kept() {
        let out = canonicalize("package a\nimport (\nstdtime \"time\"\n)\n").unwrap();
        assert_eq!(out, "package a\n\nimport (\n\tstdtime \"time\"\n)\n");
    }

    #[test]
    fn test_package_doc_stays_attached() {
        let out = canonicalize("// Package a does things.\npackage a\n").unwrap();
        assert_eq!(out, "// Package a does things.\npackage a\n");
    }

    #[test]
    fn test_generic_receiver() {
        let out = canonicalize("package a\nfunc (s *Box[T, U]) SetCreatedAt(v T) { s.CreatedAt = v }").unwrap();
        assert!(out.contains("func (s *Box[T, U]) SetCreatedAt(v T) {\n"));

        let out = canonicalize("package a\nfunc (s1 *Box[s, v]) SetCreatedAt(v1 v) { s1.CreatedAt = v1 }").unwrap();
        assert!(out.contains("func (s1 *Box[s, v]) SetCreatedAt(v1 v) {\n\ts1.CreatedAt = v1\n}\n"));
    }

    #[test]
    fn test_idempotent() {
        let once = canonicalize("package a\nimport \"time\"\nfunc (s *a) SetCreatedAt(v time.Time) { s.CreatedAt = v }").unwrap();
        assert_eq!(canonicalize(&once).unwrap(), once);
    }

    #[test]
    fn test_rejects_foreign_declarations() {
        let err = canonicalize("package a\n\ntype a struct{}\n").unwrap_err();
        assert_eq!(
            err,
            CanonicalizeError::Unexpected {
                what: "type declaration",
                line: 3,
                column: 1
            }
        );

        let err = canonicalize("package a\n\nfunc main() {}\n").unwrap_err();
        assert!(matches!(err, CanonicalizeError::Unexpected { what: "function without receiver", .. }));

        let err = canonicalize("package a\n\nfunc (s *a) Set(v int) { println(v) }\n").unwrap_err();
        assert!(matches!(err, CanonicalizeError::Unexpected { what: "statement", .. }));
    }

    #[test]
    fn test_parse_failure() {
        let err = canonicalize("package a\nfunc (s *a) Set(v int {").unwrap_err();
        assert!(matches!(err, CanonicalizeError::Parse(_)));
    }
}
