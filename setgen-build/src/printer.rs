//! Canonical source text for type expressions.

use crate::errors::UnsupportedTypeError;
use crate::syntax::{ArrayLen, ChanDir, TypeExpr};

/// Render a type expression the way gofmt spells it.
///
/// Function types, non-empty struct and interface bodies and computed array
/// lengths have no canonical form here and yield [`UnsupportedTypeError`].
pub fn print_type(ty: &TypeExpr) -> Result<String, UnsupportedTypeError> {
    let mut out = String::new();
    write_type(&mut out, ty)?;
    Ok(out)
}

fn write_type(out: &mut String, ty: &TypeExpr) -> Result<(), UnsupportedTypeError> {
    match ty {
        TypeExpr::Name(ident) => out.push_str(&ident.name),
        TypeExpr::Qualified { package, member } => {
            out.push_str(&package.name);
            out.push('.');
            out.push_str(&member.name);
        }
        TypeExpr::Pointer(inner) => {
            out.push('*');
            write_type(out, inner)?;
        }
        TypeExpr::Slice(elem) => {
            out.push_str("[]");
            write_type(out, elem)?;
        }
        TypeExpr::Array { len, elem } => {
            out.push('[');
            match len {
                ArrayLen::Literal(text) => out.push_str(text),
                ArrayLen::Name(ident) => out.push_str(&ident.name),
                ArrayLen::Qualified { package, member } => {
                    out.push_str(&package.name);
                    out.push('.');
                    out.push_str(&member.name);
                }
                ArrayLen::Expr => {
                    return Err(UnsupportedTypeError {
                        kind: "array length expression",
                    });
                }
            }
            out.push(']');
            write_type(out, elem)?;
        }
        TypeExpr::Map { key, value } => {
            out.push_str("map[");
            write_type(out, key)?;
            out.push(']');
            write_type(out, value)?;
        }
        TypeExpr::Interface { elements: 0 } => out.push_str("interface{}"),
        TypeExpr::Interface { .. } => {
            return Err(UnsupportedTypeError {
                kind: "interface with methods",
            });
        }
        TypeExpr::Chan { dir, elem } => {
            out.push_str(match dir {
                ChanDir::Both => "chan ",
                ChanDir::Send => "chan<- ",
                ChanDir::Recv => "<-chan ",
            });
            // `chan <-chan T` would re-associate as `chan<- chan T`.
            let needs_parens = *dir == ChanDir::Both
                && matches!(
                    elem.as_ref(),
                    TypeExpr::Chan {
                        dir: ChanDir::Recv,
                        ..
                    }
                );
            if needs_parens {
                out.push('(');
                write_type(out, elem)?;
                out.push(')');
            } else {
                write_type(out, elem)?;
            }
        }
        TypeExpr::Ellipsis(elem) => {
            out.push_str("...");
            write_type(out, elem)?;
        }
        TypeExpr::Generic { base, args } => {
            write_type(out, base)?;
            out.push('[');
            for (index, arg) in args.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_type(out, arg)?;
            }
            out.push(']');
        }
        TypeExpr::Struct(st) if st.fields.is_empty() => out.push_str("struct{}"),
        TypeExpr::Struct(_) => {
            return Err(UnsupportedTypeError {
                kind: "struct type with fields",
            });
        }
        TypeExpr::Func(_) => return Err(UnsupportedTypeError { kind: "function type" }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Decl, TypeExpr, parse_file};

    /// Parse `type t <source>` and return the declared type expression.
    fn parse_type(source: &str) -> TypeExpr {
        let file = parse_file(&format!("package a\n\ntype t {source}\n")).unwrap();
        match file.decls.into_iter().next() {
            Some(Decl::Type(mut decl)) => decl.specs.remove(0).ty,
            other => panic!("unexpected decl: {other:?}"),
        }
    }

    fn print(source: &str) -> String {
        print_type(&parse_type(source)).unwrap()
    }

    #[test]
    fn test_simple_and_qualified() {
        assert_eq!(print("string"), "string");
        assert_eq!(print("time.Time"), "time.Time");
        assert_eq!(print("*time.Time"), "*time.Time");
    }

    #[test]
    fn test_composites() {
        assert_eq!(print("[]*sql.NullTime"), "[]*sql.NullTime");
        assert_eq!(print("map[string][]int"), "map[string][]int");
        assert_eq!(print("[16]byte"), "[16]byte");
        assert_eq!(print("[sha256.Size]byte"), "[sha256.Size]byte");
        assert_eq!(print("interface{}"), "interface{}");
        assert_eq!(print("map[string]struct{}"), "map[string]struct{}");
    }

    #[test]
    fn test_channels() {
        assert_eq!(print("chan int"), "chan int");
        assert_eq!(print("chan<- int"), "chan<- int");
        assert_eq!(print("<-chan time.Time"), "<-chan time.Time");
        assert_eq!(print("chan (<-chan int)"), "chan (<-chan int)");
    }

    #[test]
    fn test_generic_instantiation() {
        assert_eq!(print("Nullable[time.Time]"), "Nullable[time.Time]");
        assert_eq!(print("Pair[string, *big.Int]"), "Pair[string, *big.Int]");
    }

    #[test]
    fn test_unsupported_kinds() {
        let err = print_type(&parse_type("func() error")).unwrap_err();
        assert_eq!(err.kind, "function type");

        let err = print_type(&parse_type("interface{ String() string }")).unwrap_err();
        assert_eq!(err.kind, "interface with methods");

        let err = print_type(&parse_type("struct{ A int }")).unwrap_err();
        assert_eq!(err.kind, "struct type with fields");
    }
}
