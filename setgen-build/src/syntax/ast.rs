//! Typed syntax tree for the Go subset the generator reads and writes.
//!
//! The tree is closed: every type expression form is an explicit variant, so
//! consumers match exhaustively instead of inspecting arbitrary nodes.

use std::fmt;

const KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough", "for", "func", "go",
    "goto", "if", "import", "interface", "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var",
];

/// 1-based source position. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 1 };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Position,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pos: Position::default(),
        }
    }
}

/// Whether `name` can be spelled as a Go identifier: a letter or `_`
/// followed by letters, `_` and Unicode digits, and not a keyword.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && !KEYWORDS.contains(&name)
}

/// A single `//` or `/* */` comment, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub pos: Position,
    pub end_line: usize,
    /// Comment shares its first line with preceding code.
    pub trailing: bool,
}

/// Consecutive comments with no blank line between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn end_line(&self) -> usize {
        self.list.last().map_or(0, |c| c.end_line)
    }

    /// Comment texts including their `//` or `/*` delimiters.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(|c| c.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Comment groups above the package clause, in source order.
    pub header: Vec<CommentGroup>,
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Local name: an alias, `_` or `.`.
    pub name: Option<String>,
    pub path: String,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Type(TypeDecl),
    /// `var` or `const` group; initializers are not modelled.
    Value(ValueDecl),
    Func(FuncDecl),
}

/// A `type` declaration group, parenthesized or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub doc: Option<CommentGroup>,
    pub specs: Vec<TypeSpec>,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Vec<Ident>,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Var,
    Const,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDecl {
    pub kind: ValueKind,
    pub doc: Option<CommentGroup>,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayLen {
    Literal(String),
    Name(Ident),
    Qualified { package: Ident, member: Ident },
    /// Anything else, such as `2 * N`.
    Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Name(Ident),
    Qualified { package: Ident, member: Ident },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array { len: ArrayLen, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// `...T`, valid as the last parameter type.
    Ellipsis(Box<TypeExpr>),
    /// Body elements are skipped; only their count is kept.
    Interface { elements: usize },
    Struct(StructType),
    Func(FuncType),
    Generic { base: Box<TypeExpr>, args: Vec<TypeExpr> },
}

impl TypeExpr {
    /// Package qualifiers referenced anywhere in this type, in order of appearance.
    pub fn qualifiers(&self) -> Vec<&str> {
        let mut found = Vec::new();
        self.collect_qualifiers(&mut found);
        found
    }

    fn collect_qualifiers<'a>(&'a self, found: &mut Vec<&'a str>) {
        match self {
            Self::Name(_) | Self::Interface { .. } => {}
            Self::Qualified { package, .. } => found.push(&package.name),
            Self::Pointer(inner) | Self::Slice(inner) | Self::Ellipsis(inner) => inner.collect_qualifiers(found),
            Self::Chan { elem, .. } => elem.collect_qualifiers(found),
            Self::Array { len, elem } => {
                if let ArrayLen::Qualified { package, .. } = len {
                    found.push(&package.name);
                }
                elem.collect_qualifiers(found);
            }
            Self::Map { key, value } => {
                key.collect_qualifiers(found);
                value.collect_qualifiers(found);
            }
            Self::Struct(st) => {
                for field in &st.fields {
                    field.ty.collect_qualifiers(found);
                }
            }
            Self::Func(func) => {
                for param in func.params.iter().chain(&func.results) {
                    param.ty.collect_qualifiers(found);
                }
            }
            Self::Generic { base, args } => {
                base.collect_qualifiers(found);
                for arg in args {
                    arg.collect_qualifiers(found);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructType {
    pub fields: Vec<Field>,
}

/// One field declaration line. Embedded fields have no names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<Ident>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    pub recv: Option<Param>,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub signature: FuncType,
    /// `None` for declarations without a body.
    pub body: Option<Vec<Stmt>>,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `target.field = value`
    Assign { target: Ident, field: Ident, value: Ident },
    Opaque { pos: Position },
}
