//! Lowers a tree-sitter-go concrete syntax tree into [`super::ast`].
//!
//! tree-sitter recovers from malformed input by inserting `ERROR` and
//! missing nodes; any such node fails the whole file with the position of
//! the first one, since a partially understood struct must never produce
//! setters.

use tree_sitter::{Node, Parser};

use super::ast::{
    ArrayLen, ChanDir, Comment, CommentGroup, Decl, Field, File, FuncDecl, FuncType, Ident, ImportSpec, Param,
    Position, Stmt, StructType, TypeDecl, TypeExpr, TypeSpec, ValueDecl, ValueKind,
};
use crate::errors::ParseError;

/// Parse one Go source file.
pub fn parse_file(source: &str) -> Result<File, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|err| ParseError::at(Position::START, format!("failed to load Go grammar: {err}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::at(Position::START, "parser returned no tree"))?;

    let root = tree.root_node();
    if let Some(node) = first_error(root) {
        return Err(syntax_error(node, source));
    }
    Lowering { source }.file(root)
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    children(node).into_iter().find_map(first_error)
}

fn syntax_error(node: Node<'_>, source: &str) -> ParseError {
    let message = if node.is_missing() {
        format!("expected `{}`", node.kind())
    } else {
        match source[node.byte_range()].split_whitespace().next() {
            Some(token) => format!("unexpected `{token}`"),
            None => "unexpected end of file".to_string(),
        }
    };
    ParseError::at(position(node), message)
}

/// Merge comments on adjacent lines. Trailing comments stand alone.
fn group_comments(comments: Vec<Comment>) -> Vec<CommentGroup> {
    let mut groups: Vec<CommentGroup> = Vec::new();
    for comment in comments {
        if let Some(group) = groups.last_mut()
            && let Some(last) = group.list.last()
            && !comment.trailing
            && !last.trailing
            && comment.pos.line <= last.end_line + 1
        {
            group.list.push(comment);
            continue;
        }
        groups.push(CommentGroup { list: vec![comment] });
    }
    groups
}

/// The doc comment of a declaration at `pos` is the last pending group, if
/// it ends on the line directly above.
fn take_doc(pending: &mut Vec<Comment>, pos: Position) -> Option<CommentGroup> {
    let group = group_comments(std::mem::take(pending)).pop()?;
    let leading = group.list.first().is_some_and(|c| !c.trailing);
    (leading && group.end_line() + 1 == pos.line).then_some(group)
}

struct Lowering<'s> {
    source: &'s str,
}

impl<'s> Lowering<'s> {
    fn file(&self, root: Node<'_>) -> Result<File, ParseError> {
        let mut header = Vec::new();
        let mut package = None;
        let mut imports = Vec::new();
        let mut decls = Vec::new();
        let mut pending = Vec::new();
        let mut code_end = None;

        for node in named_children(root) {
            if node.kind() == "comment" {
                pending.push(self.comment(node, code_end));
                continue;
            }
            code_end = Some(node.end_position().row);

            if node.kind() == "package_clause" {
                if package.is_some() {
                    return Err(ParseError::at(position(node), "duplicate package clause"));
                }
                header = group_comments(std::mem::take(&mut pending));
                package = Some(self.package_clause(node)?);
                continue;
            }
            if package.is_none() {
                return Err(ParseError::at(position(node), "expected `package` clause"));
            }

            let pos = position(node);
            let doc = take_doc(&mut pending, pos);
            match node.kind() {
                "import_declaration" => {
                    if !decls.is_empty() {
                        return Err(ParseError::at(pos, "imports must appear before other declarations"));
                    }
                    self.import_decl(node, &mut imports)?;
                }
                "type_declaration" => decls.push(Decl::Type(self.type_decl(node, doc)?)),
                "var_declaration" => decls.push(Decl::Value(ValueDecl {
                    kind: ValueKind::Var,
                    doc,
                    pos,
                })),
                "const_declaration" => decls.push(Decl::Value(ValueDecl {
                    kind: ValueKind::Const,
                    doc,
                    pos,
                })),
                "function_declaration" | "method_declaration" => decls.push(Decl::Func(self.func_decl(node, doc)?)),
                other => {
                    return Err(ParseError::at(
                        pos,
                        format!("expected declaration, found {}", other.replace('_', " ")),
                    ));
                }
            }
        }

        let package =
            package.ok_or_else(|| ParseError::at(end_position(root), "expected `package` clause"))?;
        Ok(File {
            header,
            package,
            imports,
            decls,
        })
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn ident(&self, node: Node<'_>) -> Ident {
        Ident {
            name: self.text(node).to_string(),
            pos: position(node),
        }
    }

    fn comment(&self, node: Node<'_>, code_end: Option<usize>) -> Comment {
        Comment {
            text: self.text(node).trim_end().to_string(),
            pos: position(node),
            end_line: node.end_position().row + 1,
            trailing: code_end == Some(node.start_position().row),
        }
    }

    fn package_clause(&self, node: Node<'_>) -> Result<Ident, ParseError> {
        named_children(node)
            .into_iter()
            .find(|child| child.kind() == "package_identifier")
            .map(|name| self.ident(name))
            .ok_or_else(|| ParseError::at(position(node), "expected package name"))
    }

    fn import_decl(&self, node: Node<'_>, imports: &mut Vec<ImportSpec>) -> Result<(), ParseError> {
        for child in named_children(node) {
            match child.kind() {
                "import_spec" => imports.push(self.import_spec(child)?),
                "import_spec_list" => {
                    for spec in named_children(child) {
                        if spec.kind() == "import_spec" {
                            imports.push(self.import_spec(spec)?);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn import_spec(&self, node: Node<'_>) -> Result<ImportSpec, ParseError> {
        let name = node.child_by_field_name("name").map(|name| self.text(name).to_string());
        let literal = required(node, "path")?;
        let path = unquote(self.text(literal))
            .ok_or_else(|| ParseError::at(position(literal), "malformed import path"))?;
        if path.is_empty() {
            return Err(ParseError::at(position(literal), "invalid import path: empty string"));
        }
        Ok(ImportSpec {
            name,
            path,
            pos: position(node),
        })
    }

    fn type_decl(&self, node: Node<'_>, doc: Option<CommentGroup>) -> Result<TypeDecl, ParseError> {
        let specs = named_children(node)
            .into_iter()
            .filter(|child| matches!(child.kind(), "type_spec" | "alias_declaration"))
            .map(|spec| self.type_spec(spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeDecl {
            doc,
            specs,
            pos: position(node),
        })
    }

    fn type_spec(&self, node: Node<'_>) -> Result<TypeSpec, ParseError> {
        Ok(TypeSpec {
            name: self.ident(required(node, "name")?),
            type_params: self.type_params(node),
            alias: node.kind() == "alias_declaration",
            ty: self.ty(required(node, "type")?)?,
        })
    }

    /// Names only; constraints are not needed to spell a receiver.
    fn type_params(&self, node: Node<'_>) -> Vec<Ident> {
        let Some(list) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        named_children(list)
            .into_iter()
            .flat_map(|decl| field_children(decl, "name"))
            .map(|name| self.ident(name))
            .collect()
    }

    fn func_decl(&self, node: Node<'_>, doc: Option<CommentGroup>) -> Result<FuncDecl, ParseError> {
        let recv = match node.child_by_field_name("receiver") {
            Some(list) => {
                let mut params = self.params(list)?;
                if params.len() != 1 {
                    return Err(ParseError::at(position(list), "method must have exactly one receiver"));
                }
                params.pop()
            }
            None => None,
        };
        Ok(FuncDecl {
            doc,
            recv,
            name: self.ident(required(node, "name")?),
            type_params: self.type_params(node),
            signature: self.signature(node)?,
            body: node.child_by_field_name("body").map(|body| self.block(body)),
            pos: position(node),
        })
    }

    fn signature(&self, node: Node<'_>) -> Result<FuncType, ParseError> {
        let params = self.params(required(node, "parameters")?)?;
        let results = match node.child_by_field_name("result") {
            None => Vec::new(),
            Some(list) if list.kind() == "parameter_list" => self.params(list)?,
            Some(result) => vec![Param {
                name: None,
                ty: self.ty(result)?,
            }],
        };
        Ok(FuncType { params, results })
    }

    /// One [`Param`] per declared name, so `(a, b int)` yields two.
    fn params(&self, list: Node<'_>) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        for decl in named_children(list) {
            let ty = match decl.kind() {
                "parameter_declaration" => self.ty(required(decl, "type")?)?,
                "variadic_parameter_declaration" => TypeExpr::Ellipsis(Box::new(self.ty(required(decl, "type")?)?)),
                "comment" => continue,
                other => {
                    return Err(ParseError::at(
                        position(decl),
                        format!("unexpected {} in parameter list", other.replace('_', " ")),
                    ));
                }
            };
            let names = field_children(decl, "name");
            if names.is_empty() {
                params.push(Param { name: None, ty });
                continue;
            }
            for name in names {
                params.push(Param {
                    name: Some(self.ident(name)),
                    ty: ty.clone(),
                });
            }
        }
        Ok(params)
    }

    fn block(&self, node: Node<'_>) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "comment" => {}
                // Newer grammars wrap block contents in a list node.
                "statement_list" => stmts.extend(
                    named_children(child)
                        .into_iter()
                        .filter(|stmt| stmt.kind() != "comment")
                        .map(|stmt| self.stmt(stmt)),
                ),
                _ => stmts.push(self.stmt(child)),
            }
        }
        stmts
    }

    fn stmt(&self, node: Node<'_>) -> Stmt {
        self.field_assignment(node)
            .unwrap_or(Stmt::Opaque { pos: position(node) })
    }

    /// `target.field = value` with plain identifiers on both sides.
    fn field_assignment(&self, node: Node<'_>) -> Option<Stmt> {
        if node.kind() != "assignment_statement"
            || !children(node).iter().any(|token| !token.is_named() && token.kind() == "=")
        {
            return None;
        }
        let &[left] = expressions(node.child_by_field_name("left")?).as_slice() else {
            return None;
        };
        let &[right] = expressions(node.child_by_field_name("right")?).as_slice() else {
            return None;
        };
        if left.kind() != "selector_expression" || right.kind() != "identifier" {
            return None;
        }
        let target = left.child_by_field_name("operand")?;
        let field = left.child_by_field_name("field")?;
        (target.kind() == "identifier").then(|| Stmt::Assign {
            target: self.ident(target),
            field: self.ident(field),
            value: self.ident(right),
        })
    }

    fn ty(&self, node: Node<'_>) -> Result<TypeExpr, ParseError> {
        let ty = match node.kind() {
            "type_identifier" | "identifier" => TypeExpr::Name(self.ident(node)),
            "qualified_type" => TypeExpr::Qualified {
                package: self.ident(required(node, "package")?),
                member: self.ident(required(node, "name")?),
            },
            "pointer_type" => TypeExpr::Pointer(Box::new(self.ty(only_child(node)?)?)),
            "slice_type" => TypeExpr::Slice(Box::new(self.ty(required(node, "element")?)?)),
            "array_type" => TypeExpr::Array {
                len: self.array_len(required(node, "length")?),
                elem: Box::new(self.ty(required(node, "element")?)?),
            },
            "map_type" => TypeExpr::Map {
                key: Box::new(self.ty(required(node, "key")?)?),
                value: Box::new(self.ty(required(node, "value")?)?),
            },
            "channel_type" => TypeExpr::Chan {
                dir: chan_dir(node),
                elem: Box::new(self.ty(required(node, "value")?)?),
            },
            "function_type" => TypeExpr::Func(self.signature(node)?),
            "struct_type" => TypeExpr::Struct(self.struct_type(node)?),
            "interface_type" => TypeExpr::Interface {
                elements: named_children(node)
                    .iter()
                    .filter(|element| element.kind() != "comment")
                    .count(),
            },
            "generic_type" => TypeExpr::Generic {
                base: Box::new(self.ty(required(node, "type")?)?),
                args: named_children(required(node, "type_arguments")?)
                    .into_iter()
                    .filter(|arg| arg.kind() != "comment")
                    .map(|arg| self.ty(arg))
                    .collect::<Result<_, _>>()?,
            },
            // A `type_elem` with one term is just that type; unions only
            // appear in constraints, which are never lowered.
            "parenthesized_type" | "type_elem" => return self.ty(only_child(node)?),
            other => {
                return Err(ParseError::at(
                    position(node),
                    format!("unexpected {} in type", other.replace('_', " ")),
                ));
            }
        };
        Ok(ty)
    }

    fn array_len(&self, node: Node<'_>) -> ArrayLen {
        match node.kind() {
            "int_literal" => ArrayLen::Literal(self.text(node).to_string()),
            "identifier" => ArrayLen::Name(self.ident(node)),
            "selector_expression" => match (node.child_by_field_name("operand"), node.child_by_field_name("field")) {
                (Some(package), Some(member)) if package.kind() == "identifier" => ArrayLen::Qualified {
                    package: self.ident(package),
                    member: self.ident(member),
                },
                _ => ArrayLen::Expr,
            },
            _ => ArrayLen::Expr,
        }
    }

    fn struct_type(&self, node: Node<'_>) -> Result<StructType, ParseError> {
        let mut fields = Vec::new();
        for list in named_children(node) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            for decl in named_children(list) {
                if decl.kind() == "field_declaration" {
                    fields.push(self.field_decl(decl)?);
                }
            }
        }
        Ok(StructType { fields })
    }

    fn field_decl(&self, node: Node<'_>) -> Result<Field, ParseError> {
        let names: Vec<Ident> = field_children(node, "name")
            .into_iter()
            .map(|name| self.ident(name))
            .collect();
        let mut ty = self.ty(required(node, "type")?)?;
        // `*T` embeds keep the star outside the type node.
        if names.is_empty() && children(node).iter().any(|token| !token.is_named() && token.kind() == "*") {
            ty = TypeExpr::Pointer(Box::new(ty));
        }
        Ok(Field {
            names,
            ty,
            tag: node.child_by_field_name("tag").map(|tag| self.text(tag).to_string()),
        })
    }
}

fn chan_dir(node: Node<'_>) -> ChanDir {
    let tokens: Vec<&str> = children(node)
        .into_iter()
        .filter(|token| !token.is_named())
        .map(|token| token.kind())
        .collect();
    match tokens.as_slice() {
        ["<-", "chan", ..] => ChanDir::Recv,
        ["chan", "<-", ..] => ChanDir::Send,
        _ => ChanDir::Both,
    }
}

fn expressions(node: Node<'_>) -> Vec<Node<'_>> {
    if node.kind() == "expression_list" {
        named_children(node)
            .into_iter()
            .filter(|expr| expr.kind() != "comment")
            .collect()
    } else {
        vec![node]
    }
}

/// Decode a Go string literal. Returns `None` for malformed escapes.
fn unquote(literal: &str) -> Option<String> {
    if let Some(raw) = literal.strip_prefix('`').and_then(|rest| rest.strip_suffix('`')) {
        return Some(raw.replace('\r', ""));
    }
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next()? {
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            '\\' => '\\',
            '"' => '"',
            'x' => hex_escape(&mut chars, 2)?,
            'u' => hex_escape(&mut chars, 4)?,
            'U' => hex_escape(&mut chars, 8)?,
            _ => return None,
        };
        out.push(decoded);
    }
    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)
}

fn position(node: Node<'_>) -> Position {
    let point = node.start_position();
    Position {
        line: point.row + 1,
        column: point.column + 1,
    }
}

fn end_position(node: Node<'_>) -> Position {
    let point = node.end_position();
    Position {
        line: point.row + 1,
        column: point.column + 1,
    }
}

fn required<'t>(node: Node<'t>, field: &str) -> Result<Node<'t>, ParseError> {
    node.child_by_field_name(field).ok_or_else(|| {
        ParseError::at(
            position(node),
            format!("{} without {field}", node.kind().replace('_', " ")),
        )
    })
}

fn only_child<'t>(node: Node<'t>) -> Result<Node<'t>, ParseError> {
    let mut inner = named_children(node)
        .into_iter()
        .filter(|child| child.kind() != "comment");
    match (inner.next(), inner.next()) {
        (Some(child), None) => Ok(child),
        _ => Err(ParseError::at(
            position(node),
            format!("expected a single type in {}", node.kind().replace('_', " ")),
        )),
    }
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}
