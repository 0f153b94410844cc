//! Canonical source rendering of the tree.
//!
//! The output parses back into an equivalent program. Nested statements are
//! indented with tabs.

use std::fmt::{Display, Formatter, Result};

use super::{
    ast::{Decl, Program},
    expressions::{Expr, UnaryOp},
    statements::Stmt,
};

pub fn escape_char(c: u8) -> String {
    match c {
        b'\n' => String::from("\\n"),
        b'\0' => String::from("\\0"),
        b'\\' => String::from("\\\\"),
        b'\'' => String::from("\\'"),
        b'"' => String::from("\\\""),
        other => (other as char).to_string(),
    }
}

pub fn escape_string(value: &str) -> String {
    value.bytes().map(escape_char).collect()
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Expr::Assign { target, value } => write!(f, "{} = {}", target, value),
            Expr::Binary { op, left, right } => write!(f, "{} {} {}", left, op.symbol(), right),
            Expr::Unary { op: UnaryOp::Not, operand } => write!(f, "!{}", operand),
            Expr::Unary {
                op: UnaryOp::Negate,
                operand,
            } => {
                let operand = operand.to_string();
                // `--` would lex as a decrement
                if operand.starts_with('-') {
                    write!(f, "- {}", operand)
                } else {
                    write!(f, "-{}", operand)
                }
            }
            Expr::Postfix { op, operand } => write!(f, "{}{}", operand, op.symbol()),
            Expr::Group(inner) => write!(f, "({})", inner),
            Expr::Index { array, index } => write!(f, "{}[{}]", array, index),
            Expr::IntegerLiteral(value) => write!(f, "{}", value),
            Expr::BooleanLiteral(value) => write!(f, "{}", value),
            Expr::CharLiteral(value) => write!(f, "'{}'", escape_char(*value)),
            Expr::StringLiteral(value) => write!(f, "\"{}\"", escape_string(value)),
            Expr::Name { name, .. } => write!(f, "{}", name),
            Expr::Call { name, args, .. } => {
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                write!(f, ")")
            }
        }
    }
}

fn write_list(f: &mut Formatter<'_>, exprs: &[Expr]) -> Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", expr)?;
    }
    Ok(())
}

fn write_indent(f: &mut Formatter<'_>, indent: usize) -> Result {
    write!(f, "{}", "\t".repeat(indent))
}

fn write_block(f: &mut Formatter<'_>, stmts: &[Stmt], indent: usize) -> Result {
    writeln!(f, "{{")?;
    for stmt in stmts {
        write_stmt(f, stmt, indent + 1)?;
        writeln!(f)?;
    }
    write_indent(f, indent)?;
    write!(f, "}}")
}

/// Writes the body of an `if`, `else` or `for`: blocks stay on the header
/// line, single statements go on the next line one level deeper.
fn write_body(f: &mut Formatter<'_>, body: &Stmt, indent: usize) -> Result {
    match body {
        Stmt::Block(stmts) => {
            write!(f, " ")?;
            write_block(f, stmts, indent)
        }
        other => {
            writeln!(f)?;
            write_stmt(f, other, indent + 1)
        }
    }
}

fn write_optional(f: &mut Formatter<'_>, expr: &Option<Expr>) -> Result {
    match expr {
        Some(expr) => write!(f, "{}", expr),
        None => Ok(()),
    }
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, indent: usize) -> Result {
    match stmt {
        Stmt::Decl(decl) => write_decl(f, decl, indent),
        Stmt::Expr(expr) => {
            write_indent(f, indent)?;
            write!(f, "{};", expr)
        }
        Stmt::IfElse {
            condition,
            body,
            else_body,
        } => {
            write_indent(f, indent)?;
            write!(f, "if ({})", condition)?;
            write_body(f, body, indent)?;

            if let Some(else_body) = else_body {
                if let Stmt::Block(_) = **body {
                    write!(f, " else")?;
                } else {
                    writeln!(f)?;
                    write_indent(f, indent)?;
                    write!(f, "else")?;
                }
                write_body(f, else_body, indent)?;
            }
            Ok(())
        }
        Stmt::For {
            init,
            condition,
            next,
            body,
        } => {
            write_indent(f, indent)?;
            write!(f, "for (")?;
            write_optional(f, init)?;
            write!(f, "; ")?;
            write_optional(f, condition)?;
            write!(f, "; ")?;
            write_optional(f, next)?;
            write!(f, ")")?;
            write_body(f, body, indent)
        }
        Stmt::Print(args) => {
            write_indent(f, indent)?;
            if args.is_empty() {
                write!(f, "print;")
            } else {
                write!(f, "print ")?;
                write_list(f, args)?;
                write!(f, ";")
            }
        }
        Stmt::Return(value) => {
            write_indent(f, indent)?;
            match value {
                Some(value) => write!(f, "return {};", value),
                None => write!(f, "return;"),
            }
        }
        Stmt::Block(stmts) => {
            write_indent(f, indent)?;
            write_block(f, stmts, indent)
        }
    }
}

fn write_decl(f: &mut Formatter<'_>, decl: &Decl, indent: usize) -> Result {
    write_indent(f, indent)?;
    write!(f, "{}: {}", decl.name, decl.ty)?;

    if let Some(body) = &decl.body {
        write!(f, " = ")?;
        return write_block(f, body, indent);
    }

    if let Some(value) = &decl.value {
        write!(f, " = {}", value)?;
    } else if !decl.elements.is_empty() {
        write!(f, " = {{")?;
        write_list(f, &decl.elements)?;
        write!(f, "}}")?;
    }

    write!(f, ";")
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write_stmt(f, self, 0)
    }
}

impl Display for Decl {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write_decl(f, self, 0)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for decl in &self.decls {
            writeln!(f, "{}", decl)?;
        }
        Ok(())
    }
}
