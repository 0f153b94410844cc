//! Expression nodes.
//!
//! Children are owned through `Box` and comma separated lists (call
//! arguments) through `Vec`. Name and call nodes carry a back-link to the
//! `Symbol` they refer to once the resolver has run.

use crate::resolver::symbol::SymbolRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Equals,
    NotEquals,
    And,
    Or,
}

/// The typing rule a binary operator follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Arithmetic,
    Relational,
    Equality,
    Logical,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn class(&self) -> OperatorClass {
        match self {
            BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::Pow => OperatorClass::Arithmetic,
            BinaryOp::Less | BinaryOp::LessEquals | BinaryOp::Greater | BinaryOp::GreaterEquals => {
                OperatorClass::Relational
            }
            BinaryOp::Equals | BinaryOp::NotEquals => OperatorClass::Equality,
            BinaryOp::And | BinaryOp::Or => OperatorClass::Logical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },
    Group(Box<Expr>),
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    CharLiteral(u8),
    StringLiteral(String),
    Name {
        name: String,
        symbol: Option<SymbolRef>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        symbol: Option<SymbolRef>,
    },
}

impl Expr {
    pub fn name(name: &str) -> Expr {
        Expr::Name {
            name: name.to_string(),
            symbol: None,
        }
    }

    pub fn integer(value: i64) -> Expr {
        Expr::IntegerLiteral(value)
    }

    pub fn boolean(value: bool) -> Expr {
        Expr::BooleanLiteral(value)
    }

    pub fn character(value: u8) -> Expr {
        Expr::CharLiteral(value)
    }

    pub fn string(value: &str) -> Expr {
        Expr::StringLiteral(value.to_string())
    }

    pub fn assign(target: Expr, value: Expr) -> Expr {
        Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn postfix(op: PostfixOp, operand: Expr) -> Expr {
        Expr::Postfix {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn group(inner: Expr) -> Expr {
        Expr::Group(Box::new(inner))
    }

    pub fn index(array: Expr, index: Expr) -> Expr {
        Expr::Index {
            array: Box::new(array),
            index: Box::new(index),
        }
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Expr {
        Expr::Call {
            name: name.to_string(),
            args,
            symbol: None,
        }
    }

    /// The resolved symbol of a name or call node.
    pub fn symbol(&self) -> Option<&SymbolRef> {
        match self {
            Expr::Name { symbol, .. } | Expr::Call { symbol, .. } => symbol.as_ref(),
            _ => None,
        }
    }

    /// Whether the expression denotes a storage location.
    pub fn is_addressable(&self) -> bool {
        match self {
            Expr::Name { .. } | Expr::Index { .. } => true,
            Expr::Group(inner) => inner.is_addressable(),
            _ => false,
        }
    }

    /// The value of a literal, possibly negated or parenthesised, as it
    /// would be stored in static data.
    pub fn constant_value(&self) -> Option<i64> {
        match self {
            Expr::IntegerLiteral(value) => Some(*value),
            Expr::BooleanLiteral(value) => Some(*value as i64),
            Expr::CharLiteral(value) => Some(*value as i64),
            Expr::Group(inner) => inner.constant_value(),
            Expr::Unary {
                op: UnaryOp::Negate,
                operand,
            } => operand.constant_value().map(i64::wrapping_neg),
            _ => None,
        }
    }
}
