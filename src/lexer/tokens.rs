use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("array", TokenKind::Array);
        map.insert("auto", TokenKind::Auto);
        map.insert("boolean", TokenKind::Boolean);
        map.insert("char", TokenKind::Char);
        map.insert("else", TokenKind::Else);
        map.insert("false", TokenKind::False);
        map.insert("for", TokenKind::For);
        map.insert("function", TokenKind::Function);
        map.insert("if", TokenKind::If);
        map.insert("integer", TokenKind::Integer);
        map.insert("print", TokenKind::Print);
        map.insert("return", TokenKind::Return);
        map.insert("string", TokenKind::String);
        map.insert("true", TokenKind::True);
        map.insert("void", TokenKind::Void);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,
    IntegerLiteral,
    StringLiteral,
    CharLiteral,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Semicolon,
    Colon,
    Comma,

    PlusPlus,
    MinusMinus,

    Plus,
    Dash,
    Caret,
    Slash,
    Star,
    Percent,

    // Reserved
    Array,
    Auto,
    Boolean,
    Char,
    Else,
    False,
    For,
    Function,
    If,
    Integer,
    Print,
    Return,
    String,
    True,
    Void,
}

impl TokenKind {
    /// The name printed for this kind in scan output.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::EOF => "EOF",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::IntegerLiteral => "INTEGER_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::CharLiteral => "CHARACTER_LITERAL",
            TokenKind::OpenBracket => "LEFTSQUARE",
            TokenKind::CloseBracket => "RIGHTSQUARE",
            TokenKind::OpenCurly => "LEFTCURLY",
            TokenKind::CloseCurly => "RIGHTCURLY",
            TokenKind::OpenParen => "LEFTPARAND",
            TokenKind::CloseParen => "RIGHTPARAND",
            TokenKind::Assignment => "ASSIGNMENT",
            TokenKind::Equals => "EQ",
            TokenKind::Not => "NOT",
            TokenKind::NotEquals => "NEQ",
            TokenKind::Less => "LT",
            TokenKind::LessEquals => "LE",
            TokenKind::Greater => "GT",
            TokenKind::GreaterEquals => "GE",
            TokenKind::Or => "OR",
            TokenKind::And => "AND",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::PlusPlus => "INCREMENT",
            TokenKind::MinusMinus => "DECREMENT",
            TokenKind::Plus => "PLUS",
            TokenKind::Dash => "MINUS",
            TokenKind::Caret => "EXPONENT",
            TokenKind::Slash => "DIVIDE",
            TokenKind::Star => "MULTIPLY",
            TokenKind::Percent => "MODULUS",
            TokenKind::Array => "ARRAY",
            TokenKind::Auto => "AUTO",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Char => "CHAR",
            TokenKind::Else => "ELSE",
            TokenKind::False => "FALSE",
            TokenKind::For => "FOR",
            TokenKind::Function => "FUNCTION",
            TokenKind::If => "IF",
            TokenKind::Integer => "INTEGER",
            TokenKind::Print => "PRINT",
            TokenKind::Return => "RETURN",
            TokenKind::String => "STRING",
            TokenKind::True => "TRUE",
            TokenKind::Void => "VOID",
        }
    }

    /// Whether tokens of this kind carry a value worth printing.
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::IntegerLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharLiteral
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A scanned token.
///
/// For string and character literals `value` holds the decoded text, with
/// the quotes removed and escapes replaced.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind.has_value() {
            write!(f, "{} {}", self.kind, self.value)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
