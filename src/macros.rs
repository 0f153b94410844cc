//! Macros shared by the lexer (`MK_TOKEN!`, `MK_DEFAULT_HANDLER!`) and the
//! code generator (`EMIT!`).

/// Builds a `Token` from its kind, value and span.
///
/// ```ignore
/// tokens.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Lexer handler for a token whose text never varies, such as `<=` or `;`.
/// The token's value is the literal itself.
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let span = lexer.span($value.len());
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
            Ok(())
        }
    };
}

/// Appends one line of assembly to the compiler's output.
///
/// Takes the compiler followed by `format!` style arguments.
///
/// # Example
///
/// ```ignore
/// EMIT!(compiler, "\tadd\t{}, {}, {}", left, left, right);
/// ```
#[macro_export]
macro_rules! EMIT {
    ($compiler:expr, $($arg:tt)*) => {
        $compiler.emit_line(format!($($arg)*))
    };
}
