use crate::{
    ast::expressions::{BinaryOp, Expr, PostfixOp, UnaryOp},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let nud = parser
        .get_nud_handler(parser.current_token_kind())
        .ok_or_else(|| parser.unexpected())?;

    let mut left = nud(parser)?;

    // While the current token binds tighter than `bp`, keep extending lhs
    while parser.get_binding_power(parser.current_token_kind()) > bp {
        let kind = parser.current_token_kind();
        let led = parser.get_led_handler(kind).ok_or_else(|| parser.unexpected())?;
        let led_bp = parser.get_binding_power(kind);

        left = led(parser, left, led_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let position = parser.get_position();
    let token = parser.advance().clone();

    match token.kind {
        TokenKind::IntegerLiteral => token
            .value
            .parse()
            .map(Expr::IntegerLiteral)
            .map_err(|_| Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, position)),
        TokenKind::True => Ok(Expr::BooleanLiteral(true)),
        TokenKind::False => Ok(Expr::BooleanLiteral(false)),
        TokenKind::CharLiteral => Ok(Expr::CharLiteral(token.value.bytes().next().unwrap_or(0))),
        TokenKind::StringLiteral => Ok(Expr::StringLiteral(token.value)),
        TokenKind::Identifier => Ok(Expr::name(&token.value)),
        _ => Err(Error::new(ErrorImpl::UnexpectedToken { token: token.value }, position)),
    }
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Dash => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Caret => Some(BinaryOp::Pow),
        TokenKind::Less => Some(BinaryOp::Less),
        TokenKind::LessEquals => Some(BinaryOp::LessEquals),
        TokenKind::Greater => Some(BinaryOp::Greater),
        TokenKind::GreaterEquals => Some(BinaryOp::GreaterEquals),
        TokenKind::Equals => Some(BinaryOp::Equals),
        TokenKind::NotEquals => Some(BinaryOp::NotEquals),
        TokenKind::And => Some(BinaryOp::And),
        TokenKind::Or => Some(BinaryOp::Or),
        _ => None,
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let op = binary_operator(parser.current_token_kind()).ok_or_else(|| parser.unexpected())?;
    parser.advance();

    // `^` is right associative: its right operand may hold another `^`
    let right_bp = if op == BinaryOp::Pow {
        BindingPower::Multiplicative
    } else {
        bp
    };
    let right = parse_expr(parser, right_bp)?;

    Ok(Expr::binary(op, left, right))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let op = match parser.advance().kind {
        TokenKind::Dash => UnaryOp::Negate,
        _ => UnaryOp::Not,
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::unary(op, operand))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let op = match parser.advance().kind {
        TokenKind::PlusPlus => PostfixOp::Increment,
        _ => PostfixOp::Decrement,
    };

    Ok(Expr::postfix(op, left))
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    // Right associative: `a = b = c` assigns `c` to `b` first
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::assign(left, value))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::group(expr))
}

/// Comma separated expressions up to (not including) `end`.
pub fn parse_expr_list(parser: &mut Parser, end: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut exprs = vec![];

    if parser.current_token_kind() == end {
        return Ok(exprs);
    }

    loop {
        exprs.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    Ok(exprs)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let name = match left {
        Expr::Name { name, .. } => name,
        _ => return Err(parser.unexpected_detailed("only a named function can be called")),
    };
    parser.advance();

    let args = parse_expr_list(parser, TokenKind::CloseParen)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::call(&name, args))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::index(left, index))
}
