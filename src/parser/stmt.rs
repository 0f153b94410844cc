use crate::{
    ast::{ast::Decl, expressions::Expr, statements::Stmt, types::Type},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_expr, parse_expr_list},
        lookups::BindingPower,
    },
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_handler(parser.current_token_kind()) {
        return handler(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier && parser.peek_kind() == TokenKind::Colon {
        return Ok(Stmt::Decl(parse_decl(parser)?));
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expr(expr))
}

/// Parses `name: type` followed by `;`, `= value;`, `= {elements};` or
/// `= {body}`.
///
/// A function type ending in `;` declares a prototype.
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let error = parser.unexpected_detailed("expected identifier at start of declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        return Ok(Decl::new(&name, ty.into_prototype()));
    }

    let error = parser.unexpected_detailed("expected `;` or `=` after declaration type");
    parser.expect_error(TokenKind::Assignment, Some(error))?;

    match &ty {
        Type::Function(_) => {
            if parser.current_token_kind() != TokenKind::OpenCurly {
                return Err(parser.unexpected_detailed("expected function body"));
            }
            let body = parse_block(parser)?;
            Ok(Decl::new(&name, ty).with_body(body))
        }
        Type::Array(_) if parser.current_token_kind() == TokenKind::OpenCurly => {
            parser.advance();
            let elements = parse_expr_list(parser, TokenKind::CloseCurly)?;
            parser.expect(TokenKind::CloseCurly)?;
            parser.expect(TokenKind::Semicolon)?;
            Ok(Decl::new(&name, ty).with_elements(elements))
        }
        _ => {
            let value = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Semicolon)?;
            Ok(Decl::new(&name, ty).with_value(value))
        }
    }
}

/// `{ stmt* }`, returning the statements.
fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut body = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(body)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_stmt(parser)?)
    } else {
        None
    };

    Ok(Stmt::if_else(condition, body, else_body))
}

/// An optional expression, absent when the next token is `end`.
fn parse_optional_expr(parser: &mut Parser, end: TokenKind) -> Result<Option<Expr>, Error> {
    if parser.current_token_kind() == end {
        return Ok(None);
    }

    Ok(Some(parse_expr(parser, BindingPower::Default)?))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::OpenParen)?;

    let init = parse_optional_expr(parser, TokenKind::Semicolon)?;
    parser.expect(TokenKind::Semicolon)?;
    let condition = parse_optional_expr(parser, TokenKind::Semicolon)?;
    parser.expect(TokenKind::Semicolon)?;
    let next = parse_optional_expr(parser, TokenKind::CloseParen)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(Stmt::for_loop(init, condition, next, body))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    let args = parse_expr_list(parser, TokenKind::Semicolon)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Print(args))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    let value = parse_optional_expr(parser, TokenKind::Semicolon)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(value))
}
