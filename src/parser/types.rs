//! Type parsing implementation.
//!
//! This module handles parsing of the types written in declarations and
//! parameter lists. It supports:
//!
//! - Atomic types (`integer`, `boolean`, `char`, `string`, `void`, `auto`)
//! - Array types with an optional size
//! - Function types with a return type and named parameters
//!
//! Each type is dispatched on its first token through the type NUD table.

use std::collections::HashMap;

use crate::{
    ast::types::{Param, Type},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Integer, parse_atomic_type);
    parser.type_nud(TokenKind::Boolean, parse_atomic_type);
    parser.type_nud(TokenKind::Char, parse_atomic_type);
    parser.type_nud(TokenKind::String, parse_atomic_type);
    parser.type_nud(TokenKind::Void, parse_atomic_type);
    parser.type_nud(TokenKind::Auto, parse_atomic_type);
    parser.type_nud(TokenKind::Array, parse_array_type);
    parser.type_nud(TokenKind::Function, parse_function_type);
}

pub fn parse_atomic_type(parser: &mut Parser) -> Result<Type, Error> {
    let ty = match parser.current_token_kind() {
        TokenKind::Integer => Type::Integer,
        TokenKind::Boolean => Type::Boolean,
        TokenKind::Char => Type::Character,
        TokenKind::String => Type::String,
        TokenKind::Void => Type::Void,
        TokenKind::Auto => Type::Auto,
        _ => return Err(parser.unexpected_detailed("expected a type")),
    };
    parser.advance();

    Ok(ty)
}

/// `array [N] T`, where an omitted `N` leaves the size to the initializer.
pub fn parse_array_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Array)?;
    parser.expect(TokenKind::OpenBracket)?;

    let size = if parser.current_token_kind() == TokenKind::IntegerLiteral {
        let position = parser.get_position();
        let token = parser.advance().clone();
        token
            .value
            .parse::<usize>()
            .map_err(|_| Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, position))?
    } else {
        0
    };

    parser.expect(TokenKind::CloseBracket)?;
    let subtype = parse_type(parser)?;

    Ok(Type::array(subtype, size))
}

/// `function T ( name: T, ... )`
pub fn parse_function_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Function)?;
    let return_type = parse_type(parser)?;

    parser.expect(TokenKind::OpenParen)?;
    let mut params = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let error = parser.unexpected_detailed("expected a parameter name");
            let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
            parser.expect(TokenKind::Colon)?;
            let ty = parse_type(parser)?;
            params.push(Param::new(&name, ty));

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Type::function(return_type, params))
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let handler = parser
        .get_type_nud_handler(parser.current_token_kind())
        .ok_or_else(|| parser.unexpected_detailed("expected a type"))?;

    handler(parser)
}
