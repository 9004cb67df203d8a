use std::iter::Peekable;

use crate::{
    ast::DeclaredType,
    error::{CompileError, Location},
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by array literals, argument lists, and parameter
/// lists. It repeatedly calls `parse_item` to parse one element, expecting
/// either a comma to continue the list or the closing token to end it. An
/// immediately encountered closing token produces an empty list. Newlines
/// may appear freely between elements.
///
/// # Errors
/// Returns a `CompileError` if an item fails to parse or if something other
/// than a comma or the closing token follows an item.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    mut parse_item: impl FnMut(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut items = Vec::new();

    skip_newlines(tokens);
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }

    loop {
        skip_newlines(tokens);
        items.push(parse_item(tokens)?);
        skip_newlines(tokens);

        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((tok, _)) if tok == closing => {
                tokens.next();
                break;
            },
            Some((tok, loc)) => {
                return Err(CompileError::UnexpectedToken { found:    tok.to_string(),
                                                           expected: format!("',' or {closing}"),
                                                           loc:      loc.clone(), });
            },
            None => return Err(end_of_input()),
        }
    }

    Ok(items)
}

/// Parses a plain identifier and returns its name with its location.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(
    tokens: &mut Peekable<I>)
    -> ParseResult<(String, Location)>
    where I: Iterator<Item = &'a (Token, Location)>
{
    match tokens.next() {
        Some((Token::Identifier(s), loc)) => Ok((s.clone(), loc.clone())),
        Some((tok, loc)) => {
            Err(CompileError::UnexpectedToken { found:    tok.to_string(),
                                                expected: "an identifier".to_string(),
                                                loc:      loc.clone(), })
        },
        None => Err(end_of_input()),
    }
}

/// Consumes the next token, requiring it to equal `expected`.
///
/// `what` is the human description used in the error when it does not.
pub(in crate::interpreter::parser) fn expect_token<'a, I>(tokens: &mut Peekable<I>,
                                                          expected: &Token,
                                                          what: &str)
                                                          -> ParseResult<Location>
    where I: Iterator<Item = &'a (Token, Location)>
{
    match tokens.next() {
        Some((tok, loc)) if tok == expected => Ok(loc.clone()),
        Some((tok, loc)) => {
            Err(CompileError::UnexpectedToken { found:    tok.to_string(),
                                                expected: what.to_string(),
                                                loc:      loc.clone(), })
        },
        None => Err(end_of_input()),
    }
}

/// Skips over any newline tokens at the current position.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, Location)>
{
    while let Some((Token::NewLine, _)) = tokens.peek() {
        tokens.next();
    }
}

/// Skips newlines and semicolons, the separators between statements.
pub(in crate::interpreter::parser) fn skip_separators<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, Location)>
{
    while let Some((Token::NewLine | Token::Semicolon, _)) = tokens.peek() {
        tokens.next();
    }
}

/// Consumes the terminator of a simple statement.
///
/// A semicolon or an end of line is consumed; a closing curly bracket or
/// the end of the file terminate the statement without being consumed.
pub(in crate::interpreter::parser) fn expect_terminator<'a, I>(tokens: &mut Peekable<I>)
                                                               -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, Location)>
{
    match tokens.peek() {
        Some((Token::Semicolon | Token::NewLine, _)) => {
            tokens.next();
            Ok(())
        },
        Some((Token::RBrace | Token::Eof, _)) | None => Ok(()),
        Some((tok, loc)) => {
            Err(CompileError::UnexpectedToken { found:    tok.to_string(),
                                                expected: "';' or end of line".to_string(),
                                                loc:      loc.clone(), })
        },
    }
}

/// Maps a type keyword token to its [`DeclaredType`], if it is one.
pub(in crate::interpreter::parser) const fn token_declared_type(token: &Token)
                                                                -> Option<DeclaredType> {
    match token {
        Token::BoolType => Some(DeclaredType::Bool),
        Token::IntType => Some(DeclaredType::Int),
        Token::FloatType => Some(DeclaredType::Float),
        Token::StrType => Some(DeclaredType::Str),
        _ => None,
    }
}

/// Reads a token usable as a name: an identifier, or a type keyword in a
/// position where it acts as one (the conversion builtins share their names
/// with type keywords).
pub(in crate::interpreter::parser) fn token_name(token: &Token) -> Option<String> {
    match token {
        Token::Identifier(s) => Some(s.clone()),
        Token::BoolType => Some("bool".to_string()),
        Token::IntType => Some("int".to_string()),
        Token::FloatType => Some("float".to_string()),
        Token::StrType => Some("str".to_string()),
        _ => None,
    }
}

/// The defensive error for a token stream that ran out entirely.
///
/// `scan` terminates every stream with an end-of-file token, so this is
/// only reachable if a caller advances past it.
pub(in crate::interpreter::parser) fn end_of_input() -> CompileError {
    CompileError::UnexpectedEndOfInput { loc: Location::new("".into(), 0, 0) }
}
