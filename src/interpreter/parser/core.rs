use std::iter::Peekable;

use crate::{
    error::{CompileError, Location},
    interpreter::{
        lexer::Token,
        parser::{
            scope::ParserScope,
            statement::parse_statement,
            utils::{end_of_input, skip_newlines, skip_separators},
        },
    },
};

pub type ParseResult<T> = Result<T, CompileError>;

use crate::ast::Stmt;

/// Parses a whole program into its ordered statement list.
///
/// Statements are separated by newlines or semicolons; parsing stops at the
/// end-of-file token `scan` appends to every stream.
///
/// # Errors
/// Propagates the first [`CompileError`] any statement produces.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>, scope: &mut ParserScope)
                            -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let mut stmts = Vec::new();

    loop {
        skip_separators(tokens);

        match tokens.peek() {
            Some((Token::Eof, _)) | None => break,
            _ => stmts.push(parse_statement(tokens, scope)?),
        }
    }

    Ok(stmts)
}

/// Parses the body of a conditional, loop, or function.
///
/// Two cases:
/// ```text
///     { stmt1; stmt2; ... }
///     stmt1
/// ```
/// A function body must use curly brackets, which the caller requests with
/// `requires_curly`. Either way the body opens a fresh parser scope, so
/// names declared inside it are not visible after it.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>,
                          scope: &mut ParserScope,
                          requires_curly: bool)
                          -> ParseResult<Vec<Stmt>>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    skip_newlines(tokens);

    match tokens.peek() {
        Some((Token::LBrace, _)) => {
            tokens.next();
            scope.enter();

            let mut stmts = Vec::new();
            loop {
                skip_separators(tokens);

                match tokens.peek() {
                    Some((Token::RBrace, _)) => {
                        tokens.next();
                        break;
                    },
                    Some((Token::Eof, loc)) => {
                        scope.exit();
                        return Err(CompileError::UnexpectedToken {
                            found: "end of file".to_string(),
                            expected: "closing curly bracket '}'".to_string(),
                            loc: loc.clone(),
                        });
                    },
                    None => {
                        scope.exit();
                        return Err(end_of_input());
                    },
                    _ => stmts.push(parse_statement(tokens, scope)?),
                }
            }

            scope.exit();
            Ok(stmts)
        },
        Some((tok, loc)) if requires_curly => {
            Err(CompileError::UnexpectedToken { found:    tok.to_string(),
                                                expected: "opening curly bracket '{'".to_string(),
                                                loc:      loc.clone(), })
        },
        Some(_) => {
            scope.enter();
            let stmt = parse_statement(tokens, scope)?;
            scope.exit();
            Ok(vec![stmt])
        },
        None => Err(end_of_input()),
    }
}
