use std::iter::Peekable;

use crate::{
    ast::{AssignOp, Expr, LoopSection, Param, Stmt},
    error::{CompileError, Location},
    interpreter::{
        evaluator::function::BUILTIN_FUNCTIONS,
        lexer::Token,
        parser::{
            core::{ParseResult, parse_block},
            expr::{parse_expression, parse_postfix},
            scope::{FunctionSig, ParserScope},
            utils::{end_of_input, expect_terminator, expect_token, parse_comma_separated,
                    parse_identifier, skip_newlines, token_declared_type, token_name},
        },
    },
};

/// The most subscript dimensions a declaration may carry.
const MAX_DIMENSIONS: usize = 255;

/// Parses a single statement.
///
/// Dispatch happens on the first token:
/// - `let` begins a declaration,
/// - an identifier (or type keyword) begins an assignment or a call,
/// - `if` begins a conditional chain; a stray `elif`/`else` is an error,
/// - `loop` begins a loop,
/// - `fn` begins a function definition,
/// - `return` begins a return.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>, scope: &mut ParserScope)
                              -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (token, loc) = tokens.peek().ok_or_else(end_of_input)?;
    let loc = loc.clone();

    match token {
        Token::Let => parse_declaration(tokens, scope, loc),
        Token::If => parse_conditional(tokens, scope, loc),
        Token::Elif | Token::Else => {
            Err(CompileError::DanglingConditional { keyword: if *token == Token::Elif {
                                                                 "elif".to_string()
                                                             } else {
                                                                 "else".to_string()
                                                             },
                                                    loc })
        },
        Token::Loop => parse_loop(tokens, scope, loc),
        Token::Fn => parse_function(tokens, scope, loc),
        Token::Return => parse_return(tokens, scope, loc),
        _ => {
            if let Some(name) = token_name(token) {
                tokens.next();
                parse_variable_statement(tokens, scope, name, loc)
            } else {
                Err(CompileError::UnexpectedToken { found:    token.to_string(),
                                                    expected: "a statement".to_string(),
                                                    loc })
            }
        },
    }
}

/// Parses a `let` declaration.
///
/// Grammar:
/// ```text
///     let name = expr
///     let name type ( "[" expr? "]" )*  ( = expr )?
/// ```
/// A typed declaration without initializer takes the type's default value;
/// declared dimensions build nested arrays of defaults. A declaration with
/// neither a type nor an initializer is rejected.
fn parse_declaration<'a, I>(tokens: &mut Peekable<I>,
                            scope: &mut ParserScope,
                            loc: Location)
                            -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    tokens.next(); // let

    let (name, _) = parse_identifier(tokens)?;

    let ty = if let Some((token, _)) = tokens.peek()
                && let Some(ty) = token_declared_type(token)
    {
        tokens.next();
        Some(ty)
    } else {
        None
    };

    let mut dims = Vec::new();
    if ty.is_some() {
        while let Some((Token::LBracket, _)) = tokens.peek() {
            tokens.next();

            if let Some((Token::RBracket, _)) = tokens.peek() {
                dims.push(None);
            } else {
                dims.push(Some(parse_expression(tokens, scope)?));
            }

            expect_token(tokens, &Token::RBracket, "closing square bracket ']'")?;
        }

        if dims.len() > MAX_DIMENSIONS {
            return Err(CompileError::TooManySubscripts { loc });
        }
    }

    let init = match tokens.peek() {
        Some((Token::Equals, _)) => {
            tokens.next();
            Some(parse_expression(tokens, scope)?)
        },
        Some((tok @ (Token::PlusAssign
              | Token::MinusAssign
              | Token::MulAssign
              | Token::DivAssign
              | Token::ModAssign),
              op_loc)) => {
            return Err(CompileError::UnexpectedToken { found:    tok.to_string(),
                                                       expected: "assignment '='".to_string(),
                                                       loc:      op_loc.clone(), });
        },
        _ => None,
    };

    if ty.is_none() && init.is_none() {
        let (found, found_loc) = tokens.peek()
                                       .map(|(tok, l)| (tok.to_string(), l.clone()))
                                       .ok_or_else(end_of_input)?;
        return Err(CompileError::UnexpectedToken { found,
                                                   expected:
                                                       "a type or an initializer".to_string(),
                                                   loc: found_loc, });
    }

    expect_terminator(tokens)?;
    scope.declare(&name, ty);

    Ok(Stmt::VariableInit { name, ty, dims, init, loc })
}

/// Parses a statement that starts with a name: an assignment, an indexed
/// assignment, a call, or a method call.
fn parse_variable_statement<'a, I>(tokens: &mut Peekable<I>,
                                   scope: &mut ParserScope,
                                   name: String,
                                   loc: Location)
                                   -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    match tokens.peek() {
        Some((tok, _)) if token_assign_op(tok).is_some() => {
            let op = token_assign_op(tok).ok_or_else(end_of_input)?;
            tokens.next();

            if !scope.is_declared(&name) {
                return Err(CompileError::UndeclaredVariable { name, loc });
            }

            let value = parse_expression(tokens, scope)?;
            expect_terminator(tokens)?;

            Ok(Stmt::VariableAssign { name, op, value, loc })
        },
        Some((Token::LBracket, _)) => {
            if !scope.is_declared(&name) {
                return Err(CompileError::UndeclaredVariable { name, loc });
            }

            let mut subscripts = Vec::new();
            while let Some((Token::LBracket, _)) = tokens.peek() {
                tokens.next();
                subscripts.push(parse_expression(tokens, scope)?);
                expect_token(tokens, &Token::RBracket, "closing square bracket ']'")?;
            }

            expect_token(tokens, &Token::Equals, "assignment '=' after the subscripts")?;

            let value = parse_expression(tokens, scope)?;
            expect_terminator(tokens)?;

            Ok(Stmt::ElementAssign { name,
                                     subscripts,
                                     value,
                                     loc })
        },
        Some((Token::LParen, _)) => {
            tokens.next();

            if !BUILTIN_FUNCTIONS.contains(&name.as_str()) && !scope.has_function(&name) {
                return Err(CompileError::UnknownFunction { name, loc });
            }

            let arguments =
                parse_comma_separated(tokens, |t| parse_expression(t, scope), &Token::RParen)?;
            expect_terminator(tokens)?;

            Ok(Stmt::Expression { expr: Expr::Call { name,
                                                     arguments,
                                                     loc: loc.clone() },
                                  loc })
        },
        Some((Token::Dot, _)) => {
            if !scope.is_declared(&name) {
                return Err(CompileError::UndeclaredVariable { name, loc });
            }

            let node = Expr::Variable { name,
                                        loc: loc.clone() };
            let expr = parse_postfix(tokens, scope, node)?;
            expect_terminator(tokens)?;

            Ok(Stmt::Expression { expr, loc })
        },
        Some((tok, tok_loc)) => {
            Err(CompileError::UnexpectedToken { found:    tok.to_string(),
                                                expected: "an assignment or a call".to_string(),
                                                loc:      tok_loc.clone(), })
        },
        None => Err(end_of_input()),
    }
}

/// Maps a token to an assignment operator, or `None`.
const fn token_assign_op(token: &Token) -> Option<AssignOp> {
    match token {
        Token::Equals => Some(AssignOp::Assign),
        Token::PlusAssign => Some(AssignOp::Add),
        Token::MinusAssign => Some(AssignOp::Sub),
        Token::MulAssign => Some(AssignOp::Mul),
        Token::DivAssign => Some(AssignOp::Div),
        Token::ModAssign => Some(AssignOp::Mod),
        _ => None,
    }
}

/// Parses an `if`/`elif`/`else` chain into an ordered branch list.
///
/// Each branch pairs an optional condition with its body; the `else`
/// branch, when present, is the final entry with no condition.
fn parse_conditional<'a, I>(tokens: &mut Peekable<I>,
                            scope: &mut ParserScope,
                            loc: Location)
                            -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    tokens.next(); // if

    let mut branches = Vec::new();

    expect_token(tokens, &Token::LParen, "'(' before the if condition")?;
    let condition = parse_expression(tokens, scope)?;
    expect_token(tokens, &Token::RParen, "closing bracket ')'")?;
    branches.push((Some(condition), parse_block(tokens, scope, false)?));

    loop {
        // the chain may continue on the next line
        let mut lookahead = tokens.clone();
        skip_newlines(&mut lookahead);

        match lookahead.peek() {
            Some((Token::Elif, _)) => {
                skip_newlines(tokens);
                tokens.next();

                expect_token(tokens, &Token::LParen, "'(' before the elif condition")?;
                let condition = parse_expression(tokens, scope)?;
                expect_token(tokens, &Token::RParen, "closing bracket ')'")?;
                branches.push((Some(condition), parse_block(tokens, scope, false)?));
            },
            Some((Token::Else, _)) => {
                skip_newlines(tokens);
                tokens.next();

                branches.push((None, parse_block(tokens, scope, false)?));
                break;
            },
            _ => break,
        }
    }

    Ok(Stmt::If { branches, loc })
}

/// Parses a `loop (...)` statement.
///
/// The header holds comma separated sections, each one of:
/// - `name = expr` (init: evaluated once, before the first iteration),
/// - `name : expr` (range: binds `name` to successive elements),
/// - a bare expression (condition: the loop exits when it is false).
fn parse_loop<'a, I>(tokens: &mut Peekable<I>,
                     scope: &mut ParserScope,
                     loc: Location)
                     -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    tokens.next(); // loop

    expect_token(tokens, &Token::LParen, "'(' before the loop sections")?;
    scope.enter();

    let mut sections = Vec::new();
    loop {
        skip_newlines(tokens);

        if let Some((Token::RParen, _)) = tokens.peek() {
            tokens.next();
            break;
        }

        sections.push(parse_loop_section(tokens, scope)?);

        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((Token::RParen, _)) => {
                tokens.next();
                break;
            },
            Some((tok, tok_loc)) => {
                scope.exit();
                return Err(CompileError::UnexpectedToken { found:    tok.to_string(),
                                                           expected: "',' or ')'".to_string(),
                                                           loc:      tok_loc.clone(), });
            },
            None => {
                scope.exit();
                return Err(end_of_input());
            },
        }
    }

    let body = parse_block(tokens, scope, false)?;
    scope.exit();

    Ok(Stmt::Loop { sections, body, loc })
}

/// Parses one loop header section, looking one token past a leading
/// identifier to tell the three forms apart.
fn parse_loop_section<'a, I>(tokens: &mut Peekable<I>,
                             scope: &mut ParserScope)
                             -> ParseResult<LoopSection>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    if matches!(tokens.peek(), Some((Token::Identifier(_), _))) {
        let mut lookahead = tokens.clone();
        lookahead.next();

        let is_range = match lookahead.peek() {
            Some((Token::Colon, _)) => Some(true),
            Some((Token::Equals, _)) => Some(false),
            _ => None,
        };

        if let Some(is_range) = is_range {
            let (name, _) = parse_identifier(tokens)?;
            tokens.next(); // the ':' or '='

            let value = parse_expression(tokens, scope)?;
            scope.declare(&name, None);

            return Ok(if is_range {
                LoopSection::Range { name, value }
            } else {
                LoopSection::Init { name, value }
            });
        }
    }

    Ok(LoopSection::Condition(parse_expression(tokens, scope)?))
}

/// Parses a function definition.
///
/// Grammar:
/// ```text
///     fn name "(" (param type ("," param type)*)? ")" rtype? "{" stmt* "}"
/// ```
/// The function is registered before its body is parsed so the body can
/// call it recursively. Redefining an existing function is a warning, not
/// an error; reusing a builtin's name is rejected.
fn parse_function<'a, I>(tokens: &mut Peekable<I>,
                         scope: &mut ParserScope,
                         loc: Location)
                         -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    tokens.next(); // fn

    let (name, name_loc) = parse_identifier(tokens)?;
    if BUILTIN_FUNCTIONS.contains(&name.as_str()) {
        return Err(CompileError::BuiltinRedefinition { name, loc: name_loc });
    }

    expect_token(tokens, &Token::LParen, "'(' before the parameters")?;
    let params = parse_comma_separated(tokens, parse_param, &Token::RParen)?;

    let rtn = if let Some((token, _)) = tokens.peek()
                 && let Some(ty) = token_declared_type(token)
    {
        tokens.next();
        Some(ty)
    } else {
        None
    };

    let fresh = scope.declare_function(&name, FunctionSig { params: params.iter()
                                                                          .map(|p| p.ty)
                                                                          .collect(),
                                                            rtn });
    if !fresh {
        eprintln!("warning at {loc}: function '{name}' has already been defined; the latest definition wins");
    }

    scope.enter();
    for param in &params {
        scope.declare(&param.name, Some(param.ty));
    }
    let body = parse_block(tokens, scope, true)?;
    scope.exit();

    Ok(Stmt::Function { name,
                        params,
                        rtn,
                        body,
                        loc })
}

/// Parses one `name type` parameter.
fn parse_param<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Param>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (name, _) = parse_identifier(tokens)?;

    match tokens.next() {
        Some((token, loc)) => match token_declared_type(token) {
            Some(ty) => Ok(Param { name, ty }),
            None => Err(CompileError::UnexpectedToken { found:    token.to_string(),
                                                        expected: "a parameter type".to_string(),
                                                        loc:      loc.clone(), }),
        },
        None => Err(end_of_input()),
    }
}

/// Parses a `return` statement with its optional value.
fn parse_return<'a, I>(tokens: &mut Peekable<I>,
                       scope: &mut ParserScope,
                       loc: Location)
                       -> ParseResult<Stmt>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    tokens.next(); // return

    let value = match tokens.peek() {
        Some((Token::Semicolon | Token::NewLine | Token::RBrace | Token::Eof, _)) | None => None,
        _ => Some(parse_expression(tokens, scope)?),
    };

    expect_terminator(tokens)?;

    Ok(Stmt::Return { value, loc })
}
