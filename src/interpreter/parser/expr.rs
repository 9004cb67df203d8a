use std::iter::Peekable;

use crate::{
    ast::{BinaryOp, Expr, Literal, UnaryOp},
    error::{CompileError, Location},
    interpreter::{
        evaluator::function::BUILTIN_FUNCTIONS,
        lexer::Token,
        parser::{
            core::ParseResult,
            scope::ParserScope,
            utils::{end_of_input, expect_token, parse_comma_separated, parse_identifier,
                    token_name},
        },
    },
};

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the lowest
/// precedence level, the range operator, and descends through the
/// precedence hierarchy:
///
/// ```text
///     ..  <  ||  <  &&  <  == !=  <  < <= > >=  <  + -  <  * / %
///         <  unary ! -  <  postfix [] . ()
/// ```
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_level(tokens, scope, &[BinaryOp::Range], parse_logical_or)
}

/// Parses left-associative chains of `||`.
fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_level(tokens, scope, &[BinaryOp::Or], parse_logical_and)
}

/// Parses left-associative chains of `&&`.
fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_level(tokens, scope, &[BinaryOp::And], parse_equality)
}

/// Parses `==` and `!=` chains.
fn parse_equality<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_level(tokens,
                scope,
                &[BinaryOp::Equal, BinaryOp::NotEqual],
                parse_comparison)
}

/// Parses relational operator chains: `<`, `<=`, `>`, `>=`.
fn parse_comparison<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_level(tokens,
                scope,
                &[BinaryOp::Less,
                  BinaryOp::LessEqual,
                  BinaryOp::Greater,
                  BinaryOp::GreaterEqual],
                parse_additive)
}

/// Parses `+` and `-` chains.
fn parse_additive<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_level(tokens,
                scope,
                &[BinaryOp::Add, BinaryOp::Sub],
                parse_multiplicative)
}

/// Parses `*`, `/` and `%` chains.
fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    parse_level(tokens,
                scope,
                &[BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod],
                parse_unary)
}

/// Parses one left-associative precedence level.
///
/// Builds `next (op next)*` for the operators in `ops`, splicing each new
/// operand into a [`Expr::Binary`] node. Operators outside `ops` are left
/// for the enclosing (lower precedence) level to claim.
fn parse_level<'a, I, F>(tokens: &mut Peekable<I>,
                         scope: &ParserScope,
                         ops: &[BinaryOp],
                         mut next: F)
                         -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone,
          F: FnMut(&mut Peekable<I>, &ParserScope) -> ParseResult<Expr>
{
    let mut left = next(tokens, scope)?;

    while let Some((token, loc)) = tokens.peek()
          && let Some(op) = token_to_binary_op(token)
          && ops.contains(&op)
    {
        let loc = loc.clone();
        tokens.next();

        let right = next(tokens, scope)?;
        left = Expr::Binary { op,
                              left: Box::new(left),
                              right: Box::new(right),
                              loc };
    }

    Ok(left)
}

/// Maps a token to its corresponding binary operator, or `None` for tokens
/// that are not binary operators.
#[must_use]
pub const fn token_to_binary_op(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::Plus => Some(BinaryOp::Add),
        Token::Minus => Some(BinaryOp::Sub),
        Token::Star => Some(BinaryOp::Mul),
        Token::Slash => Some(BinaryOp::Div),
        Token::Percent => Some(BinaryOp::Mod),
        Token::Less => Some(BinaryOp::Less),
        Token::Greater => Some(BinaryOp::Greater),
        Token::LessEqual => Some(BinaryOp::LessEqual),
        Token::GreaterEqual => Some(BinaryOp::GreaterEqual),
        Token::EqualEqual => Some(BinaryOp::Equal),
        Token::BangEqual => Some(BinaryOp::NotEqual),
        Token::AmpAmp => Some(BinaryOp::And),
        Token::PipePipe => Some(BinaryOp::Or),
        Token::DotDot => Some(BinaryOp::Range),
        _ => None,
    }
}

/// Parses a unary expression.
///
/// The prefix operators `-` and `!` are right-associative, so `!-x` parses
/// as `!(-x)`. Without a prefix operator this delegates to
/// [`parse_primary`] and then folds in postfix operators.
fn parse_unary<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    if let Some((Token::Minus, loc)) = tokens.peek() {
        let loc = loc.clone();
        tokens.next();

        let expr = parse_unary(tokens, scope)?;
        Ok(Expr::Unary { op: UnaryOp::Negate,
                         expr: Box::new(expr),
                         loc })
    } else if let Some((Token::Bang, loc)) = tokens.peek() {
        let loc = loc.clone();
        tokens.next();

        let expr = parse_unary(tokens, scope)?;
        Ok(Expr::Unary { op: UnaryOp::Not,
                         expr: Box::new(expr),
                         loc })
    } else {
        let primary = parse_primary(tokens, scope)?;
        parse_postfix(tokens, scope, primary)
    }
}

/// Parses postfix operators applied to an expression.
///
/// Two postfix forms exist and may be chained freely:
///
/// 1. Subscripts: `xs[0][1]`
/// 2. Method calls: `xs.push(4)`, `s.len()`
///
/// Parsing continues until no further postfix operator is found.
pub(crate) fn parse_postfix<'a, I>(tokens: &mut Peekable<I>,
                                   scope: &ParserScope,
                                   mut node: Expr)
                                   -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    loop {
        match tokens.peek() {
            Some((Token::LBracket, loc)) => {
                let loc = loc.clone();
                tokens.next();

                let index = parse_expression(tokens, scope)?;
                expect_token(tokens, &Token::RBracket, "closing square bracket ']'")?;

                node = Expr::Subscript { value: Box::new(node),
                                         index: Box::new(index),
                                         loc };
            },
            Some((Token::Dot, loc)) => {
                let loc = loc.clone();
                tokens.next();

                let (name, _) = parse_identifier(tokens)?;
                expect_token(tokens, &Token::LParen, "'(' to begin the method arguments")?;
                let arguments =
                    parse_comma_separated(tokens,
                                          |t| parse_expression(t, scope),
                                          &Token::RParen)?;

                node = Expr::Method { object: Box::new(node),
                                      name,
                                      arguments,
                                      loc };
            },
            _ => break,
        }
    }

    Ok(node)
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions include literals, variable references, function
/// calls, array literals, and parenthesized sub-expressions. In this
/// position the type keywords act as plain names, which is what makes the
/// conversion builtins (`int(…)` and friends) callable.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>, scope: &ParserScope) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    let (token, loc) = tokens.peek().ok_or_else(end_of_input)?;
    let loc = loc.clone();

    match token {
        Token::Bool(b) => {
            let value = Literal::Bool(*b);
            tokens.next();
            Ok(Expr::Literal { value, loc })
        },
        Token::Int(n) => {
            let value = Literal::Int(*n);
            tokens.next();
            Ok(Expr::Literal { value, loc })
        },
        Token::Float(v) => {
            let value = Literal::Float(*v);
            tokens.next();
            Ok(Expr::Literal { value, loc })
        },
        Token::Str(s) => {
            let value = Literal::Str(s.clone());
            tokens.next();
            Ok(Expr::Literal { value, loc })
        },
        Token::LParen => {
            tokens.next();
            let expr = parse_expression(tokens, scope)?;
            expect_token(tokens, &Token::RParen, "closing bracket ')'")?;
            Ok(expr)
        },
        Token::LBracket => {
            tokens.next();
            let elements =
                parse_comma_separated(tokens, |t| parse_expression(t, scope), &Token::RBracket)?;
            Ok(Expr::Array { elements, loc })
        },
        _ => {
            if let Some(name) = token_name(token) {
                tokens.next();
                parse_name(tokens, scope, name, loc)
            } else {
                Err(CompileError::ExpectedExpression { found: token.to_string(),
                                                       loc })
            }
        },
    }
}

/// Parses what follows a name in expression position: a call when a `(`
/// comes next, otherwise a variable reference.
///
/// Calls must name a builtin or a function defined earlier in the program;
/// variable references must name a declared variable.
fn parse_name<'a, I>(tokens: &mut Peekable<I>,
                     scope: &ParserScope,
                     name: String,
                     loc: Location)
                     -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Location)> + Clone
{
    if let Some((Token::LParen, _)) = tokens.peek() {
        tokens.next();

        if !BUILTIN_FUNCTIONS.contains(&name.as_str()) && !scope.has_function(&name) {
            return Err(CompileError::UnknownFunction { name, loc });
        }

        let arguments =
            parse_comma_separated(tokens, |t| parse_expression(t, scope), &Token::RParen)?;

        Ok(Expr::Call { name, arguments, loc })
    } else {
        if !scope.is_declared(&name) {
            return Err(CompileError::UndeclaredVariable { name, loc });
        }

        Ok(Expr::Variable { name, loc })
    }
}
