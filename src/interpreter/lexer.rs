use std::rc::Rc;

use logos::Logos;

use crate::error::{CompileError, Location};

/// Represents a lexical token in Night source code.
///
/// A token is the smallest meaningful unit of text produced by the lexer.
/// Keywords win over identifiers, and two-character operators win over
/// their one-character prefixes.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Decimal literal with a fractional part, such as `2.5`.
    #[regex(r"[0-9]+\.[0-9]+", parse_float)]
    Float(f32),
    /// Integer literal, such as `42`.
    #[regex(r"[0-9]+", parse_int)]
    Int(i64),
    /// `true` or `false`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// Double-quoted string literal. Escape pairs are resolved here, and
    /// the literal may span several lines.
    #[regex(r#""([^"\\]|\\.)*""#, parse_string)]
    Str(String),
    /// `let`
    #[token("let")]
    Let,
    /// `if`
    #[token("if")]
    If,
    /// `elif`
    #[token("elif")]
    Elif,
    /// `else`
    #[token("else")]
    Else,
    /// `loop`
    #[token("loop")]
    Loop,
    /// `fn`
    #[token("fn")]
    Fn,
    /// `return`
    #[token("return")]
    Return,
    /// The type keyword `bool`.
    #[token("bool")]
    BoolType,
    /// The type keyword `int`.
    #[token("int")]
    IntType,
    /// The type keyword `float`.
    #[token("float")]
    FloatType,
    /// The type keyword `str`.
    #[token("str")]
    StrType,
    /// Identifier tokens; variable or function names such as `x` or `fact`.
    #[regex(r"[A-Za-z_]+", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `# Comments.`
    #[regex(r"#[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `..`
    #[token("..")]
    DotDot,
    /// `.`
    #[token(".")]
    Dot,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `&&`
    #[token("&&")]
    AmpAmp,
    /// `||`
    #[token("||")]
    PipePipe,
    /// `!`
    #[token("!")]
    Bang,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    MulAssign,
    /// `/=`
    #[token("/=")]
    DivAssign,
    /// `%=`
    #[token("%=")]
    ModAssign,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `=`
    #[token("=")]
    Equals,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `:`
    #[token(":")]
    Colon,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// End of a source line. Kept as a token because simple statements may
    /// end at a newline.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// End of file. `scan` appends one to every stream so the parser always
    /// has a located token to report errors against.
    #[token("\0")]
    Eof,
}

/// Additional state carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset of the current line's
/// first character, so every token can be given a line and column.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset at which the current line starts.
    pub line_start: usize,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "'{v}'"),
            Self::Int(v) => write!(f, "'{v}'"),
            Self::Bool(v) => write!(f, "'{v}'"),
            Self::Str(s) => write!(f, "string \"{s}\""),
            Self::Identifier(name) => write!(f, "'{name}'"),
            Self::NewLine => write!(f, "end of line"),
            Self::Eof => write!(f, "end of file"),
            other => {
                let text = match other {
                    Self::Let => "let",
                    Self::If => "if",
                    Self::Elif => "elif",
                    Self::Else => "else",
                    Self::Loop => "loop",
                    Self::Fn => "fn",
                    Self::Return => "return",
                    Self::BoolType => "bool",
                    Self::IntType => "int",
                    Self::FloatType => "float",
                    Self::StrType => "str",
                    Self::DotDot => "..",
                    Self::Dot => ".",
                    Self::EqualEqual => "==",
                    Self::BangEqual => "!=",
                    Self::LessEqual => "<=",
                    Self::GreaterEqual => ">=",
                    Self::Less => "<",
                    Self::Greater => ">",
                    Self::AmpAmp => "&&",
                    Self::PipePipe => "||",
                    Self::Bang => "!",
                    Self::PlusAssign => "+=",
                    Self::MinusAssign => "-=",
                    Self::MulAssign => "*=",
                    Self::DivAssign => "/=",
                    Self::ModAssign => "%=",
                    Self::Plus => "+",
                    Self::Minus => "-",
                    Self::Star => "*",
                    Self::Slash => "/",
                    Self::Percent => "%",
                    Self::Equals => "=",
                    Self::LParen => "(",
                    Self::RParen => ")",
                    Self::LBracket => "[",
                    Self::RBracket => "]",
                    Self::LBrace => "{",
                    Self::RBrace => "}",
                    Self::Colon => ":",
                    Self::Comma => ",",
                    Self::Semicolon => ";",
                    _ => "?",
                };
                write!(f, "'{text}'")
            },
        }
    }
}

/// Tokenizes a whole source file.
///
/// Produces the full token stream up front, pairing every token with the
/// [`Location`] it starts at. Newlines are kept as tokens (statements may
/// end at one); whitespace and comments are dropped.
///
/// # Errors
/// Returns a [`CompileError`] for an unterminated string literal or for a
/// character that starts no token. A stray single quote gets a hint to use
/// double quotes.
pub fn scan(source: &str, file: &str) -> Result<Vec<(Token, Location)>, CompileError> {
    let file: Rc<str> = Rc::from(file);
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line:       1,
                                                                   line_start: 0, });
    let mut tokens = Vec::new();

    loop {
        let line = lexer.extras.line;
        let line_start = lexer.extras.line_start;

        let Some(result) = lexer.next() else { break };

        let span = lexer.span();
        let column = span.start.saturating_sub(line_start) + 1;
        let loc = Location::new(Rc::clone(&file), line, column);

        match result {
            Ok(token) => tokens.push((token, loc)),
            Err(()) => {
                let slice = lexer.slice();
                return Err(if slice.starts_with('"') {
                    CompileError::UnterminatedString { loc }
                } else {
                    CompileError::UnknownSymbol { symbol: slice.to_string(),
                                                  loc }
                });
            },
        }
    }

    let line = lexer.extras.line;
    let column = source.len().saturating_sub(lexer.extras.line_start) + 1;
    tokens.push((Token::Eof, Location::new(file, line, column)));

    Ok(tokens)
}

/// Parses a floating-point literal from the current token slice.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f32> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice.
fn parse_int(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Parses a boolean literal from the current token slice.
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Resolves a string literal: strips the quotes, replaces escape pairs, and
/// accounts for any newlines the literal spans.
fn parse_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let span_start = lex.span().start;

    for (offset, byte) in slice.bytes().enumerate() {
        if byte == b'\n' {
            lex.extras.line += 1;
            lex.extras.line_start = span_start + offset + 1;
        }
    }

    let inner = &slice[1..slice.len() - 1];
    let mut resolved = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\'
           && let Some(escaped) = chars.next()
        {
            resolved.push(escape_char(escaped));
        } else {
            resolved.push(c);
        }
    }

    resolved
}

/// Maps an escape pair's second character to the character it stands for.
/// Unrecognized escapes pass through unchanged.
const fn escape_char(c: char) -> char {
    match c {
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0C',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0B',
        other => other,
    }
}
