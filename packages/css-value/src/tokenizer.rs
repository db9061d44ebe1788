use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Token types for concrete CSS property values
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum ValueToken<'src> {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[token(",")]
    Comma,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    /// Unquoted `url(...)`, kept whole since its content is not tokenized
    #[regex(r"url\([ \t\r\n\f]*[^\x22'() \t\r\n\f]*[ \t\r\n\f]*\)", |lex| lex.slice())]
    Url(&'src str),

    /// Function name, without the opening parenthesis
    #[regex(r"-?-?[a-zA-Z_][a-zA-Z0-9_-]*\(", |lex| &lex.slice()[..lex.slice().len() - 1])]
    Function(&'src str),

    /// `--name`, a custom property reference.
    #[regex(r"--[a-zA-Z0-9_-]*", |lex| lex.slice())]
    DashedIdent(&'src str),

    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?%", |lex| lex.slice())]
    Percentage(&'src str),

    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?[a-zA-Z]+", |lex| lex.slice())]
    Dimension(&'src str),

    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    Number(&'src str),

    #[regex(r"#[a-zA-Z0-9_-]+", |lex| lex.slice())]
    Hash(&'src str),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\]|\\.)*'", |lex| lex.slice())]
    String(&'src str),

    /// Operators and punctuation of math functions, `type()` syntaxes and `!important`
    #[regex(r"[+*<>=!:;.|-]", |lex| lex.slice())]
    Delim(&'src str),
}

impl fmt::Display for ValueToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueToken::Whitespace => write!(f, "whitespace"),
            ValueToken::Comma => write!(f, "','"),
            ValueToken::Slash => write!(f, "'/'"),
            ValueToken::LParen => write!(f, "'('"),
            ValueToken::RParen => write!(f, "')'"),
            ValueToken::Url(s) => write!(f, "{}", s),
            ValueToken::Function(name) => write!(f, "function '{}('", name),
            ValueToken::DashedIdent(s) | ValueToken::Ident(s) => write!(f, "identifier '{}'", s),
            ValueToken::Percentage(s) | ValueToken::Dimension(s) | ValueToken::Number(s) => {
                write!(f, "number '{}'", s)
            }
            ValueToken::Hash(s) => write!(f, "hash '{}'", s),
            ValueToken::String(s) => write!(f, "string {}", s),
            ValueToken::Delim(s) => write!(f, "'{}'", s),
        }
    }
}

/// Tokenize a value, stopping with the span of the first unknown character
pub fn tokenize(source: &str) -> Result<Vec<(ValueToken<'_>, Range<usize>)>, Range<usize>> {
    let mut lexer = ValueToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(lexer.span()),
        }
    }
    Ok(tokens)
}
