use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Token types for the CSS value definition syntax
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum SyntaxToken<'src> {
    /// `<name>`, `<name()>` or `<name [min,max]>`
    #[regex(r"<[a-zA-Z][a-zA-Z0-9-]*(\(\))?( *\[[^\]]*\])?>", |lex| lex.slice())]
    DataType(&'src str),

    /// `<'property-name'>`
    #[regex(r"<'-?[a-zA-Z][a-zA-Z0-9-]*'>", |lex| lex.slice())]
    PropertyReference(&'src str),

    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*\(", |lex| &lex.slice()[..lex.slice().len() - 1])]
    Function(&'src str),

    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice())]
    Keyword(&'src str),

    /// Quoted literal such as `'{'`
    #[regex(r"'[^']*'", |lex| lex.slice())]
    Quoted(&'src str),

    #[regex(r"[0-9]+", |lex| lex.slice())]
    Number(&'src str),

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(")")]
    RParen,

    #[token("|")]
    Bar,

    #[token("||")]
    DoubleBar,

    #[token("&&")]
    DoubleAmpersand,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    #[token("#")]
    Hash,

    #[token("!")]
    Bang,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    /// Bare delimiter literals
    #[regex(r"[/:;=]", |lex| lex.slice())]
    Delim(&'src str),
}

impl SyntaxToken<'_> {
    /// Whether this token starts a multiplier
    pub fn is_multiplier(&self) -> bool {
        matches!(
            self,
            SyntaxToken::Star
                | SyntaxToken::Plus
                | SyntaxToken::Question
                | SyntaxToken::Hash
                | SyntaxToken::Bang
                | SyntaxToken::LBrace
        )
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxToken::DataType(s) => write!(f, "data type {}", s),
            SyntaxToken::PropertyReference(s) => write!(f, "property reference {}", s),
            SyntaxToken::Function(s) => write!(f, "function '{}('", s),
            SyntaxToken::Keyword(s) => write!(f, "keyword '{}'", s),
            SyntaxToken::Quoted(s) => write!(f, "literal {}", s),
            SyntaxToken::Number(n) => write!(f, "number {}", n),
            SyntaxToken::LBracket => write!(f, "'['"),
            SyntaxToken::RBracket => write!(f, "']'"),
            SyntaxToken::RParen => write!(f, "')'"),
            SyntaxToken::Bar => write!(f, "'|'"),
            SyntaxToken::DoubleBar => write!(f, "'||'"),
            SyntaxToken::DoubleAmpersand => write!(f, "'&&'"),
            SyntaxToken::Star => write!(f, "'*'"),
            SyntaxToken::Plus => write!(f, "'+'"),
            SyntaxToken::Question => write!(f, "'?'"),
            SyntaxToken::Hash => write!(f, "'#'"),
            SyntaxToken::Bang => write!(f, "'!'"),
            SyntaxToken::LBrace => write!(f, "'{{'"),
            SyntaxToken::RBrace => write!(f, "'}}'"),
            SyntaxToken::Comma => write!(f, "','"),
            SyntaxToken::Delim(s) => write!(f, "'{}'", s),
        }
    }
}

/// Lex a value definition. Returns the span of the first unlexable character as the error.
pub fn tokenize(source: &str) -> Result<Vec<(SyntaxToken<'_>, Range<usize>)>, Range<usize>> {
    let mut tokens = Vec::new();
    for (result, span) in SyntaxToken::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(span),
        }
    }
    Ok(tokens)
}
