use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Token types for content expressions
///
/// Whitespace is kept since it separates sequence items.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"[_a-zA-Z][_a-zA-Z0-9]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[0-9]+", |lex| lex.slice())]
    Number(&'src str),

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("|")]
    Pipe,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Whitespace => write!(f, "whitespace"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Pipe => write!(f, "'|'"),
            Token::Star => write!(f, "'*'"),
            Token::Plus => write!(f, "'+'"),
            Token::Question => write!(f, "'?'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::Comma => write!(f, "','"),
        }
    }
}

/// Lexed input. Lexing stops at the first character outside the grammar,
/// whose span is kept in `invalid`.
#[derive(Debug, Clone, Default)]
pub struct TokenStream<'src> {
    pub tokens: Vec<(Token<'src>, Range<usize>)>,
    pub invalid: Option<Range<usize>>,
}

pub fn tokenize(source: &str) -> TokenStream<'_> {
    let mut stream = TokenStream::default();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => stream.tokens.push((token, span)),
            Err(()) => {
                stream.invalid = Some(span);
                break;
            }
        }
    }
    stream
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_and_operators() {
        let stream = tokenize("p|figure*");
        let tokens: Vec<_> = stream.tokens.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            tokens,
            vec![Token::Ident("p"), Token::Pipe, Token::Ident("figure"), Token::Star]
        );
        assert!(stream.invalid.is_none());
    }

    #[test]
    fn test_whitespace_runs_are_one_token() {
        let stream = tokenize("a  \n b");
        assert_eq!(stream.tokens.len(), 3);
        assert_eq!(stream.tokens[1].0, Token::Whitespace);
        assert_eq!(stream.tokens[1].1, 1..5);
    }

    #[test]
    fn test_range_quantifier() {
        let stream = tokenize("li{2,10}");
        assert_eq!(stream.tokens[2].0, Token::Number("2"));
        assert_eq!(stream.tokens[4].0, Token::Number("10"));
    }

    #[test]
    fn test_stops_at_invalid_character() {
        let stream = tokenize("a & b");
        assert_eq!(stream.tokens.len(), 2);
        assert_eq!(stream.invalid, Some(2..3));
    }
}
