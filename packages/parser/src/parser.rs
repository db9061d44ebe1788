use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::location::Location;
use crate::quantifier::Quantifier;
use crate::tokenizer::{tokenize, Token};
use std::ops::Range;
use tracing::debug;

/// What must follow an expression for it to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    End,
    CloseParen,
}

/// Parser for content expressions
///
/// Each item is parsed once and then classified: a lone item stands for
/// itself, two or more whitespace-separated items form a sequence, and atoms
/// joined by `|` form an alternation. This accepts the same trees as trying
/// Group, Sequence, Alternation and SimpleExpression in order, in linear time.
/// Expected alternatives are collected at the furthest position reached so a
/// failure can name them.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    invalid: Option<Range<usize>>,
    pos: usize,
    furthest: usize,
    expected: Vec<String>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let stream = tokenize(source);
        Self {
            source,
            tokens: stream.tokens,
            invalid: stream.invalid,
            pos: 0,
            furthest: 0,
            expected: Vec::new(),
        }
    }

    /// Parse the whole input as one expression
    pub fn parse_root(&mut self) -> ParseResult<Expression> {
        self.skip_whitespace();
        match self.parse_expression(Terminator::End)? {
            Some(expr) if self.invalid.is_none() => Ok(expr),
            _ => Err(self.error()),
        }
    }

    /// Expression := Group | Sequence | Alternation | SimpleExpression
    fn parse_expression(&mut self, terminator: Terminator) -> ParseResult<Option<Expression>> {
        let start = self.pos;
        let offset = self.offset();
        let Some(first) = self.parse_item()? else {
            self.pos = start;
            return Ok(None);
        };

        // Sequence := Item (WS+ Item)+
        let mut content = vec![first];
        loop {
            let save = self.pos;
            if !self.eat(Token::Whitespace, "whitespace") {
                break;
            }
            match self.parse_item()? {
                Some(item) => content.push(item),
                None => {
                    self.pos = save;
                    break;
                }
            }
        }

        let expr = if content.len() == 1 {
            content.remove(0)
        } else {
            Expression::Sequence(self.composite(content, offset))
        };

        if !self.at_terminator(terminator) {
            self.pos = start;
            return Ok(None);
        }
        Ok(Some(expr))
    }

    /// Group := "(" Expression ")" Quantifier?
    fn parse_group(&mut self) -> ParseResult<Option<Expression>> {
        let start = self.offset();
        if !self.eat(Token::LParen, "'('") {
            return Ok(None);
        }
        self.skip_whitespace();

        let Some(inner) = self.parse_expression(Terminator::CloseParen)? else {
            return Ok(None);
        };
        self.skip_whitespace();
        if !self.eat(Token::RParen, "')'") {
            return Ok(None);
        }

        let quantifier = self.parse_quantifier()?;
        let span = start..self.last_end();
        Ok(Some(self.apply_group(inner, quantifier, span)))
    }

    /// Sequence member: an atom, or Alternation := Atom (WS* "|" WS* Atom)+
    fn parse_item(&mut self) -> ParseResult<Option<Expression>> {
        let start = self.offset();
        let Some(first) = self.parse_atom()? else {
            return Ok(None);
        };

        let mut content = vec![first];
        loop {
            let save = self.pos;
            self.skip_whitespace();
            if !self.eat(Token::Pipe, "'|'") {
                self.pos = save;
                break;
            }
            self.skip_whitespace();
            match self.parse_atom()? {
                Some(atom) => content.push(atom),
                None => {
                    self.pos = save;
                    break;
                }
            }
        }

        if content.len() == 1 {
            return Ok(content.pop());
        }
        Ok(Some(Expression::Alternation(self.composite(content, start))))
    }

    /// Atom := Group | SimpleExpression
    fn parse_atom(&mut self) -> ParseResult<Option<Expression>> {
        let start = self.pos;
        if let Some(group) = self.parse_group()? {
            return Ok(Some(group));
        }
        self.pos = start;
        self.parse_simple()
    }

    /// SimpleExpression := Token Quantifier?
    fn parse_simple(&mut self) -> ParseResult<Option<Expression>> {
        let start = self.offset();
        let Some((Token::Ident(name), _)) = self.peek().cloned() else {
            self.expect_here("identifier");
            return Ok(None);
        };
        let content = name.to_string();
        self.advance();

        let quantifier = self.parse_quantifier()?.unwrap_or_default();
        let span = start..self.last_end();
        Ok(Some(Expression::Simple(SimpleExpression {
            content,
            quantifier,
            raw: self.source[span.clone()].to_string(),
            span,
        })))
    }

    /// Quantifier := "*" | "+" | "?" | "{" Digit+ "}" | "{" Digit+ "," Digit+ "}"
    fn parse_quantifier(&mut self) -> ParseResult<Option<Quantifier>> {
        match self.peek().map(|(t, _)| *t) {
            Some(Token::Star) => {
                self.advance();
                Ok(Some(Quantifier::ZERO_OR_MORE))
            }
            Some(Token::Plus) => {
                self.advance();
                Ok(Some(Quantifier::ONE_OR_MORE))
            }
            Some(Token::Question) => {
                self.advance();
                Ok(Some(Quantifier::ZERO_OR_ONE))
            }
            Some(Token::LBrace) => {
                let save = self.pos;
                let start = self.offset();
                self.advance();

                let Some(min) = self.eat_number()? else {
                    self.pos = save;
                    return Ok(None);
                };
                let max = if self.eat(Token::Comma, "','") {
                    match self.eat_number()? {
                        Some(max) => max,
                        None => {
                            self.pos = save;
                            return Ok(None);
                        }
                    }
                } else {
                    min
                };
                if !self.eat(Token::RBrace, "'}'") {
                    self.pos = save;
                    return Ok(None);
                }

                let location = Location::from_span(self.source, start..self.last_end());
                Quantifier::bounded(min, max)
                    .map(Some)
                    .ok_or_else(|| ParseError::quantifier_range(min, max, location))
            }
            _ => {
                self.expect_here("quantifier");
                Ok(None)
            }
        }
    }

    fn eat_number(&mut self) -> ParseResult<Option<u32>> {
        let Some((Token::Number(digits), span)) = self.peek().cloned() else {
            self.expect_here("number");
            return Ok(None);
        };
        self.advance();
        digits.parse::<u32>().map(Some).map_err(|_| {
            ParseError::invalid_syntax(
                Location::from_span(self.source, span),
                format!("quantifier bound {} is too large", digits),
            )
        })
    }

    /// Apply a group's quantifier. An unquantified inner expression takes it
    /// directly; a quantified one is wrapped in a one-element sequence.
    fn apply_group(
        &self,
        mut inner: Expression,
        quantifier: Option<Quantifier>,
        span: Span,
    ) -> Expression {
        let raw = self.source[span.clone()].to_string();
        match quantifier {
            Some(quantifier) if !inner.quantifier().is_default() => {
                Expression::Sequence(CompositeExpression {
                    content: vec![inner],
                    quantifier,
                    raw,
                    span,
                })
            }
            quantifier => {
                if let Some(quantifier) = quantifier {
                    *inner.quantifier_mut() = quantifier;
                }
                inner.set_source(raw, span);
                inner
            }
        }
    }

    fn composite(&self, content: Vec<Expression>, start: usize) -> CompositeExpression {
        let span = start..self.last_end();
        CompositeExpression {
            content,
            quantifier: Quantifier::default(),
            raw: self.source[span.clone()].to_string(),
            span,
        }
    }

    fn at_terminator(&mut self, terminator: Terminator) -> bool {
        let save = self.pos;
        self.skip_whitespace();
        let reached = match terminator {
            Terminator::End => self.is_at_end() && self.invalid.is_none(),
            Terminator::CloseParen => self.check(Token::RParen),
        };
        if !reached {
            match terminator {
                Terminator::End => self.expect_here("end of input"),
                Terminator::CloseParen => self.expect_here("')'"),
            }
        }
        self.pos = save;
        reached
    }

    fn error(&self) -> ParseError {
        let (found, span) = match self.tokens.get(self.furthest) {
            Some((token, span)) => (token.to_string(), span.clone()),
            None => match &self.invalid {
                Some(span) => (format!("'{}'", &self.source[span.clone()]), span.clone()),
                None => ("end of input".to_string(), self.source.len()..self.source.len()),
            },
        };
        ParseError::syntax(
            self.expected.clone(),
            found,
            Location::from_span(self.source, span),
        )
    }

    fn expect_here(&mut self, what: &str) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest && !self.expected.iter().any(|e| e == what) {
            self.expected.push(what.to_string());
        }
    }

    // Helper methods

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: Token) -> bool {
        if let Some((t, _)) = self.peek() {
            std::mem::discriminant(t) == std::mem::discriminant(&token)
        } else {
            false
        }
    }

    fn eat(&mut self, token: Token, label: &str) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            self.expect_here(label);
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.check(Token::Whitespace) {
            self.advance();
        }
    }

    /// Byte offset of the next token
    fn offset(&self) -> usize {
        self.peek()
            .map(|(_, span)| span.start)
            .unwrap_or_else(|| self.last_end())
    }

    /// End offset of the last consumed token
    fn last_end(&self) -> usize {
        if self.pos == 0 {
            return 0;
        }
        self.tokens
            .get(self.pos - 1)
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }
}

/// Parse a content expression such as `p (figure | table)* footer?`
pub fn parse(source: &str) -> ParseResult<Expression> {
    debug!(len = source.len(), "parsing content expression");
    Parser::new(source).parse_root()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantifier::Bound;

    fn simple(expr: &Expression) -> &SimpleExpression {
        match expr {
            Expression::Simple(s) => s,
            other => panic!("expected simple expression, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_expression() {
        let expr = parse("paragraph").expect("Failed to parse");
        let s = simple(&expr);
        assert_eq!(s.content, "paragraph");
        assert!(s.quantifier.is_default());
        assert_eq!(s.raw, "paragraph");
        assert_eq!(s.span, 0..9);
    }

    #[test]
    fn test_quantifier_suffixes() {
        let cases = [
            ("a*", 0, Bound::Infinite),
            ("a+", 1, Bound::Infinite),
            ("a?", 0, Bound::Finite(1)),
            ("a{3}", 3, Bound::Finite(3)),
            ("a{2,4}", 2, Bound::Finite(4)),
        ];
        for (source, min, max) in cases {
            let expr = parse(source).expect("Failed to parse");
            assert_eq!(expr.quantifier().min, min, "{}", source);
            assert_eq!(expr.quantifier().max, max, "{}", source);
            assert_eq!(expr.raw(), source);
        }
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let result = parse("a{5,2}");
        match result {
            Err(ParseError::QuantifierRange { min, max, location }) => {
                assert_eq!((min, max), (5, 2));
                assert_eq!(location.span(), 1..6);
            }
            other => panic!("expected range error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_pipe_fails_at_end() {
        let result = parse("a |");
        let Err(ParseError::Syntax {
            expected,
            found,
            location,
        }) = result
        else {
            panic!("expected syntax error, got {:?}", result);
        };
        assert_eq!(found, "end of input");
        assert_eq!(location.start.offset, 3);
        assert!(expected.iter().any(|e| e == "identifier"));
        assert!(expected.iter().any(|e| e == "'('"));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let expr = parse("  p  ").expect("Failed to parse");
        assert_eq!(simple(&expr).raw, "p");
        assert_eq!(simple(&expr).span, 2..3);
    }

    #[test]
    fn test_empty_input_fails() {
        let result = parse("");
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_invalid_character_is_reported() {
        let Err(ParseError::Syntax { found, location, .. }) = parse("a & b") else {
            panic!("expected syntax error");
        };
        assert_eq!(found, "'&'");
        assert_eq!(location.span(), 2..3);

        let Err(ParseError::Syntax { found, location, .. }) = parse("list-item+") else {
            panic!("expected syntax error");
        };
        assert_eq!(found, "'-'");
        assert_eq!(location.span(), 4..5);
    }

    #[test]
    fn test_trailing_invalid_character_is_not_dropped() {
        for source in ["café", "(a b) !", "a | b ;"] {
            assert!(
                matches!(parse(source), Err(ParseError::Syntax { .. })),
                "{} should be rejected",
                source
            );
        }
    }

    #[test]
    fn test_invalid_character_inside_group() {
        let Err(ParseError::Syntax { found, .. }) = parse("(a & b)") else {
            panic!("expected syntax error");
        };
        assert_eq!(found, "'&'");
    }

    #[test]
    fn test_unclosed_group() {
        let Err(ParseError::Syntax { expected, found, .. }) = parse("(a b") else {
            panic!("expected syntax error");
        };
        assert_eq!(found, "end of input");
        assert!(expected.iter().any(|e| e == "')'"));
    }

    #[test]
    fn test_oversized_bound() {
        let result = parse("a{99999999999}");
        assert!(matches!(result, Err(ParseError::InvalidSyntax { .. })));
    }
}
