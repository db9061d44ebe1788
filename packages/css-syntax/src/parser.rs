use crate::syntax_tree::{Multiplier, SyntaxKind, SyntaxNode};
use crate::tokenizer::{tokenize, SyntaxToken};
use std::ops::Range;
use webwriter_parser::{Location, ParseError, ParseResult, Quantifier};

const TERM_EXPECTED: &[&str] = &[
    "keyword",
    "data type",
    "property reference",
    "literal",
    "function",
    "'['",
];

/// Recursive descent parser for CSS value definitions
///
/// Precedence from loosest to tightest: `|`, `||`, `&&`, juxtaposition.
pub struct SyntaxParser<'src> {
    source: &'src str,
    tokens: Vec<(SyntaxToken<'src>, Range<usize>)>,
    pos: usize,
}

impl<'src> SyntaxParser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        let tokens = tokenize(source).map_err(|span| {
            ParseError::syntax(
                TERM_EXPECTED.iter().map(|s| s.to_string()).collect(),
                format!("'{}'", &source[span.clone()]),
                Location::from_span(source, span),
            )
        })?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    pub fn parse(&mut self) -> ParseResult<SyntaxNode> {
        let root = self.parse_alternation()?;
        if !self.is_at_end() {
            let mut expected = vec!["'|'", "'||'", "'&&'"];
            expected.extend_from_slice(TERM_EXPECTED);
            return Err(self.error_here(&expected));
        }
        Ok(root)
    }

    fn parse_alternation(&mut self) -> ParseResult<SyntaxNode> {
        self.parse_combined(SyntaxToken::Bar, SyntaxKind::Alternation, Self::parse_subset)
    }

    fn parse_subset(&mut self) -> ParseResult<SyntaxNode> {
        self.parse_combined(
            SyntaxToken::DoubleBar,
            SyntaxKind::Subset,
            Self::parse_unordered,
        )
    }

    fn parse_unordered(&mut self) -> ParseResult<SyntaxNode> {
        self.parse_combined(
            SyntaxToken::DoubleAmpersand,
            SyntaxKind::UnorderedSequence,
            Self::parse_sequence,
        )
    }

    /// `operand (combinator operand)*`, collapsed to the operand when alone
    fn parse_combined(
        &mut self,
        combinator: SyntaxToken,
        kind: SyntaxKind,
        operand: fn(&mut Self) -> ParseResult<SyntaxNode>,
    ) -> ParseResult<SyntaxNode> {
        let first = operand(self)?;
        if !self.check(combinator) {
            return Ok(first);
        }

        let mut children = vec![first];
        while self.match_token(combinator) {
            children.push(operand(self)?);
        }
        let span = Self::cover(&children);
        Ok(SyntaxNode::new(kind, span).with_children(children))
    }

    /// Juxtaposed components
    fn parse_sequence(&mut self) -> ParseResult<SyntaxNode> {
        let mut children = vec![self.parse_component()?];
        while self.starts_term() {
            children.push(self.parse_component()?);
        }

        if children.len() == 1 {
            return Ok(children.remove(0));
        }
        let span = Self::cover(&children);
        Ok(SyntaxNode::new(SyntaxKind::OrderedSequence, span).with_children(children))
    }

    /// A term and its multipliers. A second multiplier, as in `<a>+#`, applies
    /// to the already multiplied term, so the term is wrapped in a group.
    fn parse_component(&mut self) -> ParseResult<SyntaxNode> {
        let mut node = self.parse_term()?;
        if self.peek_token().is_some_and(|t| t.is_multiplier()) {
            node.multiplier = self.parse_multiplier()?;
            node.span.end = self.last_end();
        }

        while self.peek_token().is_some_and(|t| t.is_multiplier()) {
            let start = node.span.start;
            let multiplier = self.parse_multiplier()?;
            let mut group = SyntaxNode::new(SyntaxKind::Group, start..self.last_end())
                .with_children(vec![node]);
            group.multiplier = multiplier;
            node = group;
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> ParseResult<SyntaxNode> {
        let Some((token, span)) = self.peek().cloned() else {
            return Err(self.error_here(TERM_EXPECTED));
        };

        match token {
            SyntaxToken::LBracket => {
                self.advance();
                let inner = self.parse_alternation()?;
                self.expect(SyntaxToken::RBracket)?;
                Ok(SyntaxNode::new(SyntaxKind::Group, span.start..self.last_end())
                    .with_children(vec![inner]))
            }
            SyntaxToken::Function(name) => {
                self.advance();
                let children = if self.check(SyntaxToken::RParen) {
                    Vec::new()
                } else {
                    vec![self.parse_alternation()?]
                };
                self.expect(SyntaxToken::RParen)?;
                Ok(
                    SyntaxNode::new(SyntaxKind::FunctionCall, span.start..self.last_end())
                        .with_name(name)
                        .with_children(children),
                )
            }
            SyntaxToken::DataType(text) => {
                self.advance();
                Ok(SyntaxNode::new(SyntaxKind::DataType, span).with_name(&text[1..text.len() - 1]))
            }
            SyntaxToken::PropertyReference(text) => {
                self.advance();
                Ok(SyntaxNode::new(SyntaxKind::PropertyReference, span)
                    .with_name(&text[2..text.len() - 2]))
            }
            SyntaxToken::Keyword(name) => {
                self.advance();
                Ok(SyntaxNode::new(SyntaxKind::Literal, span).with_name(name))
            }
            SyntaxToken::Quoted(text) => {
                self.advance();
                Ok(SyntaxNode::new(SyntaxKind::String, span).with_name(&text[1..text.len() - 1]))
            }
            SyntaxToken::Comma => {
                self.advance();
                Ok(SyntaxNode::new(SyntaxKind::Literal, span).with_name(","))
            }
            SyntaxToken::Delim(delim) => {
                self.advance();
                Ok(SyntaxNode::new(SyntaxKind::Literal, span).with_name(delim))
            }
            _ => Err(self.error_here(TERM_EXPECTED)),
        }
    }

    /// `*` `+` `?` `{n}` `{n,}` `{n,m}` `#` `#{..}`, optionally followed by `!`
    fn parse_multiplier(&mut self) -> ParseResult<Multiplier> {
        let mut multiplier = Multiplier::default();
        match self.peek_token() {
            Some(SyntaxToken::Hash) => {
                self.advance();
                multiplier.separator = Some(',');
                multiplier.quantifier = if self.check(SyntaxToken::LBrace) {
                    self.parse_range()?
                } else {
                    Quantifier::ONE_OR_MORE
                };
            }
            Some(SyntaxToken::Star) => {
                self.advance();
                multiplier.quantifier = Quantifier::ZERO_OR_MORE;
            }
            Some(SyntaxToken::Plus) => {
                self.advance();
                multiplier.quantifier = Quantifier::ONE_OR_MORE;
            }
            Some(SyntaxToken::Question) => {
                self.advance();
                multiplier.quantifier = Quantifier::ZERO_OR_ONE;
            }
            Some(SyntaxToken::LBrace) => {
                multiplier.quantifier = self.parse_range()?;
            }
            _ => {}
        }

        if self.match_token(SyntaxToken::Bang) {
            multiplier.required = true;
        }
        Ok(multiplier)
    }

    fn parse_range(&mut self) -> ParseResult<Quantifier> {
        let start = self.peek_span().start;
        self.expect(SyntaxToken::LBrace)?;
        let min = self.expect_number()?;
        let quantifier = if self.match_token(SyntaxToken::Comma) {
            if self.check(SyntaxToken::RBrace) {
                Quantifier::at_least(min)
            } else {
                let max = self.expect_number()?;
                let end = self.peek_span().end;
                Quantifier::bounded(min, max).ok_or_else(|| {
                    ParseError::quantifier_range(
                        min,
                        max,
                        Location::from_span(self.source, start..end),
                    )
                })?
            }
        } else {
            Quantifier::exactly(min)
        };
        self.expect(SyntaxToken::RBrace)?;
        Ok(quantifier)
    }

    fn expect_number(&mut self) -> ParseResult<u32> {
        match self.peek().cloned() {
            Some((SyntaxToken::Number(digits), span)) => {
                self.advance();
                digits.parse::<u32>().map_err(|_| {
                    ParseError::invalid_syntax(
                        Location::from_span(self.source, span),
                        format!("multiplier bound {} is too large", digits),
                    )
                })
            }
            _ => Err(self.error_here(&["number"])),
        }
    }

    fn starts_term(&self) -> bool {
        matches!(
            self.peek_token(),
            Some(
                SyntaxToken::LBracket
                    | SyntaxToken::Function(_)
                    | SyntaxToken::DataType(_)
                    | SyntaxToken::PropertyReference(_)
                    | SyntaxToken::Keyword(_)
                    | SyntaxToken::Quoted(_)
                    | SyntaxToken::Comma
                    | SyntaxToken::Delim(_)
            )
        )
    }

    fn cover(children: &[SyntaxNode]) -> Range<usize> {
        let start = children.first().map(|c| c.span.start).unwrap_or(0);
        let end = children.last().map(|c| c.span.end).unwrap_or(start);
        start..end
    }

    fn error_here(&self, expected: &[&str]) -> ParseError {
        let found = match self.peek_token() {
            Some(token) => token.to_string(),
            None => "end of input".to_string(),
        };
        ParseError::syntax(
            expected.iter().map(|s| s.to_string()).collect(),
            found,
            Location::from_span(self.source, self.peek_span()),
        )
    }

    // Helper methods

    fn peek(&self) -> Option<&(SyntaxToken<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<SyntaxToken<'src>> {
        self.peek().map(|(t, _)| *t)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: SyntaxToken) -> bool {
        if let Some((t, _)) = self.peek() {
            std::mem::discriminant(t) == std::mem::discriminant(&token)
        } else {
            false
        }
    }

    fn match_token(&mut self, token: SyntaxToken) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: SyntaxToken) -> ParseResult<()> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(&[&token.to_string()]))
        }
    }

    fn peek_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.clone())
            .unwrap_or_else(|| self.source.len()..self.source.len())
    }

    fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }
}

/// Parse value definition syntax into its concrete syntax tree
pub fn parse_syntax(source: &str) -> ParseResult<SyntaxNode> {
    SyntaxParser::new(source)?.parse()
}
