use crate::location::Location;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure of either grammar: content expressions or CSS value definitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error at {location}: expected {}, found {found}", join_expected(.expected))]
    Syntax {
        expected: Vec<String>,
        found: String,
        location: Location,
    },

    #[error("Invalid quantifier at {location}: minimum {min} is greater than maximum {max}")]
    QuantifierRange { min: u32, max: u32, location: Location },

    #[error("Invalid syntax at {location}: {message}")]
    InvalidSyntax { message: String, location: Location },
}

impl ParseError {
    pub fn syntax(expected: Vec<String>, found: impl Into<String>, location: Location) -> Self {
        Self::Syntax {
            expected,
            found: found.into(),
            location,
        }
    }

    pub fn quantifier_range(min: u32, max: u32, location: Location) -> Self {
        Self::QuantifierRange { min, max, location }
    }

    pub fn invalid_syntax(location: Location, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            message: message.into(),
            location,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            ParseError::Syntax { location, .. } => location,
            ParseError::QuantifierRange { location, .. } => location,
            ParseError::InvalidSyntax { location, .. } => location,
        }
    }

    /// Alternatives that would have been accepted at the failure point.
    pub fn expected(&self) -> &[String] {
        match self {
            ParseError::Syntax { expected, .. } => expected,
            _ => &[],
        }
    }

    fn label(&self) -> String {
        match self {
            ParseError::Syntax { expected, .. } => format!("expected {}", join_expected(expected)),
            ParseError::QuantifierRange { min, max, .. } => {
                format!("{{{},{}}} has a minimum above its maximum", min, max)
            }
            ParseError::InvalidSyntax { message, .. } => message.clone(),
        }
    }
}

fn join_expected(expected: &[String]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

/// Pretty-print errors with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_errors(source: &str, filename: &str, errors: &[ParseError]) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let mut output = Vec::new();

    for error in errors {
        let span = error.location().span();

        let report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(error.to_string())
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_color(Color::Red)
                    .with_message(error.label()),
            )
            .finish();

        if let Err(e) = report.write((filename, Source::from(source)), &mut output) {
            tracing::warn!(error = %e, "failed to render parse error report");
        }
    }

    String::from_utf8(output).unwrap_or_else(|_| "Error formatting failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message_lists_expected() {
        let location = Location::from_span("a |", 3..3);
        let error = ParseError::syntax(
            vec!["'('".to_string(), "identifier".to_string()],
            "end of input",
            location,
        );
        assert_eq!(
            error.to_string(),
            "Syntax error at 1:4: expected '(' or identifier, found end of input"
        );
        assert_eq!(error.expected().len(), 2);
    }

    #[test]
    fn test_quantifier_range_message() {
        let error = ParseError::quantifier_range(5, 2, Location::from_span("a{5,2}", 1..6));
        assert!(error.to_string().contains("minimum 5 is greater than maximum 2"));
        assert!(error.expected().is_empty());
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_format_errors_mentions_message() {
        let source = "p | ";
        let error = ParseError::syntax(
            vec!["identifier".to_string()],
            "end of input",
            Location::from_span(source, 4..4),
        );
        let output = format_errors(source, "content.expr", &[error]);
        assert!(output.contains("expected identifier"));
    }
}
