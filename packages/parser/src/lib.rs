pub mod ast;
pub mod error;
pub mod location;
pub mod parser;
pub mod quantifier;
pub mod serializer;
pub mod tokenizer;

pub use ast::{CompositeExpression, Expression, NodeExpression, SimpleExpression, Span};
#[cfg(feature = "pretty-errors")]
pub use error::format_errors;
pub use error::{ParseError, ParseResult};
pub use location::{Location, Position};
pub use parser::{parse, Parser};
pub use quantifier::{Bound, Quantifier};
pub use serializer::{serialize, Serializer};
pub use tokenizer::{tokenize, Token, TokenStream};
