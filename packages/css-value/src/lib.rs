pub mod composite;
pub mod error;
pub mod functions;
pub mod matcher;
pub mod tokenizer;
pub mod value;

pub use composite::CssCompositeValue;
pub use error::{ValueError, ValueResult};
pub use functions::{
    ColorStop, CssFunctionValue, FunctionFamily, FunctionValue, GradientKind, GradientStop, LinearStop,
    RepeatCount,
};
pub use matcher::{property_options, Suggestion, ValueMatcher};
pub use value::{CssColorValue, CssStyleValue, CssUnitValue, UnitCategory};
