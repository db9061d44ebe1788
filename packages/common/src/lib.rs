pub mod config;
pub mod error;
pub mod visitor;

pub use config::*;
pub use error::*;
pub use visitor::*;
