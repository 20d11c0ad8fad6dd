//! Model configuration input.
//!
//! - [`Input`]: `.ini`-style key/value reader with strict typed lookup
//! - [`ConfigError`]: errors for malformed, missing or incompatible settings

mod error;
mod input;

pub use error::ConfigError;
pub use input::{Input, InputValue};
