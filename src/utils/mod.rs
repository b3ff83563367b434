//! Helpers shared by the service layer.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_validator`] - Target URL validation
//! - [`retry`] - Bounded retry with a typed exhaustion result

pub mod code_generator;
pub mod retry;
pub mod url_validator;
