//! Source-to-source function specialization for a small scripting language:
//! pin a function's parameters to concrete values, then inline the pinned
//! body ahead of another function's own.
//!
//! The two entry points are [`pin()`] and [`inline()`]; both work on a
//! [`Callable`], a parsed function that kept its source text around.

pub mod builtin;
pub mod check;
pub mod error;
mod format;
pub mod inline;
pub mod interp;
pub mod lex;
pub mod parse;
pub mod pin;
pub mod scope;
pub mod value;

pub use error::{Error, ErrorKind};
pub use inline::inline;
pub use pin::pin;
pub use scope::Namespace;
pub use value::{Callable, Value};

#[cfg(test)]
mod tests;
