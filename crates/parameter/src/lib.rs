//! Typed parameter kinds: validation, and conversion between the wire
//! shape (object references for binary kinds) and the runtime shape
//! (resolved bytes).

mod convert;
mod decl;
mod error;
mod kind;
mod validate;
mod value;

pub use convert::{to_runtime, to_wire};
pub use decl::ParameterDecl;
pub use error::ParameterError;
pub use kind::ParameterKind;
pub use validate::{validate, validate_required};
pub use value::{BinaryValue, ParameterValue};
