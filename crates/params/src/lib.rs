//! Declarative validation and population of flat parameter maps.
//!
//! Provisioning requests arrive as `name -> value` string maps. This
//! crate turns such a map into a typed, validated options record:
//!
//! - [`FieldSpec`] — declares one parameter: its external name, how it
//!   is written into the record, and the rules its value must satisfy
//!   (presence, format, dependencies, mutual exclusion, defaults).
//! - [`Validator`] — compiles a list of field specs once, then validates
//!   and populates any number of parameter maps against them.
//! - [`Condition`] — the mini-language behind `depends_on`,
//!   `required_if` and `optional_if`.
//! - [`SchemaError`] / [`Violation`] — construction-time schema defects
//!   versus per-request rule violations.
//!
//! The validator performs no I/O and holds no shared state; a compiled
//! instance can be reused concurrently across requests.

mod coerce;

pub mod condition;
pub mod error;
pub mod field;
pub mod validator;

pub use condition::Condition;
pub use error::{SchemaError, Violation};
pub use field::FieldSpec;
pub use validator::Validator;
