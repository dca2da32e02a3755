// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Resolution of short CEL-style queries against schema-less objects.
//!
//! A query such as `o.metadata.labels['app']` is compiled once into a
//! [`Program`] by the embedded CEL engine, evaluated against an object bound
//! to `o`, and the result is rendered as a string suitable for use as a
//! metric label value. Resolution
//! never fails: when a query cannot be compiled or evaluated, the query text
//! itself is returned as the label value.
//!
//! ```ignore
//! let resolver = labelexpr::Resolver::new();
//! let object = labelexpr::Value::from_json_str(r#"{"fields": {"string": "bar"}}"#)?;
//! let labels = resolver.resolve("o.fields.string", &object);
//! assert_eq!(labels["o.fields.string"], "bar");
//! ```

mod builtins;
mod environment;
mod errors;
mod program;
mod resolver;
mod stringify;
mod value;

#[cfg(feature = "collectors")]
pub mod collectors;

pub use environment::Environment;
pub use errors::{CompileError, CompileErrorKind, ResolveError, RuntimeError};
pub use program::{Program, MAX_NESTING, MAX_OPERATORS};
pub use resolver::{ResolutionResult, Resolver, ResolverOptions};
pub use stringify::stringify;
pub use value::Value;

// Shared, thread-safe handle for values. Also the engine's string and list handle.
pub(crate) use std::sync::Arc as Rc;
