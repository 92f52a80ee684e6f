//! Turns Swagger 2.0 / OpenAPI 3.0 documents into TypeScript declarations.
//!
//! [`scan()`] normalizes a document, walks every schema with the [`Resolver`]
//! and returns a [`Registry`] of declarations for the generators to render.

pub mod config;
pub mod error;
pub mod generators;
pub mod naming;
pub mod parsers;
pub mod registry;
pub mod resolver;
pub mod scan;
pub mod types;

pub use error::{CodegenError, Result};
pub use registry::{DeclKind, Declaration, Registry};
pub use resolver::{Context, Resolver};
pub use scan::{scan, scan_inputs, Scan, ScanOptions};
pub use types::TypeExpr;
