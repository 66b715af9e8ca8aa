//! Validation, rendering and batch execution for discograph.
//!
//! Wraps the pure catalog operations of `discograph-core` with the parts
//! that touch the outside world: configuration, schema validators, external
//! transform engines, and the batch runner that executes every canned step
//! in isolation.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod batch;
pub mod config;
pub mod error;
pub mod render;
pub mod report;
pub mod transform;
pub mod validate;

pub use batch::{Batch, StepReport, StepStatus, Variant};
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use transform::{TransformEngine, XsltProc};
pub use validate::{
    JsonSchemaValidator, SchemaValidator, ValidationIssue, ValidationReport, XmlLintValidator,
    XmlSchemaKind,
};
