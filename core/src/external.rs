//! Asynchronous external checks.
//!
//! An external check runs after every synchronous check has passed, receiving
//! a [`CheckContext`] with the field's resolved value and an immutable
//! snapshot of the whole resolved record. Typical uses are contacting a
//! remote service to verify a credential or probing a path on disk.
//!
//! Any `Fn(CheckContext) -> impl Future<Output = Result<(), String>>` closure
//! is an [`ExternalCheck`]:
//!
//! ```
//! use option_schema_core::{CheckContext, FieldOptions};
//!
//! let opts = FieldOptions::default().with_external(|ctx: CheckContext| async move {
//!     match ctx.value().and_then(|v| v.as_str()) {
//!         Some(key) if key.starts_with("sk_") => Ok(()),
//!         _ => Err(format!("{} is not a valid API key", ctx.field())),
//!     }
//! });
//! assert!(opts.external.is_some());
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::Record;

/// Boxed future returned by [`ExternalCheck::check`].
pub type CheckFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'static>>;

/// Input handed to an external check.
#[derive(Debug, Clone)]
pub struct CheckContext {
    field: String,
    value: Option<Value>,
    record: Arc<Record>,
}

impl CheckContext {
    pub(crate) fn new(field: &str, record: Arc<Record>) -> Self {
        Self {
            field: field.to_string(),
            value: record.get(field).cloned(),
            record,
        }
    }

    /// Name of the field the check is attached to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Resolved value of the field (after defaults), if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The complete resolved record.
    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// Asynchronous validation step attached to a field.
///
/// `Err` carries the message reported to the user.
pub trait ExternalCheck: Send + Sync {
    fn check(&self, ctx: CheckContext) -> CheckFuture;
}

impl<F, Fut> ExternalCheck for F
where
    F: Fn(CheckContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    fn check(&self, ctx: CheckContext) -> CheckFuture {
        Box::pin(self(ctx))
    }
}
