//! Access to the script runtime that evaluates source models.
//!
//! Runtimes are not reentrant, so every evaluation goes through a
//! [`SharedRuntime`] handle that serializes calls behind one lock. The handle
//! is created once and cloned into every loader; it is never a global.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::document::Document;
use crate::error::SourceError;

const HARNESS_PREFIX: &str = "(function() { var window = {}; ";
const HARNESS_SUFFIX: &str = " })()";
const EXPORT_STATEMENT: &str = "export var source = ";

/// A model failed to evaluate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (line {line})")]
pub struct EvaluationError {
    pub message: String,
    pub line: usize,
}

impl From<EvaluationError> for SourceError {
    fn from(err: EvaluationError) -> Self {
        SourceError::Evaluation { message: err.message, line: err.line }
    }
}

/// Evaluates model source text into a document tree
pub trait ScriptRuntime: Send {
    /// Evaluate `source`; `origin` names the file for diagnostics
    fn evaluate(&mut self, source: &str, origin: &str) -> Result<Document, EvaluationError>;
}

/// Wrap raw model text so that its exported value becomes the result of the
/// evaluation and `window` lookups don't leak into the runtime.
///
/// The wrapper adds no line breaks, so runtime line numbers still match the
/// model file.
pub fn wrap_model_source(text: &str) -> String {
    format!(
        "{}{}{}",
        HARNESS_PREFIX,
        text.replace(EXPORT_STATEMENT, "return "),
        HARNESS_SUFFIX
    )
}

/// Cloneable, lock-protected handle to a runtime
#[derive(Clone)]
pub struct SharedRuntime {
    inner: Arc<Mutex<Box<dyn ScriptRuntime>>>,
}

impl SharedRuntime {
    pub fn new<R: ScriptRuntime + 'static>(runtime: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(runtime))),
        }
    }

    /// Evaluate with exclusive access to the runtime.
    ///
    /// The lock is held for the whole evaluation and released before
    /// returning. A lock poisoned by a panicking evaluation is reclaimed.
    pub fn evaluate(&self, source: &str, origin: &str) -> Result<Document, EvaluationError> {
        self.with_runtime(|runtime| runtime.evaluate(source, origin))
    }

    /// Run `f` with exclusive access to the runtime, for callers that need
    /// more than a single evaluation. `f` must not block on anything else.
    pub fn with_runtime<T>(&self, f: impl FnOnce(&mut dyn ScriptRuntime) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **guard)
    }
}

impl Default for SharedRuntime {
    fn default() -> Self {
        Self::new(JsonModelRuntime)
    }
}

impl std::fmt::Debug for SharedRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRuntime").finish_non_exhaustive()
    }
}

/// Runtime for declarative models whose exported value is a JSON literal:
///
/// ```text
/// export var source = {
///     "name": "Danbooru",
///     "apis": { "json": { ... } }
/// };
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonModelRuntime;

impl JsonModelRuntime {
    /// Locate the exported literal inside wrapped model text. Returns the
    /// literal and the number of lines skipped before it.
    fn exported_literal(source: &str) -> (&str, usize) {
        let body = source.strip_prefix(HARNESS_PREFIX).unwrap_or(source);
        let body = body.strip_suffix(HARNESS_SUFFIX).unwrap_or(body);

        let trimmed = body.trim_start();
        let literal = trimmed.strip_prefix("return").unwrap_or(trimmed).trim_start();
        let skipped = &body[..body.len() - literal.len()];

        let literal = literal.trim_end();
        let literal = literal.strip_suffix(';').unwrap_or(literal);
        (literal, skipped.matches('\n').count())
    }
}

impl ScriptRuntime for JsonModelRuntime {
    fn evaluate(&mut self, source: &str, origin: &str) -> Result<Document, EvaluationError> {
        let (literal, line_offset) = Self::exported_literal(source);

        match serde_json::from_str::<serde_json::Value>(literal) {
            Ok(value) => Ok(Document::from(value)),
            Err(e) => {
                log::trace!("Failed to evaluate {}: {}", origin, e);
                Err(EvaluationError {
                    message: format!("{} in {}", strip_position(&e.to_string()), origin),
                    line: e.line() + line_offset,
                })
            }
        }
    }
}

/// serde_json appends " at line X column Y", which is reported separately
fn strip_position(message: &str) -> &str {
    match message.rfind(" at line ") {
        Some(pos) => &message[..pos],
        None => message,
    }
}
