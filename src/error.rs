//! Error-with-stack modeling.
//!
//! Mirrors a `{None, Standard, Panic}` taxonomy as a sum type instead of
//! holding a live error object — captured eagerly, since an event can
//! outlive the execution context that raised it.

use crate::stack::{FormattedStack, StackFrame};

/// A classified error as it will be written to the wire: a message, an
/// opaque classifier tag, and an already-resolved stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedError {
    pub message: String,
    pub kind: u64,
    pub stack: FormattedStack,
}

impl TracedError {
    pub fn new(message: impl Into<String>) -> Self {
        TracedError {
            message: message.into(),
            kind: 0,
            stack: FormattedStack::default(),
        }
    }

    pub fn with_kind(mut self, kind: u64) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_stack(mut self, stack: FormattedStack) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.stack = FormattedStack { frames };
        self
    }
}

/// Injected error classifier: maps an arbitrary error into the
/// `{message, kind_tag, stack}` triple the wire format wants. Implementors
/// opt into this explicitly rather than relying on a blanket `Display`
/// conversion, so a caller who wants richer classification (distinguishing
/// panics from ordinary errors, say) can override it without the crate
/// guessing at error shapes it doesn't understand.
pub trait ClassifyError {
    fn classify(&self) -> TracedError;
}

impl<E: std::error::Error> ClassifyError for E {
    fn classify(&self) -> TracedError {
        TracedError::new(self.to_string())
    }
}
