//! Stack capture and formatting.
//!
//! Stack capture is an injected collaborator: this module provides a real
//! implementation backed by `backtrace` so the rest of the encoder has
//! something concrete to call, the way applications capture Rust stacks
//! for error reporting via the same crate.

/// A captured but unresolved stack, as a list of opaque program-counter-like
/// values. Wire form is delta-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStack {
    pub pcs: Vec<u64>,
}

/// A single resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub function: String,
    pub file: String,
    pub line: u32,
}

/// A resolved, formatted stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedStack {
    pub frames: Vec<StackFrame>,
}

/// Captures the current call stack, skipping `skip` innermost frames (this
/// function and its immediate caller's captor, typically), truncated to
/// `max_depth` frames.
pub fn capture(skip: usize, max_depth: usize) -> RawStack {
    let mut pcs = Vec::with_capacity(max_depth);
    let mut frame_index = 0usize;
    backtrace::trace(|frame| {
        frame_index += 1;
        if frame_index <= skip {
            return true;
        }
        pcs.push(frame.ip() as u64);
        pcs.len() < max_depth
    });
    RawStack { pcs }
}

/// Resolves a raw stack into function/file/line triples.
pub fn format(stack: &RawStack) -> FormattedStack {
    let mut frames = Vec::with_capacity(stack.pcs.len());
    for &pc in &stack.pcs {
        backtrace::resolve(pc as *mut std::ffi::c_void, |symbol| {
            let function = symbol
                .name()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "<unknown>".to_string());
            let file = symbol
                .filename()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let line = symbol.lineno().unwrap_or(0);
            frames.push(StackFrame {
                function,
                file,
                line,
            });
        });
    }
    FormattedStack { frames }
}
