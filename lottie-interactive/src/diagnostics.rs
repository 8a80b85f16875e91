use crate::ExpressionError;
use std::fmt;

/// Log target used by [`LogSink`].
pub const LOG_TARGET: &str = "lottie_interactive";

/// A recoverable problem with authored content. The runtime continues with a fallback.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// A transition points at a state missing from the definition; the transition is ignored.
    UnknownTargetState { event: String, target: String },
    /// The playhead of the new state is left where it was.
    UnknownStartAt { value: String },
    /// The morph is skipped for this frame.
    UnknownTimeRemap { value: String },
    UnknownMorphState { state: String, other: String },
    /// A chained transition without a positive duration was resolved as a pass-through.
    InstantTransitionInChain,
    /// The formula always yields its default value.
    FormulaCompile { source: String, error: ExpressionError },
    DuplicateTarget { target: String },
    MissingTarget { target: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownTargetState { event, target } => {
                write!(f, "transition '{event}' targets unknown state '{target}'")
            }
            Diagnostic::UnknownStartAt { value } => write!(f, "unknown startAt value '{value}'"),
            Diagnostic::UnknownTimeRemap { value } => {
                write!(f, "unknown timeRemap value '{value}'")
            }
            Diagnostic::UnknownMorphState { state, other } => {
                write!(f, "state '{state}' morphs with unknown state '{other}'")
            }
            Diagnostic::InstantTransitionInChain => {
                f.write_str("transition without duration reached the blend chain")
            }
            Diagnostic::FormulaCompile { source, error } => {
                write!(f, "formula '{source}' failed to compile: {error}")
            }
            Diagnostic::DuplicateTarget { target } => {
                write!(f, "target '{target}' is observed more than once")
            }
            Diagnostic::MissingTarget { target } => {
                write!(f, "no layer has class '{target}'")
            }
        }
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `log::warn!`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!(target: LOG_TARGET, "{diagnostic}");
    }
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Keeps every diagnostic it receives.
#[derive(Clone, Debug, Default)]
pub struct CollectSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink for CollectSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
