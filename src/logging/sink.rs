use crate::core::error::AppError;
use crate::tools::execution::error_signature;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed prefix stamped onto every build-log line.
const LINE_PREFIX: &str = "[wix]";

/// Per-build log sink.
///
/// Constructed fresh for every build invocation and passed by reference into
/// each component that logs, so the error counter can never leak across
/// builds. Lines are emitted through the tracing stack; debug lines are
/// suppressed unless debug mode is enabled.
#[derive(Debug)]
pub struct BuildLog {
    debug_enabled: bool,
    error_lines: AtomicUsize,
}

impl BuildLog {
    pub fn new(debug_enabled: bool) -> Self {
        BuildLog {
            debug_enabled,
            error_lines: AtomicUsize::new(0),
        }
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// Log a line at normal severity.
    pub fn log(&self, message: &str) {
        self.scan(message);
        tracing::info!("{} {}", LINE_PREFIX, message);
    }

    /// Log a line only when debug mode is enabled.
    pub fn debug(&self, message: &str) {
        if self.debug_enabled {
            self.scan(message);
            tracing::debug!("{} {}", LINE_PREFIX, message);
        }
    }

    /// Log an error including its source chain.
    pub fn severe(&self, error: &AppError) {
        tracing::error!("{} SEVERE: {}", LINE_PREFIX, error);
        if let Some(source) = &error.source {
            tracing::error!("{} Caused by: {:#}", LINE_PREFIX, source);
        }
    }

    /// Number of logged lines that matched the tool error signature.
    pub fn error_count(&self) -> usize {
        self.error_lines.load(Ordering::Relaxed)
    }

    pub fn has_no_errors(&self) -> bool {
        self.error_count() == 0
    }

    fn scan(&self, line: &str) {
        if error_signature().is_match(line) {
            self.error_lines.fetch_add(1, Ordering::Relaxed);
        }
    }
}
