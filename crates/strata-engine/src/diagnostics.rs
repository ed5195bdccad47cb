//! Fault channel for recoverable engine errors.

use std::cell::Cell;

use crate::error::EngineError;

/// What happens to an [`EngineError`] once it is reported.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DiagnosticMode {
    /// Counted, otherwise dropped.
    Silent,
    /// Logged at `warn`.
    #[default]
    Log,
    /// Panics in debug builds; release builds log instead.
    Panic,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    mode: DiagnosticMode,
    reported: Cell<usize>,
}

impl Diagnostics {
    pub fn new(mode: DiagnosticMode) -> Self {
        Self { mode, reported: Cell::new(0) }
    }

    #[inline]
    pub fn mode(&self) -> DiagnosticMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DiagnosticMode) {
        self.mode = mode;
    }

    /// Number of errors reported so far.
    #[inline]
    pub fn reported(&self) -> usize {
        self.reported.get()
    }

    pub fn report(&self, err: &EngineError) {
        self.reported.set(self.reported.get() + 1);
        match self.mode {
            DiagnosticMode::Silent => {}
            DiagnosticMode::Log => log::warn!("{err}"),
            DiagnosticMode::Panic => {
                if cfg!(debug_assertions) {
                    panic!("engine fault: {err}");
                }
                log::error!("{err}");
            }
        }
    }
}
