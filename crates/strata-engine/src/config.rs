//! Engine configuration.

use crate::diagnostics::DiagnosticMode;
use crate::style::HighlightConfig;

/// Pointer behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    /// A touch release later than this after the press is not a click.
    pub touch_click_delay_ms: f64,

    /// Distance of the cross-pattern search used when a touch release lands
    /// on empty space.
    pub touch_search_offset: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            touch_click_delay_ms: 300.0,
            touch_search_offset: 10.0,
        }
    }
}

/// Top-level configuration passed to [`Engine::new`](crate::Engine::new).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    pub input: InputConfig,
    pub highlight: HighlightConfig,

    /// Where recoverable faults go.
    pub diagnostics: DiagnosticMode,
}

impl EngineConfig {
    pub fn with_input(mut self, input: InputConfig) -> Self {
        self.input = input;
        self
    }

    pub fn with_highlight(mut self, highlight: HighlightConfig) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_diagnostics(mut self, mode: DiagnosticMode) -> Self {
        self.diagnostics = mode;
        self
    }
}
