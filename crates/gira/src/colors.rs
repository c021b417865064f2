//! Semantic color theme for consistent terminal output
//!
//! - `ACTIVE` => blue - headers, unrecognized statuses
//! - `SUCCESS` => green - completed issues, deleted branches
//! - `MUTED` => dimmed - issues not started yet
//! - `FAIL` => red - selection marks, errors
//!
//! Statuses map through [`StatusTone`]: Complete=SUCCESS, Pending=MUTED,
//! Neutral=ACTIVE.

use std::sync::LazyLock;

use gira_core::StatusTone;
use owo_colors::Style;

/// Semantic color definitions for terminal output
pub struct SemanticColors {
    /// Blue - headers, unrecognized statuses
    pub active: Style,
    /// Green - completed issues, deleted branches
    pub success: Style,
    /// Dimmed - issues not started yet
    pub muted: Style,
    /// Yellow - warnings
    pub warning: Style,
    /// Red - selection marks, errors
    pub fail: Style,
}

impl Default for SemanticColors {
    fn default() -> Self {
        Self {
            active: Style::new().blue(),
            success: Style::new().green(),
            muted: Style::new().dimmed(),
            warning: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }
}

impl SemanticColors {
    /// Style for a status of the given tone
    pub fn for_tone(&self, tone: StatusTone) -> Style {
        match tone {
            StatusTone::Complete => self.success,
            StatusTone::Pending => self.muted,
            StatusTone::Neutral => self.active,
        }
    }
}

/// Global default theme
pub static COLORS: LazyLock<SemanticColors> = LazyLock::new(SemanticColors::default);
