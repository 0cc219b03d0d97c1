//! Terminal palette for image dumps, keyed by what is being printed rather
//! than by hue.

/// Escape codes for each role in a dump line. Every field is empty when
/// colors are off, so callers interpolate them unconditionally.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    /// `[section]` headers.
    pub section: &'static str,
    /// String table contents and string constants.
    pub literal: &'static str,
    /// `#N` record indices.
    pub index: &'static str,
    /// `<type #N>` placeholders for references that could not be resolved.
    pub unresolved: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self {
        section: "\x1b[34m",
        literal: "\x1b[32m",
        index: "\x1b[2m",
        unresolved: "\x1b[31m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        section: "",
        literal: "",
        index: "",
        unresolved: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    /// Wrap `text` in `color`, followed by a reset.
    pub fn paint(&self, color: &str, text: impl std::fmt::Display) -> String {
        format!("{color}{text}{}", self.reset)
    }
}
