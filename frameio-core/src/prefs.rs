use crate::notify::DisplayLevel;

/// Runtime knobs, fixed before any operation starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub display_level: DisplayLevel,
    /// Replace existing destinations without asking.
    pub overwrite: bool,
}

impl Preferences {
    pub fn new(display_level: DisplayLevel) -> Self {
        Self {
            display_level,
            overwrite: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_display_level(mut self, display_level: DisplayLevel) -> Self {
        self.display_level = display_level;
        self
    }
}
