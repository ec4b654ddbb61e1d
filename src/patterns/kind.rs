use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every generative pattern the table knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Wave,
    Ripple,
    Breathe,
    Mountain,
    Spiral,
    Rain,
    Chaos,
    /// Voice-waveform band shown while narration is playing.
    Speaking,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown pattern '{0}'")]
pub struct UnknownPattern(pub String);

impl PatternKind {
    pub const ALL: [PatternKind; 8] = [
        PatternKind::Wave,
        PatternKind::Ripple,
        PatternKind::Breathe,
        PatternKind::Mountain,
        PatternKind::Spiral,
        PatternKind::Rain,
        PatternKind::Chaos,
        PatternKind::Speaking,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::Wave => "wave",
            PatternKind::Ripple => "ripple",
            PatternKind::Breathe => "breathe",
            PatternKind::Mountain => "mountain",
            PatternKind::Spiral => "spiral",
            PatternKind::Rain => "rain",
            PatternKind::Chaos => "chaos",
            PatternKind::Speaking => "speaking",
        }
    }

    /// Unknown names fall back to `wave`.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or(PatternKind::Wave)
    }
}

impl Default for PatternKind {
    fn default() -> Self {
        PatternKind::Wave
    }
}

impl FromStr for PatternKind {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PatternKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPattern(s.to_string()))
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
