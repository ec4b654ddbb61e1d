use serde_json::json;

use super::directive::Directive;
use crate::patterns::{Params, PatternKind};

/// Curated directives cycled while the model is unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackSequence {
    entries: Vec<Directive>,
}

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap_or_default()
}

impl FallbackSequence {
    /// Returns `None` for an empty list; the cycle needs at least one entry.
    pub fn new(entries: Vec<Directive>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// The built-in five-step show, with the ripple centred on the table.
    pub fn curated(rows: usize, cols: usize) -> Self {
        let entries = vec![
            Directive::new(
                PatternKind::Wave,
                params(json!({"frequency": 2.0, "speed": 1.0, "direction_angle": 0})),
                "gentle startup",
            ),
            Directive::new(
                PatternKind::Ripple,
                params(json!({"center_x": cols / 2, "center_y": rows / 2, "frequency": 3, "speed": 2})),
                "drop in a pond",
            ),
            Directive::new(
                PatternKind::Spiral,
                params(json!({"arms": 3, "speed": 1.5, "tightness": 2})),
                "cosmic swirl",
            ),
            Directive::new(
                PatternKind::Breathe,
                params(json!({"speed": 0.7, "max_amplitude": 70})),
                "deep breath",
            ),
            Directive::new(
                PatternKind::Chaos,
                params(json!({"complexity": 3, "speed": 1.2})),
                "electric dreams",
            ),
        ];
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> &Directive {
        &self.entries[0]
    }

    /// Index after `index`, wrapping at the end.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.entries.len()
    }

    pub fn get(&self, index: usize) -> &Directive {
        &self.entries[index % self.entries.len()]
    }
}

impl Default for FallbackSequence {
    fn default() -> Self {
        Self::curated(30, 30)
    }
}
