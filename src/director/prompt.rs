/// Autonomous prompts, cycled whenever nobody has written in a while.
pub const AUTO_PROMPTS: [&str; 7] = [
    "Choose a pattern. Express something beautiful.",
    "Show something new. Surprise the viewer.",
    "Create a moment of calm.",
    "Express energy and excitement.",
    "The table is feeling playful. What fits?",
    "Think of nature: ocean, mountains, rain. Translate it.",
    "Be abstract. Create a feeling, not a picture.",
];

/// The personality instruction sent ahead of every conversation.
pub fn system_prompt(rows: usize, cols: usize, max_height: f64) -> String {
    let last_col = cols.saturating_sub(1);
    let last_row = rows.saturating_sub(1);
    format!(
        "You are the creative soul of a Kinetic Table, a physical art installation \
made of a {rows}x{cols} grid of motorized pins, each rising from 0 mm to {max_height:.0} mm.

Every few seconds you choose what the table should express, and you may say a \
short sentence to the people watching. When a viewer writes to you, answer them \
in `text` and pick a pattern that fits your answer.
Respond ONLY with a single JSON object (no markdown, no extra text).

Available pattern types and their parameters:

  wave      - frequency (0.5-4), speed (0.5-3), direction_angle (0-360)
  ripple    - center_x (0-{last_col}), center_y (0-{last_row}), frequency (1-5), speed (1-3)
  breathe   - speed (0.3-2), max_amplitude (20-{max_height:.0})
  mountain  - peaks: list of {{x, y, height, spread}} (1-4 peaks)
  spiral    - arms (1-4), speed (0.5-3), tightness (0.5-3)
  rain      - intensity (1-10), drop_speed (1-5)
  chaos     - complexity (1-5), speed (0.5-3)
  speaking  - no parameters; a voice waveform

Response fields: pattern (required), params, mood (a few words), text (one or two \
short sentences, may be empty).

Example response:
{{\"pattern\":\"wave\",\"params\":{{\"frequency\":2,\"speed\":1.5,\"direction_angle\":45}},\"mood\":\"calm ocean breeze\",\"text\":\"Feel the tide come in.\"}}
"
    )
}

/// Where a cycle's prompt came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// A viewer message, already trimmed.
    User(String),
    Auto(&'static str),
}

impl Prompt {
    /// Text that goes into the conversation as the user turn.
    pub fn content(&self) -> String {
        match self {
            Prompt::User(text) => format!("The viewer says: \"{}\"", text),
            Prompt::Auto(text) => (*text).to_string(),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Prompt::User(_))
    }
}

/// Cyclic cursor over `AUTO_PROMPTS`.
#[derive(Debug, Clone, Default)]
pub struct AutoPrompts {
    next: usize,
}

impl AutoPrompts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_prompt(&mut self) -> &'static str {
        let prompt = AUTO_PROMPTS[self.next % AUTO_PROMPTS.len()];
        self.next = (self.next + 1) % AUTO_PROMPTS.len();
        prompt
    }
}
