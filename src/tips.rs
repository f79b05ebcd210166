use chrono::{Datelike, Utc};

pub static TIPS: &[&str] = &[
    "Regularly inspect your plants for early signs of disease.",
    "Water plants at the base to prevent leaf moisture.",
    "Use certified disease-free seeds and tubers.",
    "Maintain proper soil pH to enhance plant resistance.",
    "Remove and destroy infected plant debris promptly.",
];

/// Cycles through the care tip pool, one tip at a time.
#[derive(Debug, Clone)]
pub struct TipRotation {
    index: usize,
}

impl TipRotation {
    /// Starts at the tip for the current date, so the opening tip changes
    /// day to day.
    pub fn today() -> Self {
        Self::starting_at(Utc::now().ordinal0() as usize)
    }

    pub fn starting_at(seed: usize) -> Self {
        Self { index: seed % TIPS.len() }
    }

    pub fn current(&self) -> &'static str {
        TIPS[self.index]
    }

    /// Moves to the next tip, wrapping back to the first after the last.
    pub fn advance(&mut self) -> &'static str {
        self.index = (self.index + 1) % TIPS.len();
        self.current()
    }
}
