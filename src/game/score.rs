//! Score read model for UI display

/// Collected-item score against the level total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    score: u32,
    max_score: u32,
}

impl ScoreBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn set_max_score(&mut self, value: u32) {
        self.max_score = value;
    }

    pub fn add(&mut self, value: u32) {
        self.score = self.score.saturating_add(value);
    }

    /// Text shown by the score label.
    #[must_use]
    pub fn display(&self) -> String {
        format!("Score: {} / {}", self.score, self.max_score)
    }
}
