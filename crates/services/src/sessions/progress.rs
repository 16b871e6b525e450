/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub current_index: usize,
    pub elapsed_secs: u32,
    pub started: bool,
    pub submitting: bool,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Progress before any questions are available.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: 0,
            answered: 0,
            current_index: 0,
            elapsed_secs: 0,
            started: false,
            submitting: false,
            is_complete: false,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}
