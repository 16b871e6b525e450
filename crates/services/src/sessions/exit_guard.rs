/// Decision for a navigation attempt passed through an [`ExitGuard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitDecision<T> {
    /// Nothing to protect; navigate right away.
    Proceed(T),
    /// The attempt is held until the user confirms or cancels.
    Intercepted,
}

/// Single-slot pending navigation.
///
/// While guarded, the first attempt is held and surfaced for confirmation.
/// A second attempt while one is pending replaces the held target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitGuard<T> {
    pending: Option<T>,
}

impl<T> Default for ExitGuard<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ExitGuard<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes a navigation attempt to `target`.
    pub fn request(&mut self, guarded: bool, target: T) -> ExitDecision<T> {
        if guarded {
            self.pending = Some(target);
            ExitDecision::Intercepted
        } else {
            self.pending = None;
            ExitDecision::Proceed(target)
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Releases the held target for navigation.
    pub fn confirm(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drops the held target.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
