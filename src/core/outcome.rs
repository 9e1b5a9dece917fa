//! Result values returned by callbacks and actions.

/// What a callback or action reports back to the transition pipeline.
///
/// `Halt` is the only value that changes control flow for callbacks: it
/// stops the remaining callbacks of the current phase. For actions both
/// `Failure` and `Halt` mark the transition as unsuccessful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Success,
    Failure,
    Halt,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_halt(self) -> bool {
        matches!(self, Outcome::Halt)
    }
}

impl From<()> for Outcome {
    fn from(_: ()) -> Self {
        Outcome::Success
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        if value {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}
