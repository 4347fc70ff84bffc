//! Arithmetic gate shown before any delete fires.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Confirmed,
    Rejected,
}

/// `a × b` question with `a, b ∈ [1, 10]` and the user's typed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteChallenge<T> {
    pub target: T,
    pub description: String,
    a: u8,
    b: u8,
    pub input: String,
    pub error: Option<String>,
}

impl<T: Clone> DeleteChallenge<T> {
    pub fn roll(target: T, description: impl Into<String>) -> Self {
        let mut rng = rand::rng();
        Self::with_operands(target, description, rng.random_range(1..=10), rng.random_range(1..=10))
    }

    pub fn with_operands(target: T, description: impl Into<String>, a: u8, b: u8) -> Self {
        Self {
            target,
            description: description.into(),
            a: a.clamp(1, 10),
            b: b.clamp(1, 10),
            input: String::new(),
            error: None,
        }
    }

    pub fn question(&self) -> String {
        format!("What is {} × {}?", self.a, self.b)
    }

    pub fn expected(&self) -> i64 {
        i64::from(self.a) * i64::from(self.b)
    }

    /// Checks the typed answer. A wrong answer wipes the input and leaves the dialog up.
    pub fn submit(&mut self) -> ChallengeOutcome {
        match self.input.trim().parse::<i64>() {
            Ok(answer) if answer == self.expected() => {
                self.error = None;
                ChallengeOutcome::Confirmed
            }
            _ => {
                self.input.clear();
                self.error = Some("Incorrect answer. Please try again.".to_string());
                ChallengeOutcome::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_product_confirms() {
        let mut challenge = DeleteChallenge::with_operands(7u32, "Delete record", 6, 7);
        challenge.input = " 42\n".into();
        assert_eq!(challenge.submit(), ChallengeOutcome::Confirmed);
        assert_eq!(challenge.target, 7);
    }

    #[test]
    fn wrong_or_garbage_answers_reject_and_clear() {
        let mut challenge = DeleteChallenge::with_operands((), "Delete record", 3, 4);
        for answer in ["13", "12.0", "twelve", "", "1 2"] {
            challenge.input = answer.into();
            assert_eq!(challenge.submit(), ChallengeOutcome::Rejected);
            assert!(challenge.input.is_empty());
            assert!(challenge.error.is_some());
        }
        challenge.input = "12".into();
        assert_eq!(challenge.submit(), ChallengeOutcome::Confirmed);
        assert!(challenge.error.is_none());
    }

    #[test]
    fn rolled_operands_stay_in_range() {
        for _ in 0..200 {
            let challenge = DeleteChallenge::roll((), "x");
            assert!((1..=100).contains(&challenge.expected()));
            assert!((1..=10).contains(&challenge.a) && (1..=10).contains(&challenge.b));
        }
    }
}
