//! The four-step catalog of the guided demo.

use std::fmt;

use crate::error::DemoError;

/// Number of steps in the guided demo.
pub const STEP_COUNT: u8 = 4;

/// A validated step index in `1..=STEP_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepId(u8);

impl StepId {
    pub const DRAW: StepId = StepId(1);
    pub const PREVIEW: StepId = StepId(2);
    pub const CHAT: StepId = StepId(3);
    pub const INTERACT: StepId = StepId(4);

    pub fn get(self) -> u8 {
        self.0
    }

    /// The following step, saturating at the last one.
    pub fn next(self) -> StepId {
        StepId((self.0 + 1).min(STEP_COUNT))
    }

    pub fn is_last(self) -> bool {
        self.0 == STEP_COUNT
    }

    /// Catalog entry for this step.
    pub fn info(self) -> &'static Step {
        &STEPS[usize::from(self.0 - 1)]
    }

    pub fn all() -> impl Iterator<Item = StepId> {
        (1..=STEP_COUNT).map(StepId)
    }
}

impl TryFrom<u8> for StepId {
    type Error = DemoError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if (1..=STEP_COUNT).contains(&id) {
            Ok(StepId(id))
        } else {
            Err(DemoError::InvalidStep(id))
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static description of one demo step.
#[derive(Debug)]
pub struct Step {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
}

pub static STEPS: [Step; STEP_COUNT as usize] = [
    Step {
        id: 1,
        title: "Draw or Upload",
        description: "Start by drawing a simple character outline.",
    },
    Step {
        id: 2,
        title: "3D Character Preview",
        description: "Watch AI transform your 2D sketch into a 3D model.",
    },
    Step {
        id: 3,
        title: "Emotional Conversation",
        description: "Chat with your new friend in a safe environment.",
    },
    Step {
        id: 4,
        title: "Interaction & Loading",
        description: "Experience the supportive waiting and high-five features.",
    },
];

/// How a step is drawn in the stepper relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Current,
    Upcoming,
}

impl StepStatus {
    pub fn of(step: StepId, current: StepId) -> Self {
        match step.cmp(&current) {
            std::cmp::Ordering::Less => StepStatus::Done,
            std::cmp::Ordering::Equal => StepStatus::Current,
            std::cmp::Ordering::Greater => StepStatus::Upcoming,
        }
    }
}

/// Fraction of the stepper's connecting line that is filled.
pub fn progress_fraction(current: StepId) -> f64 {
    f64::from(current.get() - 1) / f64::from(STEP_COUNT - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_match_positions() {
        for step in StepId::all() {
            assert_eq!(step.info().id, step.get());
        }
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        assert!(matches!(StepId::try_from(0), Err(DemoError::InvalidStep(0))));
        assert!(matches!(StepId::try_from(5), Err(DemoError::InvalidStep(5))));
        assert_eq!(StepId::try_from(4).unwrap(), StepId::INTERACT);
    }

    #[test]
    fn next_saturates_at_last_step() {
        assert_eq!(StepId::DRAW.next(), StepId::PREVIEW);
        assert_eq!(StepId::INTERACT.next(), StepId::INTERACT);
    }

    #[test]
    fn status_and_progress() {
        assert_eq!(StepStatus::of(StepId::DRAW, StepId::CHAT), StepStatus::Done);
        assert_eq!(StepStatus::of(StepId::CHAT, StepId::CHAT), StepStatus::Current);
        assert_eq!(StepStatus::of(StepId::INTERACT, StepId::CHAT), StepStatus::Upcoming);
        assert_eq!(progress_fraction(StepId::DRAW), 0.0);
        assert_eq!(progress_fraction(StepId::INTERACT), 1.0);
    }
}
