//! Timed node actions
//!
//! Actions are declared as a tree (`Sequence` of primitives) and flattened
//! into a queue of steps when run. Leftover time from a finished step flows
//! into the next one within the same tick.

use std::collections::VecDeque;

use glam::Vec2;

/// Something a node can be told to do over time
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move linearly from the position at start to `target` over `duration` seconds
    MoveTo { target: Vec2, duration: f32 },
    /// Detach the node from the scene
    RemoveFromParent,
    /// Run actions one after another
    Sequence(Vec<Action>),
}

impl Action {
    pub fn move_to(target: Vec2, duration: f32) -> Self {
        Action::MoveTo { target, duration }
    }

    pub fn sequence(actions: impl IntoIterator<Item = Action>) -> Self {
        Action::Sequence(actions.into_iter().collect())
    }

    /// Total scheduled time (removal is instantaneous)
    pub fn duration(&self) -> f32 {
        match self {
            Action::MoveTo { duration, .. } => duration.max(0.0),
            Action::RemoveFromParent => 0.0,
            Action::Sequence(actions) => actions.iter().map(Action::duration).sum(),
        }
    }
}

/// Outcome of advancing a runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// Steps remain
    Running,
    /// All steps done
    Finished,
    /// A `RemoveFromParent` step fired; the owner must detach the node
    RemoveFromParent,
}

#[derive(Debug, Clone)]
enum Step {
    MoveTo {
        target: Vec2,
        duration: f32,
        /// Captured on the first advance
        start: Option<Vec2>,
        elapsed: f32,
    },
    RemoveFromParent,
}

/// Executes an [`Action`] against a node position
#[derive(Debug, Clone, Default)]
pub struct ActionRunner {
    steps: VecDeque<Step>,
}

impl ActionRunner {
    pub fn new(action: Action) -> Self {
        let mut steps = VecDeque::new();
        flatten(action, &mut steps);
        Self { steps }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Advance by `dt` seconds, moving `position` as needed
    pub fn advance(&mut self, position: &mut Vec2, mut dt: f32) -> ActionStatus {
        loop {
            let Some(step) = self.steps.front_mut() else {
                return ActionStatus::Finished;
            };

            match step {
                Step::MoveTo {
                    target,
                    duration,
                    start,
                    elapsed,
                } => {
                    let from = *start.get_or_insert(*position);
                    let remaining = *duration - *elapsed;
                    if dt < remaining {
                        *elapsed += dt;
                        *position = from.lerp(*target, *elapsed / *duration);
                        return ActionStatus::Running;
                    }
                    *position = *target;
                    dt -= remaining.max(0.0);
                    self.steps.pop_front();
                }
                Step::RemoveFromParent => {
                    self.steps.pop_front();
                    return ActionStatus::RemoveFromParent;
                }
            }
        }
    }
}

fn flatten(action: Action, steps: &mut VecDeque<Step>) {
    match action {
        Action::MoveTo { target, duration } => steps.push_back(Step::MoveTo {
            target,
            duration: duration.max(0.0),
            start: None,
            elapsed: 0.0,
        }),
        Action::RemoveFromParent => steps.push_back(Step::RemoveFromParent),
        Action::Sequence(actions) => {
            for action in actions {
                flatten(action, steps);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_to_interpolates() {
        let mut runner = ActionRunner::new(Action::move_to(Vec2::new(100.0, 0.0), 1.0));
        let mut pos = Vec2::ZERO;

        assert_eq!(runner.advance(&mut pos, 0.25), ActionStatus::Running);
        assert!((pos.x - 25.0).abs() < 1e-4);

        assert_eq!(runner.advance(&mut pos, 0.5), ActionStatus::Running);
        assert!((pos.x - 75.0).abs() < 1e-4);

        assert_eq!(runner.advance(&mut pos, 0.5), ActionStatus::Finished);
        assert_eq!(pos, Vec2::new(100.0, 0.0));
        assert!(runner.is_finished());
    }

    #[test]
    fn test_sequence_removes_after_move() {
        let action = Action::sequence([
            Action::move_to(Vec2::new(0.0, 10.0), 0.5),
            Action::RemoveFromParent,
        ]);
        assert_eq!(action.duration(), 0.5);

        let mut runner = ActionRunner::new(action);
        let mut pos = Vec2::ZERO;
        assert_eq!(runner.advance(&mut pos, 0.4), ActionStatus::Running);
        // Overshoot finishes the move and fires the removal in the same advance
        assert_eq!(runner.advance(&mut pos, 0.2), ActionStatus::RemoveFromParent);
        assert_eq!(pos, Vec2::new(0.0, 10.0));
        assert!(runner.is_finished());
    }

    #[test]
    fn test_zero_duration_move_snaps() {
        let mut runner = ActionRunner::new(Action::move_to(Vec2::new(5.0, 5.0), 0.0));
        let mut pos = Vec2::ZERO;
        assert_eq!(runner.advance(&mut pos, 0.0), ActionStatus::Finished);
        assert_eq!(pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_start_is_captured_on_first_advance() {
        let mut runner = ActionRunner::new(Action::move_to(Vec2::new(10.0, 0.0), 1.0));
        // Node was moved after the action was created
        let mut pos = Vec2::new(-10.0, 0.0);
        runner.advance(&mut pos, 0.5);
        assert!(pos.x.abs() < 1e-4);
    }
}
