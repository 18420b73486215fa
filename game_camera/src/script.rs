//! Timed sequences of lock-on commands.

use std::time::Duration;

use game_targeting::settings::secs;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    ToggleLock,
    SwitchLeft,
    SwitchRight,
    ClearLock,
    LockOn { target: String },
    SwitchTo { target: String },
    AutoCorrect { target: String },
    Despawn { target: String },
    Move { moving: bool },
    Look { turn: f32, look_up: f32 },
    Preset { name: String },
}

impl ScriptAction {
    /// Returns the name of the actor this action refers to.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::LockOn { target }
            | Self::SwitchTo { target }
            | Self::AutoCorrect { target }
            | Self::Despawn { target } => Some(target),
            _ => None,
        }
    }
}

/// An action that runs `delay` seconds after the previous step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub delay: f32,
    #[serde(flatten)]
    pub action: ScriptAction,
}

impl ScriptStep {
    pub fn new(delay: f32, action: ScriptAction) -> Self {
        Self { delay, action }
    }
}

/// A list of [`ScriptStep`]s driven by the frame clock.
#[derive(Clone, Debug, Default)]
pub struct Script {
    steps: Vec<ScriptStep>,
    next: usize,
    /// The deadline of the next step, relative to the start of the script.
    deadline: Duration,
}

impl Script {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        let deadline = steps.first().map_or(Duration::ZERO, |step| secs(step.delay));

        Self {
            steps,
            next: 0,
            deadline,
        }
    }

    /// Returns every action whose deadline passed at `now`, in order.
    pub fn poll(&mut self, now: Duration) -> Vec<ScriptAction> {
        let mut actions = Vec::new();

        while let Some(step) = self.steps.get(self.next) {
            if now < self.deadline {
                break;
            }

            actions.push(step.action.clone());
            self.next += 1;

            if let Some(step) = self.steps.get(self.next) {
                self.deadline += secs(step.delay);
            }
        }

        actions
    }

    /// Returns `true` if every step ran.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.next >= self.steps.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
