use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Idle,
    Fetching,
    Compacting,
    Extracting,
    Synthesizing,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "Idle",
            Stage::Fetching => "Fetching",
            Stage::Compacting => "Compacting",
            Stage::Extracting => "Extracting",
            Stage::Synthesizing => "Synthesizing",
            Stage::Done => "Done",
        }
    }

    /// The stage that follows this one on the happy path.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Idle => Some(Stage::Fetching),
            Stage::Fetching => Some(Stage::Compacting),
            Stage::Compacting => Some(Stage::Extracting),
            Stage::Extracting => Some(Stage::Synthesizing),
            Stage::Synthesizing => Some(Stage::Done),
            Stage::Done => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
