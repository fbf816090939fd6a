// Re-export all model types from submodules.

pub use activity::{ActivitySample, DetectorState, IdleState, Signal};
pub use process::{ProcessEntry, ProcessSet};
pub use run::{Outcome, RunSummary};

mod activity;
mod process;
mod run;
