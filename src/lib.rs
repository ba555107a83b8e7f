pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CliConfig, RigConfig};
pub use crate::core::{
    formatter::CommandFormatter,
    sequencer::{MoveReport, Outcome, Sequencer, SequencerState},
    session::{run_session, SessionSummary},
    transform::MotionPlanner,
};
pub use utils::error::{RigError, Result};
