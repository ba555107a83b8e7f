pub mod formatter;
pub mod sender;
pub mod sequencer;
pub mod session;
pub mod transform;

pub use crate::domain::model::{ActuatorOp, ChessMove, Displacement, Leg, LegPlan, MotionPlan, Square};
pub use crate::domain::ports::CommandChannel;
pub use crate::utils::error::Result;
