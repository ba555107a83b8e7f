// Domain layer: board/move model and the channel port. No transport or config dependencies.

pub mod model;
pub mod ports;
