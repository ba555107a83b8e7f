// Adapters layer: concrete channel implementations for real controllers and dry runs.

pub mod console;
pub mod serial;

use crate::config::RigConfig;
use crate::domain::ports::CommandChannel;
use crate::utils::error::Result;

pub use console::ConsoleChannel;
pub use serial::SerialChannel;

pub type DynChannel = Box<dyn CommandChannel>;

/// 依設定開啟兩個通道；dry-run 時不接觸序列埠
pub fn open_channels(config: &RigConfig, dry_run: bool) -> Result<(DynChannel, DynChannel)> {
    if dry_run {
        return Ok((
            Box::new(ConsoleChannel::new("motion")),
            Box::new(ConsoleChannel::new("actuator")),
        ));
    }

    let motion = SerialChannel::open("motion", &config.ports.motion, config.ports.baud_rate)?;
    let actuator =
        SerialChannel::open("actuator", &config.ports.actuator, config.ports.baud_rate)?;
    Ok((Box::new(motion), Box::new(actuator)))
}
