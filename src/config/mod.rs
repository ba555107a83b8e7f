pub mod rig_config;

pub use rig_config::RigConfig;

use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "chess-rig")]
#[command(about = "Drive a two-axis pick-and-place rig from chess moves")]
pub struct CliConfig {
    /// Path to a TOML rig configuration; built-in calibration is used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Serial port of the motion (G-code) controller
    #[arg(long)]
    pub motion_port: Option<String>,

    /// Serial port of the actuator controller
    #[arg(long)]
    pub actuator_port: Option<String>,

    #[arg(long)]
    pub baud_rate: Option<u32>,

    /// Log commands instead of opening serial ports
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入設定檔後套用命令列覆蓋
    pub fn load_rig_config(&self) -> Result<RigConfig> {
        let mut config = match &self.config {
            Some(path) => RigConfig::from_file(path)?,
            None => RigConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut RigConfig) {
        if let Some(port) = &self.motion_port {
            tracing::info!("🔧 Motion port overridden to: {}", port);
            config.ports.motion = port.clone();
        }
        if let Some(port) = &self.actuator_port {
            tracing::info!("🔧 Actuator port overridden to: {}", port);
            config.ports.actuator = port.clone();
        }
        if let Some(baud_rate) = self.baud_rate {
            tracing::info!("🔧 Baud rate overridden to: {}", baud_rate);
            config.ports.baud_rate = baud_rate;
        }
    }
}
