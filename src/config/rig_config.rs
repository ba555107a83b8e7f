use crate::domain::model::{ActuatorOp, Square};
use crate::utils::error::{RigError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 整台機構的不可變設定，建構時傳入 planner 與 sequencer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub ports: PortsConfig,
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub motion: MotionDialect,
    pub actuator: ActuatorTokens,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortsConfig {
    pub motion: String,
    pub actuator: String,
    pub baud_rate: u32,
}

impl Default for PortsConfig {
    fn default() -> Self {
        Self {
            motion: "COM4".to_string(),
            actuator: "COM3".to_string(),
            baud_rate: 115_200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// 工具停放格
    pub origin: Square,
    /// 每一格對應的控制器單位
    pub unit_scale: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            origin: Square::A8,
            unit_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// 較慢一軸移動一格所需時間
    pub per_step_ms: u64,
    /// 升降頭動作後的靜置時間
    pub settle_ms: u64,
    /// 末端執行器切換後的等待
    pub toggle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            per_step_ms: 286,
            settle_ms: 1700,
            toggle_ms: 100,
        }
    }
}

impl TimingConfig {
    pub fn per_step(&self) -> Duration {
        Duration::from_millis(self.per_step_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn toggle(&self) -> Duration {
        Duration::from_millis(self.toggle_ms)
    }
}

/// 運動控制器的 G-code 方言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionDialect {
    pub units_directive: String,
    pub relative_directive: String,
    pub linear_move_directive: String,
    pub feed_rate: u32,
}

impl Default for MotionDialect {
    fn default() -> Self {
        Self {
            units_directive: "G21".to_string(),
            relative_directive: "G91".to_string(),
            linear_move_directive: "G1".to_string(),
            feed_rate: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorTokens {
    pub head_down: String,
    pub head_up: String,
    pub effector_on: String,
    pub effector_off: String,
}

impl Default for ActuatorTokens {
    fn default() -> Self {
        Self {
            head_down: "A_DOWN".to_string(),
            head_up: "A_UP".to_string(),
            effector_on: "M_ON".to_string(),
            effector_off: "M_OFF".to_string(),
        }
    }
}

impl ActuatorTokens {
    pub fn token(&self, op: ActuatorOp) -> &str {
        match op {
            ActuatorOp::HeadDown => &self.head_down,
            ActuatorOp::HeadUp => &self.head_up,
            ActuatorOp::EffectorOn => &self.effector_on,
            ActuatorOp::EffectorOff => &self.effector_off,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub quit_token: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            quit_token: "quit".to_string(),
        }
    }
}

impl RigConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RigError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RigError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MOTION_PORT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RigError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_port_path("ports.motion", &self.ports.motion)?;
        validation::validate_port_path("ports.actuator", &self.ports.actuator)?;
        validation::validate_positive_number("ports.baud_rate", u64::from(self.ports.baud_rate), 1)?;

        if self.ports.motion == self.ports.actuator {
            return Err(RigError::InvalidConfigValueError {
                field: "ports.actuator".to_string(),
                value: self.ports.actuator.clone(),
                reason: "Motion and actuator controllers must use different ports".to_string(),
            });
        }

        validation::validate_range("board.unit_scale", self.board.unit_scale, 0.001, 1000.0)?;
        validation::validate_positive_number("motion.feed_rate", u64::from(self.motion.feed_rate), 1)?;

        validation::validate_command_token("motion.units_directive", &self.motion.units_directive)?;
        validation::validate_command_token("motion.relative_directive", &self.motion.relative_directive)?;
        validation::validate_command_token(
            "motion.linear_move_directive",
            &self.motion.linear_move_directive,
        )?;

        validation::validate_command_token("actuator.head_down", &self.actuator.head_down)?;
        validation::validate_command_token("actuator.head_up", &self.actuator.head_up)?;
        validation::validate_command_token("actuator.effector_on", &self.actuator.effector_on)?;
        validation::validate_command_token("actuator.effector_off", &self.actuator.effector_off)?;

        validation::validate_non_empty_string("session.quit_token", &self.session.quit_token)?;
        Ok(())
    }
}

impl Validate for RigConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
