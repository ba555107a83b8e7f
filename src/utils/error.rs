use thiserror::Error;

#[derive(Error, Debug)]
pub enum RigError {
    #[error("Malformed move '{token}': {reason}")]
    MalformedMove { token: String, reason: String },

    #[error("Send on {channel} channel failed: {message}")]
    Send { channel: String, message: String },

    #[error("{channel} channel is closed")]
    ChannelClosed { channel: String },

    #[error("Session already terminated")]
    SessionTerminated,

    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Transport,
    Configuration,
    System,
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RigError {
    pub fn malformed(token: &str, reason: impl Into<String>) -> Self {
        RigError::MalformedMove {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RigError::MalformedMove { .. } | RigError::SessionTerminated => ErrorCategory::Input,
            RigError::Send { .. } | RigError::ChannelClosed { .. } | RigError::SerialPort(_) => {
                ErrorCategory::Transport
            }
            RigError::ConfigError { .. }
            | RigError::ConfigValidationError { .. }
            | RigError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RigError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RigError::MalformedMove { .. } => ErrorSeverity::Low,
            RigError::Send { .. } => ErrorSeverity::Medium,
            RigError::ChannelClosed { .. } | RigError::SessionTerminated => ErrorSeverity::Medium,
            RigError::ConfigError { .. }
            | RigError::ConfigValidationError { .. }
            | RigError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            RigError::SerialPort(_) | RigError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// 是否可在互動迴圈中直接略過
    pub fn is_recoverable(&self) -> bool {
        self.severity() <= ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RigError::MalformedMove { .. } => {
                "Enter a move as four characters, e.g. \"e2e4\" (files a-h, ranks 1-8)"
            }
            RigError::Send { .. } => {
                "Check the controller cable and power; the rig may need to be re-homed to the park square"
            }
            RigError::ChannelClosed { .. } | RigError::SessionTerminated => {
                "Restart the program to open the controller channels again"
            }
            RigError::SerialPort(_) => {
                "Verify the port paths (--motion-port / --actuator-port) and that no other program holds them"
            }
            RigError::IoError(_) => "Check file permissions and that the console is readable",
            RigError::ConfigError { .. }
            | RigError::ConfigValidationError { .. }
            | RigError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RigError::MalformedMove { token, .. } => {
                format!("'{}' is not a valid move", token)
            }
            RigError::Send { channel, .. } => {
                format!("Could not send a command to the {} controller", channel)
            }
            RigError::ChannelClosed { channel } => {
                format!("The {} controller connection is already closed", channel)
            }
            RigError::SessionTerminated => "The session has already ended".to_string(),
            RigError::SerialPort(e) => format!("Could not open a serial port: {}", e),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RigError>;
