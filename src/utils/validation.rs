use crate::utils::error::{RigError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_port_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(RigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Port path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(RigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Port path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(RigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 指令 token 會直接寫進序列埠，不可含空白或換行
pub fn validate_command_token(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(RigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Command tokens cannot contain whitespace or control characters".to_string(),
        });
    }

    if !value.is_ascii() {
        return Err(RigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Command tokens must be ASCII".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 不滿足任何比較，也會被擋下
    if !(value >= min && value <= max) {
        return Err(RigError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_port_path() {
        assert!(validate_port_path("ports.motion", "/dev/ttyUSB0").is_ok());
        assert!(validate_port_path("ports.motion", "COM4").is_ok());
        assert!(validate_port_path("ports.motion", "").is_err());
        assert!(validate_port_path("ports.motion", "   ").is_err());
        assert!(validate_port_path("ports.motion", "COM\04").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("ports.baud_rate", 115200, 1).is_ok());
        assert!(validate_positive_number("ports.baud_rate", 0, 1).is_err());
    }

    #[test]
    fn test_validate_command_token() {
        assert!(validate_command_token("actuator.head_down", "A_DOWN").is_ok());
        assert!(validate_command_token("actuator.head_down", "").is_err());
        assert!(validate_command_token("actuator.head_down", "A DOWN").is_err());
        assert!(validate_command_token("actuator.head_down", "A_DOWN\r\n").is_err());
        assert!(validate_command_token("actuator.head_down", "Ä_DOWN").is_err());
    }

    #[test]
    fn test_validate_range_rejects_nan() {
        assert!(validate_range("board.unit_scale", 0.5, 0.001, 1000.0).is_ok());
        assert!(validate_range("board.unit_scale", 0.0, 0.001, 1000.0).is_err());
        assert!(validate_range("board.unit_scale", f64::NAN, 0.001, 1000.0).is_err());
    }
}
