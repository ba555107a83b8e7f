use crate::config::rig_config::{ActuatorTokens, MotionDialect};
use crate::core::transform::round_axis;
use crate::domain::model::{ActuatorOp, Displacement};

/// 把位移與執行器動作轉成控制器文字指令，不接觸任何通道
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    dialect: MotionDialect,
    actuator: ActuatorTokens,
}

impl CommandFormatter {
    pub fn new(dialect: MotionDialect, actuator: ActuatorTokens) -> Self {
        Self { dialect, actuator }
    }

    /// `G21 G91 G1 X1 Y-3 F200`
    pub fn motion_command(&self, displacement: &Displacement) -> String {
        format!(
            "{} {} {} X{} Y{} F{}",
            self.dialect.units_directive,
            self.dialect.relative_directive,
            self.dialect.linear_move_directive,
            format_axis(displacement.dx),
            format_axis(displacement.dy),
            self.dialect.feed_rate
        )
    }

    pub fn actuator_command(&self, op: ActuatorOp) -> &str {
        self.actuator.token(op)
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::new(MotionDialect::default(), ActuatorTokens::default())
    }
}

/// 最短十進位表示：`1`、`-3`、`0.5`、`1.063`
pub fn format_axis(value: f64) -> String {
    format!("{}", round_axis(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displacement(dx: f64, dy: f64) -> Displacement {
        Displacement {
            file_steps: 0,
            rank_steps: 0,
            dx,
            dy,
        }
    }

    #[test]
    fn test_motion_command_reference_dialect() {
        let formatter = CommandFormatter::default();

        assert_eq!(
            formatter.motion_command(&displacement(1.0, -3.0)),
            "G21 G91 G1 X1 Y-3 F200"
        );
        assert_eq!(
            formatter.motion_command(&displacement(-2.0, 2.0)),
            "G21 G91 G1 X-2 Y2 F200"
        );
        assert_eq!(
            formatter.motion_command(&displacement(3.5, -0.5)),
            "G21 G91 G1 X3.5 Y-0.5 F200"
        );
    }

    #[test]
    fn test_zero_vector_is_still_well_formed() {
        let formatter = CommandFormatter::default();
        assert_eq!(
            formatter.motion_command(&displacement(-0.0, 0.0)),
            "G21 G91 G1 X0 Y0 F200"
        );
    }

    #[test]
    fn test_custom_dialect_and_tokens() {
        let dialect = MotionDialect {
            units_directive: "G20".to_string(),
            relative_directive: "G91".to_string(),
            linear_move_directive: "G0".to_string(),
            feed_rate: 1200,
        };
        let tokens = ActuatorTokens {
            effector_on: "VAC_ON".to_string(),
            ..ActuatorTokens::default()
        };
        let formatter = CommandFormatter::new(dialect, tokens);

        assert_eq!(
            formatter.motion_command(&displacement(0.667, 1.25)),
            "G20 G91 G0 X0.667 Y1.25 F1200"
        );
        assert_eq!(formatter.actuator_command(ActuatorOp::EffectorOn), "VAC_ON");
        assert_eq!(formatter.actuator_command(ActuatorOp::HeadUp), "A_UP");
    }

    #[test]
    fn test_actuator_reference_literals() {
        let formatter = CommandFormatter::default();
        assert_eq!(formatter.actuator_command(ActuatorOp::HeadDown), "A_DOWN");
        assert_eq!(formatter.actuator_command(ActuatorOp::HeadUp), "A_UP");
        assert_eq!(formatter.actuator_command(ActuatorOp::EffectorOn), "M_ON");
        assert_eq!(formatter.actuator_command(ActuatorOp::EffectorOff), "M_OFF");
    }

    #[test]
    fn test_format_axis() {
        assert_eq!(format_axis(1.0), "1");
        assert_eq!(format_axis(-1.0625), "-1.063");
        assert_eq!(format_axis(0.1 + 0.2), "0.3");
    }
}
