use crate::utils::error::{RigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 棋盤格座標，file 與 rank 皆為 0..=7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub const A8: Square = Square { file: 0, rank: 7 };

    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 解析 `[a-h][1-8]` 兩字元 token
    pub fn parse(token: &str) -> Result<Self> {
        let bytes = token.as_bytes();
        if bytes.len() != 2 {
            return Err(RigError::malformed(
                token,
                format!("a square needs 2 characters, got {}", token.chars().count()),
            ));
        }
        Self::from_bytes(token, bytes[0], bytes[1])
    }

    fn from_bytes(token: &str, file: u8, rank: u8) -> Result<Self> {
        if !(b'a'..=b'h').contains(&file) {
            return Err(RigError::malformed(
                token,
                format!("file '{}' is outside a-h", file as char),
            ));
        }
        if !(b'1'..=b'8').contains(&rank) {
            return Err(RigError::malformed(
                token,
                format!("rank '{}' is outside 1-8", rank as char),
            ));
        }
        Ok(Self {
            file: file - b'a',
            rank: rank - b'1',
        })
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }
}

impl TryFrom<String> for Square {
    type Error = RigError;

    fn try_from(value: String) -> Result<Self> {
        Square::parse(&value)
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

/// 來源格與目標格，不檢查棋規
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChessMove {
    pub source: Square,
    pub target: Square,
}

impl ChessMove {
    pub fn parse(token: &str) -> Result<Self> {
        let bytes = token.as_bytes();
        // 非 ASCII 字元會讓 byte 長度與字元數不同，一律視為格式錯誤
        if bytes.len() != 4 || !token.is_ascii() {
            return Err(RigError::malformed(
                token,
                format!("a move needs 4 characters, got {}", token.chars().count()),
            ));
        }

        let source = Square::from_bytes(token, bytes[0], bytes[1])?;
        let target = Square::from_bytes(token, bytes[2], bytes[3])?;
        Ok(Self { source, target })
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.target)
    }
}

/// 一段相對位移：棋格步數與換算後的控制器單位
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Displacement {
    pub file_steps: i32,
    pub rank_steps: i32,
    pub dx: f64,
    pub dy: f64,
}

impl Displacement {
    /// 兩軸同時移動，耗時由較長的一軸決定
    pub fn dominant_steps(&self) -> u32 {
        self.file_steps.unsigned_abs().max(self.rank_steps.unsigned_abs())
    }

    pub fn is_zero(&self) -> bool {
        self.file_steps == 0 && self.rank_steps == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Leg {
    ToSource,
    ToTarget,
    ToOrigin,
}

impl Leg {
    /// 抵達後要切換的末端執行器動作，回原點時不夾取
    pub fn effector_toggle(&self) -> Option<ActuatorOp> {
        match self {
            Leg::ToSource => Some(ActuatorOp::EffectorOn),
            Leg::ToTarget => Some(ActuatorOp::EffectorOff),
            Leg::ToOrigin => None,
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Leg::ToSource => "to-source",
            Leg::ToTarget => "to-target",
            Leg::ToOrigin => "to-origin",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegPlan {
    pub leg: Leg,
    pub displacement: Displacement,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionPlan {
    pub chess_move: ChessMove,
    pub legs: [LegPlan; 3],
}

impl MotionPlan {
    pub fn to_source(&self) -> &LegPlan {
        &self.legs[0]
    }

    pub fn to_target(&self) -> &LegPlan {
        &self.legs[1]
    }

    pub fn to_origin(&self) -> &LegPlan {
        &self.legs[2]
    }

    pub fn total_motion_time(&self) -> Duration {
        self.legs.iter().map(|leg| leg.duration).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActuatorOp {
    HeadDown,
    HeadUp,
    EffectorOn,
    EffectorOff,
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_parse() {
        let square = Square::parse("c2").unwrap();
        assert_eq!((square.file(), square.rank()), (2, 1));
        assert_eq!(square.to_string(), "c2");

        let corner = Square::parse("a8").unwrap();
        assert_eq!((corner.file(), corner.rank()), (0, 7));

        assert!(Square::parse("i1").is_err());
        assert!(Square::parse("a0").is_err());
        assert!(Square::parse("a9").is_err());
        assert!(Square::parse("a").is_err());
    }

    #[test]
    fn test_square_new_bounds() {
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
    }

    #[test]
    fn test_chess_move_parse() {
        let mv = ChessMove::parse("g1f3").unwrap();
        assert_eq!(mv.source, Square::parse("g1").unwrap());
        assert_eq!(mv.target, Square::parse("f3").unwrap());
        assert_eq!(mv.to_string(), "g1f3");
    }

    #[test]
    fn test_chess_move_rejects_malformed_tokens() {
        for token in ["i9a1a2", "a0a1a2", "zza1", "", "c2c", "c2c4 ", "i1a1", "a9a1", "a1a0", "C2C4", "é2e4"] {
            let err = ChessMove::parse(token).unwrap_err();
            assert!(
                matches!(err, RigError::MalformedMove { .. }),
                "{token:?} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn test_square_deserializes_from_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            origin: Square,
        }

        let parsed: Wrapper = toml::from_str("origin = \"a8\"").unwrap();
        assert_eq!(parsed.origin, Square::new(0, 7).unwrap());

        assert!(toml::from_str::<Wrapper>("origin = \"z8\"").is_err());
    }

    #[test]
    fn test_leg_effector_toggle() {
        assert_eq!(Leg::ToSource.effector_toggle(), Some(ActuatorOp::EffectorOn));
        assert_eq!(Leg::ToTarget.effector_toggle(), Some(ActuatorOp::EffectorOff));
        assert_eq!(Leg::ToOrigin.effector_toggle(), None);
    }

    #[test]
    fn test_dominant_steps() {
        let d = Displacement {
            file_steps: 2,
            rank_steps: -6,
            dx: 1.0,
            dy: -3.0,
        };
        assert_eq!(d.dominant_steps(), 6);
        assert!(!d.is_zero());
    }
}
