//! 棋格座標到相對位移的轉換。
//!
//! 每步棋拆成三段：停放格到來源格、來源格到目標格、目標格回停放格。
//! 位移同時保留棋格步數（計算耗時用）與換算後的控制器單位（寫入指令用）。

use crate::config::rig_config::{BoardConfig, TimingConfig};
use crate::domain::model::{ChessMove, Displacement, Leg, LegPlan, MotionPlan, Square};
use crate::utils::error::Result;
use std::time::Duration;

/// 指令中座標保留的小數位數
pub const AXIS_DECIMALS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPlanner {
    origin: Square,
    unit_scale: f64,
    per_step: Duration,
}

impl MotionPlanner {
    pub fn new(board: &BoardConfig, timing: &TimingConfig) -> Self {
        Self {
            origin: board.origin,
            unit_scale: board.unit_scale,
            per_step: timing.per_step(),
        }
    }

    pub fn origin(&self) -> Square {
        self.origin
    }

    /// 解析並規劃；格式錯誤時回傳 `MalformedMove`
    pub fn plan_token(&self, token: &str) -> Result<MotionPlan> {
        let chess_move = ChessMove::parse(token)?;
        Ok(self.plan(&chess_move))
    }

    pub fn plan(&self, chess_move: &ChessMove) -> MotionPlan {
        let waypoints = [
            (Leg::ToSource, self.origin, chess_move.source),
            (Leg::ToTarget, chess_move.source, chess_move.target),
            (Leg::ToOrigin, chess_move.target, self.origin),
        ];

        let legs = waypoints.map(|(leg, from, to)| {
            let displacement = self.displacement(from, to);
            LegPlan {
                leg,
                displacement,
                duration: self.per_step * displacement.dominant_steps(),
            }
        });

        MotionPlan {
            chess_move: *chess_move,
            legs,
        }
    }

    fn displacement(&self, from: Square, to: Square) -> Displacement {
        let file_steps = i32::from(to.file()) - i32::from(from.file());
        let rank_steps = i32::from(to.rank()) - i32::from(from.rank());
        Displacement {
            file_steps,
            rank_steps,
            dx: round_axis(f64::from(file_steps) * self.unit_scale),
            dy: round_axis(f64::from(rank_steps) * self.unit_scale),
        }
    }
}

/// 以 half-away-from-zero 四捨五入到三位小數，並把 -0 正規化為 0
pub fn round_axis(value: f64) -> f64 {
    let factor = 10f64.powi(AXIS_DECIMALS);
    (value * factor).round() / factor + 0.0
}
