//! 跨通道的開迴路時序控制。
//!
//! 每步棋依序執行三段 leg，指令之間只靠固定或計算出的等待時間同步，
//! 控制器不回傳任何確認。傳送失敗只記錄，不改變時間表。

use crate::config::rig_config::{RigConfig, TimingConfig};
use crate::core::formatter::CommandFormatter;
use crate::core::sender::{ChannelSender, Sent};
use crate::core::transform::MotionPlanner;
use crate::domain::model::{ActuatorOp, Leg, LegPlan, MotionPlan};
use crate::domain::ports::CommandChannel;
use crate::utils::error::{RigError, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    AwaitingMove,
    Executing(Leg),
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFailure {
    pub leg: Leg,
    pub channel: String,
    pub command: String,
    pub error: String,
}

/// 單步棋的執行紀錄
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport {
    pub plan: MotionPlan,
    pub sent: Vec<Sent>,
    pub failures: Vec<SendFailure>,
}

impl MoveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Executed(MoveReport),
    Terminated,
}

pub struct Sequencer<M: CommandChannel, A: CommandChannel> {
    planner: MotionPlanner,
    formatter: CommandFormatter,
    timing: TimingConfig,
    quit_token: String,
    motion: ChannelSender<M>,
    actuator: ChannelSender<A>,
    state: SequencerState,
}

impl<M: CommandChannel, A: CommandChannel> Sequencer<M, A> {
    pub fn new(config: &RigConfig, motion: M, actuator: A) -> Self {
        Self {
            planner: MotionPlanner::new(&config.board, &config.timing),
            formatter: CommandFormatter::new(config.motion.clone(), config.actuator.clone()),
            timing: config.timing,
            quit_token: config.session.quit_token.clone(),
            motion: ChannelSender::new("motion", motion),
            actuator: ChannelSender::new("actuator", actuator),
            state: SequencerState::Idle,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn quit_token(&self) -> &str {
        &self.quit_token
    }

    pub fn planner(&self) -> &MotionPlanner {
        &self.planner
    }

    pub fn motion(&self) -> &ChannelSender<M> {
        &self.motion
    }

    pub fn actuator(&self) -> &ChannelSender<A> {
        &self.actuator
    }

    /// Idle -> AwaitingMove
    pub fn begin(&mut self) {
        if self.state == SequencerState::Idle {
            self.state = SequencerState::AwaitingMove;
        }
    }

    /// 處理一筆輸入：結束 token、合法棋步，或被拒絕的格式錯誤
    pub async fn handle_input(&mut self, token: &str) -> Result<Outcome> {
        match self.state {
            SequencerState::Terminated => return Err(RigError::SessionTerminated),
            SequencerState::Idle => self.begin(),
            _ => {}
        }

        if token == self.quit_token {
            self.shutdown().await?;
            return Ok(Outcome::Terminated);
        }

        // 格式錯誤時不送出任何指令，狀態維持 AwaitingMove
        let plan = match self.planner.plan_token(token) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("❌ Move rejected: {}", e);
                return Err(e);
            }
        };

        Ok(Outcome::Executed(self.execute(plan).await))
    }

    /// 依固定順序執行三段 leg，全部等待結束後才回到 AwaitingMove
    pub async fn execute(&mut self, plan: MotionPlan) -> MoveReport {
        tracing::info!(
            "♟️ Executing {} (motion time {:?})",
            plan.chess_move,
            plan.total_motion_time()
        );

        let mut report = MoveReport {
            plan: plan.clone(),
            sent: Vec::new(),
            failures: Vec::new(),
        };

        let move_span = tracing::info_span!("move", chess_move = %plan.chess_move);
        for leg_plan in &plan.legs {
            self.state = SequencerState::Executing(leg_plan.leg);
            let leg_span = tracing::info_span!(parent: &move_span, "leg", leg = %leg_plan.leg);
            self.run_leg(leg_plan, &mut report)
                .instrument(leg_span.clone())
                .await;
            leg_span.in_scope(|| tracing::info!("✅ Leg {} complete", leg_plan.leg));
        }

        self.state = SequencerState::AwaitingMove;
        if !report.is_clean() {
            tracing::warn!(
                "⚠️ {} finished with {} failed send(s)",
                plan.chess_move,
                report.failures.len()
            );
        }
        report
    }

    async fn run_leg(&self, leg_plan: &LegPlan, report: &mut MoveReport) {
        let command = self.formatter.motion_command(&leg_plan.displacement);
        let result = self.motion.send(&command).await;
        record(report, leg_plan.leg, self.motion.name(), &command, result);
        sleep(leg_plan.duration).await;

        let Some(toggle) = leg_plan.leg.effector_toggle() else {
            return;
        };

        self.actuate(leg_plan.leg, ActuatorOp::HeadDown, self.timing.settle(), report)
            .await;
        self.actuate(leg_plan.leg, toggle, self.timing.toggle(), report)
            .await;
        self.actuate(leg_plan.leg, ActuatorOp::HeadUp, self.timing.settle(), report)
            .await;
    }

    async fn actuate(&self, leg: Leg, op: ActuatorOp, wait: Duration, report: &mut MoveReport) {
        let command = self.formatter.actuator_command(op);
        let result = self.actuator.send(command).await;
        record(report, leg, self.actuator.name(), command, result);
        sleep(wait).await;
    }

    /// 關閉兩個通道；即使其中一個失敗也會嘗試關閉另一個
    pub async fn shutdown(&mut self) -> Result<()> {
        self.state = SequencerState::Terminated;
        let motion = self.motion.close().await;
        let actuator = self.actuator.close().await;
        motion.and(actuator)
    }
}

fn record(report: &mut MoveReport, leg: Leg, channel: &str, command: &str, result: Result<Sent>) {
    match result {
        Ok(sent) => report.sent.push(sent),
        Err(e) => {
            tracing::error!(channel, "Send failed during {} leg: {}", leg, e);
            report.failures.push(SendFailure {
                leg,
                channel: channel.to_string(),
                command: command.to_string(),
                error: e.to_string(),
            });
        }
    }
}
