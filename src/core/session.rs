use crate::core::sequencer::{Outcome, Sequencer, SequencerState};
use crate::domain::ports::CommandChannel;
use crate::utils::error::{RigError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PROMPT: &str = "Enter a chess move (e.g., \"c2c4\",\"d6d4\",\"g1f3\") or \"quit\" to exit: ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub moves_executed: usize,
    pub moves_rejected: usize,
    pub send_failures: usize,
}

/// 互動迴圈：提示、讀取一行、交給 sequencer，直到結束 token 或輸入結束
///
/// 迴圈因錯誤中止時，回傳前一定會先關閉兩個通道。
pub async fn run_session<R, W, M, A>(
    sequencer: &mut Sequencer<M, A>,
    input: R,
    output: &mut W,
) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    M: CommandChannel,
    A: CommandChannel,
{
    sequencer.begin();
    let result = drive(sequencer, input, output).await;

    if let Err(e) = &result {
        if sequencer.state() != SequencerState::Terminated {
            tracing::error!("Session aborted: {}", e);
            if let Err(close_err) = sequencer.shutdown().await {
                tracing::error!("Error while closing channels: {}", close_err);
            }
        }
    }
    result
}

async fn drive<R, W, M, A>(
    sequencer: &mut Sequencer<M, A>,
    mut input: R,
    output: &mut W,
) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    M: CommandChannel,
    A: CommandChannel,
{
    let mut summary = SessionSummary::default();
    let mut buf = Vec::new();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            // EOF 等同輸入結束 token
            output.write_all(b"\n").await?;
            tracing::info!("📭 End of input, closing channels");
            if let Err(e) = sequencer.shutdown().await {
                tracing::error!("Error while closing channels: {}", e);
            }
            break;
        }

        // 非 UTF-8 的 bytes 變成替代字元，交給棋步解析拒絕
        let line = String::from_utf8_lossy(&buf);
        let token = line.trim();
        if token.is_empty() {
            continue;
        }

        match sequencer.handle_input(token).await {
            Ok(Outcome::Terminated) => break,
            Ok(Outcome::Executed(report)) => {
                summary.moves_executed += 1;
                summary.send_failures += report.failures.len();
                let status = if report.is_clean() {
                    format!("✅ Move {} complete\n", report.plan.chess_move)
                } else {
                    format!(
                        "⚠️ Move {} finished with {} failed command(s)\n",
                        report.plan.chess_move,
                        report.failures.len()
                    )
                };
                output.write_all(status.as_bytes()).await?;
            }
            Err(e @ RigError::MalformedMove { .. }) => {
                summary.moves_rejected += 1;
                let message = format!("❌ {}\n💡 {}\n", e.user_friendly_message(), e.recovery_suggestion());
                output.write_all(message.as_bytes()).await?;
            }
            Err(e) if sequencer.state() == SequencerState::Terminated => {
                tracing::error!("Error while closing channels: {}", e);
                break;
            }
            Err(e) => return Err(e),
        }
    }

    output.write_all(b"Program terminated\n").await?;
    output.flush().await?;
    tracing::info!(
        "🏁 Session finished: {} executed, {} rejected, {} failed sends",
        summary.moves_executed,
        summary.moves_rejected,
        summary.send_failures
    );
    Ok(summary)
}
