use crate::domain::ports::CommandChannel;
use crate::utils::error::{RigError, Result};
use std::sync::atomic::{AtomicBool, Ordering};

/// 控制器指令以 CR+LF 結尾
pub const LINE_TERMINATOR: &str = "\r\n";

/// 成功送出的一筆指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub channel: String,
    pub command: String,
    pub bytes_written: usize,
}

/// 包裝單一輸出通道：加上行尾、寫入、回報失敗，不做重試
pub struct ChannelSender<C: CommandChannel> {
    name: String,
    channel: C,
    closed: AtomicBool,
}

impl<C: CommandChannel> ChannelSender<C> {
    pub fn new(name: impl Into<String>, channel: C) -> Self {
        Self {
            name: name.into(),
            channel,
            closed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn send(&self, command: &str) -> Result<Sent> {
        if self.is_closed() {
            return Err(RigError::ChannelClosed {
                channel: self.name.clone(),
            });
        }

        let line = format!("{}{}", command, LINE_TERMINATOR);
        match self.channel.write_bytes(line.as_bytes()).await {
            Ok(()) => {
                tracing::info!(channel = %self.name, "Command sent: {}", command);
                Ok(Sent {
                    channel: self.name.clone(),
                    command: command.to_string(),
                    bytes_written: line.len(),
                })
            }
            // 傳輸層在 close 之後才回報的錯誤一律視為已關閉
            Err(_) if self.is_closed() => Err(RigError::ChannelClosed {
                channel: self.name.clone(),
            }),
            Err(RigError::ChannelClosed { .. }) => Err(RigError::ChannelClosed {
                channel: self.name.clone(),
            }),
            Err(e) => {
                tracing::error!(channel = %self.name, "Error writing '{}': {}", command, e);
                Err(RigError::Send {
                    channel: self.name.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// 可重複呼叫，只有第一次會真的關閉底層通道
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!(channel = %self.name, "Channel already closed");
            return Ok(());
        }
        self.channel.close().await?;
        tracing::info!(channel = %self.name, "🔌 Channel closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryChannel {
        written: Mutex<Vec<u8>>,
        fail_writes: bool,
        close_calls: Mutex<usize>,
    }

    #[async_trait]
    impl CommandChannel for MemoryChannel {
        async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
            if self.fail_writes {
                return Err(RigError::IoError(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "cable unplugged",
                )));
            }
            self.written.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        }

        async fn close(&self) -> Result<()> {
            *self.close_calls.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_send_appends_crlf() {
        let sender = ChannelSender::new("actuator", MemoryChannel::default());

        let sent = sender.send("A_DOWN").await.unwrap();
        assert_eq!(sent.command, "A_DOWN");
        assert_eq!(sent.bytes_written, 8);
        assert_eq!(sender.channel().written.lock().unwrap().as_slice(), b"A_DOWN\r\n");
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_send_error() {
        let channel = MemoryChannel {
            fail_writes: true,
            ..Default::default()
        };
        let sender = ChannelSender::new("motion", channel);

        let err = sender.send("G21 G91 G1 X1 Y1 F200").await.unwrap_err();
        match err {
            RigError::Send { channel, message } => {
                assert_eq!(channel, "motion");
                assert!(message.contains("cable unplugged"));
            }
            other => panic!("expected Send error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_blocks_sends() {
        let sender = ChannelSender::new("motion", MemoryChannel::default());

        sender.close().await.unwrap();
        sender.close().await.unwrap();
        assert_eq!(*sender.channel().close_calls.lock().unwrap(), 1);

        let err = sender.send("A_UP").await.unwrap_err();
        assert!(matches!(err, RigError::ChannelClosed { ref channel } if channel == "motion"));
        assert!(sender.channel().written.lock().unwrap().is_empty());
    }

    /// 寫入需要一段時間；寫到一半被關閉時，傳輸層回報 broken pipe
    #[derive(Default)]
    struct SlowChannel {
        port_closed: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl CommandChannel for SlowChannel {
        async fn write_bytes(&self, _bytes: &[u8]) -> Result<()> {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            if self.port_closed.load(Ordering::Acquire) {
                return Err(RigError::IoError(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "port closed mid-write",
                )));
            }
            Ok(())
        }

        async fn close(&self) -> Result<()> {
            self.port_closed.store(true, Ordering::Release);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_during_in_flight_send_reports_closed() {
        let sender = ChannelSender::new("motion", SlowChannel::default());

        let (sent, closed) = tokio::join!(sender.send("G21 G91 G1 X0 Y1 F200"), async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            sender.close().await
        });

        closed.unwrap();
        assert!(matches!(sent, Err(RigError::ChannelClosed { ref channel }) if channel == "motion"));
        assert!(sender.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_finishing_before_close_succeeds() {
        let sender = ChannelSender::new("actuator", SlowChannel::default());

        let (sent, closed) = tokio::join!(sender.send("M_ON"), async {
            tokio::time::sleep(std::time::Duration::from_millis(150)).await;
            sender.close().await
        });

        closed.unwrap();
        assert_eq!(sent.unwrap().bytes_written, 6);
        assert!(matches!(sender.send("M_OFF").await, Err(RigError::ChannelClosed { .. })));
    }
}
