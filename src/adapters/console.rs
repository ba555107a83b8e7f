use crate::domain::ports::CommandChannel;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Dry-run 用的通道，只把每一行寫進 log
#[derive(Debug, Clone)]
pub struct ConsoleChannel {
    name: String,
}

impl ConsoleChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl CommandChannel for ConsoleChannel {
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let line = String::from_utf8_lossy(bytes);
        tracing::info!(channel = %self.name, "🧪 [dry-run] {}", line.trim_end());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        tracing::debug!(channel = %self.name, "🧪 [dry-run] close");
        Ok(())
    }
}
