//! `serialport` 實作的控制器通道。
//!
//! 寫入在 blocking 執行緒進行並由 mutex 串行化，close 會等待進行中的寫入結束。
//! 每個通道另有一條讀取執行緒，只把收到的資料寫進 log，從不影響 sequencer。

use crate::domain::ports::CommandChannel;
use crate::utils::error::{RigError, Result};
use async_trait::async_trait;
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 讀取逾時，也是讀取執行緒檢查 shutdown 的週期
const READ_TIMEOUT: Duration = Duration::from_millis(100);

const READ_BUFFER_SIZE: usize = 256;

pub struct SerialChannel {
    name: String,
    path: String,
    port: Arc<Mutex<Option<Box<dyn SerialPort>>>>,
    shutdown: Arc<AtomicBool>,
}

impl SerialChannel {
    pub fn open(name: &str, path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()?;
        let reader = port.try_clone()?;

        let shutdown = Arc::new(AtomicBool::new(false));
        spawn_inbound_logger(name.to_string(), reader, Arc::clone(&shutdown))?;

        tracing::info!(
            channel = name,
            "🔌 Opened {} @ {} baud",
            path,
            baud_rate
        );

        Ok(Self {
            name: name.to_string(),
            path: path.to_string(),
            port: Arc::new(Mutex::new(Some(port))),
            shutdown,
        })
    }
}

#[async_trait]
impl CommandChannel for SerialChannel {
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let port = Arc::clone(&self.port);
        let name = self.name.clone();
        let bytes = bytes.to_vec();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut guard = port.lock().map_err(|_| RigError::Send {
                channel: name.clone(),
                message: "port lock poisoned".to_string(),
            })?;
            let port = guard
                .as_mut()
                .ok_or_else(|| RigError::ChannelClosed { channel: name.clone() })?;
            port.write_all(&bytes)?;
            port.flush()?;
            Ok(())
        })
        .await
        .map_err(|e| RigError::Send {
            channel: self.name.clone(),
            message: format!("write task failed: {}", e),
        })?
    }

    async fn close(&self) -> Result<()> {
        self.shutdown.store(true, Ordering::Release);
        let port = Arc::clone(&self.port);

        // 拿到鎖代表沒有進行中的寫入
        tokio::task::spawn_blocking(move || {
            if let Ok(mut guard) = port.lock() {
                guard.take();
            }
        })
        .await
        .map_err(|e| RigError::Send {
            channel: self.name.clone(),
            message: format!("close task failed: {}", e),
        })?;

        tracing::info!(channel = %self.name, "Serial connection to {} closed.", self.path);
        Ok(())
    }
}

/// 背景讀取執行緒：把收到的 bytes 當文字記錄下來，回傳總共讀到的 byte 數
pub fn spawn_inbound_logger<R>(
    name: String,
    mut reader: R,
    shutdown: Arc<AtomicBool>,
) -> Result<JoinHandle<usize>>
where
    R: Read + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(format!("{}-inbound", name))
        .spawn(move || {
            let mut buf = [0u8; READ_BUFFER_SIZE];
            let mut total = 0usize;

            while !shutdown.load(Ordering::Acquire) {
                match reader.read(&mut buf) {
                    Ok(0) => {
                        tracing::debug!(channel = %name, "Inbound stream ended");
                        break;
                    }
                    Ok(n) => {
                        total += n;
                        tracing::info!(
                            channel = %name,
                            "📥 Data received: {}",
                            String::from_utf8_lossy(&buf[..n])
                        );
                    }
                    Err(e)
                        if matches!(
                            e.kind(),
                            ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                        ) => {}
                    Err(e) => {
                        tracing::error!(channel = %name, "Serial error: {}", e);
                        break;
                    }
                }
            }

            total
        })?;

    Ok(handle)
}
