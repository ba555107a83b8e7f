use crate::utils::error::Result;
use async_trait::async_trait;

/// 通往單一控制器的有序位元組通道
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// 寫入完整的一筆資料；重試與退避由傳輸層自行負責
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()>;

    /// 關閉通道，必須等候進行中的寫入結束
    async fn close(&self) -> Result<()>;
}

#[async_trait]
impl<T: CommandChannel + ?Sized> CommandChannel for Box<T> {
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}
