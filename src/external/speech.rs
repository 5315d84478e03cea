//! 语音识别 / 语音合成接口

use async_trait::async_trait;

/// 语音识别
#[async_trait]
pub trait SpeechRecognizer: Send {
    /// 运行环境是否支持识别
    fn is_supported(&self) -> bool;

    fn start(&mut self, continuous: bool) -> anyhow::Result<()>;

    /// 停止并等待最后的识别结果写入转录
    async fn stop(&mut self) -> anyhow::Result<()>;

    /// 立即中止，丢弃未完成的识别
    fn abort(&mut self);

    /// 当前转录文本
    fn transcript(&self) -> String;

    fn reset_transcript(&mut self);

    fn is_listening(&self) -> bool;
}

/// 语音合成
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn is_supported(&self) -> bool;

    /// 取消正在播放的语音
    fn cancel(&self);

    /// 朗读文本，播放结束后返回
    async fn speak(&self, text: &str, rate: f32) -> anyhow::Result<()>;
}
