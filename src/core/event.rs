//! 会话事件
//!
//! 两条管线通过事件通道把状态变化推给界面层

use serde::Serialize;
use tokio::sync::mpsc;

use super::playback::PlaybackStep;
use super::translator::GlossSequence;

/// 会话事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// 当前帧的最佳分类结果
    LivePrediction { label: String, confidence: f32 },
    /// 新词被接受
    TokenAccepted { text: String },
    /// 句子更新
    SentenceUpdated { text: String },
    /// 一段时间没有新词，句子可以收尾
    SentencePaused { text: String },
    /// 开始朗读
    SpeakingStarted { text: String },
    /// 朗读结束
    SpeakingEnded,
    /// 语音识别结束，得到最终转录
    TranscriptFinalized { text: String },
    /// 翻译服务不可用，使用原文直通
    TranslationDegraded { reason: String },
    /// 手语词序列就绪，开始播放
    GlossReady { sequence: GlossSequence },
    /// 播放一步
    PlaybackStep(PlaybackStep),
    /// 会话被重置
    SessionReset,
}

pub type EventSender = mpsc::UnboundedSender<SessionEvent>;

/// 可选的事件通道
#[derive(Debug, Clone, Default)]
pub(crate) struct Emitter {
    tx: Option<EventSender>,
}

impl Emitter {
    pub(crate) fn new(tx: Option<EventSender>) -> Self {
        Self { tx }
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let emitter = Emitter::new(Some(tx));

        emitter.emit(SessionEvent::TokenAccepted { text: "HELLO".to_string() });
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::TokenAccepted { text: "HELLO".to_string() }
        );

        // 没有通道时静默丢弃
        Emitter::default().emit(SessionEvent::SessionReset);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(SessionEvent::SentenceUpdated { text: "HELLO".to_string() }).unwrap();
        assert_eq!(json["type"], "sentence_updated");
        assert_eq!(json["text"], "HELLO");
    }
}
