//! 错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignBridgeError {
    /// 生成式翻译服务不可用 (请求失败、非 2xx、响应格式错误或空输出)
    #[error("translation unavailable: {reason}")]
    TranslationUnavailable { reason: String },

    /// 运行环境缺少语音识别/合成能力
    #[error("unsupported environment: {capability} is not available")]
    UnsupportedEnvironment { capability: &'static str },

    /// 语音引擎运行时错误
    #[error("speech engine error: {message}")]
    Speech { message: String },

    #[error("invalid catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("invalid config value for {key}: {message}")]
    Config { key: &'static str, message: String },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl SignBridgeError {
    pub(crate) fn unavailable(reason: impl std::fmt::Display) -> Self {
        Self::TranslationUnavailable {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn speech(err: impl std::fmt::Display) -> Self {
        Self::Speech {
            message: err.to_string(),
        }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn config(key: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            key,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SignBridgeError>;
