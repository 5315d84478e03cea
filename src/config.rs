//! 配置
//!
//! 各组件的默认配置，可由 `SIGN_BRIDGE_*` 环境变量覆盖

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::core::debounce::DebounceConfig;
use crate::core::playback::PlaybackConfig;
use crate::error::{Result, SignBridgeError};

/// 生成式翻译服务配置
#[derive(Clone)]
pub struct TranslatorConfig {
    /// 生成接口地址
    pub endpoint: String,
    /// 访问令牌，只从环境读取，不会写入日志
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/generate".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// 资源配置
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub asset_dir: PathBuf,
    pub extension: String,
    /// 自定义词汇表 (JSON)，为空时使用内置词汇
    pub catalog_path: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets/asl_gifs"),
            extension: "gif".to_string(),
            catalog_path: None,
        }
    }
}

/// 会话配置
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 分类循环频率
    pub tick_hz: u32,
    /// 多久没有新词视为一句结束
    pub pause_to_finalize: Duration,
    /// 语速
    pub speech_rate: f32,
    /// 朗读前是否先把手语词序列改写成自然语句
    pub refine_before_speaking: bool,
}

impl SessionConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz.max(1) as f64)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_hz: 30,
            pause_to_finalize: Duration::from_secs(2),
            speech_rate: 1.0,
            refine_before_speaking: false,
        }
    }
}

/// 全部配置
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub debounce: DebounceConfig,
    pub playback: PlaybackConfig,
    pub translator: TranslatorConfig,
    pub assets: AssetConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// 默认值 + 进程环境变量
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 默认值 + 任意键值来源
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SIGN_BRIDGE_ENDPOINT") {
            config.translator.endpoint = v;
        }
        config.translator.api_key = get("SIGN_BRIDGE_API_KEY").or_else(|| get("GEMINI_API_KEY"));
        if let Some(v) = get("SIGN_BRIDGE_TIMEOUT_SECS") {
            config.translator.timeout = Duration::from_secs(parse("SIGN_BRIDGE_TIMEOUT_SECS", &v)?);
        }

        if let Some(v) = get("SIGN_BRIDGE_THRESHOLD") {
            let threshold: f32 = parse("SIGN_BRIDGE_THRESHOLD", &v)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(SignBridgeError::config("SIGN_BRIDGE_THRESHOLD", "must be within [0, 1]"));
            }
            config.debounce.threshold = threshold;
        }
        if let Some(v) = get("SIGN_BRIDGE_COOLDOWN_MS") {
            config.debounce.cooldown = Duration::from_millis(parse("SIGN_BRIDGE_COOLDOWN_MS", &v)?);
        }

        if let Some(v) = get("SIGN_BRIDGE_STEP_MS") {
            let ms: u64 = parse("SIGN_BRIDGE_STEP_MS", &v)?;
            if ms == 0 {
                return Err(SignBridgeError::config("SIGN_BRIDGE_STEP_MS", "must be positive"));
            }
            config.playback.step = Duration::from_millis(ms);
        }

        if let Some(v) = get("SIGN_BRIDGE_TICK_HZ") {
            let hz: u32 = parse("SIGN_BRIDGE_TICK_HZ", &v)?;
            if hz == 0 {
                return Err(SignBridgeError::config("SIGN_BRIDGE_TICK_HZ", "must be positive"));
            }
            config.session.tick_hz = hz;
        }
        if let Some(v) = get("SIGN_BRIDGE_SPEECH_RATE") {
            config.session.speech_rate = parse("SIGN_BRIDGE_SPEECH_RATE", &v)?;
        }
        if let Some(v) = get("SIGN_BRIDGE_REFINE") {
            config.session.refine_before_speaking = parse("SIGN_BRIDGE_REFINE", &v)?;
        }

        if let Some(v) = get("SIGN_BRIDGE_ASSET_DIR") {
            config.assets.asset_dir = PathBuf::from(v);
        }
        if let Some(v) = get("SIGN_BRIDGE_ASSET_EXT") {
            config.assets.extension = v.trim_start_matches('.').to_string();
        }
        config.assets.catalog_path = get("SIGN_BRIDGE_CATALOG").map(PathBuf::from);

        Ok(config)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| SignBridgeError::config(key, format!("{:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.debounce.threshold, 0.75);
        assert_eq!(config.debounce.cooldown, Duration::from_millis(1200));
        assert_eq!(config.playback.step, Duration::from_millis(1500));
        assert_eq!(config.session.tick_hz, 30);
        assert!(config.translator.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SIGN_BRIDGE_COOLDOWN_MS", "800"),
            ("SIGN_BRIDGE_STEP_MS", "1000"),
            ("SIGN_BRIDGE_ASSET_EXT", ".webp"),
            ("SIGN_BRIDGE_REFINE", "true"),
            ("GEMINI_API_KEY", "secret-key"),
        ]))
        .unwrap();

        assert_eq!(config.debounce.cooldown, Duration::from_millis(800));
        assert_eq!(config.playback.step, Duration::from_millis(1000));
        assert_eq!(config.assets.extension, "webp");
        assert!(config.session.refine_before_speaking);
        assert_eq!(config.translator.api_key.as_deref(), Some("secret-key"));
    }

    #[test]
    fn test_invalid_values() {
        let result = AppConfig::from_lookup(lookup(&[("SIGN_BRIDGE_THRESHOLD", "high")]));
        assert!(matches!(result, Err(SignBridgeError::Config { key: "SIGN_BRIDGE_THRESHOLD", .. })));

        let result = AppConfig::from_lookup(lookup(&[("SIGN_BRIDGE_THRESHOLD", "1.5")]));
        assert!(result.is_err());

        let result = AppConfig::from_lookup(lookup(&[("SIGN_BRIDGE_TICK_HZ", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_api_key_redacted() {
        let config = AppConfig::from_lookup(lookup(&[("SIGN_BRIDGE_API_KEY", "secret-key")])).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
