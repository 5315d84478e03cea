//! 手语播放调度
//!
//! 按固定节奏循环播放手语词序列，每一步解析对应资源

use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::event::{Emitter, EventSender, SessionEvent};
use super::translator::GlossSequence;
use crate::external::assets::AssetStore;
use crate::vocab::{AssetResolver, StepDisplay};

/// 播放配置
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// 每个手语词显示时长
    pub step: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(1500),
        }
    }
}

/// 播放器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackStatus {
    /// 没有序列
    Idle,
    /// 序列已加载，计时器运行中
    Playing,
}

/// 单步播放内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackStep {
    pub index: usize,
    pub token: String,
    pub display: StepDisplay,
}

/// 播放状态
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub sequence: GlossSequence,
    pub current_index: usize,
    pub last_advance: Instant,
}

impl PlaybackState {
    pub fn new(sequence: GlossSequence, now: Instant) -> Self {
        Self {
            sequence,
            current_index: 0,
            last_advance: now,
        }
    }

    /// 前进一步 (到末尾后回到开头)，返回新的位置
    pub fn advance(&mut self, now: Instant) -> usize {
        if !self.sequence.is_empty() {
            self.current_index = (self.current_index + 1) % self.sequence.len();
        }
        self.last_advance = now;
        self.current_index
    }

    pub fn current_token(&self) -> Option<&str> {
        self.sequence.get(self.current_index).map(String::as_str)
    }
}

struct Shared {
    state: Option<PlaybackState>,
    /// 每次加载/停止递增，旧计时器据此退出
    generation: u64,
}

/// 播放调度器
///
/// `load` 需要在 tokio 运行时内调用；被 drop 时计时器一并取消
pub struct PlaybackScheduler {
    config: PlaybackConfig,
    resolver: Arc<AssetResolver>,
    store: Arc<dyn AssetStore>,
    shared: Arc<Mutex<Shared>>,
    timer: Option<JoinHandle<()>>,
    emitter: Emitter,
}

impl PlaybackScheduler {
    pub fn new(config: PlaybackConfig, resolver: Arc<AssetResolver>, store: Arc<dyn AssetStore>) -> Self {
        Self {
            config,
            resolver,
            store,
            shared: Arc::new(Mutex::new(Shared {
                state: None,
                generation: 0,
            })),
            timer: None,
            emitter: Emitter::default(),
        }
    }

    /// 设置事件通道
    pub fn with_event_channel(mut self, tx: EventSender) -> Self {
        self.emitter = Emitter::new(Some(tx));
        self
    }

    /// 加载新序列，从第 0 个开始播放；正在播放的旧序列直接被替换
    pub fn load(&mut self, sequence: GlossSequence) {
        self.cancel_timer();

        let first = {
            let mut shared = self.shared.lock();
            shared.generation += 1;

            if sequence.is_empty() {
                shared.state = None;
                debug!("Empty gloss sequence, playback stays idle");
                return;
            }

            info!("Playing {} glosses", sequence.len());
            let state = PlaybackState::new(sequence, Instant::now());
            let token = state.current_token().unwrap_or_default().to_string();
            shared.state = Some(state);
            (shared.generation, token)
        };

        let (generation, token) = first;
        let display = self.resolver.locate(&token, self.store.as_ref());
        self.emitter.emit(SessionEvent::PlaybackStep(PlaybackStep {
            index: 0,
            token,
            display,
        }));

        self.timer = Some(tokio::spawn(run_timer(
            Arc::clone(&self.shared),
            Arc::clone(&self.resolver),
            Arc::clone(&self.store),
            self.emitter.clone(),
            self.config.step,
            generation,
        )));
    }

    /// 停止播放并清空序列，可重复调用
    pub fn stop(&mut self) {
        self.cancel_timer();

        let mut shared = self.shared.lock();
        shared.generation += 1;
        if shared.state.take().is_some() {
            debug!("Playback stopped");
        }
    }

    /// 渲染时资源加载失败，该步改为显示文字
    pub fn report_load_failure(&self, index: usize) {
        let token = {
            let shared = self.shared.lock();
            match &shared.state {
                Some(state) if state.current_index == index => state.current_token().map(str::to_string),
                _ => None,
            }
        };

        if let Some(token) = token {
            warn!("Asset for gloss {:?} failed to render, showing text", token);
            self.emitter.emit(SessionEvent::PlaybackStep(PlaybackStep {
                index,
                display: StepDisplay::Text(token.clone()),
                token,
            }));
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.shared.lock().state.is_some() {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Idle
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.shared.lock().state.as_ref().map(|s| s.current_index)
    }

    pub fn sequence(&self) -> Option<GlossSequence> {
        self.shared.lock().state.as_ref().map(|s| s.sequence.clone())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

async fn run_timer(
    shared: Arc<Mutex<Shared>>,
    resolver: Arc<AssetResolver>,
    store: Arc<dyn AssetStore>,
    emitter: Emitter,
    period: Duration,
    generation: u64,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let now = interval.tick().await;

        let (index, token) = {
            let mut shared = shared.lock();
            if shared.generation != generation {
                break;
            }
            let Some(state) = shared.state.as_mut() else {
                break;
            };
            let index = state.advance(now);
            (index, state.current_token().unwrap_or_default().to_string())
        };

        let display = resolver.locate(&token, store.as_ref());
        emitter.emit(SessionEvent::PlaybackStep(PlaybackStep {
            index,
            token,
            display,
        }));
    }
}
