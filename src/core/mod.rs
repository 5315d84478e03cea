//! 翻译核心

pub mod debounce;
pub mod event;
pub mod playback;
pub mod refiner;
pub mod sentence;
pub mod session;
pub mod sign_to_speech;
pub mod speech_to_sign;
pub mod translator;
