//! 生成式 AI 服务

pub mod client;
pub mod types;

pub use client::{AiClient, TextGenerator};
