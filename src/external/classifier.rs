//! 手势分类器接口
//!
//! 摄像头采集与姿态模型都在外部，核心只消费 (label, probability)

use serde::{Deserialize, Serialize};

/// 单个分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// 逐帧分类器
pub trait FrameClassifier: Send {
    /// 采集当前帧并分类
    fn predict(&mut self) -> anyhow::Result<Vec<Prediction>>;
}

/// 取概率最高的结果 (并列时取第一个)
pub fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions.iter().fold(None, |best: Option<&Prediction>, p| match best {
        Some(b) if b.probability >= p.probability => Some(b),
        _ => Some(p),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_prediction() {
        let preds = vec![
            Prediction::new("neutral", 0.1),
            Prediction::new("HELLO", 0.8),
            Prediction::new("BYE", 0.8),
        ];
        assert_eq!(top_prediction(&preds).unwrap().label, "HELLO");
        assert!(top_prediction(&[]).is_none());
    }
}
