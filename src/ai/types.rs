//! AI 服务请求/响应类型

use serde::{Deserialize, Serialize};

/// 生成请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// 完整提示 (已包含词汇表)
    pub prompt: String,
}

/// 生成响应
///
/// 只接受这一种结构，`text` 缺失或类型不对都算格式错误
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_schema() {
        let ok: GenerateResponse = serde_json::from_str(r#"{"text": " HUNGRY\n"}"#).unwrap();
        assert_eq!(ok.text, " HUNGRY\n");

        // 其他字段名不再被探测
        assert!(serde_json::from_str::<GenerateResponse>(r#"{"output_text": "HUNGRY"}"#).is_err());
        assert!(serde_json::from_str::<GenerateResponse>(r#"{"text": null}"#).is_err());
    }
}
