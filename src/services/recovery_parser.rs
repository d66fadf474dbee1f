//! 恢复解析 - 业务能力层
//!
//! 把清洗后的片段解码为题目字段。只尝试一次，失败时返回 `ParseError`，
//! 由上层决定如何处理

use crate::models::question::{deserialize_text, QuestionOptions};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// 从片段中解码出的题目字段
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsedFields {
    pub question: String,
    #[serde(default)]
    pub options: Option<QuestionOptions>,
    #[serde(deserialize_with = "deserialize_text")]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
    /// 其他未识别的字段
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// 单个片段的解析失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// 实际送去解码的文本
    pub fragment: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "题目数据格式无效，无法解析: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// 解析清洗后的片段
///
/// 片段没有以 `{` 开头时先用 `{ ... }` 包裹，再做严格 JSON 解码
pub fn parse(fragment: &str) -> Result<ParsedFields, ParseError> {
    let document = wrap_object(fragment);

    serde_json::from_str::<ParsedFields>(&document).map_err(|e| ParseError {
        message: e.to_string(),
        fragment: document,
    })
}

fn wrap_object(fragment: &str) -> String {
    let trimmed = fragment.trim();
    if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        format!("{{{}}}", trimmed)
    }
}
