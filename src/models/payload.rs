use crate::models::exam::QuestionType;
use serde::{Deserialize, Serialize};

/// 出题服务返回的原始题目
///
/// `source_text` 是生成模型输出的"类 JSON"文本，格式不保证合法
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestionPayload {
    /// 题目位置（服务端未提供时由客户端按顺序补齐）
    #[serde(default)]
    pub index: usize,

    #[serde(alias = "question_data")]
    pub source_text: String,

    /// 出题所依据的原文片段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_content: Option<String>,

    /// 服务端的 `type` 字段（mcq / open-ended）
    #[serde(default, rename = "kind", alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl RawQuestionPayload {
    pub fn new(index: usize, source_text: impl Into<String>) -> Self {
        Self {
            index,
            source_text: source_text.into(),
            source_content: None,
            kind: None,
        }
    }

    pub fn with_source_content(mut self, source_content: impl Into<String>) -> Self {
        self.source_content = Some(source_content.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// 解析题型，未知题型返回 None
    pub fn question_type(&self) -> Option<QuestionType> {
        self.kind.as_deref().and_then(|k| k.parse().ok())
    }
}

/// 出题服务的响应体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamPayloads {
    #[serde(default)]
    pub questions: Vec<RawQuestionPayload>,
}

impl ExamPayloads {
    /// 按列表位置重新编号
    pub fn into_indexed(self) -> Vec<RawQuestionPayload> {
        self.questions
            .into_iter()
            .enumerate()
            .map(|(i, mut payload)| {
                payload.index = i;
                payload
            })
            .collect()
    }
}
