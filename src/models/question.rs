use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// 题目解析状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Ok,
    Failed,
}

/// 还原后的题目
///
/// 每条原始题目恰好对应一个 `Question`，解析失败的题目以 `Failed` 形式保留，
/// 不会丢失，也不会影响其他题目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "parse_status", rename_all = "snake_case")]
pub enum Question {
    Ok(RecoveredQuestion),
    Failed(FailedQuestion),
}

impl Question {
    pub fn index(&self) -> usize {
        match self {
            Question::Ok(q) => q.index,
            Question::Failed(q) => q.index,
        }
    }

    pub fn parse_status(&self) -> ParseStatus {
        match self {
            Question::Ok(_) => ParseStatus::Ok,
            Question::Failed(_) => ParseStatus::Failed,
        }
    }

    /// 是否可判分
    pub fn is_judgeable(&self) -> bool {
        matches!(self, Question::Ok(_))
    }

    pub fn as_recovered(&self) -> Option<&RecoveredQuestion> {
        match self {
            Question::Ok(q) => Some(q),
            Question::Failed(_) => None,
        }
    }
}

/// 解析成功的题目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveredQuestion {
    pub index: usize,
    pub prompt: String,
    /// 选项，开放题为 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<QuestionOptions>,
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    // --- 原样透传的元数据 ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_content: Option<String>,
    /// 解析结果中未识别的其他字段
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, JsonValue>,
}

impl RecoveredQuestion {
    pub fn is_multiple_choice(&self) -> bool {
        self.options.is_some()
    }

    /// 按标签查找选项文本
    pub fn option_text(&self, label: &str) -> Option<&str> {
        self.options.as_ref().and_then(|opts| opts.get(label))
    }
}

/// 解析失败的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedQuestion {
    pub index: usize,
    pub parse_error: String,
    /// 解析失败的文本片段（仅用于诊断）
    #[serde(skip)]
    pub fragment: String,
}

/// 单个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub label: String,
    pub text: String,
}

/// 有序选项列表（保持生成文本中的顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionOptions(Vec<QuestionOption>);

impl QuestionOptions {
    pub fn new(options: Vec<QuestionOption>) -> Self {
        Self(options)
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|opt| opt.label == label)
            .map(|opt| opt.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionOption> {
        self.0.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|opt| opt.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for QuestionOptions {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(label, text)| QuestionOption {
                    label: label.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        )
    }
}

/// 按位置生成选项标签：A, B, C ... 超过 26 个后使用序号
fn label_for(position: usize) -> String {
    if position < 26 {
        char::from(b'A' + position as u8).to_string()
    } else {
        (position + 1).to_string()
    }
}

// 选项既可能是对象 {"A": "..."}，也可能是数组 ["...", "..."]
impl<'de> Deserialize<'de> for QuestionOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionsVisitor;

        impl<'de> Visitor<'de> for OptionsVisitor {
            type Value = QuestionOptions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object of label -> text, or an array of option texts")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut options = Vec::new();
                while let Some((label, text)) = map.next_entry::<String, TextValue>()? {
                    options.push(QuestionOption {
                        label,
                        text: text.0,
                    });
                }
                Ok(QuestionOptions(options))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut options = Vec::new();
                while let Some(text) = seq.next_element::<TextValue>()? {
                    options.push(QuestionOption {
                        label: label_for(options.len()),
                        text: text.0,
                    });
                }
                Ok(QuestionOptions(options))
            }
        }

        deserializer.deserialize_any(OptionsVisitor)
    }
}

/// 字符串或数字，统一转换为字符串
struct TextValue(String);

impl<'de> Deserialize<'de> for TextValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_text(deserializer).map(TextValue)
    }
}

/// 将字符串、数字或布尔值反序列化为字符串
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_object_keep_order() {
        let options: QuestionOptions =
            serde_json::from_str(r#"{"B": "deux", "A": "un", "C": 3}"#).unwrap();
        assert_eq!(options.labels(), vec!["B", "A", "C"]);
        assert_eq!(options.get("C"), Some("3"));
    }

    #[test]
    fn test_options_from_array_get_letter_labels() {
        let options: QuestionOptions =
            serde_json::from_str(r#"["INNER JOIN", "LEFT JOIN", "CROSS JOIN"]"#).unwrap();
        assert_eq!(options.labels(), vec!["A", "B", "C"]);
        assert_eq!(options.get("B"), Some("LEFT JOIN"));
    }

    #[test]
    fn test_label_for_overflow() {
        assert_eq!(label_for(0), "A");
        assert_eq!(label_for(25), "Z");
        assert_eq!(label_for(26), "27");
    }

    #[test]
    fn test_question_serializes_with_status_tag() {
        let question = Question::Failed(FailedQuestion {
            index: 2,
            parse_error: "EOF".to_string(),
            fragment: "{".to_string(),
        });
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"parse_status": "failed", "index": 2, "parse_error": "EOF"})
        );
        assert_eq!(question.parse_status(), ParseStatus::Failed);
        assert!(!question.is_judgeable());
    }
}
