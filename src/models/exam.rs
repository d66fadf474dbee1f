use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 入门
    Beginner,
    /// 中级
    Intermediate,
    /// 高级
    Advanced,
}

impl Difficulty {
    /// 出题服务使用的标准名称
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// 支持英文名称以及出题服务界面上的法文名称
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "débutant" | "debutant" => Ok(Difficulty::Beginner),
            "intermediate" | "intermédiaire" | "intermediaire" => Ok(Difficulty::Intermediate),
            "advanced" | "avancé" | "avance" => Ok(Difficulty::Advanced),
            other => Err(format!("未知难度: {}", other)),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// 选择题
    #[serde(rename = "mcq")]
    Mcq,
    /// 开放题
    #[serde(rename = "open-ended")]
    OpenEnded,
}

impl QuestionType {
    pub fn name(self) -> &'static str {
        match self {
            QuestionType::Mcq => "mcq",
            QuestionType::OpenEnded => "open-ended",
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mcq" | "qcm" => Ok(QuestionType::Mcq),
            "open-ended" | "open_ended" | "open" => Ok(QuestionType::OpenEnded),
            other => Err(format!("未知题型: {}", other)),
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 出题请求（发送给出题服务的请求体）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRequest {
    pub query: String,
    pub question_nbr: u32,
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
}

impl ExamRequest {
    pub fn new(
        query: impl Into<String>,
        question_nbr: u32,
        difficulty: Difficulty,
        question_type: QuestionType,
    ) -> Self {
        Self {
            query: query.into(),
            // 至少出一道题
            question_nbr: question_nbr.max(1),
            difficulty,
            question_type,
        }
    }
}
