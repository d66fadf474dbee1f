use serde::Serialize;

/// 单题判分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// 可判分但未作答
    Unanswered,
    /// 解析失败，不参与判分
    Unjudgeable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOutcome {
    pub index: usize,
    pub verdict: Verdict,
}

/// 考试结果
///
/// 由判分引擎根据题目和作答状态计算得出，每次提交都会重新计算
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamResult {
    pub total_questions: usize,
    pub answered_count: usize,
    pub correct_count: usize,
    /// 可判分题目数（解析成功的题目）
    pub judgeable_count: usize,
    /// 0..=100
    pub percentage: u8,
    pub outcomes: Vec<QuestionOutcome>,
}

impl ExamResult {
    pub fn verdict(&self, index: usize) -> Option<Verdict> {
        self.outcomes
            .iter()
            .find(|o| o.index == index)
            .map(|o| o.verdict)
    }

    pub fn unjudgeable_count(&self) -> usize {
        self.total_questions - self.judgeable_count
    }
}

impl std::fmt::Display for ExamResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} ({}%)",
            self.correct_count, self.judgeable_count, self.percentage
        )
    }
}
