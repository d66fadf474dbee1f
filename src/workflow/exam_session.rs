//! 考试会话状态机 - 流程层
//!
//! 状态流转：
//!
//! ```text
//! Forming --activate--> Active --submit--> Submitted
//!                         ^                    |
//!                         +-------reset--------+
//! (任意状态) --discard--> Forming
//! ```
//!
//! 会话持有题目列表和作答记录；判分通过纯函数 `services::score` 完成

use crate::error::SessionError;
use crate::models::{AnswerState, ExamResult, Question};
use crate::services::score;
use crate::workflow::answer_tracker::AnswerTracker;
use chrono::{DateTime, Local};
use tracing::{debug, info};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// 还没有题目
    #[default]
    Forming,
    /// 正在作答
    Active,
    /// 已提交
    Submitted,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Forming => "Forming",
            SessionState::Active => "Active",
            SessionState::Submitted => "Submitted",
        }
    }
}

/// 提交条件
///
/// 解析失败的题目无法作答，任何策略下都不要求作答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPolicy {
    /// 至少作答一道可判分题目
    #[default]
    AtLeastOne,
    /// 所有可判分题目都必须作答
    AllJudgeable,
}

#[derive(Debug, Clone, Default)]
pub struct ExamSession {
    state: SessionState,
    policy: SubmitPolicy,
    questions: Vec<Question>,
    tracker: AnswerTracker,
    result: Option<ExamResult>,
    submitted_at: Option<DateTime<Local>>,
}

impl ExamSession {
    pub fn new(policy: SubmitPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// 载入组卷结果，Forming -> Active
    pub fn activate(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        self.expect_state(SessionState::Forming, "activate")?;

        info!(
            "📋 考试开始: 共 {} 道题, 可判分 {} 道",
            questions.len(),
            questions.iter().filter(|q| q.is_judgeable()).count()
        );

        self.tracker = AnswerTracker::new(questions.len());
        self.questions = questions;
        self.result = None;
        self.submitted_at = None;
        self.state = SessionState::Active;
        Ok(())
    }

    /// 记录答案，只在 Active 状态下允许
    ///
    /// 解析失败的题目不接受作答
    pub fn set_answer(&mut self, index: usize, value: impl Into<String>) -> Result<(), SessionError> {
        match self.state {
            SessionState::Active => {
                if matches!(self.questions.get(index), Some(Question::Failed(_))) {
                    return Err(SessionError::QuestionUnavailable { index });
                }
                self.tracker.set_answer(index, value)
            }
            SessionState::Submitted => Err(SessionError::AnswersLocked { index }),
            SessionState::Forming => Err(SessionError::InvalidTransition {
                state: self.state.name(),
                action: "set_answer",
            }),
        }
    }

    /// 提交并判分，Active -> Submitted
    pub fn submit(&mut self) -> Result<&ExamResult, SessionError> {
        self.expect_state(SessionState::Active, "submit")?;

        let required = self.required_answers();
        let answered = self.answered_judgeable_count();
        if answered < required {
            return Err(SessionError::NotEnoughAnswers { answered, required });
        }

        let result = score(&self.questions, self.tracker.state());
        info!(
            "✅ 提交完成: 正确 {}/{} ({}%)",
            result.correct_count, result.judgeable_count, result.percentage
        );

        self.state = SessionState::Submitted;
        self.submitted_at = Some(Local::now());
        Ok(&*self.result.insert(result))
    }

    /// 清空答案并回到 Active，题目保持不变
    ///
    /// 多次调用效果相同；Forming 状态下什么也不做
    pub fn reset(&mut self) {
        if self.state == SessionState::Forming {
            return;
        }
        debug!("重置作答 (原状态: {})", self.state.name());
        self.tracker.reset();
        self.result = None;
        self.submitted_at = None;
        self.state = SessionState::Active;
    }

    /// 丢弃整场考试，回到 Forming
    pub fn discard(&mut self) {
        debug!("丢弃考试 (共 {} 道题)", self.questions.len());
        self.questions.clear();
        self.tracker = AnswerTracker::new(0);
        self.result = None;
        self.submitted_at = None;
        self.state = SessionState::Forming;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerState {
        self.tracker.state()
    }

    pub fn answered_count(&self) -> usize {
        self.tracker.answered_count()
    }

    pub fn is_submitted(&self) -> bool {
        self.state == SessionState::Submitted
    }

    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Local>> {
        self.submitted_at
    }

    /// 当前是否满足提交条件
    pub fn can_submit(&self) -> bool {
        self.state == SessionState::Active && self.answered_judgeable_count() >= self.required_answers()
    }

    fn required_answers(&self) -> usize {
        let judgeable = self.questions.iter().filter(|q| q.is_judgeable()).count();
        match self.policy {
            // 没有可判分题目时允许直接提交
            SubmitPolicy::AtLeastOne => judgeable.min(1),
            SubmitPolicy::AllJudgeable => judgeable,
        }
    }

    fn answered_judgeable_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.is_judgeable() && self.tracker.answer(q.index()).is_some())
            .count()
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                state: self.state.name(),
                action,
            })
        }
    }
}
