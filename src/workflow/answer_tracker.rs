//! 作答记录
//!
//! 保存用户对每道题的当前答案，只接受 `[0, question_count)` 范围内的索引

use crate::error::SessionError;
use crate::models::AnswerState;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct AnswerTracker {
    question_count: usize,
    answers: AnswerState,
}

impl AnswerTracker {
    pub fn new(question_count: usize) -> Self {
        Self {
            question_count,
            answers: AnswerState::new(),
        }
    }

    /// 记录答案，重复作答时后写覆盖先写
    pub fn set_answer(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        if index >= self.question_count {
            return Err(SessionError::IndexOutOfRange {
                index,
                question_count: self.question_count,
            });
        }

        let value = value.into();
        debug!("题目 {} 作答: {}", index + 1, value);
        self.answers.insert(index, value);
        Ok(())
    }

    /// 清空所有答案
    pub fn reset(&mut self) {
        self.answers.clear();
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index)
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn state(&self) -> &AnswerState {
        &self.answers
    }
}
