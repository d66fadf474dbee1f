//! 判分引擎 - 业务能力层
//!
//! 纯函数：同样的题目和作答状态总是得到同样的结果

use crate::models::{AnswerState, ExamResult, Question, QuestionOutcome, Verdict};

/// 计算考试结果
///
/// - 只对解析成功的题目判分，答案与 `correct_answer` 做精确字符串比较
/// - 解析失败的题目既不计入分子也不计入分母，也不计入已作答数量
/// - 没有可判分题目时百分比为 0
pub fn score(questions: &[Question], answers: &AnswerState) -> ExamResult {
    let outcomes: Vec<QuestionOutcome> = questions
        .iter()
        .map(|question| QuestionOutcome {
            index: question.index(),
            verdict: judge(question, answers),
        })
        .collect();

    let judgeable_count = questions.iter().filter(|q| q.is_judgeable()).count();
    let correct_count = outcomes
        .iter()
        .filter(|o| o.verdict == Verdict::Correct)
        .count();
    let answered_count = questions
        .iter()
        .filter(|q| q.is_judgeable() && answers.contains(q.index()))
        .count();

    ExamResult {
        total_questions: questions.len(),
        answered_count,
        correct_count,
        judgeable_count,
        percentage: percentage(correct_count, judgeable_count),
        outcomes,
    }
}

fn judge(question: &Question, answers: &AnswerState) -> Verdict {
    match question {
        Question::Failed(_) => Verdict::Unjudgeable,
        Question::Ok(q) => match answers.get(q.index) {
            None => Verdict::Unanswered,
            Some(answer) if answer == q.correct_answer => Verdict::Correct,
            Some(_) => Verdict::Incorrect,
        },
    }
}

/// 四舍五入（0.5 进位）的百分比
fn percentage(correct: usize, judgeable: usize) -> u8 {
    if judgeable == 0 {
        return 0;
    }
    let rounded = (200 * correct + judgeable) / (2 * judgeable);
    rounded.min(100) as u8
}
