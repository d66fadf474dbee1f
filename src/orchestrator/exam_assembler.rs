//! 组卷器 - 编排层
//!
//! 遍历一场考试的所有原始题目，逐题执行 清洗 -> 解析，生成有序的 `Question` 列表。
//!
//! 单题失败只影响该题本身：输出列表与输入列表长度相同、顺序相同

use crate::models::{FailedQuestion, Question, RawQuestionPayload, RecoveredQuestion};
use crate::services::{parse, sanitize, ParseError, ParsedFields};
use crate::utils::logging::truncate_text;
use tracing::{debug, warn};

/// 组卷统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    pub total: usize,
    pub recovered: usize,
    pub failed: usize,
}

/// 组卷
///
/// 输出的 `index` 为题目在输入列表中的位置
pub fn assemble(raws: &[RawQuestionPayload]) -> Vec<Question> {
    raws.iter()
        .enumerate()
        .map(|(position, raw)| assemble_one(position, raw))
        .collect()
}

/// 组卷并统计成功/失败数量
pub fn assemble_with_summary(raws: &[RawQuestionPayload]) -> (Vec<Question>, AssemblySummary) {
    let questions = assemble(raws);
    let recovered = questions.iter().filter(|q| q.is_judgeable()).count();
    let summary = AssemblySummary {
        total: questions.len(),
        recovered,
        failed: questions.len() - recovered,
    };
    (questions, summary)
}

fn assemble_one(position: usize, raw: &RawQuestionPayload) -> Question {
    if raw.index != position {
        warn!(
            "[题目 {}] 原始索引 {} 与列表位置不一致，使用列表位置",
            position + 1,
            raw.index
        );
    }

    let sanitized = sanitize(&raw.source_text);
    debug!(
        "[题目 {}] 清洗结果: {}",
        position + 1,
        truncate_text(&sanitized, 120)
    );

    match parse(&sanitized) {
        Ok(fields) => Question::Ok(recovered(position, raw, fields)),
        Err(e) => Question::Failed(failed(position, e)),
    }
}

fn recovered(index: usize, raw: &RawQuestionPayload, fields: ParsedFields) -> RecoveredQuestion {
    RecoveredQuestion {
        index,
        prompt: fields.question,
        // 空选项视为开放题
        options: fields.options.filter(|opts| !opts.is_empty()),
        correct_answer: fields.correct_answer,
        explanation: fields.explanation,
        kind: raw.kind.clone(),
        source_content: raw.source_content.clone(),
        extra: fields.extra,
    }
}

fn failed(index: usize, error: ParseError) -> FailedQuestion {
    warn!(
        "[题目 {}] ⚠️ 解析失败: {} | 片段: {}",
        index + 1,
        error.message,
        truncate_text(&error.fragment, 80)
    );
    FailedQuestion {
        index,
        parse_error: error.to_string(),
        fragment: error.fragment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParseStatus;

    #[test]
    fn test_prose_wrapped_mcq_is_recovered() {
        let raw = RawQuestionPayload::new(
            0,
            r#"My answer: {"question": "1+1?", "options": {"A": "1", "B": "2"}, "correct_answer": "B"} end."#,
        )
        .with_kind("mcq")
        .with_source_content("arithmétique");

        let questions = assemble(&[raw]);
        let q = questions[0].as_recovered().unwrap();

        assert_eq!(q.prompt, "1+1?");
        assert_eq!(q.correct_answer, "B");
        assert_eq!(q.option_text("A"), Some("1"));
        assert_eq!(q.option_text("B"), Some("2"));
        assert_eq!(q.kind.as_deref(), Some("mcq"));
        assert_eq!(q.source_content.as_deref(), Some("arithmétique"));
    }

    #[test]
    fn test_failure_is_isolated() {
        let raws = vec![
            RawQuestionPayload::new(0, r#"{"question": "a", "correct_answer": "A"}"#),
            RawQuestionPayload::new(1, r#"{"question": "x""#),
            RawQuestionPayload::new(2, "Une question ouverte sans structure."),
            RawQuestionPayload::new(3, r#"{"question": "b", "correct_answer": "B"}"#),
        ];

        let (questions, summary) = assemble_with_summary(&raws);

        assert_eq!(questions.len(), 4);
        let statuses: Vec<ParseStatus> = questions.iter().map(|q| q.parse_status()).collect();
        assert_eq!(
            statuses,
            vec![ParseStatus::Ok, ParseStatus::Failed, ParseStatus::Failed, ParseStatus::Ok]
        );
        for (i, q) in questions.iter().enumerate() {
            assert_eq!(q.index(), i);
        }
        assert_eq!(
            summary,
            AssemblySummary {
                total: 4,
                recovered: 2,
                failed: 2
            }
        );

        match &questions[1] {
            Question::Failed(f) => {
                assert!(f.parse_error.starts_with("题目数据格式无效"));
                assert_eq!(f.fragment, r#"{"question": "x""#);
            }
            Question::Ok(_) => panic!("未闭合的对象不应解析成功"),
        }
    }

    #[test]
    fn test_position_wins_over_payload_index() {
        let raws = vec![
            RawQuestionPayload::new(7, r#"{"question": "a", "correct_answer": "A"}"#),
            RawQuestionPayload::new(7, r#"{"question": "b", "correct_answer": "B"}"#),
        ];
        let questions = assemble(&raws);
        assert_eq!(questions[0].index(), 0);
        assert_eq!(questions[1].index(), 1);
    }

    #[test]
    fn test_empty_options_mean_free_response() {
        let raws = vec![RawQuestionPayload::new(
            0,
            r#"{"question": "Définir une vue.", "options": {}, "correct_answer": "Une requête stockée"}"#,
        )];
        let questions = assemble(&raws);
        assert!(!questions[0].as_recovered().unwrap().is_multiple_choice());
    }

    #[test]
    fn test_empty_input() {
        assert!(assemble(&[]).is_empty());
    }
}
