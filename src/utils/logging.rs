/// 日志工具模块
///
/// 负责初始化 tracing 订阅器，并提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::{ExamResult, Question, Verdict};
use crate::orchestrator::exam_assembler::AssemblySummary;
use chrono::{DateTime, Local};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 debug / info 级别
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 考试生成与判分");
    match &config.payload_file {
        Some(path) => info!("📁 题目来源: 本地文件 {}", path),
        None => info!("🌐 题目来源: {}", config.exam_api_base_url),
    }
    info!("{}", "=".repeat(60));
}

/// 记录组卷结果
pub fn log_assembly(summary: &AssemblySummary) {
    info!(
        "✓ 组卷完成: 共 {} 道, 解析成功 {}, 解析失败 {}",
        summary.total, summary.recovered, summary.failed
    );
    if summary.failed > 0 {
        warn!("⚠️ {} 道题目无法解析，将标记为不可用且不计分", summary.failed);
    }
}

/// 打印单道题目
pub fn print_question(question: &Question) {
    println!("\n{}", "─".repeat(60));
    match question {
        Question::Ok(q) => {
            println!("题目 {}: {}", q.index + 1, q.prompt);
            match &q.options {
                Some(options) => {
                    for opt in options.iter() {
                        println!("  {}) {}", opt.label, opt.text);
                    }
                }
                None => println!("  (开放题，请直接输入答案)"),
            }
        }
        Question::Failed(q) => {
            println!("题目 {}: ⚠️ 不可用 ({})", q.index + 1, q.parse_error);
        }
    }
}

/// 打印最终结果
///
/// # 参数
/// - `submitted_at`: 会话记录的提交时间
pub fn print_result(questions: &[Question], result: &ExamResult, submitted_at: Option<DateTime<Local>>) {
    println!("\n{}", "=".repeat(60));
    println!("📊 考试结果");
    println!("提交时间: {}", format_timestamp(submitted_at));
    println!("{}", "=".repeat(60));

    for question in questions {
        let verdict = result.verdict(question.index());
        match (question, verdict) {
            (Question::Ok(q), Some(verdict)) => {
                let mark = match verdict {
                    Verdict::Correct => "✅",
                    Verdict::Incorrect => "❌",
                    _ => "⏭️",
                };
                println!(
                    "{} 题目 {} | 正确答案: {}",
                    mark,
                    q.index + 1,
                    q.correct_answer
                );
                if let Some(explanation) = &q.explanation {
                    println!("   解析: {}", truncate_text(explanation, 200));
                }
            }
            _ => println!("⚠️ 题目 {} | 不可用，不计分", question.index() + 1),
        }
    }

    println!("{}", "=".repeat(60));
    println!(
        "✅ 正确: {} / {} ({}%)",
        result.correct_count, result.judgeable_count, result.percentage
    );
    println!("📝 已作答: {} / {}", result.answered_count, result.total_questions);
    if result.unjudgeable_count() > 0 {
        println!("⚠️ 不计分: {}", result.unjudgeable_count());
    }
    println!("{}", "=".repeat(60));
}

/// 格式化时间戳，未提交时显示 `-`
pub fn format_timestamp(timestamp: Option<DateTime<Local>>) -> String {
    timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
