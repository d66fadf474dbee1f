//! 命令行应用 - 编排层
//!
//! ## 职责
//!
//! 1. **获取题目**：从本地文件加载，或请求出题服务（支持 Ctrl-C 取消）
//! 2. **组卷**：调用 `exam_assembler` 得到题目列表
//! 3. **作答**：从标准输入逐题读取答案，写入 `ExamSession`
//! 4. **提交**：判分并输出结果；作答不足时回到作答
//! 5. **重来**：提交后可以清空答案重新作答，或丢弃本场考试

use crate::clients::ExamClient;
use crate::config::Config;
use crate::error::{ApiError, AppError, SessionError};
use crate::models::{load_payloads, ExamRequest, Question, RawQuestionPayload, RecoveredQuestion};
use crate::orchestrator::exam_assembler::assemble_with_summary;
use crate::utils::logging::{log_assembly, log_startup, print_question, print_result};
use crate::workflow::{ExamSession, SubmitPolicy};
use anyhow::{Context, Result};
use futures::future::AbortHandle;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

type InputLines = Lines<BufReader<Stdin>>;

/// 提交后的下一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextStep {
    /// 清空答案，重新作答
    Retry,
    /// 丢弃本场考试
    Back,
    /// 结束程序
    Quit,
}

impl NextStep {
    fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "r" | "retry" | "réinitialiser" => NextStep::Retry,
            "b" | "back" | "retour" => NextStep::Back,
            _ => NextStep::Quit,
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    client: ExamClient,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = ExamClient::new(&config).context("无法创建出题服务客户端")?;

        Ok(Self { config, client })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let payloads = self.load_payloads().await?;

        if payloads.is_empty() {
            warn!("⚠️ 没有获取到任何题目，程序结束");
            return Ok(());
        }

        let (questions, summary) = assemble_with_summary(&payloads);
        log_assembly(&summary);

        let mut session = ExamSession::new(self.submit_policy());
        session.activate(questions)?;

        let mut input = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let input_closed = self.collect_answers(&mut session, &mut input).await?;

            match session.submit().cloned() {
                Ok(result) => print_result(session.questions(), &result, session.submitted_at()),
                Err(SessionError::NotEnoughAnswers { answered, required }) => {
                    println!(
                        "⚠️ 作答数量不足 (已作答 {}, 至少需要 {})，未提交",
                        answered, required
                    );
                    if input_closed {
                        warn!("输入已结束，没有提交任何答案");
                        break;
                    }
                    println!("请重新作答");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            if input_closed {
                break;
            }

            match self.prompt_next_step(&mut input).await? {
                NextStep::Retry => {
                    info!("🔄 清空答案，重新作答");
                    session.reset();
                }
                NextStep::Back => {
                    info!("↩️ 丢弃本场考试");
                    session.discard();
                    break;
                }
                NextStep::Quit => break,
            }
        }

        Ok(())
    }

    fn submit_policy(&self) -> SubmitPolicy {
        if self.config.require_all_answers {
            SubmitPolicy::AllJudgeable
        } else {
            SubmitPolicy::AtLeastOne
        }
    }

    /// 获取原始题目
    async fn load_payloads(&self) -> Result<Vec<RawQuestionPayload>> {
        if let Some(path) = &self.config.payload_file {
            info!("\n📁 正在从本地文件加载题目...");
            return load_payloads(Path::new(path))
                .await
                .with_context(|| format!("无法加载题目文件: {}", path));
        }

        let request = ExamRequest::new(
            self.config.query.clone(),
            self.config.question_nbr,
            self.config.difficulty,
            self.config.question_type,
        );

        let (handle, registration) = AbortHandle::new_pair();
        let fetch = self.client.fetch_exam_abortable(&request, registration);
        tokio::pin!(fetch);

        let result = tokio::select! {
            result = &mut fetch => result,
            _ = tokio::signal::ctrl_c() => {
                warn!("收到 Ctrl-C，取消出题请求");
                handle.abort();
                fetch.await
            }
        };

        match result {
            Err(AppError::Api(ApiError::Cancelled { .. })) => {
                info!("出题请求已取消");
                Ok(Vec::new())
            }
            other => other.context("出题请求失败"),
        }
    }

    /// 提交后询问下一步，输入结束视为退出
    async fn prompt_next_step(&self, input: &mut InputLines) -> Result<NextStep> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all("\n[r] 重新作答  [b] 丢弃考试  [回车] 退出\n> ".as_bytes())
            .await?;
        stdout.flush().await?;

        let line = input.next_line().await?.unwrap_or_default();
        Ok(NextStep::parse(&line))
    }

    /// 从标准输入逐题读取答案
    ///
    /// 空行跳过该题；返回输入是否已结束（EOF）
    async fn collect_answers(&self, session: &mut ExamSession, lines: &mut InputLines) -> Result<bool> {
        let mut stdout = tokio::io::stdout();

        let questions: Vec<Question> = session.questions().to_vec();
        for question in &questions {
            print_question(question);

            let Question::Ok(q) = question else {
                continue;
            };

            stdout.write_all("> ".as_bytes()).await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                info!("输入结束，停止作答");
                return Ok(true);
            };

            let answer = line.trim();
            if answer.is_empty() {
                continue;
            }

            session.set_answer(q.index, canonical_answer(q, answer))?;
        }

        info!("📝 已作答 {}/{}", session.answered_count(), questions.len());
        Ok(false)
    }
}

/// 选择题允许输入小写标签
fn canonical_answer(question: &RecoveredQuestion, answer: &str) -> String {
    question
        .options
        .as_ref()
        .and_then(|opts| {
            opts.iter()
                .find(|opt| opt.label.eq_ignore_ascii_case(answer))
                .map(|opt| opt.label.clone())
        })
        .unwrap_or_else(|| answer.to_string())
}
