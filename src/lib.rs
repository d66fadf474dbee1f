//! # Exam Recovery
//!
//! 把生成模型输出的"类 JSON"题目文本还原为结构化题目，并完成作答与判分
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 原始题目、还原后的题目、作答状态、考试结果
//! - `loaders` - 从本地 JSON / TOML 文件加载原始题目
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯函数，只处理单个题目或单次判分
//! - `sanitizer` - 文本清洗（截取、去控制字符、引号修复）
//! - `recovery_parser` - 把清洗后的片段解码为题目字段
//! - `scoring` - 判分
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 考试会话
//! - `AnswerTracker` - 作答记录
//! - `ExamSession` - 状态机（Forming → Active → Submitted）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/exam_assembler` - 组卷，单题失败不影响其他题目
//! - `orchestrator/app` - 命令行应用
//!
//! ### 外部边界
//! - `clients/` - 出题服务 HTTP 客户端（可取消）
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::ExamClient;
pub use config::Config;
pub use error::{AppError, AppResult, SessionError};
pub use models::{
    AnswerState, ExamRequest, ExamResult, ParseStatus, Question, RawQuestionPayload,
    RecoveredQuestion,
};
pub use orchestrator::{assemble, App};
pub use services::{parse, sanitize, score};
pub use workflow::{AnswerTracker, ExamSession, SessionState, SubmitPolicy};
