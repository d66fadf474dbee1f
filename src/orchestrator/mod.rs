//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `exam_assembler` - 组卷器
//! - 遍历一场考试的所有原始题目（Vec<RawQuestionPayload>）
//! - 逐题调用 清洗 -> 解析
//! - 单题失败不影响其他题目，输出与输入一一对应
//!
//! ### `app` - 命令行应用
//! - 获取题目（本地文件 / 出题服务）
//! - 驱动 `ExamSession` 完成作答与提交
//!
//! ## 层次关系
//!
//! ```text
//! app (获取题目、驱动会话)
//!     ↓
//! exam_assembler (处理 Vec<RawQuestionPayload>)
//!     ↓
//! workflow::ExamSession (作答 / 提交 / 重置)
//!     ↓
//! services (能力层：sanitize / parse / score)
//! ```

pub mod app;
pub mod exam_assembler;

pub use app::App;
pub use exam_assembler::{assemble, assemble_with_summary, AssemblySummary};
