pub mod answer;
pub mod exam;
pub mod loaders;
pub mod payload;
pub mod question;
pub mod result;

pub use answer::AnswerState;
pub use exam::{Difficulty, ExamRequest, QuestionType};
pub use loaders::load_payloads;
pub use payload::{ExamPayloads, RawQuestionPayload};
pub use question::{
    FailedQuestion, ParseStatus, Question, QuestionOption, QuestionOptions, RecoveredQuestion,
};
pub use result::{ExamResult, QuestionOutcome, Verdict};
