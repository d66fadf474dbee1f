pub mod answer_tracker;
pub mod exam_session;

pub use answer_tracker::AnswerTracker;
pub use exam_session::{ExamSession, SessionState, SubmitPolicy};
