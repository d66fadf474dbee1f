use crate::error::{AppError, AppResult, FileError};
use crate::models::payload::{ExamPayloads, RawQuestionPayload};
use std::path::Path;
use tokio::fs;

/// 从本地文件加载原始题目
///
/// 支持两种格式：
/// - `.json`：出题服务的响应体 `{"questions": [...]}`，或直接是题目数组
/// - `.toml`：`[[questions]]` 表数组
///
/// 返回的题目按文件中的顺序重新编号
pub async fn load_payloads(path: &Path) -> AppResult<Vec<RawQuestionPayload>> {
    let path_str = path.display().to_string();

    if !path.exists() {
        return Err(FileError::NotFound { path: path_str }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    let payloads = match extension.as_deref() {
        Some("json") => parse_json_payloads(&content).map_err(|source| FileError::JsonParseFailed {
            path: path_str.clone(),
            source,
        })?,
        Some("toml") => toml::from_str::<ExamPayloads>(&content).map_err(|source| {
            FileError::TomlParseFailed {
                path: path_str.clone(),
                source,
            }
        })?,
        _ => return Err(FileError::UnsupportedFormat { path: path_str }.into()),
    };

    tracing::info!(
        "已从 {} 加载 {} 道题目",
        path_str,
        payloads.questions.len()
    );

    Ok(payloads.into_indexed())
}

fn parse_json_payloads(content: &str) -> Result<ExamPayloads, serde_json::Error> {
    if content.trim_start().starts_with('[') {
        let questions: Vec<RawQuestionPayload> = serde_json::from_str(content)?;
        Ok(ExamPayloads { questions })
    } else {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tokio_test::{assert_err, assert_ok};

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "exam_recovery_{}_{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_json_array() {
        let path = temp_file(
            "array.json",
            r#"[{"question_data": "a"}, {"question_data": "b", "type": "mcq"}]"#,
        );

        let payloads = assert_ok!(load_payloads(&path).await);
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[1].index, 1);
        assert_eq!(payloads[1].kind.as_deref(), Some("mcq"));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_load_toml_tables() {
        let path = temp_file(
            "exam.toml",
            r#"
[[questions]]
type = "mcq"
source_content = "Les jointures"
question_data = '''Voici: {"question": "1+1?", "correct_answer": "B"}'''

[[questions]]
source_text = "rien"
"#,
        );

        let payloads = assert_ok!(load_payloads(&path).await);
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].source_content.as_deref(), Some("Les jointures"));
        assert!(payloads[0].source_text.contains("1+1?"));
        assert_eq!(payloads[1].source_text, "rien");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_missing_and_unsupported_files() {
        let missing = std::env::temp_dir().join("exam_recovery_does_not_exist.json");
        let err = assert_err!(load_payloads(&missing).await);
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));

        let path = temp_file("exam.yaml", "questions: []");
        let err = assert_err!(load_payloads(&path).await);
        assert!(matches!(err, AppError::File(FileError::UnsupportedFormat { .. })));

        let _ = std::fs::remove_file(path);
    }
}
