use crate::error::ConfigError;
use crate::models::{Difficulty, QuestionType};
use std::str::FromStr;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 出题服务配置 ---
    pub exam_api_base_url: String,
    /// 可选的 Bearer Token
    pub exam_api_token: Option<String>,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 出题请求参数 ---
    pub query: String,
    pub question_nbr: u32,
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
    /// 本地题目文件（设置后不再请求出题服务）
    pub payload_file: Option<String>,
    /// 是否要求所有可判分题目都作答后才能提交
    pub require_all_answers: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exam_api_base_url: "http://127.0.0.1:8000".to_string(),
            exam_api_token: None,
            request_timeout_secs: 300,
            query: "Les jointures en SQL".to_string(),
            question_nbr: 5,
            difficulty: Difficulty::Intermediate,
            question_type: QuestionType::Mcq,
            payload_file: None,
            require_all_answers: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            exam_api_base_url: std::env::var("EXAM_API_BASE_URL")
                .unwrap_or(default.exam_api_base_url),
            exam_api_token: std::env::var("EXAM_API_TOKEN").ok().filter(|t| !t.is_empty()),
            request_timeout_secs: env_parse(
                "REQUEST_TIMEOUT_SECS",
                default.request_timeout_secs,
                "u64",
            )?,
            query: std::env::var("EXAM_QUERY").unwrap_or(default.query),
            question_nbr: env_parse("EXAM_QUESTION_NBR", default.question_nbr, "u32")?,
            difficulty: env_parse("EXAM_DIFFICULTY", default.difficulty, "Difficulty")?,
            question_type: env_parse("EXAM_QUESTION_TYPE", default.question_type, "QuestionType")?,
            payload_file: std::env::var("PAYLOAD_FILE").ok().filter(|p| !p.is_empty()),
            require_all_answers: env_parse(
                "REQUIRE_ALL_ANSWERS",
                default.require_all_answers,
                "bool",
            )?,
            verbose_logging: env_parse("VERBOSE_LOGGING", default.verbose_logging, "bool")?,
        })
    }
}

/// 读取并解析环境变量，不存在时使用默认值
fn env_parse<T: FromStr>(var_name: &str, default: T, expected_type: &str) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_falls_back_to_default() {
        let value: u32 = env_parse("EXAM_RECOVERY_TEST_UNSET_VAR", 42, "u32").unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        std::env::set_var("EXAM_RECOVERY_TEST_BAD_BOOL", "peut-être");
        let err = env_parse::<bool>("EXAM_RECOVERY_TEST_BAD_BOOL", false, "bool").unwrap_err();
        match err {
            ConfigError::EnvVarParseFailed { var_name, value, .. } => {
                assert_eq!(var_name, "EXAM_RECOVERY_TEST_BAD_BOOL");
                assert_eq!(value, "peut-être");
            }
        }
    }

    #[test]
    fn test_env_parse_difficulty() {
        std::env::set_var("EXAM_RECOVERY_TEST_DIFFICULTY", "advanced");
        let value = env_parse(
            "EXAM_RECOVERY_TEST_DIFFICULTY",
            Difficulty::Beginner,
            "Difficulty",
        )
        .unwrap();
        assert_eq!(value, Difficulty::Advanced);
    }
}
