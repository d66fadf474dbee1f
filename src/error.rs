use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 考试会话相关错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 考试会话错误
///
/// 这些错误都表示调用方（展示层）的逻辑问题，而不是外部数据的问题
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 题目索引超出范围
    #[error("题目索引 {index} 超出范围 [0, {question_count})")]
    IndexOutOfRange { index: usize, question_count: usize },
    /// 当前状态不允许该操作
    #[error("状态 {state} 下不允许执行 {action}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    /// 题目解析失败，不可作答
    #[error("题目 {index} 解析失败，不可作答")]
    QuestionUnavailable { index: usize },
    /// 已提交，答案被锁定
    #[error("试卷已提交，答案已锁定 (题目 {index})")]
    AnswersLocked { index: usize },
    /// 作答数量不满足提交条件
    #[error("作答数量不足: 已作答 {answered}, 至少需要 {required}")]
    NotEnoughAnswers { answered: usize, required: usize },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// API 返回空结果
    #[error("API返回空结果: {endpoint}")]
    EmptyResponse { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
    /// 请求被取消
    #[error("请求已取消: {endpoint}")]
    Cancelled { endpoint: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 不支持的文件格式
    #[error("不支持的文件格式: {path} (仅支持 .json / .toml)")]
    UnsupportedFormat { path: String },
    /// JSON 文件解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        let err = AppError::from(SessionError::IndexOutOfRange {
            index: 7,
            question_count: 3,
        });
        assert_eq!(
            err.to_string(),
            "会话错误: 题目索引 7 超出范围 [0, 3)"
        );
    }

    #[test]
    fn test_session_error_is_comparable() {
        let a = SessionError::AnswersLocked { index: 1 };
        let b = SessionError::AnswersLocked { index: 1 };
        assert_eq!(a, b);
    }
}
