/// 出题服务客户端
///
/// 封装对出题服务的 HTTP 调用，返回原始题目列表。
/// 请求可以被取消（用户离开页面或发起新的请求），重复请求是安全的
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{ExamPayloads, ExamRequest, RawQuestionPayload};
use futures::future::{AbortRegistration, Abortable};
use std::time::Duration;
use tracing::{debug, info};

const GENERATE_EXAM_PATH: &str = "/Exam/generate-exam";

/// 出题服务客户端
pub struct ExamClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ExamClient {
    /// 创建新的出题服务客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed(&config.exam_api_base_url, e))?;

        Ok(Self {
            http,
            base_url: config.exam_api_base_url.trim_end_matches('/').to_string(),
            token: config.exam_api_token.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_EXAM_PATH)
    }

    /// 请求生成一场考试
    ///
    /// # 返回
    /// 按展示顺序排列、已重新编号的原始题目列表
    pub async fn fetch_exam(&self, request: &ExamRequest) -> AppResult<Vec<RawQuestionPayload>> {
        let endpoint = self.endpoint();
        info!(
            "📝 请求出题: 主题 \"{}\", {} 道 {} 题, 难度 {}",
            request.query, request.question_nbr, request.question_type, request.difficulty
        );

        let mut builder = self.http.post(&endpoint).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        if !status.is_success() {
            return Err(ApiError::BadResponse {
                endpoint,
                status: status.as_u16(),
                message: extract_detail(&body),
            }
            .into());
        }

        let payloads = decode_payloads(&endpoint, &body)?;
        info!("✓ 出题服务返回 {} 道题目", payloads.len());
        Ok(payloads)
    }

    /// 可取消的出题请求
    ///
    /// 通过对应的 `AbortHandle::abort()` 取消，取消后返回 `ApiError::Cancelled`
    pub async fn fetch_exam_abortable(
        &self,
        request: &ExamRequest,
        registration: AbortRegistration,
    ) -> AppResult<Vec<RawQuestionPayload>> {
        match Abortable::new(self.fetch_exam(request), registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                debug!("出题请求已取消");
                Err(ApiError::Cancelled {
                    endpoint: self.endpoint(),
                }
                .into())
            }
        }
    }
}

/// 解析响应体
fn decode_payloads(endpoint: &str, body: &str) -> AppResult<Vec<RawQuestionPayload>> {
    let payloads: ExamPayloads = serde_json::from_str(body).map_err(ApiError::JsonParseFailed)?;

    if payloads.questions.is_empty() {
        return Err(ApiError::EmptyResponse {
            endpoint: endpoint.to_string(),
        }
        .into());
    }

    Ok(payloads.into_indexed())
}

/// 提取错误响应中的 `detail` 字段
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
}
