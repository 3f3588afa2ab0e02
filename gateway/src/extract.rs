//! 请求体提取器
//!
//! 同时接受 JSON 与 URL 编码表单。没有请求体或内容类型无法识别时按空对象处理，
//! 由后续的参数校验给出“参数缺失”。

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::de::DeserializeOwned;

use common::errors::AppError;

/// JSON 或表单格式的请求体
#[derive(Debug, Clone, Default)]
pub struct RequestBody<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Form,
    Unknown,
}

impl BodyFormat {
    fn of(headers: &HeaderMap) -> Self {
        let essence = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if essence == "application/json" || essence.ends_with("+json") {
            Self::Json
        } else if essence == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Unknown
        }
    }
}

impl<S, T> FromRequest<S> for RequestBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let format = BodyFormat::of(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        let value = match format {
            BodyFormat::Json => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::InvalidRequest(e.to_string()))?,
            BodyFormat::Form => serde_urlencoded::from_bytes(&bytes)
                .map_err(|e| AppError::InvalidRequest(e.to_string()))?,
            BodyFormat::Unknown => T::default(),
        };

        Ok(Self(value))
    }
}
