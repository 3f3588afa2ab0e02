//! 请求处理模块

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header::HOST, HeaderMap, StatusCode, Uri},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use common::errors::{AppError, AppResult};
use common::models::{
    CreateDatabaseRequest, DocumentListQuery, DocumentQuery, RemoveDocumentRequest,
    WriteDocumentRequest, WriteResult,
};
use common::response::{messages, MessageResponse, RouteNotFound};
use common::utils::{is_present, value_as_key};

use crate::extract::RequestBody;
use crate::service::DocumentService;
use crate::state::AppState;

/// 参数校验失败统一返回固定消息
fn require<T: Validate>(req: &T, message: &'static str) -> AppResult<()> {
    req.validate()
        .map_err(|_| AppError::MissingParameter(message))
}

fn query<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(value)| value)
        .map_err(|e| AppError::InvalidRequest(e.body_text()))
}

/// 列出所有数据库
#[utoipa::path(
    get,
    path = "/dbs/list",
    tag = "databases",
    responses(
        (status = 200, description = "数据库名称列表", body = MessageResponse),
        (status = 400, description = "远程服务错误", body = MessageResponse)
    )
)]
pub async fn list_databases(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    let service = DocumentService::new(state.store);
    Ok(Json(service.list_databases().await?))
}

/// 创建数据库
#[utoipa::path(
    post,
    path = "/dbs/add",
    tag = "databases",
    request_body = CreateDatabaseRequest,
    responses(
        (status = 200, description = "数据库已创建", body = MessageResponse),
        (status = 400, description = "名称缺失或远程服务错误", body = MessageResponse)
    )
)]
pub async fn create_database(
    State(state): State<AppState>,
    RequestBody(req): RequestBody<CreateDatabaseRequest>,
) -> AppResult<Json<MessageResponse>> {
    require(&req, messages::DATABASE_NAME_MISSING)?;
    let name = req.name.unwrap_or_default();

    let service = DocumentService::new(state.store);
    Ok(Json(service.create_database(&name).await?))
}

/// 列出数据库中的所有文档
#[utoipa::path(
    get,
    path = "/doc/list",
    tag = "documents",
    params(DocumentListQuery),
    responses(
        (status = 200, description = "文档内容数组"),
        (status = 400, description = "参数缺失或远程服务错误", body = MessageResponse),
        (status = 404, description = "数据库不存在", body = MessageResponse)
    )
)]
pub async fn list_documents(
    State(state): State<AppState>,
    params: Result<Query<DocumentListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Value>>> {
    let params = query(params)?;
    require(&params, messages::PARAMETER_MISSING)?;
    let name = params.name.unwrap_or_default();

    let service = DocumentService::new(state.store);
    Ok(Json(service.list_documents(&name).await?))
}

/// 获取单个文档
#[utoipa::path(
    get,
    path = "/doc",
    tag = "documents",
    params(DocumentQuery),
    responses(
        (status = 200, description = "文档内容（含修订信息）"),
        (status = 400, description = "参数缺失", body = MessageResponse),
        (status = 404, description = "文档不存在", body = MessageResponse)
    )
)]
pub async fn get_document(
    State(state): State<AppState>,
    params: Result<Query<DocumentQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let params = query(params)?;
    require(&params, messages::PARAMETER_MISSING)?;
    let name = params.name.unwrap_or_default();
    let id = params.doc.unwrap_or_default();

    let service = DocumentService::new(state.store);
    Ok(Json(service.get_document(&name, &id).await?))
}

/// 新增文档
#[utoipa::path(
    post,
    path = "/doc/add",
    tag = "documents",
    request_body = WriteDocumentRequest,
    responses(
        (status = 200, description = "文档已插入", body = WriteResult),
        (status = 400, description = "参数缺失或远程服务错误", body = MessageResponse)
    )
)]
pub async fn add_document(
    State(state): State<AppState>,
    RequestBody(req): RequestBody<WriteDocumentRequest>,
) -> AppResult<Json<Value>> {
    require(&req, messages::PARAMETER_MISSING)?;
    let name = req.name.unwrap_or_default();
    let document = req.document.unwrap_or_default();

    let service = DocumentService::new(state.store);
    Ok(Json(service.insert_document(&name, &document).await?))
}

/// 更新文档（文档需包含 `_id` 与当前 `_rev`）
#[utoipa::path(
    put,
    path = "/doc/update",
    tag = "documents",
    request_body = WriteDocumentRequest,
    responses(
        (status = 200, description = "文档已更新", body = WriteResult),
        (status = 400, description = "参数缺失、修订冲突或远程服务错误", body = MessageResponse)
    )
)]
pub async fn update_document(
    State(state): State<AppState>,
    RequestBody(req): RequestBody<WriteDocumentRequest>,
) -> AppResult<Json<Value>> {
    require(&req, messages::PARAMETER_MISSING)?;
    let name = req.name.unwrap_or_default();
    let document = req.document.unwrap_or_default();

    let service = DocumentService::new(state.store);
    Ok(Json(service.update_document(&name, &document).await?))
}

/// 删除文档
#[utoipa::path(
    delete,
    path = "/doc/remove",
    tag = "documents",
    request_body = RemoveDocumentRequest,
    responses(
        (status = 200, description = "文档已删除", body = WriteResult),
        (status = 400, description = "参数缺失或远程服务错误", body = MessageResponse)
    )
)]
pub async fn remove_document(
    State(state): State<AppState>,
    RequestBody(req): RequestBody<RemoveDocumentRequest>,
) -> AppResult<Json<Value>> {
    require(&req, messages::PARAMETER_MISSING)?;
    let name = req.name.unwrap_or_default();
    let id = req.document.as_ref().map(value_as_key).unwrap_or_default();
    let revision = req
        .revision
        .as_ref()
        .filter(|v| is_present(v))
        .map(value_as_key);

    let service = DocumentService::new(state.store);
    Ok(Json(
        service
            .remove_document(&name, &id, revision.as_deref())
            .await?,
    ))
}

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// 未匹配任何路由
pub async fn not_found(uri: Uri, headers: HeaderMap) -> (StatusCode, Json<RouteNotFound>) {
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    tracing::warn!(host = %host, uri = %uri, "404 - 未找到资源");

    (StatusCode::NOT_FOUND, Json(RouteNotFound::default()))
}

/// 健康检查响应
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 服务名称
    pub service: String,
    /// 服务版本
    pub version: String,
    /// 当前时间戳
    pub timestamp: DateTime<Utc>,
}
