//! 文档网关服务模块
//!
//! 调用远程存储，并按各端点的规则把结果或错误转换为 HTTP 语义。

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::Value;

use common::errors::{AppError, AppResult, StoreError};
use common::response::{messages, MessageResponse};

use crate::store::DocumentStore;

/// 文档网关服务
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
}

/// 远程错误统一映射为 400 与固定消息
fn bad_request(message: &'static str) -> impl FnOnce(StoreError) -> AppError {
    move |source| AppError::remote(StatusCode::BAD_REQUEST, message, source)
}

impl DocumentService {
    /// 创建新的服务实例
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 列出数据库，名称以 `", "` 拼接
    pub async fn list_databases(&self) -> AppResult<MessageResponse> {
        let names = self
            .store
            .list_databases()
            .await
            .map_err(bad_request(messages::LIST_DATABASES_FAILED))?;

        if names.is_empty() {
            return Ok(MessageResponse::new(messages::NO_DATABASES));
        }
        Ok(MessageResponse::new(names.join(", ")))
    }

    /// 创建数据库
    pub async fn create_database(&self, name: &str) -> AppResult<MessageResponse> {
        let body = self
            .store
            .create_database(name)
            .await
            .map_err(bad_request(messages::CREATE_DATABASE_FAILED))?;

        tracing::info!(database = %name, response = %body, "数据库已创建");
        Ok(MessageResponse::new(messages::DATABASE_CREATED))
    }

    /// 列出数据库中的文档内容
    pub async fn list_documents(&self, database: &str) -> AppResult<Vec<Value>> {
        let list = self
            .store
            .list_documents(database)
            .await
            .map_err(|source| {
                if source.is_not_found() {
                    AppError::remote(StatusCode::NOT_FOUND, messages::DATABASE_NOT_FOUND, source)
                } else {
                    AppError::remote(
                        StatusCode::BAD_REQUEST,
                        messages::LIST_DOCUMENTS_FAILED,
                        source,
                    )
                }
            })?;

        tracing::debug!(database = %database, total_rows = list.total_rows, "文档列表");
        Ok(list.into_bodies())
    }

    /// 获取单个文档，远程状态码原样返回
    pub async fn get_document(&self, database: &str, id: &str) -> AppResult<Value> {
        let document = self
            .store
            .get_document(database, id)
            .await
            .map_err(|source| {
                let status = StatusCode::from_u16(source.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let message = if source.is_not_found() {
                    messages::DOCUMENT_NOT_FOUND
                } else {
                    messages::FETCH_DOCUMENT_FAILED
                };
                AppError::remote(status, message, source)
            })?;

        tracing::debug!(database = %database, id = %id, document = %document, "文档已获取");
        Ok(document)
    }

    /// 插入文档
    pub async fn insert_document(&self, database: &str, document: &Value) -> AppResult<Value> {
        self.write(database, document, messages::INSERT_DOCUMENT_FAILED)
            .await
    }

    /// 更新文档；与插入是同一个远程操作，文档需带 `_id` 与 `_rev`
    pub async fn update_document(&self, database: &str, document: &Value) -> AppResult<Value> {
        self.write(database, document, messages::UPDATE_DOCUMENT_FAILED)
            .await
    }

    async fn write(
        &self,
        database: &str,
        document: &Value,
        failure: &'static str,
    ) -> AppResult<Value> {
        let body = self
            .store
            .insert_document(database, document)
            .await
            .map_err(bad_request(failure))?;

        tracing::debug!(database = %database, response = %body, "文档已写入");
        Ok(body)
    }

    /// 按 ID 与修订号删除文档
    pub async fn remove_document(
        &self,
        database: &str,
        id: &str,
        revision: Option<&str>,
    ) -> AppResult<Value> {
        let body = self
            .store
            .destroy_document(database, id, revision)
            .await
            .map_err(bad_request(messages::REMOVE_DOCUMENT_FAILED))?;

        tracing::debug!(database = %database, id = %id, response = %body, "文档已删除");
        Ok(body)
    }
}
