//! 远程文档存储接口
//!
//! 每个方法对应远程文档数据库的一个原生操作，网关只通过该 trait 访问远程服务。

mod couch;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use common::errors::StoreResult;
use common::models::DocumentList;

pub use couch::CouchClient;

/// 文档存储 Trait
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 列出所有数据库名称
    async fn list_databases(&self) -> StoreResult<Vec<String>>;

    /// 创建数据库
    async fn create_database(&self, name: &str) -> StoreResult<Value>;

    /// 列出数据库中的所有文档（包含文档内容）
    async fn list_documents(&self, database: &str) -> StoreResult<DocumentList>;

    /// 获取单个文档（包含修订历史信息）
    async fn get_document(&self, database: &str, id: &str) -> StoreResult<Value>;

    /// 插入文档；带有 `_id` 与当前 `_rev` 时即为更新
    async fn insert_document(&self, database: &str, document: &Value) -> StoreResult<Value>;

    /// 按 ID 与修订号删除文档
    async fn destroy_document(
        &self,
        database: &str,
        id: &str,
        revision: Option<&str>,
    ) -> StoreResult<Value>;
}
