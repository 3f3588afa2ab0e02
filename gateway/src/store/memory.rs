//! 内存文档存储，测试中代替远程服务
//!
//! 按 CouchDB 的规则处理修订号冲突与数据库命名，并记录调用次数。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use common::errors::{StoreError, StoreResult};
use common::models::{DocumentList, DocumentRow};
use common::utils::IdGenerator;

use super::DocumentStore;

type Documents = BTreeMap<String, Map<String, Value>>;

#[derive(Default)]
pub struct MemoryStore {
    databases: RwLock<BTreeMap<String, Documents>>,
    calls: AtomicUsize,
    outage: Option<u16>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_databases(names: &[&str]) -> Self {
        let databases = names
            .iter()
            .map(|name| (name.to_string(), Documents::new()))
            .collect();
        Self {
            databases: RwLock::new(databases),
            ..Self::default()
        }
    }

    /// Every call fails with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            outage: Some(status),
            ..Self::new()
        }
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outage {
            Some(status) => Err(StoreError::status(status, "unavailable", "simulated outage")),
            None => Ok(()),
        }
    }
}

fn valid_database_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || "_$()+-/".contains(c)
        })
}

fn missing_database() -> StoreError {
    StoreError::status(404, "not_found", "Database does not exist.")
}

fn missing_document() -> StoreError {
    StoreError::status(404, "not_found", "missing")
}

fn conflict() -> StoreError {
    StoreError::status(409, "conflict", "Document update conflict.")
}

fn bad_request(reason: &str) -> StoreError {
    StoreError::status(400, "bad_request", reason)
}

fn revision_of(document: &Map<String, Value>) -> &str {
    document.get("_rev").and_then(Value::as_str).unwrap_or_default()
}

fn next_revision(current: &str) -> String {
    IdGenerator::revision(IdGenerator::revision_generation(current).unwrap_or(0) + 1)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_databases(&self) -> StoreResult<Vec<String>> {
        self.begin()?;
        Ok(self.databases.read().await.keys().cloned().collect())
    }

    async fn create_database(&self, name: &str) -> StoreResult<Value> {
        self.begin()?;
        if !valid_database_name(name) {
            return Err(StoreError::status(
                400,
                "illegal_database_name",
                format!("Name: '{name}'. Only lowercase characters (a-z), digits (0-9), and any of the characters _, $, (, ), +, -, and / are allowed. Must begin with a letter."),
            ));
        }

        let mut databases = self.databases.write().await;
        if databases.contains_key(name) {
            return Err(StoreError::status(
                412,
                "file_exists",
                "The database could not be created, the file already exists.",
            ));
        }
        databases.insert(name.to_string(), Documents::new());
        Ok(json!({ "ok": true }))
    }

    async fn list_documents(&self, database: &str) -> StoreResult<DocumentList> {
        self.begin()?;
        let databases = self.databases.read().await;
        let documents = databases.get(database).ok_or_else(missing_database)?;

        let rows = documents
            .iter()
            .map(|(id, document)| DocumentRow {
                id: Some(id.clone()),
                key: json!(id),
                value: json!({ "rev": revision_of(document) }),
                doc: Some(Value::Object(document.clone())),
            })
            .collect::<Vec<_>>();

        Ok(DocumentList {
            total_rows: rows.len() as u64,
            offset: 0,
            rows,
        })
    }

    async fn get_document(&self, database: &str, id: &str) -> StoreResult<Value> {
        self.begin()?;
        let databases = self.databases.read().await;
        let documents = databases.get(database).ok_or_else(missing_database)?;
        let mut document = documents.get(id).cloned().ok_or_else(missing_document)?;

        let revs_info = json!([{ "rev": revision_of(&document), "status": "available" }]);
        document.insert("_revs_info".to_string(), revs_info);
        Ok(Value::Object(document))
    }

    async fn insert_document(&self, database: &str, document: &Value) -> StoreResult<Value> {
        self.begin()?;
        let Value::Object(mut body) = document.clone() else {
            return Err(bad_request("Document must be a JSON object"));
        };

        let id = match body.get("_id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(_) => return Err(bad_request("Document id must be a non-empty string")),
            None => IdGenerator::document_id(),
        };
        let supplied = body.get("_rev").and_then(Value::as_str).map(str::to_owned);

        let mut databases = self.databases.write().await;
        let documents = databases.get_mut(database).ok_or_else(missing_database)?;

        let rev = match documents.get(&id) {
            Some(current) if supplied.as_deref() == Some(revision_of(current)) => {
                next_revision(revision_of(current))
            }
            Some(_) => return Err(conflict()),
            None if supplied.is_some() => return Err(conflict()),
            None => IdGenerator::revision(1),
        };

        body.insert("_id".to_string(), json!(id));
        body.insert("_rev".to_string(), json!(rev));
        documents.insert(id.clone(), body);

        Ok(json!({ "ok": true, "id": id, "rev": rev }))
    }

    async fn destroy_document(
        &self,
        database: &str,
        id: &str,
        revision: Option<&str>,
    ) -> StoreResult<Value> {
        self.begin()?;
        let mut databases = self.databases.write().await;
        let documents = databases.get_mut(database).ok_or_else(missing_database)?;
        let current = documents.get(id).ok_or_else(missing_document)?;

        let current_rev = revision_of(current).to_string();
        if revision != Some(current_rev.as_str()) {
            return Err(conflict());
        }

        documents.remove(id);
        Ok(json!({ "ok": true, "id": id, "rev": next_revision(&current_rev) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_requires_current_revision() {
        let store = MemoryStore::with_databases(&["db"]);
        let created = store.insert_document("db", &json!({ "k": "v" })).await.unwrap();
        let id = created["id"].as_str().unwrap();
        let rev = created["rev"].as_str().unwrap();

        let stale = json!({ "_id": id, "_rev": "1-stale", "k": "w" });
        let err = store.insert_document("db", &stale).await.unwrap_err();
        assert_eq!(err.status_code(), 409);

        let fresh = json!({ "_id": id, "_rev": rev, "k": "w" });
        let updated = store.insert_document("db", &fresh).await.unwrap();
        assert!(updated["rev"].as_str().unwrap().starts_with("2-"));
        assert_eq!(store.calls(), 3);
    }

    #[tokio::test]
    async fn test_database_names_follow_remote_rules() {
        let store = MemoryStore::new();
        assert!(store.create_database("team/docs_1").await.is_ok());
        assert_eq!(store.create_database("Bad").await.unwrap_err().status_code(), 400);
        assert_eq!(store.create_database("team/docs_1").await.unwrap_err().status_code(), 412);
    }

    #[tokio::test]
    async fn test_outage() {
        let store = MemoryStore::failing(503);
        assert_eq!(store.list_databases().await.unwrap_err().status_code(), 503);
    }
}
