//! CouchDB / Cloudant HTTP 客户端

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use common::config::{ConfigError, CouchConfig};
use common::errors::{StoreError, StoreResult};
use common::models::DocumentList;

use super::DocumentStore;

/// 通过 CouchDB HTTP API 访问远程文档数据库
pub struct CouchClient {
    base: Url,
    username: Option<String>,
    password: Option<String>,
    http_client: Client,
}

/// CouchDB 错误响应体
#[derive(Debug, Default, Deserialize)]
struct CouchErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    reason: String,
}

impl CouchClient {
    /// 根据配置创建客户端。URL 中内嵌的账号密码会转为 Basic 认证。
    pub fn new(config: &CouchConfig) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: config.url.clone(),
            reason,
        };

        let mut base = Url::parse(&config.url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a hierarchical url".to_string()));
        }

        // URL 中的账号密码是百分号编码形式
        let decode = |raw: &str| {
            percent_decode_str(raw)
                .decode_utf8()
                .map(|decoded| decoded.into_owned())
                .map_err(|e| invalid(format!("credentials are not valid utf-8: {e}")))
        };

        let mut username = config.username.clone();
        let mut password = config.password.clone();
        if !base.username().is_empty() {
            if username.is_none() {
                username = Some(decode(base.username())?);
            }
            if password.is_none() {
                password = base.password().map(decode).transpose()?;
            }
            // 对可作为 base 的 URL 不会失败
            let _ = base.set_username("");
            let _ = base.set_password(None);
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            base,
            username,
            password,
            http_client,
        })
    }

    /// 远程服务地址（不含账号信息）
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// 拼接路径，每一段单独做百分号编码。
    ///
    /// `.` 与 `..` 会被 URL 规范化吞掉而指向上一级资源，直接拒绝。
    fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(StoreError::status(
                400,
                "bad_request",
                format!("illegal path segment: {segment:?}"),
            ));
        }

        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http_client.request(method, url);
        match &self.username {
            Some(username) => builder.basic_auth(username, self.password.as_deref()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> StoreResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<CouchErrorBody>().await.unwrap_or_default();
            return Err(StoreError::status(status.as_u16(), body.error, body.reason));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DocumentStore for CouchClient {
    async fn list_databases(&self) -> StoreResult<Vec<String>> {
        let url = self.endpoint(&["_all_dbs"])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn create_database(&self, name: &str) -> StoreResult<Value> {
        let url = self.endpoint(&[name])?;
        self.send(self.request(Method::PUT, url)).await
    }

    async fn list_documents(&self, database: &str) -> StoreResult<DocumentList> {
        let mut url = self.endpoint(&[database, "_all_docs"])?;
        url.query_pairs_mut().append_pair("include_docs", "true");
        self.send(self.request(Method::GET, url)).await
    }

    async fn get_document(&self, database: &str, id: &str) -> StoreResult<Value> {
        let mut url = self.endpoint(&[database, id])?;
        url.query_pairs_mut().append_pair("revs_info", "true");
        self.send(self.request(Method::GET, url)).await
    }

    async fn insert_document(&self, database: &str, document: &Value) -> StoreResult<Value> {
        let url = self.endpoint(&[database])?;
        self.send(self.request(Method::POST, url).json(document)).await
    }

    async fn destroy_document(
        &self,
        database: &str,
        id: &str,
        revision: Option<&str>,
    ) -> StoreResult<Value> {
        let mut url = self.endpoint(&[database, id])?;
        if let Some(revision) = revision {
            url.query_pairs_mut().append_pair("rev", revision);
        }
        self.send(self.request(Method::DELETE, url)).await
    }
}
