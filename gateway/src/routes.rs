//! 网关路由模块

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// 创建网关路由，未匹配的路径与方法统一返回 404
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dbs/list", get(handlers::list_databases))
        .route("/dbs/add", post(handlers::create_database))
        .route("/doc", get(handlers::get_document))
        .route("/doc/list", get(handlers::list_documents))
        .route("/doc/add", post(handlers::add_document))
        .route("/doc/update", put(handlers::update_document))
        .route("/doc/remove", delete(handlers::remove_document))
        .route("/api/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
}
