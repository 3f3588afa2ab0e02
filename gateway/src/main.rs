//! 文档数据库 HTTP 网关
//!
//! 把 REST 请求一对一转发到远程 CouchDB / Cloudant 服务：
//! - 数据库的列出与创建
//! - 文档的列出、获取、新增、更新与删除
//! - 远程错误到 HTTP 状态码的映射

mod extract;
mod handlers;
mod routes;
mod service;
mod state;
mod store;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use common::config::AppConfig;
use common::middleware::request_id::request_id_middleware;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "document-gateway";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "文档网关 API",
        version = "0.1.0",
        description = "远程文档数据库 HTTP 网关"
    ),
    paths(
        handlers::list_databases,
        handlers::create_database,
        handlers::list_documents,
        handlers::get_document,
        handlers::add_document,
        handlers::update_document,
        handlers::remove_document,
        handlers::health_check,
    ),
    components(schemas(
        common::models::CreateDatabaseRequest,
        common::models::WriteDocumentRequest,
        common::models::RemoveDocumentRequest,
        common::models::WriteResult,
        common::response::MessageResponse,
        common::response::RouteNotFound,
        handlers::HealthResponse,
    )),
    tags(
        (name = "databases", description = "数据库端点"),
        (name = "documents", description = "文档端点"),
        (name = "health", description = "健康检查端点")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 读取 .env（不覆盖已有环境变量）
    dotenvy::dotenv().ok();

    // 初始化日志追踪
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME).context("加载配置失败")?;

    // 创建应用状态（远程文档服务客户端）
    let state = AppState::new(config.clone()).context("创建远程文档服务客户端失败")?;

    // 创建路由
    let app = create_router(state);

    // 启动服务
    let addr = config.bind_address();
    info!(service = SERVICE_NAME, address = %addr, "启动文档网关");

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务运行失败")?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "无法监听退出信号");
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，停止服务");
}
