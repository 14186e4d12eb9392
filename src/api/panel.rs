//! 控制面板页面
//!
//! GET / 返回内嵌的静态页面

use axum::{response::Html, routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

const PANEL_HTML: &str = include_str!("panel.html");

/// 创建面板路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(panel))
}

async fn panel() -> Html<&'static str> {
    Html(PANEL_HTML)
}
