//! API 服务模块
//!
//! 包含全部端点：
//! - 活动生命周期（创建、列表、详情、浏览计数）
//! - 三类事件上报（媒体上传、GPS、社交链接）
//! - 五个分析报表（仪表盘、单活动、地理、设备、时间线）

pub mod campaigns;
pub mod gps;
pub mod helpers;
pub mod media;
pub mod reports;
pub mod routes;
pub mod social;

use std::sync::Arc;

use actix_web::web;

use crate::repository::Repository;

/// 注入到 handler 的仓库句柄
pub type RepoData = web::Data<Arc<dyn Repository>>;

// 重新导出帮助函数
pub use helpers::{
    ApiResponse, api_result, error_from_fieldtrack, error_response, json_error_handler,
    query_error_handler, success_response,
};
