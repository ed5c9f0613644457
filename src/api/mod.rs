//! HTTP 服务层

pub mod services;

pub use services::routes::api_routes;
