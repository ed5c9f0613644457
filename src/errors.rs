use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum FieldtrackError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    DateParse(String),
}

impl FieldtrackError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            FieldtrackError::DatabaseConfig(_) => "E001",
            FieldtrackError::DatabaseConnection(_) => "E002",
            FieldtrackError::DatabaseOperation(_) => "E003",
            FieldtrackError::FileOperation(_) => "E004",
            FieldtrackError::Validation(_) => "E005",
            FieldtrackError::NotFound(_) => "E006",
            FieldtrackError::Serialization(_) => "E007",
            FieldtrackError::DateParse(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            FieldtrackError::DatabaseConfig(_) => "Database Configuration Error",
            FieldtrackError::DatabaseConnection(_) => "Database Connection Error",
            FieldtrackError::DatabaseOperation(_) => "Database Operation Error",
            FieldtrackError::FileOperation(_) => "File Operation Error",
            FieldtrackError::Validation(_) => "Validation Error",
            FieldtrackError::NotFound(_) => "Resource Not Found",
            FieldtrackError::Serialization(_) => "Serialization Error",
            FieldtrackError::DateParse(_) => "Date Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            FieldtrackError::DatabaseConfig(msg) => msg,
            FieldtrackError::DatabaseConnection(msg) => msg,
            FieldtrackError::DatabaseOperation(msg) => msg,
            FieldtrackError::FileOperation(msg) => msg,
            FieldtrackError::Validation(msg) => msg,
            FieldtrackError::NotFound(msg) => msg,
            FieldtrackError::Serialization(msg) => msg,
            FieldtrackError::DateParse(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    ///
    /// Validation → 400, NotFound → 404, 其余一律 500
    pub fn http_status(&self) -> StatusCode {
        match self {
            FieldtrackError::Validation(_) => StatusCode::BAD_REQUEST,
            FieldtrackError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for FieldtrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for FieldtrackError {}

// 便捷的构造函数
impl FieldtrackError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        FieldtrackError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        FieldtrackError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        FieldtrackError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        FieldtrackError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        FieldtrackError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        FieldtrackError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        FieldtrackError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        FieldtrackError::DateParse(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for FieldtrackError {
    fn from(err: sea_orm::DbErr) -> Self {
        FieldtrackError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for FieldtrackError {
    fn from(err: std::io::Error) -> Self {
        FieldtrackError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for FieldtrackError {
    fn from(err: serde_json::Error) -> Self {
        FieldtrackError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for FieldtrackError {
    fn from(err: chrono::ParseError) -> Self {
        FieldtrackError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FieldtrackError>;
