//! 媒体上传端点
//!
//! - POST /media：multipart 上传（file + media_type + campaign_id），
//!   校验类型/大小/内容类型后落盘并追加媒体日志
//! - GET /media：按活动取媒体记录，可按类型过滤

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::repository::MediaType;

use super::RepoData;
use super::helpers::{error_from_fieldtrack, error_response, success_response};

/// 照片允许的扩展名/内容类型
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// 视频允许的扩展名/内容类型
const VIDEO_EXTENSIONS: &[&str] = &["mp4"];
const VIDEO_MIME_TYPES: &[&str] = &["video/mp4"];

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListQuery {
    pub campaign_id: Option<i64>,
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaUploadedResponse {
    pub file_path: String,
    pub media_type: MediaType,
    pub timestamp: DateTime<Utc>,
}

/// multipart 解析出的原始字段
#[derive(Default)]
struct UploadForm {
    file: Option<Vec<u8>>,
    filename: Option<String>,
    content_type: Option<String>,
    media_type: Option<String>,
    campaign_id: Option<String>,
}

async fn read_text_field(field: &mut actix_multipart::Field) -> String {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        if let Ok(bytes) = chunk {
            data.extend_from_slice(&bytes);
        }
    }
    String::from_utf8_lossy(&data).trim().to_string()
}

/// 解析 multipart 表单；文件流按 max_bytes 截断保护
async fn parse_upload_form(
    payload: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadForm, HttpResponse> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid multipart data: {}", e),
                ));
            }
        };

        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                form.filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string());
                form.content_type = field.content_type().map(|m| m.essence_str().to_string());

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(bytes) => {
                            if data.len() + bytes.len() > max_bytes {
                                return Err(error_response(
                                    StatusCode::BAD_REQUEST,
                                    "File size exceeds limit",
                                ));
                            }
                            data.extend_from_slice(&bytes);
                        }
                        Err(e) => {
                            error!("Failed to read file chunk: {}", e);
                            return Err(error_response(
                                StatusCode::BAD_REQUEST,
                                &format!("Failed to read file: {}", e),
                            ));
                        }
                    }
                }
                form.file = Some(data);
            }
            "media_type" => form.media_type = Some(read_text_field(&mut field).await),
            "campaign_id" => form.campaign_id = Some(read_text_field(&mut field).await),
            _ => {
                // 忽略未知字段
            }
        }
    }

    Ok(form)
}

/// 从文件名取小写扩展名
fn file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// 校验扩展名与内容类型是否与媒体类型匹配
fn validate_file_kind(
    media_type: MediaType,
    filename: Option<&str>,
    content_type: Option<&str>,
) -> bool {
    let (extensions, mime_types) = if media_type.is_video() {
        (VIDEO_EXTENSIONS, VIDEO_MIME_TYPES)
    } else {
        (IMAGE_EXTENSIONS, IMAGE_MIME_TYPES)
    };

    let extension_ok = filename
        .and_then(file_extension)
        .map(|ext| extensions.contains(&ext.as_str()));
    let mime_ok = content_type.map(|mime| mime_types.contains(&mime));

    // 两个信号都缺时拒绝；给了就必须匹配
    match (extension_ok, mime_ok) {
        (None, None) => false,
        (ext, mime) => ext.unwrap_or(true) && mime.unwrap_or(true),
    }
}

/// POST /api/media - 上传媒体文件
pub async fn upload_media(mut payload: Multipart, repo: RepoData) -> HttpResponse {
    let config = crate::config::get_config();
    // 流式读取阶段先用大的上限；类型确定后再按类型复核
    let form = match parse_upload_form(&mut payload, config.uploads.max_video_bytes).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let Some(file) = form.file else {
        return error_response(StatusCode::BAD_REQUEST, "file is required");
    };
    let Some(media_type_raw) = form.media_type else {
        return error_response(StatusCode::BAD_REQUEST, "media_type is required");
    };
    let Some(campaign_id_raw) = form.campaign_id else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id is required");
    };

    let media_type = match media_type_raw.parse::<MediaType>() {
        Ok(media_type) => media_type,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid media type"),
    };
    let Ok(campaign_id) = campaign_id_raw.parse::<i64>() else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id must be an integer");
    };

    if file.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "file is required");
    }

    let max_bytes = if media_type.is_video() {
        config.uploads.max_video_bytes
    } else {
        config.uploads.max_image_bytes
    };
    if file.len() > max_bytes {
        return error_response(StatusCode::BAD_REQUEST, "File size exceeds limit");
    }

    if !validate_file_kind(
        media_type,
        form.filename.as_deref(),
        form.content_type.as_deref(),
    ) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid file type");
    }

    match repo.campaign(campaign_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Campaign not found"),
        Err(e) => return error_from_fieldtrack(&e),
    }

    // 生成唯一文件名，照片与视频分目录
    let extension = form
        .filename
        .as_deref()
        .and_then(file_extension)
        .unwrap_or_else(|| {
            if media_type.is_video() {
                "mp4".to_string()
            } else {
                "jpg".to_string()
            }
        });
    let subdir = if media_type.is_video() {
        "videos"
    } else {
        "photos"
    };
    let dir = format!("{}/{}", config.uploads.dir, subdir);
    let filename = format!(
        "{}_{}.{}",
        Uuid::new_v4().simple(),
        Utc::now().timestamp(),
        extension
    );
    let file_path = format!("{}/{}", dir, filename);

    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        error!("Failed to create upload directory {}: {}", dir, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }
    if let Err(e) = tokio::fs::write(&file_path, &file).await {
        error!("Failed to store upload {}: {}", file_path, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    }

    match repo.append_media(campaign_id, media_type, &file_path).await {
        Ok(event) => {
            info!(
                "Media stored: campaign={} type={} path={}",
                campaign_id, media_type, event.file_path
            );
            success_response(MediaUploadedResponse {
                file_path: event.file_path,
                media_type: event.media_type,
                timestamp: event.captured_at,
            })
        }
        Err(e) => error_from_fieldtrack(&e),
    }
}

/// GET /api/media?campaign_id=&media_type= - 媒体记录（新→旧）
pub async fn list_media(query: web::Query<MediaListQuery>, repo: RepoData) -> HttpResponse {
    let Some(campaign_id) = query.campaign_id else {
        return error_response(StatusCode::BAD_REQUEST, "campaign_id is required");
    };

    let media_type = match query.media_type.as_deref() {
        Some(raw) => match raw.parse::<MediaType>() {
            Ok(media_type) => Some(media_type),
            Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid media type"),
        },
        None => None,
    };

    match repo.media_events(campaign_id, media_type).await {
        Ok(events) => success_response(events),
        Err(e) => error_from_fieldtrack(&e),
    }
}
