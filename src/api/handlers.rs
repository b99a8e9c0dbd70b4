//! API request handlers
//!
//! Handlers for all REST API endpoints. Mapping endpoints take a
//! `multipart/form-data` upload with the fields:
//!
//! - `budget`   - budget workbook (.xlsx)
//! - `template` - template workbook (.xlsx); its file name carries the hotel key
//! - `hotel`    - optional hotel key override
//! - `template_name` - optional file name when the client cannot send one

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::core::{BudgetMapper, HotelSelector, MappingOutcome};
use crate::error::MapperError;
use crate::presenter::MappingReport;

use super::server::AppState;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DIAGNOSTICS_HEADER: &str = "x-mapping-diagnostics";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
            error_kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.error_kind = Some(kind.into());
        self
    }
}

/// Failure of a mapping request, rendered as an `ApiResponse` error body.
#[derive(Debug)]
pub enum ApiError {
    /// Upload could not be read or lacks a field (400)
    BadUpload(String),
    /// The mapping itself failed (422)
    Mapping(MapperError),
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::BadUpload(e.to_string())
    }
}

impl From<MapperError> for ApiError {
    fn from(e: MapperError) -> Self {
        ApiError::Mapping(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadUpload(message) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::err(message).with_kind("BadUpload"),
            ),
            ApiError::Mapping(e) => {
                warn!(kind = e.kind(), "mapping failed: {}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ApiResponse::<()>::err(e.to_string()).with_kind(e.kind()),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Budget Mapper API Server".to_string(),
        version: state.version.clone(),
        description: "Maps hotel budget exports onto per-hotel segment templates".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint(
                "/api/v1/preview",
                "POST",
                "Map budget + template uploads and return the JSON report",
            ),
            endpoint(
                "/api/v1/map",
                "POST",
                "Map budget + template uploads and download the mapped workbook",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec!["preview".to_string(), "map".to_string()],
    }))
}

/// Decoded mapping upload
#[derive(Debug, Default)]
pub struct MappingUpload {
    pub budget: Vec<u8>,
    pub template: Vec<u8>,
    pub template_name: String,
    pub hotel: Option<String>,
}

impl MappingUpload {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut budget = None;
        let mut template = None;
        let mut template_file_name = None;
        let mut template_name_field = None;
        let mut hotel = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "budget" => budget = Some(field.bytes().await?.to_vec()),
                "template" => {
                    template_file_name = field.file_name().map(str::to_string);
                    template = Some(field.bytes().await?.to_vec());
                }
                "template_name" => template_name_field = Some(field.text().await?),
                "hotel" => {
                    let value = field.text().await?;
                    if !value.trim().is_empty() {
                        hotel = Some(value.trim().to_string());
                    }
                }
                _ => {}
            }
        }

        let budget = budget.ok_or_else(|| ApiError::BadUpload("missing 'budget' file".into()))?;
        let template =
            template.ok_or_else(|| ApiError::BadUpload("missing 'template' file".into()))?;
        let template_name = template_name_field
            .or(template_file_name)
            .ok_or_else(|| ApiError::BadUpload("template upload has no file name".into()))?;

        Ok(Self {
            budget,
            template,
            template_name,
            hotel,
        })
    }

    fn run(&self, state: &AppState) -> Result<MappingOutcome, ApiError> {
        let mapper = BudgetMapper::new(state.mapping.clone())
            .with_selector(HotelSelector::from_override(self.hotel.clone()));
        Ok(mapper.map_workbooks(&self.budget, &self.template, &self.template_name)?)
    }
}

/// POST /api/v1/preview - Map uploads, return the report
pub async fn preview(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<MappingReport>>, ApiError> {
    let upload = MappingUpload::from_multipart(multipart).await?;
    let outcome = upload.run(&state)?;
    Ok(Json(ApiResponse::ok(MappingReport::from_outcome(
        &outcome,
        state.preview_rows,
    ))))
}

/// POST /api/v1/map - Map uploads, download the workbook
pub async fn map(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = MappingUpload::from_multipart(multipart).await?;
    let outcome = upload.run(&state)?;
    let bytes = outcome.to_workbook()?;

    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME));
    if let Ok(value) = HeaderValue::from_str(&content_disposition(outcome.download_name())) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers.insert(
        HeaderName::from_static(DIAGNOSTICS_HEADER),
        HeaderValue::from(outcome.diagnostics.len()),
    );
    Ok(response)
}

fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}
