use super::error::ApiError;
use super::AppState;
use crate::ai::ImageMime;
use crate::models::{HealthStatus, NutritionRecord, Predictions};
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{error, info, warn};

const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct NutritionQuery {
    pub food_name: Option<String>,
}

pub async fn health() -> Json<HealthStatus> {
    info!("Health check endpoint / was called");
    Json(HealthStatus {
        status: "API is running".to_string(),
    })
}

/// `POST /recognize-food/` with a multipart `file` field.
pub async fn recognize_food(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Predictions>, ApiError> {
    info!("Received request for /recognize-food/");

    let mut multipart = multipart.map_err(|e| {
        warn!("Rejected non-multipart upload: {}", e);
        ApiError::BadRequest(format!("Expected a multipart/form-data upload: {}", e))
    })?;

    let (mime, image) = loop {
        let field = multipart.next_field().await.map_err(multipart_error)?;
        match field {
            Some(field) if field.name() == Some(FILE_FIELD) => break read_image(field).await?,
            Some(_) => continue,
            None => {
                return Err(ApiError::Unprocessable(
                    "Missing required multipart field 'file'.".to_string(),
                ))
            }
        }
    };

    let predictions = state
        .extractor
        .recognize_food(&image, mime)
        .await
        .map_err(|e| {
            error!("An unexpected error occurred in /recognize-food/: {}", e);
            ApiError::Internal(
                "An internal server error occurred while processing the image.".to_string(),
            )
        })?;

    if predictions.is_empty() {
        warn!("Food recognition returned no predictions");
        return Err(ApiError::NotFound(
            "Could not recognize any food item in the image.".to_string(),
        ));
    }

    info!("Successfully recognized food. Predictions: {:?}", predictions);
    Ok(Json(Predictions { predictions }))
}

/// Validates the declared type before the body is read.
async fn read_image(field: Field<'_>) -> Result<(ImageMime, Vec<u8>), ApiError> {
    let content_type = field.content_type().unwrap_or_default().to_string();
    let Some(mime) = ImageMime::from_content_type(&content_type) else {
        warn!("Invalid file type received: {:?}", content_type);
        return Err(ApiError::BadRequest(
            "Invalid file type. Please upload a JPG or PNG image.".to_string(),
        ));
    };

    let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
    let bytes = field.bytes().await.map_err(multipart_error)?;
    info!("Successfully read image file: {} ({} bytes)", file_name, bytes.len());

    Ok((mime, bytes.to_vec()))
}

fn multipart_error(e: MultipartError) -> ApiError {
    warn!("Failed to read multipart body: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Uploaded file is too large.".to_string())
    } else {
        ApiError::BadRequest(format!("Malformed multipart body: {}", e.body_text()))
    }
}

/// `GET /get-nutrition/?food_name=...`
pub async fn get_nutrition(
    State(state): State<AppState>,
    Query(query): Query<NutritionQuery>,
) -> Result<Json<NutritionRecord>, ApiError> {
    let food_name = query.food_name.ok_or_else(|| {
        ApiError::Unprocessable("Missing required query parameter 'food_name'.".to_string())
    })?;
    info!(
        "Received request for /get-nutrition/ with food_name: '{}'",
        food_name
    );

    let fields = state
        .extractor
        .fetch_nutrition(&food_name)
        .await
        .map_err(|e| {
            error!("An unexpected error occurred in /get-nutrition/: {}", e);
            ApiError::Internal(
                "An internal server error occurred while fetching nutritional data.".to_string(),
            )
        })?;

    let Some(record) = NutritionRecord::from_oracle_fields(&fields, &food_name) else {
        warn!("Could not find nutritional data for '{}'", food_name);
        return Err(ApiError::NotFound(format!(
            "Nutritional information could not be found for '{}'.",
            food_name
        )));
    };

    info!("Successfully fetched nutritional data for '{}'", food_name);
    Ok(Json(record))
}
