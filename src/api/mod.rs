use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::SnowcastError;
use crate::advisor::Advisor;
use crate::location_resolver::LocationInput;
use crate::models::{Location, TemperatureUnit};
use crate::snow::ConditionsReport;

#[derive(Clone)]
pub struct AppState {
    pub advisor: Advisor,
    pub default_unit: TemperatureUnit,
}

#[derive(Debug, Deserialize)]
pub struct ConditionsQuery {
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub unit: Option<String>,
}

impl ConditionsQuery {
    fn location_input(&self) -> Result<LocationInput, SnowcastError> {
        match (self.lat, self.lon, &self.location) {
            (Some(lat), Some(lon), _) => Ok(LocationInput::Coordinates(lat, lon)),
            (None, None, Some(location)) => Ok(LocationInput::parse(location)),
            (None, None, None) => Err(SnowcastError::validation(
                "Provide either 'location' or both 'lat' and 'lon'",
            )),
            _ => Err(SnowcastError::validation("Both 'lat' and 'lon' are required")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSuggestion {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Location> for ApiSuggestion {
    fn from(location: &Location) -> Self {
        Self {
            label: location.display_name(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

/// Error body returned to API clients
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<SnowcastError> for ApiError {
    fn from(err: SnowcastError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.downcast_ref::<SnowcastError>() {
            Some(err) => (status_for(err), err.user_message()),
            None => {
                tracing::error!("Unhandled error: {:#}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch weather data. Please try again.".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn status_for(err: &SnowcastError) -> StatusCode {
    match err {
        SnowcastError::Validation { .. } | SnowcastError::InvalidInput { .. } => {
            StatusCode::BAD_REQUEST
        }
        SnowcastError::NotFound { .. } | SnowcastError::MissingData { .. } => StatusCode::NOT_FOUND,
        SnowcastError::Api { .. } => StatusCode::BAD_GATEWAY,
        SnowcastError::Config { .. } | SnowcastError::Cache { .. } | SnowcastError::Io { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/conditions", get(get_conditions))
        .route("/suggestions", get(get_suggestions))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, SnowcastError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| SnowcastError::validation(rejection.body_text()))
}

async fn get_conditions(
    State(state): State<AppState>,
    query: Result<Query<ConditionsQuery>, QueryRejection>,
) -> Result<Json<ConditionsReport>, ApiError> {
    let query = query_params(query)?;
    let unit = match &query.unit {
        Some(unit) => unit.parse::<TemperatureUnit>()?,
        None => state.default_unit,
    };
    let input = query.location_input()?;
    let report = state.advisor.conditions(input, unit).await?;
    Ok(Json(report))
}

async fn get_suggestions(
    State(state): State<AppState>,
    query: Result<Query<SuggestionsQuery>, QueryRejection>,
) -> Result<Json<Vec<ApiSuggestion>>, ApiError> {
    let query = query_params(query)?;
    let suggestions = state.advisor.suggestions(&query.q).await?;
    Ok(Json(suggestions.iter().map(ApiSuggestion::from).collect()))
}
