use axum::{Json, extract::State};
use bazaar_core::Country;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppResult, response::ApiResponse};

#[derive(Debug, Serialize)]
pub struct CountryView {
    #[serde(rename = "UUID")]
    pub id: Uuid,
    #[serde(rename = "Name")]
    pub name: String,
}

impl From<Country> for CountryView {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            name: country.name,
        }
    }
}

pub async fn list_countries(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CountryView>>>> {
    let countries = state.countries.list().await?;
    Ok(Json(ApiResponse::success(
        countries.into_iter().map(CountryView::from).collect(),
    )))
}
