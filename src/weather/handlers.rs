use axum::{
    extract::Query,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::instrument;

use crate::state::AppState;

use super::table::{self, CurrentWeather};

pub fn router() -> Router<AppState> {
    Router::new().route("/weather", get(current_weather))
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub location: &'static str,
    pub current: CurrentWeather,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Public endpoint: a fixed-table lookup with jitter, no auth required.
#[instrument]
pub async fn current_weather(Query(q): Query<WeatherQuery>) -> Json<WeatherResponse> {
    let region = table::lookup(q.location.as_deref().unwrap_or(table::DEFAULT_REGION));
    Json(WeatherResponse {
        location: region.name,
        current: table::sample(region),
        timestamp: OffsetDateTime::now_utc(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_to_nairobi_without_location() {
        let res = current_weather(Query(WeatherQuery { location: None })).await;
        assert_eq!(res.0.location, "nairobi");
    }

    #[tokio::test]
    async fn known_location_is_echoed_canonically() {
        let res = current_weather(Query(WeatherQuery {
            location: Some("Eldoret".into()),
        }))
        .await;
        assert_eq!(res.0.location, "eldoret");
    }
}
