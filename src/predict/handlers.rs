use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::NewPrediction;
use crate::validate::ValidateRequest;

use super::dto::{PredictRequest, PredictResponse};
use super::model;

pub fn router() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}

#[instrument(skip(state, payload))]
pub async fn predict(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(mut payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    payload.validate()?;

    let prediction = model::generate(&payload.crop);

    let record = state
        .stores
        .predictions
        .create(NewPrediction {
            user_id: claims.sub,
            crop: payload.crop,
            region: payload.region,
            yield_estimate: prediction.yield_estimate,
            confidence: prediction.confidence,
            factors: prediction.factors,
            recommendations: prediction.recommendations,
        })
        .await?;

    info!(user_id = %claims.sub, crop = %record.crop, "prediction stored");
    Ok(Json(PredictResponse {
        success: true,
        crop: record.crop,
        region: record.region,
        yield_estimate: record.yield_estimate,
        confidence: record.confidence,
        unit: "tons/hectare",
        factors: record.factors,
        recommendations: record.recommendations,
        timestamp: record.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::FromRef;

    use super::*;
    use crate::auth::jwt::JwtKeys;
    use crate::config::AppConfig;
    use crate::store::{NewUser, Role, User};

    async fn state_with_user() -> (AppState, User) {
        let state = AppState::in_memory(Arc::new(AppConfig::test_default()));
        let user = state
            .stores
            .users
            .create(NewUser {
                name: "Kwame".into(),
                email: "kwame@example.com".into(),
                password_hash: "$argon2id$fake".into(),
                role: Role::Farmer,
            })
            .await
            .unwrap();
        (state, user)
    }

    fn auth(state: &AppState, user: &User) -> AuthUser {
        let keys = JwtKeys::from_ref(state);
        let token = keys.issue(user).unwrap();
        AuthUser(keys.verify(&token).unwrap())
    }

    #[tokio::test]
    async fn predict_persists_a_record_for_the_caller() {
        let (state, user) = state_with_user().await;
        let res = predict(
            State(state.clone()),
            auth(&state, &user),
            Json(PredictRequest {
                crop: "maize".into(),
                region: "nakuru".into(),
            }),
        )
        .await
        .expect("predict");

        assert!(res.0.success);
        assert!((85.0..=100.0).contains(&res.0.confidence));
        assert_eq!(res.0.unit, "tons/hectare");

        let stored = state.stores.predictions.list_by_user(user.id, 10).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].crop, "maize");
        assert_eq!(stored[0].yield_estimate, res.0.yield_estimate);
    }

    #[tokio::test]
    async fn unknown_crop_uses_maize_band() {
        let (state, user) = state_with_user().await;
        let band = model::crop_band("maize");
        let res = predict(
            State(state.clone()),
            auth(&state, &user),
            Json(PredictRequest {
                crop: "starfruit".into(),
                region: "coast".into(),
            }),
        )
        .await
        .expect("predict");
        assert!(res.0.yield_estimate >= band.base - band.variance);
        assert!(res.0.yield_estimate <= band.base + band.variance);
    }

    #[tokio::test]
    async fn empty_fields_fail_validation_before_generation() {
        let (state, user) = state_with_user().await;
        let err = predict(
            State(state.clone()),
            auth(&state, &user),
            Json(PredictRequest {
                crop: "".into(),
                region: " ".into(),
            }),
        )
        .await
        .err()
        .unwrap();
        match err {
            ApiError::Validation(list) => assert_eq!(list.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(state.stores.predictions.list_by_user(user.id, 10).await.unwrap().is_empty());
    }
}
