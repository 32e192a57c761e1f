use axum::Json;

use crate::dto::CrisisCheckRequest;
use crate::services::crisis::{self, CrisisAssessment, SupportResource, SUPPORT_RESOURCES};

pub async fn check(Json(body): Json<CrisisCheckRequest>) -> Json<CrisisAssessment> {
    Json(crisis::assess(body.content.as_deref(), body.mood_score))
}

pub async fn resources() -> Json<&'static [SupportResource]> {
    Json(&SUPPORT_RESOURCES[..])
}
