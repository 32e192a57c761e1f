use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::dto::OverviewResponse;
use crate::handlers::auth::fetch_profile;
use crate::models::profile::Profile;
use crate::services::encouragement::{self, TWO_MINUTE_TIP};
use crate::services::progress::{self, ProgressReport};
use crate::AppState;

pub async fn overview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Json<OverviewResponse> {
    let profile = fetch_profile(
        state.backend.as_ref(),
        auth_user.id,
        &auth_user.access_token,
    )
    .await;

    let encouragement = encouragement::pick(&mut rand::thread_rng());

    Json(OverviewResponse {
        name: Profile::display_name(profile.as_ref()).to_string(),
        encouragement,
        tip: TWO_MINUTE_TIP,
    })
}

pub async fn progress() -> Json<ProgressReport> {
    Json(progress::report())
}
