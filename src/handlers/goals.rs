use axum::{extract::Query, Json};

use crate::dto::GoalsQuery;
use crate::services::goals::{self, AdaptedGoals, DEFAULT_LEVEL};

pub async fn get_goals(Query(query): Query<GoalsQuery>) -> Json<AdaptedGoals> {
    let energy = query.energy.unwrap_or(DEFAULT_LEVEL);
    let mood = query.mood.unwrap_or(DEFAULT_LEVEL);
    Json(goals::adapt(energy, mood))
}
