use axum::extract::State;
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use sortie_shared::errors::{AppError, AppResult};
use sortie_shared::types::auth::AuthUser;
use sortie_shared::types::ApiResponse;

use crate::routes::profile_for;
use crate::schema::profiles;
use crate::services::quota::{apply_daily_reset, DailyQuota};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub proposals_sent: i32,
    pub super_likes_used: i32,
    pub daily_proposal_limit: i32,
    pub daily_super_like_limit: i32,
    pub is_premium: bool,
}

// --- GET /quota ---

/// Current counters after the lazy reset. Reading the quota is itself a
/// write when the day has rolled over.
pub async fn get_quota(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<QuotaResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let today = Utc::now().date_naive();
    let snapshot = DailyQuota::from_profile(&profile);
    let current = apply_daily_reset(snapshot, today);
    if current != snapshot {
        diesel::update(profiles::table.find(profile.id))
            .set((
                profiles::daily_proposals_sent.eq(0),
                profiles::daily_super_likes_used.eq(0),
                profiles::last_reset_date.eq(today),
            ))
            .execute(&mut conn)?;
    }

    Ok(Json(ApiResponse::ok(QuotaResponse {
        proposals_sent: current.proposals_sent,
        super_likes_used: current.super_likes_used,
        daily_proposal_limit: state.config.free_daily_proposals,
        daily_super_like_limit: state.config.free_daily_super_likes,
        is_premium: profile.is_premium,
    })))
}
