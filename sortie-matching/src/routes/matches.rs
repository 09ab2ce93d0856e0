use axum::extract::{Path, Query, State};
use axum::Json;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use sortie_shared::errors::{AppError, AppResult, ErrorCode};
use sortie_shared::types::auth::AuthUser;
use sortie_shared::types::{ApiResponse, Paginated, PaginationParams};

use crate::events::publisher;
use crate::models::Match;
use crate::routes::profile_for;
use crate::schema::matches;
use crate::AppState;

// --- GET /matches ---

/// The caller's matches, hiding rows the caller soft-deleted. A row the
/// other side deleted still shows up here.
pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Match>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let visible = matches::table
        .filter(
            matches::user1_id
                .eq(profile.id)
                .or(matches::user2_id.eq(profile.id)),
        )
        .filter(
            matches::deleted_by
                .is_null()
                .or(matches::deleted_by.ne(profile.id)),
        );

    let total: i64 = visible.clone().count().get_result(&mut conn)?;

    let rows = visible
        .order(matches::matched_at.desc())
        .offset(params.offset() as i64)
        .limit(params.limit() as i64)
        .load::<Match>(&mut conn)?;

    Ok(Json(ApiResponse::ok(Paginated::new(
        rows,
        total as u64,
        &params,
    ))))
}

// --- DELETE /matches/:id ---

pub async fn delete_match(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Match>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let found = matches::table
        .find(match_id)
        .first::<Match>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    if found.user1_id != profile.id && found.user2_id != profile.id {
        return Err(AppError::new(
            ErrorCode::NotMatchMember,
            "not a member of this match",
        ));
    }

    // Soft delete: the row stays canonical for the pair, it just stops
    // showing up for whoever removed it
    let updated = diesel::update(matches::table.find(found.id))
        .set(matches::deleted_by.eq(profile.id))
        .get_result::<Match>(&mut conn)?;

    publisher::publish_match_deleted(&state.rabbitmq, updated.id, profile.id).await;

    Ok(Json(ApiResponse::ok(updated)))
}
