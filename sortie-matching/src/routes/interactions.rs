use axum::extract::State;
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use sortie_shared::errors::{AppError, AppResult};
use sortie_shared::types::auth::AuthUser;
use sortie_shared::types::ApiResponse;

use crate::models::{InteractionType, NewUserInteraction, UserInteraction};
use crate::routes::profile_for;
use crate::schema::user_interactions;
use crate::AppState;

// --- POST /interactions ---

#[derive(Debug, Deserialize)]
pub struct RecordInteractionBody {
    pub proposal_id: Uuid,
    pub interaction_type: InteractionType,
}

/// One row per (user, proposal): a changed disposition overwrites the
/// previous one, a repeated identical call is a no-op. Safe under
/// concurrent submissions because the conflict target does the work.
pub async fn record_interaction(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecordInteractionBody>,
) -> AppResult<Json<ApiResponse<UserInteraction>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let interaction = diesel::insert_into(user_interactions::table)
        .values(&NewUserInteraction {
            user_id: profile.id,
            proposal_id: body.proposal_id,
            interaction_type: body.interaction_type.to_string(),
        })
        .on_conflict((user_interactions::user_id, user_interactions::proposal_id))
        .do_update()
        .set((
            user_interactions::interaction_type.eq(body.interaction_type.as_str()),
            user_interactions::updated_at.eq(diesel::dsl::now),
        ))
        .get_result::<UserInteraction>(&mut conn)?;

    Ok(Json(ApiResponse::ok(interaction)))
}
