use axum::extract::{Path, State};
use axum::Json;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use sortie_shared::errors::{AppError, AppResult, ErrorCode};
use sortie_shared::types::auth::AuthUser;
use sortie_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{NewProposal, Proposal};
use crate::routes::profile_for;
use crate::schema::proposals;
use crate::AppState;

// --- POST /proposals ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProposalBody {
    #[validate(length(min = 3, max = 80))]
    pub title: String,
    #[validate(length(min = 2, max = 40))]
    pub activity: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub city: String,
}

pub async fn create_proposal(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateProposalBody>,
) -> AppResult<Json<ApiResponse<Proposal>>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let new_proposal = NewProposal {
        creator_id: profile.id,
        title: body.title,
        activity: body.activity,
        description: body.description,
        city: body.city,
    };

    let proposal = diesel::insert_into(proposals::table)
        .values(&new_proposal)
        .get_result::<Proposal>(&mut conn)?;

    publisher::publish_proposal_created(&state.rabbitmq, &proposal).await;

    Ok(Json(ApiResponse::ok(proposal)))
}

// --- GET /proposals/mine ---

pub async fn list_my_proposals(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<Proposal>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let mine = proposals::table
        .filter(proposals::creator_id.eq(profile.id))
        .order(proposals::created_at.desc())
        .load::<Proposal>(&mut conn)?;

    Ok(Json(ApiResponse::ok(mine)))
}

// --- PATCH /proposals/:id/status ---

#[derive(Debug, Deserialize)]
pub struct SetProposalStatusBody {
    pub is_active: bool,
}

pub async fn set_proposal_status(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<Uuid>,
    Json(body): Json<SetProposalStatusBody>,
) -> AppResult<Json<ApiResponse<Proposal>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let proposal = proposals::table
        .find(proposal_id)
        .first::<Proposal>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ProposalNotFound, "proposal not found"))?;

    if proposal.creator_id != profile.id {
        return Err(AppError::new(
            ErrorCode::NotProposalOwner,
            "only the creator can change proposal status",
        ));
    }

    let updated = diesel::update(proposals::table.find(proposal.id))
        .set((
            proposals::is_active.eq(body.is_active),
            proposals::updated_at.eq(diesel::dsl::now),
        ))
        .get_result::<Proposal>(&mut conn)?;

    Ok(Json(ApiResponse::ok(updated)))
}
