use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use sortie_shared::errors::{AppError, AppResult, ErrorCode};
use sortie_shared::types::auth::AuthUser;
use sortie_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::{Match, NewProposalRequest, Proposal, ProposalRequest, RequestStatus};
use crate::routes::profile_for;
use crate::schema::{profiles, proposal_requests, proposals};
use crate::services::matchmaking;
use crate::services::quota::{apply_daily_reset, DailyQuota};
use crate::AppState;

// --- POST /requests ---

#[derive(Debug, Deserialize)]
pub struct SubmitRequestBody {
    pub proposal_id: Uuid,
    #[serde(default)]
    pub is_super_like: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitRequestResponse {
    pub request: ProposalRequest,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_with: Option<Match>,
}

pub async fn submit_request(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitRequestBody>,
) -> AppResult<Json<ApiResponse<SubmitRequestResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let requester = profile_for(&mut conn, user.id)?;

    let proposal = proposals::table
        .find(body.proposal_id)
        .first::<Proposal>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ProposalNotFound, "proposal not found"))?;

    if !proposal.is_active {
        return Err(AppError::new(
            ErrorCode::ProposalInactive,
            "proposal is no longer active",
        ));
    }
    if proposal.creator_id == requester.id {
        return Err(AppError::new(
            ErrorCode::CannotRequestOwnProposal,
            "cannot request your own proposal",
        ));
    }

    // Lazy daily reset: persist before evaluating admission so a refused
    // request still lands on a reset profile
    let today = Utc::now().date_naive();
    let snapshot = DailyQuota::from_profile(&requester);
    let current = apply_daily_reset(snapshot, today);
    if current != snapshot {
        diesel::update(profiles::table.find(requester.id))
            .set((
                profiles::daily_proposals_sent.eq(0),
                profiles::daily_super_likes_used.eq(0),
                profiles::last_reset_date.eq(today),
            ))
            .execute(&mut conn)?;
    }

    let policy = state.config.quota_policy();
    if !policy.admit_proposal(&current, requester.is_premium) {
        return Err(AppError::new(
            ErrorCode::ProposalQuotaExceeded,
            "daily proposal request limit reached",
        ));
    }
    if body.is_super_like && !policy.admit_super_like(&current, requester.is_premium) {
        return Err(AppError::new(
            ErrorCode::SuperLikeQuotaExceeded,
            "daily super-like limit reached",
        ));
    }

    // UNIQUE (requester_id, proposal_id) decides duplicates, not a prior
    // read; zero rows back means somebody (possibly us) already holds it
    let new_request = NewProposalRequest {
        proposal_id: proposal.id,
        requester_id: requester.id,
        status: RequestStatus::Pending.to_string(),
        is_super_like: body.is_super_like,
    };

    let inserted = diesel::insert_into(proposal_requests::table)
        .values(&new_request)
        .on_conflict((
            proposal_requests::requester_id,
            proposal_requests::proposal_id,
        ))
        .do_nothing()
        .get_result::<ProposalRequest>(&mut conn)
        .optional()?;

    let Some(mut request) = inserted else {
        return Err(AppError::new(
            ErrorCode::AlreadyRequested,
            "you already requested this proposal",
        ));
    };

    let reciprocity = matchmaking::check_reciprocal(
        &mut conn,
        proposal.id,
        proposal.creator_id,
        requester.id,
        request.id,
    )?;

    // Counters are bumped last: a crash before this point under-counts,
    // never over-counts
    if body.is_super_like {
        diesel::update(profiles::table.find(requester.id))
            .set((
                profiles::daily_proposals_sent.eq(profiles::daily_proposals_sent + 1),
                profiles::daily_super_likes_used.eq(profiles::daily_super_likes_used + 1),
            ))
            .execute(&mut conn)?;
    } else {
        diesel::update(profiles::table.find(requester.id))
            .set(profiles::daily_proposals_sent.eq(profiles::daily_proposals_sent + 1))
            .execute(&mut conn)?;
    }

    publisher::publish_request_submitted(
        &state.rabbitmq,
        request.id,
        proposal.id,
        requester.id,
        proposal.creator_id,
        body.is_super_like,
    )
    .await;

    let matched_with = if let Some(matched) = reciprocity {
        request.status = RequestStatus::Accepted.to_string();
        publisher::publish_match_created(&state.rabbitmq, &matched).await;
        Some(matched)
    } else {
        None
    };

    Ok(Json(ApiResponse::ok(SubmitRequestResponse {
        matched: matched_with.is_some(),
        matched_with,
        request,
    })))
}

// --- GET /requests/outgoing ---

pub async fn list_outgoing(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<ProposalRequest>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let requests = proposal_requests::table
        .filter(proposal_requests::requester_id.eq(profile.id))
        .order(proposal_requests::created_at.desc())
        .load::<ProposalRequest>(&mut conn)?;

    Ok(Json(ApiResponse::ok(requests)))
}

// --- GET /requests/incoming ---

/// Pending requests against any of the caller's proposals.
pub async fn list_incoming(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<ProposalRequest>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let requests = proposal_requests::table
        .inner_join(proposals::table)
        .filter(proposals::creator_id.eq(profile.id))
        .filter(proposal_requests::status.eq(RequestStatus::Pending.as_str()))
        .order(proposal_requests::created_at.desc())
        .select(ProposalRequest::as_select())
        .load::<ProposalRequest>(&mut conn)?;

    Ok(Json(ApiResponse::ok(requests)))
}

// --- PUT /requests/:id/respond ---

#[derive(Debug, Deserialize)]
pub struct RespondRequestBody {
    pub accepted: bool,
}

#[derive(Debug, Serialize)]
pub struct RespondRequestResponse {
    pub request: ProposalRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_with: Option<Match>,
}

/// Explicit acceptance path: the proposal owner resolves a pending
/// request without having issued a reverse request of their own.
pub async fn respond_request(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<RespondRequestBody>,
) -> AppResult<Json<ApiResponse<RespondRequestResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let request = proposal_requests::table
        .find(request_id)
        .first::<ProposalRequest>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::RequestNotFound, "request not found"))?;

    let proposal = proposals::table
        .find(request.proposal_id)
        .first::<Proposal>(&mut conn)?;

    if proposal.creator_id != profile.id {
        return Err(AppError::new(
            ErrorCode::NotProposalOwner,
            "only the proposal owner can respond",
        ));
    }
    if request.status != RequestStatus::Pending.as_str() {
        return Err(AppError::new(
            ErrorCode::RequestAlreadyResolved,
            "request has already been resolved",
        ));
    }

    let next_status = if body.accepted {
        RequestStatus::Accepted
    } else {
        RequestStatus::Rejected
    };

    let request = diesel::update(proposal_requests::table.find(request.id))
        .set(proposal_requests::status.eq(next_status.as_str()))
        .get_result::<ProposalRequest>(&mut conn)?;

    let matched_with = if body.accepted {
        let matched = matchmaking::create_match_if_absent(
            &mut conn,
            proposal.id,
            request.requester_id,
            profile.id,
        )?;
        publisher::publish_match_created(&state.rabbitmq, &matched).await;
        Some(matched)
    } else {
        None
    };

    publisher::publish_request_responded(
        &state.rabbitmq,
        request.id,
        proposal.id,
        request.requester_id,
        body.accepted,
    )
    .await;

    Ok(Json(ApiResponse::ok(RespondRequestResponse {
        request,
        matched_with,
    })))
}
