use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use sortie_shared::errors::{AppError, AppResult};
use sortie_shared::types::auth::AuthUser;
use sortie_shared::types::ApiResponse;

use crate::models::{DiscoverFeedEntry, NewDiscoverFeedEntry, Profile, Proposal};
use crate::routes::profile_for;
use crate::schema::{discover_feed, profiles, proposals};
use crate::services::feed::{filter_feed_page, CreatorFilters, FEED_FETCH_SIZE};
use crate::AppState;

// --- GET /discover ---

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub city: Option<String>,
    pub interest: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedItem {
    pub proposal: Proposal,
    pub creator: CreatorCard,
}

#[derive(Debug, Serialize)]
pub struct CreatorCard {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub city: Option<String>,
}

pub async fn get_feed(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<ApiResponse<Vec<FeedItem>>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;
    let today = Utc::now().date_naive();

    // Everything already shown to this user is excluded forever
    let shown_ids: Vec<Uuid> = discover_feed::table
        .filter(discover_feed::user_id.eq(profile.id))
        .filter(discover_feed::shown.eq(true))
        .select(discover_feed::proposal_id)
        .load(&mut conn)?;

    let mut query = proposals::table
        .inner_join(profiles::table)
        .filter(proposals::is_active.eq(true))
        .filter(proposals::creator_id.ne(profile.id))
        .select((Proposal::as_select(), Profile::as_select()))
        .into_boxed();

    if !shown_ids.is_empty() {
        query = query.filter(proposals::id.ne_all(shown_ids));
    }
    if let Some(city) = params.city.as_deref().filter(|c| !c.trim().is_empty()) {
        query = query.filter(proposals::city.ilike(format!("%{}%", city.trim())));
    }
    if let Some(interest) = params.interest.as_deref().filter(|i| !i.trim().is_empty()) {
        query = query.filter(proposals::activity.ilike(format!("%{}%", interest.trim())));
    }

    let rows: Vec<(Proposal, Profile)> = query
        .order((proposals::is_boosted.desc(), proposals::created_at.desc()))
        .limit(FEED_FETCH_SIZE)
        .load(&mut conn)?;

    // Age and gender live on the joined creator profile, filtered here
    let filters = CreatorFilters {
        age_min: params.age_min,
        age_max: params.age_max,
        gender: params.gender,
    };
    let page = filter_feed_page(rows, &filters, today);

    let items = page
        .into_iter()
        .map(|(proposal, creator)| FeedItem {
            creator: CreatorCard {
                id: creator.id,
                display_name: creator.display_name.clone(),
                age: creator.age_on(today),
                gender: creator.gender.clone(),
                city: creator.city,
            },
            proposal,
        })
        .collect();

    Ok(Json(ApiResponse::ok(items)))
}

// --- POST /discover/seen/:proposal_id ---

#[derive(Debug, Serialize)]
pub struct MarkShownResponse {
    pub recorded: bool,
}

/// Record that a proposal was presented to the caller so the feed never
/// repeats it. Update first; when no row exists, fall back to an insert
/// whose lost race against a concurrent writer is the same outcome.
pub async fn mark_shown(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MarkShownResponse>>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let profile = profile_for(&mut conn, user.id)?;

    let updated = diesel::update(
        discover_feed::table
            .filter(discover_feed::user_id.eq(profile.id))
            .filter(discover_feed::proposal_id.eq(proposal_id)),
    )
    .set(discover_feed::shown.eq(true))
    .get_result::<DiscoverFeedEntry>(&mut conn)
    .optional()?;

    if updated.is_none() {
        diesel::insert_into(discover_feed::table)
            .values(&NewDiscoverFeedEntry {
                user_id: profile.id,
                proposal_id,
                shown: true,
                position: 0,
            })
            .on_conflict((discover_feed::user_id, discover_feed::proposal_id))
            .do_nothing()
            .execute(&mut conn)?;
    }

    Ok(Json(ApiResponse::ok(MarkShownResponse { recorded: true })))
}
