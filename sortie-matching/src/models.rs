use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{discover_feed, matches, profiles, proposal_requests, proposals, user_interactions};

// --- Profile ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: Uuid,
    pub credential_id: Uuid,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub is_premium: bool,
    pub daily_proposals_sent: i32,
    pub daily_super_likes_used: i32,
    pub last_reset_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.birth_date
            .and_then(|birth| today.years_since(birth))
            .map(|years| years as i32)
    }
}

// --- Proposal ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = proposals)]
pub struct Proposal {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub activity: String,
    pub description: Option<String>,
    pub city: String,
    pub is_active: bool,
    pub is_boosted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = proposals)]
pub struct NewProposal {
    pub creator_id: Uuid,
    pub title: String,
    pub activity: String,
    pub description: Option<String>,
    pub city: String,
}

// --- ProposalRequest ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    AutoRejected,
}

impl RequestStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::AutoRejected => "auto_rejected",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            "auto_rejected" => Ok(RequestStatus::AutoRejected),
            _ => Err(format!("unknown request status: {s}")),
        }
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = proposal_requests)]
pub struct ProposalRequest {
    pub id: Uuid,
    pub proposal_id: Uuid,
    pub requester_id: Uuid,
    pub status: String,
    pub is_super_like: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = proposal_requests)]
pub struct NewProposalRequest {
    pub proposal_id: Uuid,
    pub requester_id: Uuid,
    pub status: String,
    pub is_super_like: bool,
}

// --- Match ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub proposal_id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub matched_at: DateTime<Utc>,
    pub deleted_by: Option<Uuid>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub proposal_id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
}

// --- DiscoverFeedEntry ---

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = discover_feed)]
pub struct DiscoverFeedEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub proposal_id: Uuid,
    pub shown: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = discover_feed)]
pub struct NewDiscoverFeedEntry {
    pub user_id: Uuid,
    pub proposal_id: Uuid,
    pub shown: bool,
    pub position: i32,
}

// --- UserInteraction ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Like,
    Dislike,
    SuperLike,
}

impl InteractionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Like => "like",
            InteractionType::Dislike => "dislike",
            InteractionType::SuperLike => "super_like",
        }
    }
}

impl std::fmt::Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InteractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(InteractionType::Like),
            "dislike" => Ok(InteractionType::Dislike),
            "super_like" => Ok(InteractionType::SuperLike),
            _ => Err(format!("unknown interaction type: {s}")),
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = user_interactions)]
pub struct UserInteraction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub proposal_id: Uuid,
    pub interaction_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_interactions)]
pub struct NewUserInteraction {
    pub user_id: Uuid,
    pub proposal_id: Uuid,
    pub interaction_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn request_status_round_trips() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Rejected,
            RequestStatus::AutoRejected,
        ] {
            assert_eq!(RequestStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(RequestStatus::from_str("cancelled").is_err());
    }

    #[test]
    fn interaction_type_serde_matches_db_strings() {
        let json = serde_json::to_string(&InteractionType::SuperLike).unwrap();
        assert_eq!(json, "\"super_like\"");
        assert_eq!(
            InteractionType::from_str("super_like"),
            Ok(InteractionType::SuperLike)
        );
    }
}
