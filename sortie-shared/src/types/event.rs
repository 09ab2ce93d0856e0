use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ event envelope wrapping all domain events.
///
/// Routing key format: `sortie.{domain}.{entity}.{action}`
/// Example: `sortie.matching.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Matching events
    pub const MATCHING_PROPOSAL_CREATED: &str = "sortie.matching.proposal.created";
    pub const MATCHING_REQUEST_SUBMITTED: &str = "sortie.matching.request.submitted";
    pub const MATCHING_REQUEST_RESPONDED: &str = "sortie.matching.request.responded";
    pub const MATCHING_MATCH_CREATED: &str = "sortie.matching.match.created";
    pub const MATCHING_MATCH_DELETED: &str = "sortie.matching.match.deleted";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProposalCreated {
        pub proposal_id: Uuid,
        pub creator_id: Uuid,
        pub city: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RequestSubmitted {
        pub request_id: Uuid,
        pub proposal_id: Uuid,
        pub requester_id: Uuid,
        pub owner_id: Uuid,
        pub is_super_like: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RequestResponded {
        pub request_id: Uuid,
        pub proposal_id: Uuid,
        pub requester_id: Uuid,
        pub accepted: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub proposal_id: Uuid,
        pub user1_id: Uuid,
        pub user2_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchDeleted {
        pub match_id: Uuid,
        pub deleted_by: Uuid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_user_and_correlation() {
        let user = Uuid::new_v4();
        let corr = Uuid::new_v4();
        let event = Event::new(
            "sortie-matching",
            routing_keys::MATCHING_MATCH_CREATED,
            payloads::MatchCreated {
                match_id: Uuid::new_v4(),
                proposal_id: Uuid::new_v4(),
                user1_id: Uuid::new_v4(),
                user2_id: Uuid::new_v4(),
            },
        )
        .with_user(user)
        .with_correlation(corr);

        assert_eq!(event.user_id, Some(user));
        assert_eq!(event.correlation_id, Some(corr));
        assert_eq!(event.event_type, "sortie.matching.match.created");
    }
}
