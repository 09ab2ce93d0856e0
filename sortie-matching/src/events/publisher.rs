use uuid::Uuid;

use sortie_shared::clients::rabbitmq::RabbitMQClient;
use sortie_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{Match, Proposal};

pub async fn publish_proposal_created(rabbitmq: &RabbitMQClient, proposal: &Proposal) {
    let event = Event::new(
        "sortie-matching",
        routing_keys::MATCHING_PROPOSAL_CREATED,
        payloads::ProposalCreated {
            proposal_id: proposal.id,
            creator_id: proposal.creator_id,
            city: proposal.city.clone(),
        },
    )
    .with_user(proposal.creator_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::MATCHING_PROPOSAL_CREATED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish proposal.created event");
    }
}

pub async fn publish_request_submitted(
    rabbitmq: &RabbitMQClient,
    request_id: Uuid,
    proposal_id: Uuid,
    requester_id: Uuid,
    owner_id: Uuid,
    is_super_like: bool,
) {
    let event = Event::new(
        "sortie-matching",
        routing_keys::MATCHING_REQUEST_SUBMITTED,
        payloads::RequestSubmitted {
            request_id,
            proposal_id,
            requester_id,
            owner_id,
            is_super_like,
        },
    )
    .with_user(requester_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::MATCHING_REQUEST_SUBMITTED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish request.submitted event");
    }
}

pub async fn publish_request_responded(
    rabbitmq: &RabbitMQClient,
    request_id: Uuid,
    proposal_id: Uuid,
    requester_id: Uuid,
    accepted: bool,
) {
    let event = Event::new(
        "sortie-matching",
        routing_keys::MATCHING_REQUEST_RESPONDED,
        payloads::RequestResponded {
            request_id,
            proposal_id,
            requester_id,
            accepted,
        },
    )
    .with_user(requester_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::MATCHING_REQUEST_RESPONDED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish request.responded event");
    }
}

pub async fn publish_match_created(rabbitmq: &RabbitMQClient, matched: &Match) {
    let event = Event::new(
        "sortie-matching",
        routing_keys::MATCHING_MATCH_CREATED,
        payloads::MatchCreated {
            match_id: matched.id,
            proposal_id: matched.proposal_id,
            user1_id: matched.user1_id,
            user2_id: matched.user2_id,
        },
    );

    if let Err(e) = rabbitmq
        .publish(routing_keys::MATCHING_MATCH_CREATED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish match.created event");
    }
}

pub async fn publish_match_deleted(rabbitmq: &RabbitMQClient, match_id: Uuid, deleted_by: Uuid) {
    let event = Event::new(
        "sortie-matching",
        routing_keys::MATCHING_MATCH_DELETED,
        payloads::MatchDeleted {
            match_id,
            deleted_by,
        },
    )
    .with_user(deleted_by);

    if let Err(e) = rabbitmq
        .publish(routing_keys::MATCHING_MATCH_DELETED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish match.deleted event");
    }
}
