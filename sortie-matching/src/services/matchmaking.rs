use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use sortie_shared::errors::AppResult;

use crate::models::{Match, NewMatch, ProposalRequest, RequestStatus};
use crate::schema::{matches, proposal_requests, proposals};

/// Canonical ordering for an unordered user pair. Matches are stored
/// with `user1_id < user2_id`, so both directions of a reciprocal pair
/// converge on the same row.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A pending request by the proposal owner, joined with the creator of
/// the proposal it targets.
#[derive(Debug, Clone)]
pub struct ReverseCandidate {
    pub request_id: Uuid,
    pub proposal_id: Uuid,
    pub target_owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Pick the reverse edge that completes a reciprocal pair.
///
/// The owner's pending requests are scanned most-recent-first and the
/// first one whose target proposal belongs to `requester_id` wins. The
/// lookup is keyed by the owner's identity, not by a specific proposal
/// pair: when the owner has several outstanding requests toward the
/// requester, the match can anchor to a different proposal than the one
/// just requested. That per-user (rather than per-pair) scope is
/// intentional; see DESIGN.md before narrowing it.
pub fn select_reverse_request(
    candidates: &[ReverseCandidate],
    requester_id: Uuid,
) -> Option<&ReverseCandidate> {
    candidates
        .iter()
        .filter(|c| c.target_owner_id == requester_id)
        .max_by_key(|c| c.created_at)
}

/// Load the proposal owner's pending requests together with the creator
/// of each targeted proposal.
pub fn load_reverse_candidates(
    conn: &mut PgConnection,
    owner_id: Uuid,
) -> AppResult<Vec<ReverseCandidate>> {
    let rows: Vec<(ProposalRequest, Uuid)> = proposal_requests::table
        .inner_join(proposals::table)
        .filter(proposal_requests::requester_id.eq(owner_id))
        .filter(proposal_requests::status.eq(RequestStatus::Pending.as_str()))
        .order(proposal_requests::created_at.desc())
        .select((ProposalRequest::as_select(), proposals::creator_id))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(req, creator_id)| ReverseCandidate {
            request_id: req.id,
            proposal_id: req.proposal_id,
            target_owner_id: creator_id,
            created_at: req.created_at,
        })
        .collect())
}

/// Check whether the proposal owner has, symmetrically, requested one of
/// the requester's proposals. On mutual interest the match is
/// materialized and both requests flip to accepted.
pub fn check_reciprocal(
    conn: &mut PgConnection,
    proposal_id: Uuid,
    owner_id: Uuid,
    requester_id: Uuid,
    new_request_id: Uuid,
) -> AppResult<Option<Match>> {
    let candidates = load_reverse_candidates(conn, owner_id)?;
    let Some(reverse) = select_reverse_request(&candidates, requester_id).cloned() else {
        return Ok(None);
    };

    // The join already scoped the lookup, but re-read ownership before
    // committing to a match: the candidate row may have changed hands
    // between the load and now.
    let still_owned: i64 = proposals::table
        .filter(proposals::id.eq(reverse.proposal_id))
        .filter(proposals::creator_id.eq(requester_id))
        .count()
        .get_result(conn)?;
    if still_owned == 0 {
        return Ok(None);
    }

    let matched = create_match_if_absent(conn, proposal_id, requester_id, owner_id)?;

    diesel::update(
        proposal_requests::table
            .filter(proposal_requests::id.eq_any([new_request_id, reverse.request_id])),
    )
    .set(proposal_requests::status.eq(RequestStatus::Accepted.as_str()))
    .execute(conn)?;

    tracing::info!(
        match_id = %matched.id,
        requester_id = %requester_id,
        owner_id = %owner_id,
        reverse_request_id = %reverse.request_id,
        "reciprocal requests matched"
    );

    Ok(Some(matched))
}

/// Create the canonical match row for an unordered pair, exactly once.
/// The UNIQUE (user1_id, user2_id) constraint backs the insert; a lost
/// race falls through to re-selecting the winner's row.
pub fn create_match_if_absent(
    conn: &mut PgConnection,
    proposal_id: Uuid,
    user_a: Uuid,
    user_b: Uuid,
) -> AppResult<Match> {
    let (user1_id, user2_id) = canonical_pair(user_a, user_b);

    let existing = matches::table
        .filter(matches::user1_id.eq(user1_id))
        .filter(matches::user2_id.eq(user2_id))
        .first::<Match>(conn)
        .optional()?;

    if let Some(found) = existing {
        return Ok(found);
    }

    let inserted = diesel::insert_into(matches::table)
        .values(&NewMatch {
            proposal_id,
            user1_id,
            user2_id,
        })
        .on_conflict((matches::user1_id, matches::user2_id))
        .do_nothing()
        .get_result::<Match>(conn)
        .optional()?;

    match inserted {
        Some(created) => Ok(created),
        // Concurrent reciprocal submission won the insert
        None => matches::table
            .filter(matches::user1_id.eq(user1_id))
            .filter(matches::user2_id.eq(user2_id))
            .first::<Match>(conn)
            .map_err(Into::into),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_756_000_000 + secs, 0).unwrap()
    }

    fn candidate(target_owner: Uuid, secs: i64) -> ReverseCandidate {
        ReverseCandidate {
            request_id: Uuid::new_v4(),
            proposal_id: Uuid::new_v4(),
            target_owner_id: target_owner,
            created_at: at(secs),
        }
    }

    #[test]
    fn canonical_pair_is_direction_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(canonical_pair(a, b), canonical_pair(b, a));

        let (lo, hi) = canonical_pair(a, b);
        assert!(lo < hi);
    }

    #[test]
    fn no_reverse_edge_means_no_match() {
        let requester = Uuid::new_v4();
        assert!(select_reverse_request(&[], requester).is_none());

        // Owner has pending requests, none toward the requester
        let others = vec![candidate(Uuid::new_v4(), 0), candidate(Uuid::new_v4(), 10)];
        assert!(select_reverse_request(&others, requester).is_none());
    }

    #[test]
    fn ownership_check_filters_foreign_proposals() {
        let requester = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let candidates = vec![candidate(stranger, 20), candidate(requester, 10)];

        let picked = select_reverse_request(&candidates, requester).unwrap();
        assert_eq!(picked.target_owner_id, requester);
        assert_eq!(picked.created_at, at(10));
    }

    #[test]
    fn most_recent_request_wins_when_several_qualify() {
        // Two outstanding requests from the owner toward two different
        // proposals of the same requester: the newer one anchors the
        // match, regardless of which proposal triggered reciprocity.
        let requester = Uuid::new_v4();
        let older = candidate(requester, 5);
        let newer = candidate(requester, 50);
        let candidates = vec![older.clone(), newer.clone()];

        let picked = select_reverse_request(&candidates, requester).unwrap();
        assert_eq!(picked.request_id, newer.request_id);
        assert_ne!(picked.request_id, older.request_id);
    }
}
