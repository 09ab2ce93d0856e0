use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Profile;

/// Snapshot of a profile's daily counters. Pure data: the route layer
/// loads it from the row, applies the lazy reset, persists the reset if
/// one happened, and evaluates admission against the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyQuota {
    pub proposals_sent: i32,
    pub super_likes_used: i32,
    pub last_reset_date: NaiveDate,
}

impl DailyQuota {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            proposals_sent: profile.daily_proposals_sent,
            super_likes_used: profile.daily_super_likes_used,
            last_reset_date: profile.last_reset_date,
        }
    }
}

/// Zero the counters and stamp `today` iff the calendar day has rolled
/// over since the last reset. Idempotent for a given `today`; `today` is
/// injected so tests never depend on the wall clock.
pub fn apply_daily_reset(quota: DailyQuota, today: NaiveDate) -> DailyQuota {
    if quota.last_reset_date == today {
        return quota;
    }
    DailyQuota {
        proposals_sent: 0,
        super_likes_used: 0,
        last_reset_date: today,
    }
}

/// Per-day admission limits for non-premium profiles. Premium profiles
/// are unconstrained.
#[derive(Debug, Clone, Copy)]
pub struct QuotaPolicy {
    pub daily_proposals: i32,
    pub daily_super_likes: i32,
}

impl QuotaPolicy {
    pub fn admit_proposal(&self, quota: &DailyQuota, is_premium: bool) -> bool {
        is_premium || quota.proposals_sent < self.daily_proposals
    }

    pub fn admit_super_like(&self, quota: &DailyQuota, is_premium: bool) -> bool {
        is_premium || quota.super_likes_used < self.daily_super_likes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn policy() -> QuotaPolicy {
        QuotaPolicy {
            daily_proposals: 5,
            daily_super_likes: 1,
        }
    }

    fn quota(sent: i32, supers: i32, last_reset: &str) -> DailyQuota {
        DailyQuota {
            proposals_sent: sent,
            super_likes_used: supers,
            last_reset_date: day(last_reset),
        }
    }

    #[test]
    fn reset_fires_once_per_day() {
        let today = day("2026-08-28");
        let stale = quota(4, 1, "2026-08-27");

        let reset = apply_daily_reset(stale, today);
        assert_eq!(reset.proposals_sent, 0);
        assert_eq!(reset.super_likes_used, 0);
        assert_eq!(reset.last_reset_date, today);

        // A second admission check the same day must not reset again
        let bumped = DailyQuota {
            proposals_sent: 2,
            ..reset
        };
        assert_eq!(apply_daily_reset(bumped, today), bumped);
    }

    #[test]
    fn reset_handles_multi_day_gap() {
        let resumed = apply_daily_reset(quota(5, 1, "2026-08-01"), day("2026-08-28"));
        assert_eq!(resumed.proposals_sent, 0);
        assert_eq!(resumed.last_reset_date, day("2026-08-28"));
    }

    #[test]
    fn proposal_ceiling_is_five_for_free_profiles() {
        let p = policy();
        for sent in 0..5 {
            assert!(p.admit_proposal(&quota(sent, 0, "2026-08-28"), false));
        }
        assert!(!p.admit_proposal(&quota(5, 0, "2026-08-28"), false));
        assert!(!p.admit_proposal(&quota(9, 0, "2026-08-28"), false));
    }

    #[test]
    fn super_like_ceiling_is_one_for_free_profiles() {
        let p = policy();
        assert!(p.admit_super_like(&quota(0, 0, "2026-08-28"), false));
        assert!(!p.admit_super_like(&quota(0, 1, "2026-08-28"), false));
    }

    #[test]
    fn premium_is_never_blocked() {
        let p = policy();
        assert!(p.admit_proposal(&quota(250, 40, "2026-08-28"), true));
        assert!(p.admit_super_like(&quota(250, 40, "2026-08-28"), true));
    }

    #[test]
    fn sixth_request_blocked_until_rollover() {
        let p = policy();
        let mut q = quota(0, 0, "2026-08-27");

        // Five admissions on the 27th, counter bumped after each success
        for _ in 0..5 {
            q = apply_daily_reset(q, day("2026-08-27"));
            assert!(p.admit_proposal(&q, false));
            q.proposals_sent += 1;
        }

        // Sixth is refused the same day
        q = apply_daily_reset(q, day("2026-08-27"));
        assert!(!p.admit_proposal(&q, false));

        // Re-issued after midnight it passes, and counters read 1/5
        q = apply_daily_reset(q, day("2026-08-28"));
        assert!(p.admit_proposal(&q, false));
        q.proposals_sent += 1;
        assert_eq!(q.proposals_sent, 1);
        assert_eq!(q.super_likes_used, 0);
    }
}
