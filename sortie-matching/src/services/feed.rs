use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{Profile, Proposal};

/// Hard cap on a single discover page.
pub const FEED_PAGE_SIZE: usize = 20;

/// How many rows to over-fetch before the in-process filters run, so a
/// page survives aggressive age/gender filtering.
pub const FEED_FETCH_SIZE: i64 = 100;

/// Creator-level filters that cannot be pushed into the proposal query:
/// age and gender live on the joined profile, so they are applied in
/// process after the rows come back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorFilters {
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
    pub gender: Option<String>,
}

impl CreatorFilters {
    fn admits(&self, creator: &Profile, today: NaiveDate) -> bool {
        if let Some(wanted) = &self.gender {
            match &creator.gender {
                Some(g) if g.eq_ignore_ascii_case(wanted) => {}
                _ => return false,
            }
        }

        if self.age_min.is_some() || self.age_max.is_some() {
            // Unknown birth date cannot satisfy an age bound
            let Some(age) = creator.age_on(today) else {
                return false;
            };
            if self.age_min.is_some_and(|min| age < min) {
                return false;
            }
            if self.age_max.is_some_and(|max| age > max) {
                return false;
            }
        }

        true
    }
}

/// Apply creator filters to the fetched page and cap the result. Rows
/// arrive already ordered boosted-first, so truncation keeps boosted
/// proposals at the front.
pub fn filter_feed_page(
    rows: Vec<(Proposal, Profile)>,
    filters: &CreatorFilters,
    today: NaiveDate,
) -> Vec<(Proposal, Profile)> {
    let mut kept: Vec<(Proposal, Profile)> = rows
        .into_iter()
        .filter(|(_, creator)| filters.admits(creator, today))
        .collect();
    kept.truncate(FEED_PAGE_SIZE);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn creator(birth: Option<&str>, gender: Option<&str>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            credential_id: Uuid::new_v4(),
            display_name: None,
            bio: None,
            birth_date: birth.map(|b| day(b)),
            gender: gender.map(String::from),
            city: Some("Lyon".into()),
            is_premium: false,
            daily_proposals_sent: 0,
            daily_super_likes_used: 0,
            last_reset_date: day("2026-08-28"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn proposal(boosted: bool) -> Proposal {
        Proposal {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            title: "Escalade en salle".into(),
            activity: "climbing".into(),
            description: None,
            city: "Lyon".into(),
            is_active: true,
            is_boosted: boosted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn age_range_filters_on_creator_birth_date() {
        let today = day("2026-08-28");
        let filters = CreatorFilters {
            age_min: Some(25),
            age_max: Some(35),
            gender: None,
        };

        let rows = vec![
            (proposal(false), creator(Some("1998-03-14"), None)), // 28
            (proposal(false), creator(Some("2006-01-01"), None)), // 20
            (proposal(false), creator(Some("1985-01-01"), None)), // 41
        ];

        let kept = filter_feed_page(rows, &filters, today);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].1.birth_date, Some(day("1998-03-14")));
    }

    #[test]
    fn unknown_birth_date_fails_age_bounds() {
        let filters = CreatorFilters {
            age_min: Some(18),
            age_max: None,
            gender: None,
        };
        let rows = vec![(proposal(false), creator(None, None))];
        assert!(filter_feed_page(rows, &filters, day("2026-08-28")).is_empty());
    }

    #[test]
    fn gender_filter_is_case_insensitive() {
        let filters = CreatorFilters {
            age_min: None,
            age_max: None,
            gender: Some("woman".into()),
        };
        let rows = vec![
            (proposal(false), creator(None, Some("Woman"))),
            (proposal(false), creator(None, Some("man"))),
            (proposal(false), creator(None, None)),
        ];
        let kept = filter_feed_page(rows, &filters, day("2026-08-28"));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn page_is_capped_and_keeps_input_order() {
        let rows: Vec<(Proposal, Profile)> = (0..30)
            .map(|i| (proposal(i < 3), creator(None, None)))
            .collect();

        let kept = filter_feed_page(rows, &CreatorFilters::default(), day("2026-08-28"));
        assert_eq!(kept.len(), FEED_PAGE_SIZE);
        // Boosted rows were first in and stay first
        assert!(kept[0].0.is_boosted && kept[2].0.is_boosted);
        assert!(!kept[3].0.is_boosted);
    }
}
