//! Substring search over the race catalog.
//!
//! A query is normalized once, then the catalog is scanned front to back.
//! An event matches when the normalized query appears anywhere in its
//! normalized name or location. Results come back in catalog order and the
//! scan stops at `limit` matches; there is no ranking.
//!
//! The scan is linear per query. Catalogs hold tens to low hundreds of races,
//! well below the point where a prebuilt index would pay for itself.

use std::num::NonZeroUsize;

use crate::{normalize, RaceCatalog, RaceEvent};

/// A query normalized once and reused across every event in the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    normalized: String,
    match_date_text: bool,
}

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        Self {
            normalized: normalize(query),
            match_date_text: false,
        }
    }

    /// Also match against the event's Spanish date label.
    pub fn with_date_text(mut self, enabled: bool) -> Self {
        self.match_date_text = enabled;
        self
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// An empty query matches every event.
    pub fn matches(&self, event: &RaceEvent) -> bool {
        let needle = self.normalized.as_str();
        event.normalized_name().contains(needle)
            || event.normalized_location().contains(needle)
            || (self.match_date_text && event.normalized_date_label().contains(needle))
    }
}

/// Search `catalog` for `query`, returning at most `limit` events in catalog order.
///
/// # Example
/// ```
/// use std::num::NonZeroUsize;
/// use chrono::NaiveDate;
/// use race_finder::{search_events, RaceCatalog, RaceEvent};
///
/// let catalog = RaceCatalog::from_events(vec![RaceEvent::new(
///     "Maratón de Valencia",
///     "Valencia",
///     NaiveDate::from_ymd_opt(2025, 12, 7).unwrap(),
///     None,
/// )])
/// .unwrap();
///
/// let limit = NonZeroUsize::new(10).unwrap();
/// assert_eq!(search_events(&catalog, "MARATÓN", limit).len(), 1);
/// assert!(search_events(&catalog, "zzz", limit).is_empty());
/// ```
pub fn search_events<'a>(
    catalog: &'a RaceCatalog,
    query: &str,
    limit: NonZeroUsize,
) -> Vec<&'a RaceEvent> {
    search_with(catalog, &SearchQuery::new(query), limit)
}

/// Same as [`search_events`] with a query that is already normalized.
pub fn search_with<'a>(
    catalog: &'a RaceCatalog,
    query: &SearchQuery,
    limit: NonZeroUsize,
) -> Vec<&'a RaceEvent> {
    catalog
        .all()
        .iter()
        .filter(|event| query.matches(event))
        .take(limit.get())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn sample_catalog() -> RaceCatalog {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        RaceCatalog::from_events(vec![
            RaceEvent::new("Maratón de Valencia", "Valencia", date(2025, 12, 7), None),
            RaceEvent::new("Media Maratón de Madrid", "Madrid", date(2025, 4, 20), None),
            RaceEvent::new("10K Popular de Sevilla", "Sevilla", date(2025, 6, 1), None),
        ])
        .unwrap()
    }

    fn names<'a>(events: &[&'a RaceEvent]) -> Vec<&'a str> {
        events.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_prefix_matches_in_catalog_order() {
        let catalog = sample_catalog();
        let results = search_events(&catalog, "marat", limit(50));
        assert_eq!(
            names(&results),
            vec!["Maratón de Valencia", "Media Maratón de Madrid"]
        );
    }

    #[test]
    fn test_location_match() {
        let catalog = sample_catalog();
        let results = search_events(&catalog, "valencia", limit(10));
        assert_eq!(names(&results), vec!["Maratón de Valencia"]);

        let results = search_events(&catalog, "sevilla", limit(50));
        assert_eq!(names(&results), vec!["10K Popular de Sevilla"]);
    }

    #[test]
    fn test_accented_query_truncated_to_limit() {
        let catalog = sample_catalog();
        let results = search_events(&catalog, "MARATÓN", limit(1));
        assert_eq!(names(&results), vec!["Maratón de Valencia"]);
    }

    #[test]
    fn test_empty_query_returns_leading_entries() {
        let catalog = sample_catalog();
        let results = search_events(&catalog, "", limit(2));
        assert_eq!(
            names(&results),
            vec!["Maratón de Valencia", "Media Maratón de Madrid"]
        );

        let results = search_events(&catalog, "   \t", limit(50));
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_no_match_is_empty() {
        let catalog = sample_catalog();
        assert!(search_events(&catalog, "zzz", limit(50)).is_empty());
    }

    #[test]
    fn test_query_whitespace_is_collapsed() {
        let catalog = sample_catalog();
        let results = search_events(&catalog, "  media   MARATÓN ", limit(50));
        assert_eq!(names(&results), vec!["Media Maratón de Madrid"]);
    }

    #[test]
    fn test_kana_voicing_is_significant() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let catalog = RaceCatalog::from_events(vec![
            RaceEvent::new("東京マラソンガ", "東京", date, None),
            RaceEvent::new("서울 마라톤", "서울", date, None),
        ])
        .unwrap();

        assert!(search_events(&catalog, "カ", limit(10)).is_empty());
        assert_eq!(names(&search_events(&catalog, "ガ", limit(10))), vec!["東京マラソンガ"]);
        assert_eq!(names(&search_events(&catalog, "서울", limit(10))), vec!["서울 마라톤"]);
    }

    #[test]
    fn test_date_text_only_when_enabled() {
        let catalog = sample_catalog();

        let plain = SearchQuery::new("diciembre");
        assert!(search_with(&catalog, &plain, limit(50)).is_empty());

        let with_dates = SearchQuery::new("Diciembre").with_date_text(true);
        let results = search_with(&catalog, &with_dates, limit(50));
        assert_eq!(names(&results), vec!["Maratón de Valencia"]);
    }

    #[test]
    fn test_every_substring_of_name_finds_event() {
        let catalog = sample_catalog();
        let all = limit(catalog.len());

        for event in catalog.all() {
            let chars: Vec<char> = event.normalized_name().chars().collect();
            for start in 0..chars.len() {
                for end in start + 1..=chars.len() {
                    let needle: String = chars[start..end].iter().collect();
                    let results = search_events(&catalog, &needle, all);
                    assert!(
                        results.contains(&event),
                        "'{}' did not find '{}'",
                        needle,
                        event.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_results_are_ordered_and_bounded() {
        let catalog = sample_catalog();
        let queries = ["", "a", "de", "mad", "10k", "maraton", "sevilla", "x"];

        for query in queries {
            for n in 1..=4 {
                let results = search_events(&catalog, query, limit(n));
                assert!(results.len() <= n);

                // Subsequence of the catalog: positions strictly increase
                let positions: Vec<usize> = results
                    .iter()
                    .map(|r| catalog.all().iter().position(|e| e == *r).unwrap())
                    .collect();
                assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
