//! Client-side selection for the tonight rail.
//!
//! The server already filters out clusters whose ids we send as exclusions;
//! what remains here is the day split and the display-count rule. The whole
//! thing is a pure function of `(now, payload)` so identical inputs always
//! produce the identical rail.

use chrono::NaiveDateTime;

use crate::model::TonightCluster;
use crate::timefmt::parse_naive;

/// Minimum number of same-day clusters required before the "today" section
/// is shown at all. Below this, today's clusters are dropped entirely and
/// only the older ones remain — a deliberate no-premature-section policy.
pub const TODAY_SECTION_MIN: usize = 5;

/// A cluster counts toward the quality subset when at least this many of its
/// articles were crawled today.
pub const QUALITY_TODAY_ARTICLES: u32 = 5;

pub const DISPLAY_MIN: usize = 5;
pub const DISPLAY_MAX: usize = 10;

/// Pick the clusters the rail actually shows, order preserved throughout.
pub fn select_tonight(clusters: &[TonightCluster], now: NaiveDateTime) -> Vec<TonightCluster> {
    let today = now.date();
    let (today_clusters, older): (Vec<TonightCluster>, Vec<TonightCluster>) =
        clusters.iter().cloned().partition(|c| {
            parse_naive(&c.top_article.crawled_at)
                .map(|d| d.date() == today)
                .unwrap_or(false)
        });

    let filtered: Vec<TonightCluster> = if today_clusters.len() >= TODAY_SECTION_MIN {
        today_clusters.into_iter().chain(older).collect()
    } else {
        older
    };

    let quality = filtered
        .iter()
        .filter(|c| c.today_article_count >= QUALITY_TODAY_ARTICLES)
        .count();
    let target = if quality > 0 {
        quality.clamp(DISPLAY_MIN, DISPLAY_MAX)
    } else {
        filtered.len().clamp(DISPLAY_MIN, DISPLAY_MAX)
    };
    // The nominal floor of 5 can exceed what is available; availability wins.
    let shown = target.min(filtered.len());

    let mut filtered = filtered;
    filtered.truncate(shown);
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Article;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 23)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap()
    }

    fn tonight_cluster(id: i64, crawled_at: &str, today_article_count: u32) -> TonightCluster {
        TonightCluster {
            id,
            title: format!("cluster {id}"),
            today_article_count,
            total_article_count: today_article_count.max(1),
            category: None,
            top_article: Article {
                id: id * 100,
                title: "t".to_string(),
                url: "https://example.com".to_string(),
                image_url: None,
                content: None,
                source_name: "Koha".to_string(),
                crawled_at: crawled_at.to_string(),
                rank_score: None,
            },
        }
    }

    fn from_today(id: i64, today_article_count: u32) -> TonightCluster {
        tonight_cluster(id, "2026-08-23T20:30:00Z", today_article_count)
    }

    fn from_yesterday(id: i64) -> TonightCluster {
        tonight_cluster(id, "2026-08-22T21:00:00Z", 1)
    }

    #[test]
    fn today_first_then_yesterday_in_original_order() {
        let mut input: Vec<TonightCluster> = Vec::new();
        // interleave so the partition has to regroup
        for i in 0..3 {
            input.push(from_today(i, 1));
            input.push(from_yesterday(100 + i));
        }
        input.push(from_today(3, 1));
        input.push(from_today(4, 1));
        input.push(from_today(5, 1));

        let out = select_tonight(&input, now());
        let ids: Vec<i64> = out.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 100, 101, 102]);
    }

    #[test]
    fn drops_sparse_today_entirely() {
        // Fewer than 5 clusters from today: every one of them is discarded,
        // even though that leaves only yesterday's on the rail.
        let mut input: Vec<TonightCluster> = (0..3).map(|i| from_today(i, 1)).collect();
        input.extend((0..10).map(|i| from_yesterday(100 + i)));

        let out = select_tonight(&input, now());
        assert!(out.iter().all(|c| c.id >= 100));
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn quality_subset_sets_the_display_count() {
        // 7 filtered clusters, 6 of which meet the quality threshold:
        // target = clamp(6, 5, 10) = 6.
        let input: Vec<TonightCluster> = (0..7)
            .map(|i| from_today(i, if i < 6 { 5 } else { 1 }))
            .collect();
        let out = select_tonight(&input, now());
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn availability_caps_the_nominal_floor() {
        // Only 2 clusters and none meet the threshold: the formula floors at
        // 5, but the rail can never show more than exists.
        let input = vec![from_yesterday(1), from_yesterday(2)];
        let out = select_tonight(&input, now());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn never_more_than_ten() {
        let input: Vec<TonightCluster> = (0..15).map(|i| from_today(i, 5)).collect();
        let out = select_tonight(&input, now());
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn same_inputs_same_rail() {
        let input: Vec<TonightCluster> = (0..8).map(|i| from_today(i, 5)).collect();
        let a = select_tonight(&input, now());
        let b = select_tonight(&input, now());
        let ids = |v: &[TonightCluster]| v.iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }
}
