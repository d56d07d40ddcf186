//! Wire model for the Klasteri backend API.
//!
//! Everything here is created by deserializing an API response and treated as
//! immutable afterwards, with one exception: relative image paths are
//! rewritten to absolute URLs against the configured API base right after a
//! fetch. Article order inside a cluster is meaningful (the backend puts the
//! representative article first) and is never re-sorted client-side.

use serde::{Deserialize, Serialize};

/// A single crawled article inside a cluster.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub source_name: String,
    /// ISO-ish crawl timestamp; may or may not carry a trailing `Z`.
    pub crawled_at: String,
    #[serde(default)]
    pub rank_score: Option<f64>,
}

/// A group of articles the backend judged to cover the same story.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cluster {
    pub id: i64,
    pub title: String,
    pub article_count: u32,
    #[serde(default)]
    pub category: Option<String>,
    pub score: f64,
    pub last_updated: String,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// How many member articles a card lists under the main one.
const CARD_OTHER_SOURCES: usize = 3;

impl Cluster {
    /// The representative article — first by backend convention.
    pub fn main_article(&self) -> Option<&Article> {
        self.articles.first()
    }

    /// Up to three further sources covering the same story.
    pub fn other_sources(&self) -> &[Article] {
        let end = self.articles.len().min(1 + CARD_OTHER_SOURCES);
        self.articles.get(1..end).unwrap_or(&[])
    }

    /// "N lajme tjera" count: members beyond the main article and the three
    /// listed sources. Zero when everything fits on the card.
    pub fn remaining_count(&self) -> u32 {
        self.article_count.saturating_sub(1 + CARD_OTHER_SOURCES as u32)
    }

    /// A cluster with no articles cannot be rendered; callers skip these.
    pub fn is_renderable(&self) -> bool {
        !self.articles.is_empty()
    }

    pub fn rewrite_image_urls(&mut self, base: &str) {
        for article in &mut self.articles {
            if let Some(url) = &article.image_url {
                if let Some(abs) = absolutize_image_url(url, base) {
                    article.image_url = Some(abs);
                }
            }
        }
    }
}

/// Lighter-weight cluster used by the tonight rail: one representative
/// article instead of the full member list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TonightCluster {
    pub id: i64,
    pub title: String,
    pub today_article_count: u32,
    pub total_article_count: u32,
    #[serde(default)]
    pub category: Option<String>,
    pub top_article: Article,
}

/// Response of `/api/news/tonight`. `is_active` is the server's own opinion
/// of whether the night window is open — used as the seed for client gating.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TonightData {
    #[serde(default)]
    pub clusters: Vec<TonightCluster>,
    #[serde(default)]
    pub is_active: bool,
}

/// Lightweight cluster reference attached to a daily summary ("read more").
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummaryClusterRef {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Backend-generated narrative digest of the day's top clusters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DailySummary {
    pub id: i64,
    pub summary_date: String,
    /// Paragraphs separated by blank lines, `**bold**` inline spans.
    pub summary_text: String,
    pub created_at: String,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(default)]
    pub clusters: Option<Vec<SummaryClusterRef>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    pub total_count: u32,
    pub query: String,
}

// ── Categories ────────────────────────────────────────────────────────────────

/// The six fixed home-page buckets. A closed enumeration, not a dynamic set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    TopOverall,
    Vendi,
    Rajoni,
    Bota,
    Sport,
    Tech,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::TopOverall,
        Category::Vendi,
        Category::Rajoni,
        Category::Bota,
        Category::Sport,
        Category::Tech,
    ];

    /// API path segment / JSON key.
    pub fn as_key(self) -> &'static str {
        match self {
            Category::TopOverall => "top_overall",
            Category::Vendi => "vendi",
            Category::Rajoni => "rajoni",
            Category::Bota => "bota",
            Category::Sport => "sport",
            Category::Tech => "tech",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::TopOverall => "Top Lajmet",
            Category::Vendi => "Vendi",
            Category::Rajoni => "Rajoni",
            Category::Bota => "Bota",
            Category::Sport => "Sport",
            Category::Tech => "Tech",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_key() == key)
    }
}

/// The home page payload: a fixed mapping from the six category keys to
/// ordered cluster lists.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HomePageData {
    #[serde(default)]
    pub top_overall: Vec<Cluster>,
    #[serde(default)]
    pub vendi: Vec<Cluster>,
    #[serde(default)]
    pub rajoni: Vec<Cluster>,
    #[serde(default)]
    pub bota: Vec<Cluster>,
    #[serde(default)]
    pub sport: Vec<Cluster>,
    #[serde(default)]
    pub tech: Vec<Cluster>,
}

impl HomePageData {
    pub fn bucket(&self, category: Category) -> &[Cluster] {
        match category {
            Category::TopOverall => &self.top_overall,
            Category::Vendi => &self.vendi,
            Category::Rajoni => &self.rajoni,
            Category::Bota => &self.bota,
            Category::Sport => &self.sport,
            Category::Tech => &self.tech,
        }
    }

    /// Every cluster id currently shown on the home page, bucket order.
    /// Used as the exclusion set for the tonight feed.
    pub fn cluster_ids(&self) -> Vec<i64> {
        Category::ALL
            .iter()
            .flat_map(|c| self.bucket(*c).iter().map(|cl| cl.id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.bucket(*c).is_empty())
    }

    pub fn rewrite_image_urls(&mut self, base: &str) {
        for bucket in [
            &mut self.top_overall,
            &mut self.vendi,
            &mut self.rajoni,
            &mut self.bota,
            &mut self.sport,
            &mut self.tech,
        ] {
            for cluster in bucket.iter_mut() {
                cluster.rewrite_image_urls(base);
            }
        }
    }
}

// ── Image URL rewriting ───────────────────────────────────────────────────────

/// Turn a relative (leading-slash) image path into an absolute URL against
/// the API base. Already-absolute URLs pass through as `None` (no rewrite).
pub fn absolutize_image_url(url: &str, base: &str) -> Option<String> {
    if url.starts_with('/') {
        Some(format!("{}{}", base.trim_end_matches('/'), url))
    } else {
        None
    }
}

// ── Summary text parsing ──────────────────────────────────────────────────────

/// One inline segment of a summary paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySpan {
    pub text: String,
    pub bold: bool,
}

/// Split summary text into paragraphs (blank-line separated), each a list of
/// plain/bold segments. Unterminated `**` is kept as literal text.
pub fn summary_paragraphs(text: &str) -> Vec<Vec<SummarySpan>> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(split_bold_spans)
        .collect()
}

fn split_bold_spans(paragraph: &str) -> Vec<SummarySpan> {
    let mut spans = Vec::new();
    let mut rest = paragraph;
    while let Some(start) = rest.find("**") {
        if let Some(len) = rest[start + 2..].find("**") {
            if start > 0 {
                spans.push(SummarySpan {
                    text: rest[..start].to_string(),
                    bold: false,
                });
            }
            spans.push(SummarySpan {
                text: rest[start + 2..start + 2 + len].to_string(),
                bold: true,
            });
            rest = &rest[start + 2 + len + 2..];
        } else {
            break;
        }
    }
    if !rest.is_empty() {
        spans.push(SummarySpan {
            text: rest.to_string(),
            bold: false,
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_with_articles(n: usize, article_count: u32) -> Cluster {
        let articles = (0..n)
            .map(|i| Article {
                id: i as i64,
                title: format!("article {i}"),
                url: format!("https://example.com/{i}"),
                image_url: None,
                content: None,
                source_name: "Koha".to_string(),
                crawled_at: "2026-08-23T10:00:00Z".to_string(),
                rank_score: None,
            })
            .collect();
        Cluster {
            id: 1,
            title: "story".to_string(),
            article_count,
            category: Some("vendi".to_string()),
            score: 1.0,
            last_updated: "2026-08-23T10:00:00Z".to_string(),
            articles,
        }
    }

    #[test]
    fn card_math_five_articles() {
        let c = cluster_with_articles(5, 5);
        assert_eq!(c.main_article().unwrap().id, 0);
        let others: Vec<i64> = c.other_sources().iter().map(|a| a.id).collect();
        assert_eq!(others, vec![1, 2, 3]);
        assert_eq!(c.remaining_count(), 1); // article_count - 4
    }

    #[test]
    fn card_math_small_cluster() {
        let c = cluster_with_articles(2, 2);
        assert_eq!(c.other_sources().len(), 1);
        assert_eq!(c.remaining_count(), 0);
    }

    #[test]
    fn empty_cluster_is_unrenderable() {
        let c = cluster_with_articles(0, 0);
        assert!(!c.is_renderable());
        assert!(c.main_article().is_none());
        assert!(c.other_sources().is_empty());
    }

    #[test]
    fn image_rewrite_only_touches_relative_paths() {
        assert_eq!(
            absolutize_image_url("/images/a.jpg", "https://api.example.com/"),
            Some("https://api.example.com/images/a.jpg".to_string())
        );
        assert_eq!(
            absolutize_image_url("https://cdn.example.com/a.jpg", "https://api.example.com"),
            None
        );
    }

    #[test]
    fn home_page_deserializes_with_missing_buckets() {
        let data: HomePageData = serde_json::from_str(r#"{"top_overall": [], "sport": []}"#).unwrap();
        assert!(data.is_empty());
        assert!(data.cluster_ids().is_empty());
    }

    #[test]
    fn tonight_payload_deserializes() {
        let json = r#"{
            "clusters": [{
                "id": 7,
                "title": "story",
                "today_article_count": 6,
                "total_article_count": 9,
                "category": "sport",
                "top_article": {
                    "id": 70,
                    "title": "t",
                    "url": "https://example.com",
                    "source_name": "Telegrafi",
                    "crawled_at": "2026-08-23T21:15:00"
                }
            }],
            "is_active": true
        }"#;
        let data: TonightData = serde_json::from_str(json).unwrap();
        assert!(data.is_active);
        assert_eq!(data.clusters[0].top_article.source_name, "Telegrafi");
    }

    #[test]
    fn summary_deserializes_without_cluster_refs() {
        let json = r#"{
            "id": 3,
            "summary_date": "2026-08-23",
            "summary_text": "Sot **qeveria** miratoi buxhetin.\n\nNë sport, fitore.",
            "created_at": "2026-08-23T18:05:00Z",
            "has_audio": true
        }"#;
        let s: DailySummary = serde_json::from_str(json).unwrap();
        assert!(s.has_audio);
        assert!(s.clusters.is_none());
    }

    #[test]
    fn summary_paragraphs_split_bold() {
        let paras = summary_paragraphs("Sot **qeveria** miratoi.\n\n\nNë sport, **fitore**.");
        assert_eq!(paras.len(), 2);
        assert_eq!(
            paras[0],
            vec![
                SummarySpan { text: "Sot ".into(), bold: false },
                SummarySpan { text: "qeveria".into(), bold: true },
                SummarySpan { text: " miratoi.".into(), bold: false },
            ]
        );
        assert!(paras[1][1].bold);
    }

    #[test]
    fn unterminated_bold_stays_literal() {
        let paras = summary_paragraphs("Sot **qeveria miratoi.");
        assert_eq!(paras[0].len(), 1);
        assert!(!paras[0][0].bold);
        assert!(paras[0][0].text.contains("**"));
    }

    #[test]
    fn category_keys_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::from_key(c.as_key()), Some(c));
        }
        assert_eq!(Category::from_key("kultura"), None);
    }
}
