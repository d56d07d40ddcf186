//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this for feed data, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use klasteri_api::model::{Category, Cluster, DailySummary, SearchResult, TonightCluster};
use klasteri_api::night::NightGate;

use crate::player::PlayerState;

/// Which main view occupies the left column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Feed,
    Cluster,
    Search,
}

/// Readouts of the narration player, snapshotted each frame for rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerSnapshot {
    pub state: Option<PlayerState>,
    pub progress: f64,
    pub position_secs: f64,
    pub remaining_secs: f64,
}

impl PlayerSnapshot {
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            Some(PlayerState::Loading) | Some(PlayerState::Playing) | Some(PlayerState::Paused)
        )
    }
}

/// Per-concern fetch status, for spinners and degraded-state banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// The full shared state of the application.
/// Components read this; only the App event-loop writes to it.
pub struct AppState {
    // ── Feeds ───────────────────────────────────────────────────────────────
    pub view: View,
    pub category: Category,
    /// Per-category cluster lists. top_overall is seeded from the home
    /// payload; the others are fetched on first switch.
    pub feeds: HashMap<Category, Vec<Cluster>>,
    pub feed_status: FetchStatus,

    // ── Cluster detail ──────────────────────────────────────────────────────
    pub cluster: Option<Cluster>,
    pub cluster_status: FetchStatus,
    pub cluster_error: Option<String>,

    // ── Tonight rail ────────────────────────────────────────────────────────
    pub tonight: Vec<TonightCluster>,
    pub tonight_status: FetchStatus,
    pub night: NightGate,

    // ── Daily summary ───────────────────────────────────────────────────────
    /// None both before the fetch and when the backend has no summary today;
    /// `summary_status` distinguishes the two.
    pub summary: Option<DailySummary>,
    pub summary_status: FetchStatus,
    pub player: PlayerSnapshot,

    // ── Search ──────────────────────────────────────────────────────────────
    pub search_results: Option<SearchResult>,
    pub search_status: FetchStatus,

    // ── Session ─────────────────────────────────────────────────────────────
    pub now: NaiveDateTime,
    pub error_message: Option<String>,
    pub searching: bool,
}

impl AppState {
    /// The cluster list the left column currently shows.
    pub fn visible_clusters(&self) -> &[Cluster] {
        match self.view {
            View::Search => self
                .search_results
                .as_ref()
                .map(|r| r.clusters.as_slice())
                .unwrap_or(&[]),
            _ => self
                .feeds
                .get(&self.category)
                .map(|c| c.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Ids already on screen in the main feed, sent as tonight exclusions.
    pub fn main_feed_ids(&self) -> Vec<i64> {
        self.feeds
            .get(&self.category)
            .map(|clusters| clusters.iter().map(|c| c.id).collect())
            .unwrap_or_default()
    }

    /// Whether the night-gated right column is visible at all.
    pub fn night_panels_visible(&self) -> bool {
        self.night.current()
    }
}
