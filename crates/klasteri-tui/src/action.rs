//! Action enum — all user-initiated intents and internal events.

use klasteri_api::model::Category;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    FeedList,
    ClusterDetail,
    TonightPanel,
    SummaryPanel,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),
    SelectUp(usize),
    SelectDown(usize),
    SelectFirst,
    SelectLast,

    // ── Views ────────────────────────────────────────────────────────────────
    OpenCluster(i64),
    CloseCluster,
    SwitchCategory(Category),
    NextCategory,
    PrevCategory,

    // ── Search ───────────────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SubmitSearch(String),

    // ── Data ─────────────────────────────────────────────────────────────────
    Refresh,

    // ── Summary narration ────────────────────────────────────────────────────
    PlaySummary,
    TogglePauseSummary,
    StopSummary,
    /// Seek to a fractional position on the progress track (0.0–1.0).
    SeekFraction(f64),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Tick,
    Resize(u16, u16),
    Noop,
}
