//! App — the component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Fetches run in spawned tasks and report back with a generation number;
//!   responses from a superseded generation are dropped, so a slow category
//!   fetch can never overwrite a newer one.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use klasteri_api::client::{ApiClient, MIN_SEARCH_QUERY_LEN};
use klasteri_api::config::Config;
use klasteri_api::model::{Category, Cluster, DailySummary, HomePageData, SearchResult, TonightData};
use klasteri_api::night::NightGate;
use klasteri_api::tonight::select_tonight;

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, FetchStatus, PlayerSnapshot, View},
    component::Component,
    components::{
        cluster_detail::ClusterDetail, feed_list::FeedList, header::Header,
        help_overlay::HelpOverlay, summary_panel::SummaryPanel, tonight_panel::TonightPanel,
    },
    focus::FocusRing,
    mpv::{MpvDriver, MpvEvent, MpvHandle, OBS_DURATION, OBS_TIME_POS},
    player::{PlayerEffect, PlayerEvent, PlayerState, SummaryPlayer},
    widgets::{
        search_input::{SearchEvent, SearchInput},
        status_bar,
        toast::{Severity, ToastManager},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    HomeLoaded(u64, Box<HomePageData>),
    CategoryLoaded(u64, Category, Vec<Cluster>),
    FeedFailed(u64, String),
    ClusterLoaded(u64, Box<Cluster>),
    ClusterFailed(u64, String),
    TonightLoaded(u64, TonightData),
    TonightFailed(u64, String),
    SummaryLoaded(Option<DailySummary>),
    SummaryFailed(String),
    SearchLoaded(u64, SearchResult),
    SearchFailed(u64, String),
    Mpv(MpvEvent),
}

// ── Pane area tracking ────────────────────────────────────────────────────────

/// Stores the last-drawn layout rects for each focusable pane.
/// Used by `handle_mouse` to do hit-testing without recomputing the layout.
#[derive(Default, Clone)]
struct PaneAreas {
    header: Rect,
    left: Rect,
    summary: Rect,
    tonight: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    config: Config,
    api: Arc<ApiClient>,

    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    feed_list: FeedList,
    cluster_detail: ClusterDetail,
    tonight_panel: TonightPanel,
    summary_panel: SummaryPanel,
    help_overlay: HelpOverlay,

    focus: FocusRing,
    search: SearchInput,
    toast: ToastManager,

    // ── Narration ─────────────────────────────────────────────────────────────
    player: SummaryPlayer,
    mpv: MpvDriver,
    mpv_handle: Option<MpvHandle>,

    // ── Session bookkeeping ───────────────────────────────────────────────────
    should_quit: bool,
    pane_areas: PaneAreas,
    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,

    /// Per-concern fetch generations for dropping stale responses.
    feed_gen: u64,
    cluster_gen: u64,
    tonight_gen: u64,
    search_gen: u64,
}

impl App {
    pub fn new(config: Config, api: ApiClient) -> Self {
        let now = chrono::Local::now().naive_local();
        let mut night = NightGate::new(&config.night);
        night.evaluate(now);

        let state = AppState {
            view: View::Feed,
            category: Category::TopOverall,
            feeds: HashMap::new(),
            feed_status: FetchStatus::Idle,
            cluster: None,
            cluster_status: FetchStatus::Idle,
            cluster_error: None,
            tonight: Vec::new(),
            tonight_status: FetchStatus::Idle,
            night,
            summary: None,
            summary_status: FetchStatus::Idle,
            player: PlayerSnapshot::default(),
            search_results: None,
            search_status: FetchStatus::Idle,
            now,
            error_message: None,
            searching: false,
        };

        let (tx, rx) = mpsc::channel::<AppMessage>(1024);

        Self {
            config,
            api: Arc::new(api),
            state,
            header: Header::new(),
            feed_list: FeedList::new(),
            cluster_detail: ClusterDetail::new(),
            tonight_panel: TonightPanel::new(),
            summary_panel: SummaryPanel::new(),
            help_overlay: HelpOverlay::new(),
            focus: FocusRing::new(vec![ComponentId::FeedList]),
            search: SearchInput::new(),
            toast: ToastManager::new(),
            player: SummaryPlayer::new(),
            mpv: MpvDriver::new(),
            mpv_handle: None,
            should_quit: false,
            pane_areas: PaneAreas::default(),
            tx,
            rx: Some(rx),
            feed_gen: 0,
            cluster_gen: 0,
            tonight_gen: 0,
            search_gen: 0,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let mut rx = self
            .rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already running"))?;

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Initial fetches ───────────────────────────────────────────────────
        self.sync_focus_ring();
        self.toast.spinner("duke ngarkuar lajmet…");
        self.fetch_home();
        self.fetch_tonight();
        self.fetch_summary();

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut feed_refresh =
            tokio::time::interval(Duration::from_secs(self.config.ui.refresh_secs.max(10)));
        feed_refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        feed_refresh.tick().await; // first tick fires immediately; we already fetched

        // Night-window re-evaluation: once a minute, matching the wall clock.
        let mut night_check = tokio::time::interval(Duration::from_secs(60));
        night_check.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Toast expiry + spinner animation + clock updates: 100ms.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg).await;
                    // Drain whatever queued behind it before redrawing.
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next).await;
                    }
                }

                _ = feed_refresh.tick() => {
                    self.refresh_all();
                }

                _ = night_check.tick() => {
                    self.state.now = chrono::Local::now().naive_local();
                    let was_open = self.state.night.current();
                    self.state.night.evaluate(self.state.now);
                    if self.state.night.current() && !was_open {
                        // Window just opened; the rail may never have loaded.
                        self.fetch_tonight();
                        self.fetch_summary();
                    }
                    self.sync_focus_ring();
                }

                _ = ui_tick.tick() => {
                    self.state.now = chrono::Local::now().naive_local();
                    self.toast.tick();
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.feed_list.tick(s));
                        all.extend(self.cluster_detail.tick(s));
                        all.extend(self.tonight_panel.tick(s));
                        all.extend(self.summary_panel.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action).await;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.mpv.kill().await;
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a).await;
                    }
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for a in actions {
                        self.dispatch(a).await;
                    }
                }
                Event::Resize(w, h) => {
                    self.dispatch(Action::Resize(w, h)).await;
                }
                _ => {}
            },

            AppMessage::HomeLoaded(gen, data) => {
                if gen != self.feed_gen {
                    return;
                }
                self.toast.dismiss_spinner();
                self.state.feed_status = FetchStatus::Loaded;
                self.state.error_message = None;
                for category in Category::ALL {
                    // Article-less clusters cannot render a card; drop them here
                    // so selection and scroll math never see them.
                    let bucket: Vec<Cluster> = data
                        .bucket(category)
                        .iter()
                        .filter(|c| c.is_renderable())
                        .cloned()
                        .collect();
                    if !bucket.is_empty() {
                        self.state.feeds.insert(category, bucket);
                    }
                }
                // The rail excludes what the home page already shows.
                self.fetch_tonight();
            }

            AppMessage::CategoryLoaded(gen, category, mut clusters) => {
                if gen != self.feed_gen {
                    return;
                }
                self.toast.dismiss_spinner();
                self.state.feed_status = FetchStatus::Loaded;
                self.state.error_message = None;
                clusters.retain(|c| c.is_renderable());
                self.state.feeds.insert(category, clusters);
            }

            AppMessage::FeedFailed(gen, err) => {
                if gen != self.feed_gen {
                    return;
                }
                self.state.feed_status = FetchStatus::Failed;
                self.state.error_message = Some(err.clone());
                warn!("feed fetch failed: {}", err);
                self.toast
                    .resolve_spinner(Severity::Error, "Lajmet s'u ngarkuan");
            }

            AppMessage::ClusterLoaded(gen, cluster) => {
                if gen != self.cluster_gen {
                    return;
                }
                self.state.cluster_status = FetchStatus::Loaded;
                self.state.cluster_error = None;
                self.state.cluster = Some(*cluster);
            }

            AppMessage::ClusterFailed(gen, err) => {
                if gen != self.cluster_gen {
                    return;
                }
                self.state.cluster_status = FetchStatus::Failed;
                self.state.cluster_error = Some(err);
            }

            AppMessage::TonightLoaded(gen, data) => {
                if gen != self.tonight_gen {
                    return;
                }
                self.state.tonight_status = FetchStatus::Loaded;
                self.state.night.seed(data.is_active);
                self.state.tonight = select_tonight(&data.clusters, self.state.now);
                self.sync_focus_ring();
            }

            AppMessage::TonightFailed(gen, err) => {
                if gen != self.tonight_gen {
                    return;
                }
                // Secondary surface: keep whatever rail we had, just mark it.
                self.state.tonight_status = FetchStatus::Failed;
                warn!("tonight fetch failed: {}", err);
            }

            AppMessage::SummaryLoaded(summary) => {
                self.state.summary_status = FetchStatus::Loaded;
                // A finished narration for yesterday's summary keeps playing;
                // only replace the text.
                self.state.summary = summary;
                self.sync_focus_ring();
            }

            AppMessage::SummaryFailed(err) => {
                self.state.summary_status = FetchStatus::Failed;
                warn!("summary fetch failed: {}", err);
            }

            AppMessage::SearchLoaded(gen, mut results) => {
                if gen != self.search_gen {
                    return;
                }
                self.toast.dismiss_spinner();
                self.state.search_status = FetchStatus::Loaded;
                results.clusters.retain(|c| c.is_renderable());
                if results.clusters.is_empty() {
                    self.toast.info(format!("Asgjë për \"{}\"", results.query));
                }
                self.state.search_results = Some(results);
                self.state.view = View::Search;
                self.feed_list.reset_selection();
                self.sync_focus_ring();
            }

            AppMessage::SearchFailed(gen, err) => {
                if gen != self.search_gen {
                    return;
                }
                self.state.search_status = FetchStatus::Failed;
                self.toast.resolve_spinner(Severity::Error, err);
            }

            AppMessage::Mpv(ev) => {
                self.handle_mpv_event(ev).await;
            }
        }
    }

    // ── Key routing ───────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Help overlay swallows everything while visible.
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        // Search bar owns the keyboard while active.
        if self.search.active {
            return match self.search.handle_key(key) {
                SearchEvent::Submitted(query) => {
                    self.state.searching = false;
                    vec![Action::SubmitSearch(query)]
                }
                SearchEvent::Cancelled => {
                    self.state.searching = false;
                    vec![]
                }
                SearchEvent::Changed => vec![],
            };
        }

        // Global keys first.
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return vec![Action::Quit];
            }
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('/') => return vec![Action::OpenSearch],
            KeyCode::Char('r') => return vec![Action::Refresh],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::FeedList)],
            KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::TonightPanel)],
            KeyCode::Char('3') => return vec![Action::FocusPane(ComponentId::SummaryPanel)],
            KeyCode::Char('p') => return vec![Action::PlaySummary],
            KeyCode::Char(' ') if !self.focus.is_focused(ComponentId::SummaryPanel) => {
                return vec![Action::TogglePauseSummary];
            }
            KeyCode::Left | KeyCode::Char('h')
                if self.state.view == View::Feed
                    && self.focus.is_focused(ComponentId::FeedList) =>
            {
                return vec![Action::PrevCategory];
            }
            KeyCode::Right | KeyCode::Char('l')
                if self.state.view == View::Feed
                    && self.focus.is_focused(ComponentId::FeedList) =>
            {
                return vec![Action::NextCategory];
            }
            KeyCode::Esc if self.state.view == View::Search => {
                return vec![Action::CloseSearch];
            }
            _ => {}
        }

        // Then the focused component.
        match self.focus.current() {
            Some(ComponentId::FeedList) if self.state.view != View::Cluster => {
                self.feed_list.handle_key(key, &self.state)
            }
            Some(ComponentId::FeedList) | Some(ComponentId::ClusterDetail) => {
                self.cluster_detail.handle_key(key, &self.state)
            }
            Some(ComponentId::TonightPanel) => self.tonight_panel.handle_key(key, &self.state),
            Some(ComponentId::SummaryPanel) => self.summary_panel.handle_key(key, &self.state),
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Action> {
        if self.help_overlay.visible {
            return vec![];
        }
        let point = (mouse.column, mouse.row);

        if let Some(action) = self
            .header
            .hit_tab(point.0, point.1, self.pane_areas.header)
        {
            return vec![action];
        }

        let areas = self.pane_areas.clone();
        if contains(areas.left, point) {
            let id = if self.state.view == View::Cluster {
                ComponentId::ClusterDetail
            } else {
                ComponentId::FeedList
            };
            self.focus.set(id);
            return if self.state.view == View::Cluster {
                self.cluster_detail.handle_mouse(mouse, areas.left, &self.state)
            } else {
                self.feed_list.handle_mouse(mouse, areas.left, &self.state)
            };
        }
        if contains(areas.tonight, point) {
            self.focus.set(ComponentId::TonightPanel);
            return self
                .tonight_panel
                .handle_mouse(mouse, areas.tonight, &self.state);
        }
        if contains(areas.summary, point) {
            self.focus.set(ComponentId::SummaryPanel);
            return self
                .summary_panel
                .handle_mouse(mouse, areas.summary, &self.state);
        }
        vec![]
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        // Let every component observe the action before the App reacts.
        let follow_ups: Vec<Action> = {
            let s = &self.state;
            let mut all = Vec::new();
            all.extend(self.feed_list.on_action(&action, s));
            all.extend(self.cluster_detail.on_action(&action, s));
            all.extend(self.tonight_panel.on_action(&action, s));
            all.extend(self.summary_panel.on_action(&action, s));
            all.extend(self.help_overlay.on_action(&action, s));
            all
        };

        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => {}
            Action::Resize(_, _) => {}
            Action::Tick | Action::Noop => {}

            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),
            Action::SelectUp(_)
            | Action::SelectDown(_)
            | Action::SelectFirst
            | Action::SelectLast => {}

            Action::OpenCluster(id) => {
                self.state.view = View::Cluster;
                self.state.cluster = None;
                self.state.cluster_error = None;
                self.state.cluster_status = FetchStatus::Loading;
                self.focus.set(ComponentId::ClusterDetail);
                self.sync_focus_ring();
                self.fetch_cluster(id);
            }
            Action::CloseCluster => {
                self.state.view = if self.state.search_results.is_some() {
                    View::Search
                } else {
                    View::Feed
                };
                self.state.cluster = None;
                self.state.cluster_error = None;
                self.focus.set(ComponentId::FeedList);
                self.sync_focus_ring();
            }

            Action::SwitchCategory(category) => {
                self.state.view = View::Feed;
                self.state.search_results = None;
                self.state.category = category;
                self.sync_focus_ring();
                if !self.state.feeds.contains_key(&category) {
                    self.fetch_category(category);
                }
            }
            Action::NextCategory | Action::PrevCategory => {
                let all = Category::ALL;
                let pos = all
                    .iter()
                    .position(|c| *c == self.state.category)
                    .unwrap_or(0);
                let next = match action {
                    Action::NextCategory => (pos + 1) % all.len(),
                    _ => (pos + all.len() - 1) % all.len(),
                };
                self.dispatch_boxed(Action::SwitchCategory(all[next])).await;
            }

            Action::OpenSearch => {
                self.search.activate();
                self.search.clear();
                self.state.searching = true;
            }
            Action::CloseSearch => {
                self.search.deactivate();
                self.state.searching = false;
                self.state.search_results = None;
                if self.state.view == View::Search {
                    self.state.view = View::Feed;
                }
                self.sync_focus_ring();
            }
            Action::SubmitSearch(query) => {
                let query = query.trim().to_string();
                if query.chars().count() < MIN_SEARCH_QUERY_LEN {
                    self.toast
                        .warning("Kërkimi duhet të ketë së paku 2 shkronja");
                } else {
                    self.toast.spinner(format!("duke kërkuar \"{}\"…", query));
                    self.fetch_search(query);
                }
            }

            Action::Refresh => {
                self.toast.spinner("duke rifreskuar…");
                self.refresh_all();
            }

            Action::PlaySummary => {
                let Some(summary) = &self.state.summary else {
                    self.toast.info("Ende pa përmbledhje për sot");
                    return;
                };
                if !summary.has_audio {
                    self.toast.info("Kjo përmbledhje s'ka narracion");
                    return;
                }
                let url = self.api.summary_audio_url(summary.id);
                let effects = self.player.play(&url);
                self.run_player_effects(effects).await;
            }
            Action::TogglePauseSummary => {
                let effects = self.player.toggle_pause();
                self.run_player_effects(effects).await;
            }
            Action::StopSummary => {
                let effects = self.player.stop();
                self.run_player_effects(effects).await;
            }
            Action::SeekFraction(f) => {
                let effects = self.player.seek_fraction(f);
                self.run_player_effects(effects).await;
            }

            Action::CopyToClipboard(text) => match arboard::Clipboard::new() {
                Ok(mut clipboard) => {
                    if clipboard.set_text(text).is_ok() {
                        self.toast.success("Linku u kopjua");
                    } else {
                        self.toast.error("Kopjimi dështoi");
                    }
                }
                Err(e) => {
                    warn!("clipboard unavailable: {}", e);
                    self.toast.error("Clipboard s'është i qasshëm");
                }
            },
        }

        for follow_up in follow_ups {
            self.dispatch_boxed(follow_up).await;
        }
        self.sync_player_snapshot();
    }

    /// Indirection so `dispatch` can recurse from async context.
    fn dispatch_boxed<'a>(
        &'a mut self,
        action: Action,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + 'a>> {
        Box::pin(self.dispatch(action))
    }

    // ── Fetch orchestration ───────────────────────────────────────────────────

    fn sender(&self) -> mpsc::Sender<AppMessage> {
        self.tx.clone()
    }

    fn refresh_all(&mut self) {
        if self.state.view == View::Feed || self.state.view == View::Cluster {
            if self.state.category == Category::TopOverall {
                self.fetch_home();
            } else {
                self.fetch_category(self.state.category);
            }
        }
        self.fetch_tonight();
        self.fetch_summary();
    }

    fn fetch_home(&mut self) {
        self.feed_gen += 1;
        let gen = self.feed_gen;
        self.state.feed_status = FetchStatus::Loading;
        let api = self.api.clone();
        let tx = self.sender();
        tokio::spawn(async move {
            match api.home().await {
                Ok(data) => {
                    let _ = tx.send(AppMessage::HomeLoaded(gen, Box::new(data))).await;
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::FeedFailed(gen, e.to_string())).await;
                }
            }
        });
    }

    fn fetch_category(&mut self, category: Category) {
        self.feed_gen += 1;
        let gen = self.feed_gen;
        self.state.feed_status = FetchStatus::Loading;
        let api = self.api.clone();
        let tx = self.sender();
        tokio::spawn(async move {
            match api.category(category).await {
                Ok(clusters) => {
                    let _ = tx
                        .send(AppMessage::CategoryLoaded(gen, category, clusters))
                        .await;
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::FeedFailed(gen, e.to_string())).await;
                }
            }
        });
    }

    fn fetch_cluster(&mut self, id: i64) {
        self.cluster_gen += 1;
        let gen = self.cluster_gen;
        let api = self.api.clone();
        let tx = self.sender();
        tokio::spawn(async move {
            match api.cluster(id).await {
                Ok(cluster) => {
                    let _ = tx
                        .send(AppMessage::ClusterLoaded(gen, Box::new(cluster)))
                        .await;
                }
                // ClusterNotFound carries its own user-facing message.
                Err(e) => {
                    let _ = tx.send(AppMessage::ClusterFailed(gen, e.to_string())).await;
                }
            }
        });
    }

    fn fetch_tonight(&mut self) {
        self.tonight_gen += 1;
        let gen = self.tonight_gen;
        if self.state.tonight_status == FetchStatus::Idle {
            self.state.tonight_status = FetchStatus::Loading;
        }
        let exclude = self.state.main_feed_ids();
        let api = self.api.clone();
        let tx = self.sender();
        tokio::spawn(async move {
            match api.tonight(&exclude).await {
                Ok(data) => {
                    let _ = tx.send(AppMessage::TonightLoaded(gen, data)).await;
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::TonightFailed(gen, e.to_string())).await;
                }
            }
        });
    }

    fn fetch_summary(&mut self) {
        if self.state.summary_status == FetchStatus::Idle {
            self.state.summary_status = FetchStatus::Loading;
        }
        let api = self.api.clone();
        let tx = self.sender();
        tokio::spawn(async move {
            match api.summary_today().await {
                Ok(summary) => {
                    let _ = tx.send(AppMessage::SummaryLoaded(summary)).await;
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::SummaryFailed(e.to_string())).await;
                }
            }
        });
    }

    fn fetch_search(&mut self, query: String) {
        self.search_gen += 1;
        let gen = self.search_gen;
        self.state.search_status = FetchStatus::Loading;
        let limit = self.config.ui.search_limit;
        let api = self.api.clone();
        let tx = self.sender();
        tokio::spawn(async move {
            match api.search(&query, limit).await {
                Ok(results) => {
                    let _ = tx.send(AppMessage::SearchLoaded(gen, results)).await;
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::SearchFailed(gen, e.to_string())).await;
                }
            }
        });
    }

    // ── Narration backend ─────────────────────────────────────────────────────

    async fn run_player_effects(&mut self, effects: Vec<PlayerEffect>) {
        for effect in effects {
            match effect {
                PlayerEffect::StartLoad { url } => {
                    if let Err(e) = self.start_narration(&url).await {
                        warn!("narration start failed: {}", e);
                        self.toast.error("Narracioni s'u nis");
                        let _ = self.player.on_event(PlayerEvent::Failed(e.to_string()));
                    }
                }
                PlayerEffect::SetPause(paused) => {
                    if let Some(handle) = &self.mpv_handle {
                        if let Err(e) = handle.set_pause(paused).await {
                            warn!("mpv set_pause failed: {}", e);
                        }
                    }
                }
                PlayerEffect::Seek(secs) => {
                    if let Some(handle) = &self.mpv_handle {
                        if let Err(e) = handle.seek_to(secs).await {
                            warn!("mpv seek failed: {}", e);
                        }
                    }
                }
                PlayerEffect::Release => {
                    if let Some(handle) = &self.mpv_handle {
                        let _ = handle.stop().await;
                    }
                }
            }
        }
        self.sync_player_snapshot();
    }

    /// Lazily spawn mpv on first play, reconnecting when it died.
    async fn start_narration(&mut self, url: &str) -> anyhow::Result<()> {
        if self.mpv_handle.is_none() || !self.mpv.process_alive() {
            let tx = self.sender();
            let (mpv_tx, mut mpv_rx) = mpsc::channel::<MpvEvent>(256);
            tokio::spawn(async move {
                while let Some(ev) = mpv_rx.recv().await {
                    if tx.send(AppMessage::Mpv(ev)).await.is_err() {
                        break;
                    }
                }
            });
            let handle = self.mpv.spawn_and_connect(mpv_tx).await?;
            handle.observe_all_properties().await;
            self.mpv_handle = Some(handle);
        }
        if let Some(handle) = &self.mpv_handle {
            handle.set_pause(false).await?;
            handle.load_stream(url).await?;
            info!("narration started: {}", url);
        }
        Ok(())
    }

    async fn handle_mpv_event(&mut self, ev: MpvEvent) {
        let player_event = if let Some((id, data)) = ev.as_property_change() {
            match id {
                OBS_DURATION => data.as_f64().and_then(|d| {
                    (self.player.state() == PlayerState::Loading)
                        .then_some(PlayerEvent::Loaded { duration: d })
                }),
                OBS_TIME_POS => data
                    .as_f64()
                    .map(|position| PlayerEvent::TimeUpdate { position }),
                _ => None,
            }
        } else {
            match ev.event_name() {
                Some("end-file") => match ev.end_reason() {
                    // "stop" is our own Release; only eof/error are news.
                    Some("eof") | None => Some(PlayerEvent::Ended),
                    Some("error") => Some(PlayerEvent::Failed("mpv: end-file error".into())),
                    _ => None,
                },
                _ => None,
            }
        };

        if let Some(event) = player_event {
            if matches!(event, PlayerEvent::Failed(_)) {
                self.toast.error("Narracioni dështoi");
            }
            let effects = self.player.on_event(event);
            self.run_player_effects(effects).await;
        }
        self.sync_player_snapshot();
    }

    fn sync_player_snapshot(&mut self) {
        self.state.player = PlayerSnapshot {
            state: Some(self.player.state()),
            progress: self.player.progress(),
            position_secs: self.player.position(),
            remaining_secs: self.player.remaining_secs(),
        };
    }

    // ── Focus / layout bookkeeping ────────────────────────────────────────────

    fn sync_focus_ring(&mut self) {
        let mut items = vec![if self.state.view == View::Cluster {
            ComponentId::ClusterDetail
        } else {
            ComponentId::FeedList
        }];
        if self.state.night_panels_visible() {
            items.push(ComponentId::TonightPanel);
            items.push(ComponentId::SummaryPanel);
        }
        self.focus.set_items(items);
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                                // header
                Constraint::Length(u16::from(self.search.active)),    // search bar
                Constraint::Min(3),                                   // main
                Constraint::Length(1),                                // log bar
                Constraint::Length(1),                                // keys bar
            ])
            .split(area);

        self.pane_areas.header = rows[0];
        self.header.draw(frame, rows[0], &self.state);
        if self.search.active {
            self.search.draw(frame, rows[1]);
        }

        let main = rows[2];
        if self.state.night_panels_visible() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(main);
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(columns[1]);
            self.pane_areas.left = columns[0];
            self.pane_areas.summary = right[0];
            self.pane_areas.tonight = right[1];

            self.summary_panel.draw(
                frame,
                right[0],
                self.focus.is_focused(ComponentId::SummaryPanel),
                &self.state,
            );
            self.tonight_panel.draw(
                frame,
                right[1],
                self.focus.is_focused(ComponentId::TonightPanel),
                &self.state,
            );
        } else {
            self.pane_areas.left = main;
            self.pane_areas.summary = Rect::default();
            self.pane_areas.tonight = Rect::default();
        }

        if self.state.view == View::Cluster {
            self.cluster_detail.draw(
                frame,
                self.pane_areas.left,
                self.focus.is_focused(ComponentId::ClusterDetail)
                    || self.focus.is_focused(ComponentId::FeedList),
                &self.state,
            );
        } else {
            self.feed_list.draw(
                frame,
                self.pane_areas.left,
                self.focus.is_focused(ComponentId::FeedList),
                &self.state,
            );
        }

        status_bar::draw_log_bar(frame, rows[3], &self.state);
        status_bar::draw_keys_bar(frame, rows[4], &self.state);

        self.toast.draw(frame, area);
        self.help_overlay.draw(frame, area, true, &self.state);
    }
}

fn contains(area: Rect, (column, row): (u16, u16)) -> bool {
    column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use klasteri_api::model::Article;

    fn cluster(id: i64, articles: usize) -> Cluster {
        Cluster {
            id,
            title: format!("cluster {id}"),
            article_count: articles as u32,
            category: None,
            score: 1.0,
            last_updated: "2026-08-23T10:00:00Z".to_string(),
            articles: (0..articles)
                .map(|i| Article {
                    id: id * 100 + i as i64,
                    title: "t".to_string(),
                    url: "https://example.com".to_string(),
                    image_url: None,
                    content: None,
                    source_name: "Koha".to_string(),
                    crawled_at: "2026-08-23T09:00:00Z".to_string(),
                    rank_score: None,
                })
                .collect(),
        }
    }

    fn test_app() -> App {
        let api = ApiClient::new("https://example.invalid").unwrap();
        App::new(Config::default(), api)
    }

    #[tokio::test]
    async fn article_less_clusters_never_reach_the_feed() {
        let mut app = test_app();
        app.state.category = Category::Vendi;

        app.handle_message(AppMessage::CategoryLoaded(
            0,
            Category::Vendi,
            vec![cluster(1, 0), cluster(2, 2), cluster(3, 0)],
        ))
        .await;

        let ids: Vec<i64> = app.state.visible_clusters().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn article_less_clusters_never_reach_search_results() {
        let mut app = test_app();

        app.handle_message(AppMessage::SearchLoaded(
            0,
            SearchResult {
                clusters: vec![cluster(1, 0), cluster(2, 1)],
                total_count: 2,
                query: "zgjedhjet".to_string(),
            },
        ))
        .await;

        assert_eq!(app.state.view, View::Search);
        let ids: Vec<i64> = app.state.visible_clusters().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
