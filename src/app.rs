//! Application state management for the discharge dashboard
//!
//! This module contains the dashboard state, keyboard handling, and the data
//! load that fills every section from one [`DatasetBundle`].

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use hospdash::cli::StartupConfig;
use hospdash::config::Theme;
use hospdash::data::summary::{
    self, DiagnosisSummary, GenderSummary, Insight, OverviewSummary, SeveritySummary,
    WeightStaySummary, SEX_COMPARISON_ROWS,
};
use hospdash::data::{Catalog, DatasetBundle, DatasetKind, RecordSource};
use hospdash::section::Section;
use hospdash::stats::TieBreak;

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first load or a refresh
    Loading,
    /// Sections are rendered from the last bundle
    Dashboard,
}

/// Statistics for every section, computed once per load
#[derive(Debug, Clone, PartialEq)]
pub struct Summaries {
    pub overview: OverviewSummary,
    pub diagnoses: DiagnosisSummary,
    pub gender: GenderSummary,
    pub severity: SeveritySummary,
    pub weight_stay: WeightStaySummary,
    pub insights: Vec<Insight>,
}

impl Summaries {
    pub fn from_bundle(bundle: &DatasetBundle, tie_break: TieBreak) -> Self {
        let diagnoses = bundle.get(DatasetKind::Diagnoses);
        let diagnosis_sex = bundle.get(DatasetKind::DiagnosisSex);
        let severity = bundle.get(DatasetKind::SeverityMortality);
        let weight_stay = bundle.get(DatasetKind::WeightStay);

        Self {
            overview: summary::overview(
                diagnoses.diagnoses(),
                weight_stay.weight_stay(),
                severity.severity_mortality(),
            ),
            diagnoses: summary::diagnoses(diagnoses.diagnoses(), tie_break),
            gender: summary::gender(diagnosis_sex.diagnosis_sex(), SEX_COMPARISON_ROWS),
            severity: summary::severity(severity.severity_mortality(), tie_break),
            weight_stay: summary::weight_stay(weight_stay.weight_stay()),
            insights: summary::insights(
                diagnoses.diagnoses(),
                severity.severity_mortality(),
                weight_stay.weight_stay(),
                tie_break,
            ),
        }
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Section shown in the body
    pub section: Section,
    /// Results of the last load
    pub bundle: DatasetBundle,
    pub summaries: Summaries,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Timestamp of last data refresh
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// First visible row of the section's scrollable table
    pub scroll_offset: usize,
    pub theme: Theme,
    tie_break: TieBreak,
}

impl App {
    /// Creates a new App in the loading state
    pub fn new(theme: Theme, tie_break: TieBreak) -> Self {
        let bundle = DatasetBundle::default();
        let summaries = Summaries::from_bundle(&bundle, tie_break);
        Self {
            state: AppState::Loading,
            section: Section::default(),
            bundle,
            summaries,
            should_quit: false,
            last_refresh: None,
            refresh_requested: false,
            show_help: false,
            scroll_offset: 0,
            theme,
            tie_break,
        }
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// # Arguments
    /// * `config` - The startup configuration derived from CLI arguments
    /// * `theme` - Initial colour scheme
    /// * `tie_break` - How modes are resolved in the summaries
    pub fn with_startup_config(config: &StartupConfig, theme: Theme, tie_break: TieBreak) -> Self {
        let mut app = Self::new(theme, tie_break);
        app.section = config.initial_section;
        app
    }

    /// Loads all datasets through the catalog and recomputes the summaries
    ///
    /// Transitions to the Dashboard state even when every dataset failed; the
    /// renderer shows the failure banner in that case.
    pub async fn load_all_data<S: RecordSource>(&mut self, catalog: &Catalog<S>) {
        let bundle = catalog.fetch_all().await;
        self.apply_bundle(bundle);
    }

    /// Clears the cache, then loads everything again
    pub async fn refresh<S: RecordSource>(&mut self, catalog: &Catalog<S>) {
        catalog.invalidate(None).await;
        self.load_all_data(catalog).await;
    }

    fn apply_bundle(&mut self, bundle: DatasetBundle) {
        self.summaries = Summaries::from_bundle(&bundle, self.tie_break);
        self.bundle = bundle;
        self.last_refresh = Some(Local::now());
        self.scroll_offset = self.scroll_offset.min(self.scroll_limit());
        self.state = AppState::Dashboard;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `Tab`/`Right`/`l`: Next section
    /// - `Shift-Tab`/`Left`/`h`: Previous section
    /// - `1`-`5`: Jump to a section
    /// - `Down`/`j`, `Up`/`k`: Scroll the section's table
    /// - `g`/`G`: Scroll to top/bottom
    /// - `r`: Clear the cache and reload
    /// - `t`: Switch between dark and light theme
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Dashboard => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                    self.select_section(self.section.next());
                }
                KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                    self.select_section(self.section.previous());
                }
                KeyCode::Char(c @ '1'..='5') => {
                    let index = c as usize - '1' as usize;
                    if let Some(section) = Section::from_index(index) {
                        self.select_section(section);
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.scroll_down();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.scroll_up();
                }
                KeyCode::Char('g') => {
                    self.scroll_offset = 0;
                }
                KeyCode::Char('G') => {
                    self.scroll_offset = self.scroll_limit();
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('t') => {
                    self.toggle_theme();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    fn select_section(&mut self, section: Section) {
        if section != self.section {
            self.section = section;
            self.scroll_offset = 0;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset < self.scroll_limit() {
            self.scroll_offset += 1;
        }
    }

    /// Largest useful scroll offset for the current section's table
    pub fn scroll_limit(&self) -> usize {
        let rows = match self.section {
            Section::Stay => self.summaries.weight_stay.count,
            Section::Sex => self.summaries.gender.comparison.len(),
            Section::Diagnoses => self.summaries.diagnoses.age_distribution.len(),
            Section::Overview | Section::Severity => 0,
        };
        rows.saturating_sub(1)
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }

    /// Failed datasets that feed the current section
    pub fn section_failures(&self) -> Vec<DatasetKind> {
        self.section
            .datasets()
            .iter()
            .copied()
            .filter(|kind| self.bundle.error(*kind).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use hospdash::data::{DataError, FetchError, PageRequest, Record};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard_app() -> App {
        let mut app = App::new(Theme::Dark, TieBreak::FirstSeen);
        app.state = AppState::Dashboard;
        app
    }

    /// Serves a few stays; every other endpoint is down
    #[derive(Default)]
    struct StaysOnly {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordSource for StaysOnly {
        async fn fetch_endpoint(
            &self,
            endpoint: &str,
            _page: PageRequest,
        ) -> Result<Vec<Record>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if endpoint == DatasetKind::WeightStay.endpoint() {
                let rows = (1..=3)
                    .map(|days| {
                        json!({"peso_espanol_apr": 1.0, "estancia_dias": days})
                            .as_object()
                            .cloned()
                            .unwrap()
                    })
                    .collect();
                return Ok(rows);
            }
            Err(FetchError {
                cause: DataError::Status {
                    endpoint: endpoint.to_string(),
                    offset: 0,
                    status: 500,
                    body: String::new(),
                },
                partial: Vec::new(),
            })
        }
    }

    fn catalog() -> Catalog<StaysOnly> {
        Catalog::new(
            StaysOnly::default(),
            PageRequest {
                limit: 10,
                max_records: None,
            },
            Duration::from_secs(300),
        )
    }

    #[test]
    fn test_initial_state_is_loading() {
        let app = App::new(Theme::Dark, TieBreak::FirstSeen);
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.section, Section::Overview);
        assert!(app.last_refresh.is_none());
    }

    #[test]
    fn test_startup_config_sets_section() {
        let config = StartupConfig {
            initial_section: Section::Severity,
            ..StartupConfig::default()
        };
        let app = App::with_startup_config(&config, Theme::Light, TieBreak::Lowest);
        assert_eq!(app.section, Section::Severity);
        assert_eq!(app.theme, Theme::Light);
    }

    #[test]
    fn test_only_quit_allowed_while_loading() {
        let mut app = App::new(Theme::Dark, TieBreak::FirstSeen);
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.section, Section::Overview);
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_cycles_sections() {
        let mut app = dashboard_app();
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.section, Section::Diagnoses);
        app.handle_key(key_event(KeyCode::BackTab));
        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.section, Section::Stay);
        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.section, Section::Overview);
    }

    #[test]
    fn test_number_keys_jump_to_section() {
        let mut app = dashboard_app();
        app.handle_key(key_event(KeyCode::Char('3')));
        assert_eq!(app.section, Section::Sex);
        app.handle_key(key_event(KeyCode::Char('5')));
        assert_eq!(app.section, Section::Stay);
        app.handle_key(key_event(KeyCode::Char('9')));
        assert_eq!(app.section, Section::Stay);
    }

    #[test]
    fn test_esc_quits_dashboard() {
        let mut app = dashboard_app();
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = dashboard_app();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_r_requests_refresh() {
        let mut app = dashboard_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_t_toggles_theme() {
        let mut app = dashboard_app();
        app.handle_key(key_event(KeyCode::Char('t')));
        assert_eq!(app.theme, Theme::Light);
        app.handle_key(key_event(KeyCode::Char('t')));
        assert_eq!(app.theme, Theme::Dark);
    }

    #[test]
    fn test_scroll_is_bounded_by_rows() {
        let mut app = dashboard_app();
        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.scroll_offset, 0, "Nothing to scroll without data");

        app.summaries.weight_stay.count = 3;
        app.section = Section::Stay;
        app.handle_key(key_event(KeyCode::Char('j')));
        app.handle_key(key_event(KeyCode::Char('j')));
        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.scroll_offset, 2);

        app.handle_key(key_event(KeyCode::Char('g')));
        assert_eq!(app.scroll_offset, 0);
        app.handle_key(key_event(KeyCode::Char('G')));
        assert_eq!(app.scroll_offset, 2);
        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.scroll_offset, 1);
    }

    #[test]
    fn test_changing_section_resets_scroll() {
        let mut app = dashboard_app();
        app.section = Section::Stay;
        app.scroll_offset = 5;
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_load_all_data_fills_sections_and_records_failures() {
        let catalog = catalog();
        let mut app = App::new(Theme::Dark, TieBreak::FirstSeen);

        app.load_all_data(&catalog).await;

        assert_eq!(app.state, AppState::Dashboard);
        assert!(app.last_refresh.is_some());
        assert_eq!(app.summaries.weight_stay.count, 3);
        assert_eq!(app.summaries.overview.mean_stay, Some(2.0));
        assert_eq!(app.bundle.failures().len(), 3);
        assert!(app.section_failures().contains(&DatasetKind::Diagnoses));

        app.section = Section::Stay;
        assert!(app.section_failures().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let catalog = catalog();
        let mut app = App::new(Theme::Dark, TieBreak::FirstSeen);

        app.load_all_data(&catalog).await;
        app.load_all_data(&catalog).await;
        // weight/stay cached, the three failures were retried
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 7);

        app.refresh(&catalog).await;
        assert_eq!(catalog.source().calls.load(Ordering::SeqCst), 11);
    }
}
