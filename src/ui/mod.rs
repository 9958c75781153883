//! UI rendering module for the discharge dashboard
//!
//! Every frame is laid out as a tab bar, an optional failure banner, the body
//! of the selected section, and a one-line status bar. Sections only read the
//! precomputed summaries and the bundle held by [`App`].

pub mod diagnoses;
pub mod gender;
pub mod help_overlay;
pub mod overview;
pub mod severity;
pub mod theme;
pub mod weight_stay;
pub mod widgets;

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

use hospdash::data::DatasetKind;
use hospdash::section::Section;

use crate::app::{App, AppState};
use theme::Palette;

pub use help_overlay::render as render_help_overlay;

/// Shown in place of a chart or table whose dataset has no rows
pub const NO_DATA: &str = "No data available";

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);

    if app.state == AppState::Loading {
        render_loading(frame, &palette);
        return;
    }

    let failures = app.bundle.failures();
    let banner_height = if failures.is_empty() { 0 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title + tabs
            Constraint::Length(banner_height), // Failure banner
            Constraint::Min(5),                // Section body
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, &palette, chunks[0]);
    if !failures.is_empty() {
        render_banner(frame, app, &palette, chunks[1]);
    }

    match app.section {
        Section::Overview => overview::render(frame, app, &palette, chunks[2]),
        Section::Diagnoses => diagnoses::render(frame, app, &palette, chunks[2]),
        Section::Sex => gender::render(frame, app, &palette, chunks[2]),
        Section::Severity => severity::render(frame, app, &palette, chunks[2]),
        Section::Stay => weight_stay::render(frame, app, &palette, chunks[2]),
    }

    render_status(frame, app, &palette, chunks[3]);

    if app.show_help {
        render_help_overlay(frame, &palette);
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut Frame, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(frame.area());

    let loading_text = Paragraph::new("Loading discharge data...")
        .style(Style::default().fg(palette.accent))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

fn render_tabs(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let titles: Vec<Line> = Section::all()
        .iter()
        .enumerate()
        .map(|(i, section)| Line::from(format!("{} {}", i + 1, section.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.block_border())
                .title(Span::styled(" HOSPDASH · Hospital discharges ", palette.title())),
        )
        .select(app.section.index())
        .style(Style::default().fg(palette.muted))
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );

    frame.render_widget(tabs, area);
}

/// Text of the failure banner, or `None` when everything loaded
pub fn banner_text(app: &App) -> Option<String> {
    if app.bundle.all_failed() {
        return Some("Data could not be loaded from the API. Press r to retry.".to_string());
    }
    let failures = app.bundle.failures();
    if failures.is_empty() {
        return None;
    }
    let names: Vec<&str> = failures.iter().map(|kind| kind.title()).collect();
    Some(format!("Some data could not be loaded: {}", names.join(", ")))
}

fn render_banner(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    if let Some(text) = banner_text(app) {
        let banner = Paragraph::new(Line::from(Span::styled(
            format!(" ⚠ {text}"),
            Style::default()
                .fg(palette.danger)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(banner, area);
    }
}

/// Renders the key hints at the bottom of the screen with data freshness
fn render_status(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let key = Style::default().fg(palette.key);
    let mut spans = vec![
        Span::styled("Tab/1-5", key),
        Span::raw(" Section  "),
        Span::styled("j/k", key),
        Span::raw(" Scroll  "),
        Span::styled("r", key),
        Span::raw(" Refresh  "),
        Span::styled("t", key),
        Span::raw(" Theme  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit"),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let elapsed = Local::now() - last_refresh;
        let mins_ago = elapsed.num_minutes();
        let freshness_text = if mins_ago < 1 {
            format!(" │ Updated {} (just now)", last_refresh.format("%H:%M:%S"))
        } else {
            format!(" │ Updated {} ({}m ago)", last_refresh.format("%H:%M:%S"), mins_ago)
        };
        spans.push(Span::styled(freshness_text, Style::default().fg(palette.muted)));

        let missing = app.section_failures();
        if missing.is_empty() {
            spans.push(Span::styled(" │ ● OK", Style::default().fg(palette.success)));
        } else {
            spans.push(Span::styled(
                format!(" │ {} of {} sources failed", missing.len(), app.section.datasets().len()),
                Style::default().fg(palette.danger),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(palette.muted));
    frame.render_widget(paragraph, area);
}

/// Bordered block with the palette's title style
pub fn section_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(palette.block_border())
        .title(Span::styled(format!(" {title} "), palette.title()))
}

/// Renders the empty-state message for a chart or table
///
/// When `kind` failed to load, the failure reason is shown instead of the
/// generic "no data" text.
pub fn render_placeholder(
    frame: &mut Frame,
    app: &App,
    palette: &Palette,
    area: Rect,
    title: &str,
    kind: DatasetKind,
) {
    let (text, style) = match app.bundle.error(kind) {
        Some(err) => (
            format!("Failed to load: {err}"),
            Style::default().fg(palette.danger),
        ),
        None => (NO_DATA.to_string(), Style::default().fg(palette.muted)),
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(section_block(title, palette));
    frame.render_widget(paragraph, area);
}

/// A `label ████ value` line scaled against `max`
pub fn bar_line(
    label: &str,
    label_width: usize,
    count: usize,
    max: usize,
    bar_width: usize,
    style: Style,
    suffix: String,
) -> Line<'static> {
    let filled = if max == 0 {
        0
    } else {
        ((count as f64 / max as f64) * bar_width as f64).round() as usize
    };
    Line::from(vec![
        Span::raw(format!("{:<width$} ", label, width = label_width)),
        Span::styled("█".repeat(filled.max(usize::from(count > 0))), style),
        Span::raw(format!(" {suffix}")),
    ])
}
