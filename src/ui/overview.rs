//! Overview section: KPI cards and key insights

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use hospdash::data::DatasetKind;
use hospdash::stats::{format_count, format_number};

use super::section_block;
use super::theme::Palette;
use crate::app::App;

/// One KPI card
struct Card {
    title: &'static str,
    value: String,
    subtitle: &'static str,
    source: DatasetKind,
}

fn cards(app: &App) -> [Card; 4] {
    let overview = &app.summaries.overview;
    [
        Card {
            title: "Total cases",
            value: format_count(overview.total_cases),
            subtitle: "Records analysed",
            source: DatasetKind::Diagnoses,
        },
        Card {
            title: "Mean stay",
            value: overview
                .mean_stay
                .filter(|m| *m > 0.0)
                .map_or_else(|| "N/A".to_string(), |m| format_number(m, 1)),
            subtitle: "Days on average",
            source: DatasetKind::WeightStay,
        },
        Card {
            title: "Severe cases",
            value: format_count(overview.severe_cases),
            subtitle: "Major or extreme",
            source: DatasetKind::SeverityMortality,
        },
        Card {
            title: "Diagnoses",
            value: format_count(overview.unique_diagnoses),
            subtitle: "Distinct principal",
            source: DatasetKind::Diagnoses,
        },
    ]
}

pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[0]);

    for (card, card_area) in cards(app).iter().zip(card_areas.iter()) {
        render_card(frame, app, palette, card, *card_area);
    }

    render_insights(frame, app, palette, chunks[1]);
}

fn render_card(frame: &mut Frame, app: &App, palette: &Palette, card: &Card, area: Rect) {
    let failed = app.bundle.error(card.source).is_some();
    let (value, value_style, subtitle) = if failed {
        (
            "N/A".to_string(),
            Style::default().fg(palette.muted),
            "Failed to load",
        )
    } else {
        (
            card.value.clone(),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
            card.subtitle,
        )
    };

    let subtitle_style = if failed {
        Style::default().fg(palette.danger)
    } else {
        Style::default().fg(palette.muted)
    };

    let lines = vec![
        Line::from(Span::styled(value, value_style)),
        Line::from(Span::styled(subtitle, subtitle_style)),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(section_block(card.title, palette));
    frame.render_widget(paragraph, area);
}

fn render_insights(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let mut lines = Vec::new();
    for insight in &app.summaries.insights {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<16}", insight.title),
                Style::default()
                    .fg(palette.key)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(insight.text.clone(), Style::default().fg(palette.text)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(section_block("Key insights", palette));
    frame.render_widget(paragraph, area);
}
