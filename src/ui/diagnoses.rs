//! Diagnoses section: top diagnoses, age ranges and monthly admissions

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph},
    Frame,
};

use hospdash::data::DatasetKind;
use hospdash::stats::{format_count, format_percentage, truncate_text};

use super::theme::Palette;
use super::widgets::TrendSparkline;
use super::{bar_line, render_placeholder, section_block};
use crate::app::App;

const DIAGNOSIS_LABEL_WIDTH: usize = 28;

pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(columns[1]);

    let summary = &app.summaries.diagnoses;
    if summary.total == 0 {
        render_placeholder(frame, app, palette, columns[0], "Top 10 diagnoses", DatasetKind::Diagnoses);
        render_placeholder(frame, app, palette, right[0], "Age ranges", DatasetKind::Diagnoses);
        render_placeholder(frame, app, palette, right[1], "Monthly admissions", DatasetKind::Diagnoses);
        return;
    }

    render_top_diagnoses(frame, app, palette, columns[0]);
    render_age_ranges(frame, app, palette, right[0]);
    render_monthly(frame, app, palette, right[1]);
}

fn render_top_diagnoses(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let bars: Vec<Bar> = app
        .summaries
        .diagnoses
        .top_diagnoses
        .iter()
        .map(|(diagnosis, count)| {
            Bar::default()
                .value(*count as u64)
                .label(Line::from(truncate_text(diagnosis, DIAGNOSIS_LABEL_WIDTH)))
                .text_value(format_count(*count))
                .style(Style::default().fg(palette.accent))
        })
        .collect();

    let chart = BarChart::default()
        .block(section_block("Top 10 diagnoses", palette))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(palette.text))
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn render_age_ranges(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let summary = &app.summaries.diagnoses;
    let max = summary.age_distribution.first().map_or(0, |(_, c)| *c);
    let bar_width = (area.width as usize).saturating_sub(30).max(4);

    let mut lines: Vec<Line> = summary
        .age_distribution
        .iter()
        .skip(app.scroll_offset)
        .map(|(range, count)| {
            bar_line(
                range,
                10,
                *count,
                max,
                bar_width,
                Style::default().fg(palette.accent),
                format!("{} ({})", format_count(*count), format_percentage(*count, summary.total, 1)),
            )
        })
        .collect();

    if let Some(mode) = &summary.most_common_age_range {
        lines.insert(
            0,
            Line::from(vec![
                Span::styled("Most common: ", Style::default().fg(palette.muted)),
                Span::styled(mode.clone(), Style::default().fg(palette.key)),
            ]),
        );
    }

    frame.render_widget(
        Paragraph::new(lines).block(section_block("Age ranges", palette)),
        area,
    );
}

fn render_monthly(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let months = &app.summaries.diagnoses.monthly_admissions;
    let block = section_block("Monthly admissions", palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let values: Vec<f64> = months.iter().map(|(_, count)| *count as f64).collect();
    frame.render_widget(
        TrendSparkline::new(&values)
            .highlight_peak()
            .style(Style::default().fg(palette.accent))
            .highlight_style(Style::default().fg(palette.key)),
        rows[0],
    );

    let range = match (months.first(), months.last()) {
        (Some((first, _)), Some((last, _))) => format!("{first} … {last} ({} months)", months.len()),
        _ => String::new(),
    };
    frame.render_widget(
        Paragraph::new(range).style(Style::default().fg(palette.muted)),
        rows[1],
    );
}
