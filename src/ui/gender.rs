//! Sex section: case split and per-diagnosis comparison

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use hospdash::data::{DatasetKind, Sex};
use hospdash::stats::{format_count, format_percentage, truncate_text};

use super::theme::Palette;
use super::{bar_line, render_placeholder, section_block};
use crate::app::App;

fn sex_color(sex: Sex, palette: &Palette) -> ratatui::style::Color {
    match sex {
        Sex::Male => palette.male,
        Sex::Female => palette.female,
    }
}

pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    if app.summaries.gender.total == 0 {
        render_placeholder(frame, app, palette, columns[0], "Cases by sex", DatasetKind::DiagnosisSex);
        render_placeholder(frame, app, palette, columns[1], "Diagnoses by sex", DatasetKind::DiagnosisSex);
        return;
    }

    render_distribution(frame, app, palette, columns[0]);
    render_comparison(frame, app, palette, columns[1]);
}

fn render_distribution(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let gender = &app.summaries.gender;
    let max = gender.cases.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let bar_width = (area.width as usize).saturating_sub(28).max(4);

    let mut lines: Vec<Line> = gender
        .cases
        .iter()
        .map(|(sex, count)| {
            bar_line(
                sex.label(),
                9,
                *count,
                max,
                bar_width,
                Style::default().fg(sex_color(*sex, palette)),
                format!("{} ({})", format_count(*count), format_percentage(*count, gender.total, 1)),
            )
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Distinct diagnoses",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (sex, unique) in &gender.unique_diagnoses {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<10}", sex.label()),
                Style::default().fg(sex_color(*sex, palette)),
            ),
            Span::raw(format_count(*unique)),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(section_block("Cases by sex", palette)),
        area,
    );
}

fn render_comparison(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let header = Row::new(vec!["Diagnosis", "Masculino", "Femenino", "Total"]).style(
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .summaries
        .gender
        .comparison
        .iter()
        .skip(app.scroll_offset)
        .map(|entry| {
            Row::new(vec![
                Cell::from(truncate_text(&entry.diagnosis, 36)),
                Cell::from(format_count(entry.male)).style(Style::default().fg(palette.male)),
                Cell::from(format_count(entry.female)).style(Style::default().fg(palette.female)),
                Cell::from(format_count(entry.total())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(section_block("Diagnoses by sex", palette));

    frame.render_widget(table, area);
}
