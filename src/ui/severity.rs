//! Severity section: level distributions and the severity x mortality crosstab

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use hospdash::data::{DatasetKind, MortalityRisk, Severity};
use hospdash::stats::{format_count, format_percentage};

use super::theme::Palette;
use super::{bar_line, render_placeholder, section_block};
use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Length(6), Constraint::Min(3)])
        .split(columns[0]);

    if app.summaries.severity.total == 0 {
        let kind = DatasetKind::SeverityMortality;
        render_placeholder(frame, app, palette, left[0], "Severity", kind);
        render_placeholder(frame, app, palette, left[1], "Mortality risk", kind);
        render_placeholder(frame, app, palette, left[2], "Highlights", kind);
        render_placeholder(frame, app, palette, columns[1], "Severity x mortality", kind);
        return;
    }

    let summary = &app.summaries.severity;
    let bar_width = (columns[0].width as usize).saturating_sub(30).max(4);

    let severity_max = summary.severity_counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let severity_lines: Vec<Line> = summary
        .severity_counts
        .iter()
        .map(|(level, count)| {
            bar_line(
                level.label(),
                9,
                *count,
                severity_max,
                bar_width,
                Style::default().fg(palette.level(level.code())),
                format!("{} ({})", format_count(*count), format_percentage(*count, summary.total, 1)),
            )
        })
        .collect();
    frame.render_widget(
        Paragraph::new(severity_lines).block(section_block("Severity", palette)),
        left[0],
    );

    let mortality_max = summary.mortality_counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let mortality_lines: Vec<Line> = summary
        .mortality_counts
        .iter()
        .map(|(risk, count)| {
            bar_line(
                risk.label(),
                9,
                *count,
                mortality_max,
                bar_width,
                Style::default().fg(palette.level(risk.code())),
                format!("{} ({})", format_count(*count), format_percentage(*count, summary.total, 1)),
            )
        })
        .collect();
    frame.render_widget(
        Paragraph::new(mortality_lines).block(section_block("Mortality risk", palette)),
        left[1],
    );

    render_highlights(frame, app, palette, left[2]);
    render_crosstab(frame, app, palette, columns[1]);
}

fn render_highlights(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let summary = &app.summaries.severity;
    let label = Style::default().fg(palette.muted);
    let value = Style::default().fg(palette.text).add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled("Most common severity:  ", label),
            Span::styled(summary.most_common_severity.map_or("-", Severity::label), value),
        ]),
        Line::from(vec![
            Span::styled("Most common mortality: ", label),
            Span::styled(summary.most_common_mortality.map_or("-", MortalityRisk::label), value),
        ]),
        Line::from(vec![
            Span::styled("Extreme severity:      ", label),
            Span::styled(format_count(summary.extreme_severity), Style::default().fg(palette.danger)),
        ]),
        Line::from(vec![
            Span::styled("Extreme mortality:     ", label),
            Span::styled(format_count(summary.extreme_mortality), Style::default().fg(palette.danger)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(section_block("Highlights", palette)),
        area,
    );
}

fn render_crosstab(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let crosstab = &app.summaries.severity.crosstab;
    let max = crosstab.max_cell();
    let heading = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);

    let mut header = vec![Cell::from("Severity \\ Risk")];
    header.extend(MortalityRisk::ALL.iter().map(|risk| Cell::from(risk.label())));
    header.push(Cell::from("Total"));

    let mut rows: Vec<Row> = Severity::ALL
        .iter()
        .map(|severity| {
            let mut cells = vec![Cell::from(severity.label())
                .style(Style::default().fg(palette.level(severity.code())))];
            for risk in MortalityRisk::ALL {
                let count = crosstab.cell(*severity, risk);
                // The densest cells stand out
                let style = if max > 0 && count * 2 >= max && count > 0 {
                    Style::default().fg(palette.key).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.text)
                };
                cells.push(Cell::from(format_count(count)).style(style));
            }
            cells.push(Cell::from(format_count(crosstab.row_total(*severity))).style(heading));
            Row::new(cells)
        })
        .collect();

    let mut totals = vec![Cell::from("Total").style(heading)];
    totals.extend(
        MortalityRisk::ALL
            .iter()
            .map(|risk| Cell::from(format_count(crosstab.column_total(*risk))).style(heading)),
    );
    totals.push(Cell::from(format_count(crosstab.total())).style(heading));
    rows.push(Row::new(totals));

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(header).style(heading))
    .block(section_block("Severity x mortality", palette));

    frame.render_widget(table, area);
}
