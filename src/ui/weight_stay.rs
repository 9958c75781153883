//! Stay section: relative weight against length of stay

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Cell, Chart, Dataset as ChartDataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use hospdash::data::DatasetKind;
use hospdash::stats::{format_count, format_number};

use super::theme::Palette;
use super::{render_placeholder, section_block};
use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(4)])
        .split(columns[1]);

    if app.summaries.weight_stay.count == 0 {
        let kind = DatasetKind::WeightStay;
        render_placeholder(frame, app, palette, columns[0], "Weight vs stay", kind);
        render_placeholder(frame, app, palette, right[0], "Stay statistics", kind);
        render_placeholder(frame, app, palette, right[1], "Discharges", kind);
        return;
    }

    render_scatter(frame, app, palette, columns[0]);
    render_stats(frame, app, palette, right[0]);
    render_rows(frame, app, palette, right[1]);
}

/// Axis bounds padded so points never sit on the border
fn bounds(range: Option<(f64, f64)>) -> [f64; 2] {
    match range {
        Some((min, max)) if max > min => [min.min(0.0), max * 1.05],
        Some((_, max)) => [0.0, max.abs().max(1.0) * 1.05],
        None => [0.0, 1.0],
    }
}

fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| Span::raw(format_number(*v, 1)))
        .collect()
}

fn render_scatter(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let points: Vec<(f64, f64)> = app
        .bundle
        .get(DatasetKind::WeightStay)
        .weight_stay()
        .iter()
        .map(|row| (row.relative_weight, row.stay_days))
        .collect();

    let summary = &app.summaries.weight_stay;
    let x_bounds = bounds(summary.weight_range);
    let y_bounds = bounds(summary.stay_range);

    let datasets = vec![ChartDataset::default()
        .name("discharges")
        .marker(Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(palette.accent))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(section_block("Weight vs stay", palette))
        .x_axis(
            Axis::default()
                .title("Relative weight")
                .style(Style::default().fg(palette.muted))
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("Stay (days)")
                .style(Style::default().fg(palette.muted))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );

    frame.render_widget(chart, area);
}

fn render_stats(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let summary = &app.summaries.weight_stay;
    let label = Style::default().fg(palette.muted);
    let value = Style::default().fg(palette.text).add_modifier(Modifier::BOLD);
    let optional = |v: Option<f64>| v.map_or_else(|| "N/A".to_string(), |v| format_number(v, 2));
    let range = |r: Option<(f64, f64)>| {
        r.map_or_else(
            || "N/A".to_string(),
            |(min, max)| format!("{} - {}", format_number(min, 1), format_number(max, 1)),
        )
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Discharges:   ", label),
            Span::styled(format_count(summary.count), value),
        ]),
        Line::from(vec![
            Span::styled("Mean stay:    ", label),
            Span::styled(optional(summary.mean_stay), value),
        ]),
        Line::from(vec![
            Span::styled("Mean weight:  ", label),
            Span::styled(optional(summary.mean_weight), value),
        ]),
        Line::from(vec![
            Span::styled("Stay range:   ", label),
            Span::styled(range(summary.stay_range), value),
        ]),
        Line::from(vec![
            Span::styled("Weight range: ", label),
            Span::styled(range(summary.weight_range), value),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(section_block("Stay statistics", palette)),
        area,
    );
}

fn render_rows(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let header = Row::new(vec!["#", "Weight", "Stay (days)"]).style(
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .bundle
        .get(DatasetKind::WeightStay)
        .weight_stay()
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .map(|(i, row)| {
            Row::new(vec![
                Cell::from(format_count(i + 1)).style(Style::default().fg(palette.muted)),
                Cell::from(format_number(row.relative_weight, 4)),
                Cell::from(format_number(row.stay_days, 0)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(7), Constraint::Length(10), Constraint::Min(8)],
    )
    .header(header)
    .block(section_block("Discharges", palette));

    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Summaries;
    use crate::ui::test_support::{dashboard_app, render_to_string};
    use hospdash::data::{Dataset, DatasetBundle, WeightStayRow};
    use hospdash::section::Section;
    use hospdash::stats::TieBreak;
    use std::sync::Arc;

    fn app_with_rows(rows: Vec<WeightStayRow>) -> App {
        let mut app = dashboard_app();
        app.section = Section::Stay;
        app.bundle = DatasetBundle::from_results([(
            DatasetKind::WeightStay,
            Ok(Dataset::WeightStay(Arc::new(rows))),
        )]);
        app.summaries = Summaries::from_bundle(&app.bundle, TieBreak::FirstSeen);
        app
    }

    fn row(weight: f64, stay: f64) -> WeightStayRow {
        WeightStayRow {
            relative_weight: weight,
            stay_days: stay,
        }
    }

    #[test]
    fn test_bounds_pad_range() {
        assert_eq!(bounds(None), [0.0, 1.0]);
        let b = bounds(Some((2.0, 10.0)));
        assert_eq!(b[0], 0.0);
        assert!(b[1] > 10.0);
        let flat = bounds(Some((3.0, 3.0)));
        assert!(flat[1] > 3.0);
    }

    #[test]
    fn test_stay_section_renders_stats_and_rows() {
        let app = app_with_rows(vec![row(0.5, 4.0), row(1.5, 12.0), row(1.0, 8.0)]);

        let content = render_to_string(&app, 140, 36);

        assert!(content.contains("Weight vs stay"));
        assert!(content.contains("Mean stay:    8.00"));
        assert!(content.contains("Stay range:   4.0 - 12.0"));
        assert!(content.contains("0.5000"));
        assert!(content.contains("1.5000"));
    }

    #[test]
    fn test_scroll_skips_leading_rows() {
        let mut app = app_with_rows(vec![row(0.25, 4.0), row(1.75, 12.0)]);
        app.scroll_offset = 1;

        let content = render_to_string(&app, 140, 36);

        assert!(!content.contains("0.2500"));
        assert!(content.contains("1.7500"));
    }

    #[test]
    fn test_empty_stay_section() {
        let mut app = dashboard_app();
        app.section = Section::Stay;
        let content = render_to_string(&app, 120, 36);
        assert!(content.contains("Stay statistics"));
        assert!(content.contains("No data available"));
    }
}
