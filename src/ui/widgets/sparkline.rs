//! Trend sparkline widget for inline visualization of counts over time

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different magnitudes (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A one-row sparkline of values, scaled against the largest one
pub struct TrendSparkline<'a> {
    values: &'a [f64],
    max_value: f64,
    /// Index drawn with the highlight style
    highlight: Option<usize>,
    style: Style,
    highlight_style: Style,
}

impl<'a> TrendSparkline<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        let max_value = values.iter().copied().fold(0.0, f64::max);
        Self {
            values,
            max_value,
            highlight: None,
            style: Style::default().fg(Color::Cyan),
            highlight_style: Style::default().fg(Color::Yellow),
        }
    }

    /// Highlights the largest value
    pub fn highlight_peak(mut self) -> Self {
        self.highlight = self
            .values
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
                Some((_, b)) if b >= *v => best,
                _ => Some((i, *v)),
            })
            .map(|(i, _)| i);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    fn value_to_block(&self, value: f64) -> char {
        if self.max_value <= 0.0 {
            return BLOCKS[0];
        }
        let normalized = (value / self.max_value).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TrendSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, value) in self.values.iter().take(width).enumerate() {
            let block = self.value_to_block(*value);
            let x = area.x + i as u16;
            let y = area.y;

            let style = if self.highlight == Some(i) {
                self.highlight_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_to_block_scales_to_max() {
        let values = [0.0, 5.0, 10.0];
        let sparkline = TrendSparkline::new(&values);
        assert_eq!(sparkline.value_to_block(0.0), '▁');
        assert_eq!(sparkline.value_to_block(10.0), '█');
        assert!(BLOCKS.contains(&sparkline.value_to_block(5.0)));
    }

    #[test]
    fn test_all_zero_values_render_flat() {
        let values = [0.0, 0.0];
        let sparkline = TrendSparkline::new(&values);
        assert_eq!(sparkline.value_to_block(0.0), '▁');
    }

    #[test]
    fn test_highlight_peak_picks_first_maximum() {
        let values = [1.0, 4.0, 2.0, 4.0];
        let sparkline = TrendSparkline::new(&values).highlight_peak();
        assert_eq!(sparkline.highlight, Some(1));
    }

    #[test]
    fn test_render_writes_one_cell_per_value() {
        let values = [1.0, 2.0, 3.0];
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);

        TrendSparkline::new(&values).render(area, &mut buf);

        let row: String = (0..10)
            .map(|x| buf.cell((x, 0)).map_or(" ", |c| c.symbol()).to_string())
            .collect();
        assert!(row.starts_with('▃'));
        assert_eq!(row.chars().nth(2), Some('█'));
        assert_eq!(row.chars().nth(3), Some(' '));
    }

    #[test]
    fn test_render_truncates_to_width() {
        let values = [1.0; 20];
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        TrendSparkline::new(&values).render(area, &mut buf);
        assert_eq!(buf.area.width, 5);
    }
}
