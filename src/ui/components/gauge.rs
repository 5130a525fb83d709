use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Boxed 0..=1 index shown as a percentage with a bar underneath.
pub struct IndexGauge<'a> {
    title: &'a str,
    value: f64,
}

impl<'a> IndexGauge<'a> {
    pub fn new(title: &'a str, value: f64) -> Self {
        Self { title, value }
    }

    fn ratio(&self) -> f64 {
        self.value.clamp(0.0, 1.0)
    }
}

impl Widget for IndexGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let ratio = self.ratio();
        let color = Theme::index_color(ratio);
        let value_line = Line::from(vec![Span::styled(
            format!("{:.0}%", ratio * 100.0),
            Style::default().fg(color),
        )]);
        Paragraph::new(value_line).render(inner, buf);

        if inner.height >= 2 {
            let y = inner.y + 1;
            let filled = (inner.width as f64 * ratio) as u16;
            for x in inner.x..inner.x + inner.width {
                let ch = if x < inner.x + filled { '█' } else { '░' };
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(IndexGauge::new("Profit", 1.7).ratio(), 1.0);
        assert_eq!(IndexGauge::new("Profit", -0.2).ratio(), 0.0);
    }

    #[test]
    fn bar_fills_proportionally() {
        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);
        IndexGauge::new("Profit", 0.5).render(area, &mut buf);

        // Inner width is 10; half of it filled.
        let filled = (1..11).filter(|&x| buf[(x, 2)].symbol() == "█").count();
        assert_eq!(filled, 5);
    }
}
