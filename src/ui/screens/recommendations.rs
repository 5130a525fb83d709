use crate::models::Recommendation;
use crate::ui::components::IndexGauge;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget, Wrap},
};

pub struct RecommendationsScreen<'a> {
    pub recommendations: &'a [Recommendation],
    pub selected_index: usize,
    pub loading: bool,
    pub warning: Option<&'a str>,
}

impl<'a> RecommendationsScreen<'a> {
    pub fn new(recommendations: &'a [Recommendation]) -> Self {
        Self {
            recommendations,
            selected_index: 0,
            loading: false,
            warning: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn with_warning(mut self, warning: Option<&'a str>) -> Self {
        self.warning = warning;
        self
    }
}

impl Widget for RecommendationsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Warning
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let mut title = vec![
            Span::styled("Recommendations", Theme::title()),
            Span::styled(
                format!(" ({} crops)", self.recommendations.len()),
                Theme::dim(),
            ),
        ];
        if self.loading {
            title.push(Span::styled("  ⟳ updating...", Theme::highlight()));
        }
        Paragraph::new(Line::from(title)).render(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.render_list(content[0], buf);
        self.render_details(content[1], buf);

        if let Some(warning) = self.warning {
            Paragraph::new(Span::styled(format!("⚠ {}", warning), Theme::warning()))
                .render(chunks[2], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::nav_label()),
            Span::styled("[g]", Theme::nav_key()),
            Span::styled("Refresh ", Theme::nav_label()),
            Span::styled("[1/Esc]", Theme::nav_key()),
            Span::styled("Back to form", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[3], buf);
    }
}

impl RecommendationsScreen<'_> {
    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Ranked Crops")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.recommendations.is_empty() {
            let hint = if self.loading {
                "Waiting for results..."
            } else {
                "No recommendations yet. Press [g] to request."
            };
            Paragraph::new(Span::styled(hint, Theme::dim())).render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                let style = if i == self.selected_index {
                    Theme::selected()
                } else {
                    Style::default()
                };

                let line = Line::from(vec![
                    Span::styled(format!("{:>2}. ", i + 1), Theme::dim()),
                    Span::styled(rec.crop_name.as_str(), Theme::normal()),
                    Span::styled(format!("  {:.1}", rec.score), Theme::highlight()),
                ]);

                ListItem::new(line).style(style)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let rec = match self.recommendations.get(self.selected_index) {
            Some(r) => r,
            None => {
                Paragraph::new(Span::styled(
                    "Select a crop to view details",
                    Theme::dim(),
                ))
                .render(inner, buf);
                return;
            }
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Summary
                Constraint::Length(4), // Gauges
                Constraint::Min(2),    // Notes
            ])
            .split(inner);

        let summary = vec![
            Line::from(Span::styled(rec.crop_name.as_str(), Theme::header())),
            Line::from(vec![
                Span::styled("Score: ", Theme::dim()),
                Span::styled(format!("{:.1}", rec.score), Theme::highlight()),
            ]),
            Line::from(vec![
                Span::styled("Expected yield: ", Theme::dim()),
                Span::styled(rec.yield_label(), Theme::normal()),
            ]),
        ];
        Paragraph::new(summary).render(rows[0], buf);

        let gauges = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        IndexGauge::new("Profit", rec.profit_index).render(gauges[0], buf);
        IndexGauge::new("Sustainability", rec.sustainability_score).render(gauges[1], buf);

        if rec.has_notes() {
            let notes = vec![
                Line::from(Span::styled("Notes:", Theme::dim())),
                Line::from(Span::styled(
                    rec.notes.as_deref().unwrap_or_default(),
                    Theme::normal(),
                )),
            ];
            Paragraph::new(notes)
                .wrap(Wrap { trim: true })
                .render(rows[2], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn empty_list_shows_hint() {
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        RecommendationsScreen::new(&[]).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("No recommendations yet"));
    }

    #[test]
    fn selected_crop_details_rendered() {
        let recs = vec![Recommendation {
            crop_name: "Jute".into(),
            score: 91.0,
            expected_yield_tons_per_hectare: 2.6,
            profit_index: 0.62,
            sustainability_score: 0.81,
            notes: Some("Suited to high rainfall".into()),
        }];
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        RecommendationsScreen::new(&recs)
            .with_warning(Some("offline"))
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Jute"));
        assert!(text.contains("2.6 t/ha"));
        assert!(text.contains("Suited to high rainfall"));
        assert!(text.contains("offline"));
    }
}
