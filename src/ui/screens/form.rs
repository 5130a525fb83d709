use crate::logic::FormController;
use crate::models::{FormField, FormSection};
use crate::ui::components::InputWidget;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct FormScreen<'a> {
    pub controller: &'a FormController,
    pub focused_field: FormField,
    pub editing: bool,
    pub edit_buffer: &'a str,
    pub status_message: Option<&'a str>,
    pub service_url: &'a str,
}

impl<'a> FormScreen<'a> {
    pub fn new(controller: &'a FormController) -> Self {
        Self {
            controller,
            focused_field: FormField::Latitude,
            editing: false,
            edit_buffer: "",
            status_message: None,
            service_url: "",
        }
    }

    pub fn with_focus(mut self, field: FormField) -> Self {
        self.focused_field = field;
        self
    }

    pub fn editing(mut self, editing: bool, buffer: &'a str) -> Self {
        self.editing = editing;
        self.edit_buffer = buffer;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }

    pub fn with_service(mut self, url: &'a str) -> Self {
        self.service_url = url;
        self
    }
}

impl Widget for FormScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(3), // Location
                Constraint::Length(3), // Soil
                Constraint::Length(3), // Weather + market
                Constraint::Length(3), // Rotation
                Constraint::Min(4),    // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let service = if self.service_url.is_empty() {
            "relative URLs"
        } else {
            self.service_url
        };
        let mut title = vec![
            Span::styled("Crop Advisor", Theme::title()),
            Span::styled(format!(" - Field Inputs ({})", service), Theme::dim()),
        ];
        if self.controller.view().loading {
            title.push(Span::styled("  ⟳", Theme::highlight()));
        }
        let title = Line::from(title);
        Paragraph::new(title).render(chunks[0], buf);

        self.render_row(chunks[1], buf, &FormSection::Location.fields());
        self.render_row(chunks[2], buf, &FormSection::Soil.fields());

        let mut climate = FormSection::Weather.fields();
        climate.extend(FormSection::Market.fields());
        self.render_row(chunks[3], buf, &climate);

        self.render_row(chunks[4], buf, &FormSection::Rotation.fields());
        self.render_status(chunks[5], buf);
        self.render_nav(chunks[6], buf);
    }
}

impl FormScreen<'_> {
    fn render_row(&self, area: Rect, buf: &mut Buffer, fields: &[FormField]) {
        let constraints: Vec<Constraint> = fields
            .iter()
            .map(|_| Constraint::Ratio(1, fields.len() as u32))
            .collect();

        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, field) in fields.iter().enumerate() {
            let is_focused = *field == self.focused_field;
            let value = if is_focused && self.editing {
                self.edit_buffer.to_string()
            } else {
                self.controller.field_value(*field)
            };

            InputWidget::new(field.label(), &value)
                .focused(is_focused)
                .editing(is_focused && self.editing)
                .render(cells[i], buf);
        }
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Status")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let view = self.controller.view();
        let mut lines = Vec::new();

        if view.auto_filling {
            lines.push(Line::from(Span::styled(
                "⟳ Fetching soil, weather and market data...",
                Theme::highlight(),
            )));
        }
        if view.recommending {
            lines.push(Line::from(Span::styled(
                "⟳ Getting recommendations...",
                Theme::highlight(),
            )));
        }
        if let Some(warning) = view.warning {
            lines.push(Line::from(Span::styled(
                format!("⚠ {}", warning),
                Theme::warning(),
            )));
        }
        if let Some(message) = self.status_message {
            lines.push(Line::from(Span::styled(message, Theme::error())));
        }

        lines.push(Line::from(vec![
            Span::styled("Field: ", Theme::dim()),
            Span::styled(
                format!(
                    "{} / {}",
                    self.focused_field.section().as_str(),
                    self.focused_field.label()
                ),
                Theme::normal(),
            ),
        ]));

        let rotation = if view.rotation_history.is_empty() {
            "none".to_string()
        } else {
            view.rotation_history.join(" → ")
        };
        lines.push(Line::from(vec![
            Span::styled("Rotation: ", Theme::dim()),
            Span::styled(rotation, Theme::normal()),
        ]));

        if let Some(at) = view.last_auto_fill {
            lines.push(Line::from(vec![
                Span::styled("Auto-filled at ", Theme::dim()),
                Span::styled(at.format("%H:%M:%S").to_string(), Theme::success()),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let status = self.controller.status();
        let key_style = |busy: bool| {
            if busy {
                Theme::nav_key_disabled()
            } else {
                Theme::nav_key()
            }
        };

        let nav = Line::from(vec![
            Span::styled("[Tab/↑↓]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Edit ", Theme::nav_label()),
            Span::styled("[f]", key_style(status.auto_fill_in_flight)),
            Span::styled("Auto-fill ", Theme::nav_label()),
            Span::styled("[g]", key_style(status.recommend_in_flight)),
            Span::styled("Recommend ", Theme::nav_label()),
            Span::styled("[2]", Theme::nav_key()),
            Span::styled("Results ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::{AutoDataSource, RecommendationSource};
    use crate::error::{CropwiseError, Result};
    use crate::models::{
        AutoDataSnapshot, Coordinate, RecommendationRequest, RecommendationResponse,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl AutoDataSource for Unreachable {
        async fn fetch_snapshot(&self, _coordinate: &Coordinate) -> Result<AutoDataSnapshot> {
            Err(CropwiseError::DataSourceUnavailable("unreachable".into()))
        }
    }

    #[async_trait]
    impl RecommendationSource for Unreachable {
        async fn recommend(
            &self,
            _request: &RecommendationRequest,
        ) -> Result<RecommendationResponse> {
            Err(CropwiseError::DataSourceUnavailable("unreachable".into()))
        }
    }

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
    fn renders_defaults_and_rotation() {
        let controller = FormController::new(Arc::new(Unreachable), Arc::new(Unreachable), "en");
        let area = Rect::new(0, 0, 160, 24);
        let mut buf = Buffer::empty(area);
        FormScreen::new(&controller)
            .with_service("http://agri.local")
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("http://agri.local"));
        assert!(text.contains("22.57"));
        assert!(text.contains("6.8"));
        assert!(text.contains("rice → wheat"));
    }

    #[test]
    fn edit_buffer_replaces_focused_value() {
        let controller = FormController::new(Arc::new(Unreachable), Arc::new(Unreachable), "en");
        let area = Rect::new(0, 0, 160, 24);
        let mut buf = Buffer::empty(area);
        FormScreen::new(&controller)
            .with_focus(FormField::Latitude)
            .editing(true, "10.25")
            .with_status(Some("pH must be a number"))
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("10.25"));
        assert!(!text.contains("22.57"));
        assert!(text.contains("pH must be a number"));
    }
}
