use crate::config::Config;
use crate::logic::{FormController, Operation};
use crate::models::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Recommendations,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Form),
            '2' => Some(Screen::Recommendations),
            _ => None,
        }
    }
}

pub struct FormState {
    pub focused_field: FormField,
    pub editing: bool,
    pub edit_buffer: String,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            focused_field: FormField::Latitude,
            editing: false,
            edit_buffer: String::new(),
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    pub fn start_editing(&mut self, current_value: &str) {
        self.editing = true;
        self.edit_buffer = current_value.to_string();
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    pub fn finish_editing(&mut self) -> String {
        self.editing = false;
        std::mem::take(&mut self.edit_buffer)
    }
}

pub struct RecommendationsState {
    pub selected_index: usize,
}

impl RecommendationsState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn clamp(&mut self, len: usize) {
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub controller: FormController,

    pub form_state: FormState,
    pub recommendations_state: RecommendationsState,

    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Config, controller: FormController) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            config,
            controller,
            form_state: FormState::new(),
            recommendations_state: RecommendationsState::new(),
            status_message: None,
        }
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Ignored while an auto-fill is already pending.
    pub fn request_auto_fill(&mut self) {
        if self.controller.status().is_busy(Operation::AutoFill) {
            return;
        }
        self.clear_status();
        self.controller.auto_fill();
    }

    /// Ignored while a recommendation request is already pending.
    pub fn request_recommendations(&mut self) {
        if self.controller.status().is_busy(Operation::Recommend) {
            return;
        }
        self.clear_status();
        self.controller.get_recommendations();
        self.switch_screen(Screen::Recommendations);
    }

    pub fn begin_edit(&mut self) {
        let current = self.controller.field_value(self.form_state.focused_field);
        self.form_state.start_editing(&current);
    }

    pub fn commit_edit(&mut self) {
        let field = self.form_state.focused_field;
        let value = self.form_state.finish_editing();
        match self.controller.set_field(field, &value) {
            Ok(()) => self.clear_status(),
            Err(e) => {
                tracing::debug!(field = field.label(), "rejected input: {}", e);
                self.set_status(&e.to_string());
            }
        }
    }

    /// Folds finished network calls into state. Called once per frame.
    pub fn tick(&mut self) {
        if self.controller.poll_outcomes() > 0 {
            let len = self.controller.recommendations().len();
            self.recommendations_state.clamp(len);
        }
    }

    pub fn shutdown(&mut self) {
        self.controller.teardown();
    }
}
