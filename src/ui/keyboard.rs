// Keyboard input handling for ViewerApp

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{Key, NamedKey},
};

use super::app::ViewerApp;
use crate::view::PageNav;

/// Pixels moved by one arrow key press
const ARROW_SCROLL: f32 = 40.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Unchanged,
    Redraw,
    Quit,
}

impl From<bool> for InputResult {
    fn from(changed: bool) -> Self {
        if changed {
            InputResult::Redraw
        } else {
            InputResult::Unchanged
        }
    }
}

impl ViewerApp {
    pub fn handle_keyboard(&mut self, event: KeyEvent) -> InputResult {
        if event.state != ElementState::Pressed {
            return InputResult::Unchanged;
        }

        if self.modifiers.control_key() {
            if let Key::Character(ref c) = event.logical_key {
                // Ctrl+Q: quit
                if c.eq_ignore_ascii_case("q") {
                    return InputResult::Quit;
                }
                // Ctrl+E: export recent messages
                if c.eq_ignore_ascii_case("e") {
                    self.start_export();
                    return InputResult::Redraw;
                }
                // Ctrl+N: next export count
                if c.eq_ignore_ascii_case("n") {
                    return self.cycle_export_count().into();
                }
                // Ctrl+= / Ctrl+-: more or fewer messages per page
                match c.as_str() {
                    "=" | "+" => return self.step_page_size(true).into(),
                    "-" => return self.step_page_size(false).into(),
                    _ => {}
                }
            }
        }

        match event.logical_key {
            Key::Named(NamedKey::ArrowLeft) | Key::Named(NamedKey::PageUp) => {
                self.navigate(PageNav::Prev).into()
            }
            Key::Named(NamedKey::ArrowRight) | Key::Named(NamedKey::PageDown) => {
                self.navigate(PageNav::Next).into()
            }
            Key::Named(NamedKey::Home) => self.navigate(PageNav::First).into(),
            Key::Named(NamedKey::End) => self.navigate(PageNav::Last).into(),
            Key::Named(NamedKey::ArrowUp) => self.scroll_by(-ARROW_SCROLL).into(),
            Key::Named(NamedKey::ArrowDown) => self.scroll_by(ARROW_SCROLL).into(),
            Key::Named(NamedKey::Backspace) => {
                self.pop_query_char();
                InputResult::Redraw
            }
            Key::Named(NamedKey::Escape) => {
                if !self.view().query_text().is_empty() {
                    self.set_query("");
                    InputResult::Redraw
                } else {
                    self.cancel_export().into()
                }
            }
            _ => {
                // Ctrl combinations never type into the search box
                if self.modifiers.control_key() {
                    return InputResult::Unchanged;
                }
                match event.text {
                    Some(ref text) if !text.chars().any(char::is_control) => {
                        self.push_query_text(text);
                        InputResult::Redraw
                    }
                    _ => InputResult::Unchanged,
                }
            }
        }
    }
}
