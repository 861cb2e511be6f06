use mailchat_core::{ChatController, ViewState, EXAMPLE_PROMPTS};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Prompts,
    Input,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,
    pub controller: ChatController,

    // Example prompt sidebar
    pub prompt_state: ListState,

    // Input editing
    pub cursor: usize, // char position in the input buffer

    // Chat area
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height, updated during render
    pub chat_width: u16,  // inner width, updated during render

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub prompts_area: Option<Rect>,
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(controller: ChatController) -> Self {
        let mut prompt_state = ListState::default();
        prompt_state.select(Some(0));

        Self {
            should_quit: false,
            focus: Focus::Input,
            controller,
            prompt_state,
            cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            prompts_area: None,
            chat_area: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        self.controller.state()
    }

    pub fn quit(&mut self) {
        self.controller.shutdown();
        self.should_quit = true;
    }

    /// Advance the loading animation and pick up the label result.
    pub fn tick(&mut self) {
        if self.state().labels.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.controller.poll_labels();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Prompts => Focus::Input,
            Focus::Input => Focus::Prompts,
        };
    }

    // Prompt sidebar
    pub fn prompt_down(&mut self) {
        let i = self.prompt_state.selected().unwrap_or(0);
        self.prompt_state
            .select(Some((i + 1).min(EXAMPLE_PROMPTS.len() - 1)));
    }

    pub fn prompt_up(&mut self) {
        let i = self.prompt_state.selected().unwrap_or(0);
        self.prompt_state.select(Some(i.saturating_sub(1)));
    }

    /// Copy the highlighted prompt into the input and start editing it.
    pub fn select_highlighted_prompt(&mut self) {
        let Some(prompt) = self
            .prompt_state
            .selected()
            .and_then(|i| EXAMPLE_PROMPTS.get(i))
        else {
            return;
        };
        self.controller.select_prompt(prompt.text);
        self.cursor_end();
        self.focus = Focus::Input;
    }

    // Input editing
    pub fn insert_char(&mut self, c: char) {
        let mut input = self.state().input.clone();
        let byte_pos = char_to_byte_index(&input, self.cursor);
        input.insert(byte_pos, c);
        self.controller.set_input(input);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let mut input = self.state().input.clone();
        let byte_pos = char_to_byte_index(&input, self.cursor);
        input.remove(byte_pos);
        self.controller.set_input(input);
    }

    pub fn delete(&mut self) {
        let mut input = self.state().input.clone();
        if self.cursor < input.chars().count() {
            let byte_pos = char_to_byte_index(&input, self.cursor);
            input.remove(byte_pos);
            self.controller.set_input(input);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.state().input.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.state().input.chars().count();
    }

    pub fn submit_input(&mut self) {
        if self.controller.submit() {
            self.cursor = 0;
            self.scroll_chat_to_bottom();
        }
    }

    // Chat scrolling
    pub fn scroll_chat_down(&mut self, lines: u16) {
        let max = self.chat_line_count().saturating_sub(self.visible_chat_height());
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.chat_line_count();
        let visible_height = self.visible_chat_height();

        if total_lines > visible_height {
            self.chat_scroll = total_lines - visible_height;
        }
    }

    fn visible_chat_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    /// Rendered height of the conversation, wrapped exactly as the chat pane draws it.
    fn chat_line_count(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width
        } else {
            50
        };

        let lines = ui::chat_paragraph(self.state().conversation.messages())
            .line_count(wrap_width);
        u16::try_from(lines).unwrap_or(u16::MAX)
    }
}
