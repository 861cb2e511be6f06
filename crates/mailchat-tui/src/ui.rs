use mailchat_core::labels::display_name;
use mailchat_core::{ChatMessage, ChatRole, LabelState, EXAMPLE_PROMPTS};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Focus};

pub const INPUT_PLACEHOLDER: &str = "Ask about your emails and schedule...";

const SIDEBAR_WIDTH: u16 = 42;
const LABELS_HEIGHT: u16 = 9;

/// Greedy word wrap for list items, which ratatui does not wrap by itself.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [sidebar_area, chat_column] = Layout::horizontal([
        Constraint::Length(SIDEBAR_WIDTH),
        Constraint::Min(0),
    ])
    .areas(body_area);

    let [prompts_area, labels_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(LABELS_HEIGHT),
    ])
    .areas(sidebar_area);

    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(chat_column);

    // Store areas for mouse hit-testing
    app.prompts_area = Some(prompts_area);
    app.chat_area = Some(chat_area);

    render_prompts(app, frame, prompts_area);
    render_labels(app, frame, labels_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status = match &app.state().labels {
        LabelState::Loading => Span::styled(" loading labels ", Style::default().fg(Color::Gray)),
        LabelState::Loaded(labels) => Span::styled(
            format!(" {} labels ", labels.len()),
            Style::default().fg(Color::Green),
        ),
        LabelState::Failed(_) => Span::styled(
            " labels unavailable ",
            Style::default().fg(Color::LightRed),
        ),
    };

    let title = Line::from(vec![
        Span::styled(" Mail Assistant ", Style::default().fg(Color::Magenta).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        Span::raw(" "),
        status,
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_prompts(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Prompts;
    let border_color = if focused { Color::Magenta } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Example Prompts ");

    // Borders, highlight symbol and glyph column
    let text_width = area.width.saturating_sub(2 + 2 + 2) as usize;

    let items: Vec<ListItem> = EXAMPLE_PROMPTS
        .iter()
        .map(|prompt| {
            let mut lines = Vec::new();
            for (i, line) in wrap_words(prompt.text, text_width).into_iter().enumerate() {
                let lead = if i == 0 { prompt.icon.glyph() } else { " " };
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", lead), Style::default().fg(Color::Magenta)),
                    Span::styled(line, Style::default().add_modifier(Modifier::BOLD)),
                ]));
            }
            for line in wrap_words(prompt.description, text_width) {
                lines.push(Line::from(Span::styled(
                    format!("  {}", line),
                    Style::default().fg(Color::Gray),
                )));
            }
            lines.push(Line::default());
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused {
            Style::default().bg(Color::Magenta).fg(Color::White)
        } else {
            Style::default()
        })
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.prompt_state);
}

fn render_labels(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Labels ");

    match &app.state().labels {
        LabelState::Loading => {
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            let text = Paragraph::new(Span::styled(
                format!("Loading labels{}", dots),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            ))
            .block(block);
            frame.render_widget(text, area);
        }
        LabelState::Loaded(labels) if labels.is_empty() => {
            let text = Paragraph::new(Span::styled("No labels", Style::default().fg(Color::Gray)))
                .block(block);
            frame.render_widget(text, area);
        }
        LabelState::Loaded(labels) => {
            let items: Vec<ListItem> = labels
                .iter()
                .map(|label| ListItem::new(format!(" • {}", display_name(label))))
                .collect();
            frame.render_widget(List::new(items).block(block), area);
        }
        LabelState::Failed(message) => {
            let text = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Could not load labels:",
                    Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(message.as_str(), Style::default().fg(Color::LightRed))),
            ])
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(text, area);
        }
    }
}

/// The conversation as rendered in the chat pane, without border or scroll.
///
/// Scroll limits are computed from this same paragraph so they match what is drawn.
pub fn chat_paragraph(messages: &[ChatMessage]) -> Paragraph<'static> {
    let mut lines: Vec<Line> = Vec::new();
    for msg in messages {
        let (label, color, alignment) = match msg.role {
            ChatRole::User => ("You", Color::Cyan, Alignment::Right),
            ChatRole::Assistant => ("Assistant", Color::Yellow, Alignment::Left),
        };

        lines.push(
            Line::from(Span::styled(
                format!("{}:", label),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
        );
        for line in msg.content.lines() {
            let line = match msg.role {
                ChatRole::User => Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::Cyan),
                )),
                ChatRole::Assistant => Line::from(line.to_string()),
            };
            lines.push(line.alignment(alignment));
        }
        lines.push(Line::default());
    }

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inner size minus borders, for scroll calculations
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chat ");

    let chat = chat_paragraph(app.state().conversation.messages())
        .block(block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.focus == Focus::Input;
    let border_color = if editing { Color::Magenta } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message (Enter to send) ");

    let input = &app.state().input;

    // Calculate visible portion of input with horizontal scrolling
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let paragraph = if input.is_empty() {
        Paragraph::new(Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        let visible_text: String = input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(paragraph.block(block), area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let (mode_text, mode_style, hints) = match app.focus {
        Focus::Prompts => (
            " PROMPTS ",
            Style::default().bg(Color::Blue).fg(Color::White),
            vec![
                (" j/k ", " nav "),
                (" Enter ", " use prompt "),
                (" Tab ", " focus "),
                (" PgUp/PgDn ", " scroll "),
                (" q ", " quit "),
            ],
        ),
        Focus::Input => (
            " CHAT ",
            Style::default().bg(Color::Magenta).fg(Color::White),
            vec![
                (" Enter ", " send "),
                (" Esc ", " prompts "),
                (" Tab ", " focus "),
                (" PgUp/PgDn ", " scroll "),
                (" Ctrl-C ", " quit "),
            ],
        ),
    };

    let mut spans = vec![
        Span::styled(mode_text, mode_style),
        Span::styled(" ", label_style),
    ];
    for (key, label) in hints {
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(label, label_style));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailchat_core::{ChatController, LabelsClient, ViewEvent};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn app() -> App {
        App::new(ChatController::start(LabelsClient::new("http://127.0.0.1:1/labels")))
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        screen_text(&terminal)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap_words("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_words("", 10), vec![""]);
        assert_eq!(wrap_words("unbreakableword", 4), vec!["unbreakableword"]);
    }

    #[tokio::test]
    async fn test_render_shows_greeting_prompts_and_placeholder() {
        let mut app = app();
        let screen = draw(&mut app);

        assert!(screen.contains("Example Prompts"));
        assert!(screen.contains("Hello! I can help you manage your emails"));
        assert!(screen.contains(INPUT_PLACEHOLDER));
        assert!(screen.contains("Loading labels"));
    }

    #[tokio::test]
    async fn test_narrow_chat_scrolls_to_end_of_reply() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(58, 24)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert_eq!(app.chat_width, 14);

        let long_message = "Please find every message from the finance team about the quarterly \
                            budget review and list them by date";
        for c in long_message.chars() {
            app.insert_char(c);
        }
        app.submit_input();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let screen = screen_text(&terminal);
        assert!(screen.contains("calendar?"), "end of reply not visible:\n{}", screen);

        // Scrolling further down must not run past the end either.
        app.scroll_chat_down(1000);
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        assert!(screen_text(&terminal).contains("calendar?"));
    }

    #[tokio::test]
    async fn test_render_failed_labels_shows_message() {
        let mut app = app();
        app.controller.shutdown();
        app.controller.dispatch(ViewEvent::LabelsFailed("Internal Server Error".into()));
        let screen = draw(&mut app);

        assert!(screen.contains("Could not load labels"));
        assert!(screen.contains("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_render_loaded_labels() {
        let mut app = app();
        app.controller.shutdown();
        app.controller
            .dispatch(ViewEvent::LabelsLoaded(vec![json!("INBOX"), json!({"name": "Work"})]));
        let screen = draw(&mut app);

        assert!(screen.contains("INBOX"));
        assert!(screen.contains("Work"));
        assert!(screen.contains("2 labels"));
    }
}
