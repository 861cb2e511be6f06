//! Example prompts offered next to the chat.

use crate::state::ViewEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Calendar,
    Mail,
    Clock,
    Sparkles,
}

impl Icon {
    /// Single-cell glyph used when rendering in a terminal.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Calendar => "▦",
            Icon::Mail => "✉",
            Icon::Clock => "◷",
            Icon::Sparkles => "✦",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamplePrompt {
    pub icon: Icon,
    pub text: &'static str,
    pub description: &'static str,
}

impl ExamplePrompt {
    /// The event that copies this prompt into the input buffer.
    pub fn select(&self) -> ViewEvent {
        select(self.text)
    }
}

pub const EXAMPLE_PROMPTS: [ExamplePrompt; 4] = [
    ExamplePrompt {
        icon: Icon::Calendar,
        text: "Summarize all my emails from February 14th",
        description: "Get a quick overview of your Valentine's Day communications",
    },
    ExamplePrompt {
        icon: Icon::Mail,
        text: "Find all meeting invites from last week",
        description: "Quickly locate and organize recent meeting requests",
    },
    ExamplePrompt {
        icon: Icon::Clock,
        text: "Show upcoming deadlines mentioned in emails",
        description: "Stay on top of important due dates and commitments",
    },
    ExamplePrompt {
        icon: Icon::Sparkles,
        text: "Analyze my email response time",
        description: "Get insights into your email communication patterns",
    },
];

/// Build the event that writes `prompt_text` into the input verbatim.
pub fn select(prompt_text: &str) -> ViewEvent {
    ViewEvent::SelectPrompt(prompt_text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{reduce, ViewState};

    #[test]
    fn test_prompt_order_is_fixed() {
        let texts: Vec<&str> = EXAMPLE_PROMPTS.iter().map(|p| p.text).collect();
        assert_eq!(
            texts,
            vec![
                "Summarize all my emails from February 14th",
                "Find all meeting invites from last week",
                "Show upcoming deadlines mentioned in emails",
                "Analyze my email response time",
            ]
        );
        let icons: Vec<Icon> = EXAMPLE_PROMPTS.iter().map(|p| p.icon).collect();
        assert_eq!(icons, vec![Icon::Calendar, Icon::Mail, Icon::Clock, Icon::Sparkles]);
    }

    #[test]
    fn test_every_prompt_has_a_description() {
        assert!(EXAMPLE_PROMPTS.iter().all(|p| !p.description.is_empty()));
    }

    #[test]
    fn test_select_writes_prompt_without_submitting() {
        for prompt in &EXAMPLE_PROMPTS {
            let state = reduce(ViewState::new(), prompt.select());
            assert_eq!(state.input, prompt.text);
            assert_eq!(state.conversation.len(), 1);
        }
    }

    #[test]
    fn test_select_replaces_existing_input() {
        let state = reduce(ViewState::new(), ViewEvent::InputChanged("half typed".into()));
        let state = reduce(state, select("Find all meeting invites from last week"));
        assert_eq!(state.input, "Find all meeting invites from last week");
    }
}
