use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::completer::COMMANDS;

/// Syntax highlighter for the shell
pub struct ReplHighlighter {
    commands: Vec<&'static str>,
}

impl ReplHighlighter {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _)| *name).collect(),
        }
    }
}

impl Default for ReplHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        // Find the first whitespace to split command from args
        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };

        let cmd_lower = command.to_lowercase();
        let cmd_style = if self.commands.contains(&cmd_lower.as_str()) {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((cmd_style, command.to_string()));

        if rest.is_empty() {
            return styled;
        }

        match cmd_lower.as_str() {
            "push" | "replace" | "navigate" | "nav" => {
                // Target, then optional JSON state
                if let Some(json_pos) = rest.find(['{', '[', '"']) {
                    styled.push((Style::new().fg(Color::Yellow), rest[..json_pos].to_string()));
                    styled.push((Style::new().fg(Color::Green), rest[json_pos..].to_string()));
                } else {
                    styled.push((Style::new().fg(Color::Yellow), rest.to_string()));
                }
            }
            "href" | "go" => {
                styled.push((Style::new().fg(Color::Yellow), rest.to_string()));
            }
            "type" => {
                styled.push((Style::new().fg(Color::Magenta), rest.to_string()));
            }
            _ => {
                styled.push((Style::new(), rest.to_string()));
            }
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knows_every_shell_command() {
        let highlighter = ReplHighlighter::new();
        for cmd in ["render", "push", "replace", "nav", "back", "type", "state", "exit"] {
            assert!(highlighter.commands.contains(&cmd), "{cmd}");
        }
    }

    #[test]
    fn highlight_empty_returns_empty() {
        let styled = ReplHighlighter::new().highlight("", 0);
        assert!(styled.buffer.is_empty());
    }

    #[test]
    fn highlight_unknown_command() {
        let styled = ReplHighlighter::new().highlight("teleport", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Red));
    }

    #[test]
    fn highlight_push_with_target() {
        let styled = ReplHighlighter::new().highlight("push /a/one", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[0].1, "push");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert_eq!(styled.buffer[1].1, " /a/one");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Yellow));
    }

    #[test]
    fn highlight_navigate_with_state() {
        let styled = ReplHighlighter::new().highlight("nav /a {\"from\": 1}", 0);
        assert_eq!(styled.buffer.len(), 3);
        assert_eq!(styled.buffer[1].1, " /a ");
        assert_eq!(styled.buffer[2].1, "{\"from\": 1}");
        assert_eq!(styled.buffer[2].0.foreground, Some(Color::Green));
    }

    #[test]
    fn highlight_draft_text() {
        let styled = ReplHighlighter::new().highlight("type hello there", 0);
        assert_eq!(styled.buffer[1].1, " hello there");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Magenta));
    }
}
