use reedline::{Completer, Span, Suggestion};

use crate::demo::NAV_LINKS;

/// Shell commands and their descriptions.
pub const COMMANDS: [(&str, &str); 20] = [
    ("help", "Show help"),
    ("exit", "Exit the shell"),
    ("quit", "Exit the shell"),
    ("q", "Exit the shell"),
    ("render", "Render the app"),
    ("push", "Push through the legacy history"),
    ("replace", "Replace through the legacy history"),
    ("navigate", "Navigate through the router"),
    ("nav", "Navigate through the router"),
    ("back", "Go back one entry"),
    ("forward", "Go forward one entry"),
    ("go", "Move n entries"),
    ("type", "Set the draft text"),
    ("clear", "Empty the draft text"),
    ("location", "Print the current location"),
    ("loc", "Print the current location"),
    ("state", "Print the router state"),
    ("href", "Print the href for a target"),
    ("entries", "List history entries"),
    ("?", "Show help"),
];

/// Command and target completer for the shell
pub struct ReplCompleter {
    commands: Vec<String>,
}

impl ReplCompleter {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS
                .iter()
                .filter(|(name, _)| name.len() > 2)
                .map(|(name, _)| name.to_string())
                .collect(),
        }
    }
}

impl Default for ReplCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ReplCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        // Get the word being typed
        let line_to_pos = &line[..pos];
        let words: Vec<&str> = line_to_pos.split_whitespace().collect();

        if words.is_empty() || (words.len() == 1 && !line_to_pos.ends_with(' ')) {
            // Completing the command itself
            let prefix = words.first().copied().unwrap_or("");
            let start = line_to_pos.rfind(prefix).unwrap_or(0);

            for cmd in &self.commands {
                if cmd.starts_with(prefix) {
                    suggestions.push(suggestion(cmd, command_description(cmd), start, pos));
                }
            }
        } else if takes_target(words[0]) && words.len() <= 2 {
            // Completing a target from the demo's links
            let prefix = if line_to_pos.ends_with(' ') { "" } else { words[words.len() - 1] };
            let start = pos - prefix.len();

            for link in NAV_LINKS {
                if link.starts_with(prefix) {
                    suggestions.push(suggestion(link, String::from("page"), start, pos));
                }
            }
        }

        suggestions
    }
}

fn suggestion(value: &str, description: String, start: usize, end: usize) -> Suggestion {
    Suggestion {
        value: value.to_string(),
        description: Some(description),
        style: None,
        extra: None,
        span: Span::new(start, end),
        append_whitespace: true,
        match_indices: None,
    }
}

fn takes_target(cmd: &str) -> bool {
    matches!(
        cmd.to_lowercase().as_str(),
        "push" | "replace" | "navigate" | "nav" | "href"
    )
}

fn command_description(cmd: &str) -> String {
    COMMANDS
        .iter()
        .find(|(name, _)| *name == cmd)
        .map(|(_, desc)| desc.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(suggestions: Vec<Suggestion>) -> Vec<String> {
        suggestions.into_iter().map(|s| s.value).collect()
    }

    #[test]
    fn completes_command_prefix() {
        let mut completer = ReplCompleter::new();
        assert_eq!(values(completer.complete("re", 2)), vec!["render", "replace"]);
    }

    #[test]
    fn completes_targets_for_navigation_commands() {
        let mut completer = ReplCompleter::new();
        assert_eq!(
            values(completer.complete("push /v6", 8)),
            vec!["/v6", "/v6/child"]
        );
        let all = completer.complete("nav ", 4);
        assert_eq!(all.len(), NAV_LINKS.len());
        assert_eq!(all[0].span, Span::new(4, 4));
    }

    #[test]
    fn no_targets_for_other_commands() {
        let mut completer = ReplCompleter::new();
        assert!(completer.complete("type /a", 7).is_empty());
    }

    #[test]
    fn describes_commands() {
        assert_eq!(command_description("back"), "Go back one entry");
        assert_eq!(command_description("nope"), "");
    }
}
