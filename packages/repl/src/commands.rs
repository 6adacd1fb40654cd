//! Shell command parsing and execution.
//!
//! Commands:
//! - `render` - Render the app and print its tree
//! - `push <to> [json]` / `replace <to> [json]` - Navigate through the legacy history
//! - `navigate <to> [json]` - Navigate through the router
//! - `back`, `forward`, `go <n>` - Move through the history stack
//! - `type <text>` / `clear` - Edit the draft on the blocker page
//! - `location`, `state`, `href <to>`, `entries` - Inspect the router
//! - `help` - Show help
//! - `exit` - Exit the shell

use nu_ansi_term::{Color, Style};
use serde_json::{json, Map, Value as JsonValue};

use navbridge_legacy_adapter::History;
use navbridge_store::{BlockerState, Location, NavigateOptions, Navigation, RouterState};

use crate::context::ShellContext;

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command succeeded, optionally with output to display and a value to capture
    Ok {
        display: Option<String>,
        /// The JSON behind the display, for commands that print data
        capture: Option<JsonValue>,
    },
    /// Command failed with an error message
    Error(String),
    /// User requested to exit
    Exit,
    /// Show help
    Help,
}

impl CommandResult {
    /// Create a simple Ok result with display text
    fn ok_display(display: impl Into<String>) -> Self {
        CommandResult::Ok {
            display: Some(display.into()),
            capture: None,
        }
    }

    /// Create an Ok result displaying highlighted JSON and capturing it
    fn ok_json(value: JsonValue) -> Self {
        match format_json(&value) {
            Ok(display) => CommandResult::Ok {
                display: Some(display),
                capture: Some(value),
            },
            Err(e) => CommandResult::Error(format!("Cannot print result: {}", e)),
        }
    }

    /// Create an Ok result with no output
    fn ok_none() -> Self {
        CommandResult::Ok {
            display: None,
            capture: None,
        }
    }
}

/// Parse and execute a command
pub fn execute(input: &str, ctx: &mut ShellContext) -> CommandResult {
    let input = input.trim();

    if input.is_empty() {
        return CommandResult::ok_none();
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match command.to_lowercase().as_str() {
        "help" | "?" => CommandResult::Help,
        "exit" | "quit" | "q" => CommandResult::Exit,
        "render" => cmd_render(ctx),
        "push" => cmd_legacy(args, false, ctx),
        "replace" => cmd_legacy(args, true, ctx),
        "navigate" | "nav" => cmd_navigate(args, ctx),
        "back" => report(ctx.router().back()),
        "forward" => report(ctx.router().forward()),
        "go" => cmd_go(args, ctx),
        "type" => cmd_type(args, ctx),
        "clear" => cmd_type("", ctx),
        "location" | "loc" => cmd_location(ctx),
        "state" => CommandResult::ok_json(state_json(&ctx.state())),
        "href" => cmd_href(args, ctx),
        "entries" => cmd_entries(ctx),
        _ => CommandResult::Error(format!(
            "Unknown command: '{}'. Type 'help' for available commands.",
            command
        )),
    }
}

/// Format help text
pub fn format_help() -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);
    let desc_style = Style::new().fg(Color::White);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint("navbridge shell commands")
    ));

    let commands = [
        ("render", "", "Render the app and print its tree"),
        ("push", "<to> [json]", "Push through the legacy history"),
        ("replace", "<to> [json]", "Replace through the legacy history"),
        ("navigate", "<to> [json]", "Push through the router (alias: nav)"),
        ("back", "", "Go back one entry"),
        ("forward", "", "Go forward one entry"),
        ("go", "<n>", "Move n entries through the history"),
        ("", "", ""),
        ("type", "<text>", "Set the draft on the blocker page"),
        ("clear", "", "Empty the draft"),
        ("", "", ""),
        ("location", "", "Print the current location (alias: loc)"),
        ("state", "", "Print action, version, blockers and held transition"),
        ("href", "<to>", "Print the href for a target"),
        ("entries", "", "List the history entries"),
        ("", "", ""),
        ("help", "", "Show this help message"),
        ("exit", "", "Exit the shell (alias: quit, q)"),
    ];

    for (cmd, args, desc) in commands {
        if cmd.is_empty() {
            help.push('\n');
        } else {
            help.push_str(&format!(
                "  {:<12} {:<20} {}\n",
                cmd_style.paint(cmd),
                arg_style.paint(args),
                desc_style.paint(desc)
            ));
        }
    }

    help.push_str(&format!("\n{}\n", Style::new().bold().paint("Pages")));
    help.push_str(&format!(
        "  Modern only:          {}\n",
        arg_style.paint("/v6, /v6/:param")
    ));
    help.push_str(&format!(
        "  Legacy and modern:    {}\n",
        arg_style.paint("/a, /a/:param")
    ));
    help.push_str(&format!(
        "  Guarded draft:        {}\n",
        arg_style.paint("/a/blocker, then 'type something' and try to leave")
    ));

    help.push_str(&format!(
        "\n{}",
        Style::new()
            .italic()
            .paint("Targets: absolute ('/a/one'), relative ('one', '..'), with '?search' and '#hash'")
    ));

    help
}

fn cmd_render(ctx: &mut ShellContext) -> CommandResult {
    match ctx.render() {
        Ok(element) => CommandResult::ok_display(element.to_string()),
        Err(e) => CommandResult::Error(format!("Render failed: {}", e)),
    }
}

fn cmd_legacy(args: &str, replace: bool, ctx: &mut ShellContext) -> CommandResult {
    let (to, state) = match parse_target_args(args) {
        Ok(parsed) => parsed,
        Err(msg) => return CommandResult::Error(msg),
    };

    let before = ctx.state().location.clone();
    let history = ctx.history();
    let result = if replace {
        history.replace(to.as_str().into(), state)
    } else {
        history.push(to.as_str().into(), state)
    };

    match result {
        Ok(()) => describe_legacy(&before, &ctx.state()),
        Err(e) => CommandResult::Error(format!("Navigation failed: {}", e)),
    }
}

fn cmd_navigate(args: &str, ctx: &mut ShellContext) -> CommandResult {
    let (to, state) = match parse_target_args(args) {
        Ok(parsed) => parsed,
        Err(msg) => return CommandResult::Error(msg),
    };
    let options = NavigateOptions {
        replace: false,
        state,
    };
    report(ctx.router().navigate(to.as_str(), options))
}

fn cmd_go(args: &str, ctx: &mut ShellContext) -> CommandResult {
    match args.parse::<isize>() {
        Ok(delta) => report(ctx.router().go(delta)),
        Err(_) => CommandResult::Error(format!("Usage: go <n> (got '{}')", args)),
    }
}

fn cmd_type(args: &str, ctx: &mut ShellContext) -> CommandResult {
    ctx.set_draft(args);
    match ctx.rerender() {
        Ok(()) => CommandResult::ok_none(),
        Err(e) => CommandResult::Error(format!("Render failed: {}", e)),
    }
}

fn cmd_location(ctx: &mut ShellContext) -> CommandResult {
    match serde_json::to_value(&ctx.state().location) {
        Ok(value) => CommandResult::ok_json(value),
        Err(e) => CommandResult::Error(format!("Failed to serialize location: {}", e)),
    }
}

fn cmd_href(args: &str, ctx: &mut ShellContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: href <to>".to_string());
    }
    match ctx.router().create_href(args) {
        Ok(href) => CommandResult::Ok {
            display: Some(href.clone()),
            capture: Some(JsonValue::String(href)),
        },
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn cmd_entries(ctx: &mut ShellContext) -> CommandResult {
    let router = ctx.router();
    let current = router.index();
    let entries = router.entries();

    let mut output = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let marker = if i == current { ">" } else { " " };
        output.push_str(&format!(
            "{} {:>3} {}\n",
            Color::Green.bold().paint(marker),
            i,
            Color::Yellow.paint(entry.href())
        ));
    }

    let capture = entries.iter().map(|e| JsonValue::String(e.href())).collect();
    CommandResult::Ok {
        display: Some(output.trim_end().to_string()),
        capture: Some(JsonValue::Array(capture)),
    }
}

/// Split `<to> [json]` into the target and its optional state.
fn parse_target_args(args: &str) -> Result<(String, Option<JsonValue>), String> {
    let args = args.trim();
    if args.is_empty() {
        return Err("Usage: <command> <to> [json state]".to_string());
    }

    match args.split_once(char::is_whitespace) {
        None => Ok((args.to_string(), None)),
        Some((to, rest)) => {
            let state = serde_json::from_str(rest.trim())
                .map_err(|e| format!("Invalid JSON state: {}", e))?;
            Ok((to.to_string(), Some(state)))
        }
    }
}

/// Describe the outcome of a router navigation.
fn report(result: navbridge_store::Result<Navigation>) -> CommandResult {
    match result {
        Ok(Navigation::Committed(_)) | Ok(Navigation::Unchanged) => CommandResult::ok_none(),
        Ok(Navigation::Blocked) => CommandResult::ok_display(format!(
            "{}",
            Color::Yellow.paint("Navigation held by a blocker")
        )),
        Ok(Navigation::Cancelled(key)) => CommandResult::ok_display(format!(
            "{}",
            Color::Yellow.paint(format!("Navigation cancelled by blocker {}", key))
        )),
        Ok(Navigation::Superseded) => CommandResult::ok_display(format!(
            "{}",
            Color::Yellow.paint("Navigation superseded by another one")
        )),
        Err(e) => CommandResult::Error(format!("Navigation failed: {}", e)),
    }
}

/// The legacy history reports nothing, so compare states instead.
fn describe_legacy(before: &Location, after: &RouterState) -> CommandResult {
    if after.is_held() {
        CommandResult::ok_display(format!(
            "{}",
            Color::Yellow.paint("Navigation held by a blocker")
        ))
    } else if after.location.key == before.key {
        CommandResult::ok_display(format!(
            "{}",
            Color::Yellow.paint(format!("Navigation blocked; still at {}", before.href()))
        ))
    } else {
        CommandResult::ok_none()
    }
}

fn state_json(state: &RouterState) -> JsonValue {
    let mut blockers = Map::new();
    for (key, blocker) in &state.blockers {
        let status = match blocker {
            BlockerState::Idle => "idle",
            BlockerState::Blocked { .. } => "blocked",
            BlockerState::Proceeding { .. } => "proceeding",
        };
        blockers.insert(key.to_string(), JsonValue::String(status.to_string()));
    }

    let pending = state.pending.as_ref().map(|p| {
        json!({
            "location": p.location.href(),
            "action": p.action,
            "blocked": p.blocked.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
            "proceeding": p.proceeding.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
        })
    });

    json!({
        "action": state.history_action,
        "location": state.location.href(),
        "version": state.version,
        "blockers": blockers,
        "pending": pending,
    })
}

/// Format JSON with syntax highlighting
fn format_json(value: &JsonValue) -> serde_json::Result<String> {
    // Pretty print with indentation
    let pretty = serde_json::to_string_pretty(value)?;

    // Apply basic syntax highlighting
    let mut result = String::new();
    let mut in_string = false;
    let mut escape_next = false;

    for c in pretty.chars() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }

        if c == '\\' && in_string {
            result.push(c);
            escape_next = true;
            continue;
        }

        if c == '"' {
            in_string = !in_string;
            result.push_str(&format!("{}", Color::Green.paint("\"")));
            continue;
        }

        if in_string {
            result.push_str(&format!("{}", Color::Green.paint(c.to_string())));
        } else {
            match c {
                '{' | '}' | '[' | ']' => {
                    result.push_str(&format!("{}", Color::White.bold().paint(c.to_string())))
                }
                ':' => result.push_str(&format!("{}", Color::White.paint(":"))),
                ',' => result.push_str(&format!("{}", Color::White.paint(","))),
                _ if c.is_ascii_digit() || c == '.' || c == '-' => {
                    result.push_str(&format!("{}", Color::Cyan.paint(c.to_string())))
                }
                _ => result.push(c),
            }
        }
    }

    // Handle null, true, false keywords
    result = result
        .replace("null", &format!("{}", Color::Yellow.paint("null")))
        .replace("true", &format!("{}", Color::Yellow.paint("true")))
        .replace("false", &format!("{}", Color::Yellow.paint("false")));

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use navbridge_legacy_adapter::ScriptedConfirm;
    use navbridge_store::{Action, RouterConfig};

    fn context(entries: &[&str]) -> (ShellContext, Rc<ScriptedConfirm>) {
        let confirm = Rc::new(ScriptedConfirm::default());
        let config = RouterConfig::default().with_entries(entries.iter().copied());
        let ctx = ShellContext::new(config, confirm.clone()).unwrap();
        (ctx, confirm)
    }

    fn capture(result: CommandResult) -> JsonValue {
        match result {
            CommandResult::Ok {
                capture: Some(value),
                ..
            } => value,
            other => panic!("expected a captured value, got {:?}", other),
        }
    }

    #[test]
    fn parse_target_args_splits_state() {
        assert_eq!(parse_target_args("/a"), Ok(("/a".to_string(), None)));
        assert_eq!(
            parse_target_args("/a {\"from\": \"shell\"}"),
            Ok(("/a".to_string(), Some(json!({"from": "shell"}))))
        );
        assert!(parse_target_args("").is_err());
        assert!(parse_target_args("/a {oops").is_err());
    }

    #[test]
    fn push_and_replace_go_through_the_legacy_history() {
        let (mut ctx, _) = context(&["/"]);
        execute("push /a/one", &mut ctx);
        assert_eq!(ctx.state().location.pathname, "/a/one");
        assert_eq!(ctx.state().history_action, Action::Push);

        execute("replace /a/two {\"n\": 2}", &mut ctx);
        let state = ctx.state();
        assert_eq!(state.location.pathname, "/a/two");
        assert_eq!(state.location.state, json!({"n": 2}));
        assert_eq!(state.history_action, Action::Replace);
        assert_eq!(ctx.router().len(), 2);
    }

    #[test]
    fn navigate_back_forward_and_go() {
        let (mut ctx, _) = context(&["/"]);
        execute("nav /a", &mut ctx);
        execute("navigate one", &mut ctx);
        assert_eq!(ctx.state().location.pathname, "/a/one");

        execute("back", &mut ctx);
        assert_eq!(ctx.state().location.pathname, "/a");
        execute("forward", &mut ctx);
        assert_eq!(ctx.state().location.pathname, "/a/one");
        execute("go -2", &mut ctx);
        assert_eq!(ctx.state().location.pathname, "/");
        assert_eq!(ctx.state().history_action, Action::Pop);

        assert!(matches!(execute("go sideways", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn malformed_targets_are_reported() {
        let (mut ctx, _) = context(&["/"]);
        assert!(matches!(execute("push /a\u{7}", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(execute("href /a\u{7}", &mut ctx), CommandResult::Error(_)));
        assert_eq!(ctx.state().location.pathname, "/");
    }

    #[test]
    fn location_and_href_capture_json() {
        let (mut ctx, _) = context(&["/a?x=1#top"]);
        let location = capture(execute("location", &mut ctx));
        assert_eq!(location["pathname"], "/a");
        assert_eq!(location["search"], "?x=1");
        assert_eq!(location["hash"], "#top");

        assert_eq!(capture(execute("href /b", &mut ctx)), json!("/b"));
    }

    #[test]
    fn entries_lists_the_stack() {
        let (mut ctx, _) = context(&["/", "/a", "/v6"]);
        assert_eq!(capture(execute("entries", &mut ctx)), json!(["/", "/a", "/v6"]));
    }

    #[test]
    fn guarded_draft_holds_until_confirmed() {
        let (mut ctx, confirm) = context(&["/a/blocker"]);
        ctx.render().unwrap();
        execute("type unsaved", &mut ctx);
        ctx.settle();
        assert_eq!(ctx.router().blocker_count(), 1);

        confirm.answer(false);
        let result = execute("push /a", &mut ctx);
        assert!(matches!(result, CommandResult::Ok { display: Some(_), .. }));
        let state = ctx.state();
        assert_eq!(state.location.pathname, "/a/blocker");
        assert!(!state.is_held());

        let snapshot = capture(execute("state", &mut ctx));
        assert_eq!(snapshot["pending"], JsonValue::Null);
        assert_eq!(snapshot["location"], "/a/blocker");

        confirm.answer(true);
        execute("nav /a", &mut ctx);
        assert_eq!(ctx.state().location.pathname, "/a");
        assert_eq!(
            confirm.asked(),
            vec!["Are you sure you want to go to /a?"; 2]
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        let (mut ctx, _) = context(&["/"]);
        assert!(matches!(execute("teleport /a", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(execute("", &mut ctx), CommandResult::Ok { display: None, .. }));
        assert!(matches!(execute("EXIT", &mut ctx), CommandResult::Exit));
    }

    #[test]
    fn json_output_highlights_literals() {
        let text = format_json(&serde_json::json!({"n": 3, "ok": true, "pending": null})).unwrap();
        assert!(text.contains(&Color::Yellow.paint("true").to_string()));
        assert!(text.contains(&Color::Yellow.paint("null").to_string()));
        assert!(text.contains(&Color::Cyan.paint("3").to_string()));
    }
}
