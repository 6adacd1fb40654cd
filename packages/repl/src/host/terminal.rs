//! Reedline-backed host: line editing, completion of commands and demo
//! pages, a guard-aware prompt and y/N questions from guarded pages.

use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultHinter, EditCommand, EditMode, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, Keybindings, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, PromptViMode, Reedline, ReedlineEvent, ReedlineMenu,
    Signal as ReedlineSignal, Vi,
};

use navbridge_legacy_adapter::Confirm;
use tracing::{debug, warn};

use crate::completer::ReplCompleter;
use crate::highlighter::ReplHighlighter;
use crate::io::{Guard, IoError, IoHost, Output, OutputKind, PromptState, Signal};

const COMPLETION_MENU: &str = "completion_menu";
const HISTORY_SIZE: usize = 1000;

pub struct TerminalHost {
    editor: Reedline,
    line: Option<String>,
    signal: Option<Signal>,
    prompt: TerminalPrompt,
    confirm: Rc<TerminalConfirm>,
}

impl TerminalHost {
    pub fn new() -> io::Result<Self> {
        let menu = ColumnarMenu::default()
            .with_name(COMPLETION_MENU)
            .with_text_style(Style::new().fg(Color::Cyan))
            .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan).bold());

        let mut editor = Reedline::create()
            .with_completer(Box::new(ReplCompleter::new()))
            .with_highlighter(Box::new(ReplHighlighter::new()))
            .with_hinter(Box::new(
                DefaultHinter::default().with_style(Style::new().fg(Color::LightGray).dimmed()),
            ))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
            .with_edit_mode(edit_mode(prefers_vi()));

        if let Some(path) = history_path() {
            if let Some(Err(error)) = path.parent().map(std::fs::create_dir_all) {
                debug!(%error, "cannot create history directory");
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(error) => debug!(%error, "command history disabled"),
            }
        }

        Ok(Self {
            editor,
            line: None,
            signal: None,
            prompt: TerminalPrompt(PromptState::default()),
            confirm: Rc::new(TerminalConfirm),
        })
    }
}

impl IoHost for TerminalHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        match self.editor.read_line(&self.prompt) {
            Ok(ReedlineSignal::Success(line)) => self.line = Some(line),
            Ok(ReedlineSignal::CtrlC) => self.signal = Some(Signal::Interrupt),
            Ok(ReedlineSignal::CtrlD) => self.signal = Some(Signal::Eof),
            Err(error) => return Err(IoError::Editor(error.to_string())),
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<String>, IoError> {
        Ok(self.line.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", styled(&output))?;
        Ok(())
    }

    fn write_prompt(&mut self, prompt: PromptState) -> Result<(), IoError> {
        self.prompt = TerminalPrompt(prompt);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        io::stdout().flush()?;
        Ok(())
    }

    fn confirmer(&self) -> Rc<dyn Confirm> {
        self.confirm.clone()
    }
}

fn styled(output: &Output) -> String {
    match output.kind {
        OutputKind::Tree | OutputKind::Reply => output.text.clone(),
        OutputKind::Error => format!("{} {}", Color::Red.bold().paint("Error:"), output.text),
        OutputKind::Notice | OutputKind::Banner => Color::Cyan.paint(&output.text).to_string(),
    }
}

/// Asks on the terminal. Anything but `y`/`yes` declines.
struct TerminalConfirm;

impl TerminalConfirm {
    fn ask(message: &str) -> io::Result<bool> {
        let mut stdout = io::stdout();
        write!(
            stdout,
            "{} {} ",
            Color::Yellow.bold().paint(message),
            Color::LightGray.paint("[y/N]")
        )?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        Self::ask(message).unwrap_or_else(|error| {
            warn!(%error, "confirmation prompt failed; declining");
            false
        })
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// `held /a/blocker >`, `1 blocker(s) /a >`, `unguarded / >`.
struct TerminalPrompt(PromptState);

impl Prompt for TerminalPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let guard = match self.0.guard() {
            Guard::Held => Color::Red.bold().paint("held"),
            Guard::Unguarded => Color::DarkGray.paint("unguarded"),
            Guard::Blockers(n) => Color::Blue.bold().paint(format!("{n} blocker(s)")),
        };
        Cow::Owned(format!("{} {}", guard, Color::Yellow.paint(&self.0.location)))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        let indicator = match edit_mode {
            PromptEditMode::Vi(PromptViMode::Normal) => Color::Blue.bold().paint("[N]>"),
            PromptEditMode::Vi(PromptViMode::Insert) => Color::Green.bold().paint("[I]>"),
            PromptEditMode::Custom(name) => return Cow::Owned(format!("({name})> ")),
            PromptEditMode::Default | PromptEditMode::Emacs => Color::Green.bold().paint(">"),
        };
        Cow::Owned(format!("{indicator} "))
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let failing = match search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({failing}reverse-search: {}) ", search.term))
    }
}

fn edit_mode(vi: bool) -> Box<dyn EditMode> {
    if vi {
        let mut insert = default_vi_insert_keybindings();
        complete_on_tab(&mut insert);
        return Box::new(Vi::new(insert, default_vi_normal_keybindings()));
    }
    let mut keys = default_emacs_keybindings();
    complete_on_tab(&mut keys);
    keys.add_binding(
        KeyModifiers::CONTROL,
        KeyCode::Char('d'),
        ReedlineEvent::Edit(vec![EditCommand::Clear]),
    );
    Box::new(Emacs::new(keys))
}

fn complete_on_tab(keys: &mut Keybindings) {
    keys.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
}

fn history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("navbridge").join("history.txt"))
}

/// `NAVBRIDGE_EDIT_MODE` (set by `--vi`/`--emacs`) decides first, then
/// `EDITOR`/`VISUAL`, then an inputrc `editing-mode` setting.
fn prefers_vi() -> bool {
    if let Ok(mode) = std::env::var("NAVBRIDGE_EDIT_MODE") {
        return matches!(mode.to_lowercase().as_str(), "vi" | "vim");
    }
    if ["EDITOR", "VISUAL"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .any(|editor| names_vi(&editor))
    {
        return true;
    }

    [
        std::env::var("INPUTRC").ok().map(PathBuf::from),
        dirs::home_dir().map(|home| home.join(".inputrc")),
        Some(PathBuf::from("/etc/inputrc")),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| std::fs::read_to_string(path).ok())
    .any(|contents| inputrc_sets_vi(&contents))
}

fn names_vi(editor: &str) -> bool {
    let editor = editor.to_lowercase();
    editor.contains("vim") || editor == "vi"
}

fn inputrc_sets_vi(contents: &str) -> bool {
    contents.lines().map(str::trim).any(|line| {
        line.starts_with("set") && line.contains("editing-mode") && line.contains("vi")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn prompt_shows_guard_state() {
        let prompt = TerminalPrompt(PromptState {
            location: "/a/blocker".to_string(),
            blocker_count: 1,
            held: false,
        });
        let left = prompt.render_prompt_left();
        assert!(left.contains("1 blocker(s)"));
        assert!(left.contains("/a/blocker"));

        let held = TerminalPrompt(PromptState {
            held: true,
            ..prompt.0
        });
        assert!(held.render_prompt_left().contains("held"));
    }

    #[test]
    fn recognises_vi_editors() {
        assert!(names_vi("nvim"));
        assert!(names_vi("/usr/bin/vim"));
        assert!(names_vi("VI"));
        assert!(!names_vi("emacs"));
        assert!(!names_vi("nano"));
    }

    #[test]
    fn reads_inputrc_editing_mode() {
        assert!(inputrc_sets_vi("# comment\n  set editing-mode vi\n"));
        assert!(!inputrc_sets_vi("set editing-mode emacs\n"));
        assert!(!inputrc_sets_vi(""));
    }

    #[test]
    fn errors_get_a_prefix() {
        let text = styled(&Output::error("bad target"));
        assert!(text.contains("Error:"));
        assert!(text.ends_with("bad target"));
        assert_eq!(styled(&Output::reply("/a")), "/a");
    }
}
