//! Terminal front-end state. Everything the player does goes through the
//! engine's public calls; this module only decides what to show next.

pub mod draw;
pub mod flavor;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::seq::SliceRandom;
use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use tracing::error;
use tui_textarea::TextArea;

use archive_raid::config::{DOOR_KEY, SAFE_KEY};
use archive_raid::engine::{
    AnswerVerdict, ClueId, CodeOutcome, DoorOutcome, GameSession, Gate, Interaction, KeyOutcome,
};
use archive_raid::puzzle::OPTION_COUNT;

pub enum Screen {
    Title,
    Room,
    Question {
        clue: ClueId,
        from: String,
        /// Display row -> original option index.
        order: [usize; OPTION_COUNT],
        selected: usize,
    },
    Keypad {
        gate: Gate,
    },
    Victory,
}

pub enum MenuOption {
    NewGame,
    Quit,
}

impl MenuOption {
    fn next(&self) -> Self {
        match self {
            MenuOption::NewGame => MenuOption::Quit,
            MenuOption::Quit => MenuOption::NewGame,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<'a> {
    pub session: GameSession,
    pub screen: Screen,
    pub menu_selection: MenuOption,
    pub selected: usize,
    pub keypad: TextArea<'a>,
    pub message: String,
    pub message_style: Style,
    pub command_mode: bool,
    pub command_buffer: String,
    pub games_started: u32,
    pub wrong_answers: u32,
}

impl<'a> App<'a> {
    pub fn new(session: GameSession) -> Self {
        App {
            session,
            screen: Screen::Title,
            menu_selection: MenuOption::NewGame,
            selected: 0,
            keypad: new_keypad(),
            message: String::from("Find the hidden numbers. Open the safe. Escape."),
            message_style: Style::default().fg(Color::Yellow),
            command_mode: false,
            command_buffer: String::new(),
            games_started: 0,
            wrong_answers: 0,
        }
    }

    /// Everything the player can walk up to: room objects, then the gates.
    pub fn entries(&self) -> Vec<String> {
        let mut entries = self.session.locations().keys().to_vec();
        entries.push(SAFE_KEY.to_string());
        entries.push(DOOR_KEY.to_string());
        entries
    }

    fn start_game(&mut self) {
        // The first game uses the session built at startup.
        if self.games_started > 0 {
            if let Err(err) = self.new_session() {
                self.fail(format!("Could not start a new game: {err}"));
                return;
            }
        }
        self.games_started += 1;
        self.wrong_answers = 0;
        self.selected = 0;
        self.screen = Screen::Room;
        self.info(format!(
            "{} mode. Find the hidden numbers. Open the safe. Escape.",
            self.session.mode().label()
        ));
    }

    fn new_session(&mut self) -> Result<(), archive_raid::InitError> {
        self.session = self.session.restart()?;
        Ok(())
    }

    fn info(&mut self, text: impl Into<String>) {
        self.message = text.into();
        self.message_style = Style::default().fg(Color::Yellow);
    }

    fn good(&mut self, text: impl Into<String>) {
        self.message = text.into();
        self.message_style = Style::default().fg(Color::Green);
    }

    fn fail(&mut self, text: impl Into<String>) {
        self.message = text.into();
        self.message_style = Style::default().fg(Color::Red);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match self.screen {
            Screen::Title => return self.handle_title(key),
            Screen::Victory => {
                return match key.code {
                    KeyCode::Enter => {
                        self.screen = Screen::Title;
                        Flow::Continue
                    }
                    _ => Flow::Quit,
                };
            }
            Screen::Question { .. } => {
                self.handle_question(key);
                return Flow::Continue;
            }
            Screen::Keypad { gate } => {
                self.handle_keypad(gate, key);
                return Flow::Continue;
            }
            Screen::Room => {}
        }

        if self.command_mode {
            return self.handle_command_key(key);
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char(':'), KeyModifiers::NONE) => {
                self.command_mode = true;
                self.command_buffer.clear();
            }
            (KeyCode::Esc, _) => {
                self.message = "Type :q to quit".to_string();
                self.message_style = Style::default().fg(Color::DarkGray);
            }
            (KeyCode::Up | KeyCode::Char('k'), _) => {
                self.selected = self.selected.saturating_sub(1);
            }
            (KeyCode::Down | KeyCode::Char('j'), _) => {
                let last = self.entries().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
            }
            (KeyCode::Enter | KeyCode::Char(' '), _) => {
                if let Some(target) = self.entries().get(self.selected).cloned() {
                    self.interact(&target);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_title(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                self.menu_selection = self.menu_selection.next();
            }
            KeyCode::Enter => match self.menu_selection {
                MenuOption::NewGame => self.start_game(),
                MenuOption::Quit => return Flow::Quit,
            },
            KeyCode::Char('q') => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    // Command mode handling (vim-style :q)
    fn handle_command_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => {
                self.command_mode = false;
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let command = std::mem::take(&mut self.command_buffer);
                self.command_mode = false;
                return self.run_command(command.trim());
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
                if self.command_buffer.is_empty() {
                    self.command_mode = false;
                }
            }
            KeyCode::Char(c) => self.command_buffer.push(c),
            _ => {}
        }
        Flow::Continue
    }

    fn run_command(&mut self, command: &str) -> Flow {
        match command {
            "q" | "quit" => return Flow::Quit,
            "help" => {
                self.message = "Commands: :q (quit), :new (restart), :shuffle (move every clue), :state (dump game state)".to_string();
                self.message_style = Style::default().fg(Color::Cyan);
            }
            "new" => {
                self.start_game();
            }
            "shuffle" => {
                self.session.shuffle_all_clues();
                self.info("The room shifts around you. Every clue has moved.");
            }
            "state" => match serde_json::to_string_pretty(&self.session.snapshot()) {
                Ok(json) => {
                    self.message = json;
                    self.message_style = Style::default().fg(Color::Cyan);
                }
                Err(err) => self.fail(format!("System error: {err}")),
            },
            "" => {}
            other => self.fail(format!("Unknown command: {other}")),
        }
        Flow::Continue
    }

    fn interact(&mut self, target: &str) {
        let name = flavor::display_name(target);
        match self.session.resolve_interaction(target) {
            Interaction::Unknown => self.fail(format!("{name}: you can't reach that.")),
            Interaction::Empty => {
                let line = flavor::flavor_text(target);
                self.info(format!("{name}: {line}"));
            }
            Interaction::Question { clue, .. } => {
                let mut order = [0, 1, 2, 3];
                order.shuffle(&mut rand::thread_rng());
                self.screen = Screen::Question {
                    clue,
                    from: target.to_string(),
                    order,
                    selected: 0,
                };
                self.info("Choose an answer (1-4 or arrows + Enter). Esc to step away.");
            }
            Interaction::AlreadySolved { digit, .. } => {
                self.good(format!("{name}: SOLVED. You found a number here: {digit}"));
            }
            Interaction::Retraced { digit, step, .. } => {
                let total = self.chain_total();
                self.good(format!(
                    "{name}: You retrace your steps. The number {digit} is still here. Trail {step}/{total}."
                ));
            }
            Interaction::OutOfOrder { .. } => {
                self.fail(format!(
                    "{name}: The trail goes cold. You have to start again from the first clue."
                ));
            }
            Interaction::Keypad {
                locked_out: true, ..
            } => {
                self.fail("SECURITY LOCKOUT. The keypad is dead. Type :new to start over.");
            }
            Interaction::Keypad {
                ready: false, ..
            } => {
                let digits = self.collected_digits();
                self.fail(format!(
                    "LOCK DISABLED. MISSING DATA. Collect all {} numbers to activate. COLLECTED: [ {} ]",
                    self.session.clues().len(),
                    digits
                ));
            }
            Interaction::Keypad { gate, .. } => {
                self.keypad = new_keypad();
                self.screen = Screen::Keypad { gate };
                self.info(format!(
                    "AVAILABLE NUMBERS: [ {} ]  Type the code, Enter to try it, Esc to step away.",
                    self.collected_digits()
                ));
            }
            Interaction::SafeOpen { key_taken: false } => match self.session.take_key() {
                KeyOutcome::Taken | KeyOutcome::AlreadyHeld => {
                    self.good("You take the old SKELETON KEY.");
                }
                KeyOutcome::SafeLocked | KeyOutcome::NoSafe => {
                    self.fail("The safe won't give up its key.");
                }
            },
            Interaction::SafeOpen { key_taken: true } => {
                self.info("SAFE: Empty. You already have the key.");
            }
            Interaction::SafeDisabled => {
                self.info("SAFE: It's locked. The keypad seems broken or disabled. Maybe the code is for the door?");
            }
            Interaction::Door { .. } => match self.session.open_door() {
                DoorOutcome::Escaped => self.win(),
                DoorOutcome::Locked => {
                    self.fail("LOCKED. The door is locked tight. It requires a specific key.");
                }
                DoorOutcome::NeedsCode => self.info("The door has a keypad."),
            },
        }
    }

    fn handle_question(&mut self, key: KeyEvent) {
        let Screen::Question {
            selected, order, ..
        } = &mut self.screen
        else {
            return;
        };
        let choice = match key.code {
            KeyCode::Esc => {
                // Stepping away commits nothing.
                self.screen = Screen::Room;
                self.info("You step away.");
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                *selected = selected.saturating_sub(1);
                return;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *selected = (*selected + 1).min(OPTION_COUNT - 1);
                return;
            }
            KeyCode::Enter => order[*selected],
            KeyCode::Char(c @ '1'..='4') => order[c as usize - '1' as usize],
            _ => return,
        };
        self.answer(choice);
    }

    fn answer(&mut self, choice: usize) {
        let Screen::Question { clue, from, .. } =
            std::mem::replace(&mut self.screen, Screen::Room)
        else {
            return;
        };

        match self.session.submit_answer(clue, choice) {
            Ok(AnswerVerdict::Correct { digit, step, .. }) => {
                let trail = step
                    .map(|s| format!(" Trail {s}/{}.", self.chain_total()))
                    .unwrap_or_default();
                self.good(format!("CORRECT! You found a number: {digit}.{trail}"));
            }
            Ok(AnswerVerdict::Incorrect { chain_reset }) => {
                self.wrong_answers += 1;
                let mut text = String::from("WRONG!");
                if chain_reset {
                    text.push_str(" The trail goes cold; start again from the first clue.");
                }
                if self.session.config().relocate_on_wrong_answer {
                    match self.session.move_clue(clue, &from) {
                        Ok(Some(_)) => text.push_str(
                            " The clue has vanished. You must find it again elsewhere.",
                        ),
                        Ok(None) => {}
                        Err(err) => error!("relocating clue {clue} failed: {err}"),
                    }
                }
                self.fail(text);
            }
            Ok(AnswerVerdict::AlreadySolved) => self.info("You already solved this one."),
            Ok(AnswerVerdict::OutOfOrder) => {
                self.fail("The trail goes cold. You have to start again from the first clue.");
            }
            Err(err) => {
                self.message = format!("System error: {err}");
                self.message_style = Style::default().fg(Color::Magenta);
            }
        }
    }

    fn handle_keypad(&mut self, gate: Gate, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Room;
                self.info("You step away from the keypad.");
            }
            KeyCode::Enter => {
                let code = self.keypad.lines().join("");
                self.try_code(gate, &code);
            }
            KeyCode::Char(c) if !c.is_ascii_digit() => {}
            KeyCode::Char(_) => {
                let max = self.session.clues().len();
                let typed: usize = self.keypad.lines().iter().map(|l| l.len()).sum();
                if typed < max {
                    self.keypad.input(key);
                }
            }
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Left | KeyCode::Right => {
                self.keypad.input(key);
            }
            _ => {}
        }
    }

    fn try_code(&mut self, gate: Gate, code: &str) {
        self.keypad = new_keypad();
        match self.session.attempt_code(code) {
            CodeOutcome::Unlocked if self.session.is_escaped() => self.win(),
            CodeOutcome::Unlocked | CodeOutcome::AlreadyUnlocked => {
                self.screen = Screen::Room;
                self.good("SAFE UNLOCKED. The safe opens. Inside, you find an old SKELETON KEY. Use the safe again to take it.");
            }
            CodeOutcome::Wrong { attempts_remaining } => {
                let hint = self
                    .session
                    .safe_hint()
                    .map(|h| format!("  HINT: {h}"))
                    .unwrap_or_default();
                let lock = match gate {
                    Gate::Safe => "SAFE",
                    Gate::Door => "DOOR",
                };
                self.fail(format!(
                    "{lock}: INVALID CODE. ATTEMPTS REMAINING: {attempts_remaining}.{hint}"
                ));
            }
            CodeOutcome::LockedOut | CodeOutcome::Exhausted => {
                // Same as the arcade cabinet: a lockout wipes the room.
                match self.new_session() {
                    Ok(()) => {
                        self.screen = Screen::Room;
                        self.selected = 0;
                        self.fail("SECURITY LOCKOUT. Too many failed attempts. Clues have been relocated. Codes reset.");
                    }
                    Err(err) => {
                        self.screen = Screen::Room;
                        self.fail(format!("SECURITY LOCKOUT. Could not reset the room: {err}"));
                    }
                }
            }
        }
    }

    fn win(&mut self) {
        self.screen = Screen::Victory;
        self.message = String::from("You escaped the archive!");
        self.message_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
    }

    fn chain_total(&self) -> u32 {
        self.session.chain().map(|c| c.total_steps).unwrap_or(0)
    }

    pub fn collected_digits(&self) -> String {
        self.session
            .clues()
            .collected_digits()
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn new_keypad<'a>() -> TextArea<'a> {
    let mut keypad = TextArea::default();
    keypad.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Keypad [Enter: Try | Esc: Back] "),
    );
    keypad.set_cursor_line_style(Style::default());
    keypad
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_raid::config::GameConfig;
    use archive_raid::engine::GameSetup;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App<'static> {
        let session =
            GameSession::with_seed(GameSetup::new(GameConfig::default()), 42).unwrap();
        let mut app = App::new(session);
        app.handle_key(press(KeyCode::Enter));
        app
    }

    fn open(app: &mut App, target: &str) {
        let idx = app.entries().iter().position(|e| e == target).unwrap();
        app.selected = idx;
        app.handle_key(press(KeyCode::Enter));
    }

    #[test]
    fn title_enter_starts_in_room() {
        let app = app();
        assert!(matches!(app.screen, Screen::Room));
        assert_eq!(app.games_started, 1);
    }

    #[test]
    fn escape_from_question_commits_nothing() {
        let mut app = app();
        let at = app.session.locations().location_of(0).unwrap().to_string();
        let before = app.session.snapshot();

        open(&mut app, &at);
        assert!(matches!(app.screen, Screen::Question { clue: 0, .. }));
        app.handle_key(press(KeyCode::Esc));

        assert!(matches!(app.screen, Screen::Room));
        assert_eq!(app.session.snapshot(), before);
    }

    #[test]
    fn full_run_through_the_ui() {
        let mut app = app();
        for slot in 0..4 {
            let at = app.session.locations().location_of(slot).unwrap().to_string();
            open(&mut app, &at);
            let correct = app.session.select_question(slot).unwrap().correct;
            let Screen::Question { order, .. } = &app.screen else {
                panic!("question should be open");
            };
            let row = order.iter().position(|&o| o == correct).unwrap();
            app.handle_key(press(KeyCode::Char(char::from(b'1' + row as u8))));
        }
        assert!(app.session.all_solved());

        open(&mut app, SAFE_KEY);
        assert!(matches!(app.screen, Screen::Keypad { gate: Gate::Safe }));
        for c in "1858".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.handle_key(press(KeyCode::Enter));
        assert!(app.session.safe().unlocked);

        open(&mut app, SAFE_KEY);
        assert!(app.session.has_key());
        open(&mut app, DOOR_KEY);
        assert!(matches!(app.screen, Screen::Victory));
    }

    #[test]
    fn lockout_resets_the_room() {
        let mut app = app();
        for code in ["0000", "1111", "2222"] {
            app.screen = Screen::Keypad { gate: Gate::Safe };
            app.try_code(Gate::Safe, code);
        }
        assert_eq!(app.session.safe().attempts_remaining, 3);
        assert!(app.message.starts_with("SECURITY LOCKOUT"));
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut app = app();
        assert_eq!(app.run_command("dance"), Flow::Continue);
        assert_eq!(app.message, "Unknown command: dance");
        assert_eq!(app.run_command("q"), Flow::Quit);
    }
}
