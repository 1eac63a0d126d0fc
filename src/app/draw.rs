use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use archive_raid::config::{DOOR_KEY, SAFE_KEY};
use archive_raid::engine::Gate;

use super::flavor::display_name;
use super::{App, MenuOption, Screen};

pub fn draw_ui(f: &mut Frame, app: &App) {
    if matches!(app.screen, Screen::Title) {
        draw_title_screen(f, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(f.area());

    draw_status_bar(f, app, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    draw_room(f, app, main_chunks[0]);
    match &app.screen {
        Screen::Question {
            clue,
            order,
            selected,
            ..
        } => draw_question(f, app, *clue, order, *selected, main_chunks[1]),
        Screen::Keypad { gate } => draw_keypad(f, app, *gate, main_chunks[1]),
        Screen::Victory => draw_victory(f, app, main_chunks[1]),
        Screen::Room | Screen::Title => draw_overview(f, app, main_chunks[1]),
    }

    // Message area
    let message_content = if app.command_mode {
        format!(":{}", app.command_buffer)
    } else {
        app.message.clone()
    };
    let (message_style, message_title) = if app.command_mode {
        (Style::default().fg(Color::White).bg(Color::DarkGray), " Command ")
    } else {
        match app.screen {
            Screen::Victory => (
                Style::default().fg(Color::Black).bg(Color::Green),
                " ESCAPED! ",
            ),
            _ => (app.message_style, " Notes "),
        }
    };
    let message = Paragraph::new(message_content)
        .block(Block::default().borders(Borders::ALL).title(message_title))
        .wrap(Wrap { trim: false })
        .style(message_style);
    f.render_widget(message, chunks[2]);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let safe = session.safe();

    let mut spans = vec![
        Span::styled(
            " ARCHIVE RAID ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", session.mode().label()),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                " Clues {}/{} ",
                session.clues().solved_count(),
                session.clues().len()
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Attempts: {} ", safe.attempts_remaining),
            Style::default().fg(if safe.attempts_remaining > 1 {
                Color::Green
            } else {
                Color::Red
            }),
        ),
    ];
    if let Some(chain) = session.chain() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" Trail {}/{} ", chain.current_step, chain.total_steps),
            Style::default().fg(Color::Magenta),
        ));
    }
    if session.has_key() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            " KEY ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let status_block =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(status_block, area);
}

fn draw_room(f: &mut Frame, app: &App, area: Rect) {
    let entries = app.entries();
    // Keep the selection on screen.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = app.selected.saturating_sub(visible.saturating_sub(1));

    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(idx, key)| {
            let label = display_name(key);
            let style = if idx == app.selected {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if key == SAFE_KEY || key == DOOR_KEY {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(format!(" {label} "), style))
        })
        .collect();

    let room = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" The Archive [j/k: Move | Enter: Search] "),
    );
    f.render_widget(room, area);
}

fn draw_overview(f: &mut Frame, app: &App, area: Rect) {
    let digits = app.collected_digits();
    let text = format!(
        "You are locked in the archive. {} numbers are hidden among the clutter. \
        Answer each clue's question to reveal its number, then open the safe.\n\n\
        COLLECTED: [ {} ]\n\n\
        Type :help for commands.",
        app.session.clues().len(),
        if digits.is_empty() { "-" } else { digits.as_str() }
    );
    let overview = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" The Chamber "))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    f.render_widget(overview, area);
}

fn draw_question(
    f: &mut Frame,
    app: &App,
    clue: usize,
    order: &[usize],
    selected: usize,
    area: Rect,
) {
    let Ok(question) = app.session.select_question(clue) else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            question.prompt.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for (row, &option) in order.iter().enumerate() {
        let style = if row == selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!(" {}. {} ", row + 1, question.options[option]),
            style,
        )));
    }

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", question.title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(panel, area);
}

fn draw_keypad(f: &mut Frame, app: &App, gate: Gate, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let safe = app.session.safe();
    let mut lines = vec![
        Line::raw(format!(
            "ENTER {}-DIGIT PASSCODE",
            app.session.clues().len()
        )),
        Line::raw(format!("AVAILABLE NUMBERS: [ {} ]", app.collected_digits())),
        Line::raw(""),
        Line::from(Span::styled(
            format!("ATTEMPTS REMAINING: {}", safe.attempts_remaining),
            Style::default().fg(Color::Red),
        )),
    ];
    if let Some(hint) = app.session.safe_hint() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("HINT: {hint}"),
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let title = match gate {
        Gate::Safe => " SAFE LOCK ",
        Gate::Door => " DOOR LOCK ",
    };
    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(panel, chunks[0]);
    f.render_widget(&app.keypad, chunks[1]);
}

fn draw_victory(f: &mut Frame, app: &App, area: Rect) {
    let safe = app.session.safe();
    let text = format!(
        "=== YOU ESCAPED! ===\n\n\
        ╔══════════════════════════╗\n\
        ║  RUN STATS               ║\n\
        ╠══════════════════════════╣\n\
        ║  Clues solved:     {:>4}  ║\n\
        ║  Wrong answers:    {:>4}  ║\n\
        ║  Codes tried:      {:>4}  ║\n\
        ╚══════════════════════════╝\n\n\
        ENTER to play again, any other key to exit...",
        app.session.clues().solved_count(),
        app.wrong_answers,
        safe.max_attempts - safe.attempts_remaining + 1,
    );
    let panel = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Victory "))
        .style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(panel, area);
}

fn draw_title_screen(f: &mut Frame, app: &App) {
    let area = f.area();

    let title_art = r#"
    ╔═══════════════════════════════════════════════╗
    ║                                               ║
    ║        A R C H I V E      R A I D             ║
    ║                                               ║
    ║     Hidden numbers. One safe. Three tries.    ║
    ║                                               ║
    ║           "Escape the Archive"                ║
    ║                                               ║
    ╚═══════════════════════════════════════════════╝
"#;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let title = Paragraph::new(title_art)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let new_game_style = if matches!(app.menu_selection, MenuOption::NewGame) {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let new_game = Paragraph::new("  NEW GAME  ")
        .style(new_game_style)
        .alignment(Alignment::Center);
    f.render_widget(new_game, chunks[1]);

    let quit_style = if matches!(app.menu_selection, MenuOption::Quit) {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let quit = Paragraph::new("  QUIT  ")
        .style(quit_style)
        .alignment(Alignment::Center);
    f.render_widget(quit, chunks[2]);

    let help = Paragraph::new("↑/↓ to select  •  ENTER to confirm  •  q to quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[3]);
}
