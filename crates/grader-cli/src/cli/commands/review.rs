use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use grader_core::{Grade, GraderConfig, GraderError, ReviewSession, Role};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::stdout;

use super::super::args::ReviewArgs;
use crate::exit_codes::SUCCESS;

const COMMENT_MAX_LEN: usize = 2000;
const HEADER_FIELD_MAX_LEN: usize = 120;
const PAGE: u16 = 10;

pub fn run(args: ReviewArgs, cfg: &GraderConfig) -> Result<i32> {
    let source = super::load_corpus(cfg)?;
    let store = super::open_store(cfg);
    super::ensure_parent_dir(store.path())?;

    let mut session = ReviewSession::open(source.transcripts(), &store)?;
    if let Some(start) = &args.start {
        session.jump_to(start)?;
    }

    let mut state = AppState::new(session);
    run_tui(&mut state)?;

    let p = state.session.corpus_progress();
    eprintln!(
        "review closed: {}/{} graded (pass {}, fail {}, todo {})",
        p.graded, p.total, p.passed, p.failed, p.ungraded
    );
    Ok(SUCCESS)
}

#[derive(Debug, PartialEq)]
enum AppMode {
    Normal,
    Comment,
}

#[derive(Debug, PartialEq)]
enum Flash {
    Info(String),
    Warn(String),
    Error(String),
}

#[derive(Debug, PartialEq)]
enum Control {
    Continue,
    Quit,
}

struct AppState<'a> {
    session: ReviewSession<'a>,
    list_state: ListState,
    mode: AppMode,
    /// Verdict selected on screen, not yet saved.
    pending: Option<Grade>,
    /// Comment being edited, not yet saved.
    comment: String,
    flash: Option<Flash>,
    scroll: u16,
}

impl<'a> AppState<'a> {
    fn new(session: ReviewSession<'a>) -> Self {
        let mut state = Self {
            session,
            list_state: ListState::default(),
            mode: AppMode::Normal,
            pending: None,
            comment: String::new(),
            flash: None,
            scroll: 0,
        };
        state.reset_controls();
        state
    }

    /// Reset the grading controls to what is stored for the current transcript.
    fn reset_controls(&mut self) {
        let view = self.session.current_grade();
        self.pending = view.verdict();
        self.comment = view.comment;
        self.scroll = 0;
        self.list_state.select(Some(self.session.current_index()));
    }

    fn after_move(&mut self, moved: bool) {
        if moved {
            self.flash = None;
            self.reset_controls();
        }
    }

    fn move_selection(&mut self, delta: i64) {
        let len = self.session.len();
        if len == 0 {
            return;
        }
        let current = self.session.current_index() as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        let moved = next as i64 != current && self.session.jump(next);
        self.after_move(moved);
    }

    fn save(&mut self) {
        let result = self
            .session
            .save_current(self.pending, &self.comment)
            .map(|_| ());
        self.flash = Some(match result {
            Ok(()) => {
                let id = self.session.current().map(|t| t.id.as_str()).unwrap_or("");
                let grade = self.pending.map(|g| g.as_str()).unwrap_or("");
                Flash::Info(format!("saved {} for {}", grade.to_uppercase(), id))
            }
            Err(GraderError::Validation { message }) => Flash::Warn(message),
            Err(e) => Flash::Error(format!("save failed: {e}")),
        });
    }

    fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Control::Quit;
        }

        match self.mode {
            AppMode::Normal => match key.code {
                KeyCode::Char('q') => return Control::Quit,
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('n') | KeyCode::Right => {
                    self.move_selection(1)
                }
                KeyCode::Char('k') | KeyCode::Up | KeyCode::Char('p') | KeyCode::Left => {
                    self.move_selection(-1)
                }
                KeyCode::Home => self.move_selection(i64::MIN / 2),
                KeyCode::End => self.move_selection(i64::MAX / 2),
                KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE),
                KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
                KeyCode::Char('P') => self.pending = Some(Grade::Pass),
                KeyCode::Char('F') => self.pending = Some(Grade::Fail),
                KeyCode::Char('c') => self.mode = AppMode::Comment,
                KeyCode::Char('s') => self.save(),
                KeyCode::Esc => self.flash = None,
                _ => {}
            },
            AppMode::Comment => match key.code {
                KeyCode::Enter | KeyCode::Esc => self.mode = AppMode::Normal,
                KeyCode::Backspace => {
                    self.comment.pop();
                }
                KeyCode::Char(c) => {
                    if !c.is_control() && self.comment.chars().count() < COMMENT_MAX_LEN {
                        self.comment.push(c);
                    }
                }
                _ => {}
            },
        }
        Control::Continue
    }
}

fn run_tui(state: &mut AppState<'_>) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = run_tui_inner(state);

    // Always restore terminal state, even if the event loop errored.
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    result
}

fn run_tui_inner(state: &mut AppState<'_>) -> Result<()> {
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| draw_ui(f, state))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if state.handle_key(key) == Control::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn draw_ui(f: &mut ratatui::Frame<'_>, state: &mut AppState<'_>) {
    let corpus = state.session.corpus_progress();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main area
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let header_text = format!(
        " Trace Grader | {}/{} graded | pass {} | fail {} | todo {} ",
        corpus.graded, corpus.total, corpus.passed, corpus.failed, corpus.ungraded
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[1]);

    // Left: progress gauge and transcript list
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(main_chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().title(" Progress ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(corpus.completion_ratio())
        .label(format!("{} / {}", corpus.graded, corpus.total));
    f.render_widget(gauge, left[0]);

    let items: Vec<ListItem<'_>> = state
        .session
        .transcripts()
        .iter()
        .map(|t| {
            let grade = state.session.grade_of(&t.id).grade;
            let style = match grade.as_str() {
                "pass" => Style::default().fg(Color::Green),
                "fail" => Style::default().fg(Color::Red),
                _ => Style::default(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(super::grade_marker(&grade), style),
                Span::raw(" "),
                Span::raw(sanitize_line(&t.id, HEADER_FIELD_MAX_LEN)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Traces ({}) ", state.session.len()))
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, left[1], &mut state.list_state);

    // Right: transcript header, turns, grading controls
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(6),
        ])
        .split(main_chunks[1]);

    let Some(transcript) = state.session.current() else {
        f.render_widget(
            Paragraph::new("No transcript selected").block(Block::default().borders(Borders::ALL)),
            main_chunks[1],
        );
        return;
    };

    let metadata = transcript
        .metadata
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(" | ");
    let info = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Scenario: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(sanitize_line(&transcript.scenario, HEADER_FIELD_MAX_LEN)),
        ]),
        Line::from(vec![
            Span::styled("Metadata: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(sanitize_line(&metadata, HEADER_FIELD_MAX_LEN)),
        ]),
    ])
    .block(
        Block::default()
            .title(format!(" {} ", sanitize_line(&transcript.id, HEADER_FIELD_MAX_LEN)))
            .borders(Borders::ALL),
    );
    f.render_widget(info, right[0]);

    let mut lines: Vec<Line<'_>> = Vec::new();
    for turn in &transcript.turns {
        let role_style = match turn.role {
            Role::User => Style::default().fg(Color::Cyan),
            Role::Assistant => Style::default().fg(Color::Green),
        };
        lines.push(Line::from(Span::styled(
            turn.role.as_str(),
            role_style.add_modifier(Modifier::BOLD),
        )));
        for line in sanitize_text(&turn.content).lines() {
            lines.push(Line::from(format!("  {line}")));
        }
        lines.push(Line::from(""));
    }
    let turns = Paragraph::new(lines)
        .block(Block::default().title(" Conversation ").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    f.render_widget(turns, right[1]);

    let selected = |g: Grade| {
        if state.pending == Some(g) {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        }
    };
    let stored = state.session.current_grade();
    let stored_text = match (stored.grade.as_str(), stored.comment.as_str()) {
        ("", _) => "ungraded".to_string(),
        (g, "") => g.to_uppercase(),
        (g, c) => format!("{} (\"{}\")", g.to_uppercase(), sanitize_line(c, HEADER_FIELD_MAX_LEN)),
    };
    let flash_line = match &state.flash {
        Some(Flash::Info(m)) => Line::from(Span::styled(m.clone(), Style::default().fg(Color::Green))),
        Some(Flash::Warn(m)) => Line::from(Span::styled(m.clone(), Style::default().fg(Color::Yellow))),
        Some(Flash::Error(m)) => Line::from(Span::styled(m.clone(), Style::default().fg(Color::Red))),
        None => Line::from(""),
    };
    let controls = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Verdict: "),
            Span::styled(" PASS ", selected(Grade::Pass)),
            Span::raw(" "),
            Span::styled(" FAIL ", selected(Grade::Fail)),
        ]),
        Line::from(format!("Comment: {}", sanitize_line(&state.comment, COMMENT_MAX_LEN))),
        Line::from(format!("Current grade: {stored_text}")),
        flash_line,
    ])
    .block(Block::default().title(" Grade this trace ").borders(Borders::ALL))
    .wrap(Wrap { trim: false });
    f.render_widget(controls, right[2]);

    let status = match state.mode {
        AppMode::Normal => {
            " j/k: move | P/F: pass/fail | c: comment | s: save | PgUp/PgDn: scroll | q: quit "
                .to_string()
        }
        AppMode::Comment => " Editing comment (Enter/Esc to finish) ".to_string(),
    };
    let status_bar =
        Paragraph::new(status).style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(status_bar, chunks[2]);
}

/// Strip control characters, keeping newlines.
fn sanitize_text(s: &str) -> String {
    s.chars().filter(|c| *c == '\n' || !c.is_control()).collect()
}

/// Single-line, control-free, at most `max` chars.
fn sanitize_line(s: &str, max: usize) -> String {
    let clean: String = s
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    if clean.chars().count() <= max {
        clean
    } else {
        let truncated: String = clean.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
