//! Full-screen terminal UI front-end.
//!
//! A single screen with a query input, a scrollable read-only article view, a
//! toggleable find bar with live highlighting, and a sidebar listing the
//! keybindings and the language selector. Candidate selection happens in a
//! modal popup that blocks until the user confirms or cancels, mirroring the
//! console chooser behind the same `CandidateChooser` capability.
//!
//! Shortcuts: Ctrl+Q quit, Ctrl+L clear, Ctrl+F toggle find, Ctrl+N / Ctrl+P
//! cycle the language (re-running the current query), arrows and
//! PgUp / PgDn scroll.

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wikipedia_search::client::wikipedia::WikipediaClient;
use wikipedia_search::highlight::find_matches;
use wikipedia_search::models::Language;
use wikipedia_search::render;
use wikipedia_search::workflow::{self, CandidateChooser, FetchOutcome, Resolution, Selection};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Terminal UI for searching and reading Wikipedia articles
#[derive(Parser, Debug)]
#[command(
    name = "gui",
    version,
    about = "Full-screen terminal UI for searching and reading Wikipedia articles"
)]
struct Args {
    /// Two-letter language code (en, no, sv, da, fi, is, ru)
    #[arg(long, value_name = "CODE", default_value = "en")]
    language: String,

    /// Logging verbosity level
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,
}

/// Which input field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Query,
    Find,
}

struct App {
    client: WikipediaClient,
    language_idx: usize,
    query: String,
    /// Currently displayed text: a rendered article or a status message.
    display: String,
    scroll: u16,
    find_visible: bool,
    needle: String,
    match_count: usize,
    focus: Focus,
    should_quit: bool,
}

impl App {
    fn new(client: WikipediaClient, language: Language) -> Self {
        let language_idx = Language::ALL
            .iter()
            .position(|lang| *lang == language)
            .unwrap_or(0);
        Self {
            client,
            language_idx,
            query: String::new(),
            display: String::new(),
            scroll: 0,
            find_visible: false,
            needle: String::new(),
            match_count: 0,
            focus: Focus::Query,
            should_quit: false,
        }
    }

    fn language(&self) -> Language {
        Language::ALL[self.language_idx]
    }

    /// Full rescan of the displayed text; previous spans are discarded.
    fn recompute_highlights(&mut self) {
        self.match_count = if self.find_visible {
            find_matches(&self.display, &self.needle).len()
        } else {
            0
        };
    }

    /// Find-bar state machine: Hidden -> Visible focuses the needle input and
    /// recomputes; Visible -> Hidden clears spans and refocuses the query.
    fn toggle_find(&mut self) {
        if self.find_visible {
            self.find_visible = false;
            self.match_count = 0;
            self.focus = Focus::Query;
        } else {
            self.find_visible = true;
            self.focus = Focus::Find;
            self.recompute_highlights();
        }
    }

    fn clear_search(&mut self) {
        self.query.clear();
        self.display.clear();
        self.scroll = 0;
        self.focus = Focus::Query;
        if self.find_visible {
            self.toggle_find();
        }
    }

    fn set_display(&mut self, text: String) {
        self.display = text;
        self.scroll = 0;
        self.recompute_highlights();
    }
}

/// Modal candidate chooser drawing a centered popup and blocking on key
/// events until the user confirms or cancels.
struct PopupChooser<'a> {
    terminal: &'a mut Tui,
}

impl CandidateChooser for PopupChooser<'_> {
    fn choose(&mut self, candidates: &[String]) -> Selection {
        let mut state = ListState::default();
        state.select(Some(0));

        loop {
            let draw = self
                .terminal
                .draw(|frame| draw_choice_popup(frame, candidates, &mut state));
            if draw.is_err() {
                return Selection::Cancelled;
            }

            let Ok(event) = event::read() else {
                return Selection::Cancelled;
            };
            let Event::Key(key) = event else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let selected = state.selected().unwrap_or(0);
            match key.code {
                KeyCode::Esc => return Selection::Cancelled,
                KeyCode::Enter => return Selection::Chosen(selected),
                KeyCode::Up => state.select(Some(selected.saturating_sub(1))),
                KeyCode::Down => {
                    state.select(Some((selected + 1).min(candidates.len().saturating_sub(1))))
                }
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    if index < candidates.len() {
                        return Selection::Chosen(index);
                    }
                }
                _ => {}
            }
        }
    }
}

fn draw_choice_popup(frame: &mut Frame, candidates: &[String], state: &mut ListState) {
    let area = centered_rect(60, 60, frame.area());

    let items: Vec<ListItem> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| ListItem::new(format!("{}. {}", i + 1, candidate)))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Choose Article (Enter to select, Esc to cancel)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, state);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// One line of article text with the needle occurrences emphasized.
fn highlighted_line<'a>(text: &'a str, needle: &str) -> Line<'a> {
    let mut spans = Vec::new();
    let mut pos = 0;
    for m in find_matches(text, needle) {
        if m.start > pos {
            spans.push(Span::raw(&text[pos..m.start]));
        }
        spans.push(Span::styled(
            &text[m.start..m.end],
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        pos = m.end;
    }
    if pos < text.len() {
        spans.push(Span::raw(&text[pos..]));
    }
    Line::from(spans)
}

fn article_lines(app: &App) -> Vec<Line<'_>> {
    let needle = app.needle.trim();
    let highlight = app.find_visible && !needle.is_empty();

    app.display
        .lines()
        .map(|line| {
            if highlight {
                highlighted_line(line, needle)
            } else {
                Line::from(line)
            }
        })
        .collect()
}

const KEYBINDINGS: [&str; 7] = [
    "Enter - Search",
    "Ctrl+L - Clear",
    "Ctrl+Q - Quit",
    "Ctrl+F - Toggle find",
    "Ctrl+N/P - Language",
    "Up/Down - Scroll",
    "PgUp/PgDn - Page scroll",
];

fn ui(frame: &mut Frame, app: &App) {
    let mut constraints = vec![Constraint::Length(3)];
    if app.find_visible {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let focused = Style::default().fg(Color::Yellow);
    let unfocused = Style::default().fg(Color::DarkGray);

    let query_block = Block::default()
        .title("Search")
        .borders(Borders::ALL)
        .border_style(if app.focus == Focus::Query {
            focused
        } else {
            unfocused
        });
    frame.render_widget(Paragraph::new(app.query.as_str()).block(query_block), rows[0]);

    let mut next_row = 1;
    if app.find_visible {
        let title = if app.needle.trim().is_empty() {
            "Find".to_string()
        } else {
            format!("Find ({} matches)", app.match_count)
        };
        let find_block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(if app.focus == Focus::Find {
                focused
            } else {
                unfocused
            });
        frame.render_widget(
            Paragraph::new(app.needle.as_str()).block(find_block),
            rows[next_row],
        );
        next_row += 1;
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(26)])
        .split(rows[next_row]);

    let article = Paragraph::new(article_lines(app))
        .block(Block::default().title("Article").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(article, body[0]);

    let sidebar_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(KEYBINDINGS.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(body[1]);

    let keys: Vec<ListItem> = KEYBINDINGS.iter().map(|kb| ListItem::new(*kb)).collect();
    frame.render_widget(
        List::new(keys).block(Block::default().title("Keybindings").borders(Borders::ALL)),
        sidebar_rows[0],
    );

    let languages: Vec<ListItem> = Language::ALL
        .iter()
        .enumerate()
        .map(|(i, lang)| {
            let item = ListItem::new(lang.label());
            if i == app.language_idx {
                item.style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                item
            }
        })
        .collect();
    frame.render_widget(
        List::new(languages).block(Block::default().title("Language").borders(Borders::ALL)),
        sidebar_rows[1],
    );

    let status = format!(
        " {} Wikipedia | Ctrl+Q quit, Ctrl+F find, Ctrl+N/P language",
        app.language().label()
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        rows[next_row + 1],
    );
}

/// Execute the workflow for the current query field contents.
///
/// Paints "Searching..." before the blocking remote call so the update is
/// visible while the call is outstanding; at most one query is ever in
/// flight, so there is no concurrent editing of the display.
async fn run_search(app: &mut App, terminal: &mut Tui) -> Result<()> {
    let query = app.query.trim().to_string();
    if query.is_empty() {
        return Ok(());
    }

    app.set_display("Searching...".to_string());
    terminal.draw(|frame| ui(frame, app))?;

    let language = app.language();
    let resolution = {
        let mut chooser = PopupChooser { terminal };
        workflow::resolve_query(&app.client, language, &query, &mut chooser).await
    };

    let title = match resolution {
        Ok(Resolution::Resolved(title)) => title,
        Ok(Resolution::NoMatches) => {
            app.set_display(render::NO_RESULTS_MESSAGE.to_string());
            return Ok(());
        }
        Ok(Resolution::Cancelled) => {
            app.set_display(render::CANCELLED_MESSAGE.to_string());
            return Ok(());
        }
        Ok(Resolution::Quit) => {
            app.should_quit = true;
            return Ok(());
        }
        Err(error) => {
            app.set_display(render::render_failure(&error.to_string()));
            return Ok(());
        }
    };

    match workflow::fetch_article(&app.client, language, &title).await {
        Ok(FetchOutcome::Fetched(article)) => app.set_display(render::render_article(&article)),
        Ok(FetchOutcome::NotFound) => app.set_display(render::NOT_FOUND_MESSAGE.to_string()),
        Ok(FetchOutcome::Ambiguous(options)) => {
            app.set_display(render::render_disambiguation(&options))
        }
        Err(error) => app.set_display(render::render_failure(&error.to_string())),
    }
    Ok(())
}

async fn handle_key(app: &mut App, terminal: &mut Tui, key: KeyEvent) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('l') => app.clear_search(),
            KeyCode::Char('f') => app.toggle_find(),
            KeyCode::Char('n') => {
                app.language_idx = (app.language_idx + 1) % Language::ALL.len();
                run_search(app, terminal).await?;
            }
            KeyCode::Char('p') => {
                app.language_idx =
                    (app.language_idx + Language::ALL.len() - 1) % Language::ALL.len();
                run_search(app, terminal).await?;
            }
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Enter => {
            if app.focus == Focus::Query {
                run_search(app, terminal).await?;
            }
        }
        KeyCode::Esc => {
            if app.find_visible {
                app.toggle_find();
            }
        }
        KeyCode::Backspace => match app.focus {
            Focus::Query => {
                app.query.pop();
            }
            Focus::Find => {
                app.needle.pop();
                app.recompute_highlights();
            }
        },
        KeyCode::Char(c) => match app.focus {
            Focus::Query => app.query.push(c),
            Focus::Find => {
                app.needle.push(c);
                app.recompute_highlights();
            }
        },
        KeyCode::Up => app.scroll = app.scroll.saturating_sub(1),
        KeyCode::Down => app.scroll = app.scroll.saturating_add(1),
        KeyCode::PageUp => app.scroll = app.scroll.saturating_sub(10),
        KeyCode::PageDown => app.scroll = app.scroll.saturating_add(10),
        _ => {}
    }
    Ok(())
}

async fn run_app(app: &mut App, terminal: &mut Tui) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui(frame, app))?;

        match event::read().with_context(|| "Failed to read terminal event")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                handle_key(app, terminal, key).await?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level);

    let language = Language::from_code(&args.language).ok_or_else(|| {
        anyhow::anyhow!(
            "Unsupported language code '{}'. Supported codes: {}",
            args.language,
            Language::ALL
                .iter()
                .map(|lang| lang.code())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    let client = WikipediaClient::new().with_context(|| "Failed to create Wikipedia client")?;
    let mut app = App::new(client, language);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut app, &mut terminal).await;

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
