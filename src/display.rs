use crate::cli::Background;
use crate::config::Config;
use crate::error::{NotchError, Result};
use crate::fmt::{self, NUMW};
use crate::input::{InputEvent, PromptInput};
use crate::rows::{Row, SortKey};
use crate::source::SnapshotSource;
use crate::state::LoopState;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Row as TableRow, Table},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

type Backend = CrosstermBackend<Stdout>;

/// Longest single wait for terminal events, so a Ctrl+C signal is noticed.
const INTERRUPT_POLL: Duration = Duration::from_millis(100);

/// Where the interactive loop is between two iterations.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Running,
    AwaitingKey(Duration),
    PromptingInterval(String),
    Exited,
}

/// Restores the terminal when dropped, whichever way the loop ends.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<(Self, Terminal<Backend>)> {
        enable_raw_mode().map_err(surface_error("raw mode"))?;
        // From here on the guard undoes whatever did get set up.
        let guard = Self;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide).map_err(surface_error("alternate screen"))?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .map_err(surface_error("terminal backend"))?;
        Ok((guard, terminal))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, Show, LeaveAlternateScreen);
    }
}

fn surface_error(what: &'static str) -> impl Fn(io::Error) -> NotchError {
    move |e| NotchError::Terminal(format!("{what}: {e}"))
}

pub fn background_color(background: Background) -> Color {
    match background {
        Background::Black => Color::Black,
        Background::TrueBlack => Color::Rgb(0, 0, 0),
        Background::Default => Color::Reset,
    }
}

/// Runs the full-screen view until the user quits or a Ctrl+C arrives on
/// `interrupt`.
///
/// Any failure of the terminal surface comes back as [`NotchError::Terminal`]
/// so the caller can switch to the stream renderer.
pub fn run(
    config: &Config,
    source: &dyn SnapshotSource,
    interrupt: &Receiver<()>,
) -> Result<()> {
    let (_guard, mut terminal) = TerminalGuard::enter()?;
    log::info!("interactive view started ({})", source.command_line());

    let command = source.command_line();
    let mut state = LoopState::warm_up(source, config.interval);
    let mut rows: Vec<Row> = Vec::new();
    let mut phase = Phase::Running;

    loop {
        phase = match check_interrupt(phase, interrupt) {
            Phase::Running => {
                rows = state.tick(source, config.group);
                redraw(&mut terminal, config, &state, &command, &rows, None)?;
                Phase::AwaitingKey(state.cadence.schedule_next(Instant::now()))
            }
            Phase::AwaitingKey(wait) => {
                let slice = wait.min(INTERRUPT_POLL);
                if !event::poll(slice).map_err(surface_error("event poll"))? {
                    if slice == wait {
                        Phase::Running
                    } else {
                        Phase::AwaitingKey(state.cadence.remaining(Instant::now()))
                    }
                } else {
                    let next = match event::read().map_err(surface_error("event read"))? {
                        Event::Key(key) => handle_input(
                            InputEvent::from_key_event(key),
                            &mut state,
                            &mut rows,
                            Instant::now(),
                        ),
                        _ => Phase::AwaitingKey(state.cadence.remaining(Instant::now())),
                    };
                    if matches!(next, Phase::AwaitingKey(_)) {
                        redraw(&mut terminal, config, &state, &command, &rows, None)?;
                    }
                    next
                }
            }
            Phase::PromptingInterval(mut buffer) => {
                redraw(&mut terminal, config, &state, &command, &rows, Some(buffer.as_str()))?;
                if !event::poll(INTERRUPT_POLL).map_err(surface_error("event poll"))? {
                    Phase::PromptingInterval(buffer)
                } else {
                    match event::read().map_err(surface_error("event read"))? {
                        Event::Key(key) => handle_prompt(
                            PromptInput::from_key_event(key),
                            &mut buffer,
                            &mut state,
                            Instant::now(),
                        )
                        .unwrap_or(Phase::PromptingInterval(buffer)),
                        _ => Phase::PromptingInterval(buffer),
                    }
                }
            }
            Phase::Exited => break,
        };
    }

    log::info!("interactive view closed");
    Ok(())
}

/// Ends the loop once a Ctrl+C has come through the signal channel.
///
/// An empty or disconnected channel leaves `phase` as it is.
pub fn check_interrupt(phase: Phase, interrupt: &Receiver<()>) -> Phase {
    match interrupt.try_recv() {
        Ok(()) => {
            log::info!("interactive view interrupted");
            Phase::Exited
        }
        Err(_) => phase,
    }
}

/// Applies a key pressed while waiting for the next tick.
///
/// Toggles re-rank the rows already on screen and keep waiting for the rest
/// of the current tick.
pub fn handle_input(
    input: InputEvent,
    state: &mut LoopState,
    rows: &mut [Row],
    now: Instant,
) -> Phase {
    match input {
        InputEvent::Quit => return Phase::Exited,
        InputEvent::ChangeInterval => return Phase::PromptingInterval(String::new()),
        InputEvent::ToggleHelp => state.show_help = !state.show_help,
        InputEvent::SortIn => state.set_sort_key(SortKey::In, rows),
        InputEvent::SortOut => state.set_sort_key(SortKey::Out, rows),
        InputEvent::SortDelta => state.set_sort_key(SortKey::Delta, rows),
        InputEvent::ToggleMetric => state.metric = state.metric.toggle(),
        InputEvent::Unknown => {}
    }
    Phase::AwaitingKey(state.cadence.remaining(now))
}

/// Applies a key pressed at the interval prompt. `None` keeps the prompt open.
pub fn handle_prompt(
    input: PromptInput,
    buffer: &mut String,
    state: &mut LoopState,
    now: Instant,
) -> Option<Phase> {
    match input {
        PromptInput::Interrupt => Some(Phase::Exited),
        PromptInput::Submit if state.apply_interval_entry(buffer, now) => Some(Phase::Running),
        PromptInput::Submit | PromptInput::Cancel => {
            Some(Phase::AwaitingKey(state.cadence.remaining(now)))
        }
        edit => {
            edit.edit(buffer);
            None
        }
    }
}

fn redraw(
    terminal: &mut Terminal<Backend>,
    config: &Config,
    state: &LoopState,
    command: &str,
    rows: &[Row],
    prompt: Option<&str>,
) -> Result<()> {
    terminal
        .draw(|f| draw(f, config, state, command, rows, prompt))
        .map_err(surface_error("draw"))?;
    Ok(())
}

fn column_widths() -> [Constraint; 7] {
    [
        Constraint::Length(NUMW as u16),
        Constraint::Length(NUMW as u16),
        Constraint::Length(NUMW as u16),
        Constraint::Length(fmt::PROCESS_WIDTH as u16),
        Constraint::Length(fmt::IFACE_WIDTH as u16),
        Constraint::Length(fmt::STATE_WIDTH as u16),
        Constraint::Min(10),
    ]
}

fn draw(
    f: &mut Frame,
    config: &Config,
    state: &LoopState,
    command: &str,
    rows: &[Row],
    prompt: Option<&str>,
) {
    let normal = Style::default()
        .fg(Color::White)
        .bg(background_color(config.background));
    let emphasis = normal.fg(Color::Green).add_modifier(Modifier::BOLD);

    let area = f.area();
    f.render_widget(Block::default().style(normal), area);

    let banner_height = if state.show_help { 5 } else { 0 };
    let prompt_height = if prompt.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(prompt_height),
        ])
        .split(area);

    if state.show_help {
        draw_banner(f, chunks[0], config, state, command, normal);
    }

    let mut header = fmt::header_cells(state.metric);
    for cell in header.iter_mut().take(3) {
        *cell = format!("{cell:>NUMW$}");
    }
    let header_table = Table::new(Vec::<TableRow>::new(), column_widths())
        .header(TableRow::new(header))
        .column_spacing(2)
        .style(normal)
        .block(Block::default().borders(Borders::BOTTOM).style(normal));
    f.render_widget(header_table, chunks[1]);

    if rows.is_empty() {
        f.render_widget(Paragraph::new(fmt::NO_TRAFFIC).style(normal), chunks[2]);
    } else {
        let body: Vec<TableRow> = rows
            .iter()
            .take(config.top)
            .map(|row| {
                let style = if config.highlight(state.metric.value(row.rate())) {
                    emphasis
                } else {
                    normal
                };
                TableRow::new(fmt::row_cells(row, state.metric)).style(style)
            })
            .collect();
        let table = Table::new(body, column_widths())
            .column_spacing(2)
            .style(normal);
        f.render_widget(table, chunks[2]);
    }

    if let Some(buffer) = prompt {
        let text = format!("{}{buffer}", fmt::PROMPT_LABEL);
        let cursor_x = chunks[3].x + text.chars().count() as u16;
        f.render_widget(
            Paragraph::new(text).style(normal.add_modifier(Modifier::REVERSED)),
            chunks[3],
        );
        f.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), chunks[3].y));
    }
}

fn draw_banner(
    f: &mut Frame,
    area: Rect,
    config: &Config,
    state: &LoopState,
    command: &str,
    style: Style,
) {
    let mut lines: Vec<Line> = fmt::banner_lines(
        config,
        state.interval(),
        command,
        state.metric,
        state.sort_key,
        chrono::Local::now(),
    )
    .into_iter()
    .map(Line::from)
    .collect();
    lines.push(Line::from("-".repeat(area.width as usize)));
    f.render_widget(Paragraph::new(lines).style(style), area);
}
