// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    ModifierKeyCode, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use quickswitch_answer::{AnswerFetcher, InstantAnswer, QueryClaim, WeatherPoint, classify};
use quickswitch_app::history::SearchHistory;
use quickswitch_app::hotpage;
use quickswitch_app::keys::{KeyAction, ModifierTracker, SHORTCUT_KEYS, TrackerContext};
use quickswitch_app::model::{
    ClosedEntry, HotPage, KeyInput, ModifierFlags, ResultItem, SettingsSnapshot, TabEntry,
};
use quickswitch_app::nav::{CommitOutcome, HostCommand, NavigationController};
use quickswitch_app::results::{ResultSetModel, ResultSnapshot, SuggestionSource};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const GRID_COLUMNS: usize = 2;

/// The popup's window into the browser. Loading runs once at startup;
/// `execute` performs the single command a commit ends in.
pub trait PopupRuntime {
    fn load_tabs(&mut self) -> Result<Vec<TabEntry>>;
    fn load_recently_closed(&mut self) -> Result<Vec<ClosedEntry>>;
    fn execute(&mut self, command: &HostCommand) -> Result<()>;
}

/// Network-backed services the popup consults in the background. Either
/// side may be absent; the popup then simply shows no suggestions or no
/// instant answers.
#[derive(Default)]
pub struct PopupServices {
    pub suggestions: Option<Arc<dyn SuggestionSource>>,
    pub answers: Option<Arc<AnswerFetcher>>,
}

/// Events delivered to the main loop from background threads. Fetch
/// results carry the request id they were spawned with; anything not
/// matching the latest id for its lane is stale and dropped.
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Suggestions { request_id: u64, rows: Vec<String> },
    Answer { request_id: u64, answer: Option<InstantAnswer> },
}

/// Everything the popup draws from: the result model and its derived
/// snapshot, the modifier tracker, the selection cursor, search history,
/// and the latest instant answer.
pub struct PopupView {
    model: ResultSetModel,
    tracker: ModifierTracker,
    nav: NavigationController,
    history: SearchHistory,
    snapshot: ResultSnapshot,
    hot_page: Option<HotPage>,
    answer: Option<InstantAnswer>,
    status: String,
    status_token: u64,
    suggestion_seq: u64,
    answer_seq: u64,
    should_exit: bool,
}

impl PopupView {
    pub fn new(model: ResultSetModel) -> Self {
        Self {
            model,
            tracker: ModifierTracker::new(),
            nav: NavigationController::new(),
            history: SearchHistory::new(),
            snapshot: ResultSnapshot {
                items: Vec::new(),
                suggestions_shown: false,
            },
            hot_page: None,
            answer: None,
            status: String::new(),
            status_token: 0,
            suggestion_seq: 0,
            answer_seq: 0,
            should_exit: false,
        }
    }
}

pub fn run_popup<R: PopupRuntime>(
    settings: &SettingsSnapshot,
    runtime: &mut R,
    services: &PopupServices,
) -> Result<()> {
    let tabs = runtime.load_tabs().context("load open tabs")?;
    let recently_closed = runtime
        .load_recently_closed()
        .context("load recently closed tabs")?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    // Modifier-release semantics need key-up events, which terminals only
    // deliver with the kitty keyboard protocol enabled.
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        )
    )
    .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view = PopupView::new(ResultSetModel::new(tabs, recently_closed));
    refresh(&mut view, settings);
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(&mut view, settings, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, settings, &view)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if let Some(input) = key_input_from_event(&key) {
                        let pressed = key.kind != KeyEventKind::Release;
                        if handle_key_input(
                            &mut view,
                            runtime,
                            services,
                            &internal_tx,
                            settings,
                            &input,
                            pressed,
                        ) {
                            break;
                        }
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    execute!(io::stdout(), PopKeyboardEnhancementFlags).context("pop keyboard enhancement")?;
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    view: &mut PopupView,
    settings: &SettingsSnapshot,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view.status_token => {
                view.status.clear();
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Suggestions { request_id, rows } => {
                if request_id == view.suggestion_seq {
                    view.model.set_suggestions(rows);
                    refresh(view, settings);
                }
            }
            InternalEvent::Answer { request_id, answer } => {
                if request_id == view.answer_seq {
                    view.answer = answer;
                }
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(view: &mut PopupView, internal_tx: &Sender<InternalEvent>, message: impl Into<String>) {
    view.status = message.into();
    view.status_token = view.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view.status_token);
}

fn spawn_suggestion_fetch(
    source: Arc<dyn SuggestionSource>,
    tx: Sender<InternalEvent>,
    request_id: u64,
    query: String,
) {
    thread::spawn(move || {
        let rows = source.suggest(&query).unwrap_or_default();
        let _ = tx.send(InternalEvent::Suggestions { request_id, rows });
    });
}

fn spawn_answer_fetch(
    fetcher: Arc<AnswerFetcher>,
    tx: Sender<InternalEvent>,
    request_id: u64,
    claim: QueryClaim,
    settings: SettingsSnapshot,
    now: OffsetDateTime,
) {
    thread::spawn(move || {
        let answer = fetcher.resolve(claim, &settings, now);
        let _ = tx.send(InternalEvent::Answer { request_id, answer });
    });
}

/// Rebuild the derived state after anything feeding the grid changed.
fn refresh(view: &mut PopupView, settings: &SettingsSnapshot) {
    view.snapshot = view.model.recompute(settings);
    view.nav.sync_total(view.snapshot.len());
    view.hot_page = hotpage::find_matching(&settings.hot_pages, view.model.query()).cloned();
}

fn update_query(
    view: &mut PopupView,
    services: &PopupServices,
    tx: &Sender<InternalEvent>,
    settings: &SettingsSnapshot,
    query: String,
    from_history: bool,
) {
    view.model.set_query(&query);
    if !from_history {
        view.history.reset_cursor();
    }
    view.nav.clear_selection();
    refresh(view, settings);

    // Bumping the lane sequence invalidates every fetch already in flight.
    view.suggestion_seq = view.suggestion_seq.wrapping_add(1);
    if !query.trim().is_empty() && !settings.is_service_command(&query) {
        if let Some(source) = &services.suggestions {
            spawn_suggestion_fetch(
                Arc::clone(source),
                tx.clone(),
                view.suggestion_seq,
                query.clone(),
            );
        }
    } else {
        view.model.set_suggestions(Vec::new());
        refresh(view, settings);
    }

    view.answer_seq = view.answer_seq.wrapping_add(1);
    view.answer = None;
    let now = OffsetDateTime::now_utc();
    if let Some(claim) = classify(settings, &query, now) {
        if let Some(fetcher) = &services.answers {
            spawn_answer_fetch(
                Arc::clone(fetcher),
                tx.clone(),
                view.answer_seq,
                claim,
                settings.clone(),
                now,
            );
        }
    }
}

/// True when the event should type into the query box rather than feed the
/// tracker: a printable key with no command modifiers that does not start
/// one of the configured holds.
fn typed_char(settings: &SettingsSnapshot, input: &KeyInput) -> Option<char> {
    if input.flags.ctrl || input.flags.alt || input.flags.meta {
        return None;
    }
    if settings.close_binding.matches_press(input)
        || settings.target_binding.matches_press(input)
        || settings.engine_binding.matches_press(input)
    {
        return None;
    }
    let mut chars = input.key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_control() => Some(ch),
        _ => None,
    }
}

/// Feed one key event through the tracker and apply whatever comes out.
/// Returns true when the popup should close.
fn handle_key_input<R: PopupRuntime>(
    view: &mut PopupView,
    runtime: &mut R,
    services: &PopupServices,
    tx: &Sender<InternalEvent>,
    settings: &SettingsSnapshot,
    input: &KeyInput,
    pressed: bool,
) -> bool {
    if pressed && input.key == "Escape" {
        return true;
    }

    let ctx = TrackerContext {
        suggestions_visible: view.snapshot.suggestions_shown,
        hot_page_matched: view.hot_page.is_some(),
    };
    let actions = if pressed {
        view.tracker.on_key_down(settings, ctx, input)
    } else {
        view.tracker.on_key_up(settings, ctx, input)
    };

    if actions.is_empty() && pressed {
        if input.key == "Backspace" {
            let mut query = view.model.query().to_owned();
            query.pop();
            update_query(view, services, tx, settings, query, false);
            return view.should_exit;
        }
        if let Some(ch) = typed_char(settings, input) {
            let mut query = view.model.query().to_owned();
            query.push(ch);
            update_query(view, services, tx, settings, query, false);
            return view.should_exit;
        }
    }

    for action in actions {
        apply_action(view, runtime, services, tx, settings, action);
        if view.should_exit {
            break;
        }
    }
    view.should_exit
}

fn apply_action<R: PopupRuntime>(
    view: &mut PopupView,
    runtime: &mut R,
    services: &PopupServices,
    tx: &Sender<InternalEvent>,
    settings: &SettingsSnapshot,
    action: KeyAction,
) {
    match action {
        KeyAction::ToggleRecentlyClosed => {
            let was_in_closed = view.model.recently_closed_mode();
            let entered = view.model.toggle_recently_closed();
            if !was_in_closed && !entered {
                emit_status(view, tx, "no recently closed tabs match");
            }
            view.nav.clear_selection();
            refresh(view, settings);
        }
        KeyAction::ToggleForceSearch => {
            view.model.toggle_force_search();
            view.nav.clear_selection();
            refresh(view, settings);
        }
        KeyAction::WebSearchCommit => {
            let query = view.model.query().to_owned();
            if let Some(outcome) =
                view.nav
                    .commit_web_search(settings, &query, view.hot_page.as_ref())
            {
                commit(view, runtime, tx, settings, outcome);
            }
        }
        KeyAction::Navigate(direction) => view.nav.navigate(direction),
        KeyAction::CloseAtIndex(index) => close_slot(view, runtime, tx, settings, Some(index)),
        KeyAction::CloseHighlighted => close_slot(view, runtime, tx, settings, None),
        KeyAction::ActivateAtIndex(index) => {
            if let Some(outcome) = view.nav.activate_at(index, &view.snapshot, settings) {
                commit(view, runtime, tx, settings, outcome);
            }
        }
        KeyAction::OpenPinned(index) => {
            if let Some(command) = view.nav.open_pinned(index, settings) {
                run_host_command(view, runtime, tx, &command, true);
            }
        }
        KeyAction::OpenEngine(engine_id) => {
            let query = view.model.query().to_owned();
            if let Some(command) = view.nav.open_engine(&engine_id, settings, &query) {
                if settings.enable_search_history {
                    view.history.record(&query);
                }
                run_host_command(view, runtime, tx, &command, true);
            }
        }
        KeyAction::CommitHighlighted => {
            let query = view.model.query().to_owned();
            if let Some(outcome) = view.nav.commit_highlighted(&view.snapshot, settings, &query) {
                commit(view, runtime, tx, settings, outcome);
            }
        }
        KeyAction::InsertLiteral(ch) => {
            let mut query = view.model.query().to_owned();
            query.push(ch);
            update_query(view, services, tx, settings, query, false);
        }
        KeyAction::CycleHistory => {
            if settings.enable_search_history {
                if let Some(entry) = view.history.cycle().map(str::to_owned) {
                    update_query(view, services, tx, settings, entry, true);
                }
            }
        }
        KeyAction::HotPageJump => {
            if let Some(command) = view.nav.hot_page_jump(view.hot_page.as_ref()) {
                run_host_command(view, runtime, tx, &command, true);
            }
        }
        KeyAction::HotPageJumpByLetter(letter) => {
            if let Some(command) = view.nav.hot_page_jump_by_letter(letter, settings) {
                run_host_command(view, runtime, tx, &command, true);
            }
        }
        KeyAction::SuggestionSelect { index, .. } => view.nav.select(index),
        KeyAction::CommitSuggestion { index, engine } => {
            if let Some(outcome) =
                view.nav
                    .commit_suggestion(index, engine.as_deref(), &view.snapshot, settings)
            {
                commit(view, runtime, tx, settings, outcome);
            }
        }
    }
}

fn commit<R: PopupRuntime>(
    view: &mut PopupView,
    runtime: &mut R,
    tx: &Sender<InternalEvent>,
    settings: &SettingsSnapshot,
    outcome: CommitOutcome,
) {
    if settings.enable_search_history {
        if let Some(query) = &outcome.record_history {
            view.history.record(query);
        }
    }
    run_host_command(view, runtime, tx, &outcome.command, true);
}

/// Closing keeps the popup open: the tab disappears from the grid and the
/// cursor reclamps.
fn close_slot<R: PopupRuntime>(
    view: &mut PopupView,
    runtime: &mut R,
    tx: &Sender<InternalEvent>,
    settings: &SettingsSnapshot,
    index: Option<usize>,
) {
    let command = match index {
        Some(index) => view.nav.close_at(index, &view.snapshot),
        None => view.nav.close_highlighted(&view.snapshot),
    };
    let Some(command) = command else {
        return;
    };
    match runtime.execute(&command) {
        Ok(()) => {
            if let HostCommand::CloseTab(tab_id) = command {
                view.model.remove_tab(tab_id);
            }
            refresh(view, settings);
        }
        Err(error) => emit_status(view, tx, format!("host command failed: {error}")),
    }
}

fn run_host_command<R: PopupRuntime>(
    view: &mut PopupView,
    runtime: &mut R,
    tx: &Sender<InternalEvent>,
    command: &HostCommand,
    exit: bool,
) {
    match runtime.execute(command) {
        Ok(()) => {
            if exit {
                view.should_exit = true;
            }
        }
        Err(error) => emit_status(view, tx, format!("host command failed: {error}")),
    }
}

enum FlagBit {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

fn modifier_names(modifier: ModifierKeyCode) -> Option<(&'static str, &'static str, FlagBit)> {
    Some(match modifier {
        ModifierKeyCode::LeftShift => ("ShiftLeft", "Shift", FlagBit::Shift),
        ModifierKeyCode::RightShift => ("ShiftRight", "Shift", FlagBit::Shift),
        ModifierKeyCode::LeftControl => ("ControlLeft", "Control", FlagBit::Ctrl),
        ModifierKeyCode::RightControl => ("ControlRight", "Control", FlagBit::Ctrl),
        ModifierKeyCode::LeftAlt => ("AltLeft", "Alt", FlagBit::Alt),
        ModifierKeyCode::RightAlt => ("AltRight", "Alt", FlagBit::Alt),
        ModifierKeyCode::LeftSuper => ("MetaLeft", "Meta", FlagBit::Meta),
        ModifierKeyCode::RightSuper => ("MetaRight", "Meta", FlagBit::Meta),
        _ => return None,
    })
}

/// Translate a crossterm key event into the tracker's vocabulary. A
/// modifier key's own flag is forced to match the event kind, so a press
/// carries it and a release does not, the way the tracker expects.
fn key_input_from_event(key: &KeyEvent) -> Option<KeyInput> {
    let pressed = key.kind != KeyEventKind::Release;
    let mut flags = ModifierFlags {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
        meta: key.modifiers.contains(KeyModifiers::SUPER),
    };

    let (code, name) = match key.code {
        KeyCode::Char(ch) => {
            let code = if ch.is_ascii_alphabetic() {
                format!("Key{}", ch.to_ascii_uppercase())
            } else if ch.is_ascii_digit() {
                format!("Digit{ch}")
            } else if ch == ' ' {
                "Space".to_owned()
            } else {
                ch.to_string()
            };
            (code, ch.to_string())
        }
        KeyCode::F(n) => (format!("F{n}"), format!("F{n}")),
        KeyCode::Enter => ("Enter".to_owned(), "Enter".to_owned()),
        KeyCode::Tab => ("Tab".to_owned(), "Tab".to_owned()),
        KeyCode::Backspace => ("Backspace".to_owned(), "Backspace".to_owned()),
        KeyCode::Esc => ("Escape".to_owned(), "Escape".to_owned()),
        KeyCode::Up => ("ArrowUp".to_owned(), "ArrowUp".to_owned()),
        KeyCode::Down => ("ArrowDown".to_owned(), "ArrowDown".to_owned()),
        KeyCode::Left => ("ArrowLeft".to_owned(), "ArrowLeft".to_owned()),
        KeyCode::Right => ("ArrowRight".to_owned(), "ArrowRight".to_owned()),
        KeyCode::Modifier(modifier) => {
            let (code, name, bit) = modifier_names(modifier)?;
            let flag = match bit {
                FlagBit::Ctrl => &mut flags.ctrl,
                FlagBit::Alt => &mut flags.alt,
                FlagBit::Shift => &mut flags.shift,
                FlagBit::Meta => &mut flags.meta,
            };
            *flag = pressed;
            (code.to_owned(), name.to_owned())
        }
        _ => return None,
    };

    let input = KeyInput::new(&code, &name, flags);
    Some(if key.kind == KeyEventKind::Repeat {
        input.repeated()
    } else {
        input
    })
}

fn render(frame: &mut ratatui::Frame<'_>, settings: &SettingsSnapshot, view: &PopupView) {
    let answer_rows = view.answer.as_ref().map_or(0, answer_height);
    let mut constraints = vec![Constraint::Length(3)];
    if answer_rows > 0 {
        constraints.push(Constraint::Length(answer_rows));
    }
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(3));
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let query_widget = Paragraph::new(view.model.query().to_owned())
        .block(Block::default().title("quickswitch").borders(Borders::ALL));
    frame.render_widget(query_widget, layout[0]);

    let mut slot = 1;
    if let Some(answer) = &view.answer {
        let widget = Paragraph::new(answer_text(answer))
            .style(Style::default().fg(Color::Green))
            .block(Block::default().title(answer_title(answer)).borders(Borders::ALL));
        frame.render_widget(widget, layout[slot]);
        slot += 1;
    }

    render_grid(frame, layout[slot], view);

    let status_widget = Paragraph::new(status_text(settings, view))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[slot + 1]);
}

fn render_grid(frame: &mut ratatui::Frame<'_>, area: Rect, view: &PopupView) {
    let selected = view.nav.selected();
    let rows = view
        .snapshot
        .items
        .chunks(GRID_COLUMNS)
        .enumerate()
        .map(|(row_index, pair)| {
            let cells = pair.iter().enumerate().map(|(column, item)| {
                let index = row_index * GRID_COLUMNS + column;
                let mut cell = Cell::from(grid_cell_text(index, item));
                if selected == Some(index) {
                    cell = cell.style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    );
                }
                cell
            });
            Row::new(cells.collect::<Vec<_>>())
        })
        .collect::<Vec<_>>();

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .block(Block::default().title(grid_title(view)).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn grid_title(view: &PopupView) -> &'static str {
    if view.snapshot.suggestions_shown {
        "suggestions"
    } else if view.model.recently_closed_mode() {
        "recently closed"
    } else {
        "tabs"
    }
}

fn grid_cell_text(index: usize, item: &ResultItem) -> String {
    let slot = SHORTCUT_KEYS
        .get(index)
        .map(|letter| format!("[{letter}] "))
        .unwrap_or_default();
    match item {
        ResultItem::Open(tab) if tab.audible => format!("{slot}♪ {}", tab.title),
        ResultItem::Open(tab) => format!("{slot}{}", tab.title),
        ResultItem::Closed(closed) => format!("{slot}✕ {}", closed.title),
        ResultItem::Suggestion(text) => format!("{slot}{text}"),
    }
}

fn status_text(settings: &SettingsSnapshot, view: &PopupView) -> String {
    if !view.status.is_empty() {
        return view.status.clone();
    }
    format!(
        "{} close | {} activate | {} engines | {} search",
        settings.close_binding.display,
        settings.target_binding.display,
        settings.engine_binding.display,
        settings.web_search_binding.display,
    )
}

fn answer_height(answer: &InstantAnswer) -> u16 {
    u16::try_from(answer_text(answer).lines().count())
        .unwrap_or(u16::MAX - 2)
        .saturating_add(2)
}

fn answer_title(answer: &InstantAnswer) -> &'static str {
    match answer {
        InstantAnswer::Math { .. } => "calculator",
        InstantAnswer::Currency { .. } => "currency",
        InstantAnswer::Weather(_) => "weather",
        InstantAnswer::Translation(_) => "translation",
        InstantAnswer::Definition(_) => "dictionary",
        InstantAnswer::Ai { .. } => "answer",
    }
}

fn answer_text(answer: &InstantAnswer) -> String {
    match answer {
        InstantAnswer::Math { expression, value } => format!("{expression} = {value}"),
        InstantAnswer::Currency { conversions, .. } => conversions
            .iter()
            .map(|conversion| format!("{} {}", conversion.amount, conversion.currency))
            .collect::<Vec<_>>()
            .join("\n"),
        InstantAnswer::Weather(weather) => {
            let mut lines = vec![weather.heading.clone()];
            lines.push(weather_point_line(&weather.current));
            for point in &weather.upcoming {
                lines.push(weather_point_line(point));
            }
            lines.join("\n")
        }
        InstantAnswer::Translation(translation) => translation
            .lines
            .iter()
            .map(|line| {
                if line.is_original {
                    format!("[{}] {} (original)", line.lang, line.text)
                } else {
                    format!("[{}] {}", line.lang, line.text)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        InstantAnswer::Definition(definition) => {
            if let Some(error) = &definition.error {
                return error.clone();
            }
            let mut lines = Vec::new();
            let mut heading = definition.word.clone();
            if let Some(phonetic) = &definition.phonetic {
                heading.push_str(&format!(" {phonetic}"));
            }
            if let Some(language) = &definition.language {
                heading.push_str(&format!(" ({language})"));
            }
            lines.push(heading);
            if let Some(corrected_from) = &definition.corrected_from {
                lines.push(format!("corrected from \"{corrected_from}\""));
            }
            for meaning in &definition.meanings {
                lines.push(format!("{}:", meaning.part_of_speech));
                for (number, sense) in meaning.senses.iter().enumerate() {
                    lines.push(format!("  {}. {}", number + 1, sense.definition));
                    if let Some(example) = &sense.example {
                        lines.push(format!("     \"{example}\""));
                    }
                }
            }
            lines.join("\n")
        }
        InstantAnswer::Ai { answer, .. } => answer.clone(),
    }
}

fn weather_point_line(point: &WeatherPoint) -> String {
    format!(
        "{}: {}° {} | wind {} m/s | humidity {}% | precip {}%",
        point.label,
        point.temperature,
        point.symbol,
        point.wind,
        point.humidity,
        point.precipitation,
    )
}
