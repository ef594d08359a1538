use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::models::{normalize_date, ApplicationDraft, ApplicationStatus, JobApplication, DATE_FORMAT};
use crate::storage::Storage;
use crate::store::ApplicationStore;
use crate::views::{StatusCounts, ViewQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    Search,
    ConfirmDelete { id: String, label: String },
    ConfirmReset,
    Form(Box<FormState>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Company,
    Title,
    Date,
    Status,
    Links,
    Notes,
}

impl FormField {
    const ORDER: [FormField; 6] = [
        FormField::Company,
        FormField::Title,
        FormField::Date,
        FormField::Status,
        FormField::Links,
        FormField::Notes,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Company => "Company",
            FormField::Title => "Title",
            FormField::Date => "Date",
            FormField::Status => "Status",
            FormField::Links => "Links",
            FormField::Notes => "Notes",
        }
    }

    /// Enter inserts a newline here instead of saving.
    fn is_multiline(self) -> bool {
        matches!(self, FormField::Links | FormField::Notes)
    }
}

/// Add/edit form buffers. `id` is set when editing an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FormState {
    id: Option<String>,
    company: String,
    title: String,
    date: String,
    status: ApplicationStatus,
    links: String,
    notes: String,
    focus: FormField,
    error: Option<String>,
}

impl FormState {
    fn blank(today: &str) -> Self {
        Self {
            id: None,
            company: String::new(),
            title: String::new(),
            date: today.to_string(),
            status: ApplicationStatus::default(),
            links: String::new(),
            notes: String::new(),
            focus: FormField::Company,
            error: None,
        }
    }

    fn edit(app: &JobApplication) -> Self {
        Self {
            id: Some(app.id.clone()),
            company: app.company_name.clone(),
            title: app.job_title.clone(),
            date: app
                .application_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            status: app.status,
            links: app.links.join("\n"),
            notes: app.notes.clone(),
            focus: FormField::Company,
            error: None,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Company => Some(&mut self.company),
            FormField::Title => Some(&mut self.title),
            FormField::Date => Some(&mut self.date),
            FormField::Status => None,
            FormField::Links => Some(&mut self.links),
            FormField::Notes => Some(&mut self.notes),
        }
    }

    fn cycle_status(&mut self, forward: bool) {
        let all = ApplicationStatus::ALL;
        let index = all.iter().position(|s| *s == self.status).unwrap_or(0);
        let step = if forward { 1 } else { all.len() - 1 };
        self.status = all[(index + step) % all.len()];
    }

    fn value(&self, field: FormField) -> String {
        match field {
            FormField::Company => self.company.clone(),
            FormField::Title => self.title.clone(),
            FormField::Date => self.date.clone(),
            FormField::Status => format!("< {} >", self.status.label()),
            FormField::Links => self.links.clone(),
            FormField::Notes => self.notes.clone(),
        }
    }

    /// A blank date falls back to today on save; anything else must parse.
    fn to_draft(&self) -> Result<ApplicationDraft, String> {
        let application_date = normalize_date(&self.date);
        if application_date.is_none() && !self.date.trim().is_empty() {
            return Err(format!("Could not parse date '{}'", self.date.trim()));
        }
        let mut draft = ApplicationDraft::new(&self.company, &self.title).with_links_text(&self.links);
        draft.id = self.id.clone();
        draft.application_date = application_date;
        draft.status = self.status;
        draft.notes = self.notes.clone();
        Ok(draft)
    }
}

struct AppState {
    query: ViewQuery,
    selected: usize,
    scroll_offset: u16,
    mode: Mode,
    quit: bool,
}

impl AppState {
    fn new() -> Self {
        Self {
            query: ViewQuery::default(),
            selected: 0,
            scroll_offset: 0,
            mode: Mode::Normal,
            quit: false,
        }
    }

    fn clamp(&mut self, visible: usize) {
        if visible == 0 {
            self.selected = 0;
        } else if self.selected >= visible {
            self.selected = visible - 1;
        }
    }

    fn next(&mut self, visible: usize) {
        if visible > 0 && self.selected < visible - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn jump_to_top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }
}

fn current_id<S: Storage>(state: &AppState, store: &ApplicationStore<S>) -> Option<String> {
    store
        .view(&state.query)
        .get(state.selected)
        .map(|app| app.id.clone())
}

pub fn run_browse<S: Storage>(store: &mut ApplicationStore<S>) -> Result<()> {
    let mut state = AppState::new();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop<S: Storage>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    store: &mut ApplicationStore<S>,
) -> Result<()> {
    let mut list_state = ListState::default();

    while !state.quit {
        let visible = store.view(&state.query).len();
        state.clamp(visible);
        list_state.select(if visible == 0 { None } else { Some(state.selected) });

        terminal.draw(|frame| draw(frame, state, store, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(key, state, store);
        }
    }
    Ok(())
}

fn handle_key<S: Storage>(key: KeyEvent, state: &mut AppState, store: &mut ApplicationStore<S>) {
    if matches!(state.mode, Mode::Form(_)) {
        handle_form_key(key, state, store);
        return;
    }

    match state.mode.clone() {
        Mode::Form(_) => {}
        Mode::Search => match key.code {
            KeyCode::Enter => state.mode = Mode::Normal,
            KeyCode::Esc => {
                state.query.search.clear();
                state.mode = Mode::Normal;
                state.jump_to_top();
            }
            KeyCode::Backspace => {
                state.query.search.pop();
                state.jump_to_top();
            }
            KeyCode::Char(c) => {
                state.query.search.push(c);
                state.jump_to_top();
            }
            _ => {}
        },
        Mode::ConfirmDelete { id, .. } => {
            if key.code == KeyCode::Char('y') {
                store.delete(&id);
            }
            state.mode = Mode::Normal;
        }
        Mode::ConfirmReset => {
            if key.code == KeyCode::Char('y') {
                store.reset();
                state.jump_to_top();
            }
            state.mode = Mode::Normal;
        }
        Mode::Normal => {
            let visible = store.view(&state.query).len();
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => state.quit = true,
                KeyCode::Down | KeyCode::Char('j') => state.next(visible),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('/') => state.mode = Mode::Search,
                KeyCode::Char('f') => {
                    state.query.status = state.query.status.next();
                    state.jump_to_top();
                }
                KeyCode::Char('s') => {
                    state.query.sort = state.query.sort.next();
                    state.jump_to_top();
                }
                KeyCode::Char('a') => set_current_status(state, store, ApplicationStatus::Applied),
                KeyCode::Char('i') => set_current_status(state, store, ApplicationStatus::Interview),
                KeyCode::Char('o') => set_current_status(state, store, ApplicationStatus::Offer),
                KeyCode::Char('x') => set_current_status(state, store, ApplicationStatus::Rejected),
                KeyCode::Char('d') => {
                    if let Some(app) = current_id(state, store).and_then(|id| store.get(&id)) {
                        state.mode = Mode::ConfirmDelete {
                            id: app.id.clone(),
                            label: format!("{} at {}", app.job_title, app.company_name),
                        };
                    }
                }
                KeyCode::Char('R') => state.mode = Mode::ConfirmReset,
                KeyCode::Char('n') => {
                    let today = store.today().format(DATE_FORMAT).to_string();
                    state.mode = Mode::Form(Box::new(FormState::blank(&today)));
                }
                KeyCode::Char('e') => {
                    if let Some(app) = current_id(state, store).and_then(|id| store.get(&id)) {
                        state.mode = Mode::Form(Box::new(FormState::edit(app)));
                    }
                }
                _ => {}
            }
        }
    }
}

fn handle_form_key<S: Storage>(key: KeyEvent, state: &mut AppState, store: &mut ApplicationStore<S>) {
    let Mode::Form(form) = &mut state.mode else {
        return;
    };

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let save = (ctrl && key.code == KeyCode::Char('s'))
        || (key.code == KeyCode::Enter && !form.focus.is_multiline());

    if save {
        let saved = form
            .to_draft()
            .and_then(|draft| store.save(draft).map_err(|e| e.to_string()));
        match saved {
            Ok(outcome) => {
                let id = outcome.id().to_string();
                state.mode = Mode::Normal;
                select_id(state, store, &id);
            }
            Err(message) => form.error = Some(message),
        }
        return;
    }

    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
        KeyCode::Left if form.focus == FormField::Status => form.cycle_status(false),
        KeyCode::Right | KeyCode::Char(' ') if form.focus == FormField::Status => form.cycle_status(true),
        KeyCode::Enter => {
            if let Some(text) = form.text_mut() {
                text.push('\n');
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = form.text_mut() {
                text.pop();
            }
        }
        KeyCode::Char(c) if !ctrl => {
            if let Some(text) = form.text_mut() {
                text.push(c);
            }
        }
        _ => {}
    }
}

/// Moves the selection onto `id` if the current view shows it.
fn select_id<S: Storage>(state: &mut AppState, store: &ApplicationStore<S>, id: &str) {
    match store.view(&state.query).iter().position(|app| app.id == id) {
        Some(index) => state.selected = index,
        None => state.jump_to_top(),
    }
    state.scroll_offset = 0;
}

fn set_current_status<S: Storage>(state: &AppState, store: &mut ApplicationStore<S>, status: ApplicationStatus) {
    if let Some(id) = current_id(state, store) {
        store.set_status(&id, status);
    }
}

fn draw<S: Storage>(frame: &mut Frame, state: &AppState, store: &ApplicationStore<S>, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    frame.render_widget(build_header(state, &store.counts()), rows[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    // Left panel: application list
    let apps = store.view(&state.query);
    let items: Vec<ListItem> = apps
        .iter()
        .map(|app| {
            let date = app
                .application_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "----------".to_string());
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", status_icon(app.status)), status_style(app.status)),
                Span::raw(format!("{} {} | {}", date, crate::truncate(&app.job_title, 28), app.company_name)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Applications ({}/{}) ",
            apps.len(),
            store.len()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: application detail
    let detail = build_detail(apps.get(state.selected).copied(), store.is_empty());
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Footer help
    let help_text = match state.mode {
        Mode::Search => " type to search  enter:keep  esc:clear",
        Mode::Form(_) => " tab/shift-tab:field  left/right:status  enter:save (newline in links/notes)  ctrl-s:save  esc:cancel",
        _ => " j/k:navigate  J/K:scroll  /:search f:filter s:sort  n:new e:edit  a/i/o/x:status  d:delete R:reset  q:quit",
    };
    let help = Paragraph::new(help_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);

    match &state.mode {
        Mode::ConfirmDelete { label, .. } => {
            draw_confirm(frame, " Delete application ", &format!("Delete {}?\nThis cannot be undone.", label));
        }
        Mode::ConfirmReset => {
            draw_confirm(frame, " Reset ", "Delete ALL applications from local data?");
        }
        Mode::Form(form) => draw_form(frame, form),
        _ => {}
    }
}

fn draw_form(frame: &mut Frame, form: &FormState) {
    let area = centered_rect(70, 20, frame.area());
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ORDER {
        let focused = field == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut value = form.value(field);
        if focused && field != FormField::Status {
            value.push('_');
        }

        let mut rows = value.split('\n');
        let first = rows.next().unwrap_or_default().to_string();
        lines.push(Line::from(vec![
            Span::styled(format!("{:>8}: ", field.label()), label_style),
            Span::raw(first),
        ]));
        for row in rows {
            lines.push(Line::from(format!("{:>10}{}", "", row)));
        }
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))));
    }

    let title = if form.id.is_some() { " Edit application " } else { " New application " };
    let popup = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(popup, area);
}

fn build_header<'a>(state: &AppState, counts: &StatusCounts) -> Paragraph<'a> {
    let mut spans: Vec<Span> = Vec::new();
    for status in ApplicationStatus::ALL {
        spans.push(Span::styled(
            format!(" {} {} ", status.label(), counts.get(status)),
            status_style(status),
        ));
    }

    let search = if state.mode == Mode::Search {
        format!("{}_", state.query.search)
    } else if state.query.search.is_empty() {
        "-".to_string()
    } else {
        state.query.search.clone()
    };
    let controls = Line::from(format!(
        " Status: {}   Sort: {}   Search: {}",
        state.query.status.label(),
        state.query.sort.label(),
        search
    ));

    Paragraph::new(vec![Line::from(spans), controls])
        .block(Block::default().borders(Borders::BOTTOM).title(" Job Tracker "))
}

fn build_detail(app: Option<&JobApplication>, collection_empty: bool) -> Text<'_> {
    let Some(app) = app else {
        return if collection_empty {
            Text::raw("No applications yet. Add one with: job-tracker add <company> <title>")
        } else {
            Text::raw("No applications match the current filter")
        };
    };

    let mut lines: Vec<Line> = Vec::new();

    // Header
    lines.push(Line::from(Span::styled(
        app.job_title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", app.company_name)));
    lines.push(Line::from(Span::styled(
        format!("Status: {}", app.status.label()),
        status_style(app.status),
    )));
    lines.push(Line::from(format!("Applied: {}", crate::display_date(app.application_date))));
    lines.push(Line::from(format!("Updated: {}", crate::display_timestamp(app.updated_at))));
    lines.push(Line::from(Span::styled(
        format!("ID: {}", app.id),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    if !app.links.is_empty() {
        lines.push(Line::from(Span::styled("Links", Style::default().add_modifier(Modifier::BOLD))));
        for link in &app.links {
            lines.push(Line::from(format!("  {}", link)));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled("Notes", Style::default().add_modifier(Modifier::BOLD))));
    if app.notes.is_empty() {
        lines.push(Line::from(Span::styled("  (none)", Style::default().fg(Color::DarkGray))));
    } else {
        for line in textwrap::fill(&app.notes, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}

fn draw_confirm(frame: &mut Frame, title: &str, message: &str) {
    let area = centered_rect(50, 7, frame.area());
    frame.render_widget(Clear, area);
    let body = format!("{}\n\n[y] confirm   [any other key] cancel", message);
    let popup = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (area.width as u32 * percent_x as u32 / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn status_icon(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Applied => "+",
        ApplicationStatus::Interview => "*",
        ApplicationStatus::Offer => "$",
        ApplicationStatus::Rejected => "x",
    }
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Applied => Style::default().fg(Color::Gray),
        ApplicationStatus::Interview => Style::default().fg(Color::Cyan),
        ApplicationStatus::Offer => Style::default().fg(Color::Green),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
    }
}
