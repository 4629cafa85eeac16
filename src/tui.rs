use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use std::io::stdout;
use tracing::debug;

use crate::filters::FilterOptions;
use crate::models::{row_key, Lead, RowKey};
use crate::sort::{SortDirection, SortField};
use crate::view::{EmptyReason, LeadsDashboard};

const SIGNAL_LABEL: &str = "Worked at Customer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chip {
    Industry(usize),
    Size(usize),
    Signal,
}

fn chips(options: &FilterOptions) -> Vec<Chip> {
    (0..options.industry_preview().len())
        .map(Chip::Industry)
        .chain((0..options.sizes.len()).map(Chip::Size))
        .chain(std::iter::once(Chip::Signal))
        .collect()
}

pub(crate) struct AppState {
    dashboard: LeadsDashboard,
    selected: usize,
    show_filters: bool,
    chip_cursor: usize,
    quit: bool,
}

impl AppState {
    pub(crate) fn new(dashboard: LeadsDashboard) -> Self {
        Self {
            dashboard,
            selected: 0,
            show_filters: false,
            chip_cursor: 0,
            quit: false,
        }
    }

    fn current_lead(&self) -> Option<&Lead> {
        self.dashboard.visible_rows().get(self.selected).copied()
    }

    fn selected_slug(&self) -> Option<String> {
        self.current_lead()
            .map(|lead| lead.linkedin_slug.clone())
            .filter(|slug| !slug.is_empty())
    }

    /// Keep the cursor on the same lead when it has a slug, else on the same position.
    fn restore_selection(&mut self, previous: Option<String>) {
        let rows = self.dashboard.visible_rows();
        if let Some(slug) = previous {
            let found = rows
                .iter()
                .enumerate()
                .position(|(i, lead)| row_key(i, lead) == RowKey::Slug(&slug));
            if let Some(pos) = found {
                self.selected = pos;
                return;
            }
        }
        self.selected = self.selected.min(rows.len().saturating_sub(1));
    }

    fn next(&mut self) {
        if self.selected + 1 < self.dashboard.visible_len() {
            self.selected += 1;
        }
    }

    fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn toggle_chip(&mut self) {
        let options = self.dashboard.options().clone();
        let Some(chip) = chips(&options).get(self.chip_cursor).copied() else { return };
        match chip {
            Chip::Industry(i) => self.dashboard.toggle_industry(&options.industries[i]),
            Chip::Size(i) => self.dashboard.toggle_size(&options.sizes[i]),
            Chip::Signal => self.dashboard.toggle_worked_at_customer(),
        }
    }

    fn move_chip(&mut self, forward: bool) {
        let count = chips(self.dashboard.options()).len();
        self.chip_cursor = if forward {
            (self.chip_cursor + 1).min(count.saturating_sub(1))
        } else {
            self.chip_cursor.saturating_sub(1)
        };
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        let previous = self.selected_slug();

        if self.dashboard.is_search_focused() {
            match key.code {
                KeyCode::Esc => self.dashboard.cancel_search(),
                KeyCode::Enter | KeyCode::Tab => self.dashboard.blur_search(),
                KeyCode::Backspace => self.dashboard.pop_search_char(),
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.dashboard.clear_search_query()
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.dashboard.push_search_char(c)
                }
                KeyCode::Down => self.next(),
                KeyCode::Up => self.prev(),
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Esc => {
                    if self.show_filters {
                        self.show_filters = false;
                    } else if self.dashboard.is_search_visible() {
                        self.dashboard.toggle_search();
                    } else {
                        self.quit = true;
                    }
                }
                KeyCode::Char('/') => self.dashboard.toggle_search(),
                KeyCode::Char('x') => self.dashboard.clear_search_query(),
                KeyCode::Char('f') => self.show_filters = !self.show_filters,
                KeyCode::Char('c') => self.dashboard.clear_filters(),
                KeyCode::Char('w') => self.dashboard.toggle_worked_at_customer(),
                KeyCode::Char(c @ '1'..='5') => {
                    let column = c as usize - '1' as usize;
                    self.dashboard.activate_sort(SortField::COLUMNS[column]);
                }
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.prev(),
                KeyCode::Left | KeyCode::Char('h') if self.show_filters => self.move_chip(false),
                KeyCode::Right | KeyCode::Char('l') if self.show_filters => self.move_chip(true),
                KeyCode::Char(' ') | KeyCode::Enter if self.show_filters => self.toggle_chip(),
                _ => {}
            }
        }

        self.restore_selection(previous);
    }
}

pub fn run_dashboard(dashboard: LeadsDashboard) -> Result<()> {
    let mut state = AppState::new(dashboard);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut AppState) -> Result<()> {
    let mut table_state = TableState::default();

    while !state.quit {
        terminal.draw(|frame| draw(frame, state, &mut table_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            debug!(code = ?key.code, "key");
            state.handle_key(key);
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, table_state: &mut TableState) {
    let dashboard = &state.dashboard;
    let filter_height = if state.show_filters { 5 } else { 0 };
    let search_height = if dashboard.is_search_visible() { 2 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(search_height),
            Constraint::Length(2),
            Constraint::Length(filter_height),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(build_header(dashboard), chunks[0]);
    if dashboard.is_search_visible() {
        frame.render_widget(build_search(dashboard), chunks[1]);
    }
    frame.render_widget(build_toolbar(state), chunks[2]);
    if state.show_filters {
        frame.render_widget(build_filter_panel(state), chunks[3]);
    }

    if dashboard.visible_len() == 0 {
        frame.render_widget(build_empty_state(dashboard), chunks[4]);
    } else {
        table_state.select(Some(state.selected));
        frame.render_stateful_widget(build_table(dashboard), chunks[4], table_state);
    }

    let detail = state.current_lead().map(build_detail).unwrap_or_default();
    frame.render_widget(Paragraph::new(detail), chunks[5]);

    let help = Paragraph::new(
        " /:search  f:filters  h/l:chip  space:toggle  w:signal  c:clear  1-5:sort  j/k:navigate  q:quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[6]);
}

fn build_header(dashboard: &LeadsDashboard) -> Paragraph<'_> {
    let search_marker = if dashboard.is_search_visible() {
        Span::styled(" [/] search ", Style::default().bg(Color::DarkGray))
    } else {
        Span::styled(" [/] search ", Style::default().fg(Color::DarkGray))
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(dashboard.company_name(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            search_marker,
        ]),
        Line::from(Span::styled(
            "GTM leads powered by Bullseye",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM))
}

fn build_search(dashboard: &LeadsDashboard) -> Paragraph<'_> {
    let query = dashboard.search_query();
    let mut spans = vec![Span::styled("Search: ", Style::default().fg(Color::DarkGray))];
    if query.is_empty() && !dashboard.is_search_focused() {
        spans.push(Span::styled("Search leads...", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::raw(query));
    }
    if dashboard.is_search_focused() {
        spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
    }
    if !query.is_empty() {
        spans.push(Span::styled(
            if dashboard.is_search_focused() { "  (ctrl+u: clear)" } else { "  (x: clear)" },
            Style::default().fg(Color::DarkGray),
        ));
    }
    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM))
}

fn build_toolbar(state: &AppState) -> Paragraph<'_> {
    let dashboard = &state.dashboard;
    let arrow = if state.show_filters { "▴" } else { "▾" };
    let mut spans = vec![
        Span::styled(" All Leads ", Style::default().bg(Color::DarkGray)),
        Span::raw("  "),
        Span::raw(format!("Filters {}", arrow)),
        Span::raw("  "),
        Span::styled(dashboard.lead_count_label(), Style::default().fg(Color::DarkGray)),
    ];
    let active = dashboard.active_filter_count();
    if active > 0 {
        spans.push(Span::raw("    "));
        spans.push(Span::styled(
            format!("Filters ({}) [c] clear", active),
            Style::default().fg(Color::Yellow),
        ));
    }
    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM))
}

fn chip_span(label: &str, active: bool, under_cursor: bool, active_style: Style) -> Span<'static> {
    let mut style = if active { active_style } else { Style::default().fg(Color::Gray) };
    if under_cursor {
        style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
    }
    Span::styled(format!(" {} ", label), style)
}

fn build_filter_panel(state: &AppState) -> Paragraph<'_> {
    let dashboard = &state.dashboard;
    let options = dashboard.options();
    let filters = dashboard.filters();
    let selected = Style::default().bg(Color::White).fg(Color::Black);
    let cursor = chips(options).get(state.chip_cursor).copied();
    let label = |text: &'static str| Span::styled(format!("{:<14}", text), Style::default().fg(Color::DarkGray));

    let mut industry = vec![label("INDUSTRY")];
    for (i, value) in options.industry_preview().iter().enumerate() {
        industry.push(chip_span(
            value,
            filters.industries.contains(value),
            cursor == Some(Chip::Industry(i)),
            selected,
        ));
    }

    let mut size = vec![label("COMPANY SIZE")];
    for (i, value) in options.sizes.iter().enumerate() {
        size.push(chip_span(
            value,
            filters.sizes.contains(value),
            cursor == Some(Chip::Size(i)),
            selected,
        ));
    }

    let signal = vec![
        label("SIGNALS"),
        chip_span(
            SIGNAL_LABEL,
            filters.worked_at_customer.is_engaged(),
            cursor == Some(Chip::Signal),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::REVERSED),
        ),
    ];

    Paragraph::new(vec![Line::from(industry), Line::from(size), Line::from(signal)])
        .block(Block::default().borders(Borders::BOTTOM).title(" Filters "))
}

fn header_label(dashboard: &LeadsDashboard, field: SortField) -> String {
    let indicator = match dashboard.sort().direction_for(field) {
        Some(SortDirection::Asc) => "↑",
        Some(SortDirection::Desc) => "↓",
        None => "↕",
    };
    format!("{} {}", field.label(), indicator)
}

fn build_table(dashboard: &LeadsDashboard) -> Table<'_> {
    let dim = Style::default().fg(Color::Gray);
    let header = Row::new(vec![
        Cell::from(header_label(dashboard, SortField::FullName)),
        Cell::from("Domain"),
        Cell::from(header_label(dashboard, SortField::CompanyName)),
        Cell::from(header_label(dashboard, SortField::Title)),
        Cell::from(header_label(dashboard, SortField::CompanyIndustry)),
        Cell::from(header_label(dashboard, SortField::CompanySize)),
        Cell::from("Signals"),
    ])
    .style(Style::default().add_modifier(Modifier::DIM | Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row> = dashboard
        .visible_rows()
        .into_iter()
        .map(|lead| {
            let name = match lead.profile_url() {
                Some(_) => format!("{} ↗", lead.full_name),
                None => lead.full_name.clone(),
            };
            let signal = if lead.is_worked_at_customer {
                Cell::from(SIGNAL_LABEL).style(Style::default().fg(Color::Magenta))
            } else {
                Cell::from("")
            };
            Row::new(vec![
                Cell::from(name).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(lead.company_domain.as_str()).style(dim),
                Cell::from(lead.company_name.as_str()).style(dim),
                Cell::from(lead.title.as_str()).style(dim),
                Cell::from(lead.company_industry.as_str()).style(dim),
                Cell::from(lead.company_size.as_str()).style(dim),
                signal,
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(17), // Name
        Constraint::Percentage(13), // Domain
        Constraint::Percentage(14), // Company
        Constraint::Percentage(18), // Title
        Constraint::Percentage(13), // Industry
        Constraint::Length(10),     // Size
        Constraint::Min(18),        // Signals
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ")
}

fn build_empty_state(dashboard: &LeadsDashboard) -> Paragraph<'static> {
    let hint = |text: &str| {
        Line::from(Span::styled(text.to_string(), Style::default().add_modifier(Modifier::UNDERLINED)))
    };
    let (message, action) = match dashboard.empty_reason() {
        Some(EmptyReason::Filtered) => (
            "No leads match your filters".to_string(),
            Some(hint("Press c to clear all filters")),
        ),
        Some(EmptyReason::Searched) => {
            let key = if dashboard.is_search_focused() { "Ctrl+U" } else { "x" };
            (
                format!("No leads match \"{}\"", dashboard.search_query()),
                Some(hint(&format!("Press {} to clear search", key))),
            )
        }
        Some(EmptyReason::NoLeads) | None => ("No leads yet".to_string(), None),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
    ];
    lines.extend(action);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn build_detail(lead: &Lead) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    if let Some(url) = lead.profile_url() {
        spans.push(Span::styled(url.to_string(), Style::default().fg(Color::Cyan)));
    }
    if let Some(tooltip) = lead.signal_tooltip() {
        if spans.len() > 1 {
            spans.push(Span::raw("  ·  "));
        }
        spans.push(Span::styled(tooltip, Style::default().fg(Color::Magenta)));
    }
    Line::from(spans)
}
