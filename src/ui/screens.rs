//! Page bodies and final screens
//!
//! One render function per page kind, plus the error alert that replaces any
//! page body while the page is in its error state.

use crate::settings::Settings;
use crate::theme::{Styles, spinner_frame};
use crate::wizard::{FailureKind, Page, PageKind, PageState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

/// Body of the current page
pub fn render_page(f: &mut Frame, area: Rect, page: &Page, tick: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .title(Span::styled(format!(" {} ", page.title), Styles::title()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let has_description = !page.description.is_empty();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if has_description { 2 } else { 0 }),
            Constraint::Min(1),
        ])
        .split(inner);
    if has_description {
        f.render_widget(
            Paragraph::new(page.description.clone())
                .style(Styles::text_secondary())
                .wrap(Wrap { trim: true }),
            chunks[0],
        );
    }
    let body = chunks[1];

    match page.state() {
        PageState::Idle | PageState::AwaitingResult => render_spinner(f, body, page, tick),
        PageState::Error => render_error(f, body, page),
        PageState::Displaying => match page.kind() {
            PageKind::Notice { body: text } => render_notice(f, body, text),
            PageKind::Picker { .. } => render_choices(f, body, page),
            PageKind::Defaults { fields, fixed } => {
                let rows = fields
                    .iter()
                    .map(|field| (field.label.as_str(), field.value.as_deref().unwrap_or("-")))
                    .chain(fixed.iter().map(|(name, value, _)| (name.as_str(), value.as_str())));
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length((fields.len() + fixed.len()) as u16 + 1),
                        Constraint::Min(2),
                    ])
                    .split(body);
                let lines: Vec<Line> = rows
                    .map(|(label, value)| {
                        Line::from(vec![
                            Span::styled(format!("{label}: "), Styles::text_secondary()),
                            Span::styled(value.to_string(), Styles::text()),
                        ])
                    })
                    .collect();
                f.render_widget(Paragraph::new(lines), chunks[0]);
                render_choices(f, chunks[1], page);
            }
            PageKind::Input { validation, .. } => {
                render_input(f, body, page, validation.hint());
            }
            PageKind::ProjectCreator { .. } => {
                render_input(
                    f,
                    body,
                    page,
                    "6 to 30 characters: lowercase letters, digits and hyphens",
                );
            }
            PageKind::Lookup { .. } => render_spinner(f, body, page, tick),
        },
    }
}

fn render_notice(f: &mut Frame, area: Rect, text: &str) {
    f.render_widget(
        Paragraph::new(text.to_string())
            .style(Styles::text())
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_choices(f: &mut Frame, area: Rect, page: &Page) {
    let items: Vec<ListItem> = page
        .choices()
        .iter()
        .map(|choice| {
            let mut spans = vec![Span::raw(choice.label.clone())];
            if choice.is_default {
                spans.push(Span::styled(" (default)", Styles::default_marker()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Styles::selected())
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(page.highlighted()));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_input(f: &mut Frame, area: Rect, page: &Page, hint: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let buffer = page.buffer().unwrap_or("");
    let input = Paragraph::new(format!("{buffer}_"))
        .style(Styles::text())
        .block(Block::default().borders(Borders::ALL).title(" Answer "));
    f.render_widget(input, chunks[0]);

    let mut hints = Vec::new();
    if let Some(default) = &page.default {
        hints.push(Span::styled(format!("Default: {default}  "), Styles::text_muted()));
    }
    if !hint.is_empty() {
        hints.push(Span::styled(hint.to_string(), Styles::text_muted()));
    }
    f.render_widget(Paragraph::new(Line::from(hints)), chunks[1]);

    if let Some(notice) = page.input_notice() {
        f.render_widget(
            Paragraph::new(notice.to_string())
                .style(Styles::warning())
                .wrap(Wrap { trim: true }),
            chunks[2],
        );
    }
}

fn render_spinner(f: &mut Frame, area: Rect, page: &Page, tick: usize) {
    let line = Line::from(vec![
        Span::styled(format!("{} ", spinner_frame(tick)), Styles::title()),
        Span::styled(format!("Loading {}...", page.title.to_lowercase()), Styles::text_secondary()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Alert shown while a page is in its error state
fn render_error(f: &mut Frame, area: Rect, page: &Page) {
    let Some(error) = page.error() else {
        return;
    };
    let headline = match &error.kind {
        FailureKind::ProjectCreate(_) => "The project could not be created",
        FailureKind::Fetch => "Something went wrong",
    };
    let next = match &error.recovery_target {
        Some(target) if *target == page.key => "Press Enter to try again.".to_string(),
        Some(target) => format!("Press Enter to go back to '{target}'."),
        None => "Press Enter to stop the wizard.".to_string(),
    };
    let lines = vec![
        Line::from(Span::styled(headline, Styles::error())),
        Line::from(""),
        Line::from(Span::styled(error.message.clone(), Styles::text())),
        Line::from(""),
        Line::from(Span::styled(next, Styles::text_secondary())),
    ];
    let alert = Paragraph::new(lines)
        .style(Styles::panel_bg_danger())
        .block(Block::default().borders(Borders::ALL).border_style(Styles::error()))
        .wrap(Wrap { trim: true });
    f.render_widget(alert, area);
}

/// Table of everything collected
pub fn render_settings(f: &mut Frame, area: Rect, settings: &Settings) {
    let rows: Vec<Row> = settings
        .iter()
        .map(|s| Row::new(vec![s.name.clone(), s.value.clone(), s.kind.to_string()]))
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(50),
            Constraint::Percentage(15),
        ],
    )
    .header(Row::new(vec!["Setting", "Value", "Type"]).style(Styles::title()))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .title(Span::styled(" Collected settings ", Styles::success())),
    );
    f.render_widget(table, area);
}

pub fn render_failure(f: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled("The wizard stopped", Styles::error())),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Styles::text())),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Styles::error()))
            .wrap(Wrap { trim: true }),
        area,
    );
}

pub fn render_message(f: &mut Frame, area: Rect, message: &str, style: Style) {
    f.render_widget(
        Paragraph::new(message.to_string())
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}
