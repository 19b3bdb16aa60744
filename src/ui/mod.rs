//! User interface rendering module
//!
//! - `mod` - frame layout: header, step progress, body, key hints
//! - `screens` - page bodies, error alert and the final screens
//!
//! Rendering is a pure function of the queue's [`View`]; nothing here mutates
//! wizard state.

pub mod screens;

use crate::theme::{Styles, UiConstants};
use crate::wizard::{PageKind, PageState, View};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Draw one frame for `view`; `tick` drives the spinner
pub fn render(f: &mut Frame, view: &View, tick: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(UiConstants::HEADER_HEIGHT),
            Constraint::Length(UiConstants::PROGRESS_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(UiConstants::NAV_BAR_HEIGHT),
        ])
        .split(f.area());

    match view {
        View::NotStarted => {
            render_header(f, chunks[0], "deploywiz");
            screens::render_message(f, chunks[2], "Preparing...", Styles::text_secondary());
        }
        View::Page {
            page,
            step,
            total,
            title,
        } => {
            let heading = if title.is_empty() { "deploywiz" } else { *title };
            render_header(f, chunks[0], heading);
            render_progress(f, chunks[1], *step, *total);
            screens::render_page(f, chunks[2], page, tick);
            render_nav_bar(f, chunks[3], nav_hints(page.kind(), page.state()));
        }
        View::Complete { settings } => {
            render_header(f, chunks[0], "Configuration complete");
            screens::render_settings(f, chunks[2], settings);
            render_nav_bar(f, chunks[3], &[("Enter", "Finish")]);
        }
        View::Failed { message } => {
            render_header(f, chunks[0], "Configuration failed");
            screens::render_failure(f, chunks[2], message);
            render_nav_bar(f, chunks[3], &[("Enter", "Exit")]);
        }
        View::Cancelled => {
            render_header(f, chunks[0], "Cancelled");
            screens::render_message(
                f,
                chunks[2],
                "Nothing was written.",
                Styles::warning(),
            );
            render_nav_bar(f, chunks[3], &[("Enter", "Exit")]);
        }
    }
}

fn render_header(f: &mut Frame, area: Rect, title: &str) {
    let header = Paragraph::new(title.to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active()),
        )
        .alignment(Alignment::Center)
        .style(Styles::title());
    f.render_widget(header, area);
}

fn render_progress(f: &mut Frame, area: Rect, step: usize, total: usize) {
    let ratio = if total == 0 {
        0.0
    } else {
        (step as f64 / total as f64).clamp(0.0, 1.0)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Styles::progress())
        .ratio(ratio)
        .label(format!("Step {step} of {total}"));
    f.render_widget(gauge, area);
}

/// Key hints for the current page
pub fn nav_hints(kind: &PageKind, state: PageState) -> &'static [(&'static str, &'static str)] {
    match state {
        PageState::Error => &[("Enter", "Acknowledge"), ("Esc", "Quit")],
        PageState::Idle | PageState::AwaitingResult => &[("Esc", "Quit")],
        PageState::Displaying => match kind {
            PageKind::Picker { .. } | PageKind::Defaults { .. } => {
                &[("↑/k ↓/j", "Move"), ("Enter", "Select"), ("Esc", "Quit")]
            }
            PageKind::Input { .. } | PageKind::ProjectCreator { .. } => {
                &[("Enter", "Submit (empty keeps the default)"), ("Esc", "Quit")]
            }
            PageKind::Notice { .. } | PageKind::Lookup { .. } => &[("Enter", "Continue"), ("Esc", "Quit")],
        },
    }
}

fn render_nav_bar(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(format!(" [{key}] "), Styles::key_hint()));
        spans.push(Span::styled(format!("{action}  "), Styles::nav_hint()));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
