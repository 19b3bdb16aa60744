//! Application module
//!
//! Contains the interactive event loop. The loop is the only place the queue
//! is touched while the wizard runs: fetch workers report back through the
//! channel and their results are applied here, one message per turn.
//!
//! # Module Structure
//! - `headless` - the same loop without a terminal, accepting every default
//! - Main module - App struct and event loop

pub mod headless;

pub use headless::{MAX_RECOVERIES, run_headless};

use crate::input;
use crate::ui;
use crate::wizard::{Key, Msg, Queue};
use crossterm::event::Event;
use ratatui::{Terminal, backend::Backend};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, error, info};

/// Main application struct
pub struct App {
    queue: Queue,
    /// Cloned into every fetch worker
    tx: Sender<Msg>,
    /// Drained in the main loop
    rx: Receiver<Msg>,
    tick: usize,
}

impl App {
    pub fn new(queue: Queue) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            queue,
            tx,
            rx,
            tick: 0,
        }
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn into_queue(self) -> Queue {
        self.queue
    }

    /// Enter the first page
    pub fn start(&mut self) {
        match self.queue.init() {
            Ok(step) => self.queue.spawn(step.into_commands(), &self.tx),
            Err(e) => error!("Failed to start wizard: {}", e),
        }
    }

    fn deliver(&mut self, msg: Msg) {
        if self.queue.is_finished() {
            debug!("Dropping message delivered after the wizard finished");
            return;
        }
        match self.queue.dispatch(msg) {
            Ok(commands) => self.queue.spawn(commands, &self.tx),
            Err(e) => error!("Dispatch failed: {}", e),
        }
    }

    /// Apply every fetch result that has arrived
    pub fn poll_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.deliver(msg);
        }
    }

    /// Handle one key; returns true when the loop should exit
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.queue.is_finished() {
            return matches!(key, Key::Enter | Key::Esc | Key::Quit);
        }
        self.deliver(Msg::Key(key));
        false
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        info!("Starting main application loop");
        self.start();

        loop {
            self.poll_messages();

            terminal.draw(|f| ui::render(f, &self.queue.current_view(), self.tick))?;
            self.tick = self.tick.wrapping_add(1);

            if crossterm::event::poll(Duration::from_millis(50))? {
                if let Event::Key(event) = crossterm::event::read()? {
                    if let Some(key) = input::map_key(event) {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                }
            }
        }

        info!(status = ?self.queue.status(), "Main loop finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::{Inventory, InventoryClient};
    use crate::fetch::FetchKind;
    use crate::wizard::{Page, PageState, RunStatus};
    use std::sync::Arc;
    use std::time::Instant;

    fn app() -> App {
        let inventory = Inventory {
            regions: vec!["us-central1".to_string(), "us-east1".to_string()],
            default_region: Some("us-east1".to_string()),
            ..Default::default()
        };
        let mut queue = Queue::new(Arc::new(InventoryClient::new(inventory)));
        queue.settings_mut().add("project_id", "p1");
        queue
            .add(Page::fetched_picker("region", "Region", FetchKind::Regions(Default::default())))
            .unwrap();
        App::new(queue)
    }

    fn wait_until_displaying(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            app.poll_messages();
            if app.queue().current().map(|p| p.state()) == Some(PageState::Displaying) {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("page never displayed");
    }

    #[test]
    fn test_worker_results_flow_through_channel() {
        let mut app = app();
        app.start();
        wait_until_displaying(&mut app);

        assert!(!app.handle_key(Key::Enter));
        assert_eq!(app.queue().status(), &RunStatus::Complete);
        assert_eq!(app.queue().settings().find("region"), Some("us-east1"));
        // Any of the exit keys closes the final screen.
        assert!(app.handle_key(Key::Enter));
    }

    #[test]
    fn test_quit_cancels() {
        let mut app = app();
        app.start();
        assert!(!app.handle_key(Key::Quit));
        assert_eq!(app.queue().status(), &RunStatus::Cancelled);
        // A late result is dropped without touching the store.
        wait_for_drain(&mut app);
        assert!(!app.queue().settings().contains("region"));
    }

    fn wait_for_drain(app: &mut App) {
        std::thread::sleep(Duration::from_millis(50));
        app.poll_messages();
    }
}
