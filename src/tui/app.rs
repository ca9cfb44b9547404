//! Main TUI application.

use std::io;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::sync::{INTERVAL_STEP_MS, SyncEngine, clamp_interval_ms};
use crate::transport::{Message, Transport};
use crate::view::{Applied, ViewState, render};
use crate::view::tree::{CellContent, DisplayTree, TableSection, TreeBody};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, UiState, map_key};
use super::paint::paint;

/// Cadence of the UI pump: transport drain, inline engine tick, repaint.
const PUMP_INTERVAL: Duration = Duration::from_millis(100);

/// The inspector view controller.
///
/// Owns the view state and this side's transport endpoint. In detached mode
/// the sync engine runs on its own thread and only messages cross; in inline
/// mode the engine is owned here and pumped from the UI loop through the
/// same transport abstraction.
pub struct App {
    view: ViewState,
    ui: UiState,
    transport: Box<dyn Transport>,
    engine: Option<SyncEngine>,
    should_quit: bool,
}

impl App {
    /// View connected to an engine on another thread.
    pub fn detached(view: ViewState, transport: Box<dyn Transport>) -> Self {
        Self {
            view,
            ui: UiState::default(),
            transport,
            engine: None,
            should_quit: false,
        }
    }

    /// Single-threaded fallback: the engine lives in the UI loop.
    pub fn inline(view: ViewState, transport: Box<dyn Transport>, engine: SyncEngine) -> Self {
        Self {
            view,
            ui: UiState::default(),
            transport,
            engine: Some(engine),
            should_quit: false,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(PUMP_INTERVAL);

        if let Some(engine) = self.engine.as_mut() {
            engine.startup(Instant::now());
        }

        // Main loop
        loop {
            self.pump();

            let tree = render(&self.view);
            self.ui.clamp(&tree);
            terminal.draw(|frame| paint(frame, &tree, &self.view, &self.ui))?;

            match events.next() {
                Ok(Event::Tick) | Ok(Event::Resize) => {}
                Ok(Event::Key(key)) => {
                    let action = map_key(key);
                    self.dispatch(action);
                }
                Err(_) => self.should_quit = true,
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Advances the inline engine and applies inbound messages.
    fn pump(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.pump(Instant::now());
            if let Some(err) = engine.last_error() {
                self.view.status_message = Some(err.to_string());
            }
        }
        for msg in self.transport.drain() {
            if self.view.apply_message(msg) == Applied::Snapshot {
                // Fresh data rebuilds the tables; expansion does not carry
                // over, matching the rebuilt DOM of the original panel.
                self.ui.collapse_all();
            }
        }
    }

    fn dispatch(&mut self, action: KeyAction) {
        match action {
            KeyAction::None => {}
            KeyAction::Quit => self.should_quit = true,

            KeyAction::NextTab => {
                self.view.switch_tab(self.view.active_tab.next());
                self.ui.reset();
            }
            KeyAction::PrevTab => {
                self.view.switch_tab(self.view.active_tab.prev());
                self.ui.reset();
            }
            KeyAction::GoToTab(tab) => {
                if tab != self.view.active_tab {
                    self.view.switch_tab(tab);
                    self.ui.reset();
                }
            }

            KeyAction::FocusUp
            | KeyAction::FocusDown
            | KeyAction::FocusLeft
            | KeyAction::FocusRight
            | KeyAction::PageUp
            | KeyAction::PageDown => {
                let tree = render(&self.view);
                self.ui.navigate(&tree, action);
            }

            KeyAction::ToggleSort => self.toggle_sort(),
            KeyAction::Select => self.select_focused(),
            KeyAction::ToggleExpand => self.toggle_expand(),

            KeyAction::Refresh => {
                self.view.status_message = Some("Refreshing data...".to_string());
                self.transport.send(Message::RefreshRequest);
            }
            KeyAction::ToggleAuto => {
                self.transport.send(Message::ToggleAuto {
                    enabled: !self.view.auto_refresh,
                });
            }
            KeyAction::IntervalUp => self.step_interval(INTERVAL_STEP_MS as i64),
            KeyAction::IntervalDown => self.step_interval(-(INTERVAL_STEP_MS as i64)),
        }
    }

    /// Header click on the focused column.
    fn toggle_sort(&mut self) {
        let tree = render(&self.view);
        let Some((collection, field)) = focused_column(&tree, &self.ui) else {
            return;
        };
        self.view.table.toggle_sort(&collection, &field);
    }

    /// Row click on the focused row.
    fn select_focused(&mut self) {
        let tree = render(&self.view);
        let Some(section) = focused_section(&tree, &self.ui) else {
            return;
        };
        let name = section.collection.clone();
        let Some(snapshot) = self.view.last_snapshot.as_ref() else {
            return;
        };
        if let Some(collection) = snapshot.collection(&name) {
            self.view.table.select(collection, self.ui.row);
        }
    }

    fn toggle_expand(&mut self) {
        let tree = render(&self.view);
        let Some(section) = focused_section(&tree, &self.ui) else {
            return;
        };
        let is_expandable = section
            .rows
            .get(self.ui.row)
            .and_then(|row| row.cells.get(self.ui.column))
            .is_some_and(|cell| matches!(cell.content, CellContent::Expandable { .. }));
        if is_expandable {
            let name = section.collection.clone();
            self.ui.toggle_expanded(&name, self.ui.row, self.ui.column);
        }
    }

    /// Steps the cadence by one notch; out-of-range values are never sent.
    fn step_interval(&mut self, delta_ms: i64) {
        let current = self.view.refresh_interval_ms;
        let stepped = current.saturating_add_signed(delta_ms);
        let next = clamp_interval_ms(stepped);
        if next != current {
            self.transport.send(Message::SetInterval { ms: next });
        }
    }
}

fn focused_section<'a>(tree: &'a DisplayTree, ui: &UiState) -> Option<&'a TableSection> {
    match &tree.body {
        TreeBody::Tab(tab) => tab.sections.get(ui.section),
        TreeBody::MissingStore { .. } => None,
    }
}

fn focused_column(tree: &DisplayTree, ui: &UiState) -> Option<(String, String)> {
    let section = focused_section(tree, ui)?;
    let column = section.columns.get(ui.column)?;
    Some((section.collection.clone(), column.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::sync::DEFAULT_INTERVAL_MS;
    use crate::transport::LocalTransport;
    use crate::view::{DEFAULT_STORE_NAME, SortDirection, StoreProfile, Tab};

    /// Inline app over the canned scenario, pumped once for initial data.
    fn inline_app() -> App {
        let (host_end, view_end) = LocalTransport::pair();
        let mut engine = SyncEngine::new(
            Box::new(MemoryBackend::construction_site()),
            Box::new(host_end),
            DEFAULT_STORE_NAME,
            DEFAULT_INTERVAL_MS,
        );
        engine.startup(Instant::now());
        let mut app = App::inline(
            ViewState::new(DEFAULT_STORE_NAME, StoreProfile::default()),
            Box::new(view_end),
            engine,
        );
        app.pump();
        app
    }

    #[test]
    fn test_startup_populates_view() {
        let app = inline_app();
        assert!(app.view.last_snapshot.is_some());
        assert!(app.view.auto_refresh);
        assert_eq!(app.view.refresh_interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn test_tab_switch_resets_focus_not_fetch() {
        let mut app = inline_app();
        app.ui.section = 1;
        app.dispatch(KeyAction::GoToTab(Tab::Protocols));
        assert_eq!(app.view.active_tab, Tab::Protocols);
        assert_eq!(app.ui.section, 0);
        // The held snapshot is reused, not refetched.
        assert!(app.view.last_snapshot.is_some());
    }

    #[test]
    fn test_sort_toggle_on_focused_column() {
        let mut app = inline_app();
        app.dispatch(KeyAction::GoToTab(Tab::Protocols));
        app.dispatch(KeyAction::ToggleSort);
        let spec = app.view.table.sort_spec("protocols").unwrap();
        assert_eq!(spec.field, "id");
        assert_eq!(spec.direction, SortDirection::Asc);
        app.dispatch(KeyAction::ToggleSort);
        let spec = app.view.table.sort_spec("protocols").unwrap();
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn test_select_records_relation_value() {
        let mut app = inline_app();
        app.dispatch(KeyAction::GoToTab(Tab::Protocols));
        app.dispatch(KeyAction::Select);
        let selection = app.view.table.selection().unwrap();
        assert_eq!(selection.collection, "protocols");
        assert_eq!(selection.row_index, 0);
        assert!(selection.relation_value.is_some());
    }

    #[test]
    fn test_interval_steps_round_trip_through_engine() {
        let mut app = inline_app();
        app.dispatch(KeyAction::IntervalUp);
        app.pump();
        assert_eq!(
            app.view.refresh_interval_ms,
            DEFAULT_INTERVAL_MS + INTERVAL_STEP_MS
        );

        app.dispatch(KeyAction::IntervalDown);
        app.pump();
        assert_eq!(app.view.refresh_interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn test_interval_never_steps_past_clamp() {
        let mut app = inline_app();
        app.view.refresh_interval_ms = crate::sync::MIN_INTERVAL_MS;
        app.dispatch(KeyAction::IntervalDown);
        app.pump();
        // No message was sent; the authoritative value is unchanged.
        assert_eq!(app.view.refresh_interval_ms, crate::sync::MIN_INTERVAL_MS);
    }

    #[test]
    fn test_auto_toggle_round_trip() {
        let mut app = inline_app();
        app.dispatch(KeyAction::ToggleAuto);
        app.pump();
        assert!(!app.view.auto_refresh);
        app.dispatch(KeyAction::ToggleAuto);
        app.pump();
        assert!(app.view.auto_refresh);
    }

    #[test]
    fn test_refresh_sets_status_until_data_arrives() {
        let mut app = inline_app();
        app.dispatch(KeyAction::Refresh);
        assert_eq!(
            app.view.status_message.as_deref(),
            Some("Refreshing data...")
        );
        // The manual refresh delivers unchanged data, which is suppressed,
        // so the note stays until a real change arrives.
        app.pump();
        assert_eq!(
            app.view.status_message.as_deref(),
            Some("Refreshing data...")
        );
    }

    #[test]
    fn test_expand_only_on_expandable_cells() {
        let mut app = inline_app();
        // Main tab, documents section first: column 0 is "id", not expandable.
        app.dispatch(KeyAction::ToggleExpand);
        assert!(app.ui.expanded.is_empty());

        // syncQueue's payload column is an object cell.
        let tree = render(&app.view);
        app.ui.section = 1;
        app.ui.column = 2;
        app.ui.clamp(&tree);
        app.dispatch(KeyAction::ToggleExpand);
        assert!(app.ui.is_expanded("syncQueue", 0, 2));

        // New data collapses everything again.
        app.view.apply_message(Message::SnapshotUpdate { stores: Vec::new() });
        app.pump();
        app.ui.collapse_all();
        assert!(app.ui.expanded.is_empty());
    }
}
