//! Input handling and keybindings.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::view::Tab;
use crate::view::tree::{DisplayTree, TabView, TreeBody};

/// Result of mapping a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Cycle to the next/previous tab.
    NextTab,
    PrevTab,
    /// Jump straight to one tab.
    GoToTab(Tab),
    /// Move the keyboard focus.
    FocusUp,
    FocusDown,
    FocusLeft,
    FocusRight,
    PageUp,
    PageDown,
    /// Toggle the sort on the focused column (a header click).
    ToggleSort,
    /// Select the focused row (a row click).
    Select,
    /// Expand/collapse the focused array or object cell.
    ToggleExpand,
    /// Ask the sync loop for an immediate poll.
    Refresh,
    /// Flip auto-refresh.
    ToggleAuto,
    /// Step the polling cadence.
    IntervalUp,
    IntervalDown,
}

/// Maps a key event to its action. Pure; dispatch happens in the app.
pub fn map_key(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        KeyCode::Tab => KeyAction::NextTab,
        KeyCode::BackTab => KeyAction::PrevTab,
        KeyCode::Char('1') => KeyAction::GoToTab(Tab::Main),
        KeyCode::Char('2') => KeyAction::GoToTab(Tab::Protocols),
        KeyCode::Char('3') => KeyAction::GoToTab(Tab::Header),

        KeyCode::Up | KeyCode::Char('k') => KeyAction::FocusUp,
        KeyCode::Down | KeyCode::Char('j') => KeyAction::FocusDown,
        KeyCode::Left | KeyCode::Char('h') => KeyAction::FocusLeft,
        KeyCode::Right | KeyCode::Char('l') => KeyAction::FocusRight,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,

        KeyCode::Char('s') => KeyAction::ToggleSort,
        KeyCode::Enter => KeyAction::Select,
        KeyCode::Char('e') => KeyAction::ToggleExpand,

        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char('a') => KeyAction::ToggleAuto,
        KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::IntervalUp,
        KeyCode::Char('-') => KeyAction::IntervalDown,

        _ => KeyAction::None,
    }
}

/// Rows moved by one PageUp/PageDown.
const PAGE_ROWS: usize = 10;

/// Frontend-local navigation state: keyboard focus and cell expansion.
///
/// Unlike sort and selection this does not belong to the view model; it is
/// rebuilt cheap and reset whenever the table content is replaced, the same
/// way the original panel's DOM details elements were.
#[derive(Debug, Default)]
pub struct UiState {
    /// Focused section within the active tab.
    pub section: usize,
    /// Focused view row within the section.
    pub row: usize,
    /// Focused column within the section.
    pub column: usize,
    /// Expanded cells, keyed by collection name, view row, and column.
    pub expanded: HashSet<(String, usize, usize)>,
}

impl UiState {
    /// Drops focus and expansion, e.g. on tab switch or new data.
    pub fn reset(&mut self) {
        self.section = 0;
        self.row = 0;
        self.column = 0;
        self.expanded.clear();
    }

    /// Collapses expansion only; focus survives a data refresh.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// True when the focused cell is expanded.
    pub fn is_expanded(&self, collection: &str, row: usize, column: usize) -> bool {
        self.expanded
            .contains(&(collection.to_string(), row, column))
    }

    /// Expands or collapses one cell.
    pub fn toggle_expanded(&mut self, collection: &str, row: usize, column: usize) {
        let key = (collection.to_string(), row, column);
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
    }

    /// Clamps focus into the bounds of the current tree.
    pub fn clamp(&mut self, tree: &DisplayTree) {
        let Some(tab) = tab_of(tree) else {
            self.section = 0;
            self.row = 0;
            self.column = 0;
            return;
        };
        if tab.sections.is_empty() {
            self.section = 0;
            self.row = 0;
            self.column = 0;
            return;
        }
        self.section = self.section.min(tab.sections.len() - 1);
        let section = &tab.sections[self.section];
        self.row = self.row.min(section.rows.len().saturating_sub(1));
        self.column = self.column.min(section.columns.len().saturating_sub(1));
    }

    /// Applies a focus movement against the current tree. Up/Down flow
    /// across section boundaries so every table is reachable.
    pub fn navigate(&mut self, tree: &DisplayTree, action: KeyAction) {
        let Some(tab) = tab_of(tree) else {
            return;
        };
        if tab.sections.is_empty() {
            return;
        }
        self.clamp(tree);
        match action {
            KeyAction::FocusUp => {
                if self.row > 0 {
                    self.row -= 1;
                } else if self.section > 0 {
                    self.section -= 1;
                    self.row = tab.sections[self.section].rows.len().saturating_sub(1);
                }
            }
            KeyAction::FocusDown => {
                let last = tab.sections[self.section].rows.len().saturating_sub(1);
                if self.row < last {
                    self.row += 1;
                } else if self.section + 1 < tab.sections.len() {
                    self.section += 1;
                    self.row = 0;
                }
            }
            KeyAction::FocusLeft => {
                self.column = self.column.saturating_sub(1);
            }
            KeyAction::FocusRight => {
                let last = tab.sections[self.section]
                    .columns
                    .len()
                    .saturating_sub(1);
                self.column = (self.column + 1).min(last);
            }
            KeyAction::PageUp => {
                self.row = self.row.saturating_sub(PAGE_ROWS);
            }
            KeyAction::PageDown => {
                let last = tab.sections[self.section].rows.len().saturating_sub(1);
                self.row = (self.row + PAGE_ROWS).min(last);
            }
            _ => {}
        }
        self.clamp(tree);
    }
}

fn tab_of(tree: &DisplayTree) -> Option<&TabView> {
    match &tree.body {
        TreeBody::Tab(tab) => Some(tab),
        TreeBody::MissingStore { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Collection, Record, StoreMeta, StoreSnapshot, Value};
    use crate::view::TableModel;
    use crate::view::render::render_tab;
    use crate::view::tabs::StoreProfile;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_map() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(map_key(key(KeyCode::Tab)), KeyAction::NextTab);
        assert_eq!(
            map_key(key(KeyCode::Char('2'))),
            KeyAction::GoToTab(Tab::Protocols)
        );
        assert_eq!(map_key(key(KeyCode::Char('s'))), KeyAction::ToggleSort);
        assert_eq!(map_key(key(KeyCode::Enter)), KeyAction::Select);
        assert_eq!(map_key(key(KeyCode::Char('e'))), KeyAction::ToggleExpand);
        assert_eq!(map_key(key(KeyCode::Char('r'))), KeyAction::Refresh);
        assert_eq!(map_key(key(KeyCode::Char('a'))), KeyAction::ToggleAuto);
        assert_eq!(map_key(key(KeyCode::Char('+'))), KeyAction::IntervalUp);
        assert_eq!(map_key(key(KeyCode::Char('-'))), KeyAction::IntervalDown);
        assert_eq!(map_key(key(KeyCode::Char('x'))), KeyAction::None);
    }

    fn two_section_tree() -> DisplayTree {
        let record = |n: f64| -> Record {
            [
                ("id".to_string(), Value::Number(n)),
                ("note".to_string(), Value::Null),
            ]
            .into_iter()
            .collect()
        };
        let snapshot = StoreSnapshot::new(
            StoreMeta {
                name: "db".to_string(),
                version: 1,
            },
            vec![
                Collection::new("documents", vec![record(1.0), record(2.0)]),
                Collection::new("syncQueue", vec![record(3.0)]),
            ],
        );
        let model = TableModel::new(StoreProfile::default());
        DisplayTree {
            title: "db (v1)".to_string(),
            body: TreeBody::Tab(render_tab(&snapshot, &model, Tab::Main)),
        }
    }

    #[test]
    fn test_focus_flows_across_sections() {
        let tree = two_section_tree();
        let mut ui = UiState::default();

        ui.navigate(&tree, KeyAction::FocusDown);
        assert_eq!((ui.section, ui.row), (0, 1));
        ui.navigate(&tree, KeyAction::FocusDown);
        assert_eq!((ui.section, ui.row), (1, 0));
        // Bottom of the last section stays put.
        ui.navigate(&tree, KeyAction::FocusDown);
        assert_eq!((ui.section, ui.row), (1, 0));

        ui.navigate(&tree, KeyAction::FocusUp);
        assert_eq!((ui.section, ui.row), (0, 1));
    }

    #[test]
    fn test_column_focus_clamps() {
        let tree = two_section_tree();
        let mut ui = UiState::default();
        ui.navigate(&tree, KeyAction::FocusRight);
        assert_eq!(ui.column, 1);
        ui.navigate(&tree, KeyAction::FocusRight);
        assert_eq!(ui.column, 1);
        ui.navigate(&tree, KeyAction::FocusLeft);
        assert_eq!(ui.column, 0);
        ui.navigate(&tree, KeyAction::FocusLeft);
        assert_eq!(ui.column, 0);
    }

    #[test]
    fn test_expansion_toggle_round_trip() {
        let mut ui = UiState::default();
        assert!(!ui.is_expanded("documents", 0, 2));
        ui.toggle_expanded("documents", 0, 2);
        assert!(ui.is_expanded("documents", 0, 2));
        ui.toggle_expanded("documents", 0, 2);
        assert!(!ui.is_expanded("documents", 0, 2));
    }

    #[test]
    fn test_clamp_against_missing_store() {
        let tree = DisplayTree {
            title: "Store Inspector".to_string(),
            body: TreeBody::MissingStore {
                message: "No data".to_string(),
            },
        };
        let mut ui = UiState {
            section: 3,
            row: 9,
            column: 2,
            ..UiState::default()
        };
        ui.clamp(&tree);
        assert_eq!((ui.section, ui.row, ui.column), (0, 0, 0));
    }
}
