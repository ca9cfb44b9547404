//! Maps the display tree to ratatui widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use crate::view::{Tab, ViewState};
use crate::view::tree::{CellContent, CellView, DisplayTree, TableSection, TabView, TreeBody};

use super::input::UiState;
use super::style::Styles;

/// Widest a column may grow, mirroring the original's capped cell width.
const MAX_COLUMN_WIDTH: u16 = 24;

/// Paints one frame.
pub fn paint(frame: &mut Frame, tree: &DisplayTree, view: &ViewState, ui: &UiState) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(3),    // Content
        Constraint::Length(1), // Help line
    ])
    .split(frame.area());

    paint_header(frame, chunks[0], tree, view);
    paint_tabs(frame, chunks[1], view.active_tab);
    paint_body(frame, chunks[2], tree, ui);
    paint_footer(frame, chunks[3]);
}

fn paint_header(frame: &mut Frame, area: Rect, tree: &DisplayTree, view: &ViewState) {
    let chunks = Layout::horizontal([Constraint::Min(20), Constraint::Length(48)]).split(area);

    let title = Paragraph::new(format!(" {}", tree.title)).style(Styles::header());
    frame.render_widget(title, chunks[0]);

    let mut status = Vec::new();
    if let Some(msg) = &view.status_message {
        status.push(msg.clone());
    }
    status.push(if view.auto_refresh {
        format!("auto {}ms", view.refresh_interval_ms)
    } else {
        "paused".to_string()
    });
    if let Some(at) = &view.last_update_at {
        status.push(format!("upd {}", at.format("%H:%M:%S")));
    }
    let status = Paragraph::new(format!("{} ", status.join(" | ")))
        .style(Styles::header())
        .right_aligned();
    frame.render_widget(status, chunks[1]);
}

fn paint_tabs(frame: &mut Frame, area: Rect, active: Tab) {
    let spans: Vec<Span> = Tab::all()
        .iter()
        .enumerate()
        .flat_map(|(i, tab)| {
            let style = if *tab == active {
                Styles::tab_active()
            } else {
                Styles::tab_inactive()
            };
            vec![
                Span::styled(format!(" {}:", i + 1), Styles::dim()),
                Span::styled(format!("{} ", tab.name()), style),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn paint_body(frame: &mut Frame, area: Rect, tree: &DisplayTree, ui: &UiState) {
    match &tree.body {
        TreeBody::MissingStore { message } => {
            frame.render_widget(Paragraph::new(message.as_str()).style(Styles::dim()), area);
        }
        TreeBody::Tab(tab) => paint_tab(frame, area, tab, ui),
    }
}

fn paint_tab(frame: &mut Frame, area: Rect, tab: &TabView, ui: &UiState) {
    if let Some(placeholder) = &tab.placeholder {
        frame.render_widget(
            Paragraph::new(placeholder.as_str()).style(Styles::dim()),
            area,
        );
        return;
    }
    if tab.sections.is_empty() {
        frame.render_widget(Paragraph::new("(Empty)").style(Styles::dim()), area);
        return;
    }

    // Stack sections top to bottom. When they overflow the area, start at
    // the focused section so keyboard focus is always on screen.
    let heights: Vec<u16> = tab
        .sections
        .iter()
        .map(|s| section_height(s, ui))
        .collect();
    let mut start = 0;
    while start < ui.section
        && heights[start..=ui.section]
            .iter()
            .map(|&h| h as u32)
            .sum::<u32>()
            > area.height as u32
    {
        start += 1;
    }

    let mut y = area.y;
    for (idx, section) in tab.sections.iter().enumerate().skip(start) {
        if y >= area.y + area.height {
            break;
        }
        let available = area.y + area.height - y;
        let height = heights[idx].min(available);
        let rect = Rect::new(area.x, y, area.width, height);
        paint_section(frame, rect, section, ui, idx == ui.section);
        y += height;
    }
}

fn section_height(section: &TableSection, ui: &UiState) -> u16 {
    let rows: usize = section
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| row_height(section, row_idx, &row.cells, ui) as usize)
        .sum();
    // Title, column header, rows, one blank separator.
    (2 + rows.min(u16::MAX as usize) + 1) as u16
}

fn row_height(section: &TableSection, row_idx: usize, cells: &[CellView], ui: &UiState) -> u16 {
    cells
        .iter()
        .enumerate()
        .map(|(col, cell)| cell_lines(section, row_idx, col, cell, ui).len() as u16)
        .max()
        .unwrap_or(1)
}

fn paint_section(
    frame: &mut Frame,
    area: Rect,
    section: &TableSection,
    ui: &UiState,
    focused: bool,
) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(area);

    frame.render_widget(
        Paragraph::new(section.title.as_str()).style(Styles::section_title()),
        chunks[0],
    );

    if section.rows.is_empty() {
        frame.render_widget(Paragraph::new("(Empty)").style(Styles::dim()), chunks[1]);
        return;
    }

    let header = Row::new(section.columns.iter().enumerate().map(|(col, column)| {
        let mut text = column.name.clone();
        if let Some(direction) = column.sort {
            text.push(' ');
            text.push_str(direction.arrow());
        }
        let mut style = if column.version_accent {
            Styles::version_accent()
        } else {
            Styles::table_header()
        };
        if focused && col == ui.column {
            style = style.patch(Styles::focused());
        }
        Cell::from(text).style(style)
    }))
    .style(Styles::table_header());

    let rows = section.rows.iter().enumerate().map(|(row_idx, row)| {
        let row_style = if row.selected {
            Styles::selected_row()
        } else if row.related {
            Styles::related_row()
        } else {
            Styles::default()
        };
        let cells = row.cells.iter().enumerate().map(|(col, cell)| {
            let lines = cell_lines(section, row_idx, col, cell, ui);
            let mut style = cell_style(cell);
            if focused && row_idx == ui.row && col == ui.column {
                style = style.patch(Styles::focused());
            }
            Cell::from(Text::from(lines)).style(style)
        });
        Row::new(cells)
            .height(row_height(section, row_idx, &row.cells, ui))
            .style(row_style)
    });

    let widths: Vec<Constraint> = section
        .columns
        .iter()
        .enumerate()
        .map(|(col, column)| {
            let content = section
                .rows
                .iter()
                .enumerate()
                .map(|(row_idx, row)| {
                    cell_lines(section, row_idx, col, &row.cells[col], ui)
                        .iter()
                        .map(|l| l.width() as u16)
                        .max()
                        .unwrap_or(0)
                })
                .max()
                .unwrap_or(0);
            // Sort arrow needs two extra cells.
            let header_width = column.name.chars().count() as u16 + 2;
            Constraint::Length(content.max(header_width).min(MAX_COLUMN_WIDTH))
        })
        .collect();

    let mut table_state = TableState::default();
    if focused {
        table_state.select(Some(ui.row));
    }
    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_stateful_widget(table, chunks[1], &mut table_state);
}

fn cell_lines<'a>(
    section: &TableSection,
    row: usize,
    column: usize,
    cell: &'a CellView,
    ui: &UiState,
) -> Vec<Line<'a>> {
    match &cell.content {
        CellContent::Empty => vec![Line::raw("")],
        CellContent::Null => vec![Line::raw("null")],
        CellContent::Text(text) => vec![Line::raw(text.as_str())],
        CellContent::Negative(text) => vec![Line::raw(format!("⚠ {}", text))],
        CellContent::Thumbnail { caption } => vec![Line::raw(format!("▣ {}", caption))],
        CellContent::Binary { caption } => vec![Line::raw(caption.as_str())],
        CellContent::Expandable { summary, body } => {
            if ui.is_expanded(&section.collection, row, column) {
                let mut lines = vec![Line::raw(format!("▾ {}", summary))];
                lines.extend(body.lines().map(Line::raw));
                lines
            } else {
                vec![Line::raw(format!("▸ {}", summary))]
            }
        }
    }
}

fn cell_style(cell: &CellView) -> Style {
    if cell.version_accent {
        return Styles::version_accent();
    }
    match &cell.content {
        CellContent::Negative(_) => Styles::warning(),
        CellContent::Thumbnail { .. } => Styles::thumbnail(),
        CellContent::Binary { .. } => Styles::binary(),
        CellContent::Expandable { .. } => Styles::expandable(),
        CellContent::Null => Styles::dim(),
        _ => Styles::default(),
    }
}

fn paint_footer(frame: &mut Frame, area: Rect) {
    let legend = [
        ("q", "quit"),
        ("Tab/1-3", "tabs"),
        ("↑↓←→", "move"),
        ("s", "sort"),
        ("Enter", "select"),
        ("e", "expand"),
        ("r", "refresh"),
        ("a", "auto"),
        ("+/-", "interval"),
    ];
    let spans: Vec<Span> = legend
        .iter()
        .flat_map(|(key, what)| {
            vec![
                Span::styled(format!(" {}", key), Styles::help_key()),
                Span::styled(format!(":{}", what), Styles::help()),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
