//! Pure projection from view state to the display tree.

use crate::model::{Collection, StoreSnapshot};

use super::format::format_value;
use super::state::ViewState;
use super::table::TableModel;
use super::tabs::Tab;
use super::tree::{
    CellView, ColumnView, DisplayTree, RowView, TableSection, TabView, TreeBody,
};

const VERSION_COLUMN: &str = "version";

/// Projects the whole view. No state is mutated; interaction handlers feed
/// the table model and the projection is simply run again.
pub fn render(state: &ViewState) -> DisplayTree {
    let Some(snapshot) = state.last_snapshot.as_ref() else {
        return DisplayTree {
            title: "Store Inspector".to_string(),
            body: TreeBody::MissingStore {
                message: format!("No data for store {}", state.store_name),
            },
        };
    };
    DisplayTree {
        title: format!("{} (v{})", snapshot.name, snapshot.version),
        body: TreeBody::Tab(render_tab(snapshot, &state.table, state.active_tab)),
    }
}

/// Projects one tab from an already-held snapshot.
pub fn render_tab(snapshot: &StoreSnapshot, model: &TableModel, tab: Tab) -> TabView {
    let profile = model.profile();
    let mut sections = Vec::new();
    let mut placeholder = None;

    match tab {
        Tab::Header => {
            for name in &profile.header_collections {
                if let Some(collection) = snapshot.collection(name) {
                    sections.push(render_section(collection, model));
                }
            }
        }
        Tab::Protocols => match snapshot.collection(&profile.parent_collection) {
            Some(collection) => sections.push(render_section(collection, model)),
            None => {
                placeholder = Some(format!("(No data for {})", profile.parent_collection));
            }
        },
        Tab::Main => {
            for collection in &snapshot.collections {
                if !profile.is_pinned(&collection.name) {
                    sections.push(render_section(collection, model));
                }
            }
        }
    }

    TabView {
        tab,
        sections,
        placeholder,
    }
}

fn render_section(collection: &Collection, model: &TableModel) -> TableSection {
    let sort = model.sort_spec(&collection.name);
    let columns: Vec<ColumnView> = collection
        .columns()
        .into_iter()
        .map(|name| ColumnView {
            version_accent: name == VERSION_COLUMN,
            sort: sort.filter(|s| s.field == name).map(|s| s.direction),
            name,
        })
        .collect();

    let rows = model
        .ordered_rows(collection)
        .into_iter()
        .map(|row| RowView {
            cells: columns
                .iter()
                .map(|column| CellView {
                    content: format_value(row.record.get(&column.name)),
                    version_accent: column.version_accent,
                })
                .collect(),
            selected: row.selected,
            related: row.related,
        })
        .collect();

    TableSection {
        collection: collection.name.clone(),
        title: format!("{} ({})", collection.name, collection.records.len()),
        columns,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, StoreMeta, Value};
    use crate::view::tabs::StoreProfile;
    use crate::view::tree::CellContent;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn snapshot(collections: Vec<Collection>) -> StoreSnapshot {
        StoreSnapshot::new(
            StoreMeta {
                name: "db".to_string(),
                version: 4,
            },
            collections,
        )
    }

    fn site_snapshot() -> StoreSnapshot {
        snapshot(vec![
            Collection::new("documents", vec![record(&[("id", num(31.0))])]),
            Collection::new("protocols", vec![record(&[("id", num(1.0))])]),
            Collection::new("addresses", vec![record(&[("id", num(11.0))])]),
            Collection::new("fibreOnLocations", vec![record(&[("id", num(21.0))])]),
            Collection::new("syncQueue", Vec::new()),
        ])
    }

    #[test]
    fn test_tab_partitioning() {
        let snap = site_snapshot();
        let model = TableModel::new(StoreProfile::default());

        let main = render_tab(&snap, &model, Tab::Main);
        let names: Vec<&str> = main
            .sections
            .iter()
            .map(|s| s.collection.as_str())
            .collect();
        assert_eq!(names, vec!["documents", "syncQueue"]);
        assert!(main.placeholder.is_none());

        let protocols = render_tab(&snap, &model, Tab::Protocols);
        assert_eq!(protocols.sections.len(), 1);
        assert_eq!(protocols.sections[0].title, "protocols (1)");

        let header = render_tab(&snap, &model, Tab::Header);
        let names: Vec<&str> = header
            .sections
            .iter()
            .map(|s| s.collection.as_str())
            .collect();
        assert_eq!(names, vec!["addresses", "fibreOnLocations"]);
    }

    #[test]
    fn test_header_tab_skips_absent_collections() {
        let snap = snapshot(vec![Collection::new(
            "addresses",
            vec![record(&[("id", num(1.0))])],
        )]);
        let model = TableModel::new(StoreProfile::default());
        let header = render_tab(&snap, &model, Tab::Header);
        assert_eq!(header.sections.len(), 1);
        assert_eq!(header.sections[0].collection, "addresses");
        assert!(header.placeholder.is_none());
    }

    #[test]
    fn test_protocols_placeholder_when_absent() {
        let snap = snapshot(vec![Collection::new("misc", Vec::new())]);
        let model = TableModel::new(StoreProfile::default());
        let tab = render_tab(&snap, &model, Tab::Protocols);
        assert!(tab.sections.is_empty());
        assert_eq!(
            tab.placeholder.as_deref(),
            Some("(No data for protocols)")
        );
    }

    #[test]
    fn test_section_columns_and_cells_follow_union() {
        let snap = snapshot(vec![Collection::new(
            "docs",
            vec![
                record(&[("id", num(1.0)), ("title", Value::String("a".into()))]),
                record(&[("id", num(2.0)), ("version", num(3.0))]),
            ],
        )]);
        let model = TableModel::new(StoreProfile::default());
        let tab = render_tab(&snap, &model, Tab::Main);
        let section = &tab.sections[0];

        let names: Vec<&str> = section.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "title", "version"]);
        assert!(section.columns[2].version_accent);
        assert!(!section.columns[0].version_accent);

        // Missing fields render as empty cells.
        assert_eq!(section.rows[0].cells[2].content, CellContent::Empty);
        assert_eq!(
            section.rows[1].cells[1].content,
            CellContent::Empty
        );
        assert_eq!(
            section.rows[1].cells[2].content,
            CellContent::Text("3".to_string())
        );
        assert!(section.rows[1].cells[2].version_accent);
    }

    #[test]
    fn test_sort_arrow_only_on_active_column() {
        let snap = snapshot(vec![Collection::new(
            "docs",
            vec![record(&[("id", num(2.0)), ("title", Value::Null)])],
        )]);
        let mut model = TableModel::new(StoreProfile::default());
        model.toggle_sort("docs", "id");
        model.toggle_sort("docs", "id");

        let tab = render_tab(&snap, &model, Tab::Main);
        let columns = &tab.sections[0].columns;
        assert_eq!(
            columns[0].sort,
            Some(crate::view::table::SortDirection::Desc)
        );
        assert_eq!(columns[1].sort, None);
    }

    #[test]
    fn test_missing_store_banner() {
        let state = ViewState::new("construction-documentation-ui-db", StoreProfile::default());
        let tree = render(&state);
        assert_eq!(
            tree.body,
            TreeBody::MissingStore {
                message: "No data for store construction-documentation-ui-db".to_string()
            }
        );
    }
}
