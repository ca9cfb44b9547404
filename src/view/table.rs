//! Table model: per-collection sort state, selection, relation highlighting.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Collection, Record, Value};

use super::tabs::StoreProfile;

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header marker, matching the usual spreadsheet arrows.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Active sort of one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// The single global selection.
///
/// `row_index` is the post-sort view index the user acted on. It is not
/// revalidated when the underlying rows change, so after a refresh the
/// highlighted slot may hold a different record than the one selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub collection: String,
    pub row_index: usize,
    pub relation_value: Option<Value>,
}

/// One row of `ordered_rows` output.
pub struct OrderedRow<'a> {
    pub record: &'a Record,
    /// Index of the record in the unsorted snapshot order.
    pub source_index: usize,
    /// This exact collection + view index is selected.
    pub selected: bool,
    /// Carries the relation field with the selected relation value, and is
    /// not the selected row itself.
    pub related: bool,
}

/// Owns sort and selection state across polls.
///
/// Sort states of different collections are independent; there is at most
/// one selection in the whole view.
pub struct TableModel {
    profile: StoreProfile,
    sort: HashMap<String, SortSpec>,
    selection: Option<Selection>,
}

impl TableModel {
    pub fn new(profile: StoreProfile) -> Self {
        Self {
            profile,
            sort: HashMap::new(),
            selection: None,
        }
    }

    pub fn profile(&self) -> &StoreProfile {
        &self.profile
    }

    pub fn sort_spec(&self, collection: &str) -> Option<&SortSpec> {
        self.sort.get(collection)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Header click: the same field flips direction, a different field
    /// starts over ascending.
    pub fn toggle_sort(&mut self, collection: &str, field: &str) {
        match self.sort.get_mut(collection) {
            Some(spec) if spec.field == field => {
                spec.direction = spec.direction.flipped();
            }
            _ => {
                self.sort.insert(
                    collection.to_string(),
                    SortSpec {
                        field: field.to_string(),
                        direction: SortDirection::Asc,
                    },
                );
            }
        }
    }

    /// Row click: records the post-sort row at `view_index` and derives the
    /// relation value from it. Out-of-range indices clear nothing and are
    /// ignored.
    pub fn select(&mut self, collection: &Collection, view_index: usize) {
        let order = self.sorted_order(collection);
        let Some(&source_index) = order.get(view_index) else {
            return;
        };
        let row = &collection.records[source_index];
        let relation_value = self.relation_value_of(&collection.name, row);
        self.selection = Some(Selection {
            collection: collection.name.clone(),
            row_index: view_index,
            relation_value,
        });
    }

    /// The relation value a selection of `row` would carry: the row's
    /// relation field, else its identity field when the row lives in the
    /// parent collection, else nothing. A present-but-null value counts as
    /// no value, so null never correlates unlinked rows with each other.
    fn relation_value_of(&self, collection: &str, row: &Record) -> Option<Value> {
        if let Some(value) = row.get(&self.profile.relation_field) {
            return Some(value.clone()).filter(|v| !v.is_null());
        }
        if collection == self.profile.parent_collection {
            return row
                .get(&self.profile.parent_id_field)
                .filter(|v| !v.is_null())
                .cloned();
        }
        None
    }

    /// The collection's rows in view order, annotated for highlighting.
    pub fn ordered_rows<'a>(&self, collection: &'a Collection) -> Vec<OrderedRow<'a>> {
        let relation_value = self
            .selection
            .as_ref()
            .and_then(|s| s.relation_value.as_ref());

        self.sorted_order(collection)
            .into_iter()
            .enumerate()
            .map(|(view_index, source_index)| {
                let record = &collection.records[source_index];
                let selected = self.selection.as_ref().is_some_and(|s| {
                    s.collection == collection.name && s.row_index == view_index
                });
                let related = !selected
                    && relation_value
                        .is_some_and(|v| record.get(&self.profile.relation_field) == Some(v));
                OrderedRow {
                    record,
                    source_index,
                    selected,
                    related,
                }
            })
            .collect()
    }

    /// Source indices in view order. Without a sort this is snapshot order;
    /// with one it is a stable sort on the sort field, so equal keys keep
    /// their snapshot order in both directions.
    fn sorted_order(&self, collection: &Collection) -> Vec<usize> {
        let mut order: Vec<usize> = (0..collection.records.len()).collect();
        if let Some(spec) = self.sort.get(&collection.name) {
            order.sort_by(|&a, &b| {
                let cmp = compare_values(
                    collection.records[a].get(&spec.field),
                    collection.records[b].get(&spec.field),
                );
                match spec.direction {
                    SortDirection::Asc => cmp,
                    SortDirection::Desc => cmp.reverse(),
                }
            });
        }
        order
    }
}

/// Total order over optional values.
///
/// Missing fields sort after everything, nulls after that comparison but
/// before genuine values. Numbers compare numerically, strings by collation,
/// and any mixed pairing falls back to collating both display strings.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Null), Some(Value::Null)) => Ordering::Equal,
        (Some(Value::Null), Some(_)) => Ordering::Greater,
        (Some(_), Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => collate(x, y),
        (Some(x), Some(y)) => collate(&x.display_string(), &y.display_string()),
    }
}

/// Case-insensitive comparison with a raw tie-break, standing in for
/// locale-aware collation.
fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}
