use serde::Serialize;
use std::collections::BTreeSet;

use super::filter::{apply_filters, FilterSet};
use super::sort::{apply_sort, ColumnSort, SortColumn, SortKey};
use crate::models::Clip;

#[derive(Debug, Clone)]
pub enum LibraryAction {
    Loaded(Vec<Clip>),
    LoadFailed(String),
    SetFilters(FilterSet),
    SetSearch(Option<String>),
    SetSort(SortKey),
    ClickColumn(SortColumn),
}

/// Full clip list plus the derived visible list. Every action recomputes the
/// visible list from scratch: filter first, then sort.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryState {
    all: Vec<Clip>,
    visible: Vec<Clip>,
    filters: FilterSet,
    sort: SortKey,
    column_sort: ColumnSort,
    load_error: Option<String>,
}

impl LibraryState {
    pub fn new(sort: SortKey) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn reduce(mut self, action: LibraryAction) -> Self {
        match action {
            LibraryAction::Loaded(clips) => {
                self.all = clips;
                self.load_error = None;
            }
            LibraryAction::LoadFailed(message) => {
                self.all.clear();
                self.load_error = Some(message);
            }
            LibraryAction::SetFilters(filters) => {
                self.filters = filters;
            }
            LibraryAction::SetSearch(search) => {
                self.filters.search = search;
            }
            LibraryAction::SetSort(key) => {
                self.sort = key;
                self.column_sort = match key {
                    SortKey::Column(column, direction) => ColumnSort {
                        column: Some(column),
                        direction,
                    },
                    _ => ColumnSort::default(),
                };
            }
            LibraryAction::ClickColumn(column) => {
                self.column_sort = self.column_sort.click(column);
                if let Some(key) = self.column_sort.key() {
                    self.sort = key;
                }
            }
        }

        self.recompute();
        self
    }

    fn recompute(&mut self) {
        let filtered = apply_filters(&self.all, &self.filters);
        self.visible = apply_sort(&filtered, self.sort);
    }

    pub fn all(&self) -> &[Clip] {
        &self.all
    }

    pub fn visible(&self) -> &[Clip] {
        &self.visible
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn column_sort(&self) -> ColumnSort {
        self.column_sort
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn find(&self, vid: &str) -> Option<&Clip> {
        self.all.iter().find(|clip| clip.vid == vid)
    }

    pub fn contains(&self, vid: &str) -> bool {
        self.find(vid).is_some()
    }

    pub fn object_classes(&self) -> Vec<String> {
        object_classes(&self.all)
    }
}

/// Every object class seen across `clips`, sorted and de-duplicated.
pub fn object_classes(clips: &[Clip]) -> Vec<String> {
    clips
        .iter()
        .flat_map(|clip| clip.objects.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
