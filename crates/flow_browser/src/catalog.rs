use api_types::category::CategoryView;

use crate::{RemoteFailure, filter::CoarseType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryEntry {
    pub id: i64,
    pub name: String,
    pub coarse_type: CoarseType,
    /// `"<coarse type name> - <name>"`.
    pub display_label: String,
}

/// User-defined categories, grouped by coarse type.
#[derive(Debug, Default)]
pub struct CategoryCatalog {
    entries: Vec<CategoryEntry>,
}

impl CategoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the catalog with the outcome of a category load.
    ///
    /// A failed load leaves the catalog empty; filtering by category is then
    /// simply unavailable.
    pub fn load(&mut self, result: Result<Vec<CategoryView>, RemoteFailure>) {
        let views = match result {
            Ok(views) => views,
            Err(err) => {
                tracing::warn!("failed to load categories: {err}");
                self.entries.clear();
                return;
            }
        };

        let mut entries: Vec<CategoryEntry> = views
            .into_iter()
            .filter_map(|view| {
                let Some(coarse_type) = CoarseType::from_code(view.coarse_type) else {
                    tracing::warn!(
                        "skipping category {} with unknown type {}",
                        view.id,
                        view.coarse_type
                    );
                    return None;
                };
                Some(CategoryEntry {
                    display_label: format!("{} - {}", coarse_type.name(), view.name),
                    id: view.id,
                    name: view.name,
                    coarse_type,
                })
            })
            .collect();
        entries.sort_by_key(|entry| entry.coarse_type.code());

        tracing::debug!("loaded {} categories", entries.len());
        self.entries = entries;
    }

    #[must_use]
    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&CategoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry after `current` in catalog order, wrapping to `None` ("all")
    /// after the last one.
    #[must_use]
    pub fn next_after(&self, current: Option<i64>) -> Option<i64> {
        let position = current.and_then(|id| self.entries.iter().position(|e| e.id == id));
        match position {
            None => self.entries.first().map(|entry| entry.id),
            Some(idx) => self.entries.get(idx + 1).map(|entry| entry.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: i64, name: &str, coarse_type: u8) -> CategoryView {
        CategoryView {
            id,
            name: name.to_string(),
            coarse_type,
        }
    }

    #[test]
    fn entries_are_labelled_and_grouped_by_type() {
        let mut catalog = CategoryCatalog::new();
        catalog.load(Ok(vec![
            view(1, "Rent", 2),
            view(2, "Salary", 1),
            view(3, "Food", 2),
            view(4, "Bonus", 1),
        ]));

        let labels: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|e| e.display_label.as_str())
            .collect();
        assert_eq!(
            labels,
            [
                "Income - Salary",
                "Income - Bonus",
                "Expense - Rent",
                "Expense - Food"
            ]
        );
    }

    #[test]
    fn failed_load_leaves_catalog_empty() {
        let mut catalog = CategoryCatalog::new();
        catalog.load(Ok(vec![view(1, "Rent", 2)]));
        catalog.load(Err(RemoteFailure::Server("down".to_string())));
        assert!(catalog.is_empty());
        assert_eq!(catalog.next_after(None), None);
    }

    #[test]
    fn unknown_coarse_types_are_skipped() {
        let mut catalog = CategoryCatalog::new();
        catalog.load(Ok(vec![view(1, "Rent", 2), view(2, "Odd", 7)]));
        assert_eq!(catalog.entries().len(), 1);
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn next_after_cycles_through_all() {
        let mut catalog = CategoryCatalog::new();
        catalog.load(Ok(vec![view(1, "Rent", 2), view(2, "Salary", 1)]));
        assert_eq!(catalog.next_after(None), Some(2));
        assert_eq!(catalog.next_after(Some(2)), Some(1));
        assert_eq!(catalog.next_after(Some(1)), None);
        assert_eq!(catalog.next_after(Some(99)), Some(2));
    }
}
