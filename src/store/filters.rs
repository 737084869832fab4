use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SortMode {
    #[default]
    #[serde(rename = "relevant", alias = "relavent")]
    Relevant,
    #[serde(rename = "low-high")]
    LowHigh,
    #[serde(rename = "high-low")]
    HighLow,
}

/// Product browsing controls. Pure client state, never persisted.
///
/// Every change to the search text, the category selections or the sort mode
/// sends the listing back to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search: String,
    pub show_search: bool,
    pub show_filter: bool,
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub sort: SortMode,
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            show_search: false,
            show_filter: false,
            categories: Vec::new(),
            sub_categories: Vec::new(),
            sort: SortMode::Relevant,
            page: 1,
        }
    }
}

impl FilterState {
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_show_search(&mut self, show: bool) {
        self.show_search = show;
    }

    pub fn set_show_filter(&mut self, show: bool) {
        self.show_filter = show;
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
        self.page = 1;
    }

    pub fn toggle_sub_category(&mut self, sub_category: &str) {
        toggle(&mut self.sub_categories, sub_category);
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.page = 1;
    }

    /// Resets selections and sort. The search text is owned by the search bar
    /// and survives.
    pub fn clear_filters(&mut self) {
        self.categories.clear();
        self.sub_categories.clear();
        self.sort = SortMode::Relevant;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

fn toggle(selection: &mut Vec<String>, value: &str) {
    match selection.iter().position(|v| v == value) {
        Some(idx) => {
            selection.remove(idx);
        }
        None => selection.push(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_selection() {
        let mut filters = FilterState::default();
        filters.toggle_category("Men");
        filters.toggle_category("Women");
        assert_eq!(filters.categories, vec!["Men", "Women"]);
        filters.toggle_category("Men");
        assert_eq!(filters.categories, vec!["Women"]);
    }

    #[test]
    fn input_changes_reset_page() {
        let mut filters = FilterState::default();
        filters.set_page(4);
        filters.toggle_sub_category("Topwear");
        assert_eq!(filters.page, 1);

        filters.set_page(3);
        filters.set_sort(SortMode::HighLow);
        assert_eq!(filters.page, 1);

        filters.set_page(2);
        filters.set_search("shirt");
        assert_eq!(filters.page, 1);

        filters.set_page(0);
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn clear_keeps_search_text() {
        let mut filters = FilterState::default();
        filters.set_search("tee");
        filters.toggle_category("Kids");
        filters.set_sort(SortMode::LowHigh);
        filters.clear_filters();
        assert_eq!(filters.search, "tee");
        assert!(filters.categories.is_empty());
        assert_eq!(filters.sort, SortMode::Relevant);
    }

    #[test]
    fn sort_mode_wire_names() {
        assert_eq!(serde_json::to_string(&SortMode::LowHigh).unwrap(), "\"low-high\"");
        let legacy: SortMode = serde_json::from_str("\"relavent\"").unwrap();
        assert_eq!(legacy, SortMode::Relevant);
    }
}
