//! Filter, sort and paginate pipeline for the product grid.

use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use crate::{
    models::Product,
    store::filters::{FilterState, SortMode},
};

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const RELATED_LIMIT: usize = 5;

/// Pages shown verbatim before the window collapses with ellipses.
const FULL_WINDOW: usize = 5;

/// One slot of the page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(n) => serializer.serialize_u64(*n as u64),
            PageMarker::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    /// Page numbers interleaved with `"..."` gaps.
    #[schema(value_type = Vec<Object>)]
    pub window: Vec<PageMarker>,
}

/// Applies search, category and sub-category filters, then the sort mode.
/// `Relevant` keeps catalog order and the price sorts are stable.
pub fn filter_products<'a>(products: &'a [Product], filters: &FilterState) -> Vec<&'a Product> {
    let needle = filters.search.to_lowercase();
    let mut matched: Vec<&Product> = products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .filter(|p| filters.categories.is_empty() || filters.categories.contains(&p.category))
        .filter(|p| {
            filters.sub_categories.is_empty() || filters.sub_categories.contains(&p.sub_category)
        })
        .collect();

    match filters.sort {
        SortMode::Relevant => {}
        SortMode::LowHigh => matched.sort_by_key(|p| p.price),
        SortMode::HighLow => matched.sort_by(|a, b| b.price.cmp(&a.price)),
    }
    matched
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Cuts one page out of `items`, clamping `page` into the valid range.
pub fn paginate(items: Vec<&Product>, page: usize, page_size: usize) -> ProductPage {
    let per_page = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, per_page);
    let page = page.clamp(1, total_pages.max(1));

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    ProductPage {
        items,
        page,
        per_page,
        total_items,
        total_pages,
        window: page_window(page, total_pages),
    }
}

/// Page selector contents.
///
/// Up to five pages are listed in full. Past that the first and last pages are
/// always shown; near either end five consecutive pages are kept, otherwise the
/// current page and its two neighbours, with `Ellipsis` standing in for every
/// skipped run.
pub fn page_window(current: usize, total: usize) -> Vec<PageMarker> {
    if total <= FULL_WINDOW {
        return (1..=total).map(PageMarker::Page).collect();
    }
    let current = current.clamp(1, total);

    let (start, end) = if current <= 3 {
        (1, FULL_WINDOW)
    } else if current >= total - 2 {
        (total + 1 - FULL_WINDOW, total)
    } else {
        (current - 1, current + 1)
    };

    let mut window = Vec::with_capacity(FULL_WINDOW + 4);
    if start > 1 {
        window.push(PageMarker::Page(1));
        if start > 2 {
            window.push(PageMarker::Ellipsis);
        }
    }
    window.extend((start..=end).map(PageMarker::Page));
    if end < total {
        if end < total - 1 {
            window.push(PageMarker::Ellipsis);
        }
        window.push(PageMarker::Page(total));
    }
    window
}

/// Products sharing both category and sub-category with `current`, in catalog
/// order, excluding `current` itself.
pub fn related_products<'a>(products: &'a [Product], current: &Product) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| {
            p.id != current.id
                && p.category == current.category
                && p.sub_category == current.sub_category
        })
        .take(RELATED_LIMIT)
        .collect()
}
