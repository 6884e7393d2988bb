use serde::{Deserialize, Serialize};

/// Number of pages needed for `total_items`.
///
/// An empty result still occupies one (empty) page, so this never returns 0.
/// A zero `page_size` is treated as 1.
#[must_use]
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    total_items.div_ceil(size).max(1)
}

/// Pull `page` back into `[1, max(1, total_pages)]`.
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.max(1).min(total_pages.max(1))
}

/// Pagination summary for one page of a result set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    /// 1-based position of the first item on the page, 0 when the page is empty.
    pub start_item: usize,
    /// 1-based position of the last item on the page, 0 when the page is empty.
    pub end_item: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    /// Compute the summary for `current_page`. The page is taken as given;
    /// callers clamp it first if it may point past the end.
    pub fn compute(total_items: usize, page_size: usize, current_page: usize) -> Self {
        let page_size = page_size.max(1);
        let current_page = current_page.max(1);
        let total_pages = total_pages(total_items, page_size);
        let start_item = if total_items > 0 {
            ((current_page - 1) * page_size + 1).min(total_items + 1)
        } else {
            0
        };
        let end_item = (current_page * page_size).min(total_items);

        Self {
            current_page,
            total_pages,
            total_items,
            page_size,
            start_item,
            end_item,
            has_next: current_page < total_pages,
            has_prev: current_page > 1,
        }
    }

    /// Half-open index range of this page within the full result.
    pub fn slice_bounds(&self) -> std::ops::Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// Create an empty first page with the given size
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo::compute(0, page_size, 1),
        }
    }

    /// Cut the page described by `page_info` out of `all`.
    pub fn from_slice(all: &[T], page_info: PageInfo) -> Self
    where
        T: Clone,
    {
        let items = all[page_info.slice_bounds()].to_vec();
        Self { items, page_info }
    }

    /// Map items while preserving page_info
    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(&mut f).collect(),
            page_info: self.page_info,
        }
    }
}
