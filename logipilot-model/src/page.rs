use serde::{Deserialize, Serialize};

/// Page size used when a caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Which page of a collection to fetch. Pages are 1-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Clamps degenerate inputs instead of failing: page and page_size are
    /// both floored at 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        PageRequest {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first(page_size: u32) -> Self {
        PageRequest::new(1, page_size)
    }

    /// Zero-based offset of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }
}

/// Shape of one fetched page.
///
/// A `PageInfo` describes exactly one response; consumers replace their held
/// copy wholesale on every fetch and never merge two of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    /// Derivable from `total_items` and `page_size`; servers may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl PageInfo {
    /// Describes the page `request` would slice out of a collection of
    /// `total_items`.
    pub fn for_total(request: PageRequest, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            total_items.div_ceil(request.page_size as u64) as u32
        };
        PageInfo {
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages: Some(total_pages),
        }
    }

    /// Number of pages, computing it when the server omitted the field.
    pub fn page_count(&self) -> u32 {
        match self.total_pages {
            Some(pages) => pages,
            None if self.total_items == 0 => 0,
            None => {
                self.total_items.div_ceil(self.page_size.max(1) as u64) as u32
            }
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }
}

/// One fetched page of items together with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Page {
            items: Vec::new(),
            info: PageInfo::for_total(PageRequest::default(), 0),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
