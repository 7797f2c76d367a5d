/// Offset window into a tool's history, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Page numbers are 1-based; 0 is treated as the first page.
    pub fn for_page(page_size: usize, page_number: usize) -> Self {
        Self::new(page_size, (page_number.max(1) - 1).saturating_mul(page_size))
    }

    pub fn capped(self, max: usize) -> Self {
        Self::new(self.limit.min(max), self.offset)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

/// One page of history plus the number of events across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Slices an already ordered result set.
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .collect();
        Self::new(items, total, request)
    }

    pub fn has_more(&self) -> bool {
        self.request.offset.saturating_add(self.items.len()) < self.total
    }

    pub fn page_number(&self) -> usize {
        match self.request.limit {
            0 => 1,
            limit => self.request.offset / limit + 1,
        }
    }

    pub fn total_pages(&self) -> usize {
        match self.request.limit {
            0 => 1,
            limit => self.total.div_ceil(limit),
        }
    }
}
