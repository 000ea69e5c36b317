use serde::Deserialize;

/// Items per page for every advert listing.
pub const PAGE_SIZE: usize = 25;

/// A zero-based page and whether the client wants every page up to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: usize,
    #[serde(rename = "refresh")]
    pub force_refresh: bool,
}

impl PageRequest {
    pub fn page(page: usize) -> Self {
        Self {
            page,
            force_refresh: false,
        }
    }

    pub fn refresh_through(page: usize) -> Self {
        Self {
            page,
            force_refresh: true,
        }
    }

    fn start(&self) -> usize {
        self.page.saturating_mul(PAGE_SIZE)
    }

    fn end(&self) -> usize {
        self.start().saturating_add(PAGE_SIZE)
    }
}

/// Cut one page out of an already filtered and sorted sequence.
///
/// Normal mode yields `[page * size, page * size + size)`. Refresh mode
/// yields everything from the start through the end of the requested page.
/// Windows past the end are truncated, possibly to nothing.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Vec<T> {
    let skip = if request.force_refresh {
        0
    } else {
        request.start()
    };

    items
        .into_iter()
        .take(request.end())
        .skip(skip)
        .collect()
}
