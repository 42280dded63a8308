//! Query primitives - filter, paging window, sort comparator and projection.

mod sorter;

use serde::{Deserialize, Serialize};

pub use sorter::sort_by_less;

/// Predicate selecting records; `None` matches everything.
pub type Filter<'a, T> = &'a dyn Fn(&T) -> bool;

/// Strict less-than relation over two records; `None` keeps filtered order.
pub type SortFn<'a, T> = &'a dyn Fn(&T, &T) -> bool;

/// Projection applied to every record of the final result.
pub type SelectFn<'a, T> = &'a dyn Fn(T) -> T;

/// Projection of a record onto another shape, such as a summary struct.
pub type ProjectFn<'a, T, U> = &'a dyn Fn(T) -> U;

/// Paging window over a query result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingParams {
    /// Number of records to skip; `None` starts at the beginning.
    #[serde(default)]
    pub skip: Option<usize>,
    /// Maximum number of records to return; `None` uses the store's max page size.
    #[serde(default)]
    pub take: Option<usize>,
    /// Whether the page should carry the total number of matches.
    #[serde(default)]
    pub total: bool,
}

impl PagingParams {
    pub fn new(skip: Option<usize>, take: Option<usize>, total: bool) -> Self {
        Self { skip, take, total }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn effective_skip(&self) -> usize {
        self.skip.unwrap_or(0)
    }

    /// Requested take, capped at `max_page_size`.
    pub fn effective_take(&self, max_page_size: usize) -> usize {
        self.take
            .map_or(max_page_size, |take| take.min(max_page_size))
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPage<T> {
    /// Count of all matches before windowing, when requested.
    pub total: Option<usize>,
    pub data: Vec<T>,
}

impl<T> DataPage<T> {
    pub fn new(total: Option<usize>, data: Vec<T>) -> Self {
        Self { total, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
