use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use tracing::{trace, warn};

use super::{Loader, Saver};
use crate::config::{Configurable, PersistenceConfig, DEFAULT_MAX_PAGE_SIZE};
use crate::identity::{self, FieldMap, Identifiable};
use crate::query::{sort_by_less, DataPage, Filter, PagingParams, ProjectFn, SelectFn, SortFn};
use crate::{PersistenceError, Result};

/// In-memory store of identifiable records.
///
/// Reads take the shared lock, mutations take the exclusive lock. After a
/// mutation the exclusive lock is released and the collection is handed to
/// the saver under the shared lock, so readers are not blocked by I/O.
/// Consequences of that split:
///
/// - a reader can observe a mutation before it has been saved;
/// - the saves of two concurrent mutations may run in either order, so the
///   saved data reflects some completed mutation, not necessarily the last
///   caller's;
/// - a failed save does not roll back the in-memory mutation.
///
/// Every read returns clones and every write stores a clone of the caller's
/// value, so callers never alias stored records. Clones share all state,
/// including configuration.
#[derive(Clone)]
pub struct MemoryPersistence<T> {
    items: Arc<RwLock<Vec<T>>>,
    loader: Option<Arc<dyn Loader<T>>>,
    saver: Option<Arc<dyn Saver<T>>>,
    opened: Arc<AtomicBool>,
    max_page_size: Arc<AtomicUsize>,
}

impl<T: Identifiable> Default for MemoryPersistence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identifiable> MemoryPersistence<T> {
    /// Create a purely in-memory store.
    pub fn new() -> Self {
        Self::with_loader_saver(None, None)
    }

    /// Create a store that loads from and saves to the same persister.
    pub fn with_persister<P>(persister: Arc<P>) -> Self
    where
        P: Loader<T> + Saver<T> + 'static,
    {
        let loader: Arc<dyn Loader<T>> = persister.clone();
        let saver: Arc<dyn Saver<T>> = persister;
        Self::with_loader_saver(Some(loader), Some(saver))
    }

    pub fn with_loader_saver(
        loader: Option<Arc<dyn Loader<T>>>,
        saver: Option<Arc<dyn Saver<T>>>,
    ) -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            loader,
            saver,
            opened: Arc::new(AtomicBool::new(false)),
            max_page_size: Arc::new(AtomicUsize::new(DEFAULT_MAX_PAGE_SIZE)),
        }
    }

    pub fn with_max_page_size(self, max_page_size: usize) -> Self {
        self.max_page_size.store(max_page_size, Ordering::Release);
        self
    }

    /// Shared by every clone of this store.
    pub fn max_page_size(&self) -> usize {
        self.max_page_size.load(Ordering::Acquire)
    }

    fn read_items(&self) -> Result<RwLockReadGuard<'_, Vec<T>>> {
        self.items
            .read()
            .map_err(|_| PersistenceError::LockPoisoned("read"))
    }

    fn write_items(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>> {
        self.items
            .write()
            .map_err(|_| PersistenceError::LockPoisoned("write"))
    }

    // ----- lifecycle -----

    pub fn is_open(&self) -> bool {
        self.opened.load(Ordering::Acquire)
    }

    /// Loads the collection through the loader and marks the store open.
    /// On failure the store stays closed. Opening an open store reloads it.
    pub fn open(&self, correlation_id: &str) -> Result<()> {
        self.load(correlation_id)?;
        self.opened.store(true, Ordering::Release);
        Ok(())
    }

    /// Saves the collection and marks the store closed, even if the save fails.
    pub fn close(&self, correlation_id: &str) -> Result<()> {
        let result = self.save(correlation_id);
        self.opened.store(false, Ordering::Release);
        result
    }

    /// Replaces the collection with whatever the loader returns.
    pub fn load(&self, correlation_id: &str) -> Result<()> {
        let Some(loader) = &self.loader else {
            return Ok(());
        };

        let mut items = self.write_items()?;
        if let Some(loaded) = loader.load(correlation_id)? {
            *items = loaded;
            trace!(correlation_id, "Loaded {} items", items.len());
        }
        Ok(())
    }

    /// Hands the full collection to the saver, if one is configured.
    pub fn save(&self, correlation_id: &str) -> Result<()> {
        let Some(saver) = &self.saver else {
            return Ok(());
        };

        let items = self.read_items()?;
        match saver.save(correlation_id, &items) {
            Ok(()) => {
                trace!(correlation_id, "Saved {} items", items.len());
                Ok(())
            }
            Err(err) => {
                warn!(correlation_id, error = %err, "Failed to save {} items", items.len());
                Err(err)
            }
        }
    }

    /// Empties the collection and saves the empty result.
    pub fn clear(&self, correlation_id: &str) -> Result<()> {
        self.write_items()?.clear();
        trace!(correlation_id, "Cleared items");
        self.save(correlation_id)
    }

    /// Clones of every stored record in insertion order.
    pub fn items_snapshot(&self) -> Result<Vec<T>> {
        Ok(self.read_items()?.iter().map(identity::deep_copy).collect())
    }

    // ----- queries -----

    fn filtered<'a>(items: &'a [T], filter: Option<Filter<'_, T>>) -> Vec<&'a T> {
        match filter {
            Some(filter) => items.iter().filter(|&item| filter(item)).collect(),
            None => items.iter().collect(),
        }
    }

    fn sorted<'a>(mut matches: Vec<&'a T>, sort: Option<SortFn<'_, T>>) -> Vec<&'a T> {
        if let Some(less) = sort {
            sort_by_less(&mut matches, |a, b| less(*a, *b));
        }
        matches
    }

    fn select_or_keep(item: T, select: Option<SelectFn<'_, T>>) -> T {
        match select {
            Some(select) => select(item),
            None => item,
        }
    }

    fn index_of(items: &[T], id: &T::Key) -> Option<usize> {
        items.iter().position(|item| identity::has_id(item, id))
    }

    /// Gets a page of records matching `filter`, ordered by `sort` and
    /// transformed by `select`.
    ///
    /// `total` is counted after filtering and before the window is applied.
    /// A missing `skip` starts at the first match; a missing `take` returns
    /// up to the max page size.
    pub fn get_page_by_filter(
        &self,
        correlation_id: &str,
        filter: Option<Filter<'_, T>>,
        paging: Option<PagingParams>,
        sort: Option<SortFn<'_, T>>,
        select: Option<SelectFn<'_, T>>,
    ) -> Result<DataPage<T>> {
        self.get_page_by_filter_as(correlation_id, filter, paging, sort, &|item: T| {
            Self::select_or_keep(item, select)
        })
    }

    /// Like [`get_page_by_filter`](Self::get_page_by_filter), projecting each
    /// record of the window onto another type.
    pub fn get_page_by_filter_as<U>(
        &self,
        correlation_id: &str,
        filter: Option<Filter<'_, T>>,
        paging: Option<PagingParams>,
        sort: Option<SortFn<'_, T>>,
        project: ProjectFn<'_, T, U>,
    ) -> Result<DataPage<U>> {
        let items = self.read_items()?;
        let matches = Self::sorted(Self::filtered(&items, filter), sort);

        let paging = paging.unwrap_or_default();
        let total = paging.total.then_some(matches.len());
        let data: Vec<U> = matches
            .into_iter()
            .skip(paging.effective_skip())
            .take(paging.effective_take(self.max_page_size()))
            .map(|item| project(identity::deep_copy(item)))
            .collect();

        trace!(correlation_id, "Retrieved {} items", data.len());
        Ok(DataPage::new(total, data))
    }

    /// Gets every record matching `filter`, without paging.
    pub fn get_list_by_filter(
        &self,
        correlation_id: &str,
        filter: Option<Filter<'_, T>>,
        sort: Option<SortFn<'_, T>>,
        select: Option<SelectFn<'_, T>>,
    ) -> Result<Vec<T>> {
        self.get_list_by_filter_as(correlation_id, filter, sort, &|item: T| {
            Self::select_or_keep(item, select)
        })
    }

    /// Like [`get_list_by_filter`](Self::get_list_by_filter), projecting each
    /// record onto another type.
    pub fn get_list_by_filter_as<U>(
        &self,
        correlation_id: &str,
        filter: Option<Filter<'_, T>>,
        sort: Option<SortFn<'_, T>>,
        project: ProjectFn<'_, T, U>,
    ) -> Result<Vec<U>> {
        let items = self.read_items()?;
        let results: Vec<U> = Self::sorted(Self::filtered(&items, filter), sort)
            .into_iter()
            .map(|item| project(identity::deep_copy(item)))
            .collect();

        trace!(correlation_id, "Retrieved {} items", results.len());
        Ok(results)
    }

    /// Counts the records matching `filter`.
    pub fn get_count_by_filter(
        &self,
        correlation_id: &str,
        filter: Option<Filter<'_, T>>,
    ) -> Result<usize> {
        let items = self.read_items()?;
        let count = match filter {
            Some(filter) => items.iter().filter(|&item| filter(item)).count(),
            None => items.len(),
        };

        trace!(correlation_id, "Counted {} items", count);
        Ok(count)
    }

    /// Gets the records whose id is in `ids`, in collection order.
    pub fn get_list_by_ids(&self, correlation_id: &str, ids: &[T::Key]) -> Result<Vec<T>> {
        let filter = |item: &T| item.id().is_some_and(|id| ids.contains(&id));
        self.get_list_by_filter(correlation_id, Some(&filter), None, None)
    }

    /// Picks one record matching `filter` uniformly at random.
    pub fn get_one_random(
        &self,
        correlation_id: &str,
        filter: Option<Filter<'_, T>>,
    ) -> Result<Option<T>> {
        let items = self.read_items()?;
        let matches = Self::filtered(&items, filter);

        if matches.is_empty() {
            trace!(correlation_id, "Nothing to return as random item");
            return Ok(None);
        }

        let mut rng = rand::rng();
        let item = identity::deep_copy(matches[rng.random_range(0..matches.len())]);
        trace!(correlation_id, "Retrieved a random item");
        Ok(Some(item))
    }

    /// Gets a record by id.
    pub fn get_one_by_id(&self, correlation_id: &str, id: &T::Key) -> Result<Option<T>> {
        let items = self.read_items()?;
        let item = items
            .iter()
            .find(|item| identity::has_id(*item, id))
            .map(identity::deep_copy);

        match &item {
            Some(_) => trace!(correlation_id, "Retrieved item {}", id),
            None => trace!(correlation_id, "Cannot find item by {}", id),
        }
        Ok(item)
    }

    // ----- mutations -----

    /// Stores a new record, generating its id when empty.
    ///
    /// Fails with [`PersistenceError::MissingId`] when the record has no
    /// identity field and [`PersistenceError::DuplicateId`] when its id is
    /// already stored.
    pub fn create(&self, correlation_id: &str, item: &T) -> Result<T> {
        let item = identity::generate_id_if_empty(identity::deep_copy(item))?;
        let id = item.id().ok_or(PersistenceError::MissingId)?;

        {
            let mut items = self.write_items()?;
            if Self::index_of(&items, &id).is_some() {
                return Err(PersistenceError::DuplicateId { id: id.to_string() });
            }
            items.push(identity::deep_copy(&item));
        }

        trace!(correlation_id, "Created item {}", id);
        self.save(correlation_id)?;
        Ok(item)
    }

    /// Replaces the record with the same id, or stores it when absent.
    pub fn set(&self, correlation_id: &str, item: &T) -> Result<T> {
        let item = identity::generate_id_if_empty(identity::deep_copy(item))?;
        let id = item.id().ok_or(PersistenceError::MissingId)?;

        {
            let mut items = self.write_items()?;
            match Self::index_of(&items, &id) {
                Some(index) => items[index] = identity::deep_copy(&item),
                None => items.push(identity::deep_copy(&item)),
            }
        }

        trace!(correlation_id, "Set item {}", id);
        self.save(correlation_id)?;
        Ok(item)
    }

    /// Replaces the stored record with the same id. Returns `None` and saves
    /// nothing when no such record exists.
    pub fn update(&self, correlation_id: &str, item: &T) -> Result<Option<T>> {
        let Some(id) = item.id() else {
            trace!(correlation_id, "Item without id was not found");
            return Ok(None);
        };

        {
            let mut items = self.write_items()?;
            let Some(index) = Self::index_of(&items, &id) else {
                trace!(correlation_id, "Item {} was not found", id);
                return Ok(None);
            };
            items[index] = identity::deep_copy(item);
        }

        trace!(correlation_id, "Updated item {}", id);
        self.save(correlation_id)?;
        Ok(Some(identity::deep_copy(item)))
    }

    /// Merges `fields` into the stored record with the given id.
    ///
    /// The identity itself is kept even if `fields` names it. Returns `None`
    /// and saves nothing when no such record exists.
    pub fn update_partially(
        &self,
        correlation_id: &str,
        id: &T::Key,
        fields: &FieldMap,
    ) -> Result<Option<T>> {
        let updated = {
            let mut items = self.write_items()?;
            let Some(index) = Self::index_of(&items, id) else {
                trace!(correlation_id, "Item {} was not found", id);
                return Ok(None);
            };

            let mut updated = identity::deep_copy(&items[index]);
            updated.apply_fields(fields)?;
            updated.set_id(id.clone());
            items[index] = identity::deep_copy(&updated);
            updated
        };

        trace!(correlation_id, "Partially updated item {}", id);
        self.save(correlation_id)?;
        Ok(Some(updated))
    }

    /// Removes the record with the given id and returns it.
    pub fn delete_by_id(&self, correlation_id: &str, id: &T::Key) -> Result<Option<T>> {
        let removed = {
            let mut items = self.write_items()?;
            let Some(index) = Self::index_of(&items, id) else {
                trace!(correlation_id, "Item {} was not found", id);
                return Ok(None);
            };
            items.remove(index)
        };

        trace!(correlation_id, "Deleted item by {}", id);
        self.save(correlation_id)?;
        Ok(Some(removed))
    }

    /// Removes every record matching `filter`. Saves once, and only if
    /// something was removed.
    pub fn delete_by_filter(&self, correlation_id: &str, filter: Filter<'_, T>) -> Result<()> {
        let deleted = {
            let mut items = self.write_items()?;
            let before = items.len();
            items.retain(|item| !filter(item));
            before - items.len()
        };

        if deleted == 0 {
            trace!(correlation_id, "Deleted 0 items");
            return Ok(());
        }

        trace!(correlation_id, "Deleted {} items", deleted);
        self.save(correlation_id)
    }

    /// Removes every record whose id is in `ids`.
    pub fn delete_by_ids(&self, correlation_id: &str, ids: &[T::Key]) -> Result<()> {
        let filter = |item: &T| item.id().is_some_and(|id| ids.contains(&id));
        self.delete_by_filter(correlation_id, &filter)
    }
}

impl<T> Configurable for MemoryPersistence<T> {
    fn configure(&mut self, config: &PersistenceConfig) {
        if let Some(max_page_size) = config.options.max_page_size {
            self.max_page_size.store(max_page_size, Ordering::Release);
        }
    }
}
