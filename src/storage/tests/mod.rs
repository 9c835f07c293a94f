//! Unit tests for storage domain types, adapters, and services.


use crate::database::PgPool;
use crate::storage::domain::{Item, ItemValue};
use diesel::r2d2::{ConnectionManager, Pool};

/// Builds an item with a single `name` column.
pub(super) fn named(name: &str) -> Item {
    Item::from([("name".to_owned(), ItemValue::from(name))])
}

/// Extracts the `name` column of each item.
pub(super) fn names(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.get("name").and_then(ItemValue::as_text))
        .map(str::to_owned)
        .collect()
}

/// Pool that never opens a connection unless one is requested.
pub(super) fn lazy_pool() -> PgPool {
    Pool::builder()
        .min_idle(Some(0))
        .build_unchecked(ConnectionManager::new("postgres://localhost/unused"))
}
