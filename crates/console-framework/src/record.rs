//! # Records
//!
//! The console never looks inside the entities it lists. A [`Record`] only has to
//! expose its identifier, which is used to key table rows and to remember which row
//! the modal is editing. Domain crates define one struct per entity and implement
//! this trait at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// An entity instance owned by the backend; the console only holds copies.
pub trait Record: Clone + Send + Sync + Debug + 'static {
    /// The backend identifier.
    type Id: Clone + Eq + Ord + Hash + Display + Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

/// The bare name of `T` for log fields: `loader::ResourceLoader<app::HouseholdId>`
/// becomes `ResourceLoader`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let outer = full.split('<').next().unwrap_or(full);
    outer.rsplit("::").next().unwrap_or(outer)
}

/// A page of results as returned by paginated list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: usize,
    pub size: usize,
    pub total_elements: usize,
}

/// Everything a fetch operation is allowed to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Many(Vec<T>),
    One(T),
    Page(Page<T>),
    Nothing,
}

/// How a single, non-sequence result is normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SingleRecordPolicy {
    /// Present it as a one-row list.
    #[default]
    Wrap,
    /// Treat it as no rows.
    Discard,
}

impl<T> Fetched<T> {
    /// Turns any result shape into table rows.
    pub fn normalize(self, policy: SingleRecordPolicy) -> Vec<T> {
        match self {
            Fetched::Many(items) => items,
            Fetched::Page(page) => page.content,
            Fetched::One(item) => match policy {
                SingleRecordPolicy::Wrap => vec![item],
                SingleRecordPolicy::Discard => Vec::new(),
            },
            Fetched::Nothing => Vec::new(),
        }
    }
}

impl<T> From<Vec<T>> for Fetched<T> {
    fn from(items: Vec<T>) -> Self {
        Fetched::Many(items)
    }
}

impl<T> From<Page<T>> for Fetched<T> {
    fn from(page: Page<T>) -> Self {
        Fetched::Page(page)
    }
}

impl<T> From<Option<T>> for Fetched<T> {
    fn from(item: Option<T>) -> Self {
        item.map_or(Fetched::Nothing, Fetched::One)
    }
}
