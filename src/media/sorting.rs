use std::cmp::Ordering;

use crate::datastore::{SortBy, SortOrder};

/// Keys a library item can be ordered by.
pub trait Sortable {
    /// Case-folded display title.
    fn sort_title(&self) -> String;
    fn sort_duration(&self) -> i64;
    fn sort_path(&self) -> &str;
    fn sort_size(&self) -> i64;
}

pub fn compare<T: Sortable>(a: &T, b: &T, sort_by: SortBy) -> Ordering {
    let primary = match sort_by {
        SortBy::Title => a.sort_title().cmp(&b.sort_title()),
        SortBy::Length => a.sort_duration().cmp(&b.sort_duration()),
        SortBy::Path => a.sort_path().cmp(b.sort_path()),
        SortBy::Size => a.sort_size().cmp(&b.sort_size()),
    };
    // Path breaks ties so equal keys still order deterministically
    primary.then_with(|| a.sort_path().cmp(b.sort_path()))
}

pub fn sort_items<T: Sortable>(items: &mut [T], sort_by: SortBy, sort_order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by);
        match sort_order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}
