//! Previous/next links between pages.
//!
//! Collection order is the only adjacency relation: entries carry no
//! next/previous pointers of their own. Drafts take part in pagination like
//! any other entry since they are still published.

use crate::collection::CollectionProvider;
use crate::types::{Entry, PageLink, PaginationLinks};

/// Derive pagination links for `current`.
///
/// Out-of-range neighbours are absent. A current entry that is not part of
/// the collection gets no links at all rather than wrapping around to the
/// last or first entry.
pub fn derive_pagination<C>(collection: &C, current: &Entry) -> PaginationLinks
where
    C: CollectionProvider + ?Sized,
{
    let entries = collection.all();
    let Some(index) = entries
        .iter()
        .position(|e| e.permalink == current.permalink)
    else {
        return PaginationLinks::default();
    };

    PaginationLinks {
        previous: index
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .map(PageLink::from),
        next: entries.get(index + 1).map(PageLink::from),
    }
}
