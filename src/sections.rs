//! Sidebar sections: entries grouped by category.
//!
//! Categories appear in the order they are first seen while scanning the
//! collection, and items keep collection order inside each category:
//!
//! ```text
//! intro    (Basics)          Basics
//! routing  (HTTP)      →       intro
//! config   (Basics)            config
//!                            HTTP
//!                              routing
//! ```
//!
//! Uncategorized entries share one group whose title is `None`. Drafts are
//! dropped from the items, but a category made only of drafts still yields a
//! (empty) section so the grouping stays complete; templates skip those.

use crate::collection::CollectionProvider;
use crate::types::{Entry, Section, SectionItem};
use indexmap::IndexMap;

/// Derive the sidebar sections for `current` from a collection.
///
/// `current` does not have to belong to the collection. When it doesn't, no
/// item is marked active, and a section is active only if it shares the
/// current entry's category.
pub fn derive_sections<C>(collection: &C, current: &Entry) -> Vec<Section>
where
    C: CollectionProvider + ?Sized,
{
    let mut groups: IndexMap<Option<&str>, Vec<&Entry>> = IndexMap::new();
    for entry in collection.all() {
        groups.entry(entry.category()).or_default().push(entry);
    }

    groups
        .into_iter()
        .map(|(key, entries)| Section {
            title: key.map(str::to_string),
            is_active: current.category() == key,
            items: entries
                .into_iter()
                .filter(|e| !e.meta.draft)
                .map(|e| SectionItem {
                    href: e.permalink.clone(),
                    title: e.title.clone(),
                    is_active: e.permalink == current.permalink,
                })
                .collect(),
        })
        .collect()
}
