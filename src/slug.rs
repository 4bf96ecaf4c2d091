//! Heading slugs for in-page anchors.
//!
//! Slugs are lowercase, keep ASCII alphanumerics and non-ASCII letters, and
//! collapse every other run of characters into a single dash:
//! - `"Getting Started"` → `"getting-started"`
//! - `"The config/app.ts file"` → `"the-config-app-ts-file"`
//! - `"  --Hooks--  "` → `"hooks"`
//! - `"Überblick"` → `"überblick"`

/// Turn heading text into an anchor id.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}
