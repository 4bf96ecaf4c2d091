//! Site content data: `config.json`, `sponsors.json` and `releases.json`.
//!
//! These files sit at the content root next to `config.toml` and feed the
//! page templates (site title, menu, footer). `config.json` is required;
//! the other two are optional and read as empty when missing. A file that
//! exists but does not parse is always an error.
//!
//! ```text
//! content/
//! ├── config.toml        # build configuration (see config module)
//! ├── config.json        # site title, menu, edit link base
//! ├── sponsors.json      # optional
//! └── releases.json      # optional
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("failed to parse {0}: {1}")]
    Json(PathBuf, #[source] serde_json::Error),
}

/// Site-level settings shown on every page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentConfig {
    pub title: String,
    pub menu: Vec<MenuLink>,
    /// Prefix for "Edit this page" links; the entry's content path is appended.
    pub file_edit_base_url: Option<String>,
    pub copyright: Option<String>,
}

impl ContentConfig {
    pub fn edit_url(&self, content_path: &str) -> Option<String> {
        let base = self.file_edit_base_url.as_deref()?;
        Some(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            content_path.trim_start_matches('/')
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuLink {
    pub title: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub monthly_dollars: Option<u32>,
}

impl Sponsor {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }

    pub fn link(&self) -> Option<&str> {
        self.link_url.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Everything loaded from the content root besides collections.
#[derive(Debug, Clone, Default)]
pub struct ContentBundle {
    pub config: ContentConfig,
    pub sponsors: Vec<Sponsor>,
    pub releases: Vec<Release>,
}

impl ContentBundle {
    /// Release with the newest `publishedAt`.
    pub fn latest_release(&self) -> Option<&Release> {
        self.releases.iter().max_by_key(|r| r.published_at)
    }
}

pub fn load_content(root: &Path) -> Result<ContentBundle, ContentError> {
    let config = load_json(&root.join("config.json"))?;
    let sponsors = load_optional_json(&root.join("sponsors.json"))?.unwrap_or_default();
    let releases = load_optional_json(&root.join("releases.json"))?.unwrap_or_default();
    Ok(ContentBundle {
        config,
        sponsors,
        releases,
    })
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io(path.to_path_buf(), e))?;
    serde_json::from_str(&raw).map_err(|e| ContentError::Json(path.to_path_buf(), e))
}

/// Like [`load_json`], but a missing file is `Ok(None)`.
pub fn load_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ContentError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Optional content file not found");
        return Ok(None);
    }
    load_json(path).map(Some)
}

// ============================================================================
// Relative time
// ============================================================================

const SECONDS_PER_MONTH: f64 = 30.436_875 * 86_400.0;

/// Human phrase for the distance between two instants, e.g. `"3 days ago"`
/// or `"in an hour"`.
///
/// Thresholds:
/// | distance          | phrase          |
/// |-------------------|-----------------|
/// | 0 to 44 s         | a few seconds   |
/// | 45 to 89 s        | a minute        |
/// | 90 s to 44 min    | N minutes       |
/// | 45 to 89 min      | an hour         |
/// | 90 min to 21 h    | N hours         |
/// | 22 to 35 h        | a day           |
/// | 36 h to 25 days   | N days          |
/// | 26 to 45 days     | a month         |
/// | 46 days to 10 mo  | N months        |
/// | 11 to 17 months   | a year          |
/// | 18 months+        | N years         |
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let phrase = humanize(seconds.unsigned_abs());
    if seconds >= 0 {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

fn round_div(value: u64, unit: u64) -> u64 {
    (value + unit / 2) / unit
}

fn humanize(seconds: u64) -> String {
    let minutes = round_div(seconds, 60);
    let hours = round_div(seconds, 3_600);
    let days = round_div(seconds, 86_400);
    let months = (seconds as f64 / SECONDS_PER_MONTH).round() as u64;

    if seconds <= 44 {
        "a few seconds".to_string()
    } else if seconds <= 89 {
        "a minute".to_string()
    } else if minutes <= 44 {
        format!("{minutes} minutes")
    } else if minutes <= 89 {
        "an hour".to_string()
    } else if hours <= 21 {
        format!("{hours} hours")
    } else if hours <= 35 {
        "a day".to_string()
    } else if days <= 25 {
        format!("{days} days")
    } else if days <= 45 {
        "a month".to_string()
    } else if months <= 10 {
        format!("{months} months")
    } else if months <= 17 {
        "a year".to_string()
    } else {
        format!("{} years", (months as f64 / 12.0).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        relative_time(now() - d, now())
    }

    #[test]
    fn relative_time_short_ranges() {
        assert_eq!(ago(Duration::seconds(10)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(60)), "a minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(50)), "an hour ago");
        assert_eq!(ago(Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(Duration::hours(30)), "a day ago");
    }

    #[test]
    fn relative_time_long_ranges() {
        assert_eq!(ago(Duration::days(3)), "3 days ago");
        assert_eq!(ago(Duration::days(30)), "a month ago");
        assert_eq!(ago(Duration::days(92)), "3 months ago");
        assert_eq!(ago(Duration::days(365)), "a year ago");
        assert_eq!(ago(Duration::days(365 * 3)), "3 years ago");
    }

    #[test]
    fn relative_time_future() {
        assert_eq!(relative_time(now() + Duration::hours(2), now()), "in 2 hours");
    }

    #[test]
    fn edit_url_joins_without_double_slash() {
        let config = ContentConfig {
            file_edit_base_url: Some("https://github.com/acme/docs/edit/main/".to_string()),
            ..ContentConfig::default()
        };
        assert_eq!(
            config.edit_url("/docs/intro.md").as_deref(),
            Some("https://github.com/acme/docs/edit/main/docs/intro.md")
        );
        assert_eq!(ContentConfig::default().edit_url("docs/intro.md"), None);
    }

    #[test]
    fn config_json_camel_case() {
        let config: ContentConfig = serde_json::from_str(
            r#"{"title":"Acme","menu":[{"title":"Guides","href":"/guides"}],"fileEditBaseUrl":"https://x"}"#,
        )
        .unwrap();
        assert_eq!(config.title, "Acme");
        assert_eq!(config.menu.len(), 1);
        assert_eq!(config.file_edit_base_url.as_deref(), Some("https://x"));
        assert_eq!(config.copyright, None);
    }

    #[test]
    fn sponsor_display_name_falls_back_to_login() {
        let sponsor: Sponsor = serde_json::from_str(r#"{"login":"octocat"}"#).unwrap();
        assert_eq!(sponsor.display_name(), "octocat");
        assert_eq!(sponsor.link(), None);
    }

    #[test]
    fn latest_release_by_date() {
        let releases: Vec<Release> = serde_json::from_str(
            r#"[
                {"name":"v1.0.0","publishedAt":"2024-01-01T00:00:00Z"},
                {"name":"v1.2.0","publishedAt":"2024-05-01T00:00:00Z"},
                {"name":"v1.1.0","publishedAt":"2024-03-01T00:00:00Z"}
            ]"#,
        )
        .unwrap();
        let bundle = ContentBundle {
            releases,
            ..ContentBundle::default()
        };
        assert_eq!(bundle.latest_release().map(|r| r.name.as_str()), Some("v1.2.0"));
    }

    #[test]
    fn load_content_optional_files_missing() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.json"), r#"{"title":"Acme"}"#).unwrap();
        let bundle = load_content(tmp.path()).unwrap();
        assert_eq!(bundle.config.title, "Acme");
        assert!(bundle.sponsors.is_empty());
        assert!(bundle.releases.is_empty());
    }

    #[test]
    fn load_content_requires_config_json() {
        let tmp = TempDir::new().unwrap();
        let err = load_content(tmp.path()).unwrap_err();
        assert!(matches!(err, ContentError::Io(path, _) if path.ends_with("config.json")));
    }

    #[test]
    fn malformed_optional_file_is_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("sponsors.json"), "[{").unwrap();
        let err = load_content(tmp.path()).unwrap_err();
        assert!(matches!(err, ContentError::Json(path, _) if path.ends_with("sponsors.json")));
    }

    #[test]
    fn fixture_content_loads() {
        let tmp = crate::test_helpers::setup_fixtures();
        let bundle = load_content(tmp.path()).unwrap();
        assert!(!bundle.config.title.is_empty());
        assert!(!bundle.sponsors.is_empty());
        assert!(bundle.latest_release().is_some());
    }
}
