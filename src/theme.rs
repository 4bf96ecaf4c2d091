//! Renderer selectors: code-block theme and page template names.
//!
//! Both are closed sets. Names match the identifiers used in `config.toml`:
//!
//! ```toml
//! [rendering]
//! code_theme = "material-theme-darker"
//! template = "docs"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntax-highlighting theme applied to code blocks.
///
/// Only the name travels into the markup (`data-theme`); stylesheets for the
/// themes are the site's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeTheme {
    CssVariables,
    DarkPlus,
    DraculaSoft,
    Dracula,
    GithubDarkDimmed,
    GithubDark,
    GithubLight,
    #[serde(rename = "hc_light")]
    HcLight,
    LightPlus,
    #[default]
    MaterialThemeDarker,
    MaterialThemeLighter,
    MaterialThemeOcean,
    MaterialThemePalenight,
    MaterialTheme,
    MinDark,
    MinLight,
    Monokai,
    Nord,
    OneDarkPro,
    Poimandres,
    RosePineDawn,
    RosePineMoon,
    RosePine,
    SlackDark,
    SlackOchin,
    SolarizedDark,
    SolarizedLight,
    VitesseDark,
    VitesseLight,
}

impl CodeTheme {
    pub const ALL: [CodeTheme; 29] = [
        Self::CssVariables,
        Self::DarkPlus,
        Self::DraculaSoft,
        Self::Dracula,
        Self::GithubDarkDimmed,
        Self::GithubDark,
        Self::GithubLight,
        Self::HcLight,
        Self::LightPlus,
        Self::MaterialThemeDarker,
        Self::MaterialThemeLighter,
        Self::MaterialThemeOcean,
        Self::MaterialThemePalenight,
        Self::MaterialTheme,
        Self::MinDark,
        Self::MinLight,
        Self::Monokai,
        Self::Nord,
        Self::OneDarkPro,
        Self::Poimandres,
        Self::RosePineDawn,
        Self::RosePineMoon,
        Self::RosePine,
        Self::SlackDark,
        Self::SlackOchin,
        Self::SolarizedDark,
        Self::SolarizedLight,
        Self::VitesseDark,
        Self::VitesseLight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CssVariables => "css-variables",
            Self::DarkPlus => "dark-plus",
            Self::DraculaSoft => "dracula-soft",
            Self::Dracula => "dracula",
            Self::GithubDarkDimmed => "github-dark-dimmed",
            Self::GithubDark => "github-dark",
            Self::GithubLight => "github-light",
            Self::HcLight => "hc_light",
            Self::LightPlus => "light-plus",
            Self::MaterialThemeDarker => "material-theme-darker",
            Self::MaterialThemeLighter => "material-theme-lighter",
            Self::MaterialThemeOcean => "material-theme-ocean",
            Self::MaterialThemePalenight => "material-theme-palenight",
            Self::MaterialTheme => "material-theme",
            Self::MinDark => "min-dark",
            Self::MinLight => "min-light",
            Self::Monokai => "monokai",
            Self::Nord => "nord",
            Self::OneDarkPro => "one-dark-pro",
            Self::Poimandres => "poimandres",
            Self::RosePineDawn => "rose-pine-dawn",
            Self::RosePineMoon => "rose-pine-moon",
            Self::RosePine => "rose-pine",
            Self::SlackDark => "slack-dark",
            Self::SlackOchin => "slack-ochin",
            Self::SolarizedDark => "solarized-dark",
            Self::SolarizedLight => "solarized-light",
            Self::VitesseDark => "vitesse-dark",
            Self::VitesseLight => "vitesse-light",
        }
    }
}

impl fmt::Display for CodeTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page layout used to wrap rendered markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateName {
    /// Sidebar navigation, table of contents and pagination.
    #[default]
    Docs,
    /// Header, article and footer only.
    Page,
}

impl TemplateName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::Page => "page",
        }
    }
}
