//! Bundled template files
//!
//! React Native navigation screens are compiled into the binary and addressed
//! by a stable key (their path under `templates/`). Plans refer to them through
//! `CopyTemplate` actions; the copier resolves the key at execution time.

pub mod copier;

use crate::options::NavigationLayout;

pub use copier::copy_template;

macro_rules! bundled {
    ($($key:literal),* $(,)?) => {
        &[$(($key, include_str!(concat!("../../templates/", $key)))),*]
    };
}

/// Every bundled template, keyed by its path under `templates/`
pub const BUNDLED: &[(&str, &str)] = bundled![
    "react-native/modular/App.tsx",
    "react-native/modular/App.jsx",
    "react-native/modular/pages/HomeScreen.tsx",
    "react-native/modular/pages/HomeScreen.jsx",
    "react-native/modular/pages/DetailsScreen.tsx",
    "react-native/modular/pages/DetailsScreen.jsx",
    "react-native/single-file/App.tsx",
    "react-native/single-file/App.jsx",
];

/// Contents of the bundled template `key`
pub fn lookup(key: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, content)| *content)
}

/// `(template key, destination)` pairs for a navigation layout
///
/// Destinations are relative to the project root. The caller is responsible
/// for creating `src/pages` before copying modular screens.
pub fn navigation_files(layout: NavigationLayout, typescript: bool) -> Vec<(String, String)> {
    let ext = if typescript { "tsx" } else { "jsx" };
    match layout {
        NavigationLayout::Modular => vec![
            (
                format!("react-native/modular/App.{}", ext),
                format!("App.{}", ext),
            ),
            (
                format!("react-native/modular/pages/HomeScreen.{}", ext),
                format!("src/pages/HomeScreen.{}", ext),
            ),
            (
                format!("react-native/modular/pages/DetailsScreen.{}", ext),
                format!("src/pages/DetailsScreen.{}", ext),
            ),
        ],
        NavigationLayout::SingleFile => vec![(
            format!("react-native/single-file/App.{}", ext),
            format!("App.{}", ext),
        )],
    }
}
