use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, TreemapError};
use crate::tree::raw::{parse_dataset, RawNode};

/// The three built-in datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Kickstarter,
    Movies,
    VideoGames,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Kickstarter, Dataset::Movies, Dataset::VideoGames];

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Dataset::Kickstarter => "Kickstarter",
            Dataset::Movies => "Movies",
            Dataset::VideoGames => "Video Games",
        }
    }

    /// Chart heading.
    pub fn title(self) -> &'static str {
        match self {
            Dataset::Kickstarter => "Kickstarter Pledges",
            Dataset::Movies => "Movie Sales",
            Dataset::VideoGames => "Video Game Sales",
        }
    }

    /// File name under the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::Kickstarter => "kickstarter.json",
            Dataset::Movies => "movies.json",
            Dataset::VideoGames => "video-games.json",
        }
    }

    /// Parse a CLI name (`kickstarter`, `movies`, `games`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "kickstarter" => Some(Dataset::Kickstarter),
            "movies" | "movie" => Some(Dataset::Movies),
            "games" | "video-games" | "videogames" => Some(Dataset::VideoGames),
            _ => None,
        }
    }
}

/// What the user asked to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Builtin(Dataset),
    File(PathBuf),
}

impl Choice {
    /// Where the dataset lives on disk.
    pub fn location(&self, data_dir: &Path) -> PathBuf {
        match self {
            Choice::Builtin(dataset) => data_dir.join(dataset.file_name()),
            Choice::File(path) => path.clone(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Choice::Builtin(dataset) => dataset.title().to_string(),
            Choice::File(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

impl Default for Choice {
    fn default() -> Self {
        Choice::Builtin(Dataset::Kickstarter)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Builtin(dataset) => f.write_str(dataset.label()),
            Choice::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Identifies one selection; only the latest one may deliver data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChoiceToken(pub u64);

/// Tracks the current choice and hands out tokens for in-flight loads.
#[derive(Debug, Default)]
pub struct DatasetSelector {
    current: Choice,
    latest: u64,
}

impl DatasetSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Choice {
        &self.current
    }

    /// Record a new choice. Any load started for an earlier token is now stale.
    pub fn select(&mut self, choice: Choice) -> ChoiceToken {
        self.latest += 1;
        tracing::info!("Dataset selected: {} (token {})", choice, self.latest);
        self.current = choice;
        ChoiceToken(self.latest)
    }

    pub fn is_current(&self, token: ChoiceToken) -> bool {
        token.0 == self.latest
    }

    /// Whether a completed load may be applied.
    pub fn accept(&self, token: ChoiceToken) -> bool {
        if self.is_current(token) {
            true
        } else {
            tracing::warn!(
                "Discarding stale dataset load (token {}, latest {})",
                token.0,
                self.latest
            );
            false
        }
    }
}

/// Read and parse a dataset file. Failures are reported once, never retried.
pub fn load_dataset(path: &Path) -> Result<RawNode> {
    let json = std::fs::read_to_string(path).map_err(|e| TreemapError::Fetch {
        location: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let raw = parse_dataset(&json)?;
    tracing::info!(
        "Loaded dataset '{}' from {} ({} leaves)",
        raw.name,
        path.display(),
        raw.leaf_count()
    );
    Ok(raw)
}

/// Background-task wrapper around [`load_dataset`].
pub async fn fetch_dataset(path: PathBuf) -> Result<RawNode> {
    load_dataset(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_accepted() {
        let mut selector = DatasetSelector::new();
        let kickstarter = selector.select(Choice::Builtin(Dataset::Kickstarter));
        let movies = selector.select(Choice::Builtin(Dataset::Movies));

        assert!(!selector.accept(kickstarter));
        assert!(selector.accept(movies));
        assert_eq!(selector.current(), &Choice::Builtin(Dataset::Movies));
    }

    #[test]
    fn reselecting_the_same_dataset_issues_a_new_token() {
        let mut selector = DatasetSelector::new();
        let a = selector.select(Choice::Builtin(Dataset::Movies));
        let b = selector.select(Choice::Builtin(Dataset::Movies));
        assert_ne!(a, b);
        assert!(!selector.is_current(a));
    }

    #[test]
    fn builtin_locations_and_names() {
        let dir = Path::new("data");
        assert_eq!(
            Choice::Builtin(Dataset::VideoGames).location(dir),
            dir.join("video-games.json")
        );
        assert_eq!(Dataset::from_name("games"), Some(Dataset::VideoGames));
        assert_eq!(Dataset::from_name("Kickstarter"), Some(Dataset::Kickstarter));
        assert_eq!(Dataset::from_name("books"), None);
        assert_eq!(Choice::File(PathBuf::from("/tmp/sales.json")).title(), "sales");
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let err = load_dataset(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, TreemapError::Fetch { .. }));
    }

    #[test]
    fn loads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("tessera-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"name":"r","children":[{"name":"c","children":[{"name":"x","category":"c","value":"3"}]}]}"#,
        )
        .unwrap();
        let raw = load_dataset(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(raw.leaf_count(), 1);
    }
}
