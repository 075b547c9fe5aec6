//! Grand Prix calendar and artifact layout.

use podium_data::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported Grand Prix events, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrandPrix {
    /// Australian Grand Prix (Albert Park)
    Australia,

    /// Chinese Grand Prix (Shanghai)
    China,

    /// Japanese Grand Prix (Suzuka)
    Japan,
}

impl GrandPrix {
    /// Returns all events.
    pub const fn all() -> [Self; 3] {
        [Self::Australia, Self::China, Self::Japan]
    }

    /// Short lowercase identifier used in artifact names and on the command line.
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Australia => "australia",
            Self::China => "china",
            Self::Japan => "japan",
        }
    }

    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Australia => "Australian GP",
            Self::China => "Chinese GP",
            Self::Japan => "Japanese GP",
        }
    }

    /// Hosting country as the session provider names it.
    pub const fn country(&self) -> &'static str {
        match self {
            Self::Australia => "Australia",
            Self::China => "China",
            Self::Japan => "Japan",
        }
    }

    /// Season being predicted.
    pub const fn season(&self) -> i32 {
        2025
    }

    /// Season whose race supplies the sector and lap profiles.
    pub const fn reference_season(&self) -> i32 {
        self.season() - 1
    }

    /// Look up an event by slug, case-insensitively.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|gp| gp.slug().eq_ignore_ascii_case(slug.trim()))
    }
}

impl fmt::Display for GrandPrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season(), self.name())
    }
}

impl FromStr for GrandPrix {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| {
            let known: Vec<&str> = Self::all().iter().map(Self::slug).collect();
            DataError::Parse(format!(
                "unknown event '{s}' (expected one of: {})",
                known.join(", ")
            ))
        })
    }
}

/// Directories holding the pipeline's input and output artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactLayout {
    /// Qualifying snapshots (default: `data`)
    pub data_dir: PathBuf,
    /// Predictions and MAE files (default: `predictions`)
    pub predictions_dir: PathBuf,
    /// Track images (default: `images`)
    pub images_dir: PathBuf,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            predictions_dir: PathBuf::from("predictions"),
            images_dir: PathBuf::from("images"),
        }
    }
}

impl ArtifactLayout {
    /// Layout with every directory under `root`.
    pub fn under(root: &Path) -> Self {
        let default = Self::default();
        Self {
            data_dir: root.join(default.data_dir),
            predictions_dir: root.join(default.predictions_dir),
            images_dir: root.join(default.images_dir),
        }
    }

    /// `data/qualifying_{slug}_{season}.csv`
    pub fn qualifying_csv(&self, gp: GrandPrix) -> PathBuf {
        self.data_dir
            .join(format!("qualifying_{}_{}.csv", gp.slug(), gp.season()))
    }

    /// `predictions/prediction_{slug}_{season}.csv`
    pub fn predictions_csv(&self, gp: GrandPrix) -> PathBuf {
        self.predictions_dir
            .join(format!("prediction_{}_{}.csv", gp.slug(), gp.season()))
    }

    /// `predictions/mae_{slug}_{season}.txt`
    pub fn mae_txt(&self, gp: GrandPrix) -> PathBuf {
        self.predictions_dir
            .join(format!("mae_{}_{}.txt", gp.slug(), gp.season()))
    }

    /// `images/{slug}_track.png`
    pub fn track_image(&self, gp: GrandPrix) -> PathBuf {
        self.images_dir.join(format!("{}_track.png", gp.slug()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("australia", GrandPrix::Australia)]
    #[case("China", GrandPrix::China)]
    #[case(" JAPAN ", GrandPrix::Japan)]
    fn test_from_slug(#[case] slug: &str, #[case] expected: GrandPrix) {
        assert_eq!(slug.parse::<GrandPrix>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_event() {
        let err = "monaco".parse::<GrandPrix>().unwrap_err();
        assert!(err.to_string().contains("australia, china, japan"));
    }

    #[test]
    fn test_seasons() {
        for gp in GrandPrix::all() {
            assert_eq!(gp.season(), 2025);
            assert_eq!(gp.reference_season(), 2024);
        }
        assert_eq!(GrandPrix::China.to_string(), "2025 Chinese GP");
    }

    #[test]
    fn test_artifact_paths() {
        let layout = ArtifactLayout::default();
        let gp = GrandPrix::Australia;

        assert_eq!(
            layout.qualifying_csv(gp),
            Path::new("data/qualifying_australia_2025.csv")
        );
        assert_eq!(
            layout.predictions_csv(gp),
            Path::new("predictions/prediction_australia_2025.csv")
        );
        assert_eq!(
            layout.mae_txt(gp),
            Path::new("predictions/mae_australia_2025.txt")
        );
        assert_eq!(
            layout.track_image(gp),
            Path::new("images/australia_track.png")
        );

        let rooted = ArtifactLayout::under(Path::new("/tmp/run"));
        assert_eq!(
            rooted.mae_txt(GrandPrix::Japan),
            Path::new("/tmp/run/predictions/mae_japan_2025.txt")
        );
    }
}
