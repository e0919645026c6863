//! Asset lookup with ordered fallbacks.
//!
//! Loading itself belongs to the front end. The core only decides which of
//! several encodings of the same asset to use.

use log::{debug, warn};
use nonempty::{nonempty, NonEmpty};
use std::path::PathBuf;

use crate::error::AssetError;

pub trait AssetProvider {
    /// Succeeds when `path` can be loaded.
    fn probe(&self, path: &str) -> Result<(), AssetError>;
}

/// Assets laid out under a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetProvider for DirectoryAssets {
    fn probe(&self, path: &str) -> Result<(), AssetError> {
        let full = self.root.join(path);
        match full.metadata() {
            Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
            Ok(_) => Err(AssetError::Load {
                path: full.display().to_string(),
                reason: "not a non-empty file".to_string(),
            }),
            Err(_) => Err(AssetError::NotFound(full.display().to_string())),
        }
    }
}

/// Audio encodings in order of preference.
pub fn audio_candidates(stem: &str) -> NonEmpty<String> {
    nonempty![format!("{stem}.ogg"), format!("{stem}.mp3"), format!("{stem}.wav")]
}

/// Model encodings in order of preference.
pub fn model_candidates(stem: &str) -> NonEmpty<String> {
    nonempty![format!("{stem}.glb"), format!("{stem}.gltf")]
}

/// First candidate the provider accepts.
pub fn resolve_with_fallback(
    provider: &impl AssetProvider,
    candidates: &NonEmpty<String>,
) -> Result<String, AssetError> {
    for candidate in candidates.iter() {
        match provider.probe(candidate) {
            Ok(()) => {
                debug!("Resolved asset {candidate}");
                return Ok(candidate.clone());
            }
            Err(err) => warn!("Asset candidate {candidate} unusable: {err}"),
        }
    }

    Err(AssetError::Exhausted {
        tried: candidates.iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_platform::collections::HashSet;

    struct Available(HashSet<&'static str>);

    impl AssetProvider for Available {
        fn probe(&self, path: &str) -> Result<(), AssetError> {
            if self.0.contains(path) {
                Ok(())
            } else {
                Err(AssetError::NotFound(path.to_string()))
            }
        }
    }

    #[test]
    fn test_first_available_candidate_wins() {
        let provider = Available(["sea.mp3", "sea.wav"].into_iter().collect());
        assert_eq!(
            resolve_with_fallback(&provider, &audio_candidates("sea")),
            Ok("sea.mp3".to_string())
        );
    }

    #[test]
    fn test_exhausted_lists_every_candidate() {
        let provider = Available(HashSet::default());
        assert_eq!(
            resolve_with_fallback(&provider, &model_candidates("ship")),
            Err(AssetError::Exhausted {
                tried: vec!["ship.glb".to_string(), "ship.gltf".to_string()]
            })
        );
    }

    #[test]
    fn test_directory_assets_probe() {
        let dir = std::env::temp_dir().join(format!("sailfolio-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("theme.wav"), [1u8, 2, 3]).unwrap();
        std::fs::write(dir.join("theme.ogg"), b"").unwrap();

        let provider = DirectoryAssets::new(&dir);
        assert_eq!(
            resolve_with_fallback(&provider, &audio_candidates("theme")),
            Ok("theme.wav".to_string()),
            "Empty files are skipped"
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
