//! Media inventory lookup.
//!
//! Each record's images live in `<media_root>/<identifier>/`. A missing
//! folder is the normal state before photos are uploaded, so it yields an
//! empty [`AssetSet`] rather than an error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use fairsync_shared::{AssetOrder, AssetSet, FairSyncError, MediaConfig, Result};

/// Finds a record's image files under the media root.
#[derive(Debug, Clone)]
pub struct AssetLocator {
    root: PathBuf,
    /// Lowercased, without the leading dot.
    extensions: Vec<String>,
    order: AssetOrder,
    include_hidden: bool,
}

impl AssetLocator {
    /// Locator over `root` with the default extension set and ordering.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let media = MediaConfig {
            root: root.into(),
            ..MediaConfig::default()
        };
        Self::from_config(&media)
    }

    pub fn from_config(media: &MediaConfig) -> Self {
        Self {
            root: media.root.clone(),
            extensions: media
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            order: media.order,
            include_hidden: media.include_hidden,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the accepted image files for `identifier`, in carousel order.
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    pub fn locate(&self, identifier: &str) -> Result<AssetSet> {
        if !is_plain_folder_name(identifier) {
            warn!(identifier, "identifier is not a plain folder name, skipping asset lookup");
            return Ok(AssetSet::empty(identifier));
        }

        let dir = self.root.join(identifier);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %dir.display(), "asset folder not found");
                return Ok(AssetSet::empty(identifier));
            }
            Err(e) => return Err(FairSyncError::io("list", &dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FairSyncError::io("list", &dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                debug!(path = %path.display(), "skipping non-UTF-8 file name");
                continue;
            };
            if self.accepts(&name) {
                files.push(name);
            }
        }

        if self.order == AssetOrder::Name {
            files.sort();
        }

        debug!(count = files.len(), ?files, "located assets");
        Ok(AssetSet::new(identifier, files))
    }

    fn accepts(&self, name: &str) -> bool {
        if !self.include_hidden && name.starts_with('.') {
            return false;
        }
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            })
    }
}

/// A single, non-empty path component that stays inside the media root.
fn is_plain_folder_name(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier != "."
        && identifier != ".."
        && !identifier.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn media_tree(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("summerFair");
        fs::create_dir_all(&folder).unwrap();
        for name in files {
            fs::write(folder.join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    fn missing_folder_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let set = AssetLocator::new(dir.path()).locate("preHolidayMarket").unwrap();
        assert!(set.is_empty());
        assert_eq!(set.identifier(), "preHolidayMarket");
    }

    #[test]
    fn missing_media_root_is_empty_too() {
        let set = AssetLocator::new("/nonexistent/fairsync/media")
            .locate("summerFair")
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let dir = media_tree(&[
            "b.JPG", "a.png", "notes.txt", "c.WebP", "d.jpeg", "e.gif", "noext",
        ]);
        let set = AssetLocator::new(dir.path()).locate("summerFair").unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            ["a.png", "b.JPG", "c.WebP", "d.jpeg", "e.gif"]
        );
    }

    #[test]
    fn hidden_files_skipped_unless_requested() {
        let dir = media_tree(&[".hidden.jpg", "shown.jpg"]);

        let set = AssetLocator::new(dir.path()).locate("summerFair").unwrap();
        assert_eq!(set.files(), ["shown.jpg"]);

        let media = MediaConfig {
            root: dir.path().to_path_buf(),
            include_hidden: true,
            ..MediaConfig::default()
        };
        let set = AssetLocator::from_config(&media).locate("summerFair").unwrap();
        assert_eq!(set.files(), [".hidden.jpg", "shown.jpg"]);
    }

    #[test]
    fn subdirectories_are_ignored() {
        let dir = media_tree(&["one.jpg"]);
        fs::create_dir(dir.path().join("summerFair").join("nested.jpg")).unwrap();
        let set = AssetLocator::new(dir.path()).locate("summerFair").unwrap();
        assert_eq!(set.files(), ["one.jpg"]);
    }

    #[test]
    fn filesystem_order_keeps_every_match() {
        let dir = media_tree(&["z.jpg", "m.jpg", "a.jpg"]);
        let media = MediaConfig {
            root: dir.path().to_path_buf(),
            order: AssetOrder::Filesystem,
            ..MediaConfig::default()
        };
        let set = AssetLocator::from_config(&media).locate("summerFair").unwrap();
        let mut names = set.files().to_vec();
        names.sort();
        assert_eq!(names, ["a.jpg", "m.jpg", "z.jpg"]);
    }

    #[test]
    fn configured_extensions_are_normalized() {
        let dir = media_tree(&["a.avif", "b.jpg"]);
        let media = MediaConfig {
            root: dir.path().to_path_buf(),
            extensions: vec![".AVIF".into()],
            ..MediaConfig::default()
        };
        let set = AssetLocator::from_config(&media).locate("summerFair").unwrap();
        assert_eq!(set.files(), ["a.avif"]);
    }

    #[test]
    fn traversal_identifiers_are_not_followed() {
        let dir = media_tree(&["a.jpg"]);
        let locator = AssetLocator::new(dir.path().join("summerFair"));
        assert!(locator.locate("..").unwrap().is_empty());
        assert!(locator.locate("").unwrap().is_empty());
        assert!(locator.locate("../summerFair").unwrap().is_empty());
    }
}
