//! JSON image inventory for the front-end carousel.
//!
//! The manifest maps every record identifier to the URLs of its located
//! images, in carousel order:
//!
//! ```json
//! { "fairImages": { "summerFair": ["images/fairs/summerFair/01.jpg"] } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use fairsync_shared::{FairSyncError, MediaConfig, Result};

use crate::assets::AssetLocator;
use crate::pipeline::write_document;
use crate::records::RecordSource;

/// Image URLs per record identifier. Keys serialize in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageManifest {
    #[serde(rename = "fairImages")]
    pub images: BTreeMap<String, Vec<String>>,
}

impl ImageManifest {
    /// Total number of image entries across all records.
    pub fn image_count(&self) -> usize {
        self.images.values().map(Vec::len).sum()
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| FairSyncError::parse(format!("failed to encode manifest: {e}")))?;
        json.push('\n');
        Ok(json)
    }
}

/// Locate every record's images and collect their URLs.
///
/// Returns `None` when the record source does not exist. Records without
/// images get an empty list.
#[instrument(skip_all, fields(source = %source.describe()))]
pub fn build_manifest(
    media: &MediaConfig,
    source: &dyn RecordSource,
) -> Result<Option<ImageManifest>> {
    let Some(records) = source.load()? else {
        return Ok(None);
    };

    let locator = AssetLocator::from_config(media);
    let url = media.url.trim_end_matches('/');
    let mut manifest = ImageManifest::default();

    for record in &records {
        let assets = locator.locate(&record.identifier)?;
        if assets.is_empty() {
            warn!(identifier = %record.identifier, "no images found");
        }
        let urls = assets
            .iter()
            .map(|file| format!("{url}/{}/{file}", record.identifier))
            .collect();
        manifest.images.insert(record.identifier.clone(), urls);
    }

    Ok(Some(manifest))
}

/// Write `manifest` to `path`, creating parent folders as needed.
///
/// Returns `false` without touching the file when its content is already
/// identical.
#[instrument(skip(manifest), fields(path = %path.display()))]
pub fn write_manifest(path: &Path, manifest: &ImageManifest) -> Result<bool> {
    let json = manifest.to_json()?;

    match std::fs::read_to_string(path) {
        Ok(existing) if existing == json => {
            info!("manifest already up to date");
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(FairSyncError::io("read", path, e)),
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FairSyncError::io("create", parent, e))?;
    }
    write_document(path, &json)?;
    info!(images = manifest.image_count(), "manifest written");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use fairsync_shared::Record;

    fn record(identifier: &str) -> Record {
        Record {
            identifier: identifier.into(),
            title: format!("{identifier} title"),
            ..Record::default()
        }
    }

    fn media(root: &Path) -> MediaConfig {
        MediaConfig {
            root: root.to_path_buf(),
            ..MediaConfig::default()
        }
    }

    #[test]
    fn lists_sorted_image_urls_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let summer = dir.path().join("summerFair");
        fs::create_dir_all(&summer).unwrap();
        for name in ["b.jpg", "a.PNG", ".DS_Store.jpg", "notes.txt"] {
            fs::write(summer.join(name), b"").unwrap();
        }

        let records = vec![record("summerFair"), record("midWinterFair")];
        let manifest = build_manifest(&media(dir.path()), &records)
            .unwrap()
            .unwrap();

        assert_eq!(
            manifest.images["summerFair"],
            ["images/fairs/summerFair/a.PNG", "images/fairs/summerFair/b.jpg"]
        );
        assert!(manifest.images["midWinterFair"].is_empty());
        assert_eq!(manifest.image_count(), 2);
    }

    #[test]
    fn json_uses_the_carousel_key() {
        let mut manifest = ImageManifest::default();
        manifest
            .images
            .insert("x".into(), vec!["images/fairs/x/1.jpg".into()]);

        let json = manifest.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["fairImages"]["x"][0], "images/fairs/x/1.jpg");
    }

    #[test]
    fn missing_source_gives_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = crate::records::CsvRecordSource::new(dir.path().join("absent.csv"));
        assert!(build_manifest(&media(dir.path()), &source).unwrap().is_none());
    }

    #[test]
    fn write_creates_parent_and_skips_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/fair-images.json");
        let mut manifest = ImageManifest::default();
        manifest.images.insert("x".into(), vec![]);

        assert!(write_manifest(&path, &manifest).unwrap());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"fairImages\""));

        assert!(!write_manifest(&path, &manifest).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), written);

        manifest.images.insert("y".into(), vec!["images/fairs/y/1.jpg".into()]);
        assert!(write_manifest(&path, &manifest).unwrap());
        let reread: ImageManifest =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, manifest);
    }
}
