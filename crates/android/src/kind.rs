//! Artifact kinds by file extension and deploy listing partitioning

use crate::file_name::parse_artifact_path;
use crate::signing::dotted_extension;
use deploy_core::config::AndroidConfig;
use serde::{Deserialize, Serialize};

/// Zipped Xcode archives carry a double extension
pub const XCARCHIVE_ZIP_EXT: &str = ".xcarchive.zip";

/// Kind of a deployable file, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Android application package
    Apk,
    /// Android App Bundle
    Aab,
    /// iOS application archive
    Ipa,
    /// Zipped Xcode archive
    Xcarchive,
    /// Anything else in the deploy directory
    Other,
}

impl ArtifactKind {
    /// Detect the kind from the path's extension; matching is case sensitive.
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(XCARCHIVE_ZIP_EXT) {
            return Self::Xcarchive;
        }

        match dotted_extension(path).as_str() {
            ".apk" => Self::Apk,
            ".aab" => Self::Aab,
            ".ipa" => Self::Ipa,
            _ => Self::Other,
        }
    }
}

/// A deploy listing split by kind, input order preserved in each group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition<'a> {
    /// `.apk` paths
    pub apks: Vec<&'a str>,
    /// `.aab` paths
    pub aabs: Vec<&'a str>,
    /// Everything else
    pub others: Vec<&'a str>,
}

impl<'a> Partition<'a> {
    /// APKs followed by AABs, the candidate list for variant reconciliation
    pub fn android_artifacts(&self) -> Vec<&'a str> {
        self.apks.iter().chain(&self.aabs).copied().collect()
    }
}

/// Split a deploy listing into APKs, AABs and everything else.
pub fn partition_artifacts<S: AsRef<str>>(paths: &[S]) -> Partition<'_> {
    let mut partition = Partition::default();

    for path in paths.iter().map(AsRef::<str>::as_ref) {
        match ArtifactKind::from_path(path) {
            ArtifactKind::Apk => partition.apks.push(path),
            ArtifactKind::Aab => partition.aabs.push(path),
            _ => partition.others.push(path),
        }
    }

    partition
}

/// Android artifacts of a deploy listing that pass the module filter.
pub fn collect_android_artifacts<'a, S: AsRef<str>>(
    paths: &'a [S],
    config: &AndroidConfig,
) -> Vec<&'a str> {
    partition_artifacts(paths)
        .android_artifacts()
        .into_iter()
        .filter(|path| config.includes_module(&parse_artifact_path(path).module))
        .collect()
}
