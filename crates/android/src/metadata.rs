//! Path-derived artifact metadata attached to uploaded Android artifacts

use crate::artifact::{create_split_artifact_meta, Artifact};
use crate::file_name::parse_artifact_path;
use deploy_core::{Result, ResultExt};
use serde::{Deserialize, Serialize};

/// Build variant identity plus the variant bucket of an uploaded artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Gradle module name, e.g. `app`
    pub module: String,
    /// Product flavour, empty when the variant has none
    pub product_flavour: String,
    /// Build type, e.g. `debug`
    pub build_type: String,

    /// Bucket of the variant, flattened into the same JSON object
    #[serde(flatten)]
    pub artifact: Artifact,
}

impl ArtifactMetadata {
    /// Build the metadata of `path` from the full list of Android artifacts of the build.
    pub fn for_path<S: AsRef<str>>(path: &str, paths: &[S]) -> Result<Self> {
        let info = parse_artifact_path(path);
        let artifact = create_split_artifact_meta(path, paths)
            .with_suggestion("Pass every APK and AAB of the build as candidates")?;

        Ok(Self {
            module: info.module,
            product_flavour: info.product_flavour,
            build_type: info.build_type,
            artifact,
        })
    }

    /// Serialize to the JSON document sent along with the upload
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
