//! Android artifact file name decoding
//!
//! Based on <https://developer.android.com/studio/build/build-variants>:
//! - `<build variant>` = `<product flavour>` + `<build type>`
//! - `debug` and `release` build types always exist
//! - APK/AAB base name layout: `<module>-<product flavour?>-<build type>.<apk|aab>`
//! - Sample APK path: `$BITRISE_DEPLOY_DIR/app-minApi21-demo-hdpi-debug.apk`

use crate::artifact::ArtifactKey;
use crate::signing::{parse_signing_info, SigningInfo};
use crate::split::{parse_split_info, SplitInfo};
use serde::{Deserialize, Serialize};

/// Decoded identity of one artifact path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    /// First `-` separated segment
    pub module: String,
    /// Middle segments with split tokens removed
    pub product_flavour: String,
    /// Last segment after signing suffixes are removed
    pub build_type: String,

    /// Signing suffixes found on the file name
    pub signing_info: SigningInfo,
    /// Split params found in the flavour segments
    pub split_info: SplitInfo,
}

impl ArtifactInfo {
    /// Key of the variant bucket this artifact belongs to
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(&self.module, &self.build_type, &self.product_flavour)
    }

    /// Whether the file name carried any split param
    pub fn is_split(&self) -> bool {
        !self.split_info.split_params.is_empty()
    }
}

/// Parse an Android artifact path.
///
/// Names with fewer than two `-` separated segments are custom names
/// (artifact names can be customized in Gradle); they yield empty module,
/// flavour and build type.
pub fn parse_artifact_path(path: &str) -> ArtifactInfo {
    let (signing_info, base) = parse_signing_info(path);
    let mut info = ArtifactInfo {
        signing_info,
        ..ArtifactInfo::default()
    };

    let segments: Vec<&str> = base.split('-').collect();
    let [module, middle @ .., build_type] = segments.as_slice() else {
        return info;
    };

    info.module = (*module).to_string();
    info.build_type = (*build_type).to_string();
    if !middle.is_empty() {
        (info.split_info, info.product_flavour) = parse_split_info(&middle.join("-"));
    }

    info
}
