//! Code-signing suffixes of Android artifact file names
//!
//! A given artifact is either signed (no suffix), unsigned (`-unsigned`,
//! added by Gradle) or re-signed by the pipeline's signing step
//! (`-bitrise-signed`).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Suffix the pipeline's signing step appends to the artifact base name
pub const BITRISE_SIGNED_SUFFIX: &str = "-bitrise-signed";

/// Suffix Gradle appends to artifacts built without a signing config
pub const UNSIGNED_SUFFIX: &str = "-unsigned";

/// Signing state inferred from the file name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SigningInfo {
    /// Name carried `-unsigned`
    pub unsigned: bool,
    /// Name carried `-bitrise-signed`
    pub bitrise_signed: bool,
}

/// Parse the signing suffixes of an artifact path.
///
/// Returns the signing info and the file name without extension and
/// without signing suffixes. `-bitrise-signed` is stripped before
/// `-unsigned`, so `app-debug-unsigned-bitrise-signed.apk` sets both flags.
pub fn parse_signing_info(path: &str) -> (SigningInfo, String) {
    let mut info = SigningInfo::default();
    let mut base = file_stem(path);

    if let Some(stripped) = base.strip_suffix(BITRISE_SIGNED_SUFFIX) {
        base = stripped;
        info.bitrise_signed = true;
    }

    if let Some(stripped) = base.strip_suffix(UNSIGNED_SUFFIX) {
        base = stripped;
        info.unsigned = true;
    }

    (info, base.to_string())
}

/// File name without its extension.
fn file_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
}

/// Extension of the path including the leading dot, or an empty string.
pub(crate) fn dotted_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}
