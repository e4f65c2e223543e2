//! Universal APK naming for App Bundles
//!
//! A universal APK generated from `app-minApi21-demo-debug.aab` is named
//! `app-minApi21-demo-universal-debug.apk`, matching the name Gradle gives
//! the universal APK of a split build of the same variant.

use crate::artifact::find_same_artifact;
use crate::signing::{parse_signing_info, BITRISE_SIGNED_SUFFIX, UNSIGNED_SUFFIX};
use crate::split::UNIVERSAL_SPLIT_PARAM;
use std::path::Path;

/// File name of the universal APK belonging to the bundle at `aab_path`.
///
/// The `universal` segment goes right before the build type; signing
/// suffixes are carried over.
pub fn universal_apk_base(aab_path: &str) -> String {
    let (signing_info, base) = parse_signing_info(aab_path);

    let mut segments: Vec<&str> = base.split('-').collect();
    let build_type_idx = segments.len() - usize::from(segments.len() >= 2);
    segments.insert(build_type_idx, UNIVERSAL_SPLIT_PARAM);

    let mut name = segments.join("-");
    if signing_info.unsigned {
        name.push_str(UNSIGNED_SUFFIX);
    }
    if signing_info.bitrise_signed {
        name.push_str(BITRISE_SIGNED_SUFFIX);
    }
    name.push_str(".apk");
    name
}

/// Find the universal APK next to `aab_path` that was built from the same variant.
///
/// Only a universal APK can be the pair; signing differences do not matter.
pub fn find_universal_apk_pair<'a, S: AsRef<str>>(
    aab_path: &str,
    apks: &'a [S],
) -> Option<&'a str> {
    let dir = Path::new(aab_path).parent().unwrap_or_else(|| Path::new(""));
    let universal = dir.join(universal_apk_base(aab_path));
    find_same_artifact(&universal.to_string_lossy(), apks)
}
