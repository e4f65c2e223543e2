//! APK split parameters embedded in the product flavour segment

use serde::{Deserialize, Serialize};

/// Split parameter marking the universal APK of a split set
pub const UNIVERSAL_SPLIT_PARAM: &str = "universal";

// The order of split params matters: they are removed from the flavour in
// this order. Removing `xhdpi` from `xxxhdpi` would leave `xx` behind.

/// Supported ABIs, based on <https://developer.android.com/ndk/guides/abis.html#sa>
pub const ABIS: &[&str] = &["armeabi-v7a", "arm64-v8a", "x86_64", "x86", UNIVERSAL_SPLIT_PARAM];

/// ABIs no longer supported by the NDK but still found in older builds
pub const UNSUPPORTED_ABIS: &[&str] = &["mips64", "mips", "armeabi"];

/// Density buckets, based on
/// <https://developer.android.com/studio/build/configure-apk-splits#configure-density-split>
pub const SCREEN_DENSITIES: &[&str] = &[
    "xxxhdpi", "xxhdpi", "xhdpi", "hdpi", "mdpi", "ldpi", "280", "360", "420", "480", "560",
];

/// Split membership inferred from the file name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitInfo {
    /// Canonical split params found, in token priority order
    pub split_params: Vec<String>,
    /// Set when the `universal` param was found
    pub universal: bool,
}

/// All split params in removal priority order.
fn split_params() -> impl Iterator<Item = &'static str> {
    ABIS.iter()
        .chain(UNSUPPORTED_ABIS)
        .chain(SCREEN_DENSITIES)
        .copied()
}

/// Make the first character upper case.
fn first_letter_upper(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse the flavour candidate part of an artifact base name.
///
/// Returns the split info and the flavour with split params removed.
/// Handled layouts:
/// - 2 flavours + density split: `minApi21-full-hdpi`
/// - density and ABI split: `hdpiArmeabi`
/// - flavour + density and ABI split: `demo-hdpiArm64-v8a`
pub fn parse_split_info(flavour: &str) -> (SplitInfo, String) {
    let mut info = SplitInfo::default();
    let mut flavour = flavour.to_string();

    for param in split_params() {
        // With density + ABI splits the second param is capitalized: demo-hdpiArm64-v8a
        let forms = [param.to_string(), first_letter_upper(param)];
        let Some(form) = forms.iter().find(|form| flavour.contains(form.as_str())) else {
            continue;
        };

        flavour = flavour.replacen(form.as_str(), "", 1);
        info.split_params.push(param.to_string());
        if param == UNIVERSAL_SPLIT_PARAM {
            info.universal = true;
        }
    }

    // Removing split params may leave a leading or trailing '-': demo-hdpiArm64-v8a
    let trimmed = flavour.strip_prefix('-').unwrap_or(&flavour);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);

    (info, trimmed.to_string())
}
