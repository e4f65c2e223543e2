//! Variant buckets: reconciling split APKs, universal APKs and bundles
//!
//! A deploy directory may hold several representations of one build
//! variant: a single APK, a set of split APKs (optionally with a universal
//! APK), an App Bundle, and `-unsigned`/`-bitrise-signed` copies of any of
//! these. [`map_build_artifacts`] folds the listing into one [`Artifact`] per
//! `(module, build type, product flavour)`.

use crate::file_name::{parse_artifact_path, ArtifactInfo};
use crate::kind::ArtifactKind;
use crate::signing::{dotted_extension, parse_signing_info, BITRISE_SIGNED_SUFFIX, UNSIGNED_SUFFIX};
use deploy_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Contents of one variant bucket
///
/// Serialized field names (`apk`, `aab`, `split`, `universal`) are part of
/// the artifact metadata contract with the backend. Absent paths are
/// serialized as empty strings and an empty `split` as `[]`; `null` is
/// accepted for both when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Set if a single APK represents the app
    #[serde(default, with = "empty_as_none")]
    pub apk: Option<String>,

    /// App Bundle of the variant
    #[serde(default, with = "empty_as_none")]
    pub aab: Option<String>,

    /// Split APK paths including the universal APK, excluding the bundle
    #[serde(default, deserialize_with = "null_as_empty")]
    pub split: Vec<String>,

    /// The universal split, also listed in `split`
    #[serde(rename = "universal", default, with = "empty_as_none")]
    pub universal_apk: Option<String>,
}

mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.is_empty()))
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifies one variant bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    /// Gradle module name
    pub module: String,
    /// Build type, e.g. `release`
    pub build_type: String,
    /// Product flavour, empty when the variant has none
    pub product_flavour: String,
}

impl ArtifactKey {
    /// Key from its parts; arguments follow the `module/build type/flavour` order.
    pub fn new(module: &str, build_type: &str, product_flavour: &str) -> Self {
        Self {
            module: module.to_string(),
            build_type: build_type.to_string(),
            product_flavour: product_flavour.to_string(),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.module, self.build_type, self.product_flavour)
    }
}

/// Variant buckets keyed by `(module, build type, product flavour)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactMap {
    buckets: BTreeMap<ArtifactKey, Artifact>,
}

impl ArtifactMap {
    /// Bucket of `key`, if any artifact was classified into it
    pub fn get(&self, key: &ArtifactKey) -> Option<&Artifact> {
        self.buckets.get(key)
    }

    /// Look up a bucket by its key parts
    pub fn lookup(
        &self,
        module: &str,
        build_type: &str,
        product_flavour: &str,
    ) -> Option<&Artifact> {
        self.get(&ArtifactKey::new(module, build_type, product_flavour))
    }

    /// Buckets in key order
    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactKey, &Artifact)> {
        self.buckets.iter()
    }

    /// Number of variant buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no artifact was classified
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn bucket_mut(&mut self, key: ArtifactKey) -> &mut Artifact {
        self.buckets.entry(key).or_default()
    }
}

/// Serializes as nested `module -> build type -> flavour -> artifact` maps.
impl Serialize for ArtifactMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut nested: BTreeMap<&str, BTreeMap<&str, BTreeMap<&str, &Artifact>>> = BTreeMap::new();
        for (key, artifact) in &self.buckets {
            nested
                .entry(key.module.as_str())
                .or_default()
                .entry(key.build_type.as_str())
                .or_default()
                .insert(key.product_flavour.as_str(), artifact);
        }
        nested.serialize(serializer)
    }
}

/// Find the first artifact in `paths` which is the same variant as `path`.
///
/// Code signing differences do not matter. An unsuffixed match is preferred
/// over an `-unsigned` one, which is preferred over a `-bitrise-signed` one.
pub fn find_same_artifact<'a, S: AsRef<str>>(path: &str, paths: &'a [S]) -> Option<&'a str> {
    let (_, base) = parse_signing_info(path);
    let dir = Path::new(path).parent().unwrap_or_else(|| Path::new(""));
    let ext = dotted_extension(path);

    ["", UNSIGNED_SUFFIX, BITRISE_SIGNED_SUFFIX]
        .into_iter()
        .find_map(|suffix| {
            let candidate = dir.join(format!("{base}{suffix}{ext}"));
            paths.iter()
                .map(AsRef::<str>::as_ref)
                .find(|p| Path::new(p) == candidate.as_path())
        })
}

/// Create the `(module, build type, product flavour) -> artifact` mapping.
///
/// The fold keeps input order: the first AAB, APK and universal APK
/// registered for a bucket win, and split paths keep their input order.
pub fn map_build_artifacts<S: AsRef<str>>(paths: &[S]) -> ArtifactMap {
    let mut map = ArtifactMap::default();

    for path in paths.iter().map(AsRef::<str>::as_ref) {
        let info = parse_artifact_path(path);
        debug!(
            path = %path,
            module = %info.module,
            product_flavour = %info.product_flavour,
            build_type = %info.build_type,
            split_params = ?info.split_info.split_params,
            "Classified artifact"
        );

        let artifact = map.bucket_mut(info.key());

        if ArtifactKind::from_path(path) == ArtifactKind::Aab {
            register_first(&mut artifact.aab, "AAB", path, &info);
            continue;
        }

        if !info.is_split() {
            register_first(&mut artifact.apk, "APK", path, &info);
            continue;
        }

        // -unsigned and -bitrise-signed versions of the same split may both be listed
        if let Some(pair) = find_same_artifact(path, artifact.split.as_slice()) {
            debug!(
                path = %path,
                registered = %pair,
                "Skipping signing variant of registered split"
            );
            continue;
        }

        artifact.split.push(path.to_string());
        if info.split_info.universal {
            register_first(&mut artifact.universal_apk, "universal APK", path, &info);
        }
    }

    map
}

fn register_first(slot: &mut Option<String>, kind: &str, path: &str, info: &ArtifactInfo) {
    match slot {
        Some(registered) => warn!(
            path = %path,
            registered = %registered,
            "Multiple {} generated for module: {}, productFlavour: {}, buildType: {}",
            kind,
            info.module,
            info.product_flavour,
            info.build_type
        ),
        None => *slot = Some(path.to_string()),
    }
}

/// Return the variant bucket the artifact at `path` belongs to.
///
/// The mapping is rebuilt from `paths` on every call.
pub fn create_split_artifact_meta<S: AsRef<str>>(path: &str, paths: &[S]) -> Result<Artifact> {
    let map = map_build_artifacts(paths);
    let info = parse_artifact_path(path);

    map.get(&info.key()).cloned().ok_or_else(|| {
        let mapping = serde_json::to_string_pretty(&map).unwrap_or_default();
        Error::artifact_not_mapped(path).with_context(format!("artifact mapping: {mapping}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_core::ErrorCode;
    use proptest::prelude::*;

    fn strings(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn test_split_by_density_and_abi() {
        let paths = [
            "app-arm64-v8a-debug.apk",
            "app-hdpiArmeabi-v7a-debug.apk",
            "app-mdpiX86-debug.apk",
            "app-xhdpiX86_64-debug.apk",
        ];

        let map = map_build_artifacts(&paths);

        assert_eq!(map.len(), 1);
        assert_eq!(
            map.lookup("app", "debug", ""),
            Some(&Artifact {
                split: strings(&paths),
                ..Artifact::default()
            })
        );
    }

    #[test]
    fn test_signing_variants_of_single_apk() {
        let map = map_build_artifacts(&["app-debug-unsigned.apk", "app-debug-bitrise-signed.apk"]);

        assert_eq!(map.len(), 1);
        let artifact = map.lookup("app", "debug", "").unwrap();
        assert_eq!(artifact.apk.as_deref(), Some("app-debug-unsigned.apk"));
        assert!(artifact.split.is_empty());
        assert!(artifact.universal_apk.is_none());
    }

    #[test]
    fn test_signing_variants_with_flavour() {
        let map = map_build_artifacts(&[
            "app-demo-debug-unsigned.apk",
            "app-demo-debug-bitrise-signed.apk",
        ]);

        let artifact = map.lookup("app", "debug", "demo").unwrap();
        assert_eq!(artifact.apk.as_deref(), Some("app-demo-debug-unsigned.apk"));
    }

    #[test]
    fn test_split_by_density_and_two_flavours() {
        let full = [
            "app-minApi21-full-hdpi-debug.apk",
            "app-minApi21-full-ldpi-debug.apk",
            "app-minApi21-full-mdpi-debug.apk",
        ];
        let demo = [
            "app-minApi21-demo-universal-debug.apk",
            "app-minApi21-demo-xhdpi-debug.apk",
            "app-minApi21-demo-xxhdpi-debug.apk",
            "app-minApi21-demo-xxxhdpi-debug.apk",
        ];
        let paths: Vec<&str> = full.iter().chain(demo.iter()).copied().collect();

        let map = map_build_artifacts(&paths);

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.lookup("app", "debug", "minApi21-demo"),
            Some(&Artifact {
                split: strings(&demo),
                universal_apk: Some("app-minApi21-demo-universal-debug.apk".to_string()),
                ..Artifact::default()
            })
        );
        assert_eq!(
            map.lookup("app", "debug", "minApi21-full"),
            Some(&Artifact {
                split: strings(&full),
                ..Artifact::default()
            })
        );
    }

    #[test]
    fn test_aab_joins_split_bucket() {
        let map = map_build_artifacts(&[
            "app-minApi21-demo-universal-debug.apk",
            "app-minApi21-demo-xhdpi-debug.apk",
            "app-minApi21-demo-debug.aab",
        ]);

        assert_eq!(map.len(), 1);
        let artifact = map.lookup("app", "debug", "minApi21-demo").unwrap();
        assert_eq!(artifact.aab.as_deref(), Some("app-minApi21-demo-debug.aab"));
        assert_eq!(artifact.split.len(), 2);
    }

    #[test]
    fn test_first_aab_wins() {
        let map = map_build_artifacts(&["out/app-release.aab", "other/app-release.aab"]);
        let artifact = map.lookup("app", "release", "").unwrap();
        assert_eq!(artifact.aab.as_deref(), Some("out/app-release.aab"));
    }

    #[test]
    fn test_first_universal_apk_wins() {
        let paths = ["a/app-universal-debug.apk", "b/app-universal-debug.apk"];
        let map = map_build_artifacts(&paths);

        let artifact = map.lookup("app", "debug", "").unwrap();
        assert_eq!(artifact.split, strings(&paths));
        assert_eq!(artifact.universal_apk.as_deref(), Some("a/app-universal-debug.apk"));
    }

    #[test]
    fn test_empty_listing() {
        let map = map_build_artifacts(&[] as &[&str]);
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_skipped_signing_variant_does_not_replace_universal() {
        let map = map_build_artifacts(&[
            "app-minApi24-full-release-bitrise-signed.aab",
            "app-minApi24-full-universal-release-bitrise-signed.apk",
            "app-minApi24-full-universal-release.apk",
        ]);

        let artifact = map.lookup("app", "release", "minApi24-full").unwrap();
        assert_eq!(
            artifact,
            &Artifact {
                aab: Some("app-minApi24-full-release-bitrise-signed.aab".to_string()),
                split: vec!["app-minApi24-full-universal-release-bitrise-signed.apk".to_string()],
                universal_apk: Some(
                    "app-minApi24-full-universal-release-bitrise-signed.apk".to_string(),
                ),
                ..Artifact::default()
            }
        );
    }

    #[test]
    fn test_same_split_in_other_directory_is_kept() {
        let map = map_build_artifacts(&["a/app-hdpi-debug.apk", "b/app-hdpi-debug-unsigned.apk"]);
        let artifact = map.lookup("app", "debug", "").unwrap();
        assert_eq!(artifact.split.len(), 2);
    }

    #[test]
    fn test_find_same_artifact() {
        let cases = [
            (
                "app-minApi21-demo-debug.apk",
                "app-minApi21-demo-debug-bitrise-signed.apk",
            ),
            (
                "app-minApi21-demo-debug-bitrise-signed.apk",
                "app-minApi21-demo-debug.apk",
            ),
            (
                "app-minApi21-demo-debug-unsigned.apk",
                "app-minApi21-demo-debug.apk",
            ),
        ];

        for (path, candidate) in cases {
            assert_eq!(find_same_artifact(path, &[candidate]), Some(candidate), "{path}");
        }
    }

    #[test]
    fn test_find_same_artifact_prefers_unsuffixed() {
        let pool = [
            "out/app-hdpi-debug-bitrise-signed.apk",
            "out/app-hdpi-debug-unsigned.apk",
            "out/app-hdpi-debug.apk",
        ];
        assert_eq!(
            find_same_artifact("out/app-hdpi-debug-unsigned.apk", &pool),
            Some("out/app-hdpi-debug.apk")
        );
        assert_eq!(
            find_same_artifact("out/app-hdpi-debug.apk", &pool[..2]),
            Some("out/app-hdpi-debug-unsigned.apk")
        );
    }

    #[test]
    fn test_find_same_artifact_none() {
        assert_eq!(find_same_artifact("app-hdpi-debug.apk", &["app-mdpi-debug.apk"]), None);
        assert_eq!(find_same_artifact("app-hdpi-debug.apk", &[] as &[&str]), None);
        assert_eq!(find_same_artifact("app-debug.apk", &["app-debug.aab"]), None);
    }

    #[test]
    fn test_create_split_artifact_meta() {
        let paths = [
            "app-arm64-v8a-debug.apk",
            "app-hdpiArmeabi-v7a-debug.apk",
            "app-mdpiX86-debug.apk",
            "app-xhdpiX86_64-debug.apk",
        ];

        let artifact = create_split_artifact_meta("app-mdpiX86-debug.apk", &paths).unwrap();
        assert_eq!(artifact.split, strings(&paths));
        assert!(artifact.universal_apk.is_none());
    }

    #[test]
    fn test_create_split_artifact_meta_bitrise_signed_reference() {
        let paths = [
            "app-minApi21-demo-universal-debug.apk",
            "app-minApi21-demo-xhdpi-debug.apk",
            "app-minApi21-demo-xxhdpi-debug.apk",
            "app-minApi21-demo-xxxhdpi-debug.apk",
            "app-minApi21-demo-xhdpi-debug-bitrise-signed.apk",
            "app-minApi21-demo-debug.aab",
        ];

        let reference = "app-minApi21-demo-xhdpi-debug-bitrise-signed.apk";
        let artifact = create_split_artifact_meta(reference, &paths).unwrap();

        assert_eq!(
            artifact,
            Artifact {
                apk: None,
                aab: Some("app-minApi21-demo-debug.aab".to_string()),
                split: strings(&paths[..4]),
                universal_apk: Some("app-minApi21-demo-universal-debug.apk".to_string()),
            }
        );
    }

    #[test]
    fn test_create_split_artifact_meta_not_mapped() {
        let err = create_split_artifact_meta("app-release.aab", &["app-debug.apk"]).unwrap_err();

        assert_eq!(err.code, ErrorCode::ArtifactNotMapped);
        assert!(err.message.contains("app-release.aab"));
        assert!(err.context.unwrap().contains("\"debug\""));
    }

    #[test]
    fn test_artifact_json_field_names() {
        let artifact = Artifact {
            apk: None,
            aab: Some("app-release.aab".to_string()),
            split: vec!["app-universal-release.apk".to_string()],
            universal_apk: Some("app-universal-release.apk".to_string()),
        };

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "apk": "",
                "aab": "app-release.aab",
                "split": ["app-universal-release.apk"],
                "universal": "app-universal-release.apk",
            })
        );

        let parsed: Artifact = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, artifact);
    }

    #[test]
    fn test_artifact_null_fields() {
        let json = serde_json::json!({
            "apk": "app-release.apk",
            "aab": null,
            "split": null,
            "universal": "",
        });

        let parsed: Artifact = serde_json::from_value(json).unwrap();
        assert_eq!(
            parsed,
            Artifact {
                apk: Some("app-release.apk".to_string()),
                ..Artifact::default()
            }
        );
        assert_eq!(serde_json::to_value(&parsed).unwrap()["split"], serde_json::json!([]));
    }

    #[test]
    fn test_artifact_map_nested_serialization() {
        let map = map_build_artifacts(&["app-debug.apk", "app-demo-release.aab"]);
        let json = serde_json::to_value(&map).unwrap();

        assert_eq!(json["app"]["debug"][""]["apk"], "app-debug.apk");
        assert_eq!(json["app"]["release"]["demo"]["aab"], "app-demo-release.aab");
    }

    #[test]
    fn test_artifact_key_display() {
        assert_eq!(ArtifactKey::new("app", "debug", "").to_string(), "app/debug/");
        assert_eq!(
            ArtifactKey::new("app", "release", "minApi21-demo").to_string(),
            "app/release/minApi21-demo"
        );
    }

    const BUILD_OUTPUTS: &[&str] = &[
        "app-demo-hdpi-debug.apk",
        "app-demo-xhdpi-debug.apk",
        "app-demo-universal-debug.apk",
        "app-demo-debug.aab",
        "app-full-release.apk",
        "app-full-release.aab",
        "lib-arm64-v8a-release.apk",
        "lib-x86-release.apk",
    ];

    proptest! {
        #[test]
        fn signing_suffix_does_not_affect_sameness(
            base in "app(-[a-z]{1,6}){1,3}",
            reference_suffix in prop::sample::select(vec!["", "-unsigned", "-bitrise-signed"]),
            pool_suffix in prop::sample::select(vec!["", "-unsigned", "-bitrise-signed"]),
        ) {
            let reference = format!("deploy/{base}{reference_suffix}.apk");
            let pool = vec![
                "deploy/other-release.apk".to_string(),
                format!("deploy/{base}{pool_suffix}.apk"),
            ];

            prop_assert_eq!(
                find_same_artifact(&reference, pool.as_slice()),
                Some(pool[1].as_str())
            );
        }

        #[test]
        fn permuting_input_keeps_bucket_membership(
            shuffled in Just(BUILD_OUTPUTS.to_vec()).prop_shuffle(),
        ) {
            let reference = map_build_artifacts(BUILD_OUTPUTS);
            let permuted = map_build_artifacts(shuffled.as_slice());

            prop_assert_eq!(reference.len(), permuted.len());
            for (key, expected) in reference.iter() {
                let got = permuted.get(key).unwrap();
                prop_assert_eq!(&got.apk, &expected.apk);
                prop_assert_eq!(&got.aab, &expected.aab);
                prop_assert_eq!(&got.universal_apk, &expected.universal_apk);

                let expected_order: Vec<String> = shuffled
                    .iter()
                    .filter(|p| {
                        let info = parse_artifact_path(p);
                        info.key() == *key && info.is_split()
                    })
                    .map(|p| (*p).to_string())
                    .collect();
                prop_assert_eq!(&got.split, &expected_order);
            }
        }
    }
}
