//! Android build artifact classification
//!
//! This crate decodes Gradle output file names and groups the artifacts of
//! a deploy listing into build variants:
//! - Signing suffix and split token decoding
//! - `(module, build type, product flavour)` variant buckets
//! - Universal APK pairing for App Bundles
//! - Metadata attached to uploaded APKs and AABs
//!
//! # Example
//!
//! ```rust
//! use deploy_android::map_build_artifacts;
//!
//! let paths = [
//!     "out/app-hdpi-release.apk",
//!     "out/app-universal-release.apk",
//!     "out/app-release.aab",
//! ];
//! let mapping = map_build_artifacts(&paths);
//!
//! let artifact = mapping.lookup("app", "release", "").unwrap();
//! assert_eq!(artifact.aab.as_deref(), Some("out/app-release.aab"));
//! assert_eq!(artifact.split.len(), 2);
//! ```

#![warn(missing_docs)]

pub mod artifact;
pub mod file_name;
pub mod kind;
pub mod metadata;
pub mod signing;
pub mod split;
pub mod universal;

pub use artifact::{
    create_split_artifact_meta, find_same_artifact, map_build_artifacts, Artifact, ArtifactKey,
    ArtifactMap,
};
pub use file_name::{parse_artifact_path, ArtifactInfo};
pub use kind::{collect_android_artifacts, partition_artifacts, ArtifactKind, Partition};
pub use metadata::ArtifactMetadata;
pub use signing::{parse_signing_info, SigningInfo};
pub use split::{parse_split_info, SplitInfo};
pub use universal::{find_universal_apk_pair, universal_apk_base};
