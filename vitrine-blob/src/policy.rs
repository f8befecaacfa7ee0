use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BlobError, FileUpload, ValidationError};

const MIB: u64 = 1024 * 1024;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

const MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/webm",
    "audio/mp3",
    "audio/wav",
    "audio/ogg",
];

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// The closed set of storage buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Images,
    Media,
    Documents,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Images, Bucket::Media, Bucket::Documents];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Images => "images",
            Bucket::Media => "media",
            Bucket::Documents => "documents",
        }
    }

    pub fn policy(&self) -> BucketPolicy {
        match self {
            Bucket::Images => BucketPolicy {
                bucket: *self,
                max_bytes: 5 * MIB,
                allowed_types: IMAGE_TYPES,
            },
            Bucket::Media => BucketPolicy {
                bucket: *self,
                max_bytes: 50 * MIB,
                allowed_types: MEDIA_TYPES,
            },
            Bucket::Documents => BucketPolicy {
                bucket: *self,
                max_bytes: 10 * MIB,
                allowed_types: DOCUMENT_TYPES,
            },
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = BlobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "images" => Ok(Bucket::Images),
            "media" => Ok(Bucket::Media),
            "documents" => Ok(Bucket::Documents),
            other => Err(BlobError::UnknownBucket {
                name: other.to_string(),
            }),
        }
    }
}

/// Size and type limits of one bucket. Fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketPolicy {
    pub bucket: Bucket,
    pub max_bytes: u64,
    pub allowed_types: &'static [&'static str],
}

impl BucketPolicy {
    pub fn max_megabytes(&self) -> u64 {
        self.max_bytes / MIB
    }

    pub fn allows_type(&self, content_type: &str) -> bool {
        self.allowed_types.contains(&content_type)
    }

    /// Size is checked first; a size failure short-circuits the type check.
    pub fn check(&self, size: u64, content_type: &str) -> Result<(), ValidationError> {
        if size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                bucket: self.bucket.as_str(),
                limit_mb: self.max_megabytes(),
                size,
            });
        }

        if !self.allows_type(content_type) {
            return Err(ValidationError::TypeNotAllowed {
                bucket: self.bucket.as_str(),
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }
}

/// Accept or reject a file for a bucket. Pure, never panics.
pub fn validate(file: &FileUpload, bucket: Bucket) -> Result<(), ValidationError> {
    bucket.policy().check(file.size(), &file.content_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn policy_table_matches_limits() {
        assert_eq!(Bucket::Images.policy().max_bytes, 5 * MIB);
        assert_eq!(Bucket::Media.policy().max_bytes, 50 * MIB);
        assert_eq!(Bucket::Documents.policy().max_bytes, 10 * MIB);
        assert!(Bucket::Media.policy().allows_type("audio/ogg"));
        assert!(!Bucket::Images.policy().allows_type("video/mp4"));
    }

    #[test]
    fn oversized_document_mentions_limit() {
        let err = Bucket::Documents
            .policy()
            .check(12 * MIB, "application/pdf")
            .unwrap_err();
        assert!(err.to_string().contains("10MB"), "{err}");
    }

    #[test]
    fn size_failure_short_circuits_type_check() {
        let err = Bucket::Images
            .policy()
            .check(6 * MIB, "application/zip")
            .unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { limit_mb: 5, .. }));
    }

    #[test]
    fn exact_limit_is_accepted() {
        assert!(Bucket::Images.policy().check(5 * MIB, "image/png").is_ok());
    }

    #[test]
    fn bucket_names_round_trip() {
        for bucket in Bucket::ALL {
            assert_eq!(bucket.as_str().parse::<Bucket>().unwrap(), bucket);
        }
        assert!("avatars".parse::<Bucket>().is_err());
    }

    fn any_bucket() -> impl Strategy<Value = Bucket> {
        prop_oneof![Just(Bucket::Images), Just(Bucket::Media), Just(Bucket::Documents)]
    }

    proptest! {
        #[test]
        fn accepted_when_within_policy(bucket in any_bucket(), pick in any::<prop::sample::Index>(), frac in 0.0f64..=1.0) {
            let policy = bucket.policy();
            let content_type = policy.allowed_types[pick.index(policy.allowed_types.len())];
            let size = (policy.max_bytes as f64 * frac) as u64;
            prop_assert!(policy.check(size, content_type).is_ok());
        }

        #[test]
        fn rejected_with_message_when_outside_policy(bucket in any_bucket(), extra in 1u64..10_000_000, content_type in "[a-z]{3,8}/[a-z]{3,8}") {
            let policy = bucket.policy();
            let too_big = policy.check(policy.max_bytes + extra, policy.allowed_types[0]);
            prop_assert!(too_big.is_err());
            prop_assert!(!too_big.unwrap_err().to_string().is_empty());

            if !policy.allows_type(&content_type) {
                let wrong_type = policy.check(1, &content_type);
                prop_assert!(wrong_type.is_err());
                prop_assert!(!wrong_type.unwrap_err().to_string().is_empty());
            }
        }
    }
}
