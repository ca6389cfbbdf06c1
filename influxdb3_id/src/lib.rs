//! Opaque identifiers for the organization/bucket side of a DBRP mapping.
//!
//! Identifiers are treated as raw bytes: they are compared byte-for-byte and rendered as
//! lowercase hex. The empty identifier stands for "not set" and is what [`Default`] produces.
use std::fmt::Display;
use std::str::FromStr;

use bytes::Bytes;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Maximum number of bytes accepted for an identifier
pub const MAX_ID_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq)]
pub enum IdError {
    #[error("invalid hex identifier: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("identifier is {len} bytes, the maximum is {MAX_ID_LENGTH}")]
    TooLong { len: usize },
}

macro_rules! platform_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Bytes);

        impl $name {
            /// Build an identifier from raw bytes, rejecting anything over [`MAX_ID_LENGTH`]
            pub fn try_new(bytes: impl Into<Bytes>) -> Result<Self, IdError> {
                let bytes = bytes.into();
                if bytes.len() > MAX_ID_LENGTH {
                    return Err(IdError::TooLong { len: bytes.len() });
                }
                Ok(Self(bytes))
            }

            /// Build an identifier from a static byte slice
            ///
            /// # Panics
            ///
            /// Panics if `bytes` is longer than [`MAX_ID_LENGTH`]
            pub fn from_static(bytes: &'static [u8]) -> Self {
                Self::try_new(bytes).expect("static identifier exceeds MAX_ID_LENGTH")
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// `true` for the unset identifier
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl TryFrom<Vec<u8>> for $name {
            type Error = IdError;

            fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = IdError;

            fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
                Self::try_new(Bytes::copy_from_slice(value))
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_new(hex::decode(s)?)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", hex::encode(&self.0))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&hex::encode(&self.0))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

platform_id!(
    /// Identifies the organization that owns a bucket
    OrgId
);

platform_id!(
    /// Identifies the bucket a DBRP mapping routes to
    BucketId
);
