//! Package and reingest types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError, allowed_values};

/// The type of a package held by the Storage Service.
///
/// Parsing ignores ASCII case, so `"aip"` and `"AIP"` are both accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PackageType {
    /// Archival Information Package.
    Aip,
    /// Archival Information Collection.
    Aic,
    /// Dissemination Information Package.
    Dip,
    Transfer,
    /// Submission Information Package.
    Sip,
    File,
    Deposit,
}

impl PackageType {
    pub const ALL: [PackageType; 7] = [
        PackageType::Aip,
        PackageType::Aic,
        PackageType::Dip,
        PackageType::Transfer,
        PackageType::Sip,
        PackageType::File,
        PackageType::Deposit,
    ];

    /// Returns the Storage Service code for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Aip => "AIP",
            PackageType::Aic => "AIC",
            PackageType::Dip => "DIP",
            PackageType::Transfer => "transfer",
            PackageType::Sip => "SIP",
            PackageType::File => "file",
            PackageType::Deposit => "deposit",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                InvalidInputError::PackageType {
                    value: s.to_string(),
                    allowed: allowed_values(&Self::ALL),
                }
                .into()
            })
    }
}

impl TryFrom<String> for PackageType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PackageType> for String {
    fn from(t: PackageType) -> Self {
        t.as_str().to_string()
    }
}

/// How much of an AIP to run back through the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReingestType {
    #[default]
    Full,
    Objects,
    MetadataOnly,
}

impl ReingestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReingestType::Full => "FULL",
            ReingestType::Objects => "OBJECTS",
            ReingestType::MetadataOnly => "METADATA_ONLY",
        }
    }
}

impl fmt::Display for ReingestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReingestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FULL" => Ok(ReingestType::Full),
            "OBJECTS" => Ok(ReingestType::Objects),
            "METADATA_ONLY" => Ok(ReingestType::MetadataOnly),
            other => Err(InvalidInputError::ReingestType {
                value: other.to_string(),
            }
            .into()),
        }
    }
}

impl TryFrom<String> for ReingestType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ReingestType> for String {
    fn from(t: ReingestType) -> Self {
        t.as_str().to_string()
    }
}
