//! Transfer type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError, allowed_values};

/// The kind of content a transfer carries, as understood by Archivematica.
///
/// Parsing is exact: Archivematica's codes are lowercase with underscores.
///
/// # Example
///
/// ```
/// use archivematica::TransferType;
///
/// let t: TransferType = "zipped_bag".parse().unwrap();
/// assert_eq!(t, TransferType::ZippedBag);
/// assert!("bad_type".parse::<TransferType>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransferType {
    Standard,
    ZippedDirectory,
    UnzippedBag,
    ZippedBag,
    Dspace,
    DiskImage,
    Dataverse,
}

impl TransferType {
    /// All transfer types, in the order Archivematica documents them.
    pub const ALL: [TransferType; 7] = [
        TransferType::Standard,
        TransferType::ZippedDirectory,
        TransferType::UnzippedBag,
        TransferType::ZippedBag,
        TransferType::Dspace,
        TransferType::DiskImage,
        TransferType::Dataverse,
    ];

    /// Returns the wire code for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Standard => "standard",
            TransferType::ZippedDirectory => "zipped_directory",
            TransferType::UnzippedBag => "unzipped_bag",
            TransferType::ZippedBag => "zipped_bag",
            TransferType::Dspace => "dspace",
            TransferType::DiskImage => "disk_image",
            TransferType::Dataverse => "dataverse",
        }
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                InvalidInputError::TransferType {
                    value: s.to_string(),
                    allowed: allowed_values(&Self::ALL),
                }
                .into()
            })
    }
}

impl TryFrom<String> for TransferType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TransferType> for String {
    fn from(t: TransferType) -> Self {
        t.as_str().to_string()
    }
}
