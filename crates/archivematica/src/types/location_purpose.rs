//! Storage location purpose codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError, allowed_values};

/// What a Storage Service location is used for.
///
/// Locations are identified on the wire by two-letter codes; parsing accepts
/// them in any case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LocationPurpose {
    AipRecovery,
    AipStorage,
    CurrentlyProcessing,
    DipStorage,
    SwordDeposit,
    StorageServiceInternal,
    Backlog,
    TransferSource,
    Replicator,
}

impl LocationPurpose {
    pub const ALL: [LocationPurpose; 9] = [
        LocationPurpose::AipRecovery,
        LocationPurpose::AipStorage,
        LocationPurpose::CurrentlyProcessing,
        LocationPurpose::DipStorage,
        LocationPurpose::SwordDeposit,
        LocationPurpose::StorageServiceInternal,
        LocationPurpose::Backlog,
        LocationPurpose::TransferSource,
        LocationPurpose::Replicator,
    ];

    /// Returns the two-letter purpose code.
    pub fn code(&self) -> &'static str {
        match self {
            LocationPurpose::AipRecovery => "AR",
            LocationPurpose::AipStorage => "AS",
            LocationPurpose::CurrentlyProcessing => "CP",
            LocationPurpose::DipStorage => "DS",
            LocationPurpose::SwordDeposit => "SD",
            LocationPurpose::StorageServiceInternal => "SS",
            LocationPurpose::Backlog => "BL",
            LocationPurpose::TransferSource => "TS",
            LocationPurpose::Replicator => "RP",
        }
    }

    /// Returns the descriptive name of the purpose.
    pub fn name(&self) -> &'static str {
        match self {
            LocationPurpose::AipRecovery => "AIP_RECOVERY",
            LocationPurpose::AipStorage => "AIP_STORAGE",
            LocationPurpose::CurrentlyProcessing => "CURRENTLY_PROCESSING",
            LocationPurpose::DipStorage => "DIP_STORAGE",
            LocationPurpose::SwordDeposit => "SWORD_DEPOSIT",
            LocationPurpose::StorageServiceInternal => "STORAGE_SERVICE_INTERNAL",
            LocationPurpose::Backlog => "BACKLOG",
            LocationPurpose::TransferSource => "TRANSFER_SOURCE",
            LocationPurpose::Replicator => "REPLICATOR",
        }
    }
}

impl fmt::Display for LocationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LocationPurpose {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                InvalidInputError::LocationPurpose {
                    value: s.to_string(),
                    allowed: allowed_values(&Self::ALL),
                }
                .into()
            })
    }
}

impl TryFrom<String> for LocationPurpose {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LocationPurpose> for String {
    fn from(p: LocationPurpose) -> Self {
        p.code().to_string()
    }
}
