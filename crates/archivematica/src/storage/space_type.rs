//! Storage Service space backends and the fields each one takes.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};

const BASE_REQUIRED: &[&str] = &["path", "staging_path"];
const BASE_OPTIONAL: &[&str] = &["size"];

/// A space backend, keyed by its Storage Service access protocol code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpaceType {
    LocalFilesystem,
    Arkivum,
    DspaceRest,
    DspaceSword,
    DuraCloud,
    Fedora,
    Lockss,
    NetworkFileSystem,
    PipelineLocalFs,
    Swift,
    WriteOnlyReplica,
}

impl SpaceType {
    pub const ALL: [SpaceType; 11] = [
        SpaceType::LocalFilesystem,
        SpaceType::Arkivum,
        SpaceType::DspaceRest,
        SpaceType::DspaceSword,
        SpaceType::DuraCloud,
        SpaceType::Fedora,
        SpaceType::Lockss,
        SpaceType::NetworkFileSystem,
        SpaceType::PipelineLocalFs,
        SpaceType::Swift,
        SpaceType::WriteOnlyReplica,
    ];

    /// The `access_protocol` code sent to the Storage Service.
    pub fn code(&self) -> &'static str {
        match self {
            SpaceType::LocalFilesystem => "FS",
            SpaceType::Arkivum => "ARKIVUM",
            SpaceType::DspaceRest => "DSPC_RST",
            SpaceType::DspaceSword => "DSPACE",
            SpaceType::DuraCloud => "DC",
            SpaceType::Fedora => "FEDORA",
            SpaceType::Lockss => "LOM",
            SpaceType::NetworkFileSystem => "NFS",
            SpaceType::PipelineLocalFs => "PIPE_FS",
            SpaceType::Swift => "SWIFT",
            SpaceType::WriteOnlyReplica => "REPLICA",
        }
    }

    /// The identifier this type is looked up by, e.g. `DuraCloud`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceType::LocalFilesystem => "LocalFilesystem",
            SpaceType::Arkivum => "Arkivum",
            SpaceType::DspaceRest => "DspaceRest",
            SpaceType::DspaceSword => "DspaceSword",
            SpaceType::DuraCloud => "DuraCloud",
            SpaceType::Fedora => "Fedora",
            SpaceType::Lockss => "Lockss",
            SpaceType::NetworkFileSystem => "NetworkFileSystem",
            SpaceType::PipelineLocalFs => "PipelineLocalFS",
            SpaceType::Swift => "Swift",
            SpaceType::WriteOnlyReplica => "WriteOnlyReplica",
        }
    }

    /// Human readable name, used in error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            SpaceType::LocalFilesystem => "Local Filesystem",
            SpaceType::Arkivum => "Arkivum",
            SpaceType::DspaceRest => "DSpace via REST API",
            SpaceType::DspaceSword => "Dspace via SWORD 2",
            SpaceType::DuraCloud => "DuraCloud",
            SpaceType::Fedora => "Fedora via SWORD 2",
            SpaceType::Lockss => "LOCKSS",
            SpaceType::NetworkFileSystem => "Networked Filesystem",
            SpaceType::PipelineLocalFs => "Pipeline Local Filesystem",
            SpaceType::Swift => "Swift",
            SpaceType::WriteOnlyReplica => "Write-Only Replica Staging on Local Filesystem",
        }
    }

    /// Fields that must be supplied when creating a space of this type.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            SpaceType::LocalFilesystem | SpaceType::WriteOnlyReplica => BASE_REQUIRED,
            SpaceType::Arkivum => &["path", "staging_path", "host"],
            SpaceType::DspaceRest => &[
                "path",
                "staging_path",
                "ds_rest_url",
                "ds_user",
                "ds_password",
                "ds_dip_collection",
                "ds_api_collection",
            ],
            SpaceType::DspaceSword => &[
                "path",
                "staging_path",
                "sd_iri",
                "user",
                "password",
                "metadata_policy",
                "archive_format",
            ],
            SpaceType::DuraCloud => &[
                "path",
                "staging_path",
                "host",
                "username",
                "password",
                "duraspace",
            ],
            SpaceType::Fedora => &[
                "path",
                "staging_path",
                "fedora_user",
                "fedora_password",
                "fedora_name",
            ],
            SpaceType::Lockss => &[
                "path",
                "staging_path",
                "sd_iri",
                "content_provider_id",
                "external_domain",
                "keep_local",
            ],
            SpaceType::NetworkFileSystem => &[
                "path",
                "staging_path",
                "remote_name",
                "remote_path",
                "version",
                "manually_mounted",
            ],
            SpaceType::PipelineLocalFs => &[
                "path",
                "staging_path",
                "remote_user",
                "remote_name",
                "assume_rsync_daemon",
            ],
            SpaceType::Swift => &[
                "path",
                "staging_path",
                "auth_url",
                "auth_version",
                "username",
                "password",
                "container",
                "tenant",
            ],
        }
    }

    /// Fields that are passed through when supplied.
    pub fn optional_fields(&self) -> &'static [&'static str] {
        match self {
            SpaceType::Arkivum => &["size", "remote_user", "remote_name"],
            SpaceType::DspaceRest => &[
                "size",
                "as_url",
                "as_user",
                "as_password",
                "as_repository",
                "as_archival_object",
                "upload_to_tsm",
                "verify_ssl",
            ],
            SpaceType::PipelineLocalFs => &["size", "rsync_password"],
            SpaceType::Swift => &["size", "region"],
            _ => BASE_OPTIONAL,
        }
    }

    /// Required fields missing from `fields`, in declaration order.
    pub fn missing_fields(&self, fields: &Map<String, Value>) -> Vec<String> {
        self.required_fields()
            .iter()
            .filter(|f| !fields.contains_key(**f))
            .map(|f| f.to_string())
            .collect()
    }

    /// Build the creation payload.
    ///
    /// Every required field must be present. Fields this type does not know
    /// are dropped, and `access_protocol` is set to [`SpaceType::code`].
    pub fn payload(&self, fields: &Map<String, Value>) -> Result<Map<String, Value>, Error> {
        let missing = self.missing_fields(fields);
        if !missing.is_empty() {
            return Err(InvalidInputError::MissingSpaceFields {
                space: self.display_name().to_string(),
                missing,
            }
            .into());
        }

        let mut payload: Map<String, Value> = fields
            .iter()
            .filter(|(key, _)| self.accepts(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        payload.insert(
            "access_protocol".to_string(),
            Value::String(self.code().to_string()),
        );
        Ok(payload)
    }

    fn accepts(&self, field: &str) -> bool {
        self.required_fields().contains(&field) || self.optional_fields().contains(&field)
    }
}

impl fmt::Display for SpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpaceType {
    type Err = Error;

    /// Look up a space type by name (`DuraCloud`) or code (`DC`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SpaceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s) || t.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                InvalidInputError::SpaceType {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn required_and_optional_never_overlap() {
        for space in SpaceType::ALL {
            for field in space.required_fields() {
                assert!(
                    !space.optional_fields().contains(field),
                    "{} lists {} twice",
                    space,
                    field
                );
            }
        }
    }

    #[test]
    fn every_type_needs_path_and_staging_path() {
        for space in SpaceType::ALL {
            assert!(space.required_fields().starts_with(BASE_REQUIRED));
        }
    }

    #[test]
    fn lookup_by_name_or_code() {
        assert_eq!("DuraCloud".parse::<SpaceType>().unwrap(), SpaceType::DuraCloud);
        assert_eq!("pipe_fs".parse::<SpaceType>().unwrap(), SpaceType::PipelineLocalFs);
        assert_eq!("NFS".parse::<SpaceType>().unwrap(), SpaceType::NetworkFileSystem);
        let err = "Tape".parse::<SpaceType>().unwrap_err();
        assert_eq!(err.to_string(), "invalid input: there is no space type called Tape");
    }

    #[test]
    fn payload_filters_unknown_fields_and_sets_protocol() {
        let payload = SpaceType::Swift
            .payload(&fields(json!({
                "path": "/", "staging_path": "/tmp", "auth_url": "http://auth",
                "auth_version": "2", "username": "u", "password": "p",
                "container": "c", "tenant": "t", "region": "r", "colour": "blue"
            })))
            .unwrap();

        assert_eq!(payload["access_protocol"], json!("SWIFT"));
        assert_eq!(payload["region"], json!("r"));
        assert!(!payload.contains_key("colour"));
    }

    #[test]
    fn payload_requires_every_required_field() {
        let err = SpaceType::NetworkFileSystem
            .payload(&fields(json!({"path": "/", "remote_name": "x"})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: missing required fields for a Networked Filesystem space: \
             staging_path, remote_path, version, manually_mounted"
        );
    }

    #[test]
    fn optional_defaults_to_size() {
        assert_eq!(SpaceType::Fedora.optional_fields(), &["size"]);
        assert_eq!(SpaceType::LocalFilesystem.code(), "FS");
    }
}
