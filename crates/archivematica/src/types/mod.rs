//! Validated value types.
//!
//! Closed sets such as transfer types and location purposes are enums, so a
//! bad value is rejected when it is parsed, before any request is built.

mod location_purpose;
mod package_type;
mod resource_uri;
mod service_url;
mod transfer_type;

pub use location_purpose::LocationPurpose;
pub use package_type::{PackageType, ReingestType};
pub use resource_uri::{ResourceKind, resource_uri};
pub use service_url::ServiceUrl;
pub use transfer_type::TransferType;
