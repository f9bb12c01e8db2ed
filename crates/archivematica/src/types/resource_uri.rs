//! Storage Service resource URIs.

use std::fmt;

/// Storage Service resources that are referenced by URI in request bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Package,
    Pipeline,
    Location,
    Space,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Package => "file",
            ResourceKind::Pipeline => "pipeline",
            ResourceKind::Location => "location",
            ResourceKind::Space => "space",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a UUID as a host-less resource URI, e.g. `/api/v2/location/<uuid>/`.
///
/// Values that already start with `/api/v2/` are returned unchanged.
///
/// ```
/// use archivematica::{ResourceKind, resource_uri};
///
/// assert_eq!(resource_uri(ResourceKind::Space, "ABC"), "/api/v2/space/abc/");
/// assert_eq!(resource_uri(ResourceKind::Space, "/api/v2/space/x/"), "/api/v2/space/x/");
/// ```
pub fn resource_uri(kind: ResourceKind, uuid: &str) -> String {
    let prefix = "/api/v2/";
    if uuid
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    {
        return uuid.to_string();
    }
    format!("/api/v2/{}/{}/", kind, uuid.to_lowercase())
}
