use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Storage key of the form `<namespace>/<uuid>.<ext>`.
///
/// The UUID is random (v4), so two uploads never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn generate(namespace: &str, extension: &str) -> Self {
        Self::with_id(namespace, Uuid::new_v4(), extension)
    }

    pub fn with_id(namespace: &str, id: Uuid, extension: &str) -> Self {
        let namespace = namespace.trim_matches('/');
        let extension = extension.trim_start_matches('.');
        if namespace.is_empty() {
            Self(format!("{}.{}", id, extension))
        } else {
            Self(format!("{}/{}.{}", namespace, id, extension))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
