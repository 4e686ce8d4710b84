use tagrecord_codec::Tag;

/// Errors raised by registries and by capabilities loading saved state.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A registry with this type name was already added.
    #[error("registry already exists: {0}")]
    DuplicateRegistry(String),

    /// No registry with this type name (and object type) exists.
    #[error("no registry for type {0}")]
    UnknownRegistry(String),

    /// A saved record lacks a field the capability requires.
    #[error("missing {tag} field {field:?} in saved record")]
    MissingField { field: &'static str, tag: Tag },

    /// A saved name does not resolve to a registered object.
    #[error("{name:?} is not registered in the {kind} registry")]
    UnknownObject { kind: String, name: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
