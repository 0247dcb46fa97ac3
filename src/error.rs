use crate::{backend::ResourceKind, de::ParseError, BackendError};

/// Errors which may end a [Mesh::load](crate::Mesh::load).
///
/// Any of these leaves no GPU resources behind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("could not open mesh file: {0}")]
    Io(#[from] std::io::Error),
}

/// The render backend refused to create a buffer for a group.
#[derive(Debug, thiserror::Error)]
#[error("could not create {kind} for group {group}: {source}")]
pub struct ResourceError {
    pub kind: ResourceKind,
    pub group: usize,
    #[source]
    pub source: BackendError,
}
