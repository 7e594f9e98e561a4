// Copyright 2023 Remi Bernotavicius

use std::path::PathBuf;

/// Everything that can go wrong talking to the underlying SQLite file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("couldn't open database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("couldn't apply schema: {0}")]
    Schema(Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("database path {0:?} is not valid UTF-8")]
    Path(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the recipe book has no recipes")]
    EmptyCatalog,
    #[error("no {kind} with id {id}")]
    NotFound { kind: &'static str, id: i32 },
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] StorageError),
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<i32>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::StorageUnavailable(e)
    }
}

impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        Self::StorageUnavailable(e.into())
    }
}

impl From<diesel::ConnectionError> for Error {
    fn from(e: diesel::ConnectionError) -> Self {
        Self::StorageUnavailable(e.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::StorageUnavailable(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn not_found_message() {
    let e = Error::not_found("recipe", 7);
    assert_eq!(e.to_string(), "no recipe with id 7");
}

#[test]
fn storage_errors_keep_their_source() {
    use std::error::Error as _;

    let e = Error::from(diesel::result::Error::NotFound);
    assert!(matches!(e, Error::StorageUnavailable(StorageError::Query(_))));
    assert!(e.source().is_some());
}
