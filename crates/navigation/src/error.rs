use foundation::math::ProjectionError;

use crate::source::FetchError;

/// Why a level load ended in `NavState::Error`.
#[derive(Debug)]
pub enum LoadError {
    Fetch(FetchError),
    Degenerate(ProjectionError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Fetch(err) => write!(f, "fetch failed: {err}"),
            LoadError::Degenerate(err) => write!(f, "projection failed: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch(err) => Some(err),
            LoadError::Degenerate(err) => Some(err),
        }
    }
}

impl From<FetchError> for LoadError {
    fn from(err: FetchError) -> Self {
        LoadError::Fetch(err)
    }
}

impl From<ProjectionError> for LoadError {
    fn from(err: ProjectionError) -> Self {
        LoadError::Degenerate(err)
    }
}
