use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaygroundError {
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    #[error("The emoji palette is empty")]
    EmptyPalette,
}

pub type Result<T, E = PlaygroundError> = core::result::Result<T, E>;
