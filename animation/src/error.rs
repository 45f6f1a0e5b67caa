use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No accessor is registered for the target type, the target does not access itself and no
    /// declared parent type resolves either.
    #[error("No accessor resolves for target type `{type_name}`")]
    AccessorNotFound { type_name: &'static str },

    #[error("{count} target values exceed the combined attribute limit of {limit}")]
    TooManyChannels { count: usize, limit: usize },

    #[error("A tween needs at least one target value")]
    NoChannels,
}

pub type Result<T> = std::result::Result<T, Error>;
