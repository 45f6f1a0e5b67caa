use thiserror::Error;

use crate::BoneId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("A skeletal animation needs at least one key frame")]
    NoKeyFrames,

    #[error("Key frame `{name}` has a non finite time")]
    InvalidKeyFrameTime { name: String },

    #[error("A bone key holds at most 4 values (x, y, angle, length), got {count}")]
    TooManyKeyValues { count: usize },

    #[error("{0} is not part of this skeleton")]
    UnknownBone(BoneId),
}

pub type Result<T> = std::result::Result<T, Error>;
