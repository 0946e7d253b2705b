use ulid::Ulid;

use crate::model::BlockArgs;

#[derive(Debug)]
pub enum EngineError {
    InvalidBlock(&'static str),
    NoMatchingBlock(BlockArgs),
    AmbiguousMatch { args: BlockArgs, count: usize },
    UnknownBlock(Ulid),
    NothingToMerge,
    DragInProgress,
    NoDragInProgress,
    LimitExceeded(&'static str),
    WalError(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidBlock(reason) => write!(f, "invalid block: {reason}"),
            EngineError::NoMatchingBlock(args) => write!(f, "no block matches {args}"),
            EngineError::AmbiguousMatch { args, count } => {
                write!(f, "{count} blocks match {args}; expected exactly one")
            }
            EngineError::UnknownBlock(id) => write!(f, "unknown block: {id}"),
            EngineError::NothingToMerge => write!(f, "nothing to merge: collection is empty"),
            EngineError::DragInProgress => write!(f, "a drag is already in progress"),
            EngineError::NoDragInProgress => write!(f, "no drag in progress"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::WalError(e) => write!(f, "WAL error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
