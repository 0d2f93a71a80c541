//! Error types for the Naka coefficient tracker.
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakeError {
    #[error("empty stake distribution")] EmptyDistribution,
    #[error("malformed weight: {0}")] MalformedWeight(String),
    #[error("invalid threshold: {0}")] InvalidThreshold(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated buffer: need {needed} bytes, got {got}")] TruncatedBuffer { needed: usize, got: usize },
    #[error("invalid hex payload: {0}")] InvalidHex(String),
    #[error("pagination limit of {max_pages} pages exceeded")] PaginationLimitExceeded { max_pages: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("source unreachable: {0}")] SourceUnreachable(String),
    #[error("source error: {0}")] SourceError(String),
    #[error("deadline of {0:?} exceeded")] Timeout(Duration),
    #[error(transparent)] Stake(#[from] StakeError),
    #[error(transparent)] Decode(#[from] DecodeError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("unknown network: {0}")] UnknownNetwork(String),
}

#[derive(Error, Debug)]
pub enum NakaError {
    #[error(transparent)] Stake(#[from] StakeError),
    #[error(transparent)] Decode(#[from] DecodeError),
    #[error(transparent)] Adapter(#[from] AdapterError),
    #[error(transparent)] Tracker(#[from] TrackerError),
    #[error("config: {0}")] Config(String),
}
