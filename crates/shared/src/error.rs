use thiserror::Error;

use crate::domain::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("duplicate element id '{0}'")]
    DuplicateId(String),
    #[error("no element with id '{0}'")]
    MissingId(String),
    #[error("cannot append {0:?} to itself or its descendant")]
    CyclicAppend(NodeId),
}
