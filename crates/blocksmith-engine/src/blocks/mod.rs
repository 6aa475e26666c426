//! The block decorators.
//!
//! Each block exposes a single `decorate` entry point that takes the block's
//! root element and never lets an error escape: failures are logged and the
//! tree is left in whatever partial state was reached, so one broken block
//! cannot take the page down with it.

pub mod facts_figures;
pub mod hero_teaser;

use blocksmith_dom::{DomError, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecorateError {
    #[error("block root {0:?} is not an element")]
    BlockNotAnElement(NodeId),
    #[error(transparent)]
    Dom(#[from] DomError),
}
