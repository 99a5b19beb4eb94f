//! Request envelope validation
//!
//! An envelope nests as `request` → `control` + `operation`, and
//! `operation` → `authentication` + `content` → `function`, where
//! `function` carries one of `getapisession`, `readbyname` or `create`.
//! [`validate`] walks those levels in a fixed order and reports only the
//! first violation.
//!
//! ```
//! use xmlgate::envelope::{validate, EnvelopeError};
//! use xmlgate::tree::parse_tree;
//! # fn main() -> Result<(), xmlgate::Error> {
//! let tree = parse_tree("<request><control/></request>")?;
//! assert_eq!(validate(&tree), Err(EnvelopeError::MissingControl));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod request;
mod shape;

pub use error::{ControlField, EnvelopeError};
pub use request::{
    Control, Credentials, FunctionCall, FunctionKind, ReadByName, ValidatedRequest,
};

use tracing::instrument;

use crate::tree::Tree;
use shape::EnvelopeShape;

/// Outcome of validating one request
pub type Outcome = Result<ValidatedRequest, EnvelopeError>;

/// Validate a parsed request tree
///
/// Pure apart from logging: the same tree always yields the same outcome.
#[instrument(level = "debug", skip_all, fields(root = tree.root_name()))]
pub fn validate(tree: &Tree) -> Outcome {
    EnvelopeShape::decode(tree).check()
}
