//! Errors raised while constructing circuit elements.

use thiserror::Error;

/// Errors from building an [`crate::Element`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// A kind that never has a meaningful value (`Wire`, `Diode`, plain
    /// `Ground`) was given one anyway.
    #[error("{kind:?} elements do not take a value, but one was supplied")]
    ValueNotApplicable {
        /// The offending element kind.
        kind: crate::element::ElementKind,
    },
}
