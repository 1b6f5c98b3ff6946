use thiserror::Error;

use crate::terms::Term;

/// Errors raised at the boundary of the arithmetic theory when it is handed a term it cannot
/// work with.
///
/// These are not conflicts; a conflict is a regular outcome of [`Theory::check`] and is reported
/// through the [`OutputChannel`].
///
/// [`Theory::check`]: crate::Theory::check
/// [`OutputChannel`]: crate::OutputChannel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithError {
    /// The term is not a relational atom (or the negation of one) over arithmetic terms.
    #[error("`{0}` is not an arithmetic atom")]
    NotAnAtom(Term),
    /// The term is not an arithmetic term at all, e.g. a boolean connective in a sum.
    #[error("`{0}` is not an arithmetic term")]
    NotArithmetic(Term),
    /// A literal was asserted or explained before the theory was told about its atom.
    #[error("the literal `{0}` is unknown to the constraint database")]
    UnknownLiteral(Term),
    /// The term mentions a leaf which has no value in the current model.
    #[error("`{0}` has no value in the current model")]
    NoValue(Term),
}
