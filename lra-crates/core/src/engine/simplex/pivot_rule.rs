use std::fmt::Display;

/// Which violated basic variable the Simplex procedure repairs next.
///
/// Whatever the rule, the procedure falls back to Bland's rule (smallest index for both the
/// leaving and the entering variable) once a check has made more pivots than the configured
/// threshold, which guarantees termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PivotRule {
    /// The violated basic variable with the smallest index.
    MinimumIndex,
    /// The violated basic variable with the largest index.
    MaximumIndex,
    /// The violated basic variable with the shortest row, which keeps the cost of the pivot low;
    /// ties go to the smallest index.
    #[default]
    ShortestRow,
}

impl Display for PivotRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PivotRule::MinimumIndex => write!(f, "minimum-index"),
            PivotRule::MaximumIndex => write!(f, "maximum-index"),
            PivotRule::ShortestRow => write!(f, "shortest-row"),
        }
    }
}
