use crate::engine::simplex::PivotRule;
use crate::math::rational;
use crate::math::Rational;

/// Options which control the behaviour of [`TheoryArith`].
///
/// [`TheoryArith`]: super::TheoryArith
#[derive(Debug, Clone)]
pub struct ArithOptions {
    /// Which violated basic variable is repaired first.
    pub pivot_rule: PivotRule,
    /// The number of pivots in one check after which Bland's rule is used to prevent cycling.
    pub bland_threshold: u64,
    /// The number of restarts before the first tableau reset.
    pub initial_reset_period: u32,
    /// How much the number of restarts between tableau resets grows after every reset.
    pub reset_period_increment: u32,
    /// A scheduled reset only happens when the tableau has become this many times denser than
    /// it was right after the previous reset.
    pub reset_density_factor: f64,
    /// Whether literals implied by asserted bounds on the same variable are propagated.
    pub propagate_bounds: bool,
    /// Whether [`TheoryArith::presolve`] eliminates variables that no constraint mentions.
    ///
    /// [`TheoryArith::presolve`]: super::TheoryArith::presolve
    pub eliminate_unconstrained: bool,
    /// The value substituted for `δ` in models, unless a smaller value is needed to keep every
    /// bound satisfied.
    pub default_delta: Rational,
}

impl Default for ArithOptions {
    fn default() -> Self {
        ArithOptions {
            pivot_rule: PivotRule::default(),
            bland_threshold: 1000,
            initial_reset_period: 10,
            reset_period_increment: 5,
            reset_density_factor: 2.0,
            propagate_bounds: true,
            eliminate_unconstrained: true,
            default_delta: rational(1),
        }
    }
}
