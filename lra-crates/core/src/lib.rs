//! # LRA core
//! A decision procedure for quantifier-free linear real arithmetic, meant to be driven by the
//! SAT search of an SMT solver.
//!
//! The search hands the theory relational atoms over rational variables (`(<= (+ x y) 10)`,
//! `(not (= x 3))`, ...) through the [`Theory`] interface. [`TheoryArith`] rewrites every atom
//! into a bound on a single variable, introducing slack variables for linear combinations, and
//! decides the resulting bounds with the Simplex method of Dutertre and de Moura. Strict
//! inequalities are handled exactly by computing over [`math::DeltaRational`]s, i.e. numbers of
//! the form `c + kδ` for a symbolic positive infinitesimal `δ`.
//!
//! When the bounds are infeasible, the theory reports a conflict: a conjunction of asserted
//! literals which cannot hold together. Literals implied by the asserted bounds are propagated
//! and can later be explained, and disequalities are resolved lazily by lemmas which split them
//! into `<` and `>`.
//!
//! # Example
//! ```rust
//! # use lra_core::terms::Term;
//! # use lra_core::Effort;
//! # use lra_core::RecordingOutputChannel;
//! # use lra_core::Theory;
//! # use lra_core::TheoryArith;
//! let x = Term::variable("x");
//! let y = Term::variable("y");
//!
//! let mut theory = TheoryArith::default();
//! let facts = [
//!     Term::leq(Term::plus(vec![x.clone(), y.clone()]), Term::integer(10)),
//!     Term::geq(x.clone(), Term::integer(8)),
//!     Term::geq(y.clone(), Term::integer(3)),
//! ];
//! for fact in facts.iter() {
//!     theory.pre_register_term(fact).unwrap();
//!     theory.assert_fact(fact.clone()).unwrap();
//! }
//!
//! let mut out = RecordingOutputChannel::default();
//! theory.check(Effort::Full, &mut out);
//!
//! // x + y ≤ 10, x ≥ 8 and y ≥ 3 cannot hold together.
//! assert_eq!(1, out.conflicts.len());
//! ```
pub mod asserts;
pub(crate) mod basic_types;
pub mod containers;
pub mod engine;
pub mod math;
pub mod terms;

pub use crate::basic_types::ArithError;
pub use crate::engine::theory_arith::ArithOptions;
pub use crate::engine::theory_arith::ModelValue;
pub use crate::engine::simplex::PivotRule;
pub use crate::engine::Effort;
pub use crate::engine::OutputChannel;
pub use crate::engine::RecordingOutputChannel;
pub use crate::engine::Theory;
pub use crate::engine::TheoryArith;
