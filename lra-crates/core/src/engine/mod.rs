//! The arithmetic engine: constraints, the tableau, the Simplex procedure and the theory which
//! drives them from the literals a SAT search asserts.
mod arith_var;
pub mod constraint_database;
mod partial_model;
pub mod simplex;
pub mod tableau;
mod theory;
pub mod theory_arith;

pub use arith_var::ArithVar;
pub use constraint_database::ConstraintDatabase;
pub use constraint_database::ConstraintId;
pub use constraint_database::ConstraintType;
pub use partial_model::Bound;
pub use partial_model::PartialModel;
pub use simplex::ArithConflict;
pub use simplex::SimplexDecisionProcedure;
pub use simplex::SimplexStatus;
pub use tableau::Tableau;
pub use theory::*;
pub use theory_arith::TheoryArith;
