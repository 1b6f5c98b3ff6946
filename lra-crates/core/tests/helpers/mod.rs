use lra_core::terms::Kind;
use lra_core::terms::Term;
use lra_core::ArithOptions;
use lra_core::Effort;
use lra_core::RecordingOutputChannel;
use lra_core::Theory;
use lra_core::TheoryArith;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn var(name: &str) -> Term {
    Term::variable(name)
}

pub(crate) fn int(value: i64) -> Term {
    Term::integer(value)
}

pub(crate) fn sum(summands: &[Term]) -> Term {
    Term::plus(summands.to_vec())
}

/// Drives a [`TheoryArith`] the way a SAT search would.
#[derive(Debug)]
pub(crate) struct Harness {
    pub(crate) theory: TheoryArith,
    pub(crate) out: RecordingOutputChannel,
}

impl Harness {
    pub(crate) fn new() -> Harness {
        Harness::with_options(ArithOptions::default())
    }

    pub(crate) fn with_options(options: ArithOptions) -> Harness {
        init_logging();
        Harness {
            theory: TheoryArith::new(options),
            out: RecordingOutputChannel::default(),
        }
    }

    pub(crate) fn register(&mut self, atoms: &[Term]) {
        for atom in atoms {
            self.theory
                .pre_register_term(atom)
                .expect("the atom is arithmetic");
        }
    }

    /// Registers and asserts `literals`, then checks them.
    pub(crate) fn assert_and_check(&mut self, literals: &[Term], effort: Effort) {
        self.register(literals);
        for literal in literals {
            self.theory
                .assert_fact(literal.clone())
                .expect("the literal is registered");
        }
        self.check(effort);
    }

    pub(crate) fn check(&mut self, effort: Effort) {
        self.out.clear();
        self.theory.check(effort, &mut self.out);
    }

    pub(crate) fn propagate(&mut self) {
        self.out.clear();
        self.theory.propagate(&mut self.out);
    }

    pub(crate) fn push(&mut self) {
        self.theory.push();
    }

    pub(crate) fn pop(&mut self) {
        self.theory.pop(1);
    }

    /// The literals of the single conflict reported by the last check.
    pub(crate) fn conflict(&self) -> Vec<Term> {
        assert_eq!(
            1,
            self.out.conflicts.len(),
            "expected exactly one conflict, got {:?}",
            self.out.conflicts
        );
        literals_of(&self.out.conflicts[0])
    }

    pub(crate) fn assert_consistent(&self) {
        assert!(
            self.out.conflicts.is_empty(),
            "unexpected conflict {:?}",
            self.out.conflicts
        );
    }
}

pub(crate) fn literals_of(conjunction: &Term) -> Vec<Term> {
    match conjunction.kind() {
        Kind::And => conjunction.children().to_vec(),
        _ => vec![conjunction.clone()],
    }
}

/// Compares two sets of literals regardless of order.
pub(crate) fn assert_same_literals(expected: &[Term], actual: &[Term]) {
    assert_eq!(expected.len(), actual.len(), "{expected:?} vs {actual:?}");
    for literal in expected {
        assert!(actual.contains(literal), "{literal} missing from {actual:?}");
    }
}
