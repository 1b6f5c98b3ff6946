use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;

use fnv::FnvHasher;
use itertools::Itertools;

use crate::lra_assert_simple;
use crate::math::rational;
use crate::math::Rational;

/// The tag of a [`Term`].
///
/// Leaves carry their payload (a name, a rational, a truth value); every other kind is an
/// operator over the term's children.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Variable(String),
    Constant(Rational),
    Boolean(bool),
    Plus,
    Mult,
    Lt,
    Leq,
    Eq,
    Geq,
    Gt,
    Not,
    And,
    Or,
    Implies,
    Ite,
}

impl Kind {
    /// Whether this kind is one of `<`, `<=`, `=`, `>=`, `>`.
    pub fn is_relational(&self) -> bool {
        matches!(self, Kind::Lt | Kind::Leq | Kind::Eq | Kind::Geq | Kind::Gt)
    }

    fn symbol(&self) -> &'static str {
        match self {
            Kind::Plus => "+",
            Kind::Mult => "*",
            Kind::Lt => "<",
            Kind::Leq => "<=",
            Kind::Eq => "=",
            Kind::Geq => ">=",
            Kind::Gt => ">",
            Kind::Not => "not",
            Kind::And => "and",
            Kind::Or => "or",
            Kind::Implies => "=>",
            Kind::Ite => "ite",
            Kind::Variable(_) | Kind::Constant(_) | Kind::Boolean(_) => {
                unreachable!("leaves have no operator symbol")
            }
        }
    }
}

struct TermNode {
    kind: Kind,
    children: Box<[Term]>,
    /// Structural hash, computed once at construction.
    hash: u64,
}

/// An immutable, reference-counted term.
///
/// Terms share structure: cloning a [`Term`] only bumps a reference count. Equality and hashing
/// are structural, so two terms built independently from the same pieces are interchangeable
/// as map keys.
#[derive(Clone)]
pub struct Term(Rc<TermNode>);

impl Term {
    /// Creates a term with the given kind and children.
    ///
    /// # Panics
    /// If the number of children does not fit the kind.
    pub fn new(kind: Kind, children: Vec<Term>) -> Term {
        match &kind {
            Kind::Variable(_) | Kind::Constant(_) | Kind::Boolean(_) => {
                lra_assert_simple!(children.is_empty(), "leaves have no children")
            }
            Kind::Not => lra_assert_simple!(children.len() == 1),
            Kind::Ite => lra_assert_simple!(children.len() == 3),
            Kind::Implies => lra_assert_simple!(children.len() == 2),
            relation if relation.is_relational() => lra_assert_simple!(children.len() == 2),
            Kind::Plus | Kind::Mult | Kind::And | Kind::Or => {
                lra_assert_simple!(!children.is_empty())
            }
            _ => {}
        }

        let mut hasher = FnvHasher::default();
        kind.hash(&mut hasher);
        for child in children.iter() {
            hasher.write_u64(child.0.hash);
        }

        Term(Rc::new(TermNode {
            kind,
            children: children.into_boxed_slice(),
            hash: hasher.finish(),
        }))
    }

    pub fn variable(name: impl Into<String>) -> Term {
        Term::new(Kind::Variable(name.into()), vec![])
    }

    pub fn constant(value: Rational) -> Term {
        Term::new(Kind::Constant(value), vec![])
    }

    pub fn integer(value: i64) -> Term {
        Term::constant(rational(value))
    }

    pub fn boolean(value: bool) -> Term {
        Term::new(Kind::Boolean(value), vec![])
    }

    pub fn plus(summands: Vec<Term>) -> Term {
        Term::new(Kind::Plus, summands)
    }

    pub fn mult(factors: Vec<Term>) -> Term {
        Term::new(Kind::Mult, factors)
    }

    pub fn lt(lhs: Term, rhs: Term) -> Term {
        Term::new(Kind::Lt, vec![lhs, rhs])
    }

    pub fn leq(lhs: Term, rhs: Term) -> Term {
        Term::new(Kind::Leq, vec![lhs, rhs])
    }

    pub fn equal(lhs: Term, rhs: Term) -> Term {
        Term::new(Kind::Eq, vec![lhs, rhs])
    }

    pub fn geq(lhs: Term, rhs: Term) -> Term {
        Term::new(Kind::Geq, vec![lhs, rhs])
    }

    pub fn gt(lhs: Term, rhs: Term) -> Term {
        Term::new(Kind::Gt, vec![lhs, rhs])
    }

    pub fn not(term: Term) -> Term {
        Term::new(Kind::Not, vec![term])
    }

    /// The conjunction of `conjuncts`; the empty conjunction is `true` and a single conjunct is
    /// returned as is.
    pub fn and(mut conjuncts: Vec<Term>) -> Term {
        match conjuncts.len() {
            0 => Term::boolean(true),
            1 => conjuncts.swap_remove(0),
            _ => Term::new(Kind::And, conjuncts),
        }
    }

    /// The disjunction of `disjuncts`; the empty disjunction is `false` and a single disjunct is
    /// returned as is.
    pub fn or(mut disjuncts: Vec<Term>) -> Term {
        match disjuncts.len() {
            0 => Term::boolean(false),
            1 => disjuncts.swap_remove(0),
            _ => Term::new(Kind::Or, disjuncts),
        }
    }

    pub fn implies(antecedent: Term, consequent: Term) -> Term {
        Term::new(Kind::Implies, vec![antecedent, consequent])
    }

    pub fn ite(condition: Term, then_branch: Term, else_branch: Term) -> Term {
        Term::new(Kind::Ite, vec![condition, then_branch, else_branch])
    }

    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    pub fn children(&self) -> &[Term] {
        &self.0.children
    }

    pub fn child(&self, index: usize) -> &Term {
        &self.0.children[index]
    }

    pub fn num_children(&self) -> usize {
        self.0.children.len()
    }

    /// The value of a constant leaf.
    pub fn constant_value(&self) -> Option<&Rational> {
        match self.kind() {
            Kind::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind(), Kind::Constant(_))
    }

    /// Strips one outer negation, or adds one.
    pub fn negate(&self) -> Term {
        match self.kind() {
            Kind::Not => self.child(0).clone(),
            _ => Term::not(self.clone()),
        }
    }

    /// Whether this term is a relational atom or the negation of one.
    pub fn is_arith_literal(&self) -> bool {
        match self.kind() {
            Kind::Not => self.child(0).kind().is_relational(),
            kind => kind.is_relational(),
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.0.hash == other.0.hash
                && self.0.kind == other.0.kind
                && self.0.children == other.0.children)
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            Kind::Variable(name) => write!(f, "{name}"),
            Kind::Constant(value) => write!(f, "{value}"),
            Kind::Boolean(value) => write!(f, "{value}"),
            kind => write!(
                f,
                "({} {})",
                kind.symbol(),
                self.children().iter().join(" ")
            ),
        }
    }
}

impl Debug for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
