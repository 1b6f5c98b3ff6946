use crate::basic_types::ArithError;
use crate::terms::Term;

/// How much work a [`Theory::check`] is asked to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effort {
    /// Called while the search is still assigning literals; the theory may skip expensive steps.
    #[default]
    Standard,
    /// Called on a complete assignment; the theory must either accept it or report something.
    Full,
}

/// Where a theory sends what it finds.
pub trait OutputChannel {
    /// A conjunction of asserted literals which cannot hold together.
    fn conflict(&mut self, conflict: Term);

    /// A formula which is valid in the theory and should be added to the search.
    fn lemma(&mut self, lemma: Term);

    /// A literal which is implied by the asserted literals; it can be explained through
    /// [`Theory::explain`].
    fn propagate(&mut self, literal: Term);
}

/// An [`OutputChannel`] which keeps everything it is sent.
#[derive(Debug, Default, Clone)]
pub struct RecordingOutputChannel {
    pub conflicts: Vec<Term>,
    pub lemmas: Vec<Term>,
    pub propagations: Vec<Term>,
}

impl RecordingOutputChannel {
    pub fn clear(&mut self) {
        self.conflicts.clear();
        self.lemmas.clear();
        self.propagations.clear();
    }
}

impl OutputChannel for RecordingOutputChannel {
    fn conflict(&mut self, conflict: Term) {
        self.conflicts.push(conflict);
    }

    fn lemma(&mut self, lemma: Term) {
        self.lemmas.push(lemma);
    }

    fn propagate(&mut self, literal: Term) {
        self.propagations.push(literal);
    }
}

/// The interface between a decision procedure for one theory and the search which drives it.
///
/// The search tells the theory about every term it will later see in literals, asserts literals
/// one by one, and asks the theory to check them. Every [`Theory::push`] is matched by a
/// [`Theory::pop`] which forgets everything asserted since.
pub trait Theory {
    /// Tells the theory about a term before any literal over it is asserted.
    fn pre_register_term(&mut self, term: &Term) -> Result<(), ArithError>;

    /// Queues a literal which the search has made true.
    fn assert_fact(&mut self, literal: Term) -> Result<(), ArithError>;

    /// Processes the queued literals and reports conflicts and lemmas to `out`.
    fn check(&mut self, effort: Effort, out: &mut dyn OutputChannel);

    /// Reports the literals implied since the last call, and any pending lemmas.
    fn propagate(&mut self, out: &mut dyn OutputChannel);

    /// The conjunction of asserted literals which implies a propagated `literal`.
    fn explain(&mut self, literal: &Term) -> Result<Term, ArithError>;

    fn push(&mut self);

    /// Undoes the last `levels` calls to [`Theory::push`].
    fn pop(&mut self, levels: usize);

    /// Called whenever the search restarts.
    fn notify_restart(&mut self);
}
