use std::iter::FusedIterator;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, trace, warn};
use ndarray::Array2;
use varisat::{ExtendFormula, Lit, Solver, Var};

use crate::builder::{var_index, Model};
use crate::card::{Card, DECK_SIZE};
use crate::config::SolveConfig;
use crate::error::{Error, Result};
use crate::party::PartyId;

/// How an enumeration of worlds came to an end.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Completion {
    /// Every consistent world was produced. Zero worlds therefore proves the facts contradictory.
    Exhaustive,
    /// The time limit or the solution cap was reached first; more worlds may exist.
    Partial,
    /// The consumer stopped early because no further world could change its result.
    Settled,
}

/// One consistent world: who holds every card.
///
/// Rows are parties in registry order and columns are cards by [`Card::index`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment(Array2<bool>);

impl Assignment {
    fn from_model(parties: usize, model: &[Lit]) -> Self {
        Self(Array2::from_shape_fn((parties, DECK_SIZE), |(party, card)| {
            model.get(var_index(party, card)).is_some_and(|lit| lit.is_positive())
        }))
    }

    #[cfg(test)]
    pub(crate) fn from_table(table: Array2<bool>) -> Self {
        Self(table)
    }

    /// Whether `party` holds `card` in this world.
    pub fn holds(&self, party: PartyId, card: Card) -> bool {
        self.0.get((party.index(), card.index())).copied().unwrap_or(false)
    }

    /// The party holding `card` in this world.
    pub fn holder_of(&self, card: Card) -> Option<PartyId> {
        self.0.column(card.index()).iter().position(|held| *held).map(PartyId)
    }

    /// The cards `party` holds in this world, in catalog order.
    pub fn hand(&self, party: PartyId) -> impl Iterator<Item = Card> + '_ {
        Card::all().filter(move |card| self.holds(party, *card))
    }

    /// Number of parties, counting the solution holder.
    pub fn party_count(&self) -> usize {
        self.0.nrows()
    }

    /// The clause excluding exactly this world.
    ///
    /// Every world places each card with exactly one party, so any other world must drop at least one of these holdings.
    fn blocking_clause(&self) -> Vec<Lit> {
        self.0.indexed_iter()
            .filter(|(_, held)| **held)
            .map(|((party, card), _)| Var::from_index(var_index(party, card)).negative())
            .collect_vec()
    }
}

/// A lazy walk over every world consistent with a [`Model`].
///
/// Each step asks the SAT solver for a model, yields it, and blocks it so the next step finds a different one.
/// Once it returns `None` it stays exhausted; start a new enumeration to search again.
/// Limits from [`SolveConfig`] are checked between solver calls, never during one.
pub struct Enumeration {
    solver: Solver<'static>,
    parties: usize,
    started: Instant,
    deadline: Option<Instant>,
    remaining: Option<usize>,
    produced: usize,
    completion: Option<Completion>,
    failure: Option<String>,
}

impl Enumeration {
    pub(crate) fn new(model: &Model, config: &SolveConfig) -> Result<Self> {
        let budget = config.time_budget()?;
        let started = Instant::now();

        let mut solver = Solver::new();
        solver.add_formula(model.formula());

        Ok(Self {
            solver,
            parties: model.registry().len(),
            started,
            deadline: budget.map(|budget| started + budget),
            remaining: config.max_solutions,
            produced: 0,
            completion: None,
            failure: None,
        })
    }

    /// `None` while more worlds may still be produced.
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    /// Worlds yielded so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Consume the enumeration, surfacing a solver failure if one ended it.
    pub fn finish(self) -> Result<Option<Completion>> {
        match self.failure {
            Some(failure) => Err(Error::Engine(failure)),
            None => Ok(self.completion),
        }
    }

    fn stop(&mut self, completion: Completion) -> Option<Assignment> {
        debug!(target: "solver", "{:?} after {} worlds in {:?}", completion, self.produced, self.started.elapsed());
        self.completion = Some(completion);
        None
    }

    fn fail(&mut self, failure: String) -> Option<Assignment> {
        warn!(target: "solver", "enumeration aborted after {} worlds: {}", self.produced, failure);
        self.failure = Some(failure);
        None
    }
}

impl Iterator for Enumeration {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.completion.is_some() || self.failure.is_some() {
            return None;
        }
        if self.remaining == Some(0) {
            return self.stop(Completion::Partial);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return self.stop(Completion::Partial);
        }

        match self.solver.solve() {
            Ok(true) => {}
            Ok(false) => return self.stop(Completion::Exhaustive),
            Err(err) => return self.fail(err.to_string()),
        }
        let Some(model) = self.solver.model() else {
            return self.fail("satisfiable but no model was produced".to_owned());
        };

        let assignment = Assignment::from_model(self.parties, &model);
        self.solver.add_clause(&assignment.blocking_clause());
        self.remaining = self.remaining.map(|remaining| remaining - 1);
        self.produced += 1;
        trace!(target: "solver", "world {} found after {:?}", self.produced, self.started.elapsed());

        Some(assignment)
    }
}

impl FusedIterator for Enumeration {}
