use itertools::Itertools;
use log::debug;
use strum::VariantArray;
use varisat::{CnfFormula, ExtendFormula, Lit, Var};

use crate::card::{Card, Category, DECK_SIZE};
use crate::config::SolveConfig;
use crate::error::{Error, Result};
use crate::logic::{exactly_k, exactly_one};
use crate::party::{PartyId, Registry};
use crate::solver::Enumeration;

/// Index of the "`party` holds `card`" variable. Parties occupy consecutive blocks of [`DECK_SIZE`].
#[inline]
pub(crate) fn var_index(party: usize, card: usize) -> usize {
    party * DECK_SIZE + card
}

/// The boolean model of one game: a variable per (party, card) and the clauses tying them together.
///
/// Clauses only ever accumulate; there is no way to take a fact back.
pub struct Model {
    registry: Registry,
    formula: CnfFormula,
}

impl From<Registry> for Model {
    /// Allocate the variables for every party and emit the rules of the game.
    ///
    /// # Logical setup
    /// Let `H(P, C)` mean party P holds card C.
    ///
    /// ## Parties
    /// Every party P with hand size k holds exactly k cards: exactly k of `H(P, *)` are true.
    /// The solution holder additionally holds exactly one card of each category.
    ///
    /// ## Cards
    /// Every card C is held by exactly one party: exactly one of `H(*, C)` is true.
    /// With more than two parties this cannot be written as a parity constraint, since an odd number of holders is not necessarily one holder.
    fn from(registry: Registry) -> Self {
        let mut formula = CnfFormula::new();
        // the primary block comes first so cardinality registers land after it
        formula.set_var_count(registry.len() * DECK_SIZE);

        for (id, party) in registry.iter() {
            let hand = Card::all().map(|card| Self::lit(id, card, true)).collect_vec();
            exactly_k(&mut formula, &hand, party.hand_size());

            if party.is_solution_holder() {
                for category in Category::VARIANTS {
                    exactly_one(category.cards().map(|card| Self::lit(id, card, true)).collect_vec())
                        .iter()
                        .for_each(|clause| formula.add_clause(clause));
                }
            }
        }

        for card in Card::all() {
            exactly_one(registry.iter().map(|(id, _)| Self::lit(id, card, true)).collect_vec())
                .iter()
                .for_each(|clause| formula.add_clause(clause));
        }

        debug!(target: "builder", "{} parties, {} primary variables, {} total variables, {} clauses",
            registry.len(), registry.len() * DECK_SIZE, formula.var_count(), formula.len());

        Self { registry, formula }
    }
}

impl Model {
    #[inline]
    fn lit(party: PartyId, card: Card, value: bool) -> Lit {
        Var::from_index(var_index(party.index(), card.index())).lit(value)
    }

    /// The parties this model was built for.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of (party, card) variables. Auxiliary counter variables are not included.
    pub fn variable_count(&self) -> usize {
        self.registry.len() * DECK_SIZE
    }

    /// Clauses emitted so far, facts included.
    pub fn clause_count(&self) -> usize {
        self.formula.len()
    }

    pub(crate) fn formula(&self) -> &CnfFormula {
        &self.formula
    }

    /// Fix whether `party` holds `card`.
    ///
    /// Fails with [`Error::UnknownParty`] and leaves the model untouched if `party` is not registered.
    pub fn assert_fact(&mut self, party: &str, card: Card, value: bool) -> Result<()> {
        let id = self.registry.id_of(party)?;
        self.fix(id, card, value);
        Ok(())
    }

    /// Require that `party` holds at least one of `cards`.
    ///
    /// Fails with [`Error::InvalidArgument`] if `cards` is empty, or [`Error::UnknownParty`]; the model is untouched either way.
    pub fn assert_disjunction(&mut self, party: &str, cards: &[Card]) -> Result<()> {
        let id = self.registry.id_of(party)?;
        if cards.is_empty() {
            return Err(Error::InvalidArgument(format!("empty disjunction for {party}")));
        }
        self.require_any(id, cards);
        Ok(())
    }

    pub(crate) fn fix(&mut self, party: PartyId, card: Card, value: bool) {
        debug!(target: "builder", "fact: {:?} {} {}", party, card, value);
        self.formula.add_clause(&[Self::lit(party, card, value)]);
    }

    pub(crate) fn require_any(&mut self, party: PartyId, cards: &[Card]) {
        debug!(target: "builder", "disjunction: {:?} any of {:?}", party, cards);
        self.formula.add_clause(&cards.iter().map(|card| Self::lit(party, *card, true)).collect_vec());
    }

    /// Start enumerating the worlds consistent with the model as it stands now.
    ///
    /// The enumeration works on a snapshot: facts added afterwards only affect later enumerations.
    pub fn enumerate(&self, config: &SolveConfig) -> Result<Enumeration> {
        Enumeration::new(self, config)
    }
}
