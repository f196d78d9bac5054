use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::ops::Index;

use itertools::Itertools;
use log::trace;
use strum::VariantArray;

use crate::card::{Card, Category, DECK_SIZE};
use crate::error::{Error, Result};
use crate::party::PartyId;
use crate::solver::Assignment;

/// What is known about a single (party, card) pair.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    /// The party holds the card in every world.
    KnownTrue,
    /// The party holds the card in no world.
    KnownFalse,
    /// Some worlds disagree.
    Unresolved,
}

/// The set of values a (party, card) variable took across the worlds seen so far.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ValueSet {
    seen_false: bool,
    seen_true: bool,
}

impl ValueSet {
    /// `{1}`
    pub const KNOWN_TRUE: ValueSet = ValueSet { seen_false: false, seen_true: true };
    /// `{0}`
    pub const KNOWN_FALSE: ValueSet = ValueSet { seen_false: true, seen_true: false };
    /// `{0, 1}`
    pub const UNRESOLVED: ValueSet = ValueSet { seen_false: true, seen_true: true };

    /// Record one observed value.
    pub fn insert(&mut self, value: bool) {
        if value {
            self.seen_true = true;
        } else {
            self.seen_false = true;
        }
    }

    /// Whether `value` has been observed.
    pub fn contains(self, value: bool) -> bool {
        if value { self.seen_true } else { self.seen_false }
    }

    /// Number of distinct values observed, from 0 to 2.
    pub fn len(self) -> usize {
        usize::from(self.seen_false) + usize::from(self.seen_true)
    }

    /// Nothing observed yet.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Both values observed.
    pub fn is_unresolved(self) -> bool {
        self.len() == 2
    }

    /// `None` only for the empty set, which no finished table contains.
    pub fn status(self) -> Option<Status> {
        match (self.seen_false, self.seen_true) {
            (false, true) => Some(Status::KnownTrue),
            (true, false) => Some(Status::KnownFalse),
            (true, true) => Some(Status::Unresolved),
            (false, false) => None,
        }
    }
}

impl Debug for ValueSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries([false, true].into_iter().filter(|value| self.contains(*value)).map(u8::from))
            .finish()
    }
}

/// Everything known about one party's hand, per card.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Knowledge {
    values: [ValueSet; DECK_SIZE],
}

impl Knowledge {
    /// Values observed for `card`.
    pub fn get(&self, card: impl Into<Card>) -> ValueSet {
        self.values[card.into().index()]
    }

    /// [`Status`] of `card`.
    pub fn status(&self, card: impl Into<Card>) -> Status {
        // never empty: a table is only built from at least one world
        self.get(card).status().unwrap_or(Status::Unresolved)
    }

    /// Card → observed values, for one category.
    pub fn category(&self, category: Category) -> BTreeMap<Card, ValueSet> {
        category.cards().map(|card| (card, self.values[card.index()])).collect()
    }

    /// Cards of `category` that are still unresolved, in catalog order.
    pub fn unresolved(&self, category: Category) -> Vec<Card> {
        category.cards().filter(|card| self.values[card.index()].is_unresolved()).collect()
    }

    /// Cards the party is known to hold.
    pub fn held(&self) -> Vec<Card> {
        Card::all().filter(|card| self.values[card.index()] == ValueSet::KNOWN_TRUE).collect()
    }

    /// True if every card's status is pinned down.
    pub fn is_resolved(&self) -> bool {
        self.values.iter().all(|values| !values.is_unresolved())
    }
}

impl Index<Card> for Knowledge {
    type Output = ValueSet;

    fn index(&self, card: Card) -> &Self::Output {
        &self.values[card.index()]
    }
}

/// Record one world's value of every still-ambiguous card, then drop the cards that have now been seen both ways.
///
/// Once a card is unresolved no further world can change that, so it never has to be looked at again.
fn narrow_category(pending: &mut Vec<Card>, values: &mut [ValueSet; DECK_SIZE], holds: impl Fn(Card) -> bool) {
    pending.retain(|card| {
        let seen = &mut values[card.index()];
        seen.insert(holds(*card));
        !seen.is_unresolved()
    });
}

/// Reduce `solutions` to what they say about `party`.
///
/// Consumption stops as soon as every card of every category is unresolved, since that is final.
/// The result is the same as scanning every world.
/// `solutions` may be a borrowed list or a live [`Enumeration`](crate::Enumeration) passed by `&mut`.
///
/// Fails with [`Error::NoWorlds`] if `solutions` is empty.
pub fn narrow<I>(party: PartyId, solutions: I) -> Result<Knowledge>
where
    I: IntoIterator,
    I::Item: Borrow<Assignment>,
{
    let mut values = [ValueSet::default(); DECK_SIZE];
    let mut ambiguous = Category::VARIANTS.iter()
        .map(|category| category.cards().collect_vec())
        .collect_vec();
    let mut examined = 0usize;

    for solution in solutions {
        let solution = solution.borrow();
        examined += 1;

        for pending in ambiguous.iter_mut() {
            narrow_category(pending, &mut values, |card| solution.holds(party, card));
        }

        if ambiguous.iter().all(Vec::is_empty) {
            trace!(target: "knowledge", "{:?} fully ambiguous after {} worlds; stopping", party, examined);
            break;
        }
    }

    if examined == 0 {
        return Err(Error::NoWorlds);
    }

    trace!(target: "knowledge", "{:?} narrowed over {} worlds", party, examined);
    Ok(Knowledge { values })
}
