use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::card::Category;
use crate::error::{Error, Result};

/// Reserved name of the party holding the hidden solution.
pub const SOLUTION_HOLDER: &str = "Murderer";

/// Dense index of a party within a [`Registry`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PartyId(pub(crate) usize);

impl PartyId {
    /// The solution holder is always registered first.
    pub const SOLUTION_HOLDER: PartyId = PartyId(0);

    /// Position in registry order, which is also the row in an [`Assignment`](crate::Assignment).
    pub fn index(self) -> usize {
        self.0
    }
}

/// A player as declared by the caller, before validation.
///
/// Hand sizes are signed so that a bad count coming from a game file is reported rather than rejected by the parser.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    /// Unique display name.
    pub name: String,
    /// Number of cards dealt to this player.
    pub hand_size: i64,
}

impl PlayerSpec {
    /// A player called `name` holding `hand_size` cards.
    pub fn new(name: impl Into<String>, hand_size: i64) -> Self {
        Self { name: name.into(), hand_size }
    }
}

/// Somebody who holds cards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Party {
    /// An ordinary player.
    Player {
        /// Unique display name.
        name: String,
        /// Number of cards dealt.
        hand_size: usize,
    },
    /// The hidden solution: one suspect, one weapon and one room.
    SolutionHolder,
}

impl Party {
    /// The player's name, or [`SOLUTION_HOLDER`].
    pub fn name(&self) -> &str {
        match self {
            Self::Player { name, .. } => name,
            Self::SolutionHolder => SOLUTION_HOLDER,
        }
    }

    /// Cards held; always one per category for the solution holder.
    pub fn hand_size(&self) -> usize {
        match self {
            Self::Player { hand_size, .. } => *hand_size,
            Self::SolutionHolder => Category::VARIANTS.len(),
        }
    }

    /// True only for the hidden solution.
    pub fn is_solution_holder(&self) -> bool {
        matches!(self, Self::SolutionHolder)
    }
}

/// The ordered set of parties taking part in one game.
#[derive(Clone, Debug)]
pub struct Registry {
    parties: Vec<Party>,
}

impl Registry {
    /// Validate `players` and register them after the solution holder, keeping their order.
    ///
    /// Fails with [`Error::DuplicateName`] if a name repeats or is [`SOLUTION_HOLDER`],
    /// and with [`Error::InvalidCount`] if a hand size is negative.
    /// A hand size no deal can satisfy is accepted; solving it finds no world.
    pub fn create(players: impl IntoIterator<Item = PlayerSpec>) -> Result<Self> {
        let mut parties = vec![Party::SolutionHolder];
        let mut seen = HashSet::from([SOLUTION_HOLDER.to_owned()]);

        for PlayerSpec { name, hand_size } in players {
            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateName(name));
            }
            let Ok(hand_size) = usize::try_from(hand_size) else {
                return Err(Error::InvalidCount { name, count: hand_size });
            };
            parties.push(Party::Player { name, hand_size });
        }

        Ok(Self { parties })
    }

    /// Look a party up by name. Fails with [`Error::UnknownParty`].
    pub fn id_of(&self, name: &str) -> Result<PartyId> {
        self.parties.iter()
            .position(|party| party.name() == name)
            .map(PartyId)
            .ok_or_else(|| Error::UnknownParty(name.to_owned()))
    }

    /// The party behind `id`, if it belongs to this registry.
    pub fn get(&self, id: PartyId) -> Option<&Party> {
        self.parties.get(id.0)
    }

    /// Number of parties, counting the solution holder.
    pub fn len(&self) -> usize {
        self.parties.len()
    }

    /// Never true: the solution holder is always registered.
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Every party with its id, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (PartyId, &Party)> {
        self.parties.iter().enumerate().map(|(index, party)| (PartyId(index), party))
    }

    /// Party names in display order, solution holder first.
    pub fn names(&self) -> Vec<&str> {
        self.parties.iter().map(Party::name).collect()
    }
}
