#![warn(missing_docs)]

//! # `cluedo`
//!
//! A deduction engine for [Cluedo](https://en.wikipedia.org/wiki/Cluedo).
//! Begin by creating a [`Game`] from the players and their hand sizes, record what you learn with
//! [`Game::assert_fact`], [`Game::assert_disjunction`] or [`Game::record_turn`], then call [`Game::solve`]
//! and read back [`Game::knowledge`] for any party, including the hidden solution itself.
//!
//! # Internals
//! Every hand, including the hidden solution's, is a row of boolean variables: one per card.
//! The rules of the game become CNF clauses over those variables, and a SAT solver ([`varisat`]) enumerates
//! every assignment satisfying them. Each assignment is one possible world.
//!
//! We make the following assertions in SAT form:
//! 1. Every party holds exactly as many cards as their hand size.
//! 2. The solution holder (the "Murderer") holds exactly one suspect, one weapon and one room.
//! 3. Every card is held by exactly one party.
//!
//! Recorded facts add unit clauses and disjunctions add plain clauses, so the set of worlds only ever shrinks.
//!
//! Worlds are then folded into a table of observed values per (party, card):
//! a card seen only held is known held, a card seen only not held is known not held, anything else is unresolved.
//! As soon as every card of a party is unresolved the fold stops, since more worlds cannot add information.

pub use builder::Model;
pub use card::{Card, Category, Room, Suspect, Weapon, DECK_SIZE};
pub use collector::{SolutionCollector, SolveReport};
pub use config::SolveConfig;
pub use error::{Error, Result};
pub use game::Game;
pub use knowledge::{narrow, Knowledge, Status, ValueSet};
pub use party::{Party, PartyId, PlayerSpec, Registry, SOLUTION_HOLDER};
pub use solver::{Assignment, Completion, Enumeration};
pub use turn::{Response, Turn};

pub(crate) mod builder;
/// The fixed deck: suspects, weapons and rooms.
pub mod card;
pub(crate) mod collector;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod game;
pub(crate) mod knowledge;
pub(crate) mod logic;
pub(crate) mod party;
pub(crate) mod solver;
pub(crate) mod turn;
mod tests;
