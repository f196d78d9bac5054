use std::collections::HashSet;

use log::{debug, warn};

use crate::builder::Model;
use crate::card::Card;
use crate::collector::{SolutionCollector, SolveReport};
use crate::config::SolveConfig;
use crate::error::{Error, Result};
use crate::knowledge::{narrow, Knowledge};
use crate::party::{PartyId, PlayerSpec, Registry};
use crate::solver::Completion;
use crate::turn::{Response, Turn};

/// One deduction session: the model, the facts recorded so far, and the worlds from the latest solve.
///
/// Facts and turns must be added before [`Self::solve`] to take part in it.
/// Every solve starts from scratch and replaces the previous worlds.
pub struct Game {
    model: Model,
    config: SolveConfig,
    collector: Option<SolutionCollector>,
    history: Vec<Turn>,
}

impl Game {
    /// Start a game with the default [`SolveConfig`].
    pub fn new(players: impl IntoIterator<Item = PlayerSpec>) -> Result<Self> {
        Self::with_config(players, SolveConfig::default())
    }

    /// Start a game that solves under `config` by default.
    ///
    /// Fails like [`Registry::create`].
    pub fn with_config(players: impl IntoIterator<Item = PlayerSpec>, config: SolveConfig) -> Result<Self> {
        let registry = Registry::create(players)?;
        Ok(Self {
            model: Model::from(registry),
            config,
            collector: None,
            history: Vec::new(),
        })
    }

    /// The underlying boolean model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The registered parties.
    pub fn registry(&self) -> &Registry {
        self.model.registry()
    }

    /// Limits used by [`Self::solve`].
    pub fn config(&self) -> &SolveConfig {
        &self.config
    }

    /// Party names in display order, solution holder first.
    pub fn player_names(&self) -> Vec<&str> {
        self.registry().names()
    }

    /// Turns recorded so far, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// The worlds found by the latest solve, if any solve has run.
    pub fn solutions(&self) -> Option<&SolutionCollector> {
        self.collector.as_ref()
    }

    /// Record that `party` does (or does not) hold `card`.
    pub fn assert_fact(&mut self, party: &str, card: impl Into<Card>, value: bool) -> Result<()> {
        self.model.assert_fact(party, card.into(), value)
    }

    /// Record that `party` holds at least one of `cards`.
    pub fn assert_disjunction(&mut self, party: &str, cards: impl IntoIterator<Item = Card>) -> Result<()> {
        let cards = cards.into_iter().collect::<Vec<_>>();
        self.model.assert_disjunction(party, &cards)
    }

    /// Apply the answer to a suggestion and append it to the history.
    ///
    /// A shown card becomes a fact, a card shown from several candidates becomes a disjunction,
    /// and "none of these" becomes one negative fact per card.
    /// The whole turn is checked first, so a rejected turn changes nothing.
    pub fn record_turn(&mut self, turn: Turn) -> Result<()> {
        let id = self.registry().id_of(&turn.player)?;
        if id == PartyId::SOLUTION_HOLDER {
            return Err(Error::InvalidArgument(format!("{} never answers a suggestion", turn.player)));
        }
        if turn.cards.is_empty() {
            return Err(Error::InvalidArgument("a suggestion names at least one card".to_owned()));
        }
        let mut categories = HashSet::with_capacity(turn.cards.len());
        if !turn.cards.iter().all(|card| categories.insert(card.category())) {
            return Err(Error::InvalidArgument(format!("a suggestion names at most one card per category: {:?}", turn.cards)));
        }

        match (turn.response, turn.cards.as_slice()) {
            (Response::SomeTrue, [card]) => self.model.fix(id, *card, true),
            (Response::SomeTrue, cards) => self.model.require_any(id, cards),
            (Response::AllFalse, cards) => cards.iter().for_each(|card| self.model.fix(id, *card, false)),
        }

        debug!(target: "game", "turn {}: {:?}", self.history.len() + 1, turn);
        self.history.push(turn);
        Ok(())
    }

    /// Enumerate the consistent worlds under the game's own [`SolveConfig`].
    pub fn solve(&mut self) -> Result<SolveReport> {
        let config = self.config.clone();
        self.solve_with(&config)
    }

    /// Enumerate the consistent worlds under `config`, replacing the previous ones.
    ///
    /// Finding no world is not an error; it is reported as zero solutions.
    pub fn solve_with(&mut self, config: &SolveConfig) -> Result<SolveReport> {
        self.collector = None;
        let collector = SolutionCollector::collect(self.model.enumerate(config)?)?;
        let report = collector.report();

        match (report.solutions, report.completion) {
            (0, Completion::Exhaustive) => warn!(target: "game", "no world is consistent with the recorded facts"),
            (0, _) => warn!(target: "game", "no world found within the limits; the facts may still be consistent"),
            _ => debug!(target: "game", "{} worlds ({:?}) in {:?}", report.solutions, report.completion, report.elapsed),
        }

        self.collector = Some(collector);
        Ok(report)
    }

    /// What the latest solve says about `party`.
    pub fn knowledge(&self, party: &str) -> Result<Knowledge> {
        let id = self.registry().id_of(party)?;
        let collector = self.collector.as_ref().ok_or(Error::NotSolved)?;
        narrow(id, collector.solutions())
    }

    /// [`Self::knowledge`] for every party, in display order.
    pub fn all_knowledge(&self) -> Result<Vec<(String, Knowledge)>> {
        self.player_names()
            .into_iter()
            .map(|name| Ok((name.to_owned(), self.knowledge(name)?)))
            .collect()
    }

    /// Narrow `party` straight from a fresh enumeration without storing the worlds.
    ///
    /// Stops the search as soon as nothing more can be learned, reporting [`Completion::Settled`].
    /// The stored worlds from [`Self::solve`] are left alone.
    pub fn survey(&self, party: &str, config: &SolveConfig) -> Result<(Knowledge, Completion)> {
        let id = self.registry().id_of(party)?;
        let mut worlds = self.model.enumerate(config)?;
        let knowledge = narrow(id, &mut worlds);
        let completion = worlds.finish()?.unwrap_or(Completion::Settled);
        Ok((knowledge?, completion))
    }
}
