use serde::{Deserialize, Serialize};

use crate::card::Card;

/// How a player answered a suggestion.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    /// The player showed one of the suggested cards, without revealing which.
    SomeTrue,
    /// The player could not show any of the suggested cards.
    AllFalse,
}

/// One observed answer to a suggestion of up to one card per category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who answered.
    pub player: String,
    /// What they answered.
    pub response: Response,
    /// The suggested cards, at most one per category.
    pub cards: Vec<Card>,
}

impl Turn {
    /// A turn answered by `player` about `cards`.
    pub fn new(player: impl Into<String>, response: Response, cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            player: player.into(),
            response,
            cards: cards.into_iter().collect(),
        }
    }

    /// `player` showed one of `cards`.
    pub fn some_true(player: impl Into<String>, cards: impl IntoIterator<Item = Card>) -> Self {
        Self::new(player, Response::SomeTrue, cards)
    }

    /// `player` showed none of `cards`.
    pub fn all_false(player: impl Into<String>, cards: impl IntoIterator<Item = Card>) -> Self {
        Self::new(player, Response::AllFalse, cards)
    }
}
