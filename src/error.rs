use thiserror::Error;

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an operation on a game may fail.
///
/// Construction errors ([`DuplicateName`](Error::DuplicateName), [`InvalidCount`](Error::InvalidCount)) are raised before any variable exists.
/// Every other error leaves the model exactly as it was.
/// A contradictory set of facts is *not* an error: solving simply finds no worlds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A player name was given twice, or collides with the reserved solution holder.
    #[error("duplicate party name: {0}")]
    DuplicateName(String),

    /// A hand size is negative.
    #[error("invalid hand size {count} for {name}")]
    InvalidCount {
        /// The offending player.
        name: String,
        /// The hand size as given.
        count: i64,
    },

    /// No party of that name is registered.
    #[error("unknown party: {0}")]
    UnknownParty(String),

    /// No card has that name.
    #[error("unknown card: {0}")]
    UnknownCard(String),

    /// An argument is malformed: an empty disjunction, a bad turn or a bad time limit.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Knowledge was requested before any solve.
    #[error("the game has not been solved yet")]
    NotSolved,

    /// No world is consistent with the facts, so there is nothing to narrow.
    #[error("no consistent world: the facts are contradictory")]
    NoWorlds,

    /// The SAT solver itself failed.
    #[error("solver failure: {0}")]
    Engine(String),
}
