use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("A deck needs at least one pair")]
    NoPairs,
    #[error("Board size does not match deck size")]
    BoardSizeMismatch,
    #[error("Deck must hold each pair value exactly twice plus one joker")]
    MalformedDeck,
}

pub type Result<T> = core::result::Result<T, GameError>;
