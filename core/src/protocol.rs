use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card_id::CardId;
use crate::table::SeatKey;

/// JSON body of the play-card POST. Field names are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRequest {
    pub card_id: CardId,
    pub seat_id: SeatKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
}

impl PlayRequest {
    pub fn new(card_id: CardId, seat_id: SeatKey) -> Self {
        Self {
            card_id,
            seat_id,
            player_id: None,
        }
    }

    pub fn with_player(mut self, player_id: Option<String>) -> Self {
        self.player_id = player_id;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// 2xx status and a parseable body.
    Acknowledged,
    Failed(CommitError),
}

/// Every failure variant takes the same revert path; the distinction only
/// feeds logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    Transport(String),
    Status(u16),
    InvalidBody(String),
    TimedOut,
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitError::Transport(detail) => write!(f, "transport error: {detail}"),
            CommitError::Status(status) => write!(f, "server answered status {status}"),
            CommitError::InvalidBody(detail) => write!(f, "unparseable response body: {detail}"),
            CommitError::TimedOut => write!(f, "commit timed out"),
        }
    }
}

impl std::error::Error for CommitError {}
