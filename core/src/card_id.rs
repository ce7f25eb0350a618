use std::fmt;

pub const CARD_ID_LEN: usize = 8;
pub const CARD_ID_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque client-side card identity. Cards that arrive in the document without
/// one get a generated base-36 token; identities are stable for the page session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn parse(value: &str) -> Result<Self, CardIdError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CardIdError::Empty);
        }
        for (idx, ch) in trimmed.chars().enumerate() {
            if ch.is_whitespace() {
                return Err(CardIdError::InvalidCharacter { ch, index: idx });
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Derives a fixed-length base-36 token from caller-supplied entropy bits.
    /// The caller picks the randomness source; the mapping itself is deterministic.
    pub fn from_entropy(bits: u64) -> Self {
        let alphabet = CARD_ID_ALPHABET.as_bytes();
        let base = alphabet.len() as u64;
        let mut state = bits.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
        let mut out = String::with_capacity(CARD_ID_LEN);
        for _ in 0..CARD_ID_LEN {
            state ^= state >> 31;
            state = state.wrapping_mul(0xBF58_476D_1CE4_E5B9);
            out.push(alphabet[(state % base) as usize] as char);
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for CardId {
    type Err = CardIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardIdError {
    Empty,
    InvalidCharacter { ch: char, index: usize },
}

impl fmt::Display for CardIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardIdError::Empty => write!(f, "card id must not be empty"),
            CardIdError::InvalidCharacter { ch, index } => {
                write!(f, "invalid character '{ch}' at position {index}")
            }
        }
    }
}

impl std::error::Error for CardIdError {}
