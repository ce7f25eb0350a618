use std::fmt;

use crate::card_id::CardId;

/// Key identifying a seat element, taken from its id or secondary class token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SeatKey(String);

impl SeatKey {
    pub fn parse(value: &str) -> Result<Self, SeatKeyError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SeatKeyError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatKeyError {
    Empty,
}

impl fmt::Display for SeatKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatKeyError::Empty => write!(f, "seat key must not be empty"),
        }
    }
}

impl std::error::Error for SeatKeyError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatSlot {
    Free,
    /// Claimed at commit-start so a second card cannot target the same seat
    /// while the first commit is in flight. Released if the commit fails.
    Reserved(CardId),
    /// Terminal; an occupied seat never frees up for the rest of the session.
    Occupied(CardId),
}

impl SeatSlot {
    pub fn is_free(&self) -> bool {
        matches!(self, SeatSlot::Free)
    }

    pub fn occupant(&self) -> Option<&CardId> {
        match self {
            SeatSlot::Occupied(card) => Some(card),
            _ => None,
        }
    }
}

/// Seat-key to slot mapping in document order. Built once at load from the
/// seats present at that time and never resized afterward.
#[derive(Debug, Clone)]
pub struct OccupancyTable {
    entries: Vec<(SeatKey, SeatSlot)>,
}

impl OccupancyTable {
    pub fn new<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = SeatKey>,
    {
        let mut entries: Vec<(SeatKey, SeatSlot)> = Vec::new();
        for key in keys {
            if entries.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            entries.push((key, SeatSlot::Free));
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn slot(&self, key: &SeatKey) -> Option<&SeatSlot> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, slot)| slot)
    }

    pub fn is_free(&self, key: &SeatKey) -> bool {
        self.slot(key).is_some_and(SeatSlot::is_free)
    }

    pub fn occupant(&self, key: &SeatKey) -> Option<&CardId> {
        self.slot(key).and_then(SeatSlot::occupant)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SeatKey, &SeatSlot)> {
        self.entries.iter().map(|(key, slot)| (key, slot))
    }

    pub fn reserve(&mut self, key: &SeatKey, card: &CardId) -> Result<(), TableError> {
        let slot = self.slot_mut(key)?;
        match slot {
            SeatSlot::Free => {
                *slot = SeatSlot::Reserved(card.clone());
                Ok(())
            }
            SeatSlot::Reserved(by) | SeatSlot::Occupied(by) => Err(TableError::SeatTaken {
                seat: key.clone(),
                by: by.clone(),
            }),
        }
    }

    /// Rolls a failed commit back. Only the reserving card may release, and a
    /// committed seat can never be released.
    pub fn release(&mut self, key: &SeatKey, card: &CardId) -> Result<(), TableError> {
        let slot = self.slot_mut(key)?;
        match slot {
            SeatSlot::Reserved(by) if by == card => {
                *slot = SeatSlot::Free;
                Ok(())
            }
            SeatSlot::Reserved(_) => Err(TableError::WrongCard { seat: key.clone() }),
            SeatSlot::Free | SeatSlot::Occupied(_) => {
                Err(TableError::NotReserved { seat: key.clone() })
            }
        }
    }

    pub fn commit(&mut self, key: &SeatKey, card: &CardId) -> Result<(), TableError> {
        let slot = self.slot_mut(key)?;
        match slot {
            SeatSlot::Reserved(by) if by == card => {
                *slot = SeatSlot::Occupied(card.clone());
                Ok(())
            }
            SeatSlot::Reserved(_) => Err(TableError::WrongCard { seat: key.clone() }),
            SeatSlot::Free | SeatSlot::Occupied(_) => {
                Err(TableError::NotReserved { seat: key.clone() })
            }
        }
    }

    fn slot_mut(&mut self, key: &SeatKey) -> Result<&mut SeatSlot, TableError> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, slot)| slot)
            .ok_or_else(|| TableError::UnknownSeat { seat: key.clone() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    UnknownSeat { seat: SeatKey },
    SeatTaken { seat: SeatKey, by: CardId },
    NotReserved { seat: SeatKey },
    WrongCard { seat: SeatKey },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::UnknownSeat { seat } => write!(f, "unknown seat '{seat}'"),
            TableError::SeatTaken { seat, by } => {
                write!(f, "seat '{seat}' already taken by card '{by}'")
            }
            TableError::NotReserved { seat } => write!(f, "seat '{seat}' is not reserved"),
            TableError::WrongCard { seat } => {
                write!(f, "seat '{seat}' is reserved by a different card")
            }
        }
    }
}

impl std::error::Error for TableError {}
