pub mod card_id;
pub mod controller;
pub mod geometry;
pub mod protocol;
pub mod table;

pub use card_id::{CardId, CardIdError, CARD_ID_ALPHABET, CARD_ID_LEN};
pub use controller::{CardPhase, CommitResolution, DragController, ReleaseDecision};
pub use geometry::{center_displacement, Rect};
pub use protocol::{CommitError, CommitOutcome, PlayRequest};
pub use table::{OccupancyTable, SeatKey, SeatKeyError, SeatSlot, TableError};
