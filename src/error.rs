use derive_more::{Display, Error, From};

/// Closed set of operational failures. Missing-field punches and slotless
/// events are not errors (they degrade or skip, see `normalize` and
/// `UpsertOutcome`); only the backing store can actually fail.
#[derive(Debug, Display, Error, From)]
pub enum ClockError {
    #[display(fmt = "storage unavailable: {}", _0)]
    Storage(#[error(source)] sqlx::Error),
}
