pub mod cli;
pub mod database;
pub mod error;
pub mod ledger;
pub mod types;
pub mod utils;

pub use database::{MemoryStore, SqliteStore, Store};
pub use error::{LedgerError, StoreError, ValidationError};
pub use ledger::{EditIdentity, EditSession, Ledger, LedgerConfig};
pub use types::{Coords, Workout, WorkoutInput, WorkoutKind, WorkoutType};
