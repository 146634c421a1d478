pub mod controller;
pub mod state;

pub use controller::{SelectOutcome, SelectionController};
pub use state::{SelectionState, SelectionStatus};
