//! Machine execution.
//!
//! This module turns declared states and events into performed
//! transitions:
//! - `Machine` declares states, events and callbacks for one attribute
//! - `Event` selects the applicable `Transition` for an object
//! - `Transition` runs the before/persist/action/after pipeline, alone or
//!   in parallel with transitions of other machines
//! - `TransactionProvider` wraps that pipeline in a host transaction
//! - `MachineRegistry` holds every machine of one object type

mod callback;
mod event;
mod machine;
mod options;
mod registry;
mod transaction;
mod transition;

pub use callback::{Callback, CallbackTarget};
pub use event::{Event, TransitionRule};
pub use machine::Machine;
pub use options::MachineOptions;
pub use registry::MachineRegistry;
pub use transaction::{NoTransaction, SnapshotRollback, TransactionBlock, TransactionProvider};
pub use transition::Transition;
