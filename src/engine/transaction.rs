//! Transactional boundary around transition execution.
//!
//! The engine never implements transactions itself. A machine configured
//! with `use_transactions` hands the whole perform pipeline to a
//! `TransactionProvider`, which decides whether to commit based on the
//! block's result.

use crate::error::MachineError;

/// The unit of work a provider wraps. `Ok(false)` asks for a rollback.
pub type TransactionBlock<'a, O> = dyn FnMut(&mut O) -> Result<bool, MachineError> + 'a;

/// Host collaborator that wraps transition execution in a transaction.
pub trait TransactionProvider<O>: Send + Sync {
    /// Run `block` against `object`, committing only when it returns `Ok(true)`.
    fn within_transaction(
        &self,
        object: &mut O,
        block: &mut TransactionBlock<'_, O>,
    ) -> Result<bool, MachineError>;
}

/// Pass-through provider: runs the block and always commits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransaction;

impl<O> TransactionProvider<O> for NoTransaction {
    fn within_transaction(
        &self,
        object: &mut O,
        block: &mut TransactionBlock<'_, O>,
    ) -> Result<bool, MachineError> {
        block(object)
    }
}

/// In-memory provider for cloneable objects.
///
/// Snapshots the object before the block runs and restores the snapshot
/// when the block fails or errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotRollback;

impl<O: Clone> TransactionProvider<O> for SnapshotRollback {
    fn within_transaction(
        &self,
        object: &mut O,
        block: &mut TransactionBlock<'_, O>,
    ) -> Result<bool, MachineError> {
        let snapshot = object.clone();
        match block(object) {
            Ok(true) => Ok(true),
            Ok(false) => {
                tracing::warn!("transition failed, rolling back object snapshot");
                *object = snapshot;
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "transition errored, rolling back object snapshot");
                *object = snapshot;
                Err(e)
            }
        }
    }
}
