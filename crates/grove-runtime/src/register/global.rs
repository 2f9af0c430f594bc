//! The global (broadcast) register set.
//!
//! Globals are written exactly once, before any partition starts evaluating,
//! then shared read-only. The builder/seal split enforces that by
//! construction: only the builder has `set`, and sealing consumes it.

use super::register_set::{RegisterSet, RegisterValue};
use crate::eval::RuntimeError;

/// Write stage: populated during execution setup, single-threaded.
#[derive(Debug)]
pub struct GlobalRegistersBuilder {
    regs: RegisterSet,
}

impl GlobalRegistersBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            regs: RegisterSet::new(capacity),
        }
    }

    pub fn set(&mut self, index: usize, value: RegisterValue) -> Result<(), RuntimeError> {
        self.regs.set(index, value)
    }

    /// Seal into the read-only handle shared across partitions.
    pub fn seal(self) -> GlobalRegisters {
        GlobalRegisters { regs: self.regs }
    }
}

/// Read stage: immutable after sealing; share via `Arc`.
#[derive(Debug)]
pub struct GlobalRegisters {
    regs: RegisterSet,
}

impl GlobalRegisters {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.regs.capacity()
    }

    pub fn get(&self, index: usize) -> Result<Option<&RegisterValue>, RuntimeError> {
        self.regs.get(index)
    }
}
