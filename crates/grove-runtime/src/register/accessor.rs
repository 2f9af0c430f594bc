//! Register accessors: a compile-time-assigned index plus get/set
//! indirection.
//!
//! An accessor is stateless except for its fixed index, and performs no
//! validation beyond what the underlying register set enforces. Two
//! accessors on the same index are observably aliases, which is how several
//! compiled expressions denote one physical register.

use std::fmt;

use super::frame::CallStackFrame;
use super::global::GlobalRegistersBuilder;
use super::register_set::{RegisterSet, RegisterValue};
use crate::eval::RuntimeError;

/// Accessor over the global (broadcast) registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalRegisterAccessor {
    index: usize,
}

impl GlobalRegisterAccessor {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Read through a frame's global handle.
    pub fn get<'a>(
        &self,
        frame: &'a CallStackFrame,
    ) -> Result<Option<&'a RegisterValue>, RuntimeError> {
        frame.globals().get(self.index)
    }

    /// Read a raw register set (setup-side access).
    pub fn get_regs<'a>(
        &self,
        regs: &'a RegisterSet,
    ) -> Result<Option<&'a RegisterValue>, RuntimeError> {
        regs.get(self.index)
    }

    /// Write during setup. Globals are only writable through the builder;
    /// once sealed no write path exists.
    pub fn set(
        &self,
        builder: &mut GlobalRegistersBuilder,
        value: RegisterValue,
    ) -> Result<(), RuntimeError> {
        builder.set(self.index, value)
    }
}

impl fmt::Display for GlobalRegisterAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G@{}", self.index)
    }
}

/// Accessor over the innermost local scope of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalRegisterAccessor {
    index: usize,
}

impl LocalRegisterAccessor {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get<'a>(
        &self,
        frame: &'a CallStackFrame,
    ) -> Result<Option<&'a RegisterValue>, RuntimeError> {
        frame.locals().get(self.index)
    }

    pub fn set(&self, frame: &mut CallStackFrame, value: RegisterValue) -> Result<(), RuntimeError> {
        frame.locals_mut().set(self.index, value)
    }
}

impl fmt::Display for LocalRegisterAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L@{}", self.index)
    }
}
