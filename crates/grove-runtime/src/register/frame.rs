//! Per-partition call-stack frame.

use std::sync::Arc;

use super::global::GlobalRegisters;
use super::register_set::RegisterSet;

/// One partition's execution frame: a chain of local register scopes plus
/// the shared global handle.
///
/// A frame is owned exclusively by its partition; only the globals are
/// shared, and those are sealed read-only before execution starts.
#[derive(Debug)]
pub struct CallStackFrame {
    globals: Arc<GlobalRegisters>,
    scopes: Vec<RegisterSet>,
}

impl CallStackFrame {
    /// Frame with one root scope of `local_capacity` registers.
    pub fn new(globals: Arc<GlobalRegisters>, local_capacity: usize) -> Self {
        Self {
            globals,
            scopes: vec![RegisterSet::new(local_capacity)],
        }
    }

    #[inline]
    pub fn globals(&self) -> &GlobalRegisters {
        &self.globals
    }

    /// The innermost local scope.
    #[inline]
    pub fn locals(&self) -> &RegisterSet {
        self.scopes.last().expect("frame always has a root scope")
    }

    #[inline]
    pub fn locals_mut(&mut self) -> &mut RegisterSet {
        self.scopes
            .last_mut()
            .expect("frame always has a root scope")
    }

    /// Enter a nested scope with its own registers.
    pub fn push_scope(&mut self, capacity: usize) {
        self.scopes.push(RegisterSet::new(capacity));
    }

    /// Leave the innermost scope.
    ///
    /// # Panics
    /// Panics when only the root scope remains.
    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "pop on root scope");
        self.scopes.pop();
    }

    /// Number of active scopes.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
