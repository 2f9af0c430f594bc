//! Fixed-capacity indexed value storage.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use grove_data::value::OwnedValue;

use crate::eval::RuntimeError;

/// A register slot's content: an encoded value, or an opaque object for
/// constants reused across evaluators (e.g. resolved collection handles).
#[derive(Clone)]
pub enum RegisterValue {
    Value(OwnedValue),
    Object(Arc<dyn Any + Send + Sync>),
}

impl RegisterValue {
    /// The encoded value, when this slot holds one.
    pub fn as_value(&self) -> Option<&OwnedValue> {
        match self {
            Self::Value(v) => Some(v),
            Self::Object(_) => None,
        }
    }

    /// Downcast the opaque object.
    pub fn as_object<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Object(o) => o.downcast_ref(),
            Self::Value(_) => None,
        }
    }
}

impl fmt::Debug for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// Fixed-size mapping from register index to value.
///
/// Capacity is set at construction; `get`/`set` beyond it fail with
/// `IndexOutOfRange`, which indicates a compiler defect rather than bad
/// input data.
#[derive(Debug, Clone)]
pub struct RegisterSet {
    slots: Vec<Option<RegisterValue>>,
}

impl RegisterSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Read a slot. `Ok(None)` when the slot was never written.
    pub fn get(&self, index: usize) -> Result<Option<&RegisterValue>, RuntimeError> {
        self.slots
            .get(index)
            .map(Option::as_ref)
            .ok_or(RuntimeError::IndexOutOfRange {
                index,
                capacity: self.slots.len(),
            })
    }

    /// Write exactly one slot; no other slot is touched.
    pub fn set(&mut self, index: usize, value: RegisterValue) -> Result<(), RuntimeError> {
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(RuntimeError::IndexOutOfRange { index, capacity })?;
        *slot = Some(value);
        Ok(())
    }
}
