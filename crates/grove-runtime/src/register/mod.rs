//! Register-indexed storage: global broadcast values and per-partition
//! call-stack locals.

mod accessor;
mod frame;
mod global;
mod register_set;


pub use accessor::{GlobalRegisterAccessor, LocalRegisterAccessor};
pub use frame::CallStackFrame;
pub use global::{GlobalRegisters, GlobalRegistersBuilder};
pub use register_set::{RegisterSet, RegisterValue};
