//! Aggregate evaluators: the per-partition reduction side of the
//! identifiers aggregate consolidation installs.

use grove_data::value::{TaggedValuePointable, ValueStorage};

use crate::eval::{RuntimeError, TaskContext};

/// Stateful per-partition reduction: `init` once per group, `step` per
/// item, `finish` writes the encoded result.
pub trait AggregateEvaluator {
    fn init(&mut self) -> Result<(), RuntimeError>;
    fn step(&mut self, item: &TaggedValuePointable<'_>) -> Result<(), RuntimeError>;
    fn finish(&mut self, out: &mut ValueStorage) -> Result<(), RuntimeError>;
}

pub trait AggregateEvaluatorFactory: Send + Sync {
    fn create_aggregate(
        &self,
        ctx: &TaskContext,
    ) -> Result<Box<dyn AggregateEvaluator>, RuntimeError>;
}

/// `fn:count-aggregate`.
pub struct CountAggregateFactory;

impl AggregateEvaluatorFactory for CountAggregateFactory {
    fn create_aggregate(
        &self,
        _ctx: &TaskContext,
    ) -> Result<Box<dyn AggregateEvaluator>, RuntimeError> {
        Ok(Box::new(CountAggregate { count: 0 }))
    }
}

struct CountAggregate {
    count: i64,
}

impl AggregateEvaluator for CountAggregate {
    fn init(&mut self) -> Result<(), RuntimeError> {
        self.count = 0;
        Ok(())
    }

    fn step(&mut self, _item: &TaggedValuePointable<'_>) -> Result<(), RuntimeError> {
        self.count += 1;
        Ok(())
    }

    fn finish(&mut self, out: &mut ValueStorage) -> Result<(), RuntimeError> {
        out.write_long(self.count);
        Ok(())
    }
}

/// `fn:avg-aggregate` over the numeric kinds.
pub struct AvgAggregateFactory;

impl AggregateEvaluatorFactory for AvgAggregateFactory {
    fn create_aggregate(
        &self,
        _ctx: &TaskContext,
    ) -> Result<Box<dyn AggregateEvaluator>, RuntimeError> {
        Ok(Box::new(AvgAggregate { sum: 0.0, count: 0 }))
    }
}

struct AvgAggregate {
    sum: f64,
    count: i64,
}

impl AggregateEvaluator for AvgAggregate {
    fn init(&mut self) -> Result<(), RuntimeError> {
        self.sum = 0.0;
        self.count = 0;
        Ok(())
    }

    fn step(&mut self, item: &TaggedValuePointable<'_>) -> Result<(), RuntimeError> {
        let v = if let Some(i) = item.as_long() {
            i.value() as f64
        } else if let Some(d) = item.as_double() {
            d.value()
        } else if let Some(dec) = item.as_decimal() {
            dec.unscaled() as f64 / 10f64.powi(dec.scale() as i32)
        } else {
            return Err(RuntimeError::TypeMismatch {
                context: "fn:avg-aggregate",
                expected: "numeric item",
                found: format!("{:?}", item.tag()),
            });
        };
        self.sum += v;
        self.count += 1;
        Ok(())
    }

    fn finish(&mut self, out: &mut ValueStorage) -> Result<(), RuntimeError> {
        if self.count == 0 {
            // avg() over the empty sequence is the empty sequence.
            out.append(grove_data::value::OwnedValue::empty_sequence().bytes());
        } else {
            out.write_double(self.sum / self.count as f64);
        }
        Ok(())
    }
}
