//! Runtime `cast as` evaluator for the boolean, numeric and string-like
//! families.
//!
//! Calendar, duration and binary targets go through their own parsing
//! collaborators and are not registered here; an argument outside the
//! kernel's domain fails with `TypeMismatch`.

use grove_data::AtomicType;
use grove_data::value::{TaggedValuePointable, ValueStorage};

use crate::eval::{
    ArgumentEvaluator, BoxedEvaluator, RuntimeError, ScalarEvaluatorFactory, TaggedValueKernel,
    TaskContext,
};

pub struct CastAsEvaluatorFactory {
    target: AtomicType,
}

impl CastAsEvaluatorFactory {
    pub fn new(target: AtomicType) -> Self {
        Self { target }
    }
}

impl ScalarEvaluatorFactory for CastAsEvaluatorFactory {
    fn create_evaluator(
        &self,
        _ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError> {
        super::expect_args("cast-as", 1, args.len())?;
        Ok(ArgumentEvaluator::boxed(
            args,
            CastKernel {
                target: self.target,
            },
        ))
    }
}

struct CastKernel {
    target: AtomicType,
}

impl TaggedValueKernel for CastKernel {
    fn invoke(
        &mut self,
        args: &[TaggedValuePointable<'_>],
        out: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        let value = &args[0];
        match self.target {
            AtomicType::Boolean => out.write_boolean(boolean_of(value)?),
            AtomicType::Byte => {
                let v = integer_of(value)?;
                out.write_byte(narrow(v, i8::MIN as i64, i8::MAX as i64)? as i8);
            }
            AtomicType::Short => {
                let v = integer_of(value)?;
                out.write_short(narrow(v, i16::MIN as i64, i16::MAX as i64)? as i16);
            }
            AtomicType::Int => {
                let v = integer_of(value)?;
                out.write_int(narrow(v, i32::MIN as i64, i32::MAX as i64)? as i32);
            }
            AtomicType::Long => out.write_long(integer_of(value)?),
            AtomicType::Float => out.write_float(double_of(value)? as f32),
            AtomicType::Double => out.write_double(double_of(value)?),
            AtomicType::Decimal => {
                let v = integer_of(value)?;
                out.write_decimal(v, 0);
            }
            AtomicType::String | AtomicType::Untyped | AtomicType::AnyUri => {
                out.write_text(self.target.tag(), &lexical_of(value)?);
            }
            _ => return Err(unsupported(value)),
        }
        Ok(())
    }
}

fn unsupported(value: &TaggedValuePointable<'_>) -> RuntimeError {
    RuntimeError::TypeMismatch {
        context: "cast-as",
        expected: "boolean, numeric or string-like operand",
        found: format!("{:?}", value.tag()),
    }
}

fn boolean_of(value: &TaggedValuePointable<'_>) -> Result<bool, RuntimeError> {
    if let Some(b) = value.as_boolean() {
        return Ok(b.value());
    }
    if let Some(i) = value.as_long() {
        return Ok(i.value() != 0);
    }
    if let Some(d) = value.as_double() {
        let v = d.value();
        return Ok(v != 0.0 && !v.is_nan());
    }
    if let Some(s) = value.as_string() {
        return match s.text()? {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(RuntimeError::TypeMismatch {
                context: "cast-as-boolean",
                expected: "boolean lexical form",
                found: other.to_owned(),
            }),
        };
    }
    Err(unsupported(value))
}

fn integer_of(value: &TaggedValuePointable<'_>) -> Result<i64, RuntimeError> {
    if let Some(i) = value.as_long() {
        return Ok(i.value());
    }
    if let Some(d) = value.as_double() {
        return Ok(d.value() as i64);
    }
    if let Some(dec) = value.as_decimal() {
        let mut v = dec.unscaled();
        for _ in 0..dec.scale().max(0) {
            v /= 10;
        }
        return Ok(v);
    }
    if let Some(b) = value.as_boolean() {
        return Ok(b.value() as i64);
    }
    if let Some(s) = value.as_string() {
        return s.text()?.trim().parse::<i64>().map_err(|_| {
            RuntimeError::TypeMismatch {
                context: "cast-as-integer",
                expected: "integer lexical form",
                found: s.text().unwrap_or("<non-utf8>").to_owned(),
            }
        });
    }
    Err(unsupported(value))
}

fn double_of(value: &TaggedValuePointable<'_>) -> Result<f64, RuntimeError> {
    if let Some(d) = value.as_double() {
        return Ok(d.value());
    }
    if let Some(i) = value.as_long() {
        return Ok(i.value() as f64);
    }
    if let Some(dec) = value.as_decimal() {
        return Ok(dec.unscaled() as f64 / 10f64.powi(dec.scale() as i32));
    }
    if let Some(b) = value.as_boolean() {
        return Ok(b.value() as u8 as f64);
    }
    if let Some(s) = value.as_string() {
        return s.text()?.trim().parse::<f64>().map_err(|_| {
            RuntimeError::TypeMismatch {
                context: "cast-as-double",
                expected: "double lexical form",
                found: s.text().unwrap_or("<non-utf8>").to_owned(),
            }
        });
    }
    Err(unsupported(value))
}

fn lexical_of(value: &TaggedValuePointable<'_>) -> Result<String, RuntimeError> {
    if let Some(s) = value.as_string() {
        return Ok(s.text()?.to_owned());
    }
    if let Some(b) = value.as_boolean() {
        return Ok(if b.value() { "true" } else { "false" }.to_owned());
    }
    if let Some(i) = value.as_long() {
        return Ok(i.value().to_string());
    }
    if let Some(d) = value.as_double() {
        return Ok(d.value().to_string());
    }
    if let Some(dec) = value.as_decimal() {
        return Ok(decimal_lexical(dec.unscaled(), dec.scale()));
    }
    Err(unsupported(value))
}

/// Canonical decimal rendering: insert the point `scale` digits from the
/// right.
fn decimal_lexical(unscaled: i64, scale: i8) -> String {
    if scale <= 0 {
        return unscaled.to_string();
    }
    let negative = unscaled < 0;
    let digits = unscaled.unsigned_abs().to_string();
    let scale = scale as usize;
    let (int_part, frac_part) = if digits.len() > scale {
        let split = digits.len() - scale;
        (digits[..split].to_owned(), digits[split..].to_owned())
    } else {
        ("0".to_owned(), format!("{digits:0>scale$}"))
    };
    let sign = if negative { "-" } else { "" };
    format!("{sign}{int_part}.{frac_part}")
}

fn narrow(v: i64, min: i64, max: i64) -> Result<i64, RuntimeError> {
    if v < min || v > max {
        return Err(RuntimeError::TypeMismatch {
            context: "cast-as",
            expected: "value within target range",
            found: v.to_string(),
        });
    }
    Ok(v)
}
