//! Structural plan snapshots: text dump, JSON, and a binary fingerprint.
//!
//! The fingerprint is the CRC32 of the plan's postcard serialization. Two
//! plans with equal fingerprints are structurally identical for rewrite
//! purposes, which is what the idempotence and conservativeness checks
//! compare.

use crate::algebra::{LogicalPlan, OpId, OperatorKind};

/// CRC32 of the plan's binary serialization.
pub fn fingerprint(plan: &LogicalPlan) -> u32 {
    let bytes = postcard::to_allocvec(plan).expect("plan serialization should not fail");
    crc32fast::hash(&bytes)
}

/// Pretty JSON rendering of the plan structure.
pub fn to_json(plan: &LogicalPlan) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(plan)
}

/// Human-readable plan dump.
///
/// One operator per line, inputs indented below their consumer; a node with
/// several consumers is printed in full once and referenced as `ref op#N`
/// afterwards. Subplan nested plans render under a `nested plan:` label.
pub fn dump(plan: &LogicalPlan) -> String {
    let mut out = String::new();
    let mut printed = std::collections::HashSet::new();
    for &root in plan.roots() {
        dump_op(plan, root, 0, &mut printed, &mut out);
    }
    out
}

fn dump_op(
    plan: &LogicalPlan,
    id: OpId,
    indent: usize,
    printed: &mut std::collections::HashSet<OpId>,
    out: &mut String,
) {
    let pad = "  ".repeat(indent);
    if !printed.insert(id) {
        out.push_str(&format!("{pad}ref op#{}\n", id.index()));
        return;
    }

    let op = plan.operator(id);
    match &op.kind {
        OperatorKind::EmptySource | OperatorKind::NestedSource => {
            out.push_str(&format!("{pad}{}\n", op.kind.name()));
        }
        OperatorKind::Assign { variable, expr } => {
            out.push_str(&format!("{pad}assign {variable} := {expr}\n"));
        }
        OperatorKind::Select { condition } => {
            out.push_str(&format!("{pad}select {condition}\n"));
        }
        OperatorKind::Aggregate {
            variables,
            exprs,
            partitioning_variable,
        } => {
            let bindings = variables
                .iter()
                .zip(exprs)
                .map(|(v, e)| format!("{v} := {e}"))
                .collect::<Vec<_>>()
                .join(", ");
            match partitioning_variable {
                Some(p) => {
                    out.push_str(&format!("{pad}aggregate {bindings} [partition {p}]\n"));
                }
                None => out.push_str(&format!("{pad}aggregate {bindings}\n")),
            }
        }
        OperatorKind::Subplan { plans } => {
            out.push_str(&format!("{pad}subplan\n"));
            for nested in plans {
                out.push_str(&format!("{pad}  nested plan:\n"));
                for &root in &nested.roots {
                    dump_op(plan, root, indent + 2, printed, out);
                }
            }
        }
    }
    for &input in &plan.operator(id).inputs {
        dump_op(plan, input, indent + 1, printed, out);
    }
}
