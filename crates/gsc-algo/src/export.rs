//! Solver-neutral renderings of a [`TransportModel`].
//!
//! Two formats are provided for handing a model to an engine outside this
//! crate: CPLEX LP text, and the dense `(c, A, b)` standard form for
//! `min cᵀx  s.t.  A x ≤ b,  x ≥ 0`.

use crate::model::{Sense, TransportModel};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Dense inequality form. Rows of `a` align with entries of `b`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardForm {
    pub c: Vec<f64>,
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
}

impl StandardForm {
    pub fn num_rows(&self) -> usize {
        self.b.len()
    }

    pub fn num_cols(&self) -> usize {
        self.c.len()
    }
}

/// Convert to `A x ≤ b`. `≥` rows are negated on both sides.
pub fn to_standard_form(model: &TransportModel) -> StandardForm {
    let n = model.num_variables();
    let mut a = Vec::with_capacity(model.num_constraints());
    let mut b = Vec::with_capacity(model.num_constraints());

    for row in &model.constraints {
        let sign = match row.sense {
            Sense::Le => 1.0,
            Sense::Ge => -1.0,
        };
        let mut dense = vec![0.0; n];
        for &(k, coeff) in &row.terms {
            dense[k] += sign * coeff;
        }
        a.push(dense);
        b.push(sign * row.rhs);
    }

    StandardForm {
        c: model.objective.coefficients.clone(),
        a,
        b,
    }
}

/// Render the model as CPLEX LP text.
pub fn to_lp_string(model: &TransportModel) -> String {
    let mut out = String::new();

    out.push_str("Minimize\n");
    out.push_str(" obj:");
    write_terms(
        &mut out,
        model
            .variables
            .iter()
            .map(|v| (model.objective.coefficients[v.index], v.index)),
        model,
    );
    out.push('\n');

    out.push_str("Subject To\n");
    for row in &model.constraints {
        let _ = write!(out, " {}:", row.kind.name());
        write_terms(&mut out, row.terms.iter().map(|&(k, a)| (a, k)), model);
        let op = match row.sense {
            Sense::Le => "<=",
            Sense::Ge => ">=",
        };
        let _ = writeln!(out, " {op} {}", row.rhs);
    }

    out.push_str("Bounds\n");
    for v in &model.variables {
        let _ = writeln!(out, " {} >= {}", v.name(), v.lower_bound);
    }
    out.push_str("End\n");
    out
}

fn write_terms(out: &mut String, terms: impl Iterator<Item = (f64, usize)>, model: &TransportModel) {
    let mut first = true;
    for (coeff, k) in terms {
        let sign = if coeff < 0.0 {
            "-"
        } else if first {
            ""
        } else {
            "+"
        };
        let _ = write!(out, " {sign}{} {}", coeff.abs(), model.variables[k].name());
        first = false;
    }
    if first {
        out.push_str(" 0");
    }
}

/// Write [`to_lp_string`] output to `path`.
pub fn write_lp(model: &TransportModel, path: &Path) -> Result<()> {
    std::fs::write(path, to_lp_string(model))
        .with_context(|| format!("writing LP model to {}", path.display()))
}

/// Write [`to_standard_form`] as JSON to `path`.
pub fn write_standard_form(model: &TransportModel, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&to_standard_form(model))
        .context("serializing standard form to JSON")?;
    std::fs::write(path, json)
        .with_context(|| format!("writing standard form to {}", path.display()))
}
