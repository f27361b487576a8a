//! The 0/1 integer model.
//!
//! There is one binary variable `x[e, c]` per edge `e` and color `c`; `x[e, c] = 1`
//! means that edge `e` is in color class `c`. Constraints are linear with integer
//! coefficients and are stored in a solver independent form, so that any
//! [`FeasibilitySolver`](crate::solver::FeasibilitySolver) can consume them and
//! any returned assignment can be checked against them.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::algorithms::{enumerate_cycles, segment_crossings, CrossingGraph};
use crate::config::ModelConfig;
use crate::data::{ColorAssignment, Cycle, EdgeId, PointId, PointSet};
use crate::Error;

///////////////////////////////////////////////////////////////////////////////
// Variables

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(pub usize);

impl fmt::Debug for VarId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "VarId({})", self.0)
  }
}

impl VarId {
  pub fn usize(self) -> usize {
    self.0
  }
}

/// The stable mapping between `(edge, color)` and variable ids:
/// `id = edge * n_colors + color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableIndex {
  n_edges: usize,
  n_colors: usize,
}

impl VariableIndex {
  pub fn new(n_edges: usize, n_colors: usize) -> VariableIndex {
    VariableIndex { n_edges, n_colors }
  }

  pub fn n_edges(&self) -> usize {
    self.n_edges
  }

  pub fn n_colors(&self) -> usize {
    self.n_colors
  }

  /// Total number of variables.
  pub fn len(&self) -> usize {
    self.n_edges * self.n_colors
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn var(&self, edge: EdgeId, color: usize) -> VarId {
    debug_assert!(edge.usize() < self.n_edges && color < self.n_colors);
    VarId(edge.usize() * self.n_colors + color)
  }

  /// Inverse of [`VariableIndex::var`].
  pub fn decode(&self, var: VarId) -> (EdgeId, usize) {
    (
      EdgeId(var.usize() / self.n_colors),
      var.usize() % self.n_colors,
    )
  }
}

///////////////////////////////////////////////////////////////////////////////
// Constraints

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
  LessEq,
  Eq,
  GreaterEq,
}

impl Sense {
  pub fn holds(self, lhs: i64, rhs: i64) -> bool {
    match self {
      Sense::LessEq => lhs <= rhs,
      Sense::Eq => lhs == rhs,
      Sense::GreaterEq => lhs >= rhs,
    }
  }
}

impl fmt::Display for Sense {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Sense::LessEq => "<=",
      Sense::Eq => "=",
      Sense::GreaterEq => ">=",
    })
  }
}

/// The family a constraint was generated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConstraintFamily {
  /// Every edge gets exactly one color.
  ColorUniqueness,
  /// Two crossing edges never share a color.
  NonCrossing,
  /// An edge of color `c` is crossed by at most `k` edges of color `c`.
  KPlanar,
  /// Every color class has `n - 1` edges.
  Cardinality,
  /// A cycle with the given number of edges is never monochromatic.
  ForbiddenCycle(usize),
  /// Every point has an incident edge of every color.
  VertexCoverage,
  /// Color `c > 0` is used only after color `c - 1` appeared on an earlier edge.
  ColorOrder,
}

impl fmt::Display for ConstraintFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConstraintFamily::ColorUniqueness => f.write_str("color_uniqueness"),
      ConstraintFamily::NonCrossing => f.write_str("non_crossing"),
      ConstraintFamily::KPlanar => f.write_str("k_planar"),
      ConstraintFamily::Cardinality => f.write_str("cardinality"),
      ConstraintFamily::ForbiddenCycle(len) => write!(f, "forbidden_{}_cycle", len),
      ConstraintFamily::VertexCoverage => f.write_str("vertex_coverage"),
      ConstraintFamily::ColorOrder => f.write_str("color_order"),
    }
  }
}

/// `Σ coefficient · x[var]  (sense)  rhs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearConstraint {
  pub family: ConstraintFamily,
  pub terms: Vec<(VarId, i64)>,
  pub sense: Sense,
  pub rhs: i64,
}

impl LinearConstraint {
  fn unit(family: ConstraintFamily, vars: Vec<VarId>, sense: Sense, rhs: i64) -> LinearConstraint {
    LinearConstraint {
      family,
      terms: vars.into_iter().map(|v| (v, 1)).collect(),
      sense,
      rhs,
    }
  }

  /// The left-hand side evaluated on a 0/1 vector indexed by [`VarId`].
  pub fn lhs(&self, values: &[bool]) -> i64 {
    self
      .terms
      .iter()
      .filter(|(var, _)| values[var.usize()])
      .map(|&(_, coefficient)| coefficient)
      .sum()
  }

  pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
    self.sense.holds(self.lhs(values), self.rhs)
  }
}

/// Size summary of a model, logged before solving and stored with each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
  pub n_variables: usize,
  pub n_constraints: usize,
  /// Constraint count per family, keyed by family name.
  pub per_family: BTreeMap<String, usize>,
}

///////////////////////////////////////////////////////////////////////////////
// ConstraintModel

/// Variables and constraints of one partition problem.
///
/// Building is a pure function of the point set, the crossing graph, the cycle
/// list and the configuration: the same inputs always produce the same
/// variable indexing and the same constraints in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintModel {
  index: VariableIndex,
  n_points: usize,
  constraints: Vec<LinearConstraint>,
}

impl ConstraintModel {
  /// Assemble the model from precomputed crossings and cycles.
  ///
  /// `cycles` should contain exactly the cycles of the lengths listed in
  /// `config.forbidden_cycles`; every cycle yields one constraint per color.
  pub fn build(
    point_set: &PointSet,
    crossings: &CrossingGraph,
    cycles: &[Cycle],
    config: &ModelConfig,
  ) -> ConstraintModel {
    let n = point_set.len();
    let n_colors = config.n_colors;
    let index = VariableIndex::new(point_set.n_edges(), n_colors);
    let edges = || point_set.edges().iter().map(|e| e.id);
    let colors = || 0..n_colors;
    let mut constraints = Vec::new();

    for e in edges() {
      let vars = colors().map(|c| index.var(e, c)).collect();
      constraints.push(LinearConstraint::unit(
        ConstraintFamily::ColorUniqueness,
        vars,
        Sense::Eq,
        1,
      ));
    }

    match config.k_planar {
      None => {
        for &(e, f) in crossings.pairs() {
          for c in colors() {
            constraints.push(LinearConstraint::unit(
              ConstraintFamily::NonCrossing,
              vec![index.var(e, c), index.var(f, c)],
              Sense::LessEq,
              1,
            ));
          }
        }
      }
      Some(k) => {
        // Σ_{f crosses e} x[f,c] + M·x[e,c] <= k + M, with M = |E| large enough
        // to switch the bound off when e does not have color c.
        let big_m = point_set.n_edges() as i64;
        for c in colors() {
          for e in edges() {
            let mut terms: Vec<(VarId, i64)> = crossings
              .partners(e)
              .iter()
              .map(|&f| (index.var(f, c), 1))
              .collect();
            terms.push((index.var(e, c), big_m));
            constraints.push(LinearConstraint {
              family: ConstraintFamily::KPlanar,
              terms,
              sense: Sense::LessEq,
              rhs: k as i64 + big_m,
            });
          }
        }
      }
    }

    if config.cardinality {
      for c in colors() {
        let vars = edges().map(|e| index.var(e, c)).collect();
        constraints.push(LinearConstraint::unit(
          ConstraintFamily::Cardinality,
          vars,
          Sense::Eq,
          n as i64 - 1,
        ));
      }
    }

    for cycle in cycles {
      let cycle_edges: Vec<EdgeId> = cycle.edges(point_set).collect();
      for c in colors() {
        let vars = cycle_edges.iter().map(|&e| index.var(e, c)).collect();
        constraints.push(LinearConstraint::unit(
          ConstraintFamily::ForbiddenCycle(cycle.len()),
          vars,
          Sense::LessEq,
          cycle.len() as i64 - 1,
        ));
      }
    }

    if config.cover_all_vertices {
      for c in colors() {
        for p in (0..n).map(PointId) {
          let vars = point_set
            .incident_edges(p)
            .map(|e| index.var(e, c))
            .collect();
          constraints.push(LinearConstraint::unit(
            ConstraintFamily::VertexCoverage,
            vars,
            Sense::GreaterEq,
            1,
          ));
        }
      }
    }

    // Classes are interchangeable, so any partition can be relabeled to list
    // its classes in the order of their first edges:
    // x[e,c] - Σ_{f<e} x[f,c-1] <= 0.
    if config.break_symmetry {
      for c in 1..n_colors {
        for e in edges() {
          let mut terms: Vec<(VarId, i64)> = (0..e.usize())
            .map(|f| (index.var(EdgeId(f), c - 1), -1))
            .collect();
          terms.push((index.var(e, c), 1));
          constraints.push(LinearConstraint {
            family: ConstraintFamily::ColorOrder,
            terms,
            sense: Sense::LessEq,
            rhs: 0,
          });
        }
      }
    }

    let model = ConstraintModel {
      index,
      n_points: n,
      constraints,
    };
    debug!(
      variables = model.n_variables(),
      constraints = model.constraints.len(),
      "built constraint model"
    );
    model
  }

  /// Compute crossings and cycles for `point_set`, then [`ConstraintModel::build`].
  pub fn from_point_set(point_set: &PointSet, config: &ModelConfig) -> ConstraintModel {
    let crossings = segment_crossings(point_set);
    let cycles = enumerate_cycles(point_set.len(), &config.forbidden_cycles);
    ConstraintModel::build(point_set, &crossings, &cycles, config)
  }

  pub fn index(&self) -> &VariableIndex {
    &self.index
  }

  pub fn n_variables(&self) -> usize {
    self.index.len()
  }

  pub fn n_colors(&self) -> usize {
    self.index.n_colors()
  }

  pub fn n_points(&self) -> usize {
    self.n_points
  }

  pub fn constraints(&self) -> &[LinearConstraint] {
    &self.constraints
  }

  /// Constraints of one family, in build order.
  pub fn constraints_of(
    &self,
    family: ConstraintFamily,
  ) -> impl Iterator<Item = &LinearConstraint> + '_ {
    self.constraints.iter().filter(move |c| c.family == family)
  }

  pub fn stats(&self) -> ModelStats {
    let mut per_family = BTreeMap::new();
    for constraint in &self.constraints {
      *per_family.entry(constraint.family.to_string()).or_insert(0) += 1;
    }
    ModelStats {
      n_variables: self.n_variables(),
      n_constraints: self.constraints.len(),
      per_family,
    }
  }

  /// Does the 0/1 vector satisfy every constraint?
  ///
  /// # Panics
  ///
  /// Panics if `values.len()` differs from [`ConstraintModel::n_variables`].
  pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
    assert_eq!(values.len(), self.n_variables());
    self.constraints.iter().all(|c| c.is_satisfied_by(values))
  }

  /// The first constraint violated by `values`, if any.
  pub fn first_violation(&self, values: &[bool]) -> Option<&LinearConstraint> {
    self.constraints.iter().find(|c| !c.is_satisfied_by(values))
  }

  /// Map a 0/1 vector back to a color per edge.
  ///
  /// Every edge must have exactly one variable set, which holds for any vector
  /// satisfying the color uniqueness constraints.
  pub fn decode(&self, values: &[bool]) -> Result<ColorAssignment, Error> {
    let n_colors = self.index.n_colors();
    let colors = values
      .chunks(n_colors.max(1))
      .enumerate()
      .map(|(edge, chunk)| {
        let mut set = chunk.iter().enumerate().filter(|(_, &v)| v).map(|(c, _)| c);
        match (set.next(), set.next()) {
          (Some(color), None) => Ok(color),
          _ => Err(Error::AmbiguousColor(edge)),
        }
      })
      .collect::<Result<Vec<usize>, Error>>()?;
    if colors.len() != self.index.n_edges() {
      return Err(Error::AssignmentLength {
        expected: self.index.n_edges(),
        found: colors.len(),
      });
    }
    ColorAssignment::new(colors, n_colors)
  }

  /// Inverse of [`ConstraintModel::decode`].
  pub fn encode(&self, assignment: &ColorAssignment) -> Vec<bool> {
    let mut values = vec![false; self.n_variables()];
    for (edge, &color) in assignment.colors().iter().enumerate() {
      values[self.index.var(EdgeId(edge), color).usize()] = true;
    }
    values
  }
}

///////////////////////////////////////////////////////////////////////////////
// Tests
