use itertools::Itertools;
use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::{ColorAssignment, EdgeId, PointSet};

/// Outcome of checking one color class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassReport {
  pub color: usize,
  pub edge_count: usize,
  /// A spanning tree on `n` points has `n - 1` edges.
  pub expected_edge_count: usize,
  pub acyclic: bool,
  /// Every point is reachable from every other point.
  pub connected: bool,
  /// No two edges of the class cross.
  pub plane: bool,
}

impl ClassReport {
  pub fn has_expected_edge_count(&self) -> bool {
    self.edge_count == self.expected_edge_count
  }

  pub fn is_plane_spanning_tree(&self) -> bool {
    self.has_expected_edge_count() && self.acyclic && self.connected && self.plane
  }
}

/// Per-class results plus the aggregate verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
  pub classes: Vec<ClassReport>,
  pub passed: bool,
  pub note: String,
}

impl VerificationReport {
  pub fn failing_classes(&self) -> impl Iterator<Item = &ClassReport> {
    self.classes.iter().filter(|c| !c.is_plane_spanning_tree())
  }
}

/// Check, by direct graph analysis, whether every color class of `assignment`
/// is a plane spanning tree of `point_set`.
///
/// The assignment is not modified. A failed check is not an error: the
/// integer model only encodes necessary conditions, so a feasible model may
/// still produce classes that are not trees.
pub fn verify_assignment(point_set: &PointSet, assignment: &ColorAssignment) -> VerificationReport {
  let classes: Vec<ClassReport> = (0..assignment.n_colors())
    .map(|color| check_class(point_set, color, assignment.class(color).collect()))
    .collect();
  let passed = classes.iter().all(ClassReport::is_plane_spanning_tree);
  let note = if passed {
    format!(
      "all {} color classes are plane spanning trees",
      classes.len()
    )
  } else {
    let failing: Vec<String> = classes
      .iter()
      .filter(|c| !c.is_plane_spanning_tree())
      .map(describe_failure)
      .collect();
    format!(
      "partition is not a partition into plane spanning trees: {}",
      failing.join("; ")
    )
  };
  if passed {
    debug!("{}", note);
  } else {
    warn!("{}", note);
  }
  VerificationReport {
    classes,
    passed,
    note,
  }
}

fn check_class(point_set: &PointSet, color: usize, edges: Vec<EdgeId>) -> ClassReport {
  let n = point_set.len();
  let mut graph: UnGraph<(), ()> = UnGraph::with_capacity(n, edges.len());
  for _ in 0..n {
    graph.add_node(());
  }
  for &e in &edges {
    let edge = point_set.edge(e);
    graph.add_edge(
      NodeIndex::new(edge.min.usize()),
      NodeIndex::new(edge.max.usize()),
      (),
    );
  }
  let plane = edges
    .iter()
    .tuple_combinations()
    .all(|(&a, &b)| !point_set.segment(a).crosses(&point_set.segment(b)));
  ClassReport {
    color,
    edge_count: edges.len(),
    expected_edge_count: n - 1,
    acyclic: !is_cyclic_undirected(&graph),
    connected: connected_components(&graph) == 1,
    plane,
  }
}

fn describe_failure(class: &ClassReport) -> String {
  let mut reasons = Vec::new();
  if !class.has_expected_edge_count() {
    reasons.push(format!(
      "{} edges instead of {}",
      class.edge_count, class.expected_edge_count
    ));
  }
  if !class.acyclic {
    reasons.push("contains a cycle".to_string());
  }
  if !class.connected {
    reasons.push("is disconnected".to_string());
  }
  if !class.plane {
    reasons.push("has crossing edges".to_string());
  }
  format!("color {} {}", class.color, reasons.join(", "))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::PointId;

  // Regular hexagon, points numbered counter-clockwise.
  fn hexagon() -> PointSet {
    let coords = (0..6i32)
      .map(|i| {
        let angle = std::f64::consts::PI / 3.0 * f64::from(i);
        [angle.cos(), angle.sin()]
      })
      .collect();
    PointSet::new(coords).unwrap()
  }

  fn assignment(ps: &PointSet, classes: &[&[(usize, usize)]]) -> ColorAssignment {
    let mut colors = vec![usize::MAX; ps.n_edges()];
    for (color, class) in classes.iter().enumerate() {
      for &(a, b) in class.iter() {
        colors[ps.edge_between(PointId(a), PointId(b)).usize()] = color;
      }
    }
    ColorAssignment::for_point_set(ps, colors, classes.len()).unwrap()
  }

  // Three rotated zigzag paths: plane spanning trees of the hexagon.
  const GOOD: [&[(usize, usize)]; 3] = [
    &[(0, 1), (1, 5), (2, 5), (2, 4), (3, 4)],
    &[(1, 2), (0, 2), (0, 3), (3, 5), (4, 5)],
    &[(2, 3), (1, 3), (1, 4), (0, 4), (0, 5)],
  ];

  #[test]
  fn accepts_plane_spanning_trees() {
    let ps = hexagon();
    let report = verify_assignment(&ps, &assignment(&ps, &GOOD));
    assert!(report.passed, "{}", report.note);
    assert_eq!(report.classes.len(), 3);
    assert_eq!(report.failing_classes().count(), 0);
  }

  #[test]
  fn detects_cycles_and_disconnection() {
    let ps = hexagon();
    // Swap (0, 1) and (4, 5) between the first two classes: class 0 now
    // contains the triangle 2-4-5 and misses point 0.
    let bad: [&[(usize, usize)]; 3] = [
      &[(4, 5), (1, 5), (2, 5), (2, 4), (3, 4)],
      &[(1, 2), (0, 2), (0, 3), (3, 5), (0, 1)],
      GOOD[2],
    ];
    let report = verify_assignment(&ps, &assignment(&ps, &bad));
    assert!(!report.passed);
    let class = &report.classes[0];
    assert!(class.has_expected_edge_count());
    assert!(!class.acyclic);
    assert!(!class.connected);
    assert!(report.note.contains("color 0"));
  }

  #[test]
  fn detects_crossings() {
    let ps = hexagon();
    // (1, 4) crosses (0, 2) and (0, 3).
    let crossing: [&[(usize, usize)]; 3] = [
      GOOD[0],
      &[(1, 4), (0, 2), (0, 3), (3, 5), (4, 5)],
      &[(2, 3), (1, 3), (1, 2), (0, 4), (0, 5)],
    ];
    let report = verify_assignment(&ps, &assignment(&ps, &crossing));
    assert!(!report.passed);
    assert!(!report.classes[1].plane);
  }
}
