use serde::{Deserialize, Serialize};

use super::{EdgeId, PointSet};
use crate::Error;

/// One color per edge of the complete graph, indexed by [`EdgeId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorAssignment {
  colors: Vec<usize>,
  n_colors: usize,
}

impl ColorAssignment {
  /// `colors[e]` is the color of edge `EdgeId(e)`.
  pub fn new(colors: Vec<usize>, n_colors: usize) -> Result<ColorAssignment, Error> {
    if let Some(&color) = colors.iter().find(|&&c| c >= n_colors) {
      return Err(Error::ColorOutOfRange { color, n_colors });
    }
    Ok(ColorAssignment { colors, n_colors })
  }

  /// Like [`ColorAssignment::new`] but also checks that every edge of
  /// `point_set` is covered.
  pub fn for_point_set(
    point_set: &PointSet,
    colors: Vec<usize>,
    n_colors: usize,
  ) -> Result<ColorAssignment, Error> {
    if colors.len() != point_set.n_edges() {
      return Err(Error::AssignmentLength {
        expected: point_set.n_edges(),
        found: colors.len(),
      });
    }
    ColorAssignment::new(colors, n_colors)
  }

  pub fn n_colors(&self) -> usize {
    self.n_colors
  }

  pub fn n_edges(&self) -> usize {
    self.colors.len()
  }

  pub fn color_of(&self, edge: EdgeId) -> usize {
    self.colors[edge.usize()]
  }

  pub fn colors(&self) -> &[usize] {
    &self.colors
  }

  /// Edges of the given color class, in increasing id order.
  pub fn class(&self, color: usize) -> impl Iterator<Item = EdgeId> + '_ {
    self
      .colors
      .iter()
      .enumerate()
      .filter(move |&(_, &c)| c == color)
      .map(|(e, _)| EdgeId(e))
  }

  /// Number of edges in each color class.
  pub fn class_sizes(&self) -> Vec<usize> {
    let mut sizes = vec![0; self.n_colors];
    for &c in &self.colors {
      sizes[c] += 1;
    }
    sizes
  }
}
