use itertools::Itertools;
use num::integer::binomial;
use std::collections::BTreeSet;

use crate::data::{Cycle, CycleLength, PointId};

/// Enumerate the short cycles of the complete graph on `n` vertices.
///
/// * Triangles: one cycle per 3-subset, $\binom{n}{3}$ in total.
/// * Quadrilaterals: a 4-subset `a < b < c < d` supports exactly three distinct
///   cycles, emitted as `(a,b,c,d)`, `(a,b,d,c)` and `(a,d,b,c)`, for
///   $3\binom{n}{4}$ in total.
///
/// Cycles are purely combinatorial; geometry is not consulted. The output is
/// ordered by length first, then lexicographically by vertex subset.
pub fn enumerate_cycles(n: usize, lengths: &BTreeSet<CycleLength>) -> Vec<Cycle> {
  let capacity = lengths.iter().map(|&len| cycle_count(n, len)).sum();
  let mut cycles = Vec::with_capacity(capacity);
  for &len in lengths {
    cycles.extend(cycles_of_length(n, len));
  }
  cycles
}

/// Cycles of a single length; see [`enumerate_cycles`].
pub fn cycles_of_length(n: usize, length: CycleLength) -> impl Iterator<Item = Cycle> {
  (0..n).combinations(length.vertex_count()).flat_map(move |vs| {
    let ids: Vec<PointId> = vs.into_iter().map(PointId).collect();
    let variants: Vec<Cycle> = match length {
      CycleLength::Triangle => vec![Cycle::new(ids)],
      CycleLength::Quadrilateral => {
        let [a, b, c, d] = [ids[0], ids[1], ids[2], ids[3]];
        vec![
          Cycle::new(vec![a, b, c, d]),
          Cycle::new(vec![a, b, d, c]),
          Cycle::new(vec![a, d, b, c]),
        ]
      }
    };
    variants
  })
}

/// The number of cycles [`cycles_of_length`] yields for `n` vertices.
pub fn cycle_count(n: usize, length: CycleLength) -> usize {
  let k = length.vertex_count();
  if n < k {
    return 0;
  }
  match length {
    CycleLength::Triangle => binomial(n, 3),
    CycleLength::Quadrilateral => 3 * binomial(n, 4),
  }
}
