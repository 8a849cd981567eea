// Copyright 2025 Sigmafold Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Force-directed 2-D embedding
//!
//! Fruchterman-Reingold spring layout over the co-occurrence graph. Edge
//! weight scales the attractive force, so heavily co-occurring shapes end
//! up closer together. Consumed only by the presentation layer; the output
//! guarantees exactly one coordinate pair per node and nothing else.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sigmafold_core::{LayoutConfig, Result, ShapeGraph, ShapeId, SigmafoldError};
use std::collections::BTreeMap;

/// Compute a 2-D spring embedding of the graph for chain length `n`.
///
/// Positions land in the square `[-scale, scale]²`. Seeded initial
/// placement makes repeated runs agree; `seed: None` opts into entropy.
pub fn spring_layout(
    n: u32,
    graph: &ShapeGraph,
    config: &LayoutConfig,
) -> Result<BTreeMap<ShapeId, (f64, f64)>> {
    let ids: Vec<ShapeId> = graph.nodes().cloned().collect();
    if ids.is_empty() {
        return Err(SigmafoldError::EmptyGraph { n });
    }

    let node_count = ids.len();
    if node_count == 1 {
        let mut out = BTreeMap::new();
        out.insert(ids[0].clone(), (0.0, 0.0));
        return Ok(out);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut positions: Vec<(f64, f64)> = (0..node_count)
        .map(|_| (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();

    let (_, matrix) = graph.adjacency_matrix();

    // Optimal pairwise distance for a unit square
    let k = (1.0 / node_count as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut displacement = vec![(0.0f64, 0.0f64); node_count];

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(1e-9);
                let (ux, uy) = (dx / distance, dy / distance);

                // All pairs repel
                let repulsion = k * k / distance;
                displacement[i].0 += ux * repulsion;
                displacement[i].1 += uy * repulsion;
                displacement[j].0 -= ux * repulsion;
                displacement[j].1 -= uy * repulsion;

                // Connected pairs attract, proportionally to edge weight
                let weight = matrix[i][j];
                if weight > 0.0 {
                    let attraction = weight * distance * distance / k;
                    displacement[i].0 -= ux * attraction;
                    displacement[i].1 -= uy * attraction;
                    displacement[j].0 += ux * attraction;
                    displacement[j].1 += uy * attraction;
                }
            }
        }

        for i in 0..node_count {
            let (dx, dy) = displacement[i];
            let length = (dx * dx + dy * dy).sqrt().max(1e-9);
            let step = length.min(temperature);
            positions[i].0 += dx / length * step;
            positions[i].1 += dy / length * step;
        }

        temperature -= cooling;
    }

    rescale(&mut positions, config.scale);

    Ok(ids.into_iter().zip(positions).collect())
}

/// Center positions on the origin and fit them into [-scale, scale]²
fn rescale(positions: &mut [(f64, f64)], scale: f64) {
    let count = positions.len() as f64;
    let cx = positions.iter().map(|p| p.0).sum::<f64>() / count;
    let cy = positions.iter().map(|p| p.1).sum::<f64>() / count;

    let mut max_extent = 0.0f64;
    for p in positions.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        max_extent = max_extent.max(p.0.abs()).max(p.1.abs());
    }
    if max_extent > 0.0 {
        for p in positions.iter_mut() {
            p.0 *= scale / max_extent;
            p.1 *= scale / max_extent;
        }
    }
}
