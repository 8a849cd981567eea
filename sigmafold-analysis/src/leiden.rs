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

//! Leiden community detection
//!
//! Partitions the co-occurrence graph into communities by modularity
//! optimization:
//!
//! 1. local moving: shift nodes between communities while modularity gains
//! 2. refinement: split communities that are internally disconnected
//! 3. renumber and repeat until the improvement falls under the threshold
//!
//! Modularity: Q = (1/2m) * Σij [Aij - γ·(ki·kj)/(2m)] · δ(ci, cj)
//! with γ the resolution parameter and m the total edge weight.
//!
//! The detector is seeded (fixed default seed) so repeated runs on the
//! same graph agree; `seed: None` opts into entropy seeding.
//!
//! Reference: Traag et al., "From Louvain to Leiden: guaranteeing
//! well-connected communities", https://www.nature.com/articles/s41598-019-41695-z

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sigmafold_core::{DetectorConfig, Partition, Result, ShapeGraph, ShapeId, SigmafoldError};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Weighted neighbor lists indexed by node position
type Adjacency = Vec<Vec<(usize, f64)>>;

/// Modularity-optimizing community detector
pub struct LeidenDetector {
    config: DetectorConfig,
}

impl LeidenDetector {
    /// Create a detector with the default (seeded) configuration
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
        }
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Partition the graph for chain length `n` into communities.
    ///
    /// Community ids in the result are contiguous starting at 0 and cover
    /// every node exactly once. Fails with `EmptyGraph` on a graph with
    /// no nodes; an edgeless graph yields singleton communities with
    /// modularity 0.
    pub fn partition(&self, n: u32, graph: &ShapeGraph) -> Result<Partition> {
        let ids: Vec<ShapeId> = graph.nodes().cloned().collect();
        if ids.is_empty() {
            return Err(SigmafoldError::EmptyGraph { n });
        }

        let node_count = ids.len();
        let index: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut adj: Adjacency = vec![Vec::new(); node_count];
        for (a, b, w) in graph.edges() {
            let (i, j) = (index[a.as_str()], index[b.as_str()]);
            adj[i].push((j, w as f64));
            adj[j].push((i, w as f64));
        }

        let degrees: Vec<f64> = adj
            .iter()
            .map(|neighbors| neighbors.iter().map(|(_, w)| w).sum())
            .collect();
        let total_weight: f64 = degrees.iter().sum::<f64>() / 2.0;

        // Each node starts in its own community
        let mut communities: Vec<u32> = (0..node_count as u32).collect();

        if total_weight == 0.0 {
            let membership = ids.into_iter().zip(communities).collect();
            return Ok(Partition {
                membership,
                modularity: 0.0,
                community_count: node_count as u32,
            });
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        for iteration in 0..self.config.max_iterations {
            let old_q = self.modularity(&adj, &communities, &degrees, total_weight);

            let improved =
                self.local_moving(&adj, &mut communities, &degrees, total_weight, &mut rng);
            self.refine(&adj, &mut communities);

            let new_q = self.modularity(&adj, &communities, &degrees, total_weight);
            debug!(iteration, modularity = new_q, "community sweep");

            if !improved || new_q - old_q < self.config.min_improvement {
                break;
            }
            renumber(&mut communities);
        }

        let community_count = renumber(&mut communities);
        let modularity = self.modularity(&adj, &communities, &degrees, total_weight);
        let membership: BTreeMap<ShapeId, u32> = ids.into_iter().zip(communities).collect();

        Ok(Partition {
            membership,
            modularity,
            community_count,
        })
    }

    /// Local moving phase: visit nodes in random order and move each to
    /// the neighboring community with the largest positive modularity gain
    fn local_moving(
        &self,
        adj: &Adjacency,
        communities: &mut [u32],
        degrees: &[f64],
        total_weight: f64,
        rng: &mut StdRng,
    ) -> bool {
        let mut community_degrees: HashMap<u32, f64> = HashMap::new();
        for (i, &c) in communities.iter().enumerate() {
            *community_degrees.entry(c).or_insert(0.0) += degrees[i];
        }

        let mut order: Vec<usize> = (0..communities.len()).collect();
        order.shuffle(rng);

        let two_m = 2.0 * total_weight;
        let mut improved = false;

        for &node in &order {
            let current = communities[node];

            // Edge weight from this node into each neighboring community;
            // BTreeMap so candidate order (and tie-breaking) is stable
            let mut weight_to: BTreeMap<u32, f64> = BTreeMap::new();
            for &(neighbor, w) in &adj[node] {
                *weight_to.entry(communities[neighbor]).or_insert(0.0) += w;
            }

            let to_current = weight_to.get(&current).copied().unwrap_or(0.0);
            let current_degree = community_degrees.get(&current).copied().unwrap_or(0.0) - degrees[node];
            let stay_gain =
                to_current - self.config.resolution * degrees[node] * current_degree / two_m;

            let mut best_community = current;
            let mut best_gain = 0.0;
            for (&candidate, &weight) in &weight_to {
                if candidate == current {
                    continue;
                }
                let candidate_degree = community_degrees.get(&candidate).copied().unwrap_or(0.0);
                let move_gain =
                    weight - self.config.resolution * degrees[node] * candidate_degree / two_m;
                let gain = move_gain - stay_gain;
                if gain > best_gain {
                    best_gain = gain;
                    best_community = candidate;
                }
            }

            if best_community != current {
                communities[node] = best_community;
                *community_degrees.entry(current).or_insert(0.0) -= degrees[node];
                *community_degrees.entry(best_community).or_insert(0.0) += degrees[node];
                improved = true;
            }
        }

        improved
    }

    /// Refinement phase: a community must be internally connected, so
    /// every additional connected component is split into a fresh
    /// community of its own
    fn refine(&self, adj: &Adjacency, communities: &mut [u32]) {
        let mut members: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (i, &c) in communities.iter().enumerate() {
            members.entry(c).or_default().push(i);
        }

        let mut next_id = communities.iter().copied().max().unwrap_or(0) + 1;

        for nodes in members.values() {
            if nodes.len() <= 1 {
                continue;
            }

            let mut unvisited: BTreeSet<usize> = nodes.iter().copied().collect();

            // The component reached from the first member keeps the id
            let mut stack = vec![nodes[0]];
            unvisited.remove(&nodes[0]);
            while let Some(v) = stack.pop() {
                for &(neighbor, _) in &adj[v] {
                    if unvisited.remove(&neighbor) {
                        stack.push(neighbor);
                    }
                }
            }

            // Every remaining component becomes its own community
            while let Some(&start) = unvisited.iter().next() {
                unvisited.remove(&start);
                let mut component = vec![start];
                let mut stack = vec![start];
                while let Some(v) = stack.pop() {
                    for &(neighbor, _) in &adj[v] {
                        if unvisited.remove(&neighbor) {
                            component.push(neighbor);
                            stack.push(neighbor);
                        }
                    }
                }
                for v in component {
                    communities[v] = next_id;
                }
                next_id += 1;
            }
        }
    }

    /// Modularity of the current assignment, community-sum form:
    /// Q = Σc [ Σin(c)/2m - γ·(Σtot(c)/2m)² ]
    fn modularity(
        &self,
        adj: &Adjacency,
        communities: &[u32],
        degrees: &[f64],
        total_weight: f64,
    ) -> f64 {
        let mut internal: HashMap<u32, f64> = HashMap::new();
        let mut community_degrees: HashMap<u32, f64> = HashMap::new();

        for (i, neighbors) in adj.iter().enumerate() {
            *community_degrees.entry(communities[i]).or_insert(0.0) += degrees[i];
            for &(j, w) in neighbors {
                if communities[i] == communities[j] {
                    // counted once per direction, i.e. 2x per edge
                    *internal.entry(communities[i]).or_insert(0.0) += w;
                }
            }
        }

        let two_m = 2.0 * total_weight;
        community_degrees
            .iter()
            .map(|(c, &degree)| {
                let inner = internal.get(c).copied().unwrap_or(0.0);
                inner / two_m - self.config.resolution * (degree / two_m).powi(2)
            })
            .sum()
    }
}

impl Default for LeidenDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Renumber community ids to be contiguous starting at 0, in order of
/// first appearance; returns the community count
fn renumber(communities: &mut [u32]) -> u32 {
    let mut mapping: HashMap<u32, u32> = HashMap::new();
    let mut next_id = 0u32;

    for c in communities.iter_mut() {
        let id = *mapping.entry(*c).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
        *c = id;
    }

    next_id
}
