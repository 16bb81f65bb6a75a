//! Seeded generation of random networks and assignments.
//!
//! Vertex `i` only draws ancestors among vertices `0..i`, so every
//! generated ancestor relation is acyclic. Every CPT column is normalized.

use std::collections::{BTreeMap, HashMap};

use bayesnet_core::{Network, NetworkConfig};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{FixtureError, FixtureResult};

/// Vertex identifier used by generated networks.
pub type VertexName = String;

/// A network generated by [`generate`].
pub type RandomNetwork = Network<VertexName, u32>;

/// The raw inputs of a generated network, as a producer would hand them to
/// [`Network::new`] and [`Network::set_distributions`].
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkFixture {
    /// Vertex identifiers in generation order.
    pub vertices: Vec<VertexName>,
    /// Ancestors of each vertex.
    pub ancestors: BTreeMap<VertexName, Vec<VertexName>>,
    /// Events of each vertex.
    pub events: BTreeMap<VertexName, Vec<u32>>,
    /// CPT of each vertex, shaped `(events, ancestor combinations)`.
    pub distributions: BTreeMap<VertexName, Array2<f64>>,
}

impl NetworkFixture {
    /// Build and parameterize a network from this fixture.
    pub fn build(&self) -> FixtureResult<RandomNetwork> {
        self.build_with_config(NetworkConfig::default())
    }

    /// Build and parameterize a network with an explicit configuration.
    pub fn build_with_config(&self, config: NetworkConfig) -> FixtureResult<RandomNetwork> {
        let mut network = Network::with_config(
            self.vertices.iter().cloned(),
            &self.ancestors,
            &self.events,
            config,
        )?;
        network.set_all_distributions(self.distributions.clone())?;
        Ok(network)
    }
}

/// Name of the `index`-th generated vertex, zero-padded so identifier order
/// matches generation order.
pub fn vertex_name(index: usize, total: usize) -> VertexName {
    let width = total.saturating_sub(1).to_string().len();
    format!("x{index:0width$}")
}

/// Generate the inputs of a random network.
pub fn generate_fixture(config: &GeneratorConfig) -> FixtureResult<NetworkFixture> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let vertices: Vec<VertexName> = (0..config.vertices)
        .map(|i| vertex_name(i, config.vertices))
        .collect();

    let mut events = BTreeMap::new();
    for name in &vertices {
        let count = u32::try_from(rng.gen_range(config.min_events..=config.max_events))
            .map_err(|_| FixtureError::InvalidConfig("event count exceeds u32".into()))?;
        events.insert(name.clone(), (0..count).collect::<Vec<u32>>());
    }

    let mut ancestors = BTreeMap::new();
    for (i, name) in vertices.iter().enumerate() {
        let count = rng.gen_range(0..=config.max_ancestors.min(i));
        let mut chosen: Vec<VertexName> = index::sample(&mut rng, i, count)
            .into_iter()
            .map(|j| vertices[j].clone())
            .collect();
        chosen.sort();
        ancestors.insert(name.clone(), chosen);
    }

    let mut shapes = Vec::with_capacity(vertices.len());
    for name in &vertices {
        let rows = events[name].len();
        let cells = ancestors[name]
            .iter()
            .try_fold(rows, |acc, a| acc.checked_mul(events[a].len()))
            .filter(|cells| *cells <= config.max_cells)
            .ok_or_else(|| {
                FixtureError::InvalidConfig(format!(
                    "CPT of {name} exceeds max_cells ({}); lower max_ancestors or max_events",
                    config.max_cells
                ))
            })?;
        shapes.push((name, rows, cells / rows));
    }

    let mut distributions = BTreeMap::new();
    for (name, rows, cols) in shapes {
        distributions.insert(name.clone(), random_cpt(&mut rng, rows, cols));
    }

    debug!(
        seed = config.seed,
        vertices = vertices.len(),
        edges = ancestors.values().map(Vec::len).sum::<usize>(),
        "generated network fixture"
    );

    Ok(NetworkFixture {
        vertices,
        ancestors,
        events,
        distributions,
    })
}

/// Generate and build a random, fully parameterized network.
pub fn generate(config: &GeneratorConfig) -> FixtureResult<RandomNetwork> {
    generate_fixture(config)?.build()
}

/// A random `(rows, cols)` table whose every column sums to 1.
pub fn random_cpt<R: Rng>(rng: &mut R, rows: usize, cols: usize) -> Array2<f64> {
    let mut table = Array2::from_shape_fn((rows, cols), |_| rng.gen_range(0.05..1.0));
    for mut column in table.columns_mut() {
        let sum = column.sum();
        column.mapv_inplace(|p| p / sum);
    }
    table
}

/// Draws full assignments uniformly over each vertex's event set.
pub struct AssignmentSampler {
    rng: StdRng,
}

impl AssignmentSampler {
    /// Create a sampler with its own seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One assignment covering every vertex of `network`.
    pub fn sample(&mut self, network: &RandomNetwork) -> HashMap<VertexName, u32> {
        network
            .nodes()
            .map(|node| {
                let events = node.events();
                let pick = events[self.rng.gen_range(0..events.len())];
                (node.name().clone(), pick)
            })
            .collect()
    }
}

/// Every full assignment of `network`, in identifier order with the last
/// vertex varying fastest.
///
/// The count is the product of all event set sizes, so this is only meant
/// for small networks.
pub fn all_assignments(network: &RandomNetwork) -> Vec<HashMap<VertexName, u32>> {
    let mut assignments = vec![HashMap::new()];
    for node in network.nodes() {
        let mut next = Vec::with_capacity(assignments.len() * node.events().len());
        for partial in &assignments {
            for event in node.events() {
                let mut extended = partial.clone();
                extended.insert(node.name().clone(), *event);
                next.push(extended);
            }
        }
        assignments = next;
    }
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            vertices: 5,
            max_ancestors: 2,
            min_events: 2,
            max_events: 3,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn same_seed_same_fixture() {
        let a = generate_fixture(&small_config(7)).unwrap();
        let b = generate_fixture(&small_config(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ancestors_precede_their_descendants() {
        let fixture = generate_fixture(&GeneratorConfig {
            vertices: 12,
            max_ancestors: 4,
            ..small_config(3)
        })
        .unwrap();
        for (name, ancestors) in &fixture.ancestors {
            assert!(ancestors.len() <= 4);
            for ancestor in ancestors {
                assert!(ancestor < name, "{ancestor} should precede {name}");
            }
        }
    }

    #[test]
    fn oversized_tables_are_rejected() {
        let config = GeneratorConfig {
            vertices: 100,
            max_ancestors: 60,
            min_events: 4,
            max_events: 4,
            seed: 1,
            ..Default::default()
        };
        let err = generate_fixture(&config).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidConfig(ref msg) if msg.contains("max_cells")));
    }

    #[test]
    fn overflowing_table_size_is_rejected() {
        let config = GeneratorConfig {
            vertices: 80,
            max_ancestors: 79,
            min_events: 4,
            max_events: 4,
            seed: 1,
            max_cells: usize::MAX,
        };
        assert!(matches!(generate_fixture(&config), Err(FixtureError::InvalidConfig(_))));
    }

    #[test]
    fn cell_limit_is_inclusive() {
        // x1 has x0 as its only possible ancestor: a 2x2 table.
        let config = GeneratorConfig {
            vertices: 2,
            max_ancestors: 1,
            min_events: 2,
            max_events: 2,
            seed: 4,
            max_cells: 4,
        };
        let fixture = generate_fixture(&config).unwrap();
        for table in fixture.distributions.values() {
            assert!(table.len() <= 4);
        }
    }

    #[test]
    fn event_counts_respect_bounds() {
        let fixture = generate_fixture(&small_config(11)).unwrap();
        for events in fixture.events.values() {
            assert!((2..=3).contains(&events.len()));
        }
    }

    #[test]
    fn generated_network_is_normalized_and_parameterized() {
        let network = generate(&small_config(5)).unwrap();
        assert_eq!(network.len(), 5);
        assert!(network.is_parameterized());
        assert!(network.validate_distributions().is_ok());
    }

    #[test]
    fn random_cpt_columns_sum_to_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let table = random_cpt(&mut rng, 3, 4);
        assert_eq!(table.dim(), (3, 4));
        for column in table.columns() {
            assert!((column.sum() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn vertex_names_sort_in_generation_order() {
        let names: Vec<_> = (0..12).map(|i| vertex_name(i, 12)).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(vertex_name(3, 12), "x03");
        assert_eq!(vertex_name(0, 1), "x0");
    }

    #[test]
    fn sampler_covers_every_vertex() {
        let network = generate(&small_config(9)).unwrap();
        let mut sampler = AssignmentSampler::new(9);
        let assignment = sampler.sample(&network);
        assert_eq!(assignment.len(), network.len());
        assert!(network.probability(&assignment).unwrap() > 0.0);
    }

    #[test]
    fn all_assignments_enumerates_the_product() {
        let network = generate(&small_config(2)).unwrap();
        let expected: usize = network.nodes().map(|n| n.events().len()).product();
        assert_eq!(all_assignments(&network).len(), expected);
    }
}
