use crate::{symmetric_map::SymmetricMap, Edge};

use fnv::FnvHashSet;
use petgraph::{
    algo::tarjan_scc,
    graph::NodeIndex,
    stable_graph::StableGraph,
    EdgeType, Undirected,
};

pub fn induced_subgraph<N: Clone, E: Clone, Ty: EdgeType, S: std::hash::BuildHasher>(
    graph: &StableGraph<N, E, Ty>,
    nodes: &std::collections::HashSet<NodeIndex, S>,
) -> StableGraph<N, E, Ty> {
    graph.filter_map(
        |i, n| {
            if nodes.contains(&i) {
                Some(n.clone())
            } else {
                None
            }
        },
        |_, e| Some(e.clone()),
    )
}

/// Which sites border each other. Node weights are site indices, edge weights are indices into
/// the subdivision's edge list.
#[derive(Clone, Debug, Default)]
pub struct SiteGraph {
    graph: StableGraph<usize, usize, Undirected>,
    edge_lookup: SymmetricMap<usize>,
}

impl SiteGraph {
    pub fn from_edges(num_sites: usize, edges: &[Edge]) -> Self {
        let mut graph = StableGraph::default();
        for i in 0..num_sites {
            graph.add_node(i);
        }

        let mut edge_lookup = SymmetricMap::new();
        for (i, edge) in edges.iter().enumerate() {
            let (a, b) = edge.sites;
            if a == b || a >= num_sites || b >= num_sites || edge_lookup.get(a, b).is_some() {
                continue;
            }
            edge_lookup.insert_first(a, b, i);
            graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), i);
        }

        SiteGraph { graph, edge_lookup }
    }

    pub fn num_sites(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_borders(&self) -> usize {
        self.edge_lookup.len()
    }

    /// Index of the edge separating sites `a` and `b`, if they are neighbors.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<usize> {
        self.edge_lookup.get(a, b).copied()
    }

    pub fn neighbors(&self, site: usize) -> Vec<usize> {
        if site >= self.num_sites() {
            return Vec::new();
        }
        let mut n: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(site))
            .map(|i| self.graph[i])
            .collect();
        n.sort_unstable();

        n
    }

    /// Connected groups of the sites accepted by `keep`, each sorted, ordered by their smallest
    /// site.
    pub fn islands(&self, keep: impl Fn(usize) -> bool) -> Vec<Vec<usize>> {
        let nodes: FnvHashSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|i| keep(self.graph[*i]))
            .collect();
        let subgraph = induced_subgraph(&self.graph, &nodes);

        let mut islands: Vec<Vec<usize>> = tarjan_scc(&subgraph)
            .into_iter()
            .map(|component| {
                let mut sites: Vec<usize> = component.iter().map(|n| subgraph[*n]).collect();
                sites.sort_unstable();
                sites
            })
            .collect();
        islands.sort_unstable_by_key(|sites| sites[0]);

        islands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: usize, b: usize) -> Edge {
        Edge {
            start: [0.0, 0.0],
            end: [1.0, 1.0],
            sites: (a, b),
        }
    }

    #[test]
    fn test_graph_from_edges() {
        let edges = vec![edge(0, 1), edge(1, 2), edge(0, 1), edge(3, 4)];
        let graph = SiteGraph::from_edges(5, &edges);

        assert_eq!(graph.num_sites(), 5);
        assert_eq!(graph.num_borders(), 3);
        assert_eq!(graph.edge_between(1, 0), Some(0));
        assert_eq!(graph.edge_between(4, 3), Some(3));
        assert_eq!(graph.edge_between(0, 2), None);
        assert_eq!(graph.neighbors(1), vec![0, 2]);
        assert!(graph.neighbors(9).is_empty());
    }

    #[test]
    fn test_islands_of_kept_sites() {
        let edges = vec![edge(0, 1), edge(1, 2), edge(2, 3), edge(4, 5)];
        let graph = SiteGraph::from_edges(6, &edges);

        assert_eq!(graph.islands(|_| true), vec![vec![0, 1, 2, 3], vec![4, 5]]);
        // Dropping site 2 splits the chain.
        assert_eq!(
            graph.islands(|s| s != 2),
            vec![vec![0, 1], vec![3], vec![4, 5]]
        );
        assert!(graph.islands(|_| false).is_empty());
    }
}
