use crate::config::RankingConfig;
use crate::state::GraphSnapshot;
use std::collections::{BTreeSet, HashMap};

/// Computes PageRank over a graph snapshot
///
/// Nodes are the union of every source and every link target, so pages that
/// were only ever seen as a link target still receive a score. Parallel edges
/// between the same pair of pages count once. Nodes without outgoing edges
/// spread their whole score evenly over all nodes, which keeps the total mass
/// at exactly one.
///
/// Iteration stops once the L1 distance between two successive score
/// vectors drops below `params.tolerance`, or after `params.max_iterations`.
///
/// # Returns
///
/// A map from page id to score. Empty for an empty graph; uniform `1/N` for a
/// graph with no edges.
///
/// # Example
///
/// ```
/// use freshrank::config::RankingConfig;
/// use freshrank::rank::score;
/// use freshrank::state::GraphSnapshot;
///
/// let mut graph = GraphSnapshot::new();
/// graph.insert("a".to_string(), vec!["b".to_string()]);
/// graph.insert("b".to_string(), vec!["a".to_string()]);
///
/// let scores = score(&graph, &RankingConfig::default());
/// assert!((scores["a"] - 0.5).abs() < 1e-6);
/// ```
pub fn score(graph: &GraphSnapshot, params: &RankingConfig) -> HashMap<String, f64> {
    let nodes: Vec<&str> = graph
        .iter()
        .flat_map(|(source, targets)| {
            std::iter::once(source.as_str()).chain(targets.iter().map(String::as_str))
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let n = nodes.len();
    if n == 0 {
        tracing::debug!("PageRank skipped: graph is empty");
        return HashMap::new();
    }

    let index: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut out_links: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (source, targets) in graph {
        let targets: BTreeSet<usize> = targets.iter().map(|t| index[t.as_str()]).collect();
        out_links[index[source.as_str()]] = targets.into_iter().collect();
    }

    let uniform = 1.0 / n as f64;
    if out_links.iter().all(Vec::is_empty) {
        tracing::debug!("PageRank: graph of {} nodes has no edges, using uniform scores", n);
        return into_map(&nodes, vec![uniform; n]);
    }

    let damping = params.damping;
    let mut ranks = vec![uniform; n];

    for iteration in 1..=params.max_iterations {
        let dangling_mass: f64 = out_links
            .iter()
            .zip(&ranks)
            .filter(|(links, _)| links.is_empty())
            .map(|(_, rank)| rank)
            .sum();

        let base = (1.0 - damping) * uniform + damping * dangling_mass * uniform;
        let mut next = vec![base; n];

        for (links, rank) in out_links.iter().zip(&ranks) {
            if links.is_empty() {
                continue;
            }
            let share = damping * rank / links.len() as f64;
            for &target in links {
                next[target] += share;
            }
        }

        let delta: f64 = next.iter().zip(&ranks).map(|(a, b)| (a - b).abs()).sum();
        ranks = next;

        if delta < params.tolerance {
            tracing::trace!("PageRank converged after {} iterations", iteration);
            return into_map(&nodes, ranks);
        }
    }

    tracing::warn!(
        "PageRank did not converge within {} iterations, using last estimate",
        params.max_iterations
    );

    let total: f64 = ranks.iter().sum();
    if total > 0.0 {
        ranks.iter_mut().for_each(|rank| *rank /= total);
        into_map(&nodes, ranks)
    } else {
        into_map(&nodes, vec![uniform; n])
    }
}

fn into_map(nodes: &[&str], ranks: Vec<f64>) -> HashMap<String, f64> {
    nodes
        .iter()
        .map(|id| id.to_string())
        .zip(ranks)
        .collect()
}
