use super::*;
use crate::config::Optimize;
use crate::graph::Module;
use crate::layout::metrics::measure;
use proptest::prelude::*;
use std::time::Duration;

fn graph(modules: Vec<Module>) -> DependencyGraph {
    DependencyGraph::new(modules).unwrap()
}

fn chain() -> DependencyGraph {
    graph(vec![
        Module::new("A"),
        Module::new("B").with_upstream("A"),
        Module::new("C").with_upstream("B"),
    ])
}

fn fan() -> DependencyGraph {
    graph(vec![
        Module::new("A"),
        Module::new("B"),
        Module::new("C").with_upstream("B"),
        Module::new("D").with_upstream("A"),
        Module::new("E").with_upstream("A"),
    ])
}

fn off() -> LayoutConfig {
    LayoutConfig::default().with_optimize(Optimize::Off)
}

fn assert_no_overlap(result: &LayoutResult) {
    for (i, a) in result.positions.iter().enumerate() {
        for b in &result.positions[i + 1..] {
            if a.y == b.y {
                assert!(
                    a.x + a.width <= b.x || b.x + b.width <= a.x,
                    "{} and {} overlap",
                    a.module,
                    b.module
                );
            }
        }
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────

#[test]
fn test_chain_is_one_column() {
    let g = chain();
    let result = layout(&g, &LayoutConfig::default()).unwrap();

    assert_eq!(result.metrics, Metrics::default());
    assert_eq!(result.placement, Placement::HeuristicPlaced);
    assert_eq!(result.position("A").map(|p| (p.x, p.y)), Some((10, 10)));
    assert_eq!(result.position("B").map(|p| (p.x, p.y)), Some((10, 70)));
    assert_eq!(result.position("C").map(|p| (p.x, p.y)), Some((10, 130)));
    assert_eq!(result.lines.len(), 2);
    assert_eq!(result.slot_count, 2);
    assert_eq!((result.width, result.height), (330, 160));
    assert!(result.search.is_some_and(|s| s.completed));
}

#[test]
fn test_connector_endpoints() {
    let g = chain();
    let result = layout(&g, &off()).unwrap();
    let b = result.position("B").unwrap();
    let a = result.position("A").unwrap();
    let expected = ConnectorLine::new(b.middle_x(), b.top(), a.middle_x(), a.bottom()).unwrap();
    assert!(result.lines.contains(&expected));
}

#[test]
fn test_positions_sorted_by_level_then_x() {
    let result = layout(&fan(), &LayoutConfig::default()).unwrap();
    let keys: Vec<(i64, i64)> = result.positions.iter().map(|p| (p.y, p.x)).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(result.positions.len(), 5);
}

#[test]
fn test_empty_graph() {
    let g = graph(Vec::new());
    let result = layout(&g, &LayoutConfig::default()).unwrap();
    assert!(result.positions.is_empty());
    assert!(result.lines.is_empty());
    assert_eq!((result.width, result.height), (330, 20));
}

// ── Optimisation modes ────────────────────────────────────────────────────

#[test]
fn test_off_skips_search() {
    let result = layout(&fan(), &off()).unwrap();
    assert_eq!(result.placement, Placement::HeuristicPlaced);
    assert!(result.search.is_none());
    assert_eq!(result.metrics.crossing_count, 2);
}

#[test]
fn test_zero_deadline_equals_heuristic() {
    let g = fan();
    let zero = LayoutConfig::default().with_optimize(Optimize::Deadline(Duration::ZERO));
    let heuristic = layout(&g, &off()).unwrap();
    let timed = layout(&g, &zero).unwrap();

    assert_eq!(timed.positions, heuristic.positions);
    assert_eq!(timed.lines, heuristic.lines);
    assert_eq!(timed.metrics, heuristic.metrics);
    assert_eq!(timed.placement, Placement::HeuristicPlaced);
    assert!(timed.search.is_none());
}

#[test]
fn test_search_improves_fan_out() {
    let g = fan();
    let heuristic = layout(&g, &off()).unwrap();
    let optimised = layout(&g, &LayoutConfig::default()).unwrap();

    assert_eq!(optimised.placement, Placement::OptimizedPlaced);
    assert!(optimised.metrics.is_better_than(&heuristic.metrics));
    assert_eq!(optimised.metrics.crossing_count, 1);
    assert_no_overlap(&optimised);
    assert_eq!(measure(&optimised.lines).unwrap(), optimised.metrics);
}

#[test]
fn test_generous_deadline_completes() {
    let g = fan();
    let config = LayoutConfig::default().with_optimize(Optimize::Deadline(Duration::from_secs(60)));
    let result = layout(&g, &config).unwrap();
    assert!(result.search.is_some_and(|s| s.completed));
    assert_eq!(result.metrics.crossing_count, 1);
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn test_workers_agree_on_metrics() {
    let g = fan();
    let one = layout(&g, &LayoutConfig::default()).unwrap();
    let four = layout(&g, &LayoutConfig::default().with_workers(4)).unwrap();
    assert_eq!(one.metrics, four.metrics);
    assert_no_overlap(&four);
}

// ── Properties ────────────────────────────────────────────────────────────

fn dag_modules(n: usize, edges: &[(usize, usize)]) -> Vec<Module> {
    let mut modules: Vec<Module> = (0..n).map(|i| Module::new(format!("m{i}"))).collect();
    for &(a, b) in edges {
        let (lo, hi) = (a.min(b), a.max(b));
        if lo != hi && hi < n {
            modules[hi].add_upstream(format!("m{lo}"));
        }
    }
    modules
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_search_never_worse_than_heuristic(
        n in 1usize..7,
        edges in proptest::collection::vec((0usize..7, 0usize..7), 0..10),
    ) {
        let g = graph(dag_modules(n, &edges));
        let heuristic = layout(&g, &off()).unwrap();
        let optimised = layout(&g, &LayoutConfig::default()).unwrap();

        prop_assert!(optimised.metrics <= heuristic.metrics);
        prop_assert_eq!(optimised.positions.len(), n);
        for (i, a) in optimised.positions.iter().enumerate() {
            for b in &optimised.positions[i + 1..] {
                prop_assert!(a.y != b.y || a.x != b.x);
            }
        }
    }
}
