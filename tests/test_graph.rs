use rand::Rng;
use redblack_collections::graph::{Edge, Graph, GraphError};
use serde_test::{assert_tokens, Token};

fn triangle() -> Graph {
    let mut graph = Graph::new();
    graph.add_multiple_edges(&[Edge::new(1, 2), Edge::new(2, 3), Edge::new(3, 1)]);
    graph
}

fn assert_proper_coloring(graph: &Graph) {
    for node in graph.nodes() {
        assert!(node.color > 0, "node {} is uncolored", node.id);
    }
    for edge in graph.edges() {
        let a = graph.get_node(edge.a).unwrap().color;
        let b = graph.get_node(edge.b).unwrap().color;
        assert_ne!(a, b, "edge {}-{} joins same colors", edge.a, edge.b);
    }
}

#[test]
fn test_empty_graph() {
    let mut graph = Graph::new();
    assert!(graph.nodes().is_empty());
    assert!(graph.edges().is_empty());
    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.graph_degree(), 0);
    assert!(graph.get_node(1).is_none());
    graph.coloring();
}

#[test]
fn test_add_node() {
    let mut graph = Graph::new();
    let node = graph.add_node(1).unwrap();
    assert_eq!(node.id, 1);
    assert_eq!(node.color, 0);
    assert!(graph.add_node(1).is_none());
    assert_eq!(graph.node_count(), 1);
}

#[test]
fn test_add_edge() {
    let mut graph = Graph::new();
    assert!(graph.add_edge(Edge::new(1, 2)));
    assert!(!graph.add_edge(Edge::new(1, 2)));
    assert!(!graph.add_edge(Edge::new(2, 1)));
    assert!(!graph.add_edge(Edge::new(3, 3)));

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.contains_edge(Edge::new(2, 1)));
    assert!(!graph.contains_edge(Edge::new(1, 3)));
    assert_eq!(graph.neighbors(1), Some(&[2][..]));
}

#[test]
fn test_add_multiple_edges_skips_duplicates() {
    let mut graph = triangle();
    graph.add_multiple_edges(&[Edge::new(1, 2), Edge::new(4, 1)]);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.node_count(), 4);
}

#[test]
fn test_degrees() {
    let mut graph = triangle();
    graph.add_edge(Edge::new(1, 4));
    assert_eq!(graph.node_degree(1), Ok(3));
    assert_eq!(graph.node_degree(4), Ok(1));
    assert_eq!(graph.node_degree(9), Err(GraphError::NodeNotFound(9)));
    assert_eq!(graph.graph_degree(), 3);
}

#[test]
fn test_remove_node() {
    let mut graph = triangle();
    assert_eq!(graph.remove_node(2), Ok(()));
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edges(), &[Edge::new(3, 1)]);
    assert_eq!(graph.node_degree(1), Ok(1));
    assert_eq!(graph.node_degree(3), Ok(1));
    assert_eq!(graph.remove_node(2), Err(GraphError::NodeNotFound(2)));
}

#[test]
fn test_remove_edge() {
    let mut graph = triangle();
    assert_eq!(graph.remove_edge(Edge::new(2, 1)), Ok(()));
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.node_degree(1), Ok(1));
    assert_eq!(
        graph.remove_edge(Edge::new(1, 2)),
        Err(GraphError::EdgeNotFound(1, 2)),
    );
}

#[test]
fn test_coloring_triangle() {
    let mut graph = triangle();
    graph.coloring();
    assert_proper_coloring(&graph);
    let mut colors: Vec<usize> = graph.nodes().iter().map(|node| node.color).collect();
    colors.sort();
    assert_eq!(colors, vec![1, 2, 3]);
}

#[test]
fn test_coloring_bipartite() {
    let mut graph = Graph::new();
    for a in 0..4 {
        for b in 4..8 {
            graph.add_edge(Edge::new(a, b));
        }
    }
    graph.coloring();
    assert_proper_coloring(&graph);
    assert!(graph.nodes().iter().all(|node| node.color <= 2));
}

#[test]
fn test_clear() {
    let mut graph = triangle();
    graph.clear();
    assert_eq!(graph.node_count(), 0);
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.add_edge(Edge::new(1, 2)));
}

#[test]
fn test_edge_tokens() {
    assert_tokens(
        &Edge::new(1, 2),
        &[
            Token::Struct { name: "Edge", len: 2 },
            Token::Str("a"),
            Token::U64(1),
            Token::Str("b"),
            Token::U64(2),
            Token::StructEnd,
        ],
    );
}

#[test]
fn int_test_coloring() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut graph = Graph::new();
    for _ in 0..2_000 {
        let a = rng.gen_range(0usize, 200);
        let b = rng.gen_range(0usize, 200);
        graph.add_edge(Edge::new(a, b));
    }
    for _ in 0..20 {
        let id = rng.gen_range(0usize, 200);
        let _ = graph.remove_node(id);
    }

    graph.coloring();
    assert_proper_coloring(&graph);
    assert!(graph.nodes().iter().all(|node| node.color <= graph.graph_degree() + 1));
}
