//! The eight concrete testable scenarios from the component design,
//! against `pgql-graph`'s in-memory `HostGraph`.

use pgql_api::AttributeValue;
use pgql_graph::InMemoryGraph;
use pgql::Value;

fn three_cycle() -> (InMemoryGraph, u64, u64, u64) {
    let (x, y, z) = (1, 2, 3);
    let mut g = InMemoryGraph::new();
    g.add_edge(x, y);
    g.add_edge(y, z);
    g.add_edge(z, x);
    (g, x, y, z)
}

#[test]
fn scenario_1_simple_two_hop_path() {
    let (x, y, z) = (1u64, 2u64, 3u64);
    let mut g = InMemoryGraph::new();
    g.add_edge(x, y);
    g.add_edge(y, z);

    let result = pgql::run(&g, "MATCH (A)-[B]->(C) RETURN A").unwrap();
    let column = result.column("A").unwrap();
    assert_eq!(column.len(), 2);
    let ids: Vec<i64> = column
        .iter()
        .map(|v| match v {
            Value::Int(i) => *i,
            other => panic!("expected Value::Int, got {other:?}"),
        })
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(sorted, vec![x as i64, y as i64]);
}

#[test]
fn scenario_2_missing_attribute_is_absent() {
    let (x, y, z) = (1u64, 2u64, 3u64);
    let mut g = InMemoryGraph::new();
    g.add_edge(x, y);
    g.add_edge(y, z);
    g.set_node_attribute(
        x,
        "dinnertime",
        AttributeValue::String("no thanks I already ate".into()),
    );

    let result = pgql::run(&g, "MATCH (A)-[B]->(C) RETURN A.dinnertime").unwrap();
    let column = result.column("A.dinnertime").unwrap();
    assert_eq!(column.len(), 2);
    let present = column
        .iter()
        .filter(|v| matches!(v, Value::String(s) if s == "no thanks I already ate"))
        .count();
    let absent = column.iter().filter(|v| matches!(v, Value::Absent)).count();
    assert_eq!(present, 1);
    assert_eq!(absent, 1);
}

#[test]
fn scenario_3_triangle_three_rotations() {
    let (g, _x, _y, _z) = three_cycle();

    let result = pgql::run(
        &g,
        "MATCH (A)-[]->(B) MATCH (B)-[]->(C) MATCH (C)-[]->(A) RETURN A",
    )
    .unwrap();
    assert_eq!(result.column("A").unwrap().len(), 3);
}

#[test]
fn scenario_4_where_filters_to_one_node() {
    let (mut g, x, _y, _z) = three_cycle();
    g.set_node_attribute(x, "foo", AttributeValue::String("bar".into()));

    let result = pgql::run(&g, "MATCH (A)-[X]->(B) WHERE A.foo == \"bar\" RETURN A").unwrap();
    let column = result.column("A").unwrap();
    assert_eq!(column.len(), 1);
    assert_eq!(column[0], Value::Int(x as i64));
}

#[test]
fn scenario_5_and_chained_numeric_range() {
    let (mut g, x, y, z) = three_cycle();
    g.set_node_attribute(x, "foo", AttributeValue::Int(12));
    g.set_node_attribute(y, "foo", AttributeValue::Int(13));
    g.set_node_attribute(z, "foo", AttributeValue::Int(16));

    let result = pgql::run(
        &g,
        "MATCH (A)-[]->(B) WHERE A.foo > 10 AND A.foo < 15 RETURN A",
    )
    .unwrap();
    let column = result.column("A").unwrap();
    assert_eq!(column.len(), 2);
    let mut ids: Vec<i64> = column
        .iter()
        .map(|v| match v {
            Value::Int(i) => *i,
            other => panic!("expected Value::Int, got {other:?}"),
        })
        .collect();
    ids.sort();
    assert_eq!(ids, vec![x as i64, y as i64]);
}

#[test]
fn scenario_6_multi_variable_where() {
    let (mut g, x, y, z) = three_cycle();
    g.set_node_attribute(x, "foo", AttributeValue::Int(12));
    g.set_node_attribute(y, "foo", AttributeValue::Int(13));
    g.set_node_attribute(z, "foo", AttributeValue::Int(16));

    let result = pgql::run(
        &g,
        "MATCH (A)-[]->(B) WHERE A.foo == 12 AND B.foo == 13 RETURN A",
    )
    .unwrap();
    assert_eq!(result.column("A").unwrap().len(), 1);
}

#[test]
fn scenario_7_karate_club_two_hop_filtered() {
    let g = karate_club_graph();

    let result = pgql::run(
        &g,
        "MATCH (A)-[]->(B) MATCH (B)-[]->(C) WHERE A.club == \"Mr. Hi\" RETURN A.club, B.club",
    )
    .unwrap();
    assert_eq!(result.column("A.club").unwrap().len(), 544);
    assert_eq!(result.column("B.club").unwrap().len(), 544);
}

#[test]
fn scenario_8_anonymous_edge() {
    let (g, _x, _y, _z) = three_cycle();

    let result = pgql::run(&g, "MATCH (A)-[]->(B) RETURN A").unwrap();
    assert_eq!(result.column("A").unwrap().len(), 3);
}

/// Zachary's karate club: the standard 34-node, 78-edge social network,
/// inlined as a literal edge list plus a `club` attribute on every node
/// (no network/file fetch — this is the well-known, fixed dataset).
/// The underlying graph is undirected; every edge is added in both
/// directions so a directed `-[]->` pattern can traverse it either way,
/// matching how the scenario this fixture backs is defined upstream.
fn karate_club_graph() -> InMemoryGraph {
    const EDGES: &[(u64, u64)] = &[
        (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6), (0, 7), (0, 8), (0, 10), (0, 11),
        (0, 12), (0, 13), (0, 17), (0, 19), (0, 21), (0, 31), (1, 2), (1, 3), (1, 7), (1, 13),
        (1, 17), (1, 19), (1, 21), (1, 30), (2, 3), (2, 7), (2, 8), (2, 9), (2, 13), (2, 27),
        (2, 28), (2, 32), (3, 7), (3, 12), (3, 13), (4, 6), (4, 10), (5, 6), (5, 10), (5, 16),
        (6, 16), (8, 30), (8, 32), (8, 33), (9, 33), (13, 33), (14, 32), (14, 33), (15, 32),
        (15, 33), (18, 32), (18, 33), (19, 33), (20, 32), (20, 33), (22, 32), (22, 33),
        (23, 25), (23, 27), (23, 29), (23, 32), (23, 33), (24, 25), (24, 27), (24, 31),
        (25, 31), (26, 29), (26, 33), (27, 33), (28, 31), (28, 33), (29, 32), (29, 33),
        (30, 32), (30, 33), (31, 32), (31, 33), (32, 33),
    ];
    const HI_GROUP: &[u64] = &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 13, 16, 17, 19, 21,
    ];

    let mut g = InMemoryGraph::new();
    for node in 0u64..34 {
        let club = if HI_GROUP.contains(&node) {
            "Mr. Hi"
        } else {
            "Officer"
        };
        g.set_node_attribute(node, "club", AttributeValue::String(club.into()));
    }
    for &(u, v) in EDGES {
        g.add_edge(u, v);
        g.add_edge(v, u);
    }
    g
}
