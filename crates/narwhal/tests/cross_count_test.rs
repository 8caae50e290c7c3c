use narwhal::random::shuffle;
use narwhal::{
    CrossingCounter, CrossingReport, GraphIndex, Layer, LayerAssignment, NamedLayer,
    RandomSource, Relation, RelationKind, XorShift64Star, assign_layers, count_crossings,
};

fn named(depth: i32, nodes: &[&str]) -> NamedLayer {
    NamedLayer {
        depth,
        nodes: nodes.iter().map(|s| s.to_string()).collect(),
    }
}

fn report(same: usize, cross: usize) -> CrossingReport {
    CrossingReport {
        same_depth_crossings: same,
        cross_depth_crossings: cross,
    }
}

#[test]
fn swapped_targets_cross_once() {
    let relations = [Relation::next("A", "C"), Relation::next("B", "D")];

    let crossed = count_crossings(&relations, &[named(0, &["A", "B"]), named(1, &["D", "C"])]);
    assert_eq!(crossed, report(0, 1));

    let straight = count_crossings(&relations, &[named(0, &["A", "B"]), named(1, &["C", "D"])]);
    assert_eq!(straight, report(0, 0));
}

#[test]
fn interleaved_parallel_edges_cross() {
    let layers = [named(0, &["P", "Q", "R", "S"])];

    let interleaved = [Relation::parallel("P", "R"), Relation::parallel("Q", "S")];
    assert_eq!(count_crossings(&interleaved, &layers), report(1, 0));

    let side_by_side = [Relation::parallel("P", "Q"), Relation::parallel("R", "S")];
    assert_eq!(count_crossings(&side_by_side, &layers), report(0, 0));
}

#[test]
fn nested_parallel_edges_count_as_crossing() {
    let relations = [Relation::parallel("P", "S"), Relation::parallel("Q", "R")];
    assert_eq!(
        count_crossings(&relations, &[named(0, &["P", "Q", "R", "S"])]),
        report(1, 0)
    );
}

#[test]
fn edges_sharing_an_endpoint_never_cross() {
    let relations = [Relation::next("a", "c"), Relation::next("a", "d")];
    assert_eq!(
        count_crossings(&relations, &[named(0, &["a"]), named(1, &["d", "c"])]),
        report(0, 0)
    );

    let fan = [Relation::parallel("m", "a"), Relation::parallel("m", "b")];
    assert_eq!(
        count_crossings(&fan, &[named(0, &["a", "m", "b"])]),
        report(0, 0)
    );
}

#[test]
fn duplicated_relations_count_per_occurrence() {
    let relations = [
        Relation::next("a", "c"),
        Relation::next("a", "c"),
        Relation::next("b", "d"),
    ];
    assert_eq!(
        count_crossings(&relations, &[named(0, &["a", "b"]), named(1, &["d", "c"])]),
        report(0, 2)
    );
}

#[test]
fn reversed_parallel_duplicate_counts_once() {
    let relations = [
        Relation::parallel("P", "R"),
        Relation::parallel("R", "P"),
        Relation::parallel("Q", "S"),
    ];
    assert_eq!(
        count_crossings(&relations, &[named(0, &["P", "Q", "R", "S"])]),
        report(1, 0)
    );
}

#[test]
fn edges_with_unplaced_endpoints_are_skipped() {
    let relations = [Relation::next("a", "c"), Relation::next("b", "d")];
    assert_eq!(
        count_crossings(&relations, &[named(0, &["a", "b"]), named(1, &["c"])]),
        report(0, 0)
    );
    assert_eq!(count_crossings(&relations, &[]), report(0, 0));
    assert_eq!(count_crossings(&[], &[named(0, &["a"])]), report(0, 0));
}

#[test]
fn names_without_relations_keep_their_column() {
    // x has no relation but still pushes p to the right of the a->d edge.
    let layers = [named(0, &["a"]), named(1, &["x", "p"]), named(2, &["c", "d"])];
    let relations = vec![Relation::next("a", "d"), Relation::next("p", "c")];
    assert_eq!(count_crossings(&relations, &layers), report(0, 1));

    let mut linked = relations.clone();
    linked.push(Relation::next("x", "elsewhere"));
    assert_eq!(count_crossings(&linked, &layers), report(0, 1));
}

#[test]
fn self_loops_never_cross() {
    let layers = [named(0, &["b", "a", "c"]), named(1, &["d"])];
    let relations = vec![Relation::parallel("b", "c"), Relation::next("a", "d")];
    let base = count_crossings(&relations, &layers);

    let mut looped = relations.clone();
    looped.push(Relation::parallel("a", "a"));
    looped.push(Relation::next("a", "a"));
    looped.push(Relation::prev("c", "c"));
    assert_eq!(count_crossings(&looped, &layers), base);
    assert_eq!(
        count_crossings(&[Relation::parallel("a", "a")], &[named(0, &["b", "a", "c"])]),
        report(0, 0)
    );
}

#[test]
fn long_edge_through_a_flat_edge_crosses_it() {
    let relations = [Relation::next("a", "c"), Relation::parallel("p", "q")];
    let layers = [named(0, &["a"]), named(1, &["p", "b", "q"]), named(2, &["c"])];
    assert_eq!(count_crossings(&relations, &layers), report(0, 1));
}

#[test]
fn counter_can_be_reused_across_assignments() {
    let relations = [Relation::next("A", "C"), Relation::next("B", "D")];
    let g = GraphIndex::build(&relations);
    let id = |n: &str| g.id(n).unwrap();
    let mut counter = CrossingCounter::new(&g);

    let crossed = LayerAssignment::new(vec![
        Layer {
            depth: 0,
            nodes: vec![id("A"), id("B")],
        },
        Layer {
            depth: 1,
            nodes: vec![id("D"), id("C")],
        },
    ]);
    let mut straight = crossed.clone();
    straight.layers[1].nodes.reverse();

    assert_eq!(counter.count(&crossed).total(), 1);
    assert_eq!(counter.count(&straight).total(), 0);
    assert_eq!(counter.count(&crossed).total(), 1);
}

fn random_relations(rng: &mut XorShift64Star, nodes: usize, count: usize) -> Vec<Relation> {
    (0..count)
        .map(|_| {
            let from = rng.next_usize(nodes);
            let to = rng.next_usize(nodes);
            let kind = RelationKind::ALL[rng.next_usize(3)];
            Relation::new(format!("n{from}"), format!("n{to}"), kind)
        })
        .collect()
}

fn shuffled_layers(
    relations: &[Relation],
    rng: &mut XorShift64Star,
) -> (GraphIndex, LayerAssignment) {
    let g = GraphIndex::build(relations);
    let mut layers = assign_layers(g.id("n0").unwrap(), &g);
    for layer in &mut layers.layers {
        shuffle(&mut layer.nodes, rng);
    }
    (g, layers)
}

#[test]
fn mirroring_every_layer_keeps_the_total() {
    let mut rng = XorShift64Star::new(7);
    for _ in 0..200 {
        let mut relations = random_relations(&mut rng, 9, 14);
        relations.push(Relation::next("n0", "n1"));
        let (g, layers) = shuffled_layers(&relations, &mut rng);

        let mut mirrored = layers.clone();
        for layer in &mut mirrored.layers {
            layer.nodes.reverse();
        }

        let mut counter = CrossingCounter::new(&g);
        assert_eq!(
            counter.count(&layers).total(),
            counter.count(&mirrored).total(),
            "relations: {relations:?}"
        );
    }
}

#[test]
fn renaming_nodes_keeps_the_report() {
    let mut rng = XorShift64Star::new(11);
    for _ in 0..100 {
        let mut relations = random_relations(&mut rng, 8, 12);
        relations.push(Relation::parallel("n0", "n1"));
        let (g, layers) = shuffled_layers(&relations, &mut rng);

        let named_layers: Vec<NamedLayer> = layers
            .layers
            .iter()
            .map(|l| NamedLayer {
                depth: l.depth,
                nodes: l.nodes.iter().map(|&n| g.name(n).to_string()).collect(),
            })
            .collect();
        let rename = |s: &str| format!("node-{}", s.trim_start_matches('n'));

        let renamed_relations: Vec<Relation> = relations
            .iter()
            .rev()
            .map(|r| Relation::new(rename(r.from.as_str()), rename(r.to.as_str()), r.kind))
            .collect();
        let renamed_layers: Vec<NamedLayer> = named_layers
            .iter()
            .map(|l| NamedLayer {
                depth: l.depth,
                nodes: l.nodes.iter().map(|n| rename(n.as_str())).collect(),
            })
            .collect();

        assert_eq!(
            count_crossings(&relations, &named_layers),
            count_crossings(&renamed_relations, &renamed_layers)
        );
    }
}
