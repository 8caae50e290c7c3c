use narwhal::{
    GraphIndex, Layer, LayerAssignment, Position, Relation, to_named_positions, to_positions,
};

fn pos(column: i32, row: i32) -> Position {
    Position { column, row }
}

#[test]
fn odd_layer_is_centred_on_zero() {
    let relations: Vec<Relation> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|n| Relation::parallel("hub", *n))
        .collect();
    let g = GraphIndex::build(&relations);
    let layers = LayerAssignment::new(vec![Layer {
        depth: 3,
        nodes: ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| g.id(n).unwrap())
            .collect(),
    }]);

    let positions = to_named_positions(&layers, &g);
    let columns: Vec<i32> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|n| positions[*n].column)
        .collect();
    assert_eq!(columns, vec![-2, -1, 0, 1, 2]);
    assert!(positions.values().all(|p| p.row == 3));
    assert!(!positions.contains_key("hub"));
}

#[test]
fn even_layer_leans_left() {
    let g = GraphIndex::build(&[Relation::parallel("a", "b")]);
    let layers = LayerAssignment::new(vec![Layer {
        depth: 0,
        nodes: vec![g.id("a").unwrap(), g.id("b").unwrap()],
    }]);

    let positions = to_named_positions(&layers, &g);
    assert_eq!(positions["a"], pos(-1, 0));
    assert_eq!(positions["b"], pos(0, 0));
}

#[test]
fn rows_follow_layer_depths() {
    let g = GraphIndex::build(&[Relation::next("a", "b"), Relation::next("b", "c")]);
    let layers = LayerAssignment::new(vec![
        Layer {
            depth: -1,
            nodes: vec![g.id("c").unwrap()],
        },
        Layer {
            depth: 0,
            nodes: vec![g.id("b").unwrap()],
        },
        Layer {
            depth: 1,
            nodes: vec![g.id("a").unwrap()],
        },
    ]);

    let positions = to_positions(&layers);
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[&g.id("a").unwrap()], pos(0, 1));
    assert_eq!(positions[&g.id("b").unwrap()], pos(0, 0));
    assert_eq!(positions[&g.id("c").unwrap()], pos(0, -1));
}

#[test]
fn empty_assignment_has_no_positions() {
    assert!(to_positions(&LayerAssignment::default()).is_empty());
}
