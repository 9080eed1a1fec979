use spritegen_core::config::LayoutAlgorithm;
use spritegen_core::engine::layout::layout;

const SIZES: [(u32, u32); 3] = [(10, 20), (30, 5), (8, 8)];

#[test]
fn top_down_stacks_vertically_with_padding() {
    let (placements, props) = layout(&SIZES, LayoutAlgorithm::TopDown, 2);
    let ys: Vec<u32> = placements.iter().map(|p| p.y).collect();
    assert!(placements.iter().all(|p| p.x == 0));
    assert_eq!(ys, vec![0, 22, 29]);
    assert_eq!(props.width, 30);
    assert_eq!(props.height, 20 + 2 + 5 + 2 + 8);
}

#[test]
fn left_right_stacks_horizontally_with_padding() {
    let (placements, props) = layout(&SIZES, LayoutAlgorithm::LeftRight, 2);
    let xs: Vec<u32> = placements.iter().map(|p| p.x).collect();
    assert!(placements.iter().all(|p| p.y == 0));
    assert_eq!(xs, vec![0, 12, 44]);
    assert_eq!(props.width, 10 + 2 + 30 + 2 + 8);
    assert_eq!(props.height, 20);
}

#[test]
fn diagonal_steps_down_right() {
    let (placements, props) = layout(&SIZES, LayoutAlgorithm::Diagonal, 0);
    let pos: Vec<(u32, u32)> = placements.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(pos, vec![(0, 0), (10, 20), (40, 25)]);
    assert_eq!(props.width, 48);
    assert_eq!(props.height, 33);
}

#[test]
fn alt_diagonal_mirrors_from_top_right() {
    let (placements, props) = layout(&SIZES, LayoutAlgorithm::AltDiagonal, 0);
    let pos: Vec<(u32, u32)> = placements.iter().map(|p| (p.x, p.y)).collect();
    // Mirror of diagonal: x' = width - x - w.
    assert_eq!(pos, vec![(38, 0), (8, 20), (0, 25)]);
    assert_eq!(props.width, 48);
    assert_eq!(props.height, 33);
}

#[test]
fn single_image_has_no_padding() {
    let (placements, props) = layout(&[(7, 9)], LayoutAlgorithm::TopDown, 4);
    assert_eq!((placements[0].x, placements[0].y), (0, 0));
    assert_eq!((props.width, props.height), (7, 9));
}
