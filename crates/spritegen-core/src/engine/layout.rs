use crate::config::LayoutAlgorithm;
use crate::model::SheetProperties;

/// Top-left position assigned to one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Place `sizes` (width, height pairs, in input order) according to
/// `algorithm`, with `padding` pixels between consecutive images.
///
/// All four algorithms are pure ordered layout: the position of each image
/// depends only on the sizes before it, never on a fitting heuristic, so the
/// result is deterministic for a given input order.
pub fn layout(
    sizes: &[(u32, u32)],
    algorithm: LayoutAlgorithm,
    padding: u32,
) -> (Vec<Placement>, SheetProperties) {
    match algorithm {
        LayoutAlgorithm::TopDown => top_down(sizes, padding),
        LayoutAlgorithm::LeftRight => left_right(sizes, padding),
        LayoutAlgorithm::Diagonal => diagonal(sizes, padding),
        LayoutAlgorithm::AltDiagonal => alt_diagonal(sizes, padding),
    }
}

fn top_down(sizes: &[(u32, u32)], padding: u32) -> (Vec<Placement>, SheetProperties) {
    let mut placements = Vec::with_capacity(sizes.len());
    let mut y = 0u32;
    let mut width = 0u32;
    for (i, &(w, h)) in sizes.iter().enumerate() {
        if i > 0 {
            y += padding;
        }
        placements.push(Placement { x: 0, y });
        y += h;
        width = width.max(w);
    }
    (
        placements,
        SheetProperties { width, height: y },
    )
}

fn left_right(sizes: &[(u32, u32)], padding: u32) -> (Vec<Placement>, SheetProperties) {
    let mut placements = Vec::with_capacity(sizes.len());
    let mut x = 0u32;
    let mut height = 0u32;
    for (i, &(w, h)) in sizes.iter().enumerate() {
        if i > 0 {
            x += padding;
        }
        placements.push(Placement { x, y: 0 });
        x += w;
        height = height.max(h);
    }
    (
        placements,
        SheetProperties { width: x, height },
    )
}

fn diagonal(sizes: &[(u32, u32)], padding: u32) -> (Vec<Placement>, SheetProperties) {
    let mut placements = Vec::with_capacity(sizes.len());
    let mut x = 0u32;
    let mut y = 0u32;
    for (i, &(w, h)) in sizes.iter().enumerate() {
        if i > 0 {
            x += padding;
            y += padding;
        }
        placements.push(Placement { x, y });
        x += w;
        y += h;
    }
    (
        placements,
        SheetProperties {
            width: x,
            height: y,
        },
    )
}

/// Same staircase as `diagonal`, mirrored to run from the top-right corner
/// down to the bottom-left.
fn alt_diagonal(sizes: &[(u32, u32)], padding: u32) -> (Vec<Placement>, SheetProperties) {
    let (diag, props) = diagonal(sizes, padding);
    let placements = diag
        .iter()
        .zip(sizes)
        .map(|(p, &(w, _))| Placement {
            x: props.width - p.x - w,
            y: p.y,
        })
        .collect();
    (placements, props)
}
