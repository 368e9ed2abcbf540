use image::GrayImage;

use super::PixelBox;

/// Maximum number of pixels an edge may move outwards.
pub const MAX_EDGE_SHIFT: u32 = 15;

/// Transition density above which an edge is considered to cut through ink.
pub const EDGE_DENSITY_THRESHOLD: f32 = 0.2;

#[derive(Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Widens a box whose edges cut through strokes of the binarized page.
///
/// For every edge, the fraction of adjacent pixel pairs along the edge line
/// that change value is measured. When it exceeds
/// [`EDGE_DENSITY_THRESHOLD`] the edge is moved outwards one pixel at a time,
/// at most [`MAX_EDGE_SHIFT`] pixels, and the least dense position wins.
/// Edges are never moved inwards and never leave the image.
pub fn adjust_edges(binary: &GrayImage, bbox: PixelBox) -> PixelBox {
    let (width, height) = binary.dimensions();
    if bbox.is_empty() || bbox.x2 > width || bbox.y2 > height {
        return bbox;
    }

    [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom]
        .into_iter()
        .fold(bbox, |current, edge| adjust_edge(binary, current, edge))
}

fn adjust_edge(binary: &GrayImage, bbox: PixelBox, edge: Edge) -> PixelBox {
    let (width, height) = binary.dimensions();

    let mut best = bbox;
    let mut best_score = edge_density(binary, &bbox, edge);
    if best_score <= EDGE_DENSITY_THRESHOLD {
        return bbox;
    }

    let mut candidate = bbox;
    for _ in 0..MAX_EDGE_SHIFT {
        let moved = match edge {
            Edge::Left if candidate.x1 > 0 => PixelBox { x1: candidate.x1 - 1, ..candidate },
            Edge::Right if candidate.x2 < width => PixelBox { x2: candidate.x2 + 1, ..candidate },
            Edge::Top if candidate.y1 > 0 => PixelBox { y1: candidate.y1 - 1, ..candidate },
            Edge::Bottom if candidate.y2 < height => PixelBox { y2: candidate.y2 + 1, ..candidate },
            _ => break,
        };
        candidate = moved;

        let score = edge_density(binary, &candidate, edge);
        if score < best_score {
            best_score = score;
            best = candidate;
        }

        if score <= EDGE_DENSITY_THRESHOLD {
            break;
        }
    }

    best
}

/// Fraction of value changes between neighbouring pixels on an edge line.
fn edge_density(binary: &GrayImage, bbox: &PixelBox, edge: Edge) -> f32 {
    let line: Vec<u8> = match edge {
        Edge::Left => (bbox.y1..bbox.y2).map(|y| binary.get_pixel(bbox.x1, y)[0]).collect(),
        Edge::Right => (bbox.y1..bbox.y2).map(|y| binary.get_pixel(bbox.x2 - 1, y)[0]).collect(),
        Edge::Top => (bbox.x1..bbox.x2).map(|x| binary.get_pixel(x, bbox.y1)[0]).collect(),
        Edge::Bottom => (bbox.x1..bbox.x2).map(|x| binary.get_pixel(x, bbox.y2 - 1)[0]).collect(),
    };

    if line.len() < 2 {
        return 0.0;
    }

    let transitions = line.windows(2).filter(|pair| pair[0] != pair[1]).count();
    transitions as f32 / (line.len() - 1) as f32
}
