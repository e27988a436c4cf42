use once_cell::sync::Lazy;

use crate::coords::CubeCoord;
use crate::types::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileTemplate {
    pub coord: CubeCoord,
    pub resource: Option<Resource>,
    pub number: u8,
}

/// The 19 land hexes in id order: centre, inner ring, outer ring.
///
/// The desert carries 7, which production never sees because a 7 skips it.
pub static STANDARD_LAYOUT: Lazy<Vec<TileTemplate>> = Lazy::new(|| {
    use Resource::*;
    let tiles: [(CubeCoord, Option<Resource>, u8); 19] = [
        (CubeCoord::new(0, 0, 0), Some(Wheat), 6),
        (CubeCoord::new(1, -1, 0), Some(Ore), 5),
        (CubeCoord::new(0, -1, 1), Some(Sheep), 10),
        (CubeCoord::new(-1, 0, 1), Some(Brick), 8),
        (CubeCoord::new(-1, 1, 0), Some(Wood), 3),
        (CubeCoord::new(0, 1, -1), Some(Wheat), 4),
        (CubeCoord::new(1, 0, -1), Some(Sheep), 9),
        (CubeCoord::new(2, -2, 0), Some(Wood), 11),
        (CubeCoord::new(1, -2, 1), Some(Brick), 4),
        (CubeCoord::new(0, -2, 2), Some(Sheep), 9),
        (CubeCoord::new(-1, -1, 2), Some(Wheat), 12),
        (CubeCoord::new(-2, 0, 2), Some(Ore), 6),
        (CubeCoord::new(-2, 1, 1), None, 7),
        (CubeCoord::new(-2, 2, 0), Some(Wood), 5),
        (CubeCoord::new(-1, 2, -1), Some(Brick), 10),
        (CubeCoord::new(0, 2, -2), Some(Ore), 3),
        (CubeCoord::new(1, 1, -2), Some(Sheep), 8),
        (CubeCoord::new(2, 0, -2), Some(Wheat), 11),
        (CubeCoord::new(2, -1, -1), Some(Wood), 2),
    ];
    tiles
        .into_iter()
        .map(|(coord, resource, number)| TileTemplate {
            coord,
            resource,
            number,
        })
        .collect()
});
