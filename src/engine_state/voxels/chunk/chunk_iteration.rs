//! # Chunk Iteration Module
//!
//! Center-outward traversal of chunk positions. Ring 0 is the center; ring `n`
//! walks its `8n` perimeter cells along the top edge, then the right, bottom
//! and left edges. Nearer chunks therefore always come before farther ones.
//!
//! ```text
//! *****
//! *---*
//! *-.-*
//! *---*
//! *****
//! ```

use cgmath::Point2;

use super::ChunkPosition;

/// Iterator over every position within `radius` (Chebyshev) of a center.
#[derive(Clone, Debug)]
pub struct RingIterator {
    center: ChunkPosition,
    radius: i32,
    /// Ring currently being walked
    ring: i32,
    /// Index of the next cell on the current ring's perimeter
    index: i32,
}

impl RingIterator {
    /// Creates a traversal of the `(2 * radius + 1)^2` positions around `center`.
    pub fn new(center: ChunkPosition, radius: i32) -> Self {
        RingIterator {
            center,
            radius: radius.max(0),
            ring: 0,
            index: 0,
        }
    }
}

impl Iterator for RingIterator {
    type Item = ChunkPosition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ring > self.radius {
            return None;
        }

        if self.ring == 0 {
            self.ring = 1;
            return Some(self.center);
        }

        let n = self.ring;
        let edge_len = 2 * n;
        let edge = self.index / edge_len;
        let k = self.index % edge_len;

        let (dx, dz) = match edge {
            0 => (-n + k, -n),
            1 => (n, -n + k),
            2 => (n - k, n),
            _ => (-n, n - k),
        };

        self.index += 1;
        if self.index == 4 * edge_len {
            self.index = 0;
            self.ring += 1;
        }

        Some(Point2::new(self.center.x + dx, self.center.y + dz))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let side = (2 * self.radius + 1) as usize;
        let visited = if self.ring == 0 {
            0
        } else {
            let inner = (2 * (self.ring - 1) + 1) as usize;
            inner * inner + self.index as usize
        };
        let remaining = (side * side).saturating_sub(visited);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RingIterator {}

/// Chebyshev distance between two chunk positions.
#[inline]
pub fn ring_distance(a: ChunkPosition, b: ChunkPosition) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}
