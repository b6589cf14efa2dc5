use std::ops::{Index, IndexMut};

/// A bounded 2D tilemap grid. Unlike a planetary map it does not wrap:
/// coordinates outside `0..width` / `0..height` simply do not exist.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Build a tilemap by evaluating `f` for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({}, {}) out of bounds", x, y);
        y * self.width + x
    }

    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Bounds-checked access. Returns `None` for any coordinate off the map.
    pub fn get(&self, x: isize, y: isize) -> Option<&T> {
        if self.contains(x, y) {
            Some(&self.data[self.offset(x as usize, y as usize)])
        } else {
            None
        }
    }

    /// Bounds-checked mutable access.
    pub fn get_mut(&mut self, x: isize, y: isize) -> Option<&mut T> {
        if self.contains(x, y) {
            let idx = self.offset(x as usize, y as usize);
            Some(&mut self.data[idx])
        } else {
            None
        }
    }

    /// Get 8-connected neighbors (including diagonals).
    /// Edges are hard: cells on the border have fewer than 8 neighbors.
    pub fn neighbors_8(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        DIR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            self.contains(nx, ny).then(|| (nx as usize, ny as usize))
        })
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<(usize, usize)> for Tilemap<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.data[self.offset(x, y)]
    }
}

impl<T> IndexMut<(usize, usize)> for Tilemap<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        let idx = self.offset(x, y);
        &mut self.data[idx]
    }
}

/// Direction offsets for 8-neighbor analysis (dx, dy)
/// Order: N, NE, E, SE, S, SW, W, NW
pub const DIR_OFFSETS: [(isize, isize); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_inside_and_outside_bounds() {
        let map = Tilemap::from_fn(4, 3, |x, y| x + y * 10);

        for y in 0..3isize {
            for x in 0..4isize {
                assert_eq!(map.get(x, y), Some(&(x as usize + y as usize * 10)));
            }
        }

        assert_eq!(map.get(-1, 0), None);
        assert_eq!(map.get(0, -1), None);
        assert_eq!(map.get(4, 0), None);
        assert_eq!(map.get(0, 3), None);
        assert_eq!(map.get(isize::MAX, isize::MIN), None);
    }

    #[test]
    fn test_neighbors_do_not_wrap() {
        let map = Tilemap::new_with(5, 5, 0u8);

        assert_eq!(map.neighbors_8(0, 0).count(), 3);
        assert_eq!(map.neighbors_8(4, 2).count(), 5);
        assert_eq!(map.neighbors_8(2, 2).count(), 8);
        assert!(map.neighbors_8(0, 0).all(|(x, y)| x <= 1 && y <= 1));
    }

    #[test]
    fn test_row_major_iteration() {
        let map = Tilemap::from_fn(3, 2, |x, y| (x, y));
        let order: Vec<_> = map.iter().map(|(_, _, &v)| v).collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        for (x, y, &(vx, vy)) in map.iter() {
            assert_eq!((x, y), (vx, vy));
        }
    }

    #[test]
    fn test_index_and_get_mut() {
        let mut map = Tilemap::new_with(3, 3, 0i32);
        map[(1, 2)] = 7;
        map[(2, 0)] = 4;
        assert_eq!(map[(1, 2)], 7);
        assert_eq!(map.get(2, 0), Some(&4));
        *map.get_mut(0, 0).unwrap() = -1;
        assert_eq!(map[(0, 0)], -1);
        assert!(map.get_mut(3, 0).is_none());
    }
}
