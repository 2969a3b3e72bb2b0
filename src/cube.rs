use crate::{
    common::{
        check_coordinates, checked_squared_distance, sort_by_distance, squared_limit,
        IdAndSquaredDistance, IndexedValue,
    },
    config::Validation,
    error::{IndexError, Result},
    geometry::Point,
    index::SpatialIndex,
};
use num_traits::{float::FloatCore, ToPrimitive, Zero};
use std::collections::HashMap;

/// Integer coordinates of a grid cell. `i, j, k` to keep them apart from the
/// `x, y, z` of points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub i: i64,
    pub j: i64,
    pub k: i64,
}

impl Cell {
    #[must_use]
    pub fn new(i: i64, j: i64, k: i64) -> Self {
        Cell { i, j, k }
    }
}

/// The occupied cells of the grid and the ids bucketed in each of them.
/// Empty cells are never created.
struct CellGrid<I> {
    cells: HashMap<Cell, Vec<I>>,
}

impl<I> CellGrid<I> {
    fn new() -> Self {
        CellGrid {
            cells: HashMap::new(),
        }
    }

    fn insert(&mut self, cell: Cell, id: I) {
        self.cells.entry(cell).or_default().push(id);
    }

    fn read(&self, cell: &Cell) -> &[I] {
        match self.cells.get(cell) {
            Some(ids) => ids.as_slice(),
            None => &[],
        }
    }

    fn occupied(&self) -> usize {
        self.cells.len()
    }
}

/// Uniform grid over space: cubes of side `grid_step`, each one remembering
/// which points fall inside it.
///
/// A query visits the cubes around the one holding the reference point, so it
/// only looks at points in the neighbourhood. Nothing is sorted: `seal` does
/// nothing and points can be added at any time.
///
/// The step is a tuning knob. Small steps mean few points per cube but many
/// cubes to visit; it works best when it is close to the usual query distance.
pub struct CubeIndex<P: Point> {
    validation: Validation,
    grid_step: P::Coordinate,
    grid: CellGrid<P::Id>,
    points: HashMap<P::Id, [P::Coordinate; 3]>,
}

impl<P: Point> CubeIndex<P> {
    /// Fails with [`IndexError::InvalidGridStep`] unless `grid_step` is finite and positive.
    pub fn new(grid_step: P::Coordinate, validation: Validation) -> Result<Self> {
        Self::with_capacity(0, grid_step, validation)
    }

    /// Reserves room for `expected` points up front.
    pub fn with_capacity(
        expected: usize,
        grid_step: P::Coordinate,
        validation: Validation,
    ) -> Result<Self> {
        if !(grid_step > P::Coordinate::zero()) || grid_step.is_infinite() {
            return Err(IndexError::InvalidGridStep);
        }
        log::debug!("cube index with grid step {grid_step:?}");
        Ok(CubeIndex {
            validation,
            grid_step,
            grid: CellGrid::new(),
            points: HashMap::with_capacity(expected),
        })
    }

    #[must_use]
    pub fn grid_step(&self) -> P::Coordinate {
        self.grid_step
    }

    /// The cell holding `point`: each cell spans `[n * step, (n + 1) * step)` on every axis.
    pub fn cell_of(&self, point: &P) -> Result<Cell> {
        self.cell_of_coordinates(&point.coordinates())
    }

    fn cell_of_coordinates(&self, coordinates: &[P::Coordinate; 3]) -> Result<Cell> {
        Ok(Cell::new(
            self.to_cell_coordinate(coordinates[0])?,
            self.to_cell_coordinate(coordinates[1])?,
            self.to_cell_coordinate(coordinates[2])?,
        ))
    }

    fn to_cell_coordinate(&self, coordinate: P::Coordinate) -> Result<i64> {
        self.to_integer((coordinate / self.grid_step).floor())
    }

    /// How many cells away from the reference cell a point closer than
    /// `distance` can be. A separation below `distance / step` cells can span at
    /// most `floor(distance / step) + 1` cell borders.
    fn scan_radius(&self, distance: P::Coordinate) -> Result<i64> {
        let cells = self.to_integer((distance / self.grid_step).floor())?;
        self.add(cells, 1)
    }

    fn to_integer(&self, value: P::Coordinate) -> Result<i64> {
        match value.to_i64() {
            Some(integer) => Ok(integer),
            None if self.validation.is_checked() => Err(IndexError::CellOverflow),
            None if value > P::Coordinate::zero() => Ok(i64::MAX),
            None => Ok(i64::MIN),
        }
    }

    fn add(&self, a: i64, b: i64) -> Result<i64> {
        if self.validation.is_checked() {
            a.checked_add(b).ok_or(IndexError::CellOverflow)
        } else {
            Ok(a.saturating_add(b))
        }
    }

    fn sub(&self, a: i64, b: i64) -> Result<i64> {
        if self.validation.is_checked() {
            a.checked_sub(b).ok_or(IndexError::CellOverflow)
        } else {
            Ok(a.saturating_sub(b))
        }
    }

    /// Ids in the cubic block of cells `[low, high]`.
    fn candidates(&self, low: Cell, high: Cell) -> Vec<P::Id> {
        let mut candidates = Vec::new();
        let span = |low: i64, high: i64| (i128::from(high) - i128::from(low) + 1) as u128;
        let volume = span(low.i, high.i)
            .saturating_mul(span(low.j, high.j))
            .saturating_mul(span(low.k, high.k));

        if volume <= self.grid.occupied() as u128 {
            for i in low.i..=high.i {
                for j in low.j..=high.j {
                    for k in low.k..=high.k {
                        candidates.extend_from_slice(self.grid.read(&Cell::new(i, j, k)));
                    }
                }
            }
        } else {
            // Fewer occupied cells than cells in the block: filter the occupied ones.
            for (cell, ids) in &self.grid.cells {
                let inside = (low.i..=high.i).contains(&cell.i)
                    && (low.j..=high.j).contains(&cell.j)
                    && (low.k..=high.k).contains(&cell.k);
                if inside {
                    candidates.extend_from_slice(ids);
                }
            }
        }
        candidates
    }
}

impl<P: Point> SpatialIndex<P> for CubeIndex<P> {
    fn insert(&mut self, point: &P, id: P::Id) -> Result<()> {
        let coordinates = point.coordinates();
        check_coordinates(self.validation, &coordinates)?;
        let cell = self.cell_of_coordinates(&coordinates)?;
        if self.validation.is_checked() && self.points.contains_key(&id) {
            return Err(IndexError::DuplicateId);
        }
        self.grid.insert(cell, id);
        self.points.insert(id, coordinates);
        Ok(())
    }

    fn seal(&mut self) {}

    fn query(
        &self,
        point: &P,
        distance: P::Coordinate,
        output: &mut Vec<IdAndSquaredDistance<P>>,
    ) -> Result<()> {
        output.clear();
        let limit = squared_limit(self.validation, distance)?;
        let reference = point.coordinates();
        let center = self.cell_of_coordinates(&reference)?;
        let radius = self.scan_radius(distance)?;

        let low = Cell::new(
            self.sub(center.i, radius)?,
            self.sub(center.j, radius)?,
            self.sub(center.k, radius)?,
        );
        let high = Cell::new(
            self.add(center.i, radius)?,
            self.add(center.j, radius)?,
            self.add(center.k, radius)?,
        );
        let candidates = self.candidates(low, high);

        let mut found = Vec::new();
        for id in &candidates {
            let coordinates = match self.points.get(id) {
                Some(coordinates) => coordinates,
                None => continue,
            };
            let squared = checked_squared_distance(self.validation, &reference, coordinates)?;
            if squared < limit {
                found.push(IndexedValue::new(*id, squared));
            }
        }
        log::trace!(
            "cube query: radius {} cells, {} candidates, {} in sphere",
            radius,
            candidates.len(),
            found.len()
        );

        found.sort_unstable_by(IndexedValue::cmp_by_id);
        sort_by_distance(&mut found);
        *output = found;
        Ok(())
    }

    fn validation(&self) -> Validation {
        self.validation
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, CellGrid, CubeIndex};
    use crate::{config::Validation, error::IndexError, geometry::Point3, index::SpatialIndex};

    fn checked(step: f64) -> CubeIndex<Point3> {
        CubeIndex::new(step, Validation::Checked).unwrap()
    }

    #[test]
    fn grid_origin() {
        let mut grid = CellGrid::new();
        grid.insert(Cell::new(0, 0, 0), 10_u64);
        assert_eq!(grid.read(&Cell::new(0, 0, 0)), &[10]);
    }

    #[test]
    fn grid_read_unmapped_cells() {
        let mut grid = CellGrid::new();
        assert!(grid.read(&Cell::new(0, 0, 0)).is_empty());

        grid.insert(Cell::new(0, 0, 0), 0_u64);
        grid.insert(Cell::new(0, 1, 0), 1);
        assert!(grid.read(&Cell::new(0, 1, 2)).is_empty());
        assert!(grid.read(&Cell::new(1, 0, 0)).is_empty());
        assert_eq!(grid.occupied(), 2);
    }

    #[test]
    fn rejects_bad_grid_steps() {
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                CubeIndex::<Point3>::new(step, Validation::Unchecked),
                Err(IndexError::InvalidGridStep)
            ));
        }
    }

    #[test]
    fn cells_start_at_their_origin() {
        let index = checked(10.0);
        assert_eq!(
            index.cell_of(&Point3::new(0.0, 9.99, 10.0)).unwrap(),
            Cell::new(0, 0, 1)
        );
        assert_eq!(
            index.cell_of(&Point3::new(-0.5, -10.0, -10.5)).unwrap(),
            Cell::new(-1, -1, -2)
        );
    }

    #[test]
    fn scan_radius_is_conservative() {
        let index = checked(2.0);
        assert_eq!(index.scan_radius(0.5).unwrap(), 1);
        assert_eq!(index.scan_radius(2.0).unwrap(), 2);
        assert_eq!(index.scan_radius(5.0).unwrap(), 3);
    }

    #[test]
    fn points_on_cell_borders() {
        let mut index = checked(1.0);
        index.insert(&Point3::new(0.0, 0.0, 0.0), 0).unwrap();
        index.insert(&Point3::new(1.99, 0.0, 0.0), 1).unwrap();
        index.insert(&Point3::new(-1.999, 0.0, 0.0), 2).unwrap();
        index.insert(&Point3::new(0.0, 0.0, 2.0), 3).unwrap();

        let mut result = Vec::new();
        index
            .query(&Point3::new(0.0, 0.0, 0.0), 2.0, &mut result)
            .unwrap();
        let ids: Vec<u64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        // Reference just below a border, neighbour one cell up.
        index
            .query(&Point3::new(0.999, 0.0, 0.0), 1.0, &mut result)
            .unwrap();
        let ids: Vec<u64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn huge_radius_scans_occupied_cells() {
        let mut index = checked(1.0);
        index.insert(&Point3::new(0.0, 0.0, 0.0), 0).unwrap();
        index.insert(&Point3::new(5e5, 0.0, 0.0), 1).unwrap();
        index.insert(&Point3::new(0.0, -5e5, 5e5), 2).unwrap();

        let mut result = Vec::new();
        index
            .query(&Point3::new(0.0, 0.0, 0.0), 1e6, &mut result)
            .unwrap();
        let ids: Vec<u64> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn mutable_after_seal() {
        let mut index = checked(1.0);
        index.seal();
        index.insert(&Point3::new(0.0, 0.0, 0.0), 0).unwrap();
        let mut result = Vec::new();
        index
            .query(&Point3::new(0.0, 0.0, 0.0), 1.0, &mut result)
            .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn cell_coordinate_overflow() {
        let mut index = checked(1e-300);
        assert_eq!(
            index.insert(&Point3::new(1e300, 0.0, 0.0), 0),
            Err(IndexError::CellOverflow)
        );
        assert!(index.is_empty());
    }

    #[test]
    fn scan_radius_overflow() {
        let mut index = checked(1e-200);
        index.insert(&Point3::new(0.0, 0.0, 0.0), 0).unwrap();
        let mut result = Vec::new();
        assert_eq!(
            index.query(&Point3::new(0.0, 0.0, 0.0), 1e150, &mut result),
            Err(IndexError::CellOverflow)
        );
    }

    #[test]
    fn neighbourhood_overflow() {
        let mut index = checked(1.0);
        index.insert(&Point3::new(9e18, 0.0, 0.0), 0).unwrap();
        let mut result = Vec::new();
        assert_eq!(
            index.query(&Point3::new(9e18, 0.0, 0.0), 1e18, &mut result),
            Err(IndexError::CellOverflow)
        );
    }

    #[test]
    fn unchecked_saturates_instead() {
        let mut index = CubeIndex::<Point3>::new(1.0, Validation::Unchecked).unwrap();
        index.insert(&Point3::new(9e18, 0.0, 0.0), 0).unwrap();
        let mut result = Vec::new();
        index
            .query(&Point3::new(9e18, 0.0, 0.0), 1e18, &mut result)
            .unwrap();
        assert_eq!(result.len(), 1);
    }
}
