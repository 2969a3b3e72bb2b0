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
use std::collections::HashSet;

/// Brute force "index": a plain list of points scanned in full by every query.
///
/// Points are kept in insertion order and never moved, so sealing is not needed
/// and inserting between queries is fine. Queries cost O(n); this is the
/// reference the other indexes are checked against.
pub struct NoIndex<P: Point> {
    validation: Validation,
    points: Vec<[P::Coordinate; 3]>,
    ids: Vec<P::Id>,
    known_ids: HashSet<P::Id>,
}

impl<P: Point> NoIndex<P> {
    #[must_use]
    pub fn new(validation: Validation) -> Self {
        Self::with_capacity(0, validation)
    }

    /// Reserves room for `expected` points up front.
    #[must_use]
    pub fn with_capacity(expected: usize, validation: Validation) -> Self {
        NoIndex {
            validation,
            points: Vec::with_capacity(expected),
            ids: Vec::with_capacity(expected),
            known_ids: HashSet::new(),
        }
    }
}

impl<P: Point> Default for NoIndex<P> {
    fn default() -> Self {
        Self::new(Validation::default())
    }
}

impl<P: Point> SpatialIndex<P> for NoIndex<P> {
    fn insert(&mut self, point: &P, id: P::Id) -> Result<()> {
        let coordinates = point.coordinates();
        if self.validation.is_checked() {
            check_coordinates(self.validation, &coordinates)?;
            if !self.known_ids.insert(id) {
                return Err(IndexError::DuplicateId);
            }
        }
        self.points.push(coordinates);
        self.ids.push(id);
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

        let mut found = Vec::new();
        for (candidate, &id) in self.points.iter().zip(self.ids.iter()) {
            let squared = checked_squared_distance(self.validation, &reference, candidate)?;
            if squared < limit {
                found.push(IndexedValue::new(id, squared));
            }
        }
        log::trace!("linear scan: {} of {} points in range", found.len(), self.ids.len());

        found.sort_unstable_by(IndexedValue::cmp_by_id);
        sort_by_distance(&mut found);
        *output = found;
        Ok(())
    }

    fn validation(&self) -> Validation {
        self.validation
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}
