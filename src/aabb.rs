use crate::{
    common::{
        check_coordinates, checked_squared_distance, sort_by_distance, squared_limit,
        IdAndCoordinate, IdAndSquaredDistance, IndexedValue,
    },
    config::Validation,
    error::{IndexError, Result},
    geometry::Point,
    index::SpatialIndex,
};
use ordered_float::OrderedFloat;
use std::collections::HashSet;

/// Index based on the axis aligned bounding box (AABB) of the query sphere.
///
/// Every axis has its own list of (id, coordinate) entries, sorted by
/// coordinate on `seal`. A query finds the slice of each list inside
/// `[q - d, q + d]` with two binary searches, intersects the three id sets to
/// get the points inside the box, then keeps those inside the sphere.
///
/// Sorting is the expensive step: insert everything first, seal once, then
/// query many times.
pub struct AabbIndex<P: Point> {
    validation: Validation,
    sealed: bool,
    axes: [Vec<IdAndCoordinate<P>>; 3],
    known_ids: HashSet<P::Id>,
}

impl<P: Point> AabbIndex<P> {
    #[must_use]
    pub fn new(validation: Validation) -> Self {
        Self::with_capacity(0, validation)
    }

    /// Reserves room for `expected` points up front.
    #[must_use]
    pub fn with_capacity(expected: usize, validation: Validation) -> Self {
        AabbIndex {
            validation,
            // Nothing inside, nothing out of order.
            sealed: true,
            axes: [
                Vec::with_capacity(expected),
                Vec::with_capacity(expected),
                Vec::with_capacity(expected),
            ],
            known_ids: HashSet::new(),
        }
    }

    /// Entries of one axis whose coordinate lies in `[reference - distance,
    /// reference + distance]`, sorted by id. Both bounds are inclusive: the
    /// rounded bounds may collapse onto `reference` when `distance` is tiny
    /// next to it.
    fn candidates_on_axis(
        entries: &[IdAndCoordinate<P>],
        reference: P::Coordinate,
        distance: P::Coordinate,
    ) -> Vec<IdAndCoordinate<P>> {
        let min = OrderedFloat(reference - distance);
        let max = OrderedFloat(reference + distance);
        let begin = entries.partition_point(|entry| OrderedFloat(entry.value) < min);
        let end = begin + entries[begin..].partition_point(|entry| OrderedFloat(entry.value) <= max);

        let mut candidates = entries[begin..end].to_vec();
        candidates.sort_unstable_by(IndexedValue::cmp_by_id);
        candidates
    }

    /// Sorted merge of two id-sorted candidate lists, keeping the entries of `lhs`.
    fn intersect(
        lhs: &[IdAndCoordinate<P>],
        rhs: &[IdAndCoordinate<P>],
    ) -> Vec<IdAndCoordinate<P>> {
        let mut result = Vec::with_capacity(lhs.len().min(rhs.len()));
        let (mut i, mut j) = (0, 0);
        while i < lhs.len() && j < rhs.len() {
            match lhs[i].id.cmp(&rhs[j].id) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    result.push(lhs[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        result
    }

    /// Coordinate of `id` in an id-sorted candidate list.
    fn coordinate_of(id: P::Id, candidates: &[IdAndCoordinate<P>]) -> Option<P::Coordinate> {
        candidates
            .binary_search_by(|entry| entry.id.cmp(&id))
            .ok()
            .map(|position| candidates[position].value)
    }
}

impl<P: Point> Default for AabbIndex<P> {
    fn default() -> Self {
        Self::new(Validation::default())
    }
}

impl<P: Point> SpatialIndex<P> for AabbIndex<P> {
    fn insert(&mut self, point: &P, id: P::Id) -> Result<()> {
        let coordinates = point.coordinates();
        if self.validation.is_checked() {
            check_coordinates(self.validation, &coordinates)?;
            if !self.known_ids.insert(id) {
                return Err(IndexError::DuplicateId);
            }
        }
        // Appending probably breaks the order.
        self.sealed = false;
        for (axis, &coordinate) in self.axes.iter_mut().zip(coordinates.iter()) {
            axis.push(IndexedValue::new(id, coordinate));
        }
        Ok(())
    }

    fn seal(&mut self) {
        if self.sealed {
            return;
        }
        for axis in &mut self.axes {
            axis.sort_by_key(|entry| OrderedFloat(entry.value));
        }
        self.sealed = true;
        log::debug!("aabb index sealed with {} points", self.len());
    }

    fn query(
        &self,
        point: &P,
        distance: P::Coordinate,
        output: &mut Vec<IdAndSquaredDistance<P>>,
    ) -> Result<()> {
        output.clear();
        let limit = squared_limit(self.validation, distance)?;
        if self.validation.is_checked() && !self.sealed {
            return Err(IndexError::NotSealed);
        }

        let reference = point.coordinates();
        let [axis_x, axis_y, axis_z] = &self.axes;
        let candidates_x = Self::candidates_on_axis(axis_x, reference[0], distance);
        let candidates_y = Self::candidates_on_axis(axis_y, reference[1], distance);
        let candidates_z = Self::candidates_on_axis(axis_z, reference[2], distance);

        let inside_xy = Self::intersect(&candidates_x, &candidates_y);
        let inside_box = Self::intersect(&inside_xy, &candidates_z);

        let mut found = Vec::with_capacity(inside_box.len());
        for candidate in &inside_box {
            let id = candidate.id;
            let coordinates = match (
                Self::coordinate_of(id, &candidates_x),
                Self::coordinate_of(id, &candidates_y),
                Self::coordinate_of(id, &candidates_z),
            ) {
                (Some(x), Some(y), Some(z)) => [x, y, z],
                _ => continue,
            };
            let squared = checked_squared_distance(self.validation, &reference, &coordinates)?;
            if squared < limit {
                found.push(IndexedValue::new(id, squared));
            }
        }
        log::trace!(
            "aabb query: {}/{}/{} on axes, {} in box, {} in sphere",
            candidates_x.len(),
            candidates_y.len(),
            candidates_z.len(),
            inside_box.len(),
            found.len()
        );

        // Intersection output is already in id order.
        sort_by_distance(&mut found);
        *output = found;
        Ok(())
    }

    fn validation(&self) -> Validation {
        self.validation
    }

    fn len(&self) -> usize {
        self.axes[0].len()
    }
}
