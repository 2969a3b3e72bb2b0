use crate::{
    common::{
        check_coordinates, checked_squared_distance, sort_by_distance, squared_limit,
        IdAndSquaredDistance, IndexedValue,
    },
    config::Validation,
    error::{IndexError, Result},
    geometry::{Coordinate, Point},
    index::SpatialIndex,
};
use num_traits::Zero;
use ordered_float::OrderedFloat;
use std::{
    collections::{HashMap, HashSet},
    ops::Range,
};

/// A point met while scanning the per-axis ranges of a query.
struct Candidate<C> {
    hits: u8,
    coordinates: [C; 3],
}

/// Same box-then-sphere search as [`AabbIndex`](crate::AabbIndex), with a
/// different layout: one plain coordinate array per axis, sorted on `seal`,
/// next to a permutation array giving the insertion position of each sorted
/// entry. Ids are stored once, in insertion order.
///
/// A query counts in a hash map how many of the three axis ranges contain each
/// point instead of intersecting sorted id lists.
pub struct PermutationAabbIndex<P: Point> {
    validation: Validation,
    sealed: bool,
    coordinates: [Vec<P::Coordinate>; 3],
    permutations: [Vec<usize>; 3],
    ids: Vec<P::Id>,
    known_ids: HashSet<P::Id>,
}

impl<P: Point> PermutationAabbIndex<P> {
    #[must_use]
    pub fn new(validation: Validation) -> Self {
        Self::with_capacity(0, validation)
    }

    /// Reserves room for `expected` points up front.
    #[must_use]
    pub fn with_capacity(expected: usize, validation: Validation) -> Self {
        PermutationAabbIndex {
            validation,
            sealed: true,
            coordinates: [
                Vec::with_capacity(expected),
                Vec::with_capacity(expected),
                Vec::with_capacity(expected),
            ],
            permutations: [
                Vec::with_capacity(expected),
                Vec::with_capacity(expected),
                Vec::with_capacity(expected),
            ],
            ids: Vec::with_capacity(expected),
            known_ids: HashSet::new(),
        }
    }

    /// Id of the entry at `position` of the sorted array of `axis`.
    fn id_at(&self, axis: usize, position: usize) -> P::Id {
        self.ids[self.permutations[axis][position]]
    }
}

/// Positions of `values` in ascending value order. Stable: equal values keep
/// their relative order.
fn sorted_order<C: Coordinate>(values: &[C]) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..values.len()).collect();
    positions.sort_by_key(|&position| OrderedFloat(values[position]));
    positions
}

/// Positions of the sorted `values` lying in `[reference - distance, reference + distance]`.
/// Both bounds are inclusive: the rounded bounds may collapse onto `reference`
/// when `distance` is tiny next to it.
fn range_on_axis<C: Coordinate>(values: &[C], reference: C, distance: C) -> Range<usize> {
    let min = OrderedFloat(reference - distance);
    let max = OrderedFloat(reference + distance);
    let begin = values.partition_point(|&value| OrderedFloat(value) < min);
    let end = begin + values[begin..].partition_point(|&value| OrderedFloat(value) <= max);
    begin..end
}

impl<P: Point> Default for PermutationAabbIndex<P> {
    fn default() -> Self {
        Self::new(Validation::default())
    }
}

impl<P: Point> SpatialIndex<P> for PermutationAabbIndex<P> {
    fn insert(&mut self, point: &P, id: P::Id) -> Result<()> {
        let coordinates = point.coordinates();
        if self.validation.is_checked() {
            check_coordinates(self.validation, &coordinates)?;
            if !self.known_ids.insert(id) {
                return Err(IndexError::DuplicateId);
            }
        }
        self.sealed = false;
        let position = self.ids.len();
        for axis in 0..3 {
            self.coordinates[axis].push(coordinates[axis]);
            self.permutations[axis].push(position);
        }
        self.ids.push(id);
        Ok(())
    }

    /// Sorts every coordinate array and carries the permutation along, so the
    /// permutation keeps pointing at insertion positions after any number of
    /// seals.
    fn seal(&mut self) {
        if self.sealed {
            return;
        }
        for (values, permutation) in self.coordinates.iter_mut().zip(self.permutations.iter_mut()) {
            let order = sorted_order(values);
            *values = order.iter().map(|&position| values[position]).collect();
            *permutation = order.iter().map(|&position| permutation[position]).collect();
        }
        self.sealed = true;
        log::debug!("permutation aabb index sealed with {} points", self.ids.len());
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
        let ranges = [
            range_on_axis(&self.coordinates[0], reference[0], distance),
            range_on_axis(&self.coordinates[1], reference[1], distance),
            range_on_axis(&self.coordinates[2], reference[2], distance),
        ];

        // Every point of the box is in the x range: seed the map from it, the
        // other axes only count hits for points already there.
        let zero = P::Coordinate::zero();
        let mut candidates: HashMap<P::Id, Candidate<P::Coordinate>> =
            HashMap::with_capacity(ranges[0].len());
        for position in ranges[0].clone() {
            candidates.insert(
                self.id_at(0, position),
                Candidate {
                    hits: 1,
                    coordinates: [self.coordinates[0][position], zero, zero],
                },
            );
        }
        for axis in 1..3 {
            for position in ranges[axis].clone() {
                if let Some(candidate) = candidates.get_mut(&self.id_at(axis, position)) {
                    candidate.hits = candidate.hits.saturating_add(1);
                    candidate.coordinates[axis] = self.coordinates[axis][position];
                }
            }
        }

        let mut found = Vec::new();
        for (&id, candidate) in &candidates {
            if candidate.hits < 3 {
                continue;
            }
            let squared =
                checked_squared_distance(self.validation, &reference, &candidate.coordinates)?;
            if squared < limit {
                found.push(IndexedValue::new(id, squared));
            }
        }
        log::trace!(
            "permutation aabb query: {}/{}/{} on axes, {} in sphere",
            ranges[0].len(),
            ranges[1].len(),
            ranges[2].len(),
            found.len()
        );

        // Hash map order is arbitrary, settle ties by id.
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
