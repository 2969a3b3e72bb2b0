//! Pieces shared by all the index implementations.

use crate::{
    config::Validation,
    distance::squared_euclidean,
    error::{IndexError, Result},
    geometry::{Coordinate, Point},
};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// A point id paired with one number about that point.
///
/// There is no point inside, only its name and either one of its coordinates
/// or its squared distance from a reference.
/// Entries are compared either by id or by value, never by both at once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedValue<I, V> {
    pub id: I,
    pub value: V,
}

/// Id of a point plus its coordinate along one axis.
pub type IdAndCoordinate<P> = IndexedValue<<P as Point>::Id, <P as Point>::Coordinate>;

/// Id of a point plus its squared distance from a query point.
///
/// Same type as [`IdAndCoordinate`]: the two names only tell what `value` holds.
pub type IdAndSquaredDistance<P> = IndexedValue<<P as Point>::Id, <P as Point>::Coordinate>;

impl<I, V> IndexedValue<I, V> {
    #[must_use]
    pub fn new(id: I, value: V) -> Self {
        IndexedValue { id, value }
    }
}

impl<I: Ord, V> IndexedValue<I, V> {
    pub fn cmp_by_id(lhs: &Self, rhs: &Self) -> Ordering {
        lhs.id.cmp(&rhs.id)
    }
}

impl<I, V: Coordinate> IndexedValue<I, V> {
    pub fn cmp_by_value(lhs: &Self, rhs: &Self) -> Ordering {
        OrderedFloat(lhs.value).cmp(&OrderedFloat(rhs.value))
    }
}

/// Validates a query distance and returns its square, the limit every
/// candidate is compared against.
pub(crate) fn squared_limit<C: Coordinate>(validation: Validation, distance: C) -> Result<C> {
    if validation.is_checked() && (!(distance > C::zero()) || distance.is_infinite()) {
        return Err(IndexError::InvalidDistance);
    }
    let limit = distance * distance;
    if validation.is_checked() && limit.is_infinite() {
        return Err(IndexError::Overflow);
    }
    Ok(limit)
}

pub(crate) fn check_coordinates<C: Coordinate>(
    validation: Validation,
    coordinates: &[C; 3],
) -> Result<()> {
    if validation.is_checked() && coordinates.iter().any(|c| !c.is_finite()) {
        return Err(IndexError::InvalidCoordinate);
    }
    Ok(())
}

pub(crate) fn checked_squared_distance<C: Coordinate>(
    validation: Validation,
    a: &[C; 3],
    b: &[C; 3],
) -> Result<C> {
    let distance = squared_euclidean(a, b);
    if validation.is_checked() && distance.is_infinite() {
        return Err(IndexError::Overflow);
    }
    Ok(distance)
}

/// Closest points first. The sort is stable: callers hand over the entries in
/// ascending id order so that equally distant points come out by id.
pub(crate) fn sort_by_distance<I, C: Coordinate>(output: &mut [IndexedValue<I, C>]) {
    output.sort_by(IndexedValue::cmp_by_value);
}

#[cfg(test)]
mod tests {
    use super::{squared_limit, IndexedValue};
    use crate::{config::Validation, error::IndexError};

    #[test]
    fn compare_by_id_ignores_value() {
        let mut entries = vec![
            IndexedValue::new(3_u64, 0.5),
            IndexedValue::new(1, 9.0),
            IndexedValue::new(2, -1.0),
        ];
        entries.sort_by(IndexedValue::cmp_by_id);
        let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn compare_by_value_ignores_id() {
        let mut entries = vec![
            IndexedValue::new(3_u64, 0.5),
            IndexedValue::new(1, 9.0),
            IndexedValue::new(2, -1.0),
        ];
        entries.sort_by(IndexedValue::cmp_by_value);
        let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn limit_is_the_square() {
        assert_eq!(squared_limit(Validation::Checked, 3.0), Ok(9.0));
    }

    #[test]
    fn rejected_distances() {
        let checked = Validation::Checked;
        assert_eq!(squared_limit(checked, 0.0), Err(IndexError::InvalidDistance));
        assert_eq!(squared_limit(checked, -1.0), Err(IndexError::InvalidDistance));
        assert_eq!(squared_limit(checked, f64::NAN), Err(IndexError::InvalidDistance));
        assert_eq!(
            squared_limit(checked, f64::INFINITY),
            Err(IndexError::InvalidDistance)
        );
        assert_eq!(squared_limit(checked, f64::MAX), Err(IndexError::Overflow));
    }

    #[test]
    fn unchecked_lets_everything_through() {
        assert!(squared_limit(Validation::Unchecked, -1.0).is_ok());
        assert!(squared_limit(Validation::Unchecked, f64::MAX).is_ok());
    }
}
