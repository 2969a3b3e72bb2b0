use crate::{
    common::{squared_limit, IdAndSquaredDistance},
    error::{IndexError, Result},
    geometry::Point,
    index::SpatialIndex,
};
use conv::ValueFrom;

/// Inserts `points` under the ids `0..points.len()` and seals the index.
///
/// Fails with [`IndexError::IdOverflow`] if a position does not fit the id type
/// of the points.
pub fn build_index<P, S>(points: &[P], index: &mut S) -> Result<()>
where
    P: Point,
    P::Id: ValueFrom<usize>,
    S: SpatialIndex<P>,
{
    for (position, point) in points.iter().enumerate() {
        let id = P::Id::value_from(position).map_err(|_| IndexError::IdOverflow)?;
        index.insert(point, id)?;
    }
    index.seal();
    log::debug!("index built from {} points", points.len());
    Ok(())
}

/// Up to `k` points closest to `reference`, looking only within `culling_distance`.
///
/// The culling distance is a hard limit: with fewer than `k` points inside it
/// fewer than `k` are returned. Callers needing exactly `k` should retry with a
/// larger distance.
pub fn k_nearest_neighbors<P, S>(
    index: &S,
    culling_distance: P::Coordinate,
    reference: &P,
    k: usize,
    output: &mut Vec<IdAndSquaredDistance<P>>,
) -> Result<()>
where
    P: Point,
    S: SpatialIndex<P>,
{
    output.clear();
    if index.validation().is_checked() {
        if k == 0 {
            return Err(IndexError::InvalidK);
        }
        squared_limit(index.validation(), culling_distance)?;
    }
    index.query(reference, culling_distance, output)?;
    output.truncate(k);
    Ok(())
}
