use crate::{common::IdAndSquaredDistance, config::Validation, error::Result, geometry::Point};

/// The range query contract shared by every index.
///
/// The lifecycle is `insert`* then `seal`, after which `query` may be called
/// any number of times. Some implementations tolerate inserts after sealing,
/// the sorted ones need another `seal` before the next query.
pub trait SpatialIndex<P: Point> {
    /// Adds a point under a caller chosen id. Ids must be unique.
    fn insert(&mut self, point: &P, id: P::Id) -> Result<()>;

    /// Makes the index ready for lookups. Calling it again is harmless.
    fn seal(&mut self);

    /// Overwrites `output` with the points strictly closer than `distance` to
    /// `point`, closest first, paired with their squared distance.
    fn query(
        &self,
        point: &P,
        distance: P::Coordinate,
        output: &mut Vec<IdAndSquaredDistance<P>>,
    ) -> Result<()>;

    fn validation(&self) -> Validation;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
