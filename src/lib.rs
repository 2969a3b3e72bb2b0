//! Range queries ("which points are closer than `d` to `q`?") and k nearest
//! neighbors over 3D points, with a choice of spatial indexes sharing the
//! [`SpatialIndex`] contract:
//!
//! - [`NoIndex`]: brute force, the reference for the others.
//! - [`AabbIndex`]: per-axis sorted coordinates and sorted id intersection.
//! - [`CubeIndex`]: uniform grid of cubes.
//! - [`PermutationAabbIndex`]: per-axis sorted coordinates with permutation arrays.
//!
//! ```
//! use geoindex::{build_index, k_nearest_neighbors, AabbIndex, Point3};
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(5.0, 5.0, 5.0),
//! ];
//! let mut index: AabbIndex<Point3> = AabbIndex::default();
//! build_index(&points, &mut index).unwrap();
//!
//! let mut closest = Vec::new();
//! k_nearest_neighbors(&index, 2.0, &Point3::new(0.9, 0.0, 0.0), 1, &mut closest).unwrap();
//! assert_eq!(closest[0].id, 1);
//! ```

mod aabb;
mod common;
mod config;
mod cube;
mod distance;
mod error;
mod geometry;
mod index;
mod linear;
mod neighbors;
mod permutation;

pub use aabb::AabbIndex;
pub use common::{IdAndCoordinate, IdAndSquaredDistance, IndexedValue};
pub use config::Validation;
pub use cube::{Cell, CubeIndex};
pub use distance::squared_distance;
pub use error::{IndexError, Result};
pub use geometry::{Coordinate, FloatPoint3, GenericPoint, Id, Point, Point3};
pub use index::SpatialIndex;
pub use linear::NoIndex;
pub use neighbors::{build_index, k_nearest_neighbors};
pub use permutation::PermutationAabbIndex;
