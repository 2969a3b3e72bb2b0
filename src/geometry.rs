use num_traits::{float::FloatCore, PrimInt, Unsigned};
use std::{fmt::Debug, hash::Hash, marker::PhantomData};

/// Numeric type of a point coordinate (`f32`, `f64`, ...).
pub trait Coordinate: FloatCore + Debug {}

impl<T: FloatCore + Debug> Coordinate for T {}

/// Caller supplied label of a point: any unsigned integer.
pub trait Id: PrimInt + Unsigned + Hash + Debug {}

impl<T: PrimInt + Unsigned + Hash + Debug> Id for T {}

/// What the indexes need to know about a point in 3D space.
///
/// The id type travels with the point type so that a point collection and the
/// ids naming its elements can't be mixed up with another one.
pub trait Point {
    type Coordinate: Coordinate;
    type Id: Id;

    fn x(&self) -> Self::Coordinate;
    fn y(&self) -> Self::Coordinate;
    fn z(&self) -> Self::Coordinate;

    fn coordinates(&self) -> [Self::Coordinate; 3] {
        [self.x(), self.y(), self.z()]
    }
}

/// Plain point with public coordinates. It does not store its id.
#[derive(Debug)]
pub struct GenericPoint<C, I> {
    pub x: C,
    pub y: C,
    pub z: C,
    id: PhantomData<fn() -> I>,
}

/// Ready to use point: `f64` coordinates, `u64` ids.
pub type Point3 = GenericPoint<f64, u64>;

/// Single precision point, `u64` ids.
pub type FloatPoint3 = GenericPoint<f32, u64>;

impl<C, I> GenericPoint<C, I> {
    #[must_use]
    pub fn new(x: C, y: C, z: C) -> Self {
        GenericPoint {
            x,
            y,
            z,
            id: PhantomData,
        }
    }
}

impl<C: Copy, I> Clone for GenericPoint<C, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Copy, I> Copy for GenericPoint<C, I> {}

impl<C: PartialEq, I> PartialEq for GenericPoint<C, I> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl<C: Coordinate, I: Id> Point for GenericPoint<C, I> {
    type Coordinate = C;
    type Id = I;

    fn x(&self) -> C {
        self.x
    }

    fn y(&self) -> C {
        self.y
    }

    fn z(&self) -> C {
        self.z
    }
}
