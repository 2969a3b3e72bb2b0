use crate::geometry::{Coordinate, Point};

/// Squared euclidean distance between two points.
///
/// Comparing squared distances orders points the same way as comparing the
/// distances themselves, so the square root is never needed.
pub fn squared_distance<P: Point>(a: &P, b: &P) -> P::Coordinate {
    squared_euclidean(&a.coordinates(), &b.coordinates())
}

pub(crate) fn squared_euclidean<C: Coordinate>(a: &[C; 3], b: &[C; 3]) -> C {
    let mut sum = C::zero();
    for (x, y) in a.iter().zip(b.iter()) {
        let delta = *x - *y;
        sum = sum + delta * delta;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::squared_distance;
    use crate::geometry::{FloatPoint3, Point3};

    #[test]
    fn same_point() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(squared_distance(&p, &p), 0.0);
    }

    #[test]
    fn axis_aligned() {
        let a = Point3::new(0.0, 0.0, 0.0);
        assert_eq!(squared_distance(&a, &Point3::new(2.0, 0.0, 0.0)), 4.0);
        assert_eq!(squared_distance(&a, &Point3::new(0.0, -3.0, 0.0)), 9.0);
        assert_eq!(squared_distance(&a, &Point3::new(0.0, 0.0, 0.5)), 0.25);
    }

    #[test]
    fn all_axes() {
        let a = Point3::new(1.0, 1.0, 1.0);
        let b = Point3::new(2.0, 3.0, 4.0);
        assert_eq!(squared_distance(&a, &b), 14.0);
        assert_eq!(squared_distance(&b, &a), 14.0);
    }

    #[test]
    fn single_precision() {
        let a = FloatPoint3::new(0.0, 0.0, 0.0);
        let b = FloatPoint3::new(3.0, 4.0, 0.0);
        assert_eq!(squared_distance(&a, &b), 25.0_f32);
    }

    #[test]
    fn overflows_to_infinity() {
        let a = Point3::new(f64::MAX, 0.0, 0.0);
        let b = Point3::new(-f64::MAX, 0.0, 0.0);
        assert!(squared_distance(&a, &b).is_infinite());
    }
}
