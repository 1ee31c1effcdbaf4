//! Core traits for progmesh

use crate::{mesh::*, point::*};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

/// Axis-aligned bounds of a set of points; the origin twice if there are none.
pub fn bounds_of<'a, I>(points: I) -> (Point3f, Point3f)
where
    I: IntoIterator<Item = &'a Point3f>,
{
    let mut points = points.into_iter();
    let first = match points.next() {
        Some(p) => *p,
        None => return (Point3f::origin(), Point3f::origin()),
    };

    points.fold((first, first), |(min, max), p| (min.inf(p), max.sup(p)))
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(&self.vertices)
    }
}
