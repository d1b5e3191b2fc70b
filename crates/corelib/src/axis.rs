use crate::Vec3;

/// Cardinal axis selector for local/global rotations and translations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Fixed world-space unit vector of this axis.
    #[inline]
    pub const fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Column of a basis matrix holding this axis.
    #[inline]
    pub(crate) const fn column(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl From<Axis> for Vec3 {
    #[inline]
    fn from(axis: Axis) -> Self {
        axis.unit()
    }
}
