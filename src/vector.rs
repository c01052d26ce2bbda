//! Integer 3-D vectors
//!
//! Only used while deriving the turn tables from vertex positions.

use crate::fixed::{Fixed, fixed_lerp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vec3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vec3 {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn negate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    /// Component-wise division, truncating toward zero
    pub const fn div(self, n: i32) -> Self {
        Self::new(self.x / n, self.y / n, self.z / n)
    }

    pub const fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub const fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub const fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub const fn dot(self, other: Self) -> i32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Point between `self` and `other`
    pub const fn fixed_lerp(self, other: Self, offset: Fixed) -> Self {
        Self::new(
            fixed_lerp(self.x, other.x, offset),
            fixed_lerp(self.y, other.y, offset),
            fixed_lerp(self.z, other.z, offset),
        )
    }
}
