//=========================================================================
// Vector Helpers
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Vec2, Vec3};

//=== FlatVec3Ext =========================================================

/// Extra comparisons for world-space positions.
pub trait FlatVec3Ext {
    /// Distance between two points projected on the XZ (ground) plane.
    fn flat_distance_to(self, other: Vec3) -> f32;

    /// Component-wise comparison tolerant to float rounding.
    fn approximately(self, other: Vec3) -> bool;
}

impl FlatVec3Ext for Vec3 {
    fn flat_distance_to(self, other: Vec3) -> f32 {
        Vec2::new(self.x, self.z).distance(Vec2::new(other.x, other.z))
    }

    fn approximately(self, other: Vec3) -> bool {
        approximately(self.x, other.x)
            && approximately(self.y, other.y)
            && approximately(self.z, other.z)
    }
}

// Relative tolerance with an absolute floor near zero.
fn approximately(a: f32, b: f32) -> bool {
    let tolerance = (1e-6 * a.abs().max(b.abs())).max(f32::EPSILON * 8.0);
    (b - a).abs() < tolerance
}

//=== Tests ===============================================================
