//! Line-set builders for the decorative scene fixtures (ground grid and
//! axis gizmo).

use glam::Vec3;

/// Ground-plane grid on XZ: one line per `step` in each direction, out to
/// `half_extent` on both sides.
#[must_use]
pub fn grid(half_extent: f32, step: f32) -> Vec<[Vec3; 2]> {
    let mut lines = Vec::new();
    let count = (half_extent / step).floor() as i32;
    for i in -count..=count {
        let d = i as f32 * step;
        lines.push([
            Vec3::new(d, 0.0, -half_extent),
            Vec3::new(d, 0.0, half_extent),
        ]);
        lines.push([
            Vec3::new(-half_extent, 0.0, d),
            Vec3::new(half_extent, 0.0, d),
        ]);
    }
    lines
}

/// Axis gizmo: three segments from the origin along +X, +Y and +Z.
#[must_use]
pub fn axes(length: f32) -> Vec<[Vec3; 2]> {
    vec![
        [Vec3::ZERO, Vec3::X * length],
        [Vec3::ZERO, Vec3::Y * length],
        [Vec3::ZERO, Vec3::Z * length],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_line_count() {
        // 2*count+1 positions per direction, two lines each
        let lines = grid(10.0, 1.0);
        assert_eq!(lines.len(), 2 * 21);
    }

    #[test]
    fn axes_are_orthogonal() {
        let lines = axes(10.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1][1], Vec3::new(0.0, 10.0, 0.0));
    }
}
