use glam::{Affine3A, Vec3};

/// One animatable degree of freedom declared per joint: a single axis of
/// position or rotation.
///
/// The declaration order of a joint's channels is authoritative for
/// transform composition and is preserved exactly as parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Xposition,
    Yposition,
    Zposition,
    Xrotation,
    Yrotation,
    Zrotation,
}

impl Channel {
    /// Matches a channel keyword case-insensitively against the six
    /// recognized kinds.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "xposition" => Some(Self::Xposition),
            "yposition" => Some(Self::Yposition),
            "zposition" => Some(Self::Zposition),
            "xrotation" => Some(Self::Xrotation),
            "yrotation" => Some(Self::Yrotation),
            "zrotation" => Some(Self::Zrotation),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_rotation(self) -> bool {
        matches!(self, Self::Xrotation | Self::Yrotation | Self::Zrotation)
    }

    /// Elementary transform for one channel sample: an axis-aligned
    /// translation for position channels, an axis rotation for rotation
    /// channels.
    ///
    /// Rotation values are stored in degrees in the motion file.
    #[must_use]
    pub fn matrix(self, value: f32) -> Affine3A {
        match self {
            Self::Xposition => Affine3A::from_translation(Vec3::new(value, 0.0, 0.0)),
            Self::Yposition => Affine3A::from_translation(Vec3::new(0.0, value, 0.0)),
            Self::Zposition => Affine3A::from_translation(Vec3::new(0.0, 0.0, value)),
            Self::Xrotation => Affine3A::from_rotation_x(value.to_radians()),
            Self::Yrotation => Affine3A::from_rotation_y(value.to_radians()),
            Self::Zrotation => Affine3A::from_rotation_z(value.to_radians()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Channel::parse("Xposition"), Some(Channel::Xposition));
        assert_eq!(Channel::parse("XPOSITION"), Some(Channel::Xposition));
        assert_eq!(Channel::parse("zrotation"), Some(Channel::Zrotation));
        assert_eq!(Channel::parse("Wrotation"), None);
    }

    #[test]
    fn position_matrix_translates_along_axis() {
        let m = Channel::Yposition.matrix(3.0);
        let p = m.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn rotation_matrix_uses_degrees() {
        let m = Channel::Zrotation.matrix(90.0);
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-5);
    }
}
