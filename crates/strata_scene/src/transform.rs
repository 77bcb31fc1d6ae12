use glam::{Mat4, Quat, Vec3};

use strata_core::RotationMode;

/// Builds a local matrix from optional TRS components as `T * R * S`.
///
/// Absent components are identity. With [`RotationMode::Ignore`] the rotation
/// is dropped even when present, giving `T * S`.
#[must_use]
pub fn compose_trs(
    translation: Option<Vec3>,
    rotation: Option<Quat>,
    scale: Option<Vec3>,
    mode: RotationMode,
) -> Mat4 {
    let mut local = Mat4::IDENTITY;

    if let Some(t) = translation {
        local *= Mat4::from_translation(t);
    }

    if mode == RotationMode::Apply {
        if let Some(r) = rotation {
            local *= Mat4::from_quat(r);
        }
    }

    if let Some(s) = scale {
        local *= Mat4::from_scale(s);
    }

    local
}

/// Composes a child's local matrix onto its parent's world matrix.
#[inline]
#[must_use]
pub fn compose_world(parent_world: &Mat4, local: &Mat4) -> Mat4 {
    *parent_world * *local
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn vec3_approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    #[test]
    fn empty_components_are_identity() {
        assert_eq!(compose_trs(None, None, None, RotationMode::Apply), Mat4::IDENTITY);
    }

    #[test]
    fn translation_then_scale_order() {
        let m = compose_trs(
            Some(Vec3::new(1.0, 0.0, 0.0)),
            None,
            Some(Vec3::splat(2.0)),
            RotationMode::Ignore,
        );
        // Scale is applied to the point first, translation last.
        assert!(vec3_approx(m.transform_point3(Vec3::X), Vec3::new(3.0, 0.0, 0.0)));
        assert!(vec3_approx(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn rotation_ignored_by_default_mode() {
        let r = Some(Quat::from_rotation_z(FRAC_PI_2));
        let ignored = compose_trs(None, r, None, RotationMode::Ignore);
        assert_eq!(ignored, Mat4::IDENTITY);
    }

    #[test]
    fn rotation_applied_between_translation_and_scale() {
        let m = compose_trs(
            Some(Vec3::new(0.0, 0.0, 5.0)),
            Some(Quat::from_rotation_z(FRAC_PI_2)),
            Some(Vec3::splat(2.0)),
            RotationMode::Apply,
        );
        // X scaled to 2, rotated onto +Y, then lifted to z = 5.
        assert!(vec3_approx(m.transform_point3(Vec3::X), Vec3::new(0.0, 2.0, 5.0)));
    }

    #[test]
    fn world_composition_is_parent_times_local() {
        let parent = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let local = Mat4::from_scale(Vec3::splat(2.0));
        assert_eq!(compose_world(&parent, &local), parent * local);
    }
}
