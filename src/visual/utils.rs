// ============================================================================
// EASING FUNCTIONS for tweens
// ============================================================================

use bevy::math::Vec3;

/// Ease-out cubic: fast at start, decelerates at end
/// Used for position tweens ("arriving" animations)
pub fn ease_out_cubic(t: f32) -> f32 {
    let x = 1.0 - t;
    1.0 - x * x * x
}

/// Ease-out quadratic: gentler than cubic, used for hover scaling
pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Linear: no easing, constant speed
#[cfg(test)]
pub fn linear(t: f32) -> f32 {
    t
}

/// Frame-rate independent factor for exponential approach toward a target.
///
/// `value = value.lerp(target, exp_approach(rate, dt))` closes the same share
/// of the remaining gap per second regardless of frame time.
pub fn exp_approach(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

// ============================================================================
// PICKING
// ============================================================================

/// Distance along a ray to the first hit with a sphere, if any.
///
/// `direction` must be normalized. Hits behind the ray origin are ignored.
pub fn ray_sphere_hit(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(direction);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;

    if closest_sq > radius_sq {
        return None;
    }

    let half_chord = (radius_sq - closest_sq).sqrt();
    let near = along - half_chord;
    let far = along + half_chord;

    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        // Origin inside the sphere
        Some(0.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for ease in [ease_out_cubic, ease_out_quad, linear] {
            assert!(ease(0.0).abs() < 1e-6);
            assert!((ease(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ease_out_front_loads_progress() {
        assert!(ease_out_cubic(0.5) > 0.5);
        assert!(ease_out_quad(0.5) > 0.5);
        assert!(ease_out_cubic(0.5) > ease_out_quad(0.5));
    }

    #[test]
    fn test_exp_approach_bounds() {
        assert_eq!(exp_approach(8.0, 0.0), 0.0);
        let step = exp_approach(8.0, 1.0 / 60.0);
        assert!(step > 0.0 && step < 1.0);
        assert!(exp_approach(8.0, 10.0) > 0.999);
    }

    #[test]
    fn test_ray_sphere_hit() {
        let hit = ray_sphere_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0);
        assert!((hit.unwrap() - 9.0).abs() < 1e-5);

        // Miss to the side
        assert!(ray_sphere_hit(Vec3::new(2.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0).is_none());

        // Sphere behind the origin
        assert!(ray_sphere_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, Vec3::ZERO, 1.0).is_none());

        // Inside the sphere
        assert_eq!(ray_sphere_hit(Vec3::ZERO, Vec3::X, Vec3::ZERO, 1.0), Some(0.0));
    }
}
