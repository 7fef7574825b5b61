use glam::{Mat4, Vec3};
use crate::spatial::AABB;
use super::*;

fn forward_camera(far: f32) -> Camera {
    let mut camera = Camera::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, far);
    camera.look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
    camera
}

fn forward_frustum() -> Frustum {
    let camera = forward_camera(100.0);
    Frustum::from_view_projection(&camera.view_projection_matrix())
}

// ============================================================================
// Frustum::from_view_projection
// ============================================================================

#[test]
fn test_frustum_planes_are_normalized() {
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let frustum = Frustum::from_view_projection(&(projection * view));

    for plane in &frustum.planes {
        let normal_len = plane.truncate().length();
        assert!((normal_len - 1.0).abs() < 1e-4, "plane normal should be unit length");
    }
}

#[test]
fn test_orthographic_frustum_is_a_box() {
    let projection = Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 0.1, 100.0);
    let frustum = Frustum::from_view_projection(&projection);

    assert!(frustum.contains_point(Vec3::new(9.0, -9.0, -50.0)));
    assert!(!frustum.contains_point(Vec3::new(11.0, 0.0, -50.0)));
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -150.0)));
}

// ============================================================================
// Frustum::contains_point
// ============================================================================

#[test]
fn test_point_in_front_is_inside() {
    let frustum = forward_frustum();
    assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -10.0)));
    assert!(frustum.contains_point(Vec3::new(5.0, -5.0, -10.0)));
}

#[test]
fn test_point_behind_camera_is_outside() {
    let frustum = forward_frustum();
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0)));
}

#[test]
fn test_point_outside_side_planes_is_outside() {
    let frustum = forward_frustum();
    // 90° FOV: |x| <= -z at the given depth
    assert!(!frustum.contains_point(Vec3::new(20.0, 0.0, -10.0)));
    assert!(!frustum.contains_point(Vec3::new(0.0, -20.0, -10.0)));
}

#[test]
fn test_near_and_far_planes() {
    let frustum = forward_frustum();
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -0.05)));
    assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -99.0)));
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -101.0)));
}

#[test]
fn test_far_override_extends_frustum() {
    let camera = forward_camera(100.0);
    let point = Vec3::new(0.0, 0.0, -400.0);

    let own = Frustum::from_view_projection(&camera.view_projection_matrix());
    let extended = Frustum::from_camera_with_far(&camera, 1000.0);
    let shortened = Frustum::from_camera_with_far(&camera, 10.0);

    assert!(!own.contains_point(point));
    assert!(extended.contains_point(point));
    assert!(!shortened.contains_point(Vec3::new(0.0, 0.0, -50.0)));
}

// ============================================================================
// AABB tests
// ============================================================================

#[test]
fn test_aabb_inside_and_outside() {
    let frustum = forward_frustum();

    let front = AABB { min: Vec3::new(-1.0, -1.0, -11.0), max: Vec3::new(1.0, 1.0, -9.0) };
    let behind = AABB { min: Vec3::new(-1.0, -1.0, 9.0), max: Vec3::new(1.0, 1.0, 11.0) };

    assert!(frustum.intersects_aabb(&front));
    assert!(!frustum.intersects_aabb(&behind));
}

#[test]
fn test_classify_aabb_three_ways() {
    let frustum = forward_frustum();

    let inside = AABB { min: Vec3::new(-1.0, -1.0, -11.0), max: Vec3::new(1.0, 1.0, -9.0) };
    let straddling = AABB { min: Vec3::new(-1.0, -1.0, -1.0), max: Vec3::new(1.0, 1.0, 1.0) };
    let outside = AABB { min: Vec3::new(-1.0, -1.0, 50.0), max: Vec3::new(1.0, 1.0, 60.0) };

    assert_eq!(frustum.classify_aabb(&inside), FrustumTest::Inside);
    assert_eq!(frustum.classify_aabb(&straddling), FrustumTest::Partial);
    assert_eq!(frustum.classify_aabb(&outside), FrustumTest::Outside);
}

#[test]
fn test_plane_index_constants() {
    assert_eq!(PLANE_LEFT, 0);
    assert_eq!(PLANE_RIGHT, 1);
    assert_eq!(PLANE_BOTTOM, 2);
    assert_eq!(PLANE_TOP, 3);
    assert_eq!(PLANE_NEAR, 4);
    assert_eq!(PLANE_FAR, 5);
}
