// Host-side tests for camera and orbit state.

use app_core::constants::{CAMERA_DISTANCE, ORBIT_PITCH_LIMIT};
use app_core::{Camera, OrbitRig};
use glam::Vec3;

#[test]
fn default_rig_looks_down_positive_z() {
    let rig = OrbitRig::new();
    let eye = rig.eye();
    assert!((eye - Vec3::new(0.0, 0.0, CAMERA_DISTANCE)).length() < 1e-4);
}

#[test]
fn orbit_preserves_distance() {
    let mut rig = OrbitRig::new();
    for i in 0..1_000 {
        let dx = ((i * 37) % 23) as f32 - 11.0;
        let dy = ((i * 17) % 19) as f32 - 9.0;
        rig.apply_drag(dx, dy);
        let len = rig.eye().length();
        assert!(
            (len - CAMERA_DISTANCE).abs() < 1e-2,
            "eye wandered off the orbit sphere: {len}"
        );
    }
}

#[test]
fn pitch_is_clamped_away_from_the_poles() {
    let mut rig = OrbitRig::new();
    rig.apply_drag(0.0, 100_000.0);
    let eye = rig.eye();
    let sin_pitch = eye.y / rig.distance();
    assert!(sin_pitch.asin().abs() <= ORBIT_PITCH_LIMIT + 1e-4);
    // The up vector never degenerates, so billboard axes stay well formed.
    let camera = Camera::new(eye, 16.0 / 9.0);
    let (right, up) = camera.billboard_axes();
    assert!((right.length() - 1.0).abs() < 1e-4);
    assert!((up.length() - 1.0).abs() < 1e-4);
    assert!(right.dot(up).abs() < 1e-4);
}

#[test]
fn view_proj_is_finite() {
    let camera = Camera::new(Vec3::new(0.0, 0.0, CAMERA_DISTANCE), 1.5);
    let m = camera.view_proj();
    assert!(m.to_cols_array().iter().all(|v| v.is_finite()));
}

#[test]
fn resize_only_changes_the_projection() {
    let eye = Vec3::new(0.0, 0.0, CAMERA_DISTANCE);
    let narrow = Camera::new(eye, 1.0);
    let wide = Camera::new(eye, 2.0);
    assert_eq!(narrow.view_matrix(), wide.view_matrix());
    assert_ne!(narrow.projection_matrix(), wide.projection_matrix());
}
