//! Camera module: perspective camera and culling frustum.
//!
//! The caller owns and drives the camera; the culler only reads it
//! once per frame to rebuild its frustum.

mod camera;
mod frustum;

pub use camera::Camera;
pub use frustum::{
    Frustum, FrustumTest,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
