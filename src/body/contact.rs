// src/body/contact.rs

//! Ground contact between the airframe rectangle and a flat ground line.
//!
//! Contact is decided from the four corners of the airframe. A single corner
//! below the ground line acts as a pivot: the body is lifted so the corner
//! sits on the line and gravity acting about the corner adds a tipping
//! torque. Two or more corners below the line mean the body is lying on the
//! ground: it is lifted out, its vertical velocity is cancelled, and the
//! remaining motion is bled off by [`BodyParams::ground_friction`].

use super::{BodyParams, RigidBody};
use crate::Number;

/// A point in world pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<T> {
    /// Horizontal coordinate.
    pub x: T,
    /// Vertical coordinate, growing downward.
    pub y: T,
}

/// Contact classification for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundContact<T> {
    /// No corner is below the ground line.
    Airborne,
    /// Exactly one corner is below the ground line.
    Pivot {
        /// The grounded corner.
        corner: Point<T>,
    },
    /// Two or more corners are below the ground line.
    Flat {
        /// Number of grounded corners.
        corners: usize,
        /// Deepest penetration below the ground line, in pixels.
        depth: T,
    },
}

/// World positions of the airframe corners.
pub fn corners<T: Number>(body: &RigidBody<T>, params: &BodyParams<T>) -> [Point<T>; 4] {
    let two = T::one() + T::one();
    let hw = params.width / two;
    let hh = params.height / two;
    let (sin, cos) = body.angle.sin_cos();

    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(cx, cy)| Point {
        x: body.x + cos * cx - sin * cy,
        y: body.y + sin * cx + cos * cy,
    })
}

/// Classifies the contact of `body` with the ground line.
pub fn classify_contact<T: Number>(
    body: &RigidBody<T>,
    params: &BodyParams<T>,
) -> GroundContact<T> {
    let mut grounded = corners(body, params)
        .into_iter()
        .filter(|corner| corner.y > params.ground_y);

    let Some(first) = grounded.next() else {
        return GroundContact::Airborne;
    };

    let mut count = 1;
    let mut deepest = first.y;
    for corner in grounded {
        count += 1;
        deepest = deepest.max(corner.y);
    }

    if count == 1 {
        GroundContact::Pivot { corner: first }
    } else {
        GroundContact::Flat {
            corners: count,
            depth: deepest - params.ground_y,
        }
    }
}

/// Applies the ground contact correction to `body` and returns the extra
/// roll torque it produces, in N·m.
pub fn resolve_ground_contact<T: Number>(body: &mut RigidBody<T>, params: &BodyParams<T>) -> T {
    match classify_contact(body, params) {
        GroundContact::Airborne => T::zero(),
        GroundContact::Pivot { corner } => {
            let lever = (body.x - corner.x) / params.pixels_per_meter;
            let depth = corner.y - params.ground_y;
            if depth > T::zero() {
                body.y = body.y - depth;
                body.vy = T::zero();
            }
            lever * params.weight()
        }
        GroundContact::Flat { depth, .. } => {
            if depth > T::zero() {
                body.y = body.y - depth;
            }
            body.vx = body.vx * params.ground_friction;
            body.vy = T::zero();
            body.omega = body.omega * params.ground_friction;
            T::zero()
        }
    }
}
