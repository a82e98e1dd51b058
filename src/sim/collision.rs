//! Collision geometry for axis-aligned rectangles and edge loops
//!
//! Every shape is centred on its node position. Touching counts as
//! overlapping so a body resting against a wall keeps its contact.

use glam::Vec2;

use crate::rects_overlap;

/// Overlap region of two rectangles, as its centre point
pub fn rect_overlap_point(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> Option<Vec2> {
    if !rects_overlap(a_center, a_size, b_center, b_size) {
        return None;
    }
    let min = (a_center - a_size * 0.5).max(b_center - b_size * 0.5);
    let max = (a_center + a_size * 0.5).min(b_center + b_size * 0.5);
    Some((min + max) * 0.5)
}

/// Whether a rectangle lies strictly inside the loop without touching an edge
#[inline]
fn strictly_inside(center: Vec2, size: Vec2, loop_center: Vec2, loop_size: Vec2) -> bool {
    let delta = (center - loop_center).abs();
    let room = (loop_size - size) * 0.5;
    delta.x < room.x && delta.y < room.y
}

/// Check a rectangle against an edge loop; returns the closest point on the
/// loop to the rectangle centre when any edge is touched
pub fn rect_edge_loop_contact(
    center: Vec2,
    size: Vec2,
    loop_center: Vec2,
    loop_size: Vec2,
) -> Option<Vec2> {
    if !rects_overlap(center, size, loop_center, loop_size)
        || strictly_inside(center, size, loop_center, loop_size)
    {
        return None;
    }
    Some(closest_point_on_loop(center, loop_center, loop_size))
}

/// Closest point on the loop boundary to `p`
pub fn closest_point_on_loop(p: Vec2, loop_center: Vec2, loop_size: Vec2) -> Vec2 {
    let half = loop_size * 0.5;
    let local = (p - loop_center).clamp(-half, half);

    // Distance to each edge from the clamped point; snap to the nearest one
    let to_right = half.x - local.x;
    let to_left = local.x + half.x;
    let to_top = half.y - local.y;
    let to_bottom = local.y + half.y;
    let nearest = to_right.min(to_left).min(to_top).min(to_bottom);

    let snapped = if nearest == to_right {
        Vec2::new(half.x, local.y)
    } else if nearest == to_left {
        Vec2::new(-half.x, local.y)
    } else if nearest == to_top {
        Vec2::new(local.x, half.y)
    } else {
        Vec2::new(local.x, -half.y)
    };
    loop_center + snapped
}

/// Sweep a point from `start` to `end` against a rectangle (slab test)
///
/// Returns the path fraction `t` in [0, 1] of first entry.
pub fn segment_rect_hit(start: Vec2, end: Vec2, rect_center: Vec2, rect_size: Vec2) -> Option<f32> {
    let half = rect_size * 0.5;
    let min = rect_center - half;
    let max = rect_center + half;
    let dir = end - start;

    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for axis in 0..2 {
        let (s, d, lo, hi) = (start[axis], dir[axis], min[axis], max[axis]);
        if d.abs() < f32::EPSILON {
            if s < lo || s > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (lo - s) * inv;
        let mut t1 = (hi - s) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    Some(t_enter)
}

/// Swept rectangle vs rectangle: grows the target by the mover's half size
/// and sweeps the mover's centre. Returns the contact point on the path.
pub fn swept_rect_contact(
    from: Vec2,
    to: Vec2,
    mover_size: Vec2,
    target_center: Vec2,
    target_size: Vec2,
) -> Option<Vec2> {
    let t = segment_rect_hit(from, to, target_center, target_size + mover_size)?;
    Some(from.lerp(to, t))
}

/// Position that keeps a rectangle inside an edge loop
pub fn clamp_inside_loop(center: Vec2, size: Vec2, loop_center: Vec2, loop_size: Vec2) -> Vec2 {
    let room = ((loop_size - size) * 0.5).max(Vec2::ZERO);
    loop_center + (center - loop_center).clamp(-room, room)
}

/// Minimum translation that separates `mover` from a solid rectangle
pub fn separate_rects(mover_center: Vec2, mover_size: Vec2, solid_center: Vec2, solid_size: Vec2) -> Vec2 {
    let delta = mover_center - solid_center;
    let reach = (mover_size + solid_size) * 0.5;
    let depth = reach - delta.abs();
    if depth.x <= 0.0 || depth.y <= 0.0 {
        return Vec2::ZERO;
    }
    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
    if depth.x < depth.y {
        Vec2::new(depth.x * sign(delta.x), 0.0)
    } else {
        Vec2::new(0.0, depth.y * sign(delta.y))
    }
}
