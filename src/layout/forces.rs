//! Individual forces. Each one nudges velocities (or, for centering,
//! positions) in place; the simulation integrates afterwards.

use super::Body;

/// Deterministic stand-in for the random jiggle used when two bodies overlap exactly.
pub(super) fn jiggle(seed: usize) -> f64 {
    (seed as f64 + 1.0) * 1e-6
}

/// Spring along each link toward `distance`.
///
/// Strength and bias follow node degree so that hubs move less than leaves.
pub(super) fn apply_links(
    bodies: &mut [Body],
    links: &[LinkSpring],
    distance: f64,
    alpha: f64,
) {
    for (i, link) in links.iter().enumerate() {
        let (s, t) = (link.source, link.target);
        let mut dx = bodies[t].x + bodies[t].vx - bodies[s].x - bodies[s].vx;
        let mut dy = bodies[t].y + bodies[t].vy - bodies[s].y - bodies[s].vy;
        if dx == 0.0 {
            dx = jiggle(i);
        }
        if dy == 0.0 {
            dy = jiggle(i + 1);
        }
        let len = (dx * dx + dy * dy).sqrt();
        let scale = (len - distance) / len * alpha * link.strength;
        dx *= scale;
        dy *= scale;

        bodies[t].vx -= dx * link.bias;
        bodies[t].vy -= dy * link.bias;
        bodies[s].vx += dx * (1.0 - link.bias);
        bodies[s].vy += dy * (1.0 - link.bias);
    }
}

/// Pairwise charge. Negative strength repels.
pub(super) fn apply_charge(bodies: &mut [Body], strength: f64, alpha: f64) {
    let n = bodies.len();
    let mut dv = vec![(0.0f64, 0.0f64); n];
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let mut dx = bodies[j].x - bodies[i].x;
            let mut dy = bodies[j].y - bodies[i].y;
            if dx == 0.0 && dy == 0.0 {
                dx = jiggle(i);
                dy = jiggle(j);
            }
            // Clamp so coincident bodies don't explode
            let dist2 = (dx * dx + dy * dy).max(1.0);
            let w = strength * alpha / dist2;
            dv[i].0 += dx * w;
            dv[i].1 += dy * w;
        }
    }
    for (body, (vx, vy)) in bodies.iter_mut().zip(dv) {
        body.vx += vx;
        body.vy += vy;
    }
}

/// Translate everything so the mean position sits on the center.
pub(super) fn apply_center(bodies: &mut [Body], cx: f64, cy: f64) {
    if bodies.is_empty() {
        return;
    }
    let n = bodies.len() as f64;
    let (sx, sy) = bodies
        .iter()
        .fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
    let (shift_x, shift_y) = (sx / n - cx, sy / n - cy);
    for body in bodies.iter_mut() {
        body.x -= shift_x;
        body.y -= shift_y;
    }
}

/// Push apart bodies whose circles (radius + padding) overlap.
pub(super) fn apply_collide(bodies: &mut [Body], padding: f64) {
    let n = bodies.len();
    for i in 0..n {
        let ri = bodies[i].radius + padding;
        let ri2 = ri * ri;
        for j in (i + 1)..n {
            let rj = bodies[j].radius + padding;
            let r = ri + rj;
            let mut dx = bodies[i].x + bodies[i].vx - bodies[j].x - bodies[j].vx;
            let mut dy = bodies[i].y + bodies[i].vy - bodies[j].y - bodies[j].vy;
            let mut dist2 = dx * dx + dy * dy;
            if dist2 >= r * r {
                continue;
            }
            if dx == 0.0 {
                dx = jiggle(i + j);
                dist2 += dx * dx;
            }
            if dy == 0.0 {
                dy = jiggle(i * n + j);
                dist2 += dy * dy;
            }
            let len = dist2.sqrt();
            let push = (r - len) / len;
            let rj2 = rj * rj;
            let share = rj2 / (ri2 + rj2);

            bodies[i].vx += dx * push * share;
            bodies[i].vy += dy * push * share;
            bodies[j].vx -= dx * push * (1.0 - share);
            bodies[j].vy -= dy * push * (1.0 - share);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct LinkSpring {
    pub source: usize,
    pub target: usize,
    pub strength: f64,
    pub bias: f64,
}

impl LinkSpring {
    /// Springs with degree-derived strength and bias for each `(source, target)` pair.
    pub fn from_pairs(pairs: &[(usize, usize)], body_count: usize) -> Vec<LinkSpring> {
        let mut degree = vec![0usize; body_count];
        for &(s, t) in pairs {
            degree[s] += 1;
            degree[t] += 1;
        }
        pairs
            .iter()
            .map(|&(s, t)| {
                let (ds, dt) = (degree[s] as f64, degree[t] as f64);
                LinkSpring {
                    source: s,
                    target: t,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect()
    }
}
