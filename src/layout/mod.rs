//! Force-directed layout
//!
//! Springs pull along links while every pair of nodes repels; collision keeps
//! circles apart and the whole layout is recentred after each step. `alpha` cools
//! toward `alpha_target` each tick; once it falls below `alpha_min` the
//! simulation is at rest and [`Simulation::tick`] becomes a no-op until
//! something reheats it.
//!
//! World coordinates have their origin top-left with `y` growing downward,
//! matching pointer coordinates. Renderers flip as needed.

mod forces;

use forces::LinkSpring;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Tunables. Defaults reproduce a classic browser force layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    pub link_distance: f64,
    pub charge_strength: f64,
    /// Added to each node's size to get its collision radius
    pub collide_padding: f64,
    pub velocity_decay: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    /// Alpha target held while a node is being dragged
    pub drag_alpha_target: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            width: 800.0,
            height: 600.0,
            link_distance: 100.0,
            charge_strength: -300.0,
            collide_padding: 5.0,
            velocity_decay: 0.4,
            alpha_min,
            // Cool from 1 to alpha_min in ~300 ticks
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            drag_alpha_target: 0.3,
        }
    }
}

impl LayoutParams {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Transient layout state for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: String,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Pinned position, set while dragging
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl Body {
    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }

    fn contains(&self, x: f64, y: f64, slack: f64) -> bool {
        let (dx, dy) = (self.x - x, self.y - y);
        let r = self.radius + slack;
        dx * dx + dy * dy <= r * r
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    params: LayoutParams,
    bodies: Vec<Body>,
    lookup: HashMap<String, usize>,
    springs: Vec<LinkSpring>,
    alpha: f64,
    alpha_target: f64,
    ticks: u64,
    stopped: bool,
}

impl Simulation {
    /// Lay out `nodes` (`(id, size)`) joined by `links` (`(source, target)`).
    ///
    /// Links naming unknown ids are dropped with a warning. Starting positions
    /// follow a phyllotaxis spiral around the center so the result is
    /// deterministic.
    pub fn new<'a, N, L>(params: LayoutParams, nodes: N, links: L) -> Self
    where
        N: IntoIterator<Item = (&'a str, f64)>,
        L: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let (cx, cy) = params.center();
        let golden = PI * (3.0 - 5f64.sqrt());
        let mut bodies = Vec::new();
        let mut lookup = HashMap::new();

        for (i, (id, size)) in nodes.into_iter().enumerate() {
            let r = 10.0 * (0.5 + i as f64).sqrt();
            let angle = i as f64 * golden;
            lookup.insert(id.to_string(), i);
            bodies.push(Body {
                id: id.to_string(),
                radius: size,
                x: cx + r * angle.cos(),
                y: cy + r * angle.sin(),
                vx: 0.0,
                vy: 0.0,
                fx: None,
                fy: None,
            });
        }

        let mut pairs = Vec::new();
        for (source, target) in links {
            match (lookup.get(source), lookup.get(target)) {
                (Some(&s), Some(&t)) if s != t => pairs.push((s, t)),
                _ => tracing::warn!(source, target, "skipping link with unknown or identical ends"),
            }
        }
        let springs = LinkSpring::from_pairs(&pairs, bodies.len());

        Self {
            params,
            bodies,
            lookup,
            springs,
            alpha: 1.0,
            alpha_target: 0.0,
            ticks: 0,
            stopped: false,
        }
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: &str) -> Option<&Body> {
        self.lookup.get(id).map(|&i| &self.bodies[i])
    }

    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.body(id).map(|b| (b.x, b.y))
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Still moving: not stopped and not yet cooled.
    pub fn is_active(&self) -> bool {
        !self.stopped && (self.alpha >= self.params.alpha_min || self.alpha_target > 0.0)
    }

    /// Advance one step. Returns false (without touching positions) once
    /// the simulation is stopped or at rest.
    pub fn tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
        let alpha = self.alpha;

        forces::apply_links(
            &mut self.bodies,
            &self.springs,
            self.params.link_distance,
            alpha,
        );
        forces::apply_charge(&mut self.bodies, self.params.charge_strength, alpha);
        forces::apply_collide(&mut self.bodies, self.params.collide_padding);

        let keep = 1.0 - self.params.velocity_decay;
        for body in &mut self.bodies {
            match body.fx {
                Some(fx) => {
                    body.x = fx;
                    body.vx = 0.0;
                }
                None => {
                    body.vx *= keep;
                    body.x += body.vx;
                }
            }
            match body.fy {
                Some(fy) => {
                    body.y = fy;
                    body.vy = 0.0;
                }
                None => {
                    body.vy *= keep;
                    body.y += body.vy;
                }
            }
        }

        let (cx, cy) = self.params.center();
        if !self.bodies.iter().any(Body::is_pinned) {
            forces::apply_center(&mut self.bodies, cx, cy);
        }

        self.ticks += 1;
        true
    }

    /// Tick up to `n` times, stopping early at rest. Returns ticks taken.
    pub fn run(&mut self, n: usize) -> usize {
        (0..n).take_while(|_| self.tick()).count()
    }

    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target.max(0.0);
    }

    /// Restart motion after a change. Alpha jumps back to at least `alpha`.
    pub fn reheat(&mut self, alpha: f64) {
        if self.stopped {
            return;
        }
        self.alpha = self.alpha.max(alpha);
    }

    /// Pin `id` at `(x, y)`. Returns false for unknown ids.
    pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(&i) = self.lookup.get(id) else {
            return false;
        };
        let body = &mut self.bodies[i];
        body.fx = Some(x);
        body.fy = Some(y);
        body.x = x;
        body.y = y;
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(&i) = self.lookup.get(id) else {
            return false;
        };
        let body = &mut self.bodies[i];
        body.fx = None;
        body.fy = None;
        true
    }

    /// Topmost body under `(x, y)`, allowing `slack` extra radius.
    pub fn body_at(&self, x: f64, y: f64, slack: f64) -> Option<&Body> {
        self.bodies.iter().rev().find(|b| b.contains(x, y, slack))
    }

    /// Track a new viewport. Bodies are shifted so the layout stays centered.
    pub fn resize(&mut self, width: f64, height: f64) {
        if (width - self.params.width).abs() < f64::EPSILON
            && (height - self.params.height).abs() < f64::EPSILON
        {
            return;
        }
        let (old_cx, old_cy) = self.params.center();
        self.params.width = width;
        self.params.height = height;
        let (cx, cy) = self.params.center();
        for body in &mut self.bodies {
            body.x += cx - old_cx;
            body.y += cy - old_cy;
            if let Some(fx) = body.fx.as_mut() {
                *fx += cx - old_cx;
            }
            if let Some(fy) = body.fy.as_mut() {
                *fy += cy - old_cy;
            }
        }
    }

    /// Halt for good. A stopped simulation never moves again.
    pub fn stop(&mut self) {
        if !self.stopped {
            tracing::debug!(ticks = self.ticks, bodies = self.bodies.len(), "layout stopped");
        }
        self.stopped = true;
        self.alpha_target = 0.0;
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` including radii.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.bodies.first()?;
        let init = (
            first.x - first.radius,
            first.y - first.radius,
            first.x + first.radius,
            first.y + first.radius,
        );
        Some(self.bodies.iter().fold(init, |(x0, y0, x1, y1), b| {
            (
                x0.min(b.x - b.radius),
                y0.min(b.y - b.radius),
                x1.max(b.x + b.radius),
                y1.max(b.y + b.radius),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(n: usize) -> Simulation {
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let nodes = ids.iter().map(|id| (id.as_str(), 12.0));
        let links = ids[1..].iter().map(|id| (ids[0].as_str(), id.as_str()));
        Simulation::new(LayoutParams::default(), nodes, links)
    }

    fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_cools_to_rest() {
        let mut sim = star(5);
        let taken = sim.run(10_000);
        assert!(taken > 100 && taken < 1_000, "took {taken}");
        assert!(!sim.is_active());
        assert!(!sim.tick());
    }

    #[test]
    fn test_settles_near_link_distance() {
        let mut sim = star(4);
        sim.run(10_000);
        let hub = sim.position("n0").unwrap();
        for id in ["n1", "n2", "n3"] {
            let d = dist(hub, sim.position(id).unwrap());
            assert!(d > 60.0 && d < 250.0, "{id} at {d}");
        }
    }

    #[test]
    fn test_no_overlap_after_settling() {
        let mut sim = star(8);
        sim.run(10_000);
        let bodies = sim.bodies();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let d = dist((bodies[i].x, bodies[i].y), (bodies[j].x, bodies[j].y));
                assert!(d > bodies[i].radius, "{} and {} overlap", bodies[i].id, bodies[j].id);
            }
        }
    }

    #[test]
    fn test_center_of_mass_stays_centered() {
        let mut sim = star(6);
        sim.run(50);
        let n = sim.bodies().len() as f64;
        let mx = sim.bodies().iter().map(|b| b.x).sum::<f64>() / n;
        let my = sim.bodies().iter().map(|b| b.y).sum::<f64>() / n;
        assert!((mx - 400.0).abs() < 1e-6);
        assert!((my - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_pinned_body_stays_put() {
        let mut sim = star(4);
        sim.set_alpha_target(0.3);
        assert!(sim.pin("n2", 10.0, 20.0));
        sim.run(20);
        assert_eq!(sim.position("n2"), Some((10.0, 20.0)));
        // Dragging keeps the layout warm
        assert!(sim.is_active());
        assert!(sim.alpha() > 0.2);

        sim.unpin("n2");
        sim.set_alpha_target(0.0);
        sim.run(5);
        assert_ne!(sim.position("n2"), Some((10.0, 20.0)));
    }

    #[test]
    fn test_stopped_simulation_never_moves() {
        let mut sim = star(3);
        sim.tick();
        let before: Vec<_> = sim.bodies().to_vec();
        sim.stop();
        sim.reheat(1.0);
        sim.set_alpha_target(0.3);
        assert!(!sim.tick());
        assert_eq!(sim.run(10), 0);
        assert_eq!(sim.bodies(), before.as_slice());
    }

    #[test]
    fn test_reheat_wakes_resting_layout() {
        let mut sim = star(3);
        sim.run(10_000);
        assert!(!sim.is_active());
        sim.reheat(0.3);
        assert!(sim.tick());
    }

    #[test]
    fn test_body_at_prefers_topmost() {
        let mut sim = Simulation::new(
            LayoutParams::default(),
            [("a", 10.0), ("b", 10.0)],
            std::iter::empty(),
        );
        sim.pin("a", 100.0, 100.0);
        sim.pin("b", 104.0, 100.0);
        assert_eq!(sim.body_at(102.0, 100.0, 0.0).map(|b| b.id.as_str()), Some("b"));
        assert_eq!(sim.body_at(300.0, 300.0, 0.0), None);
        assert!(sim.body_at(115.0, 100.0, 0.0).is_none());
        assert!(sim.body_at(115.0, 100.0, 5.0).is_some());
    }

    #[test]
    fn test_unknown_links_are_dropped() {
        let mut sim = Simulation::new(
            LayoutParams::default(),
            [("a", 10.0)],
            [("a", "ghost"), ("a", "a")],
        );
        assert_eq!(sim.bodies().len(), 1);
        sim.run(10);
        assert!(!sim.pin("ghost", 0.0, 0.0));
    }

    #[test]
    fn test_resize_recenters() {
        let mut sim = star(3);
        let before = sim.position("n0").unwrap();
        sim.resize(1000.0, 600.0);
        let after = sim.position("n0").unwrap();
        assert!((after.0 - before.0 - 100.0).abs() < 1e-9);
        assert!((after.1 - before.1).abs() < 1e-9);
    }

    #[test]
    fn test_empty_simulation() {
        let mut sim = Simulation::new(LayoutParams::default(), std::iter::empty(), std::iter::empty());
        assert!(sim.tick());
        assert!(sim.bounds().is_none());
        assert!(sim.body_at(0.0, 0.0, 10.0).is_none());
    }
}
