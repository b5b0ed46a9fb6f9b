use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};

use super::force::step;
use crate::engine::config::LayoutConfig;
use crate::engine::error::Error;
use crate::engine::params::ForceParams;
use crate::model::layout::{Link, Node};

/// Cooling target held while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// How a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Alpha dropped below `alpha_min`.
    Settled,
    /// The tick cap was reached first.
    TickLimit,
    /// The caller stopped the run; positions are those of the last tick.
    Cancelled,
}

/// Explicit simulation context owning the node arena and cooling state.
///
/// Every tick replaces the arena with the result of [`step`], so
/// [`nodes`](Self::nodes) always reflects a completed tick.
#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<Node>,
    links: Vec<Link>,
    params: ForceParams,
    center: [f64; 2],
    alpha: f64,
    alpha_target: f64,
    ticks: usize,
    max_ticks: usize,
}

impl Simulation {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>, params: ForceParams, config: &LayoutConfig) -> Self {
        Self {
            nodes,
            links,
            alpha: params.cooling.alpha,
            alpha_target: params.cooling.alpha_target,
            params,
            center: config.center(),
            ticks: 0,
            max_ticks: config.max_ticks,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.nodes.iter().map(Node::position).collect()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.params.cooling.alpha_min
    }

    fn exhausted(&self) -> bool {
        self.ticks >= self.max_ticks
    }

    /// Runs one tick. Returns `false` without moving anything once the
    /// simulation has settled or hit its tick cap.
    pub fn tick(&mut self) -> bool {
        if self.is_settled() || self.exhausted() {
            return false;
        }
        self.alpha += (self.alpha_target - self.alpha) * self.params.cooling.alpha_decay;
        self.nodes = step(&self.nodes, &self.links, &self.params, self.alpha, self.center);
        self.ticks += 1;
        trace!("tick {} alpha {:.5}", self.ticks, self.alpha);
        true
    }

    /// Ticks until settled or the tick cap is reached.
    pub fn run(&mut self) -> RunOutcome {
        self.run_with(|_| ControlFlow::Continue(()))
    }

    /// Ticks until settled, the tick cap, or `cancel` is raised.
    ///
    /// The flag is checked before every tick, so a cancelled run leaves the
    /// arena at the last completed tick.
    pub fn run_until(&mut self, cancel: &AtomicBool) -> RunOutcome {
        if cancel.load(Ordering::Relaxed) {
            return RunOutcome::Cancelled;
        }
        self.run_with(|_| {
            if cancel.load(Ordering::Relaxed) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Ticks like [`run`](Self::run), calling `observe` after every tick.
    ///
    /// Returning [`ControlFlow::Break`] from the observer cancels the run.
    pub fn run_with<F>(&mut self, mut observe: F) -> RunOutcome
    where
        F: FnMut(&Simulation) -> ControlFlow<()>,
    {
        let start = self.ticks;
        let outcome = loop {
            if !self.tick() {
                break if self.is_settled() {
                    RunOutcome::Settled
                } else {
                    RunOutcome::TickLimit
                };
            }
            if observe(self).is_break() {
                break RunOutcome::Cancelled;
            }
        };
        debug!(
            "Simulation stopped after {} ticks ({:?}, alpha {:.5})",
            self.ticks - start,
            outcome,
            self.alpha
        );
        outcome
    }

    /// Reheats the simulation to its starting alpha and clears the tick count.
    pub fn restart(&mut self) {
        self.alpha = self.params.cooling.alpha;
        self.ticks = 0;
    }

    pub fn pin(&mut self, index: usize, position: [f64; 2]) -> Result<(), Error> {
        let node = self.node_mut(index)?;
        node.pinned = Some(position);
        node.x = position[0];
        node.y = position[1];
        node.vx = 0.0;
        node.vy = 0.0;
        Ok(())
    }

    pub fn unpin(&mut self, index: usize) -> Result<(), Error> {
        self.node_mut(index)?.pinned = None;
        Ok(())
    }

    /// Pins the node where it stands and keeps the layout warm while it moves.
    pub fn drag_start(&mut self, index: usize) -> Result<(), Error> {
        let position = self.node_mut(index)?.position();
        self.pin(index, position)?;
        self.alpha_target = DRAG_ALPHA_TARGET;
        if self.alpha < DRAG_ALPHA_TARGET {
            self.alpha = DRAG_ALPHA_TARGET;
        }
        self.ticks = 0;
        Ok(())
    }

    pub fn drag_to(&mut self, index: usize, position: [f64; 2]) -> Result<(), Error> {
        self.pin(index, position)
    }

    /// Releases the dragged node and lets the layout cool down again.
    pub fn drag_end(&mut self, index: usize) -> Result<(), Error> {
        self.unpin(index)?;
        self.alpha_target = self.params.cooling.alpha_target;
        Ok(())
    }

    fn node_mut(&mut self, index: usize) -> Result<&mut Node, Error> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or(Error::NodeOutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::layout::seed::phyllotaxis;

    fn simulation(n: usize, links: Vec<Link>) -> Simulation {
        let config = LayoutConfig::default();
        let nodes = (0..n)
            .map(|i| Node::new(i, phyllotaxis(i, config.center()), 10.0))
            .collect();
        Simulation::new(nodes, links, ForceParams::default(), &config)
    }

    #[test]
    fn run_settles_within_tick_cap() {
        let mut sim = simulation(6, Vec::new());
        let outcome = sim.run();
        assert!(matches!(outcome, RunOutcome::Settled | RunOutcome::TickLimit));
        assert!(sim.ticks() <= 300);
        assert!(!sim.tick());
        assert!(
            sim.nodes()
                .iter()
                .all(|n| n.x.is_finite() && n.y.is_finite())
        );
    }

    #[test]
    fn tight_tick_cap_is_reported() {
        let config = LayoutConfig {
            max_ticks: 5,
            ..Default::default()
        };
        let nodes = vec![Node::new(0, [0.0, 0.0], 8.0), Node::new(1, [10.0, 0.0], 8.0)];
        let mut sim = Simulation::new(nodes, Vec::new(), ForceParams::default(), &config);
        assert_eq!(sim.run(), RunOutcome::TickLimit);
        assert_eq!(sim.ticks(), 5);
    }

    #[test]
    fn raised_flag_cancels_before_first_tick() {
        let mut sim = simulation(3, Vec::new());
        let before = sim.positions();
        let cancel = AtomicBool::new(true);
        assert_eq!(sim.run_until(&cancel), RunOutcome::Cancelled);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.positions(), before);
    }

    #[test]
    fn observer_can_stop_the_run() {
        let mut sim = simulation(3, Vec::new());
        let outcome = sim.run_with(|s| {
            if s.ticks() == 10 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert_eq!(sim.ticks(), 10);
    }

    #[test]
    fn pinned_node_stays_put_through_run() {
        let mut sim = simulation(4, Vec::new());
        sim.pin(2, [123.0, 45.0]).unwrap();
        sim.run();
        assert_eq!(sim.nodes()[2].position(), [123.0, 45.0]);
        sim.unpin(2).unwrap();
        assert!(!sim.nodes()[2].is_pinned());
    }

    #[test]
    fn pin_out_of_range_is_an_error() {
        let mut sim = simulation(2, Vec::new());
        assert!(matches!(
            sim.pin(5, [0.0, 0.0]),
            Err(Error::NodeOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn drag_reheats_and_release_cools() {
        let mut sim = simulation(3, Vec::new());
        sim.run();
        sim.drag_start(0).unwrap();
        assert!(sim.alpha() >= DRAG_ALPHA_TARGET);
        sim.drag_to(0, [10.0, 10.0]).unwrap();
        for _ in 0..20 {
            assert!(sim.tick());
        }
        assert_eq!(sim.nodes()[0].position(), [10.0, 10.0]);
        assert!(sim.alpha() > 0.25);

        sim.drag_end(0).unwrap();
        assert!(!sim.nodes()[0].is_pinned());
        let outcome = sim.run();
        assert!(matches!(outcome, RunOutcome::Settled | RunOutcome::TickLimit));
    }

    #[test]
    fn linked_pair_ends_closer_than_unlinked() {
        let links = vec![Link {
            source: 0,
            target: 1,
            similarity: 0.9,
        }];
        let mut sim = simulation(3, links);
        sim.run();
        let nodes = sim.nodes();
        let d = |a: &Node, b: &Node| (a.x - b.x).hypot(a.y - b.y);
        assert!(d(&nodes[0], &nodes[1]) < d(&nodes[0], &nodes[2]));
        assert!(d(&nodes[0], &nodes[1]) < d(&nodes[1], &nodes[2]));
    }
}
