use std::collections::HashSet;

use tracing::{debug, trace, warn};

use super::config::{check_timestep, WorldConfig};
use crate::{
    collision::{self, CollisionInfo, GroundContact, QuadTree},
    constraints::{Constraint, DistanceConstraint, PinConstraint},
    error::{PhysicsError, PhysicsResult},
    math::vec2::Vec2,
    objects::{BodyId, BodySet, RigidBody},
};

// Below this, a summed inverse mass is treated as "both static".
const INV_MASS_EPSILON: f64 = 1e-9;

/// What happened during one fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Body-body contacts found on the first solver iteration.
    pub contacts: usize,
    /// Ground-plane contacts found on the first solver iteration.
    pub ground_contacts: usize,
    /// Pairs skipped because narrow-phase produced non-finite data.
    pub skipped_pairs: usize,
    /// Ground contacts skipped because their penetration was not finite.
    pub skipped_ground_contacts: usize,
    /// Constraint solves that failed with a numeric error.
    pub skipped_constraints: usize,
}

/// Owns every body and constraint and advances them in fixed steps.
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    config: WorldConfig,
    bodies: BodySet,
    constraints: Vec<Constraint>,
    // Contacts recorded on the first solver iteration of the last step
    contacts: Vec<CollisionInfo>,
    ground_contacts: Vec<GroundContact>,
    accumulator: f64,

    broad_phase: QuadTree,
    // Largest half-extent among active bodies, refreshed with the broad-phase
    max_half_extent: f64,
    // Scratch storage reused across iterations to avoid allocations
    candidates: Vec<usize>,
    processed_pairs: HashSet<(usize, usize)>,
}

impl PhysicsWorld {
    /// Creates an empty world, rejecting an invalid configuration.
    pub fn new(config: WorldConfig) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: WorldConfig) -> Self {
        let broad_phase = QuadTree::new(
            config.world_bounds,
            config.quadtree_capacity,
            config.quadtree_max_depth,
        );
        Self {
            config,
            bodies: BodySet::new(),
            constraints: Vec::new(),
            contacts: Vec::new(),
            ground_contacts: Vec::new(),
            accumulator: 0.0,
            broad_phase,
            max_half_extent: 0.0,
            candidates: Vec::new(),
            processed_pairs: HashSet::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // --- Construction API ---

    /// Creates a unit circle at `position` and returns its handle.
    /// A mass `<= 0` makes the body static.
    pub fn create_body(&mut self, position: Vec2, mass: f64) -> PhysicsResult<BodyId> {
        if !mass.is_finite() {
            return Err(PhysicsError::InvalidMass(mass));
        }
        Ok(self.add_body(RigidBody::new(position, mass)))
    }

    /// Takes ownership of a pre-built body and returns its new handle.
    pub fn add_body(&mut self, body: RigidBody) -> BodyId {
        let id = self.bodies.insert(body);
        trace!(body = %id, "body added");
        id
    }

    /// Removes a body. Constraints that reference it stay in place as no-ops
    /// until [`PhysicsWorld::retain_valid_constraints`] prunes them.
    pub fn remove_body(&mut self, id: BodyId) -> PhysicsResult<RigidBody> {
        let body = self.bodies.remove(id).ok_or(PhysicsError::BodyNotFound(id))?;
        self.contacts
            .retain(|contact| contact.body_a != id && contact.body_b != id);
        self.ground_contacts.retain(|contact| contact.body != id);
        trace!(body = %id, "body removed");
        Ok(body)
    }

    /// Drops every body, constraint and contact, and any banked time.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.constraints.clear();
        self.contacts.clear();
        self.ground_contacts.clear();
        self.broad_phase.clear();
        self.accumulator = 0.0;
        debug!("world cleared");
    }

    /// Adds a constraint between bodies that exist in this world and returns
    /// its index.
    pub fn add_constraint(&mut self, constraint: impl Into<Constraint>) -> PhysicsResult<usize> {
        let constraint = constraint.into();
        for id in std::iter::once(constraint.body_a()).chain(constraint.body_b()) {
            if !self.bodies.contains(id) {
                return Err(PhysicsError::BodyNotFound(id));
            }
        }
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    /// Links two bodies at their current separation.
    pub fn add_distance_constraint(
        &mut self,
        body_a: BodyId,
        body_b: BodyId,
        stiffness: f64,
    ) -> PhysicsResult<usize> {
        let constraint = DistanceConstraint::new(&self.bodies, body_a, body_b, stiffness)?;
        self.add_constraint(constraint)
    }

    /// Pins a body at its current distance from `pin`.
    pub fn add_pin_constraint(
        &mut self,
        body: BodyId,
        pin: Vec2,
        stiffness: f64,
    ) -> PhysicsResult<usize> {
        let constraint = PinConstraint::new(&self.bodies, body, pin, stiffness)?;
        self.add_constraint(constraint)
    }

    /// Removes constraints whose bodies are gone and returns how many were
    /// dropped.
    pub fn retain_valid_constraints(&mut self) -> usize {
        let before = self.constraints.len();
        let bodies = &self.bodies;
        self.constraints
            .retain(|constraint| constraint.is_valid(bodies));
        before - self.constraints.len()
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Replaces the gravity vector, rejecting non-finite components.
    pub fn set_gravity(&mut self, gravity: Vec2) -> PhysicsResult<()> {
        if !gravity.is_finite() {
            return Err(PhysicsError::invalid_config("gravity must be finite"));
        }
        self.config.gravity = gravity;
        Ok(())
    }

    pub fn fixed_timestep(&self) -> f64 {
        self.config.fixed_timestep
    }

    pub fn set_fixed_timestep(&mut self, fixed_timestep: f64) -> PhysicsResult<()> {
        self.config.fixed_timestep = check_timestep(fixed_timestep)?;
        Ok(())
    }

    // --- Read access ---

    /// Bodies in creation order.
    pub fn bodies(&self) -> &[RigidBody] {
        self.bodies.as_slice()
    }

    pub fn body_set(&self) -> &BodySet {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// World-space endpoints of every valid constraint, for drawing.
    pub fn constraint_lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.constraints
            .iter()
            .filter_map(|constraint| constraint.endpoints(&self.bodies))
    }

    /// Contacts recorded on the first solver iteration of the last step.
    pub fn contacts(&self) -> &[CollisionInfo] {
        &self.contacts
    }

    pub fn ground_contacts(&self) -> &[GroundContact] {
        &self.ground_contacts
    }

    /// Time banked by [`PhysicsWorld::update`] that has not been stepped yet.
    pub fn time_accumulator(&self) -> f64 {
        self.accumulator
    }

    /// The active body under `point`, if any. When bodies overlap, the most
    /// recently created one wins.
    pub fn body_at(&self, point: Vec2) -> Option<BodyId> {
        self.bodies
            .iter()
            .rev()
            .find(|body| body.is_active() && body.contains_point(point))
            .map(RigidBody::id)
    }

    // --- Input API ---

    /// Adds a force to the body's accumulator. Static bodies ignore it.
    pub fn apply_force(&mut self, id: BodyId, force: Vec2) -> PhysicsResult<()> {
        self.body_mut(id)
            .ok_or(PhysicsError::BodyNotFound(id))?
            .apply_force(force);
        Ok(())
    }

    pub fn apply_torque(&mut self, id: BodyId, torque: f64) -> PhysicsResult<()> {
        self.body_mut(id)
            .ok_or(PhysicsError::BodyNotFound(id))?
            .apply_torque(torque);
        Ok(())
    }

    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) -> PhysicsResult<()> {
        self.body_mut(id)
            .ok_or(PhysicsError::BodyNotFound(id))?
            .apply_impulse(impulse);
        Ok(())
    }

    // --- Simulation ---

    /// Banks `dt` seconds and runs as many fixed steps as fit, returning how
    /// many ran. Leftover time carries over to the next call. When more than
    /// `max_substeps` steps are owed, the excess whole steps are dropped.
    pub fn update(&mut self, dt: f64) -> PhysicsResult<usize> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimestep(dt));
        }

        self.accumulator += dt;
        let fixed = self.config.fixed_timestep;
        let mut steps = 0;

        while self.accumulator >= fixed {
            if steps == self.config.max_substeps {
                let dropped = self.accumulator - self.accumulator % fixed;
                warn!(
                    steps,
                    dropped_seconds = dropped,
                    "fixed-step cap reached, dropping accumulated time"
                );
                self.accumulator %= fixed;
                break;
            }
            self.step();
            self.accumulator -= fixed;
            steps += 1;
        }

        Ok(steps)
    }

    /// Advances the simulation by exactly one fixed timestep.
    pub fn step(&mut self) -> StepReport {
        let dt = self.config.fixed_timestep;
        let mut report = StepReport::default();
        self.contacts.clear();
        self.ground_contacts.clear();

        // 1. Apply gravity
        self.apply_gravity();

        // 2. Integrate motion
        for body in self.bodies.iter_mut() {
            body.integrate(dt);
        }

        // 3. Rebuild the broad-phase from post-integration positions
        self.rebuild_broad_phase();

        // 4. Iterative solve: contacts, ground, constraints
        for iteration in 0..self.config.solver_iterations {
            let record = iteration == 0;
            self.solve_collisions(record, &mut report);
            if let Some(ground_y) = self.config.ground_y {
                self.solve_ground(ground_y, record, &mut report);
            }
            self.solve_constraints(&mut report);
        }

        // 5. Restitution from the contacts recorded on iteration 0
        self.apply_restitution();

        // 6. Reset accumulators
        for body in self.bodies.iter_mut() {
            body.clear_forces();
        }

        report.contacts = self.contacts.len();
        report.ground_contacts = self.ground_contacts.len();
        debug!(
            bodies = self.bodies.len(),
            contacts = report.contacts,
            ground_contacts = report.ground_contacts,
            skipped_pairs = report.skipped_pairs,
            skipped_ground_contacts = report.skipped_ground_contacts,
            skipped_constraints = report.skipped_constraints,
            "step complete"
        );
        report
    }

    fn apply_gravity(&mut self) {
        let gravity = self.config.gravity;
        for body in self.bodies.iter_mut() {
            // Don't apply gravity to static, sleeping or inactive bodies
            if body.is_static() || body.is_sleeping() || !body.is_active() {
                continue;
            }
            let gravity_force = gravity * body.mass();
            body.apply_force(gravity_force);
        }
    }

    fn rebuild_broad_phase(&mut self) {
        let mut root = self.config.world_bounds;
        let mut max_half_extent = 0.0f64;
        for body in self.bodies.iter().filter(|body| body.is_active()) {
            let bounds = body.aabb();
            root = root.merged(&bounds);
            max_half_extent = max_half_extent
                .max(bounds.half_width)
                .max(bounds.half_height);
        }
        self.max_half_extent = max_half_extent;

        self.broad_phase.reset(root);
        for (index, body) in self.bodies.iter().enumerate() {
            if !body.is_active() {
                continue;
            }
            if !self.broad_phase.insert(index, body.position, body.aabb()) {
                warn!(body = %body.id(), position = ?body.position, "body left out of broad-phase");
            }
        }
    }

    /// Tests every nearby pair once and pushes overlapping bodies apart.
    fn solve_collisions(&mut self, record: bool, report: &mut StepReport) {
        let reach = self.max_half_extent + self.config.query_margin;
        let mut candidates = std::mem::take(&mut self.candidates);
        self.processed_pairs.clear();

        for index in 0..self.bodies.len() {
            let body = &self.bodies[index];
            if !body.is_active() {
                continue;
            }
            let region = body.aabb().expanded(reach);

            candidates.clear();
            self.broad_phase.query(&region, &mut candidates);

            for &other in &candidates {
                if other == index {
                    continue;
                }
                // Always test in (lower, higher) order so (A,B) and (B,A)
                // are the same pair.
                let pair = (index.min(other), index.max(other));
                if !self.processed_pairs.insert(pair) {
                    continue;
                }
                self.resolve_pair(pair.0, pair.1, record, report);
            }
        }

        self.candidates = candidates;
    }

    fn resolve_pair(&mut self, index_a: usize, index_b: usize, record: bool, report: &mut StepReport) {
        let Some((body_a, body_b)) = self.bodies.pair_mut(index_a, index_b) else {
            return;
        };
        if !body_a.is_active() || !body_b.is_active() {
            return;
        }
        if body_a.is_static() && body_b.is_static() {
            return;
        }

        let Some(info) = collision::check_collision(body_a, body_b) else {
            return;
        };
        if !info.normal.is_finite() || !info.penetration.is_finite() {
            report.skipped_pairs += 1;
            warn!(body_a = %info.body_a, body_b = %info.body_b, "non-finite contact skipped");
            return;
        }

        trace!(
            body_a = %info.body_a,
            body_b = %info.body_b,
            normal = ?info.normal,
            penetration = info.penetration,
            "contact"
        );
        apply_positional_correction(
            body_a,
            body_b,
            &info,
            self.config.correction_percent,
            self.config.correction_slop,
        );

        if record {
            self.contacts.push(info);
        }
    }

    fn solve_ground(&mut self, ground_y: f64, record: bool, report: &mut StepReport) {
        for body in self.bodies.iter_mut() {
            if body.is_static() || !body.is_active() {
                continue;
            }
            let Some(contact) = collision::check_ground(body, ground_y) else {
                continue;
            };
            if !contact.penetration.is_finite() {
                report.skipped_ground_contacts += 1;
                warn!(body = %contact.body, "non-finite ground contact skipped");
                continue;
            }
            body.position += contact.normal * contact.penetration;
            if record {
                self.ground_contacts.push(contact);
            }
        }
    }

    fn solve_constraints(&mut self, report: &mut StepReport) {
        for constraint in &self.constraints {
            if let Err(error) = constraint.solve(&mut self.bodies) {
                report.skipped_constraints += 1;
                warn!(body = %constraint.body_a(), %error, "constraint skipped");
            }
        }
    }

    /// Reflects approaching velocities along each recorded contact normal.
    fn apply_restitution(&mut self) {
        for contact in &self.contacts {
            let Some((body_a, body_b)) = self.bodies.pair_mut_by_id(contact.body_a, contact.body_b)
            else {
                continue;
            };

            let relative_velocity_normal = (body_b.velocity - body_a.velocity).dot(contact.normal);
            // If objects are already moving apart, no impulse needed
            if relative_velocity_normal >= 0.0 {
                continue;
            }

            let total_inv_mass = body_a.inverse_mass() + body_b.inverse_mass();
            if total_inv_mass < INV_MASS_EPSILON {
                continue;
            }

            let e = body_a.material.combined_restitution(&body_b.material);
            let j = -(1.0 + e) * relative_velocity_normal / total_inv_mass;
            let impulse = contact.normal * j;

            body_a.apply_impulse(-impulse);
            body_b.apply_impulse(impulse);
        }

        for contact in &self.ground_contacts {
            let Some(body) = self.bodies.get_mut(contact.body) else {
                continue;
            };
            let velocity_normal = body.velocity.dot(contact.normal);
            if velocity_normal >= 0.0 {
                continue;
            }
            let e = body.material.restitution;
            body.velocity -= contact.normal * ((1.0 + e) * velocity_normal);
        }
    }
}

/// Pushes two overlapping bodies apart along the contact normal, split by
/// inverse mass. Penetration up to `slop` is left alone.
fn apply_positional_correction(
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
    contact: &CollisionInfo,
    percent: f64,
    slop: f64,
) {
    let correction_magnitude = (contact.penetration - slop).max(0.0);
    if correction_magnitude < INV_MASS_EPSILON {
        return;
    }

    let total_inv_mass = body_a.inverse_mass() + body_b.inverse_mass();
    if total_inv_mass < INV_MASS_EPSILON {
        return;
    }

    let correction = contact.normal * (correction_magnitude / total_inv_mass * percent);
    body_a.position -= correction * body_a.inverse_mass();
    body_b.position += correction * body_b.inverse_mass();
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::with_valid_config(WorldConfig::default())
    }
}
