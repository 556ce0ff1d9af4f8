//! Rigid-body physics for the ball
//!
//! Spheres against static planes: gravity, damping, contact with friction and
//! restitution, and sleeping. Bodies are stepped at a fixed timestep; the
//! world keeps an accumulator so callers can feed it wall-clock frame time.

use glam::{Quat, Vec3};

use crate::consts::{RESTITUTION_THRESHOLD, SLEEP_SPEED_LIMIT, SLEEP_TIME_LIMIT};

/// Contacts closer than this count as touching (m)
const CONTACT_MARGIN: f32 = 1e-3;

/// Surface response for a ball/ground pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMaterial {
    pub friction: f32,
    pub restitution: f32,
    /// Rolling deceleration as a fraction of the normal load. A ball rests on
    /// slopes where `tan(slope) <= rolling_resistance`.
    pub rolling_resistance: f32,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self {
            friction: 0.3,
            restitution: 0.3,
            rolling_resistance: 0.0,
        }
    }
}

/// An infinite immovable plane: `normal · p = offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticPlane {
    /// Unit normal, pointing out of the solid side
    pub normal: Vec3,
    pub offset: f32,
}

impl StaticPlane {
    pub fn new(normal: Vec3, point_on_plane: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            offset: normal.dot(point_on_plane),
        }
    }

    /// Plane through the origin whose up vector is `rotation * Y`
    pub fn from_rotation(rotation: Quat) -> Self {
        Self::new(rotation * Vec3::Y, Vec3::ZERO)
    }

    /// Signed distance from the plane (positive on the normal side)
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) - self.offset
    }
}

/// Sleep bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepState {
    #[default]
    Awake,
    /// Slow, counting down to sleep
    Sleepy,
    /// Frozen until woken
    Sleeping,
}

/// A dynamic sphere
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub mass: f32,
    pub radius: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub orientation: Quat,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub sleep_state: SleepState,
    sleepy_time: f32,
    /// Disabled bodies are neither integrated nor collided
    pub enabled: bool,
}

impl RigidBody {
    pub fn sphere(mass: f32, radius: f32) -> Self {
        Self {
            mass,
            radius,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            linear_damping: 0.01,
            angular_damping: 0.01,
            sleep_state: SleepState::Awake,
            sleepy_time: 0.0,
            enabled: true,
        }
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 }
    }

    /// Inverse moment of inertia of a solid sphere (2/5 m r²)
    #[inline]
    pub fn inverse_inertia(&self) -> f32 {
        let inertia = 0.4 * self.mass * self.radius * self.radius;
        if inertia > 0.0 { 1.0 / inertia } else { 0.0 }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleep_state == SleepState::Sleeping
    }

    pub fn wake_up(&mut self) {
        self.sleep_state = SleepState::Awake;
        self.sleepy_time = 0.0;
    }

    /// Zero linear and angular velocity
    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Apply an instantaneous impulse at a world-space point. Wakes the body.
    pub fn apply_impulse(&mut self, impulse: Vec3, world_point: Vec3) {
        if self.mass <= 0.0 {
            return;
        }
        self.wake_up();
        let r = world_point - self.position;
        self.velocity += impulse * self.inverse_mass();
        self.angular_velocity += r.cross(impulse) * self.inverse_inertia();
    }

    fn update_sleep(&mut self, dt: f32) {
        let speed_sq = self.velocity.length_squared() + self.angular_velocity.length_squared();
        let limit_sq = SLEEP_SPEED_LIMIT * SLEEP_SPEED_LIMIT;

        match self.sleep_state {
            SleepState::Awake if speed_sq < limit_sq => {
                self.sleep_state = SleepState::Sleepy;
                self.sleepy_time = 0.0;
            }
            SleepState::Sleepy if speed_sq > limit_sq => self.wake_up(),
            SleepState::Sleepy => {
                self.sleepy_time += dt;
                if self.sleepy_time >= SLEEP_TIME_LIMIT {
                    self.sleep_state = SleepState::Sleeping;
                    self.stop();
                }
            }
            _ => {}
        }
    }
}

/// Index of a body inside its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(usize);

/// Physics world
#[derive(Debug, Clone)]
pub struct World {
    pub gravity: Vec3,
    pub planes: Vec<StaticPlane>,
    /// Material used for every body/plane contact
    pub contact: ContactMaterial,
    pub allow_sleep: bool,
    bodies: Vec<RigidBody>,
    accumulator: f32,
    /// Simulated time (seconds)
    pub time: f32,
}

impl World {
    pub fn new(gravity: Vec3, contact: ContactMaterial) -> Self {
        Self {
            gravity,
            planes: Vec::new(),
            contact,
            allow_sleep: true,
            bodies: Vec::new(),
            accumulator: 0.0,
            time: 0.0,
        }
    }

    pub fn add_plane(&mut self, plane: StaticPlane) {
        self.planes.push(plane);
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    pub fn body(&self, handle: BodyHandle) -> &RigidBody {
        &self.bodies[handle.0]
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut RigidBody {
        &mut self.bodies[handle.0]
    }

    /// Advance by `time_since_last` seconds in `fixed_dt` steps
    ///
    /// Runs at most `max_substeps` steps; any backlog past that is dropped
    /// rather than carried into the next frame. Returns the number of steps run.
    pub fn step(&mut self, fixed_dt: f32, time_since_last: f32, max_substeps: u32) -> u32 {
        self.accumulator += time_since_last.max(0.0);

        let mut substeps = 0;
        while self.accumulator >= fixed_dt && substeps < max_substeps {
            self.internal_step(fixed_dt);
            self.accumulator -= fixed_dt;
            substeps += 1;
        }

        if self.accumulator >= fixed_dt {
            log::debug!("Physics fell behind, dropping {:.3}s", self.accumulator);
            self.accumulator %= fixed_dt;
        }

        substeps
    }

    fn internal_step(&mut self, dt: f32) {
        for body in self.bodies.iter_mut() {
            if !body.enabled || body.mass <= 0.0 || body.is_sleeping() {
                continue;
            }

            body.velocity += self.gravity * dt;
            body.velocity *= (1.0 - body.linear_damping).powf(dt);
            body.angular_velocity *= (1.0 - body.angular_damping).powf(dt);

            for plane in &self.planes {
                resolve_plane_contact(body, plane, &self.contact, dt);
            }

            body.position += body.velocity * dt;
            let spin = body.angular_velocity * dt;
            if spin != Vec3::ZERO {
                body.orientation = (Quat::from_scaled_axis(spin) * body.orientation).normalize();
            }

            if self.allow_sleep {
                body.update_sleep(dt);
            }
        }
        self.time += dt;
    }
}

/// Sphere vs plane, resolved speculatively before the position update
///
/// A ball that would cross the plane during this step is treated as touching.
/// A fast approach bounces; a slow one is slowed just enough to land on the
/// surface, so the ball never sinks in and is never lifted back out.
fn resolve_plane_contact(
    body: &mut RigidBody,
    plane: &StaticPlane,
    material: &ContactMaterial,
    dt: f32,
) {
    let n = plane.normal;
    let mut gap = plane.signed_distance(body.position) - body.radius;
    if gap < 0.0 {
        // Placed inside the ground (spawn, reset)
        body.position -= n * gap;
        gap = 0.0;
    }

    let approach = body.velocity.dot(n);
    if approach >= 0.0 || gap + approach * dt > CONTACT_MARGIN {
        return;
    }

    let target = if -approach > RESTITUTION_THRESHOLD {
        -material.restitution * approach
    } else {
        -gap / dt
    };
    if approach >= target {
        return;
    }

    let inv_mass = body.inverse_mass();
    let normal_impulse = (target - approach) * body.mass;
    body.velocity += n * (target - approach);

    // Velocity of the contact point, tangential part only
    let r = -n * body.radius;
    let inv_inertia = body.inverse_inertia();
    let contact_vel = body.velocity + body.angular_velocity.cross(r);
    let slip = contact_vel - n * contact_vel.dot(n);
    let slip_speed = slip.length();
    if slip_speed > 1e-6 {
        let tangent = slip / slip_speed;
        let effective = inv_mass + inv_inertia * body.radius * body.radius;
        let friction_impulse = (slip_speed / effective).min(material.friction * normal_impulse);

        let impulse = -tangent * friction_impulse;
        body.velocity += impulse * inv_mass;
        body.angular_velocity += r.cross(impulse) * inv_inertia;
    }

    if material.rolling_resistance > 0.0 {
        apply_rolling_resistance(body, n, material.rolling_resistance * normal_impulse * inv_mass);
    }
}

/// Slow the tangential motion by up to `max_slowdown`, spin included
fn apply_rolling_resistance(body: &mut RigidBody, n: Vec3, max_slowdown: f32) {
    let tangential = body.velocity - n * body.velocity.dot(n);
    let speed = tangential.length();
    if speed <= 0.0 {
        return;
    }

    let scale = (speed - max_slowdown.min(speed)) / speed;
    body.velocity -= tangential * (1.0 - scale);

    let twist = n * body.angular_velocity.dot(n);
    body.angular_velocity = twist + (body.angular_velocity - twist) * scale;
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn flat_world(contact: ContactMaterial) -> World {
        let mut world = World::new(Vec3::new(0.0, -9.81, 0.0), contact);
        world.add_plane(StaticPlane::new(Vec3::Y, Vec3::ZERO));
        world
    }

    fn run(world: &mut World, seconds: f32) {
        let steps = (seconds / DT).round() as u32;
        for _ in 0..steps {
            world.step(DT, DT, 1);
        }
    }

    #[test]
    fn test_ball_settles_on_ground() {
        let mut world = flat_world(ContactMaterial {
            friction: 0.3,
            restitution: 0.3,
            ..Default::default()
        });
        let ball = world.add_body(RigidBody::sphere(0.05, 0.1).at(Vec3::new(0.0, 2.0, 0.0)));

        run(&mut world, 5.0);

        let body = world.body(ball);
        assert!((body.position.y - 0.1).abs() < 0.01, "y = {}", body.position.y);
        assert!(body.speed() < SLEEP_SPEED_LIMIT);
        assert!(body.is_sleeping());
    }

    fn energy(body: &RigidBody) -> f32 {
        let inertia = 1.0 / body.inverse_inertia();
        0.5 * body.mass * body.velocity.length_squared()
            + 0.5 * inertia * body.angular_velocity.length_squared()
            + body.mass * 9.81 * body.position.y
    }

    #[test]
    fn test_bouncing_ball_loses_energy_and_sleeps() {
        use crate::consts::{BALL_MASS, BALL_RADIUS};

        let mut world = flat_world(ContactMaterial {
            friction: 0.2,
            restitution: 0.8,
            rolling_resistance: 0.2,
        });
        let start = Vec3::new(0.0, BALL_RADIUS + 2.0, 0.0);
        let ball = world.add_body(RigidBody::sphere(BALL_MASS, BALL_RADIUS).at(start));

        let mut last = energy(world.body(ball));
        for _ in 0..(20.0 / DT) as u32 {
            world.step(DT, DT, 1);
            let body = world.body(ball);
            let e = energy(body);
            assert!(e <= last + 1e-5, "energy rose from {} to {}", last, e);
            // Never inside the ground
            assert!(body.position.y >= BALL_RADIUS - 1e-4, "y = {}", body.position.y);
            last = e;
        }

        let body = world.body(ball);
        assert!(body.is_sleeping());
        assert!((body.position.y - BALL_RADIUS).abs() < 0.01);
    }

    #[test]
    fn test_bouncy_contact_rebounds() {
        let mut world = flat_world(ContactMaterial {
            friction: 0.2,
            restitution: 0.8,
            ..Default::default()
        });
        let ball = world.add_body(RigidBody::sphere(0.05, 0.1).at(Vec3::new(0.0, 2.0, 0.0)));

        let mut rebounded = false;
        for _ in 0..120 {
            world.step(DT, DT, 1);
            if world.body(ball).velocity.y > 1.0 {
                rebounded = true;
                break;
            }
        }
        assert!(rebounded);
    }

    #[test]
    fn test_central_impulse_adds_no_spin() {
        let mut body = RigidBody::sphere(0.5, 0.1);
        body.apply_impulse(Vec3::new(1.0, 0.0, 0.0), body.position);

        assert!((body.velocity.x - 2.0).abs() < 1e-6);
        assert_eq!(body.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn test_offset_impulse_adds_spin() {
        let mut body = RigidBody::sphere(0.5, 0.1);
        let top = body.position + Vec3::Y * 0.1;
        body.apply_impulse(Vec3::new(1.0, 0.0, 0.0), top);

        // r = +Y, J = +X  =>  r × J = -Z
        assert!(body.angular_velocity.z < 0.0);
    }

    #[test]
    fn test_impulse_wakes_sleeping_body() {
        let mut body = RigidBody::sphere(0.5, 0.1);
        body.sleep_state = SleepState::Sleeping;
        body.apply_impulse(Vec3::X, body.position);
        assert_eq!(body.sleep_state, SleepState::Awake);
    }

    #[test]
    fn test_sliding_ball_starts_rolling() {
        let mut world = flat_world(ContactMaterial {
            friction: 0.5,
            restitution: 0.3,
            ..Default::default()
        });
        world.allow_sleep = false;
        let mut body = RigidBody::sphere(0.05, 0.1).at(Vec3::new(0.0, 0.1, 0.0));
        body.velocity = Vec3::new(3.0, 0.0, 0.0);
        let ball = world.add_body(body);

        run(&mut world, 1.0);

        let body = world.body(ball);
        assert!(body.angular_velocity.z < 0.0);
        // Rolling without slipping: v = -ω_z r
        let slip = body.velocity.x + body.angular_velocity.z * body.radius;
        assert!(slip.abs() < 0.05, "slip = {}", slip);
        // Rolling ball keeps most of its speed (5/7 of it)
        assert!(body.velocity.x > 1.5);
    }

    #[test]
    fn test_ball_rolls_downhill() {
        let tilt = 0.17;
        let mut world = World::new(Vec3::new(0.0, -9.81, 0.0), ContactMaterial::default());
        world.add_plane(StaticPlane::from_rotation(Quat::from_rotation_x(-tilt)));
        let plane = world.planes[0];
        let start = plane.normal * 0.1;
        let ball = world.add_body(RigidBody::sphere(0.05, 0.1).at(start));

        run(&mut world, 2.0);

        let body = world.body(ball);
        assert!(body.position.z < start.z - 1.0);
        // Still resting on the surface
        assert!((plane.signed_distance(body.position) - 0.1).abs() < 0.01);
    }

    #[test]
    fn test_step_accumulates_and_caps_substeps() {
        let mut world = flat_world(ContactMaterial::default());

        assert_eq!(world.step(DT, DT, 3), 1);
        assert_eq!(world.step(DT, DT * 0.5, 3), 0);
        assert_eq!(world.step(DT, DT * 0.5, 3), 1);

        // A long stall runs the cap and drops the rest
        assert_eq!(world.step(DT, 1.0, 3), 3);
        assert_eq!(world.step(DT, 0.0, 3), 0);
    }

    #[test]
    fn test_disabled_body_is_frozen() {
        let mut world = flat_world(ContactMaterial::default());
        let mut body = RigidBody::sphere(0.05, 0.1).at(Vec3::new(0.0, 1.0, 0.0));
        body.enabled = false;
        let ball = world.add_body(body);

        run(&mut world, 1.0);

        assert_eq!(world.body(ball).position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_rolling_resistance_holds_ball_on_slope() {
        let tilt: f32 = 0.17;
        let mut world = World::new(
            Vec3::new(0.0, -9.81, 0.0),
            ContactMaterial {
                rolling_resistance: 0.2,
                ..Default::default()
            },
        );
        world.add_plane(StaticPlane::from_rotation(Quat::from_rotation_x(-tilt)));
        let start = world.planes[0].normal * 0.1;
        let ball = world.add_body(RigidBody::sphere(0.05, 0.1).at(start));

        run(&mut world, 3.0);

        let body = world.body(ball);
        assert!((body.position - start).length() < 0.01);
        assert!(body.is_sleeping());
    }

    #[test]
    fn test_rolling_resistance_stops_a_putt() {
        let mut world = flat_world(ContactMaterial {
            rolling_resistance: 0.2,
            ..Default::default()
        });
        let mut body = RigidBody::sphere(0.05, 0.1).at(Vec3::new(0.0, 0.1, 0.0));
        body.velocity = Vec3::new(2.0, 0.0, 0.0);
        let ball = world.add_body(body);

        run(&mut world, 3.0);

        let body = world.body(ball);
        assert!(body.speed() < 1e-3);
        // Short slide, then v² / (2 * 0.2 g) of rolling
        assert!(body.position.x > 0.5 && body.position.x < 2.5, "x = {}", body.position.x);
    }

    #[test]
    fn test_plane_signed_distance() {
        let plane = StaticPlane::new(Vec3::Y, Vec3::new(0.0, 2.0, 0.0));
        assert!((plane.signed_distance(Vec3::new(3.0, 5.0, -1.0)) - 3.0).abs() < 1e-6);
        assert!((plane.signed_distance(Vec3::new(0.0, 1.5, 9.0)) + 0.5).abs() < 1e-6);
    }
}
