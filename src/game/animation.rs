//! Per-disc fall from release point to landing cell.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::layout::Point;
use super::{Disc, DiscKind, Player, Position};

/// Kinematic constants for falling discs, per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropPhysics {
    /// Downward acceleration added to the vertical speed each frame.
    pub gravity: f32,
    /// Fraction of the remaining horizontal gap closed each frame.
    pub horizontal_ease: f32,
    pub spin_min: f32,
    pub spin_max: f32,
    /// Distance from the target, in disc radii, where the spin starts settling.
    pub settle_zone_radii: f32,
    /// Fraction of the remaining angle to the final rotation closed each frame.
    pub rotation_blend: f32,
    /// Spin multiplier applied each frame inside the settle zone.
    pub spin_decay: f32,
}

impl Default for DropPhysics {
    fn default() -> Self {
        DropPhysics {
            gravity: 0.5,
            horizontal_ease: 0.2,
            spin_min: 0.05,
            spin_max: 0.2,
            settle_zone_radii: 4.0,
            rotation_blend: 0.1,
            spin_decay: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropState {
    Falling,
    Settled,
}

/// A released disc on its way to the cell chosen when it was dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatingDisc {
    pub position: Point,
    pub target: Point,
    /// Landing cell, fixed at release.
    pub cell: Position,
    pub radius: f32,
    pub speed: f32,
    pub acceleration: f32,
    pub rotation: f32,
    pub spin: f32,
    pub final_rotation: f32,
    pub player: Player,
    pub kind: DiscKind,
}

impl AnimatingDisc {
    /// Start a fall from `start` towards `cell`, whose screen center is `target`.
    /// Spin speed and resting angle are drawn once here.
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: Rng + ?Sized>(
        start: Point,
        cell: Position,
        target: Point,
        radius: f32,
        player: Player,
        kind: DiscKind,
        physics: &DropPhysics,
        rng: &mut R,
    ) -> Self {
        let spin = rng.random_range(physics.spin_min..=physics.spin_max);
        let final_rotation = rng.random_range(0.0..TAU);
        AnimatingDisc {
            position: start,
            target,
            cell,
            radius,
            speed: 0.0,
            acceleration: physics.gravity,
            rotation: 0.0,
            spin,
            final_rotation,
            player,
            kind,
        }
    }

    /// Advance one frame. Speed is integrated before position.
    pub fn step(&mut self, physics: &DropPhysics) -> DropState {
        self.speed += self.acceleration;
        self.position.y += self.speed;

        self.position.x += (self.target.x - self.position.x) * physics.horizontal_ease;

        self.rotation += self.spin;
        if self.target.y - self.position.y < self.radius * physics.settle_zone_radii {
            self.rotation += (self.final_rotation - self.rotation) * physics.rotation_blend;
            self.spin *= physics.spin_decay;
        }

        if self.position.y >= self.target.y {
            DropState::Settled
        } else {
            DropState::Falling
        }
    }

    /// Snap onto the target and produce the disc to commit to the board.
    pub fn settle(&mut self) -> Disc {
        self.position = self.target;
        Disc::new(self.player, self.rotation, self.kind)
    }
}
