//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for soldiers, an index into the context's soldier arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoldierId(pub u32);

impl SoldierId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier for arrows (monotonic, never reused within a battle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrowId(pub u32);

/// Unique identifier for units, an index into the context's unit list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Side marker determining rivalry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Allegiance {
    Player,
    Enemy,
}

impl Allegiance {
    /// The opposing side
    pub fn rival(&self) -> Allegiance {
        match self {
            Allegiance::Player => Allegiance::Enemy,
            Allegiance::Enemy => Allegiance::Player,
        }
    }

    /// Which way this side faces along the y axis.
    ///
    /// The player deploys at the bottom of the field facing up (+y), the
    /// enemy at the top facing down. Formation depth extends the other way.
    pub fn facing(&self) -> f32 {
        match self {
            Allegiance::Player => 1.0,
            Allegiance::Enemy => -1.0,
        }
    }
}

/// Soldier class, mapped from formation template cell values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoldierClass {
    /// Ordinary foot soldiers
    LightInfantry,
    /// Heavily armored but slower foot soldiers
    HeavyInfantry,
    /// Soldiers that can fire arrows at the enemy
    Archer,
}

impl SoldierClass {
    /// Map a template cell value to a class. 0 (empty) maps to None.
    pub fn from_code(code: u8) -> Option<SoldierClass> {
        match code {
            1 => Some(SoldierClass::LightInfantry),
            2 => Some(SoldierClass::HeavyInfantry),
            3 => Some(SoldierClass::Archer),
            _ => None,
        }
    }

    pub fn is_archer(&self) -> bool {
        matches!(self, SoldierClass::Archer)
    }
}

/// 2D position / direction vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector, or zero for degenerate input
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Angle of this vector in radians, for renderer rotation
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}
