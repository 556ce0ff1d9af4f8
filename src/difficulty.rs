//! Difficulty levels
//!
//! Each level selects a fixed row of course tuning: how grippy and bouncy the
//! ground is, how steeply it slopes, and how hard the putter can hit.

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Course tuning selected by a difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Ball/ground contact friction coefficient
    pub friction: f32,
    /// Ball/ground contact restitution
    pub restitution: f32,
    /// Ground tilt about the X axis (radians)
    pub tilt: f32,
    /// Impulse at full power (N·s)
    pub max_impulse: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Resolve an optional user-supplied name, falling back to `Easy`
    pub fn from_option(s: Option<&str>) -> Self {
        match s {
            None => Self::default(),
            Some(name) => Self::parse(name).unwrap_or_else(|| {
                log::warn!("Unknown difficulty {:?}, using {}", name, Self::default().as_str());
                Self::default()
            }),
        }
    }

    pub fn tuning(&self) -> Tuning {
        match self {
            Difficulty::Easy => Tuning {
                friction: 0.2,
                restitution: 0.8,
                tilt: 0.03,
                max_impulse: 5.5,
            },
            Difficulty::Medium => Tuning {
                friction: 0.35,
                restitution: 0.6,
                tilt: 0.10,
                max_impulse: 4.0,
            },
            Difficulty::Hard => Tuning {
                friction: 0.5,
                restitution: 0.3,
                tilt: 0.17,
                max_impulse: 3.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("MED"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse(" Hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("nightmare"), None);
    }

    #[test]
    fn test_from_option_falls_back_to_easy() {
        assert_eq!(Difficulty::from_option(None), Difficulty::Easy);
        assert_eq!(Difficulty::from_option(Some("bogus")), Difficulty::Easy);
        assert_eq!(Difficulty::from_option(Some("hard")), Difficulty::Hard);
    }

    #[test]
    fn test_harder_is_steeper_and_weaker() {
        let easy = Difficulty::Easy.tuning();
        let medium = Difficulty::Medium.tuning();
        let hard = Difficulty::Hard.tuning();

        assert!(easy.tilt < medium.tilt && medium.tilt < hard.tilt);
        assert!(easy.max_impulse > medium.max_impulse && medium.max_impulse > hard.max_impulse);
        assert!(easy.restitution > hard.restitution);
        assert!(easy.friction < hard.friction);
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
    }
}
