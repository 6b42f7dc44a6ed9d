//! Unit and building definitions and the tunable ruleset.
//!
//! The ruleset is data: it can be loaded from RON so balance changes never
//! touch simulation code. [`Ruleset::default`] holds the standard rules.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Kinds of unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Civilian that founds cities.
    Settler,
    /// Basic melee unit.
    Warrior,
    /// Fast, weak explorer.
    Scout,
    /// Early bowman.
    Archer,
    /// Mounted unit.
    Horseman,
    /// Civilian tile improver.
    Worker,
}

impl UnitKind {
    /// Every unit kind.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Settler,
        UnitKind::Warrior,
        UnitKind::Scout,
        UnitKind::Archer,
        UnitKind::Horseman,
        UnitKind::Worker,
    ];
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitKind::Settler => "settler",
            UnitKind::Warrior => "warrior",
            UnitKind::Scout => "scout",
            UnitKind::Archer => "archer",
            UnitKind::Horseman => "horseman",
            UnitKind::Worker => "worker",
        };
        f.write_str(name)
    }
}

/// Kinds of city building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// Cultural landmark.
    Monument,
    /// Food storage.
    Granary,
    /// Production building.
    Workshop,
    /// City defenses.
    Walls,
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildingKind::Monument => "monument",
            BuildingKind::Granary => "granary",
            BuildingKind::Workshop => "workshop",
            BuildingKind::Walls => "walls",
        };
        f.write_str(name)
    }
}

/// Something a city can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Buildable {
    /// Train a unit.
    Unit(UnitKind),
    /// Construct a building.
    Building(BuildingKind),
}

impl fmt::Display for Buildable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Buildable::Unit(kind) => write!(f, "unit {kind}"),
            Buildable::Building(kind) => write!(f, "building {kind}"),
        }
    }
}

/// Stats of one unit kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Combat strength; 0 marks a civilian.
    pub strength: u32,
    /// Movement points per turn.
    pub movement: u32,
    /// Maximum health.
    pub health: u32,
    /// Production cost; 0 means the unit cannot be built.
    pub cost: u32,
    /// Whether the unit can found a city.
    #[serde(default)]
    pub founds_city: bool,
}

/// Stats of one building kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingStats {
    /// Production cost.
    pub cost: u32,
    /// Extra food per turn.
    #[serde(default)]
    pub food_bonus: u32,
    /// Extra production per turn.
    #[serde(default)]
    pub production_bonus: u32,
    /// Defense for units on the city tile, in quarter steps.
    #[serde(default)]
    pub defense_quarters: u32,
}

/// City growth constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrowthRules {
    /// Food each citizen eats per turn.
    pub food_per_citizen: u32,
    /// Food needed to grow from population 0.
    pub base_threshold: u32,
    /// Extra food needed per existing citizen.
    pub threshold_per_pop: u32,
}

impl GrowthRules {
    /// Food stock required to grow past `population`.
    #[must_use]
    pub fn threshold(&self, population: u32) -> u32 {
        self.base_threshold
            .saturating_add(self.threshold_per_pop.saturating_mul(population))
    }
}

/// Complete set of tunable rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ruleset {
    /// Per-kind unit stats.
    pub units: BTreeMap<UnitKind, UnitStats>,
    /// Per-kind building stats.
    pub buildings: BTreeMap<BuildingKind, BuildingStats>,
    /// Growth constants.
    pub growth: GrowthRules,
    /// Radius of the territory claimed when a city is founded.
    pub initial_territory_radius: u32,
    /// Minimum food yielded by a city centre tile.
    pub center_min_food: u32,
    /// Minimum production yielded by a city centre tile.
    pub center_min_production: u32,
}

impl Default for Ruleset {
    fn default() -> Self {
        let unit = |strength, movement, cost| UnitStats {
            strength,
            movement,
            health: 100,
            cost,
            founds_city: false,
        };
        let building = |cost, food_bonus, production_bonus, defense_quarters| BuildingStats {
            cost,
            food_bonus,
            production_bonus,
            defense_quarters,
        };

        let units = BTreeMap::from([
            (
                UnitKind::Settler,
                UnitStats {
                    founds_city: true,
                    ..unit(0, 2, 30)
                },
            ),
            (UnitKind::Warrior, unit(8, 2, 20)),
            (UnitKind::Scout, unit(5, 3, 15)),
            (UnitKind::Archer, unit(6, 2, 30)),
            (UnitKind::Horseman, unit(12, 4, 40)),
            (UnitKind::Worker, unit(0, 2, 25)),
        ]);
        let buildings = BTreeMap::from([
            (BuildingKind::Monument, building(40, 0, 0, 0)),
            (BuildingKind::Granary, building(40, 2, 0, 0)),
            (BuildingKind::Workshop, building(50, 0, 2, 0)),
            (BuildingKind::Walls, building(60, 0, 0, 2)),
        ]);

        Self {
            units,
            buildings,
            growth: GrowthRules {
                food_per_citizen: 2,
                base_threshold: 15,
                threshold_per_pop: 6,
            },
            initial_territory_radius: 1,
            center_min_food: 2,
            center_min_production: 1,
        }
    }
}

impl Ruleset {
    /// Parse and validate a ruleset from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let rules: Ruleset = ron::from_str(text)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load and validate a ruleset from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Check that the rules describe a playable game.
    pub fn validate(&self) -> Result<()> {
        for (kind, stats) in &self.units {
            if stats.health == 0 {
                return Err(GameError::InvalidRuleset(format!("{kind} has zero health")));
            }
            if stats.movement == 0 {
                return Err(GameError::InvalidRuleset(format!("{kind} has zero movement")));
            }
        }
        if !self.units.values().any(|s| s.cost > 0) {
            return Err(GameError::InvalidRuleset(
                "at least one unit kind must be buildable".into(),
            ));
        }
        if let Some((kind, _)) = self.buildings.iter().find(|(_, s)| s.cost == 0) {
            return Err(GameError::InvalidRuleset(format!("{kind} has zero cost")));
        }
        if self.growth.base_threshold == 0 {
            return Err(GameError::InvalidRuleset(
                "growth threshold must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Stats of a unit kind, if the ruleset defines it.
    #[must_use]
    pub fn unit_stats(&self, kind: UnitKind) -> Option<&UnitStats> {
        self.units.get(&kind)
    }

    /// Stats of a building kind, if the ruleset defines it.
    #[must_use]
    pub fn building_stats(&self, kind: BuildingKind) -> Option<&BuildingStats> {
        self.buildings.get(&kind)
    }

    /// Production cost of an item; `None` if it is not buildable.
    #[must_use]
    pub fn cost_of(&self, item: Buildable) -> Option<u32> {
        let cost = match item {
            Buildable::Unit(kind) => self.unit_stats(kind)?.cost,
            Buildable::Building(kind) => self.building_stats(kind)?.cost,
        };
        (cost > 0).then_some(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ruleset_is_valid() {
        let rules = Ruleset::default();
        rules.validate().unwrap();
        assert_eq!(rules.units.len(), UnitKind::ALL.len());
        assert!(rules.units[&UnitKind::Settler].founds_city);
        assert_eq!(rules.units[&UnitKind::Warrior].strength, 8);
    }

    #[test]
    fn test_cost_of() {
        let rules = Ruleset::default();
        assert_eq!(rules.cost_of(Buildable::Unit(UnitKind::Warrior)), Some(20));
        assert_eq!(rules.cost_of(Buildable::Building(BuildingKind::Walls)), Some(60));

        let mut rules = rules;
        rules.units.remove(&UnitKind::Horseman);
        assert_eq!(rules.cost_of(Buildable::Unit(UnitKind::Horseman)), None);
        rules.units.get_mut(&UnitKind::Scout).unwrap().cost = 0;
        assert_eq!(rules.cost_of(Buildable::Unit(UnitKind::Scout)), None);
    }

    #[test]
    fn test_growth_threshold() {
        let growth = Ruleset::default().growth;
        assert_eq!(growth.threshold(1), 21);
        assert_eq!(growth.threshold(3), 33);
    }

    #[test]
    fn test_ron_round_trip() {
        let rules = Ruleset::default();
        let text = ron::ser::to_string_pretty(&rules, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(Ruleset::from_ron_str(&text).unwrap(), rules);
    }

    #[test]
    fn test_ron_defaults_optional_fields() {
        let text = r"(
            units: {
                warrior: (strength: 8, movement: 2, health: 100, cost: 20),
            },
            buildings: {
                walls: (cost: 60, defense_quarters: 2),
            },
            growth: (food_per_citizen: 2, base_threshold: 10, threshold_per_pop: 5),
            initial_territory_radius: 1,
            center_min_food: 2,
            center_min_production: 1,
        )";
        let rules = Ruleset::from_ron_str(text).unwrap();
        assert!(!rules.units[&UnitKind::Warrior].founds_city);
        assert_eq!(rules.buildings[&BuildingKind::Walls].food_bonus, 0);
    }

    #[test]
    fn test_invalid_ruleset_rejected() {
        let mut rules = Ruleset::default();
        rules.units.get_mut(&UnitKind::Scout).unwrap().movement = 0;
        assert!(matches!(rules.validate(), Err(GameError::InvalidRuleset(_))));

        let text = "(units: {}, buildings: {}, growth: (food_per_citizen: 2, base_threshold: 10, threshold_per_pop: 5), initial_territory_radius: 1, center_min_food: 2, center_min_production: 1)";
        assert!(matches!(
            Ruleset::from_ron_str(text),
            Err(GameError::InvalidRuleset(_))
        ));
        assert!(matches!(
            Ruleset::from_ron_str("(units:"),
            Err(GameError::RulesetParse(_))
        ));
    }
}
