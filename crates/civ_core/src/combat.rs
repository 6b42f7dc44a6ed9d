//! Deterministic melee combat resolution.
//!
//! Damage depends only on the strength ratio of the two sides:
//!
//! - effective attacker = `strength * health / max_health`
//! - effective defender = `strength * health / max_health * (1 + modifier)`
//! - `ratio = attacker / defender`
//! - damage to defender = `round(30 * ratio)`
//! - damage to attacker = `round(30 / ratio * 0.5)`
//!
//! All arithmetic is fixed-point, so results are bit-identical everywhere.
//! There is no randomness.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, round_to_u32, Fixed};
use crate::unit::Unit;

/// Damage dealt at a strength ratio of exactly 1.
pub const BASE_DAMAGE: Fixed = Fixed::from_bits(30 << 32);

/// Share of base damage a defender deals back.
pub const COUNTER_FACTOR: Fixed = Fixed::from_bits(1 << 31);

/// One side of a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combatant {
    /// Base strength; 0 for civilians.
    pub strength: u32,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
}

impl From<&Unit> for Combatant {
    fn from(unit: &Unit) -> Self {
        Self {
            strength: unit.strength,
            health: unit.health,
            max_health: unit.max_health,
        }
    }
}

/// Inputs to [`resolve_combat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatContext {
    /// The attacking unit.
    pub attacker: Combatant,
    /// The defending unit.
    pub defender: Combatant,
    /// Sum of the defender's terrain, feature and building bonuses.
    #[serde(with = "fixed_serde")]
    pub defense_modifier: Fixed,
}

/// Outcome of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Health lost by the attacker.
    pub damage_to_attacker: u32,
    /// Health lost by the defender.
    pub damage_to_defender: u32,
    /// Whether the attacker keeps positive health.
    pub attacker_survives: bool,
    /// Whether the defender keeps positive health.
    pub defender_survives: bool,
}

/// Strength scaled by remaining health (and by `1 + modifier`).
#[must_use]
pub fn effective_strength(side: &Combatant, modifier: Fixed) -> Fixed {
    if side.max_health == 0 {
        return Fixed::ZERO;
    }
    let health = side.health.min(side.max_health);
    let fraction =
        Fixed::saturating_from_num(health).saturating_div(Fixed::saturating_from_num(side.max_health));
    Fixed::saturating_from_num(side.strength)
        .saturating_mul(fraction)
        .saturating_mul(Fixed::ONE.saturating_add(modifier))
}

/// Resolve an attack. Total over all inputs and never panics.
#[must_use]
pub fn resolve_combat(ctx: &CombatContext) -> CombatOutcome {
    let attacker = &ctx.attacker;
    let defender = &ctx.defender;

    // Civilians and defenders with nothing left fall without hitting back.
    let defender_eff = effective_strength(defender, ctx.defense_modifier);
    if defender.strength == 0 || defender_eff <= Fixed::ZERO {
        return outcome(attacker, defender, 0, defender.health);
    }

    let attacker_eff = effective_strength(attacker, Fixed::ZERO);
    if attacker_eff <= Fixed::ZERO {
        // Infinite counter-damage, clamped to the attacker's health.
        return outcome(attacker, defender, attacker.health, 0);
    }

    let ratio = attacker_eff.saturating_div(defender_eff);
    let to_defender = round_to_u32(BASE_DAMAGE.saturating_mul(ratio));
    let to_attacker = if ratio <= Fixed::ZERO {
        attacker.health
    } else {
        round_to_u32(BASE_DAMAGE.saturating_div(ratio).saturating_mul(COUNTER_FACTOR))
    };
    outcome(attacker, defender, to_attacker, to_defender)
}

fn outcome(
    attacker: &Combatant,
    defender: &Combatant,
    to_attacker: u32,
    to_defender: u32,
) -> CombatOutcome {
    let damage_to_attacker = to_attacker.min(attacker.health);
    let damage_to_defender = to_defender.min(defender.health);
    CombatOutcome {
        damage_to_attacker,
        damage_to_defender,
        attacker_survives: attacker.health > damage_to_attacker,
        defender_survives: defender.health > damage_to_defender,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quarters;

    fn side(strength: u32, health: u32) -> Combatant {
        Combatant {
            strength,
            health,
            max_health: 100,
        }
    }

    fn fight(attacker: Combatant, defender: Combatant, modifier: Fixed) -> CombatOutcome {
        resolve_combat(&CombatContext {
            attacker,
            defender,
            defense_modifier: modifier,
        })
    }

    #[test]
    fn test_equal_warriors() {
        let result = fight(side(8, 100), side(8, 100), Fixed::ZERO);
        assert_eq!(result.damage_to_defender, 30);
        assert_eq!(result.damage_to_attacker, 15);
        assert!(result.attacker_survives);
        assert!(result.defender_survives);
    }

    #[test]
    fn test_civilian_defender_dies_without_counter() {
        let result = fight(side(8, 100), side(0, 100), Fixed::ZERO);
        assert!(!result.defender_survives);
        assert_eq!(result.damage_to_attacker, 0);
        assert_eq!(result.damage_to_defender, 100);
        assert!(result.attacker_survives);
    }

    #[test]
    fn test_defense_modifier_reduces_damage() {
        // ratio = 8 / (8 * 1.25) = 0.8
        let result = fight(side(8, 100), side(8, 100), quarters(1));
        assert_eq!(result.damage_to_defender, 24);
        // 30 / 0.8 * 0.5 = 18.75
        assert_eq!(result.damage_to_attacker, 19);
    }

    #[test]
    fn test_wounded_attacker_hits_softer() {
        // ratio = 4 / 8 = 0.5
        let result = fight(side(8, 50), side(8, 100), Fixed::ZERO);
        assert_eq!(result.damage_to_defender, 15);
        assert_eq!(result.damage_to_attacker, 30);
    }

    #[test]
    fn test_damage_clamped_to_health() {
        let result = fight(side(20, 100), side(8, 10), Fixed::ZERO);
        assert_eq!(result.damage_to_defender, 10);
        assert!(!result.defender_survives);

        let result = fight(side(1, 5), side(30, 100), Fixed::ZERO);
        assert_eq!(result.damage_to_attacker, 5);
        assert!(!result.attacker_survives);
    }

    #[test]
    fn test_zero_strength_attacker_takes_full_counter() {
        let result = fight(side(0, 40), side(8, 100), Fixed::ZERO);
        assert_eq!(result.damage_to_defender, 0);
        assert_eq!(result.damage_to_attacker, 40);
        assert!(!result.attacker_survives);
    }

    #[test]
    fn test_degenerate_inputs_do_not_panic() {
        let broken = Combatant {
            strength: u32::MAX,
            health: u32::MAX,
            max_health: 0,
        };
        let _ = fight(broken, side(8, 100), Fixed::MAX);
        let _ = fight(side(u32::MAX, 100), side(1, 1), Fixed::ZERO);
        let _ = fight(side(1, 1), side(u32::MAX, 100), Fixed::MAX);
    }

    #[test]
    fn test_bit_reproducible() {
        let a = fight(side(7, 63), side(11, 81), quarters(2));
        let b = fight(side(7, 63), side(11, 81), quarters(2));
        assert_eq!(a, b);
    }
}
