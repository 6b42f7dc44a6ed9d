//! Balance testing utilities.
//!
//! Runs repeated attacks between unit kinds with the real combat formula
//! to check that the ruleset's strength numbers produce sensible matchups.

use civ_core::combat::{resolve_combat, CombatContext, Combatant};
use civ_core::math::Fixed;
use civ_core::rules::{Ruleset, UnitKind, UnitStats};

/// Upper bound on rounds in a duel; equal-strength stalemates stop here.
pub const MAX_ROUNDS: u32 = 50;

/// Which side won a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The unit attacking every round.
    Attacker,
    /// The unit being attacked.
    Defender,
}

/// Result of attacking the same defender round after round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelOutcome {
    /// Attacks made.
    pub rounds: u32,
    /// Attacker health left.
    pub attacker_health: u32,
    /// Defender health left.
    pub defender_health: u32,
}

impl DuelOutcome {
    /// The side still standing, or `None` for a stalemate or mutual kill.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match (self.attacker_health > 0, self.defender_health > 0) {
            (true, false) => Some(Side::Attacker),
            (false, true) => Some(Side::Defender),
            _ => None,
        }
    }
}

fn combatant(stats: &UnitStats) -> Combatant {
    Combatant {
        strength: stats.strength,
        health: stats.health,
        max_health: stats.health,
    }
}

/// Attack until one side dies or [`MAX_ROUNDS`] pass.
#[must_use]
pub fn duel(attacker: &UnitStats, defender: &UnitStats, defense_modifier: Fixed) -> DuelOutcome {
    let mut att = combatant(attacker);
    let mut def = combatant(defender);
    let mut rounds = 0;
    while rounds < MAX_ROUNDS && att.health > 0 && def.health > 0 {
        let outcome = resolve_combat(&CombatContext {
            attacker: att,
            defender: def,
            defense_modifier,
        });
        att.health -= outcome.damage_to_attacker;
        def.health -= outcome.damage_to_defender;
        rounds += 1;
    }
    DuelOutcome {
        rounds,
        attacker_health: att.health,
        defender_health: def.health,
    }
}

/// One cell of the matchup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matchup {
    /// Attacking kind.
    pub attacker: UnitKind,
    /// Defending kind.
    pub defender: UnitKind,
    /// How the duel went.
    pub outcome: DuelOutcome,
}

/// Duel every kind against every kind the ruleset defines.
#[must_use]
pub fn matchup_table(rules: &Ruleset, defense_modifier: Fixed) -> Vec<Matchup> {
    let mut results = Vec::new();
    for (attacker, a) in &rules.units {
        if a.strength == 0 {
            continue;
        }
        for (defender, d) in &rules.units {
            results.push(Matchup {
                attacker: *attacker,
                defender: *defender,
                outcome: duel(a, d, defense_modifier),
            });
        }
    }
    results
}

/// Win share of the attacker in production-cost-weighted terms: the cost of
/// defenders it beats over the cost of all defenders it faced.
#[must_use]
pub fn cost_weighted_win_rate(rules: &Ruleset, table: &[Matchup], attacker: UnitKind) -> Option<f64> {
    let cost = |kind| rules.unit_stats(kind).map_or(0, |s| s.cost);
    let mut won = 0u32;
    let mut total = 0u32;
    for m in table.iter().filter(|m| m.attacker == attacker) {
        total += cost(m.defender);
        if m.outcome.winner() == Some(Side::Attacker) {
            won += cost(m.defender);
        }
    }
    (total > 0).then(|| f64::from(won) / f64::from(total))
}
