//! Persona-conditioned reward shaping
//!
//! Each persona rewards a different play style. Contributions are additive
//! and every event flag is independent, so several may fire on one step.
//!
//! | Persona | exit | kill | killed | treasure | move |
//! |---------|------|------|--------|----------|------|
//! | Baseline | +0.5 | | | | |
//! | Runner | +0.5 | | | | -0.01 |
//! | Survivalist | +0.5 | | -1.0 | | -0.01 |
//! | MonsterKiller | +0.5 | +1.0 | -0.5 | | -0.01 |
//! | TreasureCollector | +0.5 | | -0.5 | +1.0 | -0.01 |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, ports::GameState};

const EXIT_REWARD: f64 = 0.5;
const MOVE_COST: f64 = 0.01;

/// Reward-shaping profile of a learning agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Persona {
    #[default]
    Baseline,
    Runner,
    Survivalist,
    MonsterKiller,
    TreasureCollector,
}

impl Persona {
    pub const ALL: [Persona; 5] = [
        Persona::Baseline,
        Persona::Runner,
        Persona::Survivalist,
        Persona::MonsterKiller,
        Persona::TreasureCollector,
    ];

    /// Upper-case tag used in labels and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Baseline => "BASELINE",
            Persona::Runner => "RUNNER",
            Persona::Survivalist => "SURVIVALIST",
            Persona::MonsterKiller => "MONSTER_KILLER",
            Persona::TreasureCollector => "TREASURE_COLLECTOR",
        }
    }

    /// Scalar reward for one observed transition.
    pub fn reward(self, events: &TransitionEvents) -> f64 {
        let mut reward = 0.0;

        if events.reached_exit {
            reward += EXIT_REWARD;
        }

        match self {
            Persona::Baseline | Persona::Runner => {}
            Persona::Survivalist => {
                if events.was_killed {
                    reward -= 1.0;
                }
            }
            Persona::MonsterKiller => {
                if events.killed_monster {
                    reward += 1.0;
                }
                if events.was_killed {
                    reward -= 0.5;
                }
            }
            Persona::TreasureCollector => {
                if events.collected_treasure {
                    reward += 1.0;
                }
                if events.was_killed {
                    reward -= 0.5;
                }
            }
        }

        if events.moved && self != Persona::Baseline {
            reward -= MOVE_COST;
        }

        reward
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "baseline" => Ok(Persona::Baseline),
            "runner" => Ok(Persona::Runner),
            "survivalist" => Ok(Persona::Survivalist),
            "monsterkiller" => Ok(Persona::MonsterKiller),
            "treasurecollector" => Ok(Persona::TreasureCollector),
            _ => Err(Error::ParsePersona {
                input: input.to_string(),
                expected: "baseline, runner, survivalist, monster-killer, treasure-collector"
                    .to_string(),
            }),
        }
    }
}

/// Events observed on a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionEvents {
    pub moved: bool,
    pub killed_monster: bool,
    pub was_killed: bool,
    pub reached_exit: bool,
    pub collected_treasure: bool,
}

impl TransitionEvents {
    /// Derive the events of a step from the counters taken before it and
    /// the state after it.
    ///
    /// Every step counts as a move. The exit only counts when the game halted
    /// with the hero alive.
    pub fn between<S: GameState>(before: EventCounters, after: &S) -> Self {
        let now = EventCounters::capture(after);
        let was_killed = !after.hero_alive();
        Self {
            moved: true,
            killed_monster: now.monsters_killed > before.monsters_killed,
            was_killed,
            reached_exit: after.is_halted() && !was_killed,
            collected_treasure: now.treasures_collected > before.treasures_collected,
        }
    }
}

/// Resolved-event counters read from a game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventCounters {
    pub monsters_killed: usize,
    pub treasures_collected: usize,
}

impl EventCounters {
    pub fn capture<S: GameState>(state: &S) -> Self {
        Self {
            monsters_killed: state.monsters_killed(),
            treasures_collected: state.treasures_collected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dungeon::GridDungeon, types::Action};

    const EPS: f64 = 1e-12;

    fn events(
        moved: bool,
        killed_monster: bool,
        was_killed: bool,
        reached_exit: bool,
        collected_treasure: bool,
    ) -> TransitionEvents {
        TransitionEvents {
            moved,
            killed_monster,
            was_killed,
            reached_exit,
            collected_treasure,
        }
    }

    #[test]
    fn test_monster_killer_combined_events() {
        let reward = Persona::MonsterKiller.reward(&events(true, true, false, true, false));
        assert!((reward - 1.49).abs() < EPS);
    }

    #[test]
    fn test_baseline_ignores_everything_but_exit() {
        let all = events(true, true, true, false, true);
        assert_eq!(Persona::Baseline.reward(&all), 0.0);
        let exit = events(true, false, false, true, false);
        assert_eq!(Persona::Baseline.reward(&exit), 0.5);
    }

    #[test]
    fn test_move_cost_personas() {
        let step = events(true, false, false, false, false);
        assert_eq!(Persona::Runner.reward(&step), -0.01);
        assert_eq!(Persona::Survivalist.reward(&step), -0.01);
        assert_eq!(Persona::MonsterKiller.reward(&step), -0.01);
        assert_eq!(Persona::TreasureCollector.reward(&step), -0.01);
    }

    #[test]
    fn test_death_penalties() {
        let death = events(false, false, true, false, false);
        assert_eq!(Persona::Runner.reward(&death), 0.0);
        assert_eq!(Persona::Survivalist.reward(&death), -1.0);
        assert_eq!(Persona::MonsterKiller.reward(&death), -0.5);
        assert_eq!(Persona::TreasureCollector.reward(&death), -0.5);
    }

    #[test]
    fn test_treasure_only_rewards_collector() {
        let treasure = events(false, false, false, false, true);
        assert_eq!(Persona::TreasureCollector.reward(&treasure), 1.0);
        assert_eq!(Persona::MonsterKiller.reward(&treasure), 0.0);
    }

    #[test]
    fn test_persona_parsing() {
        assert_eq!("monster-killer".parse::<Persona>().unwrap(), Persona::MonsterKiller);
        assert_eq!("TREASURE_COLLECTOR".parse::<Persona>().unwrap(), Persona::TreasureCollector);
        assert_eq!(" Runner ".parse::<Persona>().unwrap(), Persona::Runner);
        assert!("speedrunner".parse::<Persona>().is_err());
        for persona in Persona::ALL {
            assert_eq!(persona.as_str().parse::<Persona>().unwrap(), persona);
        }
    }

    #[test]
    fn test_events_between_states() {
        let mut state = GridDungeon::from_ascii("EmrX").unwrap();

        let before = EventCounters::capture(&state);
        state.apply_action(Action::Right);
        let step = TransitionEvents::between(before, &state);
        assert!(step.moved && step.killed_monster);
        assert!(!step.collected_treasure && !step.reached_exit && !step.was_killed);

        let before = EventCounters::capture(&state);
        state.apply_action(Action::Right);
        let step = TransitionEvents::between(before, &state);
        assert!(step.collected_treasure && !step.killed_monster);

        let before = EventCounters::capture(&state);
        state.apply_action(Action::Right);
        assert!(TransitionEvents::between(before, &state).reached_exit);
    }

    #[test]
    fn test_death_is_not_an_exit() {
        let mut state = GridDungeon::from_ascii("Em").unwrap().with_hero_hitpoints(1);
        let before = EventCounters::capture(&state);
        state.apply_action(Action::Right);
        let step = TransitionEvents::between(before, &state);
        assert!(step.was_killed);
        assert!(!step.reached_exit);
    }
}
