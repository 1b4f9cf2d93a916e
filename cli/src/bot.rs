use minestalker_core::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Reveal(Coord2),
    Flag(Coord2),
    Step(Direction, bool),
    Teleport(Coord2),
    Wait,
}

/// Autoplayer: single-cell deductions in classic mode, evasion in adversary mode.
pub(crate) struct Bot {
    rng: SmallRng,
}

impl Bot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Plays until the round ends or `max_actions` commands were issued; returns how many were.
    pub(crate) fn play<D: Dice>(&mut self, round: &mut RoundController<D>, max_actions: u32) -> Result<u32> {
        let mut actions = 0;
        while !round.is_finished() && actions < max_actions {
            let action = match round.player() {
                Some(player) => self.evade(round, player),
                None => self.deduce(round.grid()),
            };
            let Some(action) = action else {
                break;
            };
            log::trace!("Bot plays {:?}", action);

            let report = match action {
                Action::Reveal(coords) => round.reveal(coords)?,
                Action::Flag(coords) => round.toggle_flag(coords)?,
                Action::Step(direction, boosted) => round.step(direction, boosted),
                Action::Teleport(coords) => {
                    round.request_teleport();
                    round.teleport_to(coords)?
                }
                Action::Wait => round.advance_tick(),
            };
            if report.is_rejected() {
                log::warn!("Bot action {:?} was rejected", action);
                break;
            }
            actions += 1;
        }
        Ok(actions)
    }

    fn deduce(&mut self, grid: &Grid) -> Option<Action> {
        for (coords, cell) in grid.iter_cells() {
            if !cell.is_revealed() || cell.is_mine() || cell.neighbor_mine_count() == 0 {
                continue;
            }

            let (hidden, flagged): (Vec<Coord2>, Vec<Coord2>) = grid
                .iter_neighbors(coords)
                .filter(|&n| !grid[n].is_revealed())
                .partition(|&n| !grid[n].is_flagged());
            let Some(&first) = hidden.first() else {
                continue;
            };

            let mines = usize::from(cell.neighbor_mine_count());
            if flagged.len() == mines {
                return Some(Action::Reveal(first));
            }
            if flagged.len() + hidden.len() == mines {
                return Some(Action::Flag(first));
            }
        }

        let candidates: Vec<Coord2> = grid
            .iter_cells()
            .filter(|(_, cell)| !cell.is_revealed() && !cell.is_flagged())
            .map(|(coords, _)| coords)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(Action::Reveal(candidates[self.rng.random_range(0..candidates.len())]))
    }

    fn evade<D: Dice>(&mut self, round: &RoundController<D>, player: Coord2) -> Option<Action> {
        let size = round.grid().size();
        let rules = round.config().rules;
        let threat = |at: Coord2| -> CellCount {
            round
                .adversaries()
                .iter()
                .filter(|adversary| adversary.is_alive())
                .map(|adversary| manhattan(adversary.position(), at))
                .min()
                .unwrap_or(CellCount::MAX)
        };

        let nearest = threat(player);
        if nearest <= 1 && round.boost_meter() >= rules.teleport_cost {
            let corners = [(0, 0), (0, size.1 - 1), (size.0 - 1, 0), (size.0 - 1, size.1 - 1)];
            return corners.into_iter().max_by_key(|&corner| threat(corner)).map(Action::Teleport);
        }

        let boosted = nearest <= 3 && round.boost_meter() >= rules.boost_step_cost;
        let distance = if boosted { 2 } else { 1 };
        let best = Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                let to = direction.offset(player, distance, size)?;
                let in_line = round.adversaries().iter().any(|adversary| {
                    adversary
                        .projectile()
                        .is_some_and(|p| p.position().0 == to.0 || p.position().1 == to.1)
                });
                Some((threat(to), !in_line, self.rng.random::<u8>(), direction))
            })
            .max();

        match best {
            Some((score, _, _, direction)) if score > nearest || nearest == CellCount::MAX => {
                Some(Action::Step(direction, boosted))
            }
            Some((_, _, _, direction)) if nearest <= 2 => Some(Action::Step(direction, boosted)),
            _ => Some(Action::Wait),
        }
    }
}
