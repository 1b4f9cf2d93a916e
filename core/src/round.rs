use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won | Lost (the very first action ends the round)
/// - InProgress -> Won | Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl RoundState {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    MineTriggered(Coord2),
    Shot { slot: usize },
    Mauled { slot: usize },
    FieldCleared,
    AdversariesDefeated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Cells opened by one reveal, the clicked cell first.
    Revealed { cells: Vec<Coord2> },
    FlagChanged { coords: Coord2, flagged: bool },
    PlayerMoved { from: Coord2, to: Coord2, boosted: bool },
    TeleportArmed,
    PlayerTeleported { from: Coord2, to: Coord2 },
    TurnPassed { turn: u32 },
    BoostRegenerated { meter: u8 },
    AdversarySpawned { slot: usize, at: Coord2 },
    ProjectileFired { slot: usize, direction: Direction },
    AdversaryDefeated { slot: usize, at: Coord2 },
    RoundEnded { state: RoundState, cause: EndCause },
}

/// Everything one command changed; empty when the command was rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    events: SmallVec<[RoundEvent; 4]>,
}

impl TurnReport {
    pub fn events(&self) -> &[RoundEvent] {
        &self.events
    }

    pub fn has_update(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn is_rejected(&self) -> bool {
        self.events.is_empty()
    }

    /// How the round ended, when this command ended it.
    pub fn ending(&self) -> Option<(RoundState, EndCause)> {
        self.events.iter().find_map(|event| match *event {
            RoundEvent::RoundEnded { state, cause } => Some((state, cause)),
            _ => None,
        })
    }

    fn push(&mut self, event: RoundEvent) {
        self.events.push(event);
    }
}

/// Aggregate numbers a status panel shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    pub state: RoundState,
    pub mines_deployed: CellCount,
    pub cells_remaining: CellCount,
    pub safe_cells_remaining: CellCount,
    pub flags_placed: CellCount,
    pub boost_meter: u8,
    pub turns: u32,
    pub elapsed_secs: u32,
    pub adversaries_alive: u16,
    pub adversaries_defeated: u16,
    pub teleport_armed: bool,
    pub closed: bool,
}

/// Drives one round from the first action to a win or loss.
#[derive(Clone, Debug)]
pub struct RoundController<D = RandomDice> {
    config: GameConfig,
    grid: Grid,
    dice: D,
    state: RoundState,
    end_cause: Option<EndCause>,
    player: Option<Coord2>,
    roster: Vec<Adversary>,
    turns: u32,
    boost_meter: u8,
    teleport_armed: bool,
    adversaries_defeated: u16,
    closed: bool,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl<D: Dice> RoundController<D> {
    /// Sets up a fresh board, deploying the configured mines away from the player's start.
    pub fn new(config: GameConfig, mut dice: D) -> Result<Self> {
        config.validate()?;
        let mut grid = Grid::new(config.size)?;
        grid.deploy_mines(config.mines, config.player_start(), &mut dice)?;
        Self::with_grid(config, grid, dice)
    }

    /// Plays on a board whose mines are already in place; the board decides size and mine count.
    pub fn with_grid(mut config: GameConfig, mut grid: Grid, dice: D) -> Result<Self> {
        config.size = grid.size();
        config.mines = grid.mines_deployed();
        if config.mode == Mode::Adversary {
            config.rules.validate()?;
        }

        let player = config.player_start();
        if let Some(start) = player {
            grid.validate_coords(start)?;
            grid.set_player(start, true);
        }

        log::debug!(
            "New {:?} round on {:?} with {} mines",
            config.mode,
            config.size,
            config.mines
        );
        Ok(Self {
            config,
            grid,
            dice,
            state: Default::default(),
            end_cause: None,
            player,
            roster: Vec::new(),
            turns: 0,
            boost_meter: 0,
            teleport_armed: false,
            adversaries_defeated: 0,
            closed: false,
            started_at: None,
            ended_at: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn end_cause(&self) -> Option<EndCause> {
        self.end_cause
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        self.grid.cell_at(coords)
    }

    pub fn player(&self) -> Option<Coord2> {
        self.player
    }

    /// Every adversary spawned this round, indexed by slot; defeated ones stay in place.
    pub fn adversaries(&self) -> &[Adversary] {
        &self.roster
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn boost_meter(&self) -> u8 {
        self.boost_meter
    }

    pub fn teleport_armed(&self) -> bool {
        self.teleport_armed
    }

    pub fn adversaries_defeated(&self) -> u16 {
        self.adversaries_defeated
    }

    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Seconds taken to win; lower is better. `None` unless the round was won.
    pub fn score(&self) -> Option<u32> {
        matches!(self.state, RoundState::Won).then(|| self.elapsed_secs())
    }

    /// Hands the score of a won round to a ranked list, as its most recent entry.
    pub fn submit_score(&self, list: &mut RankedScoreList, name: impl Into<String>) -> Option<usize> {
        let score = self.score()?;
        let rank = list.insert(score, name, true);
        log::debug!("Submitted score {} at rank {:?}", score, rank);
        rank
    }

    pub fn stats(&self) -> RoundStats {
        RoundStats {
            state: self.state,
            mines_deployed: self.grid.mines_deployed(),
            cells_remaining: self.grid.hidden_cells(),
            safe_cells_remaining: self.grid.remaining_hidden_safe_cells(),
            flags_placed: self.grid.flagged_count(),
            boost_meter: self.boost_meter,
            turns: self.turns,
            elapsed_secs: self.elapsed_secs(),
            adversaries_alive: self.roster.iter().filter(|a| a.is_alive()).count() as u16,
            adversaries_defeated: self.adversaries_defeated,
            teleport_armed: self.teleport_armed,
            closed: self.closed,
        }
    }

    /// Reveals a cell, cascading through clear regions. Clicking a flag removes it instead.
    ///
    /// In adversary mode only the cell under the player can be revealed.
    pub fn reveal(&mut self, coords: Coord2) -> Result<TurnReport> {
        let coords = self.grid.validate_coords(coords)?;
        let mut report = TurnReport::default();

        if !self.accepts_commands() || !self.can_reach(coords) {
            return Ok(report);
        }

        if self.grid[coords].is_flagged() {
            self.grid.toggle_flag(coords)?;
            self.mark_started();
            report.push(RoundEvent::FlagChanged {
                coords,
                flagged: false,
            });
            return Ok(report);
        }

        match self.grid.reveal_unchecked(coords) {
            RevealOutcome::AlreadyRevealed => {}
            RevealOutcome::RevealedMine => {
                self.mark_started();
                self.grid.mark_killed_by_mine(coords);
                report.push(RoundEvent::Revealed {
                    cells: vec![coords],
                });
                self.end_round(RoundState::Lost, EndCause::MineTriggered(coords), &mut report);
            }
            RevealOutcome::RevealedSafe => {
                self.mark_started();
                let mut cells = vec![coords];
                cells.extend(self.grid.propagate_reveal(coords));
                log::trace!("Revealed {} cells from {:?}", cells.len(), coords);
                report.push(RoundEvent::Revealed { cells });

                if self.grid.remaining_hidden_safe_cells() == 0 {
                    self.end_round(RoundState::Won, EndCause::FieldCleared, &mut report);
                }
            }
        }

        Ok(report)
    }

    /// Flags or unflags a hidden cell; never ends the round.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<TurnReport> {
        let coords = self.grid.validate_coords(coords)?;
        let mut report = TurnReport::default();

        if !self.accepts_commands() || !self.can_reach(coords) {
            return Ok(report);
        }

        if self.grid.toggle_flag(coords)?.has_update() {
            self.mark_started();
            report.push(RoundEvent::FlagChanged {
                coords,
                flagged: self.grid[coords].is_flagged(),
            });
        }

        Ok(report)
    }

    /// Moves the player one cell, or two when `boosted` and the meter allows, then plays the turn.
    pub fn step(&mut self, direction: Direction, boosted: bool) -> TurnReport {
        let mut report = TurnReport::default();
        let Some(from) = self.player else {
            return report;
        };
        if !self.accepts_commands() {
            return report;
        }

        let cost = self.config.rules.boost_step_cost;
        if boosted && self.boost_meter < cost {
            return report;
        }
        let distance = if boosted { 2 } else { 1 };
        let Some(to) = direction.offset(from, distance, self.grid.size()) else {
            return report;
        };

        if boosted {
            self.boost_meter -= cost;
        }
        self.move_player(from, to);
        report.push(RoundEvent::PlayerMoved { from, to, boosted });
        self.finish_turn(&mut report);
        report
    }

    /// Lets a turn pass with the player standing still.
    pub fn advance_tick(&mut self) -> TurnReport {
        let mut report = TurnReport::default();
        if self.player.is_some() && self.accepts_commands() {
            self.finish_turn(&mut report);
        }
        report
    }

    /// Arms a teleport; the next [`teleport_to`](Self::teleport_to) picks the destination.
    pub fn request_teleport(&mut self) -> TurnReport {
        let mut report = TurnReport::default();
        if self.player.is_none() || !self.accepts_commands() || self.teleport_armed {
            return report;
        }

        if self.boost_meter >= self.config.rules.teleport_cost {
            self.teleport_armed = true;
            report.push(RoundEvent::TeleportArmed);
        }
        report
    }

    /// Jumps to any cell without spending a turn.
    pub fn teleport_to(&mut self, coords: Coord2) -> Result<TurnReport> {
        let to = self.grid.validate_coords(coords)?;
        let mut report = TurnReport::default();
        let Some(from) = self.player else {
            return Ok(report);
        };

        let cost = self.config.rules.teleport_cost;
        if !self.accepts_commands() || !self.teleport_armed || self.boost_meter < cost {
            return Ok(report);
        }

        self.teleport_armed = false;
        self.boost_meter -= cost;
        self.move_player(from, to);
        self.mark_started();
        report.push(RoundEvent::PlayerTeleported { from, to });
        Ok(report)
    }

    /// Closes the round; every later command is ignored.
    pub fn quit(&mut self) {
        if !self.closed {
            log::debug!("Round closed in state {:?}", self.state);
            self.closed = true;
        }
    }

    fn accepts_commands(&self) -> bool {
        !self.closed && !self.state.is_final()
    }

    fn can_reach(&self, coords: Coord2) -> bool {
        self.player.is_none_or(|player| player == coords)
    }

    fn move_player(&mut self, from: Coord2, to: Coord2) {
        self.grid.set_player(from, false);
        self.grid.set_player(to, true);
        self.player = Some(to);
    }

    fn finish_turn(&mut self, report: &mut TurnReport) {
        self.mark_started();
        self.turns += 1;
        report.push(RoundEvent::TurnPassed { turn: self.turns });

        let rules = self.config.rules;
        if self.turns.is_multiple_of(rules.boost_regen_interval)
            && self.boost_meter < rules.boost_cap
        {
            self.boost_meter += 1;
            report.push(RoundEvent::BoostRegenerated {
                meter: self.boost_meter,
            });
        }

        if (self.roster.is_empty() || self.turns.is_multiple_of(rules.spawn_interval))
            && self.roster.len() < usize::from(rules.roster_cap)
        {
            self.spawn_adversary(report);
        }

        self.advance_adversaries(report);
    }

    fn spawn_adversary(&mut self, report: &mut TurnReport) {
        let Some(player) = self.player else {
            return;
        };

        let at = Adversary::spawn_corner(player, self.grid.size());
        let slot = self.roster.len();
        self.roster.push(Adversary::new(at));
        self.grid.add_monster(at);
        log::debug!("Adversary {} spawned at {:?} on turn {}", slot, at, self.turns);
        report.push(RoundEvent::AdversarySpawned { slot, at });
    }

    fn advance_adversaries(&mut self, report: &mut TurnReport) {
        let Some(player) = self.player else {
            return;
        };
        let size = self.grid.size();
        let rules = self.config.rules;
        let mut detonated = false;
        let mut ending = None;

        self.mark_projectiles(false);
        for (slot, adversary) in self.roster.iter_mut().enumerate() {
            if !adversary.is_alive() {
                continue;
            }

            self.grid.remove_monster(adversary.position());
            let action = adversary.take_turn(player, size, &rules, &mut self.dice);
            if let TickAction::Fired(direction) = action {
                log::trace!("Adversary {} fired {:?}", slot, direction);
                report.push(RoundEvent::ProjectileFired { slot, direction });
            }

            let position = adversary.position();
            self.grid.add_monster(position);
            let shot = action.swept_off_board(player)
                || adversary
                    .projectile()
                    .is_some_and(|projectile| projectile.hits(player));
            if shot {
                ending = Some((RoundState::Lost, EndCause::Shot { slot }));
                break;
            }

            if position == player {
                if self.grid[player].is_armed_mine() {
                    adversary.kill();
                    self.grid.remove_monster(position);
                    self.adversaries_defeated += 1;
                    detonated = true;
                    log::debug!("Adversary {} blown up at {:?}", slot, position);
                    report.push(RoundEvent::AdversaryDefeated { slot, at: position });
                } else {
                    ending = Some((RoundState::Lost, EndCause::Mauled { slot }));
                    break;
                }
            }
        }
        self.mark_projectiles(true);

        if detonated {
            self.grid.consume_mine(player);
        }

        if let Some((state, cause)) = ending {
            self.end_round(state, cause, report);
        } else if detonated && self.adversaries_defeated >= rules.roster_cap {
            self.end_round(RoundState::Won, EndCause::AdversariesDefeated, report);
        }
    }

    /// Sets or clears the bullet and trailing markers of every projectile in flight.
    fn mark_projectiles(&mut self, on: bool) {
        for projectile in self.roster.iter().filter_map(Adversary::projectile) {
            self.grid.set_bullet(projectile.position(), on);
            self.grid.set_trailing(projectile.corridor(), on);
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, RoundState::NotStarted) {
            let now = Utc::now();
            log::debug!("started at {}", now);
            self.started_at.replace(now);
            self.state = RoundState::InProgress;
        }
    }

    fn end_round(&mut self, state: RoundState, cause: EndCause, report: &mut TurnReport) {
        if self.state.is_final() {
            return;
        }

        let now = Utc::now();
        if self.started_at.is_none() {
            self.started_at.replace(now);
        }
        self.ended_at.replace(now);
        self.state = state;
        self.end_cause = Some(cause);
        self.teleport_armed = false;
        log::debug!("ended at {} as {:?} ({:?})", now, state, cause);

        match state {
            RoundState::Won => self.grid.place_flags_on_all_mines(),
            _ => self.grid.reveal_all_mines(),
        }
        report.push(RoundEvent::RoundEnded { state, cause });
    }
}
