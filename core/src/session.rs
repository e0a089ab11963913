use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::*;

/// Terminal result of a play-through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Won,
    Lost,
}

/// Session lifecycle. The pause snapshot travels inside the state so an
/// unpaused session cannot hold a stale one and a paused session cannot
/// lack one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Paused { snapshot: BoardSnapshot },
    Over(GameResult),
}

impl SessionState {
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_paused(&self) -> bool {
        matches!(self, Self::Paused { .. })
    }

    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Over(_))
    }
}

/// Play-time accumulator. While running it adds the live delta since the
/// last baseline; freezing folds that delta into `accumulated`, so paused
/// and post-game intervals are never counted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameClock {
    accumulated: Duration,
    #[serde(skip)]
    running_since: Option<Instant>,
}

impl GameClock {
    pub fn start() -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: Some(Instant::now()),
        }
    }

    /// A stopped clock with a fixed reading, for tests and restored games.
    pub const fn frozen(accumulated: Duration) -> Self {
        Self {
            accumulated,
            running_since: None,
        }
    }

    pub const fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn freeze(&mut self) {
        if let Some(baseline) = self.running_since.take() {
            self.accumulated += baseline.elapsed();
        }
    }

    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn elapsed(&self) -> Duration {
        let live = self
            .running_since
            .map(|baseline| baseline.elapsed())
            .unwrap_or_default();
        self.accumulated + live
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed().as_secs() as u32
    }
}

/// One play-through: a board, its clock, the player, and the state machine
/// gating every action. Owns the board exclusively for its lifetime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,
    player: String,
    board: Board,
    clock: GameClock,
    state: SessionState,
}

impl GameSession {
    pub fn new(config: GameConfig, player: impl Into<String>, seed: u64) -> Result<Self> {
        let board = Board::generate(config, ScatterGenerator::new(seed))?;
        Ok(Self::with_board(config, player, board))
    }

    /// Wraps an already-built board, for tests and deterministic replays.
    pub fn with_board(config: GameConfig, player: impl Into<String>, board: Board) -> Self {
        Self {
            config,
            player: player.into(),
            board,
            clock: GameClock::start(),
            state: SessionState::Active,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn result(&self) -> Option<GameResult> {
        match self.state {
            SessionState::Over(result) => Some(result),
            _ => None,
        }
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.elapsed_secs()
    }

    pub fn mines_left(&self) -> i64 {
        self.board.mines_left()
    }

    /// `(player, elapsed seconds)` for leaderboard submission, only after a
    /// win.
    pub fn score_entry(&self) -> Option<(&str, u32)> {
        match self.state {
            SessionState::Over(GameResult::Won) => {
                Some((self.player.as_str(), self.clock.elapsed_secs()))
            }
            _ => None,
        }
    }

    /// Reveals a cell. Rejected once the game is over; a silent no-op while
    /// paused (the UI hides the board, there is nothing valid to click).
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        self.check_not_over()?;
        if self.state.is_paused() {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = self.board.reveal(pos)?;
        match outcome {
            RevealOutcome::Win => self.finish(GameResult::Won),
            RevealOutcome::Loss => self.finish(GameResult::Lost),
            _ => {}
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        self.check_not_over()?;
        if self.state.is_paused() {
            return Ok(FlagOutcome::NoChange);
        }
        self.board.toggle_flag(pos)
    }

    /// Active -> Paused: snapshot the grid, mask the display, freeze the
    /// clock. Paused -> Active: restore the snapshot bit-for-bit and restart
    /// the clock baseline. Rejected on a finished game.
    pub fn toggle_pause(&mut self) -> Result<()> {
        self.check_not_over()?;

        match std::mem::replace(&mut self.state, SessionState::Active) {
            SessionState::Active => {
                let snapshot = self.board.snapshot();
                self.board.mask_all();
                self.clock.freeze();
                self.state = SessionState::Paused { snapshot };
                log::debug!("paused at {}s", self.clock.elapsed_secs());
            }
            SessionState::Paused { snapshot } => {
                self.board.restore(snapshot);
                self.clock.resume();
                log::debug!("resumed at {}s", self.clock.elapsed_secs());
            }
            over @ SessionState::Over(_) => self.state = over,
        }
        Ok(())
    }

    /// Fresh board, clock, and state from the stored configuration.
    pub fn reset(&mut self, seed: u64) -> Result<()> {
        self.board = Board::generate(self.config, ScatterGenerator::new(seed))?;
        self.clock = GameClock::start();
        self.state = SessionState::Active;
        log::debug!("session reset for {}", self.player);
        Ok(())
    }

    fn finish(&mut self, result: GameResult) {
        self.clock.freeze();
        self.state = SessionState::Over(result);
        log::debug!(
            "game over for {}: {:?} after {}s",
            self.player,
            result,
            self.clock.elapsed_secs()
        );
    }

    fn check_not_over(&self) -> Result<()> {
        if self.state.is_over() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }
}
