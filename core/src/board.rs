use std::collections::{HashSet, VecDeque};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Outcome of a reveal action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Target was flagged or already revealed; nothing happened.
    NoChange,
    Revealed,
    /// A mine was hit; every mine is now shown and the board is dead.
    Loss,
    /// The last safe cell was revealed; remaining mines are force-flagged.
    Win,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Loss | Self::Win)
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Saved per-cell display state for the pause round-trip. Adjacency counts
/// live in the immutable [`MineField`], so the grid alone captures the
/// (revealed, flagged, count) triple exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    grid: Array2<CellView>,
}

/// The playing grid over a fixed [`MineField`]: reveal with flood fill,
/// flag toggling, and win/loss bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    minefield: MineField,
    grid: Array2<CellView>,
    revealed_count: CellCount,
    flagged_count: CellCount,
}

impl Board {
    pub fn new(minefield: MineField) -> Self {
        let grid = Array2::default(minefield.size().nd());
        Self {
            minefield,
            grid,
            revealed_count: 0,
            flagged_count: 0,
        }
    }

    pub fn generate(config: GameConfig, generator: impl MineFieldGenerator) -> Result<Self> {
        Ok(Self::new(generator.generate(config)?))
    }

    pub fn size(&self) -> Pos {
        self.minefield.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.minefield.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus flags placed; negative when the player has over-flagged.
    pub fn mines_left(&self) -> i64 {
        self.minefield.mine_count() as i64 - self.flagged_count as i64
    }

    pub fn cell_at(&self, pos: Pos) -> CellView {
        self.grid[pos.nd()]
    }

    pub fn contains_mine(&self, pos: Pos) -> bool {
        self.minefield.contains_mine(pos)
    }

    /// All mine positions, for debug rendering. Does not mutate the grid.
    pub fn mine_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.minefield.mine_positions()
    }

    /// Win holds exactly when no hidden safe cell remains.
    pub fn is_won(&self) -> bool {
        self.revealed_count == self.minefield.safe_cell_count()
    }

    /// Flips `Hidden <-> Flagged`. Revealed cells are never flagged.
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        let pos = self.minefield.check_bounds(pos)?;

        Ok(match self.grid[pos.nd()] {
            CellView::Hidden => {
                self.grid[pos.nd()] = CellView::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Changed
            }
            CellView::Flagged => {
                self.grid[pos.nd()] = CellView::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Changed
            }
            _ => FlagOutcome::NoChange,
        })
    }

    /// Reveals a hidden cell. Hitting a mine shows every mine and returns
    /// [`RevealOutcome::Loss`]; a zero-count cell flood-fills its region;
    /// revealing the last safe cell returns [`RevealOutcome::Win`].
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let pos = self.minefield.check_bounds(pos)?;

        if self.grid[pos.nd()] != CellView::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        if self.minefield.contains_mine(pos) {
            log::debug!("mine hit at {pos:?}");
            self.reveal_all_mines();
            return Ok(RevealOutcome::Loss);
        }

        self.reveal_safe(pos);

        if self.is_won() {
            self.flag_remaining_mines();
            Ok(RevealOutcome::Win)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Reveals one safe cell and, when its count is zero, breadth-first
    /// propagates across the zero region. Neighbors are revealed when hidden
    /// (not flagged, not mines); zero-count neighbors are enqueued, numbered
    /// ones stop propagation. Each cell enters the queue at most once.
    fn reveal_safe(&mut self, pos: Pos) {
        let count = self.minefield.adjacent_count(pos);
        self.grid[pos.nd()] = CellView::Revealed(count);
        self.revealed_count += 1;
        log::trace!("revealed {pos:?}, adjacent mines: {count}");

        if count > 0 {
            return;
        }

        let mut visited = HashSet::from([pos]);
        let mut queue = VecDeque::from([pos]);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.minefield.neighbors_of(current) {
                if !visited.insert(neighbor) {
                    continue;
                }
                if self.grid[neighbor.nd()] != CellView::Hidden
                    || self.minefield.contains_mine(neighbor)
                {
                    continue;
                }

                let neighbor_count = self.minefield.adjacent_count(neighbor);
                self.grid[neighbor.nd()] = CellView::Revealed(neighbor_count);
                self.revealed_count += 1;

                if neighbor_count == 0 {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    /// Loss transition: every mine is shown. A flag placed on a mine stays
    /// visible with the mine under it; flags elsewhere are untouched.
    fn reveal_all_mines(&mut self) {
        let mine_positions: Vec<Pos> = self.minefield.mine_positions().collect();
        for pos in mine_positions {
            self.grid[pos.nd()] = match self.grid[pos.nd()] {
                CellView::Flagged | CellView::FlaggedMine => CellView::FlaggedMine,
                _ => CellView::Mine,
            };
        }
    }

    /// Win normalization: any still-unflagged mine gets a flag so the
    /// remaining-mine counter reads zero.
    fn flag_remaining_mines(&mut self) {
        let mine_positions: Vec<Pos> = self.minefield.mine_positions().collect();
        for pos in mine_positions {
            if self.grid[pos.nd()] == CellView::Hidden {
                self.grid[pos.nd()] = CellView::Flagged;
                self.flagged_count += 1;
            }
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            grid: self.grid.clone(),
        }
    }

    /// Masks every cell with a uniform revealed-looking blank, hiding flags
    /// and numbers while paused. The caller keeps the snapshot.
    pub fn mask_all(&mut self) {
        self.grid.fill(CellView::Revealed(0));
    }

    pub fn restore(&mut self, snapshot: BoardSnapshot) {
        self.grid = snapshot.grid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Pos, mines: &[Pos]) -> Board {
        Board::new(MineField::from_mine_positions(size, mines).unwrap())
    }

    #[test]
    fn revealing_a_numbered_cell_does_not_propagate() {
        // 3x3, single center mine: every corner shows 1 and stays alone
        let mut b = board((3, 3), &[(1, 1)]);

        assert_eq!(b.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(b.cell_at((0, 0)), CellView::Revealed(1));
        assert_eq!(b.revealed_count(), 1);
        assert!(!b.is_won());
        for pos in [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert_eq!(b.cell_at(pos), CellView::Hidden);
        }
    }

    #[test]
    fn flood_fill_opens_the_maximal_zero_region_and_its_border() {
        // mine wall down column 2 separates the two halves of a 5x5 board
        let wall = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        let mut b = board((5, 5), &wall);

        assert_eq!(b.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);

        for row in 0..5 {
            assert_eq!(b.cell_at((row, 0)), CellView::Revealed(0));
            assert!(matches!(b.cell_at((row, 1)), CellView::Revealed(n) if n > 0));
            // the far side of the wall stays untouched
            assert_eq!(b.cell_at((row, 3)), CellView::Hidden);
            assert_eq!(b.cell_at((row, 4)), CellView::Hidden);
        }
    }

    #[test]
    fn flood_fill_is_confluent() {
        let wall = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        let mut from_top = board((5, 5), &wall);
        let mut from_bottom = board((5, 5), &wall);

        from_top.reveal((0, 0)).unwrap();
        from_bottom.reveal((4, 0)).unwrap();

        assert_eq!(from_top, from_bottom);
    }

    #[test]
    fn flagged_cell_cannot_be_revealed_until_unflagged() {
        let mut b = board((3, 3), &[(1, 1)]);

        b.toggle_flag((0, 0)).unwrap();
        let before = b.clone();
        assert_eq!(b.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(b, before);

        b.toggle_flag((0, 0)).unwrap();
        assert_eq!(b.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let wall = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
        let mut b = board((5, 5), &wall);

        b.toggle_flag((2, 0)).unwrap();
        b.reveal((0, 0)).unwrap();

        assert_eq!(b.cell_at((2, 0)), CellView::Flagged);
        assert_eq!(b.cell_at((1, 0)), CellView::Revealed(0));
        // the flag severs the zero region; cells past it stay hidden
        assert_eq!(b.cell_at((3, 0)), CellView::Hidden);
        assert_eq!(b.cell_at((4, 0)), CellView::Hidden);
    }

    #[test]
    fn flag_toggle_ignores_revealed_cells() {
        let mut b = board((3, 3), &[(1, 1)]);
        b.reveal((0, 0)).unwrap();

        assert_eq!(b.toggle_flag((0, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(b.cell_at((0, 0)), CellView::Revealed(1));
        assert_eq!(b.flagged_count(), 0);
    }

    #[test]
    fn mines_left_goes_negative_when_over_flagged() {
        let mut b = board((3, 3), &[(1, 1)]);
        b.toggle_flag((0, 0)).unwrap();
        b.toggle_flag((0, 1)).unwrap();
        assert_eq!(b.mines_left(), -1);
    }

    #[test]
    fn hitting_a_mine_reveals_every_mine_and_keeps_flags() {
        let mut b = board((3, 3), &[(0, 0), (2, 2)]);

        b.toggle_flag((0, 0)).unwrap();
        b.toggle_flag((1, 1)).unwrap();
        assert_eq!(b.reveal((2, 2)).unwrap(), RevealOutcome::Loss);

        assert_eq!(b.cell_at((0, 0)), CellView::FlaggedMine);
        assert_eq!(b.cell_at((2, 2)), CellView::Mine);
        // a wrong flag on a safe cell is left as the player placed it
        assert_eq!(b.cell_at((1, 1)), CellView::Flagged);
    }

    #[test]
    fn win_requires_every_safe_cell_and_force_flags_mines() {
        let mut b = board((2, 1), &[(0, 0)]);

        assert_eq!(b.reveal((1, 0)).unwrap(), RevealOutcome::Win);
        assert!(b.is_won());
        assert_eq!(b.cell_at((0, 0)), CellView::Flagged);
        assert_eq!(b.mines_left(), 0);
    }

    #[test]
    fn zero_mine_board_wins_in_one_reveal() {
        let mut b = board((3, 3), &[]);
        assert_eq!(b.reveal((1, 1)).unwrap(), RevealOutcome::Win);
        assert_eq!(b.revealed_count(), 9);
    }

    #[test]
    fn out_of_bounds_is_a_typed_rejection() {
        let mut b = board((3, 3), &[(1, 1)]);
        assert_eq!(
            b.reveal((3, 0)),
            Err(GameError::OutOfBounds { row: 3, col: 0 })
        );
        assert_eq!(
            b.toggle_flag((0, 7)),
            Err(GameError::OutOfBounds { row: 0, col: 7 })
        );
    }

    #[test]
    fn snapshot_mask_restore_round_trips_bit_for_bit() {
        let mut b = board((3, 3), &[(1, 1)]);
        b.reveal((0, 0)).unwrap();
        b.toggle_flag((2, 2)).unwrap();

        let before = b.clone();
        let snapshot = b.snapshot();
        b.mask_all();
        assert!((0..3).all(|r| (0..3).all(|c| b.cell_at((r, c)) == CellView::Revealed(0))));
        // counters are untouched by the visual mask
        assert_eq!(b.flagged_count(), before.flagged_count());

        b.restore(snapshot);
        assert_eq!(b, before);
    }

    #[test]
    fn board_serde_round_trip() {
        let mut b = board((3, 3), &[(1, 1)]);
        b.reveal((0, 0)).unwrap();
        b.toggle_flag((2, 2)).unwrap();

        let json = serde_json::to_string(&b).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
