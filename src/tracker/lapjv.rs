//! Rectangular linear assignment by shortest augmenting paths (Jonker-Volgenant).
//!
//! Augmentation always starts from the smaller side of the matrix, so an m×n
//! problem is solved without materialising the square padding. The result is
//! the same optimum a constant-cost padded square matrix would give.

use ndarray::{Array2, ArrayView2};

/// Cost used in place of NaN or infinite entries.
pub const LARGE_COST: f64 = 1e6;

const NONE: usize = usize::MAX;

/// Solve the minimum-cost assignment for `cost` (rows × columns).
///
/// Returns, for each row, the column assigned to it. When there are more rows
/// than columns the surplus rows are `None`. Deterministic for a given input.
pub fn lapjv(cost: ArrayView2<'_, f32>) -> Vec<Option<usize>> {
    let (num_rows, num_cols) = cost.dim();
    if num_rows == 0 || num_cols == 0 {
        return vec![None; num_rows];
    }

    let sanitize = |c: f32| {
        let c = c as f64;
        if c.is_finite() { c } else { LARGE_COST }
    };

    if num_rows <= num_cols {
        let costs = cost.mapv(sanitize);
        Solver::new(&costs)
            .solve()
            .into_iter()
            .map(|col| (col != NONE).then_some(col))
            .collect()
    } else {
        let costs = cost.t().mapv(sanitize);
        let mut row_to_col = vec![None; num_rows];
        for (col, row) in Solver::new(&costs).solve().into_iter().enumerate() {
            if row != NONE {
                row_to_col[row] = Some(col);
            }
        }
        row_to_col
    }
}

/// Sum of `cost` over an assignment returned by [`lapjv`].
pub fn assignment_cost(cost: ArrayView2<'_, f32>, row_to_col: &[Option<usize>]) -> f64 {
    row_to_col
        .iter()
        .enumerate()
        .filter_map(|(i, col)| col.map(|j| cost[[i, j]] as f64))
        .sum()
}

/// Solver state for a matrix with `rows <= cols`.
struct Solver<'a> {
    cost: &'a Array2<f64>,
    u: Vec<f64>,
    v: Vec<f64>,
    shortest: Vec<f64>,
    path: Vec<usize>,
    col4row: Vec<usize>,
    row4col: Vec<usize>,
    visited_rows: Vec<bool>,
    visited_cols: Vec<bool>,
    remaining: Vec<usize>,
}

impl<'a> Solver<'a> {
    fn new(cost: &'a Array2<f64>) -> Self {
        let (nr, nc) = cost.dim();
        debug_assert!(nr <= nc);
        Self {
            cost,
            u: vec![0.0; nr],
            v: vec![0.0; nc],
            shortest: vec![f64::INFINITY; nc],
            path: vec![NONE; nc],
            col4row: vec![NONE; nr],
            row4col: vec![NONE; nc],
            visited_rows: vec![false; nr],
            visited_cols: vec![false; nc],
            remaining: vec![0; nc],
        }
    }

    fn solve(mut self) -> Vec<usize> {
        let (nr, nc) = self.cost.dim();

        for cur_row in 0..nr {
            // Unreachable with finite costs and nr <= nc.
            let Some((sink, min_val)) = self.augmenting_path(cur_row) else {
                break;
            };

            // Update dual variables.
            self.u[cur_row] += min_val;
            for i in 0..nr {
                if self.visited_rows[i] && i != cur_row {
                    self.u[i] += min_val - self.shortest[self.col4row[i]];
                }
            }
            for j in 0..nc {
                if self.visited_cols[j] {
                    self.v[j] -= min_val - self.shortest[j];
                }
            }

            // Flip the alternating path back to cur_row.
            let mut j = sink;
            loop {
                let i = self.path[j];
                self.row4col[j] = i;
                std::mem::swap(&mut self.col4row[i], &mut j);
                if i == cur_row {
                    break;
                }
            }
        }

        self.col4row
    }

    /// Dijkstra-style search over reduced costs for the cheapest path from
    /// `start_row` to an unassigned column.
    fn augmenting_path(&mut self, start_row: usize) -> Option<(usize, f64)> {
        let nc = self.v.len();
        let mut min_val = 0.0;

        // Reverse order keeps the search identical to the square-matrix variant.
        let mut num_remaining = nc;
        for (it, slot) in self.remaining.iter_mut().enumerate() {
            *slot = nc - it - 1;
        }
        self.visited_rows.fill(false);
        self.visited_cols.fill(false);
        self.shortest.fill(f64::INFINITY);

        let mut i = start_row;
        loop {
            self.visited_rows[i] = true;

            let mut index = NONE;
            let mut lowest = f64::INFINITY;
            for it in 0..num_remaining {
                let j = self.remaining[it];
                let reduced = min_val + self.cost[[i, j]] - self.u[i] - self.v[j];
                if reduced < self.shortest[j] {
                    self.path[j] = i;
                    self.shortest[j] = reduced;
                }
                if self.shortest[j] < lowest
                    || (self.shortest[j] == lowest && self.row4col[j] == NONE)
                {
                    lowest = self.shortest[j];
                    index = it;
                }
            }

            min_val = lowest;
            if index == NONE || !min_val.is_finite() {
                return None;
            }

            let j = self.remaining[index];
            self.visited_cols[j] = true;
            num_remaining -= 1;
            self.remaining[index] = self.remaining[num_remaining];

            if self.row4col[j] == NONE {
                return Some((j, min_val));
            }
            i = self.row4col[j];
        }
    }
}
