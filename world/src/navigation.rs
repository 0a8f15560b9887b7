//! Breadth-first pathfinding used by pursuit enemies.

use std::collections::VecDeque;

use meltdown_core::CellCoord;

/// Shortest 4-connected path from `start` to `goal`.
///
/// Neighbours are explored in the fixed order south, east, north, west and
/// only cells accepted by `is_passable` are entered; the start cell itself is
/// never tested. The returned queue excludes `start` and ends with `goal`, so
/// its length equals the number of steps. Returns `None` when either endpoint
/// lies outside the grid or the goal cannot be reached.
pub(crate) fn shortest_path<F>(
    width: u32,
    height: u32,
    start: CellCoord,
    goal: CellCoord,
    mut is_passable: F,
) -> Option<VecDeque<CellCoord>>
where
    F: FnMut(CellCoord) -> bool,
{
    let width_usize = usize::try_from(width).ok()?;
    let height_usize = usize::try_from(height).ok()?;
    let cell_count = width_usize.checked_mul(height_usize)?;

    if !in_bounds(start, width, height) || !in_bounds(goal, width, height) {
        return None;
    }

    if start == goal {
        return Some(VecDeque::new());
    }

    let mut visited = vec![false; cell_count];
    let mut predecessors: Vec<Option<CellCoord>> = vec![None; cell_count];
    let mut queue = VecDeque::new();

    visited[index(width_usize, start)?] = true;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        if cell == goal {
            break;
        }

        for neighbor in neighbors(cell, width, height) {
            let Some(neighbor_index) = index(width_usize, neighbor) else {
                continue;
            };

            if visited[neighbor_index] || !is_passable(neighbor) {
                continue;
            }

            visited[neighbor_index] = true;
            predecessors[neighbor_index] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    if !visited[index(width_usize, goal)?] {
        return None;
    }

    let mut path = VecDeque::new();
    let mut cursor = goal;
    while cursor != start {
        path.push_front(cursor);
        cursor = predecessors[index(width_usize, cursor)?]?;
    }

    Some(path)
}

fn in_bounds(cell: CellCoord, width: u32, height: u32) -> bool {
    cell.column() < width && cell.row() < height
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_path_matches_manhattan_distance() {
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(4, 4);

        let path = shortest_path(5, 5, start, goal, |_| true).expect("goal reachable");

        assert_eq!(path.len(), 8);
        assert_eq!(path.back(), Some(&goal));
        let mut previous = start;
        for cell in &path {
            assert_eq!(previous.manhattan_distance(*cell), 1);
            previous = *cell;
        }
    }

    #[test]
    fn exploration_order_prefers_south_then_east() {
        let path = shortest_path(3, 3, CellCoord::new(0, 0), CellCoord::new(1, 1), |_| true)
            .expect("goal reachable");

        assert_eq!(
            path.into_iter().collect::<Vec<_>>(),
            vec![CellCoord::new(0, 1), CellCoord::new(1, 1)]
        );
    }

    #[test]
    fn path_detours_around_walls() {
        // Column 1 is walled off except for the bottom row.
        let wall = |cell: CellCoord| cell.column() == 1 && cell.row() < 2;

        let path = shortest_path(3, 3, CellCoord::new(0, 0), CellCoord::new(2, 0), |cell| {
            !wall(cell)
        })
        .expect("goal reachable");

        assert_eq!(path.len(), 6);
        assert!(path.iter().all(|cell| !wall(*cell)));
    }

    #[test]
    fn unreachable_goal_yields_none() {
        let path = shortest_path(3, 1, CellCoord::new(0, 0), CellCoord::new(2, 0), |cell| {
            cell.column() != 1
        });

        assert!(path.is_none());
    }

    #[test]
    fn start_equal_to_goal_yields_empty_path() {
        let cell = CellCoord::new(1, 1);
        let path = shortest_path(3, 3, cell, cell, |_| true).expect("trivial path");
        assert!(path.is_empty());
    }

    #[test]
    fn out_of_bounds_endpoints_yield_none() {
        assert!(shortest_path(2, 2, CellCoord::new(0, 0), CellCoord::new(2, 0), |_| true).is_none());
    }
}
