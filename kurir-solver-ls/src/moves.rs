//! 2-opt and or-opt neighbourhoods over a tour with a fixed first node.
//!
//! A tour is a permutation with the start at position 0; the closing edge
//! runs from the last position back to position 0. Moves never touch
//! position 0, so the start stays put.

use crate::cost::Costs;

/// An improving edge exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    /// Reverse positions `i..=j`.
    TwoOpt { i: usize, j: usize },
    /// Move `len` nodes starting at position `from` to follow node `after`.
    OrOpt {
        from: usize,
        len: usize,
        after: usize,
        reversed: bool,
    },
}

/// Node at `position`, wrapping `tour.len()` to the start.
fn node_at(tour: &[usize], position: usize) -> usize {
    tour.get(position)
        .or_else(|| tour.first())
        .copied()
        .unwrap_or_default()
}

fn cost(costs: &Costs, from: usize, to: usize) -> i128 {
    i128::from(costs.augmented(from, to))
}

/// First move that lowers the augmented cost, scanning 2-opt before or-opt.
pub(crate) fn first_improving(tour: &[usize], costs: &Costs, max_segment: usize) -> Option<Move> {
    first_two_opt(tour, costs).or_else(|| first_or_opt(tour, costs, max_segment))
}

fn first_two_opt(tour: &[usize], costs: &Costs) -> Option<Move> {
    let n = tour.len();
    for i in 1..n {
        for j in (i + 1)..n {
            let a = node_at(tour, i - 1);
            let b = node_at(tour, i);
            let c = node_at(tour, j);
            let d = node_at(tour, j + 1);
            let delta = cost(costs, a, c) + cost(costs, b, d) - cost(costs, a, b) - cost(costs, c, d);
            if delta < 0 {
                return Some(Move::TwoOpt { i, j });
            }
        }
    }
    None
}

fn first_or_opt(tour: &[usize], costs: &Costs, max_segment: usize) -> Option<Move> {
    let n = tour.len();
    for len in 1..=max_segment {
        for from in 1..n {
            let last = from + len - 1;
            if last >= n {
                break;
            }
            let prev = node_at(tour, from - 1);
            let next = node_at(tour, last + 1);
            let head = node_at(tour, from);
            let tail = node_at(tour, last);
            let removal = cost(costs, prev, next) - cost(costs, prev, head) - cost(costs, tail, next);
            for position in (0..n).filter(|&p| p + 1 < from || p > last) {
                let x = node_at(tour, position);
                let y = node_at(tour, position + 1);
                for reversed in [false, true] {
                    let (first, end) = if reversed { (tail, head) } else { (head, tail) };
                    let insertion = cost(costs, x, first) + cost(costs, end, y) - cost(costs, x, y);
                    if removal + insertion < 0 {
                        return Some(Move::OrOpt {
                            from,
                            len,
                            after: x,
                            reversed,
                        });
                    }
                }
            }
        }
    }
    None
}

/// Apply `mv` to `tour` in place.
pub(crate) fn apply(tour: &mut Vec<usize>, mv: Move) {
    match mv {
        Move::TwoOpt { i, j } => {
            if let Some(segment) = tour.get_mut(i..=j) {
                segment.reverse();
            }
        }
        Move::OrOpt {
            from,
            len,
            after,
            reversed,
        } => {
            let mut segment: Vec<usize> = tour.drain(from..from + len).collect();
            if reversed {
                segment.reverse();
            }
            let at = tour
                .iter()
                .position(|&node| node == after)
                .map_or(tour.len(), |index| index + 1);
            tour.splice(at..at, segment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurir_core::DistanceMatrix;
    use rstest::{fixture, rstest};

    /// Five points on a line at 0, 1, 2, 3, 4 km.
    #[fixture]
    #[expect(clippy::float_arithmetic, reason = "distances along a line")]
    fn line() -> Costs {
        let positions = [0.0_f64, 1.0, 2.0, 3.0, 4.0];
        let rows = positions
            .iter()
            .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
            .collect();
        Costs::new(&DistanceMatrix::from_rows(rows).expect("valid matrix"))
    }

    #[rstest]
    fn two_opt_untangles_a_crossing(line: Costs) {
        let mut tour = vec![0, 2, 1, 3, 4];
        let mv = first_two_opt(&tour, &line).expect("crossing to remove");
        apply(&mut tour, mv);
        assert!(line.tour_cost(&tour) < line.tour_cost(&[0, 2, 1, 3, 4]));
        assert_eq!(tour.first(), Some(&0));
    }

    #[rstest]
    fn or_opt_relocates_a_stray_node(line: Costs) {
        // Node 4 sits between 1 and 2; moving it to the far end is shorter.
        let tour = vec![0, 1, 4, 2, 3];
        let mv = first_or_opt(&tour, &line, 3).expect("relocation available");
        let mut moved = tour.clone();
        apply(&mut moved, mv);
        assert!(line.tour_cost(&moved) < line.tour_cost(&tour));
        let mut sorted = moved.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
        assert_eq!(moved.first(), Some(&0));
    }

    #[rstest]
    fn optimal_line_tour_has_no_improving_move(line: Costs) {
        assert_eq!(first_improving(&[0, 1, 2, 3, 4], &line, 3), None);
    }

    #[rstest]
    #[case::reverse_middle(Move::TwoOpt { i: 1, j: 3 }, vec![0, 3, 2, 1, 4])]
    #[case::move_forward(
        Move::OrOpt { from: 1, len: 2, after: 4, reversed: false },
        vec![0, 3, 4, 1, 2]
    )]
    #[case::move_reversed(
        Move::OrOpt { from: 3, len: 2, after: 0, reversed: true },
        vec![0, 4, 3, 1, 2]
    )]
    fn moves_rearrange_positions(#[case] mv: Move, #[case] expected: Vec<usize>) {
        let mut tour = vec![0, 1, 2, 3, 4];
        apply(&mut tour, mv);
        assert_eq!(tour, expected);
    }

    #[rstest]
    fn tiny_tours_have_no_moves(line: Costs) {
        assert_eq!(first_improving(&[0], &line, 3), None);
        assert_eq!(first_improving(&[0, 1], &line, 3), None);
    }
}
