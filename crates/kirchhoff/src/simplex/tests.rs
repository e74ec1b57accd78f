//! Hand-checked tableaus and small programs with known optima.

use nalgebra::DMatrix;
use num_traits::{Signed, Zero};

use super::*;
use crate::rational::{int, ratio, Rational};

fn ints(row: &[i64]) -> Vec<Rational> {
    row.iter().map(|&v| int(v)).collect()
}

fn assert_feasible(a: &[Vec<Rational>], b: &[Rational], x: &[Rational]) {
    assert!(x.iter().all(|v| !v.is_negative()), "negative entry in {x:?}");
    for (row, rhs) in a.iter().zip(b) {
        let lhs = row
            .iter()
            .zip(x)
            .fold(Rational::zero(), |acc, (a, x)| acc + a * x);
        assert_eq!(&lhs, rhs);
    }
}

fn textbook_tableau() -> Tableau {
    // min -x - y  s.t.  x + 2y + s1 = 4,  3x + y + s2 = 6
    Tableau::new(
        vec![ints(&[1, 2, 1, 0]), ints(&[3, 1, 0, 1])],
        ints(&[4, 6]),
        ints(&[-1, -1, 0, 0]),
        int(0),
        vec![2, 3],
    )
}

#[test]
fn tableau_pivots_by_hand() {
    let mut t = textbook_tableau();
    assert_eq!(t.state(), TableauState::Unsolved { row: 1, col: 0 });
    t.pivot(1, 0);
    assert_eq!(t.rhs(), &[int(2), int(2)]);
    assert_eq!(t.reduced_costs(), &[int(0), ratio(-2, 3), int(0), ratio(1, 3)]);
    assert_eq!(t.value(), &int(-2));
    assert_eq!(t.state(), TableauState::Unsolved { row: 0, col: 1 });
    assert_eq!(t.run(None), Ok(TableauState::Solved));
    assert_eq!(t.value(), &ratio(-14, 5));
    assert_eq!(t.solution(2), vec![ratio(8, 5), ratio(6, 5)]);
    assert_eq!(t.basic_row(0), Some(1));
    assert_eq!(t.basic_row(1), Some(0));
    assert_eq!(t.basic_row(2), None);
    assert_eq!(t.pivots(), 2);
}

#[test]
fn ratio_ties_go_to_smallest_basic_index() {
    // Both rows tie at ratio 0; row 1 holds basic column 1 < 2.
    let t = Tableau::new(
        vec![ints(&[1, 0, 1]), ints(&[1, 1, 0])],
        ints(&[0, 0]),
        ints(&[-1, 0, 0]),
        int(0),
        vec![2, 1],
    );
    assert_eq!(t.state(), TableauState::Unsolved { row: 1, col: 0 });
}

#[test]
fn column_without_positive_entry_is_unbounded() {
    let t = Tableau::new(
        vec![ints(&[1, -1])],
        ints(&[1]),
        ints(&[0, -1]),
        int(-1),
        vec![0],
    );
    assert_eq!(t.state(), TableauState::Unbounded { col: 1 });
}

#[test]
fn two_phase_optimum() {
    let a = vec![ints(&[1, 2, 1, 0]), ints(&[3, 1, 0, 1])];
    let b = ints(&[4, 6]);
    let lp = LinearProgram::new(a.clone(), b.clone(), ints(&[-1, -1, 0, 0])).unwrap();
    match lp.solve(SimplexCfg::default()).unwrap() {
        LpOutcome::Optimal { x, value } => {
            assert_eq!(value, ratio(-14, 5));
            assert_eq!(&x[..2], &[ratio(8, 5), ratio(6, 5)]);
            assert_feasible(&a, &b, &x);
        }
        other => panic!("expected optimum, got {other:?}"),
    }
}

#[test]
fn negative_rhs_is_infeasible() {
    // x + y = -1 with x, y >= 0.
    let lp = LinearProgram::new(vec![ints(&[1, 1])], ints(&[-1]), ints(&[0, 0])).unwrap();
    assert_eq!(lp.solve(SimplexCfg::default()), Ok(LpOutcome::Infeasible));
    assert_eq!(lp.feasible_point(SimplexCfg::default()), Ok(None));
}

#[test]
fn flipped_row_stays_feasible() {
    // -x - y = -2 is x + y = 2.
    let a = vec![ints(&[-1, -1])];
    let b = ints(&[-2]);
    let lp = LinearProgram::new(a.clone(), b.clone(), ints(&[1, 0])).unwrap();
    match lp.solve(SimplexCfg::default()).unwrap() {
        LpOutcome::Optimal { x, value } => {
            assert_eq!(value, int(0));
            assert_eq!(x, ints(&[0, 2]));
            assert_feasible(&a, &b, &x);
        }
        other => panic!("expected optimum, got {other:?}"),
    }
}

#[test]
fn unbounded_phase_two() {
    // min -x  s.t.  x - y = 1.
    let lp = LinearProgram::new(vec![ints(&[1, -1])], ints(&[1]), ints(&[-1, 0])).unwrap();
    assert_eq!(lp.solve(SimplexCfg::default()), Ok(LpOutcome::Unbounded));
}

#[test]
fn redundant_row_is_dropped() {
    // The second row is twice the first; an auxiliary stays basic at zero.
    let a = vec![ints(&[1, 1]), ints(&[2, 2])];
    let b = ints(&[2, 4]);
    let lp = LinearProgram::new(a.clone(), b.clone(), ints(&[1, 0])).unwrap();
    match lp.solve(SimplexCfg::default()).unwrap() {
        LpOutcome::Optimal { x, value } => {
            assert_eq!(value, int(0));
            assert_eq!(x, ints(&[0, 2]));
            assert_feasible(&a, &b, &x);
        }
        other => panic!("expected optimum, got {other:?}"),
    }
}

#[test]
fn beale_cycling_example_terminates() {
    // Classic degenerate program on which the largest-coefficient rule cycles.
    let a = vec![
        vec![int(1), int(0), int(0), ratio(1, 4), int(-8), int(-1), int(9)],
        vec![int(0), int(1), int(0), ratio(1, 2), int(-12), ratio(-1, 2), int(3)],
        vec![int(0), int(0), int(1), int(0), int(0), int(1), int(0)],
    ];
    let b = ints(&[0, 0, 1]);
    let c = vec![int(0), int(0), int(0), ratio(-3, 4), int(20), ratio(-1, 2), int(6)];
    let lp = LinearProgram::new(a.clone(), b.clone(), c).unwrap();
    let cfg = SimplexCfg {
        max_pivots: Some(100),
    };
    match lp.solve(cfg).unwrap() {
        LpOutcome::Optimal { x, value } => {
            assert_eq!(value, ratio(-5, 4));
            assert_feasible(&a, &b, &x);
        }
        other => panic!("expected optimum, got {other:?}"),
    }
}

#[test]
fn pivot_budget_is_enforced() {
    let lp = LinearProgram::new(
        vec![ints(&[1, 2, 1, 0]), ints(&[3, 1, 0, 1])],
        ints(&[4, 6]),
        ints(&[-1, -1, 0, 0]),
    )
    .unwrap();
    let cfg = SimplexCfg {
        max_pivots: Some(1),
    };
    assert_eq!(lp.solve(cfg), Err(SimplexError::PivotLimit { limit: 1 }));
}

#[test]
fn shape_errors() {
    assert_eq!(
        LinearProgram::new(vec![ints(&[1, 1])], ints(&[1, 2]), ints(&[0, 0])),
        Err(SimplexError::ShapeMismatch {
            what: "right-hand side",
            expected: 1,
            found: 2
        })
    );
    assert_eq!(
        LinearProgram::new(vec![ints(&[1, 1, 1])], ints(&[1]), ints(&[0, 0])),
        Err(SimplexError::ShapeMismatch {
            what: "constraint row",
            expected: 2,
            found: 3
        })
    );
}

#[test]
fn kirky_chain_spreads_weight_evenly() {
    // w0 = w1 = w2, normalized to sum 1.
    let e = DMatrix::from_row_slice(2, 3, &ints(&[1, -1, 0, 0, 1, -1]));
    let w = solve_kirky(&e, SimplexCfg::default()).unwrap().unwrap();
    assert_eq!(w, vec![ratio(1, 3); 3]);
}

#[test]
fn kirky_forces_zero_where_required() {
    // w0 + w1 - w2 = 0 and -w0 + w1 - w2 = 0 leave w0 = 0, w1 = w2.
    let e = DMatrix::from_row_slice(2, 3, &ints(&[1, 1, -1, -1, 1, -1]));
    let w = solve_kirky(&e, SimplexCfg::default()).unwrap().unwrap();
    assert_eq!(w, vec![int(0), ratio(1, 2), ratio(1, 2)]);
}

#[test]
fn kirky_reports_only_trivial_systems_as_infeasible() {
    // w0 = 2 w1 and w1 = 2 w0 only admit zero.
    let e = DMatrix::from_row_slice(2, 2, &ints(&[1, -2, -2, 1]));
    assert_eq!(solve_kirky(&e, SimplexCfg::default()), Ok(None));
}
