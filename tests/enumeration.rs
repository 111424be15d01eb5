use std::collections::HashSet;
use xoxo_tiler::config::{AtMostOneEncoding, EncodingConfig, Settings};
use xoxo_tiler::puzzle::{orientations, Board, Piece, Solution, CATALOGUE};
use xoxo_tiler::sat::{dimacs, Assignment, CadicalSolver, Encoding, Proposition, SatBackend, SolveOutcome};
use xoxo_tiler::tiling::{EnumerationDriver, SolutionDecoder, SolveResult, TilingProblem};

/// 2x2 board with an L-tromino and a monomino. The monomino can sit in any
/// corner and the L then has exactly one placement: four tilings.
fn l_and_monomino() -> Board {
    let pieces = vec![
        Piece::new(0, vec![(0, 0), (0, 1), (1, 0)], vec![true, false, false]).unwrap(),
        Piece::new(1, vec![(0, 0)], vec![true]).unwrap(),
    ];
    Board::new(2, 2, pieces).unwrap()
}

/// 2x2 board with two dominoes: two layouts times two piece orders
fn two_dominoes() -> Board {
    let pieces = vec![
        Piece::new(0, vec![(0, 0), (0, 1)], vec![true, false]).unwrap(),
        Piece::new(1, vec![(0, 0), (0, 1)], vec![true, false]).unwrap(),
    ];
    Board::new(2, 2, pieces).unwrap()
}

/// Catalogue pieces 0, 2 and 7 on a 5x3 board: two tilings, each with a
/// single placement of every part
fn five_part_trio() -> Board {
    let pieces = [0, 2, 7]
        .iter()
        .enumerate()
        .map(|(id, &entry)| {
            let spec = &CATALOGUE[entry];
            Piece::new(id, spec.offsets.to_vec(), spec.colors.to_vec()).unwrap()
        })
        .collect();
    Board::new(5, 3, pieces).unwrap()
}

/// Every piece sits in one of its orientations, anchored at part 0, with
/// each part showing the colour of the cell below it
fn assert_legal_placements(board: &Board, encoding: &Encoding, assignment: &Assignment) {
    for piece in board.pieces() {
        let mut positions = vec![None; piece.num_parts()];
        for (id, proposition) in encoding.registry().iter() {
            if let Proposition::Occupied { row, col, piece: p, part } = *proposition {
                if p == piece.id() && assignment.get(&id).copied().unwrap_or(false) {
                    assert!(positions[part].is_none(), "piece {} part {} placed twice", p, part);
                    positions[part] = Some((row, col));
                }
            }
        }
        let positions: Vec<(usize, usize)> = positions
            .into_iter()
            .enumerate()
            .map(|(part, pos)| pos.unwrap_or_else(|| panic!("piece {} part {} unplaced", piece.id(), part)))
            .collect();

        let (row, col) = positions[0];
        let legal = orientations(piece).iter().any(|orientation| {
            positions.iter().enumerate().all(|(part, &(r, c))| {
                board.translate(row, col, orientation.offsets[part]) == Some((r, c))
                    && orientation.part_color(piece, part) == board.is_color_a(r, c)
            })
        });
        assert!(legal, "piece {} illegal {:?}", piece.id(), positions);
    }
}

fn config(at_most_one: AtMostOneEncoding) -> EncodingConfig {
    EncodingConfig {
        at_most_one,
        emit_comments: false,
    }
}

fn true_occupancies(encoding: &Encoding, assignment: &Assignment) -> Vec<i32> {
    encoding
        .registry()
        .iter()
        .filter(|(_, p)| matches!(p, Proposition::Occupied { .. }))
        .filter(|(id, _)| assignment.get(id).copied().unwrap_or(false))
        .map(|(id, _)| id)
        .collect()
}

#[test]
fn test_enumerates_exactly_the_tilings() {
    for strategy in [AtMostOneEncoding::Pairwise, AtMostOneEncoding::SequentialCounter] {
        let board = l_and_monomino();
        let mut encoding = Encoding::compile(&board, &config(strategy)).unwrap();

        let mut rounds = 0;
        let mut driver = EnumerationDriver::new(&board, &mut encoding, CadicalSolver::new());
        let report = driver
            .run(|found| {
                rounds += 1;
                assert!(found.is_new);
            })
            .unwrap();

        assert_eq!(rounds, 4, "{:?}", strategy);
        assert_eq!(report.satisfiable_rounds, 4);
        assert_eq!(report.solver_calls, 5);
        assert_eq!(report.distinct_solutions, 4);

        let distinct: HashSet<&Solution> = driver.solutions().iter().collect();
        assert_eq!(distinct.len(), 4);

        // The monomino ends up in every corner once
        let corners: HashSet<(usize, usize)> = driver
            .solutions()
            .iter()
            .map(|s| {
                let cell = (0..4).find(|i| s.get(i / 2, i % 2) == 1).unwrap();
                (cell / 2, cell % 2)
            })
            .collect();
        assert_eq!(corners.len(), 4);
    }
}

#[test]
fn test_flipped_placements_collapse_to_distinct_solutions() {
    let board = two_dominoes();
    let mut encoding = Encoding::compile(&board, &config(AtMostOneEncoding::Pairwise)).unwrap();

    let mut repeats = 0;
    let mut driver = EnumerationDriver::new(&board, &mut encoding, CadicalSolver::new());
    let report = driver
        .run(|found| {
            if !found.is_new {
                repeats += 1;
            }
        })
        .unwrap();

    // Each domino can lie either way round, so every tiling has four
    // part-level models
    assert_eq!(report.satisfiable_rounds, 16);
    assert_eq!(report.distinct_solutions, 4);
    assert_eq!(repeats, 12);
    assert_eq!(report.solver_calls, 17);
}

#[test]
fn test_blocked_model_never_returns() {
    let board = l_and_monomino();
    let mut encoding = Encoding::compile(&board, &config(AtMostOneEncoding::Pairwise)).unwrap();
    let mut solver = CadicalSolver::new();

    let mut blocked: Vec<Vec<i32>> = Vec::new();
    loop {
        let assignment = match solver.solve(&encoding.to_dimacs(false)).unwrap() {
            SolveOutcome::Satisfiable(assignment) => assignment,
            SolveOutcome::Unsatisfiable => break,
        };
        let occupied = true_occupancies(&encoding, &assignment);
        assert!(!blocked.contains(&occupied), "blocked model came back: {:?}", occupied);

        let clause = encoding.block(&assignment).unwrap();
        assert_eq!(clause.literals, occupied.iter().map(|id| -id).collect::<Vec<_>>());
        blocked.push(occupied);
    }

    assert_eq!(blocked.len(), 4);
}

#[test]
fn test_header_round_trip() {
    let board = Board::standard().unwrap();
    for strategy in [AtMostOneEncoding::Pairwise, AtMostOneEncoding::SequentialCounter] {
        let encoding = Encoding::compile(&board, &config(strategy)).unwrap();

        for with_comments in [false, true] {
            let text = encoding.to_dimacs(with_comments);
            assert_eq!(
                dimacs::parse_header(&text).unwrap(),
                (encoding.variable_count(), encoding.clause_count())
            );
        }

        let (vars, clauses) = dimacs::parse_instance(&encoding.to_dimacs(true)).unwrap();
        assert_eq!(vars, encoding.variable_count());
        assert_eq!(clauses.as_slice(), encoding.clauses());
    }
}

#[test]
fn test_decode_twice_is_equal() {
    let board = l_and_monomino();
    let encoding = Encoding::compile(&board, &config(AtMostOneEncoding::Pairwise)).unwrap();

    let assignment = match CadicalSolver::new().solve(&encoding.to_dimacs(false)).unwrap() {
        SolveOutcome::Satisfiable(assignment) => assignment,
        SolveOutcome::Unsatisfiable => panic!("expected SAT"),
    };
    let decoder = SolutionDecoder::new(&board, encoding.registry());

    assert_eq!(decoder.decode(&assignment).unwrap(), decoder.decode(&assignment).unwrap());
}

#[test]
fn test_standard_board_places_every_piece_legally() {
    for strategy in [AtMostOneEncoding::Pairwise, AtMostOneEncoding::SequentialCounter] {
        let mut settings = Settings::default();
        settings.encoding.at_most_one = strategy;
        let problem = TilingProblem::new(settings).unwrap();
        assert_eq!(problem.board().cell_count(), problem.board().total_parts());

        let (solution, assignment) = match problem.solve_once(&mut CadicalSolver::new()).unwrap() {
            SolveResult::Solved { solution, assignment } => (solution, assignment),
            SolveResult::Unsatisfiable => panic!("standard board must be solvable ({:?})", strategy),
        };

        assert_legal_placements(problem.board(), problem.encoding(), &assignment);
        for piece in problem.board().pieces() {
            let covered = solution.rows().flatten().filter(|&&id| id == piece.id()).count();
            assert_eq!(covered, piece.num_parts());
        }
        assert_eq!(Solution::from_layout(&solution.to_layout().unwrap()).unwrap(), solution);
    }
}

#[test]
fn test_five_part_pieces_enumerate_legal_tilings() {
    for strategy in [AtMostOneEncoding::Pairwise, AtMostOneEncoding::SequentialCounter] {
        let board = five_part_trio();
        let mut encoding = Encoding::compile(&board, &config(strategy)).unwrap();

        let mut models = Vec::new();
        let report = {
            let mut driver = EnumerationDriver::new(&board, &mut encoding, CadicalSolver::new());
            driver.run(|found| models.push(found.assignment.clone())).unwrap()
        };

        assert_eq!(report.satisfiable_rounds, 2, "{:?}", strategy);
        assert_eq!(report.distinct_solutions, 2);
        for assignment in &models {
            assert_legal_placements(&board, &encoding, assignment);
        }
    }
}
