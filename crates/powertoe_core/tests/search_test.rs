//! Exhaustive checks of the AI over every reachable position.

use powertoe_core::search::{minimax, minimax_unpruned};
use powertoe_core::{Board, Difficulty, DifficultyPolicy, GameResult, Player, Searcher, evaluate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};

fn to_move(board: &Board) -> Player {
    if board.count(Player::X) == board.count(Player::O) {
        Player::X
    } else {
        Player::O
    }
}

fn collect_open_positions(board: Board, seen: &mut HashSet<Board>) {
    if evaluate(&board).is_terminal() || !seen.insert(board) {
        return;
    }
    let player = to_move(&board);
    for index in board.empty_cells() {
        let mut next = board;
        next.set(index, player).unwrap();
        collect_open_positions(next, seen);
    }
}

#[test]
fn test_pruning_never_changes_the_chosen_move() {
    let mut positions = HashSet::new();
    collect_open_positions(Board::new(), &mut positions);
    assert_eq!(positions.len(), 4520);

    for board in &positions {
        let ai = to_move(board);
        let pruned = minimax(board, ai);
        let full = minimax_unpruned(board, ai);
        assert_eq!(pruned.index(), full.index(), "move differs on\n{board}");
        assert_eq!(pruned.score(), full.score(), "score differs on\n{board}");
        assert!(pruned.nodes() <= full.nodes());
    }
}

/// Plays every human line against the AI and asserts the AI never loses.
fn assert_ai_never_loses(board: Board, human: Player, searcher: &Searcher, rng: &mut StdRng) {
    match evaluate(&board) {
        GameResult::Win { player, .. } => {
            assert_ne!(player, human, "AI lost on\n{board}");
            return;
        }
        GameResult::Draw => return,
        GameResult::InProgress => {}
    }

    if to_move(&board) == human {
        for index in board.empty_cells() {
            let mut next = board;
            next.set(index, human).unwrap();
            assert_ai_never_loses(next, human, searcher, rng);
        }
    } else {
        let ai = human.opponent();
        let index = searcher
            .select_move(&board, ai, Difficulty::Nightmare, rng)
            .unwrap();
        let mut next = board;
        next.set(index, ai).unwrap();
        assert_ai_never_loses(next, human, searcher, rng);
    }
}

#[test]
fn test_optimal_ai_never_loses_as_second_player() {
    let searcher = Searcher::new(DifficultyPolicy::flawless());
    let mut rng = StdRng::seed_from_u64(2024);
    assert_ai_never_loses(Board::new(), Player::X, &searcher, &mut rng);
}

#[test]
fn test_optimal_ai_never_loses_after_centre_opening() {
    let board: Board = "... .X. ...".parse().unwrap();
    for policy in [DifficultyPolicy::flawless(), DifficultyPolicy::default()] {
        let searcher = Searcher::new(policy);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_ai_never_loses(board, Player::X, &searcher, &mut rng);
        }
    }
}

#[test]
fn test_optimal_ai_never_loses_as_first_player() {
    let searcher = Searcher::new(DifficultyPolicy::flawless());
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_ai_never_loses(Board::new(), Player::O, &searcher, &mut rng);
    }
}

/// Plays one game of an optimal `human` against the searcher's Nightmare tier.
fn play_against_optimal(
    human: Player,
    searcher: &Searcher,
    replies: &mut HashMap<Board, usize>,
    rng: &mut StdRng,
) -> GameResult {
    let mut board = Board::new();
    loop {
        let result = evaluate(&board);
        if result.is_terminal() {
            return result;
        }
        let player = to_move(&board);
        let index = if player == human {
            *replies
                .entry(board)
                .or_insert_with(|| minimax(&board, human).index().unwrap())
        } else {
            searcher
                .select_move(&board, player, Difficulty::Nightmare, rng)
                .unwrap()
        };
        board.set(index, player).unwrap();
    }
}

#[test]
fn test_default_nightmare_never_loses_to_optimal_play() {
    let searcher = Searcher::new(DifficultyPolicy::default());
    let mut replies = HashMap::new();
    for seed in 0..500 {
        let mut rng = StdRng::seed_from_u64(seed);
        for human in Player::BOTH {
            let result = play_against_optimal(human, &searcher, &mut replies, &mut rng);
            assert_ne!(result.winner(), Some(human), "seed {seed}: {result}");
        }
    }
}

#[test]
fn test_nightmare_that_always_misses_still_never_loses() {
    let searcher = Searcher::new(DifficultyPolicy {
        nightmare_accuracy: 0.0,
        ..DifficultyPolicy::default()
    });
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_ai_never_loses(Board::new(), Player::X, &searcher, &mut rng);
        assert_ai_never_loses(Board::new(), Player::O, &searcher, &mut rng);
    }
}

#[test]
fn test_easy_ai_only_plays_legal_moves() {
    let searcher = Searcher::default();
    let mut rng = StdRng::seed_from_u64(77);
    let mut board = Board::new();
    let mut player = Player::X;
    while !evaluate(&board).is_terminal() {
        let index = searcher
            .select_move(&board, player, Difficulty::Easy, &mut rng)
            .unwrap();
        board.set(index, player).unwrap();
        player = player.opponent();
    }
}
