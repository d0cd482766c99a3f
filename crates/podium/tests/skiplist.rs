#![allow(unused_crate_dependencies, reason = "These are tests, not the main crate.")]

mod all;

use podium::{Leaderboard as _, SkiplistLeaderboard, TopK as _};


all::tests_for_ranked_backends!(SkiplistLeaderboard::with_seed(0xBAD5EED));

#[test]
fn top_k_walks_from_the_highest_score() {
    let mut board = SkiplistLeaderboard::with_seed(1);

    board.insert(1, 300).unwrap();
    board.insert(2, 100).unwrap();
    board.insert(3, 500).unwrap();
    board.insert(4, 200).unwrap();

    assert_eq!(board.top_k(2), vec![(3, 500), (1, 300)]);
    assert_eq!(board.top_k(99), vec![(3, 500), (1, 300), (4, 200), (2, 100)]);
}

#[test]
fn top_k_orders_equal_scores_by_descending_user() {
    let mut board = SkiplistLeaderboard::with_seed(2);

    board.insert(10, 70).unwrap();
    board.insert(11, 70).unwrap();
    board.insert(12, 70).unwrap();

    // Level 0 is ascending `(score, user)`, so the reversed walk yields
    // descending user ids within a score.
    assert_eq!(board.top_k(3), vec![(12, 70), (11, 70), (10, 70)]);
}

#[test]
fn identical_seeds_build_identical_lists() {
    let mut a = SkiplistLeaderboard::with_seed(99);
    let mut b = SkiplistLeaderboard::with_seed(99);

    for user in 0..200_u64 {
        let score = (user * 37 % 101) as u32;
        a.insert(user, score).unwrap();
        b.insert(user, score).unwrap();
    }

    for user in 0..200_u64 {
        assert_eq!(a.rank(user), b.rank(user));
    }
    assert_eq!(a.top_k(10), b.top_k(10));
}
