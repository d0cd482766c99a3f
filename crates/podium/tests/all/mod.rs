//! Shared behavioral suite, instantiated once per backend that follows the
//! canonical ascending `(score, user)` ordering. The bucket-array backend
//! uses a descending rank convention and has its own suite instead.

macro_rules! tests_for_ranked_backends {
    ($new_leaderboard:expr $(,)?) => {
        use podium::Leaderboard as _;

        #[test]
        fn empty_leaderboard() {
            let board = $new_leaderboard;

            assert_eq!(board.len(), 0);
            assert!(board.is_empty());
            assert_eq!(board.rank(42), None);
        }

        #[test]
        fn delete_on_empty_is_a_no_op() {
            let mut board = $new_leaderboard;

            board.delete(42);
            assert_eq!(board.len(), 0);
        }

        // The worked example from the design discussion: three users, one
        // update, one delete.
        #[test]
        fn rank_follows_score_then_user_order() {
            let mut board = $new_leaderboard;

            board.insert(1001, 50).unwrap();
            board.insert(1002, 70).unwrap();
            board.insert(1003, 50).unwrap();

            assert_eq!(board.rank(1001), Some(0));
            assert_eq!(board.rank(1003), Some(1));
            assert_eq!(board.rank(1002), Some(2));

            board.update(1001, 80).unwrap();
            assert_eq!(board.rank(1003), Some(0));
            assert_eq!(board.rank(1002), Some(1));
            assert_eq!(board.rank(1001), Some(2));

            board.delete(1002);
            assert_eq!(board.len(), 2);
            assert_eq!(board.rank(1002), None);
            assert_eq!(board.rank(1003), Some(0));
            assert_eq!(board.rank(1001), Some(1));
        }

        #[test]
        fn equal_scores_break_ties_by_ascending_user() {
            let mut board = $new_leaderboard;

            // Inserted high-user-first so insertion order can't masquerade
            // as the tie-break.
            board.insert(30, 5).unwrap();
            board.insert(20, 5).unwrap();
            board.insert(10, 5).unwrap();

            assert_eq!(board.rank(10), Some(0));
            assert_eq!(board.rank(20), Some(1));
            assert_eq!(board.rank(30), Some(2));
        }

        #[test]
        fn insert_of_existing_user_behaves_as_update() {
            let mut board = $new_leaderboard;

            board.insert(1, 10).unwrap();
            board.insert(2, 20).unwrap();
            board.insert(1, 30).unwrap();

            assert_eq!(board.len(), 2);
            assert_eq!(board.rank(2), Some(0));
            assert_eq!(board.rank(1), Some(1));
        }

        #[test]
        fn update_of_unknown_user_behaves_as_insert() {
            let mut board = $new_leaderboard;

            board.update(7, 15).unwrap();

            assert_eq!(board.len(), 1);
            assert_eq!(board.rank(7), Some(0));
        }

        #[test]
        fn update_to_same_score_changes_nothing() {
            let mut board = $new_leaderboard;

            board.insert(1, 10).unwrap();
            board.insert(2, 20).unwrap();
            board.update(1, 10).unwrap();

            assert_eq!(board.len(), 2);
            assert_eq!(board.rank(1), Some(0));
            assert_eq!(board.rank(2), Some(1));
        }

        #[test]
        fn deleting_an_absent_user_disturbs_no_ranks() {
            let mut board = $new_leaderboard;

            board.insert(1, 10).unwrap();
            board.insert(2, 20).unwrap();
            board.insert(3, 30).unwrap();
            board.delete(4);
            board.delete(4);

            assert_eq!(board.len(), 3);
            assert_eq!(board.rank(1), Some(0));
            assert_eq!(board.rank(2), Some(1));
            assert_eq!(board.rank(3), Some(2));
        }

        #[test]
        fn deleted_user_can_be_reinserted() {
            let mut board = $new_leaderboard;

            board.insert(1, 10).unwrap();
            board.delete(1);
            assert_eq!(board.rank(1), None);

            board.insert(1, 99).unwrap();
            assert_eq!(board.len(), 1);
            assert_eq!(board.rank(1), Some(0));
        }

        // Insert-then-rank round trip over a fixed population: each rank
        // equals the number of entries strictly before `(score, user)`.
        #[test]
        fn rank_counts_strictly_smaller_entries() {
            let mut board = $new_leaderboard;
            let entries: &[(u64, u32)] =
                &[(5, 40), (9, 10), (2, 40), (7, 25), (4, 10), (8, 90)];

            for (inserted, &(user, score)) in entries.iter().enumerate() {
                board.insert(user, score).unwrap();

                let expected = entries[..=inserted]
                    .iter()
                    .filter(|&&(u, s)| (s, u) < (score, user))
                    .count();
                assert_eq!(board.rank(user), Some(expected));
            }

            assert_eq!(board.len(), entries.len());
            assert_eq!(board.rank(9), Some(0));
            assert_eq!(board.rank(4), Some(1));
            assert_eq!(board.rank(7), Some(2));
            assert_eq!(board.rank(2), Some(3));
            assert_eq!(board.rank(5), Some(4));
            assert_eq!(board.rank(8), Some(5));
        }
    };
}

pub(crate) use tests_for_ranked_backends as tests_for_ranked_backends;
