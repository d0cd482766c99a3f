#![allow(unused_crate_dependencies, reason = "These are tests, not the main crate.")]

mod all;

use podium::LinkedListLeaderboard;


all::tests_for_ranked_backends!(LinkedListLeaderboard::new());
