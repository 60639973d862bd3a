//! Random legal games and an independent scorer to check them against.

#![allow(dead_code)]

use proptest::prelude::*;

/// Builds a complete, legal regulation game from arbitrary bytes.
///
/// Each byte picks a pin count among those still standing, so every byte string
/// maps to a valid game and shrinking stays within legal games.
pub fn legal_game(raw: &[u8]) -> Vec<i32> {
    let mut source = raw.iter().copied();
    let mut pick = |standing: u8| -> i32 { i32::from(source.next().unwrap_or(0) % (standing + 1)) };
    let mut rolls = Vec::with_capacity(21);

    for _ in 0..9 {
        let first = pick(10);
        rolls.push(first);
        if first < 10 {
            rolls.push(pick(10 - first as u8));
        }
    }

    let first = pick(10);
    rolls.push(first);
    if first == 10 {
        let second = pick(10);
        rolls.push(second);
        let third = if second == 10 {
            pick(10)
        } else {
            pick(10 - second as u8)
        };
        rolls.push(third);
    } else {
        let second = pick(10 - first as u8);
        rolls.push(second);
        if first + second == 10 {
            rolls.push(pick(10));
        }
    }
    rolls
}

/// Strategy producing complete legal games.
pub fn complete_game() -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(any::<u8>(), 21).prop_map(|raw| legal_game(&raw))
}

/// Strategy producing a complete game together with a cut point `0..=len`.
pub fn game_and_cut() -> impl Strategy<Value = (Vec<i32>, usize)> {
    complete_game().prop_flat_map(|game| {
        let len = game.len();
        (Just(game), 0..=len)
    })
}

/// Cumulative frame scores of a complete game, computed by roll index.
pub fn reference_scores(rolls: &[i32]) -> Vec<i32> {
    let mut scores = Vec::with_capacity(10);
    let mut total = 0;
    let mut i = 0;
    for _ in 0..10 {
        if rolls[i] == 10 {
            total += 10 + rolls[i + 1] + rolls[i + 2];
            i += 1;
        } else if rolls[i] + rolls[i + 1] == 10 {
            total += 10 + rolls[i + 2];
            i += 2;
        } else {
            total += rolls[i] + rolls[i + 1];
            i += 2;
        }
        scores.push(total);
    }
    scores
}
