#![allow(missing_docs)]

use bytemill::{
    BMHashMap, CountType, Pair, PairMergeTrainer, PairMergeTrainerOptions, TokenType,
};

type T = u32;
type C = u32;

const SAMPLES: &[&[u8]] = &[
    b"the quick brown fox jumps over the lazy dog",
    b"abababababab",
    b"mississippi mississippi mississippi",
    b"aaaaaaaaaaaaaaaa",
    b"low lower lowest lowly",
    b"\x00\x00\x01\x01\x00\x00\x01\x01\x00",
    b"ab",
    b"a",
];

fn widen(bytes: &[u8]) -> Vec<T> {
    bytes.iter().map(|&b| b as T).collect()
}

/// Window counts of a plain token slice.
fn rescan_counts(tokens: &[T]) -> BMHashMap<Pair<T>, C> {
    let mut counts: BMHashMap<Pair<T>, C> = BMHashMap::default();
    for w in tokens.windows(2) {
        *counts.entry((w[0], w[1])).or_default() += 1;
    }
    counts
}

/// Apply one merge with a straightforward non-skipping rewriter.
fn naive_merge(
    tokens: &[T],
    pair: Pair<T>,
    replacement: T,
) -> Vec<T> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len() && (tokens[i], tokens[i + 1]) == pair {
            out.push(replacement);
            i += 2;
        } else {
            out.push(tokens[i]);
            i += 1;
        }
    }
    out
}

#[test]
fn incremental_deltas_match_full_rescan() {
    for sample in SAMPLES {
        let tokens = widen(sample);
        let mut trainer: PairMergeTrainer<T, C> =
            PairMergeTrainerOptions::new(300).init(&tokens).unwrap();

        while let Some(step) = trainer.step().unwrap() {
            let live = trainer.sequence().to_tokens();
            let rescan = rescan_counts(&live);

            // Every live window is tracked at its exact count.
            for (pair, count) in rescan.iter() {
                assert_eq!(
                    trainer.heap().get(pair),
                    Some(*count),
                    "count drift for {pair:?} after merging {:?} in {sample:?}",
                    step.pair,
                );
            }

            // Every tracked pair absent from the rescan is a tombstone.
            for entry in trainer.heap().entries() {
                if !rescan.contains_key(&entry.pair) {
                    assert_eq!(
                        entry.count, 0,
                        "stale positive count for {:?} in {sample:?}",
                        entry.pair,
                    );
                }
            }
        }
    }
}

#[test]
fn heap_stays_well_formed_during_training() {
    for sample in SAMPLES {
        let tokens = widen(sample);
        let mut trainer: PairMergeTrainer<T, C> =
            PairMergeTrainerOptions::new(280).init(&tokens).unwrap();

        loop {
            let entries = trainer.heap().entries();
            for i in 1..entries.len() {
                let parent = (i - 1) / 2;
                let key = |e: &bytemill::HeapEntry<T, C>| (e.count, e.pair);
                assert!(
                    key(&entries[parent]) >= key(&entries[i]),
                    "heap order violated in {sample:?}"
                );
            }
            if trainer.step().unwrap().is_none() {
                break;
            }
        }
    }
}

#[test]
fn replaying_merges_reproduces_the_live_sequence() {
    for sample in SAMPLES {
        let tokens = widen(sample);
        let trainer: PairMergeTrainer<T, C> =
            PairMergeTrainerOptions::new(300).init(&tokens).unwrap();
        let results = trainer.train().unwrap();

        let mut replayed = tokens.clone();
        for &(pair, token) in &results.merges {
            replayed = naive_merge(&replayed, pair, token);
        }

        assert_eq!(replayed, results.tokens, "replay mismatch for {sample:?}");
    }
}

#[test]
fn expansion_lengths_are_conserved() {
    for sample in SAMPLES {
        let tokens = widen(sample);
        let trainer: PairMergeTrainer<T, C> =
            PairMergeTrainerOptions::new(300).init(&tokens).unwrap();
        let results = trainer.train().unwrap();

        // Expansion length in initial bytes, per token id.
        let mut expansion: BMHashMap<T, usize> = BMHashMap::default();
        for &(pair, token) in &results.merges {
            let left = expansion.get(&pair.0).copied().unwrap_or(1);
            let right = expansion.get(&pair.1).copied().unwrap_or(1);
            expansion.insert(token, left + right);
        }

        let total: usize = results
            .tokens
            .iter()
            .map(|t| expansion.get(t).copied().unwrap_or(1))
            .sum();
        assert_eq!(total, tokens.len(), "length drift for {sample:?}");
    }
}

#[test]
fn live_walk_is_a_rewritten_subsequence() {
    // After any number of merge steps, un-merged tokens appear in their
    // original relative order.
    let tokens = widen(b"the cat sat on the mat");
    let mut trainer: PairMergeTrainer<T, C> =
        PairMergeTrainerOptions::new(270).init(&tokens).unwrap();

    while let Some(step) = trainer.step().unwrap() {
        let live = trainer.sequence().to_tokens();
        let originals: Vec<T> = live.iter().copied().filter(|&t| t < 256).collect();

        // The surviving original tokens must embed, in order, into the
        // input.
        let mut input = tokens.iter().copied();
        for t in originals {
            assert!(
                input.any(|u| u == t),
                "token {t} out of order after merging {:?}",
                step.pair,
            );
        }
    }
}

fn end_to_end_scenario<Tok: TokenType, Cnt: CountType>() {
    let tokens: Vec<Tok> = [97u8, 98, 99, 98, 99, 100, 101]
        .iter()
        .map(|&b| Tok::from_u8(b).unwrap())
        .collect();

    // 4 skip bits leave 12 value bits on u16, enough for a 258 vocab.
    let trainer: PairMergeTrainer<Tok, Cnt> = PairMergeTrainerOptions::new(258)
        .with_skip_bits(4)
        .init(&tokens)
        .unwrap();
    let results = trainer.train().unwrap();

    let tok = |v: u32| Tok::from_u32(v).unwrap();
    assert_eq!(
        results.merges,
        vec![((tok(98), tok(99)), tok(256)), ((tok(256), tok(256)), tok(257))]
    );
    assert_eq!(
        results.tokens,
        vec![tok(97), tok(257), tok(100), tok(101)]
    );
}

#[test]
fn end_to_end_token_u16_count_u32() {
    end_to_end_scenario::<u16, u32>();
}

#[test]
fn end_to_end_token_u32_count_u32() {
    end_to_end_scenario::<u32, u32>();
}

#[test]
fn end_to_end_token_u64_count_usize() {
    end_to_end_scenario::<u64, usize>();
}

#[test]
fn overlapping_run_collapses_left_to_right() {
    // "a a a a" counts (a, a) at 3, but left-to-right non-overlapping
    // rewriting applies only 2 sites; the overlap windows evaporate
    // without re-pairing against consumed tokens.
    let tokens = widen(b"aaaa");
    let mut trainer: PairMergeTrainer<T, C> =
        PairMergeTrainerOptions::new(300).init(&tokens).unwrap();

    let step = trainer.step().unwrap().unwrap();
    assert_eq!(step.pair, (97, 97));
    assert_eq!(step.count, 3);
    assert_eq!(step.sites, 2);
    assert_eq!(trainer.sequence().to_tokens(), vec![256, 256]);

    let step = trainer.step().unwrap().unwrap();
    assert_eq!(step.pair, (256, 256));
    assert_eq!(step.token, 257);
    assert_eq!(trainer.sequence().to_tokens(), vec![257]);

    // One live token left: terminated.
    assert!(trainer.step().unwrap().is_none());
}
