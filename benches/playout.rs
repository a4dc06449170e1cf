//! Simulator throughput: determinization, rollouts and one card search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use napoleon::ai::{choose_adjutant_card, choose_discards};
use napoleon::core::{GameRng, GameState, NapoleonDeclaration, PlayerId, Suit};
use napoleon::mcts::{CardSearch, HeuristicRollout, RandomRollout, RolloutPolicy, SearchConfig};
use napoleon::rules::{declare, exchange_cards, initialize_game, pass, set_adjutant};
use napoleon::sim::determinize;

fn playing_state(seed: u64) -> GameState {
    let mut state = initialize_game(["A", "B", "C", "D"], seed);
    state = declare(&state, NapoleonDeclaration::new(PlayerId::new(0), 13, Suit::Spades))
        .expect("declare");
    for seat in 1..4 {
        state = pass(&state, PlayerId::new(seat)).expect("pass");
    }
    let card = choose_adjutant_card(&state, PlayerId::new(0));
    state = set_adjutant(&state, card).expect("adjutant");
    let discard = choose_discards(&state, PlayerId::new(0));
    exchange_cards(&state, PlayerId::new(0), &discard).expect("exchange")
}

fn bench_playouts(c: &mut Criterion) {
    let state = playing_state(42);

    c.bench_function("determinize", |b| {
        let mut rng = GameRng::new(1);
        b.iter(|| determinize(black_box(&state), PlayerId::new(1), &mut rng))
    });

    c.bench_function("random_rollout", |b| {
        let mut rng = GameRng::new(2);
        b.iter(|| {
            let mut sim = state.clone();
            RandomRollout.rollout(&mut sim, &mut rng)
        })
    });

    c.bench_function("heuristic_rollout", |b| {
        let policy = HeuristicRollout::default();
        let mut rng = GameRng::new(3);
        b.iter(|| {
            let mut sim = state.clone();
            policy.rollout(&mut sim, &mut rng)
        })
    });

    let config = SearchConfig::fast().with_time_limit(None).with_seed(4);
    c.bench_function("card_search_fast", |b| {
        b.iter(|| CardSearch::new(config.clone()).search(black_box(&state), PlayerId::new(0)))
    });
}

criterion_group!(benches, bench_playouts);
criterion_main!(benches);
