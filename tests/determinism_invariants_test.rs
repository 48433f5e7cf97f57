use lottery_core::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HOUR: i64 = 3600;

fn create_env(timestamp: i64) -> TxEnv {
    TxEnv {
        tx_id: "tx-create".to_string(),
        block_height: 42,
        timestamp,
        caller: "hive:creator".to_string(),
    }
}

fn params() -> CreateParams {
    CreateParams {
        name: "Determinism Lottery".to_string(),
        deadline_hours: 12,
        burn_percent: 10,
        ticket_price: Amount::from_value(2.0),
        asset: "HIVE".to_string(),
        winner_shares: vec![60, 40],
        max_tickets: 0,
        donation_account: String::new(),
        donation_percent: 0,
        annotation: String::new(),
    }
}

/// Runs an identical create/join/execute script and returns the summary.
fn run_script(joins: &[(&str, f64)]) -> ExecutionSummary {
    let mut host = MemoryHost::new();
    host.set_env(create_env(1_000));
    let mut engine = LotteryEngine::new(host);
    let id = engine.create(params()).unwrap();

    for (i, (who, offer)) in joins.iter().enumerate() {
        engine.host_mut().set_caller(who, 2_000 + i as i64);
        engine.join(id, Amount::from_value(*offer), "HIVE").unwrap();
    }

    engine.host_mut().set_env(TxEnv {
        tx_id: "tx-exec".to_string(),
        block_height: 77,
        timestamp: 1_000 + 13 * HOUR,
        caller: "hive:executor".to_string(),
    });
    engine.execute(id).unwrap()
}

#[test]
fn test_identical_environments_produce_identical_executions() {
    let joins = [
        ("hive:a", 6.0),
        ("hive:b", 2.0),
        ("hive:c", 10.0),
        ("hive:d", 4.0),
    ];
    let first = run_script(&joins);
    let second = run_script(&joins);

    assert_eq!(first.seed, second.seed);
    assert_eq!(first.winners, second.winners);
    assert_eq!(first.burned, second.burned);
    assert_eq!(first.pool, second.pool);
}

#[test]
fn test_seed_matches_pure_derivation() {
    let joins = [("hive:a", 2.0), ("hive:b", 2.0)];
    let summary = run_script(&joins);
    let expected = derive_seed(&TxEnv {
        tx_id: "tx-exec".to_string(),
        block_height: 77,
        timestamp: 1_000 + 13 * HOUR,
        caller: "hive:executor".to_string(),
    });
    assert_eq!(summary.seed, expected);
}

#[test]
fn test_join_accounting_is_additive() {
    // Joining with X then Y equals one join with X+Y when neither loses
    // value to floor division (amounts are whole multiples of the price).
    let mut host = MemoryHost::new();
    host.set_env(create_env(1_000));
    let mut split = LotteryEngine::new(host);
    let id = split.create(params()).unwrap();
    split.host_mut().set_caller("hive:a", 2_000);
    split.join(id, Amount::from_value(6.0), "HIVE").unwrap();
    split.join(id, Amount::from_value(4.0), "HIVE").unwrap();

    let mut host = MemoryHost::new();
    host.set_env(create_env(1_000));
    let mut single = LotteryEngine::new(host);
    let id2 = single.create(params()).unwrap();
    single.host_mut().set_caller("hive:a", 2_000);
    single.join(id2, Amount::from_value(10.0), "HIVE").unwrap();

    assert_eq!(split.stats(id).unwrap(), single.stats(id2).unwrap());
    assert_eq!(
        split.participants(id).unwrap(),
        single.participants(id2).unwrap()
    );
}

#[test]
fn test_winner_count_is_min_of_slots_and_distinct() {
    for participant_count in 1..=5u64 {
        let joins: Vec<(String, f64)> = (0..participant_count)
            .map(|i| (format!("hive:p{}", i), 2.0))
            .collect();
        let join_refs: Vec<(&str, f64)> =
            joins.iter().map(|(w, o)| (w.as_str(), *o)).collect();
        let summary = run_script(&join_refs);
        let slots = params().winner_shares.len() as u64;
        assert_eq!(
            summary.winners.len() as u64,
            participant_count.min(slots),
            "participants={}",
            participant_count
        );
    }
}

#[test]
fn test_selection_determinism_over_random_populations() {
    // Populations are generated with a seeded RNG so the test itself is
    // reproducible; the property under test is that selection over any
    // population is a pure function of (participants, seed).
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let n = rng.gen_range(1..=60);
        let participants: Vec<ParticipantEntry> = (0..n)
            .map(|i| ParticipantEntry {
                address: format!("hive:p{}", i),
                tickets: rng.gen_range(1..=25),
            })
            .collect();
        let total: u64 = participants.iter().map(|p| p.tickets).sum();
        let k = rng.gen_range(1..=7usize);
        let seed: u64 = rng.gen();

        let a = select_winners(&participants, total, k, seed);
        let b = select_winners(&participants, total, k, seed);
        assert_eq!(a, b);
        assert_eq!(a.len(), k.min(participants.len()));

        // Distinctness.
        let mut dedup = a.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), a.len());
    }
}

#[test]
fn test_conservation_over_random_executions() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        let n = rng.gen_range(1..=8);
        let joins: Vec<(String, f64)> = (0..n)
            .map(|i| (format!("hive:p{}", i), rng.gen_range(1..=10) as f64 * 2.0))
            .collect();
        let join_refs: Vec<(&str, f64)> =
            joins.iter().map(|(w, o)| (w.as_str(), *o)).collect();
        let summary = run_script(&join_refs);

        let paid: Amount = summary.winners.iter().map(|w| w.amount).sum();
        assert_eq!(summary.burned + summary.donated + paid, summary.pool);
    }
}
