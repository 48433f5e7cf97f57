use lottery_core::*;

const HOUR: i64 = 3600;

fn engine_at(timestamp: i64) -> LotteryEngine<MemoryHost> {
    let mut host = MemoryHost::new();
    host.set_env(TxEnv {
        tx_id: "tx-setup".to_string(),
        block_height: 500,
        timestamp,
        caller: "hive:creator".to_string(),
    });
    LotteryEngine::new(host)
}

fn standard_params() -> CreateParams {
    CreateParams {
        name: "Integration Lottery".to_string(),
        deadline_hours: 24,
        burn_percent: 10,
        ticket_price: Amount::from_value(5.0),
        asset: "HIVE".to_string(),
        winner_shares: vec![50, 30, 20],
        max_tickets: 0,
        donation_account: String::new(),
        donation_percent: 0,
        annotation: String::new(),
    }
}

#[test]
fn test_end_to_end_four_participants_reference_amounts() {
    let mut engine = engine_at(1_000);
    let id = engine.create(standard_params()).unwrap();

    // Four participants, one 5.000 ticket each: pool = 20.000.
    for (i, who) in ["hive:a", "hive:b", "hive:c", "hive:d"].iter().enumerate() {
        engine.host_mut().set_caller(who, 2_000 + i as i64);
        let receipt = engine.join(id, Amount::from_value(5.0), "HIVE").unwrap();
        assert_eq!(receipt.tickets, 1);
        assert_eq!(receipt.cost, Amount::from_value(5.0));
        assert_eq!(receipt.ticket_start, i as u64);
        assert_eq!(receipt.ticket_end, i as u64);
    }

    engine.host_mut().set_env(TxEnv {
        tx_id: "tx-exec".to_string(),
        block_height: 600,
        timestamp: 1_000 + 25 * HOUR,
        caller: "hive:executor".to_string(),
    });
    let summary = engine.execute(id).unwrap();

    assert_eq!(summary.pool, Amount::from_value(20.0));
    assert_eq!(summary.burned, Amount::from_value(2.0));
    assert_eq!(summary.winners.len(), 3);
    assert_eq!(summary.winners[0].amount, Amount::from_value(9.0));
    assert_eq!(summary.winners[1].amount, Amount::from_value(5.4));
    assert_eq!(summary.winners[2].amount, Amount::from_value(3.6));
    assert_eq!(summary.winners[0].share, 50);
    assert_eq!(summary.winners[1].share, 30);
    assert_eq!(summary.winners[2].share, 20);

    // Conservation through the host: everything drawn in was sent out.
    let host = engine.host();
    assert_eq!(host.total_drawn(), Amount::from_value(20.0));
    let sent_out: Amount = summary
        .winners
        .iter()
        .map(|w| host.total_sent_to(&w.address))
        .sum();
    assert_eq!(
        host.total_sent_to(BURN_ADDRESS) + sent_out,
        Amount::from_value(20.0)
    );
    assert_eq!(host.total_sent_to(BURN_ADDRESS), Amount::from_value(2.0));

    // Replay verification with the recorded seed reproduces the winners.
    let recorded_seed = engine.metadata(id).unwrap().random_seed;
    assert_eq!(recorded_seed, summary.seed);
    let outcome = engine.verify(id, recorded_seed).unwrap();
    match outcome {
        Verification::Confirmed(addresses) => {
            let expected: Vec<_> = summary.winners.iter().map(|w| w.address.clone()).collect();
            assert_eq!(addresses, expected);
        }
        other => panic!("expected confirmation, got {:?}", other),
    }
}

#[test]
fn test_end_to_end_floor_division_never_draws_excess() {
    let mut engine = engine_at(1_000);
    let mut params = standard_params();
    params.ticket_price = Amount::from_value(3.0);
    let id = engine.create(params).unwrap();

    engine.host_mut().set_caller("hive:buyer", 2_000);
    let receipt = engine.join(id, Amount::from_value(10.0), "HIVE").unwrap();

    assert_eq!(receipt.tickets, 3);
    assert_eq!(receipt.cost, Amount::from_value(9.0));
    assert_eq!(engine.host().total_drawn(), Amount::from_value(9.0));
    assert_eq!(engine.stats(id).unwrap().pool, Amount::from_value(9.0));
}

#[test]
fn test_end_to_end_fewer_participants_than_slots() {
    let mut engine = engine_at(1_000);
    let id = engine.create(standard_params()).unwrap();

    // Only two distinct participants for three winner slots.
    engine.host_mut().set_caller("hive:a", 2_000);
    engine.join(id, Amount::from_value(5.0), "HIVE").unwrap();
    engine.host_mut().set_caller("hive:b", 2_001);
    engine.join(id, Amount::from_value(5.0), "HIVE").unwrap();

    engine.host_mut().set_caller("hive:executor", 1_000 + 25 * HOUR);
    let summary = engine.execute(id).unwrap();

    // Pool 10.000, burn 1.000, remaining 9.000; two winners get 4.500 and
    // 2.700, the unassigned 20% share (1.800) is swept into the burn.
    assert_eq!(summary.winners.len(), 2);
    assert_eq!(summary.winners[0].amount, Amount::from_value(4.5));
    assert_eq!(summary.winners[1].amount, Amount::from_value(2.7));
    assert_eq!(summary.burned, Amount::from_value(2.8));

    let host = engine.host();
    assert_eq!(host.total_sent_to(BURN_ADDRESS), Amount::from_value(2.8));
    // The undistributed sweep is logged.
    assert!(host.events.iter().any(|e| e.starts_with("lu|")));

    // Full conservation.
    let paid: Amount = summary.winners.iter().map(|w| w.amount).sum();
    assert_eq!(summary.burned + paid, summary.pool);
}

#[test]
fn test_end_to_end_donation_flow() {
    let mut engine = engine_at(1_000);
    let mut params = standard_params();
    params.winner_shares = vec![100];
    params.donation_account = "hive:charity".to_string();
    params.donation_percent = 5;
    let id = engine.create(params).unwrap();

    for (i, who) in ["hive:a", "hive:b"].iter().enumerate() {
        engine.host_mut().set_caller(who, 2_000 + i as i64);
        engine.join(id, Amount::from_value(50.0), "HIVE").unwrap();
    }

    engine.host_mut().set_caller("hive:executor", 1_000 + 25 * HOUR);
    let summary = engine.execute(id).unwrap();

    // Pool 100.000: burn 10.000, donation 5.000, winner 85.000.
    assert_eq!(summary.burned, Amount::from_value(10.0));
    assert_eq!(summary.donated, Amount::from_value(5.0));
    assert_eq!(summary.winners[0].amount, Amount::from_value(85.0));

    let host = engine.host();
    assert_eq!(host.total_sent_to("hive:charity"), Amount::from_value(5.0));
    assert!(host.events.iter().any(|e| e.starts_with("ld|")));

    let meta = engine.metadata(id).unwrap();
    assert_eq!(meta.donated_amount, Amount::from_value(5.0));
}

#[test]
fn test_audit_event_stream_covers_lifecycle() {
    let mut engine = engine_at(1_000);
    let mut params = standard_params();
    params.annotation = "season-1".to_string();
    let id = engine.create(params).unwrap();

    engine.host_mut().set_caller("hive:a", 2_000);
    engine.join(id, Amount::from_value(10.0), "HIVE").unwrap();
    engine.host_mut().set_caller("hive:b", 2_001);
    engine.join(id, Amount::from_value(5.0), "HIVE").unwrap();

    engine.host_mut().set_caller("hive:executor", 1_000 + 25 * HOUR);
    let summary = engine.execute(id).unwrap();

    let events = &engine.host().events;
    assert!(events[0].starts_with("lc|id:1|"));
    assert!(events[1].starts_with("lm|id:1|")); // creation-time annotation
    assert_eq!(events.iter().filter(|e| e.starts_with("lj|")).count(), 2);
    assert_eq!(
        events.iter().filter(|e| e.starts_with("lp|")).count(),
        summary.winners.len()
    );

    // The executed event carries the exact computed seed and totals.
    let executed = events.iter().find(|e| e.starts_with("le|")).unwrap();
    assert!(executed.contains(&format!("seed:{}", summary.seed)));
    assert!(executed.contains("pool:15.000"));
    assert!(executed.contains("tickets:3"));
    assert!(executed.contains("participants:2"));

    // Join events carry ticket ranges.
    assert!(events.iter().any(|e| e.contains("ticket_start:0|ticket_end:1")));
    assert!(events.iter().any(|e| e.contains("ticket_start:2|ticket_end:2")));
}

#[test]
fn test_records_survive_reload() {
    // Everything needed for audit must round-trip through the persisted
    // records: rebuild an engine over the same raw state and verify.
    let mut engine = engine_at(1_000);
    let id = engine.create(standard_params()).unwrap();
    for (i, who) in ["hive:a", "hive:b", "hive:c"].iter().enumerate() {
        engine.host_mut().set_caller(who, 2_000 + i as i64);
        engine.join(id, Amount::from_value(5.0), "HIVE").unwrap();
    }
    engine.host_mut().set_caller("hive:executor", 1_000 + 25 * HOUR);
    let summary = engine.execute(id).unwrap();

    let mut fresh_host = MemoryHost::new();
    for (key, value) in engine.host().raw_state() {
        fresh_host.state_set(key, value.clone());
    }
    let fresh = LotteryEngine::new(fresh_host);

    let meta = fresh.metadata(id).unwrap();
    assert_eq!(meta.state, LotteryState::Executed);
    assert_eq!(meta.random_seed, summary.seed);
    assert_eq!(meta.winners, summary.winners);
    assert!(fresh.verify(id, summary.seed).unwrap().is_confirmed());
}
