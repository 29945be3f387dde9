use safecalc::history::{CalculationRecord, HistoryLog, HISTORY_CAPACITY, NO_HISTORY};
use safecalc::{ops, EvalError};
use std::time::Duration;

fn evaluated(i: usize) -> CalculationRecord {
    CalculationRecord::Evaluated {
        expr: format!("{i} + 0"),
        result: i as f64,
    }
}

#[test]
fn evicts_oldest_beyond_capacity() {
    let log = HistoryLog::new();

    for i in 0..25 {
        log.append(evaluated(i));
    }

    let snap = log.snapshot();
    assert_eq!(snap.len(), HISTORY_CAPACITY);

    // the 5 oldest were evicted, insertion order preserved
    for (i, record) in snap.iter().enumerate() {
        assert_eq!(record, &evaluated(i + 5));
    }
}

#[test]
fn renders_each_variant() {
    let log = HistoryLog::new();
    assert_eq!(log.render(), NO_HISTORY);

    ops::add(2.0, 3.0, &log);
    ops::power(2.0, 3.0, &log);
    ops::sqrt(9.0, &log).unwrap();
    log.append(CalculationRecord::Evaluated {
        expr: "1 + 1".into(),
        result: 2.0,
    });

    assert_eq!(
        log.render(),
        "\
calculation history:
1. 2 + 3 = 5
2. 2^3 = 8
3. √9 = 3
4. expr: 1 + 1 = 2"
    );
}

#[test]
fn one_notification_per_append_in_order() {
    let log = HistoryLog::new();
    let sub = log.subscribe();

    log.append(evaluated(1));
    log.append(evaluated(2));

    assert_eq!(sub.try_recv(), Some(evaluated(1)));
    assert_eq!(sub.try_recv(), Some(evaluated(2)));
    assert_eq!(sub.try_recv(), None);
}

#[test]
fn unsubscribed_handles_are_removed() {
    let log = HistoryLog::new();
    let gone = log.subscribe();
    let kept = log.subscribe();

    log.unsubscribe(gone);
    log.append(evaluated(1));

    assert_eq!(kept.try_recv(), Some(evaluated(1)));
    assert_eq!(kept.try_recv(), None);
}

#[test]
fn dead_subscriber_does_not_affect_append_or_peers() {
    let log = HistoryLog::new();
    let dead = log.subscribe();
    let live = log.subscribe();

    drop(dead);
    log.append(evaluated(1));

    assert_eq!(live.try_recv(), Some(evaluated(1)));
    assert_eq!(log.snapshot().len(), 1);
}

#[test]
fn concurrent_appends_stay_bounded() {
    let log = HistoryLog::new();
    let sub = log.subscribe();

    std::thread::scope(|s| {
        for t in 0..4 {
            let log = &log;
            s.spawn(move || {
                for i in 0..10 {
                    log.append(evaluated(t * 10 + i));
                }
            });
        }
    });

    assert_eq!(log.snapshot().len(), HISTORY_CAPACITY);

    let mut delivered = 0;
    while sub.recv_timeout(Duration::from_millis(50)).is_some() {
        delivered += 1;
    }
    assert_eq!(delivered, 40);
}

#[test]
fn structured_ops_compute_and_record() {
    let log = HistoryLog::new();

    assert_eq!(ops::add(2.0, 3.0, &log), 5.0);
    assert_eq!(ops::subtract(2.0, 3.0, &log), -1.0);
    assert_eq!(ops::multiply(2.0, 3.0, &log), 6.0);
    assert_eq!(ops::divide(3.0, 2.0, &log).unwrap(), 1.5);
    assert_eq!(ops::power(2.0, 10.0, &log), 1024.0);
    assert_eq!(ops::sqrt(144.0, &log).unwrap(), 12.0);

    assert_eq!(log.snapshot().len(), 6);
}

#[test]
fn failed_ops_record_nothing() {
    let log = HistoryLog::new();

    assert!(matches!(
        ops::divide(1.0, 0.0, &log),
        Err(EvalError::Domain { .. })
    ));
    assert!(matches!(
        ops::sqrt(-4.0, &log),
        Err(EvalError::Domain { .. })
    ));

    assert!(log.snapshot().is_empty());
    assert_eq!(log.render(), NO_HISTORY);
}

#[test]
fn negative_evaluation_cannot_be_square_rooted() {
    let log = HistoryLog::new();
    let v = safecalc::evaluate("-1").unwrap();

    assert!(matches!(ops::sqrt(v, &log), Err(EvalError::Domain { .. })));
}
