// tests/report_tally_property.rs

use proptest::prelude::*;
use wrapup::outcome::{
    Delivered, DeliveryStatus, FanOutReport, Outcome, OutcomeMap, RecipientResult,
};
use wrapup::report::Tally;

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Success(Delivered::Pending { message: "ok".into() })),
        Just(Outcome::skipped("off")),
        Just(Outcome::error("failed")),
        Just(Outcome::Warning {
            reason: "degraded".into(),
            parent_branch: "develop".into(),
        }),
        Just(Outcome::PartialSuccess(FanOutReport::from_details(vec![
            RecipientResult {
                recipient: "A".into(),
                phone: "1".into(),
                status: DeliveryStatus::Success,
                reason: None,
                exit_code: None,
            },
            RecipientResult {
                recipient: "B".into(),
                phone: "2".into(),
                status: DeliveryStatus::Error,
                reason: Some("x".into()),
                exit_code: Some(1),
            },
        ]))),
    ]
}

proptest! {
    #[test]
    fn tally_reconciles_with_channel_count(outcomes in proptest::collection::vec(outcome_strategy(), 0..12)) {
        let map: OutcomeMap = outcomes
            .into_iter()
            .enumerate()
            .map(|(i, o)| (format!("ch{i}"), o))
            .collect();

        let tally = Tally::from_outcomes(&map);

        prop_assert_eq!(tally.total, map.len());
        prop_assert_eq!(tally.success + tally.skipped as f64 + tally.error, map.len() as f64);
        prop_assert!(tally.success_shown() as usize + tally.skipped + tally.errors_shown() as usize <= map.len());
    }
}
