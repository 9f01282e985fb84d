//! Integration tests for the fetch-then-resolve pipeline.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use cbam_core::{
    EstimateRequest, Error, FactorSource, FlowCode, PartnerAttribution, RawEstimateRequest,
};
use common::{TestHarness, by_mode, comtrade_record, steel_factor};
use serde_json::json;

fn germany_steel_request() -> EstimateRequest {
    EstimateRequest::parse(&RawEstimateRequest {
        year: "2021".to_string(),
        reporter: "Germany|276".to_string(),
        flow_code: "M".to_string(),
        hs_code_desc: "7208|Flat-rolled iron".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_germany_flat_rolled_iron() {
    let harness = TestHarness::new(
        vec![steel_factor("Germany", 1.0, 0.5, 1.5)],
        vec![comtrade_record("Germany", "World", json!(10000), json!(0))],
    );

    let report = harness
        .estimator
        .estimate(&germany_steel_request())
        .await
        .unwrap();

    assert_eq!(report.year, "2021");
    assert_eq!(report.flow, FlowCode::Import);
    assert_eq!(report.rows.len(), 1);

    let row = &report.rows[0];
    assert_eq!(row.year, "2021");
    assert_eq!(row.factor_source, FactorSource::Country);
    assert_eq!(row.estimate.final_weight_ton, 10.0);
    assert_eq!(row.estimate.co2_direct, 10.0);
    assert_eq!(row.estimate.co2_indirect, 5.0);
    assert_eq!(row.estimate.co2_total, 15.0);
    assert_eq!(row.trade.trade_value_usd, 8_250_000.46);
    assert_eq!(report.total_co2(), 15.0);
}

#[tokio::test]
async fn test_query_sent_to_source() {
    let harness = TestHarness::new(
        vec![steel_factor("Germany", 1.0, 0.5, 1.5)],
        vec![comtrade_record("Germany", "World", json!(10000), json!(0))],
    );
    harness
        .estimator
        .estimate(&germany_steel_request())
        .await
        .unwrap();

    let queries = harness.source.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].reporter_code, "276");
    assert_eq!(queries[0].period, "2021");
    assert_eq!(queries[0].flow, FlowCode::Import);
    assert_eq!(queries[0].commodity_code, "7208");
}

#[tokio::test]
async fn test_empty_upstream_is_no_data() {
    let harness = TestHarness::new(vec![steel_factor("Germany", 1.0, 0.5, 1.5)], vec![]);
    let err = harness
        .estimator
        .estimate(&germany_steel_request())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoData));
    assert!(err.is_empty_result());
}

#[tokio::test]
async fn test_only_non_aggregate_rows_is_no_data_after_filter() {
    let record = comtrade_record("China", "World", json!(10000), json!(0));
    let harness = TestHarness::new(
        vec![steel_factor("China", 1.0, 0.5, 1.5)],
        vec![by_mode(&record, "Sea"), by_mode(&record, "Air")],
    );
    let err = harness
        .estimator
        .estimate(&germany_steel_request())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoDataAfterFilter));
}

#[tokio::test]
async fn test_mixed_batch_resolves_through_every_fallback() {
    let harness = TestHarness::new(
        vec![
            steel_factor("China", 2.0, 0.5, 2.5),
            steel_factor("EU", 1.2, 0.3, 1.5),
            steel_factor("Weighted average", 1.8, 0.4, 2.2),
        ],
        vec![
            comtrade_record("World", "China", json!(1000), json!(0)),
            comtrade_record("World", "France", json!(2000), json!(0)),
            comtrade_record("World", "USA", json!(0), json!(3000)),
            comtrade_record("World", "China", json!(1000), json!(0)),
            by_mode(&comtrade_record("World", "India", json!(1000), json!(0)), "Sea"),
        ],
    );

    let report = harness
        .estimator
        .estimate(&germany_steel_request())
        .await
        .unwrap();

    assert_eq!(report.attribution, PartnerAttribution::Secondary);
    let summary: Vec<(&str, FactorSource, f64)> = report
        .rows
        .iter()
        .map(|row| {
            (
                row.attributed_country.as_str(),
                row.factor_source,
                row.estimate.final_weight_ton,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("China", FactorSource::Country, 1.0),
            ("France", FactorSource::EuBloc, 2.0),
            ("United States", FactorSource::WeightedAverage, 3.0),
        ]
    );
    assert_eq!(report.rows[2].estimate.co2_direct, 1.8 * 3.0);
}

#[tokio::test]
async fn test_failure_does_not_affect_later_requests() {
    let harness = TestHarness::new(
        vec![steel_factor("Germany", 1.0, 0.5, 1.5)],
        vec![comtrade_record("Germany", "World", json!(10000), json!(0))],
    );

    let bad = EstimateRequest::parse(&RawEstimateRequest {
        hs_code_desc: "7208|Unknown".to_string(),
        reporter: "Germany|276".to_string(),
        ..Default::default()
    })
    .unwrap();
    let report = harness.estimator.estimate(&bad).await.unwrap();
    assert_eq!(report.rows[0].factor_source, FactorSource::Unresolved);
    assert_eq!(report.rows[0].estimate.co2_total, 0.0);

    let report = harness
        .estimator
        .estimate(&germany_steel_request())
        .await
        .unwrap();
    assert_eq!(report.rows[0].estimate.co2_total, 15.0);
}
