//! Subcommand implementations.

use crate::config::CbamConfig;
use anyhow::{Context, Result};
use cbam_api::{AppState, Server};
use cbam_comtrade::ComtradeClient;
use cbam_core::{
    EstimateReport, EstimateRequest, Estimator, RawEstimateRequest, ReferenceContext,
    ReferenceData, ResolutionTables,
};
use std::fmt::Write;
use std::sync::Arc;

/// Catalog selectable with `cbam catalog`.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// Reporter countries (`Name|ID`).
    Countries,
    /// HS commodities (`Code|Description`).
    Commodities,
}

/// Load reference data and build the shared context. Failure is fatal.
pub fn load_context(config: &CbamConfig) -> Result<Arc<ReferenceContext>> {
    let reference = ReferenceData::load(&config.reference).with_context(|| {
        format!(
            "Failed to load reference data from {}",
            config.reference.path.display()
        )
    })?;
    let tables = ResolutionTables::from_config(&config.resolution);
    Ok(Arc::new(ReferenceContext::new(reference, tables)))
}

fn estimator(config: &CbamConfig, context: Arc<ReferenceContext>) -> Result<Estimator> {
    let client = ComtradeClient::new(&config.comtrade).context("Failed to build trade API client")?;
    if !client.is_authenticated() {
        tracing::warn!("No COMTRADE_API_KEY configured; requests are sent without a subscription key");
    }
    Ok(Estimator::new(context, Arc::new(client)))
}

/// `cbam serve`
pub async fn serve(config: CbamConfig) -> Result<()> {
    let context = load_context(&config)?;
    let estimator = estimator(&config, context)?;
    let server = Server::new(config.server, AppState::new(estimator));
    server.serve().await.context("Server stopped")?;
    Ok(())
}

/// `cbam estimate`
pub async fn estimate(config: CbamConfig, raw: RawEstimateRequest, json: bool) -> Result<()> {
    let request = EstimateRequest::parse(&raw)?;
    let context = load_context(&config)?;
    let estimator = estimator(&config, context)?;

    match estimator.estimate(&request).await {
        Ok(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
        Ok(report) => print!("{}", render_report(&report)),
        Err(err) if err.is_empty_result() => println!("{err}"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// `cbam catalog`
pub fn catalog(config: &CbamConfig, kind: CatalogKind) -> Result<()> {
    let reference = ReferenceData::load(&config.reference)?;
    let lines: Vec<String> = match kind {
        CatalogKind::Countries => reference.countries.iter().map(|c| c.combined()).collect(),
        CatalogKind::Commodities => reference.commodities.iter().map(|c| c.combined()).collect(),
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// Plain-text rendering of a report.
pub fn render_report(report: &EstimateReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "CBAM CO₂ emissions: year={} reporter={} flow={} HS={} ({})",
        report.year,
        report.reporter.name,
        report.flow,
        report.commodity.code,
        report.commodity.description
    );
    let _ = writeln!(
        out,
        "{:<32} {:>14} {:>10} {:>10} {:>10} {:>14}  {}",
        "Partner", "Weight (t)", "Direct", "Indirect", "Total", "CO2 (t)", "Source"
    );
    for row in &report.rows {
        let e = &row.estimate;
        let _ = writeln!(
            out,
            "{:<32} {:>14.2} {:>10} {:>10} {:>10} {:>14.2}  {:?}",
            row.attributed_country,
            e.final_weight_ton,
            e.direct_factor,
            e.indirect_factor,
            e.total_factor,
            e.co2_total,
            row.factor_source
        );
    }
    let _ = writeln!(out, "Total: {:.2} ton CO₂", report.total_co2());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cbam_core::ReferenceConfig;
    use std::fs;

    fn write_reference(dir: &std::path::Path) {
        fs::write(
            dir.join("Sheet1.csv"),
            "Country,Code,Description,Direct,Indirect,Total\nChina,7208,Flat-rolled iron,1,0.5,1.5\n",
        )
        .unwrap();
        fs::write(dir.join("Sheet2.csv"), "HS Code,Description\n7208,Flat-rolled iron\n").unwrap();
        fs::write(dir.join("Sheet3.csv"), "Country,ID\nGermany,276\n").unwrap();
    }

    #[test]
    fn test_load_context() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path());
        let config = CbamConfig {
            reference: ReferenceConfig::at(dir.path()),
            ..CbamConfig::default()
        };

        let context = load_context(&config).unwrap();
        assert_eq!(context.reference().factors.len(), 1);
        assert_eq!(context.reference().countries[0].combined(), "Germany|276");
        assert!(context.tables().is_eu_member("France"));
    }

    #[test]
    fn test_load_context_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = CbamConfig {
            reference: ReferenceConfig::at(dir.path().join("missing")),
            ..CbamConfig::default()
        };
        let err = load_context(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to load reference data"));
    }

    #[tokio::test]
    async fn test_estimate_rejects_bad_request_before_loading() {
        let raw = RawEstimateRequest {
            reporter: "Germany".to_string(),
            hs_code_desc: "7208|Flat-rolled iron".to_string(),
            ..RawEstimateRequest::default()
        };
        let err = estimate(CbamConfig::default(), raw, false).await.unwrap_err();
        assert!(err.to_string().contains("Invalid input"));
    }
}
