//! HTML rendering for the form and the emissions dashboard.

use cbam_core::{EstimateReport, EstimateRow, FlowCode, ReferenceData};
use std::fmt::Write;

const BOOTSTRAP_CSS: &str = "https://stackpath.bootstrapcdn.com/bootstrap/4.5.2/css/bootstrap.min.css";

/// Dashboard column headings, in display order.
pub const COLUMNS: [&str; 19] = [
    "Year",
    "Period",
    "Trade Flow",
    "Reporter",
    "Partner",
    "2nd Partner",
    "Commodity Code",
    "Commodity Desc",
    "Trade Value (US$)",
    "Net Weight (kg)",
    "Net Weight (ton)",
    "Alternate Qty",
    "Final Weight (ton)",
    "directFactor",
    "indirectFactor",
    "totalFactor",
    "CO2_Direct",
    "CO2_Indirect",
    "CO2_Total",
];

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Emissions cell text, e.g. `"15.00 ton CO₂"`.
pub fn format_co2(tonnes: f64) -> String {
    format!("{tonnes:.2} ton CO₂")
}

fn page(title: &str, style: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <link rel="stylesheet" href="{BOOTSTRAP_CSS}">
    <style>{style}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

fn option(value: &str, label: &str) -> String {
    format!(
        r#"<option value="{}">{}</option>"#,
        escape(value),
        escape(label)
    )
}

/// The input form, with selects built from the catalogs.
pub fn render_form(reference: &ReferenceData) -> String {
    let reporters: Vec<String> = reference
        .countries
        .iter()
        .map(|c| {
            option(
                &c.combined(),
                &format!("{} | {}", c.country_name, c.numeric_id),
            )
        })
        .collect();
    let commodities: Vec<String> = reference
        .commodities
        .iter()
        .map(|c| option(&c.combined(), &format!("{} - {}", c.hs_code, c.description)))
        .collect();
    let flows: Vec<String> = [FlowCode::Import, FlowCode::Export]
        .iter()
        .map(|f| option(f.code(), f.label()))
        .collect();

    let body = format!(
        r#"<div class="container">
  <h1>CBAM CO₂ Emissions Estimator for Imports</h1>
  <form method="POST" action="/compute">
    <div class="form-group">
      <label for="year">Year (YYYY):</label>
      <input type="text" class="form-control" name="year" value="2021" required/>
    </div>
    <div class="form-group">
      <label for="reporter">Reporter Country (Country | ID):</label>
      <select name="reporter" class="form-control" required>{}</select>
    </div>
    <div class="form-group">
      <label for="flowCode">Flow Code:</label>
      <select name="flowCode" class="form-control" required>{}</select>
    </div>
    <div class="form-group">
      <label for="HSCodeDesc">HS Code + Description:</label>
      <select name="HSCodeDesc" class="form-control" required>{}</select>
    </div>
    <button type="submit" class="btn btn-primary">Compute</button>
  </form>
</div>"#,
        reporters.join("\n"),
        flows.join("\n"),
        commodities.join("\n"),
    );

    page(
        "CBAM CO₂ Emissions Estimator for Imports",
        "body {font-family: Arial, sans-serif; margin: 40px; background-color: #f8f9fa;} \
         .container {background-color: #ffffff; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1);}",
        &body,
    )
}

fn cells(row: &EstimateRow) -> [String; 19] {
    let t = &row.trade;
    let e = &row.estimate;
    [
        row.year.clone(),
        t.period.clone(),
        t.trade_flow_desc.clone(),
        t.reporter_desc.clone(),
        t.partner_desc.clone(),
        t.second_partner_desc.clone(),
        t.commodity_code.clone(),
        t.commodity_desc.clone(),
        t.trade_value_usd.to_string(),
        t.net_weight_kg.to_string(),
        row.net_weight_ton.to_string(),
        t.alternate_qty.to_string(),
        e.final_weight_ton.to_string(),
        e.direct_factor.to_string(),
        e.indirect_factor.to_string(),
        e.total_factor.to_string(),
        format_co2(e.co2_direct),
        format_co2(e.co2_indirect),
        format_co2(e.co2_total),
    ]
}

/// The emissions dashboard for a completed estimate.
pub fn render_report(report: &EstimateReport) -> String {
    let mut table = String::from(
        r#"<table class="table table-striped table-bordered"><thead><tr>"#,
    );
    for column in COLUMNS {
        let _ = write!(table, "<th>{}</th>", escape(column));
    }
    table.push_str("</tr></thead><tbody>");
    for row in &report.rows {
        table.push_str("<tr>");
        for cell in cells(row) {
            let _ = write!(table, "<td>{}</td>", escape(&cell));
        }
        table.push_str("</tr>");
    }
    table.push_str("</tbody></table>");

    let heading = format!(
        "CBAM CO₂ Emissions Dashboard for year={}, HSCode={} ({}), Flow={}",
        report.year, report.commodity.code, report.commodity.description, report.flow
    );
    let body = format!(
        r#"<div class="container dashboard-container">
  <h3>{}</h3>
  <div class="table-responsive">{table}</div>
</div>"#,
        escape(&heading),
    );

    page(
        "CBAM CO₂ Emissions Dashboard",
        "body {background-color: #f6f8fa; color: #222; font-family: Arial, sans-serif; margin: 20px;} \
         .dashboard-container {background-color: #fff; padding: 20px; border-radius: 8px;} \
         .table-responsive {overflow-x: auto;} table th, table td {font-size:13px;}",
        &body,
    )
}

/// A page with a single message heading.
pub fn render_message(message: &str) -> String {
    page(
        "CBAM CO₂ Emissions Estimator",
        "body {font-family: Arial, sans-serif; margin: 40px;}",
        &format!("<h3>{}</h3>", escape(message)),
    )
}

/// User-facing message for a request-scoped estimator error.
pub fn error_message(err: &cbam_core::Error) -> String {
    use cbam_core::Error as E;
    match err {
        E::InvalidInput { .. } => "Error: Invalid input.".to_string(),
        E::Upstream { status, body } => format!("Error: {status} => {body}"),
        E::NoData => "No data found for selection.".to_string(),
        E::NoDataAfterFilter => "No data after filter (TOTAL MOT/CPC).".to_string(),
        other => format!("Error: {other}"),
    }
}
