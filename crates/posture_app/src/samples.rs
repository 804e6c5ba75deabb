//! Built-in sample data from the dashboard's widget library and compliance
//! status card.

use posture_export::{Record, Report, Widget};

pub const SAMPLE_REPORT_TITLE: &str = "New Custom Report";
pub const SAMPLE_SHEET_NAME: &str = "compliance_frameworks";

pub fn sample_widgets() -> Vec<Widget> {
    vec![
        Widget::new("Compliance Score Chart", "chart").with_id("w1"),
        Widget::new("Risk Heatmap", "chart").with_id("w2"),
        Widget::new("Vulnerabilities List", "table").with_id("w3"),
        Widget::new("Executive Summary", "text").with_id("w4"),
        Widget::new("Control Status", "metric").with_id("w5"),
        Widget::new("Incident Trend", "chart").with_id("w6"),
    ]
}

pub fn sample_report() -> Report {
    Report::new(SAMPLE_REPORT_TITLE, sample_widgets())
}

pub fn sample_records() -> Vec<Record> {
    [
        ("HIPAA", 98, "compliant"),
        ("PCI-DSS", 94, "compliant"),
        ("SOC 2", 96, "compliant"),
        ("SOX", 100, "compliant"),
        ("ISO 27001", 88, "in-progress"),
    ]
    .into_iter()
    .map(|(name, score, status)| {
        Record::new()
            .with("name", name)
            .with("score", i64::from(score))
            .with("status", status)
    })
    .collect()
}
