use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};

use super::aggregate::{AggregateReport, CDF_POINTS};
use crate::error::AttackError;

const MEDIAN_PERCENT: usize = 50;
const NINETIETH_PERCENT: usize = 90;

pub const VERDICT_REJECTED: &str = "Your targets performance tests did not meet our standard.";
pub const VERDICT_ACCEPTED: &str =
    "Your targets performance tests meet our standards, the Queen sends her regards.";

/// Qualitative band for a mean response time.
#[must_use]
pub fn mission_assessment(mean_response_ms: f64) -> &'static str {
    if mean_response_ms < 500.0 {
        "Target crushed bee offensive."
    } else if mean_response_ms < 1000.0 {
        "Target successfully fended off the swarm."
    } else if mean_response_ms < 1500.0 {
        "Target wounded, but operational."
    } else if mean_response_ms < 2000.0 {
        "Target severely compromised."
    } else {
        "Swarm annihilated target."
    }
}

/// Human readable summary, one entry per printed line.
#[must_use]
pub fn render_lines(report: &AggregateReport) -> Vec<String> {
    let mut lines = Vec::new();

    if report.num_exception > 0 {
        lines.push(format!(
            "     {} of your bees didn't make it to the action. They might be taking a little longer than normal to find their machine guns, or may have been terminated without using \"bees disband\".",
            report.num_exception
        ));
    }
    if report.num_timeout > 0 {
        lines.push(format!(
            "     Target timed out without fully responding to {} bees.",
            report.num_timeout
        ));
    }
    let Some(mean_response) = report.mean_response.millis() else {
        lines.push(
            "     No bees completed the mission. Apparently your bees are peace-loving hippies."
                .to_owned(),
        );
        return lines;
    };

    let failed = report.failed_requests;
    let codes = report.status_codes;
    lines.push(format!("     Complete requests:\t\t{}", report.complete_requests));
    lines.push(format!("     Failed requests:\t\t{}", failed.total));
    lines.push(format!("          connect:\t\t{}", failed.connect));
    lines.push(format!("          receive:\t\t{}", failed.receive));
    lines.push(format!("          length:\t\t{}", failed.length));
    lines.push(format!("          exceptions:\t\t{}", failed.exceptions));
    lines.push("     Response Codes:".to_owned());
    lines.push(format!("          2xx:\t\t{}", codes.status_2xx));
    lines.push(format!("          3xx:\t\t{}", codes.status_3xx));
    lines.push(format!("          4xx:\t\t{}", codes.status_4xx));
    lines.push(format!("          5xx:\t\t{}", codes.status_5xx));
    lines.push(format!(
        "     Requests per second:\t{:.6} [#/sec] (mean of bees)",
        report.mean_requests
    ));
    if let Some(min_rps) = report.thresholds.min_rps {
        lines.push(format!(
            "     Requests per second:\t{:.6} [#/sec] (upper bounds)",
            min_rps
        ));
    }
    lines.push(format!(
        "     Time per request:\t\t{:.6} [ms] (mean of bees)",
        mean_response
    ));
    if let Some(max_mean_ms) = report.thresholds.max_mean_ms {
        lines.push(format!(
            "     Time per request:\t\t{:.6} [ms] (lower bounds)",
            max_mean_ms
        ));
    }
    for percent in [MEDIAN_PERCENT, NINETIETH_PERCENT] {
        if let Some(value) = report.percentile(percent) {
            lines.push(format!(
                "     {}% responses faster than:\t{:.6} [ms]",
                percent, value
            ));
        }
    }
    if let Some(accepted) = report.performance_accepted {
        let check = if accepted { "passed" } else { "failed" };
        lines.push(format!("     Performance check:\t\t{}", check));
    }
    lines.push(format!(
        "Mission Assessment: {}",
        mission_assessment(mean_response)
    ));
    lines
}

/// Verdict line, present only when a threshold was evaluated.
#[must_use]
pub const fn verdict_line(report: &AggregateReport) -> Option<&'static str> {
    match report.performance_accepted {
        Some(true) => Some(VERDICT_ACCEPTED),
        Some(false) => Some(VERDICT_REJECTED),
        None => None,
    }
}

/// Percentile table: the reconstructed distribution plus each completed
/// bee's own timings, `inf` where a column runs short.
#[must_use]
pub fn render_csv(report: &AggregateReport) -> String {
    let mut header = vec!["% faster than".to_owned(), "all bees [ms]".to_owned()];
    header.extend(
        report
            .complete
            .iter()
            .map(|bee| format!("bee {} [ms]", bee.job.endpoint.id)),
    );

    let mut rows = vec![
        header
            .iter()
            .map(String::as_str)
            .map(csv_cell)
            .collect::<Vec<_>>()
            .join(","),
    ];
    for point in 0..CDF_POINTS {
        let mut row = vec![point.to_string(), csv_number(report.request_time_cdf.get(point))];
        row.extend(
            report
                .complete
                .iter()
                .map(|bee| csv_number(bee.raw_sample_times.get(point))),
        );
        rows.push(row.join(","));
    }
    let mut text = rows.join("\n");
    text.push('\n');
    text
}

/// Writes [`render_csv`] to `path`.
///
/// # Errors
///
/// Returns [`AttackError::CsvWrite`] when the file cannot be written.
pub async fn write_csv(path: &Path, report: &AggregateReport) -> Result<(), AttackError> {
    let wrap = |err: std::io::Error| AttackError::CsvWrite {
        path: path.to_path_buf(),
        source: err,
    };
    let file = tokio::fs::File::create(path).await.map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render_csv(report).as_bytes())
        .await
        .map_err(wrap)?;
    writer.flush().await.map_err(wrap)?;
    Ok(())
}

fn csv_number(value: Option<&f64>) -> String {
    value.map_or_else(|| "inf".to_owned(), ToString::to_string)
}

fn csv_cell(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
