use super::*;
use crate::attack::output::{
    MetricLine, classify_line, parse_benchmark_output, parse_timing_csv,
};

#[test]
fn transcript_is_parsed_into_metrics() -> AppResult<()> {
    let metrics = parse_benchmark_output(BENCHMARK_TRANSCRIPT)
        .ok_or_else(|| AppError::validation("Transcript should parse"))?;

    expect_close(metrics.requests_per_second, 250.5, "requests per second")?;
    expect_close(metrics.ms_per_request, 39.92, "time per request")?;
    if metrics.complete_requests != 100 {
        return Err(AppError::validation(format!(
            "Unexpected complete requests: {}",
            metrics.complete_requests
        )));
    }
    let failed = metrics.failed_requests;
    if (failed.total, failed.connect, failed.receive, failed.length, failed.exceptions)
        != (2, 0, 0, 2, 0)
    {
        return Err(AppError::validation(format!("Unexpected failures: {:?}", failed)));
    }
    let codes = metrics.status_codes;
    if (codes.status_2xx, codes.status_3xx, codes.status_4xx, codes.status_5xx) != (2, 1, 1, 1) {
        return Err(AppError::validation(format!("Unexpected status codes: {:?}", codes)));
    }
    if !metrics.error_lines.is_empty() {
        return Err(AppError::validation("No tool errors expected"));
    }
    Ok(())
}

#[test]
fn missing_mean_line_yields_nothing() -> AppResult<()> {
    let text = "Complete requests:      100\nRequests per second:    10.0 [#/sec] (mean)\n";
    if parse_benchmark_output(text).is_some() {
        return Err(AppError::validation("Output without a mean should not parse"));
    }
    Ok(())
}

#[test]
fn concurrent_mean_variant_is_ignored() -> AppResult<()> {
    let line = "Time per request:       3.992 [ms] (mean, across all concurrent requests)";
    if classify_line(line) != MetricLine::Other {
        return Err(AppError::validation("Concurrent mean must not be taken as the mean"));
    }
    Ok(())
}

#[test]
fn breakdown_is_ignored_without_failures() -> AppResult<()> {
    let text = "\
Failed requests:        0
   (Connect: 4, Receive: 0, Length: 0, Exceptions: 0)
Time per request:       5.0 [ms] (mean)
";
    let metrics = parse_benchmark_output(text)
        .ok_or_else(|| AppError::validation("Output should parse"))?;
    if metrics.failed_requests.connect != 0 {
        return Err(AppError::validation("Breakdown should only count with failures"));
    }
    Ok(())
}

#[test]
fn tool_errors_are_collected() -> AppResult<()> {
    let text = "\
apr_socket_recv: Connection reset by peer (104)
Time per request:       5.0 [ms] (mean)
";
    let metrics = parse_benchmark_output(text)
        .ok_or_else(|| AppError::validation("Output should parse"))?;
    if metrics.error_lines != ["apr_socket_recv: Connection reset by peer (104)"] {
        return Err(AppError::validation(format!(
            "Unexpected error lines: {:?}",
            metrics.error_lines
        )));
    }
    Ok(())
}

#[test]
fn connection_times_row_is_not_a_breakdown() -> AppResult<()> {
    if classify_line("Connect:        0    1   0.4      1       3") != MetricLine::Other {
        return Err(AppError::validation("Connection times row misclassified"));
    }
    Ok(())
}

#[test]
fn timing_csv_reads_the_time_column() -> AppResult<()> {
    let samples = parse_timing_csv(TIMING_CSV);
    if samples.len() != 3 {
        return Err(AppError::validation(format!("Unexpected samples: {:?}", samples)));
    }
    expect_close(samples.get(1).copied().unwrap_or_default(), 11.5, "second sample")?;

    let ragged = "Percentage served,Time in ms\n0,1.0\nbroken\n2,x\n3,4.0\n";
    if parse_timing_csv(ragged) != [1.0, 4.0] {
        return Err(AppError::validation("Malformed rows should be skipped"));
    }
    if !parse_timing_csv("Percentage served,Latency\n0,1.0\n").is_empty() {
        return Err(AppError::validation("Unknown header should yield nothing"));
    }
    Ok(())
}

#[test]
fn synthetic_summary_recovers_every_field() -> AppResult<()> {
    let expected = BenchmarkMetrics {
        requests_per_second: 812.25,
        ms_per_request: 12.5,
        complete_requests: 400,
        failed_requests: FailedRequests {
            total: 7,
            connect: 1,
            receive: 2,
            length: 3,
            exceptions: 1,
        },
        status_codes: StatusHistogram {
            status_2xx: 2,
            status_3xx: 0,
            status_4xx: 1,
            status_5xx: 0,
        },
        error_lines: Vec::new(),
    };
    let failed = expected.failed_requests;
    let text = format!(
        "Complete requests:      {}\nFailed requests:        {}\n   (Connect: {}, Receive: {}, Length: {}, Exceptions: {})\nRequests per second:    {} [#/sec] (mean)\nTime per request:       {} [ms] (mean)\nHTTP/1.1 200 OK\nHTTP/1.1 204 No Content\nHTTP/1.1 403 Forbidden\n",
        expected.complete_requests,
        failed.total,
        failed.connect,
        failed.receive,
        failed.length,
        failed.exceptions,
        expected.requests_per_second,
        expected.ms_per_request,
    );
    let parsed = parse_benchmark_output(&text)
        .ok_or_else(|| AppError::validation("Synthetic summary should parse"))?;
    if parsed != expected {
        return Err(AppError::validation(format!(
            "Round trip mismatch: {:?} != {:?}",
            parsed, expected
        )));
    }
    Ok(())
}
