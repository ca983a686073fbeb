//! Summary command - per-service span counts and durations

use std::collections::BTreeMap;

use anyhow::Result;
use shop_trace::SpanRecord;

use crate::output::{OutputContext, SummaryRow};

pub fn summary(spans: &[SpanRecord], ctx: &OutputContext) -> Result<()> {
    let rows = summarize(spans);
    if rows.is_empty() {
        ctx.info("No spans recorded");
        return Ok(());
    }

    ctx.print(&rows);
    Ok(())
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    min_us: u64,
    max_us: u64,
    total_us: u64,
}

fn summarize(spans: &[SpanRecord]) -> Vec<SummaryRow> {
    // BTreeMap keeps the services in a stable alphabetical order
    let mut per_service: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for span in spans {
        let acc = per_service.entry(span.service.as_str()).or_default();
        let us = span.duration_us.unwrap_or(0);
        if acc.count == 0 {
            acc.min_us = us;
            acc.max_us = us;
        } else {
            acc.min_us = acc.min_us.min(us);
            acc.max_us = acc.max_us.max(us);
        }
        acc.count += 1;
        acc.total_us += us;
    }

    per_service
        .into_iter()
        .map(|(service, acc)| SummaryRow {
            service: service.to_string(),
            spans: acc.count,
            min_ms: format_ms(acc.min_us),
            avg_ms: format_ms(acc.total_us / acc.count as u64),
            max_ms: format_ms(acc.max_us),
        })
        .collect()
}

fn format_ms(us: u64) -> String {
    format!("{:.2}", us as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shop_trace::SpanStatus;

    use super::*;
    use crate::commands::testutil::span;

    #[test]
    fn groups_spans_by_service_in_stable_order() {
        let spans = vec![
            span("user-service", "get_all_users", 1_000, SpanStatus::Ok),
            span("order-service", "create_order", 8_000, SpanStatus::Ok),
            span("user-service", "get_user_by_id", 3_000, SpanStatus::Ok),
        ];

        let rows = summarize(&spans);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].service, "order-service");
        assert_eq!(rows[1].service, "user-service");
        assert_eq!(rows[1].spans, 2);
    }

    #[test]
    fn reports_min_avg_max_in_milliseconds() {
        let spans = vec![
            span("shopd", "get_user_orders_aggregate", 1_000, SpanStatus::Ok),
            span("shopd", "get_user_orders_aggregate", 3_000, SpanStatus::Ok),
        ];

        let rows = summarize(&spans);
        assert_eq!(rows[0].min_ms, "1.00");
        assert_eq!(rows[0].avg_ms, "2.00");
        assert_eq!(rows[0].max_ms, "3.00");
    }

    #[test]
    fn no_spans_means_no_rows() {
        assert!(summarize(&[]).is_empty());
    }
}
