//! Slow command - spans over a duration threshold

use anyhow::Result;
use shop_trace::SpanRecord;

use crate::output::{status_label, OutputContext, SlowRow};

pub fn slow(spans: &[SpanRecord], threshold_ms: f64, ctx: &OutputContext) -> Result<()> {
    let rows = slower_than(spans, threshold_ms);
    if rows.is_empty() {
        ctx.success(&format!("No spans slower than {} ms", threshold_ms));
        return Ok(());
    }

    ctx.print(&rows);
    Ok(())
}

fn slower_than(spans: &[SpanRecord], threshold_ms: f64) -> Vec<SlowRow> {
    let mut hits: Vec<&SpanRecord> = spans
        .iter()
        .filter(|s| s.duration_ms().is_some_and(|ms| ms > threshold_ms))
        .collect();
    hits.sort_by(|a, b| b.duration_us.cmp(&a.duration_us));

    hits.into_iter()
        .map(|s| SlowRow {
            service: s.service.clone(),
            name: s.name.clone(),
            duration_ms: format!("{:.2}", s.duration_ms().unwrap_or(0.0)),
            status: status_label(s.status).to_string(),
            trace_id: s.trace_id.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shop_trace::SpanStatus;

    use super::*;
    use crate::commands::testutil::span;

    #[test]
    fn keeps_only_spans_over_the_threshold_slowest_first() {
        let spans = vec![
            span("user-service", "get_all_users", 40_000, SpanStatus::Ok),
            span("shopd", "get_user_orders_aggregate", 250_000, SpanStatus::Ok),
            span("order-service", "create_order", 120_000, SpanStatus::Error),
        ];

        let rows = slower_than(&spans, 100.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "get_user_orders_aggregate");
        assert_eq!(rows[0].duration_ms, "250.00");
        assert_eq!(rows[1].name, "create_order");
        assert_eq!(rows[1].status, "error");
    }

    #[test]
    fn threshold_is_exclusive() {
        let spans = vec![span("shopd", "enrich_order_item", 100_000, SpanStatus::Ok)];
        assert!(slower_than(&spans, 100.0).is_empty());
    }
}
