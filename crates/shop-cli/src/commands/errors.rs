//! Errors command - spans that ended with error status

use anyhow::Result;
use shop_trace::SpanRecord;

use crate::output::{ErrorRow, OutputContext};

pub fn errors(spans: &[SpanRecord], ctx: &OutputContext) -> Result<()> {
    let rows = error_rows(spans);
    if rows.is_empty() {
        ctx.success("No error spans");
        return Ok(());
    }

    ctx.print(&rows);
    Ok(())
}

fn error_rows(spans: &[SpanRecord]) -> Vec<ErrorRow> {
    spans
        .iter()
        .filter(|s| s.is_error())
        .map(|s| ErrorRow {
            time: s.started_at.format("%H:%M:%S%.3f").to_string(),
            service: s.service.clone(),
            name: s.name.clone(),
            error: s.error.clone().unwrap_or_else(|| "-".to_string()),
            exception: s
                .exception
                .as_ref()
                .map(|e| format!("{}: {}", e.kind, e.message))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}
