//! Topic constants for bus routing.
//!
//! Topics follow `sentry-platform/<component>/<event>`.

// ── Inbound ───────────────────────────────────────────────────────────────

/// Shift switch, `"ON"` / `"OFF"`.  Retained.
pub const SHIFT_STATUS: &str = "sentry-platform/backend-server/shift-status";

/// Circuit to monitor: a list of routes or a full shift record.
pub const SENTRY_CIRCUIT: &str = "sentry-platform/backend-server/sentry-circuit";

/// Alarm switch, `"ON"` / `"OFF"`.
pub const ALARM: &str = "sentry-platform/backend-server/alarm";

/// Raw scans reported by checkpoint readers.
pub const SCAN_INFO: &str = "sentry-platform/checkpoints/sentry-scan-info";

// ── Outbound ──────────────────────────────────────────────────────────────

/// Scan classifications.
pub const ALERTS: &str = "sentry-platform/circuit-handler/alerts";

/// Published once when every check-in of the shift has elapsed.
pub const CIRCUIT_COMPLETE: &str = "sentry-platform/circuit-handler/circuit-complete";

/// Liveness, `{id, connected}`.
pub const CONNECTED: &str = "sentry-platform/circuit-handler/connected";

/// Overdue check-ins are reported on a per-checkpoint topic.
pub fn overdue_topic(checkpoint: &str) -> String {
    format!("sentry-platform/checkpoints/{checkpoint}/overdue-scan")
}

/// Topics the monitor subscribes to.
pub const SUBSCRIPTIONS: [&str; 4] = [SENTRY_CIRCUIT, SHIFT_STATUS, SCAN_INFO, ALARM];
