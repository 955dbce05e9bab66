//! Canonical dataset schema.

/// Version of the persisted dataset layout and its manifest.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Where generators write and consumers look by default.
pub const DEFAULT_DATASET_PATH: &str = "data/subscription_revenue.csv";

/// CSV header, in column order.
pub const COLUMNS: &[&str] = &[
    "date",
    "region",
    "plan",
    "revenue_usd_mn",
    "subscribers_mn",
    "growth_rate_pct",
    "marketing_spend_usd_mn",
    "adoption_rate",
    "retention_index",
    "content_launch",
    "anomaly_flag",
];

/// Columns a reader rejects the file without. `anomaly_flag` may be absent.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "date",
    "region",
    "plan",
    "revenue_usd_mn",
    "subscribers_mn",
    "growth_rate_pct",
    "marketing_spend_usd_mn",
    "adoption_rate",
    "retention_index",
    "content_launch",
];
