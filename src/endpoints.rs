//! The API endpoints URIs.

/// The route for a page of transactions filtered by month and search text.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for the sales statistics of a month.
pub const STATISTICS_API: &str = "/api/statistics";
/// The route for the price range bar chart data of a month.
pub const BAR_CHART_API: &str = "/api/bar-chart";
/// The route for the category pie chart data of a month.
pub const PIE_CHART_API: &str = "/api/pie-chart";
/// The route for the transactions, statistics and chart data in one response.
pub const COMBINED_API: &str = "/api/combined";
/// The route for replacing the records with the remote dataset.
pub const SEED_API: &str = "/api/seed";
