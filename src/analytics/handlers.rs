//! Route handlers that serve the analytics views as JSON.

use axum::{
    Json,
    extract::{FromRef, Query, State},
};

use crate::{
    AppState, Error,
    analytics::{
        AnalyticsConfig, AnalyticsQuery, CategoryCounts, CombinedReport, PriceHistogram,
        SalesStatistics, TransactionPage,
        queries::{
            get_category_counts, get_combined_report, get_price_histogram, get_sales_statistics,
            get_transaction_page,
        },
    },
    record::SharedRecordStore,
};

/// The state needed for the analytics endpoints.
#[derive(Clone)]
pub struct AnalyticsState {
    /// The store the views are computed from.
    pub record_store: SharedRecordStore,
    /// The reference year and page defaults.
    pub config: AnalyticsConfig,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
            config: state.analytics_config.clone(),
        }
    }
}

/// Get a page of transactions filtered by month and search text.
pub async fn get_transactions(
    State(state): State<AnalyticsState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<TransactionPage>, Error> {
    get_transaction_page(state.record_store.as_ref(), &query, &state.config)
        .inspect_err(|error| tracing::debug!("could not get transactions: {error}"))
        .map(Json)
}

/// Get the sales statistics for a month.
pub async fn get_statistics(
    State(state): State<AnalyticsState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<SalesStatistics>, Error> {
    get_sales_statistics(state.record_store.as_ref(), &query, &state.config)
        .inspect_err(|error| tracing::debug!("could not get statistics: {error}"))
        .map(Json)
}

/// Get the price range bar chart data for a month.
pub async fn get_bar_chart(
    State(state): State<AnalyticsState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<PriceHistogram>, Error> {
    get_price_histogram(state.record_store.as_ref(), &query, &state.config)
        .inspect_err(|error| tracing::debug!("could not get bar chart data: {error}"))
        .map(Json)
}

/// Get the category pie chart data for a month.
pub async fn get_pie_chart(
    State(state): State<AnalyticsState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<CategoryCounts>, Error> {
    get_category_counts(state.record_store.as_ref(), &query, &state.config)
        .inspect_err(|error| tracing::debug!("could not get pie chart data: {error}"))
        .map(Json)
}

/// Get the transactions, statistics, bar chart and pie chart in one response.
pub async fn get_combined(
    State(state): State<AnalyticsState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<CombinedReport>, Error> {
    get_combined_report(state.record_store.as_ref(), &query, &state.config)
        .inspect_err(|error| tracing::debug!("could not get combined data: {error}"))
        .map(Json)
}
