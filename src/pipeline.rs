//! Load → derive → filter → report, in that order.

use tracing::info;

use crate::config::DatasetCatalog;
use crate::derive::{Dataset, derive};
use crate::error::Result;
use crate::filter::{DayFilter, MonthFilter, filter};
use crate::loader::{RawDataset, load};
use crate::stats::Report;

/// A filtered dataset and the report computed from it.
#[derive(Debug)]
pub struct Analysis {
    pub dataset: Dataset,
    pub report: Report,
}

/// Runs the whole pipeline for a catalog dataset.
///
/// # Errors
///
/// Loader errors abort the run. Empty filter results do not: they show up
/// inside the affected report sections.
pub fn run(
    catalog: &DatasetCatalog,
    dataset_id: &str,
    month: MonthFilter,
    day: DayFilter,
) -> Result<Analysis> {
    let raw = load(catalog, dataset_id)?;
    Ok(analyze(raw, month, day))
}

/// Runs everything after loading.
pub fn analyze(raw: RawDataset, month: MonthFilter, day: DayFilter) -> Analysis {
    let dataset = filter(derive(raw), month, day);
    info!(dataset = %dataset.id, %month, %day, trips = dataset.len(), "Computing statistics");
    let report = Report::compute(&dataset, month, day);
    Analysis { dataset, report }
}
