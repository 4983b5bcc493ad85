//! CSV export of fetched series and projections
//!
//! Files are first staged next to their destination under a temporary name.
//! Nothing is renamed into place until every file of a run has been staged,
//! so an aborted run leaves no output behind.

use crate::error::{Result, StockError};
use crate::predictor::Prediction;
use crate::series::SymbolSeries;
use crate::symbol::Symbol;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct SeriesRow<'a> {
    symbol: &'a str,
    date: NaiveDate,
    close: f64,
    #[serde(rename = "return")]
    simple_return: Option<f64>,
}

#[derive(Debug, Serialize)]
struct PredictionRow<'a> {
    symbol: &'a str,
    model: &'static str,
    horizon_days: i64,
    last_price: f64,
    alpha: f64,
    beta: f64,
    predicted_return: f64,
    predicted_price: f64,
}

/// A fully written CSV waiting under its `.partial` name
///
/// Dropping it without [`StagedFile::commit`] deletes the partial file.
#[derive(Debug)]
pub struct StagedFile {
    partial: PathBuf,
    target: PathBuf,
    rows: usize,
    committed: bool,
}

impl StagedFile {
    fn new(target: &Path) -> Result<Self> {
        Ok(Self {
            partial: partial_path(target)?,
            target: target.to_path_buf(),
            rows: 0,
            committed: false,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Data rows written, header excluded
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rename the partial file onto its target
    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.partial, &self.target)?;
        self.committed = true;
        tracing::info!(path = %self.target.display(), rows = self.rows, "wrote CSV");
        Ok(self.target.clone())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.partial);
        }
    }
}

/// Stage one row per observation: `symbol,date,close,return`
///
/// `return` is empty on the first observation of each symbol.
pub fn stage_series(path: &Path, series: &BTreeMap<Symbol, SymbolSeries>) -> Result<StagedFile> {
    stage(path, |writer| {
        let mut rows = 0;
        for s in series.values() {
            let returns = s.returns.values();
            for (i, obs) in s.prices.observations().iter().enumerate() {
                writer.serialize(SeriesRow {
                    symbol: s.symbol.as_str(),
                    date: obs.date,
                    close: obs.close,
                    simple_return: i.checked_sub(1).and_then(|j| returns.get(j).copied()),
                })?;
                rows += 1;
            }
        }
        Ok(rows)
    })
}

/// Stage one row per projection
pub fn stage_predictions(path: &Path, predictions: &[Prediction]) -> Result<StagedFile> {
    stage(path, |writer| {
        for p in predictions {
            writer.serialize(PredictionRow {
                symbol: p.symbol.as_str(),
                model: p.model.as_str(),
                horizon_days: p.horizon_days,
                last_price: p.last_price,
                alpha: p.fit.alpha,
                beta: p.fit.beta,
                predicted_return: p.predicted_return,
                predicted_price: p.predicted_price,
            })?;
        }
        Ok(predictions.len())
    })
}

/// Write the series CSV in one step
pub fn write_series(path: &Path, series: &BTreeMap<Symbol, SymbolSeries>) -> Result<usize> {
    let staged = stage_series(path, series)?;
    let rows = staged.rows();
    staged.commit()?;
    Ok(rows)
}

/// Write the predictions CSV in one step
pub fn write_predictions(path: &Path, predictions: &[Prediction]) -> Result<usize> {
    let staged = stage_predictions(path, predictions)?;
    let rows = staged.rows();
    staged.commit()?;
    Ok(rows)
}

/// Commit every staged file, or none of them
///
/// When a rename fails, targets already renamed in this call are removed and
/// the remaining partial files are dropped.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<Vec<PathBuf>> {
    let mut committed = Vec::with_capacity(staged.len());
    for file in staged {
        match file.commit() {
            Ok(path) => committed.push(path),
            Err(e) => {
                for path in &committed {
                    let _ = fs::remove_file(path);
                }
                tracing::error!(error = %e, "CSV export failed, removed committed files");
                return Err(e);
            }
        }
    }
    Ok(committed)
}

fn stage<F>(path: &Path, write: F) -> Result<StagedFile>
where
    F: FnOnce(&mut csv::Writer<fs::File>) -> Result<usize>,
{
    let mut staged = StagedFile::new(path)?;

    let result = (|| -> Result<usize> {
        let mut writer = csv::Writer::from_path(&staged.partial)?;
        let rows = write(&mut writer)?;
        writer.flush()?;
        Ok(rows)
    })();

    match result {
        Ok(rows) => {
            staged.rows = rows;
            Ok(staged)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "CSV export failed");
            Err(e)
        }
    }
}

fn partial_path(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        StockError::ExportError(format!("{} does not name a file", path.display()))
    })?;
    let mut partial = name.to_os_string();
    partial.push(".partial");
    Ok(path.with_file_name(partial))
}
