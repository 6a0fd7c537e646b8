use crate::config::{ConfigSection, WindowConfig, WindowDirection};
use crate::error::{PurgecvError, Result};
use crate::types::IndexedTable;
use polars::prelude::*;

/// Expands selected columns into fixed-length observation windows.
///
/// For a past window of `n_bars`, column `c` becomes `c{n_bars}..c{0}` where
/// `c{0}` is the most recent bar of each sample. Future windows mirror this:
/// `c{0}` is the bar itself and `c{i}` the bar `i` rows ahead.
pub struct WindowBuilder {
    config: WindowConfig,
}

impl WindowBuilder {
    pub fn new(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Apply the configured direction.
    pub fn build(&self, table: &IndexedTable) -> Result<IndexedTable> {
        match self.config.direction {
            WindowDirection::Past => self.build_past(table),
            WindowDirection::Future => self.build_future(table),
        }
    }

    /// Lagged window. The last `n_bars` rows are trimmed and the datetime
    /// column, if any, is moved forward to each sample's most recent bar.
    pub fn build_past(&self, table: &IndexedTable) -> Result<IndexedTable> {
        let n_bars = self.config.n_bars;
        self.check_input(table)?;

        let out_len = table.height() - n_bars;
        let mut columns: Vec<Column> = Vec::with_capacity(
            table.frame().width() + self.config.cols.len() * n_bars,
        );

        for column in table.frame().get_columns() {
            let name = column.name().as_str();
            if self.is_window_col(name) {
                columns.push(
                    column
                        .slice(0, out_len)
                        .with_name(bar_name(name, n_bars)),
                );
            } else if self.is_datetime_col(name) {
                columns.push(column.slice(n_bars as i64, out_len));
            } else {
                columns.push(column.slice(0, out_len));
            }
        }

        for i in (0..n_bars).rev() {
            let offset = (n_bars - i) as i64;
            for col in &self.config.cols {
                columns.push(
                    table
                        .column(col)?
                        .slice(offset, out_len)
                        .with_name(bar_name(col, i)),
                );
            }
        }

        log::debug!(
            "Past window of {} bars over {:?}: trimmed {} trailing rows",
            n_bars,
            self.config.cols,
            n_bars
        );

        let frame = DataFrame::new(columns)?;
        Ok(IndexedTable::from_parts(
            frame,
            table.labels()[..out_len].to_vec(),
        ))
    }

    /// Led window. Rows missing any value of their window, including the
    /// `n_bars` future values, are dropped individually.
    pub fn build_future(&self, table: &IndexedTable) -> Result<IndexedTable> {
        let n_bars = self.config.n_bars;
        self.check_input(table)?;

        let height = table.height();
        let mut columns: Vec<Column> = Vec::with_capacity(
            table.frame().width() + self.config.cols.len() * n_bars,
        );

        let mut complete = BooleanChunked::full(PlSmallStr::from_static("complete"), true, height);
        for column in table.frame().get_columns() {
            let name = column.name().as_str();
            if self.is_window_col(name) {
                complete = &complete & &column.as_materialized_series().is_not_null();
                columns.push(column.clone().with_name(bar_name(name, 0)));
            } else {
                columns.push(column.clone());
            }
        }

        for i in 1..=n_bars {
            for col in &self.config.cols {
                let led = table
                    .column(col)?
                    .as_materialized_series()
                    .shift(-(i as i64))
                    .with_name(bar_name(col, i));
                complete = &complete & &led.is_not_null();
                columns.push(Column::from(led));
            }
        }

        let expanded = IndexedTable::from_parts(DataFrame::new(columns)?, table.labels().to_vec());
        let result = expanded.filter(&complete)?;

        log::debug!(
            "Future window of {} bars over {:?}: dropped {} incomplete rows",
            n_bars,
            self.config.cols,
            height - result.height()
        );

        Ok(result)
    }

    fn check_input(&self, table: &IndexedTable) -> Result<()> {
        let required = self.config.n_bars + 1;
        if table.height() < required {
            return Err(PurgecvError::InsufficientRows {
                required,
                actual: table.height(),
            });
        }

        for col in &self.config.cols {
            table.column(col)?;
        }
        if let Some(dt) = &self.config.datetime_col {
            table.column(dt)?;
        }

        Ok(())
    }

    fn is_window_col(&self, name: &str) -> bool {
        self.config.cols.iter().any(|c| c == name)
    }

    fn is_datetime_col(&self, name: &str) -> bool {
        self.config.datetime_col.as_deref() == Some(name)
    }
}

fn bar_name(col: &str, age: usize) -> PlSmallStr {
    format!("{}{}", col, age).into()
}

/// Lagged window over `cols`; see [`WindowBuilder::build_past`].
pub fn build_past(
    table: &IndexedTable,
    n_bars: usize,
    cols: &[&str],
    datetime_col: Option<&str>,
) -> Result<IndexedTable> {
    builder(n_bars, cols, datetime_col, WindowDirection::Past)?.build_past(table)
}

/// Led window over `cols`; see [`WindowBuilder::build_future`].
pub fn build_future(
    table: &IndexedTable,
    n_bars: usize,
    cols: &[&str],
    datetime_col: Option<&str>,
) -> Result<IndexedTable> {
    builder(n_bars, cols, datetime_col, WindowDirection::Future)?.build_future(table)
}

fn builder(
    n_bars: usize,
    cols: &[&str],
    datetime_col: Option<&str>,
    direction: WindowDirection,
) -> Result<WindowBuilder> {
    WindowBuilder::new(WindowConfig {
        n_bars,
        cols: cols.iter().map(|c| c.to_string()).collect(),
        datetime_col: datetime_col.map(str::to_string),
        direction,
    })
}
