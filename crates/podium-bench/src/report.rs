use std::{
    fs::File,
    io::{BufWriter, Result as IoResult, Write as _},
    path::Path,
};


/// One micro-benchmark result: per-operation latency over a prefilled board.
#[derive(Debug, Clone)]
pub(crate) struct MicroRow {
    pub(crate) name:          &'static str,
    pub(crate) batch_size:    usize,
    pub(crate) init_total_us: f64,
    pub(crate) insert_avg_us: f64,
    pub(crate) insert_p99_us: f64,
    pub(crate) search_avg_us: f64,
    pub(crate) search_p99_us: f64,
    pub(crate) delete_avg_us: f64,
    pub(crate) delete_p99_us: f64,
}

/// One realtime-simulation result: sustained churn at a target rate.
#[derive(Debug, Clone)]
pub(crate) struct RealtimeRow {
    pub(crate) name:          &'static str,
    pub(crate) batch_size:    usize,
    pub(crate) init_total_us: f64,
    pub(crate) update_avg_us: f64,
    pub(crate) update_p99_us: f64,
    pub(crate) search_avg_us: f64,
    pub(crate) search_p99_us: f64,
}

pub(crate) fn write_micro_csv(path: &Path, rows: &[MicroRow]) -> IoResult<()> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(
        out,
        "Name,BatchSize,InitTotal_us,Insert_Avg_us,Insert_P99_us,\
         Search_Avg_us,Search_P99_us,Delete_Avg_us,Delete_P99_us",
    )?;
    for row in rows {
        writeln!(
            out,
            "{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            row.name,
            row.batch_size,
            row.init_total_us,
            row.insert_avg_us,
            row.insert_p99_us,
            row.search_avg_us,
            row.search_p99_us,
            row.delete_avg_us,
            row.delete_p99_us,
        )?;
    }
    out.flush()
}

pub(crate) fn write_realtime_csv(path: &Path, rows: &[RealtimeRow]) -> IoResult<()> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(
        out,
        "Name,BatchSize,InitTotal_us,Update_Avg_us,Update_P99_us,Search_Avg_us,Search_P99_us",
    )?;
    for row in rows {
        writeln!(
            out,
            "{},{},{:.4},{:.4},{:.4},{:.4},{:.4}",
            row.name,
            row.batch_size,
            row.init_total_us,
            row.update_avg_us,
            row.update_p99_us,
            row.search_avg_us,
            row.search_p99_us,
        )?;
    }
    out.flush()
}
