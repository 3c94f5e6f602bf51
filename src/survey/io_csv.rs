// Primitives for reading CSV files.

use crate::survey::{io_common::parse_text_cell, *};

/// Reads a survey table from a CSV file whose first line holds the column names.
pub fn read_csv(path: &str) -> SurveyResult<SurveyTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let headers: Vec<String> = rdr
        .headers()
        .context(CsvOpenSnafu { path })?
        .iter()
        .map(|h| h.to_string())
        .collect();
    debug!("read_csv: headers: {:?}", headers);

    let mut builder = Builder::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is on the first line.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv: lineno: {:?} row: {:?}", lineno, line);
        builder.add_response(
            headers
                .iter()
                .zip(line.iter())
                .map(|(h, s)| (h.clone(), parse_text_cell(s))),
        );
    }
    let table = builder.build();
    info!(
        "read_csv: {} responses and {} columns from {}",
        table.num_responses(),
        table.columns().len(),
        path
    );
    Ok(table)
}
