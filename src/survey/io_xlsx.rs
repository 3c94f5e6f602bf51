// Primitives for reading Excel workbooks.

use calamine::DataType;

use crate::survey::{io_common::parse_text_cell, *};

/// Reads a survey table from a worksheet whose first row holds the column names.
/// Without a worksheet name, the first worksheet is used.
pub fn read_xlsx(path: &str, worksheet_name: Option<&str>) -> SurveyResult<SurveyTable> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { path })?;
    debug!("read_xlsx: header: {:?}", header);
    let mut columns: Vec<String> = Vec::new();
    for cell in header.iter() {
        let name = match cell {
            DataType::String(s) => s.clone(),
            DataType::Int(i) => i.to_string(),
            DataType::Float(f) => f.to_string(),
            DataType::Empty => String::new(),
            _ => {
                return ExcelWrongCellTypeSnafu {
                    lineno: 1_u64,
                    content: format!("{:?}", cell),
                }
                .fail();
            }
        };
        columns.push(name);
    }

    let mut builder = Builder::new();
    for (idx, row) in iter.enumerate() {
        let lineno = (idx + 2) as u64;
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            debug!("read_xlsx: skipping empty line {}", lineno);
            continue;
        }
        let mut fields: Vec<(String, SurveyValue)> = Vec::new();
        for (name, cell) in columns.iter().zip(row.iter()) {
            // Columns without a name cannot be referred to.
            if name.is_empty() {
                continue;
            }
            fields.push((name.clone(), read_cell(cell, lineno)?));
        }
        builder.add_response(fields);
    }
    let table = builder.build();
    info!(
        "read_xlsx: {} responses and {} columns from {}",
        table.num_responses(),
        table.columns().len(),
        path
    );
    Ok(table)
}

fn read_cell(cell: &DataType, lineno: u64) -> SurveyResult<SurveyValue> {
    match cell {
        DataType::Empty => Ok(SurveyValue::Null),
        DataType::String(s) => Ok(parse_text_cell(s)),
        DataType::Int(i) => Ok(SurveyValue::Number(*i as f64)),
        DataType::Float(f) => Ok(SurveyValue::Number(*f)),
        DataType::Bool(b) => Ok(SurveyValue::Text(b.to_string())),
        // Days since the spreadsheet epoch.
        DataType::DateTime(f) => Ok(SurveyValue::Number(*f)),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> SurveyResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::Int(3), 2).unwrap(), SurveyValue::Number(3.0));
        assert_eq!(read_cell(&DataType::Empty, 2).unwrap(), SurveyValue::Null);
        assert_eq!(
            read_cell(&DataType::String("Exzellent.".to_string()), 2).unwrap(),
            SurveyValue::from("Exzellent.")
        );
        assert_eq!(
            read_cell(&DataType::String("".to_string()), 2).unwrap(),
            SurveyValue::Null
        );
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_xlsx("/nonexistent/survey.xlsx", None),
            Err(SurveyError::OpeningExcel { .. })
        ));
    }
}
