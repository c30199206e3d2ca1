// Reading rosters from Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use snafu::ResultExt;

use crate::draw::*;

/// Reads every worksheet of the workbook, in workbook order.
///
/// Failing to open the file is an error for the whole run. A sheet that
/// cannot be read is returned with its error so that the other sheets are
/// still processed.
pub fn read_workbook(path: &str) -> DrawResult<Vec<SheetRows>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let names: Vec<String> = workbook.sheet_names().to_vec();
    debug!("read_workbook: {:?}: sheets {:?}", path, names);

    let mut res: Vec<SheetRows> = Vec::with_capacity(names.len());
    for name in names {
        let rows = match workbook.worksheet_range(&name) {
            None => MissingSheetSnafu { sheet: &name }.fail(),
            Some(Err(e)) => Err(e).context(ReadingSheetSnafu { sheet: &name }),
            Some(Ok(range)) => Ok(range
                .rows()
                .map(|row| row.iter().map(cell_text).collect())
                .collect()),
        };
        res.push(SheetRows { name, rows });
    }
    Ok(res)
}

/// The text of a cell, as a spreadsheet program would display it.
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        // Whole numbers are stored as floats.
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Error(e) => {
            warn!("cell_text: ignoring error cell {:?}", e);
            String::new()
        }
        // Dates carry no roster field.
        other => {
            warn!("cell_text: ignoring unsupported cell {:?}", other);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_as_text() {
        assert_eq!(cell_text(&DataType::Empty), "");
        assert_eq!(cell_text(&DataType::String("Kim".to_string())), "Kim");
        assert_eq!(cell_text(&DataType::Int(7)), "7");
        assert_eq!(cell_text(&DataType::Float(3.0)), "3");
        assert_eq!(cell_text(&DataType::Float(-45.0)), "-45");
        assert_eq!(cell_text(&DataType::Float(54.5)), "54.5");
        assert_eq!(cell_text(&DataType::Bool(true)), "true");
        assert_eq!(
            cell_text(&DataType::Error(calamine::CellErrorType::NA)),
            ""
        );
        assert_eq!(cell_text(&DataType::DateTime(45123.0)), "");
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_workbook("/nonexistent/roster.xlsx"),
            Err(DrawError::OpeningExcel { .. })
        ));
    }
}
