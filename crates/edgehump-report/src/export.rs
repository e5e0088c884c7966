use edgehump_core::types::HumpRow;

use crate::error::{ReportError, Result};

/// Byte-order mark so spreadsheet applications pick the file up as UTF-8.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub const RESULT_HEADER: [&str; 6] = ["glass", "cell", "side", "hump_dy", "hump_dx", "split"];

/// Serializes the result table as delimited text, UTF-8 with BOM.
/// Peak heights keep one decimal, locations none.
pub fn result_csv_bytes(rows: &[HumpRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(RESULT_HEADER)?;

    for row in rows {
        let dy = format!("{:.1}", row.hump_dy);
        let dx = format!("{:.0}", row.hump_dx);
        writer.write_record([
            row.glass.as_str(),
            row.cell.as_str(),
            row.side.as_str(),
            dy.as_str(),
            dx.as_str(),
            row.split.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))
}
