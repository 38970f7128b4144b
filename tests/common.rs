// Shared builders for integration tests: real workbooks and ZIP archives

use std::io::{Cursor, Write};

use rust_xlsxwriter::Workbook;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// ZIP archive holding `entries` as (name, bytes)
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// `.xlsx` laid out like the IBGE series: a title row, a blank row, the
/// header at row 2, then two 1994 months with the year typed as a number
pub fn ipca_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet
        .write_string(0, 0, "Tabela 1 - IPCA - Série histórica")
        .unwrap();
    sheet.write_string(2, 0, "ANO").unwrap();
    sheet.write_string(2, 1, "MÊS").unwrap();
    sheet.write_string(2, 2, "ÍNDICE").unwrap();
    sheet.write_number(3, 0, 1994.0).unwrap();
    sheet.write_string(3, 1, "JAN").unwrap();
    sheet.write_number(3, 2, 1709.94).unwrap();
    sheet.write_string(4, 1, "FEV").unwrap();
    sheet.write_number(4, 2, 1775.88).unwrap();

    workbook.save_to_buffer().expect("save workbook")
}
