// Excel workbook import (xlsx, xls, ods) and formatted tracker export (xlsx)
//
// Import: byte buffers or paths → raw row tables / normalized spend rows.
// Export: campaign trees → the formatted multi-sheet tracker workbook.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};

use adspend_ingest::dates;
use adspend_ingest::model::{Campaign, Cell, MediaChannel, MonthlyExpense, RawRow, RowTable, SpendRow};
use adspend_ingest::month::Month;
use adspend_ingest::normalize;
use adspend_ingest::schema::TrackerColumns;
use adspend_ingest::ParseError;

use crate::ParseReport;

/// Which sheet to read from a workbook.
#[derive(Debug, Clone)]
pub enum SheetSelector {
    Name(String),
    Index(usize),
}

impl SheetSelector {
    fn pick(&self, names: &[String]) -> Option<String> {
        match self {
            SheetSelector::Name(name) => names.iter().find(|n| *n == name).cloned(),
            SheetSelector::Index(i) => names.get(*i).cloned(),
        }
    }

    fn describe(&self) -> String {
        match self {
            SheetSelector::Name(name) => name.clone(),
            SheetSelector::Index(i) => format!("#{i}"),
        }
    }
}

/// One output sheet: a division label and its campaign tree.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub sheet_name: String,
    pub campaigns: Vec<Campaign>,
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

fn open_workbook(bytes: &[u8]) -> Result<Sheets<Cursor<&[u8]>>, ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput { bytes: 0 });
    }
    open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
        ParseError::Workbook(format!(
            "failed to open workbook ({} bytes): {e}",
            bytes.len()
        ))
    })
}

fn sheet_table(
    workbook: &mut Sheets<Cursor<&[u8]>>,
    sheet: &str,
) -> Result<RowTable, ParseError> {
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| ParseError::Workbook(format!("failed to read sheet '{sheet}': {e}")))?;

    // Pad to absolute coordinates: data may not begin at A1, and the
    // budget layout is positional.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<RawRow> = Vec::with_capacity(start_row as usize + range.height());
    for _ in 0..start_row {
        rows.push(RawRow::default());
    }
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(convert_cell));
        rows.push(RawRow::new(cells));
    }

    Ok(RowTable {
        sheet: sheet.to_string(),
        rows,
    })
}

/// Map a calamine cell into the engine's raw cell. Dates surface as their
/// serial number; error cells read as empty.
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

/// Read one sheet as an ordered table of raw rows, source order, no
/// filtering. Fails only on structural problems.
pub fn read_range(bytes: &[u8], selector: &SheetSelector) -> Result<RowTable, ParseError> {
    let mut workbook = open_workbook(bytes)?;
    let names = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(ParseError::Workbook("workbook contains no sheets".into()));
    }
    let sheet = selector.pick(&names).ok_or_else(|| ParseError::MissingSheet {
        sheet: selector.describe(),
        available: names.clone(),
    })?;
    sheet_table(&mut workbook, &sheet)
}

/// Read every sheet of an unbilled workbook into normalized spend rows,
/// tagging each row with its sheet's division.
pub fn read_spend_rows(bytes: &[u8]) -> Result<(Vec<SpendRow>, ParseReport), ParseError> {
    let start_time = Instant::now();
    let mut workbook = open_workbook(bytes)?;
    let names = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(ParseError::Workbook("workbook contains no sheets".into()));
    }

    let mut rows = Vec::new();
    let mut report = ParseReport::default();

    for sheet in &names {
        let table = sheet_table(&mut workbook, sheet)?;
        let Some(header_at) = table.rows.iter().position(|r| !r.is_blank()) else {
            log::warn!("sheet '{sheet}' has no header row");
            report.warnings.push(format!("sheet '{sheet}' has no header row"));
            continue;
        };
        let columns = TrackerColumns::resolve(&table.sheet, &table.rows[header_at])?;
        let division = normalize::division_for_sheet(&table.sheet).to_string();
        report.sheets_read += 1;

        for row in &table.rows[header_at + 1..] {
            match columns.spend_row(row, &division) {
                Some(spend) => {
                    report.rows_read += 1;
                    rows.push(spend);
                }
                None => report.rows_skipped += 1,
            }
        }
    }

    if rows.is_empty() {
        return Err(ParseError::EmptySheet {
            sheet: names.join(", "),
        });
    }
    report.duration_ms = start_time.elapsed().as_millis();
    Ok((rows, report))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Fixed leading columns of the tracker layout; the final empty header is
/// the spacer between the fixed block and the month groups.
const FIXED_HEADERS: [&str; 14] = [
    "PO Number",
    "Campaign",
    "Start Date",
    "End Date",
    "PO Close Down Date (90 days)",
    "Media Channel",
    "Product Code",
    "Net Media (incl Fees)",
    "Agency Commission",
    "ASBOF",
    "Total PO Value",
    "Total Invoiced to date",
    "PO Value Remaining",
    "",
];

const MONTH_SUB_HEADERS: [&str; 5] = [
    "Net Billable",
    "Agency Commission",
    "Levy (ASBOF)",
    "Total invoice val £",
    "Inv #",
];

/// First month-group column (column O).
const MONTH_BASE: u16 = FIXED_HEADERS.len() as u16;
const GROUP_WIDTH: u16 = MONTH_SUB_HEADERS.len() as u16;
/// Twelve months plus the trailing YTD group.
const GROUP_COUNT: u16 = 13;

const CHANNEL_COL: u16 = 5;
const INVOICED_COL: u16 = 11;
const REMAINING_COL: u16 = 12;
const SPACER_COL: u16 = 13;

struct SheetFormats {
    header: Format,
    text: Format,
    date: Format,
    channel: Format,
    number: Format,
    number_negative: Format,
    total_label: Format,
    total_number: Format,
}

fn sheet_formats() -> SheetFormats {
    let bordered = || Format::new().set_border(FormatBorder::Thin);
    SheetFormats {
        header: bordered()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(0x2F4050))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter),
        text: bordered(),
        date: bordered().set_align(FormatAlign::Center),
        channel: bordered()
            .set_background_color(Color::RGB(0x90EE90))
            .set_align(FormatAlign::Center),
        number: bordered().set_num_format("#,##0.00").set_align(FormatAlign::Right),
        number_negative: bordered()
            .set_num_format("#,##0.00")
            .set_align(FormatAlign::Right)
            .set_font_color(Color::Red),
        total_label: bordered().set_bold().set_background_color(Color::RGB(0xE0E0E0)),
        total_number: bordered()
            .set_bold()
            .set_num_format("#,##0.00")
            .set_align(FormatAlign::Right)
            .set_background_color(Color::RGB(0xE0E0E0)),
    }
}

/// Convert a column index to its letter form (0 = A, 26 = AA).
fn col_to_letter(col: u16) -> String {
    let mut result = String::new();
    let mut n = col as usize;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Convert row/col to a cell address (e.g. "A1", "O3").
fn cell_address(row: u32, col: u16) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
}

/// Render campaign trees into a formatted multi-sheet tracker workbook.
///
/// Per sheet: a two-row merged header band (fixed columns plus one
/// five-sub-column group per month and a trailing YTD group), one data row
/// per media channel with the campaign's shared fields written only on its
/// first row, per-row YTD SUM formulas, a bottom totals row of column-wise
/// SUM formulas, and red font on negative PO-value-remaining cells.
pub fn write_tracker_workbook(sheets: &[SheetData]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let formats = sheet_formats();

    for sheet in sheets {
        let worksheet = workbook
            .add_worksheet()
            .set_name(&sheet.sheet_name)
            .map_err(|e| format!("failed to create sheet '{}': {e}", sheet.sheet_name))?;
        write_sheet(worksheet, &sheet.campaigns, &formats)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("failed to serialize workbook: {e}"))
}

/// Write a tracker workbook straight to disk.
pub fn write_tracker_workbook_to_path(sheets: &[SheetData], path: &Path) -> Result<(), String> {
    let bytes = write_tracker_workbook(sheets)?;
    std::fs::write(path, bytes).map_err(|e| format!("{}: {e}", path.display()))
}

fn write_sheet(
    worksheet: &mut Worksheet,
    campaigns: &[Campaign],
    fmt: &SheetFormats,
) -> Result<(), String> {
    // Fixed headers span both header rows.
    for (col, title) in FIXED_HEADERS.iter().enumerate() {
        worksheet
            .merge_range(0, col as u16, 1, col as u16, title, &fmt.header)
            .map_err(|e| format!("failed to write header '{title}': {e}"))?;
    }

    // Month groups plus YTD, five sub-columns each.
    for group in 0..GROUP_COUNT {
        let start = MONTH_BASE + group * GROUP_WIDTH;
        let title = if group < 12 {
            Month::ALL[group as usize].name()
        } else {
            "YTD"
        };
        worksheet
            .merge_range(0, start, 0, start + GROUP_WIDTH - 1, title, &fmt.header)
            .map_err(|e| format!("failed to write month group '{title}': {e}"))?;
        for (i, sub) in MONTH_SUB_HEADERS.iter().enumerate() {
            worksheet
                .write_string_with_format(1, start + i as u16, *sub, &fmt.header)
                .map_err(|e| format!("failed to write sub-header '{sub}': {e}"))?;
        }
    }

    // Data rows: one per media channel, campaign fields on the first only.
    let first_data_row: u32 = 2;
    let mut row = first_data_row;
    for campaign in campaigns {
        for (index, channel) in campaign.channels.iter().enumerate() {
            write_channel_row(worksheet, row, campaign, channel, index == 0, fmt)
                .map_err(|e| format!("failed to write row {row}: {e}"))?;
            row += 1;
        }
    }

    // Totals row: live SUM formulas so edits recompute downstream.
    if row > first_data_row {
        write_totals_row(worksheet, row, first_data_row, row - 1, fmt)
            .map_err(|e| format!("failed to write totals row: {e}"))?;
    }

    for col in 0..MONTH_BASE + GROUP_COUNT * GROUP_WIDTH {
        worksheet
            .set_column_width(col, 16)
            .map_err(|e| format!("failed to set column width: {e}"))?;
    }
    Ok(())
}

fn write_channel_row(
    ws: &mut Worksheet,
    row: u32,
    campaign: &Campaign,
    channel: &MediaChannel,
    first: bool,
    fmt: &SheetFormats,
) -> Result<(), XlsxError> {
    let date_text = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

    if first {
        ws.write_string_with_format(row, 0, &campaign.po_number, &fmt.text)?;
        ws.write_string_with_format(row, 1, &campaign.name, &fmt.text)?;
        ws.write_string_with_format(row, 2, &date_text(campaign.start_date), &fmt.date)?;
        ws.write_string_with_format(row, 3, &date_text(campaign.end_date), &fmt.date)?;
        ws.write_string_with_format(row, 4, &date_text(campaign.po_close_down_date), &fmt.date)?;
    } else {
        for col in 0..CHANNEL_COL {
            ws.write_blank(row, col, &fmt.text)?;
        }
    }

    ws.write_string_with_format(row, CHANNEL_COL, &channel.name, &fmt.channel)?;
    ws.write_string_with_format(row, 6, &channel.product_code, &fmt.text)?;
    ws.write_number_with_format(row, 7, channel.net_media, &fmt.number)?;
    ws.write_number_with_format(row, 8, channel.agency_commission, &fmt.number)?;
    ws.write_number_with_format(row, 9, channel.asbof, &fmt.number)?;
    ws.write_number_with_format(row, 10, channel.total_po_value, &fmt.number)?;

    if first {
        ws.write_number_with_format(row, INVOICED_COL, campaign.total_invoiced, &fmt.number)?;
        let remaining = campaign.po_value_remaining;
        let remaining_fmt = if remaining < 0.0 {
            &fmt.number_negative
        } else {
            &fmt.number
        };
        ws.write_number_with_format(row, REMAINING_COL, remaining, remaining_fmt)?;
    } else {
        ws.write_blank(row, INVOICED_COL, &fmt.text)?;
        ws.write_blank(row, REMAINING_COL, &fmt.text)?;
    }
    ws.write_blank(row, SPACER_COL, &fmt.text)?;

    for (m, month) in Month::ALL.iter().enumerate() {
        let base = MONTH_BASE + (m as u16) * GROUP_WIDTH;
        let expense = channel.monthly.get(month).copied().unwrap_or_default();
        ws.write_number_with_format(row, base, expense.net_billable, &fmt.number)?;
        ws.write_number_with_format(row, base + 1, expense.agency_commission, &fmt.number)?;
        ws.write_number_with_format(row, base + 2, expense.levy, &fmt.number)?;
        ws.write_number_with_format(row, base + 3, expense.total_invoice_value, &fmt.number)?;
        ws.write_blank(row, base + 4, &fmt.text)?;
    }

    // YTD: row-wise sums across the twelve month groups.
    let ytd_base = MONTH_BASE + 12 * GROUP_WIDTH;
    for metric in 0..4u16 {
        let cells: Vec<String> = (0..12)
            .map(|m| cell_address(row, MONTH_BASE + m * GROUP_WIDTH + metric))
            .collect();
        let formula = format!("SUM({})", cells.join(","));
        ws.write_formula_with_format(row, ytd_base + metric, formula.as_str(), &fmt.number)?;
    }
    ws.write_blank(row, ytd_base + 4, &fmt.text)?;
    Ok(())
}

fn write_totals_row(
    ws: &mut Worksheet,
    row: u32,
    first_data: u32,
    last_data: u32,
    fmt: &SheetFormats,
) -> Result<(), XlsxError> {
    let column_sum = |col: u16| {
        format!(
            "SUM({0}{1}:{0}{2})",
            col_to_letter(col),
            first_data + 1,
            last_data + 1
        )
    };

    ws.write_string_with_format(row, 1, "Total", &fmt.total_label)?;
    for col in [0, 2, 3, 4, CHANNEL_COL, 6, SPACER_COL] {
        ws.write_blank(row, col, &fmt.total_label)?;
    }
    for col in 7..=REMAINING_COL {
        ws.write_formula_with_format(row, col, column_sum(col).as_str(), &fmt.total_number)?;
    }
    for group in 0..GROUP_COUNT {
        let base = MONTH_BASE + group * GROUP_WIDTH;
        for metric in 0..4u16 {
            let col = base + metric;
            ws.write_formula_with_format(row, col, column_sum(col).as_str(), &fmt.total_number)?;
        }
        ws.write_blank(row, base + 4, &fmt.total_label)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Re-import of emitted sheets
// ---------------------------------------------------------------------------

/// Re-ingest a formatted tracker sheet back into campaign trees.
///
/// The inverse of `write_tracker_workbook` for one sheet: campaign fields
/// are run-length encoded (a blank campaign cell continues the row block
/// above), channel rows carry the month groups at fixed offsets, and the
/// totals row is recognized by its "Total" label and skipped.
pub fn read_tracker_workbook(
    bytes: &[u8],
    selector: &SheetSelector,
) -> Result<Vec<Campaign>, ParseError> {
    let table = read_range(bytes, selector)?;
    let sheet = table.sheet.clone();
    if table.rows.len() <= 2 {
        return Err(ParseError::EmptySheet { sheet });
    }

    let mut campaigns: Vec<Campaign> = Vec::new();
    for row in &table.rows[2..] {
        if row.is_blank() {
            continue;
        }
        let campaign_label = row.cell(1).text();
        if campaign_label == "Total" {
            continue;
        }
        let channel_name = row.cell(CHANNEL_COL as usize).text();
        if channel_name.is_empty() {
            continue;
        }

        if !campaign_label.is_empty() || campaigns.is_empty() {
            campaigns.push(Campaign {
                po_number: row.cell(0).text(),
                name: campaign_label,
                start_date: dates::resolve(row.cell(2)),
                end_date: dates::resolve(row.cell(3)),
                po_close_down_date: dates::resolve(row.cell(4)),
                ..Default::default()
            });
        }
        let Some(campaign) = campaigns.last_mut() else {
            continue;
        };

        let mut channel = MediaChannel {
            name: channel_name,
            product_code: row.cell(6).text(),
            net_media: row.cell(7).number_or_zero(),
            agency_commission: row.cell(8).number_or_zero(),
            asbof: row.cell(9).number_or_zero(),
            total_po_value: row.cell(10).number_or_zero(),
            monthly: BTreeMap::new(),
        };
        for (m, month) in Month::ALL.iter().enumerate() {
            let base = (MONTH_BASE + (m as u16) * GROUP_WIDTH) as usize;
            let expense = MonthlyExpense {
                net_billable: row.cell(base).number_or_zero(),
                agency_commission: row.cell(base + 1).number_or_zero(),
                levy: row.cell(base + 2).number_or_zero(),
                total_invoice_value: row.cell(base + 3).number_or_zero(),
            };
            if expense != MonthlyExpense::default() {
                channel.monthly.insert(*month, expense);
            }
        }

        campaign.total_net_media_inc_fees += channel.net_media;
        campaign.total_agency_commission += channel.agency_commission;
        campaign.total_asbof += channel.asbof;
        campaign.total_po_value += channel.total_po_value;
        campaign.channels.push(channel);
    }

    if campaigns.is_empty() {
        return Err(ParseError::EmptySheet { sheet });
    }
    for campaign in &mut campaigns {
        campaign.po_value_remaining = campaign.total_po_value - campaign.total_invoiced;
    }
    campaigns.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(campaigns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adspend_ingest::aggregate::build_tracker;
    use adspend_ingest::config::TrackerPolicy;
    use chrono::NaiveDate;

    fn month_expense(net: f64) -> MonthlyExpense {
        MonthlyExpense {
            net_billable: net,
            agency_commission: net * 0.1,
            levy: net * 0.01,
            total_invoice_value: net * 1.11,
        }
    }

    fn channel(name: &str, month: Month, net: f64) -> MediaChannel {
        let mut monthly = BTreeMap::new();
        monthly.insert(month, month_expense(net));
        MediaChannel {
            name: name.into(),
            product_code: "PC1".into(),
            net_media: net,
            agency_commission: net * 0.1,
            asbof: net * 0.01,
            total_po_value: net * 1.11,
            monthly,
        }
    }

    fn bleu_campaign() -> Campaign {
        let channels = vec![
            channel("TV", Month::January, 100.0),
            channel("Digital", Month::January, 200.0),
        ];
        let total_po_value: f64 = channels.iter().map(|c| c.total_po_value).sum();
        Campaign {
            po_number: "PO123".into(),
            name: "Bleu de Chanel".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            po_close_down_date: NaiveDate::from_ymd_opt(2024, 4, 30),
            total_net_media_inc_fees: 300.0,
            total_agency_commission: 30.0,
            total_asbof: 3.0,
            total_po_value,
            total_invoiced: 0.0,
            po_value_remaining: total_po_value,
            channels,
        }
    }

    #[test]
    fn round_trip_through_the_emitted_workbook() {
        let bytes = write_tracker_workbook(&[SheetData {
            sheet_name: "F&B".into(),
            campaigns: vec![bleu_campaign()],
        }])
        .unwrap();

        let parsed = read_tracker_workbook(&bytes, &SheetSelector::Name("F&B".into())).unwrap();
        assert_eq!(parsed.len(), 1);
        let campaign = &parsed[0];
        assert_eq!(campaign.name, "Bleu de Chanel");
        assert_eq!(campaign.po_number, "PO123");
        assert_eq!(campaign.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));

        let names: Vec<&str> = campaign.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["TV", "Digital"]);

        let january_net: f64 = campaign
            .channels
            .iter()
            .filter_map(|c| c.monthly.get(&Month::January))
            .map(|m| m.net_billable)
            .sum();
        assert!((january_net - 300.0).abs() < 1e-6);
    }

    #[test]
    fn missing_sheet_is_a_structural_error() {
        let bytes = write_tracker_workbook(&[SheetData {
            sheet_name: "F&B".into(),
            campaigns: vec![bleu_campaign()],
        }])
        .unwrap();

        let err = read_tracker_workbook(&bytes, &SheetSelector::Name("NonExistent".into()))
            .unwrap_err();
        match err {
            ParseError::MissingSheet { sheet, available } => {
                assert_eq!(sheet, "NonExistent");
                assert_eq!(available, vec!["F&B".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            read_range(&[], &SheetSelector::Index(0)),
            Err(ParseError::EmptyInput { .. })
        ));
    }

    #[test]
    fn sheet_selection_by_index() {
        let bytes = write_tracker_workbook(&[
            SheetData {
                sheet_name: "F&B".into(),
                campaigns: vec![bleu_campaign()],
            },
            SheetData {
                sheet_name: "W&FJ".into(),
                campaigns: vec![],
            },
        ])
        .unwrap();
        let table = read_range(&bytes, &SheetSelector::Index(1)).unwrap();
        assert_eq!(table.sheet, "W&FJ");
    }

    #[test]
    fn unbilled_workbook_feeds_the_tracker_pipeline() {
        // Build a small unbilled workbook in the feed's own shape.
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet().set_name("F_B").unwrap();
        let header = [
            "CampaignName",
            "MediaName",
            "ProductCode",
            "PO",
            "Payable",
            "Billable",
            "AgencyCommission",
            "LevyBillable",
            "Unbilled Client Cost",
            "BuyMonth",
        ];
        for (col, name) in header.iter().enumerate() {
            ws.write_string(0, col as u16, *name).unwrap();
        }
        // serial 45292 = 2024-01-01
        let data: [(&str, &str, f64, f64); 3] = [
            ("Bleu", "TELEVISION", 100.0, 45292.0),
            ("Bleu", "DISPLAY", 200.0, 45292.0),
            ("Bleu", "TELEVISION", 0.0, 45292.0), // zero row: filtered
        ];
        for (i, (campaign, media, payable, serial)) in data.iter().enumerate() {
            let row = (i + 1) as u32;
            ws.write_string(row, 0, *campaign).unwrap();
            ws.write_string(row, 1, *media).unwrap();
            ws.write_string(row, 2, "PC1").unwrap();
            ws.write_string(row, 3, "PO123").unwrap();
            ws.write_number(row, 4, *payable).unwrap();
            ws.write_number(row, 5, *payable).unwrap();
            ws.write_number(row, 6, payable * 0.1).unwrap();
            ws.write_number(row, 7, payable * 0.01).unwrap();
            ws.write_number(row, 8, payable * 1.11).unwrap();
            ws.write_number(row, 9, *serial).unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let (rows, report) = read_spend_rows(&bytes).unwrap();
        assert_eq!(report.sheets_read, 1);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].division, "F&B");
        assert_eq!(rows[0].media, "TV");

        let campaigns = build_tracker(&rows, &TrackerPolicy::default());
        assert_eq!(campaigns.len(), 1);
        assert_eq!(campaigns[0].channels.len(), 2);
        assert_eq!(campaigns[0].channels[0].net_media, 100.0);
        assert_eq!(
            campaigns[0].start_date,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            campaigns[0].end_date,
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }

    #[test]
    fn path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.xlsx");
        write_tracker_workbook_to_path(
            &[SheetData {
                sheet_name: "F&B".into(),
                campaigns: vec![bleu_campaign()],
            }],
            &path,
        )
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let parsed = read_tracker_workbook(&bytes, &SheetSelector::Index(0)).unwrap();
        assert_eq!(parsed[0].channels.len(), 2);
    }
}
