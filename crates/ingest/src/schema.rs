//! Declared column schemas, validated once per sheet.
//!
//! The unbilled feed is header-addressed; the formatted annual budget
//! sheet is positional. Both schemas are resolved/declared up front so a
//! malformed sheet fails fast instead of silently reading wrong columns.

use crate::dates;
use crate::error::ParseError;
use crate::model::{FinancialMetrics, RawRow, SpendRow};
use crate::normalize;

/// Header names of the unbilled feed.
pub mod columns {
    pub const CAMPAIGN: &str = "CampaignName";
    pub const MEDIA: &str = "MediaName";
    pub const PRODUCT_CODE: &str = "ProductCode";
    pub const PO: &str = "PO";
    pub const PAYABLE: &str = "Payable";
    pub const BILLABLE: &str = "Billable";
    pub const AGENCY_COMMISSION: &str = "AgencyCommission";
    pub const LEVY: &str = "LevyBillable";
    pub const CLIENT_COST: &str = "Unbilled Client Cost";
    pub const BUY_MONTH: &str = "BuyMonth";
    pub const BUY_DATE: &str = "BuyDate";
}

/// Resolved column positions for one unbilled sheet.
#[derive(Debug, Clone)]
pub struct TrackerColumns {
    campaign: usize,
    media: usize,
    product_code: usize,
    po: usize,
    payable: usize,
    billable: usize,
    agency_commission: usize,
    levy: usize,
    client_cost: usize,
    buy_month: usize,
    /// Not every export carries an exact buy date.
    buy_date: Option<usize>,
}

impl TrackerColumns {
    /// Resolve the header row once; any missing required column fails the
    /// whole sheet.
    pub fn resolve(sheet: &str, header: &RawRow) -> Result<Self, ParseError> {
        let headers: Vec<String> = (0..header.len()).map(|i| header.cell(i).text()).collect();
        let idx = |name: &str| -> Result<usize, ParseError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ParseError::MissingColumn {
                    sheet: sheet.to_string(),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            campaign: idx(columns::CAMPAIGN)?,
            media: idx(columns::MEDIA)?,
            product_code: idx(columns::PRODUCT_CODE)?,
            po: idx(columns::PO)?,
            payable: idx(columns::PAYABLE)?,
            billable: idx(columns::BILLABLE)?,
            agency_commission: idx(columns::AGENCY_COMMISSION)?,
            levy: idx(columns::LEVY)?,
            client_cost: idx(columns::CLIENT_COST)?,
            buy_month: idx(columns::BUY_MONTH)?,
            buy_date: headers.iter().position(|h| h == columns::BUY_DATE),
        })
    }

    /// Map one raw row into a normalized spend row. Blank rows map to
    /// `None`; money cells coerce to zero.
    pub fn spend_row(&self, row: &RawRow, division: &str) -> Option<SpendRow> {
        if row.is_blank() {
            return None;
        }
        let campaign = row.cell(self.campaign).text();
        let media = row.cell(self.media).text();
        if campaign.is_empty() && media.is_empty() {
            return None;
        }

        let buy_month_cell = row.cell(self.buy_month);
        let buy_month = dates::resolve(buy_month_cell);
        if buy_month.is_none() && !buy_month_cell.is_blank() {
            log::warn!(
                "unparseable {} '{}' for campaign '{}'",
                columns::BUY_MONTH,
                buy_month_cell.text(),
                campaign
            );
        }

        Some(SpendRow {
            media: normalize::channel_name(&media).to_string(),
            campaign,
            product_code: row.cell(self.product_code).text(),
            po: row.cell(self.po).text(),
            division: division.to_string(),
            payable: row.cell(self.payable).number_or_zero(),
            billable: row.cell(self.billable).number_or_zero(),
            agency_commission: row.cell(self.agency_commission).number_or_zero(),
            levy: row.cell(self.levy).number_or_zero(),
            client_cost: row.cell(self.client_cost).number_or_zero(),
            buy_month,
            buy_date: self.buy_date.and_then(|i| dates::resolve(row.cell(i))),
        })
    }
}

/// Fixed column positions of the formatted annual budget sheet. The sheet
/// is positional: campaigns are keyed by the PO column and the channel
/// column doubles as the "Total" sentinel carrier.
#[derive(Debug, Clone)]
pub struct BudgetLayout {
    pub po: usize,
    pub market: usize,
    pub name: usize,
    pub channel: usize,
    pub planned_spend: usize,
    pub reserved_budget: usize,
    pub total_budget: usize,
    pub net_billable: usize,
    pub agency_commission: usize,
    pub levy: usize,
    pub invoice_val: usize,
    pub total_invoiced_to_date: usize,
    pub po_value_remaining: usize,
    /// Rows to skip before data starts.
    pub header_rows: usize,
}

impl Default for BudgetLayout {
    fn default() -> Self {
        Self {
            po: 0,
            market: 4,
            name: 5,
            channel: 6,
            planned_spend: 7,
            reserved_budget: 8,
            total_budget: 9,
            net_billable: 10,
            agency_commission: 11,
            levy: 12,
            invoice_val: 13,
            total_invoiced_to_date: 14,
            po_value_remaining: 15,
            header_rows: 1,
        }
    }
}

impl BudgetLayout {
    /// Read the row's financial figures; blanks coerce to zero.
    pub fn financials(&self, row: &RawRow) -> FinancialMetrics {
        FinancialMetrics {
            net_billable: row.cell(self.net_billable).number_or_zero(),
            agency_commission: row.cell(self.agency_commission).number_or_zero(),
            levy_asbof: row.cell(self.levy).number_or_zero(),
            invoice_val: row.cell(self.invoice_val).number_or_zero(),
            planned_spend: row.cell(self.planned_spend).number_or_zero(),
            reserved_budget: row.cell(self.reserved_budget).number_or_zero(),
            total_budget: row.cell(self.total_budget).number_or_zero(),
            total_invoiced_to_date: row.cell(self.total_invoiced_to_date).number_or_zero(),
            po_value_remaining: row.cell(self.po_value_remaining).number_or_zero(),
        }
    }
}
