use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::month::Month;

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// A single raw cell as read from a sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Trimmed text content. Integral numbers render without decimals.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().replace(',', "").parse().ok(),
            Cell::Empty => None,
        }
    }

    /// Numeric value with blank and non-numeric cells contributing zero.
    pub fn number_or_zero(&self) -> f64 {
        self.number().unwrap_or(0.0)
    }
}

/// One physical row. Positional access is total: out-of-range reads are
/// empty cells, never a panic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<Cell>,
}

impl RawRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, idx: usize) -> &Cell {
        self.cells.get(idx).unwrap_or(&EMPTY_CELL)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

impl From<Vec<Cell>> for RawRow {
    fn from(cells: Vec<Cell>) -> Self {
        Self::new(cells)
    }
}

/// An ordered sheet snapshot: every physical row in source order, unfiltered.
#[derive(Debug, Clone)]
pub struct RowTable {
    pub sheet: String,
    pub rows: Vec<RawRow>,
}

// ---------------------------------------------------------------------------
// Normalized spend rows (unbilled / PO-tracker feed)
// ---------------------------------------------------------------------------

/// One line item of the unbilled feed after schema mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendRow {
    pub campaign: String,
    pub media: String,
    pub product_code: String,
    pub po: String,
    pub division: String,
    pub payable: f64,
    pub billable: f64,
    pub agency_commission: f64,
    pub levy: f64,
    /// Unbilled client cost: the full invoice value of the line.
    pub client_cost: f64,
    /// Buy month, month granularity.
    pub buy_month: Option<NaiveDate>,
    /// Exact buy date when the feed carries one.
    pub buy_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Campaign tree (tracker pipeline)
// ---------------------------------------------------------------------------

/// Spend for one media channel in one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyExpense {
    pub net_billable: f64,
    pub agency_commission: f64,
    pub levy: f64,
    pub total_invoice_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaChannel {
    pub name: String,
    pub product_code: String,
    pub net_media: f64,
    pub agency_commission: f64,
    pub asbof: f64,
    pub total_po_value: f64,
    pub monthly: BTreeMap<Month, MonthlyExpense>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Campaign {
    pub po_number: String,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Reconciliation cutoff: end date plus 90 calendar days. Derived.
    pub po_close_down_date: Option<NaiveDate>,
    /// First-seen source order.
    pub channels: Vec<MediaChannel>,
    pub total_net_media_inc_fees: f64,
    pub total_agency_commission: f64,
    pub total_asbof: f64,
    pub total_po_value: f64,
    pub total_invoiced: f64,
    pub po_value_remaining: f64,
}

// ---------------------------------------------------------------------------
// Budget campaigns (annual budget sheet)
// ---------------------------------------------------------------------------

/// The fixed set of financial figures carried on every budget row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FinancialMetrics {
    pub net_billable: f64,
    pub agency_commission: f64,
    pub levy_asbof: f64,
    pub invoice_val: f64,
    pub planned_spend: f64,
    pub reserved_budget: f64,
    pub total_budget: f64,
    pub total_invoiced_to_date: f64,
    pub po_value_remaining: f64,
}

impl FinancialMetrics {
    /// Fold a channel row's figures into the campaign's running aggregate.
    /// Budget-level columns are populated only on total rows and stay as read.
    pub fn accumulate(&mut self, other: &FinancialMetrics) {
        self.net_billable += other.net_billable;
        self.agency_commission += other.agency_commission;
        self.levy_asbof += other.levy_asbof;
        self.invoice_val += other.invoice_val;
        self.planned_spend += other.planned_spend;
        self.reserved_budget += other.reserved_budget;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetChannel {
    pub name: String,
    pub financials: FinancialMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetCampaign {
    pub po_number: String,
    pub name: String,
    pub market: String,
    pub channels: Vec<BudgetChannel>,
    pub financials: FinancialMetrics,
    pub sub_campaigns: Vec<BudgetCampaign>,
    pub is_sub_campaign: bool,
    pub parent_campaign_name: Option<String>,
}
