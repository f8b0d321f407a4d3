//! Semantic row classification for the annual budget sheet.

use crate::model::RawRow;
use crate::schema::BudgetLayout;

/// Sentinel in the channel column marking an authoritative total row.
pub const TOTAL_SENTINEL: &str = "Total";

/// Semantic role of one budget sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    /// Non-empty PO cell: opens a new campaign.
    EntityHeader,
    /// Name and channel without a PO: a sub-campaign of the open campaign.
    SubEntity,
    /// Channel only: an extra channel for the open campaign.
    DetailOnly,
    /// Channel cell equals the total sentinel.
    TotalMarker,
    /// Blank or unusable.
    Skip,
}

/// Classify one row by its populated cells. The sentinel is checked
/// first: a total row never opens a campaign.
pub fn classify(row: &RawRow, layout: &BudgetLayout) -> RowRole {
    if row.is_blank() {
        return RowRole::Skip;
    }
    let channel = row.cell(layout.channel).text();
    if channel == TOTAL_SENTINEL {
        return RowRole::TotalMarker;
    }
    if !row.cell(layout.po).is_blank() {
        return RowRole::EntityHeader;
    }
    let has_name = !row.cell(layout.name).is_blank();
    match (has_name, !channel.is_empty()) {
        (true, true) => RowRole::SubEntity,
        (false, true) => RowRole::DetailOnly,
        _ => RowRole::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn row(po: &str, name: &str, channel: &str) -> RawRow {
        let mut cells = vec![Cell::Empty; 16];
        if !po.is_empty() {
            cells[0] = Cell::Text(po.into());
        }
        if !name.is_empty() {
            cells[5] = Cell::Text(name.into());
        }
        if !channel.is_empty() {
            cells[6] = Cell::Text(channel.into());
        }
        RawRow::new(cells)
    }

    #[test]
    fn po_opens_a_campaign() {
        let layout = BudgetLayout::default();
        assert_eq!(classify(&row("PO1", "Bleu", ""), &layout), RowRole::EntityHeader);
        assert_eq!(classify(&row("PO1", "", "TV"), &layout), RowRole::EntityHeader);
    }

    #[test]
    fn name_and_channel_is_a_sub_campaign() {
        let layout = BudgetLayout::default();
        assert_eq!(classify(&row("", "Bleu H2", "TV"), &layout), RowRole::SubEntity);
    }

    #[test]
    fn channel_only_is_a_detail_row() {
        let layout = BudgetLayout::default();
        assert_eq!(classify(&row("", "", "Digital"), &layout), RowRole::DetailOnly);
    }

    #[test]
    fn total_sentinel_wins_over_everything() {
        let layout = BudgetLayout::default();
        assert_eq!(classify(&row("", "", "Total"), &layout), RowRole::TotalMarker);
        // even a populated PO cell does not turn a total row into a header
        assert_eq!(classify(&row("PO1", "Bleu", "Total"), &layout), RowRole::TotalMarker);
    }

    #[test]
    fn blank_and_name_only_rows_are_skipped() {
        let layout = BudgetLayout::default();
        assert_eq!(classify(&RawRow::default(), &layout), RowRole::Skip);
        assert_eq!(classify(&row("", "orphan name", ""), &layout), RowRole::Skip);
    }
}
