//! Positional fold of the formatted annual budget sheet.

use crate::classify::{classify, RowRole};
use crate::config::{BudgetPolicy, TotalsPolicy};
use crate::error::ParseError;
use crate::model::{BudgetCampaign, BudgetChannel, RowTable};
use crate::schema::BudgetLayout;

/// Fold state threaded through the row loop. The open campaign is always
/// the last element of `campaigns`; sub-campaigns never open.
#[derive(Default)]
struct Fold {
    campaigns: Vec<BudgetCampaign>,
    usable_rows: usize,
}

impl Fold {
    fn open(&mut self) -> Option<&mut BudgetCampaign> {
        self.campaigns.last_mut()
    }

    /// Name of the nearest preceding campaign that carried a name.
    fn parent_name(&self) -> Option<String> {
        self.campaigns
            .iter()
            .rev()
            .find(|c| !c.name.is_empty())
            .map(|c| c.name.clone())
    }
}

/// Reconstruct campaigns from the positional budget sheet.
pub fn parse_budget(
    table: &RowTable,
    layout: &BudgetLayout,
    policy: &BudgetPolicy,
) -> Result<Vec<BudgetCampaign>, ParseError> {
    if table.rows.len() <= layout.header_rows {
        return Err(ParseError::EmptySheet {
            sheet: table.sheet.clone(),
        });
    }

    let mut fold = Fold::default();

    for row in table.rows.iter().skip(layout.header_rows) {
        let financials = layout.financials(row);
        match classify(row, layout) {
            RowRole::EntityHeader => {
                fold.usable_rows += 1;
                let mut campaign = BudgetCampaign {
                    po_number: row.cell(layout.po).text(),
                    name: row.cell(layout.name).text(),
                    market: row.cell(layout.market).text(),
                    financials,
                    ..Default::default()
                };
                // A header row may carry its first channel inline.
                let channel = row.cell(layout.channel).text();
                if !channel.is_empty() {
                    campaign.channels.push(BudgetChannel {
                        name: channel,
                        financials,
                    });
                }
                fold.campaigns.push(campaign);
            }
            RowRole::SubEntity => {
                fold.usable_rows += 1;
                let parent_name = fold.parent_name();
                if let Some(parent) = fold.open() {
                    let channel = row.cell(layout.channel).text();
                    let sub = BudgetCampaign {
                        name: row.cell(layout.name).text(),
                        market: row.cell(layout.market).text(),
                        channels: vec![BudgetChannel {
                            name: channel.clone(),
                            financials,
                        }],
                        financials,
                        is_sub_campaign: true,
                        parent_campaign_name: parent_name,
                        ..Default::default()
                    };
                    // The sub's spend still belongs to the parent campaign.
                    parent.channels.push(BudgetChannel {
                        name: channel,
                        financials,
                    });
                    parent.financials.accumulate(&financials);
                    parent.sub_campaigns.push(sub);
                }
            }
            RowRole::DetailOnly => {
                fold.usable_rows += 1;
                if let Some(open) = fold.open() {
                    open.channels.push(BudgetChannel {
                        name: row.cell(layout.channel).text(),
                        financials,
                    });
                    open.financials.accumulate(&financials);
                }
            }
            RowRole::TotalMarker => {
                fold.usable_rows += 1;
                if let Some(open) = fold.open() {
                    match policy.totals {
                        TotalsPolicy::TotalRowWins => open.financials = financials,
                        TotalsPolicy::SumChannels => {}
                    }
                }
            }
            RowRole::Skip => {}
        }
    }

    if fold.usable_rows == 0 {
        return Err(ParseError::EmptySheet {
            sheet: table.sheet.clone(),
        });
    }

    let mut campaigns = fold.campaigns;
    campaigns.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(campaigns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, RawRow};

    fn header() -> RawRow {
        RawRow::new(vec![Cell::Text("PO_Number".into())])
    }

    fn row(po: &str, name: &str, channel: &str, net: f64) -> RawRow {
        let mut cells = vec![Cell::Empty; 16];
        if !po.is_empty() {
            cells[0] = Cell::Text(po.into());
        }
        cells[4] = Cell::Text("UK".into());
        if !name.is_empty() {
            cells[5] = Cell::Text(name.into());
        }
        if !channel.is_empty() {
            cells[6] = Cell::Text(channel.into());
        }
        cells[10] = Cell::Number(net);
        RawRow::new(cells)
    }

    fn table(rows: Vec<RawRow>) -> RowTable {
        let mut all = vec![header()];
        all.extend(rows);
        RowTable {
            sheet: "F&B".into(),
            rows: all,
        }
    }

    #[test]
    fn sub_campaign_rows_link_to_the_open_campaign() {
        let parsed = parse_budget(
            &table(vec![
                row("P1", "A", "", 0.0),
                row("", "A-sub", "TV", 100.0),
                row("", "", "Digital", 50.0),
            ]),
            &BudgetLayout::default(),
            &BudgetPolicy::default(),
        )
        .unwrap();

        // exactly one top-level campaign, with both channels attached to it
        assert_eq!(parsed.len(), 1);
        let a = &parsed[0];
        assert_eq!(a.name, "A");
        let names: Vec<&str> = a.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["TV", "Digital"]);

        // the sub-campaign is recorded and back-links to its parent
        assert_eq!(a.sub_campaigns.len(), 1);
        assert!(a.sub_campaigns[0].is_sub_campaign);
        assert_eq!(a.sub_campaigns[0].name, "A-sub");
        assert_eq!(a.sub_campaigns[0].parent_campaign_name.as_deref(), Some("A"));
        // the Digital-only row attached to A, not to A-sub
        assert_eq!(a.sub_campaigns[0].channels.len(), 1);
    }

    #[test]
    fn detail_rows_accumulate_into_running_totals() {
        let parsed = parse_budget(
            &table(vec![
                row("P1", "Bleu", "TV", 100.0),
                row("", "", "Digital", 50.0),
            ]),
            &BudgetLayout::default(),
            &BudgetPolicy::default(),
        )
        .unwrap();
        assert_eq!(parsed[0].financials.net_billable, 150.0);
        assert_eq!(parsed[0].channels.len(), 2);
        assert_eq!(parsed[0].channels[1].financials.net_billable, 50.0);
    }

    #[test]
    fn total_row_overwrites_the_running_sum() {
        let rows = vec![
            row("P1", "Bleu", "TV", 100.0),
            row("", "", "Digital", 50.0),
            row("", "", "Total", 170.0),
        ];
        let authoritative = parse_budget(
            &table(rows.clone()),
            &BudgetLayout::default(),
            &BudgetPolicy::default(),
        )
        .unwrap();
        assert_eq!(authoritative[0].financials.net_billable, 170.0);
        // the total row never becomes a channel
        assert_eq!(authoritative[0].channels.len(), 2);

        let summed = parse_budget(
            &table(rows),
            &BudgetLayout::default(),
            &BudgetPolicy {
                totals: TotalsPolicy::SumChannels,
            },
        )
        .unwrap();
        assert_eq!(summed[0].financials.net_billable, 150.0);
    }

    #[test]
    fn campaigns_come_out_sorted_by_name() {
        let parsed = parse_budget(
            &table(vec![
                row("P2", "Chance", "TV", 10.0),
                row("P1", "Bleu", "TV", 20.0),
            ]),
            &BudgetLayout::default(),
            &BudgetPolicy::default(),
        )
        .unwrap();
        assert_eq!(parsed[0].name, "Bleu");
        assert_eq!(parsed[1].name, "Chance");
        assert_eq!(parsed[0].market, "UK");
        assert_eq!(parsed[0].po_number, "P1");
    }

    #[test]
    fn header_only_sheet_is_a_structural_error() {
        let err = parse_budget(
            &table(vec![]),
            &BudgetLayout::default(),
            &BudgetPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::EmptySheet { .. }));
    }

    #[test]
    fn blank_rows_are_skipped_without_error() {
        let parsed = parse_budget(
            &table(vec![
                RawRow::default(),
                row("P1", "Bleu", "TV", 5.0),
                RawRow::default(),
            ]),
            &BudgetLayout::default(),
            &BudgetPolicy::default(),
        )
        .unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
