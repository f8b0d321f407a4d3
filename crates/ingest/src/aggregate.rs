//! Grouping and summation for the unbilled / PO-tracker feed.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::config::{RowFilter, TrackerPolicy};
use crate::dates::DateRange;
use crate::model::{Campaign, MediaChannel, SpendRow};
use crate::month::Month;

/// Build the campaign tree from normalized spend rows.
///
/// Total over arbitrary input: no row can fail the aggregation. Campaigns
/// come out sorted by name, channels keep first-seen order, and month
/// buckets only form for rows whose buy month resolves.
pub fn build_tracker(rows: &[SpendRow], policy: &TrackerPolicy) -> Vec<Campaign> {
    // BTreeMap keys give the deterministic by-name output order.
    let mut by_campaign: BTreeMap<&str, Vec<&SpendRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| admit(r, policy.row_filter)) {
        by_campaign.entry(row.campaign.as_str()).or_default().push(row);
    }

    by_campaign
        .into_iter()
        .map(|(name, rows)| build_campaign(name, &rows))
        .collect()
}

fn admit(row: &SpendRow, filter: RowFilter) -> bool {
    match filter {
        RowFilter::BilledWithPo => (row.payable > 0.0 || row.billable > 0.0) && !row.po.is_empty(),
        RowFilter::KeepAll => true,
    }
}

fn build_campaign(name: &str, rows: &[&SpendRow]) -> Campaign {
    let mut channels: Vec<MediaChannel> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut range = DateRange::default();

    for row in rows {
        let at = *slot.entry(row.media.as_str()).or_insert_with(|| {
            channels.push(MediaChannel {
                name: row.media.clone(),
                product_code: row.product_code.clone(),
                ..Default::default()
            });
            channels.len() - 1
        });
        let channel = &mut channels[at];
        channel.net_media += row.payable;
        channel.agency_commission += row.agency_commission;
        channel.asbof += row.levy;
        channel.total_po_value += row.client_cost;

        if let Some(month_date) = row.buy_month {
            if let Some(month) = Month::from_index(month_date.month()) {
                let bucket = channel.monthly.entry(month).or_default();
                bucket.net_billable += row.payable;
                bucket.agency_commission += row.agency_commission;
                bucket.levy += row.levy;
                bucket.total_invoice_value += row.client_cost;
            }
            range.fold_month(month_date);
        }
        if let Some(day) = row.buy_date {
            range.fold_day(day);
        }
    }

    let total_po_value: f64 = channels.iter().map(|c| c.total_po_value).sum();
    // No invoice feed is wired in; remaining mirrors the full PO value.
    let total_invoiced = 0.0;

    Campaign {
        po_number: rows.first().map(|r| r.po.clone()).unwrap_or_default(),
        name: name.to_string(),
        start_date: range.start,
        end_date: range.end,
        po_close_down_date: range.close_down(),
        total_net_media_inc_fees: channels.iter().map(|c| c.net_media).sum(),
        total_agency_commission: channels.iter().map(|c| c.agency_commission).sum(),
        total_asbof: channels.iter().map(|c| c.asbof).sum(),
        total_po_value,
        total_invoiced,
        po_value_remaining: total_po_value - total_invoiced,
        channels,
    }
}
