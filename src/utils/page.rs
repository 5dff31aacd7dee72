//! Text view of the dashboard page

use chrono::{DateTime, NaiveDateTime};

use crate::api::myfinstocks::display_or_na;
use crate::models::{DashboardState, PricePoint, StatCard, TrendRow};
use crate::services::series_service;
use crate::utils::Table;

pub const PAGE_TITLE: &str = "MyFinStocks Dashboard";

/// What the page shows for a given state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub title: String,
    /// "As of" line from the summary's `last_updated`
    pub as_of: Option<String>,
    /// Set only in the error state, and then nothing else is shown
    pub message: Option<String>,
    pub cards: Vec<StatCard>,
    pub trend: Vec<TrendRow>,
    /// Series to chart, present only once loaded
    pub chart: Option<Vec<PricePoint>>,
}

impl Page {
    pub fn from_state(state: &DashboardState) -> Self {
        match state {
            DashboardState::Loading => Page::default(),
            DashboardState::Error(message) => Page {
                message: Some(message.clone()),
                ..Page::default()
            },
            DashboardState::Loaded(data) => {
                let summary = &data.summary;
                Page {
                    title: PAGE_TITLE.to_string(),
                    as_of: summary.last_updated.as_deref().map(format_last_updated),
                    message: None,
                    cards: vec![
                        StatCard::new("Symbol", summary.symbol.clone()),
                        StatCard::new("Exchange", summary.exchange.clone()),
                        StatCard::new("Live", display_or_na(&summary.live_price)),
                        StatCard::new("Prev Close", display_or_na(&summary.yesterday_price)),
                    ],
                    trend: series_service::trend_rows(&data.series),
                    chart: Some(data.series.clone()),
                }
            }
        }
    }

    /// Render for the terminal. The error state renders as the bare message.
    pub fn render_text(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        if self.cards.is_empty() {
            return String::new();
        }

        let heading = match &self.as_of {
            Some(as_of) => format!("{}\nAs of {}", self.title, as_of),
            None => self.title.clone(),
        };
        let mut sections = vec![heading, render_cards(&self.cards)];

        if !self.trend.is_empty() {
            let mut table = Table::new(&["Since", "Price", "Change"]);
            for row in &self.trend {
                table.add_row(vec![
                    row.label.clone(),
                    format!("{:.2}", row.reference),
                    row.change_pct
                        .map(|pct| format!("{:+.2}%", pct))
                        .unwrap_or_else(|| "n/a".to_string()),
                ]);
            }
            sections.push(table.render());
        }

        sections.join("\n\n")
    }
}

/// Backend timestamps are ISO 8601, with or without an offset.
/// Anything else is shown as sent.
fn format_last_updated(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d %b %Y %H:%M %:z").to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.format("%d %b %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Cards side by side, each boxed and sized to its longer line
fn render_cards(cards: &[StatCard]) -> String {
    let widths: Vec<usize> = cards
        .iter()
        .map(|c| c.label.chars().count().max(c.value.chars().count()))
        .collect();

    let border = widths
        .iter()
        .map(|&w| format!("+{}+", "-".repeat(w + 2)))
        .collect::<Vec<_>>()
        .join(" ");

    [
        border.clone(),
        card_row(cards, &widths, card_label),
        card_row(cards, &widths, card_value),
        border,
    ]
    .join("\n")
}

fn card_row(cards: &[StatCard], widths: &[usize], cell: fn(&StatCard) -> &str) -> String {
    cards
        .iter()
        .zip(widths)
        .map(|(card, &w)| format!("| {:<w$} |", cell(card), w = w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn card_label(card: &StatCard) -> &str {
    card.label
}

fn card_value(card: &StatCard) -> &str {
    &card.value
}
