//! Terminal rendering of the dashboard view models

use crate::services::chart::{sparkline, ChartView};
use crate::services::{BacktestReport, ConfigView, PanelChanges, Tier, WalletItem, WalletPanel};
use crate::types::ProfitBalances;
use colored::{ColoredString, Colorize};

const BAR_CELLS: usize = 20;

/// `[ RUNNING ]` coloured by badge class; unknown classes stay unstyled
pub fn status_badge(view: &ConfigView) -> String {
    let label = format!("[ {} ]", view.badge.text);
    let styled: ColoredString = match view.badge.class.as_str() {
        "status-running" => label.green().bold(),
        "status-stopped" => label.red().bold(),
        _ => label.normal(),
    };
    styled.to_string()
}

pub fn config_view(view: &ConfigView) -> String {
    let address = if view.withdraw_address.is_empty() {
        "(not set)"
    } else {
        view.withdraw_address.as_str()
    };
    let mut out = String::new();
    out.push_str(&format!("Bot status: {}\n\n", status_badge(view)));
    out.push_str("Strategy\n");
    out.push_str(&format!(
        "  Levels:        {} / {} / {}\n",
        view.level1, view.level2, view.level3
    ));
    out.push_str("Risk\n");
    out.push_str(&format!("  Stop loss:     {}\n", view.stop_loss_pct));
    out.push_str(&format!("  Take profit:   {}\n", view.take_profit_pct));
    out.push_str("Profit\n");
    out.push_str(&format!("  Target:        {} ADA\n", view.target_ada));
    out.push_str(&format!("  Withdraw to:   {}\n", address));
    out
}

fn tint(text: &str, tier: Tier) -> ColoredString {
    match tier {
        Tier::Success => text.green(),
        Tier::Warning => text.yellow(),
        Tier::Neutral => text.normal(),
    }
}

/// Text progress bar; negative widths draw empty
pub fn progress_bar(width_pct: f64) -> String {
    let filled = ((width_pct.max(0.0) / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

pub fn wallet_item(item: &WalletItem) -> String {
    let amount = item.amount_label();
    let amount = match item.tier {
        Tier::Success => amount.green(),
        _ => amount.dimmed(),
    };
    format!(
        "{} {}\n  {}\n  {} {:>5.1}%\n  QR: {}\n",
        item.name.bold(),
        amount,
        item.address.dimmed(),
        tint(&progress_bar(item.bar_width_pct), item.tier),
        item.progress_pct,
        item.qr_url
    )
}

pub fn wallet_panel(panel: &WalletPanel) -> String {
    if panel.is_empty() {
        return "No wallets.\n".to_string();
    }
    panel.items.iter().map(wallet_item).collect::<Vec<_>>().join("\n")
}

pub fn panel_changes(changes: &PanelChanges) -> String {
    let mut parts = Vec::new();
    if !changes.added.is_empty() {
        parts.push(format!("added: {}", changes.added.join(", ")));
    }
    if !changes.removed.is_empty() {
        parts.push(format!("removed: {}", changes.removed.join(", ")));
    }
    if !changes.changed.is_empty() {
        parts.push(format!("updated: {}", changes.changed.join(", ")));
    }
    if parts.is_empty() {
        "no changes".to_string()
    } else {
        parts.join(" | ")
    }
}

pub fn chart(chart: &ChartView) -> String {
    match (chart.last(), chart.range()) {
        (Some(last), Some((low, high))) => {
            let close = format!("{:.4}", last.close);
            let close = if last.is_bullish() { close.green() } else { close.red() };
            format!(
                "{}\n  last {}  high {:.4}  low {:.4}  ({} candles)\n",
                chart.sparkline(),
                close,
                high,
                low,
                chart.series().len()
            )
        }
        _ => "No chart data.\n".to_string(),
    }
}

pub fn balances(balances: &ProfitBalances) -> String {
    format!("USDC: {:.2}\nADA:  {:.2}\n", balances.usdc, balances.ada)
}

pub fn backtest(report: &BacktestReport) -> String {
    let mut out = String::new();
    for (key, value) in &report.metrics {
        out.push_str(&format!("  {:<20} {}\n", key, value));
    }
    if !report.equity_curve.is_empty() {
        out.push_str(&format!("  Equity: {}\n", sparkline(&report.equity_curve)));
    }
    out
}
