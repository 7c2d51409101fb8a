//! EcoWatt application binary - composition root.
//!
//! Ties the core and chat crates into a single executable:
//! 1. Parse CLI arguments
//! 2. Load configuration from TOML and initialize tracing
//! 3. Build the demo application state
//! 4. Run the requested subcommand

mod cli;

use std::error::Error;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use serde_json::json;

use ecowatt_chat::ChatAssistant;
use ecowatt_core::outage::time_ago;
use ecowatt_core::tariff::{ENERGY_TIPS, SIMULATED_RATES};
use ecowatt_core::{
    AppStateStore, BillInputs, EcoWattConfig, ImmediateScheduler, OutageBoard, RefreshLoop,
    ReportStatus, Savings, Scheduler, SeriesStats, SignalSynthesizer, TokioScheduler,
};

use cli::{CliArgs, Command};

type AppResult = Result<(), Box<dyn Error>>;

/// Everything a subcommand needs.
struct App {
    config: EcoWattConfig,
    seed: Option<u64>,
    json: bool,
}

impl App {
    fn currency(&self) -> &str {
        &self.config.tariff.currency
    }

    fn synthesizer(&self) -> SignalSynthesizer {
        SignalSynthesizer::from_tariff(&self.config.tariff.flat_tariff())
    }

    /// Demo state with a freshly generated series.
    fn demo_store(&self) -> Result<Arc<AppStateStore>, Box<dyn Error>> {
        let store = Arc::new(AppStateStore::with_demo_data(&self.config));
        RefreshLoop::new(
            Arc::clone(&store),
            Arc::new(ImmediateScheduler::new()),
            self.config.dashboard.refresh_interval(),
        )
        .with_seed(self.seed)
        .refresh_once()?;
        Ok(store)
    }

    fn print_json(&self, value: &serde_json::Value) -> AppResult {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

// =============================================================================
// Subcommands
// =============================================================================

fn run_series(app: &App) -> AppResult {
    let now = Utc::now();
    let synth = app.synthesizer();
    let series = match app.seed {
        Some(seed) => synth.generate_seeded(now, seed),
        None => synth.generate_daily_series(now, &mut rand::rng()),
    };
    let stats = SeriesStats::from_samples(&series).unwrap_or_default();

    if app.json {
        return app.print_json(&json!({ "series": series, "stats": stats }));
    }

    for sample in &series {
        println!(
            "{}  {:>5} W  {:>4} {}",
            sample.timestamp.format("%H:%M"),
            sample.consumption_watts,
            sample.cost,
            app.currency()
        );
    }
    println!();
    println!(
        "min {} W, max {} W, total {} W, cost {} {}",
        stats.min_watts,
        stats.max_watts,
        stats.total_watts,
        stats.total_cost,
        app.currency()
    );
    Ok(())
}

async fn run_ask(app: &App, text: &[String], no_delay: bool) -> AppResult {
    let store = app.demo_store()?;
    let scheduler: Arc<dyn Scheduler> = if no_delay {
        Arc::new(ImmediateScheduler::new())
    } else {
        Arc::new(TokioScheduler)
    };
    let assistant = ChatAssistant::new(&app.config, scheduler);
    let reply = assistant.send(&text.join(" "), &store).await?;

    if app.json {
        return app.print_json(&serde_json::to_value(&reply)?);
    }

    println!("{}", reply.text);
    if let Some(suggestions) = &reply.suggestions {
        println!();
        for s in suggestions {
            println!("  > {}", s);
        }
    }
    Ok(())
}

fn run_devices(app: &App, search: Option<&str>) -> AppResult {
    let store = app.demo_store()?;
    let groups = store.devices_by_room(search.unwrap_or(""))?;

    if app.json {
        return app.print_json(&serde_json::to_value(&groups)?);
    }

    if groups.is_empty() {
        println!("Aucun appareil trouvé.");
        return Ok(());
    }
    for group in &groups {
        println!("{} ({})", group.room, group.devices.len());
        for d in &group.devices {
            println!(
                "  [{}] {:<20} {:>6} W  {}",
                d.id,
                d.name,
                d.consumption_watts,
                d.status.label()
            );
        }
    }
    println!();
    println!(
        "{} appareils allumés, {} W au total",
        store.active_device_count()?,
        store.current_consumption()?
    );
    Ok(())
}

fn run_bill(
    app: &App,
    daily: &str,
    rate: Option<&str>,
    days: &str,
    current: Option<f64>,
) -> AppResult {
    let configured_rate = app.config.tariff.rate_per_kwh.to_string();
    let inputs = BillInputs::from_form(daily, rate.unwrap_or(configured_rate.as_str()), days);
    let prediction = inputs.predict();
    let savings = current.map(|c| inputs.savings(c));
    let simulations = inputs.simulate_rates(&SIMULATED_RATES);

    if app.json {
        return app.print_json(&json!({
            "inputs": inputs,
            "prediction": prediction,
            "savings": savings,
            "simulations": simulations,
        }));
    }

    let cur = app.currency();
    println!(
        "Consommation mensuelle : {:.1} kWh",
        prediction.monthly_consumption_kwh
    );
    println!("Facture prévue : {:.0} {}", prediction.monthly_bill, cur);
    println!("Coût journalier : {:.0} {}", prediction.daily_cost, cur);

    if let Some(s) = savings {
        println!("{}", savings_line(&s, cur));
    }

    println!();
    println!("Simulation de tarifs :");
    for sim in &simulations {
        println!(
            "  {} {}/kWh -> {:.0} {}",
            sim.rate_per_kwh, cur, sim.monthly_bill, cur
        );
    }

    println!();
    println!("Conseils d'économie :");
    for tip in &ENERGY_TIPS {
        println!(
            "  {} {} : {} (jusqu'à {})",
            tip.icon, tip.title, tip.description, tip.potential
        );
    }
    Ok(())
}

/// Savings, extra cost, or no change when the bills match to the unit.
fn savings_line(s: &Savings, currency: &str) -> String {
    if s.amount.abs() < 0.5 {
        "Aucune différence avec la facture actuelle".to_string()
    } else if s.is_saving() {
        format!("Économies : {:.0} {} ({:.1}%)", s.amount, currency, s.percent)
    } else {
        format!(
            "Surcoût : {:.0} {} ({:.1}%)",
            s.amount.abs(),
            currency,
            s.percent.abs()
        )
    }
}

fn run_outages(app: &App) -> AppResult {
    let now = Utc::now();
    let board = OutageBoard::with_demo_data(now);
    let reports = board.reports()?;

    if app.json {
        return app.print_json(&serde_json::to_value(&reports)?);
    }

    for r in &reports {
        println!(
            "[{}] {} - {} ({})",
            r.status.label(),
            r.title,
            r.location,
            time_ago(now, r.timestamp)
        );
        println!("    {}", r.description);
    }
    println!();
    println!(
        "{} en attente, {} en cours, {} résolus",
        board.count_by_status(ReportStatus::Pending)?,
        board.count_by_status(ReportStatus::InProgress)?,
        board.count_by_status(ReportStatus::Resolved)?
    );
    Ok(())
}

fn run_dashboard(app: &App) -> AppResult {
    let store = app.demo_store()?;
    let summary = store.dashboard_summary()?;

    if app.json {
        return app.print_json(&json!({
            "summary": summary,
            "alerts": store.alerts()?,
        }));
    }

    let cur = app.currency();
    println!(
        "Consommation actuelle : {} W",
        summary.current_consumption_watts
    );
    println!(
        "Aujourd'hui : {} W, {} {}",
        summary.today_consumption_watts, summary.today_cost, cur
    );
    println!(
        "Budget mensuel : {:.0} {} ({:.1}% utilisé)",
        store.monthly_budget()?,
        cur,
        summary.budget_usage_percent
    );
    println!("Alertes non lues : {}", summary.unread_alerts);
    for alert in store.alerts()?.iter().filter(|a| !a.is_read) {
        println!("  - {} : {}", alert.title, alert.message);
    }
    Ok(())
}

async fn run_watch(app: &App, ticks: usize) -> AppResult {
    let store = Arc::new(AppStateStore::with_demo_data(&app.config));
    let refresh = RefreshLoop::new(
        Arc::clone(&store),
        Arc::new(TokioScheduler),
        app.config.dashboard.refresh_interval(),
    )
    .with_seed(app.seed)
    .with_max_ticks(ticks);

    let shutdown = refresh.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping refresh loop");
            shutdown.shutdown();
        }
    });

    let done = refresh.run().await;
    let summary = store.dashboard_summary()?;

    if app.json {
        return app.print_json(&json!({ "ticks": done, "summary": summary }));
    }
    println!(
        "{} rafraîchissements, dernière série : {} W, {} {}",
        done,
        summary.today_consumption_watts,
        summary.today_cost,
        app.currency()
    );
    Ok(())
}

/// stderr `fmt` subscriber for a filter directive, falling back to `info`.
fn log_subscriber(filter: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish()
}

#[tokio::main]
async fn main() -> AppResult {
    let args = CliArgs::parse();

    // Config, loaded under a bootstrap subscriber so its own events are kept.
    let config_file = args.resolve_config_path();
    let config = tracing::subscriber::with_default(
        log_subscriber(&args.resolve_log_filter(None)),
        || EcoWattConfig::load_or_default(&config_file),
    );

    // Tracing, now honouring the configured level.
    tracing::subscriber::set_global_default(log_subscriber(
        &args.resolve_log_filter(Some(&config.general.log_level)),
    ))?;

    tracing::info!(
        path = %config_file.display(),
        "Starting EcoWatt v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = App {
        seed: args.resolve_seed(config.signal.seed),
        config,
        json: args.json,
    };

    match &args.command {
        Command::Series => run_series(&app),
        Command::Ask { text, no_delay } => run_ask(&app, text, *no_delay).await,
        Command::Devices { search } => run_devices(&app, search.as_deref()),
        Command::Bill {
            daily,
            rate,
            days,
            current,
        } => run_bill(&app, daily, rate.as_deref(), days, *current),
        Command::Outages => run_outages(&app),
        Command::Dashboard => run_dashboard(&app),
        Command::Watch { ticks } => run_watch(&app, *ticks).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings_line_equal_bills() {
        let inputs = BillInputs::new(10.0, 80.0, 30.0);
        let s = inputs.savings(24_000.0);
        assert_eq!(
            savings_line(&s, "FCFA"),
            "Aucune différence avec la facture actuelle"
        );
    }

    #[test]
    fn test_savings_line_saving_and_extra_cost() {
        let inputs = BillInputs::new(10.0, 80.0, 30.0);
        assert_eq!(
            savings_line(&inputs.savings(30_000.0), "FCFA"),
            "Économies : 6000 FCFA (20.0%)"
        );
        assert_eq!(
            savings_line(&inputs.savings(20_000.0), "FCFA"),
            "Surcoût : 4000 FCFA (20.0%)"
        );
    }
}
