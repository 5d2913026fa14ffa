use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use ridewise::config::AppConfig;
use ridewise::error::AppError;
use ridewise::telemetry;
use ridewise::workflows::rewards::{
    reward_router, InMemoryLedger, MonthlyUsageImporter, RewardEngine, RideFacts,
    RideRewardService, ScoringConfig, VehicleId, VehicleProfile, VehicleType,
};
use serde_json::json;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Ridewise Rewards Service",
    about = "Score vehicle rides, evaluate monthly bonuses, and serve the rewards API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single ride and print the point breakdown
    Score(ScoreArgs),
    /// Evaluate a month of sessions from a CSV export
    Month(MonthArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Ride distance in kilometers
    #[arg(long)]
    distance_km: f64,
    /// Vehicle propulsion type (ev, cng, petrol, diesel)
    #[arg(long, value_parser = parse_vehicle_type)]
    vehicle_type: VehicleType,
    /// Observed mileage for the ride (km/L or km/kWh)
    #[arg(long)]
    actual_mileage: f64,
    /// Vehicle's rated mileage in the same unit
    #[arg(long)]
    expected_mileage: f64,
}

#[derive(Args, Debug)]
struct MonthArgs {
    /// CSV export of completed sessions
    #[arg(long)]
    sessions_csv: PathBuf,
    /// Vehicle the report is for
    #[arg(long)]
    vehicle_id: String,
    /// Vehicle propulsion type (ev, cng, petrol, diesel)
    #[arg(long, value_parser = parse_vehicle_type)]
    vehicle_type: VehicleType,
    /// Vehicle's rated mileage (km/L or km/kWh)
    #[arg(long)]
    expected_mileage: f64,
    /// Month to evaluate (YYYY-MM)
    #[arg(long, value_parser = parse_month)]
    month: NaiveDate,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Score(args) => run_score(args),
        Command::Month(args) => run_month(args),
    }
}

fn parse_vehicle_type(raw: &str) -> Result<VehicleType, String> {
    VehicleType::from_str(raw).map_err(|err| err.to_string())
}

fn parse_month(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let service = Arc::new(RideRewardService::new(
        Arc::new(InMemoryLedger::default()),
        ScoringConfig::default(),
    ));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(reward_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ride rewards service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let engine = RewardEngine::default();
    let calculation = engine.score(&RideFacts {
        distance_km: args.distance_km,
        vehicle_type: args.vehicle_type,
        actual_mileage: args.actual_mileage,
        expected_mileage: args.expected_mileage,
    })?;

    println!("Ride score for a {} ride", args.vehicle_type.label());
    println!(
        "Distance: {:.1} km ({} {:.2} observed vs {:.2} rated)",
        args.distance_km,
        args.vehicle_type.mileage_unit(),
        args.actual_mileage,
        args.expected_mileage
    );
    println!("Base points:      {:.2}", calculation.base_points);
    println!("Multiplier:       x{:.2}", calculation.multiplier);
    println!("Efficiency bonus: {:+.2}", calculation.efficiency_bonus);
    println!("Total awarded:    {}", calculation.total_points);

    Ok(())
}

fn run_month(args: MonthArgs) -> Result<(), AppError> {
    let vehicle = VehicleProfile {
        vehicle_id: VehicleId(args.vehicle_id),
        vehicle_type: args.vehicle_type,
        expected_mileage: args.expected_mileage,
        current_odometer: 0.0,
    };

    let summary = MonthlyUsageImporter::from_path(&args.sessions_csv, &vehicle, args.month)?;
    let engine = RewardEngine::default();
    let bonus = engine.consistency_bonus(&summary.efficiency_facts(vehicle.expected_mileage))?;

    println!("Monthly report for vehicle {}", vehicle.vehicle_id.0);
    println!("Month: {}", summary.month.format("%Y-%m"));
    println!("Sessions: {}", summary.session_count);
    println!("Total distance: {:.1} km", summary.total_distance_km);
    println!(
        "Average mileage: {:.2} {} (rated {:.2})",
        summary.avg_mileage,
        vehicle.vehicle_type.mileage_unit(),
        vehicle.expected_mileage
    );
    println!("Consistency bonus: {bonus} points");

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
