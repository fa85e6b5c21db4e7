//! plan-runner: headless staffing-plan runner over a workbook database.
//!
//! Usage:
//!   plan-runner --demo --seed 42 --positions 8 --strategy cascading
//!   plan-runner --db team.db --mode specific --month 7 --export report.json

use anyhow::Result;
use staffplan_core::{
    PlanConfig, PlanEngine, PlanReport, ScenarioBuilder, SeasonalMode, StaffingStatus, Strategy,
    WorkbookStore,
};
use std::env;

#[derive(serde::Serialize)]
struct ReportEnvelope {
    export_id: String,
    generated_at: String,
    workbook: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    demo_seed: Option<u64>,
    report: PlanReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = str_arg(&args, "--db").unwrap_or_else(|| ":memory:".to_string());
    let demo = args.iter().any(|a| a == "--demo");
    let seed = parse_arg(&args, "--seed", 42u64);
    let positions = parse_arg(&args, "--positions", 6usize);
    let config_path = str_arg(&args, "--config");
    let export_path = str_arg(&args, "--export");

    // Config file first, then explicit flags on top of it.
    let mut config = match &config_path {
        Some(path) => PlanConfig::load(path)?,
        None => PlanConfig {
            working_hours_per_month: 160.0,
            efficiency_factor: 0.85,
            priority_allow_list: None,
            seasonal_mode: SeasonalMode::default(),
            strategy: Strategy::Proportional,
        },
    };
    config.working_hours_per_month = parse_arg(&args, "--hours", config.working_hours_per_month);
    config.efficiency_factor = parse_arg(&args, "--efficiency", config.efficiency_factor);
    if let Some(name) = str_arg(&args, "--strategy") {
        config.strategy = Strategy::from_name(&name)?;
    }
    let month_flag: Option<u32> = match str_arg(&args, "--month") {
        Some(raw) => match raw.parse() {
            Ok(month) => Some(month),
            Err(_) => {
                log::warn!("--month '{raw}' is not a number, ignoring it");
                None
            }
        },
        None => None,
    };
    if let Some(mode_name) = str_arg(&args, "--mode") {
        let month = resolve_month(&mode_name, month_flag);
        config.seasonal_mode = SeasonalMode::from_parts(&mode_name, month)?;
    } else if month_flag.is_some() {
        // A bare --month implies specific-month planning.
        config.seasonal_mode = SeasonalMode::from_parts("specific", month_flag)?;
    }
    if let Some(list) = str_arg(&args, "--priorities") {
        let parsed: Vec<u8> = list
            .split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect();
        config.priority_allow_list = if parsed.is_empty() { None } else { Some(parsed) };
    }

    println!("staffplan — plan-runner");
    println!("  db:         {db}");
    if demo {
        println!("  demo seed:  {seed}");
        println!("  positions:  {positions}");
    }
    println!("  strategy:   {}", config.strategy.name());
    println!("  mode:       {}", mode_label(&config.seasonal_mode));
    println!("  hours:      {:.1}", config.working_hours_per_month);
    println!("  efficiency: {:.2}", config.efficiency_factor);
    if let Some(list) = &config.priority_allow_list {
        println!("  priorities: {list:?}");
    }
    println!();

    let mut store = if db == ":memory:" {
        WorkbookStore::in_memory()?
    } else {
        WorkbookStore::open(&db)?
    };
    store.migrate()?;

    if demo {
        let snapshot = ScenarioBuilder::new(seed).position_count(positions).build();
        store.seed_snapshot(&snapshot)?;
    }

    println!(
        "workbook: {} positions, {} employees ({} active), {} tasks, {} matrix cells",
        store.position_count()?,
        store.employee_count()?,
        store.active_employee_count()?,
        store.task_count()?,
        store.assignment_count()?,
    );
    println!();

    let snapshot = store.load_snapshot()?;
    let engine = PlanEngine::new(config)?;
    let report = engine.run(&snapshot)?;

    print_report(&report);

    if let Some(path) = export_path {
        let envelope = ReportEnvelope {
            export_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            workbook: db.clone(),
            demo_seed: demo.then_some(seed),
            report,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&envelope)?)?;
        println!();
        println!("report exported to {path}");
    }

    Ok(())
}

fn print_report(report: &PlanReport) {
    println!("=== STAFFING REPORT ===");
    if report.rows.is_empty() {
        println!("  (no eligible tasks in this workbook)");
        return;
    }
    for row in &report.rows {
        println!(
            "  {:<28} | cur {:>3} | req {:>6.2} | gap {:>+6.2} | {:<12} | {:>7.1}h | OT {:>6.1}h | {:>5.1}%",
            row.position,
            row.current_headcount,
            row.required_headcount,
            row.gap,
            status_label(row.status),
            row.total_hours,
            row.overtime_hours,
            row.utilization_pct,
        );
    }

    let s = &report.summary;
    println!();
    println!("=== SUMMARY ===");
    println!("  positions:       {}", s.position_count);
    println!("  current heads:   {}", s.total_current_headcount);
    println!("  required heads:  {:.2}", s.total_required_headcount);
    println!("  total gap:       {:+.2}", s.total_gap);
    println!("  allocated hours: {:.1}", s.total_hours);
    println!("  overtime hours:  {:.1}", s.total_overtime_hours);
}

fn status_label(status: StaffingStatus) -> &'static str {
    match status {
        StaffingStatus::Sufficient => "sufficient",
        StaffingStatus::Insufficient => "insufficient",
    }
}

fn mode_label(mode: &SeasonalMode) -> String {
    match mode {
        SeasonalMode::Specific { month } => format!("specific (month {month})"),
        other => other.name().to_string(),
    }
}

/// Specific-month planning without an explicit month falls back to the
/// current calendar month.
fn resolve_month(mode_name: &str, month_flag: Option<u32>) -> Option<u32> {
    use chrono::Datelike;
    if mode_name == "specific" && month_flag.is_none() {
        Some(chrono::Local::now().month())
    } else {
        month_flag
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}
