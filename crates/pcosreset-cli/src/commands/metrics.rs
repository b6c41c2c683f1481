use chrono::Local;
use clap::{Subcommand, ValueEnum};
use pcosreset_core::metrics::{
    calculate_bmi, cm_to_feet, estimate_weeks_to_goal, feet_to_cm, goal_date, health_risks,
    kg_to_lbs, lbs_to_kg, DEFAULT_WEEKLY_RATE_KG,
};
use pcosreset_core::views::BmiGauge;
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Unit {
    Kg,
    Lbs,
    Cm,
    Ft,
}

#[derive(Subcommand)]
pub enum MetricsAction {
    /// Body mass index with category and health risks
    Bmi {
        /// Weight (kg, or lbs with --lbs)
        #[arg(long)]
        weight: f64,
        /// Height in cm
        #[arg(long)]
        height: f64,
        /// Weight is given in pounds
        #[arg(long)]
        lbs: bool,
    },
    /// Weeks to reach a target weight at a steady rate
    Weeks {
        /// Current weight in kg
        #[arg(long)]
        current: f64,
        /// Target weight in kg
        #[arg(long)]
        target: f64,
        /// Weekly change in kg
        #[arg(long, default_value_t = DEFAULT_WEEKLY_RATE_KG)]
        rate: f64,
    },
    /// Convert between kg/lbs and cm/feet
    Convert {
        value: f64,
        /// Unit of VALUE
        #[arg(value_enum)]
        from: Unit,
        /// Extra inches when converting from feet
        #[arg(long, default_value_t = 0.0)]
        inches: f64,
    },
}

pub fn run(action: MetricsAction) -> CliResult {
    match action {
        MetricsAction::Bmi { weight, height, lbs } => {
            let weight_kg = if lbs { lbs_to_kg(weight) } else { weight };
            let bmi = calculate_bmi(weight_kg, height)?;
            let gauge = BmiGauge::new(bmi);
            print_json(&json!({
                "bmi": (bmi * 10.0).round() / 10.0,
                "category": gauge.result.category,
                "label": gauge.result.category.label(),
                "color": gauge.result.color,
                "gaugePercent": gauge.percent,
                "healthRisks": health_risks(gauge.result.category),
            }))?;
        }
        MetricsAction::Weeks {
            current,
            target,
            rate,
        } => {
            let weeks = estimate_weeks_to_goal(current, target, rate)?;
            let today = Local::now().date_naive();
            print_json(&json!({
                "weeks": weeks,
                "goalDate": goal_date(today),
            }))?;
        }
        MetricsAction::Convert { value, from, inches } => {
            let out = match from {
                Unit::Kg => json!({ "lbs": kg_to_lbs(value).round() }),
                Unit::Lbs => json!({ "kg": (lbs_to_kg(value) * 10.0).round() / 10.0 }),
                Unit::Cm => json!(cm_to_feet(value)),
                Unit::Ft => json!({ "cm": feet_to_cm(value, inches).round() }),
            };
            print_json(&out)?;
        }
    }
    Ok(())
}
