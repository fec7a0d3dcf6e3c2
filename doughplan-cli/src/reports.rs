use anyhow::Result;
use colored::Colorize;
use doughplan_core::numbers::round_f64_to_u32;
use doughplan_core::{ConfigSnapshot, DerivedSession, Resolution};
use serde::Serialize;
use std::io::Write;

/// JSON envelope echoing what was asked for next to what was resolved.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub method_id: &'a str,
    pub preset_id: Option<&'a str>,
    #[serde(flatten)]
    pub resolution: &'a Resolution,
}

pub fn generate_json_report(out: &mut dyn Write, report: &JsonReport<'_>) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

fn mass_rows(derived: &DerivedSession) -> Vec<(&'static str, f64, f64)> {
    let mix = &derived.final_mix;
    vec![
        ("Flour", derived.total_flour_g, mix.flour_g),
        ("Water", derived.total_water_g, mix.water_g),
        ("Salt", derived.total_salt_g, mix.salt_g),
        ("Oil", derived.total_oil_g, mix.oil_g),
        ("Honey", derived.total_honey_g, mix.honey_g),
        ("Diastatic malt", derived.total_malt_g, mix.malt_g),
        ("Sugar", derived.total_sugar_g, mix.sugar_g),
        ("Yeast", derived.total_yeast_g, mix.yeast_g),
    ]
}

fn sizing_line(resolution: &Resolution) -> String {
    let session = &resolution.resolved_session;
    let count = round_f64_to_u32(session.number("target_pizza_count"));
    let unit = session.number("dough_unit_weight_g");
    let total = resolution.derived_session.target_total_dough_g;
    if count > 0 && unit > 0.0 {
        format!("{count} x {unit} g = {total} g")
    } else {
        format!("{total} g")
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    method_name: &str,
    resolution: &Resolution,
) -> Result<()> {
    let derived = &resolution.derived_session;
    writeln!(out, "{}", format!("🍕 {method_name}").bright_cyan().bold())?;
    writeln!(out, "{}", "=".repeat(32).cyan())?;
    writeln!(out, "Dough: {}", sizing_line(resolution))?;
    writeln!(out, "Total percent: {}%", derived.total_percent)?;
    writeln!(out)?;

    writeln!(out, "{:<16} {:>10} {:>12}", "Ingredient".bold(), "Total g", "Final mix g")?;
    for (name, total, final_mix) in mass_rows(derived) {
        writeln!(out, "{name:<16} {total:>10} {final_mix:>12}")?;
    }

    if let Some(preferment) = &derived.preferment {
        writeln!(out)?;
        writeln!(out, "{}", format!("Preferment ({:?})", preferment.kind).yellow())?;
        writeln!(
            out,
            "  flour {} g, water {} g, yeast {} g",
            preferment.flour_g, preferment.water_g, preferment.yeast_g
        )?;
        if let Some(parts) = preferment.components {
            writeln!(
                out,
                "  poolish {} g flour / {} g water, biga {} g flour / {} g water",
                parts.poolish_flour_g, parts.poolish_water_g, parts.biga_flour_g, parts.biga_water_g
            )?;
        }
    }
    if let Some(starter) = &derived.starter {
        writeln!(out)?;
        writeln!(out, "{}", "Starter".yellow())?;
        writeln!(out, "  flour {} g, water {} g", starter.flour_g, starter.water_g)?;
    }

    if !derived.batches.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            format!("Batches (max {} g)", derived.max_batch_dough_g).yellow()
        )?;
        for batch in &derived.batches {
            writeln!(out, "  #{:<3} {} g", batch.batch_index, batch.dough_mass_g)?;
        }
    }

    if resolution.has_warnings() {
        writeln!(out)?;
        writeln!(out, "{}", "⚠️  Warnings".bright_yellow().bold())?;
        for warning in &resolution.warnings {
            writeln!(out, "  • {}", warning.yellow())?;
        }
    }
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    method_name: &str,
    resolution: &Resolution,
) -> Result<()> {
    let derived = &resolution.derived_session;
    writeln!(out, "# {method_name}\n")?;
    writeln!(out, "- **Dough**: {}", sizing_line(resolution))?;
    writeln!(out, "- **Total percent**: {}%\n", derived.total_percent)?;

    writeln!(out, "| Ingredient | Total g | Final mix g |")?;
    writeln!(out, "|---|---:|---:|")?;
    for (name, total, final_mix) in mass_rows(derived) {
        writeln!(out, "| {name} | {total} | {final_mix} |")?;
    }

    if !derived.batches.is_empty() {
        writeln!(out, "\n## Batches\n")?;
        for batch in &derived.batches {
            writeln!(out, "{}. {} g", batch.batch_index, batch.dough_mass_g)?;
        }
    }

    if resolution.has_warnings() {
        writeln!(out, "\n## Warnings\n")?;
        for warning in &resolution.warnings {
            writeln!(out, "- {warning}")?;
        }
    }
    Ok(())
}

pub fn write_catalog_listing(out: &mut dyn Write, snapshot: &ConfigSnapshot) -> Result<()> {
    writeln!(out, "Available methods:")?;
    for method in &snapshot.methods {
        writeln!(out, "  {:25} - {}", method.id, method.name)?;
    }
    writeln!(out, "Available presets:")?;
    for preset in &snapshot.presets {
        writeln!(out, "  {:25} - {}", preset.id, preset.name)?;
    }
    Ok(())
}
