//! Subcommand handlers.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use gridwalk_lib::{load_map, plan_search, render_overlay, Formula, SearchSummary};

use crate::args::{CheckArgs, OutputFormat, SearchArgs};

/// Handle the `search` subcommand.
///
/// Loads the map, plans the search and renders the summary. With
/// `--show-path` the text output also carries an overlay of the path.
pub fn handle_search(args: &SearchArgs, format: OutputFormat) -> Result<String> {
    let grid = load_map(&args.map)
        .with_context(|| format!("failed to load map from {}", args.map.display()))?;
    debug!(
        map = %args.map.display(),
        height = grid.height(),
        width = grid.width(),
        "loaded map"
    );
    let request = args.to_request();
    let plan = plan_search(&grid, &request).with_context(|| {
        format!(
            "failed to search from {} to {}",
            request.start, request.goal
        )
    })?;

    let mut summary = SearchSummary::from_plan(&plan);
    if !args.show_path {
        summary = summary.without_path();
    }
    let mut rendered = summary
        .render(format.render_mode())
        .context("failed to render search summary")?;

    if args.show_path && format == OutputFormat::Text && plan.solved() {
        rendered.push('\n');
        rendered.push_str(&render_overlay(&grid, &plan.path));
    }
    Ok(rendered)
}

/// Result of compiling and evaluating a formula.
#[derive(Debug, Serialize)]
struct FormulaReport<'a> {
    formula: &'a str,
    compiled: String,
    degenerate: bool,
    g: u64,
    h: u64,
    value: f64,
}

/// Handle the `check` subcommand.
///
/// Compiles the formula and evaluates it once at the given `G` and `H`.
pub fn handle_check(args: &CheckArgs, format: OutputFormat) -> Result<String> {
    let formula = Formula::parse_with_mode(&args.formula, args.mode())
        .with_context(|| format!("invalid formula '{}'", args.formula))?;
    let report = FormulaReport {
        formula: formula.source(),
        compiled: formula.to_string(),
        degenerate: formula.is_degenerate(),
        g: args.g,
        h: args.h,
        value: formula.evaluate(args.g, args.h),
    };

    match format {
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(&report)?;
            rendered.push('\n');
            Ok(rendered)
        }
        OutputFormat::Text => {
            let mut rendered = format!(
                "Formula {} compiles to {}\n  value at G={}, H={}: {}\n",
                report.formula, report.compiled, report.g, report.h, report.value
            );
            if report.degenerate {
                rendered.push_str("  degenerate: yes (every priority it feeds is f64::MAX)\n");
            }
            Ok(rendered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_args(formula: &str) -> CheckArgs {
        CheckArgs {
            formula: formula.to_string(),
            lenient: false,
            g: 3,
            h: 4,
        }
    }

    #[test]
    fn check_reports_compiled_form_and_value() {
        let output = handle_check(&check_args("G+2*H"), OutputFormat::Text).expect("valid");
        assert!(output.contains("compiles to (G+(2*H))"));
        assert!(output.contains("value at G=3, H=4: 11"));
        assert!(!output.contains("degenerate"));
    }

    #[test]
    fn check_rejects_malformed_formula_in_strict_mode() {
        let err = handle_check(&check_args("G+"), OutputFormat::Text).expect_err("malformed");
        assert!(format!("{err:#}").contains("formula parse error at position 2"));
    }

    #[test]
    fn lenient_check_flags_degenerate_formula() {
        let mut args = check_args("G+");
        args.lenient = true;
        let output = handle_check(&args, OutputFormat::Json).expect("lenient");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["degenerate"], true);
        assert_eq!(value["compiled"], "?");
    }
}
