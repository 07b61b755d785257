//! Human-readable and JSON renderings of a fit.

use crate::domain::CurveParams;
use crate::error::AppError;
use crate::report::FitReport;

/// The fitted curve as a LaTeX-style parametric pair, ready to paste into a
/// graphing tool. `θ` is substituted in radians.
pub fn latex_expression(params: &CurveParams) -> String {
    let r = params.theta_rad();
    let m = params.m;
    let x = params.x_offset;
    format!(
        "\\left(t*\\cos({r:.6})\
         -e^{{{m:.6}\\left|t\\right|}}\\cdot\\sin(0.3t)\\sin({r:.6})\
         \\ +{x:.6},\
         42+\\ t*\\sin({r:.6})\
         +e^{{{m:.6}\\left|t\\right|}}\\cdot\\sin(0.3t)\\cos({r:.6})\\right)"
    )
}

/// Format the full text report.
pub fn format_report(report: &FitReport) -> String {
    let mut out = String::new();
    let p = &report.first_point;
    let fit = &report.fit;
    let n = fit.n_samples;

    out.push_str("=== spiral-fit - L1 curve fit ===\n");
    out.push_str(&format!(
        "Search: {} after {} generations, {} evaluations{}\n",
        fit.message,
        fit.generations,
        fit.evaluations,
        if fit.polished { " (polished)" } else { "" }
    ));

    out.push_str("\nFirst point:\n");
    out.push_str(&format!("- observed : ({:.4}, {:.4})\n", p.observed.0, p.observed.1));
    out.push_str(&format!("- predicted: ({:.4}, {:.4})\n", p.predicted.0, p.predicted.1));
    out.push_str(&format!("- L1 difference: {:.4}\n", p.l1));

    out.push_str(&format!(
        "\nAverage L1 difference per point across all {n} points: {:.4}\n",
        report.average_l1
    ));
    out.push_str(&format!(
        "Total L1 loss ({n} * {:.4}) is approx {:.4}\n",
        report.average_l1, fit.loss
    ));

    out.push_str("\nFitted parameters:\n");
    out.push_str(&format!("- theta: {:.6} degrees\n", fit.params.theta_deg));
    out.push_str(&format!("- M    : {:.6}\n", fit.params.m));
    out.push_str(&format!("- X    : {:.6}\n", fit.params.x_offset));
    out.push_str(&format!("Minimum total L1 loss: {:.4}\n", fit.loss));

    out.push_str("\nExpression:\n");
    out.push_str(&report.expression);
    out.push('\n');

    out
}

/// Format the report as pretty-printed JSON.
pub fn format_report_json(report: &FitReport) -> Result<String, AppError> {
    serde_json::to_string_pretty(report).map_err(|e| AppError::new(4, format!("Failed to encode report JSON: {e}")))
}
