//! CLI implementation for `packmule doctor` command
//!
//! Checks host toolchain and project setup, reporting issues with
//! suggestions.

use anyhow::Result;
use std::path::Path;

use crate::cli::output::{
    is_json, is_quiet, print_detail, print_info, print_success, print_warning, status,
};
use crate::core::doctor::{run_doctor, CheckResult, DoctorReport};
use crate::core::manifest::Manifest;

/// Execute the doctor command
pub async fn execute(project_dir: Option<&Path>) -> Result<()> {
    // A manifest that fails to load still produces config issues in the
    // report, so a load failure here falls back to toolchain-only checks.
    let manifest = project_dir
        .filter(|dir| dir.join("packmule.toml").exists())
        .and_then(|dir| Manifest::load(&dir.join("packmule.toml")).ok());

    let report = run_doctor(project_dir, manifest.as_ref());

    if is_json() {
        return render_json(&report);
    }
    if is_quiet() {
        return render_quiet(&report);
    }
    render_human(&report)
}

fn check_to_json(check: &CheckResult) -> serde_json::Value {
    serde_json::json!({
        "name": check.name,
        "passed": check.passed,
        "required": check.required,
        "version": check.version,
        "error": check.error,
        "suggestion": check.suggestion,
    })
}

fn render_json(report: &DoctorReport) -> Result<()> {
    let status = if report.all_passed() {
        "success"
    } else if report.failed_required().is_empty() {
        "warning"
    } else {
        "error"
    };

    let document = serde_json::json!({
        "status": status,
        "checks": report.checks.iter().map(check_to_json).collect::<Vec<_>>(),
        "config_issues": report.config_issues,
        "passed_count": report.passed_count(),
        "total_count": report.checks.len(),
    });
    println!("{}", serde_json::to_string_pretty(&document)?);

    if report.failed_required().is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Missing required dependencies"))
    }
}

/// Quiet mode reports only missing required dependencies
fn render_quiet(report: &DoctorReport) -> Result<()> {
    let failed_required = report.failed_required();
    if failed_required.is_empty() {
        return Ok(());
    }
    for check in failed_required {
        eprintln!("{} Missing required: {}", status::ERROR, check.name);
    }
    Err(anyhow::anyhow!("Missing required dependencies"))
}

fn render_human(report: &DoctorReport) -> Result<()> {
    print_info("Checking toolchain and project setup...");
    println!();

    for check in &report.checks {
        render_check_line(check);
    }

    if !report.config_issues.is_empty() {
        println!();
        print_warning("Configuration issues:");
        for issue in &report.config_issues {
            print_detail(&format!("• {issue}"));
        }
    }

    println!();
    render_summary(report)
}

fn render_check_line(check: &CheckResult) {
    let required_str = if check.required { "" } else { " [optional]" };

    if check.passed {
        let version_str = check
            .version
            .as_ref()
            .map(|v| format!(" (v{v})"))
            .unwrap_or_default();
        println!(
            "  {} {}{version_str}{required_str}",
            status::SUCCESS,
            check.name
        );
        return;
    }

    println!("  {} {}{required_str}", status::ERROR, check.name);
    if let Some(error) = &check.error {
        print_detail(&format!("Error: {error}"));
    }
    if let Some(suggestion) = &check.suggestion {
        print_detail(&format!("Suggestion: {suggestion}"));
    }
}

fn render_summary(report: &DoctorReport) -> Result<()> {
    let passed = report.passed_count();
    let total = report.checks.len();
    let failed_required = report.failed_required();

    if report.all_passed() {
        print_success(&format!("All checks passed ({passed}/{total})"));
        print_detail("Ready to provision and bundle!");
        return Ok(());
    }

    if failed_required.is_empty() {
        print_warning(&format!(
            "{passed}/{total} checks passed (optional checks failed)"
        ));
        print_detail("Ready for basic packmule usage.");
        return Ok(());
    }

    println!("{} {passed}/{total} checks passed", status::ERROR);
    print_detail("Please install missing required dependencies:");
    for check in &failed_required {
        if let Some(suggestion) = &check.suggestion {
            print_detail(&format!("• {}: {suggestion}", check.name));
        }
    }
    Err(anyhow::anyhow!(
        "Missing required dependencies. Run 'packmule doctor' for details."
    ))
}
