//! Doctor command - verify configuration and API access.

use crate::cli::Output;
use crate::config::Settings;
use crate::gemini;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Skriv Doctor");
    println!();
    println!("Checking configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_api_key();
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Directories").bold());
    let dir_checks = check_directories(settings);
    for check in &dir_checks {
        check.print();
    }
    checks.extend(dir_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    println!("{}", style("Models").bold());
    Output::kv("text", &settings.provider.text_model);
    Output::kv("fast", &settings.provider.fast_model);
    Output::kv("image", &settings.provider.image_model);
    Output::kv("speech", &settings.provider.tts_model);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Skriv.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Skriv is ready to use.");
    }

    Ok(())
}

/// Check if the provider API key is configured.
fn check_api_key() -> CheckResult {
    match std::env::var(gemini::API_KEY_ENV) {
        Ok(key) if key.len() > 12 => {
            let masked = format!("{}...{}", &key[..4], &key[key.len() - 4..]);
            CheckResult::ok(gemini::API_KEY_ENV, &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            gemini::API_KEY_ENV,
            "empty",
            &format!("Set with: export {}='...'", gemini::API_KEY_ENV),
        ),
        Ok(_) => CheckResult::warning(
            gemini::API_KEY_ENV,
            "set but unusually short",
            "Double-check the key value",
        ),
        Err(_) => CheckResult::error(
            gemini::API_KEY_ENV,
            "not set",
            &format!("Set with: export {}='...'", gemini::API_KEY_ENV),
        ),
    }
}

/// Check data and output directories.
fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let data_dir = settings.data_dir();
    if data_dir.exists() {
        results.push(CheckResult::ok(
            "Data directory",
            &format!("{}", data_dir.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Data directory",
            &format!("{} (will be created)", data_dir.display()),
            "Directory will be created on first use",
        ));
    }

    let output_dir = settings.output_dir();
    if output_dir.exists() {
        results.push(CheckResult::ok(
            "Output directory",
            &format!("{}", output_dir.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Output directory",
            &format!("{} (will be created)", output_dir.display()),
            "Archives are written here",
        ));
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: skriv init (or skriv config edit)",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }
}
