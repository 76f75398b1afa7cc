//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use crate::gemini;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Skriv Setup");
    println!();
    println!("Welcome to Skriv! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API key
    println!("{}", style("Step 1: Checking API configuration").bold().cyan());
    println!();

    if !gemini::is_api_key_configured() {
        Output::warning(&format!(
            "{} environment variable is not set.",
            gemini::API_KEY_ENV
        ));
        println!();
        println!("  Skriv requires a Gemini API key for all generation stages.");
        println!(
            "  Get your API key from: {}",
            style("https://aistudio.google.com/apikey").underlined()
        );
        println!();
        println!("  Set it in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        println!("  {}", style(format!("export {}='...'", gemini::API_KEY_ENV)).green());
        println!();

        if !prompt_continue("Continue without API key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'skriv init' again.");
            return Ok(());
        }
    } else {
        Output::success("Gemini API key is configured!");
    }

    println!();

    // Step 2: Create directories
    println!("{}", style("Step 2: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    let output_dir = settings.output_dir();

    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)?;
        Output::success(&format!("Created output directory: {}", output_dir.display()));
    } else {
        Output::info(&format!("Output directory exists: {}", output_dir.display()));
    }

    println!();

    // Step 3: Create config file
    println!("{}", style("Step 3: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("skriv config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("skriv doctor").cyan());
    println!(
        "  {} Produce your first package",
        style("skriv produce \"<your source content>\"").cyan()
    );
    println!(
        "  {} Try the pipeline without an API key",
        style("skriv produce --offline \"<your source content>\"").cyan()
    );
    println!();
    println!("For more help: {}", style("skriv --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
