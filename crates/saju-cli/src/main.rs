//! Saju CLI - Four pillars fortune analysis from the terminal
//!
//! Talks to a running saju-server over its JSON API.

mod api;
mod config;
mod view;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use uuid::Uuid;

use api::SajuClient;
use config::Config;
use saju::{CalendarType, Gender, Provider};
use view::{FortuneForm, ViewState};

#[derive(Parser)]
#[command(name = "saju")]
#[command(about = "Saju CLI - 사주 팔자 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// Log HTTP activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with Kakao and store the access token
    Login {
        /// Access token (will prompt if not provided)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Forget the stored access token
    Logout,

    /// Analyze a birth date
    Fortune {
        /// Birth year (prompts for all fields when omitted)
        year: Option<String>,
        month: Option<String>,
        day: Option<String>,
        /// Birth time as HH:MM
        #[arg(short, long)]
        time: Option<String>,
        /// male or female
        #[arg(short, long, default_value = "male")]
        gender: Gender,
        /// Date is on the lunar calendar
        #[arg(long)]
        lunar: bool,
        /// Lunar date falls in a leap month
        #[arg(long, requires = "lunar")]
        leap: bool,
        /// openai or anthropic
        #[arg(short, long)]
        provider: Option<Provider>,
        /// Single free-text call instead of the full report
        #[arg(long)]
        simple: bool,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// List past analyses, or show one by id
    History {
        id: Option<Uuid>,
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Show or change configuration
    Config {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        provider: Option<Provider>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "saju=debug".into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Login { token } => cmd_login(token).await,
        Commands::Logout => cmd_logout(),
        Commands::Fortune {
            year,
            month,
            day,
            time,
            gender,
            lunar,
            leap,
            provider,
            simple,
            json,
        } => {
            let form = FortuneForm {
                year,
                month,
                day,
                time,
                gender,
                calendar_type: if lunar {
                    CalendarType::Lunar
                } else {
                    CalendarType::Solar
                },
                is_leap_month: leap,
                provider,
                simple,
            };
            cmd_fortune(form, json).await
        }
        Commands::History { id, limit } => cmd_history(id, limit).await,
        Commands::Config { base_url, provider } => cmd_config(base_url, provider).await,
    }
}

// ============================================
// Command Implementations
// ============================================

fn client(config: &Config) -> SajuClient {
    SajuClient::new(&config.base_url, config.access_token.as_deref())
}

async fn cmd_login(token: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let token = match token {
        Some(t) => t,
        None => {
            let url = client(&config).login_url();
            println!("Open this URL and log in with Kakao:");
            println!("  {}", url.cyan());
            println!(
                "{}",
                "Then copy access_token from the address bar of the page you land on.".dimmed()
            );
            Password::new()
                .with_prompt("Access token")
                .interact()
                .context("Failed to read access token")?
        }
    };

    print!("Verifying token... ");
    let me = match SajuClient::new(&config.base_url, Some(&token)).me().await {
        Ok(me) if !me.anonymous => {
            println!("{}", "OK".green());
            me
        }
        Ok(_) => {
            println!("{}", "Skipped".yellow());
            bail!("Login is not enabled on {}", config.base_url);
        }
        Err(e) => {
            println!("{}", "Failed".red());
            return Err(e.context("Could not verify the access token"));
        }
    };

    config.set_access_token(token);
    config.save()?;

    println!(
        "{} Logged in as {} (saved to {:?})",
        "✓".green(),
        me.display_name.cyan(),
        Config::config_path()?
    );
    Ok(())
}

fn cmd_logout() -> Result<()> {
    let mut config = Config::load()?;
    if config.clear_access_token() {
        config.save()?;
        println!("{} Logged out", "✓".green());
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

fn prompt_field(label: &str, current: Option<String>, required: bool) -> Result<Option<String>> {
    if current.is_some() {
        return Ok(current);
    }
    let value: String = Input::new()
        .with_prompt(label)
        .allow_empty(!required)
        .interact_text()
        .with_context(|| format!("Failed to read {}", label))?;
    Ok(Some(value).filter(|v| !v.trim().is_empty()))
}

async fn cmd_fortune(mut form: FortuneForm, json: bool) -> Result<()> {
    let config = Config::load()?;

    if form.year.is_none() && form.month.is_none() && form.day.is_none() {
        form.year = prompt_field("출생 년", None, true)?;
        form.month = prompt_field("출생 월", None, true)?;
        form.day = prompt_field("출생 일", None, true)?;
        form.time = prompt_field("출생 시간 (HH:MM, 모르면 비워두세요)", form.time, false)?;
    }
    if form.provider.is_none() {
        form.provider = config.provider;
    }

    let mut state = ViewState::default();

    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(e) => {
            state.reject(e);
            bail!(state.render());
        }
    };

    if !state.begin() {
        bail!("A request is already in progress");
    }
    eprintln!("{}", state.render());

    let client = client(&config);
    if json {
        return match state.finish_json(client.fortune_raw(&submission).await) {
            Some(pretty) => {
                println!("{}", pretty);
                Ok(())
            }
            None => bail!(state.render()),
        };
    }

    state.finish(client.fortune(&submission).await);
    match state {
        ViewState::Error(_) => bail!(state.render()),
        _ => println!("{}", state.render()),
    }
    Ok(())
}

async fn cmd_history(id: Option<Uuid>, limit: i64) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    match id {
        Some(id) => {
            let detail = client.history_detail(id).await?;
            println!(
                "{} {}",
                detail.item.summary.bold(),
                detail.item.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
            );
            match serde_json::from_value::<api::FortuneOutcome>(detail.result.clone()) {
                Ok(outcome) => println!("\n{}", view::render_outcome(&outcome)),
                Err(_) => println!("\n{}", serde_json::to_string_pretty(&detail.result)?),
            }
        }
        None => {
            let items = client.history(limit).await?;
            if items.is_empty() {
                println!("No history yet.");
                println!("\n{}", "Run an analysis with:".dimmed());
                println!("  saju fortune 1990 5 15 --time 14:30");
                return Ok(());
            }

            println!("{}", "History:".bold());
            for item in items {
                println!(
                    "  {} {} {} {}",
                    item.id.to_string().dimmed(),
                    item.created_at.format("%Y-%m-%d %H:%M"),
                    truncate_string(&item.summary, 40).cyan(),
                    item.provider.dimmed()
                );
            }
        }
    }
    Ok(())
}

async fn cmd_config(base_url: Option<String>, provider: Option<Provider>) -> Result<()> {
    let mut config = Config::load()?;

    if base_url.is_some() || provider.is_some() {
        if let Some(url) = base_url {
            config.set_base_url(&url);
        }
        if provider.is_some() {
            config.provider = provider;
        }
        config.save()?;
        println!("{} Configuration saved", "✓".green());
    }

    println!("{}", "Configuration:".bold());
    println!("  Config file: {:?}", Config::config_path()?);
    println!("  Base URL:    {}", config.base_url);
    println!(
        "  Logged in:   {}",
        if config.access_token.is_some() {
            "Yes".green()
        } else {
            "No".yellow()
        }
    );
    let reachable = client(&config).health().await.unwrap_or(false);
    println!(
        "  Server:      {}",
        if reachable {
            "Reachable".green()
        } else {
            "Unreachable".red()
        }
    );
    println!(
        "  Provider:    {}",
        config
            .provider
            .map(|p| p.to_string())
            .unwrap_or_else(|| "server default".to_string())
    );
    Ok(())
}

/// Truncate to `max_len` characters, adding "..." when cut
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_fortune() {
        let cli = Cli::try_parse_from([
            "saju", "fortune", "1990", "5", "15", "--time", "14:30", "--gender", "여성", "--lunar",
            "--leap", "--provider", "claude",
        ])
        .unwrap();
        match cli.command {
            Commands::Fortune {
                year,
                gender,
                lunar,
                leap,
                provider,
                simple,
                ..
            } => {
                assert_eq!(year.as_deref(), Some("1990"));
                assert_eq!(gender, Gender::Female);
                assert!(lunar && leap && !simple);
                assert_eq!(provider, Some(Provider::Anthropic));
            }
            _ => panic!("expected fortune"),
        }
    }

    #[test]
    fn test_leap_requires_lunar() {
        assert!(Cli::try_parse_from(["saju", "fortune", "1990", "5", "15", "--leap"]).is_err());
    }

    #[test]
    fn test_history_defaults() {
        let cli = Cli::try_parse_from(["saju", "-v", "history"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::History { id: None, limit: 20 }));
    }

    #[test]
    fn test_truncate_string_counts_chars() {
        assert_eq!(truncate_string("짧음", 10), "짧음");
        assert_eq!(truncate_string("1990-5-15 남성 양력 분석", 8), "1990-...");
    }
}
