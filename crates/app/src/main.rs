use std::path::PathBuf;

use api_types::group::GroupSnapshot;
use clap::{Args, Parser, Subcommand};

use error::Result;
use settings::Settings;

mod error;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "splitnow")]
#[command(about = "Pairwise balances for shared-expense groups")]
struct Cli {
    /// Settings file (TOML); `settings.toml` in the working directory if omitted.
    #[arg(long, env = "SPLITNOW_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the balance endpoints over HTTP (default).
    Serve,
    /// Compute balances for a snapshot file and print them as JSON.
    Report(Report),
}

#[derive(Args, Debug)]
struct Report {
    /// Group snapshot JSON (`members`, `expenses`, `settlements`).
    #[arg(long)]
    snapshot: PathBuf,
    /// Print the balance card of a single member.
    #[arg(long, conflicts_with = "reminders")]
    member: Option<String>,
    /// Print the payment-reminder digest.
    #[arg(long)]
    reminders: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "splitnow={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if settings.server.is_none() {
                tracing::info!("No server settings, using defaults");
            }
            server::run(settings.server_addr()).await?;
        }
        Command::Report(report) => print_report(&report)?,
    }

    Ok(())
}

fn print_report(report: &Report) -> Result<()> {
    let raw = std::fs::read_to_string(&report.snapshot)?;
    let snapshot: GroupSnapshot = serde_json::from_str(&raw)?;
    tracing::debug!(
        members = snapshot.members.len(),
        expenses = snapshot.expenses.len(),
        settlements = snapshot.settlements.len(),
        "loaded snapshot {}",
        report.snapshot.display()
    );

    let output = if let Some(member) = &report.member {
        serde_json::to_string_pretty(&server::compute_member_balance(snapshot, member)?)?
    } else if report.reminders {
        serde_json::to_string_pretty(&server::compute_reminders(snapshot)?)?
    } else {
        serde_json::to_string_pretty(&server::compute_group_balances(snapshot)?)?
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["splitnow"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn report_takes_a_snapshot() {
        let cli = Cli::try_parse_from([
            "splitnow",
            "--config",
            "local.toml",
            "report",
            "--snapshot",
            "group.json",
            "--member",
            "u1",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("local.toml"));
        let Some(Command::Report(report)) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(report.snapshot, PathBuf::from("group.json"));
        assert_eq!(report.member.as_deref(), Some("u1"));
        assert!(!report.reminders);
    }

    #[test]
    fn member_and_reminders_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "splitnow",
            "report",
            "--snapshot",
            "group.json",
            "--member",
            "u1",
            "--reminders",
        ]);
        assert!(parsed.is_err());
    }
}
