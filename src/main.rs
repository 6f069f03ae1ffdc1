use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use fengshui_art::app::App;
use fengshui_art::models::Birthdate;
use fengshui_art::Error;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "fengshui-art")]
#[command(about = "Generate Feng Shui artwork recommendations from a birthdate")]
struct CliArgs {
    /// Birth date in YYYY-MM-DD format.
    #[arg(value_name = "DATE", value_parser = parse_date_arg)]
    birth_date: NaiveDate,

    /// Hour of birth (0-23).
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: u32,

    /// Also write the JSON report to this file.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn parse_date_arg(input: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Expected format: YYYY-MM-DD", input))
}

fn birthdate_from(date: NaiveDate, hour: u32) -> Birthdate {
    Birthdate::new(date.year(), date.month(), date.day(), hour)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fengshui_art=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting fengshui-art");

    let args = CliArgs::parse();
    let birthdate = birthdate_from(args.birth_date, args.hour);

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match app.run(birthdate).await {
        Ok(report) => {
            let json = serde_json::to_string_pretty(&report)?;
            if let Some(path) = &args.output {
                std::fs::write(path, &json)?;
                info!("Saved report at: {}", path.display());
            }
            println!("{}", json);
            info!("Generation completed successfully");
            Ok(())
        }
        Err(e) => {
            match &e {
                Error::UserFacing { source, .. } => error!("Generation failed: {}", source),
                other => error!("Generation failed: {}", other),
            }
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_arg_valid() {
        let parsed = parse_date_arg("1990-05-15").unwrap();
        assert_eq!(parsed.to_string(), "1990-05-15");
    }

    #[test]
    fn test_parse_date_arg_invalid() {
        let err = parse_date_arg("05/15/1990").unwrap_err();
        assert!(err.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_cli_builds_birthdate() {
        let args = CliArgs::try_parse_from(["fengshui-art", "1990-05-15", "--hour", "8"]).unwrap();
        assert_eq!(
            birthdate_from(args.birth_date, args.hour),
            Birthdate::new(1990, 5, 15, 8)
        );
        assert!(args.output.is_none());
    }

    #[test]
    fn test_cli_rejects_hour_out_of_range() {
        assert!(CliArgs::try_parse_from(["fengshui-art", "1990-05-15", "--hour", "24"]).is_err());
    }
}
