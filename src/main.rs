use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mercury_rs::logging::init_logger_with_default;
use mercury_rs::{
    connect_with_config, Config, HistoryRecord, Mode, SerialConfig,
};
use serde::Serialize;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mercury-cli")]
#[command(about = "CLI tool for Mercury electricity meters")]
struct Cli {
    /// Serial device the bus is attached to
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    port: String,

    #[arg(short, long, default_value = "38400")]
    baudrate: u32,

    /// Per-read/write timeout in seconds
    #[arg(short, long, default_value = "8")]
    timeout: u64,

    /// Meter address (hex with 0x prefix or decimal); 0x2fff discovers it
    #[arg(short, long, default_value = "0x2fff", value_parser = parse_u16)]
    address: u16,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    NetworkId,
    GetConfig,
    SetConfig {
        #[arg(long)]
        counters: u16,
        #[arg(long, default_value = "Normal")]
        mode: Mode,
        #[arg(long)]
        transparent_mode: bool,
        #[arg(long)]
        zero_threshold: bool,
        #[arg(long)]
        dst: bool,
        #[arg(long)]
        plc_disabled: bool,
    },
    LastPacket {
        #[arg(value_parser = parse_u16)]
        counter: u16,
    },
    History {
        #[arg(value_parser = parse_u16)]
        counter: u16,
    },
}

fn parse_u16(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid 16-bit value '{s}': {e}"))
}

fn print<T: Serialize + std::fmt::Debug>(json: bool, value: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value:#?}");
    }
    Ok(())
}

fn print_records(json: bool, records: &[HistoryRecord]) -> Result<()> {
    if json {
        return print(true, &records);
    }
    for record in records {
        let date = record
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "invalid date".into());
        let value = record
            .value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "corrupted".into());
        println!("{date}  type={} level={} value={value}", record.kind, record.level);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger_with_default("info");

    let cli = Cli::parse();
    let config = SerialConfig {
        baudrate: cli.baudrate,
        timeout: Duration::from_secs(cli.timeout),
    };
    let mut session = connect_with_config(&cli.port, cli.address, config);

    let outcome = match cli.command {
        Commands::NetworkId => {
            let id = session.get_network_id().await.context("reading network id")?;
            print(cli.json, &id)
        }
        Commands::GetConfig => {
            let config = session.get_config().await.context("reading config")?;
            print(cli.json, &config)
        }
        Commands::SetConfig {
            counters,
            mode,
            transparent_mode,
            zero_threshold,
            dst,
            plc_disabled,
        } => {
            let config = Config {
                counters,
                transparent_mode,
                zero_threshold,
                mode,
                dst,
                plc_disabled,
            };
            let ack = session.set_config(config).await.context("writing config")?;
            print(cli.json, &ack)
        }
        Commands::LastPacket { counter } => {
            let packet = session
                .get_last_packet(counter)
                .await
                .with_context(|| format!("reading last packet of counter {counter}"))?;
            print(cli.json, &packet)
        }
        Commands::History { counter } => {
            let records = session
                .get_history(counter)
                .await
                .with_context(|| format!("reading history of counter {counter}"))?;
            print_records(cli.json, &records)
        }
    };

    session.close().await;
    outcome
}
