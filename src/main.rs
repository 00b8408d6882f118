//! `ble-uart` - interactive UART-over-BLE console for paired devices.
//!
//! Lists the host's paired Bluetooth devices and, given an alias, opens
//! a GATT connection to that device and runs a line-oriented session
//! over the Nordic UART Service.

mod bluetooth;
mod error;
mod input;
mod logging;

use anyhow::{Context, Result};
use bluetooth::{find_by_alias, list_paired_devices, run_interactive_session, BluerTransport};
use clap::Parser;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "ble-uart", version, about = "Interactive UART-over-BLE console")]
struct Cli {
    /// Alias of the paired device to open a session with
    #[arg(long, value_name = "ALIAS")]
    robot_name: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // The bus handle is scoped to discovery; the session controller
    // gets its own transport built on the same adapter.
    let session = bluer::Session::new()
        .await
        .context("failed to connect to the bluetooth daemon")?;
    let adapter = session
        .default_adapter()
        .await
        .context("no bluetooth adapter available")?;

    let devices = list_paired_devices(&adapter)
        .await
        .context("failed to enumerate paired devices")?;

    println!("Paired devices:");
    for device in &devices {
        println!(" - {} [{}]", device.alias, device.address);
    }

    let Some(robot_name) = cli.robot_name else {
        return Ok(ExitCode::SUCCESS);
    };

    let Some(device) = find_by_alias(&devices, &robot_name) else {
        println!("No paired device with alias '{robot_name}' found.");
        return Ok(ExitCode::FAILURE);
    };
    println!("Found '{}' at {}", device.alias, device.address);

    let transport = BluerTransport::new(adapter);
    if let Err(e) = run_interactive_session(&transport, &device.address, input::spawn_stdin_reader).await
    {
        // A failed connect ends the session, not the program.
        error!("BLE connection error: {e}");
    }

    Ok(ExitCode::SUCCESS)
}
