mod settings;

use anyhow::{bail, Result};
use clap::Parser;
use settings::Settings;
use tacwave_core::{LinkConfig, LinkEvent, PortInfo, SerialLink};
use tacwave_decode::{Frame, FrameSplitter};

const DEFAULT_BAUD: u32 = 115_200;
const DEFAULT_ADDRESS: u8 = 23;

/// Read tactile sensor frames from a serial port and print decoded readings.
#[derive(Debug, Parser)]
#[command(name = "tacwave", version)]
struct Args {
    /// Serial port to open; omit to list available ports
    port: Option<String>,

    /// Baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// Sensor address to print; frames from other sensors are skipped
    #[arg(long)]
    address: Option<u8>,

    /// Persist the resolved port, baud and address for later runs
    #[arg(long)]
    save: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let (port, baud, address) = resolve(&args, &settings::load());

    let Some(port_name) = port else {
        print_ports();
        return Ok(());
    };

    if args.save {
        settings::save(&Settings {
            port: Some(port_name.clone()),
            baud: Some(baud),
            address: Some(address),
        })?;
        log::info!("settings saved");
    }

    let cfg = LinkConfig {
        port_name,
        baud_rate: baud,
        ..Default::default()
    };
    let link = SerialLink::open(cfg)?;
    run(&link, address)
}

/// CLI flags override the settings file, which overrides built-in defaults.
fn resolve(args: &Args, stored: &Settings) -> (Option<String>, u32, u8) {
    let port = args.port.clone().or_else(|| stored.port.clone());
    let baud = args.baud.or(stored.baud).unwrap_or(DEFAULT_BAUD);
    let address = args.address.or(stored.address).unwrap_or(DEFAULT_ADDRESS);
    (port, baud, address)
}

fn print_ports() {
    let ports = SerialLink::list_ports();
    if ports.is_empty() {
        println!("No serial ports found.");
        return;
    }
    println!("Available ports:");
    for port in ports {
        println!("  {}", describe_port(&port));
    }
}

fn describe_port(port: &PortInfo) -> String {
    let mut line = format!("{} ({}", port.port_name, port.port_type);
    if let (Some(vid), Some(pid)) = (port.vid, port.pid) {
        line.push_str(&format!(" {vid:04x}:{pid:04x}"));
    }
    for field in [&port.manufacturer, &port.product, &port.serial_number] {
        if let Some(value) = field {
            line.push_str(&format!(" {value}"));
        }
    }
    line.push(')');
    line
}

/// Consumes link events until the port closes, printing every frame that
/// matches the target address. Malformed frames are logged and skipped.
fn run(link: &SerialLink, target: u8) -> Result<()> {
    let mut splitter = FrameSplitter::new();
    for event in link.events().iter() {
        match event {
            LinkEvent::Opened(name) => log::info!("connected to {name}"),
            LinkEvent::Rx(bytes) => {
                for body in splitter.push(&bytes) {
                    if let Some(text) = handle_body(&body, target) {
                        print!("{text}");
                    }
                }
            }
            LinkEvent::Error(msg) => bail!("serial link failed: {msg}"),
            LinkEvent::Closed => break,
        }
    }
    Ok(())
}

/// Decodes one frame body and returns its printout when the sensor address
/// matches the target. Other sensors and malformed bodies produce nothing.
fn handle_body(body: &[u8], target: u8) -> Option<String> {
    match Frame::decode(body) {
        Ok(frame) if frame.address == target => Some(render(&frame)),
        Ok(frame) => {
            log::debug!("skipping frame from sensor {}", frame.address);
            None
        }
        Err(e) => {
            log::warn!("dropping bad frame [{}]: {e}", hex::encode(body));
            None
        }
    }
}

fn render(frame: &Frame) -> String {
    format!(
        "Sensor address: {}\nSensor time: {}\nValues: {:?}\n-------------------------------------\n",
        frame.address, frame.timestamp, frame.taxels
    )
}
