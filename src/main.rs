use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info, warn};
use pantilt_mount::{Axis, Command, ControlLine, Driver, Mount, MountConfig, NoControlLine, SimulatedDriver};
use std::error::Error;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::path::PathBuf;
use std::time::Duration;
use strum::IntoEnumIterator;

#[derive(Parser)]
#[command(name = "pantilt", about = "Drive a PCA9685 pan/tilt camera mount")]
struct Cli {
    #[arg(long, short, global = true, help = "JSON configuration file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "I2C character device, e.g. /dev/i2c-1")]
    i2c_path: Option<String>,
    #[arg(long, global = true, value_parser = parse_address, help = "Controller I2C address (decimal or 0x..)")]
    address: Option<u16>,
    #[arg(long, global = true, help = "Log writes instead of touching hardware")]
    dry_run: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the controller and home both axes
    Init,
    /// Initialize, then apply commands in order (start with reset-all)
    Run {
        #[arg(required = true, help = "reset-all, reset-pan, reset-tilt, tilt-up, tilt-down, pan-left, pan-right")]
        commands: Vec<Command>,
    },
    /// Read one command per line from stdin or a serial control line
    Shell {
        #[arg(long, help = "Serial port to read commands from")]
        serial: Option<String>,
        #[arg(long, default_value_t = 115200)]
        baud: u32,
    },
}

enum Session {
    Init,
    Run(Vec<Command>),
    Shell(Box<dyn BufRead>),
}

enum Line {
    Apply(Command),
    Set(Axis, f32),
    Status,
    Quit,
    Empty,
    Unknown,
}

fn parse_address(text: &str) -> Result<u16, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid I2C address {:?}: {}", text, e))
}

fn parse_line(line: &str) -> Line {
    let mut parts = line.split_whitespace();
    let Some(first) = parts.next() else {
        return Line::Empty;
    };
    let axis = match first {
        "quit" | "exit" => return Line::Quit,
        "status" => return Line::Status,
        "pan" => Axis::Pan,
        "tilt" => Axis::Tilt,
        name => return name.parse().map(Line::Apply).unwrap_or(Line::Unknown),
    };
    match parts.next().map(str::parse::<f32>) {
        Some(Ok(degrees)) => Line::Set(axis, degrees),
        _ => Line::Unknown,
    }
}

fn print_status<D: Driver, L: ControlLine>(mount: &Mount<D, L>) {
    for axis in Axis::iter() {
        let state = mount.state(axis);
        let (min, max) = state.bounds();
        match state.current_angle() {
            Some(degrees) => println!("{}: {:.1} ({}, {}..{})", axis, degrees, state.channel(), min, max),
            None => println!("{}: unknown ({}, {}..{})", axis, state.channel(), min, max),
        }
    }
}

fn shell<D: Driver, L: ControlLine>(mount: &mut Mount<D, L>, mut input: Box<dyn BufRead>) -> Result<(), Box<dyn Error>> {
    let mut buf = String::new();
    loop {
        match input.read_line(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Discarding unreadable line: {}", e);
                buf.clear();
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        let result = match parse_line(buf.trim()) {
            Line::Apply(command) => mount.apply(command),
            Line::Set(axis, degrees) => mount.set(axis, degrees),
            Line::Status => {
                print_status(mount);
                Ok(())
            }
            Line::Quit => return Ok(()),
            Line::Empty => Ok(()),
            Line::Unknown => {
                warn!("Unknown command: {:?}", buf.trim());
                Ok(())
            }
        };
        if let Err(e) = result {
            error!("{}", e);
        }
        buf.clear();
    }
}

fn run_session<D: Driver, L: ControlLine>(mut mount: Mount<D, L>, session: Session) -> Result<(), Box<dyn Error>> {
    match session {
        Session::Init => mount.reset_all()?,
        Session::Run(commands) => {
            for command in commands {
                info!("Applying {}", command);
                mount.apply(command)?;
            }
        }
        Session::Shell(input) => shell(&mut mount, input)?,
    }
    print_status(&mount);
    Ok(())
}

fn start<L: ControlLine>(config: &MountConfig, dry_run: bool, line: L, session: Session) -> Result<(), Box<dyn Error>> {
    if dry_run {
        info!("Dry run, no hardware will be touched");
        let mount = Mount::with_control_line(SimulatedDriver::new(), line, config)?;
        run_session(mount, session)
    } else {
        let mount = Mount::initialize_with_control_line(config, line)?;
        run_session(mount, session)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MountConfig::load(path)?,
        None => MountConfig::default(),
    };
    if let Some(path) = cli.i2c_path {
        config.i2c_path = path;
    }
    if let Some(address) = cli.address {
        config.i2c_address = address;
    }

    match cli.command {
        Commands::Init => start(&config, cli.dry_run, NoControlLine, Session::Init),
        Commands::Run { commands } => start(&config, cli.dry_run, NoControlLine, Session::Run(commands)),
        Commands::Shell { serial: None, .. } => {
            let input = Box::new(io::stdin().lock());
            start(&config, cli.dry_run, NoControlLine, Session::Shell(input))
        }
        Commands::Shell {
            serial: Some(path),
            baud,
        } => {
            let port = serialport::new(&path, baud)
                .timeout(Duration::from_millis(100))
                .open()?;
            info!("Reading commands from {} at {} baud", path, baud);
            let input = Box::new(BufReader::new(port.try_clone()?));
            start(&config, cli.dry_run, port, Session::Shell(input))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_addresses() {
        assert_eq!(parse_address("0x40"), Ok(0x40));
        assert_eq!(parse_address("64"), Ok(64));
        assert!(parse_address("0xZZ").is_err());
    }

    #[test]
    fn parses_shell_lines() {
        assert!(matches!(parse_line("pan-left"), Line::Apply(Command::PanLeft)));
        assert!(matches!(parse_line("tilt 42.5"), Line::Set(Axis::Tilt, d) if d == 42.5));
        assert!(matches!(parse_line("pan"), Line::Unknown));
        assert!(matches!(parse_line("status"), Line::Status));
        assert!(matches!(parse_line(""), Line::Empty));
        assert!(matches!(parse_line("wiggle"), Line::Unknown));
    }

    #[test]
    fn shell_applies_lines_until_quit() {
        let config = MountConfig {
            settle_delay_ms: 0,
            ..MountConfig::default()
        };
        let mut mount = Mount::with_driver(SimulatedDriver::new(), &config).unwrap();
        let input = Box::new(io::Cursor::new("reset-all\npan-right\ntilt 20\nbogus\nquit\npan-right\n"));

        shell(&mut mount, input).unwrap();
        assert_eq!(mount.angle(Axis::Pan), Some(115.0));
        assert_eq!(mount.angle(Axis::Tilt), Some(20.0));
    }

    #[test]
    fn shell_skips_lines_that_are_not_utf8() {
        let config = MountConfig {
            settle_delay_ms: 0,
            ..MountConfig::default()
        };
        let mut mount = Mount::with_driver(SimulatedDriver::new(), &config).unwrap();
        let mut bytes = b"reset-all\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"tilt-up\n");
        let input = Box::new(io::Cursor::new(bytes));

        shell(&mut mount, input).unwrap();
        assert_eq!(mount.angle(Axis::Tilt), Some(100.0));
    }
}
