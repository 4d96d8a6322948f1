//! Line-oriented operator console.
//!
//! | Command                         | Action                                   |
//! |---------------------------------|------------------------------------------|
//! | `log <gauge> <angle> <offset>`  | Record a measured bend                   |
//! | `predict <gauge> <angle>`       | Show the BND offset for a target angle   |
//! | `status`                        | Per-gauge sample count, slope, reference |
//! | `help`                          | Print this table                         |
//! | `quit`                          | Exit                                     |

use std::io::{self, Write};

use brake_core::calculator::BendCalculator;
use brake_core::config::CalculatorConfig;
use brake_core::input::parse_gauge;
use brake_core::storage::SampleLog;

pub const HELP: &str = "\
commands:
  log <gauge> <angle> <offset>   record a measured bend
  predict <gauge> <angle>        predicted BND offset for an angle
  status                         calibration state per gauge
  help                           show this help
  quit                           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Log {
        gauge: &'a str,
        angle: &'a str,
        offset: &'a str,
    },
    Predict {
        gauge: &'a str,
        angle: &'a str,
    },
    Status,
    Help,
    Quit,
    Empty,
}

impl<'a> Command<'a> {
    /// Split a console line into a command. Field text is validated later.
    pub fn parse(line: &'a str) -> Result<Self, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words[..] {
            [] => Ok(Self::Empty),
            ["log", gauge, angle, offset] => Ok(Self::Log {
                gauge,
                angle,
                offset,
            }),
            ["predict", gauge, angle] => Ok(Self::Predict { gauge, angle }),
            ["status"] => Ok(Self::Status),
            ["help"] => Ok(Self::Help),
            ["quit"] | ["exit"] => Ok(Self::Quit),
            ["log", ..] => Err(String::from("usage: log <gauge> <angle> <offset>")),
            ["predict", ..] => Err(String::from("usage: predict <gauge> <angle>")),
            [other, ..] => Err(format!("unknown command {other:?}, try help")),
        }
    }
}

/// Whether the console should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<L> {
    calculator: BendCalculator<L>,
    config: CalculatorConfig,
}

impl<L: SampleLog> Console<L> {
    pub fn new(calculator: BendCalculator<L>, config: CalculatorConfig) -> Self {
        Self { calculator, config }
    }

    /// Run one input line, writing any response to `out`.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Empty => {}
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Status => self.write_status(out)?,
            Command::Log {
                gauge,
                angle,
                offset,
            } => match self.supported_gauge(gauge) {
                Ok(gauge) => match self.calculator.on_observation_entered(gauge, angle, offset) {
                    Ok(()) => writeln!(out, "logged gauge {gauge}: {angle}° at {offset}")?,
                    Err(e) => writeln!(out, "{e}")?,
                },
                Err(message) => writeln!(out, "{message}")?,
            },
            Command::Predict { gauge, angle } => match self.supported_gauge(gauge) {
                Ok(gauge) => match self.calculator.on_angle_or_gauge_changed(gauge, angle) {
                    Ok(offset) => writeln!(out, "BND point {offset}")?,
                    Err(e) => writeln!(out, "{e}")?,
                },
                Err(message) => writeln!(out, "{message}")?,
            },
        }

        Ok(Flow::Continue)
    }

    /// The console only offers the shop's configured gauges.
    fn supported_gauge(&self, text: &str) -> Result<u32, String> {
        let gauge = parse_gauge(text).map_err(|e| format!("invalid gauge: {e}"))?;
        if self.config.supports(gauge.get()) {
            Ok(gauge.get())
        } else {
            Err(format!(
                "gauge {gauge} is not offered, choose one of {:?}",
                self.config.supported_gauges
            ))
        }
    }

    fn write_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let decimals = self.calculator.display_decimals();
        let mut any = false;

        for summary in self.calculator.registry().summaries() {
            any = true;
            write!(out, "gauge {:>3}: {:>3} samples", summary.gauge, summary.samples)?;
            match summary.slope {
                Some(slope) => write!(out, ", slope {slope:.6}")?,
                None => write!(out, ", no fit yet")?,
            }
            if let Some(reference) = summary.reference {
                write!(
                    out,
                    ", reference {}° at {:.*}",
                    reference.angle, decimals, reference.offset
                )?;
            }
            writeln!(out)?;
        }

        if !any {
            writeln!(out, "no observations logged yet")?;
        }
        Ok(())
    }
}
