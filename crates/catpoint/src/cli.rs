//! Command-line surface.
//!
//! Control commands are shared between one-shot invocations
//! (`catpoint arm home`) and the line protocol accepted on stdin by
//! `catpoint run`.

use std::fmt;
use std::path::PathBuf;

use catpoint_image::ImageClassifier;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;

use crate::security::AlarmStatus;
use crate::security::ArmingStatus;
use crate::security::SecurityController;
use crate::security::SecurityError;
use crate::security::SecurityRepository;
use crate::security::Sensor;
use crate::security::SensorType;

#[derive(Debug, Parser)]
#[command(name = "catpoint", version, about = "Home security alarm controller")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Keep running: scan the camera periodically and accept commands on stdin
    Run,

    #[command(flatten)]
    Control(Command),
}

/// A single operation against the controller
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show arming status, alarm status and sensors
    Status,

    /// Register a new sensor
    AddSensor {
        name: String,
        #[arg(value_name = "TYPE")]
        sensor_type: SensorType,
    },

    /// Forget a sensor
    RemoveSensor {
        name: String,
        #[arg(value_name = "TYPE")]
        sensor_type: SensorType,
    },

    /// Report a sensor as triggered
    Activate {
        name: String,
        #[arg(value_name = "TYPE")]
        sensor_type: SensorType,
    },

    /// Report a sensor as back to rest
    Deactivate {
        name: String,
        #[arg(value_name = "TYPE")]
        sensor_type: SensorType,
    },

    /// Arm the system (home, away)
    Arm { mode: ArmingStatus },

    /// Disarm the system, clearing any alarm
    Disarm,

    /// Classify the current camera image
    Scan,

    /// Force the alarm status
    SetAlarm { status: AlarmStatus },
}

/// Wrapper used to parse a single stdin line as a [`Command`]
#[derive(Debug, Parser)]
#[command(name = "catpoint", no_binary_name = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

impl Command {
    /// Parse a whitespace-separated command line, e.g. `activate Hallway motion`
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        CommandLine::try_parse_from(line.split_whitespace()).map(|l| l.command)
    }

    /// Apply the command and report the resulting state
    pub fn execute<R, C>(
        &self,
        controller: &mut SecurityController<R, C>,
    ) -> Result<StatusReport, SecurityError>
    where
        R: SecurityRepository,
        C: ImageClassifier,
    {
        match self {
            Command::Status => {}
            Command::AddSensor { name, sensor_type } => {
                controller.add_sensor(Sensor::new(name.clone(), *sensor_type))?
            }
            Command::RemoveSensor { name, sensor_type } => {
                controller.remove_sensor(&Sensor::new(name.clone(), *sensor_type))?
            }
            Command::Activate { name, sensor_type } => controller
                .change_sensor_activation_status(&Sensor::new(name.clone(), *sensor_type), true)?,
            Command::Deactivate { name, sensor_type } => controller
                .change_sensor_activation_status(&Sensor::new(name.clone(), *sensor_type), false)?,
            Command::Arm { mode } => controller.arm_system(*mode)?,
            Command::Disarm => controller.set_arming_status(ArmingStatus::Disarmed)?,
            Command::Scan => {
                controller.process_image()?;
            }
            Command::SetAlarm { status } => controller.set_alarm_status(*status)?,
        }

        StatusReport::capture(controller)
    }
}

/// Snapshot of everything a user wants to see after a command
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub arming_status: ArmingStatus,
    pub alarm_status: AlarmStatus,
    pub cat_detected: bool,
    pub sensors: Vec<Sensor>,
}

impl StatusReport {
    pub fn capture<R, C>(controller: &SecurityController<R, C>) -> Result<Self, SecurityError>
    where
        R: SecurityRepository,
        C: ImageClassifier,
    {
        Ok(Self {
            arming_status: controller.arming_status()?,
            alarm_status: controller.alarm_status()?,
            cat_detected: controller.cat_detected(),
            sensors: controller.sensors()?,
        })
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "arming:  {}", self.arming_status)?;
        writeln!(f, "alarm:   {}", self.alarm_status)?;
        write!(
            f,
            "camera:  {}",
            if self.cat_detected { "cat" } else { "no cat" }
        )?;
        if self.sensors.is_empty() {
            return write!(f, "\nsensors: none");
        }
        write!(f, "\nsensors:")?;
        for sensor in &self.sensors {
            let mark = if sensor.active { "x" } else { " " };
            write!(f, "\n  [{}] {}", mark, sensor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use catpoint_image::ScriptedClassifier;

    use super::*;
    use crate::store::MemoryRepository;

    fn controller(script: Vec<bool>) -> SecurityController<MemoryRepository, ScriptedClassifier> {
        SecurityController::new(
            MemoryRepository::new(),
            ScriptedClassifier::new(script).unwrap(),
        )
    }

    fn run(
        controller: &mut SecurityController<MemoryRepository, ScriptedClassifier>,
        line: &str,
    ) -> StatusReport {
        Command::parse_line(line)
            .unwrap()
            .execute(controller)
            .unwrap()
    }

    #[test]
    fn test_parse_lines() {
        assert_eq!(Command::parse_line("status").unwrap(), Command::Status);
        assert_eq!(
            Command::parse_line("add-sensor Hallway motion").unwrap(),
            Command::AddSensor {
                name: "Hallway".to_string(),
                sensor_type: SensorType::Motion
            }
        );
        assert_eq!(
            Command::parse_line("arm home").unwrap(),
            Command::Arm {
                mode: ArmingStatus::ArmedHome
            }
        );
        assert_eq!(
            Command::parse_line("set-alarm pending_alarm").unwrap(),
            Command::SetAlarm {
                status: AlarmStatus::PendingAlarm
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse_line("").is_err());
        assert!(Command::parse_line("explode").is_err());
        assert!(Command::parse_line("add-sensor Hallway camera").is_err());
        assert!(Command::parse_line("arm vacation").is_err());
        assert!(Command::parse_line("run").is_err());
    }

    #[test]
    fn test_cli_parses_run_and_control_commands() {
        let cli = Cli::try_parse_from(["catpoint", "--config", "c.toml", "run"]).unwrap();
        assert!(matches!(cli.command, CliCommand::Run));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));

        let cli = Cli::try_parse_from(["catpoint", "disarm"]).unwrap();
        assert!(matches!(cli.command, CliCommand::Control(Command::Disarm)));
    }

    #[test]
    fn test_intrusion_scenario() {
        let mut controller = controller(vec![false]);
        run(&mut controller, "add-sensor Front door");
        run(&mut controller, "add-sensor Hallway motion");
        run(&mut controller, "arm away");

        let report = run(&mut controller, "activate Front door");
        assert_eq!(report.alarm_status, AlarmStatus::PendingAlarm);

        let report = run(&mut controller, "activate Hallway motion");
        assert_eq!(report.alarm_status, AlarmStatus::Alarm);

        insta::assert_snapshot!(report.to_string(), @"
        arming:  armed_away
        alarm:   alarm
        camera:  no cat
        sensors:
          [x] Front (door)
          [x] Hallway (motion)
        ");

        let report = run(&mut controller, "disarm");
        assert_eq!(report.alarm_status, AlarmStatus::NoAlarm);
        assert_eq!(report.arming_status, ArmingStatus::Disarmed);
    }

    #[test]
    fn test_scan_reports_cat() {
        let mut controller = controller(vec![true]);
        run(&mut controller, "arm home");

        let report = run(&mut controller, "scan");

        assert!(report.cat_detected);
        assert_eq!(report.alarm_status, AlarmStatus::Alarm);
        insta::assert_snapshot!(report.to_string(), @"
        arming:  armed_home
        alarm:   alarm
        camera:  cat
        sensors: none
        ");
    }

    #[test]
    fn test_duplicate_sensor_is_an_error() {
        let mut controller = controller(vec![false]);
        run(&mut controller, "add-sensor Front door");

        let err = Command::parse_line("add-sensor Front door")
            .unwrap()
            .execute(&mut controller)
            .unwrap_err();
        assert_eq!(err.to_string(), "Sensor already exists: Front (door)");
    }

    #[test]
    fn test_status_report_json() {
        let mut controller = controller(vec![false]);
        let report = run(&mut controller, "add-sensor Front door");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["arming_status"], "disarmed");
        assert_eq!(json["sensors"][0]["sensor_type"], "door");
    }
}
