use crate::database::DEFAULT_STORAGE_KEY;
use crate::types::WorkoutInput;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "mapty.db";

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Record running and cycling workouts with derived pace and speed"
)]
pub struct Cli {
    /// SQLite file holding the workouts.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Storage key the workouts are saved under.
    #[arg(long, default_value = DEFAULT_STORAGE_KEY, global = true)]
    pub key: String,

    /// Give edited workouts a new id instead of keeping the old one.
    #[arg(long, global = true)]
    pub regenerate_ids: bool,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print every workout, oldest first.
    List {
        /// Tab-separated id, timestamp, coordinates and summary.
        #[arg(long)]
        details: bool,
    },
    /// Record a new workout at a position.
    Add {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[command(subcommand)]
        workout: WorkoutArgs,
    },
    /// Replace the numbers of an existing workout. Its position is kept.
    Edit {
        id: String,
        #[command(subcommand)]
        workout: WorkoutArgs,
    },
    /// Delete one workout.
    Delete { id: String },
    /// Delete every workout.
    Clear,
    /// Print where a workout took place.
    Locate { id: String },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum WorkoutArgs {
    Running(RunningArgs),
    Cycling(CyclingArgs),
}

#[derive(Args, Debug, Clone, Copy)]
pub struct RunningArgs {
    /// km
    #[arg(long, allow_negative_numbers = true)]
    pub distance: f64,
    /// min
    #[arg(long, allow_negative_numbers = true)]
    pub duration: f64,
    /// steps/min
    #[arg(long, allow_negative_numbers = true)]
    pub cadence: f64,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct CyclingArgs {
    /// km
    #[arg(long, allow_negative_numbers = true)]
    pub distance: f64,
    /// min
    #[arg(long, allow_negative_numbers = true)]
    pub duration: f64,
    /// meters
    #[arg(long, allow_negative_numbers = true)]
    pub elevation_gain: f64,
}

impl From<WorkoutArgs> for WorkoutInput {
    fn from(value: WorkoutArgs) -> Self {
        match value {
            WorkoutArgs::Running(RunningArgs {
                distance,
                duration,
                cadence,
            }) => Self::Running {
                distance,
                duration,
                cadence,
            },
            WorkoutArgs::Cycling(CyclingArgs {
                distance,
                duration,
                elevation_gain,
            }) => Self::Cycling {
                distance,
                duration,
                elevation_gain,
            },
        }
    }
}
