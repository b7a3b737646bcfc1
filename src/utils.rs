use crate::types::{Workout, WorkoutKind, WorkoutType};
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

/// Initialize colorful logging.
///
/// Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
/// - `-q` => WARN
/// - `-qq` => ERROR
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn init_logging(verbose: u8, quiet: u8) {
    let net = i16::from(verbose) - i16::from(quiet);
    let level = match net {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mapty={level}")));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

/// Upper-cases the first character, lower-cases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

pub const fn icon(kind: WorkoutType) -> &'static str {
    match kind {
        WorkoutType::Running => "🏃",
        WorkoutType::Cycling => "🚴",
    }
}

/// One human-readable line per workout, e.g.
/// `🏃 Running on March 5  5 km  25 min  5.0 min/km  178 spm`.
pub fn format_workout_line(w: &Workout) -> String {
    let metric = match w.kind {
        WorkoutKind::Running { cadence, pace } => format!("{pace:.1} min/km  {cadence} spm"),
        WorkoutKind::Cycling {
            elevation_gain,
            speed,
        } => format!("{speed:.1} km/h  {elevation_gain} m"),
    };
    format!(
        "{} {}  {} km  {} min  {metric}",
        icon(w.workout_type()),
        w.description,
        w.distance,
        w.duration
    )
}
