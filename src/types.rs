use crate::error::ValidationError;
use crate::utils::capitalize;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// `[latitude, longitude]` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    pub const fn lat(self) -> f64 {
        self.0
    }

    pub const fn lng(self) -> f64 {
        self.1
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Running,
    Cycling,
}

impl WorkoutType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific fields. Serialized inline next to the common fields,
/// discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running {
        /// steps/min
        cadence: f64,
        /// min/km
        pace: f64,
    },
    Cycling {
        /// meters
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        /// km/h
        speed: f64,
    },
}

impl WorkoutKind {
    pub const fn workout_type(&self) -> WorkoutType {
        match self {
            Self::Running { .. } => WorkoutType::Running,
            Self::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// One recorded session. Built once by [`Workout::running`] or
/// [`Workout::cycling`]; edits replace the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub coords: Coords,
    /// km
    pub distance: f64,
    /// min
    pub duration: f64,
    pub description: String,
    #[serde(flatten)]
    pub kind: WorkoutKind,
}

/// User-supplied numbers for a new or edited workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutInput {
    Running {
        distance: f64,
        duration: f64,
        cadence: f64,
    },
    Cycling {
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    },
}

impl WorkoutInput {
    pub const fn workout_type(&self) -> WorkoutType {
        match self {
            Self::Running { .. } => WorkoutType::Running,
            Self::Cycling { .. } => WorkoutType::Cycling,
        }
    }

    /// Checks the numbers without building anything.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            Self::Running {
                distance,
                duration,
                cadence,
            } => {
                let fields = [
                    ("distance", distance),
                    ("duration", duration),
                    ("cadence", cadence),
                ];
                all_finite(&fields)?;
                all_positive(&fields)
            }
            Self::Cycling {
                distance,
                duration,
                elevation_gain,
            } => {
                all_finite(&[
                    ("distance", distance),
                    ("duration", duration),
                    ("elevation gain", elevation_gain),
                ])?;
                all_positive(&[("distance", distance), ("duration", duration)])
            }
        }
    }

    /// Builds a record with a fresh id, stamped now.
    pub fn build(self, coords: Coords) -> Result<Workout, ValidationError> {
        self.build_at(coords, next_id(), Utc::now())
    }

    /// Builds a record with an explicit identity. Used when an edit keeps
    /// the id and creation time of the record it replaces.
    pub fn build_at(
        self,
        coords: Coords,
        id: String,
        created_at: DateTime<Utc>,
    ) -> Result<Workout, ValidationError> {
        self.validate()?;

        let (distance, duration, kind) = match self {
            Self::Running {
                distance,
                duration,
                cadence,
            } => (
                distance,
                duration,
                WorkoutKind::Running {
                    cadence,
                    pace: duration / distance,
                },
            ),
            Self::Cycling {
                distance,
                duration,
                elevation_gain,
            } => (
                distance,
                duration,
                WorkoutKind::Cycling {
                    elevation_gain,
                    speed: distance / (duration / 60.0),
                },
            ),
        };

        let description = describe(kind.workout_type(), &created_at.with_timezone(&Local));

        Ok(Workout {
            id,
            created_at,
            coords,
            distance,
            duration,
            description,
            kind,
        })
    }
}

impl Workout {
    pub fn running(
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Self, ValidationError> {
        WorkoutInput::Running {
            distance,
            duration,
            cadence,
        }
        .build(coords)
    }

    pub fn cycling(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, ValidationError> {
        WorkoutInput::Cycling {
            distance,
            duration,
            elevation_gain,
        }
        .build(coords)
    }

    pub const fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    /// Pace in min/km, running only.
    pub const fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running { pace, .. } => Some(pace),
            WorkoutKind::Cycling { .. } => None,
        }
    }

    /// Speed in km/h, cycling only.
    pub const fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling { speed, .. } => Some(speed),
            WorkoutKind::Running { .. } => None,
        }
    }

    /// The numbers a caller would pre-fill an edit form with.
    pub const fn input(&self) -> WorkoutInput {
        match self.kind {
            WorkoutKind::Running { cadence, .. } => WorkoutInput::Running {
                distance: self.distance,
                duration: self.duration,
                cadence,
            },
            WorkoutKind::Cycling { elevation_gain, .. } => WorkoutInput::Cycling {
                distance: self.distance,
                duration: self.duration,
                elevation_gain,
            },
        }
    }
}

/// `"Running on March 5"`.
pub fn describe<Tz: TimeZone>(kind: WorkoutType, at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("{} on {}", capitalize(kind.as_str()), at.format("%B %-d"))
}

static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Stored ids at or above this never advance the generator. Millisecond
/// timestamps stay below it for the next thirty millennia, so generated ids
/// cannot reach such an id and the counter cannot run out.
const ID_CEILING: u64 = 1_000_000_000_000_000;

/// Next workout id: decimal milliseconds since the epoch, bumped past the
/// last issued value so ids stay unique within the process.
pub fn next_id() -> String {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = bump(now, last);
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(seen) => last = seen,
        }
    }
}

/// Advances the generator past an id read back from storage.
pub fn observe_id(id: &str) {
    if let Some(n) = observable(id) {
        LAST_ID.fetch_max(n, Ordering::Relaxed);
    }
}

const fn bump(now: u64, last: u64) -> u64 {
    let after = last.saturating_add(1);
    if now > after { now } else { after }
}

fn observable(id: &str) -> Option<u64> {
    id.parse::<u64>().ok().filter(|&n| n < ID_CEILING)
}

fn all_finite(fields: &[(&'static str, f64)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(field, value)) => Err(ValidationError::NotFinite { field, value }),
        None => Ok(()),
    }
}

fn all_positive(fields: &[(&'static str, f64)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, v)| *v <= 0.0) {
        Some(&(field, value)) => Err(ValidationError::NotPositive { field, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HERE: Coords = Coords(10.0, 10.0);

    #[test]
    fn running_pace_is_minutes_per_km() {
        let w = Workout::running(HERE, 5.0, 25.0, 178.0).unwrap();
        assert_eq!(w.pace(), Some(5.0));
        assert_eq!(w.speed(), None);
        assert_eq!(w.workout_type(), WorkoutType::Running);
        assert!(w.description.starts_with("Running on "));
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let w = Workout::cycling(HERE, 10.0, 30.0, 150.0).unwrap();
        assert_eq!(w.speed(), Some(20.0));
        assert!(w.description.starts_with("Cycling on "));
    }

    #[test]
    fn rejects_non_positive_running_fields() {
        assert_eq!(
            Workout::running(HERE, -1.0, 25.0, 178.0),
            Err(ValidationError::NotPositive {
                field: "distance",
                value: -1.0
            })
        );
        assert!(Workout::running(HERE, 5.0, 0.0, 178.0).is_err());
        assert!(Workout::running(HERE, 5.0, 25.0, 0.0).is_err());
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert!(matches!(
            Workout::running(HERE, f64::NAN, 25.0, 178.0),
            Err(ValidationError::NotFinite {
                field: "distance",
                ..
            })
        ));
        assert!(Workout::cycling(HERE, 10.0, f64::INFINITY, 0.0).is_err());
        assert!(Workout::cycling(HERE, 10.0, 30.0, f64::NAN).is_err());
    }

    #[test]
    fn elevation_gain_may_be_zero_or_negative() {
        assert!(Workout::cycling(HERE, 10.0, 30.0, 0.0).is_ok());
        let downhill = Workout::cycling(HERE, 10.0, 30.0, -40.0).unwrap();
        assert_eq!(
            downhill.kind,
            WorkoutKind::Cycling {
                elevation_gain: -40.0,
                speed: 20.0
            }
        );
    }

    #[test]
    fn description_uses_month_name_and_unpadded_day() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(describe(WorkoutType::Running, &at), "Running on March 5");
        assert_eq!(describe(WorkoutType::Cycling, &at), "Cycling on March 5");
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let a: u64 = next_id().parse().unwrap();
        let b: u64 = next_id().parse().unwrap();
        assert!(b > a);
    }

    #[test]
    fn bump_follows_clock_and_stays_ahead_of_last() {
        assert_eq!(bump(1_000, 5), 1_000);
        assert_eq!(bump(1_000, 1_000), 1_001);
        assert_eq!(bump(1_000, 4_000), 4_001);
        assert_eq!(bump(0, u64::MAX), u64::MAX);
    }

    #[test]
    fn only_plausible_stored_ids_advance_the_generator() {
        assert_eq!(observable("1709640000000"), Some(1_709_640_000_000));
        assert_eq!(observable("not-a-number"), None);
        assert_eq!(observable(&u64::MAX.to_string()), None);
        assert_eq!(observable(&ID_CEILING.to_string()), None);
        assert_eq!(observable(&(ID_CEILING - 1).to_string()), Some(ID_CEILING - 1));
    }

    #[test]
    fn serializes_as_flat_record() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let w = WorkoutInput::Cycling {
            distance: 10.0,
            duration: 30.0,
            elevation_gain: 150.0,
        }
        .build_at(Coords(47.1, -122.5), "1709640000000".into(), at)
        .unwrap();

        let v = serde_json::to_value(&w).unwrap();
        assert_eq!(v["id"], json!("1709640000000"));
        assert_eq!(v["type"], json!("cycling"));
        assert_eq!(v["coords"], json!([47.1, -122.5]));
        assert_eq!(v["elevationGain"], json!(150.0));
        assert_eq!(v["speed"], json!(20.0));
        assert_eq!(v["createdAt"], json!("2024-03-05T12:00:00Z"));
        assert!(v.get("cadence").is_none());

        let back: Workout = serde_json::from_value(v).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn input_reflects_stored_numbers() {
        let w = Workout::running(HERE, 5.0, 25.0, 178.0).unwrap();
        assert_eq!(
            w.input(),
            WorkoutInput::Running {
                distance: 5.0,
                duration: 25.0,
                cadence: 178.0
            }
        );
    }
}
