//! Distance and travel-time math.
//!
//! Everything here is pure: callers resolve locations first and hand in
//! points. Distances are in map units, durations in hours.

use serde::{Deserialize, Serialize};

use crate::entities::TerrainKind;
use crate::error::DomainError;
use crate::value_objects::Point;

/// Reference walking speed used to precompute route travel times (units/hour).
pub const WALKING_SPEED: f64 = 3.0;

/// Reference riding speed used to precompute route travel times (units/hour).
pub const RIDING_SPEED: f64 = 8.0;

/// Precomputed travel times for a route, in hours
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TravelTime {
    pub walking: f64,
    pub riding: f64,
}

/// Euclidean distance between two points.
pub fn calculate_distance(from: &Point, to: &Point) -> f64 {
    from.distance_to(to)
}

/// Total length of an open polyline. Fewer than two points has length 0.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}

/// Travel time along a polyline at the reference speeds.
pub fn route_travel_time(points: &[Point]) -> TravelTime {
    let length = polyline_length(points);
    TravelTime {
        walking: length / WALKING_SPEED,
        riding: length / RIDING_SPEED,
    }
}

/// Inputs for a point-to-point travel estimate.
///
/// `speed` is in map units per hour. Each present factor multiplies the raw
/// travel time; absent factors count as 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelOptions {
    pub speed: f64,
    #[serde(default)]
    pub weather_factor: Option<f64>,
    #[serde(default)]
    pub encumbrance_factor: Option<f64>,
    #[serde(default)]
    pub terrain_factor: Option<f64>,
    /// When set, travel is split into days and rest time is added per day.
    #[serde(default)]
    pub travel_hours_per_day: Option<f64>,
    #[serde(default)]
    pub rest_hours_per_day: Option<f64>,
}

impl TravelOptions {
    pub fn at_speed(speed: f64) -> Self {
        Self {
            speed,
            weather_factor: None,
            encumbrance_factor: None,
            terrain_factor: None,
            travel_hours_per_day: None,
            rest_hours_per_day: None,
        }
    }

    pub fn with_weather(mut self, factor: f64) -> Self {
        self.weather_factor = Some(factor);
        self
    }

    pub fn with_encumbrance(mut self, factor: f64) -> Self {
        self.encumbrance_factor = Some(factor);
        self
    }

    pub fn with_terrain(mut self, factor: f64) -> Self {
        self.terrain_factor = Some(factor);
        self
    }

    /// Terrain factor from the kind of ground being crossed.
    ///
    /// # Errors
    ///
    /// Terrain that cannot be crossed on foot, such as open water.
    pub fn over_terrain(self, kind: TerrainKind) -> Result<Self, DomainError> {
        kind.travel_multiplier()
            .map(|factor| self.with_terrain(factor))
            .ok_or_else(|| {
                DomainError::validation(format!("{:?} terrain cannot be crossed on foot", kind))
            })
    }

    pub fn with_daily_schedule(mut self, travel_hours: f64, rest_hours: f64) -> Self {
        self.travel_hours_per_day = Some(travel_hours);
        self.rest_hours_per_day = Some(rest_hours);
        self
    }

    fn validate(&self) -> Result<(), DomainError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(DomainError::validation("Travel speed must be positive"));
        }
        for (label, factor) in [
            ("Weather factor", self.weather_factor),
            ("Encumbrance factor", self.encumbrance_factor),
            ("Terrain factor", self.terrain_factor),
        ] {
            if let Some(f) = factor {
                if !(f.is_finite() && f >= 0.0) {
                    return Err(DomainError::validation(format!(
                        "{} must be a non-negative number",
                        label
                    )));
                }
            }
        }
        if let Some(hours) = self.travel_hours_per_day {
            if !(hours.is_finite() && hours > 0.0) {
                return Err(DomainError::validation(
                    "Travel hours per day must be positive",
                ));
            }
        }
        if let Some(rest) = self.rest_hours_per_day {
            if !(rest.is_finite() && rest >= 0.0) {
                return Err(DomainError::validation(
                    "Rest hours per day cannot be negative",
                ));
            }
        }
        Ok(())
    }
}

/// Result of a travel estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimate {
    pub distance: f64,
    /// Time spent moving, after all factors
    pub travel_hours: f64,
    /// Number of travel days, only when a daily schedule was given
    pub travel_days: Option<u32>,
    pub rest_hours: f64,
    pub total_hours: f64,
}

/// Estimate how long covering `distance` takes under `options`.
pub fn estimate_travel(distance: f64, options: &TravelOptions) -> Result<TravelEstimate, DomainError> {
    options.validate()?;
    if !(distance.is_finite() && distance >= 0.0) {
        return Err(DomainError::validation("Distance must be a non-negative number"));
    }

    let travel_hours = distance / options.speed
        * options.weather_factor.unwrap_or(1.0)
        * options.encumbrance_factor.unwrap_or(1.0)
        * options.terrain_factor.unwrap_or(1.0);

    let (travel_days, rest_hours) = match options.travel_hours_per_day {
        Some(per_day) => {
            let days = (travel_hours / per_day).ceil();
            let rest = options.rest_hours_per_day.unwrap_or(0.0) * days;
            (Some(days as u32), rest)
        }
        None => (None, 0.0),
    };

    Ok(TravelEstimate {
        distance,
        travel_hours,
        travel_days,
        rest_hours,
        total_hours: travel_hours + rest_hours,
    })
}
