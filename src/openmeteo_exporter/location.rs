// openmeteo_exporter - Prometheus metrics exporter for the Open-Meteo forecast API
//
// Copyright 2024 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnsetCoordinates,
    InvalidLatitude(f64),
    InvalidLongitude(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsetCoordinates => write!(f, "latitude and longitude must be specified"),
            Self::InvalidLatitude(v) => write!(f, "invalid latitude {}, must be between -90 and 90", v),
            Self::InvalidLongitude(v) => write!(f, "invalid longitude {}, must be between -180 and 180", v),
        }
    }
}

impl error::Error for ConfigError {}

/// Coordinates of the place to fetch forecasts for.
///
/// A latitude and longitude of exactly zero is treated as "not set" and rejected, other
/// combinations involving zero (e.g. a point on the equator) are allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ConfigError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::InvalidLatitude(latitude));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::InvalidLongitude(longitude));
        }

        if latitude == 0.0 && longitude == 0.0 {
            return Err(ConfigError::UnsetCoordinates);
        }

        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod test {
    use super::{ConfigError, Location};

    #[test]
    fn test_both_zero_rejected() {
        assert_eq!(Err(ConfigError::UnsetCoordinates), Location::new(0.0, 0.0));
    }

    #[test]
    fn test_single_zero_allowed() {
        let loc = Location::new(0.0, 5.0).unwrap();
        assert_eq!(0.0, loc.latitude());
        assert_eq!(5.0, loc.longitude());

        assert!(Location::new(5.0, 0.0).is_ok());
    }

    #[test]
    fn test_negative_coordinates() {
        let loc = Location::new(-33.87, 151.21).unwrap();
        assert_eq!("-33.87,151.21", loc.to_string());
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(Err(ConfigError::InvalidLatitude(91.0)), Location::new(91.0, 10.0));
        assert_eq!(Err(ConfigError::InvalidLongitude(-180.5)), Location::new(10.0, -180.5));
        assert!(matches!(Location::new(f64::NAN, 10.0), Err(ConfigError::InvalidLatitude(_))));
    }
}
