use rand::Rng;
use serde::Serialize;

/// Fixed per-region baselines. The handler returns these with bounded jitter
/// so repeated calls look live without any real data source.
pub struct RegionBaseline {
    pub name: &'static str,
    pub temperature: f64, // deg C
    pub humidity: f64,    // percent
    pub rainfall: f64,    // mm expected this week
    pub wind_speed: f64,  // km/h
    pub condition: &'static str,
}

pub const DEFAULT_REGION: &str = "nairobi";

pub static REGIONS: &[RegionBaseline] = &[
    RegionBaseline {
        name: "nairobi",
        temperature: 22.0,
        humidity: 65.0,
        rainfall: 18.0,
        wind_speed: 12.0,
        condition: "Partly cloudy",
    },
    RegionBaseline {
        name: "mombasa",
        temperature: 29.0,
        humidity: 80.0,
        rainfall: 25.0,
        wind_speed: 16.0,
        condition: "Humid and sunny",
    },
    RegionBaseline {
        name: "kisumu",
        temperature: 26.0,
        humidity: 72.0,
        rainfall: 40.0,
        wind_speed: 10.0,
        condition: "Scattered showers",
    },
    RegionBaseline {
        name: "nakuru",
        temperature: 20.0,
        humidity: 60.0,
        rainfall: 22.0,
        wind_speed: 14.0,
        condition: "Mild and breezy",
    },
    RegionBaseline {
        name: "eldoret",
        temperature: 17.0,
        humidity: 58.0,
        rainfall: 30.0,
        wind_speed: 11.0,
        condition: "Cool with afternoon rain",
    },
];

/// Unknown locations fall back to the default region.
pub fn lookup(location: &str) -> &'static RegionBaseline {
    let needle = location.trim().to_lowercase();
    REGIONS
        .iter()
        .find(|r| r.name == needle)
        .unwrap_or_else(|| {
            REGIONS
                .iter()
                .find(|r| r.name == DEFAULT_REGION)
                .expect("default region present")
        })
}

#[derive(Debug, Serialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    #[serde(rename = "windSpeed")]
    pub wind_speed: f64,
    pub condition: &'static str,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Jitter bounds: temperature +-2C, humidity +-5pts, rainfall +-10%, wind +-1.5.
pub fn sample(region: &'static RegionBaseline) -> CurrentWeather {
    let mut rng = rand::thread_rng();
    CurrentWeather {
        temperature: round1(region.temperature + rng.gen_range(-2.0..=2.0)),
        humidity: round1((region.humidity + rng.gen_range(-5.0..=5.0)).clamp(0.0, 100.0)),
        rainfall: round1(region.rainfall * rng.gen_range(0.9..=1.1)),
        wind_speed: round1((region.wind_speed + rng.gen_range(-1.5..=1.5)).max(0.0)),
        condition: region.condition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_location_falls_back_to_default() {
        assert_eq!(lookup("atlantis").name, DEFAULT_REGION);
        assert_eq!(lookup("").name, DEFAULT_REGION);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup(" Mombasa ").name, "mombasa");
    }

    #[test]
    fn samples_stay_within_jitter_bounds() {
        let region = lookup("kisumu");
        for _ in 0..200 {
            let w = sample(region);
            assert!((w.temperature - region.temperature).abs() <= 2.05);
            assert!((w.humidity - region.humidity).abs() <= 5.05);
            assert!(w.rainfall >= region.rainfall * 0.9 - 0.05);
            assert!(w.rainfall <= region.rainfall * 1.1 + 0.05);
            assert!((w.wind_speed - region.wind_speed).abs() <= 1.55);
            assert_eq!(w.condition, region.condition);
        }
    }
}
