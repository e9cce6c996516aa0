/// Canned history series served by the read-only history endpoints. Values are
/// fixed so the dashboard charts are stable across requests.

pub struct YieldPoint {
    pub month: &'static str,
    pub value: f64,
}

pub struct CropHistory {
    pub crop: &'static str,
    pub points: &'static [YieldPoint],
}

pub static YIELD_HISTORY: &[CropHistory] = &[
    CropHistory {
        crop: "maize",
        points: &[
            YieldPoint { month: "Jan", value: 4.8 },
            YieldPoint { month: "Feb", value: 4.9 },
            YieldPoint { month: "Mar", value: 5.3 },
            YieldPoint { month: "Apr", value: 5.6 },
            YieldPoint { month: "May", value: 5.4 },
            YieldPoint { month: "Jun", value: 5.1 },
        ],
    },
    CropHistory {
        crop: "beans",
        points: &[
            YieldPoint { month: "Jan", value: 1.6 },
            YieldPoint { month: "Feb", value: 1.7 },
            YieldPoint { month: "Mar", value: 1.9 },
            YieldPoint { month: "Apr", value: 2.0 },
            YieldPoint { month: "May", value: 1.8 },
            YieldPoint { month: "Jun", value: 1.7 },
        ],
    },
    CropHistory {
        crop: "wheat",
        points: &[
            YieldPoint { month: "Jan", value: 3.1 },
            YieldPoint { month: "Feb", value: 3.2 },
            YieldPoint { month: "Mar", value: 3.5 },
            YieldPoint { month: "Apr", value: 3.7 },
            YieldPoint { month: "May", value: 3.6 },
            YieldPoint { month: "Jun", value: 3.3 },
        ],
    },
];

pub fn yield_history(crop: &str) -> &'static CropHistory {
    let needle = crop.trim().to_lowercase();
    YIELD_HISTORY
        .iter()
        .find(|h| h.crop == needle)
        .unwrap_or(&YIELD_HISTORY[0])
}

pub struct WeatherDay {
    pub day: &'static str,
    pub temperature: f64,
    pub rainfall: f64,
}

pub struct RegionWeatherHistory {
    pub region: &'static str,
    pub days: &'static [WeatherDay],
}

pub static WEATHER_HISTORY: &[RegionWeatherHistory] = &[
    RegionWeatherHistory {
        region: "nairobi",
        days: &[
            WeatherDay { day: "Mon", temperature: 21.5, rainfall: 2.0 },
            WeatherDay { day: "Tue", temperature: 22.0, rainfall: 0.0 },
            WeatherDay { day: "Wed", temperature: 23.1, rainfall: 5.5 },
            WeatherDay { day: "Thu", temperature: 21.8, rainfall: 8.0 },
            WeatherDay { day: "Fri", temperature: 20.9, rainfall: 3.2 },
            WeatherDay { day: "Sat", temperature: 22.4, rainfall: 0.0 },
            WeatherDay { day: "Sun", temperature: 22.9, rainfall: 1.1 },
        ],
    },
    RegionWeatherHistory {
        region: "kisumu",
        days: &[
            WeatherDay { day: "Mon", temperature: 25.8, rainfall: 6.0 },
            WeatherDay { day: "Tue", temperature: 26.3, rainfall: 12.4 },
            WeatherDay { day: "Wed", temperature: 27.0, rainfall: 9.8 },
            WeatherDay { day: "Thu", temperature: 26.1, rainfall: 4.0 },
            WeatherDay { day: "Fri", temperature: 25.5, rainfall: 7.7 },
            WeatherDay { day: "Sat", temperature: 26.8, rainfall: 0.0 },
            WeatherDay { day: "Sun", temperature: 26.2, rainfall: 2.3 },
        ],
    },
];

pub fn weather_history(region: &str) -> &'static RegionWeatherHistory {
    let needle = region.trim().to_lowercase();
    WEATHER_HISTORY
        .iter()
        .find(|h| h.region == needle)
        .unwrap_or(&WEATHER_HISTORY[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_crop_falls_back_to_maize_series() {
        assert_eq!(yield_history("quinoa").crop, "maize");
        assert_eq!(yield_history("Beans").crop, "beans");
    }

    #[test]
    fn unknown_region_falls_back_to_nairobi_series() {
        assert_eq!(weather_history("atlantis").region, "nairobi");
        assert_eq!(weather_history(" Kisumu ").region, "kisumu");
    }

    #[test]
    fn series_have_expected_lengths() {
        for h in YIELD_HISTORY {
            assert_eq!(h.points.len(), 6);
        }
        for h in WEATHER_HISTORY {
            assert_eq!(h.days.len(), 7);
        }
    }
}
