use rand::Rng;

use crate::store::Factor;

/// Base yield and variance per crop, in tons per hectare. Placeholder numbers:
/// any generator staying inside base ± variance satisfies the interface.
pub struct CropBand {
    pub name: &'static str,
    pub base: f64,
    pub variance: f64,
}

pub const DEFAULT_CROP: &str = "maize";

pub static CROP_BANDS: &[CropBand] = &[
    CropBand { name: "maize", base: 5.2, variance: 1.5 },
    CropBand { name: "beans", base: 1.8, variance: 0.6 },
    CropBand { name: "wheat", base: 3.4, variance: 1.0 },
    CropBand { name: "rice", base: 4.5, variance: 1.2 },
    CropBand { name: "potatoes", base: 18.0, variance: 5.0 },
    CropBand { name: "tomatoes", base: 25.0, variance: 8.0 },
];

/// Look up the band for a crop; unknown crops fall back to the maize band.
pub fn crop_band(crop: &str) -> &'static CropBand {
    let needle = crop.trim().to_lowercase();
    CROP_BANDS
        .iter()
        .find(|b| b.name == needle)
        .unwrap_or_else(|| {
            CROP_BANDS
                .iter()
                .find(|b| b.name == DEFAULT_CROP)
                .expect("default crop band present")
        })
}

#[derive(Debug)]
pub struct Prediction {
    pub yield_estimate: f64,
    pub confidence: f64,
    pub factors: Vec<Factor>,
    pub recommendations: Vec<String>,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Generate a prediction for the crop. There is no model behind this; the
/// contract is only that the outputs stay within the documented ranges.
pub fn generate(crop: &str) -> Prediction {
    let band = crop_band(crop);
    let mut rng = rand::thread_rng();

    let raw = rng.gen_range(band.base - band.variance..=band.base + band.variance);
    let yield_estimate = round2(raw).clamp(band.base - band.variance, band.base + band.variance);
    let confidence = round1(rng.gen_range(85.0..=100.0));

    let factors = vec![
        Factor {
            factor: "Soil Quality".into(),
            impact: "positive".into(),
            score: rng.gen_range(70..=95),
        },
        Factor {
            factor: "Rainfall Pattern".into(),
            impact: "positive".into(),
            score: rng.gen_range(60..=90),
        },
        Factor {
            factor: "Temperature Trend".into(),
            impact: "neutral".into(),
            score: rng.gen_range(55..=85),
        },
        Factor {
            factor: "Pest Risk".into(),
            impact: "negative".into(),
            score: rng.gen_range(10..=40),
        },
    ];

    let crop_name = band.name;
    let recommendations = vec![
        format!("Plant {crop_name} early in the season to catch the long rains."),
        format!("Apply a nitrogen-rich fertilizer when the {crop_name} reaches knee height."),
        format!("Scout your {crop_name} field weekly for early signs of pest damage."),
        format!("Mulch between {crop_name} rows to retain soil moisture."),
        format!("Rotate {crop_name} with legumes next season to restore soil nitrogen."),
    ];

    Prediction {
        yield_estimate,
        confidence,
        factors,
        recommendations,
    }
}
