use chrono::NaiveDate;
use serde::Deserialize;

/// Condition as reported by the provider. Passed through untouched.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Condition {
    pub text: String,

    /// Protocol-relative path, e.g. `//cdn.weatherapi.com/weather/64x64/day/116.png`
    pub icon: String,

    pub code: u32,
}

impl Condition {
    pub fn icon_url(&self) -> String {
        format!("https:{}", self.icon)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: Option<NaiveDate>,
    pub condition: Condition,
    pub avg_temp_c: f32,
}

/// Flattened current conditions plus the next three forecast days.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedWeather {
    pub name: String,
    pub region: String,
    pub country: String,
    pub condition: Condition,
    pub humidity: u32,
    pub temp_c: f32,
    pub forecast: [ForecastDay; 3],
}

#[test]
fn test_icon_url() {
    let condition = Condition {
        text: "Sunny".to_string(),
        icon: "//cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
        code: 1000,
    };
    assert_eq!(
        condition.icon_url(),
        "https://cdn.weatherapi.com/weather/64x64/day/113.png"
    );
}
