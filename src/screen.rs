use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::background::Background;
use crate::weather::{ForecastDay, SimplifiedWeather};

/// A fetch the screen wants run. `id` orders requests so late replies can be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u64,
    pub city: String,
}

#[derive(Debug, Default)]
pub struct WeatherScreen {
    query: String,
    loading: bool,
    weather: Option<SimplifiedWeather>,
    background: Background,
    issued: u64,
}

impl WeatherScreen {
    pub fn new(default_city: &str) -> Self {
        Self {
            query: default_city.to_string(),
            ..Default::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn weather(&self) -> Option<&SimplifiedWeather> {
        self.weather.as_ref()
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn mount(&mut self) -> Option<FetchRequest> {
        self.search()
    }

    /// Blank queries are ignored. A new search supersedes any in flight.
    pub fn search(&mut self) -> Option<FetchRequest> {
        let city = self.query.trim();
        if city.is_empty() {
            return None;
        }
        let city = city.to_string();

        self.loading = true;
        self.issued += 1;
        Some(FetchRequest {
            id: self.issued,
            city,
        })
    }

    pub fn complete(&mut self, id: u64, result: Option<SimplifiedWeather>) {
        if id != self.issued {
            debug!("Dropping stale response {id}, latest is {}", self.issued);
            return;
        }

        if let Some(weather) = result {
            self.background = Background::from_condition(&weather.condition.text);
            self.weather = Some(weather);
        }
        self.loading = false;
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }
}

pub fn date_headline(today: NaiveDate) -> String {
    today.format("%A, %-d %b").to_string()
}

/// Provider dates win; without one, count forward from tomorrow.
pub fn forecast_label(today: NaiveDate, position: usize, day: &ForecastDay) -> String {
    let date = day
        .date
        .unwrap_or_else(|| today + Duration::days(position as i64 + 1));
    date.weekday().to_string()
}

/// Halves round up, so -2.5 shows as -2.
pub fn round_temp(temp_c: f32) -> i32 {
    (f64::from(temp_c) + 0.5).floor() as i32
}
