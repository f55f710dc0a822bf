use reqwest::blocking::{Client, Request};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::weather::{ForecastDay, SimplifiedWeather};

pub const BASE_URL: &str = "https://api.weatherapi.com";

const FORECAST_DAYS: &str = "5";

/// Anything that can turn a city name into a forecast, or nothing.
pub trait WeatherSource {
    fn fetch(&self, city: &str) -> Option<SimplifiedWeather>;
}

pub mod response {
    use super::*;

    use chrono::NaiveDate;

    use crate::weather::Condition;

    #[derive(Deserialize, Debug)]
    pub struct ForecastResponse {
        pub location: Location,
        pub current: Current,
        pub forecast: Forecast,
    }

    #[derive(Deserialize, Debug)]
    pub struct Location {
        pub name: String,
        pub region: String,
        pub country: String,
    }

    #[derive(Deserialize, Debug)]
    pub struct Current {
        pub condition: Condition,
        pub humidity: u32,
        pub temp_c: f32,
    }

    #[derive(Deserialize, Debug)]
    pub struct Forecast {
        pub forecastday: Vec<ForecastDayEntry>,
    }

    #[derive(Deserialize, Debug)]
    pub struct ForecastDayEntry {
        #[serde(default)]
        pub date: Option<NaiveDate>,
        pub day: Day,
    }

    #[derive(Deserialize, Debug)]
    pub struct Day {
        pub condition: Condition,
        pub avgtemp_c: f32,
    }

    /// Body weatherapi.com sends alongside 4xx statuses.
    #[derive(Deserialize, Debug)]
    pub struct ApiError {
        pub error: ApiErrorDetail,
    }

    #[derive(Deserialize, Debug)]
    pub struct ApiErrorDetail {
        pub code: u32,
        pub message: String,
    }
}

use response::{ApiError, ForecastDayEntry, ForecastResponse};

pub struct WeatherClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(api_key: String) -> Result<Self, Error> {
        let http = Client::builder().user_agent("skyview").build()?;
        Ok(Self {
            http,
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn request(&self, city: &str) -> Result<Request, Error> {
        let url = format!("{}/v1/forecast.json", self.base_url);
        let request = self
            .http
            .get(url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", FORECAST_DAYS),
            ])
            .build()?;
        Ok(request)
    }

    pub fn try_fetch(&self, city: &str) -> Result<SimplifiedWeather, Error> {
        info!("Fetching forecast for {city}");
        let response = self.http.execute(self.request(city)?)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text()?;
            return Err(Error::Provider {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        let body: ForecastResponse = response.json()?;
        debug!("Forecast received for {}", body.location.name);
        simplify(body)
    }
}

impl WeatherSource for WeatherClient {
    fn fetch(&self, city: &str) -> Option<SimplifiedWeather> {
        match self.try_fetch(city) {
            Ok(weather) => Some(weather),
            Err(err) => {
                error!("Failed to fetch weather for {city}: {err}");
                None
            }
        }
    }
}

/// Flatten the provider response. Days are taken by position, not by date.
pub fn simplify(response: ForecastResponse) -> Result<SimplifiedWeather, Error> {
    let ForecastResponse {
        location,
        current,
        forecast,
    } = response;

    let mut days = forecast.forecastday.into_iter().map(forecast_day);
    let mut next = |idx| days.next().ok_or(Error::MissingForecastDay(idx));
    let forecast = [next(0)?, next(1)?, next(2)?];

    Ok(SimplifiedWeather {
        name: location.name,
        region: location.region,
        country: location.country,
        condition: current.condition,
        humidity: current.humidity,
        temp_c: current.temp_c,
        forecast,
    })
}

fn forecast_day(entry: ForecastDayEntry) -> ForecastDay {
    ForecastDay {
        date: entry.date,
        condition: entry.day.condition,
        avg_temp_c: entry.day.avgtemp_c,
    }
}

fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => format!("{} (code {})", api_error.error.message, api_error.error.code),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
