use ratatui::style::Color;

const ASSET_DIR: &str = "assets/videos";

/// Looping background chosen from the current condition text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    Clear,
    Clouds,
    Rain,
    Mist,
    Thunder,
    Snow,
    #[default]
    Default,
}

impl Background {
    /// First keyword hit wins, checked in priority order.
    pub fn from_condition(text: &str) -> Self {
        let t = text.to_lowercase();
        if t.contains("thunder") {
            Background::Thunder
        } else if t.contains("rain") || t.contains("drizzle") {
            Background::Rain
        } else if t.contains("snow") {
            Background::Snow
        } else if t.contains("mist") || t.contains("fog") {
            Background::Mist
        } else if t.contains("cloud") {
            Background::Clouds
        } else if t.contains("clear") {
            Background::Clear
        } else {
            Background::Default
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Background::Clear => "clear",
            Background::Clouds => "clouds",
            Background::Rain => "rain",
            Background::Mist => "mist",
            Background::Thunder => "thunder",
            Background::Snow => "snow",
            Background::Default => "default",
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            Background::Clear | Background::Default => "clear-sky.webm",
            Background::Clouds => "scattered-clouds.webm",
            Background::Rain => "rain.webm",
            Background::Mist => "mist.webm",
            Background::Thunder => "thunderstorm.webm",
            Background::Snow => "snow.webm",
        }
    }

    pub fn asset(&self) -> String {
        format!("{ASSET_DIR}/{}", self.file_name())
    }

    /// Accent used for borders in place of the video.
    pub fn color(&self) -> Color {
        match self {
            Background::Clear => Color::Yellow,
            Background::Clouds => Color::Gray,
            Background::Rain => Color::Blue,
            Background::Mist => Color::DarkGray,
            Background::Thunder => Color::Magenta,
            Background::Snow => Color::White,
            Background::Default => Color::Cyan,
        }
    }
}
