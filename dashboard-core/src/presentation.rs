//! Display hints for weather conditions.

use serde::Serialize;

/// Weather category code as reported by the backend (`weather` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WeatherCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Haze,
    /// Any code without a dedicated mapping.
    Other,
}

/// Background gradient identifier for the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gradient {
    Sky,
    Overcast,
    Night,
    Storm,
    Snow,
    Mist,
}

impl Gradient {
    pub const DEFAULT: Gradient = Gradient::Overcast;

    pub fn as_str(&self) -> &'static str {
        match self {
            Gradient::Sky => "sky",
            Gradient::Overcast => "overcast",
            Gradient::Night => "night",
            Gradient::Storm => "storm",
            Gradient::Snow => "snow",
            Gradient::Mist => "mist",
        }
    }
}

impl std::fmt::Display for Gradient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_ICON: &str = "🌤️";

impl WeatherCategory {
    /// Case-sensitive, matching the codes the backend forwards verbatim.
    pub fn from_code(code: &str) -> Self {
        match code {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            "Haze" => Self::Haze,
            _ => Self::Other,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::Clouds => "☁️",
            Self::Rain => "🌧️",
            Self::Drizzle => "🌦️",
            Self::Thunderstorm => "⛈️",
            Self::Snow => "❄️",
            Self::Mist | Self::Fog | Self::Haze => "🌫️",
            Self::Other => DEFAULT_ICON,
        }
    }

    pub fn gradient(&self) -> Gradient {
        match self {
            Self::Clear => Gradient::Sky,
            Self::Clouds => Gradient::Overcast,
            Self::Rain | Self::Drizzle => Gradient::Night,
            Self::Thunderstorm => Gradient::Storm,
            Self::Snow => Gradient::Snow,
            Self::Mist | Self::Fog => Gradient::Mist,
            Self::Haze | Self::Other => Gradient::DEFAULT,
        }
    }

    pub fn hint(&self) -> DisplayHint {
        DisplayHint { icon: self.icon(), gradient: self.gradient() }
    }
}

/// Icon and background chosen for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayHint {
    pub icon: &'static str,
    pub gradient: Gradient,
}

/// 16-point compass label for a wind direction in degrees.
pub fn compass_point(degrees: u16) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];

    // Each sector is 22.5°, centred on its point.
    let tenths = u32::from(degrees % 360) * 10;
    let index = ((tenths + 112) / 225) % 16;
    POINTS[index as usize]
}
