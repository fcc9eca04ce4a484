//! Plain-text panels for the terminal.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use dashboard_core::{
    HistoryEntry, WeatherSnapshot,
    format::{relative_label, round_half_up, temperature_label},
    presentation::compass_point,
};

pub fn snapshot(weather: &WeatherSnapshot) -> String {
    let hint = weather.category().hint();
    let mut out = String::new();

    let _ = writeln!(out, "{}  {}, {}", hint.icon, weather.city, weather.country);
    let _ = writeln!(out, "   📍 {:.2}°, {:.2}°", weather.latitude, weather.longitude);
    let _ = writeln!(out);
    let _ = writeln!(out, "   {}  {}", temperature_label(weather.temperature), weather.description);
    let _ = writeln!(out, "   Feels like {}", temperature_label(weather.feels_like));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "   🌡️  Min / Max    {}° / {}°",
        round_half_up(weather.temp_min),
        round_half_up(weather.temp_max)
    );
    let _ = writeln!(out, "   💧 Humidity     {}%", weather.humidity);
    let _ = writeln!(
        out,
        "   💨 Wind         {} m/s {}",
        weather.wind_speed,
        compass_point(weather.wind_direction)
    );
    let _ = writeln!(out, "   🔽 Pressure     {} hPa", weather.pressure);
    let _ = writeln!(out, "   ☁️  Cloudiness   {}%", weather.cloudiness);
    let _ = writeln!(out, "   👁️  Visibility   {:.1} km", weather.visibility);
    let _ = writeln!(out);
    let _ = write!(out, "   🌅 {}   🌇 {}", weather.sunrise, weather.sunset);

    out
}

pub fn history(entries: &[HistoryEntry], now: DateTime<Utc>) -> String {
    if entries.is_empty() {
        return "📜 Recent Searches\n   No search history yet\n   Start by searching for a city above"
            .to_string();
    }

    let now = now.with_timezone(&Local);
    let mut out = String::from("📜 Recent Searches");

    for entry in entries {
        let when = relative_label(&entry.timestamp.with_timezone(&Local), &now);
        let _ = write!(
            out,
            "\n   {}  {}, {}  ({})\n      💧 {}%  💨 {} m/s  {}",
            temperature_label(entry.temperature),
            entry.city_name,
            entry.country,
            when,
            entry.humidity,
            entry.wind_speed,
            entry.weather_description,
        );
    }

    out
}

/// One-line label for picking an entry from a menu.
pub fn history_choice(entry: &HistoryEntry, now: DateTime<Utc>) -> String {
    let now = now.with_timezone(&Local);
    format!(
        "{}, {}  {}  ({})",
        entry.city_name,
        entry.country,
        temperature_label(entry.temperature),
        relative_label(&entry.timestamp.with_timezone(&Local), &now)
    )
}

pub fn error_banner(message: &str) -> String {
    format!("⚠️  {message}")
}
