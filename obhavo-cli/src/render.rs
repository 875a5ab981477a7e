//! Human-friendly rendering of snapshots and favorites.

use obhavo_core::{Controller, FavoriteCity, WeatherSnapshot};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// 8-point compass labels, one 45° sector each, starting at north.
const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

pub fn wind_direction(deg: u16) -> &'static str {
    let idx = (f64::from(deg) / 45.0).round() as usize % 8;
    COMPASS[idx]
}

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@4x.png")
}

/// Print whatever the last submit left in the controller: the offline
/// message if one was surfaced, then the snapshot.
pub fn search_result(controller: &Controller) {
    if let Some(message) = controller.error() {
        println!("! {message}");
    }
    if let Some(snap) = controller.snapshot() {
        snapshot(snap);
    }
}

pub fn snapshot(snap: &WeatherSnapshot) {
    println!();
    println!("{}, {} ({})", snap.name, snap.country, snap.description);
    println!("  {}°C, feels like {}°C", snap.temp_c, snap.feels_like_c);
    println!(
        "  humidity {}%, pressure {} hPa",
        snap.humidity_pct, snap.pressure_hpa
    );
    println!(
        "  wind {} m/s {}",
        snap.wind_speed_mps,
        wind_direction(snap.wind_deg)
    );
    println!(
        "  visibility {:.1} km",
        f64::from(snap.visibility_m) / 1000.0
    );
    println!("  sunrise {}, sunset {}", snap.sunrise, snap.sunset);
    println!("  icon: {}", icon_url(&snap.icon));
    println!();
}

pub fn favorite_line(favorite: &FavoriteCity) -> String {
    let mut line = format!("{}, {}", favorite.city_name, favorite.country);
    if !favorite.notes().is_empty() {
        line.push_str(" - ");
        line.push_str(favorite.notes());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn compass_sectors() {
        assert_eq!(wind_direction(0), "N");
        assert_eq!(wind_direction(22), "N");
        assert_eq!(wind_direction(23), "NE");
        assert_eq!(wind_direction(90), "E");
        assert_eq!(wind_direction(110), "E");
        assert_eq!(wind_direction(200), "S");
        assert_eq!(wind_direction(359), "N");
    }

    #[test]
    fn icon_urls_use_the_4x_assets() {
        assert_eq!(
            icon_url("50d"),
            "https://openweathermap.org/img/wn/50d@4x.png"
        );
    }

    #[test]
    fn favorite_lines_show_notes_when_present() {
        let mut favorite = FavoriteCity {
            id: 1,
            city_name: "Khiva".to_string(),
            country: "UZ".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        assert_eq!(favorite_line(&favorite), "Khiva, UZ");

        favorite.notes = Some("old town".to_string());
        assert_eq!(favorite_line(&favorite), "Khiva, UZ - old town");
    }
}
