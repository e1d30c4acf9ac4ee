//! Real Las Vegas / Henderson points of interest for itinerary fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use trip_planner::model::Waypoint;

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    /// Waypoint with a slug of the name as its id.
    pub fn waypoint(&self) -> Waypoint {
        Waypoint::new(self.name, self.lat, self.lng).with_id(slug(self.name))
    }
}

/// Lowercase, dash-separated id for a place name.
pub fn slug(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c == ' ' {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

/// Hotels along the Strip, good trip start/end points.
pub const HOTELS: &[Location] = &[
    Location::new("Wynn Las Vegas", 36.1263781, -115.1658180),
    Location::new("MGM Grand", 36.1023654, -115.1688720),
    Location::new("Bellagio", 36.1126, -115.1767),
    Location::new("Caesars Palace", 36.1162, -115.1745),
];

/// Sights and restaurants up and down the Strip.
pub const STRIP_STOPS: &[Location] = &[
    Location::new("Hard Rock Cafe", 36.1041592, -115.1722166),
    Location::new("Sinatra", 36.1300035, -115.1654850),
    Location::new("Brooklyn Bowl", 36.1175388, -115.1695094),
    Location::new("Gordon Ramsay BurGR", 36.1107195, -115.1720818),
    Location::new("Spago by Wolfgang Puck", 36.1139368, -115.1741462),
    Location::new("Bacchanal Buffet", 36.1159581, -115.1762929),
    Location::new("Grand Lux Cafe", 36.1216416, -115.1685024),
    Location::new("Charlie Palmer Steak", 36.0910624, -115.1743364),
    Location::new("Strip Steak", 36.0908722, -115.1776176),
    Location::new("mon ami Gabi", 36.1128554, -115.1724137),
];

/// Stops spread across the wider metro area.
pub const METRO_STOPS: &[Location] = &[
    Location::new("Rivas Mexican Grill North", 36.1450055, -115.0482587),
    Location::new("Beers and Bets", 36.1428945, -115.1573836),
    Location::new("Bootlegger Bistro", 36.0492047, -115.1715744),
    Location::new("Green Valley Ranch Area", 36.0308, -115.0825),
    Location::new("Sunset Station Area", 36.0614, -115.0631),
    Location::new("Longhorn Casino", 36.1070664, -115.0591256),
    Location::new("I Love Sushi Henderson", 35.9916660, -115.1028343),
    Location::new("Islander's Grill", 36.0335058, -114.9856162),
    Location::new("Pei Wei Town Square", 36.0810469, -115.1472694),
    Location::new("Hello Tokyo", 36.1161627, -115.0902096),
];

/// Hotel start, strip stops, then back to a second hotel.
pub fn strip_day_trip() -> Vec<Waypoint> {
    let mut waypoints = vec![HOTELS[0].waypoint()];
    waypoints.extend(STRIP_STOPS.iter().map(Location::waypoint));
    waypoints.push(HOTELS[1].waypoint());
    waypoints
}

/// Hotel start and end around a tour of the whole metro area.
pub fn metro_tour() -> Vec<Waypoint> {
    let mut waypoints = vec![HOTELS[2].waypoint()];
    waypoints.extend(METRO_STOPS.iter().map(Location::waypoint));
    waypoints.push(HOTELS[3].waypoint());
    waypoints
}
