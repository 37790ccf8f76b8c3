use super::transit::StopId;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VertexType {
    Normal,
    Transit,
    Bikeshare,
    Bikepark,
    ParkAndRide,
}

/// how boarding or alighting happens at a place: at the scheduled stop, by
/// flagging the vehicle down, or at a deviated-route location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardAlightType {
    Default,
    FlagStop,
    Deviated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    /// unset on the itinerary's origin side.
    pub arrival: Option<DateTime<FixedOffset>>,
    /// unset on the itinerary's destination side.
    pub departure: Option<DateTime<FixedOffset>>,
    /// the name the rider originally asked for, if any.
    pub orig: Option<String>,
    pub stop_id: Option<StopId>,
    pub stop_code: Option<String>,
    pub platform_code: Option<String>,
    pub zone_id: Option<String>,
    /// position of this stop within the scheduled pattern. stored hop
    /// indices reference hop origins, so alighting ends are one higher.
    pub stop_index: Option<usize>,
    pub stop_sequence: Option<u32>,
    pub vertex_type: VertexType,
    pub board_alight_type: Option<BoardAlightType>,
    /// polyline-encoded flag-stop board/alight area, when the hop has one.
    pub flag_stop_area: Option<String>,
    pub bike_share_id: Option<String>,
    pub bike_park_id: Option<String>,
    pub car_park_id: Option<String>,
}

impl Place {
    pub fn new(name: String, lon: f64, lat: f64) -> Self {
        Self {
            name,
            lon,
            lat,
            arrival: None,
            departure: None,
            orig: None,
            stop_id: None,
            stop_code: None,
            platform_code: None,
            zone_id: None,
            stop_index: None,
            stop_sequence: None,
            vertex_type: VertexType::Normal,
            board_alight_type: None,
            flag_stop_area: None,
            bike_share_id: None,
            bike_park_id: None,
            car_park_id: None,
        }
    }
}
