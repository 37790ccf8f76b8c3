#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("path contains no rider-visible movement between origin and destination")]
    TrivialPath,
    #[error("path must contain at least two states, found {0}")]
    PathTooShort(usize),
    #[error("no itinerary could be generated from {0} candidate path(s)")]
    NoItineraries(usize),
}
