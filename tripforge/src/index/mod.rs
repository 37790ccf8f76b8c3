use crate::model::alert::AlertPatch;
use crate::model::itinerary::Fare;
use crate::model::transit::{Agency, AgencyId, Route, RouteId, Stop, StopId, Trip, TripId, TripPattern};
use crate::model::traversal_state::TraversedPath;
use std::collections::HashMap;

/// read-only view of the transit data and alert registries. callers supply
/// a stable view for the duration of one planning response; conversion of
/// independent paths may read it concurrently.
pub trait TransitIndex: Sync {
    fn stop(&self, id: &StopId) -> Option<&Stop>;
    fn trip(&self, id: &TripId) -> Option<&Trip>;
    fn route(&self, id: &RouteId) -> Option<&Route>;
    fn agency(&self, id: &AgencyId) -> Option<&Agency>;
    fn pattern_for_trip(&self, id: &TripId) -> Option<&TripPattern>;

    fn alerts_for_stop(&self, id: &StopId) -> Vec<&AlertPatch>;
    fn alerts_for_stop_and_route(&self, stop: &StopId, route: &RouteId) -> Vec<&AlertPatch>;
    fn alerts_for_stop_and_trip(&self, stop: &StopId, trip: &TripId) -> Vec<&AlertPatch>;
    fn alerts_for_trip(&self, id: &TripId) -> Vec<&AlertPatch>;
    fn alerts_for_route(&self, id: &RouteId) -> Vec<&AlertPatch>;
    fn alerts_for_agency(&self, id: &AgencyId) -> Vec<&AlertPatch>;
}

/// external fare computation. only the call contract is used here: a full
/// path goes in, a fare summary comes out.
pub trait FareService: Sync {
    fn fare(&self, path: &TraversedPath) -> Option<Fare>;
}

/// hash-map backed index, suitable for tests and small deployments.
#[derive(Default)]
pub struct MemoryTransitIndex {
    stops: HashMap<StopId, Stop>,
    trips: HashMap<TripId, Trip>,
    routes: HashMap<RouteId, Route>,
    agencies: HashMap<AgencyId, Agency>,
    patterns: HashMap<TripId, TripPattern>,
    stop_alerts: HashMap<StopId, Vec<AlertPatch>>,
    stop_route_alerts: HashMap<(StopId, RouteId), Vec<AlertPatch>>,
    stop_trip_alerts: HashMap<(StopId, TripId), Vec<AlertPatch>>,
    trip_alerts: HashMap<TripId, Vec<AlertPatch>>,
    route_alerts: HashMap<RouteId, Vec<AlertPatch>>,
    agency_alerts: HashMap<AgencyId, Vec<AlertPatch>>,
}

impl MemoryTransitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, stop: Stop) {
        self.stops.insert(stop.id.clone(), stop);
    }

    pub fn add_trip(&mut self, trip: Trip) {
        self.trips.insert(trip.id.clone(), trip);
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.insert(route.id.clone(), route);
    }

    pub fn add_agency(&mut self, agency: Agency) {
        self.agencies.insert(agency.id.clone(), agency);
    }

    pub fn add_pattern(&mut self, trip: TripId, pattern: TripPattern) {
        self.patterns.insert(trip, pattern);
    }

    pub fn add_stop_alert(&mut self, stop: StopId, patch: AlertPatch) {
        self.stop_alerts.entry(stop).or_default().push(patch);
    }

    pub fn add_stop_route_alert(&mut self, stop: StopId, route: RouteId, patch: AlertPatch) {
        self.stop_route_alerts
            .entry((stop, route))
            .or_default()
            .push(patch);
    }

    pub fn add_stop_trip_alert(&mut self, stop: StopId, trip: TripId, patch: AlertPatch) {
        self.stop_trip_alerts
            .entry((stop, trip))
            .or_default()
            .push(patch);
    }

    pub fn add_trip_alert(&mut self, trip: TripId, patch: AlertPatch) {
        self.trip_alerts.entry(trip).or_default().push(patch);
    }

    pub fn add_route_alert(&mut self, route: RouteId, patch: AlertPatch) {
        self.route_alerts.entry(route).or_default().push(patch);
    }

    pub fn add_agency_alert(&mut self, agency: AgencyId, patch: AlertPatch) {
        self.agency_alerts.entry(agency).or_default().push(patch);
    }
}

fn collect<'a, K, V>(map: &'a HashMap<K, Vec<V>>, key: &K) -> Vec<&'a V>
where
    K: std::hash::Hash + Eq,
{
    map.get(key).map(|v| v.iter().collect()).unwrap_or_default()
}

impl TransitIndex for MemoryTransitIndex {
    fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.get(id)
    }

    fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    fn agency(&self, id: &AgencyId) -> Option<&Agency> {
        self.agencies.get(id)
    }

    fn pattern_for_trip(&self, id: &TripId) -> Option<&TripPattern> {
        self.patterns.get(id)
    }

    fn alerts_for_stop(&self, id: &StopId) -> Vec<&AlertPatch> {
        collect(&self.stop_alerts, id)
    }

    fn alerts_for_stop_and_route(&self, stop: &StopId, route: &RouteId) -> Vec<&AlertPatch> {
        collect(&self.stop_route_alerts, &(stop.clone(), route.clone()))
    }

    fn alerts_for_stop_and_trip(&self, stop: &StopId, trip: &TripId) -> Vec<&AlertPatch> {
        collect(&self.stop_trip_alerts, &(stop.clone(), trip.clone()))
    }

    fn alerts_for_trip(&self, id: &TripId) -> Vec<&AlertPatch> {
        collect(&self.trip_alerts, id)
    }

    fn alerts_for_route(&self, id: &RouteId) -> Vec<&AlertPatch> {
        collect(&self.route_alerts, id)
    }

    fn alerts_for_agency(&self, id: &AgencyId) -> Vec<&AlertPatch> {
        collect(&self.agency_alerts, id)
    }
}
