use std::sync::Arc;

use log::{debug, warn};

use crate::{
    data::{Dataset, LoadError},
    projection::RegionKey,
};

/// Progress of the current dataset.
#[derive(Clone, Debug, Default)]
pub enum LoadState {
    #[default]
    Empty,
    Loading,
    Ready(Arc<Dataset>),
    Failed(Arc<LoadError>),
}

impl LoadState {
    pub fn is_ready(&self) -> bool { matches!(self, LoadState::Ready(_)) }
}

/// Issued by [`AppState::begin_load`]; only the newest ticket may complete a load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// What [`AppState::finish_load`] did with a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was started after this ticket; the result was dropped.
    Superseded,
    Failed,
}

/// Describes one mutation, passed to every observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateChange {
    SelectedCity(Option<String>),
    CityList,
    GeoData,
}

/// Handle returned by [`AppState::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StateChange, &AppState)>;

/// Shared viewer state: selected city, known cities and the loaded dataset.
///
/// Owned by the caller and passed by reference; there is no global instance.
#[derive(Default)]
pub struct AppState {
    selected_city: Option<String>,
    city_list: Vec<String>,
    load_state: LoadState,
    generation: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("selected_city", &self.selected_city)
            .field("city_list", &self.city_list)
            .field("load_state", &self.load_state)
            .field("generation", &self.generation)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl AppState {
    pub fn new() -> Self { Self::default() }

    pub fn selected_city(&self) -> Option<&str> { self.selected_city.as_deref() }

    pub fn city_list(&self) -> &[String] { &self.city_list }

    pub fn load_state(&self) -> &LoadState { &self.load_state }

    /// The loaded dataset, if the last load succeeded.
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        match &self.load_state {
            LoadState::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    /// Zoomed while a city is selected.
    pub fn region_key(&self) -> RegionKey {
        if self.selected_city.is_some() { RegionKey::Zoomed } else { RegionKey::Full }
    }

    /// Select a city from the city list, or clear the selection with `None`.
    /// Returns whether the selection changed. Unknown cities are ignored.
    pub fn select_city(&mut self, city: Option<&str>) -> bool {
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        if let Some(name) = city
            && !self.city_list.iter().any(|c| c == name)
        {
            warn!("[state] Ignoring selection of unknown city {name:?}");
            return false;
        }
        if self.selected_city.as_deref() == city { return false }

        self.selected_city = city.map(str::to_string);
        self.notify(StateChange::SelectedCity(self.selected_city.clone()));
        true
    }

    /// Start a new load. Any load still in flight becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        self.notify(StateChange::GeoData);
        LoadTicket(self.generation)
    }

    /// Complete the load identified by `ticket`. Results of superseded loads are dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Dataset, LoadError>) -> LoadOutcome {
        if ticket.0 != self.generation {
            debug!("[state] Dropping result of load {} (current is {})", ticket.0, self.generation);
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(dataset) => {
                let cities = dataset.cities().to_vec();
                let cities_changed = cities != self.city_list;
                self.load_state = LoadState::Ready(Arc::new(dataset));
                self.city_list = cities;
                let selection_dropped = self.selected_city.as_ref()
                    .is_some_and(|city| !self.city_list.contains(city));
                if selection_dropped { self.selected_city = None }

                // Observers run once the whole update is visible.
                self.notify(StateChange::GeoData);
                if cities_changed { self.notify(StateChange::CityList) }
                if selection_dropped { self.notify(StateChange::SelectedCity(None)) }
                LoadOutcome::Applied
            }
            Err(e) => {
                warn!("[state] Load failed: {e}");
                self.load_state = LoadState::Failed(Arc::new(e));
                self.notify(StateChange::GeoData);
                LoadOutcome::Failed
            }
        }
    }

    /// Drop the dataset, city list and selection. In-flight loads become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.load_state = LoadState::Empty;
        let had_cities = !self.city_list.is_empty();
        self.city_list.clear();
        let had_selection = self.selected_city.take().is_some();

        self.notify(StateChange::GeoData);
        if had_cities { self.notify(StateChange::CityList) }
        if had_selection { self.notify(StateChange::SelectedCity(None)) }
    }

    /// Register an observer called after every mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&StateChange, &AppState) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: StateChange) {
        // Observers see `&self`, so the list is moved out while they run.
        let mut observers = std::mem::take(&mut self.observers);
        for (_, observer) in observers.iter_mut() {
            observer(&change, self);
        }
        self.observers = observers;
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{data::FeatureCollection, testing::collection};
    use serde_json::json;

    fn dataset(cities: &[&str]) -> Dataset {
        let features: FeatureCollection = collection(cities.iter().map(|c| json!({"city": c})).collect());
        Dataset::from_parts(&features, &[], "city")
    }

    fn recorder(state: &mut AppState) -> Rc<RefCell<Vec<StateChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        state.subscribe(move |change, _| sink.borrow_mut().push(change.clone()));
        log
    }

    #[test]
    fn successful_load_populates_cities() {
        let mut state = AppState::new();
        assert!(matches!(state.load_state(), LoadState::Empty));

        let ticket = state.begin_load();
        assert!(matches!(state.load_state(), LoadState::Loading));
        assert_eq!(state.finish_load(ticket, Ok(dataset(&["B", "A", "B"]))), LoadOutcome::Applied);

        assert!(state.load_state().is_ready());
        assert_eq!(state.city_list(), ["A", "B"]);
        assert_eq!(state.dataset().unwrap().features().len(), 3);
    }

    #[test]
    fn last_load_wins() {
        let mut state = AppState::new();
        let first = state.begin_load();
        let second = state.begin_load();

        assert_eq!(state.finish_load(second, Ok(dataset(&["New"]))), LoadOutcome::Applied);
        assert_eq!(state.finish_load(first, Ok(dataset(&["Old"]))), LoadOutcome::Superseded);
        assert_eq!(state.city_list(), ["New"]);
    }

    #[test]
    fn failed_load_is_recorded() {
        let mut state = AppState::new();
        let ticket = state.begin_load();
        let err = LoadError::Network { location: "http://x".into(), message: "timeout".into() };
        assert_eq!(state.finish_load(ticket, Err(err)), LoadOutcome::Failed);
        assert!(matches!(state.load_state(), LoadState::Failed(e) if e.location() == "http://x"));
        assert!(state.dataset().is_none());
    }

    #[test]
    fn selection_drives_region_key() {
        let mut state = AppState::new();
        let ticket = state.begin_load();
        state.finish_load(ticket, Ok(dataset(&["Springfield"])));

        assert_eq!(state.region_key(), RegionKey::Full);
        assert!(state.select_city(Some("Springfield")));
        assert_eq!(state.region_key(), RegionKey::Zoomed);
        assert!(!state.select_city(Some("Atlantis")));
        assert_eq!(state.selected_city(), Some("Springfield"));
        assert!(state.select_city(None));
        assert_eq!(state.region_key(), RegionKey::Full);
    }

    #[test]
    fn observers_see_each_mutation() {
        let mut state = AppState::new();
        let log = recorder(&mut state);

        let ticket = state.begin_load();
        state.finish_load(ticket, Ok(dataset(&["A"])));
        state.select_city(Some("A"));
        state.select_city(Some("A"));
        state.clear();

        assert_eq!(*log.borrow(), vec![
            StateChange::GeoData,
            StateChange::GeoData,
            StateChange::CityList,
            StateChange::SelectedCity(Some("A".into())),
            StateChange::GeoData,
            StateChange::CityList,
            StateChange::SelectedCity(None),
        ]);
    }

    #[test]
    fn observers_read_updated_state() {
        let mut state = AppState::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        state.subscribe(move |change, state| {
            if let StateChange::CityList = change {
                *sink.borrow_mut() = Some(state.city_list().to_vec());
            }
        });
        let ticket = state.begin_load();
        state.finish_load(ticket, Ok(dataset(&["X", "Y"])));
        assert_eq!(seen.borrow().as_deref(), Some(&["X".to_string(), "Y".to_string()][..]));
    }

    #[test]
    fn data_observers_see_the_finished_update() {
        let mut state = AppState::new();
        let t = state.begin_load();
        state.finish_load(t, Ok(dataset(&["A", "B"])));
        state.select_city(Some("B"));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        state.subscribe(move |change, state| {
            if let StateChange::GeoData = change {
                sink.borrow_mut().push((state.city_list().to_vec(), state.selected_city().map(str::to_string)));
            }
        });

        let t = state.begin_load();
        state.finish_load(t, Ok(dataset(&["C"])));
        state.clear();

        assert_eq!(*seen.borrow(), vec![
            (vec!["A".to_string(), "B".to_string()], Some("B".to_string())),
            (vec!["C".to_string()], None),
            (vec![], None),
        ]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut state = AppState::new();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = state.subscribe(move |_, _| *sink.borrow_mut() += 1);

        state.begin_load();
        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.begin_load();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn reload_drops_selection_of_vanished_city() {
        let mut state = AppState::new();
        let t = state.begin_load();
        state.finish_load(t, Ok(dataset(&["A", "B"])));
        state.select_city(Some("B"));

        let t = state.begin_load();
        state.finish_load(t, Ok(dataset(&["A"])));
        assert_eq!(state.selected_city(), None);
    }

    #[test]
    fn clear_invalidates_pending_load() {
        let mut state = AppState::new();
        let t = state.begin_load();
        state.clear();
        assert_eq!(state.finish_load(t, Ok(dataset(&["A"]))), LoadOutcome::Superseded);
        assert!(matches!(state.load_state(), LoadState::Empty));
    }
}
