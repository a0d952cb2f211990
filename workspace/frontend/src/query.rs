//! Keyed data fetching with a shared cache.
//!
//! Every query is identified by a [`QueryKey`]: path-like segments, request
//! parameters and the identity of the session that issued it, so results never
//! leak between users. Mutations invalidate key prefixes; mounted queries under
//! an invalidated prefix refetch. When several requests for one query overlap,
//! only the most recently started one may update the view.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::FetchState;

const ANONYMOUS: &str = "anon";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    segments: Vec<String>,
    params: Vec<(String, String)>,
    identity: String,
}

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            params: Vec::new(),
            identity: ANONYMOUS.to_string(),
        }
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    /// Scope the key to the session token; `None` is the anonymous identity
    pub fn for_token(mut self, token: Option<&str>) -> Self {
        self.identity = token.unwrap_or(ANONYMOUS).to_string();
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this key lies under `prefix`, regardless of params and identity
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.segments.len()
            && prefix.iter().zip(&self.segments).all(|(p, s)| *p == s.as_str())
    }
}

/// Hands out tickets so only the latest request's result is applied
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest == ticket
    }

    /// Make every outstanding ticket stale
    pub fn cancel(&mut self) {
        self.latest += 1;
    }
}

struct Subscription {
    id: u64,
    key: QueryKey,
    refetch: Callback<()>,
}

#[derive(Default)]
struct QueryStore {
    entries: HashMap<QueryKey, Rc<dyn Any>>,
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl QueryStore {
    fn get<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.entries.get(key)?.downcast_ref::<T>().cloned()
    }

    fn insert<T: 'static>(&mut self, key: QueryKey, value: T) {
        self.entries.insert(key, Rc::new(value));
    }

    fn subscribe(&mut self, key: QueryKey, refetch: Callback<()>) -> u64 {
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id: self.next_id,
            key,
            refetch,
        });
        self.next_id
    }

    fn unsubscribe(&mut self, id: u64) {
        self.subscriptions.retain(|s| s.id != id);
    }

    /// Drop cached entries under any prefix, returning the refetches to run
    fn invalidate(&mut self, prefixes: &[&[&str]]) -> Vec<Callback<()>> {
        let matches = |key: &QueryKey| prefixes.iter().any(|p| key.starts_with(p));
        self.entries.retain(|key, _| !matches(key));
        self.subscriptions
            .iter()
            .filter(|s| matches(&s.key))
            .map(|s| s.refetch.clone())
            .collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Shared query cache, provided once at the root of the app
#[derive(Clone, Default)]
pub struct QueryClient {
    store: Rc<RefCell<QueryStore>>,
}

impl PartialEq for QueryClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl QueryClient {
    pub fn cached<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.store.borrow().get(key)
    }

    pub fn invalidate(&self, prefixes: &[&[&str]]) {
        // Release the borrow before the refetches touch the store again
        let refetches = self.store.borrow_mut().invalidate(prefixes);
        log::debug!("Invalidated {:?}, refetching {} queries", prefixes, refetches.len());
        for refetch in refetches {
            refetch.emit(());
        }
    }

    pub fn clear(&self) {
        self.store.borrow_mut().clear();
    }

    fn store<T: 'static>(&self, key: QueryKey, value: T) {
        self.store.borrow_mut().insert(key, value);
    }

    /// Start a request for `key` and keep `refetch` registered for invalidation
    fn activate(&self, key: QueryKey, refetch: Callback<()>) -> u64 {
        refetch.emit(());
        self.store.borrow_mut().subscribe(key, refetch)
    }

    fn deactivate(&self, id: u64) {
        self.store.borrow_mut().unsubscribe(id);
    }
}

#[derive(Properties, PartialEq)]
pub struct QueryProviderProps {
    pub children: Children,
}

#[function_component(QueryProvider)]
pub fn query_provider(props: &QueryProviderProps) -> Html {
    let client = use_memo((), |_| QueryClient::default());

    html! {
        <ContextProvider<QueryClient> context={(*client).clone()}>
            { props.children.clone() }
        </ContextProvider<QueryClient>>
    }
}

#[hook]
pub fn use_query_client() -> QueryClient {
    use_context::<QueryClient>().unwrap_or_else(|| {
        log::warn!("use_query_client called outside QueryProvider");
        QueryClient::default()
    })
}

pub struct QueryHandle<T> {
    pub state: FetchState<T>,
    pub refetch: Callback<()>,
}

/// Fetch and cache the data for `key`.
///
/// Disabled queries stay in `NotStarted`. A cached value is shown straight
/// away and refreshed in the background.
#[hook]
pub fn use_query<T, F, Fut>(key: QueryKey, enabled: bool, fetch: F) -> QueryHandle<T>
where
    T: Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let client = use_query_client();
    let state = {
        let client = client.clone();
        let key = key.clone();
        use_state(move || match client.cached::<T>(&key) {
            Some(data) if enabled => FetchState::Success(data),
            _ => FetchState::NotStarted,
        })
    };
    let sequence = use_mut_ref(RequestSequence::default);

    // The latest closure and flags, read at fetch time
    let current = use_mut_ref(|| None::<(QueryKey, bool, Rc<F>)>);
    *current.borrow_mut() = Some((key.clone(), enabled, Rc::new(fetch)));

    let refetch = {
        let client = client.clone();
        let state = state.clone();
        let sequence = sequence.clone();
        let current = current.clone();
        Callback::from(move |_: ()| {
            let Some((key, enabled, fetch)) = current.borrow().clone() else {
                return;
            };
            if !enabled {
                sequence.borrow_mut().cancel();
                state.set(FetchState::NotStarted);
                return;
            }

            let ticket = sequence.borrow_mut().begin();
            match client.cached::<T>(&key) {
                Some(data) => state.set(FetchState::Success(data)),
                None => state.set(FetchState::Loading),
            }
            log::trace!("Query {:?} started (ticket {})", key.segments(), ticket);

            let request = fetch();
            let client = client.clone();
            let state = state.clone();
            let sequence = sequence.clone();
            spawn_local(async move {
                let result = request.await;
                if !sequence.borrow().is_latest(ticket) {
                    log::debug!("Discarding stale response for {:?}", key.segments());
                    return;
                }
                match result {
                    Ok(data) => {
                        client.store(key, data.clone());
                        state.set(FetchState::Success(data));
                    }
                    Err(e) => state.set(FetchState::Error(e)),
                }
            });
        })
    };

    {
        // Only unmount invalidates in-flight requests; a key change must not
        let sequence = sequence.clone();
        use_effect_with((), move |_| move || sequence.borrow_mut().cancel());
    }

    {
        let refetch = refetch.clone();
        use_effect_with((key, enabled), move |(key, _)| {
            let id = client.activate(key.clone(), refetch);
            move || client.deactivate(id)
        });
    }

    QueryHandle {
        state: (*state).clone(),
        refetch,
    }
}

pub struct MutationHandle<I, O> {
    pub state: FetchState<O>,
    pub run: Callback<I>,
}

impl<I, O> MutationHandle<I, O> {
    pub fn is_pending(&self) -> bool {
        self.state.is_loading()
    }
}

/// Run a write operation; on success the given key prefixes are invalidated
/// and `on_success` receives the result.
#[hook]
pub fn use_mutation<I, O, F, Fut>(
    mutate: F,
    invalidates: &'static [&'static [&'static str]],
    on_success: Callback<O>,
) -> MutationHandle<I, O>
where
    I: 'static,
    O: Clone + 'static,
    F: Fn(I) -> Fut + 'static,
    Fut: Future<Output = Result<O, String>> + 'static,
{
    let client = use_query_client();
    let state = use_state(|| FetchState::NotStarted);
    let sequence = use_mut_ref(RequestSequence::default);
    let current = use_mut_ref(|| None::<(Rc<F>, Callback<O>)>);
    *current.borrow_mut() = Some((Rc::new(mutate), on_success));

    let run = {
        let state = state.clone();
        Callback::from(move |input: I| {
            let Some((mutate, on_success)) = current.borrow().clone() else {
                return;
            };
            let ticket = sequence.borrow_mut().begin();
            state.set(FetchState::Loading);

            let request = mutate(input);
            let client = client.clone();
            let state = state.clone();
            let sequence = sequence.clone();
            spawn_local(async move {
                let result = request.await;
                if !sequence.borrow().is_latest(ticket) {
                    return;
                }
                match result {
                    Ok(output) => {
                        if !invalidates.is_empty() {
                            client.invalidate(invalidates);
                        }
                        state.set(FetchState::Success(output.clone()));
                        on_success.emit(output);
                    }
                    Err(e) => state.set(FetchState::Error(e)),
                }
            });
        })
    };

    MutationHandle {
        state: (*state).clone(),
        run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_key_identity_scoping() {
        let anonymous = QueryKey::new(["investors"]);
        let ana = QueryKey::new(["investors"]).for_token(Some("token-ana"));
        let bob = QueryKey::new(["investors"]).for_token(Some("token-bob"));

        assert_eq!(anonymous, QueryKey::new(["investors"]).for_token(None));
        assert_ne!(anonymous, ana);
        assert_ne!(ana, bob);
    }

    #[test]
    fn test_key_params_distinguish_queries() {
        let low = QueryKey::new(["investors", "greater"]).param("amount", 100);
        let high = QueryKey::new(["investors", "greater"]).param("amount", 15000);
        assert_ne!(low, high);
        assert_eq!(low, QueryKey::new(["investors", "greater"]).param("amount", "100"));
    }

    #[test]
    fn test_key_prefix_matching() {
        let state = QueryKey::new(["investors", "7", "state"]).for_token(Some("t"));
        assert!(state.starts_with(&[]));
        assert!(state.starts_with(&["investors"]));
        assert!(state.starts_with(&["investors", "7"]));
        assert!(!state.starts_with(&["investors", "8"]));
        assert!(!state.starts_with(&["investors", "7", "state", "extra"]));
        assert!(!QueryKey::new(["investorsX"]).starts_with(&["investors"]));
    }

    #[test]
    fn test_request_sequence_keeps_latest() {
        let mut sequence = RequestSequence::default();
        let first = sequence.begin();
        let second = sequence.begin();
        assert!(!sequence.is_latest(first));
        assert!(sequence.is_latest(second));

        sequence.cancel();
        assert!(!sequence.is_latest(second));
    }

    /// Refetch callback that takes a ticket per request, like `use_query`'s
    fn ticketing_refetch(
        sequence: &Rc<RefCell<RequestSequence>>,
        tickets: &Rc<RefCell<Vec<u64>>>,
    ) -> Callback<()> {
        let sequence = sequence.clone();
        let tickets = tickets.clone();
        Callback::from(move |_: ()| {
            let ticket = sequence.borrow_mut().begin();
            tickets.borrow_mut().push(ticket);
        })
    }

    #[test]
    fn test_key_change_keeps_new_request_current() {
        let client = QueryClient::default();
        let sequence = Rc::new(RefCell::new(RequestSequence::default()));
        let tickets = Rc::new(RefCell::new(Vec::new()));
        let refetch = ticketing_refetch(&sequence, &tickets);

        let default_key = QueryKey::new(["investors", "greater"]).param("amount", 15000);
        let first = client.activate(default_key, refetch.clone());

        // Same order as the effects: teardown of the old key, then the new key
        client.deactivate(first);
        let new_key = QueryKey::new(["investors", "greater"]).param("amount", 25000);
        client.activate(new_key, refetch.clone());

        let issued = tickets.borrow().clone();
        assert_eq!(issued.len(), 2);
        assert!(!sequence.borrow().is_latest(issued[0]));
        assert!(sequence.borrow().is_latest(issued[1]));
    }

    #[test]
    fn test_invalidation_refetches_current_key_only() {
        let client = QueryClient::default();
        let sequence = Rc::new(RefCell::new(RequestSequence::default()));
        let tickets = Rc::new(RefCell::new(Vec::new()));
        let refetch = ticketing_refetch(&sequence, &tickets);

        let old = client.activate(QueryKey::new(["investors", "state"]).param("id", 0), refetch.clone());
        client.deactivate(old);
        client.activate(QueryKey::new(["investors", "state"]).param("id", 7), refetch.clone());

        client.invalidate(&[&["investors"]]);

        let issued = tickets.borrow().clone();
        assert_eq!(issued.len(), 3, "one refetch for the live subscription");
        assert!(sequence.borrow().is_latest(issued[2]));
        assert!(!sequence.borrow().is_latest(issued[1]));
    }

    #[test]
    fn test_store_round_trips_typed_values() {
        let mut store = QueryStore::default();
        let key = QueryKey::new(["investors"]);
        store.insert(key.clone(), vec![1, 2, 3]);

        assert_eq!(store.get::<Vec<i32>>(&key), Some(vec![1, 2, 3]));
        assert_eq!(store.get::<String>(&key), None);
        assert_eq!(store.get::<Vec<i32>>(&QueryKey::new(["users"])), None);
    }

    #[test]
    fn test_invalidate_by_prefix() {
        let mut store = QueryStore::default();
        let list = QueryKey::new(["investors"]).for_token(Some("t"));
        let greater = QueryKey::new(["investors", "greater"]).param("amount", 15000);
        let other = QueryKey::new(["health"]);
        store.insert(list.clone(), 1);
        store.insert(greater.clone(), 2);
        store.insert(other.clone(), 3);

        let hits = Rc::new(Cell::new(0));
        let counter = |hits: &Rc<Cell<i32>>| {
            let hits = hits.clone();
            Callback::from(move |_: ()| hits.set(hits.get() + 1))
        };
        store.subscribe(list.clone(), counter(&hits));
        let greater_id = store.subscribe(greater.clone(), counter(&hits));
        store.subscribe(other.clone(), counter(&hits));
        store.unsubscribe(greater_id);

        let refetches = store.invalidate(&[&["investors"]]);
        assert_eq!(refetches.len(), 1);
        for refetch in refetches {
            refetch.emit(());
        }
        assert_eq!(hits.get(), 1);

        assert_eq!(store.get::<i32>(&list), None);
        assert_eq!(store.get::<i32>(&greater), None);
        assert_eq!(store.get::<i32>(&other), Some(3));
    }
}
