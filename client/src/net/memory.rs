//! In-memory backend used by unit tests.
//!
//! Evaluates `Query` filters against JSON rows, keeps a small account table
//! for the identity operations, and counts calls so tests can assert that a
//! locally rejected operation never reached the backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::backend::{DataBackend, IdentityBackend, ObjectStore};
use super::error::BackendError;
use super::events::{AuthEvents, AuthListener, Subscription};
use super::query::{Direction, Filter, Query, scalar_text};
use super::types::{AuthEvent, AuthUser, OAuthProvider, Session, SignUpOutcome};

#[derive(Default)]
struct MemoryState {
    tables: HashMap<String, Vec<Value>>,
    next_id: i64,
    accounts: HashMap<String, (String, String)>,
    session: Option<Session>,
    session_error: Option<BackendError>,
    confirm_signups: bool,
    objects: HashMap<String, Vec<u8>>,
    oauth_requests: Vec<(OAuthProvider, String)>,
    auth_calls: usize,
    select_calls: usize,
    insert_calls: usize,
    delete_calls: usize,
}

#[derive(Default)]
pub(crate) struct MemoryBackend {
    state: Mutex<MemoryState>,
    events: AuthEvents,
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    pub(crate) fn with_account(self, email: &str, password: &str) -> Self {
        {
            let mut state = self.lock();
            let user_id = format!("user-{}", state.accounts.len() + 1);
            state.accounts.insert(email.to_owned(), (password.to_owned(), user_id));
        }
        self
    }

    pub(crate) fn with_signed_in(self, user_id: &str) -> Self {
        self.lock().session = Some(session_for(user_id, None));
        self
    }

    pub(crate) fn requiring_confirmation(self) -> Self {
        self.lock().confirm_signups = true;
        self
    }

    pub(crate) fn failing_session_lookup(self, message: &str) -> Self {
        self.lock().session_error = Some(BackendError::Transport(message.to_owned()));
        self
    }

    pub(crate) fn clear_session_error(&self) {
        self.lock().session_error = None;
    }

    /// Seed a row as-is (no id assignment).
    pub(crate) fn seed(&self, table: &str, row: Value) {
        let mut state = self.lock();
        if let Some(id) = row.get("id").and_then(Value::as_i64) {
            state.next_id = state.next_id.max(id);
        }
        state.tables.entry(table.to_owned()).or_default().push(row);
    }

    pub(crate) fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Simulate a change pushed by the identity service.
    pub(crate) fn push_session(&self, event: AuthEvent, session: Option<Session>) {
        self.lock().session.clone_from(&session);
        self.events.emit(event, session.as_ref());
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    pub(crate) fn auth_calls(&self) -> usize {
        self.lock().auth_calls
    }

    pub(crate) fn select_calls(&self) -> usize {
        self.lock().select_calls
    }

    pub(crate) fn insert_calls(&self) -> usize {
        self.lock().insert_calls
    }

    pub(crate) fn delete_calls(&self) -> usize {
        self.lock().delete_calls
    }

    pub(crate) fn oauth_requests(&self) -> Vec<(OAuthProvider, String)> {
        self.lock().oauth_requests.clone()
    }

    pub(crate) fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(path).cloned()
    }

    fn start_session(&self, user_id: &str, email: &str) {
        let session = session_for(user_id, Some(email));
        self.push_session(AuthEvent::SignedIn, Some(session));
    }
}

pub(crate) fn session_for(user_id: &str, email: Option<&str>) -> Session {
    Session {
        access_token: format!("token-{user_id}"),
        refresh_token: Some(format!("refresh-{user_id}")),
        expires_at: i64::MAX / 2,
        user: AuthUser { id: user_id.to_owned(), email: email.map(str::to_owned) },
    }
}

#[async_trait(?Send)]
impl IdentityBackend for MemoryBackend {
    async fn current_session(&self) -> Result<Option<Session>, BackendError> {
        let state = self.lock();
        match &state.session_error {
            Some(err) => Err(err.clone()),
            None => Ok(state.session.clone()),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), BackendError> {
        let user_id = {
            let mut state = self.lock();
            state.auth_calls += 1;
            match state.accounts.get(email) {
                Some((stored, user_id)) if stored == password => user_id.clone(),
                _ => {
                    return Err(BackendError::Rejected { status: 400, message: "Invalid login credentials".to_owned() });
                }
            }
        };
        self.start_session(&user_id, email);
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        let (user_id, confirm) = {
            let mut state = self.lock();
            state.auth_calls += 1;
            if state.accounts.contains_key(email) {
                return Err(BackendError::Rejected { status: 422, message: "User already registered".to_owned() });
            }
            let user_id = format!("user-{}", state.accounts.len() + 1);
            state.accounts.insert(email.to_owned(), (password.to_owned(), user_id.clone()));
            (user_id, state.confirm_signups)
        };
        if confirm {
            return Ok(SignUpOutcome::ConfirmationSent);
        }
        self.start_session(&user_id, email);
        Ok(SignUpOutcome::SignedIn)
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.auth_calls += 1;
        state.oauth_requests.push((provider, redirect_to.to_owned()));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.lock().auth_calls += 1;
        self.push_session(AuthEvent::SignedOut, None);
        Ok(())
    }

    fn subscribe(&self, listener: AuthListener) -> Subscription {
        self.events.subscribe(listener)
    }
}

#[async_trait(?Send)]
impl DataBackend for MemoryBackend {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let mut state = self.lock();
        state.select_calls += 1;
        let mut rows: Vec<Value> = state
            .tables
            .get(query.table())
            .map(|rows| rows.iter().filter(|r| matches_all(r, query.filters())).cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| {
            for order in query.orders() {
                let ord = compare_values(a.get(&order.column), b.get(&order.column));
                let ord = match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                };
                if ord.is_ne() {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        });
        if let Some(limit) = query.row_limit() {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError> {
        let mut state = self.lock();
        state.insert_calls += 1;
        let mut stored = Vec::with_capacity(rows.len());
        for mut row in rows {
            let Some(obj) = row.as_object_mut() else {
                return Err(BackendError::Rejected { status: 400, message: "row must be an object".to_owned() });
            };
            if obj.get("id").is_none_or(Value::is_null) {
                state.next_id += 1;
                obj.insert("id".to_owned(), json!(state.next_id));
            }
            if !obj.contains_key("created_at") {
                obj.insert("created_at".to_owned(), json!(format!("2024-01-01T00:00:{:06}Z", state.next_id)));
            }
            stored.push(row);
        }
        state.tables.entry(table.to_owned()).or_default().extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError> {
        let mut state = self.lock();
        let Some(patch) = patch.as_object() else {
            return Err(BackendError::Rejected { status: 400, message: "patch must be an object".to_owned() });
        };
        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(query.table()) {
            for row in rows.iter_mut().filter(|r| matches_all(r, query.filters())) {
                if let Some(obj) = row.as_object_mut() {
                    for (k, v) in patch {
                        obj.insert(k.clone(), v.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, query: &Query) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.delete_calls += 1;
        if let Some(rows) = state.tables.get_mut(query.table()) {
            rows.retain(|r| !matches_all(r, query.filters()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl ObjectStore for MemoryBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String, BackendError> {
        self.lock().objects.insert(path.to_owned(), bytes);
        Ok(format!("memory://{path}"))
    }

    async fn remove(&self, path: &str) -> Result<(), BackendError> {
        self.lock().objects.remove(path);
        Ok(())
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| matches(row, f))
}

fn matches(row: &Value, filter: &Filter) -> bool {
    let cell = row.get(filter.column()).unwrap_or(&Value::Null);
    match filter {
        Filter::Eq { value, .. } => cell == value || (!cell.is_null() && scalar_text(cell) == scalar_text(value)),
        Filter::ILike { needle, .. } => cell
            .as_str()
            .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
        Filter::Gte { value, .. } => !cell.is_null() && compare_values(Some(cell), Some(value)).is_ge(),
        Filter::Lte { value, .. } => !cell.is_null() && compare_values(Some(cell), Some(value)).is_le(),
        Filter::Contains { values, .. } => cell.as_array().is_some_and(|items| {
            values.iter().all(|v| items.iter().any(|item| item.as_str() == Some(v.as_str())))
        }),
        Filter::In { values, .. } => {
            !cell.is_null() && values.iter().any(|v| scalar_text(v) == scalar_text(cell))
        }
    }
}

// Nulls sort last, numbers numerically, everything else by text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => scalar_text(a).cmp(&scalar_text(b)),
        },
    }
}
