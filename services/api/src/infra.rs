use metrics_exporter_prometheus::PrometheusHandle;
use results_panel::directory::{zone_key, User, UserRepository};
use results_panel::metrics::{
    DataSet, MetricRecord, MetricStore, ParameterStore, RepositoryError, SystemParameters,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("store lock poisoned".to_string())
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMetricStore {
    records: Arc<RwLock<HashMap<DataSet, Vec<MetricRecord>>>>,
}

impl MetricStore for InMemoryMetricStore {
    fn replace(&self, set: DataSet, records: Vec<MetricRecord>) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        guard.insert(set, records);
        Ok(())
    }

    fn list(&self, set: DataSet) -> Result<Vec<MetricRecord>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.get(&set).cloned().unwrap_or_default())
    }

    fn clear(&self, set: DataSet) -> Result<usize, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        Ok(guard.remove(&set).map(|records| records.len()).unwrap_or(0))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryParameterStore {
    stored: Arc<RwLock<Option<SystemParameters>>>,
}

impl ParameterStore for InMemoryParameterStore {
    fn load(&self) -> Result<Option<SystemParameters>, RepositoryError> {
        Ok(self.stored.read().map_err(poisoned)?.clone())
    }

    fn save(&self, parameters: SystemParameters) -> Result<(), RepositoryError> {
        *self.stored.write().map_err(poisoned)? = Some(parameters);
        Ok(())
    }
}

/// Users in insertion order; lookups compare zone keys.
#[derive(Default, Clone)]
pub(crate) struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepository {
    fn position(users: &[User], zone: &str) -> Option<usize> {
        let key = zone_key(zone);
        users.iter().position(|user| user.key() == key)
    }
}

impl UserRepository for InMemoryUserRepository {
    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.lock().map_err(poisoned)?.clone())
    }

    fn fetch(&self, zone: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.users.lock().map_err(poisoned)?;
        Ok(Self::position(&guard, zone).map(|index| guard[index].clone()))
    }

    fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        if Self::position(&guard, &user.zone).is_some() {
            return Err(RepositoryError::Conflict);
        }
        guard.push(user.clone());
        Ok(user)
    }

    fn update(&self, zone: &str, user: User) -> Result<User, RepositoryError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        let index = Self::position(&guard, zone).ok_or(RepositoryError::NotFound)?;
        if let Some(other) = Self::position(&guard, &user.zone) {
            if other != index {
                return Err(RepositoryError::Conflict);
            }
        }
        guard[index] = user.clone();
        Ok(user)
    }

    fn delete(&self, zone: &str) -> Result<User, RepositoryError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        let index = Self::position(&guard, zone).ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }

    fn replace_field_users(&self, users: Vec<User>) -> Result<(), RepositoryError> {
        let mut guard = self.users.lock().map_err(poisoned)?;
        guard.retain(User::is_admin);
        guard.extend(users);
        Ok(())
    }
}
