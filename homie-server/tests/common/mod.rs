//! In-memory stores and request helpers for router tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use homie_server::db::{CategoryStore, DbError, DeviceStore};
use homie_server::models::{Category, CategoryName, Device, DeviceCategory, DeviceDraft};
use homie_server::{build_router, AppState, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;

#[derive(Default)]
struct Catalog {
    categories: BTreeMap<i64, String>,
    devices: BTreeMap<i64, DeviceDraft>,
    links: Vec<(i64, i64)>,
    next_category: i64,
    next_device: i64,
}

impl Catalog {
    fn device(&self, id: i64) -> Option<Device> {
        let draft = self.devices.get(&id)?;
        let mut categories: Vec<DeviceCategory> = self
            .links
            .iter()
            .filter(|(device, _)| *device == id)
            .map(|(_, category)| DeviceCategory {
                id: *category,
                name: self.categories[category].clone(),
            })
            .collect();
        categories.sort_by_key(|c| c.id);

        Some(Device {
            id,
            name: draft.name.clone(),
            kind: draft.kind.clone(),
            power: draft.power,
            room: draft.room.clone(),
            image: draft.image.clone(),
            categories,
        })
    }

    fn check_categories(&self, ids: &[i64]) -> Result<(), DbError> {
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !self.categories.contains_key(id))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DbError::UnknownCategories(missing))
        }
    }

    fn replace_links(&mut self, device_id: i64, ids: &[i64]) {
        self.links.retain(|(device, _)| *device != device_id);
        self.links.extend(ids.iter().map(|id| (device_id, *id)));
    }
}

/// Store that mirrors the Postgres repositories' semantics in memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Catalog>>,
}

impl MemoryStore {
    pub fn links_for(&self, device_id: i64) -> usize {
        let catalog = self.inner.lock().unwrap();
        catalog.links.iter().filter(|(d, _)| *d == device_id).count()
    }

    pub fn device_count(&self) -> usize {
        self.inner.lock().unwrap().devices.len()
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>, DbError> {
        let catalog = self.inner.lock().unwrap();
        Ok(catalog
            .categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.clone(),
                device_count: catalog.links.iter().filter(|(_, c)| c == id).count() as i64,
            })
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Category, DbError> {
        CategoryStore::list(self)
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(DbError::NotFound {
                resource: "category",
                id,
            })
    }

    async fn create(&self, name: CategoryName) -> Result<i64, DbError> {
        let mut catalog = self.inner.lock().unwrap();
        catalog.next_category += 1;
        let id = catalog.next_category;
        catalog.categories.insert(id, name.into_string());
        Ok(id)
    }

    async fn update(&self, id: i64, name: CategoryName) -> Result<(), DbError> {
        let mut catalog = self.inner.lock().unwrap();
        match catalog.categories.get_mut(&id) {
            Some(existing) => {
                *existing = name.into_string();
                Ok(())
            }
            None => Err(DbError::NotFound {
                resource: "category",
                id,
            }),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut catalog = self.inner.lock().unwrap();
        if catalog.links.iter().any(|(_, c)| *c == id) {
            return Err(DbError::Conflict {
                resource: "category",
                id,
                reason: "is linked to devices",
            });
        }
        catalog
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound {
                resource: "category",
                id,
            })
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Device>, DbError> {
        let catalog = self.inner.lock().unwrap();
        Ok(catalog
            .devices
            .keys()
            .filter_map(|id| catalog.device(*id))
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Device, DbError> {
        let catalog = self.inner.lock().unwrap();
        catalog.device(id).ok_or(DbError::NotFound {
            resource: "device",
            id,
        })
    }

    async fn create(&self, draft: DeviceDraft) -> Result<i64, DbError> {
        let mut catalog = self.inner.lock().unwrap();
        catalog.check_categories(&draft.categories)?;
        catalog.next_device += 1;
        let id = catalog.next_device;
        catalog.replace_links(id, &draft.categories);
        catalog.devices.insert(id, draft);
        Ok(id)
    }

    async fn update(&self, id: i64, draft: DeviceDraft) -> Result<(), DbError> {
        let mut catalog = self.inner.lock().unwrap();
        if !catalog.devices.contains_key(&id) {
            return Err(DbError::NotFound {
                resource: "device",
                id,
            });
        }
        catalog.check_categories(&draft.categories)?;
        catalog.replace_links(id, &draft.categories);
        catalog.devices.insert(id, draft);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut catalog = self.inner.lock().unwrap();
        catalog.links.retain(|(device, _)| *device != id);
        catalog
            .devices
            .remove(&id)
            .map(|_| ())
            .ok_or(DbError::NotFound {
                resource: "device",
                id,
            })
    }
}

/// Store whose every call fails like a lost database connection
pub struct FailingStore;

#[async_trait]
impl CategoryStore for FailingStore {
    async fn list(&self) -> Result<Vec<Category>, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn get(&self, _id: i64) -> Result<Category, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _name: CategoryName) -> Result<i64, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _id: i64, _name: CategoryName) -> Result<(), DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i64) -> Result<(), DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl DeviceStore for FailingStore {
    async fn list(&self) -> Result<Vec<Device>, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn get(&self, _id: i64) -> Result<Device, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _draft: DeviceDraft) -> Result<i64, DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _id: i64, _draft: DeviceDraft) -> Result<(), DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i64) -> Result<(), DbError> {
        Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

/// Route server logs through the test harness (shown with `--nocapture`).
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("homie_server=debug,tower_http=debug")
        .with_test_writer()
        .try_init();
}

pub fn app(store: &MemoryStore) -> Router {
    init_tracing();
    let state = AppState::new(Arc::new(store.clone()), Arc::new(store.clone()));
    build_router(state, &ServerConfig::default())
}

pub fn failing_app() -> Router {
    init_tracing();
    let state = AppState::new(Arc::new(FailingStore), Arc::new(FailingStore));
    build_router(state, &ServerConfig::default())
}

/// Send a request and return status plus parsed JSON body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
