//! `SQLite` implementation of [`DeviceRepository`].

use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use zigbridge_app::ports::DeviceRepository;
use zigbridge_domain::device::Device;
use zigbridge_domain::error::BridgeError;
use zigbridge_domain::id::{DeviceId, DevicePropertyId, DeviceType};
use zigbridge_domain::property::{DeviceProperty, Observation, PropertyKey, PropertyValue};
use zigbridge_domain::time::{self, Timestamp};

use crate::error::StorageError;

fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

fn decode_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    time::parse_rfc3339(value).map_err(decode_error)
}

fn decode_device_id(row: &SqliteRow) -> Result<DeviceId, sqlx::Error> {
    let device_type: String = row.try_get("device_type")?;
    let external_id: String = row.try_get("external_id")?;
    let device_type = DeviceType::from_str(&device_type).map_err(decode_error)?;
    Ok(DeviceId::new(external_id, device_type))
}

/// A `devices` row, before its properties are attached.
struct DeviceRow {
    id: DeviceId,
    display_name: String,
    created_at: Timestamp,
}

impl<'r> FromRow<'r, SqliteRow> for DeviceRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let display_name: String = row.try_get("display_name")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(Self {
            id: decode_device_id(row)?,
            display_name,
            created_at: decode_timestamp(&created_at)?,
        })
    }
}

impl DeviceRow {
    fn into_device(
        self,
        properties: impl IntoIterator<Item = DeviceProperty>,
    ) -> Result<Device, BridgeError> {
        properties
            .into_iter()
            .fold(
                Device::builder()
                    .id(self.id)
                    .display_name(self.display_name)
                    .created_at(self.created_at),
                |builder, property| builder.property(property),
            )
            .build()
    }
}

/// Wrapper for converting `device_properties` rows into [`DeviceProperty`].
struct Wrapper(DeviceProperty);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let key: String = row.try_get("property_key")?;
        let label: String = row.try_get("label")?;
        let value: String = row.try_get("value")?;
        let observed_at: String = row.try_get("observed_at")?;

        let key = PropertyKey::from_str(&key).map_err(decode_error)?;
        let value: PropertyValue = serde_json::from_str(&value).map_err(decode_error)?;

        Ok(Self(DeviceProperty {
            id: DevicePropertyId::new(decode_device_id(row)?, key),
            label,
            value: Observation::new(value, decode_timestamp(&observed_at)?),
        }))
    }
}

const UPSERT_DEVICE: &str = r"
    INSERT INTO devices (device_type, external_id, display_name, created_at)
    VALUES (?, ?, ?, ?)
    ON CONFLICT (device_type, external_id) DO UPDATE SET display_name = excluded.display_name
";

const UPSERT_PROPERTY: &str = r"
    INSERT INTO device_properties (device_type, external_id, property_key, label, value, observed_at)
    VALUES (?, ?, ?, ?, ?, ?)
    ON CONFLICT (device_type, external_id, property_key) DO UPDATE SET
        label = excluded.label,
        value = excluded.value,
        observed_at = excluded.observed_at
";

const SELECT_DEVICE: &str = "SELECT * FROM devices WHERE device_type = ? AND external_id = ?";
const SELECT_PROPERTIES_OF_DEVICE: &str =
    "SELECT * FROM device_properties WHERE device_type = ? AND external_id = ?";
const SELECT_ALL_DEVICES: &str = "SELECT * FROM devices ORDER BY device_type, external_id";
const SELECT_ALL_PROPERTIES: &str = "SELECT * FROM device_properties";

async fn upsert_property(
    conn: &mut SqliteConnection,
    property: &DeviceProperty,
) -> Result<(), StorageError> {
    let device_id = &property.id.device_id;
    sqlx::query(UPSERT_PROPERTY)
        .bind(device_id.device_type.as_str())
        .bind(&device_id.external_id)
        .bind(property.id.key.as_str())
        .bind(&property.label)
        .bind(serde_json::to_string(&property.value.value)?)
        .bind(time::to_rfc3339(property.value.observed_at))
        .execute(conn)
        .await?;
    Ok(())
}

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn find_by_device_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, BridgeError>> + Send {
        let pool = self.pool.clone();
        let id = id.clone();
        async move {
            let row: Option<DeviceRow> = sqlx::query_as(SELECT_DEVICE)
                .bind(id.device_type.as_str())
                .bind(&id.external_id)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            let Some(row) = row else {
                return Ok(None);
            };

            let properties: Vec<Wrapper> = sqlx::query_as(SELECT_PROPERTIES_OF_DEVICE)
                .bind(id.device_type.as_str())
                .bind(&id.external_id)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            row.into_device(properties.into_iter().map(|w| w.0))
                .map(Some)
        }
    }

    fn save(&self, device: Device) -> impl Future<Output = Result<Device, BridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            sqlx::query(UPSERT_DEVICE)
                .bind(device.id.device_type.as_str())
                .bind(&device.id.external_id)
                .bind(&device.display_name)
                .bind(time::to_rfc3339(device.created_at))
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            for property in device.properties() {
                upsert_property(&mut tx, property).await?;
            }

            tx.commit().await.map_err(StorageError::from)?;
            Ok(device)
        }
    }

    fn save_property(
        &self,
        property: DeviceProperty,
    ) -> impl Future<Output = Result<DeviceProperty, BridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut conn = pool.acquire().await.map_err(StorageError::from)?;
            upsert_property(&mut conn, &property).await?;
            Ok(property)
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, BridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<DeviceRow> = sqlx::query_as(SELECT_ALL_DEVICES)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            let properties: Vec<Wrapper> = sqlx::query_as(SELECT_ALL_PROPERTIES)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let mut by_device: HashMap<DeviceId, Vec<DeviceProperty>> = HashMap::new();
            for Wrapper(property) in properties {
                by_device
                    .entry(property.id.device_id.clone())
                    .or_default()
                    .push(property);
            }

            rows.into_iter()
                .map(|row| {
                    let properties = by_device.remove(&row.id).unwrap_or_default();
                    row.into_device(properties)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use zigbridge_domain::alarm::AlarmState;

    async fn setup() -> SqliteDeviceRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteDeviceRepository::new(db.pool().clone())
    }

    fn device_id(external_id: &str) -> DeviceId {
        DeviceId::new(external_id, DeviceType::Zigbee2Mqtt)
    }

    fn test_device(external_id: &str) -> Device {
        Device::builder().id(device_id(external_id)).build().unwrap()
    }

    #[tokio::test]
    async fn should_save_and_find_device_with_properties() {
        let repo = setup().await;
        let mut device = test_device("frontdoor");
        device.record(Observation::now(PropertyValue::Alarm(AlarmState::Burglar)));
        device.record(Observation::now(PropertyValue::BatteryLevel(64)));

        repo.save(device.clone()).await.unwrap();

        let fetched = repo
            .find_by_device_id(&device_id("frontdoor"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, device.id);
        assert_eq!(fetched.display_name, "frontdoor");
        let keys: Vec<PropertyKey> = fetched.properties().map(|p| p.id.key).collect();
        assert_eq!(keys, vec![PropertyKey::Battery, PropertyKey::Alarm]);
        assert_eq!(
            fetched.property(PropertyKey::Alarm),
            device.property(PropertyKey::Alarm)
        );
    }

    #[tokio::test]
    async fn should_return_none_when_device_not_found() {
        let repo = setup().await;
        let result = repo.find_by_device_id(&device_id("ghost")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_keep_creation_time_when_saving_again() {
        let repo = setup().await;
        let device = test_device("lamp");
        let created_at = device.created_at;
        repo.save(device).await.unwrap();

        let renamed = Device::builder()
            .id(device_id("lamp"))
            .display_name("Desk Lamp")
            .build()
            .unwrap();
        repo.save(renamed).await.unwrap();

        let fetched = repo
            .find_by_device_id(&device_id("lamp"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.display_name, "Desk Lamp");
        assert_eq!(fetched.created_at, created_at);
    }

    #[tokio::test]
    async fn should_replace_property_value_on_save_property() {
        let repo = setup().await;
        let mut device = test_device("plug");
        repo.save(device.clone()).await.unwrap();

        let first = device.record(Observation::now(PropertyValue::Relay(false)));
        repo.save_property(first.property).await.unwrap();
        let second = device.record(Observation::now(PropertyValue::Relay(true)));
        repo.save_property(second.property).await.unwrap();

        let fetched = repo
            .find_by_device_id(&device_id("plug"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.properties().count(), 1);
        assert_eq!(
            fetched.property(PropertyKey::Relay).map(|p| p.value.value),
            Some(PropertyValue::Relay(true))
        );
    }

    #[tokio::test]
    async fn should_list_all_devices_with_their_own_properties() {
        let repo = setup().await;
        let mut kitchen = test_device("kitchen");
        kitchen.record(Observation::now(PropertyValue::Temperature(19.5)));
        let mut office = test_device("office");
        office.record(Observation::now(PropertyValue::Co2(640)));
        repo.save(kitchen).await.unwrap();
        repo.save(office).await.unwrap();
        repo.save(test_device("hallway")).await.unwrap();

        let all = repo.get_all().await.unwrap();

        let names: Vec<&str> = all.iter().map(|d| d.id.external_id.as_str()).collect();
        assert_eq!(names, vec!["hallway", "kitchen", "office"]);
        assert_eq!(all[0].properties().count(), 0);
        assert!(all[1].property(PropertyKey::Temperature).is_some());
        assert!(all[2].property(PropertyKey::Co2).is_some());
    }
}
