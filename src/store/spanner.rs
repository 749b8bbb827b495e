use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert, insert_or_update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use std::sync::Arc;

use super::PatientStore;
use crate::config::SpannerConfig;
use crate::models::{NewPatient, Patient};

const TABLE: &str = "patients";
const COLUMNS: [&str; 4] = ["id", "name", "age", "email"];

/// Patient store backed by Google Cloud Spanner
#[derive(Clone)]
pub struct SpannerPatientStore {
    inner: Arc<Client>,
}

impl SpannerPatientStore {
    /// Create a new Spanner-backed store from configuration
    ///
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to
    /// the emulator when set, or production Spanner otherwise.
    ///
    /// The instance, database and `patients` table are created if they
    /// don't exist yet.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.project, config.instance, config.database
        );

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        // ClientConfig::default() automatically uses SPANNER_EMULATOR_HOST if set
        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Next free id, one past the highest stored id
    ///
    /// Two concurrent inserts may compute the same id; the second `insert`
    /// mutation then fails with ALREADY_EXISTS instead of overwriting.
    async fn next_id(&self) -> Result<i64> {
        let statement = Statement::new(
            "SELECT IFNULL(MAX(id), 0) + 1 AS next_id FROM patients"
        );

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query next patient id")?;

        match result_set.next().await? {
            Some(row) => Ok(row.column_by_name("next_id")?),
            None => Ok(1),
        }
    }

    /// Run a patient query and collect every row
    async fn query_patients(&self, statement: Statement) -> Result<Vec<Patient>> {
        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query patients from Spanner")?;

        let mut patients = Vec::new();
        while let Some(row) = result_set.next().await? {
            patients.push(row_to_patient(&row)?);
        }
        Ok(patients)
    }
}

fn row_to_patient(row: &Row) -> Result<Patient> {
    let age: i64 = row.column_by_name("age")?;

    Ok(Patient {
        id: row.column_by_name("id")?,
        name: row.column_by_name("name")?,
        age: i32::try_from(age).context("Stored age does not fit in a 32-bit integer")?,
        email: row.column_by_name("email")?,
    })
}

#[async_trait]
impl PatientStore for SpannerPatientStore {
    async fn insert(&self, patient: NewPatient) -> Result<Patient> {
        let id = self.next_id().await?;
        let age = i64::from(patient.age);

        let mutation = insert(
            TABLE,
            &COLUMNS,
            &[&id, &patient.name, &age, &patient.email],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to insert patient into Spanner")?;

        tracing::debug!("Inserted patient with id: {}", id);
        Ok(Patient::with_id(id, patient))
    }

    async fn save(&self, patient: Patient) -> Result<Patient> {
        let age = i64::from(patient.age);

        let mutation = insert_or_update(
            TABLE,
            &COLUMNS,
            &[&patient.id, &patient.name, &age, &patient.email],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to save patient to Spanner")?;

        tracing::debug!("Saved patient with id: {}", patient.id);
        Ok(patient)
    }

    async fn find_all(&self) -> Result<Vec<Patient>> {
        let statement = Statement::new(
            "SELECT id, name, age, email FROM patients ORDER BY id ASC"
        );

        let patients = self.query_patients(statement).await?;
        tracing::debug!("Listed {} patients", patients.len());
        Ok(patients)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>> {
        let mut statement = Statement::new(
            "SELECT id, name, age, email FROM patients WHERE id = @id"
        );
        statement.add_param("id", &id);

        let patient = self.query_patients(statement).await?.into_iter().next();
        if patient.is_none() {
            tracing::debug!("Patient not found with id: {}", id);
        }
        Ok(patient)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let mutation = delete(TABLE, Key::new(&id));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete patient from Spanner")?;

        tracing::debug!("Deleted patient with id: {}", id);
        Ok(())
    }

    /// Execute a lightweight `SELECT 1` to verify the connection is alive
    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

/// Automatically provision Spanner instance, database, and table
///
/// Enables zero-setup local development against the emulator.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = format!("{}/databases/{}", instance_path, config.database);

    let instance_lookup = admin
        .instance()
        .get_instance(
            GetInstanceRequest {
                name: instance_path.clone(),
                field_mask: None,
            },
            None,
        )
        .await
        .map(drop);

    ensure_exists(
        "Instance",
        &instance_path,
        instance_lookup,
        create_instance(&admin, config, &project_path, &instance_path),
    )
    .await?;

    let database_lookup = admin
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database_path.clone(),
            },
            None,
        )
        .await
        .map(drop);

    ensure_exists(
        "Database",
        &database_path,
        database_lookup,
        create_database(&admin, config, &instance_path),
    )
    .await?;

    let ddl = admin
        .database()
        .get_database_ddl(
            GetDatabaseDdlRequest {
                database: database_path.clone(),
            },
            None,
        )
        .await
        .context("Failed to get database DDL")?
        .into_inner()
        .statements;

    let table_lookup = if ddl.iter().any(|stmt| declares_patients_table(stmt)) {
        Ok(())
    } else {
        Err(Status::new(Code::NotFound, "patients table is not declared"))
    };

    ensure_exists("Table", TABLE, table_lookup, create_table(&admin, &database_path)).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

async fn create_instance(
    admin: &AdminClient,
    config: &SpannerConfig,
    project_path: &str,
    instance_path: &str,
) -> Result<()> {
    let instance_config = match config.emulator_host {
        Some(_) => "emulator-config",
        None => "regional-us-central1",
    };
    let request = CreateInstanceRequest {
        parent: project_path.to_string(),
        instance_id: config.instance.clone(),
        instance: Some(Instance {
            name: instance_path.to_string(),
            config: format!("{}/instanceConfigs/{}", project_path, instance_config),
            display_name: format!("{} instance", config.instance),
            node_count: 1,
            ..Default::default()
        }),
    };

    let mut operation = admin
        .instance()
        .create_instance(request, None)
        .await
        .context("Failed to start instance creation")?;
    operation.wait(None).await.context("Failed to create instance")?;
    Ok(())
}

async fn create_database(
    admin: &AdminClient,
    config: &SpannerConfig,
    instance_path: &str,
) -> Result<()> {
    let request = CreateDatabaseRequest {
        parent: instance_path.to_string(),
        create_statement: format!("CREATE DATABASE `{}`", config.database),
        database_dialect: 1, // Google Standard SQL
        ..Default::default()
    };

    let mut operation = admin
        .database()
        .create_database(request, None)
        .await
        .context("Failed to start database creation")?;
    operation.wait(None).await.context("Failed to create database")?;
    Ok(())
}

async fn create_table(admin: &AdminClient, database_path: &str) -> Result<()> {
    let request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![PATIENTS_DDL.trim().to_string()],
        ..Default::default()
    };

    let mut operation = admin
        .database()
        .update_database_ddl(request, None)
        .await
        .context("Failed to start table creation")?;
    operation.wait(None).await.context("Failed to create table")?;
    Ok(())
}

const PATIENTS_DDL: &str = r#"
CREATE TABLE patients (
    id INT64 NOT NULL,
    name STRING(MAX) NOT NULL,
    age INT64 NOT NULL,
    email STRING(MAX) NOT NULL,
) PRIMARY KEY (id)
"#;

fn declares_patients_table(stmt: &str) -> bool {
    stmt.contains("CREATE TABLE patients") || stmt.contains("CREATE TABLE `patients`")
}

/// Run `create` only when `lookup` reports the resource as missing
///
/// `create` is an unpolled future, so it does nothing unless awaited here.
/// Lookup failures other than NOT_FOUND abort provisioning.
async fn ensure_exists<F>(
    kind: &str,
    path: &str,
    lookup: std::result::Result<(), Status>,
    create: F,
) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match lookup {
        Ok(()) => {
            tracing::info!("{} already exists: {}", kind, path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} not found, creating: {}", kind, path);
            create.await?;
            tracing::info!("{} created successfully: {}", kind, path);
            Ok(())
        }
        Err(status) => Err(anyhow::anyhow!(
            "Failed to check {} existence: {}",
            kind.to_lowercase(),
            status.message()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emulator_config(instance: &str) -> SpannerConfig {
        unsafe {
            std::env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
        }

        SpannerConfig {
            emulator_host: Some("localhost:9010".to_string()),
            project: "test-project".to_string(),
            instance: instance.to_string(),
            database: format!("{}-db", instance),
        }
    }

    fn new_patient(name: &str, age: i32, email: &str) -> NewPatient {
        NewPatient {
            name: name.to_string(),
            age,
            email: email.to_string(),
        }
    }

    #[test]
    fn test_store_is_clonable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<SpannerPatientStore>();
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpannerPatientStore>();
    }

    async fn mark_created(created: &std::cell::Cell<bool>) -> Result<()> {
        created.set(true);
        Ok(())
    }

    async fn fail_create() -> Result<()> {
        Err(anyhow::anyhow!("Failed to create database"))
    }

    #[tokio::test]
    async fn test_ensure_exists_skips_create_when_present() {
        let created = std::cell::Cell::new(false);

        let result = ensure_exists("Table", TABLE, Ok(()), mark_created(&created)).await;

        assert!(result.is_ok());
        assert!(!created.get());
    }

    #[tokio::test]
    async fn test_ensure_exists_creates_when_not_found() {
        let created = std::cell::Cell::new(false);
        let lookup = Err(Status::new(Code::NotFound, "missing"));

        let result = ensure_exists("Table", TABLE, lookup, mark_created(&created)).await;

        assert!(result.is_ok());
        assert!(created.get());
    }

    #[tokio::test]
    async fn test_ensure_exists_propagates_create_failure() {
        let lookup = Err(Status::new(Code::NotFound, "missing"));

        let result = ensure_exists("Database", "databases/d", lookup, fail_create()).await;

        assert!(result.unwrap_err().to_string().contains("Failed to create database"));
    }

    #[tokio::test]
    async fn test_ensure_exists_rejects_other_lookup_errors() {
        let created = std::cell::Cell::new(false);
        let lookup = Err(Status::new(Code::PermissionDenied, "no access"));

        let result = ensure_exists("Instance", "instances/i", lookup, mark_created(&created)).await;

        let error = result.unwrap_err().to_string();
        assert!(error.contains("Failed to check instance existence"));
        assert!(error.contains("no access"));
        assert!(!created.get());
    }

    #[test]
    fn test_declares_patients_table() {
        assert!(declares_patients_table(PATIENTS_DDL.trim()));
        assert!(declares_patients_table("CREATE TABLE `patients` (id INT64) PRIMARY KEY (id)"));
        assert!(!declares_patients_table("CREATE TABLE kv_store (id STRING(36)) PRIMARY KEY (id)"));
    }

    #[tokio::test]
    #[ignore = "requires the Spanner emulator on localhost:9010"]
    async fn test_auto_provisioning_idempotent() {
        let config = emulator_config("patients-provision-test");

        let first = SpannerPatientStore::from_config(&config).await;
        assert!(first.is_ok(), "First auto-provisioning call should succeed");

        let second = SpannerPatientStore::from_config(&config).await;
        assert!(second.is_ok(), "Second auto-provisioning call should succeed");
    }

    #[tokio::test]
    #[ignore = "requires the Spanner emulator on localhost:9010"]
    async fn test_insert_find_save_delete() {
        let config = emulator_config("patients-crud-test");
        let store = SpannerPatientStore::from_config(&config)
            .await
            .expect("Failed to create Spanner store");

        let created = store
            .insert(new_patient("Christian Ramirez", 17, "c1@example.com"))
            .await
            .unwrap();
        assert_eq!(created.name, "Christian Ramirez");

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));

        let updated = Patient {
            name: "Christian Raul Ramirez".to_string(),
            age: 18,
            ..created.clone()
        };
        store.save(updated.clone()).await.unwrap();
        assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(updated));

        store.delete_by_id(created.id).await.unwrap();
        assert!(store.find_by_id(created.id).await.unwrap().is_none());

        // Deleting again is a no-op
        store.delete_by_id(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires the Spanner emulator on localhost:9010"]
    async fn test_find_all_in_id_order() {
        let config = emulator_config("patients-list-test");
        let store = SpannerPatientStore::from_config(&config)
            .await
            .expect("Failed to create Spanner store");

        let a = store.insert(new_patient("A", 1, "a@x.com")).await.unwrap();
        let b = store.insert(new_patient("B", 2, "b@x.com")).await.unwrap();
        assert!(b.id > a.id);

        let all = store.find_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|p| p.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert!(ids.contains(&a.id) && ids.contains(&b.id));
    }

    #[tokio::test]
    #[ignore = "requires the Spanner emulator on localhost:9010"]
    async fn test_health_check() {
        let config = emulator_config("patients-health-test");
        let store = SpannerPatientStore::from_config(&config)
            .await
            .expect("Failed to create Spanner store");

        assert!(store.health_check().await.is_ok());
    }
}
