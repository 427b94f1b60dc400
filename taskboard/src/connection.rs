use std::time::Duration;

use log::{debug, info};
use sea_orm::{
    sea_query::SqliteQueryBuilder, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, Schema,
};

use crate::entity::task;

/// Handle to the task database.
///
/// Wraps a SeaORM [`DatabaseConnection`] pool; cloning is cheap and every clone
/// talks to the same pool. The CRUD operations live in [`crate::crud`].
#[derive(Debug, Clone)]
pub struct TaskDb {
    pub(crate) inner: DatabaseConnection,
}

impl TaskDb {
    /// Wrap an already-open connection. The schema is not touched; call
    /// [`TaskDb::schema`] to create tables.
    pub fn from_connection(inner: DatabaseConnection) -> Self {
        Self { inner }
    }

    /// Get a reference to the underlying SeaORM connection.
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Start building the schema.
    ///
    /// Returns a [`SchemaBuilder`] that collects entities and creates their
    /// tables with `.sync().await`.
    pub fn schema(&self) -> SchemaBuilder<'_> {
        SchemaBuilder {
            db: self,
            entries: Vec::new(),
        }
    }
}

/// Builder for declaring which entities get a table.
///
/// ```ignore
/// db.schema()
///     .register(task::Entity)
///     .sync()
///     .await?;
/// ```
pub struct SchemaBuilder<'a> {
    db: &'a TaskDb,
    entries: Vec<EntityEntry>,
}

struct EntityEntry {
    table_name: String,
    create_sql: String,
}

impl<'a> SchemaBuilder<'a> {
    /// Register a SeaORM entity. Its table is created (if not exists) when
    /// [`sync()`](SchemaBuilder::sync) is called.
    pub fn register<E>(mut self, entity: E) -> Self
    where
        E: EntityTrait,
        <E::Column as std::str::FromStr>::Err: std::fmt::Debug,
    {
        let backend = self.db.inner.get_database_backend();
        let create_sql = Schema::new(backend)
            .create_table_from_entity(entity)
            .if_not_exists()
            .to_owned()
            .to_string(SqliteQueryBuilder);

        self.entries.push(EntityEntry {
            table_name: entity.table_name().to_string(),
            create_sql,
        });
        self
    }

    /// Create all registered tables.
    pub async fn sync(self) -> Result<(), DbErr> {
        for entry in self.entries {
            debug!("ensuring table {}: {}", entry.table_name, entry.create_sql);
            self.db.inner.execute_unprepared(&entry.create_sql).await?;
        }
        Ok(())
    }
}

/// Builder for [`TaskDb`].
pub struct TaskDbBuilder {
    database_url: String,
    max_connections: Option<u32>,
}

impl TaskDbBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            database_url: url.to_string(),
            max_connections: None,
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opts = ConnectOptions::new(&self.database_url);
        let in_memory = is_in_memory(&self.database_url);
        // Every connection to `sqlite::memory:` opens its own empty database,
        // so the pool must hold exactly one connection and never recycle it.
        let max_connections = match self.max_connections {
            Some(max) => Some(max),
            None if in_memory => Some(1),
            None => None,
        };
        if let Some(max) = max_connections {
            opts.max_connections(max);
        }
        if in_memory {
            opts.min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }
        opts.sqlx_logging_level(log::LevelFilter::Debug);
        opts
    }

    /// Connect and make sure the `tasks` table exists.
    pub async fn build(self) -> Result<TaskDb, DbErr> {
        let opts = self.connect_options();
        let inner = Database::connect(opts).await?;
        let db = TaskDb::from_connection(inner);

        db.schema().register(task::Entity).sync().await?;

        info!("connected to task database at {}", self.database_url);
        Ok(db)
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
