//! # SQLite Endpoint Store
//!
//! Diesel implementation of [`EndpointStore`] over an r2d2 connection pool.
//! Calls block; HTTP handlers run them on actix's blocking pool.

use crate::models::endpoints::{EndpointChangeset, EndpointRow, NewEndpointRow};
use crate::schema::api_endpoints::dsl;
use crate::schema::CREATE_TABLES;
use chrono::Utc;
use derive_more::From;
use diesel::connection::SimpleConnection;
use diesel::dsl::{max, sql};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sql_types::BigInt;
use oasprobe_core::{AppError, AppResult, EndpointDefinition, EndpointStore};

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection pragmas.
#[derive(Debug, Clone, Copy)]
struct SqliteTuning;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteTuning {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

fn storage<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Storage(err.to_string())
}

/// Failure inside a transaction closure.
#[derive(Debug, From)]
enum TxError {
    Diesel(diesel::result::Error),
    App(AppError),
}

impl From<TxError> for AppError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Diesel(e) => storage(e),
            TxError::App(e) => e,
        }
    }
}

/// Endpoint store backed by SQLite.
#[derive(Clone)]
pub struct DieselStore {
    pool: SqlitePool,
}

impl DieselStore {
    /// Opens (creating if needed) the database at `database_url`.
    ///
    /// `:memory:` keeps a single connection alive for the life of the pool so
    /// every caller sees the same database.
    pub fn connect(database_url: &str, pool_size: u32) -> AppResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let builder = Pool::builder().connection_customizer(Box::new(SqliteTuning));

        let builder = if database_url == ":memory:" {
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(pool_size)
        };
        let pool = builder.build(manager).map_err(storage)?;

        let store = Self { pool };
        store.conn()?.batch_execute(CREATE_TABLES).map_err(storage)?;
        log::info!("endpoint store ready at {}", database_url);
        Ok(store)
    }

    fn conn(&self) -> AppResult<PooledConnection<ConnectionManager<SqliteConnection>>> {
        self.pool.get().map_err(storage)
    }

    fn load(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<EndpointDefinition>> {
        dsl::api_endpoints
            .find(id)
            .select(EndpointRow::as_select())
            .first(conn)
            .optional()
            .map_err(storage)?
            .map(EndpointRow::into_definition)
            .transpose()
    }
}

impl EndpointStore for DieselStore {
    fn create_many(
        &self,
        document_id: Option<i64>,
        endpoints: Vec<EndpointDefinition>,
    ) -> AppResult<(i64, Vec<EndpointDefinition>)> {
        let mut conn = self.conn()?;

        let (document_id, stored) = conn.immediate_transaction(|conn| {
            let document_id = match document_id {
                Some(id) => id,
                None => {
                    dsl::api_endpoints
                        .select(max(dsl::owner_document_id))
                        .first::<Option<i64>>(conn)?
                        .unwrap_or(0)
                        + 1
                }
            };

            let now = Utc::now().naive_utc();
            let mut stored = Vec::with_capacity(endpoints.len());
            for endpoint in &endpoints {
                let row = NewEndpointRow::from_definition(endpoint, document_id, now)?;
                diesel::insert_into(dsl::api_endpoints)
                    .values(&row)
                    .execute(conn)?;
                let id = diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result::<i64>(conn)?;
                let created = Self::load(conn, id)?.ok_or_else(|| {
                    AppError::Storage(format!("endpoint {} vanished after insert", id))
                })?;
                stored.push(created);
            }
            Ok::<_, TxError>((document_id, stored))
        })?;

        log::debug!("stored {} endpoints under document {}", stored.len(), document_id);
        Ok((document_id, stored))
    }

    fn list(&self, document_id: i64) -> AppResult<Vec<EndpointDefinition>> {
        let mut conn = self.conn()?;
        dsl::api_endpoints
            .filter(dsl::owner_document_id.eq(document_id))
            .order(dsl::id.asc())
            .select(EndpointRow::as_select())
            .load(&mut conn)
            .map_err(storage)?
            .into_iter()
            .map(EndpointRow::into_definition)
            .collect()
    }

    fn get(&self, id: i64) -> AppResult<Option<EndpointDefinition>> {
        let mut conn = self.conn()?;
        Self::load(&mut conn, id)
    }

    fn update(&self, endpoint: EndpointDefinition) -> AppResult<EndpointDefinition> {
        let id = endpoint
            .id
            .ok_or_else(|| AppError::InvalidRequest("endpoint id is required for update".into()))?;
        let changes = EndpointChangeset::from_definition(&endpoint, Utc::now().naive_utc())?;
        let mut conn = self.conn()?;

        let affected = diesel::update(dsl::api_endpoints.find(id))
            .set(&changes)
            .execute(&mut conn)
            .map_err(storage)?;
        if affected == 0 {
            return Err(AppError::EndpointNotFound(id));
        }

        Self::load(&mut conn, id)?.ok_or(AppError::EndpointNotFound(id))
    }

    fn delete(&self, id: i64) -> AppResult<bool> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(dsl::api_endpoints.find(id))
            .execute(&mut conn)
            .map_err(storage)?;
        Ok(affected > 0)
    }
}
