use crate::config::DatabaseSettings;
use crate::core::{NewPet, Pet, PetChanges, PetId, PetStore, Species};
use crate::utils::error::{PetError, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::collections::BTreeSet;

/// Columns selected for a full pet row; the enum is read back as text.
const PET_COLUMNS: &str =
    r#"id::BIGINT AS id, name, age, "type"::TEXT AS species, created_at"#;

const CREATE_SPECIES_TYPE: &str = r#"
DO $$ BEGIN
    CREATE TYPE "type" AS ENUM ('dog', 'cat');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;
"#;

const CREATE_PET_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "Pet" (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    age INTEGER NOT NULL,
    "type" "type" NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT (now() AT TIME ZONE 'utc')
)
"#;

/// Storage-side row; mapped into the domain `Pet` explicitly.
#[derive(Debug, FromRow)]
struct PetRow {
    id: i64,
    name: String,
    age: i32,
    species: String,
    created_at: NaiveDateTime,
}

impl TryFrom<PetRow> for Pet {
    type Error = PetError;

    fn try_from(row: PetRow) -> Result<Self> {
        let species = row
            .species
            .parse::<Species>()
            .map_err(|message| PetError::StoreError { message })?;

        Ok(Pet {
            id: row.id,
            name: row.name,
            age: row.age,
            species,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PostgresPetStore {
    pool: PgPool,
}

impl PostgresPetStore {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let url = settings.connection_url()?;
        tracing::info!(
            "Connecting to postgres at {} (max {} connections)",
            settings.redacted_url()?,
            settings.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the species enum and the pet table when they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_SPECIES_TYPE).execute(&self.pool).await?;
        sqlx::query(CREATE_PET_TABLE).execute(&self.pool).await?;
        tracing::debug!("Pet schema is in place");
        Ok(())
    }

    async fn fetch_by_id(&self, id: PetId) -> Result<Pet> {
        let sql = format!(r#"SELECT {} FROM "Pet" WHERE id = $1"#, PET_COLUMNS);
        let row: Option<PetRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(PetError::NotFound { id })?.try_into()
    }
}

/// `UPDATE "Pet" SET <present fields> WHERE id = $n RETURNING <columns>`.
/// Callers must not pass an empty change set.
pub(crate) fn build_update_query(id: PetId, changes: &PetChanges) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(r#"UPDATE "Pet" SET "#);
    {
        let mut assignments = builder.separated(", ");
        if let Some(name) = &changes.name {
            assignments.push("name = ");
            assignments.push_bind_unseparated(name.clone());
        }
        if let Some(age) = changes.age {
            assignments.push("age = ");
            assignments.push_bind_unseparated(age);
        }
        if let Some(species) = changes.species {
            assignments.push(r#""type" = "#);
            assignments.push_bind_unseparated(species.as_str());
            assignments.push_unseparated(r#"::"type""#);
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING ");
    builder.push(PET_COLUMNS);
    builder
}

#[async_trait]
impl PetStore for PostgresPetStore {
    async fn list(&self, limit: u32) -> Result<Vec<Pet>> {
        let sql = format!(
            r#"SELECT {} FROM "Pet" ORDER BY id LIMIT $1"#,
            PET_COLUMNS
        );
        let rows: Vec<PetRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Pet::try_from).collect()
    }

    async fn insert(&self, pet: &NewPet) -> Result<Pet> {
        let sql = format!(
            r#"INSERT INTO "Pet" (name, age, "type") VALUES ($1, $2, $3::"type") RETURNING {}"#,
            PET_COLUMNS
        );
        let row: PetRow = sqlx::query_as(&sql)
            .bind(&pet.name)
            .bind(pet.age)
            .bind(pet.species.as_str())
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn ids_existing(&self, ids: &[PetId]) -> Result<BTreeSet<PetId>> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let found: Vec<i64> =
            sqlx::query_scalar(r#"SELECT id::BIGINT FROM "Pet" WHERE id = ANY($1)"#)
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(found.into_iter().collect())
    }

    async fn delete_by_ids(&self, ids: &[PetId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(r#"DELETE FROM "Pet" WHERE id = ANY($1)"#)
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_by_id(&self, id: PetId, changes: &PetChanges) -> Result<Pet> {
        if changes.is_empty() {
            return self.fetch_by_id(id).await;
        }

        let mut query = build_update_query(id, changes);
        let row: Option<PetRow> = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;
        // 存在檢查之後被刪除 (TOCTOU)
        row.ok_or(PetError::NotFound { id })?.try_into()
    }

    async fn exists_by_id(&self, id: PetId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM "Pet" WHERE id = $1)"#)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Postgres pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_query_sets_only_present_fields() {
        let changes = PetChanges {
            age: Some(3),
            ..PetChanges::default()
        };
        let query = build_update_query(1, &changes);
        assert_eq!(
            query.sql(),
            format!(
                r#"UPDATE "Pet" SET age = $1 WHERE id = $2 RETURNING {}"#,
                PET_COLUMNS
            )
        );
    }

    #[test]
    fn test_created_at_defaults_to_utc_like_memory_store() {
        assert!(CREATE_PET_TABLE.contains("DEFAULT (now() AT TIME ZONE 'utc')"));
    }

    #[test]
    fn test_update_query_casts_species_to_enum() {
        let changes = PetChanges {
            name: Some("Rex".to_string()),
            age: None,
            species: Some(Species::Cat),
        };
        let query = build_update_query(7, &changes);
        assert_eq!(
            query.sql(),
            format!(
                r#"UPDATE "Pet" SET name = $1, "type" = $2::"type" WHERE id = $3 RETURNING {}"#,
                PET_COLUMNS
            )
        );
    }

    #[test]
    fn test_row_with_unknown_species_is_a_store_error() {
        let row = PetRow {
            id: 1,
            name: "Rex".to_string(),
            age: 1,
            species: "bird".to_string(),
            created_at: NaiveDateTime::default(),
        };
        assert!(matches!(
            Pet::try_from(row),
            Err(PetError::StoreError { .. })
        ));
    }
}
