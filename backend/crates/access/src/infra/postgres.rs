//! PostgreSQL Profile Store

use sqlx::PgPool;

use crate::domain::entity::profile::ProfileRecord;
use crate::domain::repository::ProfileStore;
use crate::domain::value_object::{identity_id::IdentityId, role::Role};
use crate::error::{AccessError, AccessResult};

/// PostgreSQL-backed profile store over `user_profiles`
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProfileStore for PgProfileStore {
    async fn get_by_id(&self, id: &IdentityId) -> AccessResult<Option<ProfileRecord>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                email,
                avatar_ref,
                role,
                first_name,
                last_name,
                classroom,
                domain_tag
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccessError::StoreReadFailure(e.to_string()))?;

        row.map(|r| r.into_record()).transpose()
    }

    async fn upsert(&self, id: &IdentityId, record: &ProfileRecord) -> AccessResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (
                user_id,
                email,
                avatar_ref,
                role,
                first_name,
                last_name,
                classroom,
                domain_tag
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                email = EXCLUDED.email,
                avatar_ref = EXCLUDED.avatar_ref,
                role = EXCLUDED.role,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                classroom = EXCLUDED.classroom,
                domain_tag = EXCLUDED.domain_tag,
                updated_at = now()
            "#,
        )
        .bind(id.as_str())
        .bind(record.email.as_deref())
        .bind(record.avatar_ref.as_deref())
        .bind(record.role.code())
        .bind(record.first_name.as_deref())
        .bind(record.last_name.as_deref())
        .bind(record.classroom.as_deref())
        .bind(record.domain_tag.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| AccessError::StoreWriteFailure(e.to_string()))?;

        tracing::debug!(identity_id = %id, role = %record.role, "Profile upserted");

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProfileRow {
    email: Option<String>,
    avatar_ref: Option<String>,
    role: String,
    first_name: Option<String>,
    last_name: Option<String>,
    classroom: Option<String>,
    domain_tag: Option<String>,
}

impl ProfileRow {
    fn into_record(self) -> AccessResult<ProfileRecord> {
        let role = Role::from_code(&self.role).ok_or_else(|| {
            AccessError::StoreReadFailure(format!("Unknown role code: {}", self.role))
        })?;

        Ok(ProfileRecord {
            email: self.email,
            avatar_ref: self.avatar_ref,
            role,
            first_name: self.first_name,
            last_name: self.last_name,
            classroom: self.classroom,
            domain_tag: self.domain_tag,
        })
    }
}
