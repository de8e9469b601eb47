//! PostgreSQL implementation of MemberRepository and MemberIdAllocator.

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, Timestamp};
use crate::domain::member::{Member, MemberProfile, MemberUpdate};
use crate::ports::{MemberIdAllocator, MemberRepository};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use super::{corrupt, db_error};

/// PostgreSQL implementation of the member ports.
pub struct PostgresMemberRepository {
    pool: PgPool,
    prefix: String,
    counter_seed: u64,
}

impl PostgresMemberRepository {
    /// Creates a repository. The first allocated id is `prefix-(seed + 1)`.
    pub fn new(pool: PgPool, prefix: impl Into<String>, counter_seed: u64) -> Self {
        Self {
            pool,
            prefix: prefix.into(),
            counter_seed,
        }
    }
}

/// Database row representation of a member.
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    member_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    birthday: Option<NaiveDate>,
    age: Option<i32>,
    address: Option<String>,
    goal: Option<String>,
    program_type: Option<String>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Member {
            id: MemberId::parse(row.member_id).map_err(corrupt)?,
            name: row.name,
            profile: MemberProfile {
                email: row.email,
                phone: row.phone,
                birthday: row.birthday,
                age: row.age.and_then(|a| u32::try_from(a).ok()),
                address: row.address,
                goal: row.goal,
                program_type: row.program_type,
                height_cm: row.height_cm,
                weight_kg: row.weight_kg,
            },
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_MEMBER: &str = r#"
    SELECT member_id, name, email, phone, birthday, age, address, goal, program_type,
           height_cm, weight_kg, created_at, updated_at
    FROM members
"#;

#[async_trait]
impl MemberIdAllocator for PostgresMemberRepository {
    async fn next_member_id(&self) -> Result<MemberId, DomainError> {
        // Single statement so concurrent registrations never share a value.
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO member_counter (prefix, value) VALUES ($1, $2 + 1)
            ON CONFLICT (prefix) DO UPDATE SET value = member_counter.value + 1
            RETURNING value
            "#,
        )
        .bind(&self.prefix)
        .bind(self.counter_seed as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("allocate member id", e))?;

        Ok(MemberId::from_parts(&self.prefix, value as u64)?)
    }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
    async fn save(&self, member: &Member) -> Result<(), DomainError> {
        let p = &member.profile;
        sqlx::query(
            r#"
            INSERT INTO members (
                member_id, name, email, phone, birthday, age, address, goal, program_type,
                height_cm, weight_kg, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(member.id.as_str())
        .bind(&member.name)
        .bind(&p.email)
        .bind(&p.phone)
        .bind(p.birthday)
        .bind(p.age.map(|a| a as i32))
        .bind(&p.address)
        .bind(&p.goal)
        .bind(&p.program_type)
        .bind(p.height_cm)
        .bind(p.weight_kg)
        .bind(member.created_at.as_datetime())
        .bind(member.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("members_pkey") {
                    return DomainError::new(
                        ErrorCode::MemberExists,
                        format!("Member {} already exists", member.id),
                    );
                }
            }
            db_error("save member", e)
        })?;

        Ok(())
    }

    async fn update(
        &self,
        id: &MemberId,
        update: MemberUpdate,
        now: Timestamp,
    ) -> Result<Option<Member>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin member update", e))?;

        let row: Option<MemberRow> =
            sqlx::query_as(&format!("{} WHERE member_id = $1 FOR UPDATE", SELECT_MEMBER))
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| db_error("load member", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut member = Member::try_from(row)?;
        member.apply(update, now)?;

        let p = &member.profile;
        sqlx::query(
            r#"
            UPDATE members SET
                name = $2, email = $3, phone = $4, birthday = $5, age = $6, address = $7,
                goal = $8, program_type = $9, height_cm = $10, weight_kg = $11, updated_at = $12
            WHERE member_id = $1
            "#,
        )
        .bind(member.id.as_str())
        .bind(&member.name)
        .bind(&p.email)
        .bind(&p.phone)
        .bind(p.birthday)
        .bind(p.age.map(|a| a as i32))
        .bind(&p.address)
        .bind(&p.goal)
        .bind(&p.program_type)
        .bind(p.height_cm)
        .bind(p.weight_kg)
        .bind(member.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("update member", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit member update", e))?;

        Ok(Some(member))
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> =
            sqlx::query_as(&format!("{} WHERE member_id = $1", SELECT_MEMBER))
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find member", e))?;

        row.map(Member::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Member>, DomainError> {
        let rows: Vec<MemberRow> =
            sqlx::query_as(&format!("{} ORDER BY created_at DESC, member_id DESC", SELECT_MEMBER))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("list members", e))?;

        rows.into_iter().map(Member::try_from).collect()
    }

    async fn delete(&self, id: &MemberId) -> Result<bool, DomainError> {
        // Live subscription, intake records and session go with the member
        // through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM members WHERE member_id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete member", e))?;

        Ok(result.rows_affected() > 0)
    }
}
