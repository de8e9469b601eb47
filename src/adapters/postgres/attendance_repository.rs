//! PostgreSQL implementation of AttendanceRepository.

use crate::domain::attendance::{ActiveSession, ScanAction, ScanLog, ScanLogFilter, ScanStatus};
use crate::domain::foundation::{DomainError, ErrorCode, MemberId, ScanLogId, Timestamp};
use crate::ports::AttendanceRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt, db_error};

/// PostgreSQL implementation of the AttendanceRepository port.
pub struct PostgresAttendanceRepository {
    pool: PgPool,
}

impl PostgresAttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ScanLogRow {
    id: Uuid,
    scanned_code: String,
    member_name: String,
    scanned_at: DateTime<Utc>,
    action: String,
    status: String,
}

impl TryFrom<ScanLogRow> for ScanLog {
    type Error = DomainError;

    fn try_from(row: ScanLogRow) -> Result<Self, Self::Error> {
        Ok(ScanLog {
            id: ScanLogId::from_uuid(row.id),
            scanned_code: row.scanned_code,
            member_name: row.member_name,
            timestamp: Timestamp::from_datetime(row.scanned_at),
            action: ScanAction::parse(&row.action).map_err(corrupt)?,
            status: ScanStatus::parse(&row.status).map_err(corrupt)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    member_id: String,
    member_name: String,
    check_in_time: DateTime<Utc>,
}

impl TryFrom<SessionRow> for ActiveSession {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(ActiveSession {
            member_id: MemberId::parse(row.member_id).map_err(corrupt)?,
            member_name: row.member_name,
            check_in_time: Timestamp::from_datetime(row.check_in_time),
        })
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepository {
    async fn append_scan_log(&self, log: &ScanLog) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO scan_logs (id, scanned_code, member_name, scanned_at, action, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(log.id.as_uuid())
        .bind(&log.scanned_code)
        .bind(&log.member_name)
        .bind(log.timestamp.as_datetime())
        .bind(log.action.as_str())
        .bind(log.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("append scan log", e))?;

        Ok(())
    }

    async fn list_scan_logs(&self, filter: &ScanLogFilter) -> Result<Vec<ScanLog>, DomainError> {
        let rows: Vec<ScanLogRow> = sqlx::query_as(
            r#"
            SELECT id, scanned_code, member_name, scanned_at, action, status
            FROM scan_logs
            WHERE ($1::TEXT IS NULL OR scanned_code = $1)
              AND ($2::TIMESTAMPTZ IS NULL OR scanned_at >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR scanned_at < $3)
            ORDER BY scanned_at DESC
            "#,
        )
        .bind(filter.scanned_code.as_deref())
        .bind(filter.from.map(|t| *t.as_datetime()))
        .bind(filter.until.map(|t| *t.as_datetime()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list scan logs", e))?;

        rows.into_iter().map(ScanLog::try_from).collect()
    }

    async fn find_session(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<ActiveSession>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT member_id, member_name, check_in_time FROM active_sessions WHERE member_id = $1",
        )
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find session", e))?;

        row.map(ActiveSession::try_from).transpose()
    }

    async fn list_sessions(&self) -> Result<Vec<ActiveSession>, DomainError> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            r#"
            SELECT member_id, member_name, check_in_time
            FROM active_sessions
            ORDER BY check_in_time DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list sessions", e))?;

        rows.into_iter().map(ActiveSession::try_from).collect()
    }

    async fn start_session(&self, session: &ActiveSession) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO active_sessions (member_id, member_name, check_in_time)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(session.member_id.as_str())
        .bind(&session.member_name)
        .bind(session.check_in_time.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                match db_err.constraint() {
                    Some("active_sessions_pkey") => {
                        return DomainError::new(
                            ErrorCode::SessionExists,
                            format!("Member {} is already checked in", session.member_id),
                        );
                    }
                    Some("active_sessions_member_id_fkey") => {
                        return DomainError::new(
                            ErrorCode::MemberNotFound,
                            format!("Member {} not found", session.member_id),
                        );
                    }
                    _ => {}
                }
            }
            db_error("start session", e)
        })?;

        Ok(())
    }

    async fn end_session(
        &self,
        member_id: &MemberId,
    ) -> Result<Option<ActiveSession>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            DELETE FROM active_sessions
            WHERE member_id = $1
            RETURNING member_id, member_name, check_in_time
            "#,
        )
        .bind(member_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("end session", e))?;

        row.map(ActiveSession::try_from).transpose()
    }
}
