//! MemberRepository - member persistence

use super::{Create, Read, Update};
use crate::dtos::{CreateMemberDTO, UpdateMemberDTO};
use crate::entities::Member;
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

// MEMBER REPOSITORY
pub struct MemberRepository {
    connection_pool: SqlitePool,
}

impl MemberRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Find members by exact name. Used by the duplicate-name check at
    /// registration time.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Member>, Error> {
        debug!("Finding members by name");
        let members = sqlx::query_as::<_, Member>(
            "SELECT member_id, name, city, street, zipcode FROM members WHERE name = ?",
        )
        .bind(name)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(members)
    }

    pub async fn find_all(&self) -> Result<Vec<Member>, Error> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT member_id, name, city, street, zipcode FROM members ORDER BY member_id",
        )
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(members)
    }
}

impl Create<Member, CreateMemberDTO> for MemberRepository {
    #[instrument(skip(self, data), fields(name = %data.name))]
    async fn create(&self, data: &CreateMemberDTO) -> Result<Member, Error> {
        debug!("Creating new member");
        let result =
            sqlx::query("INSERT INTO members (name, city, street, zipcode) VALUES (?, ?, ?, ?)")
                .bind(&data.name)
                .bind(&data.city)
                .bind(&data.street)
                .bind(&data.zipcode)
                .execute(&self.connection_pool)
                .await?;

        let new_id = result.last_insert_rowid();

        info!("Member created with id {}", new_id);

        Ok(Member {
            member_id: new_id,
            name: data.name.clone(),
            address: data.address(),
        })
    }
}

impl Read<Member, i64> for MemberRepository {
    async fn read(&self, id: &i64) -> Result<Option<Member>, Error> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT member_id, name, city, street, zipcode FROM members WHERE member_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(member)
    }
}

impl Update<Member, UpdateMemberDTO, i64> for MemberRepository {
    #[instrument(skip(self, data), fields(member_id = %id))]
    async fn update(&self, id: &i64, data: &UpdateMemberDTO) -> Result<Member, Error> {
        debug!("Updating member");
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        let Some(ref name) = data.name else {
            debug!("No fields to update, returning current member");
            return Ok(current);
        };

        sqlx::query("UPDATE members SET name = ? WHERE member_id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        info!("Member updated successfully");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}
