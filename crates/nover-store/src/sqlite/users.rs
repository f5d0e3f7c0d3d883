//! SQLite user store

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, params};

use super::SqliteStore;
use crate::error::{StoreError, StoreResult, UniqueField};
use crate::user::{AuthorFlag, AuthorProfile, Credentials, NewUser, User, UserStore};

const USER_COLUMNS: &str = "user_id, user_code, email, full_name, username, pen_name, \
     avatar_url, login_with, is_email_verified, phone, instagram, bank_id, account_number, \
     flg_author, create_datetime, update_datetime, password";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        user_code: row.get(1)?,
        email: row.get(2)?,
        full_name: row.get(3)?,
        username: row.get(4)?,
        pen_name: row.get(5)?,
        avatar_url: row.get(6)?,
        login_with: row.get(7)?,
        is_email_verified: row.get(8)?,
        phone: row.get(9)?,
        instagram: row.get(10)?,
        bank_id: row.get(11)?,
        account_number: row.get(12)?,
        flg_author: row.get(13)?,
        create_datetime: row.get(14)?,
        update_datetime: row.get(15)?,
    })
}

fn credentials_from_row(row: &Row<'_>) -> rusqlite::Result<Credentials> {
    Ok(Credentials {
        user: user_from_row(row)?,
        password_hash: row.get(16)?,
    })
}

/// Name the unique column a failed write collided on
fn unique_conflict(err: rusqlite::Error) -> StoreError {
    let collided_on_pen_name = matches!(
        &err,
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("users.pen_name")
    );
    let err = StoreError::from(err);
    if !err.is_unique_violation() {
        return err;
    }
    if collided_on_pen_name {
        StoreError::AlreadyExists(UniqueField::PenName)
    } else {
        StoreError::AlreadyExists(UniqueField::EmailOrUsername)
    }
}

impl SqliteStore {
    fn find_user_where(&self, predicate: &str, value: &dyn rusqlite::ToSql) -> StoreResult<Option<User>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}");
        let user = conn
            .query_row(&sql, [value], user_from_row)
            .optional()?;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"INSERT INTO users
               (user_code, email, password, full_name, username, login_with,
                avatar_url, is_email_verified, flg_author,
                pen_name, phone, instagram, create_datetime)
               VALUES (?1, ?2, ?3, ?4, ?5, 'local', '', 0, ?6, ?7, ?8, ?9, ?10)"#,
            params![
                user.user_code,
                user.email,
                user.password_hash,
                user.full_name,
                user.username,
                AuthorFlag::No,
                user.pen_name,
                user.phone,
                user.instagram,
                Self::now(),
            ],
        )
        .map_err(unique_conflict)?;
        Ok(conn.last_insert_rowid())
    }

    async fn find_by_id(&self, user_id: i64) -> StoreResult<Option<User>> {
        self.find_user_where("user_id = ?1", &user_id)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.find_user_where("username = ?1 AND login_with = 'local'", &username)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_user_where("email = ?1 AND login_with = 'local'", &email)
    }

    async fn credentials_for(&self, username: &str) -> StoreResult<Option<Credentials>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1 AND login_with = 'local'"
        );
        let credentials = conn
            .query_row(&sql, [username], credentials_from_row)
            .optional()?;
        Ok(credentials)
    }

    async fn is_pen_name_taken(
        &self,
        pen_name: &str,
        except_user: Option<i64>,
    ) -> StoreResult<bool> {
        let conn = self.conn()?;
        let taken: bool = conn.query_row(
            r#"SELECT EXISTS (
                   SELECT 1 FROM users
                   WHERE pen_name = ?1 AND (?2 IS NULL OR user_id <> ?2)
               )"#,
            params![pen_name, except_user],
            |row| row.get(0),
        )?;
        Ok(taken)
    }

    async fn update_to_author(&self, user_id: i64, profile: &AuthorProfile) -> StoreResult<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"UPDATE users SET
                   pen_name = ?1,
                   phone = ?2,
                   instagram = ?3,
                   bank_id = ?4,
                   account_number = ?5,
                   flg_author = ?6,
                   update_datetime = ?7
               WHERE user_id = ?8"#,
            params![
                profile.pen_name,
                profile.phone,
                profile.instagram,
                profile.bank_id,
                profile.account_number,
                AuthorFlag::Yes,
                Self::now(),
                user_id,
            ],
        )
        .map_err(unique_conflict)?;

        if updated != 1 {
            return Err(StoreError::NotFound(format!(
                "User {user_id} not found or not updated"
            )));
        }
        Ok(())
    }
}
