use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::db::models::{KvEntry, NewKvEntry};
use crate::db::schema::local_kv;

pub fn get_value(conn: &mut SqliteConnection, key: &str) -> Result<Option<String>> {
    local_kv::table
        .find(key)
        .select(local_kv::value)
        .first::<String>(conn)
        .optional()
        .map_err(Into::into)
}

pub fn get_entry(conn: &mut SqliteConnection, key: &str) -> Result<Option<KvEntry>> {
    local_kv::table
        .find(key)
        .select(KvEntry::as_select())
        .first(conn)
        .optional()
        .map_err(Into::into)
}

/// Inserts or overwrites a key.
pub fn put_value(conn: &mut SqliteConnection, key: &str, value: &str) -> Result<usize> {
    diesel::replace_into(local_kv::table)
        .values(&NewKvEntry {
            key,
            value,
            updated_at: Utc::now().timestamp(),
        })
        .execute(conn)
        .map_err(Into::into)
}

pub fn put_values(conn: &mut SqliteConnection, entries: &[(&str, &str)]) -> Result<usize> {
    conn.transaction::<_, anyhow::Error, _>(|conn| {
        let mut written = 0;
        for (key, value) in entries {
            written += put_value(conn, key, value)?;
        }
        Ok(written)
    })
}

pub fn delete_values(conn: &mut SqliteConnection, keys: &[&str]) -> Result<usize> {
    diesel::delete(local_kv::table.filter(local_kv::key.eq_any(keys.to_vec())))
        .execute(conn)
        .map_err(Into::into)
}

pub fn delete_all(conn: &mut SqliteConnection) -> Result<usize> {
    diesel::delete(local_kv::table)
        .execute(conn)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATIONS;
    use diesel_migrations::MigrationHarness;

    fn conn() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        conn.run_pending_migrations(MIGRATIONS).unwrap();
        conn
    }

    #[test]
    fn put_overwrites_and_stamps() {
        let mut conn = conn();
        put_value(&mut conn, "token", "a").unwrap();
        put_value(&mut conn, "token", "b").unwrap();

        let entry = get_entry(&mut conn, "token").unwrap().unwrap();
        assert_eq!(entry.value, "b");
        assert!(entry.updated_at > 0);
        assert_eq!(get_value(&mut conn, "missing").unwrap(), None);
    }

    #[test]
    fn batch_put_and_delete() {
        let mut conn = conn();
        put_values(&mut conn, &[("token", "t"), ("user", "{}"), ("first_launch_done", "1")]).unwrap();
        assert_eq!(delete_values(&mut conn, &["token", "user"]).unwrap(), 2);
        assert_eq!(get_value(&mut conn, "token").unwrap(), None);
        assert_eq!(get_value(&mut conn, "first_launch_done").unwrap().as_deref(), Some("1"));
        assert_eq!(delete_all(&mut conn).unwrap(), 1);
    }
}
