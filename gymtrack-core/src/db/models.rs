use diesel::{Insertable, Queryable, Selectable};

use crate::db::schema;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::local_kv)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = schema::local_kv)]
pub struct NewKvEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub updated_at: i64,
}
