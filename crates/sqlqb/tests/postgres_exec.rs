//! Executes rendered statements against Postgres when `DATABASE_URL` is set.

use sqlqb::{Op, QueryBuilder, excluded};

async fn try_connect() -> Option<tokio_postgres::Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

async fn setup(client: &tokio_postgres::Client, table: &str) {
    client
        .batch_execute(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TEMP TABLE {table} (
                 id INT4 PRIMARY KEY,
                 name TEXT NOT NULL,
                 score FLOAT8,
                 tags TEXT[]
             );"
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn insert_select_round_trip() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client, "sqlqb_people").await;

    let mut qb = QueryBuilder::new();
    for (id, name) in [(1, "alice"), (2, "bob"), (3, "carol")] {
        let q = qb
            .insert("sqlqb_people")
            .set("id", id)
            .set("name", name)
            .set("score", 1.5)
            .build();
        client
            .execute(q.sql.as_str(), &q.params_ref())
            .await
            .unwrap();
    }

    let q = qb
        .select(&["name"])
        .from("sqlqb_people")
        .where_in("id", vec![1, 3])
        .order_by("id")
        .build();
    let rows = client.query(q.sql.as_str(), &q.params_ref()).await.unwrap();
    let names: Vec<String> = rows.iter().map(|r| r.get(0)).collect();
    assert_eq!(names, vec!["alice", "carol"]);
}

#[tokio::test]
async fn upsert_uses_excluded_value() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client, "sqlqb_upsert").await;

    let mut qb = QueryBuilder::new();
    for name in ["first", "second"] {
        let q = qb
            .insert("sqlqb_upsert")
            .set("id", 1)
            .set("name", name)
            .on_conflict(&["id"])
            .on_conflict_set("name", excluded("name"))
            .returning(&["name"])
            .build();
        let row = client
            .query_one(q.sql.as_str(), &q.params_ref())
            .await
            .unwrap();
        let stored: String = row.get(0);
        assert_eq!(stored, name);
    }
}

#[tokio::test]
async fn guarded_delete_affects_nothing() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client, "sqlqb_guard").await;

    let mut qb = QueryBuilder::new();
    let q = qb
        .insert("sqlqb_guard")
        .set("id", 1)
        .set("name", "x")
        .build();
    client
        .execute(q.sql.as_str(), &q.params_ref())
        .await
        .unwrap();

    let q = qb.delete("sqlqb_guard").build();
    let affected = client
        .execute(q.sql.as_str(), &q.params_ref())
        .await
        .unwrap();
    assert_eq!(affected, 0);

    let q = qb.delete("sqlqb_guard").and_where("id", Op::Eq, 1).build();
    let affected = client
        .execute(q.sql.as_str(), &q.params_ref())
        .await
        .unwrap();
    assert_eq!(affected, 1);
}

#[tokio::test]
async fn list_binds_as_array() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    setup(&client, "sqlqb_tags").await;

    let mut qb = QueryBuilder::new();
    let q = qb
        .insert("sqlqb_tags")
        .set("id", 1)
        .set("name", "tagged")
        .set("tags", vec!["a", "b"])
        .build();
    client
        .execute(q.sql.as_str(), &q.params_ref())
        .await
        .unwrap();

    let row = client
        .query_one("SELECT tags FROM sqlqb_tags WHERE id = 1", &[])
        .await
        .unwrap();
    let tags: Vec<String> = row.get(0);
    assert_eq!(tags, vec!["a", "b"]);
}
