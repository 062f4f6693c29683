//! Runs identical operations against the PostgreSQL and in-memory document
//! stores and checks that they agree.
//!
//! Needs a reachable database in `DATABASE_URL`; the test returns early
//! without it. Each run works in its own schema, dropped at the end.

use serde_json::{Map, Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use coursehub_core::traits::DocumentStore;
use coursehub_core::types::{Collection, CompareOp, EntityId, PaginationWindow, Predicate};
use coursehub_database::migration::run_migrations;
use coursehub_database::{MemoryDocumentStore, PgDocumentStore};

struct Backends {
    memory: MemoryDocumentStore,
    postgres: PgDocumentStore,
    admin: PgPool,
    schema: String,
}

impl Backends {
    async fn connect() -> Option<Self> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping store parity test");
            return None;
        };
        let schema = format!("parity_{}", EntityId::new().to_string().replace('-', ""));

        let admin = PgPool::connect(&url).await.expect("connect admin pool");
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("create schema");

        let search_path = format!("SET search_path TO {schema}");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    sqlx::query(&search_path).execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .expect("connect schema pool");
        run_migrations(&pool).await.expect("migrate schema");

        Some(Self {
            memory: MemoryDocumentStore::new(),
            postgres: PgDocumentStore::new(pool),
            admin,
            schema,
        })
    }

    async fn insert_both(&self, collection: Collection, doc: Value) {
        self.memory.insert(collection, doc.clone()).await.unwrap();
        self.postgres.insert(collection, doc).await.unwrap();
    }

    async fn drop_schema(self) {
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .expect("drop schema");
    }
}

fn names(docs: &[Value]) -> Vec<String> {
    docs.iter()
        .map(|d| d["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn course(body: Value) -> Value {
    let mut body = body;
    body["id"] = json!(EntityId::new().to_string());
    body
}

fn fixtures() -> Vec<Value> {
    vec![
        course(json!({"name": "Laboratory Safety", "credits": 3, "ou": 1, "meta": {"level": "intro"}})),
        course(json!({"name": "Orientation", "credits": 1.5, "ou": 2})),
        course(json!({"name": "Chemistry Lab 101", "credits": 4.0, "ou": 1, "tags": ["lab"]})),
        course(json!({"name": "50% off_sale\\", "credits": "3", "ou": null})),
        course(json!({"name": "C++ Basics", "active": true})),
        course(json!({"name": "beta", "credits": 3.0})),
    ]
}

fn predicates() -> Vec<(&'static str, Predicate)> {
    let contains = |value: &str| Predicate::Contains {
        field: "name".into(),
        value: value.into(),
    };
    let word = |value: &str| Predicate::Word {
        field: "name".into(),
        value: value.into(),
    };
    let compare = |field: &str, op, value: Value| Predicate::Compare {
        field: field.into(),
        op,
        value,
    };
    vec![
        ("all", Predicate::All),
        ("eq text", Predicate::eq("name", "Orientation")),
        ("eq integer", Predicate::eq("credits", 3)),
        ("eq decimal text", Predicate::eq("credits", "3.0")),
        ("eq bool", Predicate::eq("active", true)),
        ("eq nested", Predicate::eq("meta.level", "intro")),
        ("eq array field", Predicate::eq("tags", "lab")),
        (
            "in",
            Predicate::In {
                field: "credits".into(),
                values: vec![json!("3"), json!("4")],
            },
        ),
        ("not eq missing", Predicate::negate(Predicate::eq("ou", 1))),
        ("contains", contains("lab")),
        ("contains percent", contains("50%")),
        ("contains underscore", contains("_")),
        ("contains backslash", contains("\\")),
        (
            "starts with",
            Predicate::StartsWith {
                field: "name".into(),
                value: "c".into(),
            },
        ),
        (
            "ends with",
            Predicate::EndsWith {
                field: "name".into(),
                value: "101".into(),
            },
        ),
        ("word", word("lab")),
        ("word symbols", word("c++")),
        ("gt numeric", compare("credits", CompareOp::Gt, json!(2))),
        ("lte numeric text", compare("credits", CompareOp::Lte, json!("3"))),
        ("lt string", compare("name", CompareOp::Lt, json!("M"))),
        ("and empty", Predicate::And { predicates: vec![] }),
        ("or empty", Predicate::Or { predicates: vec![] }),
        (
            "or",
            Predicate::Or {
                predicates: vec![Predicate::eq("ou", 2), contains("beta")],
            },
        ),
    ]
}

#[tokio::test]
async fn test_stores_agree_on_predicates_and_writes() {
    let Some(backends) = Backends::connect().await else {
        return;
    };
    let docs = fixtures();
    for doc in &docs {
        backends.insert_both(Collection::Courses, doc.clone()).await;
    }

    for (label, predicate) in predicates() {
        let memory = backends
            .memory
            .find(Collection::Courses, &predicate, None)
            .await
            .unwrap();
        let postgres = backends
            .postgres
            .find(Collection::Courses, &predicate, None)
            .await
            .unwrap();
        assert_eq!(names(&postgres), names(&memory), "find: {label}");

        let memory_count = backends.memory.count(Collection::Courses, &predicate).await.unwrap();
        let pg_count = backends.postgres.count(Collection::Courses, &predicate).await.unwrap();
        assert_eq!(pg_count, memory_count, "count: {label}");
    }

    let window = Some(PaginationWindow { skip: 1, limit: 2 });
    let memory = backends
        .memory
        .find(Collection::Courses, &Predicate::All, window)
        .await
        .unwrap();
    let postgres = backends
        .postgres
        .find(Collection::Courses, &Predicate::All, window)
        .await
        .unwrap();
    assert_eq!(names(&postgres), vec!["Orientation", "Chemistry Lab 101"]);
    assert_eq!(names(&postgres), names(&memory));

    let id = EntityId::parse(docs[2]["id"].as_str().unwrap()).unwrap();
    let mut set = Map::new();
    set.insert("credits".into(), json!(5));
    set.insert("tags".into(), json!(["chemistry"]));
    let memory = backends
        .memory
        .update_by_id(Collection::Courses, id, set.clone())
        .await
        .unwrap();
    let postgres = backends
        .postgres
        .update_by_id(Collection::Courses, id, set)
        .await
        .unwrap();
    assert!(postgres.is_some());
    assert_eq!(postgres, memory);

    let stages = vec![
        json!({"$match": {"ou": 1}}),
        json!({"$group": {"_id": "$ou", "credits": {"$sum": "$credits"}}}),
    ];
    let memory = backends.memory.aggregate(Collection::Courses, &stages).await.unwrap();
    let postgres = backends.postgres.aggregate(Collection::Courses, &stages).await.unwrap();
    assert_eq!(postgres, memory);

    assert_eq!(backends.postgres.delete_by_id(Collection::Courses, id).await.unwrap(), 1);
    assert_eq!(backends.postgres.delete_by_id(Collection::Courses, id).await.unwrap(), 0);

    backends.drop_schema().await;
}

#[tokio::test]
async fn test_stores_agree_on_upsert() {
    let Some(backends) = Backends::connect().await else {
        return;
    };
    let filter = Predicate::Or {
        predicates: vec![Predicate::eq("surveyId", "S1")],
    };
    let first_id = EntityId::new();

    for days in [3, 5] {
        let mut set = Map::new();
        set.insert("surveyId".into(), json!("S1"));
        set.insert("daysBefore".into(), json!(days));
        set.insert("channels".into(), json!(["email"]));
        let mut insert = Value::Object(set.clone());
        insert["id"] = json!(first_id.to_string());

        let memory = backends
            .memory
            .upsert(Collection::Reminders, &filter, set.clone(), insert.clone())
            .await
            .unwrap();
        insert["id"] = json!(if days == 3 {
            first_id.to_string()
        } else {
            EntityId::new().to_string()
        });
        let postgres = backends
            .postgres
            .upsert(Collection::Reminders, &filter, set, insert)
            .await
            .unwrap();
        assert_eq!(postgres, memory, "upsert daysBefore={days}");
        assert_eq!(postgres["id"], json!(first_id.to_string()));
    }

    let memory = backends.memory.count(Collection::Reminders, &filter).await.unwrap();
    let postgres = backends.postgres.count(Collection::Reminders, &filter).await.unwrap();
    assert_eq!((memory, postgres), (1, 1));

    backends.drop_schema().await;
}
