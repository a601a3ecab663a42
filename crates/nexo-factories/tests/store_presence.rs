use nexo_factories::{
    fake, Attributes, BelongsTo, Factory, FactoryRegistry, FactoryState, Model, RecordStore, SeederManager, Sequence,
    StateFn,
};
use nexo_validation::{Rules, Validator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

static ISBN: Sequence = Sequence::starting_at(1);

#[derive(Debug, Serialize, Deserialize)]
struct Author {
    id: Option<i64>,
    name: String,
}

impl Model for Author {
    fn table_name() -> &'static str {
        "authors"
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Book {
    id: Option<i64>,
    author_id: Option<i64>,
    title: String,
    isbn: String,
    pages: i64,
    is_out_of_print: bool,
}

impl Model for Book {
    fn table_name() -> &'static str {
        "books"
    }
}

#[derive(Default)]
struct AuthorFactory;

impl Factory for AuthorFactory {
    type Model = Author;

    fn definition(&self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("name".into(), json!(fake::name()));
        attributes
    }
}

#[derive(Default)]
struct BookFactory;

impl Factory for BookFactory {
    type Model = Book;

    fn definition(&self) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert("title".into(), json!(fake::sentence_between(2, 5)));
        attributes.insert("isbn".into(), json!(ISBN.next_with("978-84")));
        attributes.insert("pages".into(), json!(fake::number_between(80, 900)));
        attributes.insert("is_out_of_print".into(), json!(false));
        attributes
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        match name {
            "out_of_print" => Some(Box::new(StateFn::new("out_of_print", |attributes| {
                attributes.insert("is_out_of_print".into(), json!(true));
            }))),
            _ => None,
        }
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["out_of_print"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![BelongsTo::required("author_id", "authors")]
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["isbn"]
    }
}

fn book_rules() -> Rules {
    Rules::new()
        .field("author_id", "required|integer|exists:authors,id")
        .field("title", "required|string|max:255")
        .field("isbn", "required|string|unique:books,isbn")
        .field("pages", "required|integer|min:1")
}

#[test]
fn test_seeded_rows_reference_existing_parents() {
    fake::seed_fake_data(21);
    let store = RecordStore::new();
    SeederManager::new()
        .add_factory("books", BookFactory.builder(), 12)
        .add_factory("authors", AuthorFactory.builder(), 3)
        .run_for_environment(&store, &nexo_factories::Environment::Testing)
        .unwrap_err();

    // books alone cannot find authors; declare the dependency and retry
    let store = RecordStore::new();
    SeederManager::new()
        .add(nexo_factories::FactorySeeder::new("books", BookFactory.builder(), 12).depends_on(["authors"]))
        .add_factory("authors", AuthorFactory.builder(), 3)
        .run_for_environment(&store, &nexo_factories::Environment::Testing)
        .unwrap();

    let author_ids = store.ids("authors");
    assert_eq!(author_ids.len(), 3);
    for book in store.rows("books") {
        let author_id = book["author_id"].as_i64().unwrap();
        assert!(author_ids.contains(&author_id));
    }
}

#[tokio::test]
async fn test_store_answers_unique_and_exists_rules() {
    let store = RecordStore::new();
    AuthorFactory.builder().create_many(&store, 2).unwrap();
    let existing = BookFactory.builder().create_raw(&store).unwrap();

    let rules = book_rules();
    let validator = Validator::new(&rules).unwrap().presence(&store);

    // a fresh book, parents resolved but not persisted, passes
    let fresh = BookFactory.builder().raw_with_parents(&store).unwrap();
    assert!(validator.validate(&fresh).await.is_ok());

    // reusing a stored isbn and pointing at a missing author fails both
    let mut clash = fresh.clone();
    clash.insert("isbn".into(), existing["isbn"].clone());
    clash.insert("author_id".into(), json!(99));
    let errors = validator.validate(&clash).await.unwrap_err();
    assert!(errors.has_field_errors("isbn"));
    assert!(errors.has_field_errors("author_id"));
}

#[test]
fn test_registry_builds_rows_by_name() {
    let registry = FactoryRegistry::new().register::<AuthorFactory>().register::<BookFactory>();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["authors", "books"]);

    let books = registry.get("books").unwrap();
    let mut overrides = Attributes::new();
    overrides.insert("pages".into(), json!(321));
    let row = books.raw(&["out_of_print".to_string()], &overrides).unwrap();

    assert_eq!(row["is_out_of_print"], true);
    assert_eq!(row["pages"], 321);
    assert_eq!(row.get("author_id"), None::<&Value>);
}
