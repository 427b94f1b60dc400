use chrono::NaiveDate;
use taskboard::{
    CrudError, TaskDb, TaskDbBuilder, TaskFilter, TaskForm, TaskPriority, TaskStatus,
    ValidatedTask,
};

async fn new_db() -> TaskDb {
    let _ = env_logger::builder().is_test(true).try_init();
    TaskDbBuilder::new("sqlite::memory:")
        .build()
        .await
        .expect("Failed to create TaskDb")
}

fn fields(title: &str) -> ValidatedTask {
    TaskForm {
        title: title.into(),
        ..TaskForm::initial()
    }
    .validate()
    .expect("form should validate")
}

#[tokio::test]
async fn test_taskdb_basic_crud() {
    let db = new_db().await;

    // INSERT
    let created = db
        .create(ValidatedTask {
            title: "Buy milk".into(),
            description: "Semi-skimmed".into(),
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2030, 1, 15),
        })
        .await
        .expect("Failed to insert");
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.priority, TaskPriority::High);
    assert_eq!(created.created_at, created.updated_at);

    // SELECT by id
    let found = db.get(created.id).await.expect("Failed to find by id");
    assert_eq!(found, created);

    // UPDATE
    let updated = db
        .update(
            created.id,
            ValidatedTask {
                title: "Buy bread".into(),
                description: String::new(),
                status: TaskStatus::InProgress,
                priority: TaskPriority::Low,
                due_date: None,
            },
        )
        .await
        .expect("Failed to update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Buy bread");
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    // DELETE
    db.delete(updated.id).await.expect("Failed to delete");
    let all = db.list(&TaskFilter::default()).await.expect("Failed to list");
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_create_defaults() {
    let db = new_db().await;
    let task = db.create(fields("Defaults")).await.expect("Failed to insert");
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert_eq!(task.description, "");
    assert_eq!(task.due_date, None);
    assert!(!task.is_overdue());
}

#[tokio::test]
async fn test_invalid_form_stores_nothing() {
    let db = new_db().await;
    let form = TaskForm {
        title: "".into(),
        ..TaskForm::initial()
    };
    assert!(form.validate().is_err());

    let counts = db.counts().await.expect("Failed to count");
    assert_eq!(counts.total, 0);
}

#[tokio::test]
async fn test_toggle_cycles_with_increasing_updated_at() {
    let db = new_db().await;
    let task = db.create(fields("Cycle me")).await.expect("Failed to insert");

    let mut last = task.updated_at;
    let mut seen = Vec::new();
    for _ in 0..3 {
        let toggled = db.toggle(task.id).await.expect("Failed to toggle");
        assert!(toggled.updated_at > last, "updated_at must strictly increase");
        assert!(toggled.created_at <= toggled.updated_at);
        last = toggled.updated_at;
        seen.push(toggled.status);
    }

    assert_eq!(
        seen,
        vec![TaskStatus::InProgress, TaskStatus::Done, TaskStatus::Todo]
    );
    let reloaded = db.get(task.id).await.expect("Failed to reload");
    assert_eq!(reloaded.status, task.status);
    assert_eq!(reloaded.created_at, task.created_at);
}

#[tokio::test]
async fn test_filter_and_counts() {
    let db = new_db().await;
    let a = db.create(fields("Alpha")).await.unwrap();
    let b = db.create(fields("Beta")).await.unwrap();
    let c = db.create(fields("Gamma")).await.unwrap();

    db.toggle(b.id).await.unwrap();
    db.toggle(b.id).await.unwrap();
    db.toggle(c.id).await.unwrap();

    let done = db.list(&TaskFilter::new("DONE", "")).await.unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, b.id);
    assert!(done.iter().all(|t| t.status == TaskStatus::Done));

    let counts = db.counts().await.unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.todo, 1);
    assert_eq!(counts.in_progress, 1);
    assert_eq!(counts.done, 1);

    let medium_todo = db.list(&TaskFilter::new("TODO", "MEDIUM")).await.unwrap();
    assert_eq!(medium_todo.len(), 1);
    assert_eq!(medium_todo[0].id, a.id);

    assert!(db.list(&TaskFilter::new("", "HIGH")).await.unwrap().is_empty());
    assert!(db.list(&TaskFilter::new("BOGUS", "")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let db = new_db().await;
    let first = db.create(fields("First")).await.unwrap();
    let second = db.create(fields("Second")).await.unwrap();
    let third = db.create(fields("Third")).await.unwrap();

    let ids: Vec<i32> = db
        .list(&TaskFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn test_deleted_task_is_not_found() {
    let db = new_db().await;
    let task = db.create(fields("Ephemeral")).await.unwrap();
    db.delete(task.id).await.unwrap();

    assert!(matches!(db.get(task.id).await, Err(CrudError::NotFound(id)) if id == task.id));
    assert!(matches!(db.toggle(task.id).await, Err(CrudError::NotFound(_))));
    assert!(matches!(
        db.update(task.id, fields("Back again")).await,
        Err(CrudError::NotFound(_))
    ));
    assert!(matches!(db.delete(task.id).await, Err(CrudError::NotFound(_))));
}
