use ironlog_core::db::open_db_in_memory;
use ironlog_core::service::seed::SEED_TEMPLATE_NAME;
use ironlog_core::{
    open_store, seed_if_empty, CoreConfig, ExerciseInput, LogLevel, NewTemplate,
    SqliteTemplateRepository, TemplateService, WeightUnit,
};

#[test]
fn empty_store_is_seeded_with_push_day() {
    let conn = open_db_in_memory().unwrap();

    assert!(seed_if_empty(&conn).unwrap());

    let templates = TemplateService::new(SqliteTemplateRepository::try_new(&conn).unwrap())
        .list_templates()
        .unwrap();
    assert_eq!(templates.len(), 1);
    let push = &templates[0];
    assert_eq!(push.name, SEED_TEMPLATE_NAME);
    assert_eq!(
        push.exercise_names().collect::<Vec<_>>(),
        vec![
            "Machine Bench Press",
            "Machine Incline Press",
            "Dumbbell Shoulder Press",
            "Cable Lateral Raise",
            "Tricep Pushdown",
        ]
    );
    let bench = &push.exercises[0];
    assert_eq!((bench.weight, bench.sets, bench.reps), (145.0, 5, 5));
    assert!(push
        .exercises
        .iter()
        .all(|exercise| exercise.weight_unit == WeightUnit::Lb));
}

#[test]
fn seeding_twice_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();

    assert!(seed_if_empty(&conn).unwrap());
    assert!(!seed_if_empty(&conn).unwrap());

    let count = TemplateService::new(SqliteTemplateRepository::try_new(&conn).unwrap())
        .count_templates()
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn existing_templates_suppress_seed() {
    let conn = open_db_in_memory().unwrap();
    let service = TemplateService::new(SqliteTemplateRepository::try_new(&conn).unwrap());
    service
        .create_template(NewTemplate::new("Mine", vec![ExerciseInput::named("Squat")]))
        .unwrap();

    assert!(!seed_if_empty(&conn).unwrap());
    let names: Vec<String> = service
        .list_templates()
        .unwrap()
        .into_iter()
        .map(|template| template.name)
        .collect();
    assert_eq!(names, vec!["Mine"]);
}

#[test]
fn open_store_seeds_once_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        db_path: dir.path().join("store.sqlite3"),
        log_level: LogLevel::Info,
        log_dir: None,
        seed: true,
    };

    let first = open_store(&config).unwrap();
    drop(first);
    let second = open_store(&config).unwrap();

    let count = TemplateService::new(SqliteTemplateRepository::try_new(&second).unwrap())
        .count_templates()
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_store_without_seed_leaves_store_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        db_path: dir.path().join("bare.sqlite3"),
        seed: false,
        ..CoreConfig::default()
    };

    let conn = open_store(&config).unwrap();
    let count = TemplateService::new(SqliteTemplateRepository::try_new(&conn).unwrap())
        .count_templates()
        .unwrap();
    assert_eq!(count, 0);
}
