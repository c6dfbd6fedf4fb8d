use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use ironlog_core::db::open_db_in_memory;
use ironlog_core::repo::workout_repo::NewWorkoutRecord;
use ironlog_core::{
    ExerciseInput, ExercisePatch, ExerciseValidationError, NewTemplate, NewWorkoutExercise,
    RepoError, SqliteTemplateRepository, SqliteWorkoutRepository, StartWorkout, Template,
    TemplateService, WeightUnit, WorkoutListQuery, WorkoutPatch, WorkoutRepository,
    WorkoutService, WorkoutServiceError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn workouts(conn: &Connection) -> WorkoutService<SqliteWorkoutRepository<'_>> {
    WorkoutService::new(SqliteWorkoutRepository::try_new(conn).unwrap())
}

fn push_template(conn: &Connection) -> Template {
    TemplateService::new(SqliteTemplateRepository::try_new(conn).unwrap())
        .create_template(NewTemplate::new(
            "Push",
            vec![
                ExerciseInput::with_load("Bench", 135.0, 5, 5),
                ExerciseInput {
                    weight_unit: Some(WeightUnit::Kg),
                    ..ExerciseInput::with_load("Overhead Press", 40.0, 3, 8)
                },
                ExerciseInput::with_load("Dips", 0.0, 3, 12),
            ],
        ))
        .unwrap()
}

fn bench_set() -> NewWorkoutExercise {
    NewWorkoutExercise {
        name: "Face Pull".to_string(),
        weight: 30.0,
        weight_unit: WeightUnit::Lb,
        sets: 3,
        reps: 15,
    }
}

#[test]
fn template_workout_copies_exercises_with_new_identity() {
    let conn = open_db_in_memory().unwrap();
    let template = push_template(&conn);

    let workout = workouts(&conn)
        .create_workout(StartWorkout::from_template(template.id))
        .unwrap();

    assert_eq!(workout.template_id, Some(template.id));
    assert_eq!(workout.name, "Push");
    assert!(workout.completed_at.is_none());
    assert_eq!(workout.exercises.len(), template.exercises.len());
    for (copy, planned) in workout.exercises.iter().zip(&template.exercises) {
        assert_ne!(copy.id, planned.id);
        assert_eq!(copy.workout_id, workout.id);
        assert_eq!(copy.name, planned.name);
        assert_eq!(copy.weight, planned.weight);
        assert_eq!(copy.weight_unit, planned.weight_unit);
        assert_eq!(copy.sets, planned.sets);
        assert_eq!(copy.reps, planned.reps);
        assert_eq!(copy.sort_order, planned.sort_order);
        assert!(!copy.completed);
    }
}

#[test]
fn workout_date_and_start_come_from_the_same_instant() {
    let conn = open_db_in_memory().unwrap();
    let before = Utc::now() - Duration::milliseconds(1);

    let workout = workouts(&conn)
        .create_workout(StartWorkout::custom("Cardio"))
        .unwrap();

    assert!(workout.started_at >= before);
    assert!(workout.started_at <= Utc::now());
    assert_eq!(
        workout.date,
        workout.started_at.with_timezone(&Local).date_naive()
    );
}

#[test]
fn given_name_is_stored_verbatim_and_only_empty_falls_back() {
    let conn = open_db_in_memory().unwrap();
    let template = push_template(&conn);

    let workout = workouts(&conn)
        .create_workout(StartWorkout {
            template_id: Some(template.id),
            name: Some("Heavy Push".to_string()),
        })
        .unwrap();
    assert_eq!(workout.name, "Heavy Push");

    let whitespace = workouts(&conn)
        .create_workout(StartWorkout {
            template_id: Some(template.id),
            name: Some("   ".to_string()),
        })
        .unwrap();
    assert_eq!(whitespace.name, "   ");

    let empty = workouts(&conn)
        .create_workout(StartWorkout {
            template_id: Some(template.id),
            name: Some(String::new()),
        })
        .unwrap();
    assert_eq!(empty.name, "Push");

    let ad_hoc_whitespace = workouts(&conn)
        .create_workout(StartWorkout::custom(" "))
        .unwrap();
    assert_eq!(ad_hoc_whitespace.name, " ");

    let ad_hoc_empty = workouts(&conn)
        .create_workout(StartWorkout::custom(""))
        .unwrap();
    assert_eq!(ad_hoc_empty.name, "Custom Workout");
}

#[test]
fn custom_workout_starts_empty_with_fallback_name() {
    let conn = open_db_in_memory().unwrap();

    let workout = workouts(&conn)
        .create_workout(StartWorkout::default())
        .unwrap();

    assert_eq!(workout.name, "Custom Workout");
    assert!(workout.template_id.is_none());
    assert!(workout.exercises.is_empty());
}

#[test]
fn missing_template_fails_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();

    let err = workouts(&conn)
        .create_workout(StartWorkout::from_template(missing))
        .unwrap_err();

    assert!(matches!(err, WorkoutServiceError::TemplateNotFound(id) if id == missing));
    assert!(workouts(&conn)
        .list_workouts(&WorkoutListQuery::default())
        .unwrap()
        .is_empty());
}

#[test]
fn editing_workout_exercise_leaves_template_untouched() {
    let conn = open_db_in_memory().unwrap();
    let template = push_template(&conn);
    let service = workouts(&conn);
    let workout = service
        .create_workout(StartWorkout::from_template(template.id))
        .unwrap();

    service
        .patch_exercise(
            workout.id,
            workout.exercises[0].id,
            &ExercisePatch {
                weight: Some(155.0),
                ..ExercisePatch::default()
            },
        )
        .unwrap();

    let reloaded = TemplateService::new(SqliteTemplateRepository::try_new(&conn).unwrap())
        .get_template(template.id)
        .unwrap();
    assert_eq!(reloaded.exercises[0].weight, 135.0);
}

#[test]
fn deleting_template_keeps_started_workouts() {
    let conn = open_db_in_memory().unwrap();
    let template = push_template(&conn);
    let service = workouts(&conn);
    let workout = service
        .create_workout(StartWorkout::from_template(template.id))
        .unwrap();

    TemplateService::new(SqliteTemplateRepository::try_new(&conn).unwrap())
        .delete_template(template.id)
        .unwrap();

    let reloaded = service.get_workout(workout.id).unwrap();
    assert_eq!(reloaded.template_id, Some(template.id));
    assert_eq!(reloaded.exercises.len(), 3);
}

#[test]
fn added_exercise_goes_after_current_maximum() {
    let conn = open_db_in_memory().unwrap();
    let template = push_template(&conn);
    let service = workouts(&conn);

    let from_template = service
        .create_workout(StartWorkout::from_template(template.id))
        .unwrap();
    let appended = service
        .add_workout_exercise(from_template.id, &bench_set())
        .unwrap();
    assert_eq!(appended.sort_order, 3);
    assert!(!appended.completed);
    assert_eq!(appended.workout_id, from_template.id);

    let empty = service
        .create_workout(StartWorkout::custom("Accessories"))
        .unwrap();
    let first = service.add_workout_exercise(empty.id, &bench_set()).unwrap();
    let second = service.add_workout_exercise(empty.id, &bench_set()).unwrap();
    assert_eq!(first.sort_order, 0);
    assert_eq!(second.sort_order, 1);

    let reloaded = service.get_workout(empty.id).unwrap();
    assert_eq!(reloaded.exercises, vec![first, second]);
}

#[test]
fn add_exercise_to_missing_workout_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();

    let err = workouts(&conn)
        .add_workout_exercise(missing, &bench_set())
        .unwrap_err();
    assert!(matches!(err, WorkoutServiceError::WorkoutNotFound(id) if id == missing));
}

#[test]
fn patch_exercise_updates_only_supplied_fields() {
    let conn = open_db_in_memory().unwrap();
    let template = push_template(&conn);
    let service = workouts(&conn);
    let workout = service
        .create_workout(StartWorkout::from_template(template.id))
        .unwrap();
    let target = &workout.exercises[1];

    let patched = service
        .patch_exercise(workout.id, target.id, &ExercisePatch::completed(true))
        .unwrap();
    assert!(patched.completed);
    assert_eq!(patched.weight, target.weight);
    assert_eq!(patched.sets, target.sets);

    let patched = service
        .patch_exercise(
            workout.id,
            target.id,
            &ExercisePatch {
                reps: Some(6),
                ..ExercisePatch::default()
            },
        )
        .unwrap();
    assert!(patched.completed);
    assert_eq!(patched.reps, 6);

    let reloaded = service.get_workout(workout.id).unwrap();
    assert_eq!(reloaded.exercises[1], patched);
    assert_eq!(reloaded.completed_exercise_count(), 1);
}

#[test]
fn patch_exercise_requires_matching_workout() {
    let conn = open_db_in_memory().unwrap();
    let template = push_template(&conn);
    let service = workouts(&conn);
    let first = service
        .create_workout(StartWorkout::from_template(template.id))
        .unwrap();
    let second = service
        .create_workout(StartWorkout::custom("Other"))
        .unwrap();
    let exercise_id = first.exercises[0].id;

    let err = service
        .patch_exercise(second.id, exercise_id, &ExercisePatch::completed(true))
        .unwrap_err();
    assert!(matches!(err, WorkoutServiceError::ExerciseNotFound(id) if id == exercise_id));

    let untouched = service.get_workout(first.id).unwrap();
    assert!(!untouched.exercises[0].completed);
}

#[test]
fn patch_exercise_validates_merged_row() {
    let conn = open_db_in_memory().unwrap();
    let template = push_template(&conn);
    let service = workouts(&conn);
    let workout = service
        .create_workout(StartWorkout::from_template(template.id))
        .unwrap();

    let err = service
        .patch_exercise(
            workout.id,
            workout.exercises[0].id,
            &ExercisePatch {
                reps: Some(0),
                ..ExercisePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        WorkoutServiceError::Repo(RepoError::Validation(ExerciseValidationError::ZeroReps))
    ));
    assert_eq!(service.get_workout(workout.id).unwrap().exercises[0].reps, 5);
}

#[test]
fn update_workout_patches_and_can_reopen() {
    let conn = open_db_in_memory().unwrap();
    let service = workouts(&conn);
    let workout = service
        .create_workout(StartWorkout::custom("Evening"))
        .unwrap();

    let renamed = service
        .update_workout(
            workout.id,
            &WorkoutPatch {
                name: Some("Late Evening".to_string()),
                completed_at: None,
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Late Evening");
    assert!(renamed.completed_at.is_none());

    let finished = service.finish_workout(workout.id).unwrap();
    assert!(finished.is_completed());
    assert_eq!(finished.name, "Late Evening");
    assert!(finished.completed_at.unwrap() >= finished.started_at);

    let reopened = service
        .update_workout(
            workout.id,
            &WorkoutPatch {
                name: None,
                completed_at: Some(None),
            },
        )
        .unwrap();
    assert!(!reopened.is_completed());
}

#[test]
fn empty_patch_returns_workout_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = workouts(&conn);
    let workout = service
        .create_workout(StartWorkout::custom("Morning"))
        .unwrap();

    assert!(WorkoutPatch::default().is_empty());
    let unchanged = service
        .update_workout(workout.id, &WorkoutPatch::default())
        .unwrap();
    assert_eq!(unchanged, workout);
}

#[test]
fn update_missing_workout_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();

    let err = workouts(&conn)
        .update_workout(missing, &WorkoutPatch::default())
        .unwrap_err();
    assert!(matches!(err, WorkoutServiceError::WorkoutNotFound(id) if id == missing));
    assert!(matches!(
        workouts(&conn).get_workout(missing).unwrap_err(),
        WorkoutServiceError::WorkoutNotFound(_)
    ));
}

fn insert_session(
    repo: &SqliteWorkoutRepository<'_>,
    name: &str,
    date: NaiveDate,
    started_ms: i64,
    completed: bool,
) -> Uuid {
    let started_at = Utc.timestamp_millis_opt(started_ms).unwrap();
    let id = repo
        .start_workout(&NewWorkoutRecord {
            id: Uuid::new_v4(),
            template_id: None,
            name: Some(name.to_string()),
            date,
            started_at,
        })
        .unwrap();
    if completed {
        repo.update_workout(
            id,
            &WorkoutPatch {
                name: None,
                completed_at: Some(Some(started_at + Duration::hours(1))),
            },
        )
        .unwrap();
    }
    id
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[test]
fn list_workouts_orders_newest_first_and_applies_filters() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWorkoutRepository::try_new(&conn).unwrap();
    insert_session(&repo, "A", day(1), 1_000, true);
    insert_session(&repo, "B", day(2), 3_000, false);
    insert_session(&repo, "C", day(2), 2_000, true);
    insert_session(&repo, "D", day(3), 4_000, true);
    let service = WorkoutService::new(repo);

    let names = |query: WorkoutListQuery| -> Vec<String> {
        service
            .list_workouts(&query)
            .unwrap()
            .into_iter()
            .map(|workout| workout.name)
            .collect()
    };

    assert_eq!(names(WorkoutListQuery::default()), vec!["D", "B", "C", "A"]);
    assert_eq!(
        names(WorkoutListQuery {
            date: Some(day(2)),
            ..WorkoutListQuery::default()
        }),
        vec!["B", "C"]
    );
    assert_eq!(
        names(WorkoutListQuery {
            completed_only: true,
            ..WorkoutListQuery::default()
        }),
        vec!["D", "C", "A"]
    );
    assert_eq!(
        names(WorkoutListQuery {
            limit: Some(2),
            completed_only: true,
            ..WorkoutListQuery::default()
        }),
        vec!["D", "C"]
    );
    assert_eq!(
        names(WorkoutListQuery {
            date: Some(day(2)),
            limit: Some(1),
            ..WorkoutListQuery::default()
        }),
        vec!["B"]
    );
    assert_eq!(
        names(WorkoutListQuery {
            limit: Some(0),
            ..WorkoutListQuery::default()
        })
        .len(),
        4
    );
}

#[test]
fn completed_dates_and_active_days_count_distinct_finished_days() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteWorkoutRepository::try_new(&conn).unwrap();
    insert_session(&repo, "A", day(1), 1_000, true);
    insert_session(&repo, "B", day(3), 2_000, true);
    insert_session(&repo, "C", day(3), 3_000, true);
    insert_session(&repo, "D", day(4), 4_000, false);
    insert_session(&repo, "E", day(6), 5_000, true);
    let service = WorkoutService::new(repo);

    assert_eq!(
        service.completed_dates(None, None).unwrap(),
        vec![day(1), day(3), day(6)]
    );
    assert_eq!(
        service.completed_dates(Some(day(2)), Some(day(6))).unwrap(),
        vec![day(3), day(6)]
    );
    assert_eq!(service.active_days_since(day(3)).unwrap(), 2);
    assert_eq!(service.active_days_since(day(7)).unwrap(), 0);
}
