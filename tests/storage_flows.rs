use chrono::{Duration, Utc};
use sekolah_lms::errors::LmsError;
use sekolah_lms::models::assignments::entities::{AssignmentKind, NewSubmission, SubmissionStatus};
use sekolah_lms::models::assignments::requests::{
    AnswerItem, CreateAssignmentRequest, NewOption, NewQuestion,
};
use sekolah_lms::models::attendance::entities::{AttendanceMark, AttendanceStatus};
use sekolah_lms::models::attendance::requests::CreateSessionRequest;
use sekolah_lms::models::classes::entities::Class;
use sekolah_lms::models::classes::requests::CreateClassRequest;
use sekolah_lms::models::homerooms::entities::{DAILY_ATTENDANCE_SUBJECT, Homeroom};
use sekolah_lms::models::homerooms::requests::CreateHomeroomRequest;
use sekolah_lms::models::schedules::requests::CreateScheduleRequest;
use sekolah_lms::models::subjects::requests::CreateSubjectRequest;
use sekolah_lms::models::topics::requests::CreateTopicRequest;
use sekolah_lms::models::users::entities::{User, UserRole};
use sekolah_lms::models::users::requests::CreateUserRequest;
use sekolah_lms::services::assignments::quiz::{QUIZ_MAX_SCORE, grade_quiz};
use sekolah_lms::services::homerooms::attendance_recap::build_attendance_recap;
use sekolah_lms::services::homerooms::grades::build_grade_recap;
use sekolah_lms::storage::Storage;
use sekolah_lms::storage::sea_orm_storage::SeaOrmStorage;

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::new_in_memory()
        .await
        .expect("in-memory storage should start")
}

fn user_request(username: &str, role: UserRole, homeroom_id: Option<i64>) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email: None,
        password: "hashed".to_string(),
        full_name: username.to_uppercase(),
        role,
        nis_nip: None,
        homeroom_id,
    }
}

async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user(user_request(username, role, None))
        .await
        .expect("user should be created")
}

async fn homeroom(storage: &SeaOrmStorage, name: &str) -> Homeroom {
    storage
        .create_homeroom(CreateHomeroomRequest {
            name: name.to_string(),
            grade_level: 10,
            academic_year: "2026/2027".to_string(),
            homeroom_teacher_id: None,
        })
        .await
        .expect("homeroom should be created")
}

fn essay(title: &str) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        title: title.to_string(),
        description: None,
        kind: AssignmentKind::Essay,
        max_score: None,
        deadline: None,
        questions: vec![],
    }
}

fn graded(assignment_id: i64, student_id: i64, score: f64) -> NewSubmission {
    NewSubmission {
        assignment_id,
        student_id,
        content: Some("jawaban".to_string()),
        status: SubmissionStatus::Graded,
        score: Some(score),
        is_late: false,
        answers: vec![],
    }
}

/// 一个教师、一个科目、一个班级和一个主题
async fn class_with_topic(storage: &SeaOrmStorage, teacher: &User) -> (Class, i64) {
    let subject = storage
        .create_subject(CreateSubjectRequest {
            code: format!("MTK-{}", teacher.id),
            name: "Matematika".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let class = storage
        .create_class(
            teacher.id,
            CreateClassRequest {
                name: "Matematika X-1".to_string(),
                subject_id: subject.id,
                teacher_id: None,
                homeroom_id: None,
                description: None,
            },
        )
        .await
        .unwrap();
    let topic = storage
        .create_topic(
            class.id,
            CreateTopicRequest {
                title: "Persamaan Linear".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    (class, topic.id)
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let storage = storage().await;
    user(&storage, "budi", UserRole::Siswa).await;

    let err = storage
        .create_user(CreateUserRequest {
            username: "budi".to_string(),
            email: None,
            password: "hashed".to_string(),
            full_name: "Budi Lain".to_string(),
            role: UserRole::Siswa,
            nis_nip: None,
            homeroom_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)), "got {err:?}");
    assert_eq!(storage.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn enroll_skips_existing_members() {
    let storage = storage().await;
    let teacher = user(&storage, "guru1", UserRole::Guru).await;
    let s1 = user(&storage, "siswa1", UserRole::Siswa).await;
    let s2 = user(&storage, "siswa2", UserRole::Siswa).await;
    let (class, _) = class_with_topic(&storage, &teacher).await;

    let first = storage.enroll_students(class.id, &[s1.id]).await.unwrap();
    assert_eq!(first.enrolled, vec![s1.id]);

    let second = storage
        .enroll_students(class.id, &[s1.id, s2.id, s2.id])
        .await
        .unwrap();
    assert_eq!(second.enrolled, vec![s2.id]);
    assert_eq!(second.skipped, vec![s1.id]);
    assert_eq!(storage.count_class_members(class.id).await.unwrap(), 2);
    assert_eq!(
        storage.list_student_class_ids(s2.id).await.unwrap(),
        vec![class.id]
    );
}

#[tokio::test]
async fn subject_in_use_is_reported() {
    let storage = storage().await;
    let teacher = user(&storage, "guru1", UserRole::Guru).await;
    let (class, _) = class_with_topic(&storage, &teacher).await;

    assert!(storage.is_subject_in_use(class.subject_id).await.unwrap());
    assert!(storage.delete_class(class.id).await.unwrap());
    assert!(!storage.is_subject_in_use(class.subject_id).await.unwrap());
}

#[tokio::test]
async fn quiz_submission_is_graded_once() {
    let storage = storage().await;
    let teacher = user(&storage, "guru1", UserRole::Guru).await;
    let student = user(&storage, "siswa1", UserRole::Siswa).await;
    let (class, topic_id) = class_with_topic(&storage, &teacher).await;
    storage.enroll_students(class.id, &[student.id]).await.unwrap();

    let assignment = storage
        .create_assignment(
            topic_id,
            teacher.id,
            CreateAssignmentRequest {
                title: "Kuis 1".to_string(),
                description: None,
                kind: AssignmentKind::Quiz,
                max_score: None,
                deadline: Some(Utc::now() + Duration::days(1)),
                questions: vec![
                    NewQuestion {
                        prompt: "1 + 1 = ?".to_string(),
                        options: vec![
                            NewOption { label: "2".to_string(), is_correct: true },
                            NewOption { label: "3".to_string(), is_correct: false },
                        ],
                    },
                    NewQuestion {
                        prompt: "2 x 3 = ?".to_string(),
                        options: vec![
                            NewOption { label: "5".to_string(), is_correct: false },
                            NewOption { label: "6".to_string(), is_correct: true },
                        ],
                    },
                ],
            },
        )
        .await
        .unwrap();
    assert_eq!(assignment.max_score, 100.0);

    let upcoming = storage
        .list_upcoming_assignments(student.id, Utc::now().timestamp())
        .await
        .unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].class_id, class.id);

    // 学生视图不带正确答案
    let hidden = storage.list_questions(assignment.id, false).await.unwrap();
    assert!(
        hidden
            .iter()
            .flat_map(|q| &q.options)
            .all(|o| o.is_correct.is_none())
    );

    let questions = storage.list_questions(assignment.id, true).await.unwrap();
    assert_eq!(questions.len(), 2);
    let first_correct = questions[0]
        .options
        .iter()
        .find(|o| o.is_correct == Some(true))
        .unwrap();
    let second_wrong = questions[1]
        .options
        .iter()
        .find(|o| o.is_correct == Some(false))
        .unwrap();

    let (result, answers) = grade_quiz(
        &questions,
        &[
            AnswerItem { question_id: questions[0].id, option_id: Some(first_correct.id) },
            AnswerItem { question_id: questions[1].id, option_id: Some(second_wrong.id) },
        ],
    )
    .unwrap();
    assert_eq!(result.correct, 1);
    assert_eq!(result.score, 50.0);

    let new_submission = NewSubmission {
        assignment_id: assignment.id,
        student_id: student.id,
        content: None,
        status: SubmissionStatus::Graded,
        score: Some(result.score),
        is_late: assignment.is_late_at(Utc::now()),
        answers,
    };
    let submission = storage.create_submission(new_submission.clone()).await.unwrap();
    assert!(!submission.is_late);
    assert_eq!(submission.score, Some(50.0));
    assert_eq!(
        storage.list_submission_answers(submission.id).await.unwrap().len(),
        2
    );

    let err = storage.create_submission(new_submission).await.unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)), "got {err:?}");

    // 已提交的作业不再出现在待办中
    let upcoming = storage
        .list_upcoming_assignments(student.id, Utc::now().timestamp())
        .await
        .unwrap();
    assert!(upcoming.is_empty());
}

#[tokio::test]
async fn attendance_record_is_unique_per_student() {
    let storage = storage().await;
    let teacher = user(&storage, "guru1", UserRole::Guru).await;
    let student = user(&storage, "siswa1", UserRole::Siswa).await;
    let (_, topic_id) = class_with_topic(&storage, &teacher).await;

    let now = Utc::now();
    let session = storage
        .create_attendance_session(
            topic_id,
            teacher.id,
            CreateSessionRequest {
                title: "Pertemuan 1".to_string(),
                opens_at: now - Duration::minutes(5),
                closes_at: now + Duration::minutes(55),
            },
        )
        .await
        .unwrap();

    storage
        .create_attendance_record(session.id, student.id, AttendanceStatus::Hadir, None)
        .await
        .unwrap();
    let err = storage
        .create_attendance_record(session.id, student.id, AttendanceStatus::Hadir, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)), "got {err:?}");

    // 教师批量录入会覆盖学生自己的签到
    let written = storage
        .upsert_attendance_records(
            session.id,
            vec![AttendanceMark {
                student_id: student.id,
                status: AttendanceStatus::Sakit,
                note: Some("surat dokter".to_string()),
            }],
            teacher.id,
        )
        .await
        .unwrap();
    assert_eq!(written, 1);

    let records = storage.list_session_records(session.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AttendanceStatus::Sakit);

    let totals = storage.student_attendance_totals(student.id).await.unwrap();
    assert_eq!(totals.sakit, 1);
    assert_eq!(totals.hadir, 0);
}

#[tokio::test]
async fn schedule_candidates_cover_class_and_teacher() {
    let storage = storage().await;
    let teacher = user(&storage, "guru1", UserRole::Guru).await;
    let (class, _) = class_with_topic(&storage, &teacher).await;

    storage
        .create_schedule(CreateScheduleRequest {
            class_id: class.id,
            day_of_week: 1,
            start_time: "07:00".to_string(),
            end_time: "08:30".to_string(),
            room: Some("R-101".to_string()),
        })
        .await
        .unwrap();

    let monday = storage
        .list_schedule_conflict_candidates(1, class.id, teacher.id)
        .await
        .unwrap();
    assert_eq!(monday.len(), 1);
    assert_eq!(monday[0].teacher_id, teacher.id);

    let tuesday = storage
        .list_schedule_conflict_candidates(2, class.id, teacher.id)
        .await
        .unwrap();
    assert!(tuesday.is_empty());
}

#[tokio::test]
async fn class_with_members_cannot_be_deleted() {
    let storage = storage().await;
    let teacher = user(&storage, "guru1", UserRole::Guru).await;
    let student = user(&storage, "siswa1", UserRole::Siswa).await;
    let (class, _) = class_with_topic(&storage, &teacher).await;
    storage.enroll_students(class.id, &[student.id]).await.unwrap();

    let err = storage.delete_class(class.id).await.unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)), "got {err:?}");
    assert!(storage.get_class_by_id(class.id).await.unwrap().is_some());
    assert_eq!(storage.count_class_members(class.id).await.unwrap(), 1);

    // 教师名下的班级仍有学生时，教师账号也不能被删除
    let err = storage.delete_user(teacher.id).await.unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)), "got {err:?}");

    assert!(storage.remove_class_member(class.id, student.id).await.unwrap());
    assert!(storage.delete_class(class.id).await.unwrap());
}

#[tokio::test]
async fn import_rolls_back_on_duplicate_row() {
    let storage = storage().await;

    let err = storage
        .import_users(vec![
            user_request("ani", UserRole::Siswa, None),
            user_request("ani", UserRole::Siswa, None),
            user_request("budi", UserRole::Siswa, None),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)), "got {err:?}");
    assert_eq!(storage.count_users().await.unwrap(), 0);

    let created = storage
        .import_users(vec![
            user_request("ani", UserRole::Siswa, None),
            user_request("budi", UserRole::Siswa, None),
        ])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(storage.count_users().await.unwrap(), 2);
}

#[tokio::test]
async fn daily_attendance_is_one_row_per_student_and_date() {
    let storage = storage().await;
    let wali = user(&storage, "wali1", UserRole::WaliKelas).await;
    let room = homeroom(&storage, "X-1").await;
    let student = storage
        .create_user(user_request("ani", UserRole::Siswa, Some(room.id)))
        .await
        .unwrap();

    for status in [AttendanceStatus::Alpa, AttendanceStatus::Izin] {
        let written = storage
            .upsert_daily_attendance(
                room.id,
                "2026-10-01",
                vec![AttendanceMark {
                    student_id: student.id,
                    status,
                    note: None,
                }],
                wali.id,
            )
            .await
            .unwrap();
        assert_eq!(written, 1);
    }

    let rows = storage
        .list_daily_attendance(room.id, "2026-10-01")
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, AttendanceStatus::Izin);
    assert!(
        storage
            .list_daily_attendance(room.id, "2026-10-02")
            .await
            .unwrap()
            .is_empty()
    );

    let totals = storage.student_attendance_totals(student.id).await.unwrap();
    assert_eq!(totals.izin, 1);
    assert_eq!(totals.alpa, 0);
}

#[tokio::test]
async fn homeroom_recaps_follow_stored_rows() {
    let storage = storage().await;
    let teacher = user(&storage, "guru1", UserRole::Guru).await;
    let room = homeroom(&storage, "X-1").await;
    let ani = storage
        .create_user(user_request("ani", UserRole::Siswa, Some(room.id)))
        .await
        .unwrap();
    let budi = storage
        .create_user(user_request("budi", UserRole::Siswa, Some(room.id)))
        .await
        .unwrap();

    let subject = storage
        .create_subject(CreateSubjectRequest {
            code: "MTK".to_string(),
            name: "Matematika".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let class = storage
        .create_class(
            teacher.id,
            CreateClassRequest {
                name: "Matematika X-1".to_string(),
                subject_id: subject.id,
                teacher_id: None,
                homeroom_id: Some(room.id),
                description: None,
            },
        )
        .await
        .unwrap();
    storage
        .enroll_students(class.id, &[ani.id, budi.id])
        .await
        .unwrap();
    let topic = storage
        .create_topic(
            class.id,
            CreateTopicRequest {
                title: "Aljabar".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    let first = storage
        .create_assignment(topic.id, teacher.id, essay("Tugas 1"))
        .await
        .unwrap();
    let second = storage
        .create_assignment(topic.id, teacher.id, essay("Tugas 2"))
        .await
        .unwrap();
    storage.create_submission(graded(first.id, ani.id, 80.0)).await.unwrap();
    storage.create_submission(graded(second.id, ani.id, 90.0)).await.unwrap();

    let recap = build_grade_recap(
        storage.list_homeroom_subjects(room.id).await.unwrap(),
        storage.list_homeroom_students(room.id).await.unwrap(),
        &storage.list_grade_entries(room.id).await.unwrap(),
    );
    assert_eq!(recap.subjects, vec!["Matematika".to_string()]);
    assert_eq!(recap.students.len(), 2);
    assert_eq!(recap.students[0].student, ani.brief());
    assert_eq!(recap.students[0].grades, vec![Some(85.0)]);
    assert_eq!(recap.students[0].average, Some(85.0));
    assert_eq!(recap.students[1].grades, vec![None]);
    assert_eq!(recap.students[1].average, None);

    storage
        .upsert_daily_attendance(
            room.id,
            "2026-10-01",
            vec![
                AttendanceMark {
                    student_id: ani.id,
                    status: AttendanceStatus::Hadir,
                    note: None,
                },
                AttendanceMark {
                    student_id: budi.id,
                    status: AttendanceStatus::Sakit,
                    note: None,
                },
            ],
            teacher.id,
        )
        .await
        .unwrap();
    let now = Utc::now();
    let session = storage
        .create_attendance_session(
            topic.id,
            teacher.id,
            CreateSessionRequest {
                title: "Pertemuan 1".to_string(),
                opens_at: now - Duration::minutes(5),
                closes_at: now + Duration::minutes(55),
            },
        )
        .await
        .unwrap();
    storage
        .create_attendance_record(session.id, ani.id, AttendanceStatus::Hadir, None)
        .await
        .unwrap();

    let recap = build_attendance_recap(
        storage.list_homeroom_students(room.id).await.unwrap(),
        &storage.list_attendance_entries(room.id).await.unwrap(),
    );
    assert_eq!(recap.columns.len(), 2);
    assert_eq!(recap.columns[0].subject, DAILY_ATTENDANCE_SUBJECT);
    assert_eq!(recap.columns[0].label, "2026-10-01");
    assert_eq!(recap.columns[1].subject, "Matematika");
    assert_eq!(recap.columns[1].meeting, 1);

    let ani_row = &recap.students[0];
    assert_eq!(
        ani_row.cells,
        vec![Some(AttendanceStatus::Hadir), Some(AttendanceStatus::Hadir)]
    );
    assert_eq!(ani_row.totals.hadir, 2);
    let budi_row = &recap.students[1];
    assert_eq!(budi_row.cells, vec![Some(AttendanceStatus::Sakit), None]);
    assert_eq!(budi_row.totals.sakit, 1);
}

#[tokio::test]
async fn quiz_max_score_is_stored_as_hundred() {
    let storage = storage().await;
    let teacher = user(&storage, "guru1", UserRole::Guru).await;
    let (_, topic_id) = class_with_topic(&storage, &teacher).await;

    let assignment = storage
        .create_assignment(
            topic_id,
            teacher.id,
            CreateAssignmentRequest {
                title: "Kuis Singkat".to_string(),
                description: None,
                kind: AssignmentKind::Quiz,
                max_score: Some(10.0),
                deadline: None,
                questions: vec![NewQuestion {
                    prompt: "3 - 1 = ?".to_string(),
                    options: vec![
                        NewOption { label: "2".to_string(), is_correct: true },
                        NewOption { label: "1".to_string(), is_correct: false },
                    ],
                }],
            },
        )
        .await
        .unwrap();
    assert_eq!(assignment.max_score, QUIZ_MAX_SCORE);

    let questions = storage.list_questions(assignment.id, true).await.unwrap();
    let correct = questions[0]
        .options
        .iter()
        .find(|o| o.is_correct == Some(true))
        .unwrap();
    let (result, _) = grade_quiz(
        &questions,
        &[AnswerItem { question_id: questions[0].id, option_id: Some(correct.id) }],
    )
    .unwrap();
    assert!(result.score <= assignment.max_score);

    let capped = storage
        .create_assignment(
            topic_id,
            teacher.id,
            CreateAssignmentRequest {
                max_score: Some(10.0),
                ..essay("Esai")
            },
        )
        .await
        .unwrap();
    assert_eq!(capped.max_score, 10.0);
}
