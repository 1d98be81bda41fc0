//! 行政班成绩汇总
//!
//! 每名学生在每个科目的已评分提交取平均分（保留两位小数），
//! 没有成绩的科目为 `null`；总平均分只计算非空的科目平均分。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeSet, HashMap};

use super::{HomeroomService, load_managed_homeroom};
use crate::models::{
    ApiResponse,
    homerooms::{
        entities::GradeEntry,
        responses::{GradeRecapResponse, StudentGradeRow},
    },
    users::entities::User,
};
use crate::services::{current_user, round2, storage_error_response};

/// 按姓名排序学生，同名按 ID
pub(crate) fn sort_students(students: &mut [User]) {
    students.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
}

pub fn build_grade_recap(
    subjects: Vec<String>,
    mut students: Vec<User>,
    entries: &[GradeEntry],
) -> GradeRecapResponse {
    let subjects: Vec<String> = subjects
        .into_iter()
        .chain(entries.iter().map(|e| e.subject.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    sort_students(&mut students);

    // (学生, 科目) -> (总分, 次数)
    let mut sums: HashMap<(i64, &str), (f64, u32)> = HashMap::new();
    for entry in entries {
        let slot = sums
            .entry((entry.student_id, entry.subject.as_str()))
            .or_insert((0.0, 0));
        slot.0 += entry.score;
        slot.1 += 1;
    }

    let rows = students
        .iter()
        .map(|student| {
            let grades: Vec<Option<f64>> = subjects
                .iter()
                .map(|subject| {
                    sums.get(&(student.id, subject.as_str()))
                        .map(|(sum, count)| round2(sum / f64::from(*count)))
                })
                .collect();
            let graded: Vec<f64> = grades.iter().flatten().copied().collect();
            let average = if graded.is_empty() {
                None
            } else {
                Some(round2(graded.iter().sum::<f64>() / graded.len() as f64))
            };
            StudentGradeRow {
                student: student.brief(),
                grades,
                average,
            }
        })
        .collect();

    GradeRecapResponse {
        subjects,
        students: rows,
    }
}

pub async fn grade_recap(
    service: &HomeroomService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed_homeroom(&storage, &user, id).await {
        return Ok(resp);
    }

    let students = match storage.list_homeroom_students(id).await {
        Ok(students) => students,
        Err(e) => return Ok(storage_error_response("获取行政班学生失败", e)),
    };
    let subjects = match storage.list_homeroom_subjects(id).await {
        Ok(subjects) => subjects,
        Err(e) => return Ok(storage_error_response("获取科目失败", e)),
    };
    let entries = match storage.list_grade_entries(id).await {
        Ok(entries) => entries,
        Err(e) => return Ok(storage_error_response("获取成绩失败", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        build_grade_recap(subjects, students, &entries),
        "Grade recap retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn student(id: i64, name: &str) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("s{id}"),
            email: None,
            password_hash: String::new(),
            full_name: name.to_string(),
            role: UserRole::Siswa,
            status: UserStatus::Active,
            nis_nip: None,
            homeroom_id: Some(1),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(student_id: i64, subject: &str, score: f64) -> GradeEntry {
        GradeEntry {
            student_id,
            subject: subject.to_string(),
            score,
        }
    }

    #[test]
    fn test_grade_recap_averages() {
        let students = vec![student(2, "Budi"), student(1, "Ani"), student(3, "Citra")];
        let subjects = vec!["Matematika".to_string(), "Biologi".to_string()];
        let entries = vec![
            entry(1, "Matematika", 80.0),
            entry(1, "Matematika", 85.0),
            entry(1, "Biologi", 70.0),
            entry(2, "Biologi", 66.666),
        ];

        let recap = build_grade_recap(subjects, students, &entries);

        assert_eq!(recap.subjects, vec!["Biologi", "Matematika"]);
        let names: Vec<&str> = recap
            .students
            .iter()
            .map(|r| r.student.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ani", "Budi", "Citra"]);

        // Ani: Biologi 70, Matematika 82.5 -> 76.25
        assert_eq!(recap.students[0].grades, vec![Some(70.0), Some(82.5)]);
        assert_eq!(recap.students[0].average, Some(76.25));

        // Budi: 只有 Biologi
        assert_eq!(recap.students[1].grades, vec![Some(66.67), None]);
        assert_eq!(recap.students[1].average, Some(66.67));

        // Citra: 没有成绩
        assert_eq!(recap.students[2].grades, vec![None, None]);
        assert_eq!(recap.students[2].average, None);
    }
}
