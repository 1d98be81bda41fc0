use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

use super::AdminService;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::ClassListQuery,
    reports::{
        requests::AttendanceReportQuery,
        responses::{AttendanceReportResponse, ClassAttendanceReport, FailedClass},
    },
};
use crate::services::storage_error_response;
use crate::utils::validate::validate_date;

fn day_start(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// 将日期窗口转换为时间戳区间 [from, to)，`to` 当天包含在内
pub(crate) fn report_window(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(Option<i64>, Option<i64>), &'static str> {
    let from = from.map(validate_date).transpose()?;
    let to = to.map(validate_date).transpose()?;
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err("from must not be after to");
    }
    Ok((
        from.map(day_start),
        to.and_then(|d| d.succ_opt()).map(day_start),
    ))
}

/// 各班级的网课考勤汇总；单个班级失败时记入 failed_classes 并继续
pub async fn attendance_report(
    service: &AdminService,
    query: AttendanceReportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (from_ts, to_ts) = match report_window(query.from.as_deref(), query.to.as_deref()) {
        Ok(window) => window,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    let storage = service.get_storage(request)?;
    let classes = match storage.list_class_details(ClassListQuery::default()).await {
        Ok(classes) => classes,
        Err(e) => return Ok(storage_error_response("获取班级列表失败", e)),
    };

    let mut reports = Vec::with_capacity(classes.len());
    let mut failed_classes = Vec::new();
    for detail in classes {
        match storage
            .class_attendance_summary(detail.class.id, from_ts, to_ts)
            .await
        {
            Ok((sessions, totals)) => reports.push(ClassAttendanceReport {
                class_id: detail.class.id,
                class_name: detail.class.name,
                subject_name: detail.subject_name,
                teacher_name: detail.teacher_name,
                sessions,
                totals,
            }),
            Err(e) => {
                warn!("班级 {} 考勤汇总失败: {}", detail.class.id, e);
                failed_classes.push(FailedClass {
                    class_id: detail.class.id,
                    class_name: detail.class.name,
                    reason: e.message().to_string(),
                });
            }
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceReportResponse {
            from: query.from,
            to: query.to,
            classes: reports,
            failed_classes,
        },
        "Attendance report generated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_window_includes_end_day() {
        let (from, to) = report_window(Some("2025-08-01"), Some("2025-08-01")).unwrap();
        let (from, to) = (from.unwrap(), to.unwrap());
        assert_eq!(to - from, 24 * 60 * 60);
    }

    #[test]
    fn test_report_window_validation() {
        assert_eq!(report_window(None, None), Ok((None, None)));
        assert!(report_window(Some("2025-08-02"), Some("2025-08-01")).is_err());
        assert!(report_window(Some("01-08-2025"), None).is_err());
    }
}
