/// 业务错误码
///
/// 0 表示成功；1xxx 为通用错误，其余按业务域分段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    AccountDisabled = 2001,
    PasswordPolicyViolation = 2002,
    OldPasswordIncorrect = 2003,

    // 用户
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserAlreadyExists = 3004,
    CanNotDeleteCurrentUser = 3005,
    UserFullNameInvalid = 3006,

    // 批量导入
    ImportFileMissing = 3100,
    ImportFileParseFailed = 3101,
    ImportFileMissingColumn = 3102,
    ImportTooManyRows = 3103,
    ImportFailed = 3104,

    // 行政班与科目
    HomeroomNotFound = 4000,
    HomeroomAlreadyExists = 4001,
    HomeroomTeacherInvalid = 4002,
    HomeroomTeacherTaken = 4003,
    HomeroomNotEmpty = 4004,
    StudentNotInHomeroom = 4005,
    SubjectNotFound = 4100,
    SubjectAlreadyExists = 4101,
    SubjectInUse = 4102,
    NoteNotFound = 4200,
    NoteInvalid = 4201,

    // 课程班级与内容
    ClassNotFound = 5000,
    ClassPermissionDenied = 5001,
    ClassHasMembers = 5002,
    ClassTeacherInvalid = 5003,
    ClassMemberNotFound = 5004,
    ClassMemberInvalid = 5005,
    ClassInvalid = 5006,
    TopicNotFound = 5100,
    TopicInvalid = 5101,
    MaterialNotFound = 5102,
    MaterialInvalid = 5103,

    // 作业与提交
    AssignmentNotFound = 6000,
    AssignmentInvalid = 6001,
    SubmissionNotFound = 6002,
    SubmissionAlreadyExists = 6003,
    SubmissionInvalid = 6004,
    ScoreOutOfRange = 6005,

    // 考勤
    AttendanceSessionNotFound = 7000,
    AttendanceSessionInvalid = 7001,
    AttendanceSessionClosed = 7002,
    AttendanceAlreadyRecorded = 7003,
    AttendanceRecordInvalid = 7004,

    // 课表与公告
    ScheduleNotFound = 8000,
    ScheduleInvalid = 8001,
    ScheduleConflict = 8002,
    AnnouncementNotFound = 8100,
    AnnouncementInvalid = 8101,

    // 系统设置
    SettingInvalid = 9001,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::BadRequest as i32, 1000);
        assert_eq!(ErrorCode::ClassHasMembers as i32, 5002);
        assert_eq!(ErrorCode::ScheduleConflict as i32, 8002);
    }
}
