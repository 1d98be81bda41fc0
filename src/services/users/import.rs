//! 用户导入服务
//!
//! CSV 必需列：`username, full_name, password, role`；可选列：`email, nis_nip, homeroom`。
//! 缺少必填值的行跳过，校验失败的行记为失败，其余行在同一事务中写入。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use super::UserService;
use super::create::validate_new_user;
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::models::users::responses::{ImportRowError, UserImportResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;
use crate::utils::password::hash_password;

const REQUIRED_COLUMNS: [&str; 4] = ["username", "full_name", "password", "role"];

/// 导入解析错误
#[derive(Debug)]
enum ImportParseError {
    MissingColumn(String),
    ParseFailed(String),
}

impl ImportParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("缺少必需列: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
        }
    }
}

/// 导入行数据
#[derive(Debug, Clone, PartialEq)]
struct ImportRow {
    row_num: usize,
    username: String,
    full_name: String,
    password: String,
    role: String,
    email: Option<String>,
    nis_nip: Option<String>,
    homeroom: Option<String>,
}

#[derive(Debug, PartialEq)]
enum ParsedRow {
    Complete(ImportRow),
    /// 缺少必填值
    Incomplete {
        row_num: usize,
        username: Option<String>,
        missing: Vec<&'static str>,
    },
}

/// 导入用户
pub async fn import_users(
    service: &UserService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 读取文件内容
    let file_bytes = match read_file_from_multipart(&mut payload).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ImportFileMissing, e)));
        }
    };

    let rows = match parse_csv(&file_bytes) {
        Ok(rows) => rows,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(e.error_code(), e.message())));
        }
    };

    let max_rows = AppConfig::get().import.max_rows;
    if rows.len() > max_rows {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ImportTooManyRows,
            format!("单次导入最多支持 {max_rows} 行"),
        )));
    }

    let total = rows.len();
    let mut errors: Vec<ImportRowError> = Vec::new();
    let mut skipped = 0;
    let mut failed = 0;
    let mut candidates: Vec<(usize, CreateUserRequest)> = Vec::new();
    let mut homeroom_ids: HashMap<String, Option<i64>> = HashMap::new();
    let mut seen_usernames: HashSet<String> = HashSet::new();

    for parsed in rows {
        let row = match parsed {
            ParsedRow::Complete(row) => row,
            ParsedRow::Incomplete {
                row_num,
                username,
                missing,
            } => {
                skipped += 1;
                errors.push(ImportRowError {
                    row: row_num,
                    username,
                    reason: format!("缺少必填字段: {}", missing.join(", ")),
                });
                continue;
            }
        };

        if !seen_usernames.insert(row.username.clone()) {
            skipped += 1;
            errors.push(ImportRowError {
                row: row.row_num,
                username: Some(row.username),
                reason: "用户名在文件中重复".to_string(),
            });
            continue;
        }

        // 行政班按名称查找，同名只查一次
        let homeroom_id = match &row.homeroom {
            None => None,
            Some(name) => {
                if !homeroom_ids.contains_key(name) {
                    let found = match storage.get_homeroom_by_name(name).await {
                        Ok(found) => found.map(|h| h.id),
                        Err(e) => return Ok(storage_error_response("查询行政班失败", e)),
                    };
                    homeroom_ids.insert(name.clone(), found);
                }
                match homeroom_ids.get(name).copied().flatten() {
                    Some(id) => Some(id),
                    None => {
                        failed += 1;
                        errors.push(ImportRowError {
                            row: row.row_num,
                            username: Some(row.username),
                            reason: format!("行政班不存在: {name}"),
                        });
                        continue;
                    }
                }
            }
        };

        match build_request(&row, homeroom_id) {
            Ok(user) => candidates.push((row.row_num, user)),
            Err(reason) => {
                failed += 1;
                errors.push(ImportRowError {
                    row: row.row_num,
                    username: Some(row.username),
                    reason,
                });
            }
        }
    }

    // 已存在的用户名跳过
    let usernames: Vec<String> = candidates.iter().map(|(_, u)| u.username.clone()).collect();
    let existing: HashSet<String> = match storage.find_existing_usernames(&usernames).await {
        Ok(existing) => existing.into_iter().collect(),
        Err(e) => return Ok(storage_error_response("检查用户名失败", e)),
    };

    let mut to_create = Vec::with_capacity(candidates.len());
    for (row_num, user) in candidates {
        if existing.contains(&user.username) {
            skipped += 1;
            errors.push(ImportRowError {
                row: row_num,
                username: Some(user.username),
                reason: "用户名已存在".to_string(),
            });
        } else {
            to_create.push(user);
        }
    }

    // 哈希密码（使用 spawn_blocking 避免阻塞）
    let hashed = tokio::task::spawn_blocking(move || {
        to_create
            .into_iter()
            .map(|mut user| {
                user.password = hash_password(&user.password)?;
                Ok(user)
            })
            .collect::<crate::errors::Result<Vec<_>>>()
    })
    .await;
    let to_create = match hashed {
        Ok(Ok(users)) => users,
        Ok(Err(e)) => return Ok(storage_error_response("密码哈希失败", e)),
        Err(e) => {
            tracing::error!("Password hashing task failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ImportFailed,
                    "密码处理失败",
                )),
            );
        }
    };

    // 同一事务写入，任一失败则全部回滚
    let created = match storage.import_users(to_create).await {
        Ok(users) => users.len(),
        Err(LmsError::Conflict(msg)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ImportFailed,
                format!("导入失败，已全部回滚: {msg}"),
            )));
        }
        Err(e) => return Ok(storage_error_response("导入失败，已全部回滚", e)),
    };

    tracing::info!(
        "User import finished: total={}, created={}, skipped={}, failed={}",
        total,
        created,
        skipped,
        failed
    );

    let response = UserImportResponse {
        total,
        created,
        skipped,
        failed,
        errors,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "导入完成")))
}

async fn read_file_from_multipart(payload: &mut Multipart) -> Result<Vec<u8>, String> {
    let mut file_bytes = Vec::new();
    let mut found = false;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("读取字段失败: {e}"))?;

        if field.name() == Some("file") {
            found = true;
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("读取数据失败: {e}"))?;
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if !found {
        return Err("未找到文件字段 file".to_string());
    }
    if file_bytes.is_empty() {
        return Err("文件内容为空".to_string());
    }

    Ok(file_bytes)
}

fn parse_csv(data: &[u8]) -> Result<Vec<ParsedRow>, ImportParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    // 表头不区分大小写，忽略 UTF-8 BOM
    let headers = rdr
        .headers()
        .map_err(|e| ImportParseError::ParseFailed(format!("读取表头失败: {e}")))?;
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').to_lowercase(), i))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(ImportParseError::MissingColumn(column.to_string()));
        }
    }

    let mut rows = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        // 表头为第 1 行
        let row_num = index + 2;
        let record = result.map_err(|e| {
            ImportParseError::ParseFailed(format!("第 {row_num} 行解析失败: {e}"))
        })?;

        let cell = |column: &str| -> Option<String> {
            header_map
                .get(column)
                .and_then(|i| record.get(*i))
                .map(str::to_string)
                .filter(|s| !s.is_empty())
        };

        // 整行为空时忽略
        if record.iter().all(str::is_empty) {
            continue;
        }

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| cell(column).is_none())
            .collect();

        if !missing.is_empty() {
            rows.push(ParsedRow::Incomplete {
                row_num,
                username: cell("username"),
                missing,
            });
            continue;
        }

        rows.push(ParsedRow::Complete(ImportRow {
            row_num,
            username: cell("username").unwrap_or_default(),
            full_name: cell("full_name").unwrap_or_default(),
            password: cell("password").unwrap_or_default(),
            role: cell("role").unwrap_or_default(),
            email: cell("email"),
            nis_nip: cell("nis_nip"),
            homeroom: cell("homeroom"),
        }));
    }

    Ok(rows)
}

/// 将一行转换为创建请求，校验失败时返回原因
fn build_request(row: &ImportRow, homeroom_id: Option<i64>) -> Result<CreateUserRequest, String> {
    let role = row
        .role
        .parse::<UserRole>()
        .map_err(|_| format!("无效的角色值: {}，支持: admin, guru, siswa, wali_kelas", row.role))?;

    let user = CreateUserRequest {
        username: row.username.clone(),
        email: row.email.clone(),
        password: row.password.clone(),
        full_name: row.full_name.clone(),
        role,
        nis_nip: row.nis_nip.clone(),
        homeroom_id,
    };
    validate_new_user(&user).map_err(|(_, msg)| msg)?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\u{feff}Username,Full_Name,Password,Role,Email,NIS_NIP,Homeroom\n\
        siti,Siti Aminah,Rahasia123,siswa,siti@sekolah.sch.id,1001,XI IPA 1\n\
        budi,,Rahasia123,siswa,,,\n\
        ,,,,,,\n\
        pak_joko,Joko Widodo,Rahasia123,guru,,,\n";

    #[test]
    fn test_parse_csv_rows() {
        let rows = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        match &rows[0] {
            ParsedRow::Complete(row) => {
                assert_eq!(row.row_num, 2);
                assert_eq!(row.username, "siti");
                assert_eq!(row.homeroom.as_deref(), Some("XI IPA 1"));
                assert_eq!(row.nis_nip.as_deref(), Some("1001"));
            }
            other => panic!("unexpected row: {other:?}"),
        }

        assert_eq!(
            rows[1],
            ParsedRow::Incomplete {
                row_num: 3,
                username: Some("budi".to_string()),
                missing: vec!["full_name"],
            }
        );

        // 空行被忽略，行号仍按文件计算
        match &rows[2] {
            ParsedRow::Complete(row) => {
                assert_eq!(row.row_num, 5);
                assert_eq!(row.email, None);
                assert_eq!(row.homeroom, None);
            }
            other => panic!("unexpected row: {other:?}"),
        }
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let err = parse_csv(b"username,password,role\nsiti,Rahasia123,siswa\n").unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::ImportFileMissingColumn);
        assert!(err.message().contains("full_name"));
    }

    #[test]
    fn test_build_request_validation() {
        let row = ImportRow {
            row_num: 2,
            username: "siti".to_string(),
            full_name: "Siti Aminah".to_string(),
            password: "Rahasia123".to_string(),
            role: "siswa".to_string(),
            email: None,
            nis_nip: None,
            homeroom: None,
        };
        let user = build_request(&row, Some(3)).unwrap();
        assert_eq!(user.role, UserRole::Siswa);
        assert_eq!(user.homeroom_id, Some(3));

        let bad_role = ImportRow {
            role: "murid".to_string(),
            ..row.clone()
        };
        assert!(build_request(&bad_role, None).unwrap_err().contains("murid"));

        let bad_email = ImportRow {
            email: Some("bukan-email".to_string()),
            ..row
        };
        assert!(build_request(&bad_email, None).is_err());
    }
}
