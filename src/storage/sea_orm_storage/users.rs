use super::SeaOrmStorage;
use crate::entity::homerooms::{Column as HomeroomColumn, Entity as Homerooms};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::{escape_like_pattern, like_contains};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 构造新用户的 ActiveModel
fn new_user_model(req: CreateUserRequest, now: i64) -> ActiveModel {
    ActiveModel {
        username: Set(req.username),
        email: Set(req.email),
        password_hash: Set(req.password),
        full_name: Set(req.full_name),
        role: Set(req.role.to_string()),
        status: Set(UserStatus::Active.to_string()),
        nis_nip: Set(req.nis_nip),
        homeroom_id: Set(req.homeroom_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let result = new_user_model(req, now)
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建用户失败", e))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量获取用户
    pub async fn get_users_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let result = Users::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_user()).collect())
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(like_contains(&escaped)))
                    .add(Column::Email.like(like_contains(&escaped)))
                    .add(Column::FullName.like(like_contains(&escaped)))
                    .add(Column::NisNip.like(like_contains(&escaped))),
            );
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 行政班筛选
        if let Some(homeroom_id) = query.homeroom_id {
            select = select.filter(Column::HomeroomId.eq(homeroom_id));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户总数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(nis_nip) = update.nis_nip {
            model.nis_nip = Set(Some(nis_nip));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::from_db("更新用户失败", e))?;

        Ok(Some(result.into_user()))
    }

    /// 删除用户
    ///
    /// 行政班的班主任字段没有外键约束，需在同一事务中一并清除。
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        Homerooms::update_many()
            .col_expr(
                HomeroomColumn::HomeroomTeacherId,
                sea_orm::sea_query::Expr::value(Option::<i64>::None),
            )
            .filter(HomeroomColumn::HomeroomTeacherId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("清除班主任失败: {e}")))?;

        // 教师名下的班级随用户级联删除，班级仍有学生时被外键拒绝
        let result = Users::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => {
                    LmsError::conflict(format!("用户 {id} 负责的班级仍有学生选课"))
                }
                _ => LmsError::database_operation(format!("删除用户失败: {e}")),
            })?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }

    /// 找出已存在的用户名
    pub async fn find_existing_usernames_impl(&self, usernames: &[String]) -> Result<Vec<String>> {
        if usernames.is_empty() {
            return Ok(vec![]);
        }

        let existing: Vec<String> = Users::find()
            .select_only()
            .column(Column::Username)
            .filter(Column::Username.is_in(usernames.to_vec()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询已存在用户名失败: {e}")))?;

        Ok(existing)
    }

    /// 批量导入用户
    ///
    /// 任意一行插入失败时整个事务回滚，不保留任何已插入的行。
    pub async fn import_users_impl(&self, users: Vec<CreateUserRequest>) -> Result<Vec<User>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(users.len());
        for req in users {
            let username = req.username.clone();
            let model = new_user_model(req, now)
                .insert(&txn)
                .await
                .map_err(|e| LmsError::from_db(&format!("导入用户 {username} 失败"), e))?;
            created.push(model.into_user());
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }
}
