//! 公告存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    announcements::{
        entities::Announcement,
        requests::{AnnouncementVisibility, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        responses::{AnnouncementItem, AnnouncementListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// 可见性过滤条件
fn visibility_condition(visibility: &AnnouncementVisibility) -> Condition {
    let audiences: Vec<String> = visibility
        .audiences
        .iter()
        .map(|a| a.to_string())
        .collect();

    let mut condition = Condition::any().add(
        Condition::all()
            .add(Column::ClassId.is_null())
            .add(Column::Audience.is_in(audiences)),
    );

    if visibility.all_classes {
        condition = condition.add(Column::ClassId.is_not_null());
    } else if !visibility.class_ids.is_empty() {
        condition = condition.add(Column::ClassId.is_in(visibility.class_ids.clone()));
    }

    condition
}

impl SeaOrmStorage {
    pub async fn create_announcement_impl(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            author_id: Set(author_id),
            class_id: Set(req.class_id),
            title: Set(req.title),
            content: Set(req.content),
            audience: Set(req.audience.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建公告失败: {e}")))?;

        Ok(result.into_announcement())
    }

    pub async fn get_announcement_by_id_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询公告失败: {e}")))?;

        Ok(result.map(|m| m.into_announcement()))
    }

    pub async fn update_announcement_impl(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        let Some(existing) = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询公告失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(audience) = update.audience {
            model.audience = Set(audience.to_string());
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新公告失败: {e}")))?;

        Ok(Some(result.into_announcement()))
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除公告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 分页列出可见公告，最新的在前
    pub async fn list_visible_announcements_impl(
        &self,
        visibility: AnnouncementVisibility,
        page: u64,
        size: u64,
    ) -> Result<AnnouncementListResponse> {
        let paginator = Announcements::find()
            .filter(visibility_condition(&visibility))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询公告总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询公告列表失败: {e}")))?;

        let author_ids: Vec<i64> = models.iter().map(|m| m.author_id).collect();
        let class_ids: Vec<i64> = models.iter().filter_map(|m| m.class_id).collect();

        let authors: HashMap<i64, String> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(UserColumn::Id.is_in(author_ids))
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询公告作者失败: {e}")))?
                .into_iter()
                .map(|u| (u.id, u.full_name))
                .collect()
        };

        let classes: HashMap<i64, String> = if class_ids.is_empty() {
            HashMap::new()
        } else {
            Classes::find()
                .filter(ClassColumn::Id.is_in(class_ids))
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询班级失败: {e}")))?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect()
        };

        let items = models
            .into_iter()
            .map(|m| AnnouncementItem {
                author_name: authors.get(&m.author_id).cloned().unwrap_or_default(),
                class_name: m.class_id.and_then(|id| classes.get(&id).cloned()),
                announcement: m.into_announcement(),
            })
            .collect();

        Ok(AnnouncementListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}
