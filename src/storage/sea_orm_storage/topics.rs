//! 主题与学习材料存储操作

use super::SeaOrmStorage;
use crate::entity::materials::{
    ActiveModel as MaterialActiveModel, Column as MaterialColumn, Entity as Materials,
};
use crate::entity::topics::{ActiveModel, Column, Entity as Topics};
use crate::errors::{LmsError, Result};
use crate::models::topics::{
    entities::{Material, Topic},
    requests::{CreateMaterialRequest, CreateTopicRequest, UpdateTopicRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建主题，order_index 取当前最大值加一
    pub async fn create_topic_impl(&self, class_id: i64, req: CreateTopicRequest) -> Result<Topic> {
        let max_index: Option<Option<i32>> = Topics::find()
            .select_only()
            .column_as(Column::OrderIndex.max(), "max_index")
            .filter(Column::ClassId.eq(class_id))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题序号失败: {e}")))?;
        let order_index = max_index.flatten().map_or(1, |max| max + 1);

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            class_id: Set(class_id),
            title: Set(req.title),
            description: Set(req.description),
            order_index: Set(order_index),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建主题失败", e))?;

        Ok(result.into_topic())
    }

    pub async fn get_topic_by_id_impl(&self, topic_id: i64) -> Result<Option<Topic>> {
        let result = Topics::find_by_id(topic_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题失败: {e}")))?;

        Ok(result.map(|m| m.into_topic()))
    }

    pub async fn list_topics_impl(&self, class_id: i64) -> Result<Vec<Topic>> {
        let models = Topics::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::OrderIndex)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_topic()).collect())
    }

    pub async fn update_topic_impl(
        &self,
        topic_id: i64,
        update: UpdateTopicRequest,
    ) -> Result<Option<Topic>> {
        if self.get_topic_by_id_impl(topic_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(topic_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if let Some(order_index) = update.order_index {
            model.order_index = Set(order_index);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新主题失败: {e}")))?;

        Ok(Some(result.into_topic()))
    }

    pub async fn delete_topic_impl(&self, topic_id: i64) -> Result<bool> {
        let result = Topics::delete_by_id(topic_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除主题失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 创建学习材料
    pub async fn create_material_impl(
        &self,
        topic_id: i64,
        created_by: i64,
        req: CreateMaterialRequest,
    ) -> Result<Material> {
        let model = MaterialActiveModel {
            topic_id: Set(topic_id),
            title: Set(req.title),
            content: Set(req.content),
            link_url: Set(req.link_url),
            created_by: Set(created_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建学习材料失败: {e}")))?;

        Ok(result.into_material())
    }

    pub async fn get_material_by_id_impl(&self, material_id: i64) -> Result<Option<Material>> {
        let result = Materials::find_by_id(material_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学习材料失败: {e}")))?;

        Ok(result.map(|m| m.into_material()))
    }

    pub async fn list_materials_impl(&self, topic_id: i64) -> Result<Vec<Material>> {
        let models = Materials::find()
            .filter(MaterialColumn::TopicId.eq(topic_id))
            .order_by_asc(MaterialColumn::CreatedAt)
            .order_by_asc(MaterialColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学习材料失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_material()).collect())
    }

    pub async fn delete_material_impl(&self, material_id: i64) -> Result<bool> {
        let result = Materials::delete_by_id(material_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除学习材料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
