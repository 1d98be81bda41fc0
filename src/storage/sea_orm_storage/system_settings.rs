//! 系统设置存储实现

use sea_orm::{ActiveModelTrait, EntityTrait, Order, QueryOrder, Set, TransactionTrait};

use crate::entity::prelude::SystemSettings;
use crate::entity::system_settings::{ActiveModel, Column};
use crate::errors::{LmsError, Result};
use crate::models::system::entities::SystemSetting;

use super::SeaOrmStorage;

impl SeaOrmStorage {
    /// 获取所有设置
    pub(crate) async fn list_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = SystemSettings::find()
            .order_by(Column::Key, Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("获取设置列表失败: {e}")))?;

        Ok(settings.into_iter().map(|s| s.into_setting()).collect())
    }

    /// 批量更新设置，任一键不存在则整体回滚
    pub(crate) async fn update_settings_impl(
        &self,
        items: Vec<(String, String)>,
        updated_by: i64,
    ) -> Result<Vec<SystemSetting>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let mut results = Vec::with_capacity(items.len());
        for (key, value) in items {
            let existing = SystemSettings::find_by_id(key.clone())
                .one(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("获取设置失败: {e}")))?
                .ok_or_else(|| LmsError::not_found(format!("配置项不存在: {key}")))?;

            let mut active_model: ActiveModel = existing.into();
            active_model.value = Set(value);
            active_model.updated_at = Set(now);
            active_model.updated_by = Set(Some(updated_by));

            let updated = active_model
                .update(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("更新设置失败: {e}")))?;
            results.push(updated.into_setting());
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(results)
    }
}
