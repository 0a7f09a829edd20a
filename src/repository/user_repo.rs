// ==========================================
// 高校排课调度系统 - 账号仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 注: 认证鉴权属外部协作方, 此处只维护展示姓名联查源
// ==========================================

use crate::domain::UserAccount;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// UserRepository - 账号仓储
// ==========================================
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入或更新账号
    pub fn upsert(&self, user: &UserAccount) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO user_account (user_id, display_name, role)
            VALUES (?1, ?2, ?3)
            "#,
            params![user.user_id, user.display_name, user.role],
        )?;

        Ok(())
    }

    /// 按ID查询账号
    pub fn find_by_id(&self, user_id: &str) -> RepositoryResult<Option<UserAccount>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT user_id, display_name, role FROM user_account WHERE user_id = ?1")?;

        let user = stmt
            .query_row(params![user_id], |row| {
                Ok(UserAccount {
                    user_id: row.get(0)?,
                    display_name: row.get(1)?,
                    role: row.get(2)?,
                })
            })
            .optional()?;

        Ok(user)
    }
}
