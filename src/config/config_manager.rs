// ==========================================
// 高校排课调度系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config_trait::EngineConfigReader;
use crate::db::configure_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ===== 配置键 =====
pub const KEY_GRID_START_MINUTES: &str = "grid_start_minutes";
pub const KEY_GRID_END_MINUTES: &str = "grid_end_minutes";
pub const KEY_SLOT_STEP_MINUTES: &str = "slot_step_minutes";

// ===== 默认值 =====
const DEFAULT_GRID_START_MINUTES: i32 = 420; // 07:00
const DEFAULT_GRID_END_MINUTES: i32 = 1200; // 20:00
const DEFAULT_SLOT_STEP_MINUTES: i32 = 30;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取整型配置, 缺失时回落默认值
    fn get_i32_or(&self, key: &str, default: i32) -> Result<i32, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(raw) => {
                let parsed: i32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| format!("配置项 {} 的值无法解析为整数: {}", key, raw))?;
                Ok(parsed)
            }
            None => Ok(default),
        }
    }

    /// 写入配置值 (global scope, upsert)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        Ok(())
    }
}

#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_grid_start_minutes(&self) -> Result<i32, Box<dyn Error>> {
        self.get_i32_or(KEY_GRID_START_MINUTES, DEFAULT_GRID_START_MINUTES)
    }

    async fn get_grid_end_minutes(&self) -> Result<i32, Box<dyn Error>> {
        self.get_i32_or(KEY_GRID_END_MINUTES, DEFAULT_GRID_END_MINUTES)
    }

    async fn get_slot_step_minutes(&self) -> Result<i32, Box<dyn Error>> {
        self.get_i32_or(KEY_SLOT_STEP_MINUTES, DEFAULT_SLOT_STEP_MINUTES)
    }
}
