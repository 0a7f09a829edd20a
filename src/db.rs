// ==========================================
// 高校排课调度系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一建表 DDL（种子工具与测试共用同一份）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：版本号用于提示/告警（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化数据库 schema
///
/// 种子工具、集成测试共用。全部 CREATE TABLE IF NOT EXISTS，幂等。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_scope (
            scope_id TEXT PRIMARY KEY,
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(scope_type, scope_key)
        );

        INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
        VALUES ('global', 'GLOBAL', 'global');

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS schedule (
            schedule_id INTEGER PRIMARY KEY AUTOINCREMENT,
            schedule_name TEXT NOT NULL,
            is_locked INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS allocation_slot (
            allocation_id INTEGER PRIMARY KEY AUTOINCREMENT,
            schedule_id INTEGER NOT NULL REFERENCES schedule(schedule_id),
            room TEXT NOT NULL,
            building TEXT NOT NULL,
            section TEXT NOT NULL,
            teacher_name TEXT NOT NULL DEFAULT '',
            schedule_day TEXT NOT NULL DEFAULT '',
            schedule_time TEXT NOT NULL DEFAULT '',
            course_code TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_allocation_schedule
            ON allocation_slot(schedule_id);

        CREATE TABLE IF NOT EXISTS room (
            room_id INTEGER PRIMARY KEY AUTOINCREMENT,
            room_name TEXT NOT NULL UNIQUE,
            building TEXT NOT NULL,
            capacity INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS feature_tag (
            tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
            tag_name TEXT NOT NULL UNIQUE,
            tag_category TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS room_feature (
            room_id INTEGER NOT NULL REFERENCES room(room_id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES feature_tag(tag_id) ON DELETE CASCADE,
            quantity INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (room_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS course_requirement (
            course_code TEXT NOT NULL,
            tag_id INTEGER NOT NULL REFERENCES feature_tag(tag_id) ON DELETE CASCADE,
            is_mandatory INTEGER NOT NULL DEFAULT 0,
            min_quantity INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (course_code, tag_id)
        );

        CREATE TABLE IF NOT EXISTS change_request (
            request_id TEXT PRIMARY KEY,
            schedule_id INTEGER NOT NULL REFERENCES schedule(schedule_id),
            allocation_id INTEGER NOT NULL REFERENCES allocation_slot(allocation_id),
            requester_id TEXT NOT NULL,
            original_day TEXT NOT NULL,
            original_time TEXT NOT NULL,
            new_day TEXT NOT NULL,
            new_time TEXT NOT NULL,
            reason TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'PENDING',
            admin_notes TEXT,
            reviewed_at TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_change_request_schedule
            ON change_request(schedule_id);
        CREATE INDEX IF NOT EXISTS idx_change_request_status
            ON change_request(status);

        CREATE TABLE IF NOT EXISTS notification (
            notification_id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            audience TEXT NOT NULL,
            severity TEXT NOT NULL,
            category TEXT NOT NULL,
            schedule_id INTEGER,
            metadata TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_notification_audience
            ON notification(audience);

        CREATE TABLE IF NOT EXISTS user_account (
            user_id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'FACULTY'
        );

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}
