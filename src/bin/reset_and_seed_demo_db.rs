// ==========================================
// 高校排课调度系统 - 演示库重置与播种工具
// ==========================================
// 用法: cargo run --bin reset_and_seed_demo_db [db_path]
// 行为: 备份并重建数据库, 建表, 播种一套可立即演示的排课场景
// ==========================================

use chrono::Local;
use rusqlite::params;
use std::error::Error;
use std::fs;
use std::path::Path;

use classroom_aps::app::get_default_db_path;
use classroom_aps::db::{init_schema, open_sqlite_connection};

fn main() -> Result<(), Box<dyn Error>> {
    classroom_aps::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;

    // 建表
    init_schema(&conn)?;

    // 播种
    seed_demo_scenario(&conn)?;

    print_quick_counts(&conn)?;

    tracing::info!("演示库已就绪: {}", db_path);
    Ok(())
}

/// 备份并删除既有库文件
fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak_{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;
    tracing::info!("既有库已备份至: {}", backup_path);
    Ok(())
}

/// 播种演示场景
///
/// - 1 张未锁定课表
/// - 6 间教室 (两栋楼, 含多媒体/实验设备差异)
/// - 设备标签 + 课程需求 (CS101 带强制投影仪需求)
/// - 8 条排课记录 (覆盖复合日码与 LEC/LAB 同教学班)
/// - 3 个账号 (1 管理员 + 2 教师)
fn seed_demo_scenario(conn: &rusqlite::Connection) -> Result<(), Box<dyn Error>> {
    let now = chrono::Utc::now();

    // ===== 课表 =====
    conn.execute(
        "INSERT INTO schedule (schedule_id, schedule_name, is_locked, created_at) VALUES (1, '2026-2027 第一学期', 0, ?1)",
        params![now],
    )?;

    // ===== 账号 =====
    for (user_id, display_name, role) in [
        ("admin01", "教务处 王主任", "ADMIN"),
        ("fac_cruz", "Prof. Cruz", "FACULTY"),
        ("fac_reyes", "Prof. Reyes", "FACULTY"),
    ] {
        conn.execute(
            "INSERT INTO user_account (user_id, display_name, role) VALUES (?1, ?2, ?3)",
            params![user_id, display_name, role],
        )?;
    }

    // ===== 教室 =====
    for (room_id, room_name, building, capacity) in [
        (1, "101", "东楼", 45),
        (2, "102", "东楼", 45),
        (3, "201", "东楼", 60),
        (4, "CL1", "西楼", 40),
        (5, "CL2", "西楼", 40),
        (6, "301", "西楼", 80),
    ] {
        conn.execute(
            "INSERT INTO room (room_id, room_name, building, capacity) VALUES (?1, ?2, ?3, ?4)",
            params![room_id, room_name, building, capacity],
        )?;
    }

    // ===== 设备标签 =====
    for (tag_id, tag_name, tag_category) in [
        (1, "投影仪", "多媒体"),
        (2, "学生电脑", "实验设备"),
        (3, "空调", "环境"),
        (4, "白板", "基础"),
    ] {
        conn.execute(
            "INSERT INTO feature_tag (tag_id, tag_name, tag_category) VALUES (?1, ?2, ?3)",
            params![tag_id, tag_name, tag_category],
        )?;
    }

    // ===== 教室设备 =====
    for (room_id, tag_id, quantity) in [
        (1, 1, 1),
        (1, 3, 2),
        (1, 4, 1),
        (2, 4, 1),
        (3, 1, 1),
        (3, 3, 2),
        (4, 1, 1),
        (4, 2, 40),
        (4, 3, 2),
        (5, 2, 40),
        (6, 1, 2),
        (6, 3, 4),
    ] {
        conn.execute(
            "INSERT INTO room_feature (room_id, tag_id, quantity) VALUES (?1, ?2, ?3)",
            params![room_id, tag_id, quantity],
        )?;
    }

    // ===== 课程需求 =====
    // CS101: 强制投影仪 + 可选空调
    // CS135 (程序设计实验): 强制学生电脑(30台起)
    for (course_code, tag_id, is_mandatory, min_quantity) in [
        ("CS101", 1, true, 1),
        ("CS101", 3, false, 1),
        ("CS135", 2, true, 30),
        ("CS135", 1, false, 1),
    ] {
        conn.execute(
            "INSERT INTO course_requirement (course_code, tag_id, is_mandatory, min_quantity) VALUES (?1, ?2, ?3, ?4)",
            params![course_code, tag_id, is_mandatory, min_quantity],
        )?;
    }

    // ===== 排课记录 =====
    for (room, building, section, teacher, day, time, course) in [
        ("101", "东楼", "BSCS1A", "Prof. Cruz", "MWF", "7:00 AM - 8:00 AM", "CS101"),
        ("101", "东楼", "BSCS1B", "Prof. Cruz", "MWF", "8:00 AM - 9:00 AM", "CS101"),
        ("CL1", "西楼", "BSCS1A_LAB", "Prof. Reyes", "TTH", "9:00 AM - 10:30 AM", "CS135"),
        ("201", "东楼", "BSCS1A_LEC", "Prof. Reyes", "TTH", "7:00 AM - 8:30 AM", "CS135"),
        ("201", "东楼", "BSCS2A", "", "MW", "10:00 AM - 11:30 AM", "GE5"),
        ("301", "西楼", "BSIT2B", "Prof. Reyes", "F", "1:00 PM - 4:00 PM", "IT210"),
        ("CL2", "西楼", "BSIT2B_LAB", "", "S", "8:00 AM - 11:00 AM", "IT210"),
        ("102", "东楼", "BSCS3A", "Prof. Cruz", "M/W/F", "1:00 PM - 2:00 PM", "CS301"),
    ] {
        conn.execute(
            r#"
            INSERT INTO allocation_slot (
                schedule_id, room, building, section, teacher_name,
                schedule_day, schedule_time, course_code, revision, created_at, updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)
            "#,
            params![room, building, section, teacher, day, time, course, now],
        )?;
    }

    Ok(())
}

/// 输出播种概况
fn print_quick_counts(conn: &rusqlite::Connection) -> Result<(), Box<dyn Error>> {
    for (label, sql) in [
        ("课表", "SELECT COUNT(*) FROM schedule"),
        ("教室", "SELECT COUNT(*) FROM room"),
        ("排课记录", "SELECT COUNT(*) FROM allocation_slot"),
        ("设备标签", "SELECT COUNT(*) FROM feature_tag"),
        ("课程需求", "SELECT COUNT(*) FROM course_requirement"),
        ("账号", "SELECT COUNT(*) FROM user_account"),
    ] {
        let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        tracing::info!("{}: {} 条", label, count);
    }
    Ok(())
}
