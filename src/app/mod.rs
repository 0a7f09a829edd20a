// ==========================================
// 高校排课调度系统 - 应用层
// ==========================================

pub mod state;

pub use state::AppState;

/// 默认数据库路径
///
/// 优先使用系统数据目录 (如 ~/.local/share/classroom-aps/),
/// 拿不到时回退为当前目录下的文件
pub fn get_default_db_path() -> String {
    match dirs::data_dir() {
        Some(mut dir) => {
            dir.push("classroom-aps");
            let _ = std::fs::create_dir_all(&dir);
            dir.push("classroom_aps.db");
            dir.to_string_lossy().to_string()
        }
        None => "classroom_aps.db".to_string(),
    }
}
