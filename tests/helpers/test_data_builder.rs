// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use classroom_aps::repository::AllocationRepository;

// ==========================================
// AllocationSlot 构建器
// ==========================================

pub struct AllocationBuilder {
    schedule_id: i64,
    room: String,
    building: String,
    section: String,
    teacher_name: String,
    schedule_day: String,
    schedule_time: String,
    course_code: String,
}

impl AllocationBuilder {
    pub fn new(room: &str, section: &str) -> Self {
        Self {
            schedule_id: 1,
            room: room.to_string(),
            building: "东楼".to_string(),
            section: section.to_string(),
            teacher_name: String::new(),
            schedule_day: "M".to_string(),
            schedule_time: "7:00 AM - 8:30 AM".to_string(),
            course_code: "CS101".to_string(),
        }
    }

    pub fn schedule(mut self, schedule_id: i64) -> Self {
        self.schedule_id = schedule_id;
        self
    }

    pub fn building(mut self, building: &str) -> Self {
        self.building = building.to_string();
        self
    }

    pub fn teacher(mut self, teacher_name: &str) -> Self {
        self.teacher_name = teacher_name.to_string();
        self
    }

    pub fn day(mut self, schedule_day: &str) -> Self {
        self.schedule_day = schedule_day.to_string();
        self
    }

    pub fn time(mut self, schedule_time: &str) -> Self {
        self.schedule_time = schedule_time.to_string();
        self
    }

    pub fn course(mut self, course_code: &str) -> Self {
        self.course_code = course_code.to_string();
        self
    }

    /// 落库并返回 allocation_id
    pub fn insert(self, repo: &AllocationRepository) -> i64 {
        repo.insert(
            self.schedule_id,
            &self.room,
            &self.building,
            &self.section,
            &self.teacher_name,
            &self.schedule_day,
            &self.schedule_time,
            &self.course_code,
        )
        .expect("插入排课记录失败")
    }
}
