// ==========================================
// 高校排课调度系统 - Time Core 纯函数库
// ==========================================
// 职责: 时刻字符串解析、时间段重叠判定、日码展开
// 红线: 无状态、无副作用、无 I/O 操作
// 红线: 所有比较在分钟归一化后进行, 原始字符串不参与比较
// ==========================================

use crate::domain::types::Weekday;
use crate::engine::error::TimeParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 一天的分钟总数
pub const MINUTES_PER_DAY: i32 = 1440;

// ==========================================
// TimeRange - 归一化时间段
// ==========================================
// 半开区间 [start_min, end_min), 临时计算值, 不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_min: i32,
    pub end_min: i32,
}

impl TimeRange {
    /// 构造并校验时间段
    ///
    /// # 不变式
    /// - 0 <= start < end < 1440
    pub fn new(start_min: i32, end_min: i32) -> Result<Self, TimeParseError> {
        if start_min < 0 || end_min >= MINUTES_PER_DAY || start_min >= end_min {
            return Err(TimeParseError::InvertedRange { start_min, end_min });
        }
        Ok(Self { start_min, end_min })
    }

    /// 半开区间重叠判定
    ///
    /// 端点相接 (a.end == b.start) 不算重叠
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }

    /// 时长 (分钟)
    pub fn duration_min(&self) -> i32 {
        self.end_min - self.start_min
    }
}

// ==========================================
// TimeCore - 纯函数工具类
// ==========================================
pub struct TimeCore;

impl TimeCore {
    /// 解析单个时刻字符串为当日分钟数
    ///
    /// # 支持格式
    /// - "H:MM" / "HH:MM" (24小时制)
    /// - "H:MM AM" / "H:MM PM" (12小时制, 后缀大小写不敏感)
    ///
    /// # 12小时制换算
    /// - 12 AM → 0 点, 12 PM → 12 点
    ///
    /// # 返回
    /// - Ok(i32): [0, 1440) 内的分钟数
    /// - Err(TimeParseError): 无法解析 (不回退为 0)
    pub fn parse_time_to_minutes(raw: &str) -> Result<i32, TimeParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimeParseError::Empty);
        }

        // 剥离 AM/PM 后缀
        let upper = trimmed.to_uppercase();
        let (clock_part, meridiem) = if let Some(stripped) = upper.strip_suffix("AM") {
            (stripped.trim_end().to_string(), Some(false))
        } else if let Some(stripped) = upper.strip_suffix("PM") {
            (stripped.trim_end().to_string(), Some(true))
        } else {
            (upper.clone(), None)
        };

        let parts: Vec<&str> = clock_part.split(':').collect();
        if parts.len() != 2 {
            return Err(TimeParseError::BadFormat {
                raw: trimmed.to_string(),
            });
        }

        let hour: u32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| TimeParseError::BadFormat {
                raw: trimmed.to_string(),
            })?;
        let minute: u32 = parts[1]
            .trim()
            .parse()
            .map_err(|_| TimeParseError::BadFormat {
                raw: trimmed.to_string(),
            })?;

        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange { minute });
        }

        let hour24 = match meridiem {
            // 12小时制: 小时必须在 1..=12
            Some(is_pm) => {
                if !(1..=12).contains(&hour) {
                    return Err(TimeParseError::HourOutOfRange { hour });
                }
                match (hour, is_pm) {
                    (12, false) => 0,       // 12 AM → 0 点
                    (12, true) => 12,       // 12 PM → 12 点
                    (h, false) => h,        // 上午
                    (h, true) => h + 12,    // 下午
                }
            }
            // 24小时制
            None => {
                if hour > 23 {
                    return Err(TimeParseError::HourOutOfRange { hour });
                }
                hour
            }
        };

        Ok((hour24 * 60 + minute) as i32)
    }

    /// 解析时间段字符串 (如 "7:00 AM - 8:30 AM")
    ///
    /// # 规则
    /// - 以单个 '-' 切分为恰好两段 (分隔符两侧允许空白)
    /// - 两端均须可解析, 且 start < end
    pub fn parse_schedule_time(raw: &str) -> Result<TimeRange, TimeParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimeParseError::Empty);
        }

        let parts: Vec<&str> = trimmed.split('-').collect();
        if parts.len() != 2 {
            return Err(TimeParseError::BadRange {
                raw: trimmed.to_string(),
            });
        }

        let start_min = Self::parse_time_to_minutes(parts[0])?;
        let end_min = Self::parse_time_to_minutes(parts[1])?;

        TimeRange::new(start_min, end_min)
    }

    /// 展开日码为星期集合
    ///
    /// # 日码表 (闭合, 未知码报错而非透传)
    /// - 单日缩写/全名: M/MON/MONDAY, T/TU/TUE/TUES/TUESDAY, W/WED/WEDNESDAY,
    ///   THU/THUR/THURS/THURSDAY, F/FRI/FRIDAY, S/SAT/SATURDAY, SU/SUN/SUNDAY
    /// - 复合码: TTH 与 TH → {周二, 周四}, MW → {周一, 周三}, MWF → {周一, 周三, 周五}
    /// - '/' 分隔的列表逐段独立展开 (如 "M/W/F")
    ///
    /// 注: TH 沿用既有数据口径记为周二+周四复合码, 单独的周四用 THU/THUR/THURS/THURSDAY
    pub fn expand_day_code(raw: &str) -> Result<BTreeSet<Weekday>, TimeParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimeParseError::Empty);
        }

        let mut days = BTreeSet::new();
        for segment in trimmed.split('/') {
            let code = segment.trim().to_uppercase();
            if code.is_empty() {
                return Err(TimeParseError::UnknownDayCode {
                    code: segment.to_string(),
                });
            }
            match code.as_str() {
                // ===== 复合码 =====
                "TTH" | "TH" => {
                    days.insert(Weekday::Tuesday);
                    days.insert(Weekday::Thursday);
                }
                "MW" => {
                    days.insert(Weekday::Monday);
                    days.insert(Weekday::Wednesday);
                }
                "MWF" => {
                    days.insert(Weekday::Monday);
                    days.insert(Weekday::Wednesday);
                    days.insert(Weekday::Friday);
                }
                // ===== 单日 =====
                "M" | "MON" | "MONDAY" => {
                    days.insert(Weekday::Monday);
                }
                "T" | "TU" | "TUE" | "TUES" | "TUESDAY" => {
                    days.insert(Weekday::Tuesday);
                }
                "W" | "WED" | "WEDNESDAY" => {
                    days.insert(Weekday::Wednesday);
                }
                "THU" | "THUR" | "THURS" | "THURSDAY" => {
                    days.insert(Weekday::Thursday);
                }
                "F" | "FRI" | "FRIDAY" => {
                    days.insert(Weekday::Friday);
                }
                "S" | "SAT" | "SATURDAY" => {
                    days.insert(Weekday::Saturday);
                }
                "SU" | "SUN" | "SUNDAY" => {
                    days.insert(Weekday::Sunday);
                }
                _ => {
                    return Err(TimeParseError::UnknownDayCode { code });
                }
            }
        }

        Ok(days)
    }

    /// 判定存储日码是否覆盖目标星期
    ///
    /// 展开的是**存储侧**日码, 候选侧固定为一个具体星期
    pub fn day_matches(stored_code: &str, target: Weekday) -> Result<bool, TimeParseError> {
        Ok(Self::expand_day_code(stored_code)?.contains(&target))
    }

    /// 分钟数格式化为 "HH:MM" (日志/展示用)
    pub fn format_minutes(minutes: i32) -> String {
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================
    // parse_time_to_minutes
    // ==========================================

    #[test]
    fn test_parse_12h_morning() {
        assert_eq!(TimeCore::parse_time_to_minutes("7:00 AM").unwrap(), 420);
        assert_eq!(TimeCore::parse_time_to_minutes("11:30 am").unwrap(), 690);
    }

    #[test]
    fn test_parse_12h_evening() {
        assert_eq!(TimeCore::parse_time_to_minutes("7:00 PM").unwrap(), 1140);
        assert_eq!(TimeCore::parse_time_to_minutes("1:15 pm").unwrap(), 795);
    }

    #[test]
    fn test_parse_24h() {
        assert_eq!(TimeCore::parse_time_to_minutes("19:00").unwrap(), 1140);
        assert_eq!(TimeCore::parse_time_to_minutes("7:00").unwrap(), 420);
        assert_eq!(TimeCore::parse_time_to_minutes("07:05").unwrap(), 425);
    }

    #[test]
    fn test_parse_noon_midnight() {
        // 标准正午/午夜规则
        assert_eq!(TimeCore::parse_time_to_minutes("12:00 AM").unwrap(), 0);
        assert_eq!(TimeCore::parse_time_to_minutes("12:00 PM").unwrap(), 720);
        assert_eq!(TimeCore::parse_time_to_minutes("12:30 AM").unwrap(), 30);
    }

    #[test]
    fn test_parse_malformed_is_error_not_zero() {
        // 红线: 不得静默回退为 0 点
        assert!(TimeCore::parse_time_to_minutes("").is_err());
        assert!(TimeCore::parse_time_to_minutes("abc").is_err());
        assert!(TimeCore::parse_time_to_minutes("7").is_err());
        assert!(TimeCore::parse_time_to_minutes("7:xx").is_err());
        assert!(matches!(
            TimeCore::parse_time_to_minutes("25:00"),
            Err(TimeParseError::HourOutOfRange { hour: 25 })
        ));
        assert!(matches!(
            TimeCore::parse_time_to_minutes("7:60"),
            Err(TimeParseError::MinuteOutOfRange { minute: 60 })
        ));
        // 12小时制下 0 点不合法
        assert!(TimeCore::parse_time_to_minutes("0:30 AM").is_err());
    }

    // ==========================================
    // parse_schedule_time
    // ==========================================

    #[test]
    fn test_parse_schedule_time_basic() {
        let range = TimeCore::parse_schedule_time("7:00 AM - 8:30 AM").unwrap();
        assert_eq!(range.start_min, 420);
        assert_eq!(range.end_min, 510);
        assert_eq!(range.duration_min(), 90);
    }

    #[test]
    fn test_parse_schedule_time_no_spaces() {
        let range = TimeCore::parse_schedule_time("13:00-14:30").unwrap();
        assert_eq!(range.start_min, 780);
        assert_eq!(range.end_min, 870);
    }

    #[test]
    fn test_parse_schedule_time_wrong_part_count() {
        assert!(matches!(
            TimeCore::parse_schedule_time("7:00 AM"),
            Err(TimeParseError::BadRange { .. })
        ));
        assert!(matches!(
            TimeCore::parse_schedule_time("7:00 - 8:00 - 9:00"),
            Err(TimeParseError::BadRange { .. })
        ));
    }

    #[test]
    fn test_parse_schedule_time_inverted() {
        assert!(matches!(
            TimeCore::parse_schedule_time("9:00 AM - 8:00 AM"),
            Err(TimeParseError::InvertedRange { .. })
        ));
        // 零长度区间同样非法
        assert!(TimeCore::parse_schedule_time("9:00 - 9:00").is_err());
    }

    // ==========================================
    // TimeRange::overlaps
    // ==========================================

    #[test]
    fn test_overlap_touching_is_not_overlap() {
        let a = TimeRange::new(0, 60).unwrap();
        let b = TimeRange::new(60, 120).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlap_partial() {
        let a = TimeRange::new(0, 90).unwrap();
        let b = TimeRange::new(60, 120).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_overlap_containment() {
        let outer = TimeRange::new(420, 600).unwrap();
        let inner = TimeRange::new(450, 480).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    // ==========================================
    // expand_day_code
    // ==========================================

    #[test]
    fn test_expand_composite_tth() {
        let days = TimeCore::expand_day_code("TTH").unwrap();
        assert_eq!(
            days,
            BTreeSet::from([Weekday::Tuesday, Weekday::Thursday])
        );
        // TH 沿用复合码口径
        assert_eq!(TimeCore::expand_day_code("TH").unwrap(), days);
    }

    #[test]
    fn test_expand_composite_mwf() {
        let days = TimeCore::expand_day_code("MWF").unwrap();
        assert_eq!(
            days,
            BTreeSet::from([Weekday::Monday, Weekday::Wednesday, Weekday::Friday])
        );
        let mw = TimeCore::expand_day_code("MW").unwrap();
        assert_eq!(mw, BTreeSet::from([Weekday::Monday, Weekday::Wednesday]));
    }

    #[test]
    fn test_expand_slash_list() {
        let days = TimeCore::expand_day_code("M/W/F").unwrap();
        assert_eq!(
            days,
            BTreeSet::from([Weekday::Monday, Weekday::Wednesday, Weekday::Friday])
        );
        // 逐段独立展开, 允许段内复合码
        let mixed = TimeCore::expand_day_code("M/TTH").unwrap();
        assert_eq!(
            mixed,
            BTreeSet::from([Weekday::Monday, Weekday::Tuesday, Weekday::Thursday])
        );
    }

    #[test]
    fn test_expand_single_days_and_full_names() {
        assert_eq!(
            TimeCore::expand_day_code("monday").unwrap(),
            BTreeSet::from([Weekday::Monday])
        );
        assert_eq!(
            TimeCore::expand_day_code("THU").unwrap(),
            BTreeSet::from([Weekday::Thursday])
        );
        assert_eq!(
            TimeCore::expand_day_code("SU").unwrap(),
            BTreeSet::from([Weekday::Sunday])
        );
        assert_eq!(
            TimeCore::expand_day_code("S").unwrap(),
            BTreeSet::from([Weekday::Saturday])
        );
    }

    #[test]
    fn test_expand_unknown_code_is_error() {
        // 红线: 未知日码报错而非透传
        assert!(matches!(
            TimeCore::expand_day_code("XYZ"),
            Err(TimeParseError::UnknownDayCode { .. })
        ));
        assert!(TimeCore::expand_day_code("M/XYZ").is_err());
        assert!(TimeCore::expand_day_code("").is_err());
    }

    // ==========================================
    // day_matches
    // ==========================================

    #[test]
    fn test_day_matches() {
        assert!(TimeCore::day_matches("TTH", Weekday::Tuesday).unwrap());
        assert!(TimeCore::day_matches("TTH", Weekday::Thursday).unwrap());
        assert!(!TimeCore::day_matches("TTH", Weekday::Monday).unwrap());
        assert!(TimeCore::day_matches("MWF", Weekday::Friday).unwrap());
        assert!(!TimeCore::day_matches("MWF", Weekday::Saturday).unwrap());
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(TimeCore::format_minutes(420), "07:00");
        assert_eq!(TimeCore::format_minutes(1140), "19:00");
        assert_eq!(TimeCore::format_minutes(0), "00:00");
    }
}
